//! Cinematic cycle state machine.
//!
//! One authoritative clock drives everything: each call to [`Sequencer::tick`]
//! looks at wall-clock time since the current cycle began and applies every step that
//! has become due, strictly in order. Late or coalesced host callbacks only
//! delay a step; they can never reorder or drop one.
//!
//! ```text
//! boot: +0.8s focus first campaign ......................... +14s cycle 0 starts
//! cycle: 0 hide+neutral | 1.5 glow off | 2.5 swap | 4.0 glow on+focus | 8.0 reveal | 14 next
//! ```

use thiserror::Error;

use crate::camera::{ZOOM_IN_DURATION_MS, ZOOM_OUT_DURATION_MS};
use crate::campaign::{Campaign, active_campaigns};
use crate::geo::{CameraPosition, NEUTRAL_POSITION};

pub const DEFAULT_CYCLE_MS: f64 = 14_000.0;
pub const DEFAULT_INITIAL_DELAY_MS: f64 = 800.0;
pub const DEFAULT_SWAP_MS: f64 = 2_500.0;
pub const DEFAULT_FOCUS_MS: f64 = 4_000.0;

/// Offsets within one cycle, measured from cycle start.
///
/// `highlight_off_ms` and `reveal_ms` are tied to the camera durations: the
/// glow turns off when the zoom-out lands, and the UI is revealed when the
/// zoom-in lands. Changing a camera duration moves these offsets with it.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct CycleTiming {
    pub cycle_ms: f64,
    pub initial_delay_ms: f64,
    pub highlight_off_ms: f64,
    pub swap_ms: f64,
    pub focus_ms: f64,
    pub reveal_ms: f64,
}

impl Default for CycleTiming {
    fn default() -> Self {
        Self {
            cycle_ms: DEFAULT_CYCLE_MS,
            initial_delay_ms: DEFAULT_INITIAL_DELAY_MS,
            highlight_off_ms: ZOOM_OUT_DURATION_MS,
            swap_ms: DEFAULT_SWAP_MS,
            focus_ms: DEFAULT_FOCUS_MS,
            reveal_ms: DEFAULT_FOCUS_MS + ZOOM_IN_DURATION_MS,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Error)]
pub enum TimingError {
    #[error("cycle length must be positive, got {0}ms")]
    NonPositiveCycle(f64),
    #[error("cycle offsets must be increasing and inside the cycle")]
    UnorderedOffsets,
    #[error("initial positioning ({0}ms) does not finish before the first cycle")]
    BootOverrunsCycle(f64),
}

impl CycleTiming {
    pub fn validate(&self) -> Result<(), TimingError> {
        if !self.cycle_ms.is_finite() || self.cycle_ms <= 0.0 {
            return Err(TimingError::NonPositiveCycle(self.cycle_ms));
        }
        let offsets = [
            0.0,
            self.highlight_off_ms,
            self.swap_ms,
            self.focus_ms,
            self.reveal_ms,
        ];
        let ordered = offsets.windows(2).all(|w| w[0] <= w[1]);
        if !ordered || !offsets.iter().all(|o| o.is_finite()) || self.reveal_ms >= self.cycle_ms {
            return Err(TimingError::UnorderedOffsets);
        }
        let boot_done = self.initial_delay_ms + ZOOM_IN_DURATION_MS;
        if !(0.0..=self.cycle_ms).contains(&boot_done) {
            return Err(TimingError::BootOverrunsCycle(boot_done));
        }
        Ok(())
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum CycleStep {
    Hide,
    HighlightOff,
    Swap,
    Focus,
    Reveal,
}

const STEPS: [CycleStep; 5] = [
    CycleStep::Hide,
    CycleStep::HighlightOff,
    CycleStep::Swap,
    CycleStep::Focus,
    CycleStep::Reveal,
];

impl CycleStep {
    fn offset(self, timing: &CycleTiming) -> f64 {
        match self {
            Self::Hide => 0.0,
            Self::HighlightOff => timing.highlight_off_ms,
            Self::Swap => timing.swap_ms,
            Self::Focus => timing.focus_ms,
            Self::Reveal => timing.reveal_ms,
        }
    }
}

/// Coarse name for where the machine currently is.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Phase {
    /// Not mounted.
    Idle,
    /// Mounted with nothing to show.
    Suspended,
    /// First load: waiting for, or running, the initial positioning.
    Booting,
    Hiding,
    Neutral,
    Swapped,
    Focusing,
    Focused,
}

#[derive(Debug, Clone, Copy, PartialEq)]
enum Mode {
    Idle,
    Suspended,
    Booting {
        started_ms: f64,
        positioned: bool,
    },
    Cycling {
        /// Wall-clock start of the cycle in progress.
        cycle_start_ms: f64,
        cycle: u64,
        next_step: usize,
    },
}

/// Everything downstream renderers read.
#[derive(Debug, Clone, PartialEq)]
pub struct PhaseSnapshot {
    pub phase: Phase,
    pub ui_visible: bool,
    pub highlight_active: bool,
    pub active_index: usize,
    pub camera_target: CameraPosition,
}

#[derive(Debug, Clone, PartialEq)]
pub enum SequencerEvent {
    CycleStarted(u64),
    UiVisible(bool),
    HighlightActive(bool),
    ActiveIndex(usize),
    /// A new list snapshot took effect.
    ListSwapped { len: usize },
    CameraTarget(CameraPosition),
    Suspended,
    Resumed,
}

#[derive(Debug, Clone)]
pub struct Sequencer {
    timing: CycleTiming,
    campaigns: Vec<Campaign>,
    pending: Option<Vec<Campaign>>,
    active_index: usize,
    ui_visible: bool,
    highlight_active: bool,
    camera_target: CameraPosition,
    mode: Mode,
}

impl Default for Sequencer {
    fn default() -> Self {
        Self::with_valid_timing(CycleTiming::default())
    }
}

impl Sequencer {
    pub fn new(timing: CycleTiming) -> Result<Self, TimingError> {
        timing.validate()?;
        Ok(Self::with_valid_timing(timing))
    }

    fn with_valid_timing(timing: CycleTiming) -> Self {
        Self {
            timing,
            campaigns: Vec::new(),
            pending: None,
            active_index: 0,
            ui_visible: true,
            highlight_active: true,
            camera_target: NEUTRAL_POSITION,
            mode: Mode::Idle,
        }
    }

    pub const fn timing(&self) -> &CycleTiming {
        &self.timing
    }

    pub fn campaigns(&self) -> &[Campaign] {
        &self.campaigns
    }

    pub fn has_pending_list(&self) -> bool {
        self.pending.is_some()
    }

    pub const fn active_index(&self) -> usize {
        self.active_index
    }

    /// Campaign on display. Index is clamped so a shrunken snapshot can never
    /// be indexed out of bounds.
    pub fn current(&self) -> Option<&Campaign> {
        let last = self.campaigns.len().checked_sub(1)?;
        self.campaigns.get(self.active_index.min(last))
    }

    pub fn snapshot(&self) -> PhaseSnapshot {
        PhaseSnapshot {
            phase: self.phase(),
            ui_visible: self.ui_visible,
            highlight_active: self.highlight_active,
            active_index: self.active_index,
            camera_target: self.camera_target,
        }
    }

    pub fn phase(&self) -> Phase {
        match self.mode {
            Mode::Idle => Phase::Idle,
            Mode::Suspended => Phase::Suspended,
            Mode::Booting { .. } => Phase::Booting,
            Mode::Cycling { next_step, .. } => match next_step {
                0 | 5 => Phase::Focused,
                1 => Phase::Hiding,
                2 => Phase::Neutral,
                3 => Phase::Swapped,
                _ => Phase::Focusing,
            },
        }
    }

    /// Cycles started since mount; boot counts as 0.
    pub fn cycle_number(&self) -> u64 {
        match self.mode {
            Mode::Cycling { cycle, .. } => cycle.saturating_add(1),
            _ => 0,
        }
    }

    /// Fraction of the current cycle (or boot period) elapsed, for the
    /// progress bar.
    pub fn cycle_progress(&self, now_ms: f64) -> f64 {
        let start = match self.mode {
            Mode::Booting { started_ms, .. } => started_ms,
            Mode::Cycling { cycle_start_ms, .. } => cycle_start_ms,
            Mode::Idle | Mode::Suspended => return 0.0,
        };
        ((now_ms - start) / self.timing.cycle_ms).clamp(0.0, 1.0)
    }

    /// Start from a fresh `(visible, highlighted, 0)` phase.
    pub fn start(&mut self, now_ms: f64) -> Vec<SequencerEvent> {
        let mut events = Vec::new();
        if let Some(next) = self.pending.take() {
            self.campaigns = next;
        }
        self.active_index = 0;
        self.camera_target = NEUTRAL_POSITION;
        if self.campaigns.is_empty() {
            self.suspend(&mut events);
            return events;
        }
        self.set_ui_visible(true, &mut events);
        self.set_highlight(true, &mut events);
        events.push(SequencerEvent::ActiveIndex(0));
        self.mode = Mode::Booting {
            started_ms: now_ms,
            positioned: false,
        };
        tracing::debug!(campaigns = self.campaigns.len(), "sequencer booting");
        events
    }

    pub fn stop(&mut self) {
        self.mode = Mode::Idle;
    }

    /// Offer a new list from the data source. While a cycle is running the
    /// list is held back and swapped in at the next swap step, inside the
    /// blind spot.
    pub fn set_campaigns(&mut self, list: &[Campaign], now_ms: f64) -> Vec<SequencerEvent> {
        let next = active_campaigns(list);
        match self.mode {
            Mode::Idle => {
                self.campaigns = next;
                self.pending = None;
                self.active_index = 0;
                Vec::new()
            }
            Mode::Suspended => {
                self.campaigns = next;
                self.pending = None;
                if self.campaigns.is_empty() {
                    return Vec::new();
                }
                let mut events = vec![SequencerEvent::Resumed];
                events.extend(self.start(now_ms));
                events
            }
            Mode::Booting { .. } | Mode::Cycling { .. } => {
                self.pending = (next != self.campaigns).then_some(next);
                Vec::new()
            }
        }
    }

    /// Apply every step due at `now_ms`, in order.
    pub fn tick(&mut self, now_ms: f64) -> Vec<SequencerEvent> {
        let mut events = Vec::new();
        if !now_ms.is_finite() {
            return events;
        }
        if let Mode::Booting {
            started_ms,
            positioned,
        } = self.mode
        {
            if !positioned && now_ms >= started_ms + self.timing.initial_delay_ms {
                if let Some(focus) = self.current().map(Campaign::focus) {
                    self.camera_target = focus;
                    events.push(SequencerEvent::CameraTarget(focus));
                }
                self.mode = Mode::Booting {
                    started_ms,
                    positioned: true,
                };
            }
            let anchor = started_ms + self.timing.cycle_ms;
            if now_ms >= anchor {
                self.mode = Mode::Cycling {
                    cycle_start_ms: anchor,
                    cycle: 0,
                    next_step: 0,
                };
            }
        }
        self.run_due_steps(now_ms, &mut events);
        events
    }

    fn run_due_steps(&mut self, now_ms: f64, events: &mut Vec<SequencerEvent>) {
        loop {
            let Mode::Cycling {
                cycle_start_ms: cycle_start,
                cycle,
                next_step,
            } = self.mode
            else {
                return;
            };

            if next_step == STEPS.len() {
                let next_start = cycle_start + self.timing.cycle_ms;
                if now_ms < next_start {
                    return;
                }
                // Whole cycles missed while the host was asleep collapse into
                // their net effect instead of replaying every step.
                let missed_ms = ((now_ms - next_start) / self.timing.cycle_ms).floor();
                let missed = missed_ms as u64;
                let start = next_start + missed_ms * self.timing.cycle_ms;
                // Past this magnitude adding a cycle no longer moves the clock.
                if start <= cycle_start {
                    tracing::warn!(now_ms, "clock too far ahead to schedule another cycle");
                    return;
                }
                if missed > 0 {
                    self.skip_cycles(missed, events);
                    if !matches!(self.mode, Mode::Cycling { .. }) {
                        return;
                    }
                }
                self.mode = Mode::Cycling {
                    cycle_start_ms: start,
                    cycle: cycle.saturating_add(1).saturating_add(missed),
                    next_step: 0,
                };
                continue;
            }

            let step = STEPS[next_step];
            if now_ms < cycle_start + step.offset(&self.timing) {
                return;
            }
            self.mode = Mode::Cycling {
                cycle_start_ms: cycle_start,
                cycle,
                next_step: next_step + 1,
            };
            self.apply(step, cycle, events);
        }
    }

    fn apply(&mut self, step: CycleStep, cycle: u64, events: &mut Vec<SequencerEvent>) {
        match step {
            CycleStep::Hide => {
                events.push(SequencerEvent::CycleStarted(cycle.saturating_add(1)));
                self.set_ui_visible(false, events);
                self.camera_target = NEUTRAL_POSITION;
                events.push(SequencerEvent::CameraTarget(NEUTRAL_POSITION));
            }
            CycleStep::HighlightOff => self.set_highlight(false, events),
            CycleStep::Swap => self.swap(1, events),
            CycleStep::Focus => {
                if let Some(focus) = self.current().map(Campaign::focus) {
                    self.set_highlight(true, events);
                    self.camera_target = focus;
                    events.push(SequencerEvent::CameraTarget(focus));
                }
            }
            CycleStep::Reveal => self.set_ui_visible(true, events),
        }
    }

    /// Integrate a pending list, then move `steps` places forward.
    fn swap(&mut self, steps: u64, events: &mut Vec<SequencerEvent>) {
        if let Some(next) = self.pending.take() {
            self.integrate(next, events);
        }
        let len = self.campaigns.len();
        if len == 0 {
            self.suspend(events);
            return;
        }
        // A single campaign keeps its cosmetic cycle; there is nothing to
        // advance to.
        if len == 1 {
            return;
        }
        let before = self.active_index;
        let steps = (steps % len as u64) as usize;
        self.active_index = (self.active_index.min(len - 1) + steps) % len;
        if self.active_index != before {
            events.push(SequencerEvent::ActiveIndex(self.active_index));
        }
    }

    /// Adopt `next` while keeping the rotation's place: continue after the
    /// campaign on screen if it survived, otherwise resume at the slot it
    /// occupied.
    fn integrate(&mut self, next: Vec<Campaign>, events: &mut Vec<SequencerEvent>) {
        let current_id = self.current().map(|c| c.id.clone());
        let old_index = self.active_index;
        self.campaigns = next;
        let len = self.campaigns.len();
        events.push(SequencerEvent::ListSwapped { len });
        tracing::debug!(len, "campaign list swapped in");
        if len == 0 {
            self.active_index = 0;
            return;
        }
        let survivor = current_id.and_then(|id| self.campaigns.iter().position(|c| c.id == id));
        self.active_index = match survivor {
            Some(pos) => pos,
            None => (old_index.min(len - 1) + len - 1) % len,
        };
    }

    fn skip_cycles(&mut self, missed: u64, events: &mut Vec<SequencerEvent>) {
        tracing::debug!(missed, "sequencer fell behind; skipping whole cycles");
        self.swap(missed, events);
        if !matches!(self.mode, Mode::Cycling { .. }) {
            return;
        }
        if let Some(focus) = self.current().map(Campaign::focus) {
            self.camera_target = focus;
            events.push(SequencerEvent::CameraTarget(focus));
        }
        self.set_highlight(true, events);
        self.set_ui_visible(true, events);
    }

    fn suspend(&mut self, events: &mut Vec<SequencerEvent>) {
        self.mode = Mode::Suspended;
        self.active_index = 0;
        self.set_ui_visible(false, events);
        self.set_highlight(false, events);
        self.camera_target = NEUTRAL_POSITION;
        events.push(SequencerEvent::CameraTarget(NEUTRAL_POSITION));
        events.push(SequencerEvent::Suspended);
        tracing::debug!("no active campaigns; sequencer suspended");
    }

    fn set_ui_visible(&mut self, visible: bool, events: &mut Vec<SequencerEvent>) {
        if self.ui_visible != visible {
            self.ui_visible = visible;
            events.push(SequencerEvent::UiVisible(visible));
        }
    }

    fn set_highlight(&mut self, active: bool, events: &mut Vec<SequencerEvent>) {
        if self.highlight_active != active {
            self.highlight_active = active;
            events.push(SequencerEvent::HighlightActive(active));
        }
    }
}

#[cfg(test)]
mod tests {
    use super::{CycleTiming, Phase, Sequencer, SequencerEvent, TimingError};
    use crate::campaign::Campaign;
    use crate::campaign::tests::campaign;
    use crate::geo::NEUTRAL_POSITION;

    const CYCLE: f64 = 14_000.0;
    /// First periodic cycle starts one full cycle after mount.
    const ANCHOR: f64 = CYCLE;

    fn abc() -> Vec<Campaign> {
        vec![
            campaign("a", "São Paulo", -48.5, -22.2, 4.5),
            campaign("b", "Bahia", -41.7, -12.5, 3.0),
            campaign("c", "Distrito Federal", -47.8, -15.8, 12.0),
        ]
    }

    fn mounted(list: &[Campaign]) -> Sequencer {
        let mut seq = Sequencer::default();
        seq.set_campaigns(list, 0.0);
        seq.start(0.0);
        seq
    }

    /// Tick every 100ms from `from` up to and including `to`.
    fn run(seq: &mut Sequencer, from: f64, to: f64) -> Vec<SequencerEvent> {
        let mut events = Vec::new();
        let mut t = from;
        while t <= to {
            events.extend(seq.tick(t));
            t += 100.0;
        }
        events
    }

    #[test]
    fn default_timing_is_valid_and_matches_camera_durations() {
        let timing = CycleTiming::default();
        assert!(timing.validate().is_ok());
        assert_eq!(timing.highlight_off_ms, 1_500.0);
        assert_eq!(timing.reveal_ms, 8_000.0);
    }

    #[test]
    fn invalid_timings_are_rejected() {
        let reversed = CycleTiming {
            swap_ms: 5_000.0,
            focus_ms: 4_000.0,
            ..CycleTiming::default()
        };
        assert_eq!(reversed.validate(), Err(TimingError::UnorderedOffsets));
        let zero = CycleTiming {
            cycle_ms: 0.0,
            ..CycleTiming::default()
        };
        assert!(Sequencer::new(zero).is_err());
        let short = CycleTiming {
            cycle_ms: 8_500.0,
            initial_delay_ms: 5_000.0,
            ..CycleTiming::default()
        };
        assert!(matches!(
            short.validate(),
            Err(TimingError::BootOverrunsCycle(_))
        ));
    }

    #[test]
    fn boot_focuses_the_first_campaign_without_zooming_out() {
        let mut seq = mounted(&abc());
        assert_eq!(seq.phase(), Phase::Booting);
        assert!(seq.tick(799.0).is_empty());

        let events = seq.tick(800.0);
        assert_eq!(
            events,
            vec![SequencerEvent::CameraTarget(abc()[0].focus())]
        );
        let snap = seq.snapshot();
        assert!(snap.ui_visible);
        assert!(snap.highlight_active);
        assert_eq!(snap.active_index, 0);
        // Nothing else happens until the first cycle.
        assert!(run(&mut seq, 900.0, ANCHOR - 1.0).is_empty());
    }

    #[test]
    fn phases_fire_at_their_offsets() {
        let mut seq = mounted(&abc());
        run(&mut seq, 0.0, ANCHOR - 100.0);

        let at = |seq: &mut Sequencer, t: f64| seq.tick(ANCHOR + t);
        assert_eq!(
            at(&mut seq, 0.0),
            vec![
                SequencerEvent::CycleStarted(1),
                SequencerEvent::UiVisible(false),
                SequencerEvent::CameraTarget(NEUTRAL_POSITION),
            ]
        );
        assert_eq!(seq.phase(), Phase::Hiding);
        assert!(at(&mut seq, 1_499.0).is_empty());
        assert_eq!(
            at(&mut seq, 1_500.0),
            vec![SequencerEvent::HighlightActive(false)]
        );
        assert_eq!(seq.phase(), Phase::Neutral);
        assert_eq!(
            at(&mut seq, 2_500.0),
            vec![SequencerEvent::ActiveIndex(1)]
        );
        assert_eq!(seq.phase(), Phase::Swapped);
        assert_eq!(
            at(&mut seq, 4_000.0),
            vec![
                SequencerEvent::HighlightActive(true),
                SequencerEvent::CameraTarget(abc()[1].focus()),
            ]
        );
        assert_eq!(seq.phase(), Phase::Focusing);
        assert_eq!(at(&mut seq, 8_000.0), vec![SequencerEvent::UiVisible(true)]);
        assert_eq!(seq.phase(), Phase::Focused);
        assert!(at(&mut seq, 13_999.0).is_empty());
        assert_eq!(at(&mut seq, 14_000.0)[0], SequencerEvent::CycleStarted(2));
    }

    #[test]
    fn second_cycle_swap_shows_b_while_hidden() {
        let mut seq = mounted(&abc());
        run(&mut seq, 0.0, ANCHOR + 2_500.0);
        let snap = seq.snapshot();
        assert_eq!(snap.active_index, 1);
        assert_eq!(seq.current().map(|c| c.id.as_str()), Some("b"));
        assert!(!snap.ui_visible);
    }

    #[test]
    fn index_after_n_cycles_wraps_modulo_length() {
        for len in 1..=4 {
            let list: Vec<_> = abc()
                .into_iter()
                .chain([campaign("d", "Acre", -70.5, -9.2, 5.0)])
                .take(len)
                .collect();
            let mut seq = mounted(&list);
            for n in 1..=9u64 {
                // Just before cycle n+1 starts, n swaps have happened.
                let end = ANCHOR + n as f64 * CYCLE - 1.0;
                run(&mut seq, end - 100.0, end);
                assert_eq!(seq.active_index(), (n % len as u64) as usize, "len {len}, n {n}");
            }
        }
    }

    #[test]
    fn single_campaign_keeps_cosmetic_cycle_without_index_change() {
        let one = vec![campaign("solo", "Pará", -52.5, -4.0, 2.3)];
        let mut seq = mounted(&one);
        let events = run(&mut seq, 0.0, ANCHOR + 3.0 * CYCLE - 100.0);
        assert!(
            !events
                .iter()
                .any(|e| matches!(e, SequencerEvent::ActiveIndex(i) if *i != 0))
        );
        let hides = events
            .iter()
            .filter(|e| **e == SequencerEvent::UiVisible(false))
            .count();
        let reveals = events
            .iter()
            .filter(|e| **e == SequencerEvent::UiVisible(true))
            .count();
        let glows_off = events
            .iter()
            .filter(|e| **e == SequencerEvent::HighlightActive(false))
            .count();
        assert_eq!(hides, 3);
        assert_eq!(reveals, 3);
        assert_eq!(glows_off, 3);
    }

    #[test]
    fn empty_list_suspends_without_retriggering() {
        let mut seq = mounted(&[]);
        assert_eq!(seq.phase(), Phase::Suspended);
        assert!(!seq.snapshot().ui_visible);
        assert!(run(&mut seq, 0.0, 5.0 * CYCLE).is_empty());
    }

    #[test]
    fn all_inactive_is_treated_as_empty() {
        let mut list = abc();
        for c in &mut list {
            c.active = false;
        }
        let seq = mounted(&list);
        assert_eq!(seq.phase(), Phase::Suspended);
        assert!(seq.current().is_none());
    }

    #[test]
    fn suspended_sequencer_resumes_with_a_fresh_boot() {
        let mut seq = mounted(&[]);
        run(&mut seq, 0.0, 3_000.0);
        let events = seq.set_campaigns(&abc(), 3_000.0);
        assert_eq!(events.first(), Some(&SequencerEvent::Resumed));
        assert_eq!(seq.phase(), Phase::Booting);
        assert!(seq.snapshot().ui_visible);
        let events = seq.tick(3_800.0);
        assert_eq!(events, vec![SequencerEvent::CameraTarget(abc()[0].focus())]);
    }

    #[test]
    fn list_change_mid_cycle_waits_for_the_swap() {
        let mut seq = mounted(&abc());
        run(&mut seq, 0.0, ANCHOR + 1_000.0);
        assert_eq!(seq.active_index(), 0);

        let mut updated = abc();
        updated.insert(1, campaign("new", "Ceará", -39.5, -5.2, 5.5));
        assert!(seq.set_campaigns(&updated, ANCHOR + 1_000.0).is_empty());
        assert!(seq.has_pending_list());
        assert_eq!(seq.campaigns().len(), 3);

        let events = run(&mut seq, ANCHOR + 1_100.0, ANCHOR + 2_500.0);
        assert!(events.contains(&SequencerEvent::ListSwapped { len: 4 }));
        assert_eq!(seq.current().map(|c| c.id.as_str()), Some("new"));
        assert!(!seq.has_pending_list());
    }

    #[test]
    fn removing_the_current_campaign_resumes_at_its_slot() {
        let mut seq = mounted(&abc());
        // Cycle 1 moves to "b".
        run(&mut seq, 0.0, ANCHOR + CYCLE - 100.0);
        assert_eq!(seq.current().map(|c| c.id.as_str()), Some("b"));

        let without_b: Vec<_> = abc().into_iter().filter(|c| c.id != "b").collect();
        seq.set_campaigns(&without_b, ANCHOR + CYCLE - 50.0);
        run(&mut seq, ANCHOR + CYCLE, ANCHOR + CYCLE + 2_500.0);
        // "c" slid into b's slot and is shown next.
        assert_eq!(seq.current().map(|c| c.id.as_str()), Some("c"));
    }

    #[test]
    fn shrinking_to_empty_suspends_at_the_swap() {
        let mut seq = mounted(&abc());
        run(&mut seq, 0.0, ANCHOR + 500.0);
        seq.set_campaigns(&[], ANCHOR + 500.0);
        assert_eq!(seq.phase(), Phase::Hiding);
        let events = run(&mut seq, ANCHOR + 600.0, ANCHOR + 3_000.0);
        assert!(events.contains(&SequencerEvent::Suspended));
        assert_eq!(seq.phase(), Phase::Suspended);
        assert!(run(&mut seq, ANCHOR + 3_100.0, ANCHOR + 4.0 * CYCLE).is_empty());
    }

    #[test]
    fn identical_list_is_not_queued() {
        let mut seq = mounted(&abc());
        run(&mut seq, 0.0, ANCHOR);
        seq.set_campaigns(&abc(), ANCHOR);
        assert!(!seq.has_pending_list());
    }

    #[test]
    fn delayed_tick_applies_missed_steps_in_order() {
        let mut seq = mounted(&abc());
        run(&mut seq, 0.0, ANCHOR - 100.0);
        // Host stalls for 5 seconds into the cycle.
        let events = seq.tick(ANCHOR + 5_000.0);
        assert_eq!(
            events,
            vec![
                SequencerEvent::CycleStarted(1),
                SequencerEvent::UiVisible(false),
                SequencerEvent::CameraTarget(NEUTRAL_POSITION),
                SequencerEvent::HighlightActive(false),
                SequencerEvent::ActiveIndex(1),
                SequencerEvent::HighlightActive(true),
                SequencerEvent::CameraTarget(abc()[1].focus()),
            ]
        );
        assert!(!seq.snapshot().ui_visible);
    }

    #[test]
    fn long_stall_skips_whole_cycles_but_keeps_the_count() {
        let mut seq = mounted(&abc());
        run(&mut seq, 0.0, ANCHOR + CYCLE - 100.0);
        assert_eq!(seq.active_index(), 1);
        // Sleep through cycles 2, 3 and 4; wake 1s into cycle 5.
        seq.tick(ANCHOR + 4.0 * CYCLE + 1_000.0);
        assert_eq!(seq.cycle_number(), 5);
        // Cycles 2..=4 advanced three times: 1 + 3 = 4 -> 1 (mod 3).
        assert_eq!(seq.active_index(), 1);
        run(&mut seq, ANCHOR + 4.0 * CYCLE + 1_100.0, ANCHOR + 5.0 * CYCLE - 1.0);
        assert_eq!(seq.active_index(), 2);
        assert!(seq.snapshot().ui_visible);
    }

    #[test]
    fn progress_tracks_the_cycle_clock() {
        let mut seq = mounted(&abc());
        assert_eq!(seq.cycle_progress(7_000.0), 0.5);
        run(&mut seq, 0.0, ANCHOR + 3_500.0);
        assert_eq!(seq.cycle_progress(ANCHOR + 3_500.0), 0.25);
        assert_eq!(seq.cycle_number(), 1);
    }

    #[test]
    fn stopped_sequencer_ignores_ticks() {
        let mut seq = mounted(&abc());
        run(&mut seq, 0.0, ANCHOR + 100.0);
        seq.stop();
        assert_eq!(seq.phase(), Phase::Idle);
        assert!(run(&mut seq, ANCHOR + 200.0, ANCHOR + 3.0 * CYCLE).is_empty());
    }

    #[test]
    fn absurd_clock_jump_neither_panics_nor_spins() {
        let list = vec![abc()[0].clone(), abc()[1].clone()];
        let mut seq = mounted(&list);
        run(&mut seq, 0.0, ANCHOR + 2.0 * CYCLE);
        let before = seq.cycle_number();

        let events = seq.tick(1e300);
        assert!(seq.active_index() < list.len());
        assert!(seq.cycle_number() > before);
        assert!(events.contains(&SequencerEvent::UiVisible(true)));

        // The clock cannot advance at this magnitude; further ticks settle.
        seq.tick(1e300);
        assert!(seq.tick(1e300).is_empty());
        assert!(seq.current().is_some());
    }
}
