//! Sequencer, camera and impact counter wired together behind one
//! mount/unmount lifecycle.
//!
//! The host owns two loops: a coarse interval that calls [`Showcase::tick`]
//! and a per-frame callback that calls [`Showcase::sample`]. Both carry a
//! [`TimerTicket`] taken at mount, so anything still queued after
//! [`Showcase::unmount`] falls through without touching state.

use crate::camera::{CameraCommand, CameraError, CameraInterpolator, ViewTransform};
use crate::campaign::Campaign;
use crate::countup::CountUp;
use crate::projection::MapFrame;
use crate::sequencer::{CycleTiming, Phase, PhaseSnapshot, Sequencer, SequencerEvent, TimingError};
use crate::timers::{TimerGroup, TimerTicket};

#[derive(Debug, Clone, PartialEq)]
pub struct TickOutput {
    pub events: Vec<SequencerEvent>,
    pub camera: Vec<CameraCommand>,
    /// Camera targets that could not be applied. The cycle carries on with
    /// the previous transform.
    pub warnings: Vec<CameraError>,
}

impl TickOutput {
    fn new(events: Vec<SequencerEvent>) -> Self {
        Self {
            events,
            camera: Vec::new(),
            warnings: Vec::new(),
        }
    }

    pub fn is_empty(&self) -> bool {
        self.events.is_empty() && self.camera.is_empty() && self.warnings.is_empty()
    }
}

/// What one animation frame paints.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct FrameSample {
    pub transform: ViewTransform,
    pub impact: u64,
    pub progress: f64,
    /// `false` once both the camera and the counter have settled.
    pub animating: bool,
}

#[derive(Debug, Clone)]
pub struct Showcase {
    sequencer: Sequencer,
    camera: CameraInterpolator,
    impact: CountUp,
    timers: TimerGroup,
    ticket: Option<TimerTicket>,
}

impl Default for Showcase {
    fn default() -> Self {
        Self {
            sequencer: Sequencer::default(),
            camera: CameraInterpolator::brazil(MapFrame::default()),
            impact: CountUp::default(),
            timers: TimerGroup::new(),
            ticket: None,
        }
    }
}

impl Showcase {
    pub fn new(timing: CycleTiming, frame: MapFrame) -> Result<Self, TimingError> {
        Ok(Self {
            sequencer: Sequencer::new(timing)?,
            camera: CameraInterpolator::brazil(frame),
            ..Self::default()
        })
    }

    pub fn sequencer(&self) -> &Sequencer {
        &self.sequencer
    }

    pub fn camera(&self) -> &CameraInterpolator {
        &self.camera
    }

    pub fn is_mounted(&self) -> bool {
        self.ticket.is_some()
    }

    /// Ticket for host callbacks armed during the current mount.
    pub fn ticket(&self) -> Option<TimerTicket> {
        self.ticket
    }

    pub fn phase(&self) -> Phase {
        self.sequencer.phase()
    }

    pub fn snapshot(&self) -> PhaseSnapshot {
        self.sequencer.snapshot()
    }

    pub fn current(&self) -> Option<&Campaign> {
        self.sequencer.current()
    }

    /// Start a fresh cycle. Mounting twice first tears the old mount down so
    /// its callbacks go stale.
    pub fn mount(&mut self, now_ms: f64) -> (TimerTicket, TickOutput) {
        if self.ticket.is_some() {
            self.unmount();
        }
        let ticket = self.timers.arm();
        self.ticket = Some(ticket);
        let events = self.sequencer.start(now_ms);
        let out = self.forward(events, now_ms);
        tracing::debug!(generation = self.timers.generation(), "showcase mounted");
        (ticket, out)
    }

    /// Release everything: pending steps, in-flight camera motion, counter.
    pub fn unmount(&mut self) {
        self.timers.cancel_all();
        self.ticket = None;
        self.sequencer.stop();
        self.camera.cancel();
        tracing::debug!(generation = self.timers.generation(), "showcase unmounted");
    }

    pub fn set_campaigns(&mut self, list: &[Campaign], now_ms: f64) -> Option<TickOutput> {
        let events = self.sequencer.set_campaigns(list, now_ms);
        if self.ticket.is_none() {
            return None;
        }
        Some(self.forward(events, now_ms))
    }

    pub fn tick(&mut self, ticket: TimerTicket, now_ms: f64) -> Option<TickOutput> {
        if !self.accepts(ticket) {
            return None;
        }
        let events = self.sequencer.tick(now_ms);
        Some(self.forward(events, now_ms))
    }

    pub fn sample(&mut self, ticket: TimerTicket, now_ms: f64) -> Option<FrameSample> {
        if !self.accepts(ticket) {
            return None;
        }
        let transform = self.camera.sample(now_ms);
        Some(FrameSample {
            transform,
            impact: self.impact.value_at(now_ms),
            progress: self.sequencer.cycle_progress(now_ms),
            animating: self.camera.is_animating() || self.impact.is_animating(now_ms),
        })
    }

    fn accepts(&self, ticket: TimerTicket) -> bool {
        self.ticket == Some(ticket) && self.timers.is_live(ticket)
    }

    fn forward(&mut self, events: Vec<SequencerEvent>, now_ms: f64) -> TickOutput {
        let mut out = TickOutput::new(events);
        for event in &out.events {
            if let SequencerEvent::CameraTarget(target) = event {
                match self.camera.set_target(*target, now_ms) {
                    Ok(command) => out.camera.push(command),
                    Err(e) => {
                        tracing::warn!(error = %e, "camera target rejected; keeping current view");
                        out.warnings.push(e);
                    }
                }
            }
        }
        // The panel is hidden between swap and reveal; the count runs when it shows.
        if self.sequencer.snapshot().ui_visible {
            let impact = self.sequencer.current().map_or(0, |c| c.impact);
            self.impact.set_target(impact, now_ms);
        }
        out
    }
}
