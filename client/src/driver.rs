//! Host side of the showcase: one coarse interval drives the sequencer and a
//! frame loop paints camera and counter straight into the DOM.
//!
//! Only phase flags go through Leptos signals. The per-frame values (stage
//! transform, displayed impact) are written to element style/text directly so
//! a running animation never causes a reactive re-render.

use std::cell::{Cell, RefCell};
use std::rc::Rc;

use leptos::prelude::*;
use wasm_bindgen::JsCast;
use wasm_bindgen::prelude::*;

use vitrine_shared::timers::TimerTicket;
use vitrine_shared::{Campaign, FrameSample, SequencerEvent, Showcase, TickOutput, format_impact};

use crate::render_loop::FrameLoop;

pub const TICK_INTERVAL_MS: i32 = 100;
pub const STAGE_ID: &str = "vitrine-stage";
pub const IMPACT_ID: &str = "vitrine-impact";

#[derive(Clone, Copy)]
pub struct StageSignals {
    pub ui_visible: RwSignal<bool>,
    pub highlight_active: RwSignal<bool>,
    pub suspended: RwSignal<bool>,
    /// Bumped whenever a cycle (or a fresh boot) starts; the progress bar
    /// restarts on every change.
    pub epoch: RwSignal<u64>,
    pub current: RwSignal<Option<Campaign>>,
}

impl StageSignals {
    pub fn new() -> Self {
        Self {
            ui_visible: RwSignal::new(false),
            highlight_active: RwSignal::new(false),
            suspended: RwSignal::new(false),
            epoch: RwSignal::new(0),
            current: RwSignal::new(None),
        }
    }
}

/// Plain copy of the flags, folded from sequencer events before touching
/// any signal.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct StageFlags {
    pub ui_visible: bool,
    pub highlight_active: bool,
    pub suspended: bool,
    pub epoch: u64,
}

pub fn fold_events(mut flags: StageFlags, events: &[SequencerEvent]) -> StageFlags {
    for event in events {
        match event {
            SequencerEvent::UiVisible(visible) => flags.ui_visible = *visible,
            SequencerEvent::HighlightActive(active) => flags.highlight_active = *active,
            SequencerEvent::CycleStarted(_) => flags.epoch += 1,
            SequencerEvent::Suspended => flags.suspended = true,
            SequencerEvent::Resumed => {
                flags.suspended = false;
                flags.epoch += 1;
            }
            SequencerEvent::ActiveIndex(_)
            | SequencerEvent::ListSwapped { .. }
            | SequencerEvent::CameraTarget(_) => {}
        }
    }
    flags
}

struct Driver {
    window: web_sys::Window,
    interval_id: i32,
    _tick: Closure<dyn Fn()>,
    frames: Rc<FrameLoop>,
    showcase: Rc<RefCell<Showcase>>,
    signals: StageSignals,
}

impl Drop for Driver {
    fn drop(&mut self) {
        self.window.clear_interval_with_handle(self.interval_id);
        self.frames.stop();
        if let Ok(mut showcase) = self.showcase.try_borrow_mut() {
            showcase.unmount();
        }
    }
}

thread_local! {
    static DRIVER: RefCell<Option<Driver>> = const { RefCell::new(None) };
}

fn current_flags(signals: StageSignals) -> StageFlags {
    StageFlags {
        ui_visible: signals.ui_visible.get_untracked(),
        highlight_active: signals.highlight_active.get_untracked(),
        suspended: signals.suspended.get_untracked(),
        epoch: signals.epoch.get_untracked(),
    }
}

fn set_if_changed<T: Clone + PartialEq + Send + Sync + 'static>(signal: RwSignal<T>, value: T) {
    if signal.with_untracked(|v| *v != value) {
        signal.set(value);
    }
}

fn apply(showcase: &Showcase, signals: StageSignals, out: &TickOutput) {
    for warning in &out.warnings {
        web_sys::console::warn_1(&format!("camera: {warning}").into());
    }
    let flags = fold_events(current_flags(signals), &out.events);
    set_if_changed(signals.ui_visible, flags.ui_visible);
    set_if_changed(signals.highlight_active, flags.highlight_active);
    set_if_changed(signals.suspended, flags.suspended);
    set_if_changed(signals.epoch, flags.epoch);
    set_if_changed(signals.current, showcase.current().cloned());
}

fn stage_element(id: &str) -> Option<web_sys::HtmlElement> {
    web_sys::window()?
        .document()?
        .get_element_by_id(id)?
        .dyn_into::<web_sys::HtmlElement>()
        .ok()
}

fn paint(sample: &FrameSample, last_impact: &Cell<Option<u64>>) {
    if let Some(stage) = stage_element(STAGE_ID) {
        let _ = stage
            .style()
            .set_property("transform", &sample.transform.css());
    }
    if last_impact.get() != Some(sample.impact)
        && let Some(counter) = stage_element(IMPACT_ID)
    {
        counter.set_text_content(Some(&format_impact(sample.impact)));
        last_impact.set(Some(sample.impact));
    }
}

fn tick_closure(
    showcase: Rc<RefCell<Showcase>>,
    frames: Rc<FrameLoop>,
    ticket: TimerTicket,
    signals: StageSignals,
) -> Closure<dyn Fn()> {
    Closure::<dyn Fn()>::new(move || {
        let now = js_sys::Date::now();
        let out = {
            let Ok(mut guard) = showcase.try_borrow_mut() else {
                return;
            };
            match guard.tick(ticket, now) {
                Some(out) => out,
                None => return,
            }
        };
        if out.is_empty() {
            return;
        }
        if let Ok(guard) = showcase.try_borrow() {
            apply(&guard, signals, &out);
        }
        frames.wake();
    })
}

/// Mount the showcase and start both loops. Calling it again replaces the
/// previous mount.
pub fn start(signals: StageSignals, campaigns: &[Campaign]) {
    let Some(window) = web_sys::window() else {
        return;
    };
    stop();

    let now = js_sys::Date::now();
    let showcase = Rc::new(RefCell::new(Showcase::default()));
    let (ticket, mounted) = {
        let mut guard = showcase.borrow_mut();
        guard.set_campaigns(campaigns, now);
        guard.mount(now)
    };

    let painter = showcase.clone();
    let last_impact = Cell::new(None);
    let frames = Rc::new(FrameLoop::new(move |now| {
        let Ok(mut guard) = painter.try_borrow_mut() else {
            return true;
        };
        let Some(sample) = guard.sample(ticket, now) else {
            return false;
        };
        paint(&sample, &last_impact);
        sample.animating
    }));

    apply(&showcase.borrow(), signals, &mounted);

    let tick = tick_closure(showcase.clone(), frames.clone(), ticket, signals);
    let Ok(interval_id) = window.set_interval_with_callback_and_timeout_and_arguments_0(
        tick.as_ref().unchecked_ref(),
        TICK_INTERVAL_MS,
    ) else {
        showcase.borrow_mut().unmount();
        return;
    };
    frames.wake();

    DRIVER.with(|slot| {
        *slot.borrow_mut() = Some(Driver {
            window,
            interval_id,
            _tick: tick,
            frames,
            showcase,
            signals,
        });
    });
}

/// Unmount: clears the interval, cancels the pending frame and invalidates
/// the ticket so callbacks already queued by the browser do nothing.
pub fn stop() {
    let old = DRIVER.with(|slot| slot.borrow_mut().take());
    drop(old);
}

/// Hand a new list to the running showcase. It takes effect at the next swap.
pub fn push_campaigns(list: &[Campaign]) {
    DRIVER.with(|slot| {
        let slot = slot.borrow();
        let Some(driver) = slot.as_ref() else {
            return;
        };
        let out = {
            let Ok(mut guard) = driver.showcase.try_borrow_mut() else {
                return;
            };
            guard.set_campaigns(list, js_sys::Date::now())
        };
        let Some(out) = out else {
            return;
        };
        if let Ok(guard) = driver.showcase.try_borrow() {
            apply(&guard, driver.signals, &out);
        }
        driver.frames.wake();
    });
}
