use std::cell::{Cell, RefCell};
use std::rc::Rc;

use wasm_bindgen::prelude::*;

/// Per-frame painter on `requestAnimationFrame`.
///
/// `wake()` requests one frame; repeated wakes before the frame fires
/// coalesce. The paint function gets the wall clock in milliseconds and
/// returns `true` while something is still moving, which keeps the loop
/// running without further wakes. Once it returns `false` the loop idles
/// and costs nothing.
pub struct FrameLoop {
    inner: Rc<Inner>,
}

struct Inner {
    window: Option<web_sys::Window>,
    scheduled: Cell<bool>,
    stopped: Cell<bool>,
    raf_id: Cell<Option<i32>>,
    callback: RefCell<Option<Closure<dyn FnMut()>>>,
}

impl Inner {
    fn request(&self) {
        if self.stopped.get() || self.scheduled.get() {
            return;
        }
        let callback = self.callback.borrow();
        let (Some(window), Some(cb)) = (self.window.as_ref(), callback.as_ref()) else {
            return;
        };
        match window.request_animation_frame(cb.as_ref().unchecked_ref()) {
            Ok(id) => {
                self.scheduled.set(true);
                self.raf_id.set(Some(id));
            }
            Err(_) => self.scheduled.set(false),
        }
    }
}

impl FrameLoop {
    pub fn new(paint: impl Fn(f64) -> bool + 'static) -> Self {
        let inner = Rc::new(Inner {
            window: web_sys::window(),
            scheduled: Cell::new(false),
            stopped: Cell::new(false),
            raf_id: Cell::new(None),
            callback: RefCell::new(None),
        });

        let inner_cb = inner.clone();
        let cb = Closure::<dyn FnMut()>::new(move || {
            inner_cb.scheduled.set(false);
            inner_cb.raf_id.set(None);
            if inner_cb.stopped.get() {
                return;
            }
            if paint(js_sys::Date::now()) {
                inner_cb.request();
            }
        });
        *inner.callback.borrow_mut() = Some(cb);

        Self { inner }
    }

    pub fn wake(&self) {
        self.inner.request();
    }

    /// Cancel the pending frame; later wakes are ignored.
    pub fn stop(&self) {
        self.inner.stopped.set(true);
        if let Some(raf_id) = self.inner.raf_id.replace(None)
            && let Some(window) = self.inner.window.as_ref()
        {
            let _ = window.cancel_animation_frame(raf_id);
        }
        self.inner.scheduled.set(false);
    }
}

impl Drop for FrameLoop {
    fn drop(&mut self) {
        self.stop();
        // Break the callback->inner reference cycle on teardown.
        self.inner.callback.borrow_mut().take();
    }
}
