use std::cell::RefCell;

use leptos::prelude::*;
use wasm_bindgen::JsCast;
use wasm_bindgen::prelude::*;

use vitrine_shared::MapFrame;

use crate::app::{GeometryReady, RegionStore};
use crate::driver::{STAGE_ID, StageSignals};

const REGION_STYLE: &str = "fill:#1b2430;stroke:#3a4756;stroke-width:0.6;vector-effect:non-scaling-stroke;transition:fill 600ms ease-in-out;";
const REGION_HIGHLIGHT_STYLE: &str = "fill:#3ecf8e;stroke:#b8f5d9;stroke-width:1.2;vector-effect:non-scaling-stroke;transition:fill 600ms ease-in-out;filter:drop-shadow(0 0 6px rgba(62,207,142,0.7));";

struct ResizeBinding {
    window: web_sys::Window,
    handler: Closure<dyn Fn()>,
}

thread_local! {
    static RESIZE_BINDING: RefCell<Option<ResizeBinding>> = const { RefCell::new(None) };
}

pub(crate) fn viewport_size() -> (f64, f64) {
    let Some(window) = web_sys::window() else {
        return (1280.0, 720.0);
    };
    let w = window
        .inner_width()
        .ok()
        .and_then(|v| v.as_f64())
        .unwrap_or(1280.0);
    let h = window
        .inner_height()
        .ok()
        .and_then(|v| v.as_f64())
        .unwrap_or(720.0);
    (w, h)
}

/// Uniform scale that fits the fixed drawing frame inside the window.
pub fn fit_scale(width: f64, height: f64, frame: MapFrame) -> f64 {
    let scale = (width / frame.width).min(height / frame.height);
    if scale.is_finite() && scale > 0.0 {
        scale
    } else {
        1.0
    }
}

pub fn region_style(highlighted: bool) -> &'static str {
    if highlighted {
        REGION_HIGHLIGHT_STYLE
    } else {
        REGION_STYLE
    }
}

fn unbind_resize() {
    RESIZE_BINDING.with(|slot| {
        if let Some(old) = slot.borrow_mut().take() {
            let _ = old
                .window
                .remove_event_listener_with_callback("resize", old.handler.as_ref().unchecked_ref());
        }
    });
}

/// The static map: region paths projected once, wrapped in a stage element
/// whose `transform` the frame loop rewrites.
#[component]
pub fn MapView() -> impl IntoView {
    let RegionStore(regions) = expect_context::<RegionStore>();
    let GeometryReady(ready) = expect_context::<GeometryReady>();
    let stage = expect_context::<StageSignals>();
    let frame = MapFrame::default();

    let (w, h) = viewport_size();
    let scale = RwSignal::new(fit_scale(w, h, frame));

    Effect::new(move || {
        let Some(window) = web_sys::window() else {
            return;
        };
        unbind_resize();
        let handler = Closure::<dyn Fn()>::new(move || {
            let (w, h) = viewport_size();
            scale.set(fit_scale(w, h, frame));
        });
        if window
            .add_event_listener_with_callback("resize", handler.as_ref().unchecked_ref())
            .is_err()
        {
            return;
        }
        RESIZE_BINDING.with(|slot| {
            *slot.borrow_mut() = Some(ResizeBinding { window, handler });
        });
        on_cleanup(unbind_resize);
    });

    // Only the region name is tracked, so a swap that keeps the region does
    // not touch any path.
    let highlighted = Memo::new(move |_| {
        if !stage.highlight_active.get() {
            return None;
        }
        stage
            .current
            .with(|current| current.as_ref().map(|c| c.region.clone()))
    });

    let view_box = format!("0 0 {} {}", frame.width, frame.height);
    let (frame_w, frame_h) = (frame.width, frame.height);

    view! {
        <div style="position:absolute;inset:0;display:flex;align-items:center;justify-content:center;overflow:hidden;background:radial-gradient(circle at 50% 45%, #111a24 0%, #06090d 75%);">
            <div style=move || format!(
                "flex:none;width:{frame_w}px;height:{frame_h}px;transform:scale({:.4});transform-origin:center;",
                scale.get()
            )>
                <div
                    id=STAGE_ID
                    style="width:100%;height:100%;transform-origin:0 0;will-change:transform;"
                >
                    <svg
                        viewBox=view_box
                        width=frame_w
                        height=frame_h
                        style="display:block;overflow:visible;"
                    >
                        {move || {
                            if !ready.get() {
                                return Vec::new();
                            }
                            regions
                                .with_value(|shapes| {
                                    shapes
                                        .iter()
                                        .map(|shape| {
                                            let name = shape.name.clone();
                                            view! {
                                                <path
                                                    d=shape.path.clone()
                                                    data-region=shape.name.clone()
                                                    style=move || region_style(
                                                        highlighted.with(|h| h.as_deref() == Some(name.as_str())),
                                                    )
                                                />
                                            }
                                        })
                                        .collect::<Vec<_>>()
                                })
                        }}
                    </svg>
                </div>
            </div>
        </div>
    }
}
