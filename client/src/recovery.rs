use std::cell::RefCell;

use gloo_timers::callback::Timeout;
use leptos::prelude::*;
use wasm_bindgen::JsCast;

pub const RELOAD_DELAY_MS: u32 = 5_000;

const OVERLAY_ID: &str = "vitrine-recovery";

const OVERLAY_STYLE: &str = "position:fixed;inset:0;z-index:9999;display:flex;flex-direction:column;align-items:center;justify-content:center;gap:18px;background:#0b0f14;color:#e6e9ef;font-family:system-ui,sans-serif;";
const BUTTON_STYLE: &str = "padding:10px 22px;border-radius:6px;border:1px solid #3ecf8e;background:transparent;color:#3ecf8e;font-size:1rem;cursor:pointer;";

thread_local! {
    static PENDING_RELOAD: RefCell<Option<Timeout>> = const { RefCell::new(None) };
}

pub fn recovery_message(delay_ms: u32) -> String {
    format!(
        "Algo deu errado. Reiniciando em {} s.",
        delay_ms.div_ceil(1_000)
    )
}

fn reload() {
    if let Some(window) = web_sys::window() {
        let _ = window.location().reload();
    }
}

/// Install a panic hook that logs to the console, paints a plain DOM notice
/// and reloads the page. The reactive runtime may be poisoned by then, so
/// nothing here goes through Leptos.
pub fn install_panic_hook() {
    std::panic::set_hook(Box::new(|info| {
        console_error_panic_hook::hook(info);
        show_overlay();
        schedule_raw_reload();
    }));
}

fn show_overlay() {
    let Some(document) = web_sys::window().and_then(|w| w.document()) else {
        return;
    };
    if document.get_element_by_id(OVERLAY_ID).is_some() {
        return;
    }
    let Some(body) = document.body() else {
        return;
    };
    let Ok(overlay) = document.create_element("div") else {
        return;
    };
    overlay.set_id(OVERLAY_ID);
    let _ = overlay.set_attribute("style", OVERLAY_STYLE);
    overlay.set_inner_html(&format!(
        r#"<p style="font-size:1.2rem;margin:0;">{}</p><button style="{BUTTON_STYLE}" onclick="location.reload()">Reiniciar agora</button>"#,
        recovery_message(RELOAD_DELAY_MS)
    ));
    let _ = body.append_child(&overlay);
}

fn schedule_raw_reload() {
    let Some(window) = web_sys::window() else {
        return;
    };
    // A plain JS function keeps working even if the wasm instance has aborted.
    let reload = js_sys::Function::new_no_args("location.reload()");
    let _ = window.set_timeout_with_callback_and_timeout_and_arguments_0(
        reload.unchecked_ref(),
        RELOAD_DELAY_MS as i32,
    );
}

/// Fallback for the outer error boundary.
#[component]
pub fn RecoveryNotice() -> impl IntoView {
    Effect::new(move || {
        PENDING_RELOAD.with(|slot| {
            let mut slot = slot.borrow_mut();
            // Dropping a previous timeout cancels it.
            *slot = Some(Timeout::new(RELOAD_DELAY_MS, reload));
        });
        web_sys::console::warn_1(&"render failed; scheduling reload".into());
        on_cleanup(|| {
            PENDING_RELOAD.with(|slot| {
                if let Some(timeout) = slot.borrow_mut().take() {
                    let _ = timeout.cancel();
                }
            });
        });
    });

    view! {
        <div style=OVERLAY_STYLE>
            <p style="font-size:1.2rem;margin:0;">{recovery_message(RELOAD_DELAY_MS)}</p>
            <button style=BUTTON_STYLE on:click=move |_| reload()>
                "Reiniciar agora"
            </button>
        </div>
    }
}
