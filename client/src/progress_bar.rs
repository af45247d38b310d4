use leptos::prelude::*;

use crate::driver::StageSignals;

/// Inline style for one pass of the bar. The element is recreated on every
/// cycle so the animation restarts from zero.
pub fn progress_style(cycle_ms: f64) -> String {
    format!(
        "height:100%;width:100%;background:#3ecf8e;transform-origin:0 50%;animation:vitrine-progress {:.0}ms linear forwards;",
        cycle_ms.max(0.0)
    )
}

#[component]
pub fn ProgressBar(cycle_ms: f64) -> impl IntoView {
    let stage = expect_context::<StageSignals>();
    let epoch = stage.epoch;
    let suspended = stage.suspended;

    view! {
        <div style=move || format!(
            "position:absolute;left:0;right:0;bottom:0;height:4px;background:rgba(255,255,255,0.06);{}",
            if suspended.get() { "visibility:hidden;" } else { "" }
        )>
            {move || {
                let epoch = epoch.get();
                view! { <div data-epoch=epoch style=progress_style(cycle_ms)></div> }
            }}
        </div>
    }
}
