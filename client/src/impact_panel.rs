use leptos::prelude::*;

use vitrine_shared::format_impact;

use crate::campaign_card::reveal_style;
use crate::driver::{IMPACT_ID, StageSignals};

const PANEL_STYLE: &str = "position:absolute;right:48px;bottom:64px;min-width:260px;padding:20px 26px;border-radius:14px;background:rgba(11,15,20,0.86);border:1px solid #223041;color:#e6e9ef;font-family:system-ui,sans-serif;text-align:right;";

/// The number itself is written by the frame loop; this component only
/// renders the frame around it once.
#[component]
pub fn ImpactPanel() -> impl IntoView {
    let stage = expect_context::<StageSignals>();
    let visible = stage.ui_visible;

    view! {
        <div style=move || format!("{PANEL_STYLE}{}", reveal_style(visible.get()))>
            <div style="font-size:0.72rem;letter-spacing:0.14em;text-transform:uppercase;color:#8fa0b3;">
                "Impacto"
            </div>
            <div
                id=IMPACT_ID
                style="font-size:3rem;font-weight:800;font-variant-numeric:tabular-nums;color:#3ecf8e;line-height:1.1;"
            >
                {format_impact(0)}
            </div>
            <div style="font-size:0.8rem;color:#8fa0b3;">"pessoas alcançadas"</div>
        </div>
    }
}
