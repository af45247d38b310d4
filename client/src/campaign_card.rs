use leptos::prelude::*;

use crate::driver::StageSignals;

const CARD_STYLE: &str = "position:absolute;left:48px;bottom:64px;width:420px;max-width:calc(100vw - 96px);padding:22px 24px;border-radius:14px;background:rgba(11,15,20,0.86);border:1px solid #223041;box-shadow:0 18px 48px rgba(0,0,0,0.45);color:#e6e9ef;font-family:system-ui,sans-serif;";

/// Opacity and offset for the reveal/hide fade.
pub fn reveal_style(visible: bool) -> &'static str {
    if visible {
        "opacity:1;transform:translateY(0);transition:opacity 700ms ease-out, transform 700ms ease-out;"
    } else {
        "opacity:0;transform:translateY(16px);transition:opacity 500ms ease-in, transform 500ms ease-in;"
    }
}

#[component]
pub fn CampaignCard() -> impl IntoView {
    let stage = expect_context::<StageSignals>();
    let visible = stage.ui_visible;
    let current = stage.current;

    let field = move |read: fn(&vitrine_shared::Campaign) -> String| {
        move || current.with(|c| c.as_ref().map(read).unwrap_or_default())
    };

    view! {
        <div style=move || format!("{CARD_STYLE}{}", reveal_style(visible.get()))>
            <Show when=move || current.with(|c| c.as_ref().is_some_and(|c| !c.image.is_empty()))>
                <img
                    src=field(|c| c.image.clone())
                    alt=field(|c| c.client.clone())
                    style="width:100%;height:180px;object-fit:cover;border-radius:10px;margin-bottom:16px;"
                />
            </Show>
            <div style="font-size:0.72rem;letter-spacing:0.14em;text-transform:uppercase;color:#3ecf8e;">
                {field(|c| c.category.clone())}
            </div>
            <h2 style="margin:6px 0 4px;font-size:1.7rem;font-weight:700;">
                {field(|c| c.client.clone())}
            </h2>
            <div style="font-size:0.9rem;color:#8fa0b3;margin-bottom:12px;">
                {field(|c| c.display_region().to_string())}
            </div>
            <p style="margin:0;font-size:0.98rem;line-height:1.45;color:#c9d2dc;">
                {field(|c| c.description.clone())}
            </p>
        </div>
    }
}

#[cfg(test)]
mod tests {
    use super::reveal_style;

    #[test]
    fn hidden_card_is_transparent() {
        assert!(reveal_style(false).starts_with("opacity:0;"));
        assert!(reveal_style(true).starts_with("opacity:1;"));
    }
}
