use std::fmt;

use leptos::prelude::*;

use vitrine_shared::geometry::{RegionShapes, build_region_shapes};
use vitrine_shared::{Campaign, CycleTiming, MapFrame, Mercator};

use crate::api;
use crate::campaign_card::CampaignCard;
use crate::driver::{self, StageSignals};
use crate::impact_panel::ImpactPanel;
use crate::map_view::MapView;
use crate::progress_bar::ProgressBar;
use crate::recovery::RecoveryNotice;
use crate::sse::{self, ConnectionStatus};

/// Newtype wrappers so signals of the same shape get distinct context slots.
#[derive(Clone, Copy)]
pub(crate) struct CampaignList(pub RwSignal<Vec<Campaign>>);
#[derive(Clone, Copy)]
pub(crate) struct LastSeq(pub RwSignal<Option<u64>>);
#[derive(Clone, Copy)]
pub(crate) struct GeometryReady(pub RwSignal<bool>);
#[derive(Clone, Copy)]
pub(crate) struct RegionStore(pub StoredValue<RegionShapes>);

#[derive(Debug, Clone)]
struct GeometryUnavailable(String);

impl fmt::Display for GeometryUnavailable {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "map geometry unavailable: {}", self.0)
    }
}

impl std::error::Error for GeometryUnavailable {}

fn remove_loading_shell() {
    let Some(document) = web_sys::window().and_then(|w| w.document()) else {
        return;
    };
    if let Some(shell) = document.get_element_by_id("app-loading-shell") {
        shell.remove();
    }
}

/// Root component. Owns the global signals, loads data and geometry, and
/// mounts the showcase driver for the lifetime of the page.
#[component]
pub fn App() -> impl IntoView {
    let campaigns: RwSignal<Vec<Campaign>> = RwSignal::new(Vec::new());
    let last_seq: RwSignal<Option<u64>> = RwSignal::new(None);
    let connection: RwSignal<ConnectionStatus> = RwSignal::new(ConnectionStatus::Connecting);
    let geometry_ready: RwSignal<bool> = RwSignal::new(false);
    let geometry_error: RwSignal<Option<String>> = RwSignal::new(None);
    let regions: StoredValue<RegionShapes> = StoredValue::new(RegionShapes::default());
    let stage = StageSignals::new();
    let cycle_ms = CycleTiming::default().cycle_ms;

    provide_context(CampaignList(campaigns));
    provide_context(LastSeq(last_seq));
    provide_context(GeometryReady(geometry_ready));
    provide_context(RegionStore(regions));
    provide_context(connection);
    provide_context(stage);

    // Region outlines are projected once with the same projection the
    // camera uses, then never touched again.
    Effect::new(move || {
        wasm_bindgen_futures::spawn_local(async move {
            match api::fetch_geometry().await {
                Ok(collection) => {
                    let projection = Mercator::brazil(MapFrame::default());
                    let shapes = build_region_shapes(&collection, &projection);
                    if shapes.is_empty() {
                        geometry_error.set(Some("no drawable regions".into()));
                        return;
                    }
                    web_sys::console::info_1(
                        &format!("map geometry ready ({} regions)", shapes.len()).into(),
                    );
                    regions.set_value(RegionShapes::from(shapes));
                    geometry_ready.set(true);
                }
                Err(e) => geometry_error.set(Some(e)),
            }
        });
    });

    // Initial list over REST; the SSE snapshot that follows wins if newer.
    Effect::new(move || {
        wasm_bindgen_futures::spawn_local(async move {
            match api::fetch_campaigns().await {
                Ok(feed) => {
                    if last_seq.get_untracked().is_none() {
                        last_seq.set(Some(feed.seq));
                        campaigns.set(feed.campaigns);
                    }
                }
                Err(e) => {
                    web_sys::console::warn_1(&format!("campaign fetch failed: {e}").into());
                }
            }
        });
    });

    Effect::new(move || {
        sse::connect(connection);
        on_cleanup(|| {
            sse::disconnect();
        });
    });

    Effect::new(move || {
        driver::start(stage, &campaigns.get_untracked());
        on_cleanup(driver::stop);
    });

    Effect::new(move || {
        campaigns.with(|list| driver::push_campaigns(list));
    });

    Effect::new(move || {
        if !geometry_ready.get() {
            return;
        }
        stage.current.with(|current| {
            if let Some(c) = current
                && !regions.with_value(|shapes| shapes.contains(&c.region))
            {
                web_sys::console::warn_1(
                    &format!("region {:?} has no outline; nothing to highlight", c.region).into(),
                );
            }
        });
    });

    Effect::new(move || {
        if last_seq.get().is_some() || geometry_ready.get() {
            remove_loading_shell();
        }
    });

    let show_placeholder = move || last_seq.get().is_some() && stage.suspended.get();

    view! {
        <ErrorBoundary fallback=|_errors| view! { <RecoveryNotice /> }>
            {move || {
                geometry_error
                    .get()
                    .map_or(Ok(()), |reason| Err(GeometryUnavailable(reason)))
            }}
            <div style="position:fixed;inset:0;overflow:hidden;background:#06090d;">
                <MapView />
                <Show when=show_placeholder>
                    <div style="position:absolute;inset:0;display:flex;align-items:center;justify-content:center;color:#8fa0b3;font-family:system-ui,sans-serif;font-size:1.6rem;">
                        "Nenhuma campanha ativa"
                    </div>
                </Show>
                <CampaignCard />
                <ImpactPanel />
                <ConnectionDot />
                <ProgressBar cycle_ms=cycle_ms />
            </div>
        </ErrorBoundary>
    }
}

#[component]
fn ConnectionDot() -> impl IntoView {
    let connection = expect_context::<RwSignal<ConnectionStatus>>();

    view! {
        <div
            title=move || connection.get().label()
            style="position:absolute;top:18px;right:22px;display:flex;align-items:center;gap:8px;font-family:system-ui,sans-serif;font-size:0.72rem;color:#5d6b7a;"
        >
            <span style=move || format!(
                "width:9px;height:9px;border-radius:50%;background:{};box-shadow:0 0 8px {};",
                connection.get().color(),
                connection.get().color()
            )></span>
            {move || connection.get().label()}
        </div>
    }
}
