use std::cell::RefCell;

use leptos::prelude::*;
use wasm_bindgen::JsCast;
use wasm_bindgen::prelude::*;
use web_sys::{EventSource, MessageEvent};

use vitrine_shared::CampaignEvent;

use crate::app::{CampaignList, LastSeq};

pub const EVENTS_URL: &str = "/api/events";

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ConnectionStatus {
    Connecting,
    Live,
    Reconnecting,
}

impl ConnectionStatus {
    pub fn color(self) -> &'static str {
        match self {
            Self::Connecting => "#f5c542",
            Self::Live => "#3ecf8e",
            Self::Reconnecting => "#e5484d",
        }
    }

    pub fn label(self) -> &'static str {
        match self {
            Self::Connecting => "Conectando",
            Self::Live => "Ao vivo",
            Self::Reconnecting => "Reconectando",
        }
    }
}

struct SseConnection {
    es: EventSource,
    on_open: Closure<dyn Fn()>,
    on_error: Closure<dyn Fn()>,
    snapshot_handler: Closure<dyn Fn(MessageEvent)>,
}

impl SseConnection {
    fn close(self) {
        self.es.set_onopen(None);
        self.es.set_onerror(None);
        self.es
            .remove_event_listener_with_callback(
                "snapshot",
                self.snapshot_handler.as_ref().unchecked_ref(),
            )
            .ok();
        self.es.close();
    }
}

thread_local! {
    static SSE_CONNECTION: RefCell<Option<SseConnection>> = const { RefCell::new(None) };
}

pub fn disconnect() {
    SSE_CONNECTION.with(|slot| {
        if let Some(connection) = slot.borrow_mut().take() {
            connection.close();
        }
    });
}

/// Whether a snapshot with `incoming` should replace what we have. A
/// lower sequence after a higher one means the server restarted.
pub fn accept_snapshot(last: Option<u64>, incoming: u64) -> bool {
    match last {
        Some(last) => incoming != last,
        None => true,
    }
}

/// Subscribe to campaign snapshots. The browser reconnects on its own; each
/// reconnect starts with a fresh snapshot.
pub fn connect(connection: RwSignal<ConnectionStatus>) {
    connection.set(ConnectionStatus::Connecting);

    let es = match EventSource::new(EVENTS_URL) {
        Ok(es) => es,
        Err(_) => {
            connection.set(ConnectionStatus::Reconnecting);
            return;
        }
    };

    let CampaignList(campaigns) = expect_context::<CampaignList>();
    let LastSeq(last_seq) = expect_context::<LastSeq>();

    let conn = connection;
    let on_open = Closure::<dyn Fn()>::new(move || {
        conn.set(ConnectionStatus::Live);
    });
    es.set_onopen(Some(on_open.as_ref().unchecked_ref()));

    let snapshot_handler = Closure::<dyn Fn(MessageEvent)>::new(move |e: MessageEvent| {
        let Some(data) = e.data().as_string() else {
            return;
        };
        let event = match serde_json::from_str::<CampaignEvent>(&data) {
            Ok(event) => event,
            Err(err) => {
                web_sys::console::warn_1(&format!("ignoring malformed snapshot: {err}").into());
                return;
            }
        };
        let CampaignEvent::Snapshot { seq, campaigns: list, .. } = event;

        let last = last_seq.get_untracked();
        if !accept_snapshot(last, seq) {
            return;
        }
        if let Some(last) = last
            && seq < last
        {
            web_sys::console::info_1(
                &format!("campaign sequence reset (last_seq={last}, snapshot_seq={seq})").into(),
            );
        }
        last_seq.set(Some(seq));
        campaigns.set(list);
    });
    es.add_event_listener_with_callback("snapshot", snapshot_handler.as_ref().unchecked_ref())
        .ok();

    let conn = connection;
    let on_error = Closure::<dyn Fn()>::new(move || {
        conn.set(ConnectionStatus::Reconnecting);
    });
    es.set_onerror(Some(on_error.as_ref().unchecked_ref()));

    // Replace any existing connection, ensuring handlers are unregistered cleanly.
    SSE_CONNECTION.with(|slot| {
        let mut slot = slot.borrow_mut();
        if let Some(old) = slot.take() {
            old.close();
        }
        *slot = Some(SseConnection {
            es,
            on_open,
            on_error,
            snapshot_handler,
        });
    });
}
