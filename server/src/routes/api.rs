use std::sync::Arc;

use axum::Json;
use axum::body::Body;
use axum::extract::rejection::JsonRejection;
use axum::extract::{Path, State};
use axum::http::{HeaderMap, HeaderValue, StatusCode, header};
use axum::response::{IntoResponse, Response};
use bytes::Bytes;
use vitrine_shared::{Campaign, CampaignDraft};

use crate::error::ApiError;
use crate::state::AppState;
use crate::store;

/// Revalidate every time; the ETag makes that cheap.
const FEED_CACHE_CONTROL: &str = "no-cache";

pub async fn health(State(state): State<AppState>) -> Json<serde_json::Value> {
    let snapshot = state.live_snapshot.read().await;
    let active = snapshot.campaigns.iter().filter(|c| c.active).count();
    Json(serde_json::json!({
        "status": "ok",
        "campaigns": snapshot.campaigns.len(),
        "active_campaigns": active,
        "seq": snapshot.seq,
        "updated_at": snapshot.timestamp,
    }))
}

/// Serve the pre-serialized feed; no list clone, no re-serialization.
pub async fn get_campaigns(State(state): State<AppState>, headers: HeaderMap) -> Response {
    let (etag, json): (String, Arc<Bytes>) = {
        let snapshot = state.live_snapshot.read().await;
        (campaigns_etag(snapshot.seq), Arc::clone(&snapshot.feed_json))
    };

    if if_none_match_matches(&headers, &etag) {
        return not_modified_response(FEED_CACHE_CONTROL, Some(etag.as_str()));
    }

    json_bytes_response((*json).clone(), FEED_CACHE_CONTROL, Some(etag.as_str()))
}

pub async fn create_campaign(
    State(state): State<AppState>,
    body: Result<Json<CampaignDraft>, JsonRejection>,
) -> Result<(StatusCode, Json<Campaign>), ApiError> {
    let Json(draft) = body?;
    let (campaign, seq) = state.mutate(|list| store::insert(list, draft)).await?;
    tracing::info!(id = %campaign.id, region = %campaign.region, seq, "campaign created");
    Ok((StatusCode::CREATED, Json(campaign)))
}

pub async fn update_campaign(
    State(state): State<AppState>,
    Path(id): Path<String>,
    body: Result<Json<CampaignDraft>, JsonRejection>,
) -> Result<Json<Campaign>, ApiError> {
    let Json(draft) = body?;
    let (campaign, seq) = state
        .mutate(|list| store::update(list, &id, draft))
        .await?;
    tracing::info!(id = %campaign.id, seq, "campaign updated");
    Ok(Json(campaign))
}

pub async fn delete_campaign(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> Result<StatusCode, ApiError> {
    let (removed, seq) = state.mutate(|list| store::remove(list, &id)).await?;
    tracing::info!(id = %removed.id, seq, "campaign deleted");
    Ok(StatusCode::NO_CONTENT)
}

pub async fn toggle_campaign(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> Result<Json<Campaign>, ApiError> {
    let (campaign, seq) = state.mutate(|list| store::toggle(list, &id)).await?;
    tracing::info!(id = %campaign.id, active = campaign.active, seq, "campaign toggled");
    Ok(Json(campaign))
}

pub async fn reorder_campaigns(
    State(state): State<AppState>,
    body: Result<Json<Vec<String>>, JsonRejection>,
) -> Result<StatusCode, ApiError> {
    let Json(order) = body?;
    let ((), seq) = state
        .mutate(|list| store::reorder(list, &order))
        .await?;
    tracing::info!(seq, count = order.len(), "campaigns reordered");
    Ok(StatusCode::NO_CONTENT)
}

fn campaigns_etag(seq: u64) -> String {
    format!("\"campaigns-{seq}\"")
}

fn json_bytes_response(body: Bytes, cache_control: &'static str, etag: Option<&str>) -> Response {
    let mut response = Response::new(Body::from(body));
    let headers = response.headers_mut();
    headers.insert(
        header::CONTENT_TYPE,
        HeaderValue::from_static("application/json"),
    );
    headers.insert(
        header::CACHE_CONTROL,
        HeaderValue::from_static(cache_control),
    );
    if let Some(etag) = etag
        && let Ok(etag_header) = HeaderValue::from_str(etag)
    {
        headers.insert(header::ETAG, etag_header);
    }
    response
}

fn not_modified_response(cache_control: &'static str, etag: Option<&str>) -> Response {
    let mut response = StatusCode::NOT_MODIFIED.into_response();
    let headers = response.headers_mut();
    headers.insert(
        header::CACHE_CONTROL,
        HeaderValue::from_static(cache_control),
    );
    if let Some(etag) = etag
        && let Ok(etag_header) = HeaderValue::from_str(etag)
    {
        headers.insert(header::ETAG, etag_header);
    }
    response
}

fn normalize_etag(candidate: &str) -> &str {
    candidate.strip_prefix("W/").unwrap_or(candidate).trim()
}

fn if_none_match_matches(headers: &HeaderMap, etag: &str) -> bool {
    let Some(value) = headers.get(header::IF_NONE_MATCH) else {
        return false;
    };
    let Ok(raw) = value.to_str() else {
        return false;
    };

    raw.split(',').any(|candidate| {
        let candidate = candidate.trim();
        candidate == "*" || normalize_etag(candidate) == normalize_etag(etag)
    })
}

#[cfg(test)]
mod tests {
    use axum::Router;
    use axum::body::{Body, to_bytes};
    use axum::http::{Request, StatusCode, header};
    use tower::ServiceExt;
    use vitrine_shared::{Campaign, CampaignFeed};

    use super::if_none_match_matches;
    use crate::state::AppState;

    fn app() -> (AppState, Router) {
        let state = AppState::with_campaigns_file("unused.json".into());
        let app = crate::app::build_app(state.clone(), "does-not-exist".into());
        (state, app)
    }

    fn json_request(method: &str, uri: &str, body: &str) -> Request<Body> {
        Request::builder()
            .method(method)
            .uri(uri)
            .header(header::CONTENT_TYPE, "application/json")
            .body(Body::from(body.to_owned()))
            .expect("request")
    }

    async fn body_json<T: serde::de::DeserializeOwned>(response: axum::response::Response) -> T {
        let bytes = to_bytes(response.into_body(), usize::MAX)
            .await
            .expect("read body");
        serde_json::from_slice(&bytes).expect("json body")
    }

    async fn create(app: &Router, client: &str, region: &str) -> Campaign {
        let response = app
            .clone()
            .oneshot(json_request(
                "POST",
                "/api/campaigns",
                &format!(r#"{{"client":"{client}","region":"{region}","impact":500}}"#),
            ))
            .await
            .expect("create");
        assert_eq!(response.status(), StatusCode::CREATED);
        body_json(response).await
    }

    #[test]
    fn if_none_match_supports_weak_and_multiple_etags() {
        let mut headers = axum::http::HeaderMap::new();
        headers.insert(
            axum::http::header::IF_NONE_MATCH,
            axum::http::HeaderValue::from_static("W/\"other\", \"campaigns-42\""),
        );
        assert!(if_none_match_matches(&headers, "\"campaigns-42\""));
        assert!(!if_none_match_matches(&headers, "\"campaigns-43\""));
    }

    #[tokio::test]
    async fn campaigns_endpoint_returns_not_modified_when_etag_matches() {
        let (_state, app) = app();
        create(&app, "Acme", "Bahia").await;

        let first = app
            .clone()
            .oneshot(Request::get("/api/campaigns").body(Body::empty()).expect("request"))
            .await
            .expect("feed");
        assert_eq!(first.status(), StatusCode::OK);
        let etag = first
            .headers()
            .get(header::ETAG)
            .and_then(|value| value.to_str().ok())
            .map(str::to_owned)
            .expect("etag header should be present");
        assert_eq!(etag, "\"campaigns-1\"");
        let feed: CampaignFeed = body_json(first).await;
        assert_eq!(feed.seq, 1);
        assert_eq!(feed.campaigns[0].client, "Acme");

        let second = app
            .oneshot(
                Request::get("/api/campaigns")
                    .header(header::IF_NONE_MATCH, etag)
                    .body(Body::empty())
                    .expect("request"),
            )
            .await
            .expect("conditional feed");
        assert_eq!(second.status(), StatusCode::NOT_MODIFIED);
        assert_eq!(
            second
                .headers()
                .get(header::CACHE_CONTROL)
                .and_then(|value| value.to_str().ok()),
            Some("no-cache")
        );
    }

    #[tokio::test]
    async fn create_fills_focus_from_region_catalogue() {
        let (_state, app) = app();
        let created = create(&app, "Acme", "DF").await;
        assert_eq!(created.region, "Distrito Federal");
        assert_eq!(created.zoom, 12.0);
        assert!(uuid::Uuid::parse_str(&created.id).is_ok());
    }

    #[tokio::test]
    async fn invalid_bodies_are_bad_requests() {
        let (state, app) = app();
        for body in [
            r#"{"client":"x","region":"Atlantis"}"#,
            r#"{"client":"x","region":"Bahia","zoom":0}"#,
            r#"{"client":"x","region":"Bahia","coordinates":[-41.7, 95.0]}"#,
            r#"{"client":"x","region":"Bahia","sparkles":true}"#,
            r#"{"client":"x""#,
        ] {
            let response = app
                .clone()
                .oneshot(json_request("POST", "/api/campaigns", body))
                .await
                .expect("create");
            assert_eq!(response.status(), StatusCode::BAD_REQUEST, "{body}");
            let error: serde_json::Value = body_json(response).await;
            assert!(error["error"].is_string());
        }
        assert_eq!(state.live_snapshot.read().await.seq, 0);
    }

    #[tokio::test]
    async fn update_toggle_delete_round_trip() {
        let (state, app) = app();
        let created = create(&app, "Acme", "Bahia").await;
        let uri = format!("/api/campaigns/{}", created.id);

        let updated = app
            .clone()
            .oneshot(json_request(
                "PUT",
                &uri,
                r#"{"client":"Acme Norte","region":"Pará","impact":900}"#,
            ))
            .await
            .expect("update");
        assert_eq!(updated.status(), StatusCode::OK);
        let updated: Campaign = body_json(updated).await;
        assert_eq!(updated.id, created.id);
        assert_eq!(updated.region, "Pará");

        let toggled = app
            .clone()
            .oneshot(json_request("POST", &format!("{uri}/toggle"), ""))
            .await
            .expect("toggle");
        assert_eq!(toggled.status(), StatusCode::OK);
        let toggled: Campaign = body_json(toggled).await;
        assert!(!toggled.active);

        let deleted = app
            .clone()
            .oneshot(Request::delete(&uri).body(Body::empty()).expect("request"))
            .await
            .expect("delete");
        assert_eq!(deleted.status(), StatusCode::NO_CONTENT);

        let missing = app
            .oneshot(Request::delete(&uri).body(Body::empty()).expect("request"))
            .await
            .expect("delete again");
        assert_eq!(missing.status(), StatusCode::NOT_FOUND);
        assert_eq!(state.live_snapshot.read().await.seq, 4);
    }

    #[tokio::test]
    async fn reorder_accepts_only_permutations() {
        let (state, app) = app();
        let a = create(&app, "A", "Acre").await;
        let b = create(&app, "B", "Amapá").await;

        let bad = app
            .clone()
            .oneshot(json_request(
                "PUT",
                "/api/campaigns/order",
                &format!(r#"["{}"]"#, a.id),
            ))
            .await
            .expect("reorder");
        assert_eq!(bad.status(), StatusCode::BAD_REQUEST);

        let ok = app
            .clone()
            .oneshot(json_request(
                "PUT",
                "/api/campaigns/order",
                &format!(r#"["{}","{}"]"#, b.id, a.id),
            ))
            .await
            .expect("reorder");
        assert_eq!(ok.status(), StatusCode::NO_CONTENT);
        let snapshot = state.live_snapshot.read().await;
        assert_eq!(snapshot.campaigns[0].id, b.id);
        assert_eq!(snapshot.seq, 3);
    }

    #[tokio::test]
    async fn health_reports_counts() {
        let (_state, app) = app();
        let created = create(&app, "A", "Ceará").await;
        create(&app, "B", "Piauí").await;
        app.clone()
            .oneshot(json_request(
                "POST",
                &format!("/api/campaigns/{}/toggle", created.id),
                "",
            ))
            .await
            .expect("toggle");

        let response = app
            .oneshot(Request::get("/api/health").body(Body::empty()).expect("request"))
            .await
            .expect("health");
        let health: serde_json::Value = body_json(response).await;
        assert_eq!(health["status"], "ok");
        assert_eq!(health["campaigns"], 2);
        assert_eq!(health["active_campaigns"], 1);
        assert_eq!(health["seq"], 3);
    }
}
