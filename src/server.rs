use axum::{
    extract::{Query, State},
    http::{header, StatusCode},
    response::{Html, IntoResponse, Response},
    routing::get,
    Json, Router,
};
use log::{error, info, warn};
use serde::Serialize;
use std::sync::Arc;

use crate::chart;
use crate::service::{ChartRequest, ChartView, ShotChartService};

const INDEX_HTML: &str = include_str!("../assets/index.html");

#[derive(Clone)]
pub struct AppState {
    pub service: Arc<ShotChartService>,
}

#[derive(Debug, Serialize)]
struct DashboardDefaults {
    player: String,
    team: String,
    season: String,
}

#[derive(Debug, Serialize)]
struct DashboardOptions {
    players: Vec<String>,
    teams: Vec<String>,
    seasons: Vec<String>,
    defaults: DashboardDefaults,
}

type ApiError = (StatusCode, String);

pub fn create_router(state: AppState) -> Router {
    Router::new()
        .route("/", get(index))
        .route("/api/options", get(options))
        .route("/api/chart", get(chart_svg))
        .route("/api/shots", get(shots_json))
        .route("/api/cache", axum::routing::delete(clear_cache))
        .with_state(state)
}

pub async fn serve(state: AppState, addr: &str, open_browser: bool) -> anyhow::Result<()> {
    let listener = tokio::net::TcpListener::bind(addr).await?;
    let url = format!("http://{}/", listener.local_addr()?);
    info!("dashboard listening on {}", url);
    if open_browser {
        if let Err(e) = webbrowser::open(&url) {
            warn!("could not open browser: {}", e);
        }
    }
    axum::serve(listener, create_router(state)).await?;
    Ok(())
}

async fn index() -> Html<&'static str> {
    Html(INDEX_HTML)
}

/// Run blocking service work (HTTP client, SQLite, files) off the runtime.
async fn blocking<T, F>(state: &AppState, f: F) -> Result<T, ApiError>
where
    T: Send + 'static,
    F: FnOnce(&ShotChartService) -> T + Send + 'static,
{
    let service = state.service.clone();
    tokio::task::spawn_blocking(move || f(service.as_ref())).await.map_err(|e| {
        error!("blocking task failed: {}", e);
        (StatusCode::INTERNAL_SERVER_ERROR, e.to_string())
    })
}

async fn options(State(state): State<AppState>) -> Result<Json<DashboardOptions>, ApiError> {
    let players = blocking(&state, |service| service.players_list())
        .await?
        .map_err(|e| (StatusCode::INTERNAL_SERVER_ERROR, e.to_string()))?;
    let dashboard = state.service.dashboard();
    Ok(Json(DashboardOptions {
        players,
        teams: state.service.teams_list(),
        seasons: dashboard.seasons.clone(),
        defaults: DashboardDefaults {
            player: dashboard.default_player.clone(),
            team: dashboard.default_team.clone(),
            season: dashboard.default_season.clone(),
        },
    }))
}

async fn chart_svg(State(state): State<AppState>, Query(request): Query<ChartRequest>) -> Result<Response, ApiError> {
    let view = blocking(&state, move |service| service.chart_view(&request)).await?;
    let svg = chart::render(&view).map_err(|e| {
        error!("chart rendering failed: {:#}", e);
        (StatusCode::INTERNAL_SERVER_ERROR, e.to_string())
    })?;
    Ok(([(header::CONTENT_TYPE, "image/svg+xml")], svg).into_response())
}

async fn shots_json(State(state): State<AppState>, Query(request): Query<ChartRequest>) -> Result<Response, ApiError> {
    let view = blocking(&state, move |service| service.chart_view(&request)).await?;
    match view {
        ChartView::Chart(chart) => Ok(Json(chart.summary()).into_response()),
        other => {
            let message = other.message().unwrap_or_default();
            Ok((StatusCode::CONFLICT, Json(serde_json::json!({ "message": message }))).into_response())
        }
    }
}

async fn clear_cache(State(state): State<AppState>) -> Result<Json<serde_json::Value>, ApiError> {
    let removed = blocking(&state, |service| service.cache().clear())
        .await?
        .map_err(|e| (StatusCode::INTERNAL_SERVER_ERROR, e.to_string()))?;
    Ok(Json(serde_json::json!({ "removed": removed })))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::nba::endpoints::tests::{shot_chart_json, StubTransport};
    use crate::service::tests::service_with;
    use axum::body::{to_bytes, Body};
    use axum::http::{Method, Request};
    use serde_json::{json, Value};
    use tower::ServiceExt;

    fn app(transport: StubTransport, tag: &str) -> Router {
        let service = service_with(Arc::new(transport), tag);
        create_router(AppState { service: Arc::new(service) })
    }

    async fn send(app: &Router, method: Method, uri: &str) -> (StatusCode, Option<String>, String) {
        let request = Request::builder().method(method).uri(uri).body(Body::empty()).unwrap();
        let response = app.clone().oneshot(request).await.unwrap();
        let status = response.status();
        let content_type = response
            .headers()
            .get(header::CONTENT_TYPE)
            .map(|v| v.to_str().unwrap().to_string());
        let bytes = to_bytes(response.into_body(), usize::MAX).await.unwrap();
        (status, content_type, String::from_utf8_lossy(&bytes).to_string())
    }

    #[tokio::test]
    async fn index_serves_the_dashboard() {
        let app = app(StubTransport::failing(), "srv-index");
        let (status, content_type, body) = send(&app, Method::GET, "/").await;
        assert_eq!(status, StatusCode::OK);
        assert!(content_type.unwrap().starts_with("text/html"));
        assert!(body.contains("generate-chart-btn"));
        assert!(body.contains("player-dropdown"));
    }

    #[tokio::test]
    async fn options_list_dropdown_values() {
        let app = app(StubTransport::failing(), "srv-options");
        let (status, _, body) = send(&app, Method::GET, "/api/options").await;
        assert_eq!(status, StatusCode::OK);
        let json: Value = serde_json::from_str(&body).unwrap();
        assert_eq!(json["teams"].as_array().unwrap().len(), 30);
        assert_eq!(json["seasons"], json!(["2024-25", "2023-24"]));
        assert_eq!(json["defaults"]["team"], "Dallas Mavericks");
        assert!(json["players"].as_array().unwrap().iter().any(|p| p == "Luka Dončić"));
    }

    #[tokio::test]
    async fn chart_without_selection_prompts() {
        let app = app(StubTransport::failing(), "srv-prompt");
        let (status, content_type, body) = send(&app, Method::GET, "/api/chart").await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(content_type.as_deref(), Some("image/svg+xml"));
        assert!(body.contains("Generate chart"));

        let (_, _, body) = send(&app, Method::GET, "/api/chart?player=Luka%20Don%C4%8Di%C4%87&season=2024-25").await;
        assert!(body.contains("Please select a player, team and season"));
    }

    #[tokio::test]
    async fn chart_renders_live_shots() {
        let transport = StubTransport::new(vec![Ok(shot_chart_json(vec![
            json!(["Shot Chart Detail", "0022400061", 1629029, "Layup Shot", 3, 8, 1]),
            json!(["Shot Chart Detail", "0022400061", 1629029, "Jump Shot", -200, 150, 0]),
        ]))]);
        let app = app(transport, "srv-live");
        let uri = "/api/chart?player=Luka%20Don%C4%8Di%C4%87&team=Dallas%20Mavericks&season=2024-25";
        let (status, _, body) = send(&app, Method::GET, uri).await;
        assert_eq!(status, StatusCode::OK);
        assert!(body.contains("Luka Dončić - 2024-25"));
        assert!(body.contains("Total shots: 2"));
    }

    #[tokio::test]
    async fn shots_endpoint_returns_summary_or_conflict() {
        let app = app(StubTransport::failing(), "srv-shots");
        let (status, _, body) = send(&app, Method::GET, "/api/shots?player=Stephen%20Curry&team=GSW&season=2023-24").await;
        assert_eq!(status, StatusCode::OK);
        let json: Value = serde_json::from_str(&body).unwrap();
        assert_eq!(json["source"], "synthetic");
        assert_eq!(json["total"], 150);

        let (status, _, body) = send(&app, Method::GET, "/api/shots").await;
        assert_eq!(status, StatusCode::CONFLICT);
        assert!(body.contains("Generate chart"));
    }

    #[tokio::test]
    async fn delete_cache_reports_removed_entries() {
        let transport = StubTransport::new(vec![Ok(shot_chart_json(vec![json!([
            "Shot Chart Detail", "0022400061", 1629029, "Layup Shot", 3, 8, 1
        ])]))]);
        let app = app(transport, "srv-cache");
        send(&app, Method::GET, "/api/chart?player=Luka%20Don%C4%8Di%C4%87&team=DAL&season=2024-25").await;
        let (status, _, body) = send(&app, Method::DELETE, "/api/cache").await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(serde_json::from_str::<Value>(&body).unwrap()["removed"], 1);
    }
}
