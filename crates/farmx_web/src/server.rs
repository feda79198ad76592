use std::net::SocketAddr;
use std::path::PathBuf;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;
use std::time::Instant;

use anyhow::{Context, Result};
use axum::body::Body;
use axum::extract::{Query, State};
use axum::http::{header, HeaderValue, StatusCode};
use axum::response::{Html, Response};
use axum::routing::{get, post};
use axum::{Form, Json, Router};
use farmx_core::{crops, Crop, ModelStore, NutrientReport};
use serde::{Deserialize, Serialize};
use tower_http::services::ServeDir;
use tower_http::trace::TraceLayer;
use tracing::{debug, info, warn};

use crate::errors::{ApiError, SubmitError};
use crate::forms::{
    CompareNutrientForm, CompareYieldForm, NutrientForm, NutrientRequest, ValidNutrients,
    ValidYield, YieldForm, YieldRequest,
};
use crate::pages::{self, Mode, NutrientResult, Outcome, Theme, YieldResult};

/// Request and prediction counters exported on `/metrics`
#[derive(Debug, Default)]
pub struct Metrics {
    requests: AtomicU64,
    predictions: AtomicU64,
    prediction_errors: AtomicU64,
    validation_errors: AtomicU64,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct MetricsSnapshot {
    pub requests: u64,
    pub predictions: u64,
    pub prediction_errors: u64,
    pub validation_errors: u64,
}

impl Metrics {
    fn record_request(&self) -> u64 {
        self.requests.fetch_add(1, Ordering::Relaxed) + 1
    }

    fn record_prediction(&self) {
        self.predictions.fetch_add(1, Ordering::Relaxed);
    }

    fn record_failure(&self, err: &SubmitError) {
        let counter = match err {
            SubmitError::Form(_) => &self.validation_errors,
            SubmitError::Prediction(_) => &self.prediction_errors,
        };
        counter.fetch_add(1, Ordering::Relaxed);
    }

    pub fn snapshot(&self) -> MetricsSnapshot {
        MetricsSnapshot {
            requests: self.requests.load(Ordering::Relaxed),
            predictions: self.predictions.load(Ordering::Relaxed),
            prediction_errors: self.prediction_errors.load(Ordering::Relaxed),
            validation_errors: self.validation_errors.load(Ordering::Relaxed),
        }
    }
}

/// Shared, read-only server state
pub struct AppState {
    pub store: Arc<ModelStore>,
    pub metrics: Metrics,
    pub default_theme: Theme,
    pub assets_dir: Option<PathBuf>,
    start_time: Instant,
}

pub type SharedState = Arc<AppState>;

impl AppState {
    pub fn new(store: Arc<ModelStore>, default_theme: Theme) -> Self {
        Self {
            store,
            metrics: Metrics::default(),
            default_theme,
            assets_dir: None,
            start_time: Instant::now(),
        }
    }

    pub fn with_assets_dir(mut self, dir: impl Into<PathBuf>) -> Self {
        self.assets_dir = Some(dir.into());
        self
    }

    fn uptime_seconds(&self) -> u64 {
        self.start_time.elapsed().as_secs()
    }

    fn theme(&self, query: &PageQuery) -> Theme {
        query
            .theme
            .as_deref()
            .and_then(Theme::parse)
            .unwrap_or(self.default_theme)
    }

    fn predict_yield(&self, valid: ValidYield) -> Result<YieldResult, SubmitError> {
        self.metrics.record_prediction();
        let yield_kg = self.store.predict_yield(&valid.inputs)?;
        info!(crop = valid.crop.name, yield_kg, "yield predicted");
        Ok(YieldResult {
            crop: valid.crop,
            inputs: valid.inputs,
            yield_kg,
        })
    }

    fn predict_nutrients(&self, valid: ValidNutrients) -> Result<NutrientResult, SubmitError> {
        self.metrics.record_prediction();
        let report = self.store.predict_nutrients(&valid.inputs)?;
        info!(
            crop = valid.crop.name,
            n_category = %report.n_category,
            n_value = report.n_value,
            "nutrients predicted"
        );
        Ok(NutrientResult {
            crop: valid.crop,
            inputs: valid.inputs,
            report,
        })
    }

    /// Turn a submission result into a status and page outcome.
    fn settle<T>(&self, result: Result<T, SubmitError>) -> (StatusCode, Outcome<T>) {
        match result {
            Ok(value) => (StatusCode::OK, Outcome::Done(value)),
            Err(err) => {
                self.metrics.record_failure(&err);
                match &err {
                    SubmitError::Form(reason) => debug!(%reason, "submission rejected"),
                    SubmitError::Prediction(reason) => warn!(%reason, "prediction failed"),
                }
                (err.status(), Outcome::Failed(err.to_string()))
            }
        }
    }
}

#[derive(Debug, Default, Deserialize)]
pub struct PageQuery {
    #[serde(default)]
    theme: Option<String>,
    #[serde(default)]
    mode: Option<String>,
}

impl PageQuery {
    fn mode(&self) -> Mode {
        match self.mode.as_deref().map(str::trim) {
            Some("compare") => Mode::Compare,
            _ => Mode::Single,
        }
    }
}

#[derive(Debug, Serialize)]
struct HealthResponse {
    status: &'static str,
    version: &'static str,
    uptime_secs: u64,
    artifacts: usize,
    req_total: u64,
}

#[derive(Debug, Serialize)]
struct YieldResponse {
    crop: &'static str,
    yield_kg: f64,
}

#[derive(Debug, Serialize)]
struct NutrientResponse {
    crop: &'static str,
    #[serde(flatten)]
    report: NutrientReport,
}

pub async fn start_server(state: AppState, addr: &str) -> Result<()> {
    let shared = Arc::new(state);
    let app = build_router(shared);
    let listener = bind_listener(addr).await?;
    info!("FarmX listening on http://{}", addr);
    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await
        .context("HTTP server terminated unexpectedly")
}

async fn bind_listener(addr: &str) -> Result<tokio::net::TcpListener> {
    if let Ok(socket_addr) = addr.parse::<SocketAddr>() {
        tokio::net::TcpListener::bind(socket_addr)
            .await
            .with_context(|| format!("failed to bind HTTP listener on {socket_addr}"))
    } else {
        tokio::net::TcpListener::bind(addr)
            .await
            .with_context(|| format!("failed to bind HTTP listener on {addr}"))
    }
}

async fn shutdown_signal() {
    if let Err(err) = tokio::signal::ctrl_c().await {
        warn!("failed to listen for shutdown signal: {}", err);
        return;
    }
    info!("shutdown signal received");
}

pub fn build_router(state: SharedState) -> Router {
    let mut router = Router::new()
        .route("/", get(handle_home))
        .route("/yield", get(handle_yield_page).post(handle_yield_submit))
        .route("/yield/compare", post(handle_yield_compare))
        .route(
            "/nitrogen",
            get(handle_nitrogen_page).post(handle_nitrogen_submit),
        )
        .route("/nitrogen/compare", post(handle_nitrogen_compare))
        .route("/resources", get(handle_resources))
        .route("/faq", get(handle_faq))
        .route("/api/crops", get(handle_api_crops))
        .route("/api/predict/yield", post(handle_api_yield))
        .route("/api/predict/nutrients", post(handle_api_nutrients))
        .route("/health", get(handle_health))
        .route("/metrics", get(handle_metrics));

    if let Some(assets) = state.assets_dir.as_deref() {
        if assets.exists() {
            info!("Serving assets from {:?}", assets);
            router = router.nest_service("/assets", ServeDir::new(assets));
        } else {
            warn!("Assets directory {:?} does not exist", assets);
        }
    }

    router.layer(TraceLayer::new_for_http()).with_state(state)
}

async fn handle_home(
    State(state): State<SharedState>,
    Query(query): Query<PageQuery>,
) -> Html<String> {
    state.metrics.record_request();
    Html(pages::home(state.theme(&query)))
}

async fn handle_resources(
    State(state): State<SharedState>,
    Query(query): Query<PageQuery>,
) -> Html<String> {
    state.metrics.record_request();
    Html(pages::resources(state.theme(&query)))
}

async fn handle_faq(
    State(state): State<SharedState>,
    Query(query): Query<PageQuery>,
) -> Html<String> {
    state.metrics.record_request();
    Html(pages::faq(state.theme(&query)))
}

async fn handle_yield_page(
    State(state): State<SharedState>,
    Query(query): Query<PageQuery>,
) -> Html<String> {
    state.metrics.record_request();
    let theme = state.theme(&query);
    Html(match query.mode() {
        Mode::Single => pages::yield_single(theme, &YieldForm::default(), &Outcome::Blank),
        Mode::Compare => {
            pages::yield_compare(theme, &CompareYieldForm::default(), &Outcome::Blank)
        }
    })
}

async fn handle_yield_submit(
    State(state): State<SharedState>,
    Query(query): Query<PageQuery>,
    Form(form): Form<YieldForm>,
) -> (StatusCode, Html<String>) {
    state.metrics.record_request();
    debug!(crop = %form.crop, "yield form submitted");
    let result = form
        .validate()
        .map_err(SubmitError::from)
        .and_then(|valid| state.predict_yield(valid));
    let (status, outcome) = state.settle(result);
    (
        status,
        Html(pages::yield_single(state.theme(&query), &form, &outcome)),
    )
}

async fn handle_yield_compare(
    State(state): State<SharedState>,
    Query(query): Query<PageQuery>,
    Form(form): Form<CompareYieldForm>,
) -> (StatusCode, Html<String>) {
    state.metrics.record_request();
    debug!(crop1 = %form.crop1, crop2 = %form.crop2, "yield comparison submitted");
    let result = form
        .validate()
        .map_err(SubmitError::from)
        .and_then(|[first, second]| {
            Ok([state.predict_yield(first)?, state.predict_yield(second)?])
        });
    let (status, outcome) = state.settle(result);
    (
        status,
        Html(pages::yield_compare(state.theme(&query), &form, &outcome)),
    )
}

async fn handle_nitrogen_page(
    State(state): State<SharedState>,
    Query(query): Query<PageQuery>,
) -> Html<String> {
    state.metrics.record_request();
    let theme = state.theme(&query);
    Html(match query.mode() {
        Mode::Single => pages::nitrogen_single(theme, &NutrientForm::default(), &Outcome::Blank),
        Mode::Compare => {
            pages::nitrogen_compare(theme, &CompareNutrientForm::default(), &Outcome::Blank)
        }
    })
}

async fn handle_nitrogen_submit(
    State(state): State<SharedState>,
    Query(query): Query<PageQuery>,
    Form(form): Form<NutrientForm>,
) -> (StatusCode, Html<String>) {
    state.metrics.record_request();
    debug!(crop = %form.crop, "nitrogen form submitted");
    let result = form
        .validate()
        .map_err(SubmitError::from)
        .and_then(|valid| state.predict_nutrients(valid));
    let (status, outcome) = state.settle(result);
    (
        status,
        Html(pages::nitrogen_single(state.theme(&query), &form, &outcome)),
    )
}

async fn handle_nitrogen_compare(
    State(state): State<SharedState>,
    Query(query): Query<PageQuery>,
    Form(form): Form<CompareNutrientForm>,
) -> (StatusCode, Html<String>) {
    state.metrics.record_request();
    debug!(crop1 = %form.crop1, crop2 = %form.crop2, "nitrogen comparison submitted");
    let result = form
        .validate()
        .map_err(SubmitError::from)
        .and_then(|[first, second]| {
            Ok([
                state.predict_nutrients(first)?,
                state.predict_nutrients(second)?,
            ])
        });
    let (status, outcome) = state.settle(result);
    (
        status,
        Html(pages::nitrogen_compare(state.theme(&query), &form, &outcome)),
    )
}

async fn handle_api_crops(State(state): State<SharedState>) -> Json<Vec<Crop>> {
    state.metrics.record_request();
    Json(crops::all().collect())
}

async fn handle_api_yield(
    State(state): State<SharedState>,
    Json(request): Json<YieldRequest>,
) -> Result<Json<YieldResponse>, ApiError> {
    state.metrics.record_request();
    let result = request
        .validate()
        .map_err(SubmitError::from)
        .and_then(|valid| state.predict_yield(valid));
    match result {
        Ok(result) => Ok(Json(YieldResponse {
            crop: result.crop.name,
            yield_kg: result.yield_kg,
        })),
        Err(err) => {
            state.metrics.record_failure(&err);
            Err(err.into())
        }
    }
}

async fn handle_api_nutrients(
    State(state): State<SharedState>,
    Json(request): Json<NutrientRequest>,
) -> Result<Json<NutrientResponse>, ApiError> {
    state.metrics.record_request();
    let result = request
        .validate()
        .map_err(SubmitError::from)
        .and_then(|valid| state.predict_nutrients(valid));
    match result {
        Ok(result) => Ok(Json(NutrientResponse {
            crop: result.crop.name,
            report: result.report,
        })),
        Err(err) => {
            state.metrics.record_failure(&err);
            Err(err.into())
        }
    }
}

async fn handle_health(State(state): State<SharedState>) -> Json<HealthResponse> {
    let req_total = state.metrics.record_request();
    Json(HealthResponse {
        status: "ok",
        version: crate::VERSION,
        uptime_secs: state.uptime_seconds(),
        artifacts: state.store.artifact_count(),
        req_total,
    })
}

async fn handle_metrics(State(state): State<SharedState>) -> Response {
    state.metrics.record_request();
    let snapshot = state.metrics.snapshot();
    let uptime = state.uptime_seconds();

    let mut metrics =
        "# HELP farmx_http_requests_total Total number of HTTP requests handled\n".to_string();
    metrics.push_str("# TYPE farmx_http_requests_total counter\n");
    metrics.push_str(&format!("farmx_http_requests_total {}\n", snapshot.requests));
    metrics.push_str("# HELP farmx_predictions_total Model dispatches attempted\n");
    metrics.push_str("# TYPE farmx_predictions_total counter\n");
    metrics.push_str(&format!("farmx_predictions_total {}\n", snapshot.predictions));
    metrics.push_str("# HELP farmx_prediction_errors_total Model dispatches that failed\n");
    metrics.push_str("# TYPE farmx_prediction_errors_total counter\n");
    metrics.push_str(&format!(
        "farmx_prediction_errors_total {}\n",
        snapshot.prediction_errors
    ));
    metrics.push_str("# HELP farmx_validation_errors_total Submissions rejected by validation\n");
    metrics.push_str("# TYPE farmx_validation_errors_total counter\n");
    metrics.push_str(&format!(
        "farmx_validation_errors_total {}\n",
        snapshot.validation_errors
    ));
    metrics.push_str("# HELP farmx_uptime_seconds Uptime of the server in seconds\n");
    metrics.push_str("# TYPE farmx_uptime_seconds gauge\n");
    metrics.push_str(&format!("farmx_uptime_seconds {uptime}\n"));

    let mut response = Response::new(Body::from(metrics));
    response.headers_mut().insert(
        header::CONTENT_TYPE,
        HeaderValue::from_static("text/plain; version=0.0.4"),
    );
    response
}
