//! API Routes
//!
//! HTTP endpoints for projections, genesis generation, node initialization,
//! health checks and metrics

use axum::{
    extract::State,
    http::{header, StatusCode},
    response::{IntoResponse, Response},
    routing::{get, post},
    Json, Router,
};
use serde::Deserialize;
use serde_json::json;
use std::net::SocketAddr;
use std::sync::Arc;
use tokio::sync::Mutex;
use tower_http::cors::CorsLayer;
use tower_http::trace::TraceLayer;
use tracing::{error, info, warn};

use crate::api::Metrics;
use tokenomics_core::config::MAX_PERIODS;
use tokenomics_core::{
    project, BootstrapEnv, BootstrapError, BootstrapInvoker, ConfiguratorConfig, GenesisError,
    GenesisParameters, GenesisTransformer, NodeSetup, PolicyParameters,
};

/// Shared API state
pub struct ApiState {
    pub config: Arc<ConfiguratorConfig>,
    pub invoker: Arc<dyn BootstrapInvoker + Send + Sync>,
    pub metrics: Arc<Metrics>,
    /// Held while the genesis output or the env file is being written
    pub file_lock: Mutex<()>,
}

impl ApiState {
    pub fn new(
        config: Arc<ConfiguratorConfig>,
        invoker: Arc<dyn BootstrapInvoker + Send + Sync>,
        metrics: Arc<Metrics>,
    ) -> Self {
        Self {
            config,
            invoker,
            metrics,
            file_lock: Mutex::new(()),
        }
    }
}

/// Build the router
pub fn router(state: Arc<ApiState>, cors: bool) -> Router {
    let app = Router::new()
        // Health
        .route("/health", get(health_check))

        // Tokenomics
        .route("/api/defaults", get(get_defaults))
        .route("/api/projection", post(post_projection))
        .route("/api/genesis", post(post_genesis))
        .route("/api/bootstrap", post(post_bootstrap))

        // Metrics
        .route("/metrics", get(get_metrics_prometheus))
        .route("/metrics/json", get(get_metrics_json))

        .layer(TraceLayer::new_for_http())
        .with_state(state);

    if cors {
        app.layer(CorsLayer::permissive())
    } else {
        app
    }
}

/// Run the HTTP API server
pub async fn run_api_server(state: Arc<ApiState>, addr: SocketAddr, cors: bool) -> anyhow::Result<()> {
    let app = router(state, cors);

    info!("📊 HTTP API server listening on {}", addr);

    let listener = tokio::net::TcpListener::bind(addr).await?;
    axum::serve(listener, app).await?;

    Ok(())
}

fn error_response(status: StatusCode, message: impl Into<String>) -> Response {
    (status, Json(json!({ "error": message.into() }))).into_response()
}

/// GET /health - Simple health check
async fn health_check() -> impl IntoResponse {
    "OK"
}

/// GET /api/defaults - Form defaults from the configuration
async fn get_defaults(State(state): State<Arc<ApiState>>) -> impl IntoResponse {
    let mut node = state.config.node.clone();
    for validator in &mut node.validators {
        validator.keyring_password.clear();
    }

    Json(json!({
        "periods": state.config.periods,
        "genesis": state.config.genesis,
        "node": node,
    }))
}

#[derive(Debug, Deserialize)]
struct ProjectionRequest {
    policy: PolicyParameters,
    periods: Option<u32>,
}

/// POST /api/projection - Run the projection engine
async fn post_projection(
    State(state): State<Arc<ApiState>>,
    Json(request): Json<ProjectionRequest>,
) -> Response {
    if let Err(e) = request.policy.check_ranges() {
        state.metrics.inc_projection_errors();
        return error_response(StatusCode::UNPROCESSABLE_ENTITY, e.to_string());
    }

    let periods = request.periods.unwrap_or(state.config.periods);
    if periods > MAX_PERIODS {
        state.metrics.inc_projection_errors();
        return error_response(
            StatusCode::UNPROCESSABLE_ENTITY,
            format!("periods must not exceed {}", MAX_PERIODS),
        );
    }
    match project(&request.policy, periods) {
        Ok(result) => {
            state.metrics.inc_projections();
            Json(json!({
                "periods": result.periods(),
                "series": result,
                "display": result.display_series(),
            }))
            .into_response()
        }
        Err(e) => {
            state.metrics.inc_projection_errors();
            warn!("Projection rejected: {}", e);
            error_response(StatusCode::UNPROCESSABLE_ENTITY, e.to_string())
        }
    }
}

/// POST /api/genesis - Patch the template and write the output file
async fn post_genesis(
    State(state): State<Arc<ApiState>>,
    Json(params): Json<GenesisParameters>,
) -> Response {
    if let Err(e) = params.check_ranges() {
        state.metrics.inc_genesis_errors();
        return error_response(StatusCode::UNPROCESSABLE_ENTITY, e.to_string());
    }

    let transformer = GenesisTransformer::new(&state.config.template_path, &state.config.output_path);
    let output = transformer.output_path().display().to_string();

    let _guard = state.file_lock.lock().await;
    let result = tokio::task::spawn_blocking(move || transformer.generate(&params)).await;

    match result {
        Ok(Ok(_)) => {
            state.metrics.inc_genesis_written();
            Json(json!({ "output": output })).into_response()
        }
        Ok(Err(e)) => {
            state.metrics.inc_genesis_errors();
            error!("Genesis generation failed: {}", e);
            let status = match e {
                GenesisError::MissingSection { .. } => StatusCode::UNPROCESSABLE_ENTITY,
                GenesisError::Io { .. } | GenesisError::Json(_) => StatusCode::INTERNAL_SERVER_ERROR,
            };
            error_response(status, e.to_string())
        }
        Err(e) => {
            state.metrics.inc_genesis_errors();
            error!("Genesis task panicked: {}", e);
            error_response(StatusCode::INTERNAL_SERVER_ERROR, "Genesis generation aborted")
        }
    }
}

/// POST /api/bootstrap - Write the env file and run the init script
async fn post_bootstrap(
    State(state): State<Arc<ApiState>>,
    Json(setup): Json<NodeSetup>,
) -> Response {
    let env = match BootstrapEnv::from_setup(&setup) {
        Ok(env) => env,
        Err(e) => {
            state.metrics.inc_bootstrap_errors();
            return error_response(StatusCode::UNPROCESSABLE_ENTITY, e.to_string());
        }
    };

    let invoker = state.invoker.clone();

    let _guard = state.file_lock.lock().await;
    info!(nodes = env.num_nodes(), "Starting node initialization");
    let result = tokio::task::spawn_blocking(move || invoker.invoke(&env)).await;

    match result {
        Ok(Ok(output)) => {
            state.metrics.inc_bootstrap_runs();
            Json(json!({ "output": output })).into_response()
        }
        Ok(Err(e)) => {
            state.metrics.inc_bootstrap_errors();
            error!("Node initialization failed: {}", e);
            let status = match e {
                BootstrapError::Failed { .. } | BootstrapError::Spawn { .. } => StatusCode::BAD_GATEWAY,
                _ => StatusCode::INTERNAL_SERVER_ERROR,
            };
            (
                status,
                Json(json!({ "error": e.to_string(), "output": e.operator_output() })),
            )
                .into_response()
        }
        Err(e) => {
            state.metrics.inc_bootstrap_errors();
            error!("Bootstrap task panicked: {}", e);
            error_response(StatusCode::INTERNAL_SERVER_ERROR, "Node initialization aborted")
        }
    }
}

/// GET /metrics - Prometheus format metrics
async fn get_metrics_prometheus(State(state): State<Arc<ApiState>>) -> impl IntoResponse {
    (
        StatusCode::OK,
        [(header::CONTENT_TYPE, "text/plain; charset=utf-8")],
        state.metrics.to_prometheus(),
    )
}

/// GET /metrics/json - JSON format metrics
async fn get_metrics_json(State(state): State<Arc<ApiState>>) -> impl IntoResponse {
    Json(state.metrics.to_json())
}
