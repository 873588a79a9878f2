use anyhow::Context;
use axum::{
    extract::State,
    http::StatusCode,
    response::{IntoResponse, Response},
    routing::{get, post},
    Json, Router,
};
use cutlist_core::{
    calculate_materials, validate_section_dimensions, CalculationError, CalculationResult,
    Catalogue, DimensionIssue, PieceRequirement, SectionType, StockBreakdown, StockOptimizer,
    StockOption, UnitMode, WindowInput,
};
use serde::{Deserialize, Serialize};
use serde_json::json;
use std::collections::BTreeMap;
use std::sync::Arc;
use tower_http::cors::CorsLayer;
use tracing::{error, info};
use tracing_subscriber::EnvFilter;

const DEFAULT_BIND: &str = "0.0.0.0:3000";

#[derive(Clone)]
struct AppState {
    catalogue: Arc<Catalogue>,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Initialize tracing
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .init();

    info!("Starting Cutlist API");

    let catalogue = match std::env::var("CUTLIST_CATALOGUE") {
        Ok(path) => {
            let content = std::fs::read_to_string(&path)
                .with_context(|| format!("Failed to read catalogue {}", path))?;
            info!("Loaded catalogue from {}", path);
            Catalogue::from_json(&content)?
        }
        Err(_) => Catalogue::domal_27mm(),
    };

    let app = build_router(AppState {
        catalogue: Arc::new(catalogue),
    });

    let bind = std::env::var("CUTLIST_BIND").unwrap_or_else(|_| DEFAULT_BIND.to_string());
    let listener = tokio::net::TcpListener::bind(&bind)
        .await
        .with_context(|| format!("Failed to bind to {}", bind))?;

    info!("API server listening on http://{}", bind);
    info!("Try: curl http://localhost:3000/api/health");

    axum::serve(listener, app).await.context("Server error")?;
    Ok(())
}

fn build_router(state: AppState) -> Router {
    Router::new()
        .route("/api/health", get(health_check))
        .route("/api/sections", get(list_sections))
        .route("/api/calculate", post(calculate))
        .route("/api/validate", post(validate))
        .route("/api/optimize", post(optimize))
        .layer(CorsLayer::permissive())
        .with_state(state)
}

/// Health check endpoint
async fn health_check() -> Json<serde_json::Value> {
    Json(json!({
        "status": "healthy",
        "service": "cutlist-api",
        "version": env!("CARGO_PKG_VERSION"),
    }))
}

/// Active section types of the loaded catalogue
async fn list_sections(State(state): State<AppState>) -> Json<Vec<SectionType>> {
    Json(state.catalogue.active_section_types().cloned().collect())
}

/// Main calculation endpoint
async fn calculate(
    State(state): State<AppState>,
    Json(input): Json<WindowInput>,
) -> Result<Json<CalculationResult>, AppError> {
    info!("Received calculation request with {} sections", input.sections.len());

    let result = calculate_materials(&input, state.catalogue.as_ref())?;

    info!(
        "Calculation complete: {} sections, {:.2}% wastage",
        result.section_results.len(),
        result.combined_summary.wastage_percent
    );

    Ok(Json(result))
}

#[derive(Debug, Serialize, Deserialize)]
struct ValidateResponse {
    valid: bool,
    /// Rejected rows by section id, in input order
    sections: BTreeMap<String, Vec<DimensionIssue>>,
}

async fn validate(Json(input): Json<WindowInput>) -> Json<ValidateResponse> {
    let sections: BTreeMap<_, _> = input
        .sections
        .iter()
        .filter_map(|section| {
            let validation = validate_section_dimensions(&section.dimensions, UnitMode::Millimeters);
            (!validation.is_valid).then(|| (section.id.clone(), validation.errors))
        })
        .collect();

    Json(ValidateResponse {
        valid: sections.is_empty(),
        sections,
    })
}

#[derive(Debug, Deserialize)]
struct OptimizeRequest {
    stock_options: Vec<StockOption>,
    pieces: Vec<PieceRequirement>,
}

/// Raw combined optimization over arbitrary pieces
async fn optimize(Json(request): Json<OptimizeRequest>) -> Result<Json<StockBreakdown>, AppError> {
    info!(
        "Received optimization request with {} piece types and {} stock sizes",
        request.pieces.len(),
        request.stock_options.len()
    );

    let optimizer = StockOptimizer::new(request.stock_options)?;
    let breakdown = optimizer.optimize_combined(&request.pieces)?;

    info!(
        "Optimization complete: {} bars, {:.2}% wastage",
        breakdown.stocks_needed, breakdown.wastage_percent
    );

    Ok(Json(breakdown))
}

/// Application error type
struct AppError(anyhow::Error);

impl From<CalculationError> for AppError {
    fn from(err: CalculationError) -> Self {
        AppError(err.into())
    }
}

impl From<anyhow::Error> for AppError {
    fn from(err: anyhow::Error) -> Self {
        AppError(err)
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        error!("Request error: {}", self.0);

        let status = if self.0.downcast_ref::<CalculationError>().is_some() {
            StatusCode::BAD_REQUEST
        } else {
            StatusCode::INTERNAL_SERVER_ERROR
        };

        (
            status,
            Json(json!({
                "error": self.0.to_string(),
            })),
        )
            .into_response()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::body::{to_bytes, Body};
    use axum::http::Request;
    use serde_json::Value;
    use tower::ServiceExt;

    fn app() -> Router {
        build_router(AppState {
            catalogue: Arc::new(Catalogue::domal_27mm()),
        })
    }

    async fn send(method: &str, uri: &str, body: Option<Value>) -> (StatusCode, Value) {
        let request = Request::builder().method(method).uri(uri);
        let request = match body {
            Some(body) => request
                .header("content-type", "application/json")
                .body(Body::from(body.to_string())),
            None => request.body(Body::empty()),
        }
        .unwrap();

        let response = app().oneshot(request).await.unwrap();
        let status = response.status();
        let bytes = to_bytes(response.into_body(), usize::MAX).await.unwrap();
        (status, serde_json::from_slice(&bytes).unwrap())
    }

    fn window_input(height: Option<f64>) -> Value {
        json!({
            "sections": [{
                "id": "s1",
                "name": "Bedroom",
                "section_type_id": "27mm-domal",
                "track_type": "2-track",
                "configuration": "all-glass",
                "dimensions": [{ "id": "d1", "height": height, "width": 1000.0, "quantity": 1 }]
            }]
        })
    }

    #[tokio::test]
    async fn test_health() {
        let (status, body) = send("GET", "/api/health", None).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["status"], "healthy");
        assert_eq!(body["service"], "cutlist-api");
    }

    #[tokio::test]
    async fn test_sections() {
        let (status, body) = send("GET", "/api/sections", None).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body[0]["id"], "27mm-domal");
        assert_eq!(body[0]["configurations"].as_array().unwrap().len(), 4);
    }

    #[tokio::test]
    async fn test_calculate() {
        let (status, body) = send("POST", "/api/calculate", Some(window_input(Some(1000.0)))).await;
        assert_eq!(status, StatusCode::OK);

        let materials = &body["section_results"][0]["materials"];
        assert_eq!(materials[0]["component"], "Frame (Combined)");
        assert_eq!(materials[0]["total_required"], 4000.0);
        assert_eq!(body["input"]["sections"][0]["id"], "s1");
    }

    #[tokio::test]
    async fn test_validate() {
        let (status, body) = send("POST", "/api/validate", Some(window_input(Some(100.0)))).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["valid"], false);
        assert_eq!(body["sections"]["s1"][0]["dimension_id"], "d1");
        assert_eq!(
            body["sections"]["s1"][0]["errors"]["height"],
            "Height must be between 300mm and 3000mm"
        );

        let (_, body) = send("POST", "/api/validate", Some(window_input(Some(1000.0)))).await;
        assert_eq!(body["valid"], true);
    }

    #[tokio::test]
    async fn test_optimize() {
        let request = json!({
            "stock_options": [{ "length": 4877.0, "length_feet": 16.0, "name": "16ft" }],
            "pieces": [
                { "length": 3000.0, "count": 1, "kind": { "group": "frame", "subtype": "width", "length": 3000.0 } },
                { "length": 1877.0, "count": 1, "kind": { "group": "frame", "subtype": "height", "length": 1877.0 } }
            ]
        });
        let (status, body) = send("POST", "/api/optimize", Some(request)).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["stocks_needed"], 1);
        assert_eq!(body["total_wastage"], 0.0);
        assert_eq!(body["piece_breakdown"]["width-3000"], 1);
    }

    #[tokio::test]
    async fn test_optimize_empty_catalogue_is_bad_request() {
        let request = json!({ "stock_options": [], "pieces": [] });
        let (status, body) = send("POST", "/api/optimize", Some(request)).await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert_eq!(body["error"], "Stock catalogue is empty");
    }
}
