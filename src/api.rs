use axum::{
    body::Body,
    extract::{rejection::JsonRejection, DefaultBodyLimit, Extension, State},
    http::{header, HeaderName, Method, Request, StatusCode},
    middleware::{self, Next},
    response::{IntoResponse, Response},
    routing::{get, post},
    Json, Router,
};
use serde::{Deserialize, Serialize};
use tower_http::cors::{Any, CorsLayer};
use uuid::Uuid;

use crate::error::PipelineError;
use crate::pipeline::{Orchestrator, MISSING_FIELDS_MESSAGE};
use crate::types::RequestInput;

pub const GENERATE_PATH: &str = "/api/generate-product-copy";
pub const INFO_PATH: &str = "/api/info";

/// Room for `MAX_IMAGES` high-detail photos as base64 data URIs.
pub const MAX_BODY_BYTES: usize = 25 * 1024 * 1024;
pub const BODY_TOO_LARGE_MESSAGE: &str = "Request body too large";

#[derive(Debug, Serialize, Deserialize)]
struct ErrorResponse {
    error: String,
}

#[derive(Debug, Serialize, Deserialize)]
struct InfoResponse {
    info: String,
}

#[derive(Clone, Debug)]
struct RequestContext {
    request_id: String,
}

pub fn router(orchestrator: Orchestrator) -> Router {
    let request_id_layer = middleware::from_fn(assign_request_id);
    Router::new()
        .route(
            GENERATE_PATH,
            post(generate_product_copy).options(preflight),
        )
        .route(INFO_PATH, get(info))
        .with_state(orchestrator)
        .layer(DefaultBodyLimit::max(MAX_BODY_BYTES))
        .layer(request_id_layer)
        .layer(cors_layer())
}

/// Any origin may call the service; preflight requests get an empty 200.
fn cors_layer() -> CorsLayer {
    CorsLayer::new()
        .allow_origin(Any)
        .allow_methods([Method::GET, Method::POST, Method::OPTIONS])
        .allow_headers([
            header::AUTHORIZATION,
            header::CONTENT_TYPE,
            HeaderName::from_static("x-client-info"),
            HeaderName::from_static("apikey"),
        ])
}

async fn generate_product_copy(
    State(orchestrator): State<Orchestrator>,
    Extension(request): Extension<RequestContext>,
    payload: Result<Json<RequestInput>, JsonRejection>,
) -> Response {
    let input = match payload {
        Ok(Json(input)) => input,
        Err(rejection) => {
            if rejection.status() == StatusCode::PAYLOAD_TOO_LARGE {
                tracing::warn!(
                    request_id = %request.request_id,
                    limit = MAX_BODY_BYTES,
                    "Rejected oversized request body"
                );
                return error_response(StatusCode::PAYLOAD_TOO_LARGE, BODY_TOO_LARGE_MESSAGE);
            }
            tracing::debug!(
                request_id = %request.request_id,
                error = %rejection,
                "Rejected malformed request body"
            );
            return error_response(StatusCode::BAD_REQUEST, MISSING_FIELDS_MESSAGE);
        }
    };

    tracing::info!(
        request_id = %request.request_id,
        title = %input.title,
        category = ?input.category,
        is_collectable = input.is_collectable,
        image_count = input.images.len(),
        "Received listing request"
    );

    match orchestrator.run(&input).await {
        Ok(result) => {
            tracing::debug!(
                request_id = %request.request_id,
                nav_path = %result.generated_content.nav_path,
                "Listing request completed"
            );
            (StatusCode::OK, Json(result)).into_response()
        }
        Err(err) => pipeline_error_response(&err),
    }
}

/// OPTIONS without CORS request headers never reaches the CORS layer's
/// preflight handling; answer it with an empty 200 as well.
async fn preflight() -> StatusCode {
    StatusCode::OK
}

async fn info() -> Response {
    (
        StatusCode::OK,
        Json(InfoResponse {
            info: crate::system_info::get_system_info(),
        }),
    )
        .into_response()
}

async fn assign_request_id(mut req: Request<Body>, next: Next) -> Response {
    let request_id = Uuid::new_v4().to_string();
    req.extensions_mut().insert(RequestContext {
        request_id: request_id.clone(),
    });
    let method = req.method().clone();
    let uri = req.uri().clone();
    let mut response = next.run(req).await;
    let status = response.status();
    if let Ok(value) = request_id.parse() {
        response
            .headers_mut()
            .insert(HeaderName::from_static("x-request-id"), value);
    }
    tracing::debug!(
        request_id,
        method = %method,
        uri = %uri,
        status = %status,
        "API request completed"
    );
    response
}

fn pipeline_error_response(err: &PipelineError) -> Response {
    let status = if err.is_client_error() {
        StatusCode::BAD_REQUEST
    } else {
        StatusCode::INTERNAL_SERVER_ERROR
    };
    error_response(status, &err.to_string())
}

fn error_response(status: StatusCode, message: &str) -> Response {
    (
        status,
        Json(ErrorResponse {
            error: message.to_string(),
        }),
    )
        .into_response()
}
