use lambda_http::http::Method;
use lambda_http::{Body, Request, Response};
use tracing::{info, warn};

use crate::error::ApiError;
use crate::handlers::register::handle_register;
use crate::handlers::report::handle_checkin;
use crate::repo::fleet::DynamoFleetStore;
use blinky_backend::{Clock, IdGenerator};

/// Route a health check request (no store needed)
pub fn route_request_health(request_id: &str) -> Result<Response<Body>, ApiError> {
    handle_health(request_id)
}

/// Route an incoming request to the appropriate handler
///
/// Path-based routing for the device-facing API: normalizes trailing
/// slashes, matches on (method, path) tuples, 404s everything else.
pub async fn route_request(
    event: Request,
    request_id: &str,
    store: &DynamoFleetStore,
    clock: &dyn Clock,
    id_generator: &dyn IdGenerator,
) -> Result<Response<Body>, ApiError> {
    let method = event.method().clone();
    let path = normalize_path(event.uri().path());

    info!(
        request_id = %request_id,
        method = %method,
        path = %path,
        "Routing request"
    );

    match (&method, path.as_str()) {
        // Health check endpoint
        (&Method::GET, "/health") => handle_health(request_id),

        // Device registration endpoint
        (&Method::POST, "/register") => {
            handle_register(event, request_id, store, clock, id_generator).await
        }

        // Periodic telemetry endpoint
        (&Method::POST, "/checkin") => handle_checkin(event, request_id, store, clock).await,

        // Unknown route - return 404
        _ => {
            warn!(
                request_id = %request_id,
                method = %method,
                path = %path,
                "Unknown route"
            );
            handle_not_found(request_id, &method, &path)
        }
    }
}

/// Normalize a path by removing trailing slashes. The root path "/" is
/// preserved as-is.
fn normalize_path(path: &str) -> String {
    if path == "/" {
        return path.to_string();
    }

    path.trim_end_matches('/').to_string()
}

/// Handle health check requests
fn handle_health(request_id: &str) -> Result<Response<Body>, ApiError> {
    let body = serde_json::json!({
        "status": "healthy",
        "service": "checkin",
        "request_id": request_id
    });

    Response::builder()
        .status(200)
        .header("content-type", "application/json")
        .body(Body::from(body.to_string()))
        .map_err(|e| ApiError::Internal(format!("Failed to build response: {}", e)))
}

/// Handle 404 Not Found responses
fn handle_not_found(
    request_id: &str,
    method: &Method,
    path: &str,
) -> Result<Response<Body>, ApiError> {
    let body = serde_json::json!({
        "error": "NOT_FOUND",
        "message": format!("Route {} {} not found", method, path),
        "request_id": request_id
    });

    Response::builder()
        .status(404)
        .header("content-type", "application/json")
        .body(Body::from(body.to_string()))
        .map_err(|e| ApiError::Internal(format!("Failed to build response: {}", e)))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_normalize_path_root() {
        assert_eq!(normalize_path("/"), "/");
    }

    #[test]
    fn test_normalize_path_no_trailing_slash() {
        assert_eq!(normalize_path("/register"), "/register");
        assert_eq!(normalize_path("/checkin"), "/checkin");
        assert_eq!(normalize_path("/health"), "/health");
    }

    #[test]
    fn test_normalize_path_with_trailing_slash() {
        assert_eq!(normalize_path("/register/"), "/register");
        assert_eq!(normalize_path("/checkin//"), "/checkin");
    }

    #[tokio::test]
    async fn test_handle_health() {
        let response = handle_health("test-req-123").unwrap();

        assert_eq!(response.status(), 200);
        assert_eq!(
            response.headers().get("content-type").unwrap(),
            "application/json"
        );

        let body = match response.body() {
            Body::Text(text) => text.clone(),
            _ => panic!("Expected text body"),
        };

        assert!(body.contains("healthy"));
        assert!(body.contains("test-req-123"));
        assert!(body.contains("checkin"));
    }

    #[tokio::test]
    async fn test_handle_not_found() {
        let response = handle_not_found("test-req-789", &Method::GET, "/unknown").unwrap();

        assert_eq!(response.status(), 404);

        let body = match response.body() {
            Body::Text(text) => text.clone(),
            _ => panic!("Expected text body"),
        };

        assert!(body.contains("NOT_FOUND"));
        assert!(body.contains("GET /unknown"));
        assert!(body.contains("test-req-789"));
    }
}
