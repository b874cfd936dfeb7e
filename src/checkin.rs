// Check-in plane binary entry point: the device-facing registration and
// telemetry API

// Shared plane modules
mod config;
mod repo;

// Check-in plane modules
#[path = "checkin/error.rs"]
mod error;

#[path = "checkin/router.rs"]
mod router;

#[path = "checkin/handlers/mod.rs"]
mod handlers;

use lambda_http::{run, service_fn, Body, Error, Request, RequestExt, Response};
use tracing::{error, info};

use config::Config;
use repo::fleet::DynamoFleetStore;
use blinky_backend::{RandomIdGenerator, SystemClock};

async fn function_handler(event: Request) -> Result<Response<Body>, Error> {
    // Extract request ID from Lambda context
    let request_id = event.lambda_context().request_id.clone();

    info!(
        request_id = %request_id,
        method = %event.method(),
        path = %event.uri().path(),
        "Check-in Lambda invoked"
    );

    // For health check, we don't need config
    if event.method() == lambda_http::http::Method::GET
        && (event.uri().path() == "/health" || event.uri().path() == "/health/")
    {
        return match router::route_request_health(&request_id) {
            Ok(response) => Ok(response),
            Err(api_error) => {
                error!(
                    request_id = %request_id,
                    error = %api_error,
                    "Health check failed"
                );
                Ok(api_error.to_http_response(&request_id))
            }
        };
    }

    // Initialize configuration for other endpoints
    let config = match Config::from_env().await {
        Ok(config) => config,
        Err(e) => {
            error!(
                request_id = %request_id,
                error = %e,
                "Failed to load configuration"
            );
            return Ok(
                error::ApiError::Internal(format!("Configuration error: {}", e))
                    .to_http_response(&request_id),
            );
        }
    };

    let store = DynamoFleetStore::new(&config);
    let clock = SystemClock::new();
    let id_generator = RandomIdGenerator::new();

    // Route the request and handle any errors
    match router::route_request(event, &request_id, &store, &clock, &id_generator).await {
        Ok(response) => {
            info!(
                request_id = %request_id,
                status = %response.status(),
                "Request completed successfully"
            );
            Ok(response)
        }
        Err(api_error) => {
            error!(
                request_id = %request_id,
                error = %api_error,
                "Request failed"
            );
            Ok(api_error.to_http_response(&request_id))
        }
    }
}

#[tokio::main]
async fn main() -> Result<(), Error> {
    tracing_subscriber::fmt()
        .with_max_level(tracing::Level::INFO)
        .with_target(false)
        .without_time()
        .init();

    info!("Check-in Lambda starting");

    run(service_fn(function_handler)).await
}
