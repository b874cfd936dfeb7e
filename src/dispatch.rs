use chrono::DateTime;
use lambda_http::http::Method;
use lambda_http::{Body, Request, Response};
use tracing::{error, info, warn};

use crate::dialogflow::{WebhookRequest, WebhookResponse};
use crate::error::WebhookError;
use blinky_backend::shared::domain::{DeviceStatus, FanoutOutcome, FanoutReport};
use blinky_backend::shared::fanout::set_fleet_enabled;
use blinky_backend::shared::resolver::{device_roster, resolve_device};
use blinky_backend::shared::store::{DeviceStore, PolicyStore, StoreError};

/// Spoken when a core operation fails. The interaction is always answered,
/// even when the registry is unreachable.
const APOLOGY_SPEECH: &str =
    "I'm sorry, something went wrong while talking to the device registry. Please try again.";

/// Route a health check request (no store needed)
pub fn route_request_health(request_id: &str) -> Result<Response<Body>, WebhookError> {
    handle_health(request_id)
}

/// Route an incoming request to the appropriate handler
///
/// The fulfillment endpoint is a single POST route; everything else is a
/// health check or a 404.
pub async fn route_request<S>(
    event: Request,
    request_id: &str,
    store: &S,
) -> Result<Response<Body>, WebhookError>
where
    S: DeviceStore + PolicyStore,
{
    let method = event.method().clone();
    let path = normalize_path(event.uri().path());

    info!(
        request_id = %request_id,
        method = %method,
        path = %path,
        "Routing request"
    );

    match (&method, path.as_str()) {
        (&Method::GET, "/health") => handle_health(request_id),

        (&Method::POST, "/" | "/webhook") => handle_webhook(event, request_id, store).await,

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

/// Handle the Dialogflow fulfillment request.
///
/// Malformed platform JSON is the only HTTP-level failure; once an intent is
/// recognized, every outcome (including storage failure) is rendered as
/// fulfillment text so the user always hears a response.
pub async fn handle_webhook<S>(
    event: Request,
    request_id: &str,
    store: &S,
) -> Result<Response<Body>, WebhookError>
where
    S: DeviceStore + PolicyStore,
{
    let body_bytes = match event.body() {
        Body::Text(text) => text.as_bytes(),
        Body::Binary(bytes) => bytes.as_slice(),
        Body::Empty => {
            return Err(WebhookError::BadRequest("Request body is empty".to_string()));
        }
    };

    let request: WebhookRequest = serde_json::from_slice(body_bytes).map_err(|e| {
        warn!(request_id = %request_id, error = %e, "Failed to parse webhook body");
        WebhookError::BadRequest(format!("Invalid JSON: {}", e))
    })?;

    let intent = request.query_result.intent.display_name.clone();

    info!(
        request_id = %request_id,
        intent = %intent,
        query = request.query_result.query_text.as_deref().unwrap_or("-"),
        session = request.session.as_deref().unwrap_or("-"),
        "Dispatching intent"
    );

    let speech = match dispatch_intent(store, &request, request_id).await {
        Ok(speech) => speech,
        Err(e) => {
            error!(
                request_id = %request_id,
                intent = %intent,
                error = %e,
                "Intent handling failed"
            );
            APOLOGY_SPEECH.to_string()
        }
    };

    let body = serde_json::to_string(&WebhookResponse::speech(speech))
        .map_err(|e| WebhookError::Internal(format!("Failed to serialize response: {}", e)))?;

    Response::builder()
        .status(200)
        .header("content-type", "application/json")
        .body(Body::from(body))
        .map_err(|e| WebhookError::Internal(format!("Failed to build response: {}", e)))
}

/// Invoke the core operation for a recognized intent and render its result
/// as fulfillment text.
pub async fn dispatch_intent<S>(
    store: &S,
    request: &WebhookRequest,
    request_id: &str,
) -> Result<String, StoreError>
where
    S: DeviceStore + PolicyStore,
{
    match request.query_result.intent.display_name.as_str() {
        // Dummy intent for testing
        "Try me" => {
            info!(request_id = %request_id, "Try me intent invoked");
            Ok("You wanted to try me. Okay then.".to_string())
        }

        "Enable all" => {
            let report = set_fleet_enabled(store, true).await?;
            Ok(render_fanout(&report, "enabled"))
        }

        "Disable all" => {
            let report = set_fleet_enabled(store, false).await?;
            Ok(render_fanout(&report, "disabled"))
        }

        "List devices" => {
            let configs = store.list_configs().await?;
            Ok(render_roster(&device_roster(&configs)))
        }

        "Describe" => {
            let Some(device_name) = request.query_result.string_parameter("deviceName") else {
                return Ok("Which device would you like me to describe?".to_string());
            };

            match resolve_device(store, device_name).await? {
                blinky_backend::ResolveOutcome::Found(status) => Ok(render_status(&status)),
                blinky_backend::ResolveOutcome::NotFound { known_names } => {
                    Ok(render_not_found(device_name, &known_names))
                }
            }
        }

        other => {
            warn!(request_id = %request_id, intent = %other, "Unrecognized intent");
            Ok(
                "I'm not sure how to help with that. I can enable, disable, list, or describe \
                 your Blinky devices."
                    .to_string(),
            )
        }
    }
}

/// Render a fan-out report. `state_word` is "enabled" or "disabled".
///
/// Partial and total per-device failure are reported distinctly; the policy
/// write has already succeeded in every case that reaches here.
fn render_fanout(report: &FanoutReport, state_word: &str) -> String {
    match report.outcome() {
        FanoutOutcome::Complete => {
            format!("Okay, all Blinky devices have been {}.", state_word)
        }
        FanoutOutcome::Partial => {
            let failed: Vec<&str> = report
                .failures
                .iter()
                .map(|f| f.device_id.as_str())
                .collect();
            format!(
                "The fleet-wide setting is now {}, but only {} of {} Blinky devices were \
                 updated. These devices failed: {}.",
                state_word,
                report.updated.len(),
                report.attempted,
                failed.join(", ")
            )
        }
        FanoutOutcome::Failed => {
            format!(
                "The fleet-wide setting is now {}, but none of the {} Blinky devices could \
                 be updated.",
                state_word, report.attempted
            )
        }
    }
}

/// Render the device roster as one sentence.
fn render_roster(labels: &[String]) -> String {
    if labels.is_empty() {
        return "I don't know about any Blinky devices yet.".to_string();
    }

    format!(
        "Here are the Blinky devices that I know about: {}.",
        labels.join(", ")
    )
}

/// Render a resolved device's status, including the check-in instant.
fn render_status(status: &DeviceStatus) -> String {
    let checked_in = match DateTime::from_timestamp_millis(status.checked_in_at_ms) {
        Some(instant) => format!(
            "on {} at {}",
            instant.format("%a %b %-d %Y"),
            instant.format("%H:%M:%S UTC")
        ),
        None => "at an unknown time".to_string(),
    };

    let enabled = if status.enabled {
        "This device is enabled."
    } else {
        "This device is not enabled."
    };

    format!(
        "Here is the configuration for {name}. {name} last checked in {checked_in}. \
         {name} has a MAC address of {mac} and an IP address of {ip}. Its current RSSI \
         value is {rssi} dBm. {enabled} Its current mode is {mode}.",
        name = status.name,
        checked_in = checked_in,
        mac = status.mac,
        ip = status.ip,
        rssi = status.rssi,
        enabled = enabled,
        mode = status.mode,
    )
}

/// Render the not-found outcome with the known-name list.
fn render_not_found(query: &str, known_names: &[String]) -> String {
    if known_names.is_empty() {
        return format!(
            "I'm sorry, but I don't know about the device named {}, and I don't know about \
             any devices yet.",
            query
        );
    }

    format!(
        "I'm sorry, but I don't know about the device named {}. Here is the list of devices \
         I know about: {}.",
        query,
        known_names.join(", ")
    )
}

/// Handle health check requests
fn handle_health(request_id: &str) -> Result<Response<Body>, WebhookError> {
    let body = serde_json::json!({
        "status": "healthy",
        "service": "webhook",
        "request_id": request_id
    });

    Response::builder()
        .status(200)
        .header("content-type", "application/json")
        .body(Body::from(body.to_string()))
        .map_err(|e| WebhookError::Internal(format!("Failed to build response: {}", e)))
}

/// Handle 404 Not Found responses
fn handle_not_found(
    request_id: &str,
    method: &Method,
    path: &str,
) -> Result<Response<Body>, WebhookError> {
    let body = serde_json::json!({
        "error": "NOT_FOUND",
        "message": format!("Route {} {} not found", method, path),
        "request_id": request_id
    });

    Response::builder()
        .status(404)
        .header("content-type", "application/json")
        .body(Body::from(body.to_string()))
        .map_err(|e| WebhookError::Internal(format!("Failed to build response: {}", e)))
}
