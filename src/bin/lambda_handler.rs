//! AWS Lambda handler for running projections
//!
//! Accepts `SimulationInputs` as JSON (camelCase fields, any omitted field
//! takes its base-case default) and returns the yearly records and summary
//! metrics.
//!
//! Supports Lambda Function URLs for direct HTTP access.

use aws_lambda_events::event::lambda_function_urls::LambdaFunctionUrlRequest;
use fund_projection::inputs::MAX_SIMULATION_YEARS;
use fund_projection::{ProjectionConfig, ProjectionEngine, ProjectionResult, SimulationInputs};
use lambda_runtime::{run, service_fn, Error, LambdaEvent};
use log::{info, warn};
use serde::Serialize;
use serde_json::{json, Value};

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct ProjectionResponse {
    inputs: SimulationInputs,
    #[serde(flatten)]
    result: ProjectionResult,
    execution_time_ms: u64,
}

fn cors_headers() -> Value {
    json!({
        "Content-Type": "application/json",
        "Access-Control-Allow-Origin": "*",
        "Access-Control-Allow-Methods": "POST, OPTIONS",
        "Access-Control-Allow-Headers": "Content-Type",
    })
}

fn http_response(status: u16, body: String) -> Value {
    json!({
        "statusCode": status,
        "headers": cors_headers(),
        "body": body,
        "isBase64Encoded": false,
    })
}

fn error_response(status: u16, message: &str) -> Value {
    http_response(status, json!({ "error": message }).to_string())
}

/// Handle one Function URL invocation
fn handle(request: &LambdaFunctionUrlRequest, engine: &ProjectionEngine) -> Value {
    respond(
        request.request_context.http.method.as_deref(),
        request.body.as_deref(),
        request.is_base64_encoded,
        engine,
    )
}

/// Build the HTTP response for a request's method and body
fn respond(method: Option<&str>, body: Option<&str>, is_base64_encoded: bool, engine: &ProjectionEngine) -> Value {
    let start = std::time::Instant::now();

    if method == Some("OPTIONS") {
        return http_response(200, String::new());
    }

    if is_base64_encoded {
        return error_response(400, "Base64-encoded bodies are not supported");
    }

    let body = body.filter(|b| !b.trim().is_empty()).unwrap_or("{}");
    let inputs: SimulationInputs = match serde_json::from_str(body) {
        Ok(inputs) => inputs,
        Err(e) => {
            warn!("rejecting request body: {}", e);
            return error_response(400, &format!("Invalid JSON: {}", e));
        }
    };

    let Some(result) = engine.simulate(&inputs) else {
        return error_response(
            422,
            &format!(
                "investmentAmount must be greater than zero and simulationYears at most {}",
                MAX_SIMULATION_YEARS
            ),
        );
    };

    let response = ProjectionResponse {
        inputs,
        result,
        execution_time_ms: start.elapsed().as_millis() as u64,
    };

    match serde_json::to_string(&response) {
        Ok(body) => http_response(200, body),
        Err(e) => error_response(500, &format!("Failed to serialize response: {}", e)),
    }
}

#[tokio::main]
async fn main() -> Result<(), Error> {
    env_logger::init();

    let config = ProjectionConfig::from_env()?;
    info!("starting projection handler with {:?}", config);
    let engine = ProjectionEngine::new(config);

    run(service_fn(move |event: LambdaEvent<LambdaFunctionUrlRequest>| {
        let engine = engine.clone();
        async move { Ok::<Value, Error>(handle(&event.payload, &engine)) }
    }))
    .await
}
