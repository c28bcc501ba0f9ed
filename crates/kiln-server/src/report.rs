//! Wire mapping for sandbox outcomes
//!
//! Translates each [`Outcome`] variant into the HTTP status and camelCase
//! JSON body the browser frontend expects. A request-level `error` is
//! orthogonal to the `error` field of a completed run, which is just the
//! program's stderr.

use axum::Json;
use axum::http::StatusCode;
use chrono::Utc;
use kiln::{Limits, Outcome, Phase, RunReport, install_hint};
use serde_json::{Value, json};

/// Substituted when a failed compile produced no diagnostics, so `error`
/// is never blank on a failure
const UNKNOWN_COMPILE_ERROR: &str = "Unknown compilation error";

/// A request-level failure body: `{success: false, error}`
pub fn error_body(status: StatusCode, message: impl Into<String>) -> (StatusCode, Json<Value>) {
    (
        status,
        Json(json!({
            "success": false,
            "error": message.into(),
        })),
    )
}

/// Like [`error_body`] but with the empty `output` the frontend renders
pub fn failure_body(status: StatusCode, message: impl Into<String>) -> (StatusCode, Json<Value>) {
    (
        status,
        Json(json!({
            "success": false,
            "error": message.into(),
            "output": "",
        })),
    )
}

/// Map a sandbox outcome to its wire response
pub fn respond(outcome: Outcome, limits: &Limits) -> (StatusCode, Json<Value>) {
    match outcome {
        Outcome::ToolchainMissing => (
            StatusCode::INTERNAL_SERVER_ERROR,
            Json(json!({
                "success": false,
                "error": "C compiler not found. Please install GCC.",
                "output": "",
                "hint": install_hint(),
            })),
        ),

        Outcome::CompileFailed {
            diagnostics,
            elapsed,
        } => {
            let error = if diagnostics.is_empty() {
                UNKNOWN_COMPILE_ERROR.to_owned()
            } else {
                diagnostics
            };
            (
                StatusCode::BAD_REQUEST,
                Json(json!({
                    "success": false,
                    "error": error,
                    "output": "",
                    "compileTime": elapsed.as_secs_f64(),
                })),
            )
        }

        Outcome::TimedOut { phase } => {
            let message = match phase {
                Phase::Compile => format!(
                    "Compilation timeout (max {} seconds)",
                    limits.compile_timeout
                ),
                Phase::Run => format!(
                    "Code execution timeout (max {} seconds)",
                    limits.run_timeout
                ),
            };
            failure_body(StatusCode::REQUEST_TIMEOUT, message)
        }

        Outcome::Completed(report) => completed(report),
    }
}

fn completed(report: RunReport) -> (StatusCode, Json<Value>) {
    (
        StatusCode::OK,
        Json(json!({
            "success": true,
            "output": report.stdout,
            "error": report.stderr,
            "returnCode": report.exit_code,
            "compileTime": report.compile_elapsed.as_secs_f64(),
            "executionTime": report.run_elapsed.as_secs_f64(),
            "timestamp": Utc::now().timestamp_micros() as f64 / 1_000_000.0,
        })),
    )
}
