//! Task-stage endpoints.
//!
//! These are the four endpoints the dispatcher routes subtasks to. Fetch
//! is real: it forwards the reporting parameters to the Power Automate
//! flow and requires a `records` array back. The remaining stages are
//! stubs that acknowledge the payload.

use std::sync::Arc;

use axum::{
    extract::State,
    http::StatusCode,
    response::{IntoResponse, Json, Response},
};
use serde::Deserialize;
use serde_json::Value;

use super::routes::{AppState, ErrorResponse};

#[derive(Debug, Deserialize)]
pub(super) struct FetchDataRequest {
    #[serde(default)]
    quarter: Option<String>,
    #[serde(default)]
    year: Option<String>,
}

/// Fetch Salesforce records for a quarter/year from the downstream flow.
pub(super) async fn fetch_salesforce_data(
    State(state): State<Arc<AppState>>,
    Json(request): Json<FetchDataRequest>,
) -> Response {
    tracing::info!("Fetching Salesforce data");

    let (Some(quarter), Some(year)) = (request.quarter, request.year) else {
        return (
            StatusCode::BAD_REQUEST,
            Json(ErrorResponse {
                error: "Quarter and Year are required.".to_string(),
            }),
        )
            .into_response();
    };

    let result = fetch_records(&state, &quarter, &year).await;
    match result {
        Ok(data) => Json(serde_json::json!({ "success": true, "data": data })).into_response(),
        Err(e) => {
            tracing::error!("Error fetching Salesforce data: {}", e);
            (
                StatusCode::INTERNAL_SERVER_ERROR,
                Json(ErrorResponse {
                    error: "Failed to fetch Salesforce data.".to_string(),
                }),
            )
                .into_response()
        }
    }
}

/// Call the Power Automate flow and validate the response shape.
async fn fetch_records(state: &AppState, quarter: &str, year: &str) -> anyhow::Result<Value> {
    let response = state
        .http
        .post(&state.config.power_automate_url)
        .json(&serde_json::json!({ "quarter": quarter, "year": year }))
        .send()
        .await?
        .error_for_status()?;

    let data: Value = response.json().await?;
    if !data
        .get("records")
        .map(Value::is_array)
        .unwrap_or(false)
    {
        anyhow::bail!("Invalid response format from Power Automate");
    }

    Ok(data)
}

/// Stub: final data processing stage.
pub(super) async fn process_data(Json(payload): Json<Value>) -> Json<Value> {
    tracing::info!(task = %payload, "Processing final data");
    Json(serde_json::json!({
        "success": true,
        "message": "Data processing completed successfully"
    }))
}

/// Stub: analysis stage.
pub(super) async fn analyze_data(Json(payload): Json<Value>) -> Json<Value> {
    tracing::info!(task = %payload, "Analyzing data");
    Json(serde_json::json!({
        "success": true,
        "message": "Data analyzed successfully"
    }))
}

/// Stub: report generation stage.
pub(super) async fn generate_report(Json(payload): Json<Value>) -> Json<Value> {
    tracing::info!(task = %payload, "Generating report");
    Json(serde_json::json!({
        "success": true,
        "message": "Report generated successfully"
    }))
}

#[cfg(test)]
mod tests {
    use super::*;
    use wiremock::matchers::{body_partial_json, method};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    use crate::config::Config;
    use crate::llm::testing::ScriptedClient;
    use crate::orchestrator::TaskEndpoints;

    fn state_with_flow(url: &str) -> Arc<AppState> {
        Arc::new(AppState::new(
            Config {
                host: "127.0.0.1".to_string(),
                port: 0,
                openai_api_key: "sk-test".to_string(),
                openai_model: "gpt-4".to_string(),
                power_automate_url: url.to_string(),
            },
            std::sync::Arc::new(ScriptedClient::new(Vec::new())),
            TaskEndpoints::for_base_url("http://localhost:1"),
        ))
    }

    #[tokio::test]
    async fn fetch_requires_quarter_and_year() {
        let state = state_with_flow("http://localhost:1/flow");
        let response = fetch_salesforce_data(
            State(state),
            Json(FetchDataRequest {
                quarter: Some("Q3".into()),
                year: None,
            }),
        )
        .await;
        assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    }

    #[tokio::test]
    async fn fetch_forwards_params_and_returns_records() {
        let flow = MockServer::start().await;
        Mock::given(method("POST"))
            .and(body_partial_json(
                serde_json::json!({"quarter": "Q3", "year": "2024"}),
            ))
            .respond_with(ResponseTemplate::new(200).set_body_json(
                serde_json::json!({"records": [{"opportunity": "Acme", "amount": 120000}]}),
            ))
            .expect(1)
            .mount(&flow)
            .await;

        let state = state_with_flow(&flow.uri());
        let response = fetch_salesforce_data(
            State(state),
            Json(FetchDataRequest {
                quarter: Some("Q3".into()),
                year: Some("2024".into()),
            }),
        )
        .await;

        assert_eq!(response.status(), StatusCode::OK);
    }

    #[tokio::test]
    async fn fetch_rejects_responses_without_records() {
        let flow = MockServer::start().await;
        Mock::given(method("POST"))
            .respond_with(
                ResponseTemplate::new(200).set_body_json(serde_json::json!({"rows": []})),
            )
            .mount(&flow)
            .await;

        let state = state_with_flow(&flow.uri());
        let response = fetch_salesforce_data(
            State(state),
            Json(FetchDataRequest {
                quarter: Some("Q3".into()),
                year: Some("2024".into()),
            }),
        )
        .await;

        assert_eq!(response.status(), StatusCode::INTERNAL_SERVER_ERROR);
    }

    #[tokio::test]
    async fn fetch_downstream_failure_is_a_500() {
        let state = state_with_flow("http://127.0.0.1:1/flow");
        let response = fetch_salesforce_data(
            State(state),
            Json(FetchDataRequest {
                quarter: Some("Q3".into()),
                year: Some("2024".into()),
            }),
        )
        .await;

        assert_eq!(response.status(), StatusCode::INTERNAL_SERVER_ERROR);
    }

    #[tokio::test]
    async fn stub_stages_acknowledge_the_payload() {
        let Json(body) = process_data(Json(serde_json::json!({"taskId": "task-2"}))).await;
        assert_eq!(body["success"], true);
        assert_eq!(body["message"], "Data processing completed successfully");

        let Json(body) = analyze_data(Json(serde_json::json!({"taskId": "task-3"}))).await;
        assert_eq!(body["message"], "Data analyzed successfully");

        let Json(body) = generate_report(Json(serde_json::json!({"taskId": "task-4"}))).await;
        assert_eq!(body["message"], "Report generated successfully");
    }
}
