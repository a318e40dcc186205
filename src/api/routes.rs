//! HTTP route handlers.

use std::sync::Arc;

use axum::{
    extract::State,
    http::StatusCode,
    response::{IntoResponse, Json, Response},
    routing::{get, post},
    Router,
};
use serde::{Deserialize, Serialize};
use tower_http::cors::CorsLayer;
use tower_http::trace::TraceLayer;

use crate::config::Config;
use crate::llm::{CompletionClient, OpenAiClient};
use crate::orchestrator::{GoalExecutor, TaskEndpoints};

use super::tasks;

/// Shared application state.
pub struct AppState {
    pub config: Config,
    /// The orchestration pipeline behind `/execute-goal`.
    pub executor: GoalExecutor,
    /// Shared HTTP client for downstream calls.
    pub http: reqwest::Client,
}

impl AppState {
    /// Build state from a configuration plus an injected completion client
    /// and endpoint registry. Tests substitute fakes for both.
    pub fn new(
        config: Config,
        completion: Arc<dyn CompletionClient>,
        endpoints: TaskEndpoints,
    ) -> Self {
        let http = reqwest::Client::new();
        let executor = GoalExecutor::new(completion, http.clone(), endpoints);
        Self {
            config,
            executor,
            http,
        }
    }
}

/// Start the HTTP server.
pub async fn serve(config: Config) -> anyhow::Result<()> {
    let completion: Arc<dyn CompletionClient> = Arc::new(OpenAiClient::new(
        config.openai_api_key.clone(),
        config.openai_model.clone(),
    ));

    // Task endpoints live on this same server.
    let endpoints = TaskEndpoints::for_base_url(&format!("http://localhost:{}", config.port));

    let addr = format!("{}:{}", config.host, config.port);
    let state = Arc::new(AppState::new(config, completion, endpoints));
    let app = router(state);

    let listener = tokio::net::TcpListener::bind(&addr).await?;
    tracing::info!("Server listening on {}", addr);

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    Ok(())
}

/// Build the application router.
pub fn router(state: Arc<AppState>) -> Router {
    Router::new()
        .route("/api/health", get(health))
        .route("/execute-goal", post(execute_goal))
        .route("/fetch-salesforce-data", post(tasks::fetch_salesforce_data))
        .route("/process-data", post(tasks::process_data))
        .route("/analyze-data", post(tasks::analyze_data))
        .route("/generate-report", post(tasks::generate_report))
        .layer(CorsLayer::permissive())
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}

/// Wait for SIGINT or SIGTERM.
async fn shutdown_signal() {
    let ctrl_c = async {
        tokio::signal::ctrl_c()
            .await
            .expect("failed to install Ctrl+C handler");
    };

    #[cfg(unix)]
    let terminate = async {
        tokio::signal::unix::signal(tokio::signal::unix::SignalKind::terminate())
            .expect("failed to install signal handler")
            .recv()
            .await;
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => {},
        _ = terminate => {},
    }

    tracing::info!("Shutdown signal received");
}

#[derive(Debug, Deserialize)]
struct ExecuteGoalRequest {
    #[serde(default)]
    goal: Option<String>,
}

#[derive(Debug, Serialize)]
struct HealthResponse {
    status: String,
    version: String,
}

/// Stable error shape for all failure responses.
#[derive(Debug, Serialize)]
pub(super) struct ErrorResponse {
    pub error: String,
}

/// Health check endpoint.
async fn health() -> Json<HealthResponse> {
    Json(HealthResponse {
        status: "ok".to_string(),
        version: env!("CARGO_PKG_VERSION").to_string(),
    })
}

/// Execute a goal: decompose it into subtasks and dispatch them.
async fn execute_goal(
    State(state): State<Arc<AppState>>,
    Json(request): Json<ExecuteGoalRequest>,
) -> Response {
    let goal = match request.goal {
        Some(goal) if !goal.trim().is_empty() => goal,
        _ => {
            return (
                StatusCode::BAD_REQUEST,
                Json(ErrorResponse {
                    error: "Goal is required.".to_string(),
                }),
            )
                .into_response();
        }
    };

    match state.executor.execute(&goal).await {
        Ok(result) => Json(result).into_response(),
        Err(e) => (
            StatusCode::BAD_REQUEST,
            Json(ErrorResponse {
                error: e.to_string(),
            }),
        )
            .into_response(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use wiremock::matchers::{method, path};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    use crate::llm::testing::ScriptedClient;

    fn test_config(power_automate_url: &str) -> Config {
        Config {
            host: "127.0.0.1".to_string(),
            port: 0,
            openai_api_key: "sk-test".to_string(),
            openai_model: "gpt-4".to_string(),
            power_automate_url: power_automate_url.to_string(),
        }
    }

    /// Serve the router on an ephemeral port, returning its base URL.
    async fn spawn_app(state: Arc<AppState>) -> String {
        let listener = tokio::net::TcpListener::bind("127.0.0.1:0")
            .await
            .unwrap();
        let addr = listener.local_addr().unwrap();
        tokio::spawn(async move {
            axum::serve(listener, router(state)).await.unwrap();
        });
        format!("http://{}", addr)
    }

    #[tokio::test]
    async fn health_reports_ok() {
        let state = Arc::new(AppState::new(
            test_config("http://localhost:1/flow"),
            ScriptedClient::replying("{}"),
            crate::orchestrator::TaskEndpoints::for_base_url("http://localhost:1"),
        ));
        let base = spawn_app(state).await;

        let body: serde_json::Value = reqwest::get(format!("{base}/api/health"))
            .await
            .unwrap()
            .json()
            .await
            .unwrap();
        assert_eq!(body["status"], "ok");
    }

    #[tokio::test]
    async fn missing_goal_is_a_400() {
        let state = Arc::new(AppState::new(
            test_config("http://localhost:1/flow"),
            std::sync::Arc::new(ScriptedClient::new(Vec::new())),
            crate::orchestrator::TaskEndpoints::for_base_url("http://localhost:1"),
        ));
        let base = spawn_app(state).await;

        let response = reqwest::Client::new()
            .post(format!("{base}/execute-goal"))
            .json(&serde_json::json!({}))
            .send()
            .await
            .unwrap();

        assert_eq!(response.status(), 400);
        let body: serde_json::Value = response.json().await.unwrap();
        assert_eq!(body["error"], "Goal is required.");
    }

    #[tokio::test]
    async fn invalid_goal_is_a_400_with_the_validation_message() {
        let state = Arc::new(AppState::new(
            test_config("http://localhost:1/flow"),
            std::sync::Arc::new(ScriptedClient::new(Vec::new())),
            crate::orchestrator::TaskEndpoints::for_base_url("http://localhost:1"),
        ));
        let base = spawn_app(state).await;

        let response = reqwest::Client::new()
            .post(format!("{base}/execute-goal"))
            .json(&serde_json::json!({"goal": "Generate Q3 sales report"}))
            .send()
            .await
            .unwrap();

        assert_eq!(response.status(), 400);
        let body: serde_json::Value = response.json().await.unwrap();
        assert_eq!(
            body["error"],
            "Invalid goal. Please specify a quarter (Q1-Q4) and year (e.g., 2024)."
        );
    }

    #[tokio::test]
    async fn execute_goal_returns_message_and_ordered_results() {
        let task_server = MockServer::start().await;
        for route in [
            "/fetch-salesforce-data",
            "/process-data",
            "/analyze-data",
            "/generate-report",
        ] {
            Mock::given(method("POST"))
                .and(path(route))
                .respond_with(
                    ResponseTemplate::new(200).set_body_json(serde_json::json!({"success": true})),
                )
                .mount(&task_server)
                .await;
        }

        let state = Arc::new(AppState::new(
            test_config("http://localhost:1/flow"),
            ScriptedClient::replying(
                r#"{"subtasks": [
                    {"name": "Retrieve Salesforce opportunity data"},
                    {"name": "Summarize findings"}
                ]}"#,
            ),
            crate::orchestrator::TaskEndpoints::for_base_url(&task_server.uri()),
        ));
        let base = spawn_app(state).await;

        let response = reqwest::Client::new()
            .post(format!("{base}/execute-goal"))
            .json(&serde_json::json!({"goal": "Generate Q3 2024 sales report"}))
            .send()
            .await
            .unwrap();

        assert_eq!(response.status(), 200);
        let body: serde_json::Value = response.json().await.unwrap();
        assert_eq!(body["message"], "Goal execution completed");
        let results = body["results"].as_array().unwrap();
        assert_eq!(results.len(), 2);
        for outcome in results {
            assert_eq!(outcome["result"], "Success");
        }
    }
}
