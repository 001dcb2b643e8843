//! # Common Test Utilities
//!
//! Test harnesses shared by the `talentfilter-server` integration tests:
//!
//! - `TestApp::spawn`: a real server on a random port, configured from a YAML file
//!   whose AI provider points at an `httpmock::MockServer`.
//! - `TestApp::spawn_with_mocks`: the same server around the call-recording fakes
//!   from `talentfilter-test-utils`.

// Not every test file uses every helper.
#![allow(unused)]

use anyhow::Result;
use axum::serve;
use httpmock::MockServer;
use reqwest::Client;
use serde_json::json;
use std::{fs::File, io::Write, net::SocketAddr, sync::Arc};
use talentfilter::FilterClientBuilder;
use talentfilter_server::{
    config::{self, AppConfig},
    router,
    state::{build_app_state, AppState},
};
use talentfilter_test_utils::{MockAiProvider, MockDirectoryProvider};
use tempfile::{tempdir, TempDir};
use tokio::{net::TcpListener, task::JoinHandle};

/// The model's answer for "Find all applicants in hired stage".
pub const HIRED_STAGE_RESPONSE: &str = r#"{"filterParameters":[{"logicalOperator":"AND","name":"stage","operator":"equals","filterVariable":"Hired"}],"query":"","isFavoriteApplicant":false,"jobListingId":null}"#;

/// Wraps model text in an OpenAI-compatible chat completion body.
pub fn chat_completion(content: &str) -> serde_json::Value {
    json!({
        "choices": [{ "message": { "role": "assistant", "content": content } }]
    })
}

/// A harness for end-to-end testing of the Axum server.
pub struct TestApp {
    pub address: String,
    pub client: Client,
    pub mock_server: Option<MockServer>,
    pub app_state: AppState,
    _config_dir: Option<TempDir>,
    _server_handle: JoinHandle<()>,
    shutdown_tx: Option<tokio::sync::oneshot::Sender<()>>,
}

impl TestApp {
    /// Spawns the server with a local AI provider pointed at a mock server and a
    /// static directory holding the "Hired" and "Interview" stages.
    pub async fn spawn() -> Result<Self> {
        let mock_server = MockServer::start_async().await;

        let config_dir = tempdir()?;
        let config_path = config_dir.path().join("config.yml");
        let config_content = format!(
            r#"
port: 0
ai:
  provider: "local"
  api_url: "{}"
  api_key: null
  model_name: "mock-chat-model"
directory:
  provider: "static"
  ttl_secs: 3600
  entities:
    stage:
      Hired: "stage-id-123"
      Interview: "stage-id-456"
cache:
  capacity: 10
"#,
            mock_server.url("/v1/chat/completions")
        );
        let mut file = File::create(&config_path)?;
        file.write_all(config_content.as_bytes())?;

        let config_path = config_path
            .to_str()
            .ok_or_else(|| anyhow::anyhow!("temp path is not valid UTF-8"))?;
        let config = config::get_config(Some(config_path))?;
        let app_state = build_app_state(config)?;

        let mut app = TestApp::spawn_with_state(app_state).await?;
        app.mock_server = Some(mock_server);
        app._config_dir = Some(config_dir);
        Ok(app)
    }

    /// Spawns the server around a `FilterClient` built from the given fakes.
    pub async fn spawn_with_mocks(
        ai: &MockAiProvider,
        directory: &MockDirectoryProvider,
    ) -> Result<Self> {
        let client = FilterClientBuilder::new()
            .ai_provider(Box::new(ai.clone()))
            .directory_provider(Box::new(directory.clone()))
            .build()?;
        let config: AppConfig = serde_json::from_value(json!({ "ai": { "provider": "local" } }))?;
        let app_state = AppState {
            config: Arc::new(config),
            filter_client: Arc::new(client),
        };
        TestApp::spawn_with_state(app_state).await
    }

    pub async fn spawn_with_state(app_state: AppState) -> Result<Self> {
        let _ = tracing_subscriber::fmt()
            .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
            .compact()
            .try_init();

        let listener = TcpListener::bind("127.0.0.1:0").await?;
        let addr: SocketAddr = listener.local_addr()?;
        let address = format!("http://{addr}");

        let app = router::create_router(app_state.clone());
        let (shutdown_tx, shutdown_rx) = tokio::sync::oneshot::channel();
        let server_handle = tokio::spawn(async move {
            let server = serve(listener, app).with_graceful_shutdown(async {
                shutdown_rx.await.ok();
            });
            if let Err(e) = server.await {
                tracing::error!("[TestApp] Server error: {}", e);
            }
        });

        Ok(Self {
            address,
            client: Client::new(),
            mock_server: None,
            app_state,
            _config_dir: None,
            _server_handle: server_handle,
            shutdown_tx: Some(shutdown_tx),
        })
    }

    pub fn url(&self, path: &str) -> String {
        format!("{}{}", self.address, path)
    }

    pub fn mock_server(&self) -> &MockServer {
        self.mock_server
            .as_ref()
            .expect("this TestApp was spawned without a mock server")
    }
}

impl Drop for TestApp {
    fn drop(&mut self) {
        if let Some(tx) = self.shutdown_tx.take() {
            // The receiver is gone if the server task already stopped.
            let _ = tx.send(());
        }
    }
}
