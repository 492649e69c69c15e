use async_trait::async_trait;
use std::fs;
use std::path::PathBuf;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;
use tempfile::TempDir;

use qabot::dispatcher::Dispatcher;
use qabot::error::QabotError;
use qabot::providers::{GenerationParams, Provider};
use qabot::session::Session;
use qabot::storage::HistoryStore;

/// Provider that always answers with the same text and counts its calls
#[allow(dead_code)]
pub struct StaticProvider {
    pub reply: String,
    pub calls: Arc<AtomicUsize>,
}

#[allow(dead_code)]
impl StaticProvider {
    pub fn new(reply: &str) -> (Self, Arc<AtomicUsize>) {
        let calls = Arc::new(AtomicUsize::new(0));
        (
            Self {
                reply: reply.to_string(),
                calls: Arc::clone(&calls),
            },
            calls,
        )
    }
}

#[async_trait]
impl Provider for StaticProvider {
    async fn generate(
        &self,
        _instruction: &str,
        _content: &str,
        _params: &GenerationParams,
    ) -> qabot::Result<String> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        Ok(self.reply.clone())
    }

    fn name(&self) -> &str {
        "static"
    }

    fn model(&self) -> &str {
        "static-model"
    }
}

/// Provider whose every call fails with an API error
#[allow(dead_code)]
pub struct FailingProvider;

#[async_trait]
impl Provider for FailingProvider {
    async fn generate(
        &self,
        _instruction: &str,
        _content: &str,
        _params: &GenerationParams,
    ) -> qabot::Result<String> {
        Err(QabotError::Api("service unavailable".to_string()).into())
    }

    fn name(&self) -> &str {
        "failing"
    }

    fn model(&self) -> &str {
        "failing-model"
    }
}

/// Session over `provider` with its log in a fresh temp directory
#[allow(dead_code)]
pub fn create_temp_session(provider: Box<dyn Provider>) -> (Session, TempDir) {
    let tmp = TempDir::new().expect("failed to create tempdir");
    let store = HistoryStore::new_with_path(tmp.path().join("chat_history.json"))
        .expect("failed to create history store");
    let dispatcher = Dispatcher::new(provider, GenerationParams::default());
    (Session::new(dispatcher, store), tmp)
}

#[allow(dead_code)]
pub fn temp_config_file(contents: &str) -> (TempDir, PathBuf) {
    let temp_dir = TempDir::new().expect("failed to create tempdir");
    let config_path = temp_dir.path().join("config.yaml");
    fs::write(&config_path, contents).expect("failed to write config file");
    (temp_dir, config_path)
}
