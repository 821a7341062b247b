//! Test utilities and mock backends
//!
//! Mock implementations of the [`BackgroundRemover`] trait so pipeline
//! behavior can be tested without network access or a live API key.

use crate::{
    backends::BackgroundRemover,
    error::{RemovalError, Result},
};
use async_trait::async_trait;
use std::sync::{Arc, Mutex};
use tokio::sync::Notify;

/// Default payload returned by a successful mock call
pub const MOCK_PROCESSED_URI: &str = "data:image/png;base64,UFJPQ0VTU0VE";

/// Scripted outcome for a mock removal call
#[derive(Debug, Clone)]
enum MockOutcome {
    Image(String),
    EmptyResponse,
    NoImage,
    Transport(String),
}

/// Mock background remover with scripted outcomes and recorded call history
#[derive(Debug, Clone)]
pub struct MockBackend {
    outcome: MockOutcome,
    /// MIME types seen by `remove_background`, for verification in tests
    call_history: Arc<Mutex<Vec<String>>>,
    /// When set, each call blocks until the gate is notified
    gate: Option<Arc<Notify>>,
}

impl MockBackend {
    /// Create a mock that succeeds with [`MOCK_PROCESSED_URI`]
    #[must_use]
    pub fn new() -> Self {
        Self::returning(MOCK_PROCESSED_URI)
    }

    /// Create a mock that succeeds with the given processed payload
    #[must_use]
    pub fn returning<S: Into<String>>(processed: S) -> Self {
        Self {
            outcome: MockOutcome::Image(processed.into()),
            call_history: Arc::new(Mutex::new(Vec::new())),
            gate: None,
        }
    }

    /// Create a mock that fails with an empty-response contract violation
    #[must_use]
    pub fn new_failing_empty_response() -> Self {
        Self {
            outcome: MockOutcome::EmptyResponse,
            ..Self::new()
        }
    }

    /// Create a mock that fails because no part carried an image
    #[must_use]
    pub fn new_failing_no_image() -> Self {
        Self {
            outcome: MockOutcome::NoImage,
            ..Self::new()
        }
    }

    /// Create a mock that fails with a transport error carrying `msg`
    #[must_use]
    pub fn new_failing_transport<S: Into<String>>(msg: S) -> Self {
        Self {
            outcome: MockOutcome::Transport(msg.into()),
            ..Self::new()
        }
    }

    /// Block each call on `gate` until it is notified
    #[must_use]
    pub fn with_gate(mut self, gate: Arc<Notify>) -> Self {
        self.gate = Some(gate);
        self
    }

    /// Get the call history for verification in tests
    pub fn get_call_history(&self) -> Vec<String> {
        self.call_history.lock().unwrap().clone()
    }

    fn record_call(&self, mime_type: &str) {
        if let Ok(mut history) = self.call_history.lock() {
            history.push(mime_type.to_string());
        }
    }
}

impl Default for MockBackend {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl BackgroundRemover for MockBackend {
    async fn remove_background(&self, _encoded_image: &str, mime_type: &str) -> Result<String> {
        self.record_call(mime_type);
        if let Some(gate) = &self.gate {
            gate.notified().await;
        }
        match &self.outcome {
            MockOutcome::Image(processed) => Ok(processed.clone()),
            MockOutcome::EmptyResponse => Err(RemovalError::EmptyResponse),
            MockOutcome::NoImage => Err(RemovalError::NoImage),
            MockOutcome::Transport(msg) => Err(RemovalError::transport(msg.clone())),
        }
    }
}
