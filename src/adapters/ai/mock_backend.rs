//! Mock generation backend for testing.
//!
//! Provides a scripted implementation of the GenerationBackend port, allowing
//! tests to run without calling a real model.
//!
//! # Features
//!
//! - Separate queues for classification answers and written text
//! - Error injection per call kind
//! - Call tracking for verification
//!
//! # Example
//!
//! ```ignore
//! let backend = MockBackend::new()
//!     .with_classification("2")
//!     .with_story("TITLE: The Brave Mouse\n\nSTORY: Squeak was brave.");
//!
//! assert_eq!(backend.classify("a brave mouse").await?, "2");
//! ```

use async_trait::async_trait;
use std::collections::VecDeque;
use std::sync::{Arc, Mutex};

use crate::ports::{BackendError, BackendInfo, GenerationBackend, WriteRequest};

/// Answer used when the classification queue is empty.
const DEFAULT_CLASSIFICATION: &str = "0";

/// Text used when the write queue is empty.
const DEFAULT_STORY: &str = "TITLE: Mock Story\n\nSTORY: Once upon a time, a mock told a story.";

/// Scripted generation backend.
///
/// Responses are consumed in order; an empty queue yields a fixed default.
#[derive(Debug, Clone)]
pub struct MockBackend {
    classifications: Arc<Mutex<VecDeque<Result<String, BackendError>>>>,
    writes: Arc<Mutex<VecDeque<Result<String, BackendError>>>>,
    classify_calls: Arc<Mutex<Vec<String>>>,
    write_calls: Arc<Mutex<Vec<WriteRequest>>>,
    info: BackendInfo,
}

impl Default for MockBackend {
    fn default() -> Self {
        Self::new()
    }
}

impl MockBackend {
    /// Creates a new mock backend with empty queues.
    pub fn new() -> Self {
        Self {
            classifications: Arc::new(Mutex::new(VecDeque::new())),
            writes: Arc::new(Mutex::new(VecDeque::new())),
            classify_calls: Arc::new(Mutex::new(Vec::new())),
            write_calls: Arc::new(Mutex::new(Vec::new())),
            info: BackendInfo::new("mock", "mock-model-1"),
        }
    }

    /// Queues a raw classification answer.
    pub fn with_classification(self, answer: impl Into<String>) -> Self {
        push(&self.classifications, Ok(answer.into()));
        self
    }

    /// Queues a classification failure.
    pub fn with_classify_error(self, error: BackendError) -> Self {
        push(&self.classifications, Err(error));
        self
    }

    /// Queues written text.
    pub fn with_story(self, text: impl Into<String>) -> Self {
        push(&self.writes, Ok(text.into()));
        self
    }

    /// Queues a write failure.
    pub fn with_write_error(self, error: BackendError) -> Self {
        push(&self.writes, Err(error));
        self
    }

    /// Returns every text passed to `classify`.
    pub fn classify_calls(&self) -> Vec<String> {
        lock(&self.classify_calls).clone()
    }

    /// Returns every request passed to `write`.
    pub fn write_calls(&self) -> Vec<WriteRequest> {
        lock(&self.write_calls).clone()
    }

    /// Returns the total number of backend calls.
    pub fn call_count(&self) -> usize {
        lock(&self.classify_calls).len() + lock(&self.write_calls).len()
    }
}

fn lock<T>(mutex: &Mutex<T>) -> std::sync::MutexGuard<'_, T> {
    mutex.lock().expect("mock backend lock poisoned")
}

fn push(queue: &Mutex<VecDeque<Result<String, BackendError>>>, item: Result<String, BackendError>) {
    lock(queue).push_back(item);
}

#[async_trait]
impl GenerationBackend for MockBackend {
    async fn classify(&self, text: &str) -> Result<String, BackendError> {
        lock(&self.classify_calls).push(text.to_string());
        lock(&self.classifications)
            .pop_front()
            .unwrap_or_else(|| Ok(DEFAULT_CLASSIFICATION.to_string()))
    }

    async fn write(&self, request: WriteRequest) -> Result<String, BackendError> {
        lock(&self.write_calls).push(request);
        lock(&self.writes)
            .pop_front()
            .unwrap_or_else(|| Ok(DEFAULT_STORY.to_string()))
    }

    fn backend_info(&self) -> BackendInfo {
        self.info.clone()
    }
}
