//! Intent Classifier - turns the backend's raw answer into an [`Intent`].

use std::sync::Arc;

use thiserror::Error;
use tracing::debug;

use crate::domain::story::Intent;
use crate::ports::{BackendError, GenerationBackend};

/// Errors from classifying a user turn.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum ClassifyError {
    /// The backend answered with something that is not an integer.
    #[error("classifier answer {0:?} is not an integer")]
    Unparseable(String),

    /// The backend answered with an integer that names no intent.
    #[error("classifier answer {0} is outside the supported range 0..=3")]
    OutOfRange(i64),

    /// The classification call itself failed.
    #[error("classification call failed: {0}")]
    Backend(#[from] BackendError),
}

/// Classifies user turns through the generation backend.
///
/// Has no side effects beyond the single backend call.
#[derive(Clone)]
pub struct IntentClassifier {
    backend: Arc<dyn GenerationBackend>,
}

impl IntentClassifier {
    pub fn new(backend: Arc<dyn GenerationBackend>) -> Self {
        Self { backend }
    }

    /// Classifies non-empty `text`.
    ///
    /// Reserved codes (4 and up) and negative codes are errors; they are
    /// never mapped onto a nearby intent.
    pub async fn classify(&self, text: &str) -> Result<Intent, ClassifyError> {
        let raw = self.backend.classify(text).await?;
        let answer = raw.trim();

        let code: i64 = answer
            .parse()
            .map_err(|_| ClassifyError::Unparseable(answer.to_string()))?;
        let intent = Intent::from_code(code).map_err(|e| ClassifyError::OutOfRange(e.0))?;

        debug!(code, intent = %intent, "Classified user turn");
        Ok(intent)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::adapters::ai::MockBackend;

    fn classifier_answering(answer: &str) -> IntentClassifier {
        let backend = MockBackend::new().with_classification(answer);
        IntentClassifier::new(Arc::new(backend))
    }

    #[tokio::test]
    async fn maps_every_defined_code() {
        for intent in Intent::ALL {
            let classifier = classifier_answering(&intent.code().to_string());
            assert_eq!(classifier.classify("hello").await.unwrap(), intent);
        }
    }

    #[tokio::test]
    async fn ignores_surrounding_whitespace() {
        let classifier = classifier_answering(" 3\n");
        assert_eq!(classifier.classify("more!").await.unwrap(), Intent::Extend);
    }

    #[tokio::test]
    async fn reserved_codes_are_errors() {
        for code in ["4", "5", "-1"] {
            let classifier = classifier_answering(code);
            let err = classifier.classify("hello").await.unwrap_err();
            assert!(matches!(err, ClassifyError::OutOfRange(_)), "{code} gave {err:?}");
        }
    }

    #[tokio::test]
    async fn non_numeric_answer_is_unparseable() {
        let classifier = classifier_answering("two");
        assert_eq!(
            classifier.classify("hello").await.unwrap_err(),
            ClassifyError::Unparseable("two".to_string())
        );
    }

    #[tokio::test]
    async fn backend_failure_is_propagated() {
        let backend = MockBackend::new().with_classify_error(BackendError::unavailable("down"));
        let classifier = IntentClassifier::new(Arc::new(backend));

        let err = classifier.classify("hello").await.unwrap_err();
        assert!(matches!(err, ClassifyError::Backend(_)));
    }
}
