/*!
 * Mock provider implementation for development and testing.
 *
 * This module provides a mock provider that simulates different behaviors:
 * - `MockProvider::working()` - Always succeeds with a tagged translation
 * - `MockProvider::unavailable()` - Always fails with a transient error
 * - `MockProvider::rejecting()` - Always fails with a permanent error
 * - `MockProvider::intermittent(n)` - Fails every Nth request
 * - `MockProvider::slow(ms)` - Succeeds after a delay
 */

use async_trait::async_trait;
use parking_lot::Mutex;
use std::collections::HashMap;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;

use super::TranslationProvider;
use crate::errors::ProviderError;

/// Request seen by the mock provider
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MockRequest {
    /// The text to translate
    pub text: String,
    /// Target language
    pub target_language: String,
}

/// Behavior mode for the mock provider
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum MockBehavior {
    /// Always succeeds with a translation
    Working,
    /// Always fails with `ProviderError::Unavailable`
    Unavailable,
    /// Always fails with `ProviderError::Rejected`
    Rejected,
    /// Fails with `Unavailable` on every Nth request
    Intermittent { fail_every: usize },
    /// Simulates slow response (for timeout testing)
    Slow { delay_ms: u64 },
}

/// Mock provider for testing translation behavior
#[derive(Debug, Clone)]
pub struct MockProvider {
    /// Behavior mode
    behavior: MockBehavior,
    /// Request counter, shared between clones
    request_count: Arc<AtomicUsize>,
    /// Requests received, in order
    requests: Arc<Mutex<Vec<MockRequest>>>,
    /// Fixed translations keyed by (text, target language)
    dictionary: Arc<HashMap<(String, String), String>>,
}

impl MockProvider {
    /// Create a new mock provider with the specified behavior
    pub fn new(behavior: MockBehavior) -> Self {
        Self {
            behavior,
            request_count: Arc::new(AtomicUsize::new(0)),
            requests: Arc::new(Mutex::new(Vec::new())),
            dictionary: Arc::new(HashMap::new()),
        }
    }

    /// Create a working mock provider that always succeeds
    pub fn working() -> Self {
        Self::new(MockBehavior::Working)
    }

    /// Create a mock provider that always fails transiently
    pub fn unavailable() -> Self {
        Self::new(MockBehavior::Unavailable)
    }

    /// Create a mock provider that always rejects the input
    pub fn rejecting() -> Self {
        Self::new(MockBehavior::Rejected)
    }

    /// Create an intermittently failing mock provider
    pub fn intermittent(fail_every: usize) -> Self {
        Self::new(MockBehavior::Intermittent {
            fail_every: fail_every.max(1),
        })
    }

    /// Create a mock provider that answers after a delay
    pub fn slow(delay_ms: u64) -> Self {
        Self::new(MockBehavior::Slow { delay_ms })
    }

    /// Answer with fixed translations where the dictionary has an entry
    pub fn with_translations<I, S>(mut self, entries: I) -> Self
    where
        I: IntoIterator<Item = (S, S, S)>,
        S: Into<String>,
    {
        self.dictionary = Arc::new(
            entries
                .into_iter()
                .map(|(text, target, translation)| ((text.into(), target.into()), translation.into()))
                .collect(),
        );
        self
    }

    /// Number of requests received so far
    pub fn call_count(&self) -> usize {
        self.request_count.load(Ordering::SeqCst)
    }

    /// Requests received so far
    pub fn requests(&self) -> Vec<MockRequest> {
        self.requests.lock().clone()
    }

    fn render(&self, request: &MockRequest) -> String {
        self.dictionary
            .get(&(request.text.clone(), request.target_language.clone()))
            .cloned()
            .unwrap_or_else(|| format!("[{}] {}", request.target_language, request.text))
    }
}

#[async_trait]
impl TranslationProvider for MockProvider {
    fn name(&self) -> &'static str {
        "mock"
    }

    fn is_configured(&self) -> bool {
        true
    }

    async fn translate(&self, text: &str, target_language: &str) -> Result<String, ProviderError> {
        let count = self.request_count.fetch_add(1, Ordering::SeqCst);
        let request = MockRequest {
            text: text.to_string(),
            target_language: target_language.to_string(),
        };
        self.requests.lock().push(request.clone());

        match self.behavior {
            MockBehavior::Working => Ok(self.render(&request)),

            MockBehavior::Unavailable => Err(ProviderError::Unavailable(
                "Simulated provider outage".to_string(),
            )),

            MockBehavior::Rejected => Err(ProviderError::Rejected {
                status_code: Some(456),
                message: "Simulated quota exceeded".to_string(),
            }),

            MockBehavior::Intermittent { fail_every } => {
                if count % fail_every == fail_every - 1 {
                    Err(ProviderError::Unavailable(format!(
                        "Simulated intermittent failure (request #{})",
                        count + 1
                    )))
                } else {
                    Ok(self.render(&request))
                }
            }

            MockBehavior::Slow { delay_ms } => {
                tokio::time::sleep(tokio::time::Duration::from_millis(delay_ms)).await;
                Ok(self.render(&request))
            }
        }
    }
}
