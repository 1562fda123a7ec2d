//! The rendering capability the pipeline drives.
//!
//! Discovery only needs a handful of operations from a browser: navigate,
//! wait for elements, run a script, query elements and read attributes. The
//! trait keeps the pipeline independent of the browser driver so it can run
//! against a scripted fake in tests.

use std::time::Duration;

use async_trait::async_trait;
use thiserror::Error;

#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum SessionError {
    #[error("browser launch failed: {0}")]
    Launch(String),
    #[error("navigation to {url} failed: {message}")]
    Navigation { url: String, message: String },
    #[error("no <{element}> appeared within {waited:?}")]
    Timeout { element: String, waited: Duration },
    #[error("no element matches {selector}")]
    NotFound { selector: String },
    #[error("script failed: {0}")]
    Script(String),
    #[error("element query failed: {0}")]
    Query(String),
    #[error("browser shutdown failed: {0}")]
    Shutdown(String),
    #[error("session is closed")]
    Closed,
}

/// One live rendered page.
///
/// Element handles borrow from the page and are only meaningful while the
/// session is live. `close` must be idempotent.
#[async_trait]
pub trait RenderedPageSession: Send + Sync {
    type Element: Send + Sync;

    async fn open(&mut self, url: &str) -> Result<(), SessionError>;

    /// Blocks until at least one `element` is present, or fails with
    /// [`SessionError::Timeout`] after `timeout`.
    async fn wait_for(&self, element: &str, timeout: Duration) -> Result<(), SessionError>;

    /// Evaluates a script expression against the live document.
    async fn run_script(&self, script: &str) -> Result<serde_json::Value, SessionError>;

    /// All elements with the given tag, in document order.
    async fn query_all(&self, element: &str) -> Result<Vec<Self::Element>, SessionError>;

    /// First descendant of `element` matching `selector`, or
    /// [`SessionError::NotFound`].
    async fn query_within(
        &self,
        element: &Self::Element,
        selector: &str,
    ) -> Result<Self::Element, SessionError>;

    async fn attribute(
        &self,
        element: &Self::Element,
        name: &str,
    ) -> Result<Option<String>, SessionError>;

    async fn close(&mut self) -> Result<(), SessionError>;

    fn current_url(&self) -> Option<&str>;

    fn is_live(&self) -> bool;
}
