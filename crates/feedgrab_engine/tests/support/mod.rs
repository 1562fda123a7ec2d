//! Scripted stand-ins for the browser, the fetcher and the progress sink.
#![allow(dead_code)]

use std::collections::{HashSet, VecDeque};
use std::path::{Path, PathBuf};
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex, Once};
use std::time::Duration;

use async_trait::async_trait;
use feedgrab_core::{with_extension, ImageExtension};
use feedgrab_engine::{
    FailureKind, FetchError, HarvestEvent, ImageFetcher, ProgressSink, RenderedPageSession,
    SessionError, DOCUMENT_HEIGHT_SCRIPT, SCROLL_TO_BOTTOM_SCRIPT,
};

pub fn init_logging() {
    static INIT: Once = Once::new();
    INIT.call_once(feedgrab_logging::initialize_for_tests);
}

#[derive(Debug, Clone, Default)]
pub struct FakeImage {
    pub src: Option<String>,
    pub data_url: Option<String>,
}

impl FakeImage {
    pub fn src(url: &str) -> Self {
        Self {
            src: Some(url.to_string()),
            data_url: None,
        }
    }

    pub fn with_data_url(mut self, url: &str) -> Self {
        self.data_url = Some(url.to_string());
        self
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FakeElement {
    Post(usize),
    Image(usize),
}

/// Counters shared with the test after the session has been moved away.
#[derive(Debug, Default)]
pub struct Calls {
    pub opens: AtomicUsize,
    pub closes: AtomicUsize,
    pub scrolls: AtomicUsize,
    pub height_reads: AtomicUsize,
    pub attribute_reads: Mutex<Vec<(usize, String)>>,
}

impl Calls {
    pub fn closes(&self) -> usize {
        self.closes.load(Ordering::SeqCst)
    }

    pub fn scrolls(&self) -> usize {
        self.scrolls.load(Ordering::SeqCst)
    }

    pub fn height_reads(&self) -> usize {
        self.height_reads.load(Ordering::SeqCst)
    }

    pub fn attribute_reads(&self) -> Vec<(usize, String)> {
        self.attribute_reads.lock().unwrap().clone()
    }
}

/// A rendered feed made of posts that may or may not hold a preview image.
pub struct FakeSession {
    posts: Vec<Option<FakeImage>>,
    heights: Mutex<VecDeque<f64>>,
    open_error: Option<SessionError>,
    wait_error: Option<SessionError>,
    query_error: Option<SessionError>,
    close_error: Option<SessionError>,
    unreadable_attributes: bool,
    current_url: Option<String>,
    closed: bool,
    calls: Arc<Calls>,
}

impl FakeSession {
    pub fn new(posts: Vec<Option<FakeImage>>) -> Self {
        Self {
            posts,
            heights: Mutex::new(VecDeque::from(vec![1000.0])),
            open_error: None,
            wait_error: None,
            query_error: None,
            close_error: None,
            unreadable_attributes: false,
            current_url: None,
            closed: false,
            calls: Arc::new(Calls::default()),
        }
    }

    /// Heights returned by successive height reads; the last one repeats.
    pub fn with_heights(self, heights: &[f64]) -> Self {
        *self.heights.lock().unwrap() = heights.iter().copied().collect();
        self
    }

    pub fn failing_open(mut self, error: SessionError) -> Self {
        self.open_error = Some(error);
        self
    }

    pub fn failing_wait(mut self, error: SessionError) -> Self {
        self.wait_error = Some(error);
        self
    }

    pub fn failing_query(mut self, error: SessionError) -> Self {
        self.query_error = Some(error);
        self
    }

    pub fn failing_close(mut self, error: SessionError) -> Self {
        self.close_error = Some(error);
        self
    }

    pub fn with_unreadable_attributes(mut self) -> Self {
        self.unreadable_attributes = true;
        self
    }

    pub fn calls(&self) -> Arc<Calls> {
        Arc::clone(&self.calls)
    }

    fn ensure_live(&self) -> Result<(), SessionError> {
        if self.closed {
            Err(SessionError::Closed)
        } else {
            Ok(())
        }
    }

    fn next_height(&self) -> f64 {
        self.calls.height_reads.fetch_add(1, Ordering::SeqCst);
        let mut heights = self.heights.lock().unwrap();
        if heights.len() > 1 {
            heights.pop_front().unwrap_or_default()
        } else {
            heights.front().copied().unwrap_or_default()
        }
    }
}

#[async_trait]
impl RenderedPageSession for FakeSession {
    type Element = FakeElement;

    async fn open(&mut self, url: &str) -> Result<(), SessionError> {
        self.ensure_live()?;
        self.calls.opens.fetch_add(1, Ordering::SeqCst);
        if let Some(error) = self.open_error.clone() {
            return Err(error);
        }
        self.current_url = Some(url.to_string());
        Ok(())
    }

    async fn wait_for(&self, _element: &str, _timeout: Duration) -> Result<(), SessionError> {
        self.ensure_live()?;
        match self.wait_error.clone() {
            Some(error) => Err(error),
            None => Ok(()),
        }
    }

    async fn run_script(&self, script: &str) -> Result<serde_json::Value, SessionError> {
        self.ensure_live()?;
        if script == SCROLL_TO_BOTTOM_SCRIPT {
            self.calls.scrolls.fetch_add(1, Ordering::SeqCst);
            Ok(serde_json::Value::Null)
        } else if script == DOCUMENT_HEIGHT_SCRIPT {
            Ok(serde_json::json!(self.next_height()))
        } else {
            Err(SessionError::Script(format!("unexpected script {script}")))
        }
    }

    async fn query_all(&self, _element: &str) -> Result<Vec<FakeElement>, SessionError> {
        self.ensure_live()?;
        if let Some(error) = self.query_error.clone() {
            return Err(error);
        }
        Ok((0..self.posts.len()).map(FakeElement::Post).collect())
    }

    async fn query_within(
        &self,
        element: &FakeElement,
        selector: &str,
    ) -> Result<FakeElement, SessionError> {
        self.ensure_live()?;
        match element {
            FakeElement::Post(id) if matches!(self.posts.get(*id), Some(Some(_))) => {
                Ok(FakeElement::Image(*id))
            }
            _ => Err(SessionError::NotFound {
                selector: selector.to_string(),
            }),
        }
    }

    async fn attribute(
        &self,
        element: &FakeElement,
        name: &str,
    ) -> Result<Option<String>, SessionError> {
        self.ensure_live()?;
        let FakeElement::Image(id) = element else {
            return Ok(None);
        };
        self.calls
            .attribute_reads
            .lock()
            .unwrap()
            .push((*id, name.to_string()));
        if self.unreadable_attributes {
            return Err(SessionError::Query("node is detached".to_string()));
        }
        let image = self.posts.get(*id).cloned().flatten().unwrap_or_default();
        Ok(match name {
            "src" => image.src,
            "data-url" => image.data_url,
            _ => None,
        })
    }

    async fn close(&mut self) -> Result<(), SessionError> {
        self.calls.closes.fetch_add(1, Ordering::SeqCst);
        self.closed = true;
        match self.close_error.clone() {
            Some(error) => Err(error),
            None => Ok(()),
        }
    }

    fn current_url(&self) -> Option<&str> {
        self.current_url.as_deref()
    }

    fn is_live(&self) -> bool {
        !self.closed
    }
}

#[derive(Default)]
pub struct RecordingSink {
    events: Mutex<Vec<HarvestEvent>>,
}

impl RecordingSink {
    pub fn take(&self) -> Vec<HarvestEvent> {
        self.events.lock().unwrap().drain(..).collect()
    }
}

impl ProgressSink for RecordingSink {
    fn emit(&self, event: HarvestEvent) {
        self.events.lock().unwrap().push(event);
    }
}

/// Writes a small file for every URL except the ones marked as failing.
#[derive(Default)]
pub struct StubFetcher {
    failing: HashSet<String>,
    requests: Mutex<Vec<(String, PathBuf)>>,
}

impl StubFetcher {
    pub fn failing(urls: &[&str]) -> Self {
        Self {
            failing: urls.iter().map(|url| url.to_string()).collect(),
            requests: Mutex::new(Vec::new()),
        }
    }

    pub fn requests(&self) -> Vec<(String, PathBuf)> {
        self.requests.lock().unwrap().clone()
    }
}

#[async_trait]
impl ImageFetcher for StubFetcher {
    async fn download(&self, url: &str, stem: &Path) -> Result<PathBuf, FetchError> {
        self.requests
            .lock()
            .unwrap()
            .push((url.to_string(), stem.to_path_buf()));
        if self.failing.contains(url) {
            return Err(FetchError {
                kind: FailureKind::HttpStatus(503),
                message: "503 Service Unavailable".to_string(),
            });
        }
        let path = with_extension(stem, ImageExtension::Jpg);
        std::fs::write(&path, url.as_bytes()).map_err(|err| FetchError {
            kind: FailureKind::Io,
            message: err.to_string(),
        })?;
        Ok(path)
    }
}
