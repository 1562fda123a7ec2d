//! Chromium-backed [`RenderedPageSession`] using chromiumoxide.

use std::time::Duration;

use async_trait::async_trait;
use chromiumoxide::browser::{Browser, BrowserConfig};
use chromiumoxide::element::Element;
use chromiumoxide::page::Page;
use feedgrab_core::BrowserOptions;
use feedgrab_logging::{grab_debug, grab_trace, grab_warn};
use futures_util::StreamExt;
use tokio::task::JoinHandle;

use crate::{RenderedPageSession, SessionError};

const NAVIGATION_TIMEOUT: Duration = Duration::from_secs(30);
const ELEMENT_POLL_INTERVAL: Duration = Duration::from_millis(250);

/// One headless Chromium instance with a single page.
pub struct ChromiumSession {
    browser: Browser,
    page: Option<Page>,
    handler: JoinHandle<()>,
    current_url: Option<String>,
    closed: bool,
}

impl ChromiumSession {
    /// Launches the browser and opens a blank page.
    pub async fn launch(options: &BrowserOptions, user_agent: &str) -> Result<Self, SessionError> {
        let user_agent_arg = format!("--user-agent={user_agent}");
        let mut builder = BrowserConfig::builder()
            .window_size(options.window_width, options.window_height)
            .request_timeout(NAVIGATION_TIMEOUT)
            .arg("--disable-notifications")
            .arg("--disable-popup-blocking")
            .arg("--disable-blink-features=AutomationControlled")
            .arg(user_agent_arg.as_str());
        if !options.headless {
            builder = builder.with_head();
        }
        if options.no_sandbox {
            builder = builder.no_sandbox();
        }
        if let Some(path) = &options.chrome_executable {
            builder = builder.chrome_executable(path);
        }
        let config = builder.build().map_err(SessionError::Launch)?;

        let (browser, mut handler) = Browser::launch(config)
            .await
            .map_err(|e| SessionError::Launch(e.to_string()))?;

        let handler = tokio::spawn(async move {
            while let Some(event) = handler.next().await {
                if let Err(err) = event {
                    grab_trace!("browser handler event error: {}", err);
                }
            }
        });

        let page = match browser.new_page("about:blank").await {
            Ok(page) => page,
            Err(err) => {
                handler.abort();
                return Err(SessionError::Launch(format!("failed to create page: {err}")));
            }
        };
        grab_debug!(
            "Chromium launched (headless={}, window={}x{})",
            options.headless,
            options.window_width,
            options.window_height
        );

        Ok(Self {
            browser,
            page: Some(page),
            handler,
            current_url: None,
            closed: false,
        })
    }

    fn page(&self) -> Result<&Page, SessionError> {
        if self.closed {
            return Err(SessionError::Closed);
        }
        self.page.as_ref().ok_or(SessionError::Closed)
    }
}

#[async_trait]
impl RenderedPageSession for ChromiumSession {
    type Element = Element;

    async fn open(&mut self, url: &str) -> Result<(), SessionError> {
        let page = self.page()?;
        page.goto(url).await.map_err(|e| SessionError::Navigation {
            url: url.to_string(),
            message: e.to_string(),
        })?;

        let landed = page.url().await.ok().flatten();
        self.current_url = Some(landed.unwrap_or_else(|| url.to_string()));
        Ok(())
    }

    async fn wait_for(&self, element: &str, timeout: Duration) -> Result<(), SessionError> {
        let page = self.page()?;
        let poll = async {
            loop {
                match page.find_elements(element).await {
                    Ok(found) if !found.is_empty() => return,
                    Ok(_) => {}
                    Err(err) => grab_trace!("polling for <{}> failed: {}", element, err),
                }
                tokio::time::sleep(ELEMENT_POLL_INTERVAL).await;
            }
        };
        tokio::time::timeout(timeout, poll)
            .await
            .map_err(|_| SessionError::Timeout {
                element: element.to_string(),
                waited: timeout,
            })
    }

    async fn run_script(&self, script: &str) -> Result<serde_json::Value, SessionError> {
        let result = self
            .page()?
            .evaluate(script)
            .await
            .map_err(|e| SessionError::Script(e.to_string()))?;
        // Statements like scrollTo evaluate to undefined, which carries no value.
        Ok(result
            .into_value::<serde_json::Value>()
            .unwrap_or(serde_json::Value::Null))
    }

    async fn query_all(&self, element: &str) -> Result<Vec<Element>, SessionError> {
        self.page()?
            .find_elements(element)
            .await
            .map_err(|e| SessionError::Query(e.to_string()))
    }

    async fn query_within(&self, element: &Element, selector: &str) -> Result<Element, SessionError> {
        self.page()?;
        element
            .find_element(selector)
            .await
            .map_err(|_| SessionError::NotFound {
                selector: selector.to_string(),
            })
    }

    async fn attribute(&self, element: &Element, name: &str) -> Result<Option<String>, SessionError> {
        self.page()?;
        element
            .attribute(name)
            .await
            .map_err(|e| SessionError::Query(e.to_string()))
    }

    async fn close(&mut self) -> Result<(), SessionError> {
        if self.closed {
            return Ok(());
        }
        self.closed = true;

        let mut failure = None;
        if let Some(page) = self.page.take() {
            if let Err(err) = page.close().await {
                grab_warn!("closing page failed: {}", err);
            }
        }
        if let Err(err) = self.browser.close().await {
            failure = Some(SessionError::Shutdown(err.to_string()));
        }
        if let Err(err) = self.browser.wait().await {
            grab_trace!("waiting for browser exit failed: {}", err);
        }
        self.handler.abort();
        failure.map_or(Ok(()), Err)
    }

    fn current_url(&self) -> Option<&str> {
        self.current_url.as_deref()
    }

    fn is_live(&self) -> bool {
        !self.closed && self.page.is_some()
    }
}

impl Drop for ChromiumSession {
    fn drop(&mut self) {
        if !self.closed {
            self.handler.abort();
        }
    }
}
