use std::time::Duration;

use feedgrab_logging::grab_trace;

use crate::{RenderedPageSession, SessionError};

pub const DOCUMENT_HEIGHT_SCRIPT: &str = "document.body.scrollHeight";
pub const SCROLL_TO_BOTTOM_SCRIPT: &str = "window.scrollTo(0, document.body.scrollHeight)";

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ScrollReport {
    /// Scroll commands issued.
    pub rounds: u32,
    /// True when the loop ended because the height stopped changing.
    pub stabilized: bool,
    pub height: f64,
}

/// Scrolls to the bottom until the document height stops growing, at most
/// `max_rounds` times, pausing `pause` after each scroll for lazy content.
///
/// Hitting `max_rounds` is not an error; the feed may simply be endless.
pub async fn stabilize<S: RenderedPageSession>(
    session: &S,
    max_rounds: u32,
    pause: Duration,
) -> Result<ScrollReport, SessionError> {
    let mut last_height = document_height(session).await?;
    let mut rounds = 0;

    while rounds < max_rounds {
        session.run_script(SCROLL_TO_BOTTOM_SCRIPT).await?;
        rounds += 1;
        tokio::time::sleep(pause).await;

        let height = document_height(session).await?;
        grab_trace!("scroll round {} height {} -> {}", rounds, last_height, height);
        if height == last_height {
            return Ok(ScrollReport {
                rounds,
                stabilized: true,
                height,
            });
        }
        last_height = height;
    }

    Ok(ScrollReport {
        rounds,
        stabilized: false,
        height: last_height,
    })
}

async fn document_height<S: RenderedPageSession>(session: &S) -> Result<f64, SessionError> {
    let value = session.run_script(DOCUMENT_HEIGHT_SCRIPT).await?;
    value
        .as_f64()
        .ok_or_else(|| SessionError::Script(format!("document height is not a number: {value}")))
}
