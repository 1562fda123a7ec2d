use std::fmt;
use std::path::PathBuf;

use feedgrab_core::ResolveError;

use crate::SessionError;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Stage {
    Navigating,
    WaitingForPosts,
    Scrolling,
    Extracting,
}

impl fmt::Display for Stage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let label = match self {
            Stage::Navigating => "navigating",
            Stage::WaitingForPosts => "waiting for posts",
            Stage::Scrolling => "scrolling",
            Stage::Extracting => "extracting",
        };
        f.write_str(label)
    }
}

/// Progress reported by the pipeline, in the order things happen.
#[derive(Debug, Clone, PartialEq)]
pub enum HarvestEvent {
    /// Discovery stopped early; no candidates come out of this run.
    DiscoveryFailed { stage: Stage, error: SessionError },
    /// Lazy loading finished after `rounds` scrolls.
    Scrolled {
        rounds: u32,
        stabilized: bool,
        height: f64,
    },
    /// A post without a preview image. `post` is the 1-based post position.
    PostSkipped { post: usize, reason: SessionError },
    CandidatesFound { count: usize },
    CandidateSkipped { index: usize, reason: ResolveError },
    Downloaded {
        index: usize,
        total: usize,
        path: PathBuf,
    },
    DownloadFailed { index: usize, error: FetchError },
    SessionClosed { error: Option<SessionError> },
}

impl fmt::Display for HarvestEvent {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            HarvestEvent::DiscoveryFailed { stage, error } => {
                write!(f, "Error getting images while {stage}: {error}")
            }
            HarvestEvent::Scrolled {
                rounds,
                stabilized,
                height,
            } => write!(
                f,
                "Scrolled {rounds} round(s), stabilized={stabilized} height={height}"
            ),
            HarvestEvent::PostSkipped { post, reason } => {
                write!(f, "Skipping post {post} - {reason}")
            }
            HarvestEvent::CandidatesFound { count } => {
                write!(f, "Found {count} potential images to download")
            }
            HarvestEvent::CandidateSkipped { index, reason } => {
                write!(f, "Skipping image {index} - {reason}")
            }
            HarvestEvent::Downloaded { index, total, path } => {
                write!(f, "Successfully downloaded image {index}/{total} to {path:?}")
            }
            HarvestEvent::DownloadFailed { index, error } => {
                write!(f, "Failed to download image {index}: {error}")
            }
            HarvestEvent::SessionClosed { error: None } => f.write_str("Browser session closed"),
            HarvestEvent::SessionClosed { error: Some(error) } => {
                write!(f, "Browser session closed with error: {error}")
            }
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("{kind}: {message}")]
pub struct FetchError {
    pub kind: FailureKind,
    pub message: String,
}

impl FetchError {
    pub(crate) fn new(kind: FailureKind, message: impl Into<String>) -> Self {
        Self {
            kind,
            message: message.into(),
        }
    }

    /// Whether another attempt could succeed.
    pub fn is_retryable(&self) -> bool {
        !matches!(self.kind, FailureKind::InvalidUrl)
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FailureKind {
    InvalidUrl,
    HttpStatus(u16),
    Timeout,
    RedirectLimitExceeded,
    TooLarge { max_bytes: u64, actual: Option<u64> },
    Io,
    Network,
}

impl fmt::Display for FailureKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            FailureKind::InvalidUrl => write!(f, "invalid url"),
            FailureKind::HttpStatus(code) => write!(f, "http status {code}"),
            FailureKind::Timeout => write!(f, "timeout"),
            FailureKind::RedirectLimitExceeded => write!(f, "redirect limit exceeded"),
            FailureKind::TooLarge { max_bytes, actual } => {
                write!(f, "response too large (max {max_bytes}, actual {actual:?})")
            }
            FailureKind::Io => write!(f, "io error"),
            FailureKind::Network => write!(f, "network error"),
        }
    }
}
