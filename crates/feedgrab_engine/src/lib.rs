//! Feedgrab engine: browser session, discovery, downloads and the run pipeline.
mod chromium;
mod discover;
mod fetch;
mod persist;
mod pipeline;
mod progress;
mod resolve;
mod scroll;
mod session;
mod types;

pub use chromium::ChromiumSession;
pub use discover::{extract_candidates, Discovery, PostSkip};
pub use fetch::{FetchSettings, ImageFetcher, ReqwestFetcher};
pub use persist::{ensure_output_dir, PersistError, StagedFile, CHUNK_SIZE};
pub use pipeline::{collect_candidates, download_candidates, run_harvest, Candidate};
pub use progress::{LogProgressSink, ProgressSink};
pub use resolve::resolve_element;
pub use scroll::{stabilize, ScrollReport, DOCUMENT_HEIGHT_SCRIPT, SCROLL_TO_BOTTOM_SCRIPT};
pub use session::{RenderedPageSession, SessionError};
pub use types::{FailureKind, FetchError, HarvestEvent, Stage};
