use feedgrab_logging::{grab_debug, grab_error, grab_info, grab_warn};

use crate::HarvestEvent;

pub trait ProgressSink: Send + Sync {
    fn emit(&self, event: HarvestEvent);
}

/// Logs every event as its progress line; failures log at warn or error.
#[derive(Debug, Default)]
pub struct LogProgressSink;

impl ProgressSink for LogProgressSink {
    fn emit(&self, event: HarvestEvent) {
        match &event {
            HarvestEvent::DiscoveryFailed { .. } => grab_error!("{}", event),
            HarvestEvent::Scrolled { .. } => grab_debug!("{}", event),
            HarvestEvent::CandidateSkipped { .. }
            | HarvestEvent::DownloadFailed { .. }
            | HarvestEvent::SessionClosed { error: Some(_) } => grab_warn!("{}", event),
            _ => grab_info!("{}", event),
        }
    }
}
