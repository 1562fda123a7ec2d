//! One harvesting run: discover candidates on the rendered feed, release the
//! browser, then download each candidate in index order.

use feedgrab_core::{output_stem, HarvestConfig, ResolveError, RunSummary};

use crate::discover::{extract_candidates, Discovery};
use crate::fetch::ImageFetcher;
use crate::progress::ProgressSink;
use crate::resolve::resolve_element;
use crate::scroll::stabilize;
use crate::{HarvestEvent, RenderedPageSession, SessionError, Stage};

/// A discovered image, numbered by its 1-based discovery position.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Candidate {
    pub index: usize,
    pub source: Result<String, ResolveError>,
}

/// Runs the whole pipeline. The session is closed exactly once, before any
/// download starts, whatever happened during discovery.
pub async fn run_harvest<S, F>(
    config: &HarvestConfig,
    mut session: S,
    fetcher: &F,
    sink: &dyn ProgressSink,
) -> RunSummary
where
    S: RenderedPageSession,
    F: ImageFetcher + ?Sized,
{
    let candidates = collect_candidates(config, &mut session, sink).await;

    let close_error = session.close().await.err();
    sink.emit(HarvestEvent::SessionClosed { error: close_error });
    drop(session);

    download_candidates(config, candidates, fetcher, sink).await
}

/// Discovery plus URL resolution against the live session.
///
/// Session-level failures end discovery with an empty candidate list; they
/// are reported through `sink`, never returned.
pub async fn collect_candidates<S: RenderedPageSession>(
    config: &HarvestConfig,
    session: &mut S,
    sink: &dyn ProgressSink,
) -> Vec<Candidate> {
    let discovery = match discover(config, session, sink).await {
        Ok(discovery) => discovery,
        Err((stage, error)) => {
            sink.emit(HarvestEvent::DiscoveryFailed { stage, error });
            return Vec::new();
        }
    };

    for skip in discovery.skipped {
        sink.emit(HarvestEvent::PostSkipped {
            post: skip.post,
            reason: skip.reason,
        });
    }
    sink.emit(HarvestEvent::CandidatesFound {
        count: discovery.images.len(),
    });

    let mut candidates = Vec::with_capacity(discovery.images.len());
    for (offset, image) in discovery.images.iter().enumerate() {
        candidates.push(Candidate {
            index: offset + 1,
            source: resolve_element(&*session, image).await,
        });
    }
    candidates
}

async fn discover<S: RenderedPageSession>(
    config: &HarvestConfig,
    session: &mut S,
    sink: &dyn ProgressSink,
) -> Result<Discovery<S::Element>, (Stage, SessionError)> {
    session
        .open(&config.feed_url)
        .await
        .map_err(|error| (Stage::Navigating, error))?;
    session
        .wait_for(&config.post_tag, config.element_wait_timeout())
        .await
        .map_err(|error| (Stage::WaitingForPosts, error))?;

    let report = stabilize(&*session, config.max_scroll_rounds, config.scroll_pause())
        .await
        .map_err(|error| (Stage::Scrolling, error))?;
    sink.emit(HarvestEvent::Scrolled {
        rounds: report.rounds,
        stabilized: report.stabilized,
        height: report.height,
    });

    extract_candidates(
        &*session,
        &config.post_tag,
        &config.image_selector,
        config.max_images,
    )
    .await
    .map_err(|error| (Stage::Extracting, error))
}

/// Downloads candidates one at a time into `config.download_dir`.
///
/// Unresolvable candidates and failed downloads are reported and counted;
/// later candidates keep their own index either way.
pub async fn download_candidates<F: ImageFetcher + ?Sized>(
    config: &HarvestConfig,
    candidates: Vec<Candidate>,
    fetcher: &F,
    sink: &dyn ProgressSink,
) -> RunSummary {
    let total = candidates.len();
    let mut summary = RunSummary::new(total);

    for Candidate { index, source } in candidates {
        let url = match source {
            Ok(url) => url,
            Err(reason) => {
                sink.emit(HarvestEvent::CandidateSkipped { index, reason });
                summary.record_skipped();
                continue;
            }
        };

        let stem = output_stem(&config.download_dir, &config.file_prefix, index);
        match fetcher.download(&url, &stem).await {
            Ok(path) => {
                sink.emit(HarvestEvent::Downloaded { index, total, path });
                summary.record_downloaded();
            }
            Err(error) => {
                sink.emit(HarvestEvent::DownloadFailed { index, error });
                summary.record_failed();
            }
        }
    }
    summary
}
