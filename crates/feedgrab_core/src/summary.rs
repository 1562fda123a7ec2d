use std::fmt;

/// Totals for one run. Every candidate lands in exactly one of
/// `downloaded`, `skipped` or `failed`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct RunSummary {
    pub candidates: usize,
    pub downloaded: usize,
    pub skipped: usize,
    pub failed: usize,
}

impl RunSummary {
    pub fn new(candidates: usize) -> Self {
        Self {
            candidates,
            ..Self::default()
        }
    }

    pub fn record_downloaded(&mut self) {
        self.downloaded += 1;
    }

    pub fn record_skipped(&mut self) {
        self.skipped += 1;
    }

    pub fn record_failed(&mut self) {
        self.failed += 1;
    }

    pub fn is_complete(&self) -> bool {
        self.downloaded + self.skipped + self.failed == self.candidates
    }
}

impl fmt::Display for RunSummary {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{} candidates: {} downloaded, {} skipped, {} failed",
            self.candidates, self.downloaded, self.skipped, self.failed
        )
    }
}
