//! Per-entry and per-run counters.
//!
//! Every stage returns its decisions as counts so the orchestrator can
//! report one inspectable summary at the end of a run instead of the
//! log stream being the only record.

use std::fmt;

/// Frame-level outcome counts for one catalog entry's filter pass.
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
pub struct FilterStats {
    /// Frames with a detected hand, written to the dataset.
    pub saved: usize,
    /// Frames with no detectable hand, dropped.
    pub discarded: usize,
    /// Frames skipped for a recoverable reason (unreadable image,
    /// degenerate crop, detector error, unparseable filename).
    pub skipped: usize,
}

/// Whole-run counters aggregated by the orchestrator.
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
pub struct RunSummary {
    /// Entries that ran the full extract + filter path.
    pub entries_processed: usize,
    /// Entries skipped because the source video was absent.
    pub entries_skipped: usize,
    /// Entries abandoned after an extraction or filter failure.
    pub entries_failed: usize,
    pub frames_saved: usize,
    pub frames_discarded: usize,
    pub frames_skipped: usize,
}

impl RunSummary {
    pub fn record_filtered(&mut self, stats: FilterStats) {
        self.entries_processed += 1;
        self.frames_saved += stats.saved;
        self.frames_discarded += stats.discarded;
        self.frames_skipped += stats.skipped;
    }
}

impl fmt::Display for RunSummary {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{} entries processed, {} skipped, {} failed; {} frames saved, {} discarded, {} skipped",
            self.entries_processed,
            self.entries_skipped,
            self.entries_failed,
            self.frames_saved,
            self.frames_discarded,
            self.frames_skipped
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn record_filtered_accumulates_frame_counts() {
        let mut summary = RunSummary::default();
        summary.record_filtered(FilterStats {
            saved: 3,
            discarded: 2,
            skipped: 1,
        });
        summary.record_filtered(FilterStats {
            saved: 1,
            discarded: 0,
            skipped: 0,
        });
        assert_eq!(summary.entries_processed, 2);
        assert_eq!(summary.frames_saved, 4);
        assert_eq!(summary.frames_discarded, 2);
        assert_eq!(summary.frames_skipped, 1);
    }
}
