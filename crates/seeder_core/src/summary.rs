use std::fmt;

use crate::StatsSnapshot;

const RULE: &str = "+===================================================+";

/// Formats a duration in whole seconds as `H:MM:SS`. Hours are not wrapped.
pub fn format_runtime(total_secs: u64) -> String {
    let hours = total_secs / 3600;
    let minutes = (total_secs % 3600) / 60;
    let seconds = total_secs % 60;
    format!("{hours}:{minutes:02}:{seconds:02}")
}

/// The live progress line, prefixed with a carriage return so it overwrites itself.
pub fn status_line(elapsed_secs: u64) -> String {
    format!("\rRuntime: {}", format_runtime(elapsed_secs))
}

/// Results of the two cleanup sweeps.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct CleanupCounts {
    pub removed_by_type: usize,
    pub removed_as_duplicate: usize,
    /// Items left in the store after both sweeps.
    pub remaining: usize,
}

/// Final report printed once at shutdown.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Summary {
    pub stats: StatsSnapshot,
    pub cleanup: CleanupCounts,
    pub store_dir: String,
}

impl fmt::Display for Summary {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "{RULE}")?;
        writeln!(f, "Runtime: {}", format_runtime(self.stats.elapsed_secs))?;
        writeln!(
            f,
            "Total initial download attempts: {}",
            self.stats.num_downloads
        )?;
        writeln!(f, "Failed downloads: {}", self.stats.failed_downloads)?;
        writeln!(
            f,
            "Incorrect file-types removed: {}",
            self.cleanup.removed_by_type
        )?;
        writeln!(
            f,
            "Duplicate files removed: {}",
            self.cleanup.removed_as_duplicate
        )?;
        writeln!(
            f,
            "A total of {} unique files now exist in the `{}` directory",
            self.cleanup.remaining, self.store_dir
        )?;
        write!(f, "{RULE}")
    }
}
