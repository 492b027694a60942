//! Derivation of progress and status from a checklist.

use super::{ChecklistItem, TaskStatus};
use serde::{Deserialize, Serialize};
use std::fmt;

/// Whole-number completion percentage in `0..=100`.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Progress(u8);

impl Progress {
    /// No work done.
    pub const NONE: Self = Self(0);
    /// All work done.
    pub const COMPLETE: Self = Self(100);

    /// Creates a progress value, clamping anything above 100.
    #[must_use]
    pub const fn new(percent: u8) -> Self {
        if percent > 100 {
            Self::COMPLETE
        } else {
            Self(percent)
        }
    }

    /// Returns the percentage.
    #[must_use]
    pub const fn value(self) -> u8 {
        self.0
    }

    /// Returns the status implied by this progress.
    #[must_use]
    pub const fn status(self) -> TaskStatus {
        match self.0 {
            0 => TaskStatus::Pending,
            100.. => TaskStatus::Completed,
            _ => TaskStatus::InProgress,
        }
    }
}

impl fmt::Display for Progress {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}%", self.0)
    }
}

/// Derives progress and status from a checklist.
///
/// An empty checklist is `(0, Pending)`. Otherwise progress is
/// `round(100 * done / total)` with halves rounding up.
#[must_use]
pub fn derive_progress(checklist: &[ChecklistItem]) -> (Progress, TaskStatus) {
    let total = checklist.len();
    if total == 0 {
        return (Progress::NONE, TaskStatus::Pending);
    }
    let done = checklist.iter().filter(|item| item.completed).count();
    let progress = Progress::new(rounded_percent(done, total));
    (progress, progress.status())
}

#[expect(
    clippy::integer_division,
    reason = "integer rounding keeps the percentage exact"
)]
fn rounded_percent(done: usize, total: usize) -> u8 {
    let percent = (200 * done + total) / (2 * total);
    u8::try_from(percent).unwrap_or(100)
}
