//! Per-status and per-priority task counts.

use super::{TaskPriority, TaskStatus};
use serde::Serialize;

/// Task counts by status over a user's full task set.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct StatusCounts {
    /// Tasks in [`TaskStatus::Pending`].
    pub pending: u64,
    /// Tasks in [`TaskStatus::InProgress`].
    pub in_progress: u64,
    /// Tasks in [`TaskStatus::Completed`].
    pub completed: u64,
}

impl StatusCounts {
    /// Builds counts from `(status, count)` pairs; repeated statuses add up.
    #[must_use]
    pub fn from_pairs(pairs: impl IntoIterator<Item = (TaskStatus, u64)>) -> Self {
        pairs.into_iter().fold(Self::default(), |mut counts, (status, count)| {
            *counts.slot(status) += count;
            counts
        })
    }

    /// Count for one status.
    #[must_use]
    pub const fn get(&self, status: TaskStatus) -> u64 {
        match status {
            TaskStatus::Pending => self.pending,
            TaskStatus::InProgress => self.in_progress,
            TaskStatus::Completed => self.completed,
        }
    }

    /// Sum over every status.
    #[must_use]
    pub const fn total(&self) -> u64 {
        self.pending + self.in_progress + self.completed
    }

    const fn slot(&mut self, status: TaskStatus) -> &mut u64 {
        match status {
            TaskStatus::Pending => &mut self.pending,
            TaskStatus::InProgress => &mut self.in_progress,
            TaskStatus::Completed => &mut self.completed,
        }
    }
}

/// Task counts by priority.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct PriorityCounts {
    /// Tasks with [`TaskPriority::Low`].
    #[serde(rename = "Low")]
    pub low: u64,
    /// Tasks with [`TaskPriority::Medium`].
    #[serde(rename = "Medium")]
    pub medium: u64,
    /// Tasks with [`TaskPriority::High`].
    #[serde(rename = "High")]
    pub high: u64,
}

impl PriorityCounts {
    /// Builds counts from `(priority, count)` pairs; repeated priorities add up.
    #[must_use]
    pub fn from_pairs(pairs: impl IntoIterator<Item = (TaskPriority, u64)>) -> Self {
        pairs.into_iter().fold(Self::default(), |mut counts, (priority, count)| {
            match priority {
                TaskPriority::Low => counts.low += count,
                TaskPriority::Medium => counts.medium += count,
                TaskPriority::High => counts.high += count,
            }
            counts
        })
    }

    /// Count for one priority.
    #[must_use]
    pub const fn get(&self, priority: TaskPriority) -> u64 {
        match priority {
            TaskPriority::Low => self.low,
            TaskPriority::Medium => self.medium,
            TaskPriority::High => self.high,
        }
    }
}
