//! Visibility filters over a task list.

use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::task::Task;

/// Which tasks are visible.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Filter {
    /// Every task.
    #[default]
    All,
    /// Tasks that are not completed.
    Active,
    /// Tasks that are completed.
    Completed,
}

/// Error returned when a filter name is not recognised.
#[derive(Debug, Error, PartialEq, Eq)]
#[error("unknown filter '{0}' (expected all, active or completed)")]
pub struct ParseFilterError(String);

impl Filter {
    /// All filters in display order.
    pub const ALL: [Self; 3] = [Self::All, Self::Active, Self::Completed];

    /// Returns `true` if the task is visible under this filter.
    #[must_use]
    pub const fn matches(self, task: &Task) -> bool {
        match self {
            Self::All => true,
            Self::Active => !task.completed,
            Self::Completed => task.completed,
        }
    }

    /// Projects `tasks` to the visible subset, preserving order.
    #[must_use]
    pub fn apply(self, tasks: &[Task]) -> Vec<Task> {
        tasks.iter().filter(|t| self.matches(t)).cloned().collect()
    }

    /// The next filter in display order, wrapping around.
    #[must_use]
    pub const fn next(self) -> Self {
        match self {
            Self::All => Self::Active,
            Self::Active => Self::Completed,
            Self::Completed => Self::All,
        }
    }

    /// Human-readable label.
    #[must_use]
    pub const fn label(self) -> &'static str {
        match self {
            Self::All => "All",
            Self::Active => "Active",
            Self::Completed => "Completed",
        }
    }
}

impl std::fmt::Display for Filter {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::All => write!(f, "all"),
            Self::Active => write!(f, "active"),
            Self::Completed => write!(f, "completed"),
        }
    }
}

impl std::str::FromStr for Filter {
    type Err = ParseFilterError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "all" => Ok(Self::All),
            "active" => Ok(Self::Active),
            "completed" => Ok(Self::Completed),
            other => Err(ParseFilterError(other.to_string())),
        }
    }
}
