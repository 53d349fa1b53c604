//! Filtered task views
//!
//! `render` is a pure projection of the task collection. Overdue status is
//! recomputed against the supplied `now` on every call.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::str::FromStr;

use crate::task::Task;

/// Which tasks a view shows
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Filter {
    #[default]
    All,
    Active,
    Completed,
    Overdue,
}

impl Filter {
    fn admits(self, task: &Task, is_overdue: bool) -> bool {
        match self {
            Filter::All => true,
            Filter::Active => !task.completed,
            Filter::Completed => task.completed,
            Filter::Overdue => is_overdue,
        }
    }
}

impl FromStr for Filter {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "" | "all" => Ok(Filter::All),
            "active" => Ok(Filter::Active),
            "completed" => Ok(Filter::Completed),
            "overdue" => Ok(Filter::Overdue),
            other => Err(format!("unknown filter: {}", other)),
        }
    }
}

/// A task as it appears in a rendered list
#[derive(Debug, Clone, PartialEq)]
pub struct TaskView {
    pub task: Task,
    pub is_overdue: bool,
}

impl TaskView {
    /// Style classes: `task`, the priority, then `completed`/`overdue` when set
    pub fn classes(&self) -> String {
        let mut classes = vec!["task", self.task.priority.as_str()];
        if self.task.completed {
            classes.push("completed");
        }
        if self.is_overdue {
            classes.push("overdue");
        }
        classes.join(" ")
    }
}

/// Project `tasks` through `filter` and a case-insensitive `search`
pub fn render(tasks: &[Task], filter: Filter, search: &str, now: DateTime<Utc>) -> Vec<TaskView> {
    let needle = search.to_lowercase();
    tasks
        .iter()
        .filter_map(|task| {
            let is_overdue = task.is_overdue(now);
            if !filter.admits(task, is_overdue) {
                return None;
            }
            if !needle.is_empty() && !task.text.to_lowercase().contains(&needle) {
                return None;
            }
            Some(TaskView {
                task: task.clone(),
                is_overdue,
            })
        })
        .collect()
}
