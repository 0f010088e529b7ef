use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

use super::task::{Task, TaskRef};

/// One of the two buckets a task can live in.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Section {
    Active,
    Completed,
}

impl Section {
    /// Search order used by every lookup: active first, then completed.
    pub const ALL: [Section; 2] = [Section::Active, Section::Completed];

    pub fn as_str(&self) -> &'static str {
        match self {
            Section::Active => "active",
            Section::Completed => "completed",
        }
    }

    pub fn other(&self) -> Section {
        match self {
            Section::Active => Section::Completed,
            Section::Completed => Section::Active,
        }
    }
}

impl fmt::Display for Section {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Section {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "active" => Ok(Section::Active),
            "completed" => Ok(Section::Completed),
            other => Err(other.to_string()),
        }
    }
}

/// The board state: active tasks in insertion order, completed tasks most
/// recent first.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Sections {
    pub active: Vec<Task>,
    pub completed: Vec<Task>,
}

impl Sections {
    pub fn new(active: Vec<Task>, completed: Vec<Task>) -> Self {
        Self { active, completed }
    }

    pub fn get(&self, section: Section) -> &[Task] {
        match section {
            Section::Active => &self.active,
            Section::Completed => &self.completed,
        }
    }

    pub fn get_mut(&mut self, section: Section) -> &mut Vec<Task> {
        match section {
            Section::Active => &mut self.active,
            Section::Completed => &mut self.completed,
        }
    }

    /// Locate a task, returning the section it lives in and its index.
    pub fn locate(&self, task_ref: &TaskRef) -> Option<(Section, usize)> {
        Section::ALL.into_iter().find_map(|section| {
            self.get(section)
                .iter()
                .position(|task| task.matches(task_ref))
                .map(|index| (section, index))
        })
    }

    pub fn find(&self, task_ref: &TaskRef) -> Option<(Section, &Task)> {
        self.locate(task_ref)
            .map(|(section, index)| (section, &self.get(section)[index]))
    }

    pub fn len(&self) -> usize {
        self.active.len() + self.completed.len()
    }

    pub fn is_empty(&self) -> bool {
        self.active.is_empty() && self.completed.is_empty()
    }
}
