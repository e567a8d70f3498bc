use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Stable identifier for a task, assigned once at creation.
pub type TaskId = Uuid;

/// The three fixed columns of the board.
#[derive(Serialize, Deserialize, Debug, Clone, Copy, PartialEq, Eq)]
pub enum Stage {
    New,
    Ongoing,
    Done,
}

impl Stage {
    pub const ALL: [Stage; 3] = [Stage::New, Stage::Ongoing, Stage::Done];

    pub fn label(&self) -> &'static str {
        match self {
            Stage::New => "New",
            Stage::Ongoing => "Ongoing",
            Stage::Done => "Done",
        }
    }
}

impl Default for Stage {
    fn default() -> Self {
        Stage::New
    }
}

#[derive(Serialize, Deserialize, Debug, Clone, PartialEq)]
pub struct Task {
    pub id: TaskId,
    pub title: String,
    pub description: String,
    pub stage: Stage,
    pub created_at: DateTime<Utc>,
    pub due_date: Option<DateTime<Utc>>,

    // Stamped on every transition into Done and kept when the task later
    // leaves Done again. The last completion time is a historical marker,
    // not a live flag.
    pub completed_at: Option<DateTime<Utc>>,
}

impl Task {
    pub fn new(title: String, description: String, due_date: Option<DateTime<Utc>>) -> Self {
        Self {
            id: Uuid::new_v4(),
            title,
            description,
            stage: Stage::default(),
            created_at: Utc::now(),
            due_date,
            completed_at: None,
        }
    }
}
