use chrono::{DateTime, Duration, Utc};
use log::{debug, error, warn};

use crate::model::task::{Stage, Task, TaskId};
use crate::model::toast::{Toast, ToastId, ToastKind};
use crate::repository::traits::BoardRepository;

// Action toasts clear themselves; move/due toasts are a little quicker.
const ACTION_TOAST_TTL_SECS: i64 = 3;
const MOVE_TOAST_TTL_SECS: i64 = 2;

/// Partial update for [`BoardStore::update_task`]. A `None` field is left
/// untouched; `due_date: Some(None)` clears an existing due date.
#[derive(Debug, Default, Clone)]
pub struct TaskPatch {
    pub title: Option<String>,
    pub description: Option<String>,
    pub due_date: Option<Option<DateTime<Utc>>>,
}

/// The canonical task list and the transient toast list, with every
/// mutation routed through here. Each task mutation is written back to the
/// repository; a write failure is logged and surfaced as an error toast
/// rather than returned to the caller.
pub struct BoardStore<R: BoardRepository> {
    repo: R,
    tasks: Vec<Task>,
    toasts: Vec<Toast>,
}

impl<R: BoardRepository> BoardStore<R> {
    /// Loads prior state through the repository. A board that cannot be
    /// read starts empty instead of failing startup.
    pub fn load(repo: R) -> Self {
        let tasks = repo.load().unwrap_or_else(|err| {
            warn!("could not read stored board, starting empty: {err:#}");
            Vec::new()
        });
        Self {
            repo,
            tasks,
            toasts: Vec::new(),
        }
    }

    pub fn tasks(&self) -> &[Task] {
        &self.tasks
    }

    /// Column view, computed from the canonical list on every read.
    pub fn tasks_in_stage(&self, stage: Stage) -> Vec<&Task> {
        self.tasks.iter().filter(|t| t.stage == stage).collect()
    }

    pub fn find_task(&self, id: TaskId) -> Option<&Task> {
        self.tasks.iter().find(|t| t.id == id)
    }

    pub fn toasts(&self) -> &[Toast] {
        &self.toasts
    }

    /// Creates a task in `New` and prepends it (newest first). Title
    /// validation is the caller's job; the store takes what it is given.
    pub fn add_task(
        &mut self,
        title: String,
        description: String,
        due_date: Option<DateTime<Utc>>,
    ) -> TaskId {
        let task = Task::new(title, description, due_date);
        let id = task.id;
        debug!("adding task {} ({})", id, task.title);
        let message = format!("\"{}\" has been added successfully!", task.title);
        self.tasks.insert(0, task);
        self.persist();
        self.add_toast(
            ToastKind::Success,
            "Task Created",
            message,
            Some(Duration::seconds(ACTION_TOAST_TTL_SECS)),
        );
        id
    }

    /// Merges `patch` into the task. Unknown ids are a silent no-op.
    pub fn update_task(&mut self, id: TaskId, patch: TaskPatch) {
        let Some(task) = self.tasks.iter_mut().find(|t| t.id == id) else {
            return;
        };
        if let Some(title) = patch.title {
            task.title = title;
        }
        if let Some(description) = patch.description {
            task.description = description;
        }
        if let Some(due_date) = patch.due_date {
            task.due_date = due_date;
        }
        let message = format!("\"{}\" has been updated successfully!", task.title);
        debug!("updated task {}", id);
        self.persist();
        self.add_toast(
            ToastKind::Success,
            "Task Updated",
            message,
            Some(Duration::seconds(ACTION_TOAST_TTL_SECS)),
        );
    }

    /// Removes the task. Unknown ids are a silent no-op.
    pub fn delete_task(&mut self, id: TaskId) {
        let Some(pos) = self.tasks.iter().position(|t| t.id == id) else {
            return;
        };
        let removed = self.tasks.remove(pos);
        debug!("deleted task {} ({})", id, removed.title);
        self.persist();
        self.add_toast(
            ToastKind::Success,
            "Task Deleted",
            format!("\"{}\" has been deleted successfully!", removed.title),
            Some(Duration::seconds(ACTION_TOAST_TTL_SECS)),
        );
    }

    /// Sets the stage. Arriving in `Done` stamps the completion time, every
    /// time; leaving `Done` keeps the old stamp around.
    pub fn move_task(&mut self, id: TaskId, stage: Stage) {
        let Some(task) = self.tasks.iter_mut().find(|t| t.id == id) else {
            return;
        };
        task.stage = stage;
        if stage == Stage::Done {
            task.completed_at = Some(Utc::now());
        }
        let message = format!("\"{}\" moved to {}", task.title, stage.label());
        debug!("moved task {} to {}", id, stage.label());
        self.persist();
        self.add_toast(
            ToastKind::Info,
            "Task Moved",
            message,
            Some(Duration::seconds(MOVE_TOAST_TTL_SECS)),
        );
    }

    /// Overwrites any existing due date. Unknown ids are a silent no-op.
    pub fn set_due_date(&mut self, id: TaskId, due_date: DateTime<Utc>) {
        let Some(task) = self.tasks.iter_mut().find(|t| t.id == id) else {
            return;
        };
        task.due_date = Some(due_date);
        let message = format!("Due date set for \"{}\"", task.title);
        debug!("set due date on task {}", id);
        self.persist();
        self.add_toast(
            ToastKind::Info,
            "Due Date Set",
            message,
            Some(Duration::seconds(MOVE_TOAST_TTL_SECS)),
        );
    }

    pub fn add_toast(
        &mut self,
        kind: ToastKind,
        title: impl Into<String>,
        message: impl Into<String>,
        ttl: Option<Duration>,
    ) -> ToastId {
        let toast = Toast::new(kind, title, message, ttl);
        let id = toast.id;
        self.toasts.push(toast);
        id
    }

    /// Idempotent: removing an id that is already gone does nothing.
    pub fn remove_toast(&mut self, id: ToastId) {
        self.toasts.retain(|t| t.id != id);
    }

    pub fn clear_toasts(&mut self) {
        self.toasts.clear();
    }

    pub fn expired_toast_ids(&self, now: DateTime<Utc>) -> Vec<ToastId> {
        self.toasts
            .iter()
            .filter(|t| t.expired(now))
            .map(|t| t.id)
            .collect()
    }

    /// TTL sweep, driven by the presentation tick.
    pub fn expire_toasts(&mut self, now: DateTime<Utc>) {
        for id in self.expired_toast_ids(now) {
            self.remove_toast(id);
        }
    }

    fn persist(&mut self) {
        if let Err(err) = self.repo.save(&self.tasks) {
            error!("could not persist board: {err:#}");
            self.add_toast(
                ToastKind::Error,
                "Save Failed",
                format!("Your changes could not be written to disk: {err}"),
                None,
            );
        }
    }
}
