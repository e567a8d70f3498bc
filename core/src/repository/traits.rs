use crate::model::task::Task;
use anyhow::Result;

/// Where the board's task list is kept between runs. Toasts are transient
/// and never pass through here.
pub trait BoardRepository {
    fn load(&self) -> Result<Vec<Task>>;
    fn save(&self, tasks: &[Task]) -> Result<()>;
}
