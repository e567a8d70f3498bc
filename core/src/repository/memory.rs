use std::cell::RefCell;

use anyhow::Result;

use crate::model::task::Task;
use crate::repository::traits::BoardRepository;

/// Keeps the board in memory only. Useful for tests and throwaway boards.
#[derive(Default)]
pub struct MemoryRepository {
    tasks: RefCell<Vec<Task>>,
}

impl MemoryRepository {
    pub fn new() -> Self {
        Self::default()
    }
}

impl BoardRepository for MemoryRepository {
    fn load(&self) -> Result<Vec<Task>> {
        Ok(self.tasks.borrow().clone())
    }

    fn save(&self, tasks: &[Task]) -> Result<()> {
        *self.tasks.borrow_mut() = tasks.to_vec();
        Ok(())
    }
}
