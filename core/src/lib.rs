pub mod input;
pub mod logging;
pub mod model;
pub mod overdue;
pub mod repository;
pub mod store;
pub mod time;

pub use input::{expand_key, parse_args, TokenizedInput};
pub use logging::init_logging;
pub use model::task::{Stage, Task, TaskId};
pub use model::toast::{Toast, ToastId, ToastKind};
pub use overdue::{overdue_task_ids, OverdueMonitor};
pub use repository::{BoardRepository, FileBoardRepository, MemoryRepository};
pub use store::{BoardStore, TaskPatch};
pub use time::parse_human_date;
