//! Board entities: the task record and the two sections that hold it.

pub mod section;
pub mod task;

pub use section::{Section, Sections};
pub use task::{Task, TaskRef};
