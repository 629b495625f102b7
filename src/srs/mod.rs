pub mod boolean;
pub mod due;
pub mod graded;
pub mod policy;

pub use due::{select_due, select_due_among};
pub use policy::SchedulingPolicy;
