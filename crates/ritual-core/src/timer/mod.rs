mod base;
mod routine_timer;
mod task_timer;

pub use base::{Timed, Timer};
pub use routine_timer::RoutineTimer;
pub use task_timer::TaskTimer;
