//! # Ritual Core Library
//!
//! This library provides the core logic for Ritual, a timer for daily
//! routines: an ordered checklist of tasks timed as one run. It follows a
//! CLI-first philosophy where every operation is available via the `ritual`
//! binary, which is a thin layer over this crate.
//!
//! ## Architecture
//!
//! - **Routine**: A run state machine over explicit instants. It never reads
//!   the clock itself; callers pass `now` and the routine keeps a monotonic
//!   time cursor that simulated advances can push forward.
//! - **Timers**: Start/end pairs with routine-level (rounded-up) and
//!   task-level (floor) minute reads
//! - **Snapshot**: Save/restore contract so a killed process can rebuild
//!   an equivalent run
//! - **Storage**: SQLite routine storage and TOML configuration
//!
//! ## Key Components
//!
//! - [`Routine`]: Run state machine and task list operations
//! - [`RoutineSnapshot`]: Persistable run state
//! - [`Database`]: Routine and key-value persistence
//! - [`Config`]: Application configuration management

pub mod error;
pub mod events;
pub mod routine;
pub mod snapshot;
pub mod storage;
pub mod task;
pub mod timer;

pub use error::{ConfigError, CoreError, DatabaseError, ValidationError};
pub use events::Event;
pub use routine::{Routine, RoutineId, RoutineState, FAST_FORWARD_SECS, MAX_ADVANCE_SECS};
pub use snapshot::{restore, snapshot, RoutineSnapshot, TaskSnapshot};
pub use storage::{Config, Database, RoutineSummary, RunState};
pub use task::{Task, TaskDuration, TaskId, TaskList};
pub use timer::{RoutineTimer, TaskTimer, Timed, Timer};

/// The local wall-clock instant, as the routine engine expects it.
pub fn now_local() -> chrono::NaiveDateTime {
    chrono::Local::now().naive_local()
}
