pub mod driver;
pub mod event;
pub mod observer;
pub mod state;

pub use driver::{SchedCore, TickOutcome};
pub use event::ScheduleEvent;
pub use state::{CpuState, Dsq, DsqId, QueueLevel, Rank, RunCtx, Task, TaskId, TaskState, Ticks};
