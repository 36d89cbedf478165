pub mod core;
pub mod engine;
pub mod error;
pub mod policy;
pub mod scheduler;
pub mod sim;

pub use crate::core::ScheduleEvent;
pub use engine::{Schedule, run};
pub use error::{Error, Result};
pub use policy::{MlfqParams, PolicyKind, PolicyParams, ProcessInput};
pub use scheduler::Scheduler;
pub use sim::{ProcessMetrics, Sim, Summary};
