pub mod fifo;
pub mod mlfq;
pub mod rr;
pub mod sjf;
pub mod stcf;

use crate::core::{
    Ticks,
    state::{RunCtx, TaskId},
};
pub use fifo::FifoScheduler;
pub use mlfq::{MlfqConfig, MlfqScheduler};
pub use rr::RoundRobinScheduler;
pub use sjf::SjfScheduler;
pub use stcf::StcfScheduler;

pub type EnqueueFlags = u64;

// Task just arrived
pub const ENQ_WAKEUP: EnqueueFlags = 1 << 0;
// Task lost the CPU to slice expiry
pub const ENQ_PREEMPT: EnqueueFlags = 1 << 32;
pub const ENQ_REENQ: EnqueueFlags = 1 << 40;

// Run until completion
pub const SLICE_INF: Ticks = Ticks::MAX;

pub trait Scheduler {
    type Params;

    fn init(ctx: &mut RunCtx, params: Self::Params) -> Self;

    fn name(&self) -> &'static str;

    fn enqueue(&mut self, ctx: &mut RunCtx, task: TaskId, flags: EnqueueFlags);

    fn dispatch(&mut self, _ctx: &mut RunCtx) -> Option<TaskId> {
        None
    }

    fn tick(&mut self, _ctx: &mut RunCtx, _task: TaskId) {}
}
