use super::{EnqueueFlags, RunCtx, Scheduler, TaskId};
use crate::core::Ticks;

pub struct RoundRobinScheduler {
    quantum: Ticks,
}

impl Scheduler for RoundRobinScheduler {
    type Params = Ticks;

    fn init(_ctx: &mut RunCtx, quantum: Ticks) -> Self {
        debug_assert!(quantum > 0, "quantum must be validated before init");
        Self { quantum }
    }

    fn name(&self) -> &'static str {
        "rr"
    }

    fn enqueue(&mut self, ctx: &mut RunCtx, task: TaskId, _flags: EnqueueFlags) {
        let dsq = ctx.global_dsq();
        ctx.dsq_push_fifo(dsq, task, self.quantum);
    }
}
