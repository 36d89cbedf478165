use super::{EnqueueFlags, RunCtx, SLICE_INF, Scheduler, TaskId};

// Arrivals are admitted in (arrival, id) order and never requeued
pub struct FifoScheduler;

impl Scheduler for FifoScheduler {
    type Params = ();

    fn init(_ctx: &mut RunCtx, _params: ()) -> Self {
        Self
    }

    fn name(&self) -> &'static str {
        "fifo"
    }

    fn enqueue(&mut self, ctx: &mut RunCtx, task: TaskId, _flags: EnqueueFlags) {
        let dsq = ctx.global_dsq();
        ctx.dsq_push_fifo(dsq, task, SLICE_INF);
    }
}
