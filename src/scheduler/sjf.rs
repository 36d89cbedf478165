use super::{EnqueueFlags, RunCtx, SLICE_INF, Scheduler, TaskId};
use crate::core::DsqId;

// Unbounded slice: a shorter arrival waits for the CPU to free up
pub struct SjfScheduler {
    ready: DsqId,
}

impl Scheduler for SjfScheduler {
    type Params = ();

    fn init(ctx: &mut RunCtx, _params: ()) -> Self {
        Self {
            ready: ctx.create_dsq_priq(),
        }
    }

    fn name(&self) -> &'static str {
        "sjf"
    }

    fn enqueue(&mut self, ctx: &mut RunCtx, task: TaskId, _flags: EnqueueFlags) {
        let burst = ctx.task(task).burst_time;
        ctx.dsq_push_priq(self.ready, task, SLICE_INF, burst);
    }

    fn dispatch(&mut self, ctx: &mut RunCtx) -> Option<TaskId> {
        ctx.dsq_move_to_local(self.ready)
    }
}
