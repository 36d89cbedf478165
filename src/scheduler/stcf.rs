use super::{ENQ_PREEMPT, EnqueueFlags, RunCtx, Scheduler, TaskId};
use crate::core::DsqId;
use tracing::trace;

// Re-evaluate every tick
const STCF_SLICE: u64 = 1;

// One-tick slices, so a newcomer with less work left wins the next tick
pub struct StcfScheduler {
    ready: DsqId,
}

impl Scheduler for StcfScheduler {
    type Params = ();

    fn init(ctx: &mut RunCtx, _params: ()) -> Self {
        Self {
            ready: ctx.create_dsq_priq(),
        }
    }

    fn name(&self) -> &'static str {
        "stcf"
    }

    fn enqueue(&mut self, ctx: &mut RunCtx, task: TaskId, flags: EnqueueFlags) {
        let remaining = ctx.task(task).remaining;
        if flags & ENQ_PREEMPT != 0 {
            trace!(task, remaining, "stcf requeue");
        }
        ctx.dsq_push_priq(self.ready, task, STCF_SLICE, remaining);
    }

    fn dispatch(&mut self, ctx: &mut RunCtx) -> Option<TaskId> {
        ctx.dsq_move_to_local(self.ready)
    }
}
