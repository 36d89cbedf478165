use super::{ENQ_REENQ, EnqueueFlags, RunCtx, Scheduler, TaskId};
use crate::core::{DsqId, QueueLevel, Ticks};
use tracing::debug;

pub const MLFQ_LEVELS: usize = 3;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct MlfqConfig {
    pub quanta: [Ticks; MLFQ_LEVELS],
    pub boost_threshold: Ticks,
}

impl Default for MlfqConfig {
    fn default() -> Self {
        Self {
            quanta: [1, 2, 5],
            boost_threshold: 5,
        }
    }
}

pub struct MlfqScheduler {
    levels: [DsqId; MLFQ_LEVELS],
    config: MlfqConfig,
}

impl MlfqScheduler {
    fn push(&self, ctx: &mut RunCtx, task: TaskId, level: QueueLevel) {
        ctx.task_mut(task).queue_level = Some(level);
        let slice = self.config.quanta[level as usize];
        ctx.dsq_push_fifo(self.levels[level as usize], task, slice);
    }
}

impl Scheduler for MlfqScheduler {
    type Params = MlfqConfig;

    fn init(ctx: &mut RunCtx, config: MlfqConfig) -> Self {
        Self {
            levels: [
                ctx.create_dsq_fifo(),
                ctx.create_dsq_fifo(),
                ctx.create_dsq_fifo(),
            ],
            config,
        }
    }

    fn name(&self) -> &'static str {
        "mlfq"
    }

    fn enqueue(&mut self, ctx: &mut RunCtx, task: TaskId, flags: EnqueueFlags) {
        if flags & ENQ_REENQ == 0 {
            ctx.task_mut(task).allotment = 0;
            self.push(ctx, task, 0);
            return;
        }

        let now = ctx.now;
        let t = ctx.task_mut(task);
        let level = if t.allotment >= self.config.boost_threshold {
            debug!(task = %t.name, allotment = t.allotment, now, "priority boost");
            t.allotment = 0;
            0
        } else {
            let current = t.queue_level.unwrap_or(0);
            (current + 1).min(MLFQ_LEVELS as QueueLevel - 1)
        };
        self.push(ctx, task, level);
    }

    fn dispatch(&mut self, ctx: &mut RunCtx) -> Option<TaskId> {
        let level = self.levels.iter().position(|&dsq| !ctx.dsq_is_empty(dsq))?;
        ctx.dsq_move_to_local(self.levels[level])
    }

    fn tick(&mut self, ctx: &mut RunCtx, task: TaskId) {
        let t = ctx.task_mut(task);
        t.allotment = t.allotment.saturating_add(1);
    }
}
