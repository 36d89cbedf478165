use super::state::{RunCtx, TaskState};

#[derive(Debug, Default)]
pub struct Observer {
    step: u64,
}

impl Observer {
    pub fn new() -> Self {
        Self { step: 0 }
    }

    pub fn steps(&self) -> u64 {
        self.step
    }

    pub fn observe(&mut self, ctx: &RunCtx) {
        self.step += 1;

        if let Some(task_id) = ctx.cpu.current {
            let task = ctx.task(task_id);
            debug_assert_eq!(
                task.state,
                TaskState::Running,
                "cpu.current task {task_id} must be Running"
            );
        }

        for task in &ctx.tasks {
            debug_assert!(
                task.remaining <= task.burst_time,
                "Task {} remaining {} exceeds burst {}",
                task.id,
                task.remaining,
                task.burst_time
            );
            debug_assert_eq!(
                task.state == TaskState::Completed,
                task.finish_time.is_some(),
                "Task {} finish time out of sync with state",
                task.id
            );
            if task.state == TaskState::Pending {
                debug_assert!(
                    task.arrival_time >= ctx.now,
                    "Task {} arrived at {} but was never admitted",
                    task.id,
                    task.arrival_time
                );
            }
        }

        for (&task_id, &dsq_id) in &ctx.task_to_dsq {
            let task = ctx.task(task_id);
            debug_assert_eq!(
                task.state,
                TaskState::Runnable,
                "Task {task_id} in DSQ {dsq_id:?} must be Runnable"
            );
            if let Some(dsq) = ctx.dsqs.get(dsq_id) {
                debug_assert!(
                    dsq.contains(task_id),
                    "task_to_dsq claims task {task_id} in DSQ {dsq_id:?}, but queue does not contain it"
                );
            } else {
                debug_assert!(false, "task_to_dsq references unknown DSQ {dsq_id:?}");
            }
        }
    }
}
