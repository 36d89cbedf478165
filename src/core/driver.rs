use super::{
    event::ScheduleEvent,
    observer::Observer,
    state::{RunCtx, TaskId, Ticks},
};
use crate::scheduler::{ENQ_PREEMPT, ENQ_REENQ, ENQ_WAKEUP, EnqueueFlags, Scheduler};
use tracing::{debug, trace};

#[derive(Debug)]
pub struct TickOutcome {
    pub event: ScheduleEvent,
    pub completed: Option<TaskId>,
}

pub struct SchedCore<S: Scheduler> {
    pub ctx: RunCtx,
    pub scheduler: S,
    observer: Observer,
    // Slice expired; waiting for the driver to admit arrivals first
    preempted: Option<TaskId>,
}

impl<S: Scheduler> SchedCore<S> {
    pub fn new(params: S::Params) -> Self {
        let mut ctx = RunCtx::new();
        let scheduler = S::init(&mut ctx, params);
        let observer = Observer::new();
        Self {
            ctx,
            scheduler,
            observer,
            preempted: None,
        }
    }

    // None if nothing was runnable
    pub fn tick(&mut self) -> Option<TickOutcome> {
        debug_assert!(
            self.preempted.is_none(),
            "Preempted task must be requeued before the next tick"
        );

        if self.ctx.cpu_is_idle() {
            self.try_schedule_cpu();
        }

        let current_task_id = self.ctx.cpu.current?;
        let now = self.ctx.now;

        {
            let task = self.ctx.task_mut(current_task_id);
            task.remaining -= 1;
            task.consumed_timeslice = task.consumed_timeslice.saturating_add(1);
        }

        self.scheduler.tick(&mut self.ctx, current_task_id);

        let task = self.ctx.task(current_task_id);
        let event = ScheduleEvent {
            tick: now,
            process_id: task.name.clone(),
            queue_level: task.queue_level,
            remaining: task.remaining,
        };
        trace!(tick = now, task = %task.name, remaining = task.remaining, "ran");

        let completed = task.remaining == 0;
        let slice_expired = task.consumed_timeslice
            == task
                .allocated_timeslice
                .expect("Running task must have a timeslice")
            && !completed;

        self.ctx.advance_time(1);

        let mut outcome = TickOutcome {
            event,
            completed: None,
        };

        if completed {
            debug!(task = %self.ctx.task(current_task_id).name, finish = self.ctx.now, "completed");
            self.ctx.clear_cpu();
            self.ctx.mark_completed(current_task_id, self.ctx.now);
            outcome.completed = Some(current_task_id);
        } else if slice_expired {
            self.ctx.clear_cpu();
            self.ctx.mark_runnable(current_task_id);
            self.preempted = Some(current_task_id);
        }

        self.observer.observe(&self.ctx);
        Some(outcome)
    }

    fn try_schedule_cpu(&mut self) {
        if let Some(task) = self.ctx.dsq_pop(self.ctx.local_dsq()) {
            self.dispatch_to_cpu(task);
            return;
        }

        if let Some(task) = self.ctx.dsq_pop(self.ctx.global_dsq()) {
            self.dispatch_to_cpu(task);
            return;
        }

        if self.scheduler.dispatch(&mut self.ctx).is_none() {
            // Scheduler left CPU idle.
            return;
        }

        if let Some(task) = self.ctx.dsq_pop(self.ctx.local_dsq()) {
            self.dispatch_to_cpu(task);
        }
    }

    fn dispatch_to_cpu(&mut self, task: TaskId) {
        self.ctx.set_running(task);
        let t = self.ctx.task(task);
        debug!(
            now = self.ctx.now,
            task = %t.name,
            remaining = t.remaining,
            slice = t.allocated_timeslice,
            level = t.queue_level,
            "dispatch"
        );
    }

    pub fn wake_task(&mut self, task: TaskId) {
        self.ctx.mark_runnable(task);
        self.enqueue(task, ENQ_WAKEUP);
    }

    pub fn requeue_preempted(&mut self) {
        if let Some(task) = self.preempted.take() {
            debug!(now = self.ctx.now, task = %self.ctx.task(task).name, "preempted");
            self.enqueue(task, ENQ_PREEMPT | ENQ_REENQ);
        }
    }

    fn enqueue(&mut self, task: TaskId, flags: EnqueueFlags) {
        self.scheduler.enqueue(&mut self.ctx, task, flags);
    }

    pub fn skip_to(&mut self, when: Ticks) {
        debug_assert!(!self.ctx.has_runnable_work(), "Only an idle CPU may skip time");
        if when > self.ctx.now {
            debug!(from = self.ctx.now, to = when, "idle");
            self.ctx.advance_time(when - self.ctx.now);
        }
    }

    pub fn has_runnable_work(&self) -> bool {
        self.preempted.is_some() || self.ctx.has_runnable_work()
    }

    pub fn now(&self) -> Ticks {
        self.ctx.now
    }

    pub fn observer(&self) -> &Observer {
        &self.observer
    }
}
