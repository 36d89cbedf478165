use super::job::Job;
use crate::{
    core::{
        driver::SchedCore,
        event::ScheduleEvent,
        state::{TaskState, Ticks},
    },
    scheduler::Scheduler,
};

pub struct Sim<S: Scheduler> {
    pub core: SchedCore<S>,
    // Sorted by (arrival, id); jobs[i] backs TaskId i
    pub jobs: Vec<Job>,
    job_cursor: usize,
}

impl<S: Scheduler> Sim<S> {
    pub fn new(mut jobs: Vec<Job>, params: S::Params) -> Self {
        jobs.sort_by(|a, b| {
            a.arrival_time
                .cmp(&b.arrival_time)
                .then_with(|| a.id.cmp(&b.id))
        });

        let mut core = SchedCore::<S>::new(params);
        for job in &jobs {
            let task_id = core
                .ctx
                .create_task(job.id.clone(), job.arrival_time, job.burst_time);
            debug_assert_eq!(core.ctx.task(task_id).name, job.id);
        }

        let mut sim = Self {
            core,
            jobs,
            job_cursor: 0,
        };
        sim.handle_arrivals();
        sim
    }

    pub fn step(&mut self) -> Option<ScheduleEvent> {
        if !self.core.has_runnable_work() {
            let next = self.next_arrival()?;
            self.core.skip_to(next);
            self.handle_arrivals();
        }

        let outcome = self.core.tick()?;

        // Arrivals up to the slice boundary queue ahead of the preempted task
        self.handle_arrivals();
        self.core.requeue_preempted();

        Some(outcome.event)
    }

    fn handle_arrivals(&mut self) {
        let now = self.core.now();
        // Contiguous, since jobs are sorted
        while let Some(job) = self.jobs.get(self.job_cursor) {
            if job.arrival_time > now {
                break;
            }
            self.core.wake_task(self.job_cursor);
            self.job_cursor += 1;
        }
    }

    fn next_arrival(&self) -> Option<Ticks> {
        self.jobs.get(self.job_cursor).map(|job| job.arrival_time)
    }

    pub fn all_jobs_completed(&self) -> bool {
        self.core
            .ctx
            .tasks
            .iter()
            .all(|task| task.state == TaskState::Completed)
    }

    pub fn policy_name(&self) -> &'static str {
        self.core.scheduler.name()
    }
}

impl<S: Scheduler> Iterator for Sim<S> {
    type Item = ScheduleEvent;

    fn next(&mut self) -> Option<Self::Item> {
        self.step()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::scheduler::{FifoScheduler, RoundRobinScheduler, SjfScheduler, StcfScheduler};

    fn job(id: &str, arrival_time: Ticks, burst_time: Ticks) -> Job {
        Job {
            id: id.to_string(),
            arrival_time,
            burst_time,
        }
    }

    fn timeline(events: &[ScheduleEvent]) -> Vec<(Ticks, &str)> {
        events
            .iter()
            .map(|e| (e.tick, e.process_id.as_str()))
            .collect()
    }

    #[test]
    fn fifo_jumps_idle_gap() {
        let sim = Sim::<FifoScheduler>::new(vec![job("P1", 0, 2), job("P2", 5, 1)], ());
        let events: Vec<_> = sim.collect();
        assert_eq!(timeline(&events), vec![(0, "P1"), (1, "P1"), (5, "P2")]);
    }

    #[test]
    fn fifo_breaks_arrival_ties_by_id() {
        let sim = Sim::<FifoScheduler>::new(vec![job("B", 0, 1), job("A", 0, 1)], ());
        let events: Vec<_> = sim.collect();
        assert_eq!(timeline(&events), vec![(0, "A"), (1, "B")]);
    }

    #[test]
    fn sjf_does_not_preempt() {
        let sim = Sim::<SjfScheduler>::new(
            vec![job("P1", 0, 4), job("P2", 1, 1), job("P3", 1, 2)],
            (),
        );
        let order: Vec<_> = sim.map(|e| e.process_id).collect();
        assert_eq!(order, vec!["P1", "P1", "P1", "P1", "P2", "P3", "P3"]);
    }

    #[test]
    fn stcf_preempts_on_arrival() {
        let sim = Sim::<StcfScheduler>::new(vec![job("P1", 0, 6), job("P2", 2, 2)], ());
        let order: Vec<_> = sim.map(|e| e.process_id).collect();
        assert_eq!(
            order,
            vec!["P1", "P1", "P2", "P2", "P1", "P1", "P1", "P1"]
        );
    }

    #[test]
    fn rr_enqueues_arrivals_before_preempted_task() {
        // P2 lands inside P1's first slice, P3 exactly on its boundary
        let sim = Sim::<RoundRobinScheduler>::new(
            vec![job("P1", 0, 4), job("P2", 1, 2), job("P3", 2, 2)],
            2,
        );
        let order: Vec<_> = sim.map(|e| e.process_id).collect();
        assert_eq!(
            order,
            vec!["P1", "P1", "P2", "P2", "P3", "P3", "P1", "P1"]
        );
    }

    #[test]
    fn completion_is_recorded_on_tasks() {
        let mut sim = Sim::<FifoScheduler>::new(vec![job("P1", 1, 2), job("P2", 4, 1)], ());
        sim.step();
        assert!(!sim.all_jobs_completed());
        while sim.step().is_some() {}

        assert!(sim.all_jobs_completed());
        let task = sim.core.ctx.task(0);
        assert_eq!((task.start_time, task.finish_time), (Some(1), Some(3)));
        assert_eq!(sim.core.ctx.task(1).finish_time, Some(5));
        assert_eq!(sim.policy_name(), "fifo");
    }
}
