use serde::{Deserialize, Serialize};
use tracing::{debug, info};

use crate::{
    core::ScheduleEvent,
    error::Result,
    policy::{PolicyKind, PolicyParams, ProcessInput, ResolvedPolicy, validate_processes},
    scheduler::{
        FifoScheduler, MlfqScheduler, RoundRobinScheduler, Scheduler, SjfScheduler,
        StcfScheduler,
    },
    sim::{
        Job, Sim,
        metrics::{self, ProcessMetrics, Summary},
    },
};

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Schedule {
    pub policy: Option<PolicyKind>,
    pub events: Vec<ScheduleEvent>,
    pub metrics: Vec<ProcessMetrics>,
}

impl Schedule {
    pub fn summary(&self) -> Summary {
        Summary::from_metrics(&self.metrics)
    }

    pub fn makespan(&self) -> u64 {
        self.events.last().map_or(0, |e| e.tick + 1)
    }

    pub fn total_burst(&self) -> u64 {
        self.metrics.iter().map(|m| m.burst_time).sum()
    }
}

pub fn run(policy: PolicyKind, processes: &[ProcessInput], params: &PolicyParams) -> Result<Schedule> {
    let resolved = policy.resolve(params)?;
    let jobs = validate_processes(processes)?;

    if jobs.is_empty() {
        debug!(%policy, "empty workload");
        return Ok(Schedule {
            policy: Some(policy),
            ..Schedule::default()
        });
    }

    let events = match resolved {
        ResolvedPolicy::Fifo => simulate::<FifoScheduler>(&jobs, ()),
        ResolvedPolicy::Sjf => simulate::<SjfScheduler>(&jobs, ()),
        ResolvedPolicy::Stcf => simulate::<StcfScheduler>(&jobs, ()),
        ResolvedPolicy::RoundRobin(quantum) => simulate::<RoundRobinScheduler>(&jobs, quantum),
        ResolvedPolicy::Mlfq(config) => simulate::<MlfqScheduler>(&jobs, config),
    };

    let metrics = metrics::compute(&jobs, &events)?;
    let schedule = Schedule {
        policy: Some(policy),
        events,
        metrics,
    };

    info!(
        %policy,
        processes = jobs.len(),
        makespan = schedule.makespan(),
        "schedule computed"
    );
    Ok(schedule)
}

fn simulate<S: Scheduler>(jobs: &[Job], params: S::Params) -> Vec<ScheduleEvent> {
    let mut sim = Sim::<S>::new(jobs.to_vec(), params);
    let events: Vec<_> = sim.by_ref().collect();
    debug_assert!(sim.all_jobs_completed(), "{} left jobs unfinished", sim.policy_name());
    events
}
