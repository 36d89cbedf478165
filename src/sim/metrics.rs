use average::{Estimate, Mean};
use rustc_hash::FxHashMap;
use serde::{Deserialize, Serialize};

use super::job::Job;
use crate::{
    core::{ScheduleEvent, Ticks},
    error::{Error, Result},
};

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ProcessMetrics {
    pub id: String,
    pub arrival_time: Ticks,
    pub burst_time: Ticks,
    pub start_time: Ticks,
    pub finish_time: Ticks,
    pub turnaround_time: Ticks,
    pub waiting_time: Ticks,
    pub response_time: Ticks,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Summary {
    pub avg_turnaround: f64,
    pub avg_waiting: f64,
    pub avg_response: f64,
    pub makespan: Ticks,
    pub utilization: f64,
}

#[derive(Default)]
struct Span {
    first: Option<Ticks>,
    last: Ticks,
    ticks: Ticks,
}

// Metrics come back in `jobs` order
pub fn compute(jobs: &[Job], events: &[ScheduleEvent]) -> Result<Vec<ProcessMetrics>> {
    let mut spans: FxHashMap<&str, Span> = FxHashMap::default();
    for event in events {
        let span = spans.entry(event.process_id.as_str()).or_default();
        span.first.get_or_insert(event.tick);
        span.last = event.tick;
        span.ticks += 1;
    }

    jobs.iter()
        .map(|job| {
            let span = spans
                .get(job.id.as_str())
                .ok_or_else(|| Error::invariant(format!("process {} never ran", job.id)))?;
            if span.ticks != job.burst_time {
                return Err(Error::invariant(format!(
                    "process {} ran {} ticks, burst is {}",
                    job.id, span.ticks, job.burst_time
                )));
            }

            let start_time = span.first.unwrap_or(span.last);
            let finish_time = span.last + 1;
            let turnaround_time = finish_time.checked_sub(job.arrival_time);
            let waiting_time = turnaround_time.and_then(|t| t.checked_sub(job.burst_time));
            let response_time = start_time.checked_sub(job.arrival_time);

            match (turnaround_time, waiting_time, response_time) {
                (Some(turnaround_time), Some(waiting_time), Some(response_time)) => {
                    Ok(ProcessMetrics {
                        id: job.id.clone(),
                        arrival_time: job.arrival_time,
                        burst_time: job.burst_time,
                        start_time,
                        finish_time,
                        turnaround_time,
                        waiting_time,
                        response_time,
                    })
                }
                _ => Err(Error::invariant(format!(
                    "process {} ran before it arrived or finished too early",
                    job.id
                ))),
            }
        })
        .collect()
}

fn avg(iter: impl Iterator<Item = f64>) -> f64 {
    let mean: Mean = iter.collect();
    // An empty Mean estimates NaN
    if mean.is_empty() {
        0.0
    } else {
        mean.estimate()
    }
}

impl Summary {
    pub fn from_metrics(metrics: &[ProcessMetrics]) -> Self {
        let makespan = metrics.iter().map(|m| m.finish_time).max().unwrap_or(0);
        let busy: Ticks = metrics.iter().map(|m| m.burst_time).sum();
        let utilization = if makespan == 0 {
            0.0
        } else {
            busy as f64 / makespan as f64
        };

        Self {
            avg_turnaround: avg(metrics.iter().map(|m| m.turnaround_time as f64)),
            avg_waiting: avg(metrics.iter().map(|m| m.waiting_time as f64)),
            avg_response: avg(metrics.iter().map(|m| m.response_time as f64)),
            makespan,
            utilization,
        }
    }
}
