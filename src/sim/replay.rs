use rustc_hash::FxHashMap;

use crate::{
    core::{ScheduleEvent, Ticks},
    engine::Schedule,
};

#[derive(Debug, Clone, PartialEq)]
pub struct Frame<'a> {
    pub tick: Ticks,
    // None while the CPU is idle
    pub running: Option<&'a ScheduleEvent>,
    // Percent of the total burst executed after this tick
    pub progress: f64,
    pub remaining: Vec<(&'a str, Ticks)>,
}

pub struct Replay<'a> {
    schedule: &'a Schedule,
    remaining: FxHashMap<&'a str, Ticks>,
    next_event: usize,
    tick: Ticks,
    executed: Ticks,
    total: Ticks,
    end: Ticks,
}

impl<'a> Replay<'a> {
    pub fn new(schedule: &'a Schedule) -> Self {
        let remaining = schedule
            .metrics
            .iter()
            .map(|m| (m.id.as_str(), m.burst_time))
            .collect();

        Self {
            schedule,
            remaining,
            next_event: 0,
            tick: 0,
            executed: 0,
            total: schedule.total_burst(),
            end: schedule.makespan(),
        }
    }
}

impl<'a> Iterator for Replay<'a> {
    type Item = Frame<'a>;

    fn next(&mut self) -> Option<Self::Item> {
        if self.tick >= self.end {
            return None;
        }
        let tick = self.tick;
        self.tick += 1;

        let running = self
            .schedule
            .events
            .get(self.next_event)
            .filter(|event| event.tick == tick);

        if let Some(event) = running {
            self.next_event += 1;
            self.executed += 1;
            if let Some(left) = self.remaining.get_mut(event.process_id.as_str()) {
                *left = left.saturating_sub(1);
            }
        }

        let progress = if self.total == 0 {
            100.0
        } else {
            self.executed as f64 * 100.0 / self.total as f64
        };

        let remaining = self
            .schedule
            .metrics
            .iter()
            .map(|m| {
                let id = m.id.as_str();
                (id, self.remaining.get(id).copied().unwrap_or(0))
            })
            .collect();

        Some(Frame {
            tick,
            running,
            progress,
            remaining,
        })
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        let left = self.end.saturating_sub(self.tick) as usize;
        (left, Some(left))
    }
}
