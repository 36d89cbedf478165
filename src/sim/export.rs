use std::io::Write;

use crate::{engine::Schedule, error::Result};

// `Time` is the clock after the tick, i.e. tick + 1
pub fn write_log<W: Write>(schedule: &Schedule, mut out: W) -> Result<()> {
    let title = schedule.policy.map_or("CPU", |p| p.title());
    writeln!(out, "{title} Scheduling Execution Logs")?;

    for event in &schedule.events {
        write!(
            out,
            "Time {}: Process {} executed (Remaining time: {})",
            event.tick + 1,
            event.process_id,
            event.remaining
        )?;
        if let Some(level) = event.queue_level {
            write!(out, " [Q{level}]")?;
        }
        writeln!(out)?;
    }
    Ok(())
}

pub fn log_string(schedule: &Schedule) -> Result<String> {
    let mut buf = Vec::new();
    write_log(schedule, &mut buf)?;
    Ok(String::from_utf8_lossy(&buf).into_owned())
}

pub fn write_json<W: Write>(schedule: &Schedule, out: W) -> Result<()> {
    serde_json::to_writer_pretty(out, schedule)?;
    Ok(())
}

pub fn write_table<W: Write>(schedule: &Schedule, mut out: W) -> Result<()> {
    writeln!(
        out,
        "{:<8} {:>7} {:>5} {:>5} {:>6} {:>10} {:>7} {:>8}",
        "process", "arrival", "burst", "start", "finish", "turnaround", "waiting", "response"
    )?;
    for m in &schedule.metrics {
        writeln!(
            out,
            "{:<8} {:>7} {:>5} {:>5} {:>6} {:>10} {:>7} {:>8}",
            m.id,
            m.arrival_time,
            m.burst_time,
            m.start_time,
            m.finish_time,
            m.turnaround_time,
            m.waiting_time,
            m.response_time
        )?;
    }

    let summary = schedule.summary();
    writeln!(
        out,
        "avg turnaround {:.2}, avg waiting {:.2}, avg response {:.2}, makespan {}, utilization {:.1}%",
        summary.avg_turnaround,
        summary.avg_waiting,
        summary.avg_response,
        summary.makespan,
        summary.utilization * 100.0
    )?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::engine::run;
    use crate::policy::{PolicyKind, PolicyParams, ProcessInput};
    use pretty_assertions::assert_eq;

    #[test]
    fn log_lines_follow_clock_after_tick() {
        let processes = [ProcessInput::new("P1", 0, 2), ProcessInput::new("P2", 0, 1)];
        let schedule = run(PolicyKind::Fifo, &processes, &PolicyParams::None).unwrap();

        assert_eq!(
            log_string(&schedule).unwrap(),
            "FIFO Scheduling Execution Logs\n\
             Time 1: Process P1 executed (Remaining time: 1)\n\
             Time 2: Process P1 executed (Remaining time: 0)\n\
             Time 3: Process P2 executed (Remaining time: 0)\n"
        );
    }

    #[test]
    fn mlfq_log_shows_queue() {
        let processes = [ProcessInput::new("P1", 0, 2)];
        let schedule = run(PolicyKind::Mlfq, &processes, &PolicyParams::None).unwrap();
        let log = log_string(&schedule).unwrap();

        assert!(log.starts_with("MLFQ Scheduling Execution Logs\n"));
        assert!(log.contains("Time 1: Process P1 executed (Remaining time: 1) [Q0]"));
        assert!(log.contains("Time 2: Process P1 executed (Remaining time: 0) [Q1]"));
    }

    #[test]
    fn json_export_round_trips() {
        let processes = [ProcessInput::new("P1", 1, 2)];
        let schedule = run(PolicyKind::Stcf, &processes, &PolicyParams::None).unwrap();

        let mut buf = Vec::new();
        write_json(&schedule, &mut buf).unwrap();
        let back: Schedule = serde_json::from_slice(&buf).unwrap();
        assert_eq!(back, schedule);
    }

    #[test]
    fn table_has_row_per_process() {
        let processes = [ProcessInput::new("P1", 0, 1), ProcessInput::new("P2", 0, 1)];
        let schedule = run(PolicyKind::Sjf, &processes, &PolicyParams::None).unwrap();

        let mut buf = Vec::new();
        write_table(&schedule, &mut buf).unwrap();
        let table = String::from_utf8(buf).unwrap();
        assert_eq!(table.lines().count(), 4);
        assert!(table.contains("makespan 2"));
    }
}
