use proptest::prelude::*;
use rustc_hash::FxHashMap;
use sched_lab::{MlfqParams, PolicyKind, PolicyParams, ProcessInput, Schedule, run};

fn workload() -> impl Strategy<Value = Vec<ProcessInput>> {
    prop::collection::vec((0i64..20, 1i64..9), 0..12).prop_map(|specs| {
        specs
            .into_iter()
            .enumerate()
            .map(|(i, (arrival, burst))| ProcessInput::new(format!("P{}", i + 1), arrival, burst))
            .collect()
    })
}

fn policy_and_params() -> impl Strategy<Value = (PolicyKind, PolicyParams)> {
    prop_oneof![
        Just((PolicyKind::Fifo, PolicyParams::None)),
        Just((PolicyKind::Sjf, PolicyParams::None)),
        Just((PolicyKind::Stcf, PolicyParams::None)),
        (1i64..6).prop_map(|quantum| (PolicyKind::RoundRobin, PolicyParams::RoundRobin { quantum })),
        ((1i64..4, 1i64..5, 1i64..8), 1i64..12).prop_map(|((q0, q1, q2), boost_threshold)| {
            (
                PolicyKind::Mlfq,
                PolicyParams::Mlfq(MlfqParams {
                    quanta: [q0, q1, q2],
                    boost_threshold,
                }),
            )
        }),
    ]
}

fn check_invariants(processes: &[ProcessInput], schedule: &Schedule) {
    // Single occupancy: ticks strictly increase
    assert!(schedule.events.windows(2).all(|w| w[0].tick < w[1].tick));

    let mut ticks: FxHashMap<&str, i64> = FxHashMap::default();
    for event in &schedule.events {
        *ticks.entry(event.process_id.as_str()).or_default() += 1;
    }

    assert_eq!(schedule.metrics.len(), processes.len());
    for (input, m) in processes.iter().zip(&schedule.metrics) {
        assert_eq!(input.id, m.id);
        // Conservation
        assert_eq!(ticks.get(input.id.as_str()).copied(), Some(input.burst_time));
        // Causality
        assert!(m.finish_time as i64 >= input.arrival_time + input.burst_time);
        assert!(m.start_time as i64 >= input.arrival_time);
        // Non-negativity
        assert!(m.turnaround_time >= m.burst_time);
        assert_eq!(m.waiting_time, m.turnaround_time - m.burst_time);
    }
}

proptest! {
    #![proptest_config(ProptestConfig::with_cases(128))]

    #[test]
    fn schedules_respect_invariants(
        processes in workload(),
        (policy, params) in policy_and_params(),
    ) {
        let schedule = run(policy, &processes, &params).unwrap();
        check_invariants(&processes, &schedule);
    }

    #[test]
    fn runs_are_deterministic(
        processes in workload(),
        (policy, params) in policy_and_params(),
    ) {
        let first = serde_json::to_vec(&run(policy, &processes, &params).unwrap()).unwrap();
        let second = serde_json::to_vec(&run(policy, &processes, &params).unwrap()).unwrap();
        prop_assert_eq!(first, second);
    }

    #[test]
    fn cpu_never_idles_with_ready_work(processes in workload()) {
        // Every work-conserving policy has the same makespan
        let makespans: Vec<_> = [
            (PolicyKind::Fifo, PolicyParams::None),
            (PolicyKind::Sjf, PolicyParams::None),
            (PolicyKind::Stcf, PolicyParams::None),
            (PolicyKind::RoundRobin, PolicyParams::RoundRobin { quantum: 3 }),
            (PolicyKind::Mlfq, PolicyParams::None),
        ]
        .iter()
        .map(|(policy, params)| run(*policy, &processes, params).unwrap().makespan())
        .collect();
        prop_assert!(makespans.windows(2).all(|w| w[0] == w[1]));
    }

    #[test]
    fn stcf_turnaround_never_exceeds_fifo(processes in workload()) {
        // Shortest-remaining-first minimises mean turnaround
        let stcf = run(PolicyKind::Stcf, &processes, &PolicyParams::None).unwrap().summary();
        let fifo = run(PolicyKind::Fifo, &processes, &PolicyParams::None).unwrap().summary();
        prop_assert!(stcf.avg_turnaround <= fifo.avg_turnaround + 1e-9);
    }
}
