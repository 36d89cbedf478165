use std::{fs, io, path::PathBuf};

use anyhow::{Context, Result};
use clap::{Args, Parser, Subcommand, ValueEnum};
use sched_lab::{
    Error, MlfqParams, PolicyKind, PolicyParams, ProcessInput,
    sim::{WorkloadSpec, export},
};
use tracing::info;
use tracing_subscriber::EnvFilter;

/// Compare CPU scheduling policies on a synthetic workload
#[derive(Parser)]
#[command(name = "sched-lab", version)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Simulate one policy and print its schedule
    Run {
        #[arg(short, long)]
        policy: PolicyKind,
        #[command(flatten)]
        params: ParamArgs,
        #[command(flatten)]
        workload: WorkloadArgs,
        #[arg(short, long, value_enum, default_value_t = Format::Table)]
        format: Format,
    },
    /// Run every policy on the same workload and print a summary per policy
    Compare {
        #[command(flatten)]
        params: ParamArgs,
        #[command(flatten)]
        workload: WorkloadArgs,
    },
    /// Print a random workload as JSON
    Generate {
        #[command(flatten)]
        workload: GenerateArgs,
    },
}

#[derive(Args)]
struct ParamArgs {
    /// Round robin quantum
    #[arg(long, default_value_t = 2)]
    quantum: i64,
    /// MLFQ per-level quanta, e.g. 1,2,5
    #[arg(long, value_delimiter = ',')]
    quanta: Option<Vec<i64>>,
    /// MLFQ priority boost threshold
    #[arg(long)]
    boost: Option<i64>,
}

impl ParamArgs {
    fn for_policy(&self, policy: PolicyKind) -> sched_lab::Result<PolicyParams> {
        let params = match policy {
            PolicyKind::RoundRobin => PolicyParams::RoundRobin {
                quantum: self.quantum,
            },
            PolicyKind::Mlfq => {
                let mut mlfq = MlfqParams::default();
                if let Some(quanta) = &self.quanta {
                    mlfq.quanta = quanta.as_slice().try_into().map_err(|_| {
                        Error::invalid(format!(
                            "--quanta takes exactly 3 levels, got {}",
                            quanta.len()
                        ))
                    })?;
                }
                if let Some(boost) = self.boost {
                    mlfq.boost_threshold = boost;
                }
                PolicyParams::Mlfq(mlfq)
            }
            _ => PolicyParams::None,
        };
        Ok(params)
    }
}

#[derive(Args)]
struct GenerateArgs {
    /// Number of processes to generate
    #[arg(short = 'n', long, visible_alias = "generate", default_value_t = 3)]
    count: usize,
    #[arg(long, default_value_t = 0)]
    seed: u64,
    #[arg(long, default_value_t = 5)]
    max_arrival: u64,
    #[arg(long, default_value_t = 2)]
    min_burst: u64,
    #[arg(long, default_value_t = 7)]
    max_burst: u64,
}

impl GenerateArgs {
    fn spec(&self) -> WorkloadSpec {
        WorkloadSpec {
            count: self.count,
            max_arrival: self.max_arrival,
            min_burst: self.min_burst,
            max_burst: self.max_burst,
            seed: self.seed,
        }
    }
}

#[derive(Args)]
struct WorkloadArgs {
    /// JSON file holding an array of {id, arrival_time, burst_time}
    #[arg(short, long, conflicts_with = "count")]
    input: Option<PathBuf>,
    #[command(flatten)]
    generate: GenerateArgs,
}

impl WorkloadArgs {
    fn load(&self) -> Result<Vec<ProcessInput>> {
        match &self.input {
            Some(path) => {
                let raw = fs::read_to_string(path)
                    .with_context(|| format!("reading workload {}", path.display()))?;
                serde_json::from_str(&raw)
                    .with_context(|| format!("parsing workload {}", path.display()))
            }
            None => Ok(self.generate.spec().generate()?),
        }
    }
}

#[derive(Clone, Copy, ValueEnum)]
enum Format {
    Table,
    Json,
    Log,
}

fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn")))
        .with_writer(io::stderr)
        .init();

    let cli = Cli::parse();
    let stdout = io::stdout().lock();

    match cli.command {
        Commands::Run {
            policy,
            params,
            workload,
            format,
        } => {
            let processes = workload.load()?;
            info!(%policy, processes = processes.len(), "running");
            let schedule = sched_lab::run(policy, &processes, &params.for_policy(policy)?)?;
            match format {
                Format::Table => export::write_table(&schedule, stdout)?,
                Format::Json => export::write_json(&schedule, stdout)?,
                Format::Log => export::write_log(&schedule, stdout)?,
            }
        }
        Commands::Compare { params, workload } => {
            let processes = workload.load()?;
            compare(&processes, &params, stdout)?;
        }
        Commands::Generate { workload } => {
            let processes = workload.spec().generate()?;
            serde_json::to_writer_pretty(stdout, &processes)?;
            println!();
        }
    }

    Ok(())
}

fn compare(processes: &[ProcessInput], params: &ParamArgs, mut out: impl io::Write) -> Result<()> {
    writeln!(
        out,
        "{:<6} {:>10} {:>8} {:>9} {:>8} {:>6}",
        "policy", "turnaround", "waiting", "response", "makespan", "util"
    )?;
    for policy in PolicyKind::ALL {
        let schedule = params
            .for_policy(policy)
            .and_then(|params| sched_lab::run(policy, processes, &params))
            .with_context(|| format!("running {policy}"))?;
        let summary = schedule.summary();
        writeln!(
            out,
            "{:<6} {:>10.2} {:>8.2} {:>9.2} {:>8} {:>5.1}%",
            policy.as_str(),
            summary.avg_turnaround,
            summary.avg_waiting,
            summary.avg_response,
            summary.makespan,
            summary.utilization * 100.0
        )?;
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    fn parse(args: &[&str]) -> Cli {
        Cli::try_parse_from(std::iter::once("sched-lab").chain(args.iter().copied())).unwrap()
    }

    fn run_args(cli: Cli) -> (PolicyKind, ParamArgs, WorkloadArgs) {
        match cli.command {
            Commands::Run {
                policy,
                params,
                workload,
                ..
            } => (policy, params, workload),
            _ => panic!("expected run"),
        }
    }

    #[test]
    fn comma_separated_quanta_reach_mlfq_params() {
        let (policy, params, _) = run_args(parse(&[
            "run", "-p", "mlfq", "--quanta", "1,2,5", "--boost", "7",
        ]));
        assert_eq!(params.quanta, Some(vec![1, 2, 5]));
        assert_eq!(
            params.for_policy(policy).unwrap(),
            PolicyParams::Mlfq(MlfqParams {
                quanta: [1, 2, 5],
                boost_threshold: 7,
            })
        );
    }

    #[test]
    fn wrong_number_of_quanta_is_rejected() {
        for quanta in ["1,2", "1,2,5,8"] {
            let (policy, params, _) =
                run_args(parse(&["run", "-p", "mlfq", "--quanta", quanta]));
            assert!(matches!(
                params.for_policy(policy),
                Err(Error::InvalidParameter(_))
            ));
        }
    }

    #[test]
    fn quanta_are_ignored_by_other_policies() {
        let (policy, params, _) = run_args(parse(&[
            "run", "-p", "rr", "--quantum", "3", "--quanta", "1,2",
        ]));
        assert_eq!(
            params.for_policy(policy).unwrap(),
            PolicyParams::RoundRobin { quantum: 3 }
        );
    }

    #[test]
    fn generate_and_count_name_the_same_flag() {
        let (_, _, by_generate) =
            run_args(parse(&["run", "-p", "fifo", "--generate", "6", "--seed", "4"]));
        let (_, _, by_count) =
            run_args(parse(&["run", "-p", "fifo", "--count", "6", "--seed", "4"]));
        assert_eq!(by_generate.generate.count, 6);
        assert_eq!(by_generate.load().unwrap(), by_count.load().unwrap());
    }

    #[test]
    fn input_conflicts_with_generated_workload() {
        let result = Cli::try_parse_from([
            "sched-lab", "run", "-p", "fifo", "-i", "w.json", "--generate", "4",
        ]);
        assert!(result.is_err());
    }

    #[test]
    fn compare_on_empty_workload_prints_zeros() {
        let params = ParamArgs {
            quantum: 2,
            quanta: None,
            boost: None,
        };
        let mut out = Vec::new();
        compare(&[], &params, &mut out).unwrap();
        let text = String::from_utf8(out).unwrap();
        assert!(!text.contains("NaN"));
        assert_eq!(text.lines().count(), 1 + PolicyKind::ALL.len());
    }
}
