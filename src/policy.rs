use rustc_hash::FxHashSet;
use serde::{Deserialize, Deserializer, Serialize, Serializer};
use std::fmt;
use std::str::FromStr;

use crate::{
    core::Ticks,
    error::{Error, Result},
    scheduler::MlfqConfig,
    sim::Job,
};

// Signed so negative inputs reach validation
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ProcessInput {
    pub id: String,
    pub arrival_time: i64,
    pub burst_time: i64,
}

impl ProcessInput {
    pub fn new(id: impl Into<String>, arrival_time: i64, burst_time: i64) -> Self {
        Self {
            id: id.into(),
            arrival_time,
            burst_time,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum PolicyKind {
    Fifo,
    Sjf,
    Stcf,
    RoundRobin,
    Mlfq,
}

impl PolicyKind {
    pub const ALL: [PolicyKind; 5] = [
        PolicyKind::Fifo,
        PolicyKind::Sjf,
        PolicyKind::Stcf,
        PolicyKind::RoundRobin,
        PolicyKind::Mlfq,
    ];

    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::Fifo => "fifo",
            Self::Sjf => "sjf",
            Self::Stcf => "stcf",
            Self::RoundRobin => "rr",
            Self::Mlfq => "mlfq",
        }
    }

    pub const fn title(&self) -> &'static str {
        match self {
            Self::Fifo => "FIFO",
            Self::Sjf => "SJF",
            Self::Stcf => "STCF",
            Self::RoundRobin => "Round Robin",
            Self::Mlfq => "MLFQ",
        }
    }

    pub fn resolve(&self, params: &PolicyParams) -> Result<ResolvedPolicy> {
        match (self, params) {
            (Self::Fifo, PolicyParams::None) => Ok(ResolvedPolicy::Fifo),
            (Self::Sjf, PolicyParams::None) => Ok(ResolvedPolicy::Sjf),
            (Self::Stcf, PolicyParams::None) => Ok(ResolvedPolicy::Stcf),
            (Self::RoundRobin, PolicyParams::RoundRobin { quantum }) => Ok(
                ResolvedPolicy::RoundRobin(positive("quantum", *quantum)?),
            ),
            (Self::RoundRobin, PolicyParams::None) => {
                Err(Error::invalid("round robin requires a quantum"))
            }
            (Self::Mlfq, PolicyParams::None) => Ok(ResolvedPolicy::Mlfq(MlfqConfig::default())),
            (Self::Mlfq, PolicyParams::Mlfq(mlfq)) => Ok(ResolvedPolicy::Mlfq(mlfq.resolve()?)),
            (policy, params) => Err(Error::invalid(format!(
                "parameters {params:?} do not apply to {policy}"
            ))),
        }
    }
}

impl fmt::Display for PolicyKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for PolicyKind {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        match s.to_lowercase().as_str() {
            "fifo" | "fcfs" => Ok(Self::Fifo),
            "sjf" => Ok(Self::Sjf),
            "stcf" | "srtf" => Ok(Self::Stcf),
            "rr" | "round_robin" | "roundrobin" => Ok(Self::RoundRobin),
            "mlfq" => Ok(Self::Mlfq),
            _ => Err(Error::invalid(format!(
                "unknown policy '{s}'. Valid: fifo, sjf, stcf, rr, mlfq"
            ))),
        }
    }
}

impl Serialize for PolicyKind {
    fn serialize<S>(&self, serializer: S) -> std::result::Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        serializer.serialize_str(self.as_str())
    }
}

impl<'de> Deserialize<'de> for PolicyKind {
    fn deserialize<D>(deserializer: D) -> std::result::Result<Self, D::Error>
    where
        D: Deserializer<'de>,
    {
        let s = String::deserialize(deserializer)?;
        s.parse().map_err(serde::de::Error::custom)
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MlfqParams {
    pub quanta: [i64; 3],
    pub boost_threshold: i64,
}

impl Default for MlfqParams {
    fn default() -> Self {
        let config = MlfqConfig::default();
        Self {
            quanta: config.quanta.map(|q| q as i64),
            boost_threshold: config.boost_threshold as i64,
        }
    }
}

impl MlfqParams {
    fn resolve(&self) -> Result<MlfqConfig> {
        let mut quanta = [0; 3];
        for (level, (&raw, slot)) in self.quanta.iter().zip(quanta.iter_mut()).enumerate() {
            *slot = positive(&format!("quantum for Q{level}"), raw)?;
        }
        Ok(MlfqConfig {
            quanta,
            boost_threshold: positive("boost_threshold", self.boost_threshold)?,
        })
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum PolicyParams {
    #[default]
    None,
    RoundRobin {
        quantum: i64,
    },
    Mlfq(MlfqParams),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ResolvedPolicy {
    Fifo,
    Sjf,
    Stcf,
    RoundRobin(Ticks),
    Mlfq(MlfqConfig),
}

fn positive(name: &str, value: i64) -> Result<Ticks> {
    if value <= 0 {
        return Err(Error::invalid(format!("{name} must be > 0, got {value}")));
    }
    Ok(value as Ticks)
}

pub fn validate_processes(processes: &[ProcessInput]) -> Result<Vec<Job>> {
    let mut seen = FxHashSet::default();
    processes
        .iter()
        .map(|p| {
            if !seen.insert(p.id.as_str()) {
                return Err(Error::invalid(format!("duplicate process id '{}'", p.id)));
            }
            if p.arrival_time < 0 {
                return Err(Error::invalid(format!(
                    "process {} has negative arrival time {}",
                    p.id, p.arrival_time
                )));
            }
            Ok(Job {
                id: p.id.clone(),
                arrival_time: p.arrival_time as Ticks,
                burst_time: positive(&format!("burst time of {}", p.id), p.burst_time)?,
            })
        })
        .collect()
}
