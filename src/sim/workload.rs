use rand::prelude::*;
use serde::{Deserialize, Serialize};

use crate::{
    core::Ticks,
    error::{Error, Result},
    policy::ProcessInput,
};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct WorkloadSpec {
    pub count: usize,
    pub max_arrival: Ticks,
    pub min_burst: Ticks,
    pub max_burst: Ticks,
    pub seed: u64,
}

impl Default for WorkloadSpec {
    fn default() -> Self {
        Self {
            count: 3,
            max_arrival: 5,
            min_burst: 2,
            max_burst: 7,
            seed: 0,
        }
    }
}

impl WorkloadSpec {
    pub fn validate(&self) -> Result<()> {
        if self.min_burst == 0 {
            return Err(Error::invalid("min_burst must be > 0"));
        }
        if self.min_burst > self.max_burst {
            return Err(Error::invalid(format!(
                "min_burst {} exceeds max_burst {}",
                self.min_burst, self.max_burst
            )));
        }
        if self.max_arrival > i64::MAX as Ticks || self.max_burst > i64::MAX as Ticks {
            return Err(Error::invalid("workload bounds out of range"));
        }
        Ok(())
    }

    pub fn generate(&self) -> Result<Vec<ProcessInput>> {
        self.validate()?;

        let mut rng = StdRng::seed_from_u64(self.seed);
        let mut processes: Vec<ProcessInput> = (1..=self.count)
            .map(|i| ProcessInput {
                id: format!("P{i}"),
                arrival_time: rng.random_range(0..=self.max_arrival) as i64,
                burst_time: rng.random_range(self.min_burst..=self.max_burst) as i64,
            })
            .collect();

        // Stable, so equal arrivals keep P1..Pn order
        processes.sort_by_key(|p| p.arrival_time);
        Ok(processes)
    }
}
