pub mod driver;
pub mod export;
pub mod job;
pub mod metrics;
pub mod replay;
pub mod workload;

pub use driver::Sim;
pub use job::Job;
pub use metrics::{ProcessMetrics, Summary};
pub use replay::{Frame, Replay};
pub use workload::WorkloadSpec;
