use crate::core::state::Ticks;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Job {
    pub id: String,
    pub arrival_time: Ticks,
    pub burst_time: Ticks,
}

