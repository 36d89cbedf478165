use serde::{Deserialize, Serialize};

use crate::core::{QueueLevel, Ticks};

// Ticks with no event were idle
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ScheduleEvent {
    pub tick: Ticks,
    pub process_id: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub queue_level: Option<QueueLevel>,
    // Remaining burst after this tick ran
    pub remaining: Ticks,
}
