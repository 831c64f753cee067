use chrono_tz::Tz;
use serde::{Deserialize, Serialize};

use crate::hours::BusinessHours;

/// Zone used when no explicit configuration is given.
pub const DEFAULT_TIMEZONE: Tz = chrono_tz::America::Sao_Paulo;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AgendaMetadata {
    pub agenda_name: String,
    pub agenda_description: String,
    pub timezone: Tz,
    pub hours: BusinessHours,
}

impl Default for AgendaMetadata {
    fn default() -> Self {
        Self {
            agenda_name: "New Agenda".to_string(),
            agenda_description: "No description".to_string(),
            timezone: DEFAULT_TIMEZONE,
            hours: BusinessHours::default(),
        }
    }
}
