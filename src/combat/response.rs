//! JSON shape for combat action results

use serde::Serialize;
use serde_json::{Map, Value};

use super::encounter::{CombatEncounter, Rejection};

/// `{success, message, combat_ended, ...}` as forwarded to clients.
///
/// Report fields are flattened alongside the flags.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ActionResponse {
    pub success: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub message: Option<String>,
    pub combat_ended: bool,
    #[serde(flatten)]
    pub details: Map<String, Value>,
}

impl ActionResponse {
    /// Describe the outcome of an action just taken on `encounter`
    pub fn from_outcome<T: Serialize>(
        encounter: &CombatEncounter,
        outcome: &Result<T, Rejection>,
    ) -> Self {
        match outcome {
            Ok(report) => {
                let details = match serde_json::to_value(report) {
                    Ok(Value::Object(map)) => map,
                    _ => Map::new(),
                };
                Self {
                    success: true,
                    message: encounter.combat_log.last().map(|e| e.message.clone()),
                    combat_ended: encounter.is_over(),
                    details,
                }
            }
            Err(rejection) => Self::rejected(rejection),
        }
    }

    pub fn rejected(rejection: &Rejection) -> Self {
        Self {
            success: false,
            message: Some(rejection.to_string()),
            combat_ended: rejection.combat_ended(),
            details: Map::new(),
        }
    }
}
