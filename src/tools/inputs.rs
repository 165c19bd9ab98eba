//! Tool input parameter structs for MCP tools.
//!
//! # Input Sanitization
//!
//! All input structs implement `sanitize()` which trims whitespace
//! from string fields. This should be called before processing input.

use rmcp::schemars::{self, JsonSchema};
use serde::Deserialize;

/// Input parameters for the set_technician tool.
#[derive(Debug, Clone, Deserialize, JsonSchema)]
pub struct SetTechnicianInput {
    /// Technician name exactly as used for the ticket category in Movidesk.
    pub name: String,
}

impl SetTechnicianInput {
    /// Sanitizes input by trimming whitespace from all string fields.
    #[must_use]
    pub fn sanitize(self) -> Self {
        Self {
            name: self.name.trim().to_string(),
        }
    }
}

/// Input parameters for the get_appointment tool.
#[derive(Debug, Clone, Deserialize, JsonSchema)]
pub struct GetAppointmentInput {
    /// The ticket ID of the appointment.
    pub ticket_id: String,
}

impl GetAppointmentInput {
    /// Sanitizes input by trimming whitespace from all string fields.
    #[must_use]
    pub fn sanitize(self) -> Self {
        Self {
            ticket_id: self.ticket_id.trim().to_string(),
        }
    }
}

/// Input parameters for the submit_report tool.
#[derive(Debug, Clone, Deserialize, JsonSchema)]
pub struct SubmitReportInput {
    /// The ticket ID of the appointment being reported.
    pub ticket_id: String,

    /// Description of the work that was done.
    #[serde(default)]
    pub work_performed: String,

    /// Notes for the ticket (parts used, customer remarks, follow-ups).
    #[serde(default)]
    pub notes: String,

    /// Outcome: "completed", "partially_completed" or "not_completed".
    pub resolution: String,

    /// Arrival time, 24h "HH:MM".
    #[serde(default)]
    pub time_in: String,

    /// Departure time, 24h "HH:MM". Earlier than time_in means the visit crossed midnight.
    #[serde(default)]
    pub time_out: String,
}

impl SubmitReportInput {
    /// Sanitizes input by trimming whitespace from all string fields.
    #[must_use]
    pub fn sanitize(self) -> Self {
        Self {
            ticket_id: self.ticket_id.trim().to_string(),
            work_performed: self.work_performed.trim().to_string(),
            notes: self.notes.trim().to_string(),
            resolution: self.resolution.trim().to_string(),
            time_in: self.time_in.trim().to_string(),
            time_out: self.time_out.trim().to_string(),
        }
    }
}
