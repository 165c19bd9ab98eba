//! Work reports recorded by the technician at the end of a visit.
//!
//! A [`WorkReport`] is validated and turned into the description text and
//! [`TicketUpdate`] sent back to the ticket. Elapsed time is always derived
//! from the clock-in and clock-out times, never stored.

use std::fmt;
use std::str::FromStr;

use chrono::{NaiveTime, Timelike};

use crate::config::OwnerConfig;
use crate::error::FieldworkError;
use crate::models::{AppointmentStatus, TicketUpdate};

const MINUTES_PER_DAY: i64 = 24 * 60;

/// Outcome of a visit, chosen from a fixed set.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Resolution {
    /// All requested work was done.
    Completed,
    /// Some work was done, a return visit is needed.
    PartiallyCompleted,
    /// Nothing could be done.
    NotCompleted,
}

impl Resolution {
    /// All resolutions, in the order they are offered to the technician.
    pub const ALL: [Resolution; 3] = [
        Resolution::Completed,
        Resolution::PartiallyCompleted,
        Resolution::NotCompleted,
    ];

    /// Human-readable label, used in the report text.
    pub fn label(&self) -> &'static str {
        match self {
            Resolution::Completed => "Completed",
            Resolution::PartiallyCompleted => "Partially completed",
            Resolution::NotCompleted => "Not completed",
        }
    }

    fn key(&self) -> &'static str {
        match self {
            Resolution::Completed => "completed",
            Resolution::PartiallyCompleted => "partially_completed",
            Resolution::NotCompleted => "not_completed",
        }
    }

    /// Local status the appointment should move to once the report is accepted.
    pub fn local_status(&self) -> AppointmentStatus {
        match self {
            Resolution::Completed => AppointmentStatus::Done,
            Resolution::PartiallyCompleted => AppointmentStatus::InProgress,
            Resolution::NotCompleted => AppointmentStatus::Pending,
        }
    }
}

impl fmt::Display for Resolution {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

impl FromStr for Resolution {
    type Err = FieldworkError;

    /// Accepts the label or the snake_case key, case-insensitively.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let wanted = s.trim();
        Self::ALL
            .into_iter()
            .find(|r| r.label().eq_ignore_ascii_case(wanted) || r.key().eq_ignore_ascii_case(wanted))
            .ok_or_else(|| {
                FieldworkError::validation(format!(
                    "unknown resolution {:?}, expected one of: completed, partially_completed, not_completed",
                    wanted.chars().take(50).collect::<String>()
                ))
            })
    }
}

/// Parses a 24h `HH:MM` clock time.
pub fn parse_clock_time(value: &str) -> Option<NaiveTime> {
    NaiveTime::parse_from_str(value.trim(), "%H:%M").ok()
}

/// Hours between two clock times.
///
/// An end time earlier than the start time is read as crossing midnight,
/// so the result is always in `[0, 24)`. The value is not rounded.
pub fn elapsed_hours(time_in: NaiveTime, time_out: NaiveTime) -> f64 {
    let minutes = |t: NaiveTime| i64::from(t.hour()) * 60 + i64::from(t.minute());

    let mut diff = minutes(time_out) - minutes(time_in);
    if diff < 0 {
        diff += MINUTES_PER_DAY;
    }

    diff as f64 / 60.0
}

/// What the technician recorded for one ticket.
#[derive(Debug, Clone, PartialEq)]
pub struct WorkReport {
    /// ID of the ticket the report is about.
    pub ticket_id: String,
    /// Description of the work done.
    pub work_performed: String,
    /// Free-form notes.
    pub notes: String,
    /// Outcome of the visit.
    pub resolution: Resolution,
    /// Clock-in time, `HH:MM`.
    pub time_in: String,
    /// Clock-out time, `HH:MM`.
    pub time_out: String,
}

impl WorkReport {
    /// Checks the report and returns the elapsed hours.
    ///
    /// # Errors
    ///
    /// - `missing required fields` when work performed or notes are blank
    /// - `missing time range` when either time is blank or not `HH:MM`
    pub fn validate(&self) -> Result<f64, FieldworkError> {
        if self.work_performed.trim().is_empty() || self.notes.trim().is_empty() {
            return Err(FieldworkError::validation("missing required fields"));
        }

        match (parse_clock_time(&self.time_in), parse_clock_time(&self.time_out)) {
            (Some(time_in), Some(time_out)) => Ok(elapsed_hours(time_in, time_out)),
            _ => Err(FieldworkError::validation("missing time range")),
        }
    }

    /// Elapsed hours, or `None` if the time range is invalid.
    pub fn elapsed_hours(&self) -> Option<f64> {
        Some(elapsed_hours(
            parse_clock_time(&self.time_in)?,
            parse_clock_time(&self.time_out)?,
        ))
    }

    /// Composes the action description from the four narrative parts.
    pub fn description(&self, elapsed_hours: f64) -> String {
        format!(
            "Work performed: {}.\nNotes: {}.\nService status: {}.\nService time: {} HOURS\n",
            self.work_performed.trim(),
            self.notes.trim(),
            self.resolution.label(),
            elapsed_hours
        )
    }

    /// Validates the report and builds the ticket update payload.
    pub fn to_update(
        &self,
        action_status: &str,
        owner: Option<&OwnerConfig>,
        owner_team: Option<&str>,
    ) -> Result<TicketUpdate, FieldworkError> {
        let hours = self.validate()?;
        Ok(TicketUpdate::with_action(
            self.description(hours),
            action_status,
            owner,
            owner_team,
        ))
    }
}
