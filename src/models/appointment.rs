//! Local appointment model built from fetched tickets.
//!
//! An [`Appointment`] is the technician-facing view of a ticket. All client
//! fields are always populated: anything Movidesk leaves out is replaced by a
//! placeholder, field by field, so partial data still yields a usable card.

use std::fmt;

use chrono::{DateTime, NaiveDateTime};

use super::{Ticket, TicketClient};

/// Placeholder for a missing client name.
pub const NO_BUSINESS_NAME: &str = "Client not provided";
/// Placeholder for a missing street address.
pub const NO_ADDRESS: &str = "Address not provided";
/// Placeholder for a missing street number.
pub const NO_NUMBER: &str = "S/N";
/// Placeholder for a missing district.
pub const NO_DISTRICT: &str = "District not provided";
/// Placeholder for a missing city.
pub const NO_CITY: &str = "City not provided";
/// Placeholder for a missing state.
pub const NO_STATE: &str = "UF";
/// Placeholder for a missing service description.
pub const NO_SERVICE: &str = "Service not specified";

/// Local lifecycle status of an appointment.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum AppointmentStatus {
    /// Not started. Every fetched appointment starts here.
    #[default]
    Pending,
    /// Work started but not finished.
    InProgress,
    /// Work reported as done.
    Done,
}

impl AppointmentStatus {
    /// Human-readable label.
    pub fn label(&self) -> &'static str {
        match self {
            AppointmentStatus::Pending => "Pending",
            AppointmentStatus::InProgress => "In progress",
            AppointmentStatus::Done => "Done",
        }
    }
}

impl fmt::Display for AppointmentStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

/// Snapshot of the ticket's primary client.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ClientSnapshot {
    /// Company or person name.
    pub business_name: String,
    /// Street address.
    pub address: String,
    /// Street number.
    pub number: String,
    /// District.
    pub district: String,
    /// `City/State`.
    pub city: String,
}

impl ClientSnapshot {
    /// Builds a snapshot, defaulting each missing field on its own.
    pub fn from_client(client: Option<&TicketClient>) -> Self {
        let field = |get: fn(&TicketClient) -> Option<&String>, placeholder: &'static str| {
            client
                .and_then(get)
                .and_then(|v| non_blank(v))
                .unwrap_or(placeholder)
                .to_string()
        };

        let city = field(|c| c.city.as_ref(), NO_CITY);
        let state = field(|c| c.state.as_ref(), NO_STATE);

        Self {
            business_name: field(|c| c.business_name.as_ref(), NO_BUSINESS_NAME),
            address: field(|c| c.address.as_ref(), NO_ADDRESS),
            number: field(|c| c.address_number.as_ref(), NO_NUMBER),
            district: field(|c| c.neighborhood.as_ref(), NO_DISTRICT),
            city: format!("{}/{}", city, state),
        }
    }

    /// Single-line address: `street, number - district, city/state`.
    pub fn full_address(&self) -> String {
        format!(
            "{}, {} - {}, {}",
            self.address, self.number, self.district, self.city
        )
    }
}

fn non_blank(value: &str) -> Option<&str> {
    Some(value.trim()).filter(|v| !v.is_empty())
}

/// A ticket scheduled for the technician.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Appointment {
    /// Remote ticket ID; the key used to submit reports.
    pub id: String,
    /// Ticket protocol code.
    pub protocol: String,
    /// Client the work is for.
    pub client: ClientSnapshot,
    /// What has to be done.
    pub service_description: String,
    /// Raw SLA deadline.
    pub sla_deadline: Option<String>,
    /// Remote category the ticket was filed under.
    pub category: Option<String>,
    /// Local status.
    pub status: AppointmentStatus,
}

impl Appointment {
    /// Converts a fetched ticket. The remote ticket status is not read:
    /// every appointment starts as [`AppointmentStatus::Pending`].
    pub fn from_ticket(ticket: Ticket) -> Self {
        let client = ClientSnapshot::from_client(ticket.primary_client());
        let service_description = ticket
            .service_full
            .as_ref()
            .map(|s| s.to_text())
            .filter(|s| !s.is_empty())
            .unwrap_or_else(|| NO_SERVICE.to_string());

        Self {
            id: ticket.id,
            protocol: ticket.protocol.unwrap_or_default(),
            client,
            service_description,
            sla_deadline: ticket.sla_solution_date.filter(|d| !d.trim().is_empty()),
            category: ticket.category,
            status: AppointmentStatus::Pending,
        }
    }

    /// Parses the SLA deadline. Offsets, when present, are dropped in favour
    /// of the wall-clock time Movidesk shows its users.
    pub fn sla_deadline_at(&self) -> Option<NaiveDateTime> {
        let raw = self.sla_deadline.as_deref()?.trim();
        DateTime::parse_from_rfc3339(raw)
            .map(|dt| dt.naive_local())
            .or_else(|_| NaiveDateTime::parse_from_str(raw, "%Y-%m-%dT%H:%M:%S%.f"))
            .ok()
    }

    /// Deadline as `dd/mm/YYYY - HH:MM`, or the raw value if it cannot be parsed.
    pub fn display_deadline(&self) -> String {
        match (self.sla_deadline_at(), self.sla_deadline.as_deref()) {
            (Some(at), _) => at.format("%d/%m/%Y - %H:%M").to_string(),
            (None, Some(raw)) => raw.to_string(),
            (None, None) => "No deadline".to_string(),
        }
    }
}

/// The working set of appointments shown to the technician.
///
/// A fetch replaces the whole set; local status changes that were not
/// submitted are lost on replace.
#[derive(Debug, Clone, Default)]
pub struct Worklist {
    appointments: Vec<Appointment>,
}

impl Worklist {
    /// Creates an empty worklist.
    pub fn new() -> Self {
        Self::default()
    }

    /// Replaces every appointment with a freshly fetched set.
    pub fn replace(&mut self, appointments: Vec<Appointment>) {
        self.appointments = appointments;
    }

    /// Looks up an appointment by ticket ID.
    pub fn get(&self, id: &str) -> Option<&Appointment> {
        self.appointments.iter().find(|a| a.id == id)
    }

    /// Sets the status of the appointment with the given ID.
    ///
    /// Returns false when no appointment has that ID.
    pub fn mark(&mut self, id: &str, status: AppointmentStatus) -> bool {
        match self.appointments.iter_mut().find(|a| a.id == id) {
            Some(appointment) => {
                appointment.status = status;
                true
            }
            None => false,
        }
    }

    /// Iterates over the appointments in fetch order.
    pub fn iter(&self) -> impl Iterator<Item = &Appointment> {
        self.appointments.iter()
    }

    /// Number of appointments.
    pub fn len(&self) -> usize {
        self.appointments.len()
    }

    /// Returns true if there are no appointments.
    pub fn is_empty(&self) -> bool {
        self.appointments.is_empty()
    }
}
