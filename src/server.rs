//! MCP server implementation for fieldwork.
//!
//! This module defines the `FieldworkServer` struct that implements the MCP
//! `ServerHandler` trait. It plays the part of the technician's UI: it holds
//! the session and the worklist, and calls the fetcher and submitter.

use std::sync::Arc;

use rmcp::{
    handler::server::{router::tool::ToolRouter, wrapper::Parameters},
    model::{ServerCapabilities, ServerInfo},
    tool, tool_handler, tool_router, ServerHandler,
};
use tokio::sync::{Mutex, OnceCell};

use crate::error::FieldworkError;
use crate::models::{Appointment, Worklist};
use crate::movidesk_client::MovideskClient;
use crate::report::{Resolution, WorkReport};
use crate::session::{Session, TechnicianCategory};
use crate::store::TechnicianStore;
use crate::tools::{GetAppointmentInput, SetTechnicianInput, SubmitReportInput};

/// The fieldwork MCP server.
#[derive(Clone)]
pub struct FieldworkServer {
    /// Movidesk client for API operations.
    client: MovideskClient,
    /// Where the technician identity is persisted.
    store: TechnicianStore,
    /// Set at most once, at startup or by `set_technician`.
    session: Arc<OnceCell<Session>>,
    /// Appointments from the last successful fetch.
    worklist: Arc<Mutex<Worklist>>,
    /// Tool router for MCP tool dispatch.
    tool_router: ToolRouter<Self>,
}

#[tool_router]
impl FieldworkServer {
    /// Creates a new server instance.
    ///
    /// # Arguments
    ///
    /// * `client` - The Movidesk client
    /// * `store` - The technician store used by `set_technician`
    /// * `session` - The session resolved at startup, if any
    pub fn new(client: MovideskClient, store: TechnicianStore, session: Option<Session>) -> Self {
        Self {
            client,
            store,
            session: Arc::new(OnceCell::new_with(session)),
            worklist: Arc::new(Mutex::new(Worklist::new())),
            tool_router: Self::tool_router(),
        }
    }

    /// Returns "pong" to verify the server is running.
    #[tool(description = "Test connectivity to the fieldwork MCP server. Returns 'pong' if the server is running correctly.")]
    fn ping(&self) -> String {
        tracing::debug!("ping tool called");
        "pong".to_string()
    }

    /// Records the technician identity. Only allowed once.
    #[tool(description = "Set the technician name used to find scheduled tickets. Must match the ticket category in Movidesk. Can only be set once.")]
    async fn set_technician(
        &self,
        Parameters(input): Parameters<SetTechnicianInput>,
    ) -> Result<String, String> {
        let input = input.sanitize();
        tracing::debug!("set_technician tool called");

        if let Some(session) = self.session.get() {
            return Err(format!(
                "Technician is already set to '{}' and cannot be changed.",
                session.technician()
            ));
        }

        let technician = TechnicianCategory::new(&input.name)
            .map_err(|_| "Please provide a valid technician name.".to_string())?;

        self.session
            .set(Session::new(technician.clone()))
            .map_err(|_| "Technician was set by another request.".to_string())?;

        tracing::info!(technician = %technician, "Technician identity set");

        if let Err(e) = self.store.save(technician.as_str()) {
            tracing::error!(error = %e, "Failed to persist technician identity");
            return Ok(format!(
                "Technician set to '{}' for this run, but it could not be saved: {}",
                technician, e
            ));
        }

        Ok(format!("Technician set to '{}'.", technician))
    }

    /// Shows the current technician.
    #[tool(description = "Show which technician this server is working for.")]
    fn whoami(&self) -> String {
        match self.session.get() {
            Some(session) => format!("Technician: {}", session.technician()),
            None => "No technician set. Use set_technician first.".to_string(),
        }
    }

    /// Fetches scheduled tickets and replaces the worklist.
    #[tool(description = "List the technician's scheduled appointments from Movidesk. Replaces the local list, discarding unsubmitted local status changes.")]
    async fn list_appointments(&self) -> Result<String, String> {
        tracing::debug!("list_appointments tool called");

        let session = self.require_session()?;
        let appointments = self.client.fetch_for_session(session).await.map_err(|e| {
            let sanitized = self.sanitize_error(&e);
            tracing::error!(error = %sanitized, "Failed to fetch appointments");
            format!(
                "Failed to load appointments: {}. Try again later.",
                sanitized
            )
        })?;

        let mut worklist = self.worklist.lock().await;
        worklist.replace(appointments);

        Ok(format_appointment_list(&worklist))
    }

    /// Shows one appointment from the worklist.
    #[tool(description = "Show the details of one appointment from the last list_appointments call.")]
    async fn get_appointment(
        &self,
        Parameters(input): Parameters<GetAppointmentInput>,
    ) -> Result<String, String> {
        let input = input.sanitize();
        tracing::debug!(ticket_id = %input.ticket_id, "get_appointment tool called");

        let worklist = self.worklist.lock().await;
        worklist
            .get(&input.ticket_id)
            .map(format_appointment_details)
            .ok_or_else(|| {
                format!(
                    "Appointment {} is not in the current list. Run list_appointments first.",
                    input.ticket_id
                )
            })
    }

    /// Submits a work report and updates the local status.
    #[tool(description = "Submit a work report for an appointment: work performed, notes, resolution (completed, partially_completed, not_completed) and arrival/departure times in HH:MM.")]
    async fn submit_report(
        &self,
        Parameters(input): Parameters<SubmitReportInput>,
    ) -> Result<String, String> {
        let input = input.sanitize();
        tracing::debug!(ticket_id = %input.ticket_id, "submit_report tool called");

        let session = self.require_session()?;
        let resolution: Resolution = input
            .resolution
            .parse()
            .map_err(|e: FieldworkError| e.to_string())?;

        let report = WorkReport {
            ticket_id: input.ticket_id,
            work_performed: input.work_performed,
            notes: input.notes,
            resolution,
            time_in: input.time_in,
            time_out: input.time_out,
        };

        self.client
            .submit_report(session, &report)
            .await
            .map_err(|e| {
                let sanitized = self.sanitize_error(&e);
                tracing::error!(error = %sanitized, ticket_id = %report.ticket_id, "Failed to submit report");
                format!("Failed to submit report for ticket {}: {}", report.ticket_id, sanitized)
            })?;

        let status = resolution.local_status();
        let marked = self.worklist.lock().await.mark(&report.ticket_id, status);

        Ok(format_submit_result(&report, marked))
    }

    fn require_session(&self) -> Result<&Session, String> {
        self.session.get().ok_or_else(|| {
            format!(
                "{}. Use set_technician first.",
                FieldworkError::missing_technician()
            )
        })
    }

    /// Sanitizes an error message to remove the API token.
    fn sanitize_error(&self, error: &FieldworkError) -> String {
        error.sanitized_display(self.client.token_for_sanitization())
    }
}

#[tool_handler]
impl ServerHandler for FieldworkServer {
    /// Returns server information for the MCP initialize handshake.
    fn get_info(&self) -> ServerInfo {
        ServerInfo {
            instructions: Some(
                "fieldwork gives a field technician access to their scheduled Movidesk tickets. \
                 Use whoami to check the technician (set_technician if none is set), \
                 list_appointments to load the schedule, get_appointment for details, \
                 and submit_report to record the work done on a ticket."
                    .into(),
            ),
            capabilities: ServerCapabilities::builder().enable_tools().build(),
            ..Default::default()
        }
    }
}

// ============================================================================
// Response formatting helpers
// ============================================================================

/// Formats the worklist as appointment cards.
fn format_appointment_list(worklist: &Worklist) -> String {
    if worklist.is_empty() {
        return "No appointments found.".to_string();
    }

    let mut output = format!("Found {} appointment(s):\n\n", worklist.len());

    for appointment in worklist.iter() {
        output.push_str(&format!(
            "#{} - {} [{}]\n",
            appointment.id, appointment.client.business_name, appointment.status
        ));
        output.push_str(&format!("   {}\n", appointment.client.full_address()));
        output.push_str(&format!("   Service: {}\n", appointment.service_description));
        output.push_str(&format!("   Deadline: {}\n", appointment.display_deadline()));
        output.push('\n');
    }

    output
}

/// Formats one appointment in full.
fn format_appointment_details(appointment: &Appointment) -> String {
    let mut output = format!(
        "Appointment #{}: {}\n",
        appointment.id, appointment.client.business_name
    );
    output.push_str(&"=".repeat(60));
    output.push('\n');

    if !appointment.protocol.is_empty() {
        output.push_str(&format!("Protocol: {}\n", appointment.protocol));
    }
    output.push_str(&format!("Status: {}\n", appointment.status));
    output.push_str(&format!("Address: {}\n", appointment.client.full_address()));
    output.push_str(&format!("Service: {}\n", appointment.service_description));
    output.push_str(&format!("Deadline: {}\n", appointment.display_deadline()));

    output
}

/// Formats the result of a successful report submission.
fn format_submit_result(report: &WorkReport, marked: bool) -> String {
    let mut output = format!("Report sent for ticket #{}.\n", report.ticket_id);
    output.push_str(&format!("Resolution: {}\n", report.resolution));
    if let Some(hours) = report.elapsed_hours() {
        output.push_str(&format!("Time on site: {} hours\n", hours));
    }
    if marked {
        output.push_str(&format!(
            "Local status: {}\n",
            report.resolution.local_status()
        ));
    } else {
        output.push_str("The ticket is not in the current list; local status unchanged.\n");
    }
    output
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::Config;
    use crate::models::{AppointmentStatus, Ticket};

    fn test_server(dir: &tempfile::TempDir, session: Option<Session>) -> FieldworkServer {
        let client = MovideskClient::new(&Config::new("http://127.0.0.1:9", "test_token_12345"))
            .expect("Failed to create test client");
        let store = TechnicianStore::new(dir.path().join("technician.json"));
        FieldworkServer::new(client, store, session)
    }

    fn appointment(json: &str) -> Appointment {
        Appointment::from_ticket(serde_json::from_str::<Ticket>(json).unwrap())
    }

    #[test]
    fn test_server_info_has_tools_capability() {
        let dir = tempfile::tempdir().unwrap();
        let info = test_server(&dir, None).get_info();
        assert!(info.instructions.is_some());
        assert!(info.capabilities.tools.is_some());
    }

    #[test]
    fn test_ping_tool_returns_pong() {
        let dir = tempfile::tempdir().unwrap();
        assert_eq!(test_server(&dir, None).ping(), "pong");
    }

    #[tokio::test]
    async fn test_set_technician_only_once() {
        let dir = tempfile::tempdir().unwrap();
        let server = test_server(&dir, None);
        assert!(server.whoami().contains("No technician set"));

        let first = server
            .set_technician(Parameters(SetTechnicianInput {
                name: " Ana Costa ".to_string(),
            }))
            .await
            .unwrap();
        assert!(first.contains("Ana Costa"));
        assert_eq!(server.whoami(), "Technician: Ana Costa");

        let store = TechnicianStore::new(dir.path().join("technician.json"));
        assert_eq!(store.load().unwrap().as_deref(), Some("Ana Costa"));

        let second = server
            .set_technician(Parameters(SetTechnicianInput {
                name: "Someone Else".to_string(),
            }))
            .await
            .unwrap_err();
        assert!(second.contains("already set"));
        assert_eq!(server.whoami(), "Technician: Ana Costa");
    }

    #[tokio::test]
    async fn test_set_technician_rejects_blank() {
        let dir = tempfile::tempdir().unwrap();
        let server = test_server(&dir, None);
        let err = server
            .set_technician(Parameters(SetTechnicianInput {
                name: "   ".to_string(),
            }))
            .await
            .unwrap_err();
        assert!(err.contains("valid technician name"));
    }

    #[tokio::test]
    async fn test_list_requires_session() {
        let dir = tempfile::tempdir().unwrap();
        let err = test_server(&dir, None).list_appointments().await.unwrap_err();
        assert!(err.contains("set_technician"));
    }

    #[tokio::test]
    async fn test_submit_requires_session() {
        let dir = tempfile::tempdir().unwrap();
        let err = test_server(&dir, None)
            .submit_report(Parameters(SubmitReportInput {
                ticket_id: "1".to_string(),
                work_performed: "work".to_string(),
                notes: "notes".to_string(),
                resolution: "completed".to_string(),
                time_in: "08:00".to_string(),
                time_out: "09:00".to_string(),
            }))
            .await
            .unwrap_err();
        assert!(err.contains("technician identity is not set"));
    }

    #[tokio::test]
    async fn test_submit_rejects_unknown_resolution() {
        let dir = tempfile::tempdir().unwrap();
        let session = Session::new(TechnicianCategory::new("Ana").unwrap());
        let err = test_server(&dir, Some(session))
            .submit_report(Parameters(SubmitReportInput {
                ticket_id: "1".to_string(),
                work_performed: "work".to_string(),
                notes: "notes".to_string(),
                resolution: "maybe".to_string(),
                time_in: "08:00".to_string(),
                time_out: "09:00".to_string(),
            }))
            .await
            .unwrap_err();
        assert!(err.contains("unknown resolution"));
    }

    #[tokio::test]
    async fn test_get_appointment_from_worklist() {
        let dir = tempfile::tempdir().unwrap();
        let server = test_server(&dir, None);
        server.worklist.lock().await.replace(vec![appointment(
            r#"{"id": 7, "protocol": "P-7", "clients": [{"businessName": "Mercado Bom"}]}"#,
        )]);

        let details = server
            .get_appointment(Parameters(GetAppointmentInput {
                ticket_id: " 7 ".to_string(),
            }))
            .await
            .unwrap();
        assert!(details.contains("Appointment #7: Mercado Bom"));
        assert!(details.contains("Protocol: P-7"));
        assert!(details.contains("Status: Pending"));

        let missing = server
            .get_appointment(Parameters(GetAppointmentInput {
                ticket_id: "8".to_string(),
            }))
            .await
            .unwrap_err();
        assert!(missing.contains("not in the current list"));
    }

    #[test]
    fn test_format_appointment_list_empty() {
        assert_eq!(format_appointment_list(&Worklist::new()), "No appointments found.");
    }

    #[test]
    fn test_format_appointment_list_with_items() {
        let mut worklist = Worklist::new();
        worklist.replace(vec![appointment(
            r#"{"id": 3, "serviceFull": ["Install"], "slaSolutionDate": "2026-10-21T09:00:00",
                "clients": [{"businessName": "Loja X", "address": "Av. Central", "addressNumber": 10,
                             "neighborhood": "Aldeota", "city": "Fortaleza", "state": "CE"}]}"#,
        )]);
        worklist.mark("3", AppointmentStatus::InProgress);

        let output = format_appointment_list(&worklist);
        assert!(output.contains("Found 1 appointment(s)"));
        assert!(output.contains("#3 - Loja X [In progress]"));
        assert!(output.contains("Av. Central, 10 - Aldeota, Fortaleza/CE"));
        assert!(output.contains("Service: Install"));
        assert!(output.contains("Deadline: 21/10/2026 - 09:00"));
    }

    #[test]
    fn test_format_submit_result() {
        let report = WorkReport {
            ticket_id: "3".to_string(),
            work_performed: "w".to_string(),
            notes: "n".to_string(),
            resolution: Resolution::PartiallyCompleted,
            time_in: "22:00".to_string(),
            time_out: "02:00".to_string(),
        };

        let output = format_submit_result(&report, true);
        assert!(output.contains("Report sent for ticket #3"));
        assert!(output.contains("Time on site: 4 hours"));
        assert!(output.contains("Local status: In progress"));

        let output = format_submit_result(&report, false);
        assert!(output.contains("local status unchanged"));
    }
}
