//! HTTP client for the Movidesk tickets API.
//!
//! This module provides the `MovideskClient` struct, which fetches the
//! technician's scheduled tickets and sends work reports back.
//!
//! # No retries
//!
//! Each operation issues exactly one request. Failures are returned to the
//! caller, which decides whether to offer a retry.
//!
//! # Security
//!
//! Movidesk authenticates with a `token` query parameter. The token is never
//! logged, and every error body is sanitized before it leaves this module.

use std::time::Duration;

use reqwest::{Client, Method, RequestBuilder, StatusCode};

use crate::config::{Config, OwnerConfig};
use crate::error::FieldworkError;
use crate::models::{Appointment, Ticket};
use crate::report::WorkReport;
use crate::session::{Session, TechnicianCategory};

/// Justification value of tickets that are scheduled for a visit.
pub const SCHEDULED_JUSTIFICATION: &str = "Novo Agendado";

/// Related entities expanded in the ticket listing.
const TICKET_EXPAND: &str = "clients";

/// Fields requested in the ticket listing.
const TICKET_SELECT: &str = "id,protocol,serviceFull,slaSolutionDate,category";

/// Maximum length for HTTP error response bodies.
const MAX_ERROR_BODY_LEN: usize = 500;

/// HTTP client for the Movidesk API.
///
/// # Example
///
/// ```ignore
/// let config = Config::from_env()?;
/// let client = MovideskClient::new(&config)?;
///
/// let appointments = client.fetch_tickets("Joao Lima").await?;
/// ```
#[derive(Clone)]
pub struct MovideskClient {
    /// The underlying HTTP client (cloning is cheap).
    http: Client,

    /// Base URL for the API (e.g., `https://api.movidesk.com/public/v1`).
    base_url: String,

    /// API token.
    /// SECURITY: Never log this value!
    token: String,

    /// Timeout applied by `http`, kept for error messages.
    timeout: Duration,

    owner: Option<OwnerConfig>,
    owner_team: Option<String>,
    action_status: String,
}

impl MovideskClient {
    /// Creates a new client from configuration.
    ///
    /// # Errors
    ///
    /// Returns `FieldworkError::HttpClient` if the HTTP client fails to initialize.
    pub fn new(config: &Config) -> Result<Self, FieldworkError> {
        let http = Client::builder()
            .timeout(config.timeout)
            .build()
            .map_err(FieldworkError::HttpClient)?;

        Ok(Self {
            http,
            base_url: config.base_url.trim_end_matches('/').to_string(),
            token: config.token.clone(),
            timeout: config.timeout,
            owner: config.owner.clone(),
            owner_team: config.owner_team.clone(),
            action_status: config.action_status.clone(),
        })
    }

    /// Returns the token for sanitization purposes.
    ///
    /// This should ONLY be used for sanitizing error messages, never for logging.
    pub(crate) fn token_for_sanitization(&self) -> &str {
        &self.token
    }

    /// Validates that a ticket ID is a numeric string.
    ///
    /// The ID is interpolated into the request query, so anything else is
    /// rejected before a request is built.
    fn validate_ticket_id(id: &str) -> Result<(), FieldworkError> {
        if id.is_empty() || !id.bytes().all(|b| b.is_ascii_digit()) {
            return Err(FieldworkError::validation(format!(
                "ticket_id must be a numeric string, got: {:?}",
                id.chars().take(50).collect::<String>()
            )));
        }
        Ok(())
    }

    /// Fetches the tickets scheduled for a technician category.
    ///
    /// Every returned appointment starts as pending; the remote ticket status
    /// is not read. An empty result is not an error.
    ///
    /// # Errors
    ///
    /// - `FieldworkError::Config` if `technician_category` is blank (no request is made)
    /// - a remote error if the request fails, the status is not 2xx, or the
    ///   body is not a JSON array of tickets
    pub async fn fetch_tickets(
        &self,
        technician_category: &str,
    ) -> Result<Vec<Appointment>, FieldworkError> {
        let category = TechnicianCategory::new(technician_category)?;
        let query = TicketQuery::scheduled_for(&category);

        tracing::debug!(technician = %category, "Fetching scheduled tickets");

        let request = self
            .request(Method::GET, "/tickets")
            .query(&query.to_query_pairs());
        let body = self.send(request, "GET /tickets").await?;

        let tickets: Vec<Ticket> = serde_json::from_str(&body).map_err(FieldworkError::Decode)?;
        let appointments: Vec<Appointment> =
            tickets.into_iter().map(Appointment::from_ticket).collect();

        tracing::info!(
            technician = %category,
            count = appointments.len(),
            "Fetched scheduled tickets"
        );

        Ok(appointments)
    }

    /// Fetches the tickets scheduled for the session's technician.
    pub async fn fetch_for_session(
        &self,
        session: &Session,
    ) -> Result<Vec<Appointment>, FieldworkError> {
        self.fetch_tickets(session.technician().as_str()).await
    }

    /// Sends a work report as a new action on its ticket.
    ///
    /// The report is validated first; nothing is sent if validation fails.
    /// No local appointment is changed here: callers apply
    /// `report.resolution.local_status()` to their own worklist.
    ///
    /// # Errors
    ///
    /// - `FieldworkError::Validation` for missing fields, a bad time range or
    ///   a non-numeric ticket ID
    /// - a remote error if the request fails or the status is not 2xx
    pub async fn submit_report(
        &self,
        session: &Session,
        report: &WorkReport,
    ) -> Result<(), FieldworkError> {
        let update = report.to_update(
            &self.action_status,
            self.owner.as_ref(),
            self.owner_team.as_deref(),
        )?;
        Self::validate_ticket_id(&report.ticket_id)?;

        tracing::debug!(
            technician = %session.technician(),
            ticket_id = %report.ticket_id,
            "Submitting work report"
        );

        let request = self
            .request(Method::PATCH, "/tickets")
            .query(&[("id", report.ticket_id.as_str())])
            .json(&update);
        self.send(request, "PATCH /tickets").await?;

        tracing::info!(
            technician = %session.technician(),
            ticket_id = %report.ticket_id,
            resolution = %report.resolution,
            "Work report submitted"
        );

        Ok(())
    }

    /// Starts a request with the token already attached.
    fn request(&self, method: Method, path: &str) -> RequestBuilder {
        let url = format!("{}{}", self.base_url, path);

        tracing::debug!(method = %method, path = %path, "Making Movidesk API request");

        self.http
            .request(method, &url)
            .query(&[("token", self.token.as_str())])
    }

    /// Sends a request and returns the body of a successful response.
    async fn send(
        &self,
        request: RequestBuilder,
        operation: &str,
    ) -> Result<String, FieldworkError> {
        let response = request.send().await.map_err(|e| {
            if e.is_timeout() {
                return FieldworkError::timeout(self.timeout, operation);
            }
            // Strip the URL, it carries the token.
            FieldworkError::Http(e.without_url())
        })?;
        let status = response.status();

        if !status.is_success() {
            return Err(self.handle_http_error(status, response).await);
        }

        let body = response
            .text()
            .await
            .map_err(|e| FieldworkError::Http(e.without_url()))?;

        tracing::trace!(body_len = body.len(), "Movidesk API response");

        Ok(body)
    }

    /// Converts a non-success response into a `FieldworkError`.
    async fn handle_http_error(
        &self,
        status: StatusCode,
        response: reqwest::Response,
    ) -> FieldworkError {
        let body = response.text().await.unwrap_or_default();
        let body = FieldworkError::sanitize_message(&body, &self.token);
        let body = truncate_body(body);

        tracing::warn!(status = %status, "Movidesk API returned an error status");

        FieldworkError::HttpStatus { status, body }
    }
}

fn truncate_body(body: String) -> String {
    if body.len() <= MAX_ERROR_BODY_LEN {
        return body;
    }
    let mut end = MAX_ERROR_BODY_LEN;
    while !body.is_char_boundary(end) {
        end -= 1;
    }
    format!("{}...[truncated]", &body[..end])
}

/// OData query for the ticket listing.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TicketQuery {
    expand: String,
    select: String,
    filter: String,
}

impl TicketQuery {
    /// Query for tickets scheduled for `category`.
    pub fn scheduled_for(category: &TechnicianCategory) -> Self {
        Self {
            expand: TICKET_EXPAND.to_string(),
            select: TICKET_SELECT.to_string(),
            filter: format!(
                "justification eq '{}' and category eq '{}'",
                odata_escape(SCHEDULED_JUSTIFICATION),
                odata_escape(category.as_str())
            ),
        }
    }

    /// The `$filter` expression.
    pub fn filter(&self) -> &str {
        &self.filter
    }

    /// Query parameters, without the token.
    pub fn to_query_pairs(&self) -> [(&'static str, &str); 3] {
        [
            ("$expand", self.expand.as_str()),
            ("$select", self.select.as_str()),
            ("$filter", self.filter.as_str()),
        ]
    }
}

/// Escapes a value for an OData string literal.
fn odata_escape(value: &str) -> String {
    value.replace('\'', "''")
}
