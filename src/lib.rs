//! # fieldwork
//!
//! fieldwork is an MCP (Model Context Protocol) server for field technicians
//! who work service tickets in the Movidesk helpdesk.
//!
//! It pulls the tickets scheduled for a technician, keeps them as a local
//! list of appointments, and sends the technician's work report back to the
//! ticket when a visit is finished.
//!
//! ## Architecture
//!
//! - [`config`] - Configuration loading from environment variables
//! - [`error`] - Error types and the error taxonomy
//! - [`session`] - The technician identity and session context
//! - [`store`] - Local persistence of the technician identity
//! - [`models`] - Remote tickets, local appointments, update payloads
//! - [`report`] - Work reports, time range validation, elapsed hours
//! - [`movidesk_client`] - HTTP client: ticket fetcher and report submitter
//! - [`server`] - MCP server implementation with tool routing
//! - [`tools`] - Tool input parameter structs
//!
//! ## Configuration
//!
//! Required:
//! - `MOVIDESK_TOKEN`: Movidesk API token
//!
//! Optional:
//! - `MOVIDESK_BASE_URL`: API root (default `https://api.movidesk.com/public/v1`)
//! - `MOVIDESK_OWNER_ID`, `MOVIDESK_OWNER_NAME`, `MOVIDESK_OWNER_EMAIL`,
//!   `MOVIDESK_OWNER_PHONE`, `MOVIDESK_OWNER_PERSON_TYPE`,
//!   `MOVIDESK_OWNER_PROFILE_TYPE`: owner attributed to reports
//! - `MOVIDESK_OWNER_TEAM`: team attributed to reports
//! - `MOVIDESK_ACTION_STATUS`: ticket status set by reports (default `Resolvido`)
//! - `FIELDWORK_TECHNICIAN`: technician to store on first run
//! - `FIELDWORK_STATE_FILE`: where the technician is stored
//! - `FIELDWORK_HTTP_TIMEOUT_SECS`: request timeout (default 30)
//! - `RUST_LOG`: Log level (e.g., `fieldwork=debug`)
//!
//! ## Example
//!
//! ```ignore
//! use fieldwork::config::Config;
//! use fieldwork::movidesk_client::MovideskClient;
//! use fieldwork::report::{Resolution, WorkReport};
//! use fieldwork::session::{Session, TechnicianCategory};
//!
//! async fn example() -> Result<(), fieldwork::error::FieldworkError> {
//!     let config = Config::from_env()?;
//!     let client = MovideskClient::new(&config)?;
//!     let session = Session::new(TechnicianCategory::new("Joao Lima")?);
//!
//!     let appointments = client.fetch_for_session(&session).await?;
//!     if let Some(first) = appointments.first() {
//!         let report = WorkReport {
//!             ticket_id: first.id.clone(),
//!             work_performed: "Installed the printer".into(),
//!             notes: "Customer trained".into(),
//!             resolution: Resolution::Completed,
//!             time_in: "08:00".into(),
//!             time_out: "09:30".into(),
//!         };
//!         client.submit_report(&session, &report).await?;
//!     }
//!
//!     Ok(())
//! }
//! ```

#![warn(missing_docs)]
#![warn(rustdoc::missing_crate_level_docs)]

pub mod config;
pub mod error;
pub mod models;
pub mod movidesk_client;
pub mod report;
pub mod server;
pub mod session;
pub mod store;
pub mod tools;
