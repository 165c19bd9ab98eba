//! Request body for `PATCH /tickets`.
//!
//! A work report is sent as a single ticket action. Owner attribution is
//! optional and comes from configuration.

use serde::Serialize;

use crate::config::OwnerConfig;

/// Ticket type used for every update (public ticket).
pub const TICKET_TYPE_PUBLIC: u8 = 2;
/// Action type for a public action.
pub const ACTION_TYPE_PUBLIC: u8 = 2;
/// Action origin for actions created through the API.
pub const ACTION_ORIGIN_API: u8 = 2;

/// Partial ticket update carrying one action.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct TicketUpdate {
    /// Ticket type.
    #[serde(rename = "type")]
    pub ticket_type: u8,

    /// Person the update is attributed to.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub owner: Option<Owner>,

    /// Team the update is attributed to.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub owner_team: Option<String>,

    /// Actions to append to the ticket.
    pub actions: Vec<TicketAction>,
}

/// Owner block of a ticket update.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Owner {
    /// Movidesk person ID.
    pub id: String,
    /// Person type.
    pub person_type: u8,
    /// Profile type.
    pub profile_type: u8,
    /// Display name.
    pub business_name: String,
    /// Contact email.
    pub email: String,
    /// Contact phone.
    pub phone: String,
}

impl From<&OwnerConfig> for Owner {
    fn from(config: &OwnerConfig) -> Self {
        Self {
            id: config.id.clone(),
            person_type: config.person_type,
            profile_type: config.profile_type,
            business_name: config.business_name.clone(),
            email: config.email.clone(),
            phone: config.phone.clone(),
        }
    }
}

/// A single ticket action.
#[derive(Debug, Clone, Serialize)]
pub struct TicketAction {
    /// Action type.
    #[serde(rename = "type")]
    pub action_type: u8,
    /// Where the action came from.
    pub origin: u8,
    /// Action body.
    pub description: String,
    /// Ticket status to set with this action.
    pub status: String,
    /// Tags, always empty for work reports.
    pub tags: Vec<String>,
}

impl TicketUpdate {
    /// Builds an update with one public API action.
    pub fn with_action(
        description: impl Into<String>,
        status: impl Into<String>,
        owner: Option<&OwnerConfig>,
        owner_team: Option<&str>,
    ) -> Self {
        Self {
            ticket_type: TICKET_TYPE_PUBLIC,
            owner: owner.map(Owner::from),
            owner_team: owner_team.map(str::to_string),
            actions: vec![TicketAction {
                action_type: ACTION_TYPE_PUBLIC,
                origin: ACTION_ORIGIN_API,
                description: description.into(),
                status: status.into(),
                tags: Vec::new(),
            }],
        }
    }
}
