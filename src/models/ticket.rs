//! Ticket models as returned by the Movidesk tickets endpoint.
//!
//! Only the projection requested by the fetcher is modelled. Every field but
//! `id` is optional because Movidesk omits or nulls fields freely.

use serde::Deserialize;

/// A ticket from `GET /tickets` with `$expand=clients`.
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Ticket {
    /// Unique ticket ID (integer in the API, normalized to a string).
    #[serde(deserialize_with = "deserialize_string_or_int")]
    pub id: String,

    /// Human-facing protocol code.
    #[serde(default)]
    pub protocol: Option<String>,

    /// Service classification, usually a path of service levels.
    #[serde(default)]
    pub service_full: Option<ServiceFull>,

    /// SLA solution deadline, as sent by the API.
    #[serde(default)]
    pub sla_solution_date: Option<String>,

    /// Ticket category (the technician's name in this deployment).
    #[serde(default)]
    pub category: Option<String>,

    /// Expanded client entities; the first one is the one we show.
    #[serde(default)]
    pub clients: Option<Vec<TicketClient>>,
}

impl Ticket {
    /// Returns the primary client, if the ticket has one.
    pub fn primary_client(&self) -> Option<&TicketClient> {
        self.clients.as_ref().and_then(|c| c.first())
    }
}

/// The `serviceFull` field, which is a list of service levels on current
/// API versions and a plain string on some older ones.
#[derive(Debug, Clone, Deserialize)]
#[serde(untagged)]
pub enum ServiceFull {
    /// Service levels from the most general to the most specific.
    Levels(Vec<String>),
    /// Single pre-joined description.
    Text(String),
}

impl ServiceFull {
    /// Joins the service levels into a single line, skipping blanks.
    pub fn to_text(&self) -> String {
        match self {
            ServiceFull::Levels(levels) => levels
                .iter()
                .map(|l| l.trim())
                .filter(|l| !l.is_empty())
                .collect::<Vec<_>>()
                .join(" > "),
            ServiceFull::Text(text) => text.trim().to_string(),
        }
    }
}

/// A client (person or company) attached to a ticket.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TicketClient {
    /// Company or person name.
    #[serde(default)]
    pub business_name: Option<String>,

    /// Street address.
    #[serde(default)]
    pub address: Option<String>,

    /// Street number (string or integer in the API).
    #[serde(default, deserialize_with = "deserialize_optional_string_or_int")]
    pub address_number: Option<String>,

    /// District.
    #[serde(default)]
    pub neighborhood: Option<String>,

    /// City.
    #[serde(default)]
    pub city: Option<String>,

    /// State abbreviation.
    #[serde(default)]
    pub state: Option<String>,
}

/// Deserializes a value that can be either a string or an integer into a String.
fn deserialize_string_or_int<'de, D>(deserializer: D) -> Result<String, D::Error>
where
    D: serde::Deserializer<'de>,
{
    deserializer.deserialize_any(StringOrIntVisitor)
}

/// Deserializes an optional value that can be either a string or an integer into Option<String>.
fn deserialize_optional_string_or_int<'de, D>(deserializer: D) -> Result<Option<String>, D::Error>
where
    D: serde::Deserializer<'de>,
{
    use serde::de::{self, Visitor};

    struct OptionalStringOrIntVisitor;

    impl<'de> Visitor<'de> for OptionalStringOrIntVisitor {
        type Value = Option<String>;

        fn expecting(&self, formatter: &mut std::fmt::Formatter) -> std::fmt::Result {
            formatter.write_str("null, a string, or an integer")
        }

        fn visit_none<E>(self) -> Result<Self::Value, E>
        where
            E: de::Error,
        {
            Ok(None)
        }

        fn visit_unit<E>(self) -> Result<Self::Value, E>
        where
            E: de::Error,
        {
            Ok(None)
        }

        fn visit_some<D>(self, deserializer: D) -> Result<Self::Value, D::Error>
        where
            D: serde::Deserializer<'de>,
        {
            deserializer.deserialize_any(StringOrIntVisitor).map(Some)
        }

        fn visit_str<E>(self, value: &str) -> Result<Self::Value, E>
        where
            E: de::Error,
        {
            Ok(Some(value.to_string()))
        }

        fn visit_i64<E>(self, value: i64) -> Result<Self::Value, E>
        where
            E: de::Error,
        {
            Ok(Some(value.to_string()))
        }

        fn visit_u64<E>(self, value: u64) -> Result<Self::Value, E>
        where
            E: de::Error,
        {
            Ok(Some(value.to_string()))
        }
    }

    deserializer.deserialize_option(OptionalStringOrIntVisitor)
}

struct StringOrIntVisitor;

impl<'de> serde::de::Visitor<'de> for StringOrIntVisitor {
    type Value = String;

    fn expecting(&self, formatter: &mut std::fmt::Formatter) -> std::fmt::Result {
        formatter.write_str("a string or an integer")
    }

    fn visit_str<E>(self, value: &str) -> Result<Self::Value, E>
    where
        E: serde::de::Error,
    {
        Ok(value.to_string())
    }

    fn visit_string<E>(self, value: String) -> Result<Self::Value, E>
    where
        E: serde::de::Error,
    {
        Ok(value)
    }

    fn visit_i64<E>(self, value: i64) -> Result<Self::Value, E>
    where
        E: serde::de::Error,
    {
        Ok(value.to_string())
    }

    fn visit_u64<E>(self, value: u64) -> Result<Self::Value, E>
    where
        E: serde::de::Error,
    {
        Ok(value.to_string())
    }
}
