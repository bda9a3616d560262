use anyhow::Result;
use serde::{Deserialize, Serialize};

pub mod path;

pub use path::{href_for, is_root, parse_pathname, ROOT_HREF};

/// Literal route segment that introduces a payload identifier.
pub const PAYLOADS_SEGMENT: &str = "payloads";
/// Literal route segment that introduces a flight identifier.
pub const FLIGHTS_SEGMENT: &str = "flights";

pub const HOME_LABEL: &str = "Home";

/// Positional classification of one path segment.
#[derive(Debug, Serialize, Deserialize, Clone, Copy, PartialEq, Eq, Hash)]
#[serde(rename_all = "snake_case")]
pub enum SegmentKind {
    Literal,
    PayloadId,
    FlightId,
}

impl SegmentKind {
    #[must_use]
    pub const fn is_identifier(self) -> bool {
        matches!(self, Self::PayloadId | Self::FlightId)
    }
}

#[derive(Debug, Serialize, Deserialize, Clone, PartialEq, Eq)]
pub struct ClassifiedSegment {
    pub value: String,
    pub kind: SegmentKind,
    pub position: usize,
}

/// What a rendered trail element stands for.
#[derive(Debug, Serialize, Deserialize, Clone, Copy, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub enum ItemKind {
    Home,
    Literal,
    PayloadId,
    FlightId,
}

impl From<SegmentKind> for ItemKind {
    fn from(kind: SegmentKind) -> Self {
        match kind {
            SegmentKind::Literal => Self::Literal,
            SegmentKind::PayloadId => Self::PayloadId,
            SegmentKind::FlightId => Self::FlightId,
        }
    }
}

#[derive(Debug, Serialize, Deserialize, Clone, PartialEq, Eq)]
pub struct BreadcrumbItem {
    pub label: String,
    /// `None` only for the current location, which is not a link.
    pub href: Option<String>,
    pub kind: ItemKind,
    /// A lookup for this identifier is outstanding; `label` is still the fallback.
    #[serde(default, skip_serializing_if = "std::ops::Not::not")]
    pub resolving: bool,
}

/// `GET /api/payloads/{id}` response body.
#[derive(Debug, Serialize, Deserialize, Clone, PartialEq)]
pub struct PayloadRecord {
    pub id: String,
    pub name: String,
    #[serde(default)]
    pub owner: Option<String>,
    #[serde(default)]
    pub default_weight: Option<f64>,
}

/// `GET /api/flights/{id}` response body. `flight_date` is kept as the raw
/// ISO-8601 string; turning it into a label is the resolver's job.
#[derive(Debug, Serialize, Deserialize, Clone, PartialEq)]
pub struct FlightRecord {
    pub id: String,
    pub flight_date: String,
    #[serde(default)]
    pub payload_id: Option<String>,
    #[serde(default)]
    pub name: Option<String>,
    #[serde(default)]
    pub description: Option<String>,
    #[serde(default)]
    pub location: Option<String>,
    #[serde(default)]
    pub custom_weight: Option<f64>,
}

pub fn serialize_json<T: Serialize>(value: &T) -> Result<String> {
    serde_json::to_string(value).map_err(Into::into)
}

pub fn serialize_json_pretty<T: Serialize>(value: &T) -> Result<String> {
    serde_json::to_string_pretty(value).map_err(Into::into)
}
