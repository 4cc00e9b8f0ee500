//! Wire types for catalog documents.
//!
//! Only the fields the pipeline consumes are modelled; everything else in
//! the catalog's JSON is ignored on decode. Fields that non-broadcast
//! entities may omit fall back to their default.

use chrono::{DateTime, FixedOffset};
use serde::Deserialize;

/// Response of the catalog search endpoint.
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SearchResponse {
    #[serde(default)]
    pub took: i64,
    #[serde(default)]
    pub total: i64,
    #[serde(default)]
    pub hits: Vec<SearchHit>,
    /// Spelling suggestions, only populated when nothing matched.
    #[serde(default)]
    pub suggest: Vec<Suggestion>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct SearchHit {
    pub data: HitData,
}

/// Payload of a single search hit. A hit can be any catalog entity
/// (broadcast, article, image, ...); `entity` tells them apart.
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct HitData {
    pub href: String,
    #[serde(default)]
    pub station: String,
    #[serde(default)]
    pub entity: String,
    #[serde(default)]
    pub id: i64,
    /// Broadcast date encoded as YYYYMMDD.
    #[serde(default)]
    pub broadcast_day: i64,
    #[serde(default)]
    pub program_key: String,
    #[serde(default)]
    pub title: String,
    #[serde(default)]
    pub subtitle: String,
    #[serde(default, rename = "startISO")]
    pub start_iso: Option<DateTime<FixedOffset>>,
    #[serde(default, rename = "endISO")]
    pub end_iso: Option<DateTime<FixedOffset>>,
    #[serde(default)]
    pub images: Vec<ImageSet>,
}

/// One spelling suggestion row from the search endpoint.
#[derive(Debug, Clone, Deserialize)]
pub struct Suggestion {
    pub text: String,
    #[serde(default)]
    pub highlighted: String,
    #[serde(default)]
    pub score: f64,
}

/// Broadcast detail document.
///
/// Immutable after decode; `start_iso` is required because the resolved
/// year derives from it.
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct BroadcastRecord {
    #[serde(default)]
    pub entity: String,
    #[serde(default)]
    pub title: String,
    #[serde(default)]
    pub subtitle: String,
    #[serde(default)]
    pub broadcast_day: i64,
    #[serde(default)]
    pub program_key: String,
    #[serde(rename = "startISO")]
    pub start_iso: DateTime<FixedOffset>,
    #[serde(default, rename = "endISO")]
    pub end_iso: Option<DateTime<FixedOffset>>,
    #[serde(default)]
    pub images: Vec<ImageSet>,
    #[serde(default)]
    pub streams: Vec<StreamDescriptor>,
}

/// An image with its rendered size variants.
#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct ImageSet {
    #[serde(default)]
    pub versions: Vec<ImageVariant>,
}

#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct ImageVariant {
    pub path: String,
    #[serde(default)]
    pub width: u32,
}

/// Opaque token identifying the audio asset of a broadcast. The first
/// descriptor in a broadcast's stream list is authoritative.
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct StreamDescriptor {
    pub loop_stream_id: String,
}
