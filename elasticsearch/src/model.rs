use chrono::{DateTime, Utc};
use pelorus_core::AisPing;
use serde::{Deserialize, Serialize};

/// A position report in the column naming of the vessel index. Sparse
/// fields are left out of the document entirely instead of being
/// indexed as empty strings.
#[derive(Debug, Serialize)]
pub(crate) struct EsPing<'a> {
    #[serde(rename = "MMSI")]
    mmsi: &'a str,
    #[serde(rename = "BaseDateTime")]
    timestamp: String,
    #[serde(rename = "LAT")]
    latitude: f64,
    #[serde(rename = "LON")]
    longitude: f64,
    #[serde(rename = "SOG", skip_serializing_if = "Option::is_none")]
    speed_over_ground: Option<f64>,
    #[serde(rename = "COG", skip_serializing_if = "Option::is_none")]
    course_over_ground: Option<f64>,
    #[serde(rename = "Heading", skip_serializing_if = "Option::is_none")]
    heading: Option<f64>,
    #[serde(rename = "VesselName", skip_serializing_if = "Option::is_none")]
    vessel_name: Option<&'a str>,
    #[serde(rename = "IMO", skip_serializing_if = "Option::is_none")]
    imo: Option<&'a str>,
    #[serde(rename = "CallSign", skip_serializing_if = "Option::is_none")]
    call_sign: Option<&'a str>,
    #[serde(rename = "VesselType", skip_serializing_if = "Option::is_none")]
    ship_type: Option<&'a str>,
    #[serde(rename = "Status", skip_serializing_if = "Option::is_none")]
    navigational_status: Option<i32>,
    #[serde(rename = "Length", skip_serializing_if = "Option::is_none")]
    length: Option<f64>,
    #[serde(rename = "Width", skip_serializing_if = "Option::is_none")]
    width: Option<f64>,
    #[serde(rename = "Draft", skip_serializing_if = "Option::is_none")]
    draft: Option<f64>,
    #[serde(rename = "Cargo", skip_serializing_if = "Option::is_none")]
    cargo: Option<i32>,
    #[serde(rename = "TransceiverClass", skip_serializing_if = "Option::is_none")]
    transceiver_class: Option<&'a str>,
    /// Combined coordinate backing the primary aggregation shape.
    location: String,
}

#[derive(Debug, Deserialize)]
pub(crate) struct BulkResponse {
    pub errors: bool,
    pub items: Vec<BulkItem>,
}

#[derive(Debug, Deserialize)]
pub(crate) struct BulkItem {
    pub index: BulkItemStatus,
}

#[derive(Debug, Deserialize)]
pub(crate) struct BulkItemStatus {
    pub error: Option<serde_json::Value>,
}

impl BulkResponse {
    pub(crate) fn failed(&self) -> usize {
        if !self.errors {
            return 0;
        }

        self.items
            .iter()
            .filter(|item| item.index.error.is_some())
            .count()
    }
}

impl<'a> From<&'a AisPing> for EsPing<'a> {
    fn from(ping: &'a AisPing) -> Self {
        Self {
            mmsi: ping.mmsi.as_str(),
            timestamp: naive_seconds(ping.timestamp),
            latitude: ping.latitude,
            longitude: ping.longitude,
            speed_over_ground: ping.speed_over_ground,
            course_over_ground: ping.course_over_ground,
            heading: ping.heading,
            vessel_name: ping.vessel_name.as_deref(),
            imo: ping.imo.as_deref(),
            call_sign: ping.call_sign.as_deref(),
            ship_type: ping.ship_type.as_deref(),
            navigational_status: ping.navigational_status,
            length: ping.length,
            width: ping.width,
            draft: ping.draft,
            cargo: ping.cargo,
            transceiver_class: ping.transceiver_class.as_deref(),
            location: format!("{},{}", ping.latitude, ping.longitude),
        }
    }
}

/// `BaseDateTime` is indexed zone-less at second precision, the format
/// the source data ships in.
fn naive_seconds(timestamp: DateTime<Utc>) -> String {
    timestamp.format("%Y-%m-%dT%H:%M:%S").to_string()
}
