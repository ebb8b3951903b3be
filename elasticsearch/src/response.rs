use chrono::{DateTime, NaiveDateTime, Utc};
use pelorus_core::{AggregationRound, Mmsi, ScrollCursor, TrackPoint, TrackSample, VesselStatics};
use serde::Deserialize;
use snafu::ResultExt;

use crate::{Result, error::error::ParseTimestampSnafu};

/// A field legacy mappings index either as text or as a number, MMSI
/// bucket keys and `VesselType` come back both ways depending on how
/// the index was created.
#[derive(Debug, Clone, Deserialize)]
#[serde(untagged)]
pub(crate) enum Text {
    Text(String),
    Number(serde_json::Number),
}

#[derive(Debug, Deserialize)]
pub(crate) struct SearchResponse {
    #[serde(rename = "_scroll_id")]
    pub scroll_id: Option<String>,
    pub aggregations: Option<Aggregations>,
}

#[derive(Debug, Deserialize)]
pub(crate) struct Aggregations {
    pub vessels: TermsBuckets,
}

#[derive(Debug, Deserialize)]
pub(crate) struct TermsBuckets {
    pub buckets: Vec<VesselBucket>,
}

#[derive(Debug, Deserialize)]
pub(crate) struct VesselBucket {
    pub key: Text,
    pub vessel_info: TopHits<VesselInfoSource>,
    pub geohash_grid: Option<GridBuckets>,
}

#[derive(Debug, Deserialize)]
pub(crate) struct GridBuckets {
    pub buckets: Vec<GridBucket>,
}

#[derive(Debug, Deserialize)]
pub(crate) struct GridBucket {
    pub representative_point: Option<TopHits<PointSource>>,
}

#[derive(Debug, Deserialize)]
pub(crate) struct TopHits<T> {
    pub hits: HitsEnvelope<T>,
}

#[derive(Debug, Deserialize)]
pub(crate) struct HitsEnvelope<T> {
    pub hits: Vec<Hit<T>>,
}

#[derive(Debug, Deserialize)]
pub(crate) struct Hit<T> {
    #[serde(rename = "_source")]
    pub source: T,
}

#[derive(Debug, Deserialize)]
pub(crate) struct VesselInfoSource {
    #[serde(rename = "VesselName")]
    pub vessel_name: Option<String>,
    #[serde(rename = "IMO")]
    pub imo: Option<String>,
    #[serde(rename = "CallSign")]
    pub call_sign: Option<String>,
    #[serde(rename = "VesselType")]
    pub vessel_type: Option<Text>,
    #[serde(rename = "Length")]
    pub length: Option<f64>,
    #[serde(rename = "Width")]
    pub width: Option<f64>,
    #[serde(rename = "Draft")]
    pub draft: Option<f64>,
}

#[derive(Debug, Deserialize)]
pub(crate) struct PointSource {
    #[serde(rename = "BaseDateTime")]
    pub timestamp: String,
    #[serde(rename = "LAT")]
    pub latitude: f64,
    #[serde(rename = "LON")]
    pub longitude: f64,
}

#[derive(Debug, Deserialize)]
pub(crate) struct ClusterHealth {
    pub status: String,
    pub number_of_nodes: u64,
}

impl Text {
    pub(crate) fn into_string(self) -> String {
        match self {
            Text::Text(text) => text,
            Text::Number(number) => number.to_string(),
        }
    }
}

impl SearchResponse {
    /// Absent `aggregations` means the continuation is exhausted and is
    /// mapped to `samples: None`. A renewed scroll id is kept either
    /// way so the caller never loses the handle it has to release.
    pub(crate) fn into_round(self) -> Result<AggregationRound> {
        let cursor = self.scroll_id.map(ScrollCursor::new);

        let Some(aggregations) = self.aggregations else {
            return Ok(AggregationRound {
                cursor,
                samples: None,
            });
        };

        let mut samples = Vec::with_capacity(aggregations.vessels.buckets.len());
        for bucket in aggregations.vessels.buckets {
            if let Some(sample) = bucket.into_sample()? {
                samples.push(sample);
            }
        }

        Ok(AggregationRound {
            cursor,
            samples: Some(samples),
        })
    }
}

impl VesselBucket {
    /// Buckets without a metadata hit or without any spatial cells are
    /// dropped. Cells whose representative lookup came back empty are
    /// skipped without dropping the vessel.
    fn into_sample(self) -> Result<Option<TrackSample>> {
        let Some(info) = self.vessel_info.hits.hits.into_iter().next() else {
            return Ok(None);
        };

        let buckets = match self.geohash_grid {
            Some(grid) if !grid.buckets.is_empty() => grid.buckets,
            _ => return Ok(None),
        };

        let mut points = Vec::with_capacity(buckets.len());
        for bucket in buckets {
            let Some(hit) = bucket
                .representative_point
                .and_then(|top| top.hits.hits.into_iter().next())
            else {
                continue;
            };
            points.push(hit.source.try_into()?);
        }

        Ok(Some(TrackSample {
            mmsi: Mmsi::new(self.key.into_string()),
            vessel: info.source.into(),
            points,
        }))
    }
}

impl From<VesselInfoSource> for VesselStatics {
    fn from(value: VesselInfoSource) -> Self {
        Self {
            name: value.vessel_name,
            imo: value.imo,
            call_sign: value.call_sign,
            ship_type: value.vessel_type.map(Text::into_string),
            length: value.length,
            width: value.width,
            draft: value.draft,
        }
    }
}

impl TryFrom<PointSource> for TrackPoint {
    type Error = crate::Error;

    fn try_from(value: PointSource) -> Result<Self> {
        Ok(Self {
            timestamp: parse_timestamp(&value.timestamp)?,
            latitude: value.latitude,
            longitude: value.longitude,
        })
    }
}

/// The index stores `BaseDateTime` as a zone-less local timestamp, but
/// responses can also carry RFC 3339 when the field was ingested with
/// an offset. Both are read as UTC.
fn parse_timestamp(value: &str) -> Result<DateTime<Utc>> {
    match DateTime::parse_from_rfc3339(value) {
        Ok(timestamp) => Ok(timestamp.with_timezone(&Utc)),
        Err(_) => NaiveDateTime::parse_from_str(value, "%Y-%m-%dT%H:%M:%S%.f")
            .map(|timestamp| timestamp.and_utc())
            .context(ParseTimestampSnafu { value }),
    }
}
