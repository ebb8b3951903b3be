use pelorus_core::{CELL_PRECISION, QueryShape, ScrollCursor, SearchDay};
use serde_json::{Value, json};

/// Static metadata fields returned by the per-vessel first-document lookup.
pub(crate) const VESSEL_METADATA_FIELDS: [&str; 7] = [
    "VesselName",
    "IMO",
    "CallSign",
    "VesselType",
    "Length",
    "Width",
    "Draft",
];

/// Fields of the representative point kept per spatial cell. Speed and
/// heading are left out, the distance computation does not need them.
pub(crate) const POINT_FIELDS: [&str; 3] = ["BaseDateTime", "LAT", "LON"];

pub(crate) fn grid_field(shape: QueryShape) -> &'static str {
    match shape {
        QueryShape::GeoPoint => "location",
        QueryShape::LatitudeOnly => "LAT",
    }
}

/// The aggregation run once per round: vessels bucketed by MMSI, each
/// carrying one metadata hit plus a geohash grid of its positions with
/// the earliest ping per cell.
pub(crate) fn track_aggregation(day: SearchDay, shape: QueryShape, vessels_per_round: u32) -> Value {
    json!({
        "query": {
            "range": {
                "BaseDateTime": {
                    "gte": format!("{day}T00:00:00"),
                    "lte": format!("{day}T23:59:59"),
                }
            }
        },
        "size": 0,
        "aggs": {
            "vessels": {
                "terms": {
                    "field": "MMSI.keyword",
                    "size": vessels_per_round,
                },
                "aggs": {
                    "vessel_info": {
                        "top_hits": {
                            "size": 1,
                            "_source": VESSEL_METADATA_FIELDS,
                        }
                    },
                    "geohash_grid": {
                        "geohash_grid": {
                            "field": grid_field(shape),
                            "precision": CELL_PRECISION,
                        },
                        "aggs": {
                            "representative_point": {
                                "top_hits": {
                                    "size": 1,
                                    "sort": [{ "BaseDateTime": { "order": "asc" } }],
                                    "_source": POINT_FIELDS,
                                }
                            }
                        }
                    }
                }
            }
        }
    })
}

pub(crate) fn scroll_continuation(ttl: &str, cursor: &ScrollCursor) -> Value {
    json!({
        "scroll": ttl,
        "scroll_id": cursor.as_str(),
    })
}

pub(crate) fn scroll_release(cursor: &ScrollCursor) -> Value {
    json!({
        "scroll_id": [cursor.as_str()],
    })
}

pub(crate) fn bulk_action(index: &str) -> Value {
    json!({
        "index": { "_index": index },
    })
}

/// Explicit mapping for a bootstrapped vessel index. The combined
/// coordinate field backs the primary aggregation shape, and the
/// keyword subfield keeps `MMSI.keyword` working the same way it does
/// on dynamically mapped legacy indexes.
pub(crate) fn index_mapping() -> Value {
    json!({
        "mappings": {
            "properties": {
                "MMSI": {
                    "type": "text",
                    "fields": { "keyword": { "type": "keyword" } },
                },
                "BaseDateTime": { "type": "date" },
                "LAT": { "type": "double" },
                "LON": { "type": "double" },
                "SOG": { "type": "double" },
                "COG": { "type": "double" },
                "Heading": { "type": "double" },
                "VesselName": { "type": "keyword" },
                "IMO": { "type": "keyword" },
                "CallSign": { "type": "keyword" },
                "VesselType": { "type": "keyword" },
                "Status": { "type": "integer" },
                "Length": { "type": "double" },
                "Width": { "type": "double" },
                "Draft": { "type": "double" },
                "Cargo": { "type": "integer" },
                "TransceiverClass": { "type": "keyword" },
                "location": { "type": "geo_point" },
            }
        }
    })
}
