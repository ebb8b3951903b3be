use pelorus_core::{Error, MergePolicy, TrackQuery};
use serde_json::json;
use wiremock::{
    Mock, ResponseTemplate,
    matchers::{body_json, body_partial_json, method, path},
};

use crate::helper::{
    TestHelper, aggregation_response, exhausted_response, grid_on, vessel_bucket,
};

fn query() -> TrackQuery {
    TrackQuery::new("2022-01-01".parse().unwrap())
}

#[tokio::test]
async fn ranks_vessels_by_distance_covered() {
    let helper = TestHelper::new().await;

    let round = aggregation_response(
        None,
        &[
            vessel_bucket(
                "303548000",
                "SHORTY",
                &[
                    (0.0, 40.0, "2022-01-01T00:00:00"),
                    (0.0, 40.5, "2022-01-01T01:00:00"),
                ],
            ),
            vessel_bucket(
                "367123450",
                "RUNNER",
                &[
                    (0.0, 30.0, "2022-01-01T00:00:00"),
                    (0.0, 31.0, "2022-01-01T01:00:00"),
                ],
            ),
            vessel_bucket(
                "368084090",
                "CHAMPION",
                &[
                    (0.0, 20.0, "2022-01-01T00:00:00"),
                    (0.0, 21.0, "2022-01-01T01:00:00"),
                    (0.0, 22.0, "2022-01-01T02:00:00"),
                ],
            ),
            vessel_bucket("255805000", "PARKED", &[(0.0, 50.0, "2022-01-01T00:00:00")]),
        ],
    );

    Mock::given(method("POST"))
        .and(path("/ais_test/_search"))
        .respond_with(ResponseTemplate::new(200).set_body_json(round))
        .expect(1)
        .mount(&helper.mock_server)
        .await;

    // no cursor came back, so nothing must be released
    Mock::given(method("DELETE"))
        .and(path("/_search/scroll"))
        .respond_with(ResponseTemplate::new(200))
        .expect(0)
        .mount(&helper.mock_server)
        .await;

    let ranked = helper.engine().search_ranked(&query()).await.unwrap();

    let order: Vec<_> = ranked.iter().map(|v| v.mmsi.as_str()).collect();
    assert_eq!(order, ["368084090", "367123450"]);
    assert_eq!(ranked[0].vessel.name.as_deref(), Some("CHAMPION"));
    assert!((ranked[0].distance_miles - 138.195).abs() < 1e-3);
    assert!((ranked[1].distance_miles - 69.098).abs() < 1e-3);
}

#[tokio::test]
async fn an_empty_day_is_not_an_error() {
    let helper = TestHelper::new().await;

    Mock::given(method("POST"))
        .and(path("/ais_test/_search"))
        .respond_with(ResponseTemplate::new(200).set_body_json(aggregation_response(None, &[])))
        .expect(1)
        .mount(&helper.mock_server)
        .await;

    let outcome = helper.engine().search(&query()).await.unwrap();

    assert!(outcome.vessels.is_empty());
    assert_eq!(outcome.rounds_completed, 1);
    assert!(!outcome.degraded);
}

#[tokio::test]
async fn a_threshold_no_vessel_reaches_yields_an_empty_list() {
    let helper = TestHelper::new().await;

    Mock::given(method("POST"))
        .and(path("/ais_test/_search"))
        .respond_with(ResponseTemplate::new(200).set_body_json(aggregation_response(
            None,
            &[vessel_bucket(
                "367123450",
                "RUNNER",
                &[
                    (0.0, 30.0, "2022-01-01T00:00:00"),
                    (0.0, 31.0, "2022-01-01T01:00:00"),
                ],
            )],
        )))
        .expect(1)
        .mount(&helper.mock_server)
        .await;

    let mut query = query();
    query.min_distance_miles = 1000.0;

    let ranked = helper.engine().search_ranked(&query).await.unwrap();

    assert!(ranked.is_empty());
}

#[tokio::test]
async fn stops_after_the_configured_number_of_rounds() {
    let helper = TestHelper::new().await;

    Mock::given(method("POST"))
        .and(path("/ais_test/_search"))
        .respond_with(ResponseTemplate::new(200).set_body_json(aggregation_response(
            Some("c-1"),
            &[vessel_bucket(
                "111111111",
                "FIRST",
                &[
                    (0.0, 20.0, "2022-01-01T00:00:00"),
                    (0.0, 21.0, "2022-01-01T01:00:00"),
                ],
            )],
        )))
        .expect(1)
        .mount(&helper.mock_server)
        .await;

    Mock::given(method("POST"))
        .and(path("/_search/scroll"))
        .and(body_partial_json(json!({ "scroll_id": "c-1" })))
        .respond_with(ResponseTemplate::new(200).set_body_json(aggregation_response(
            Some("c-2"),
            &[vessel_bucket(
                "222222222",
                "SECOND",
                &[
                    (0.0, 30.0, "2022-01-01T02:00:00"),
                    (0.0, 31.0, "2022-01-01T03:00:00"),
                ],
            )],
        )))
        .expect(1)
        .mount(&helper.mock_server)
        .await;

    Mock::given(method("DELETE"))
        .and(path("/_search/scroll"))
        .and(body_json(json!({ "scroll_id": ["c-2"] })))
        .respond_with(
            ResponseTemplate::new(200)
                .set_body_json(json!({ "succeeded": true, "num_freed": 1 })),
        )
        .expect(1)
        .mount(&helper.mock_server)
        .await;

    let mut query = query();
    query.max_rounds = 2;

    let outcome = helper.engine().search(&query).await.unwrap();

    assert_eq!(outcome.rounds_completed, 2);
    assert!(!outcome.degraded);
    let order: Vec<_> = outcome.vessels.iter().map(|v| v.mmsi.as_str()).collect();
    assert_eq!(order, ["111111111", "222222222"]);
}

#[tokio::test]
async fn a_failed_continuation_keeps_partial_results() {
    let helper = TestHelper::new().await;

    Mock::given(method("POST"))
        .and(path("/ais_test/_search"))
        .respond_with(ResponseTemplate::new(200).set_body_json(aggregation_response(
            Some("c-1"),
            &[vessel_bucket(
                "111111111",
                "FIRST",
                &[
                    (0.0, 20.0, "2022-01-01T00:00:00"),
                    (0.0, 21.0, "2022-01-01T01:00:00"),
                ],
            )],
        )))
        .expect(1)
        .mount(&helper.mock_server)
        .await;

    Mock::given(method("POST"))
        .and(path("/_search/scroll"))
        .respond_with(ResponseTemplate::new(500).set_body_string("scroll context missing"))
        .expect(1)
        .mount(&helper.mock_server)
        .await;

    Mock::given(method("DELETE"))
        .and(path("/_search/scroll"))
        .and(body_json(json!({ "scroll_id": ["c-1"] })))
        .respond_with(ResponseTemplate::new(200))
        .expect(1)
        .mount(&helper.mock_server)
        .await;

    let outcome = helper.engine().search(&query()).await.unwrap();

    assert_eq!(outcome.rounds_completed, 1);
    assert_eq!(outcome.vessels.len(), 1);
    assert_eq!(outcome.vessels[0].mmsi.as_str(), "111111111");
}

#[tokio::test]
async fn a_failed_release_does_not_fail_the_search() {
    let helper = TestHelper::new().await;

    Mock::given(method("POST"))
        .and(path("/ais_test/_search"))
        .respond_with(ResponseTemplate::new(200).set_body_json(aggregation_response(
            Some("c-1"),
            &[vessel_bucket(
                "111111111",
                "FIRST",
                &[
                    (0.0, 20.0, "2022-01-01T00:00:00"),
                    (0.0, 21.0, "2022-01-01T01:00:00"),
                ],
            )],
        )))
        .expect(1)
        .mount(&helper.mock_server)
        .await;

    Mock::given(method("DELETE"))
        .and(path("/_search/scroll"))
        .respond_with(ResponseTemplate::new(500).set_body_string("broken"))
        .expect(1)
        .mount(&helper.mock_server)
        .await;

    let mut query = query();
    query.max_rounds = 1;

    let outcome = helper.engine().search(&query).await.unwrap();

    assert_eq!(outcome.vessels.len(), 1);
    assert_eq!(outcome.rounds_completed, 1);
}

#[tokio::test]
async fn falls_back_to_the_latitude_grid_when_the_primary_shape_fails() {
    let helper = TestHelper::new().await;

    Mock::given(method("POST"))
        .and(path("/ais_test/_search"))
        .and(grid_on("location"))
        .respond_with(ResponseTemplate::new(400).set_body_json(json!({
            "error": {
                "type": "illegal_argument_exception",
                "reason": "Field [location] of type [double] is not supported for aggregation [geohash_grid]",
            }
        })))
        .expect(1)
        .mount(&helper.mock_server)
        .await;

    Mock::given(method("POST"))
        .and(path("/ais_test/_search"))
        .and(grid_on("LAT"))
        .respond_with(ResponseTemplate::new(200).set_body_json(aggregation_response(
            None,
            &[vessel_bucket(
                "367123450",
                "RUNNER",
                &[
                    (0.0, 30.0, "2022-01-01T00:00:00"),
                    (0.0, 31.0, "2022-01-01T01:00:00"),
                ],
            )],
        )))
        .expect(1)
        .mount(&helper.mock_server)
        .await;

    let outcome = helper.engine().search(&query()).await.unwrap();

    assert!(outcome.degraded);
    assert_eq!(outcome.vessels.len(), 1);
    assert_eq!(outcome.vessels[0].mmsi.as_str(), "367123450");
}

#[tokio::test]
async fn an_unreachable_first_round_fails_the_search() {
    let helper = TestHelper::new().await;

    // both shapes hit this mock, asserting the fallback was attempted
    Mock::given(method("POST"))
        .and(path("/ais_test/_search"))
        .respond_with(ResponseTemplate::new(500).set_body_string("no nodes available"))
        .expect(2)
        .mount(&helper.mock_server)
        .await;

    Mock::given(method("DELETE"))
        .and(path("/_search/scroll"))
        .respond_with(ResponseTemplate::new(200))
        .expect(0)
        .mount(&helper.mock_server)
        .await;

    let result = helper.engine().search(&query()).await;

    assert!(matches!(result, Err(Error::Backend { .. })));
}

#[tokio::test]
async fn exhausted_aggregations_stop_paging_and_release_the_renewed_cursor() {
    let helper = TestHelper::new().await;

    Mock::given(method("POST"))
        .and(path("/ais_test/_search"))
        .respond_with(ResponseTemplate::new(200).set_body_json(aggregation_response(
            Some("c-1"),
            &[vessel_bucket(
                "111111111",
                "FIRST",
                &[
                    (0.0, 20.0, "2022-01-01T00:00:00"),
                    (0.0, 21.0, "2022-01-01T01:00:00"),
                ],
            )],
        )))
        .expect(1)
        .mount(&helper.mock_server)
        .await;

    Mock::given(method("POST"))
        .and(path("/_search/scroll"))
        .and(body_partial_json(json!({ "scroll_id": "c-1" })))
        .respond_with(ResponseTemplate::new(200).set_body_json(exhausted_response("c-2")))
        .expect(1)
        .mount(&helper.mock_server)
        .await;

    Mock::given(method("DELETE"))
        .and(path("/_search/scroll"))
        .and(body_json(json!({ "scroll_id": ["c-2"] })))
        .respond_with(ResponseTemplate::new(200))
        .expect(1)
        .mount(&helper.mock_server)
        .await;

    let outcome = helper.engine().search(&query()).await.unwrap();

    assert_eq!(outcome.rounds_completed, 1);
    assert_eq!(outcome.vessels.len(), 1);
}

#[tokio::test]
async fn a_re_seen_vessel_replaces_its_earlier_record() {
    let helper = TestHelper::new().await;

    Mock::given(method("POST"))
        .and(path("/ais_test/_search"))
        .respond_with(ResponseTemplate::new(200).set_body_json(aggregation_response(
            Some("c-1"),
            &[
                vessel_bucket(
                    "111111111",
                    "MOVER",
                    &[
                        (0.0, 20.0, "2022-01-01T00:00:00"),
                        (0.0, 21.0, "2022-01-01T01:00:00"),
                    ],
                ),
                vessel_bucket(
                    "222222222",
                    "STAYER",
                    &[
                        (0.0, 30.0, "2022-01-01T00:00:00"),
                        (0.0, 30.1, "2022-01-01T01:00:00"),
                    ],
                ),
            ],
        )))
        .expect(1)
        .mount(&helper.mock_server)
        .await;

    Mock::given(method("POST"))
        .and(path("/_search/scroll"))
        .respond_with(ResponseTemplate::new(200).set_body_json(aggregation_response(
            Some("c-1"),
            &[vessel_bucket(
                "111111111",
                "MOVER",
                &[
                    (0.0, 40.0, "2022-01-01T02:00:00"),
                    (0.0, 40.5, "2022-01-01T03:00:00"),
                ],
            )],
        )))
        .expect(1)
        .mount(&helper.mock_server)
        .await;

    Mock::given(method("DELETE"))
        .and(path("/_search/scroll"))
        .respond_with(ResponseTemplate::new(200))
        .expect(1)
        .mount(&helper.mock_server)
        .await;

    let mut query = query();
    query.max_rounds = 2;

    let outcome = helper.engine().search(&query).await.unwrap();

    let order: Vec<_> = outcome.vessels.iter().map(|v| v.mmsi.as_str()).collect();
    assert_eq!(order, ["111111111", "222222222"]);
    // the later round's shorter track replaced the earlier one
    assert!((outcome.vessels[0].distance_miles - 34.549).abs() < 1e-3);
    assert_eq!(outcome.vessels[0].track[0].longitude, 40.0);
}

#[tokio::test]
async fn the_extending_merge_combines_points_across_rounds() {
    let helper = TestHelper::new().await;

    Mock::given(method("POST"))
        .and(path("/ais_test/_search"))
        .respond_with(ResponseTemplate::new(200).set_body_json(aggregation_response(
            Some("c-1"),
            &[vessel_bucket(
                "111111111",
                "MOVER",
                &[
                    (0.0, 20.0, "2022-01-01T00:00:00"),
                    (0.0, 20.5, "2022-01-01T01:00:00"),
                ],
            )],
        )))
        .expect(1)
        .mount(&helper.mock_server)
        .await;

    // the repeated 20.5 cell arrives with a later timestamp and must
    // not displace the earlier representative
    Mock::given(method("POST"))
        .and(path("/_search/scroll"))
        .respond_with(ResponseTemplate::new(200).set_body_json(aggregation_response(
            Some("c-1"),
            &[vessel_bucket(
                "111111111",
                "MOVER",
                &[
                    (0.0, 21.0, "2022-01-01T02:00:00"),
                    (0.0, 20.5, "2022-01-01T03:00:00"),
                ],
            )],
        )))
        .expect(1)
        .mount(&helper.mock_server)
        .await;

    Mock::given(method("DELETE"))
        .and(path("/_search/scroll"))
        .respond_with(ResponseTemplate::new(200))
        .expect(1)
        .mount(&helper.mock_server)
        .await;

    let mut query = query();
    query.max_rounds = 2;
    query.merge = MergePolicy::ExtendTrack;

    let outcome = helper.engine().search(&query).await.unwrap();

    assert_eq!(outcome.vessels.len(), 1);
    assert_eq!(outcome.vessels[0].track.len(), 3);
    assert!((outcome.vessels[0].distance_miles - 69.098).abs() < 1e-3);
}
