mod common;

use std::sync::atomic::AtomicBool;
use std::sync::Arc;
use std::time::Duration;

use searoute_lib::{
    compute_route, compute_routes, Coordinate, DistanceUnit, Error, NetworkStore, Passage,
    Restrictions, RouteOptions, RouteRequest, SearchLimits, UnreachablePolicy,
};

use common::*;

fn passage_options() -> RouteOptions {
    RouteOptions::default().with_passages(true)
}

fn request(from: Coordinate, to: Coordinate) -> RouteRequest {
    RouteRequest::new(vec![from, to], passage_options())
}

#[test]
fn klaipeda_to_los_angeles_uses_panama() {
    let store = NetworkStore::bundled();
    let route = compute_route(&store, &[KLAIPEDA, LOS_ANGELES], &passage_options())
        .expect("route exists");

    assert_eq!(route.units, DistanceUnit::NauticalMiles);
    let length = route.length;
    assert!((8_800.0..9_300.0).contains(&length), "{length}");
    assert!((route.duration_hours - route.length / 24.0).abs() < 1e-9);
    assert_eq!(route.passages, Some(vec![Passage::Panama]));

    let first = route.geometry.first().expect("non-empty geometry");
    let last = route.geometry.last().expect("non-empty geometry");
    assert!(first.distance_km(&KLAIPEDA) < 50.0);
    assert!(last.distance_km(&LOS_ANGELES) < 50.0);
}

#[test]
fn lifting_default_restriction_opens_northwest_passage() {
    let store = NetworkStore::bundled();
    let waypoints = [KLAIPEDA, LOS_ANGELES];
    let restricted = compute_route(&store, &waypoints, &passage_options()).unwrap();
    let unrestricted = passage_options().with_restrictions(Restrictions::none());
    let open = compute_route(&store, &waypoints, &unrestricted).unwrap();

    assert_eq!(open.passages, Some(vec![Passage::Northwest]));
    assert!(open.length < restricted.length);
}

#[test]
fn three_waypoints_add_up() {
    let store = NetworkStore::bundled();
    let options = RouteOptions::default();
    let whole = compute_route(&store, &[ROTTERDAM, SINGAPORE, SHANGHAI], &options).unwrap();
    let first = compute_route(&store, &[ROTTERDAM, SINGAPORE], &options).unwrap();
    let second = compute_route(&store, &[SINGAPORE, SHANGHAI], &options).unwrap();

    assert_eq!(whole.segment_count(), 2);
    assert!((whole.length - (first.length + second.length)).abs() < 1e-6);
    let hours = first.duration_hours + second.duration_hours;
    assert!((whole.duration_hours - hours).abs() < 1e-6);
    assert_eq!(whole.geometry, [first.geometry, second.geometry].concat());
}

#[test]
fn segment_count_is_waypoints_minus_one() {
    let store = NetworkStore::bundled();
    let waypoints = [ROTTERDAM, HAMBURG, NEW_YORK, ROTTERDAM, SINGAPORE];
    let route = compute_route(&store, &waypoints, &RouteOptions::default()).unwrap();
    assert_eq!(route.segment_count(), waypoints.len() - 1);
    for (index, segment) in route.segments.iter().enumerate() {
        assert_eq!(segment.index, index);
        assert_eq!(segment.from, waypoints[index]);
        assert_eq!(segment.to, waypoints[index + 1]);
    }
}

#[test]
fn out_of_range_waypoint_fails_before_network_build() {
    let store = NetworkStore::bundled();
    let err = compute_route(
        &store,
        &[ROTTERDAM, Coordinate::new(200.0, 10.0)],
        &RouteOptions::default(),
    )
    .unwrap_err();
    assert_eq!(err.kind(), "invalid_coordinate");
    assert_eq!(store.build_count(), 0);
}

#[test]
fn zero_speed_fails_without_partial_result() {
    let store = NetworkStore::bundled();
    let err = compute_route(
        &store,
        &[ROTTERDAM, SHANGHAI],
        &RouteOptions::default().with_speed(0.0),
    )
    .unwrap_err();
    assert!(matches!(err, Error::InvalidSpeed { .. }));
}

#[test]
fn passages_are_reported_once_in_traversal_order() {
    let store = NetworkStore::bundled();
    let route = compute_route(&store, &[ROTTERDAM, SHANGHAI], &passage_options()).unwrap();
    let expected = [
        Passage::Gibraltar,
        Passage::Suez,
        Passage::Babalmandab,
        Passage::Malacca,
    ];
    assert_eq!(route.passages, Some(expected.to_vec()));
}

#[test]
fn restricted_passages_are_avoided() {
    let store = NetworkStore::bundled();
    let no_suez = Restrictions::default().with(Passage::Suez);
    let no_canals = no_suez.with(Passage::Panama);
    let cases = [
        (no_suez, vec![Passage::Panama]),
        (no_canals, vec![Passage::SouthAfrica, Passage::Sunda]),
    ];

    let direct = compute_route(&store, &[ROTTERDAM, SHANGHAI], &passage_options()).unwrap();
    for (restrictions, expected) in cases {
        let options = passage_options().with_restrictions(restrictions.clone());
        let route = compute_route(&store, &[ROTTERDAM, SHANGHAI], &options).unwrap();
        let passages = route.passages.clone().unwrap();
        assert!(passages.iter().all(|p| !restrictions.contains(*p)));
        assert_eq!(passages, expected);
        assert!(route.length > direct.length);
    }
}

#[test]
fn other_regional_routes() {
    let store = NetworkStore::bundled();
    let to_gulf = vec![
        Passage::Bosporus,
        Passage::Suez,
        Passage::Babalmandab,
        Passage::Ormuz,
    ];
    let cases = [
        (SINGAPORE, FREMANTLE, vec![Passage::Sunda]),
        (ISTANBUL, JEBEL_ALI, to_gulf),
        (ROTTERDAM, NEW_YORK, vec![]),
    ];
    for (from, to, expected) in cases {
        let route = compute_route(&store, &[from, to], &passage_options()).unwrap();
        assert_eq!(route.passages, Some(expected), "{from} -> {to}");
        assert!(route.length > 0.0);
    }
}

#[test]
fn repeated_computation_is_identical() {
    let store = NetworkStore::bundled();
    let options = passage_options();
    let a = compute_route(&store, &[HAMBURG, SINGAPORE], &options).unwrap();
    let b = compute_route(&store, &[HAMBURG, SINGAPORE], &options).unwrap();
    assert_eq!(a, b);
}

#[test]
fn units_scale_lengths() {
    let store = NetworkStore::bundled();
    let route_in = |units| {
        let options = RouteOptions::default().with_units(units);
        compute_route(&store, &[ROTTERDAM, NEW_YORK], &options).unwrap()
    };
    let naut = route_in(DistanceUnit::NauticalMiles);
    let km = route_in(DistanceUnit::Kilometers);
    let miles = route_in(DistanceUnit::Miles);
    assert!((km.length / naut.length - 1.852).abs() < 1e-9);
    assert!((km.length / miles.length - 1.609344).abs() < 1e-9);
}

#[test]
fn black_sea_is_cut_off_when_bosporus_is_restricted() {
    let store = NetworkStore::bundled();
    let no_bosporus = Restrictions::default().with(Passage::Bosporus);
    let options = RouteOptions::default().with_restrictions(no_bosporus);

    let route = compute_route(&store, &[ROTTERDAM, ODESA], &options).unwrap();
    assert_eq!(route.length, 0.0);
    assert_eq!(route.duration_hours, 0.0);
    assert!(route.geometry.is_empty());
    assert_eq!(route.unreachable_segments().count(), 1);

    let strict = options.with_unreachable(UnreachablePolicy::Fail);
    let err = compute_route(&store, &[ROTTERDAM, ODESA], &strict).unwrap_err();
    assert!(matches!(err, Error::Unreachable { segment: 0, .. }));
}

#[test]
fn unreachable_segment_does_not_hide_reachable_ones() {
    let store = NetworkStore::bundled();
    let no_bosporus = Restrictions::default().with(Passage::Bosporus);
    let options = RouteOptions::default().with_restrictions(no_bosporus);
    let route = compute_route(&store, &[HAMBURG, ROTTERDAM, ODESA], &options).unwrap();
    assert!(route.segments[0].reachable);
    assert!(!route.segments[1].reachable);
    assert_eq!(route.length, route.segments[0].length);
    assert_eq!(route.geometry, route.segments[0].geometry);
}

#[test]
fn include_ports_snaps_endpoints_to_ports() {
    let store = NetworkStore::bundled();
    let near_rotterdam = Coordinate::new(4.3, 51.9);
    let near_shanghai = Coordinate::new(121.8, 31.1);

    let options = RouteOptions::default().with_ports(true);
    let route = compute_route(&store, &[near_rotterdam, near_shanghai], &options).unwrap();
    let ports = route.ports.as_ref().expect("ports reported");
    assert_eq!(ports.origin.code, "NLRTM");
    assert_eq!(ports.destination.code, "CNSHA");
    assert_eq!(route.segments[0].from, ROTTERDAM);
    assert_eq!(route.segments[0].to, SHANGHAI);

    let options = RouteOptions::default();
    let direct = compute_route(&store, &[ROTTERDAM, SHANGHAI], &options).unwrap();
    assert_eq!(route.geometry, direct.geometry);
}

#[test]
fn append_endpoints_starts_and_ends_at_waypoints() {
    let store = NetworkStore::bundled();
    let route = compute_route(
        &store,
        &[ROTTERDAM, SHANGHAI],
        &RouteOptions::default().with_endpoints(true),
    )
    .unwrap();
    assert_eq!(route.geometry.first(), Some(&ROTTERDAM));
    assert_eq!(route.geometry.last(), Some(&SHANGHAI));
}

#[test]
fn cancelled_search_returns_no_route() {
    let store = NetworkStore::bundled();
    let limits = SearchLimits::default().with_cancel_flag(Arc::new(AtomicBool::new(true)));
    let err = compute_route(
        &store,
        &[ROTTERDAM, SHANGHAI, LOS_ANGELES],
        &RouteOptions::default().with_limits(limits),
    )
    .unwrap_err();
    assert!(matches!(err, Error::SearchCancelled { segment: 0 }));
}

#[test]
fn exhausted_time_limit_returns_no_route() {
    let store = NetworkStore::bundled();
    let limits = SearchLimits::default().with_time_limit(Duration::ZERO);
    let err = compute_route(
        &store,
        &[ROTTERDAM, SHANGHAI],
        &RouteOptions::default().with_limits(limits),
    )
    .unwrap_err();
    assert_eq!(err.kind(), "time_limit");
    assert_eq!(err.segment(), Some(0));
}

#[test]
fn batch_computation_matches_sequential() {
    let store = NetworkStore::bundled();
    let pairs = [
        (ROTTERDAM, SHANGHAI),
        (KLAIPEDA, LOS_ANGELES),
        (SINGAPORE, FREMANTLE),
        (ISTANBUL, JEBEL_ALI),
    ];
    let requests: Vec<RouteRequest> = pairs.iter().map(|&(from, to)| request(from, to)).collect();

    let batch = compute_routes(&store, &requests);
    assert_eq!(batch.len(), pairs.len());
    for ((from, to), result) in pairs.iter().zip(batch) {
        let sequential = compute_route(&store, &[*from, *to], &passage_options()).unwrap();
        assert_eq!(result.unwrap(), sequential);
    }
    assert_eq!(store.build_count(), 1);
}
