#![expect(
    clippy::expect_used,
    reason = "behaviour tests use expect for readable failures"
)]

//! Behavioural tests for [`RouteOptimiser`] using rstest-bdd.

use std::cell::RefCell;

use courier_core::test_support::{
    ScriptedRoutingProvider, directions_with_status, ok_directions, route_with, test_configuration,
};
use courier_core::{
    CancellationToken, Leg, Point, RouteOptimiser, RouteResult, RoutingError, Stop,
};
use rstest::fixture;
use rstest_bdd_macros::{given, scenario, then, when};

const DESTINATION: Point = Point::new(0.0, 0.0);

#[derive(Default)]
struct OptimisationWorld {
    stops: RefCell<Vec<Stop>>,
    provider: ScriptedRoutingProvider,
    result: RefCell<Option<Result<RouteResult, RoutingError>>>,
}

impl OptimisationWorld {
    fn outcome(&self) -> Result<RouteResult, RoutingError> {
        self.result
            .borrow()
            .clone()
            .expect("optimisation should have run")
    }

    fn route(&self) -> RouteResult {
        self.outcome().expect("optimisation should succeed")
    }

    fn legs_for_stops(&self) -> Vec<Leg> {
        self.stops
            .borrow()
            .iter()
            .zip(1_u64..)
            .map(|(_, n)| Leg::new(n * 1_000, n * 60))
            .collect()
    }
}

#[fixture]
fn world() -> OptimisationWorld {
    OptimisationWorld::default()
}

// --- Given steps ---

#[given("three stops east of the destination")]
fn three_stops(world: &OptimisationWorld) {
    world.stops.replace(vec![
        Stop::new(1, Point::new(0.0, 1.0)),
        Stop::new(2, Point::new(0.0, 9.0)),
        Stop::new(3, Point::new(0.0, 4.0)),
    ]);
}

#[given("two stops equally far from the destination and one closer")]
fn tied_stops(world: &OptimisationWorld) {
    world.stops.replace(vec![
        Stop::new(10, Point::new(0.0, 5.0)),
        Stop::new(20, Point::new(5.0, 0.0)),
        Stop::new(30, Point::new(3.0, 0.0)),
    ]);
}

#[given("no stops")]
fn no_stops(world: &OptimisationWorld) {
    world.stops.replace(Vec::new());
}

#[given("a routing service that visits the waypoints in reverse")]
fn reverse_order(world: &OptimisationWorld) {
    let legs = world.legs_for_stops();
    world
        .provider
        .push_directions_reply(Ok(ok_directions(route_with(vec![1, 0], legs, ""))));
}

#[given("a routing service that keeps the waypoint order")]
fn identity_order(world: &OptimisationWorld) {
    let legs = world.legs_for_stops();
    let waypoints = world.stops.borrow().len().saturating_sub(1);
    world.provider.push_directions_reply(Ok(ok_directions(route_with(
        (0..waypoints).collect(),
        legs,
        "",
    ))));
}

#[given("a routing service that finds no route")]
fn no_route(world: &OptimisationWorld) {
    world
        .provider
        .push_directions_reply(Ok(directions_with_status("ZERO_RESULTS")));
}

#[given("a routing service that repeats a waypoint")]
fn repeated_waypoint(world: &OptimisationWorld) {
    let legs = world.legs_for_stops();
    world
        .provider
        .push_directions_reply(Ok(ok_directions(route_with(vec![1, 1], legs, ""))));
}

// --- When steps ---

#[when("I request the best route")]
fn request_route(world: &OptimisationWorld) {
    let optimiser = RouteOptimiser::new(&world.provider, test_configuration());
    let outcome = optimiser.find_best_route(
        &world.stops.borrow(),
        DESTINATION,
        &CancellationToken::new(),
    );
    world.result.replace(Some(outcome));
}

// --- Then steps ---

#[then("the stops are visited in the order {order}")]
fn then_order(world: &OptimisationWorld, order: String) {
    let expected: Vec<u64> = order
        .split(',')
        .map(|id| id.trim().parse().expect("numeric stop id"))
        .collect();
    let actual: Vec<u64> = world.route().ordered_stops.iter().map(|stop| stop.id).collect();
    assert_eq!(actual, expected);
}

#[then("the route has one leg fewer than stops")]
fn then_leg_count(world: &OptimisationWorld) {
    let route = world.route();
    assert_eq!(route.legs.len() + 1, route.ordered_stops.len());
}

#[then("the remaining stops were sent as optimisable waypoints")]
fn then_waypoints_sent(world: &OptimisationWorld) {
    let queries = world.provider.directions_queries();
    let query = queries.first().expect("one directions query");
    let stops = world.stops.borrow();
    let expected: Vec<Point> = stops
        .iter()
        .filter(|stop| stop.id != 2)
        .map(|stop| stop.location)
        .collect();
    assert_eq!(query.waypoints, expected);
    assert!(query.optimize_waypoints);
    assert_eq!(query.destination, DESTINATION);
}

#[then("the route is reported unavailable")]
fn then_unavailable(world: &OptimisationWorld) {
    let outcome = world.outcome();
    assert!(
        matches!(&outcome, Err(RoutingError::RouteUnavailable { status }) if status == "ZERO_RESULTS"),
        "expected RouteUnavailable, got {outcome:?}"
    );
}

#[then("the waypoint order is reported invalid")]
fn then_invalid_order(world: &OptimisationWorld) {
    assert_eq!(
        world.outcome(),
        Err(RoutingError::InvalidWaypointOrder { order: vec![1, 1] })
    );
}

#[then("the request is rejected for having no stops")]
fn then_no_stops(world: &OptimisationWorld) {
    assert_eq!(world.outcome(), Err(RoutingError::NoStops));
    assert!(world.provider.directions_queries().is_empty());
}

// --- Scenario registrations ---

macro_rules! register_scenario {
    ($fn_name:ident, $title:literal) => {
        #[scenario(path = "tests/features/route_optimisation.feature", name = $title)]
        fn $fn_name(world: OptimisationWorld) {
            let _ = world;
        }
    };
}

register_scenario!(ordering_behind_anchor, "ordering stops behind the farthest anchor");
register_scenario!(breaking_anchor_ties, "breaking anchor ties by input order");
register_scenario!(rejecting_unavailable_route, "rejecting an unavailable route");
register_scenario!(
    rejecting_inconsistent_order,
    "rejecting an inconsistent waypoint order"
);
register_scenario!(refusing_empty_stops, "refusing an empty stop list");
