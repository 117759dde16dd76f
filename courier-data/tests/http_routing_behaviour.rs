//! Behavioural tests for [`HttpRoutingProvider`].
//!
//! Each scenario talks to a one-shot HTTP stub bound to a loopback port, so
//! no external service is required.

use std::cell::RefCell;
use std::io::{self, BufRead, BufReader, Write};
use std::net::TcpListener;
use std::thread::{self, JoinHandle};
use std::time::Duration;

use courier_core::{
    CancellationToken, DirectionsQuery, DirectionsResponse, DistanceQuery, DistanceResponse,
    Point, ProviderError, RoutingProvider,
};
use courier_data::routing::{HttpRoutingProvider, HttpRoutingProviderConfig};
use rstest::fixture;
use rstest_bdd_macros::{given, scenario, then, when};

const API_KEY: &str = "behaviour-key";

#[derive(Default)]
struct HttpWorld {
    base_url: RefCell<Option<String>>,
    stub: RefCell<Option<JoinHandle<io::Result<String>>>>,
    cancel: CancellationToken,
    distance: RefCell<Option<Result<DistanceResponse, ProviderError>>>,
    directions: RefCell<Option<Result<DirectionsResponse, ProviderError>>>,
}

impl HttpWorld {
    fn serve(&self, status_line: &'static str, body: &str) {
        let (base_url, stub) = serve_once(status_line, body.to_owned());
        self.base_url.replace(Some(base_url));
        self.stub.replace(Some(stub));
    }

    fn provider(&self) -> HttpRoutingProvider {
        let base_url = self
            .base_url
            .borrow()
            .clone()
            .expect("routing service must be configured");
        let config = HttpRoutingProviderConfig::new(base_url)
            .with_timeout(Duration::from_secs(5))
            .without_system_proxy();
        HttpRoutingProvider::with_config(config).expect("provider should build")
    }

    /// Wait for the stub to finish and return the request line it served.
    fn request_line(&self) -> String {
        self.stub
            .take()
            .expect("routing service must be configured")
            .join()
            .expect("stub thread should not panic")
            .expect("stub should serve the request")
    }

    fn distance(&self) -> Result<DistanceResponse, ProviderError> {
        self.distance
            .borrow()
            .clone()
            .expect("distance query should have run")
    }
}

/// Accept one connection and answer it with `body`.
///
/// The handle yields the request line, or the I/O error that stopped the
/// stub from serving it.
fn serve_once(
    status_line: &'static str,
    body: String,
) -> (String, JoinHandle<io::Result<String>>) {
    let listener = TcpListener::bind("127.0.0.1:0").expect("bind loopback port");
    let address = listener.local_addr().expect("listener address");
    let stub = thread::spawn(move || {
        let (mut stream, _) = listener.accept()?;
        let mut reader = BufReader::new(stream.try_clone()?);
        let mut request_line = String::new();
        reader.read_line(&mut request_line)?;
        let mut header = String::new();
        while reader.read_line(&mut header)? > 2 {
            header.clear();
        }
        let response = format!(
            "{status_line}\r\nContent-Type: application/json\r\nContent-Length: {}\r\nConnection: close\r\n\r\n{body}",
            body.len()
        );
        stream.write_all(response.as_bytes())?;
        stream.flush()?;
        Ok(request_line)
    });
    (format!("http://{address}/maps/api"), stub)
}

#[fixture]
fn world() -> HttpWorld {
    HttpWorld::default()
}

// --- Given steps ---

#[given("a routing service returning a one kilometre leg")]
fn service_one_leg(world: &HttpWorld) {
    world.serve(
        "HTTP/1.1 200 OK",
        r#"{"rows":[{"elements":[{"status":"OK","distance":{"text":"1 km","value":1000},"duration":{"text":"2 mins","value":90}}]}],"status":"OK"}"#,
    );
}

#[given("a routing service denying the request")]
fn service_denied(world: &HttpWorld) {
    world.serve(
        "HTTP/1.1 200 OK",
        r#"{"error_message":"The provided API key is invalid.","rows":[],"status":"REQUEST_DENIED"}"#,
    );
}

#[given("a routing service returning an optimised route")]
fn service_optimised(world: &HttpWorld) {
    world.serve(
        "HTTP/1.1 200 OK",
        r#"{"routes":[{"overview_polyline":{"points":"_p~iF~ps|U"},"waypoint_order":[1,0],"legs":[{"distance":{"value":10},"duration":{"value":1}},{"distance":{"value":20},"duration":{"value":2}},{"distance":{"value":30},"duration":{"value":3}}]}],"status":"OK"}"#,
    );
}

#[given("a routing service failing with HTTP 500")]
fn service_failing(world: &HttpWorld) {
    world.serve("HTTP/1.1 500 Internal Server Error", "{}");
}

#[given("the caller has already cancelled")]
fn already_cancelled(world: &HttpWorld) {
    world.cancel.cancel();
}

#[given("no routing service is listening")]
fn nothing_listening(world: &HttpWorld) {
    let listener = TcpListener::bind("127.0.0.1:0").expect("bind loopback port");
    let address = listener.local_addr().expect("listener address");
    drop(listener);
    world
        .base_url
        .replace(Some(format!("http://{address}/maps/api")));
}

// --- When steps ---

#[when("I query the distance between two points")]
fn query_distance(world: &HttpWorld) {
    let provider = world.provider();
    let query = DistanceQuery {
        origin: Point::new(51.5, -0.1),
        destination: Point::new(51.6, -0.2),
        api_key: API_KEY,
    };
    let outcome = provider.query_distance(&query, &world.cancel);
    world.distance.replace(Some(outcome));
}

#[when("I query directions through two waypoints")]
fn query_directions(world: &HttpWorld) {
    let provider = world.provider();
    let waypoints = [Point::new(51.52, -0.12), Point::new(51.55, -0.15)];
    let query = DirectionsQuery {
        origin: Point::new(51.5, -0.1),
        destination: Point::new(51.6, -0.2),
        waypoints: &waypoints,
        optimize_waypoints: true,
        api_key: API_KEY,
    };
    let outcome = provider.query_directions(&query, &world.cancel);
    world.directions.replace(Some(outcome));
}

// --- Then steps ---

#[then("the reply reports 1000 metres and 90 seconds")]
fn then_one_leg(world: &HttpWorld) {
    let reply = world.distance().expect("expected Ok reply");
    assert!(reply.is_ok());
    let element = reply.elements.first().expect("one element");
    assert_eq!(element.distance_meters, 1000);
    assert_eq!(element.duration_seconds, 90);
}

#[then("the request carried the API key")]
fn then_key_sent(world: &HttpWorld) {
    let request_line = world.request_line();
    assert!(
        request_line.starts_with("GET /maps/api/distancematrix/json?"),
        "unexpected request line {request_line}"
    );
    assert!(request_line.contains("key=behaviour-key"));
}

#[then("the distance reply status is {status}")]
fn then_status(world: &HttpWorld, status: String) {
    let reply = world.distance().expect("expected Ok reply");
    assert_eq!(reply.status, status);
    assert!(reply.elements.is_empty());
}

#[then("the waypoint order is 1, 0")]
fn then_waypoint_order(world: &HttpWorld) {
    let borrowed = world.directions.borrow();
    let reply = borrowed
        .as_ref()
        .expect("directions query should have run")
        .as_ref()
        .expect("expected Ok reply");
    let route = reply.routes.first().expect("one route");
    assert_eq!(route.waypoint_order, vec![1, 0]);
    assert_eq!(route.encoded_path, "_p~iF~ps|U");
}

#[then("the route has {count} legs")]
fn then_leg_count(world: &HttpWorld, count: usize) {
    let borrowed = world.directions.borrow();
    let reply = borrowed
        .as_ref()
        .expect("directions query should have run")
        .as_ref()
        .expect("expected Ok reply");
    let route = reply.routes.first().expect("one route");
    assert_eq!(route.legs.len(), count);
}

#[then("the request asked for waypoint optimisation")]
fn then_optimisation_requested(world: &HttpWorld) {
    let request_line = world.request_line();
    assert!(request_line.starts_with("GET /maps/api/directions/json?"));
    assert!(
        request_line.contains("waypoints=optimize%3Atrue%7C51.52%2C-0.12%7C51.55%2C-0.15"),
        "unexpected request line {request_line}"
    );
}

#[then("an HTTP error without the API key is returned")]
fn then_http_error(world: &HttpWorld) {
    let outcome = world.distance();
    match &outcome {
        Err(ProviderError::HttpError { url, status, message }) => {
            assert_eq!(*status, 500);
            assert!(!url.contains(API_KEY), "url leaks the key: {url}");
            assert!(!message.contains(API_KEY), "message leaks the key: {message}");
        }
        other => panic!("expected HttpError, got {other:?}"),
    }
}

#[then("the request is cancelled")]
fn then_cancelled(world: &HttpWorld) {
    assert_eq!(world.distance(), Err(ProviderError::Cancelled));
}

#[then("a network error is returned")]
fn then_network_error(world: &HttpWorld) {
    let outcome = world.distance();
    assert!(
        matches!(&outcome, Err(ProviderError::NetworkError { .. })),
        "expected NetworkError, got {outcome:?}"
    );
}

// --- Scenario registrations ---

macro_rules! register_scenario {
    ($fn_name:ident, $title:literal) => {
        #[scenario(path = "tests/features/http_routing.feature", name = $title)]
        fn $fn_name(world: HttpWorld) {
            let _ = world;
        }
    };
}

register_scenario!(reading_distance_matrix, "reading a distance matrix reply");
register_scenario!(passing_through_denied, "passing through a denied request");
register_scenario!(reading_optimised_directions, "reading optimised directions");
register_scenario!(reporting_http_failure, "reporting an HTTP failure");
register_scenario!(honouring_cancellation, "honouring a cancelled request");
register_scenario!(reporting_unreachable_service, "reporting an unreachable service");
