//! Behaviour-driven step definitions driving the decode CLI scenarios.

use super::helpers::expect_error;
use super::*;
use crate::decode::run_decode_with;
use courier_core::{Coordinate, PolylineError};
use rstest::fixture;
use rstest_bdd_macros::{given, scenario, then, when};
use std::cell::RefCell;

#[derive(Default)]
struct DecodeWorld {
    encoded: RefCell<Option<String>>,
    stdout: RefCell<Vec<u8>>,
    result: RefCell<Option<Result<(), CliError>>>,
}

#[fixture]
fn world() -> DecodeWorld {
    DecodeWorld::default()
}

#[given("the encoded path {encoded}")]
fn encoded_path(#[from(world)] world: &DecodeWorld, encoded: String) {
    world.encoded.replace(Some(encoded));
}

#[when("I run the decode command")]
fn run_decode_command(#[from(world)] world: &DecodeWorld) {
    let mut argv = vec!["courier".to_owned(), "decode".to_owned()];
    argv.extend(world.encoded.borrow().iter().cloned());
    let parsed = Cli::try_parse_from(argv).map_err(CliError::from);
    let outcome = parsed.and_then(|cli| match cli.command {
        Command::Decode(args) => {
            let mut buffer = world.stdout.borrow_mut();
            run_decode_with(args, &mut *buffer)
        }
        other => panic!("expected decode command, found {other:?}"),
    });

    world.result.replace(Some(outcome));
}

#[then("the command prints {count} coordinates starting at {latitude}, {longitude}")]
fn prints_coordinates(
    #[from(world)] world: &DecodeWorld,
    count: usize,
    latitude: f64,
    longitude: f64,
) {
    let borrowed = world.result.borrow();
    borrowed
        .as_ref()
        .expect("result recorded")
        .as_ref()
        .expect("expected success");
    let stdout = String::from_utf8(world.stdout.borrow().clone()).expect("stdout utf-8");
    let path: Vec<Coordinate> = serde_json::from_str(&stdout).expect("output should be JSON");
    assert_eq!(path.len(), count);
    let first = path.first().expect("at least one coordinate");
    assert!((first.latitude - latitude).abs() < 1e-9);
    assert!((first.longitude - longitude).abs() < 1e-9);
}

#[then("the command fails because the path is truncated")]
fn fails_truncated(#[from(world)] world: &DecodeWorld) {
    match expect_error(&world.result) {
        CliError::DecodePath(PolylineError::Truncated { .. }) => {}
        other => panic!("expected a truncated path, found {other:?}"),
    }
}

macro_rules! register_decode_scenario {
    ($fn_name:ident, $scenario_title:literal) => {
        #[scenario(path = "tests/features/decode_command.feature", name = $scenario_title)]
        fn $fn_name(#[from(world)] world: DecodeWorld) {
            let _ = world;
        }
    };
}

register_decode_scenario!(decode_reference_path, "decoding the reference path");
register_decode_scenario!(decode_truncated_path, "rejecting a truncated path");
