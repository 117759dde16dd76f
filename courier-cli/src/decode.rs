//! Decode command implementation for the Courier CLI.

use std::io::Write;

use camino::Utf8PathBuf;
use clap::Parser;
use courier_core::polyline;
use ortho_config::{OrthoConfig, SubcmdConfigMerge};
use serde::{Deserialize, Serialize};

use crate::files::write_json;
use crate::{ARG_ENCODED, ARG_OUTPUT, CliError, ENV_DECODE_ENCODED};

/// CLI arguments for the `decode` subcommand.
#[derive(Debug, Clone, Parser, Deserialize, Serialize, OrthoConfig, Default)]
#[command(
    about = "Decode an encoded polyline into latitude/longitude pairs",
    long_about = "Decode a path in the encoded polyline format used by \
                 mapping services. No routing service is contacted."
)]
#[ortho_config(prefix = "COURIER")]
pub(crate) struct DecodeArgs {
    /// The encoded path; quote it, as polylines often contain shell metacharacters.
    #[arg(value_name = "encoded")]
    #[serde(default)]
    pub(crate) encoded: Option<String>,
    /// Write the coordinates to this file instead of stdout.
    #[arg(long = ARG_OUTPUT, value_name = "path")]
    #[serde(default)]
    pub(crate) output: Option<Utf8PathBuf>,
}

pub(crate) fn run_decode(args: DecodeArgs) -> Result<(), CliError> {
    let mut stdout = std::io::stdout().lock();
    run_decode_with(args, &mut stdout)
}

pub(crate) fn run_decode_with(args: DecodeArgs, writer: &mut dyn Write) -> Result<(), CliError> {
    let merged = args.load_and_merge().map_err(CliError::Configuration)?;
    let encoded = merged.encoded.ok_or(CliError::MissingArgument {
        field: ARG_ENCODED,
        env: ENV_DECODE_ENCODED,
    })?;
    let path = polyline::decode(&encoded)?;
    write_json(writer, merged.output.as_deref(), &path)
}
