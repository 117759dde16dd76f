//! Test helpers for composing CLI inputs and stubbing the routing provider.

use std::cell::RefCell;
use std::rc::Rc;

use camino::{Utf8Path, Utf8PathBuf};
use courier_core::test_support::ScriptedRoutingProvider;
use courier_core::{
    CancellationToken, DirectionsQuery, DirectionsResponse, DistanceQuery, DistanceResponse,
    ProviderError, RoutingProvider,
};
use tempfile::TempDir;

use crate::CliError;
use crate::settings::{RoutingProviderBuilder, RoutingSettings};

pub(super) const TEST_MAPS_API_KEY: &str = "cli-test-key";

pub(super) fn write_utf8(path: &Utf8Path, contents: &[u8]) {
    std::fs::write(path.as_std_path(), contents).expect("write fixture");
}

/// A temporary directory addressed through UTF-8 paths.
pub(super) struct Workspace {
    _dir: TempDir,
    root: Utf8PathBuf,
}

impl Workspace {
    pub(super) fn new() -> Self {
        let dir = TempDir::new().expect("tempdir");
        let root = Utf8PathBuf::from_path_buf(dir.path().to_path_buf()).expect("utf-8 workspace");
        Self { _dir: dir, root }
    }

    pub(super) fn path(&self, name: &str) -> Utf8PathBuf {
        self.root.join(name)
    }
}

/// Hands a shared [`ScriptedRoutingProvider`] to the command under test and
/// remembers the settings it was built with.
#[derive(Default)]
pub(super) struct StubProviderBuilder {
    pub(super) provider: Rc<ScriptedRoutingProvider>,
    pub(super) settings: RefCell<Option<RoutingSettings>>,
}

impl RoutingProviderBuilder for StubProviderBuilder {
    fn build(&self, settings: &RoutingSettings) -> Result<Box<dyn RoutingProvider>, CliError> {
        self.settings.replace(Some(settings.clone()));
        Ok(Box::new(SharedProvider(Rc::clone(&self.provider))))
    }
}

struct SharedProvider(Rc<ScriptedRoutingProvider>);

impl RoutingProvider for SharedProvider {
    fn query_distance(
        &self,
        query: &DistanceQuery<'_>,
        cancel: &CancellationToken,
    ) -> Result<DistanceResponse, ProviderError> {
        self.0.query_distance(query, cancel)
    }

    fn query_directions(
        &self,
        query: &DirectionsQuery<'_>,
        cancel: &CancellationToken,
    ) -> Result<DirectionsResponse, ProviderError> {
        self.0.query_directions(query, cancel)
    }
}

/// Take the recorded command outcome or fail the test.
pub(super) fn expect_error(result: &RefCell<Option<Result<(), CliError>>>) -> CliError {
    result
        .take()
        .expect("result recorded")
        .expect_err("expected error")
}
