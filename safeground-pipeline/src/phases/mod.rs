//! One processor per phase; each reads its input collection, does one unit
//! of external work per example and writes the whole collection back.

mod attribution;
mod baseline;
mod evaluation;
mod foveation;
mod rationalization;

/// Examples kept by a test run of the attribution phase.
pub(crate) const ATTRIBUTION_TEST_KEEP: usize = 2;
/// Examples kept by a test run of any other phase.
pub(crate) const TEST_KEEP: usize = 1;
