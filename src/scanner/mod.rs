//! The external detection engine behind this tool.
//!
//! Detection itself is not done here. A [`Scanner`] runs one category of
//! detection on one file and hands back the raw findings; [`scancode`] is
//! the implementation that drives the ScanCode toolkit.

use std::path::Path;

use anyhow::Result;

use crate::models::RawFileScan;

pub mod scancode;

pub use scancode::ScancodeCli;

pub trait Scanner {
    /// Fills `copyrights` and `holders`.
    fn get_copyrights(&self, path: &Path) -> Result<RawFileScan>;

    /// Fills `licenses`. With `include_text`, each match carries `matched_text`.
    fn get_licenses(&self, path: &Path, include_text: bool) -> Result<RawFileScan>;

    /// Fills `emails`.
    fn get_emails(&self, path: &Path) -> Result<RawFileScan>;

    /// Fills `urls`.
    fn get_urls(&self, path: &Path) -> Result<RawFileScan>;
}
