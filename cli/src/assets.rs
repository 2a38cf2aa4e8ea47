use anyhow::{Context, Result};
use quill_engine::Fragment;

const DEMO_RAW: &str = include_str!(concat!(env!("CARGO_MANIFEST_DIR"), "/assets/demo.json"));

/// Document played when no fragment file is given.
pub fn demo_document() -> Result<Vec<Fragment>> {
    Fragment::parse_list(DEMO_RAW).context("bundled demo fragment is invalid")
}
