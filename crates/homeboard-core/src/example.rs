//! The bundled example board, stored in the legacy config format so it goes
//! through the same importer as user files.

use crate::error::Result;
use crate::formats::{LegacyConfig, parse_legacy};

const EXAMPLE_BOARD: &[u8] = include_bytes!("../assets/example-board.json");

/// Parse the bundled example config.
pub fn example_config() -> Result<LegacyConfig> {
    parse_legacy(EXAMPLE_BOARD)
}
