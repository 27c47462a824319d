//! HAL-level error taxonomy.

use thiserror::Error;

/// Errors a [`crate::NandDevice`] can report back to the FTL.
///
/// These map directly onto the four non-success codes in the NAND HAL
/// contract (`INVALID`, `OVERWRITE`, `BADBLOCK`, plus erase-specific
/// failures); the FTL wraps each into the appropriate `FtlError` variant
/// rather than matching on HAL internals beyond success/failure.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum HalError {
    /// The PPA or block index is out of range for this device's geometry.
    #[error("invalid address")]
    Invalid,
    /// Attempted to program a page that has already been programmed since
    /// its block's last erase.
    #[error("page already programmed since last erase")]
    Overwrite,
    /// The target block is permanently bad.
    #[error("block is marked bad")]
    BadBlock,
    /// A fault injector forced this call to fail, simulating real flash
    /// wear without needing to actually exhaust program/erase cycles.
    #[error("injected fault")]
    Injected,
}
