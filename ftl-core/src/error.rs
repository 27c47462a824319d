//! FTL-level error taxonomy — one variant per row of the error table in the
//! design spec, each carrying the context needed to act on it.

use ftl_hal::HalError;
use thiserror::Error;

/// Errors a public [`crate::Ftl`] operation can return.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum FtlError {
    /// `lba` is outside `[0, logical_pages)`. State is unchanged.
    #[error("lba {lba} is out of range")]
    OutOfRange {
        /// The offending logical block address.
        lba: u32,
    },

    /// The HAL rejected a page program. The L2P entry and write frontier
    /// are left untouched; the predecessor-invalidation increment from
    /// the same write attempt is retained as a conservative approximation.
    #[error("hal program failed at ppa {ppa}: {source}")]
    HalProgramFailed {
        /// The physical page address that failed to program.
        ppa: u32,
        /// The underlying HAL error.
        #[source]
        source: HalError,
    },

    /// The HAL rejected a block erase during GC. The victim block stays
    /// marked not-free and is never retried as a free candidate.
    #[error("hal erase failed on block {block}: {source}")]
    HalEraseFailed {
        /// The block GC attempted to erase.
        block: u32,
        /// The underlying HAL error.
        #[source]
        source: HalError,
    },

    /// `get_free_block` found no eligible block even after a GC pass.
    /// The write is dropped; the caller must handle this.
    #[error("device is full")]
    DeviceFull,

    /// Table allocation failed during `init`. Any table already acquired
    /// is released before this error is returned.
    #[error("out of memory allocating FTL tables")]
    OutOfMemory,

    /// Reserved for a fallible HAL attach/init step. `SimNand`'s
    /// constructor is infallible, so this variant is currently
    /// unreachable with the reference HAL, but is kept in the taxonomy
    /// for HAL implementations that open a real device.
    #[error("hal initialization failed")]
    HalInitFailed,

    /// The supplied [`crate::FtlConfig`] violates an invariant `init`
    /// requires before any allocation occurs.
    #[error("invalid ftl configuration: {0}")]
    InvalidConfig(&'static str),
}
