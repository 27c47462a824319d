//! A log-structured flash translation layer over a pluggable NAND HAL.
//!
//! [`Ftl`] is the public entry point: initialize it with an [`FtlConfig`]
//! and any [`ftl_hal::NandDevice`], then `read`/`write` by logical block
//! address. Internally it maintains a logical-to-physical mapping table, a
//! per-block liveness table, and a single append-only write frontier;
//! garbage collection runs lazily, only when the frontier can't advance.

mod alloc;
mod block_table;
mod config;
mod error;
mod ftl;
mod gc;
mod l2p;
mod oob;
mod stats;

pub use config::FtlConfig;
pub use error::FtlError;
pub use ftl::Ftl;
pub use stats::FtlStats;
