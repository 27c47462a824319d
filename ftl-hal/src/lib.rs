//! NAND HAL — the hardware abstraction layer consumed by the flash
//! translation layer in `ftl-core`.
//!
//! This crate specifies the *contract* a NAND device must satisfy (one
//! program per page per erase cycle, whole-block erase, permanent bad
//! blocks) and ships a single in-memory reference implementation,
//! [`SimNand`], that satisfies it. `ftl-core` is generic over
//! [`NandDevice`] so a real flash driver could be dropped in without
//! touching the translation layer.

mod device;
mod error;
mod geometry;
mod sim;

pub use device::NandDevice;
pub use error::HalError;
pub use geometry::{Geometry, UNMAPPED};
pub use sim::{FaultPlan, SimNand};
