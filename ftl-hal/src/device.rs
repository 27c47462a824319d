//! The NAND device contract consumed by `ftl-core`.

use crate::{error::HalError, geometry::Geometry};

/// A NAND flash device: a page/OOB store with program-once, block-erase
/// semantics and permanent bad blocks.
///
/// Implementations must uphold:
///
/// - **Program-once.** [`program`](NandDevice::program) on a page that has
///   already been programmed since its containing block's last
///   [`erase`](NandDevice::erase) must fail with [`HalError::Overwrite`],
///   never silently overwrite.
/// - **Erase resets state.** After a successful `erase(block)`, every page
///   in `block` reads back as all-ones data and all-ones OOB, and is once
///   again programmable.
/// - **Bad blocks are permanent.** Once [`is_bad`](NandDevice::is_bad)
///   reports `true` for a block, it must keep reporting `true` for the
///   life of the device, and `program`/`erase` on that block must fail
///   with [`HalError::BadBlock`].
/// - **Reads never fail on unprogrammed pages.** Reading a page that has
///   never been programmed since its block's last erase yields all-ones,
///   not an error.
pub trait NandDevice {
    /// The geometry this device was constructed with.
    fn geometry(&self) -> &Geometry;

    /// Reads a page. Either buffer may be omitted (`None`) to skip copying
    /// that portion; at least one of `data`/`oob` should normally be
    /// supplied, but omitting both is a valid (if useless) no-op read.
    fn read(
        &mut self,
        ppa: u32,
        data: Option<&mut [u8]>,
        oob: Option<&mut [u8]>,
    ) -> Result<(), HalError>;

    /// Programs one page with both its data and OOB areas in a single call.
    fn program(&mut self, ppa: u32, data: &[u8], oob: &[u8]) -> Result<(), HalError>;

    /// Erases every page in `block`, resetting them to all-ones and
    /// clearing the program-once flag. Increments the block's erase count.
    fn erase(&mut self, block: u32) -> Result<(), HalError>;

    /// Reports whether `block` is permanently unusable. A device that
    /// cannot locate `block` at all (out of range) must also report `true`.
    fn is_bad(&self, block: u32) -> bool;

    /// Debug counter: number of times `block` has been erased since the
    /// device was created. Used by tests to confirm GC erased a specific
    /// block rather than merely believing it did.
    fn erase_count(&self, block: u32) -> u32;

    /// Releases whatever resources this device holds open. Idempotent —
    /// safe to call more than once, and safe to call and then simply drop
    /// the device afterward.
    fn shutdown(&mut self);
}
