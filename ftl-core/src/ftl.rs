// =============================================================================
// ftl-core — Public Surface and Lifecycle
// =============================================================================
//
// `Ftl<H>` owns every table the FTL needs (L2P, block info, write frontier)
// plus the HAL handle itself. It is generic over `H: NandDevice` so tests
// run against `ftl_hal::SimNand`, while a real driver could implement the
// same trait without touching the allocator or GC.
//
// There is no global singleton here, unlike the teacher's `PMM` (a
// `SpinLock<Option<BitmapAllocator>>` behind module-level functions): the
// design spec is explicit that the core is single-threaded with no
// concurrent client access, so an owned, caller-held struct is the more
// idiomatic shape in safe Rust — there is nothing a spinlock would protect
// here.
// =============================================================================

use ftl_hal::{NandDevice, UNMAPPED};

use crate::{
    block_table::BlockTable, config::FtlConfig, error::FtlError, l2p::L2pTable, stats::FtlStats,
};

/// A log-structured flash translation layer over a [`NandDevice`].
pub struct Ftl<H: NandDevice> {
    pub(crate) hal: H,
    pub(crate) config: FtlConfig,
    pub(crate) l2p: L2pTable,
    pub(crate) blocks: BlockTable,
    pub(crate) current_block: u32,
    pub(crate) next_page_offset: u32,
    pub(crate) stats: FtlStats,
    exited: bool,
}

impl<H: NandDevice> Ftl<H> {
    /// Initializes the FTL over `hal`.
    ///
    /// Allocates the L2P (sized `config.logical_pages`) and block table
    /// (sized `config.geometry.blocks_per_chip`), fills the L2P with
    /// [`UNMAPPED`], marks every block free, then picks the first non-bad
    /// block as the initial write frontier.
    ///
    /// # Errors
    /// - [`FtlError::InvalidConfig`] if `config` violates
    ///   `logical_pages <= blocks_per_chip * pages_per_block`, or if every
    ///   block the HAL reports is bad (no usable starting block exists).
    /// - [`FtlError::OutOfMemory`] if a table allocation could not be
    ///   reserved. Any table already reserved is released automatically
    ///   (Rust drops the partially built value on the `?` early return).
    pub fn init(config: FtlConfig, hal: H) -> Result<Self, FtlError> {
        config.validate()?;

        let l2p = L2pTable::try_new(config.logical_pages).ok_or(FtlError::OutOfMemory)?;
        let mut blocks =
            BlockTable::try_new(config.geometry.blocks_per_chip).ok_or(FtlError::OutOfMemory)?;

        let first_block = (0..config.geometry.blocks_per_chip)
            .find(|&b| !hal.is_bad(b))
            .ok_or(FtlError::InvalidConfig(
                "every block is bad — no usable starting block",
            ))?;
        blocks.mark_in_use(first_block);

        log::info!(
            "ftl: initialized — {} logical pages over {} blocks x {} pages, active block {}",
            config.logical_pages,
            config.geometry.blocks_per_chip,
            config.geometry.pages_per_block,
            first_block
        );

        Ok(Self {
            hal,
            config,
            l2p,
            blocks,
            current_block: first_block,
            next_page_offset: 0,
            stats: FtlStats::default(),
            exited: false,
        })
    }

    /// Reads the current data for `lba` into `out`.
    ///
    /// If `lba` has never been written (or was written then superseded by
    /// nothing — i.e. is simply unmapped), `out` is filled with `0xFF`,
    /// matching the erased-page pattern a client would observe from raw
    /// flash. An out-of-range `lba` is a client contract violation:
    /// reported and ignored, with no mutation.
    ///
    /// # Panics
    /// If `out.len()` does not equal the configured page size.
    pub fn read(&mut self, lba: u32, out: &mut [u8]) -> Result<(), FtlError> {
        debug_assert_eq!(out.len(), self.config.geometry.page_size, "read buffer size mismatch");

        if lba >= self.config.logical_pages {
            log::error!("ftl: read lba {} out of range", lba);
            return Err(FtlError::OutOfRange { lba });
        }

        let ppa = self.l2p.get(lba);
        if ppa == UNMAPPED {
            out.fill(0xFF);
            return Ok(());
        }

        // The mapping invariant guarantees `ppa` has been programmed and
        // its block is not free; a HAL failure here means that invariant
        // was violated elsewhere, which is an internal bug, not a
        // client-facing error condition.
        self.hal
            .read(ppa, Some(out), None)
            .expect("l2p points at a ppa the hal rejected — mapping invariant violated");
        Ok(())
    }

    /// Releases the FTL's tables, then tears down the HAL. Safe to call
    /// more than once; subsequent calls are no-ops.
    ///
    /// Order matters: the L2P and block table are released first, and
    /// only then is `H::shutdown` invoked, matching the guaranteed
    /// teardown order the HAL contract requires.
    pub fn exit(&mut self) {
        if self.exited {
            log::debug!("ftl: exit called again — already torn down");
            return;
        }
        self.l2p = L2pTable::try_new(0).expect("zero-sized allocation cannot fail");
        self.blocks = BlockTable::try_new(0).expect("zero-sized allocation cannot fail");
        self.hal.shutdown();
        self.exited = true;
        log::info!("ftl: exited");
    }

    /// Debug helper: logs the current mapping for `lba`.
    pub fn print_map(&self, lba: u32) {
        if lba >= self.config.logical_pages {
            log::info!("lba {} -> out of range", lba);
            return;
        }
        let ppa = self.l2p.get(lba);
        if ppa == UNMAPPED {
            log::info!("lba {} -> unmapped", lba);
        } else {
            log::info!(
                "lba {} -> ppa {} (block {}, page {})",
                lba,
                ppa,
                self.config.geometry.block_of(ppa),
                self.config.geometry.page_offset_of(ppa)
            );
        }
    }

    /// A snapshot of process-lifetime counters (GC passes, pages written).
    pub fn stats(&self) -> FtlStats {
        self.stats
    }

    /// Number of blocks currently free and usable (not bad).
    pub fn free_block_count(&self) -> u32 {
        self.blocks
            .iter()
            .filter(|&(b, info)| info.is_free && !self.hal.is_bad(b))
            .count() as u32
    }

    /// Debug accessor: the HAL's erase count for `block`, for tests that
    /// want to assert GC actually cycled a particular block.
    pub fn hal_erase_count(&self, block: u32) -> u32 {
        self.hal.erase_count(block)
    }
}
