// =============================================================================
// ftl-core — Block Info Table
// =============================================================================
//
// A dense, block-indexed record of per-block liveness (free vs in-use) and
// invalid-page counters. Bad-block status is *not* stored here — it is
// owned by the HAL and consulted live via `NandDevice::is_bad`, so a block
// a HAL retires mid-run is honored immediately without the core needing to
// mirror that state.
// =============================================================================

/// Per-block bookkeeping the FTL core owns directly.
#[derive(Debug, Clone, Copy)]
pub struct BlockInfo {
    /// Number of pages in this block whose LBA has since been remapped
    /// elsewhere. Bounded to `[0, pages_per_block]`.
    pub invalid_page_count: u32,
    /// `true` if the block is erased and available for allocation.
    pub is_free: bool,
}

/// The block info table: one [`BlockInfo`] per physical block.
pub struct BlockTable {
    blocks: Vec<BlockInfo>,
}

impl BlockTable {
    /// Creates a table of `blocks_per_chip` entries, all marked free with
    /// zero invalid pages.
    ///
    /// Returns `None` if the backing allocation could not be reserved.
    pub fn try_new(blocks_per_chip: u32) -> Option<Self> {
        let mut blocks = Vec::new();
        blocks.try_reserve_exact(blocks_per_chip as usize).ok()?;
        blocks.resize(
            blocks_per_chip as usize,
            BlockInfo {
                invalid_page_count: 0,
                is_free: true,
            },
        );
        Some(Self { blocks })
    }

    /// Number of blocks this table covers.
    #[inline]
    pub fn len(&self) -> u32 {
        self.blocks.len() as u32
    }

    #[inline]
    pub fn is_free(&self, block: u32) -> bool {
        self.blocks[block as usize].is_free
    }

    #[inline]
    pub fn invalid_page_count(&self, block: u32) -> u32 {
        self.blocks[block as usize].invalid_page_count
    }

    /// Marks `block` as allocated (no longer free). Used when a block
    /// becomes the active write frontier.
    #[inline]
    pub fn mark_in_use(&mut self, block: u32) {
        self.blocks[block as usize].is_free = false;
    }

    /// Marks `block` as free with a reset invalid-page count, after a
    /// successful erase.
    #[inline]
    pub fn mark_free(&mut self, block: u32, pages_per_block: u32) {
        let slot = &mut self.blocks[block as usize];
        slot.is_free = true;
        slot.invalid_page_count = 0;
        debug_assert!(slot.invalid_page_count <= pages_per_block);
    }

    /// Increments `block`'s invalid-page counter.
    ///
    /// Saturates at `pages_per_block`: the counter is documented as an
    /// approximate upper bound (it can be conservatively over-incremented
    /// when a program call that already bumped it subsequently fails), so
    /// it must never be allowed to exceed the physically meaningful range.
    #[inline]
    pub fn increment_invalid(&mut self, block: u32, pages_per_block: u32) {
        let slot = &mut self.blocks[block as usize];
        slot.invalid_page_count = (slot.invalid_page_count + 1).min(pages_per_block);
    }

    /// Iterates over `(block_index, BlockInfo)` pairs.
    pub fn iter(&self) -> impl Iterator<Item = (u32, BlockInfo)> + '_ {
        self.blocks.iter().enumerate().map(|(i, b)| (i as u32, *b))
    }
}
