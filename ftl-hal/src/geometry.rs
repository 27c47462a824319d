// =============================================================================
// ftl-hal — Device Geometry
// =============================================================================
//
// A NAND device is addressed as BLOCKS_PER_CHIP erase units of PAGES_PER_BLOCK
// pages each. A physical page address (PPA) is a single flat index:
//
//   ppa = block * pages_per_block + page_offset
//
// `Geometry` is the one source of truth for this arithmetic; both the HAL
// device and the FTL core hold (or are constructed from) the same value so
// that PPA decoding can never disagree between the two layers.
// =============================================================================

/// Sentinel PPA meaning "no physical address" — used by `ftl-core`'s L2P
/// table, but defined here since it must never collide with a real PPA
/// under any geometry this HAL can represent.
pub const UNMAPPED: u32 = u32::MAX;

/// The physical shape of a NAND chip: page/OOB sizes and block layout.
///
/// # Reference values
/// The original hardware this simulator stands in for uses 4096-byte pages,
/// 128-byte OOB areas, 64 pages per block and 1024 blocks per chip —
/// [`Geometry::reference`] returns exactly that shape.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Geometry {
    /// Bytes of user data per page.
    pub page_size: usize,
    /// Bytes of out-of-band metadata per page.
    pub oob_size: usize,
    /// Pages per erase unit (block).
    pub pages_per_block: u32,
    /// Total erase units on the chip.
    pub blocks_per_chip: u32,
}

impl Geometry {
    /// The reference geometry from the original hardware: 4 KiB pages,
    /// 128 B OOB, 64 pages/block, 1024 blocks/chip (≈65,536 physical pages).
    pub const fn reference() -> Self {
        Self {
            page_size: 4096,
            oob_size: 128,
            pages_per_block: 64,
            blocks_per_chip: 1024,
        }
    }

    /// Total number of physical pages addressable under this geometry.
    #[inline]
    pub const fn total_pages(&self) -> u64 {
        self.pages_per_block as u64 * self.blocks_per_chip as u64
    }

    /// Encodes a (block, page offset) pair into a flat PPA.
    #[inline]
    pub const fn ppa(&self, block: u32, page_offset: u32) -> u32 {
        block * self.pages_per_block + page_offset
    }

    /// Extracts the block index a PPA falls in.
    #[inline]
    pub const fn block_of(&self, ppa: u32) -> u32 {
        ppa / self.pages_per_block
    }

    /// Extracts the in-block page offset of a PPA.
    #[inline]
    pub const fn page_offset_of(&self, ppa: u32) -> u32 {
        ppa % self.pages_per_block
    }

    /// `true` if `ppa` addresses a page that exists under this geometry.
    #[inline]
    pub const fn is_valid_ppa(&self, ppa: u32) -> bool {
        (ppa as u64) < self.total_pages()
    }

    /// `true` if `block` exists under this geometry.
    #[inline]
    pub const fn is_valid_block(&self, block: u32) -> bool {
        block < self.blocks_per_chip
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn ppa_roundtrips_through_block_and_offset() {
        let geo = Geometry::reference();
        let ppa = geo.ppa(3, 17);
        assert_eq!(geo.block_of(ppa), 3);
        assert_eq!(geo.page_offset_of(ppa), 17);
    }

    #[test]
    fn reference_geometry_matches_original_hardware() {
        let geo = Geometry::reference();
        assert_eq!(geo.page_size, 4096);
        assert_eq!(geo.oob_size, 128);
        assert_eq!(geo.pages_per_block, 64);
        assert_eq!(geo.blocks_per_chip, 1024);
        assert_eq!(geo.total_pages(), 65536);
    }

    #[test]
    fn unmapped_sentinel_is_never_a_valid_ppa() {
        let geo = Geometry::reference();
        assert!(!geo.is_valid_ppa(UNMAPPED));
    }
}
