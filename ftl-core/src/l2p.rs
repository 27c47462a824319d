// =============================================================================
// ftl-core — Logical-to-Physical Mapping Table
// =============================================================================
//
// A dense array indexed by LBA, holding either `UNMAPPED` or the current
// PPA that LBA's data lives at. Mutated only by `write` and by GC
// copy-back; read by `read` and by GC's liveness test.
// =============================================================================

use ftl_hal::UNMAPPED;

/// The logical-to-physical mapping table.
pub struct L2pTable {
    entries: Vec<u32>,
}

impl L2pTable {
    /// Creates a table of `logical_pages` entries, all initially
    /// [`UNMAPPED`].
    ///
    /// Returns `None` if the backing allocation could not be reserved.
    pub fn try_new(logical_pages: u32) -> Option<Self> {
        let mut entries = Vec::new();
        entries.try_reserve_exact(logical_pages as usize).ok()?;
        entries.resize(logical_pages as usize, UNMAPPED);
        Some(Self { entries })
    }

    /// Number of LBAs this table covers.
    #[inline]
    pub fn len(&self) -> u32 {
        self.entries.len() as u32
    }

    /// The current PPA for `lba`, or [`UNMAPPED`] if it has never been
    /// written (or was never mapped).
    ///
    /// # Panics
    /// If `lba` is out of range. Callers must range-check first; this
    /// mirrors the core invariant that range checks happen once, at the
    /// public API boundary.
    #[inline]
    pub fn get(&self, lba: u32) -> u32 {
        self.entries[lba as usize]
    }

    /// Points `lba` at `ppa`.
    ///
    /// # Panics
    /// If `lba` is out of range.
    #[inline]
    pub fn set(&mut self, lba: u32, ppa: u32) {
        self.entries[lba as usize] = ppa;
    }

    /// `true` if `lba` currently has no physical mapping.
    #[inline]
    pub fn is_unmapped(&self, lba: u32) -> bool {
        self.get(lba) == UNMAPPED
    }
}
