// =============================================================================
// ftl-hal — In-Memory Reference NAND Device
// =============================================================================
//
// `SimNand` is a plain Vec-backed stand-in for real flash. It exists so the
// FTL's testable properties (§8 of the design spec) can be exercised without
// a physical chip:
//
//   - every page starts "erased" (all-ones data and OOB, not programmed)
//   - `program` enforces program-once per erase cycle
//   - `erase` resets a whole block and bumps its erase count
//   - a fixed set of blocks can be marked permanently bad at construction
//   - an optional fault plan can force one specific program/erase call to
//     fail, without needing to actually wear out a page
//
// =============================================================================

use crate::{device::NandDevice, error::HalError, geometry::Geometry};

/// One physical page: its data area, its OOB area, and whether it has been
/// programmed since the containing block's last erase.
struct PageSlot {
    data: Vec<u8>,
    oob: Vec<u8>,
    programmed: bool,
}

impl PageSlot {
    fn erased(page_size: usize, oob_size: usize) -> Self {
        Self {
            data: vec![0xFF; page_size],
            oob: vec![0xFF; oob_size],
            programmed: false,
        }
    }
}

/// Per-block bookkeeping: permanent bad-block flag and erase count.
struct BlockSlot {
    bad: bool,
    erase_count: u32,
}

/// A plan for deterministically failing one program or erase call.
///
/// The count is 1-indexed over the device's lifetime (the first call to
/// `program`/`erase` is call 1). Each kind of fault fires at most once;
/// after it fires, subsequent calls behave normally. This is enough to
/// exercise `HalProgramFailed`/`HalEraseFailed` recovery paths in
/// `ftl-core` without simulating real program/erase cycle exhaustion.
#[derive(Debug, Clone, Copy, Default)]
pub struct FaultPlan {
    fail_program_on_call: Option<u64>,
    fail_erase_on_call: Option<u64>,
}

impl FaultPlan {
    /// A plan that never injects a fault.
    pub fn none() -> Self {
        Self::default()
    }

    /// Fail the `n`th call to `program` (1-indexed), once.
    pub fn fail_program_on_call(mut self, n: u64) -> Self {
        self.fail_program_on_call = Some(n);
        self
    }

    /// Fail the `n`th call to `erase` (1-indexed), once.
    pub fn fail_erase_on_call(mut self, n: u64) -> Self {
        self.fail_erase_on_call = Some(n);
        self
    }
}

/// An in-memory NAND device satisfying the [`NandDevice`] contract.
pub struct SimNand {
    geometry: Geometry,
    pages: Vec<PageSlot>,
    blocks: Vec<BlockSlot>,
    fault_plan: FaultPlan,
    program_calls: u64,
    erase_calls: u64,
}

impl SimNand {
    /// Creates a device of the given geometry with no bad blocks and no
    /// injected faults. Every page starts erased.
    pub fn new(geometry: Geometry) -> Self {
        Self::with_bad_blocks(geometry, &[])
    }

    /// Creates a device with a fixed set of permanently bad blocks.
    pub fn with_bad_blocks(geometry: Geometry, bad_blocks: &[u32]) -> Self {
        let total_pages = geometry.total_pages() as usize;
        let pages = (0..total_pages)
            .map(|_| PageSlot::erased(geometry.page_size, geometry.oob_size))
            .collect();
        let blocks = (0..geometry.blocks_per_chip)
            .map(|b| BlockSlot {
                bad: bad_blocks.contains(&b),
                erase_count: 0,
            })
            .collect();

        log::debug!(
            "sim-nand: created {} blocks x {} pages ({} bad)",
            geometry.blocks_per_chip,
            geometry.pages_per_block,
            bad_blocks.len()
        );

        Self {
            geometry,
            pages,
            blocks,
            fault_plan: FaultPlan::none(),
            program_calls: 0,
            erase_calls: 0,
        }
    }

    /// Installs a fault injection plan, replacing any previous one.
    pub fn set_fault_plan(&mut self, plan: FaultPlan) {
        self.fault_plan = plan;
    }
}

impl NandDevice for SimNand {
    fn geometry(&self) -> &Geometry {
        &self.geometry
    }

    fn read(
        &mut self,
        ppa: u32,
        data: Option<&mut [u8]>,
        oob: Option<&mut [u8]>,
    ) -> Result<(), HalError> {
        if !self.geometry.is_valid_ppa(ppa) {
            return Err(HalError::Invalid);
        }
        if self.is_bad(self.geometry.block_of(ppa)) {
            return Err(HalError::BadBlock);
        }

        let slot = &self.pages[ppa as usize];
        if let Some(out) = data {
            debug_assert_eq!(out.len(), self.geometry.page_size, "data buffer size mismatch");
            out.copy_from_slice(&slot.data);
        }
        if let Some(out) = oob {
            debug_assert_eq!(out.len(), self.geometry.oob_size, "oob buffer size mismatch");
            out.copy_from_slice(&slot.oob);
        }
        Ok(())
    }

    fn program(&mut self, ppa: u32, data: &[u8], oob: &[u8]) -> Result<(), HalError> {
        if !self.geometry.is_valid_ppa(ppa) {
            return Err(HalError::Invalid);
        }
        debug_assert_eq!(data.len(), self.geometry.page_size, "data buffer size mismatch");
        debug_assert_eq!(oob.len(), self.geometry.oob_size, "oob buffer size mismatch");

        self.program_calls += 1;
        if self.fault_plan.fail_program_on_call == Some(self.program_calls) {
            log::warn!("sim-nand: injected program failure at call {}", self.program_calls);
            return Err(HalError::Injected);
        }

        let block = self.geometry.block_of(ppa);
        if self.is_bad(block) {
            return Err(HalError::BadBlock);
        }

        let slot = &mut self.pages[ppa as usize];
        if slot.programmed {
            return Err(HalError::Overwrite);
        }
        slot.data.copy_from_slice(data);
        slot.oob.copy_from_slice(oob);
        slot.programmed = true;
        Ok(())
    }

    fn erase(&mut self, block: u32) -> Result<(), HalError> {
        if !self.geometry.is_valid_block(block) {
            return Err(HalError::Invalid);
        }

        self.erase_calls += 1;
        if self.fault_plan.fail_erase_on_call == Some(self.erase_calls) {
            log::warn!("sim-nand: injected erase failure at call {}", self.erase_calls);
            return Err(HalError::Injected);
        }

        if self.is_bad(block) {
            return Err(HalError::BadBlock);
        }

        let pages_per_block = self.geometry.pages_per_block;
        let start = (block * pages_per_block) as usize;
        let end = start + pages_per_block as usize;
        for slot in &mut self.pages[start..end] {
            slot.data.fill(0xFF);
            slot.oob.fill(0xFF);
            slot.programmed = false;
        }
        self.blocks[block as usize].erase_count += 1;
        log::trace!("sim-nand: erased block {}", block);
        Ok(())
    }

    fn is_bad(&self, block: u32) -> bool {
        match self.blocks.get(block as usize) {
            Some(slot) => slot.bad,
            None => true,
        }
    }

    fn erase_count(&self, block: u32) -> u32 {
        self.blocks.get(block as usize).map_or(0, |slot| slot.erase_count)
    }

    fn shutdown(&mut self) {
        // Dropping the backing storage is idempotent: calling this again
        // just clears already-empty vectors.
        self.pages.clear();
        self.pages.shrink_to_fit();
        self.blocks.clear();
        self.blocks.shrink_to_fit();
        log::debug!("sim-nand: shutdown");
    }
}
