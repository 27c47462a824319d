// =============================================================================
// ftl-core — Log Allocator (write path)
// =============================================================================
//
// `write` is the only place pages get programmed, which is also the only
// place the write frontier advances and the only place GC gets triggered.
// GC copy-back relocates live pages by calling `write` again (see `gc.rs`),
// so this is the single entry point both client writes and GC replay go
// through — there is no separate "internal write" duplicate to keep in
// sync.
// =============================================================================

use ftl_hal::NandDevice;

use crate::{error::FtlError, gc::GcOutcome, oob};

impl<H: NandDevice> crate::ftl::Ftl<H> {
    /// Programs `buf` as the new data for `lba`, out-of-place.
    ///
    /// If the write frontier is full, first tries to acquire a free block;
    /// if none are free, runs one GC pass before giving up with
    /// [`FtlError::DeviceFull`].
    ///
    /// # Panics
    /// If `buf.len()` does not equal the configured page size.
    pub fn write(&mut self, lba: u32, buf: &[u8]) -> Result<(), FtlError> {
        debug_assert_eq!(buf.len(), self.config.geometry.page_size, "write buffer size mismatch");

        if lba >= self.config.logical_pages {
            log::error!("ftl: write lba {} out of range", lba);
            return Err(FtlError::OutOfRange { lba });
        }

        if self.next_page_offset == self.config.geometry.pages_per_block {
            self.acquire_free_block()?;
        }

        let target_ppa = self
            .config
            .geometry
            .ppa(self.current_block, self.next_page_offset);

        let old_ppa = self.l2p.get(lba);
        if old_ppa != ftl_hal::UNMAPPED {
            let old_block = self.config.geometry.block_of(old_ppa);
            self.blocks
                .increment_invalid(old_block, self.config.geometry.pages_per_block);
        }

        let stamp = oob::stamp(lba, self.config.geometry.oob_size);
        match self.hal.program(target_ppa, buf, &stamp) {
            Ok(()) => {
                self.l2p.set(lba, target_ppa);
                self.next_page_offset += 1;
                self.stats.pages_written += 1;
                Ok(())
            }
            Err(e) => {
                log::error!("ftl: program failed at ppa {}: {}", target_ppa, e);
                Err(FtlError::HalProgramFailed {
                    ppa: target_ppa,
                    source: e,
                })
            }
        }
    }

    /// Finds (or reclaims via one GC pass) a free block and adopts it as
    /// the write frontier.
    pub(crate) fn acquire_free_block(&mut self) -> Result<(), FtlError> {
        if let Some(block) = self.scan_free_block() {
            self.blocks.mark_in_use(block);
            self.current_block = block;
            self.next_page_offset = 0;
            return Ok(());
        }

        match self.gc_pass() {
            // gc_pass already adopted the reclaimed block as the frontier.
            GcOutcome::Reclaimed => Ok(()),
            // The frontier is usable, but at least one relocated page was
            // lost for good (its source was already erased when the
            // retried relocation write also failed). Surface that to the
            // caller instead of silently proceeding as if nothing happened.
            GcOutcome::ReclaimedWithLoss(e) => Err(e),
            GcOutcome::NoVictim => {
                if let Some(block) = self.scan_free_block() {
                    self.blocks.mark_in_use(block);
                    self.current_block = block;
                    self.next_page_offset = 0;
                    Ok(())
                } else {
                    log::warn!("ftl: device full — no free block and no reclaimable victim");
                    Err(FtlError::DeviceFull)
                }
            }
            GcOutcome::EraseFailed { block, source } => {
                if let Some(free_block) = self.scan_free_block() {
                    self.blocks.mark_in_use(free_block);
                    self.current_block = free_block;
                    self.next_page_offset = 0;
                    Ok(())
                } else {
                    Err(FtlError::HalEraseFailed { block, source })
                }
            }
        }
    }

    fn scan_free_block(&self) -> Option<u32> {
        (0..self.blocks.len()).find(|&b| self.blocks.is_free(b) && !self.hal.is_bad(b))
    }
}
