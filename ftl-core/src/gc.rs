// =============================================================================
// ftl-core — Garbage Collector
// =============================================================================
//
// Victim selection is greedy: the sealed, non-current, non-bad block with
// the highest invalid-page count, provided that count is strictly positive
// (a block with zero invalid pages is pure overhead to copy and buys
// nothing). Ties go to the lowest block index, which falls out for free
// from scanning in index order and only replacing the incumbent on a
// strictly-greater count.
//
// Copy-back reads every live page of the victim into a host-side buffer
// *before* erasing it, then erases, adopts the now-empty victim as the new
// write frontier, and replays the buffered pages through the ordinary
// `write` path. A victim always has at least one invalid page (that is
// what made it a victim), so it holds at most `pages_per_block - 1` live
// pages — replaying into its own freshly erased, `pages_per_block`-page
// capacity can never run the frontier dry again. This sidesteps the
// circular dependency a naive per-page interleaved copy-back runs into:
// interleaving would need a destination block to exist *before* any space
// is reclaimed, which — at the exact moment GC is invoked, with every
// non-current block sealed — is never the case, and retrying via the
// normal allocator from inside copy-back can recurse into GC again with no
// depth bound. Buffering first keeps GC to exactly one erase per call.
//
// Because the victim is already erased by the time replay runs, a failed
// relocation write cannot fall back on the old page the way a client
// write falls back on leaving `L2P` untouched — that old page reads back
// as erased now. A relocation write is therefore retried once (the same
// target PPA is still unprogrammed after a failed attempt, since a failed
// `program` call never touches page storage), and if it still fails the
// loss is not swallowed: `gc_pass` reports it via `GcOutcome`, and the
// caller that triggered this GC pass gets that error back instead of
// silently succeeding.
// =============================================================================

use ftl_hal::{HalError, NandDevice};

use crate::{error::FtlError, ftl::Ftl};

pub(crate) enum GcOutcome {
    NoVictim,
    EraseFailed { block: u32, source: HalError },
    Reclaimed,
    ReclaimedWithLoss(FtlError),
}

impl<H: NandDevice> Ftl<H> {
    fn find_victim(&self) -> Option<u32> {
        let mut best: Option<(u32, u32)> = None;
        for (block, info) in self.blocks.iter() {
            if block == self.current_block || info.is_free || self.hal.is_bad(block) {
                continue;
            }
            if info.invalid_page_count > 0 {
                let better = match best {
                    Some((_, max)) => info.invalid_page_count > max,
                    None => true,
                };
                if better {
                    best = Some((block, info.invalid_page_count));
                }
            }
        }
        best.map(|(block, _)| block)
    }

    /// Runs a single GC pass: selects a victim, relocates its live pages,
    /// and erases it. Performs at most one erase; never recurses into
    /// allocation or GC.
    pub(crate) fn gc_pass(&mut self) -> GcOutcome {
        let victim = match self.find_victim() {
            Some(v) => v,
            None => {
                log::debug!("gc: no eligible victim block");
                return GcOutcome::NoVictim;
            }
        };

        let pages_per_block = self.config.geometry.pages_per_block;
        let page_size = self.config.geometry.page_size;
        let oob_size = self.config.geometry.oob_size;

        let mut live_pages = Vec::new();
        for page_offset in 0..pages_per_block {
            let ppa = self.config.geometry.ppa(victim, page_offset);
            let mut oob = vec![0u8; oob_size];
            if let Err(e) = self.hal.read(ppa, None, Some(&mut oob)) {
                log::error!("gc: oob read failed at ppa {}: {}", ppa, e);
                continue;
            }
            let lba = crate::oob::decode_lba(&oob);
            if lba >= self.config.logical_pages || self.l2p.get(lba) != ppa {
                continue;
            }
            let mut data = vec![0u8; page_size];
            if let Err(e) = self.hal.read(ppa, Some(&mut data), None) {
                log::error!("gc: data read failed at ppa {}: {}", ppa, e);
                continue;
            }
            live_pages.push((lba, data));
        }

        log::info!(
            "gc: selected victim block {} ({} live pages to relocate)",
            victim,
            live_pages.len()
        );

        if let Err(e) = self.hal.erase(victim) {
            log::error!("gc: erase failed on block {}: {}", victim, e);
            return GcOutcome::EraseFailed {
                block: victim,
                source: e,
            };
        }

        self.blocks.mark_free(victim, pages_per_block);
        self.blocks.mark_in_use(victim);
        self.current_block = victim;
        self.next_page_offset = 0;
        self.stats.gc_passes += 1;

        let relocated = live_pages.len();
        let mut first_failure = None;
        for (lba, data) in live_pages {
            let mut result = self.write(lba, &data);
            if result.is_err() {
                log::warn!("gc: relocation write failed for lba {}, retrying once", lba);
                result = self.write(lba, &data);
            }
            if let Err(e) = result {
                log::error!(
                    "gc: relocation write failed for lba {} after retry — data for this lba is lost: {}",
                    lba,
                    e
                );
                if first_failure.is_none() {
                    first_failure = Some(e);
                }
            }
        }

        log::info!("gc: erased block {}, relocated {} pages", victim, relocated);
        match first_failure {
            Some(e) => GcOutcome::ReclaimedWithLoss(e),
            None => GcOutcome::Reclaimed,
        }
    }
}

#[cfg(test)]
mod tests {
    use ftl_hal::{Geometry, SimNand};

    use crate::{config::FtlConfig, ftl::Ftl};

    fn geometry() -> Geometry {
        Geometry {
            page_size: 16,
            oob_size: 4,
            pages_per_block: 4,
            blocks_per_chip: 4,
        }
    }

    fn test_ftl() -> Ftl<SimNand> {
        let hal = SimNand::new(geometry());
        Ftl::init(
            FtlConfig {
                geometry: geometry(),
                logical_pages: 8,
            },
            hal,
        )
        .unwrap()
    }

    #[test]
    fn find_victim_picks_highest_invalid_count() {
        let mut ftl = test_ftl();
        ftl.blocks.mark_in_use(1);
        ftl.blocks.mark_in_use(2);
        ftl.blocks.mark_in_use(3);
        ftl.blocks.increment_invalid(1, 4);
        ftl.blocks.increment_invalid(2, 4);
        ftl.blocks.increment_invalid(2, 4);
        assert_eq!(ftl.find_victim(), Some(2));
    }

    #[test]
    fn find_victim_breaks_ties_by_lowest_index() {
        let mut ftl = test_ftl();
        ftl.blocks.mark_in_use(1);
        ftl.blocks.mark_in_use(2);
        ftl.blocks.increment_invalid(1, 4);
        ftl.blocks.increment_invalid(2, 4);
        assert_eq!(ftl.find_victim(), Some(1));
    }

    #[test]
    fn find_victim_returns_none_when_every_sealed_block_is_still_free() {
        let ftl = test_ftl();
        // Fresh device: every non-current block is still free, so there is
        // nothing eligible regardless of the current block's own counters.
        assert_eq!(ftl.find_victim(), None);
    }

    #[test]
    fn find_victim_ignores_bad_blocks_even_with_invalid_pages() {
        let hal = SimNand::with_bad_blocks(geometry(), &[1]);
        let mut ftl = Ftl::init(
            FtlConfig {
                geometry: geometry(),
                logical_pages: 8,
            },
            hal,
        )
        .unwrap();
        ftl.blocks.mark_in_use(1);
        ftl.blocks.mark_in_use(2);
        ftl.blocks.increment_invalid(1, 4);
        ftl.blocks.increment_invalid(2, 1);
        assert_eq!(ftl.find_victim(), Some(2));
    }
}
