//! End-to-end scenarios run against `SimNand`, covering the testable
//! properties a client of this crate actually depends on.

use ftl_core::{Ftl, FtlConfig, FtlError};
use ftl_hal::{FaultPlan, Geometry, SimNand};

/// A small geometry that forces block rollover and GC within a handful of
/// writes, instead of the reference 64-pages-per-block shape.
fn tiny_geometry() -> Geometry {
    Geometry {
        page_size: 64,
        oob_size: 8,
        pages_per_block: 4,
        blocks_per_chip: 8,
    }
}

fn tiny_config(logical_pages: u32) -> FtlConfig {
    FtlConfig {
        geometry: tiny_geometry(),
        logical_pages,
    }
}

fn page(byte: u8) -> Vec<u8> {
    vec![byte; tiny_geometry().page_size]
}

#[test]
fn cold_read_returns_erased_pattern() {
    let hal = SimNand::new(tiny_geometry());
    let mut ftl = Ftl::init(tiny_config(16), hal).unwrap();

    let mut out = page(0);
    ftl.read(0, &mut out).unwrap();
    assert!(out.iter().all(|&b| b == 0xFF));
}

#[test]
fn write_then_read_round_trips() {
    let hal = SimNand::new(tiny_geometry());
    let mut ftl = Ftl::init(tiny_config(16), hal).unwrap();

    let data = page(0xAB);
    ftl.write(5, &data).unwrap();

    let mut out = page(0);
    ftl.read(5, &mut out).unwrap();
    assert_eq!(out, data);
    assert_eq!(ftl.stats().pages_written, 1);
}

#[test]
fn overwrite_invalidates_predecessor_and_serves_latest() {
    let hal = SimNand::new(tiny_geometry());
    let mut ftl = Ftl::init(tiny_config(16), hal).unwrap();

    ftl.write(1, &page(0x11)).unwrap();
    ftl.write(1, &page(0x22)).unwrap();

    let mut out = page(0);
    ftl.read(1, &mut out).unwrap();
    assert_eq!(out, page(0x22));
}

#[test]
fn block_rollover_advances_frontier_without_losing_data() {
    let hal = SimNand::new(tiny_geometry());
    let mut ftl = Ftl::init(tiny_config(16), hal).unwrap();

    // pages_per_block is 4: five distinct-LBA writes force a rollover onto
    // a second block partway through.
    for lba in 0..5u32 {
        ftl.write(lba, &page(lba as u8 + 1)).unwrap();
    }

    for lba in 0..5u32 {
        let mut out = page(0);
        ftl.read(lba, &mut out).unwrap();
        assert_eq!(out, page(lba as u8 + 1));
    }
}

#[test]
fn hot_lba_churn_triggers_gc_and_stays_consistent() {
    let hal = SimNand::new(tiny_geometry());
    let mut ftl = Ftl::init(tiny_config(16), hal).unwrap();

    // Eight hot LBAs, rewritten many times over: with only 8 blocks x 4
    // pages = 32 physical pages and 16 logical pages, this forces repeated
    // GC passes well before the loop ends.
    let rounds = 200u32;
    for i in 0..rounds {
        let lba = i % 8;
        ftl.write(lba, &page((i % 251) as u8)).unwrap();
    }

    for lba in 0..8u32 {
        let expected_i = (rounds - 8 + lba) % rounds;
        let mut out = page(0);
        ftl.read(lba, &mut out).unwrap();
        assert_eq!(out, page((expected_i % 251) as u8));
    }

    assert!(ftl.stats().gc_passes > 0, "expected at least one GC pass under hot churn");
}

#[test]
fn device_full_is_reported_once_capacity_is_exhausted() {
    // A 2-block, 4-page device with logical_pages set to exactly its
    // physical capacity (no over-provisioning slack at all). Writing
    // every LBA once fills the device with entirely live data; a ninth
    // write — a rewrite of an already-live LBA — needs the frontier to
    // roll over, but predecessor invalidation for that very rewrite
    // hasn't been applied yet when the allocator looks for a victim, so
    // GC finds nothing to reclaim and the write is correctly refused.
    let geometry = Geometry {
        page_size: 64,
        oob_size: 8,
        pages_per_block: 4,
        blocks_per_chip: 2,
    };
    let hal = SimNand::new(geometry);
    let mut ftl = Ftl::init(
        FtlConfig {
            geometry,
            logical_pages: geometry.total_pages() as u32,
        },
        hal,
    )
    .unwrap();

    for lba in 0..8u32 {
        ftl.write(lba, &vec![0xCD; geometry.page_size]).unwrap();
    }
    let result = ftl.write(0, &vec![0xEF; geometry.page_size]);
    assert_eq!(result, Err(FtlError::DeviceFull));
}

#[test]
fn bad_blocks_are_never_chosen_as_the_active_frontier() {
    let hal = SimNand::with_bad_blocks(tiny_geometry(), &[0, 1]);
    let ftl = Ftl::init(tiny_config(16), hal).unwrap();

    // init must have skipped blocks 0 and 1 when picking the starting
    // frontier: 8 blocks total, minus 2 bad, minus 1 adopted as the
    // active frontier, leaves exactly 5 usable free blocks.
    assert_eq!(ftl.free_block_count(), tiny_geometry().blocks_per_chip - 2 - 1);
}

#[test]
fn bad_blocks_are_excluded_across_many_writes() {
    let hal = SimNand::with_bad_blocks(tiny_geometry(), &[0, 1, 2]);
    let mut ftl = Ftl::init(tiny_config(16), hal).unwrap();

    for i in 0..40u32 {
        let lba = i % 16;
        ftl.write(lba, &page((i % 200) as u8)).unwrap();
    }
    // Reaching here without a spurious BadBlock-shaped failure is itself
    // the property under test; spot-check one read too.
    let mut out = page(0);
    ftl.read(0, &mut out).unwrap();
}

#[test]
fn fault_injected_program_failure_is_reported_and_recoverable() {
    let mut hal = SimNand::new(tiny_geometry());
    hal.set_fault_plan(FaultPlan::none().fail_program_on_call(1));
    let mut ftl = Ftl::init(tiny_config(16), hal).unwrap();

    let err = ftl.write(3, &page(0x55)).unwrap_err();
    assert!(matches!(err, FtlError::HalProgramFailed { .. }));

    // The failed write must not have updated the mapping.
    let mut out = page(0);
    ftl.read(3, &mut out).unwrap();
    assert!(out.iter().all(|&b| b == 0xFF));

    // The next write (a fresh program call) must succeed normally.
    ftl.write(3, &page(0x66)).unwrap();
    ftl.read(3, &mut out).unwrap();
    assert_eq!(out, page(0x66));
}

#[test]
fn exit_is_idempotent() {
    let hal = SimNand::new(tiny_geometry());
    let mut ftl = Ftl::init(tiny_config(16), hal).unwrap();
    ftl.write(2, &page(0x77)).unwrap();

    ftl.exit();
    ftl.exit(); // must not panic, and must stay a no-op the second time
}
