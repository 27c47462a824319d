//! Process-lifetime counters, exposed so tests (and callers) can observe
//! that GC actually ran without reaching into private state.

/// A snapshot of FTL-wide counters.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct FtlStats {
    /// Number of GC passes that found a victim and erased it.
    pub gc_passes: u64,
    /// Number of pages successfully programmed via the public `write` path,
    /// including GC copy-back writes.
    pub pages_written: u64,
}
