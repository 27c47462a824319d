// =============================================================================
// ftl-core — FTL Configuration
// =============================================================================
//
// The reference geometry and logical address space size are not hardwired
// constants: `init` takes an explicit `FtlConfig` so alternate device shapes
// (a deliberately tiny 2-block device for the device-full test, or a device
// with injected bad blocks) can be exercised without recompiling anything.
// =============================================================================

use ftl_hal::Geometry;

use crate::error::FtlError;

/// The logical and physical shape an `Ftl` is initialized with.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FtlConfig {
    /// Physical device geometry (page/OOB size, block layout).
    pub geometry: Geometry,
    /// Size of the logical address space, in pages.
    pub logical_pages: u32,
}

impl FtlConfig {
    /// The reference configuration: 4 KiB pages, 128 B OOB, 64 pages/block,
    /// 1024 blocks/chip, 60,000 logical pages (~65,536 physical pages of
    /// over-provisioning headroom for GC forward progress).
    pub const fn reference() -> Self {
        Self {
            geometry: Geometry::reference(),
            logical_pages: 60_000,
        }
    }

    /// Validates the invariant `logical_pages <= blocks_per_chip *
    /// pages_per_block` and that the geometry describes a non-empty device.
    ///
    /// Does **not** check bad-block placement — a device that turns out to
    /// have no usable starting block is instead reported by
    /// [`crate::Ftl::init`] once it consults the HAL.
    pub fn validate(&self) -> Result<(), FtlError> {
        if self.geometry.pages_per_block == 0 || self.geometry.blocks_per_chip == 0 {
            return Err(FtlError::InvalidConfig("device has zero pages or zero blocks"));
        }
        if self.logical_pages == 0 {
            return Err(FtlError::InvalidConfig("logical address space is empty"));
        }
        if (self.logical_pages as u64) > self.geometry.total_pages() {
            return Err(FtlError::InvalidConfig(
                "logical_pages exceeds total physical capacity — GC could never make forward progress",
            ));
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn reference_config_is_valid() {
        FtlConfig::reference().validate().unwrap();
    }

    #[test]
    fn logical_pages_exceeding_capacity_is_rejected() {
        let config = FtlConfig {
            geometry: Geometry {
                page_size: 4096,
                oob_size: 128,
                pages_per_block: 4,
                blocks_per_chip: 2,
            },
            logical_pages: 9, // capacity is 8
        };
        assert!(matches!(config.validate(), Err(FtlError::InvalidConfig(_))));
    }

    #[test]
    fn zero_sized_device_is_rejected() {
        let config = FtlConfig {
            geometry: Geometry {
                page_size: 4096,
                oob_size: 128,
                pages_per_block: 0,
                blocks_per_chip: 2,
            },
            logical_pages: 1,
        };
        assert!(matches!(config.validate(), Err(FtlError::InvalidConfig(_))));
    }
}
