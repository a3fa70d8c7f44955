//! Hardware surface implementations
//!
//! The rotator's validation and sequencing logic never touches memory-mapped
//! I/O directly — it goes through the [`RegisterSurface`] capability, so the
//! same engine runs against real hardware and against the register-file
//! simulator.
//!
//! Two surfaces available:
//! - **UIO**: memory-mapped registers of a real rotator block exposed
//!   through a `uio_pdrv_genirq` device (pure Rust, `rustix` mmap)
//! - **Sim**: in-memory register file with the rotator's latching
//!   behavior, for tests and CI without hardware

pub mod sim;
pub mod uio;

pub use sim::SimSurface;
pub use uio::UioSurface;

/// One memory-mapped register bank, addressed by byte offset.
///
/// Every call is exactly one bus transaction: no caching, no reordering.
/// The order of calls matters and must match the issuing sequence.
pub trait RegisterSurface: std::fmt::Debug + Send + Sync {
    /// Read a 32-bit register at `offset` bytes from the block base.
    fn read32(&self, offset: usize) -> u32;

    /// Write a 32-bit register at `offset` bytes from the block base.
    fn write32(&self, offset: usize, value: u32);
}

impl<S: RegisterSurface + ?Sized> RegisterSurface for std::sync::Arc<S> {
    fn read32(&self, offset: usize) -> u32 {
        (**self).read32(offset)
    }

    fn write32(&self, offset: usize, value: u32) {
        (**self).write32(offset, value);
    }
}
