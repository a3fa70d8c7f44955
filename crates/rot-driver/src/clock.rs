//! Accelerator clock gating
//!
//! The rotator's functional clock is owned by platform code, not by this
//! engine — the engine only needs to assert it around client sessions
//! (open/close). The [`ClockGate`] seam keeps that external: a platform
//! binding supplies a real gate, the simulator runs with [`NoopClock`].

use crate::error::Result;

/// Handle to the rotator's functional clock.
///
/// Register accesses are only meaningful while the clock is enabled;
/// the engine asserts it on `open` and releases it on `close`.
pub trait ClockGate: std::fmt::Debug + Send {
    /// Ungate the clock.
    ///
    /// # Errors
    ///
    /// Returns an error if the platform refuses the request.
    fn enable(&self) -> Result<()>;

    /// Gate the clock.
    ///
    /// # Errors
    ///
    /// Returns an error if the platform refuses the request.
    fn disable(&self) -> Result<()>;
}

/// Clock gate that does nothing — for the simulator and for platforms
/// that keep the rotator clock always on.
#[derive(Debug, Default, Clone, Copy)]
pub struct NoopClock;

impl ClockGate for NoopClock {
    fn enable(&self) -> Result<()> {
        Ok(())
    }

    fn disable(&self) -> Result<()> {
        Ok(())
    }
}
