//! Userspace control engine for the Exynos image rotator block.
//!
//! Validates a requested source/destination image transform (format,
//! crop geometry, buffer layout, rotation/flip), programs the rotator's
//! register set to match, starts the operation, and classifies the
//! resulting interrupt as completion or illegal configuration.
//!
//! # Surface hierarchy
//!
//! ```text
//! Hardware:
//!   UioSurface — /dev/uioN register mapping + interrupt fd
//!
//! Development / CI:
//!   SimSurface — in-memory register file with rotator latching
//! ```
//!
//! # Quick start
//!
//! ```
//! use rot_driver::prelude::*;
//!
//! # fn main() -> rot_driver::Result<()> {
//! let (mut rot, events) = Rotator::new(
//!     SimSurface::new(),
//!     LimitTable::exynos4210(),
//!     Box::new(NoopClock),
//! );
//! rot.open()?;
//!
//! // Source: 64x64 crop of a 128x128 NV12 buffer, identity transform.
//! rot.src_set_transform(Rotation::R0, Flip::None)?;
//! rot.src_set_size(
//!     Geometry { x: 0, y: 0, w: 64, h: 64 },
//!     BufferSize { hsize: 128, vsize: 128 },
//! )?;
//! rot.src_set_format(ImageFormat::Nv12);
//! rot.src_set_addr(PlaneAddrs([0x4000_0000, 0, 0]), BufControl::Map);
//!
//! // Destination: rotate 90°.
//! let swap = rot.dst_set_transform(Rotation::R90, Flip::None);
//! assert!(swap);
//! rot.dst_set_size(
//!     Geometry { x: 0, y: 0, w: 64, h: 64 },
//!     BufferSize { hsize: 128, vsize: 128 },
//! )?;
//! rot.dst_set_format(ImageFormat::Nv12)?;
//! rot.dst_set_addr(PlaneAddrs([0x4800_0000, 0, 0]), BufControl::Map);
//!
//! rot.start()?;
//! rot.handle_irq(); // interrupt context in a real binding
//! assert_eq!(events.recv().unwrap(), RotEvent::Complete);
//! # Ok(())
//! # }
//! ```
//!
//! The engine is single-outstanding-request: configuration calls for one
//! device must be serialized by the caller, and a new `start()` must wait
//! for the previous operation's event.

#![warn(missing_docs)]
#![warn(clippy::all, clippy::pedantic)]
#![allow(clippy::module_name_repetitions)]
#![allow(clippy::must_use_candidate)]

pub mod clock;
mod engine;
mod error;
pub mod pipeline;
mod registers;
pub mod surface;

pub use clock::{ClockGate, NoopClock};
pub use engine::{ExecState, IrqDisposition, RotEvent, Rotator};
pub use error::{Result, RotError};
pub use pipeline::{
    BufControl, BufferSize, EndpointConfig, Flip, Geometry, ImageFormat, Plane, PlaneAddrs,
    Rotation, TransformRequest, PLANE_COUNT,
};
pub use registers::{IrqStatus, RotRegisters};
pub use surface::{RegisterSurface, SimSurface, UioSurface};

/// Commonly used types.
pub mod prelude {
    pub use crate::{
        BufControl, BufferSize, Flip, Geometry, ImageFormat, NoopClock, Plane, PlaneAddrs, Result,
        RotEvent, Rotator, Rotation, SimSurface,
    };
    pub use rot_chip::limits::LimitTable;
}
