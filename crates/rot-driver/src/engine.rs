//! Rotator engine: configuration sequencing and the completion state machine
//!
//! [`Rotator`] owns the typed register model, the in-flight
//! [`TransformRequest`] and the suspended flag. Each configuration call
//! validates first and only then issues its register writes — a rejected
//! call produces zero register traffic, while the writes of an accepted
//! call are unconditional and never rolled back (write-through, no
//! batching).
//!
//! Execution is interrupt-driven: `start()` arms the interrupt and sets
//! the go bit, then [`Rotator::handle_irq`] later classifies the
//! hardware verdict and emits exactly one completion event per start.
//! Nothing is returned synchronously from `start()` beyond "the command
//! was issued".
//!
//! Concurrency contract: one outstanding request per device, serialized
//! by the caller; only the suspended flag is touched from outside the
//! configuration path (power-management notifications) and it is
//! sequentially consistent with respect to `start()`.

use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::mpsc::{sync_channel, Receiver, SyncSender};

use rot_chip::limits::LimitTable;
use tracing::{debug, error, warn};

use crate::clock::ClockGate;
use crate::error::{Result, RotError};
use crate::pipeline::{BufControl, BufferSize, Flip, Geometry, ImageFormat, PlaneAddrs, Rotation, TransformRequest};
use crate::registers::{IrqStatus, RotRegisters};
use crate::surface::RegisterSurface;

/// Completion event delivered to the owning framework, exactly one per
/// `start()`. Carries no payload beyond the verdict.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RotEvent {
    /// The operation completed.
    Complete,
    /// The hardware reported an illegal register configuration.
    IllegalConfig,
}

/// Execution state of the engine.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ExecState {
    /// No operation in flight; ready to configure and start.
    Idle,
    /// Go bit set, waiting for the interrupt verdict.
    Armed,
}

/// Interrupt disposition. The rotator interrupt is always acknowledged
/// as handled, whichever verdict it carried.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum IrqDisposition {
    /// The interrupt belonged to this device and was serviced.
    Handled,
}

/// Control engine for one rotator instance.
#[derive(Debug)]
pub struct Rotator<S> {
    regs: RotRegisters<S>,
    limits: LimitTable,
    request: TransformRequest,
    clock: Box<dyn ClockGate>,
    suspended: AtomicBool,
    state: ExecState,
    events: SyncSender<RotEvent>,
}

impl<S: RegisterSurface> Rotator<S> {
    /// Create an engine over a hardware surface.
    ///
    /// Returns the engine plus the receiving end of its event channel.
    /// The channel is bounded at one slot: the caller must observe the
    /// event for an operation before issuing the next `start()`.
    pub fn new(surface: S, limits: LimitTable, clock: Box<dyn ClockGate>) -> (Self, Receiver<RotEvent>) {
        let (events, rx) = sync_channel(1);
        (
            Self {
                regs: RotRegisters::new(surface),
                limits,
                request: TransformRequest::default(),
                clock,
                suspended: AtomicBool::new(false),
                state: ExecState::Idle,
                events,
            },
            rx,
        )
    }

    /// The typed register model (interrupt waits, diagnostics).
    pub const fn registers(&self) -> &RotRegisters<S> {
        &self.regs
    }

    /// The in-flight request as configured so far.
    pub const fn request(&self) -> &TransformRequest {
        &self.request
    }

    /// Current execution state.
    pub const fn exec_state(&self) -> ExecState {
        self.state
    }

    // ── Source endpoint ──────────────────────────────────────────────────

    /// Set the source transform. Only the identity is legal; the
    /// commanded rotation/flip live on the destination endpoint.
    /// No registers are written.
    ///
    /// # Errors
    ///
    /// Returns [`RotError::InvalidTransform`] for non-identity input.
    pub fn src_set_transform(&mut self, rotation: Rotation, flip: Flip) -> Result<()> {
        self.request.set_src_transform(rotation, flip)
    }

    /// Set the source crop and buffer size, programming the source
    /// buffer-size, crop-position and crop-size registers.
    ///
    /// # Errors
    ///
    /// Returns [`RotError::OutOfBounds`] if the crop does not fit; no
    /// registers are written in that case.
    pub fn src_set_size(&mut self, pos: Geometry, sz: BufferSize) -> Result<()> {
        self.request.set_src_size(pos, sz)?;

        let src = self.request.src();
        self.regs.set_src_buf_size(src.buffer.hsize, src.buffer.vsize);
        self.regs.set_src_crop_pos(src.geometry.x, src.geometry.y);
        self.regs.set_src_crop_size(src.geometry.w, src.geometry.h);
        Ok(())
    }

    /// Set the source format, snapping the source crop onto the format's
    /// alignment grid. The shared format register is programmed from the
    /// destination side only, so no registers are written here.
    pub fn src_set_format(&mut self, format: ImageFormat) {
        self.request.set_src_format(format, &self.limits);
    }

    /// Supply source plane addresses, programming one address register
    /// per plane slot. For contiguous NV12 under `Map`, the chroma
    /// address is derived from the luma base and the crop size.
    pub fn src_set_addr(&mut self, base: PlaneAddrs, ctrl: BufControl) {
        let resolved = self.request.set_src_addrs(base, ctrl);
        self.regs.set_src_buf_addrs(resolved);
    }

    // ── Destination endpoint ─────────────────────────────────────────────

    /// Set the destination transform — the operation's commanded rotation
    /// and flip — programming the flip and rotation registers
    /// immediately. Returns whether the rotation swaps the width/height
    /// axes for downstream size checks.
    pub fn dst_set_transform(&mut self, rotation: Rotation, flip: Flip) -> bool {
        let swap = self.request.set_dst_transform(rotation, flip);

        self.regs.set_flip(flip);
        self.regs.set_rotation(rotation);
        swap
    }

    /// Set the destination crop and buffer size, programming the
    /// destination buffer-size and crop-position registers. The crop
    /// size must equal the source's and is never separately programmed.
    ///
    /// # Errors
    ///
    /// Returns [`RotError::SizeMismatch`] or [`RotError::OutOfBounds`];
    /// no registers are written in that case.
    pub fn dst_set_size(&mut self, pos: Geometry, sz: BufferSize) -> Result<()> {
        self.request.set_dst_size(pos, sz)?;

        let dst = self.request.dst();
        self.regs.set_dst_buf_size(dst.buffer.hsize, dst.buffer.vsize);
        self.regs.set_dst_crop_pos(dst.geometry.x, dst.geometry.y);
        Ok(())
    }

    /// Set the destination format, which must equal the source's, and
    /// program the shared format register.
    ///
    /// # Errors
    ///
    /// Returns [`RotError::FormatMismatch`]; the format register is left
    /// unprogrammed in that case.
    pub fn dst_set_format(&mut self, format: ImageFormat) -> Result<()> {
        self.request.set_dst_format(format, &self.limits)?;

        self.regs.set_format(format);
        Ok(())
    }

    /// Supply destination plane addresses, programming one address
    /// register per plane slot.
    pub fn dst_set_addr(&mut self, base: PlaneAddrs, ctrl: BufControl) {
        let resolved = self.request.set_dst_addrs(base, ctrl);
        self.regs.set_dst_buf_addrs(resolved);
    }

    // ── Execution ────────────────────────────────────────────────────────

    /// Arm the completion interrupt and set the go bit.
    ///
    /// Non-blocking: success means only that the command was issued.
    /// The operation's outcome arrives later through the event channel.
    ///
    /// # Errors
    ///
    /// Returns [`RotError::DeviceSuspended`] while suspended, with no
    /// register writes.
    pub fn start(&mut self) -> Result<()> {
        if self.suspended.load(Ordering::SeqCst) {
            return Err(RotError::DeviceSuspended);
        }
        if self.state == ExecState::Armed {
            warn!("start issued before the previous operation's event was observed");
        }

        self.regs.set_irq_enable(true);
        self.regs.set_start();
        self.state = ExecState::Armed;
        debug!("rotator armed");
        Ok(())
    }

    /// Service the rotator interrupt: read the verdict, clear its
    /// pending flag, emit the completion event and return to idle.
    ///
    /// On an illegal-configuration verdict the full register bank is
    /// dumped at error level for diagnosis. The interrupt is always
    /// acknowledged as handled.
    pub fn handle_irq(&mut self) -> IrqDisposition {
        let status = self.regs.irq_status();
        self.regs.clear_irq_status(status);

        let event = match status {
            IrqStatus::Complete => RotEvent::Complete,
            IrqStatus::Illegal => {
                error!("rotator reported an illegal register configuration");
                self.regs.dump();
                RotEvent::IllegalConfig
            }
        };

        self.state = ExecState::Idle;
        if self.events.try_send(event).is_err() {
            warn!("completion event dropped: receiver full or gone");
        }
        IrqDisposition::Handled
    }

    // ── Power / lifecycle ────────────────────────────────────────────────

    /// Block new starts. An in-flight operation is not cancelled — it
    /// runs to its hardware verdict.
    pub fn suspend(&self) {
        self.suspended.store(true, Ordering::SeqCst);
    }

    /// Allow starts again.
    pub fn resume(&self) {
        self.suspended.store(false, Ordering::SeqCst);
    }

    /// Whether the device is currently suspended.
    pub fn is_suspended(&self) -> bool {
        self.suspended.load(Ordering::SeqCst)
    }

    /// Client session opened: ungate the rotator clock.
    ///
    /// # Errors
    ///
    /// Returns an error if the clock cannot be enabled.
    pub fn open(&self) -> Result<()> {
        self.clock.enable()
    }

    /// Client session closed: gate the rotator clock.
    ///
    /// # Errors
    ///
    /// Returns an error if the clock cannot be disabled.
    pub fn close(&self) -> Result<()> {
        self.clock.disable()
    }
}
