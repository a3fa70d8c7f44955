//! Typed register operations
//!
//! One operation per hardware field group, each issuing exactly the bus
//! transactions of the underlying surface: fields inside `CONTROL` and
//! `CONFIG` are read-modify-write so neighboring fields survive, address
//! and geometry registers are plain writes. No caching, no reordering —
//! the engine's issuing sequence is the programming sequence.

use rot_chip::regs;
use tracing::error;

use crate::pipeline::{Flip, ImageFormat, PlaneAddrs, Rotation, PLANE_COUNT};
use crate::surface::RegisterSurface;

/// Verdict carried by the status register after an operation.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum IrqStatus {
    /// The programmed operation finished.
    Complete,
    /// The register configuration was illegal; nothing was produced.
    Illegal,
}

impl IrqStatus {
    /// Bit index of this verdict's pending flag in the status register.
    #[must_use]
    pub const fn pending_bit(self) -> u32 {
        match self {
            Self::Complete => regs::STATUS_BIT_COMPLETE,
            Self::Illegal => regs::STATUS_BIT_ILLEGAL,
        }
    }
}

/// Typed view of the rotator's register bank.
#[derive(Debug)]
pub struct RotRegisters<S> {
    surface: S,
}

impl<S: RegisterSurface> RotRegisters<S> {
    /// Wrap a hardware surface.
    pub const fn new(surface: S) -> Self {
        Self { surface }
    }

    /// The underlying surface (interrupt waits, test inspection).
    pub const fn surface(&self) -> &S {
        &self.surface
    }

    /// Enable or disable the completion/illegal interrupt pair.
    pub fn set_irq_enable(&self, enable: bool) {
        let mut value = self.surface.read32(regs::CONFIG);
        if enable {
            value |= regs::CONFIG_IRQ;
        } else {
            value &= !regs::CONFIG_IRQ;
        }
        self.surface.write32(regs::CONFIG, value);
    }

    /// Program the shared image format field.
    pub fn set_format(&self, format: ImageFormat) {
        let mut value = self.surface.read32(regs::CONTROL);
        value &= !regs::CONTROL_FMT_MASK;
        value |= match format {
            ImageFormat::Nv12 | ImageFormat::Nv12M => regs::CONTROL_FMT_YCBCR420_2P,
            ImageFormat::Xrgb8888 => regs::CONTROL_FMT_RGB888,
        };
        self.surface.write32(regs::CONTROL, value);
    }

    /// Program the flip field.
    pub fn set_flip(&self, flip: Flip) {
        let mut value = self.surface.read32(regs::CONTROL);
        value &= !regs::CONTROL_FLIP_MASK;
        match flip {
            Flip::Vertical => value |= regs::CONTROL_FLIP_VERTICAL,
            Flip::Horizontal => value |= regs::CONTROL_FLIP_HORIZONTAL,
            Flip::None => {}
        }
        self.surface.write32(regs::CONTROL, value);
    }

    /// Program the rotation field.
    pub fn set_rotation(&self, rotation: Rotation) {
        let mut value = self.surface.read32(regs::CONTROL);
        value &= !regs::CONTROL_ROT_MASK;
        match rotation {
            Rotation::R90 => value |= regs::CONTROL_ROT_90,
            Rotation::R180 => value |= regs::CONTROL_ROT_180,
            Rotation::R270 => value |= regs::CONTROL_ROT_270,
            Rotation::R0 => {}
        }
        self.surface.write32(regs::CONTROL, value);
    }

    /// Set the go bit, starting the programmed operation.
    pub fn set_start(&self) {
        let value = self.surface.read32(regs::CONTROL);
        self.surface.write32(regs::CONTROL, value | regs::CONTROL_START);
    }

    /// Read and decode the verdict from the status register.
    ///
    /// Anything other than the completion code is reported as illegal,
    /// matching the hardware's two-verdict contract.
    pub fn irq_status(&self) -> IrqStatus {
        let value = regs::status_irq(self.surface.read32(regs::STATUS));
        if value == regs::STATUS_IRQ_VAL_COMPLETE {
            IrqStatus::Complete
        } else {
            IrqStatus::Illegal
        }
    }

    /// Clear the pending flag belonging to one verdict (write-1-to-clear).
    pub fn clear_irq_status(&self, status: IrqStatus) {
        let value = self.surface.read32(regs::STATUS);
        self.surface.write32(
            regs::STATUS,
            value | regs::status_irq_pending(status.pending_bit()),
        );
    }

    /// Program all source plane address slots.
    pub fn set_src_buf_addrs(&self, addrs: PlaneAddrs) {
        for i in 0..PLANE_COUNT {
            self.surface.write32(regs::src_buf_addr(i), addrs.0[i]);
        }
    }

    /// Program the source buffer full size.
    pub fn set_src_buf_size(&self, w: u32, h: u32) {
        self.surface.write32(regs::SRC_BUF_SIZE, regs::pack_size(w, h));
    }

    /// Program the source crop position.
    pub fn set_src_crop_pos(&self, x: u32, y: u32) {
        self.surface.write32(regs::SRC_CROP_POS, regs::pack_pos(x, y));
    }

    /// Program the source crop size.
    pub fn set_src_crop_size(&self, w: u32, h: u32) {
        self.surface.write32(regs::SRC_CROP_SIZE, regs::pack_size(w, h));
    }

    /// Program all destination plane address slots.
    pub fn set_dst_buf_addrs(&self, addrs: PlaneAddrs) {
        for i in 0..PLANE_COUNT {
            self.surface.write32(regs::dst_buf_addr(i), addrs.0[i]);
        }
    }

    /// Program the destination buffer full size.
    pub fn set_dst_buf_size(&self, w: u32, h: u32) {
        self.surface.write32(regs::DST_BUF_SIZE, regs::pack_size(w, h));
    }

    /// Program the destination crop position.
    ///
    /// There is no destination crop size register: the hardware takes it
    /// to equal the source crop size.
    pub fn set_dst_crop_pos(&self, x: u32, y: u32) {
        self.surface.write32(regs::DST_CROP_POS, regs::pack_pos(x, y));
    }

    /// Log the whole register bank at error level for diagnosis.
    pub fn dump(&self) {
        for offset in (0..=regs::LAST_REG).step_by(4) {
            let value = self.surface.read32(offset);
            error!("rotator reg [{offset:#04x}] = {value:#010x}");
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::surface::SimSurface;

    fn regs_over_sim() -> RotRegisters<SimSurface> {
        RotRegisters::new(SimSurface::new())
    }

    #[test]
    fn irq_enable_toggles_only_the_irq_field() {
        let r = regs_over_sim();
        r.set_irq_enable(true);
        assert_eq!(r.surface().read32(regs::CONFIG), regs::CONFIG_IRQ);
        r.set_irq_enable(false);
        assert_eq!(r.surface().read32(regs::CONFIG), 0);
    }

    #[test]
    fn control_fields_are_read_modify_write() {
        let r = regs_over_sim();
        r.set_format(ImageFormat::Xrgb8888);
        r.set_flip(Flip::Vertical);
        r.set_rotation(Rotation::R270);

        let control = r.surface().read32(regs::CONTROL);
        assert_eq!(control & regs::CONTROL_FMT_MASK, regs::CONTROL_FMT_RGB888);
        assert_eq!(control & regs::CONTROL_FLIP_MASK, regs::CONTROL_FLIP_VERTICAL);
        assert_eq!(control & regs::CONTROL_ROT_MASK, regs::CONTROL_ROT_270);

        // Reprogramming one field leaves the others intact.
        r.set_rotation(Rotation::R90);
        let control = r.surface().read32(regs::CONTROL);
        assert_eq!(control & regs::CONTROL_FMT_MASK, regs::CONTROL_FMT_RGB888);
        assert_eq!(control & regs::CONTROL_FLIP_MASK, regs::CONTROL_FLIP_VERTICAL);
        assert_eq!(control & regs::CONTROL_ROT_MASK, regs::CONTROL_ROT_90);
    }

    #[test]
    fn both_nv12_variants_share_the_planar_encoding() {
        let r = regs_over_sim();
        r.set_format(ImageFormat::Nv12);
        let planar = r.surface().read32(regs::CONTROL) & regs::CONTROL_FMT_MASK;
        r.set_format(ImageFormat::Nv12M);
        assert_eq!(
            r.surface().read32(regs::CONTROL) & regs::CONTROL_FMT_MASK,
            planar
        );
        assert_eq!(planar, regs::CONTROL_FMT_YCBCR420_2P);
    }

    #[test]
    fn verdict_decode_and_targeted_clear() {
        let r = regs_over_sim();
        r.set_start();
        assert_eq!(r.irq_status(), IrqStatus::Complete);
        r.clear_irq_status(IrqStatus::Complete);
        assert!(!r.surface().irq_pending());

        r.surface().fail_next_start();
        r.set_start();
        assert_eq!(r.irq_status(), IrqStatus::Illegal);
        r.clear_irq_status(IrqStatus::Illegal);
        assert!(!r.surface().irq_pending());
    }

    #[test]
    fn geometry_registers_pack_height_high() {
        let r = regs_over_sim();
        r.set_src_buf_size(128, 256);
        assert_eq!(r.surface().read32(regs::SRC_BUF_SIZE), (256 << 16) | 128);
        r.set_src_crop_pos(8, 24);
        assert_eq!(r.surface().read32(regs::SRC_CROP_POS), (24 << 16) | 8);
        r.set_src_crop_size(64, 64);
        assert_eq!(r.surface().read32(regs::SRC_CROP_SIZE), (64 << 16) | 64);
        r.set_dst_buf_size(256, 128);
        assert_eq!(r.surface().read32(regs::DST_BUF_SIZE), (128 << 16) | 256);
    }

    #[test]
    fn address_slots_land_in_their_registers() {
        let r = regs_over_sim();
        r.set_src_buf_addrs(PlaneAddrs([0x10, 0x20, 0x30]));
        assert_eq!(r.surface().read32(regs::src_buf_addr(0)), 0x10);
        assert_eq!(r.surface().read32(regs::src_buf_addr(1)), 0x20);
        assert_eq!(r.surface().read32(regs::src_buf_addr(2)), 0x30);
        r.set_dst_buf_addrs(PlaneAddrs([0x40, 0x50, 0x60]));
        assert_eq!(r.surface().read32(regs::dst_buf_addr(1)), 0x50);
    }
}
