//! Register map for the Exynos rotator block.
//!
//! All registers are 32-bit, offsets relative to the block's mapped base.
//! Buffer-size and crop-size words pack height in bits 31:16 and width in
//! bits 15:0; crop-position words pack y in 31:16 and x in 15:0.

// ── Configuration ────────────────────────────────────────────────────────────

/// Configuration register.
pub const CONFIG: usize = 0x00;
/// Interrupt-enable field (2 bits) in [`CONFIG`].
pub const CONFIG_IRQ: u32 = 3 << 8;

// ── Image control ────────────────────────────────────────────────────────────

/// Image control register: format, flip, rotation and the start bit.
pub const CONTROL: usize = 0x10;
/// Test-pattern write mode (diagnostic, unused by the driver).
pub const CONTROL_PATTERN_WRITE: u32 = 1 << 16;
/// Format field value: YCbCr 4:2:0 two-plane.
pub const CONTROL_FMT_YCBCR420_2P: u32 = 1 << 8;
/// Format field value: packed RGB888.
pub const CONTROL_FMT_RGB888: u32 = 6 << 8;
/// Mask of the 3-bit format field.
pub const CONTROL_FMT_MASK: u32 = 7 << 8;
/// Flip field value: vertical flip.
pub const CONTROL_FLIP_VERTICAL: u32 = 2 << 6;
/// Flip field value: horizontal flip.
pub const CONTROL_FLIP_HORIZONTAL: u32 = 3 << 6;
/// Mask of the 2-bit flip field.
pub const CONTROL_FLIP_MASK: u32 = 3 << 6;
/// Rotation field value: 90 degrees.
pub const CONTROL_ROT_90: u32 = 1 << 4;
/// Rotation field value: 180 degrees.
pub const CONTROL_ROT_180: u32 = 2 << 4;
/// Rotation field value: 270 degrees.
pub const CONTROL_ROT_270: u32 = 3 << 4;
/// Mask of the 2-bit rotation field.
pub const CONTROL_ROT_MASK: u32 = 3 << 4;
/// Start ("go") bit. Writing 1 begins the programmed operation.
pub const CONTROL_START: u32 = 1 << 0;

// ── Status ───────────────────────────────────────────────────────────────────

/// Status register: verdict field plus per-verdict pending flags.
pub const STATUS: usize = 0x20;
/// Verdict value carried in bits 9:8 when the operation completed.
pub const STATUS_IRQ_VAL_COMPLETE: u32 = 1;
/// Verdict value carried in bits 9:8 when the configuration was illegal.
pub const STATUS_IRQ_VAL_ILLEGAL: u32 = 2;
/// Bit index of the completion pending flag.
pub const STATUS_BIT_COMPLETE: u32 = 8;
/// Bit index of the illegal-configuration pending flag.
pub const STATUS_BIT_ILLEGAL: u32 = 9;

/// Pending flag for a given status bit index. Write-1-to-clear.
#[must_use]
pub const fn status_irq_pending(bit: u32) -> u32 {
    1 << bit
}

/// Extract the 2-bit verdict field from a raw status word.
#[must_use]
pub const fn status_irq(value: u32) -> u32 {
    (value >> 8) & 0x3
}

// ── Source registers ─────────────────────────────────────────────────────────

/// Source buffer address register for plane slot `n` (0..3).
#[must_use]
pub const fn src_buf_addr(n: usize) -> usize {
    0x30 + (n << 2)
}

/// Source buffer full-size register.
pub const SRC_BUF_SIZE: usize = 0x3c;
/// Source crop position register.
pub const SRC_CROP_POS: usize = 0x40;
/// Source crop size register.
pub const SRC_CROP_SIZE: usize = 0x44;

// ── Destination registers ────────────────────────────────────────────────────

/// Destination buffer address register for plane slot `n` (0..3).
#[must_use]
pub const fn dst_buf_addr(n: usize) -> usize {
    0x50 + (n << 2)
}

/// Destination buffer full-size register.
pub const DST_BUF_SIZE: usize = 0x5c;
/// Destination crop position register.
///
/// There is no destination crop *size* register: the hardware takes the
/// destination crop size to equal the source's.
pub const DST_CROP_POS: usize = 0x60;

/// Highest register offset in the block, inclusive. Used by the dump path.
pub const LAST_REG: usize = DST_CROP_POS;

// ── Word packing ─────────────────────────────────────────────────────────────

/// Pack a width/height pair into a buffer-size or crop-size word.
///
/// Each half-word holds 16 bits; larger values would silently program a
/// truncated size, so debug builds assert the range.
#[must_use]
pub const fn pack_size(w: u32, h: u32) -> u32 {
    debug_assert!(w <= 0xffff && h <= 0xffff, "size fits 16 bits per axis");
    (h << 16) | w
}

/// Pack an x/y pair into a crop-position word.
#[must_use]
pub const fn pack_pos(x: u32, y: u32) -> u32 {
    debug_assert!(x <= 0xffff && y <= 0xffff, "position fits 16 bits per axis");
    (y << 16) | x
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn control_fields_do_not_overlap() {
        assert_eq!(CONTROL_FMT_MASK & CONTROL_FLIP_MASK, 0);
        assert_eq!(CONTROL_FLIP_MASK & CONTROL_ROT_MASK, 0);
        assert_eq!(CONTROL_ROT_MASK & CONTROL_START, 0);
        assert_eq!(CONTROL_FMT_MASK & CONTROL_PATTERN_WRITE, 0);
    }

    #[test]
    fn format_values_fit_their_mask() {
        assert_eq!(CONTROL_FMT_YCBCR420_2P & !CONTROL_FMT_MASK, 0);
        assert_eq!(CONTROL_FMT_RGB888 & !CONTROL_FMT_MASK, 0);
        assert_eq!(CONTROL_FLIP_VERTICAL & !CONTROL_FLIP_MASK, 0);
        assert_eq!(CONTROL_ROT_270 & !CONTROL_ROT_MASK, 0);
    }

    #[test]
    fn address_slots_are_word_spaced() {
        assert_eq!(src_buf_addr(0), 0x30);
        assert_eq!(src_buf_addr(2), 0x38);
        assert_eq!(dst_buf_addr(0), 0x50);
        assert_eq!(dst_buf_addr(2), 0x58);
        // Slot 3 of the source range is the buffer-size register.
        assert_eq!(src_buf_addr(3), SRC_BUF_SIZE);
    }

    #[test]
    fn verdict_decodes_from_bits_9_8() {
        assert_eq!(status_irq(1 << 8), STATUS_IRQ_VAL_COMPLETE);
        assert_eq!(status_irq(1 << 9), STATUS_IRQ_VAL_ILLEGAL);
        assert_eq!(status_irq(0), 0);
        // Low bits do not leak into the verdict.
        assert_eq!(status_irq(0xff), 0);
    }

    #[test]
    fn size_and_pos_packing() {
        assert_eq!(pack_size(64, 128), (128 << 16) | 64);
        assert_eq!(pack_pos(3, 7), (7 << 16) | 3);
        assert_eq!(pack_size(0, 0), 0);
    }

    #[cfg(debug_assertions)]
    #[test]
    #[should_panic(expected = "16 bits")]
    fn oversized_dimension_is_caught_in_debug_builds() {
        let _ = pack_size(0x1_0000, 1);
    }

    #[cfg(debug_assertions)]
    #[test]
    #[should_panic(expected = "16 bits")]
    fn oversized_position_is_caught_in_debug_builds() {
        let _ = pack_pos(1, 0x1_0000);
    }
}
