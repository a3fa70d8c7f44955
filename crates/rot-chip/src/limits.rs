//! Per-format size limits and the crop alignment algorithm.
//!
//! The rotator constrains crop width/height per pixel format: a minimum,
//! a maximum, and a power-of-two alignment boundary. Requested sizes are
//! rounded to the *nearest* aligned value first and only then compared to
//! the bounds — rounding can push a borderline value across a bound, and
//! the hardware validation assumes this exact order.

/// Size limits for one pixel-format class.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RotLimit {
    /// Minimum crop width in pixels.
    pub min_w: u32,
    /// Minimum crop height in pixels.
    pub min_h: u32,
    /// Maximum crop width in pixels.
    pub max_w: u32,
    /// Maximum crop height in pixels.
    pub max_h: u32,
    /// Alignment exponent: sizes snap to `1 << align` pixel boundaries.
    /// Must be at least 1.
    pub align: u32,
}

impl RotLimit {
    /// Snap a requested crop width/height onto hardware-legal values.
    ///
    /// Each axis is rounded to the nearest `1 << align` multiple, then
    /// clamped: below-minimum values become the minimum rounded *up* to
    /// the boundary, above-maximum values the maximum rounded *down*.
    ///
    /// This silently widens or shrinks the request — callers must re-read
    /// the result rather than assume their input was honored verbatim.
    #[must_use]
    pub const fn align_size(&self, w: u32, h: u32) -> (u32, u32) {
        (
            self.align_axis(w, self.min_w, self.max_w),
            self.align_axis(h, self.min_h, self.max_h),
        )
    }

    #[allow(clippy::cast_possible_truncation)] // results are clamped to u32 limits
    const fn align_axis(&self, value: u32, min: u32, max: u32) -> u32 {
        // Widened so rounding near u32::MAX cannot wrap; every branch
        // produces a value bounded by the u32 limits.
        let mask = !((1u64 << self.align) - 1);
        // Round to nearest aligned value.
        let rounded = (value as u64 + (1 << (self.align - 1))) & mask;
        if rounded < min as u64 {
            // Minimum rounded up to the boundary.
            ((min as u64 + !mask) & mask) as u32
        } else if rounded > max as u64 {
            // Maximum rounded down to the boundary.
            (max as u64 & mask) as u32
        } else {
            rounded as u32
        }
    }
}

/// Limit table for the two format classes the rotator supports.
///
/// Immutable — construct once at device attach and hand it to the
/// pipeline by value.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct LimitTable {
    /// Limits for planar YCbCr 4:2:0 (two-plane) images.
    pub ycbcr420_2p: RotLimit,
    /// Limits for packed RGB888 images.
    pub rgb888: RotLimit,
}

impl LimitTable {
    /// Limits for the Exynos4210 rotator block.
    #[must_use]
    pub const fn exynos4210() -> Self {
        Self {
            ycbcr420_2p: RotLimit {
                min_w: 32,
                min_h: 32,
                max_w: 32 * 1024,
                max_h: 32 * 1024,
                align: 3,
            },
            rgb888: RotLimit {
                min_w: 8,
                min_h: 8,
                max_w: 8 * 1024,
                max_h: 8 * 1024,
                align: 2,
            },
        }
    }
}
