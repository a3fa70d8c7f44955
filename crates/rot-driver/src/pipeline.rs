//! Transform pipeline state and validation
//!
//! A [`TransformRequest`] is built incrementally by the owning framework:
//! transform, size, format and addresses for the source endpoint, then the
//! same for the destination. The methods here hold every cross-endpoint
//! rule — equal crop size (no scaling), equal format (no conversion),
//! axis-swapped bounds under 90°/270° rotation — and mutate state only
//! when the whole call validates. Register traffic is the engine's job;
//! nothing in this module touches hardware.

use rot_chip::limits::{LimitTable, RotLimit};

use crate::error::{Result, RotError};

/// Pixel formats the rotator supports.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ImageFormat {
    /// Packed 32-bit XRGB.
    Xrgb8888,
    /// YCbCr 4:2:0, luma and interleaved chroma in one contiguous buffer.
    Nv12,
    /// YCbCr 4:2:0, luma and chroma in separately allocated planes.
    Nv12M,
}

/// fourcc for `XRGB8888` ('XR24').
pub const FOURCC_XRGB8888: u32 = 0x3432_5258;
/// fourcc for `NV12` ('NV12').
pub const FOURCC_NV12: u32 = 0x3231_564E;
/// fourcc for the multi-plane `NV12M` variant ('NM12').
pub const FOURCC_NV12M: u32 = 0x3231_4D4E;

impl ImageFormat {
    /// Map a DRM fourcc code onto a supported format.
    ///
    /// # Errors
    ///
    /// Returns [`RotError::InvalidFormat`] for any other code.
    pub fn from_fourcc(fourcc: u32) -> Result<Self> {
        match fourcc {
            FOURCC_XRGB8888 => Ok(Self::Xrgb8888),
            FOURCC_NV12 => Ok(Self::Nv12),
            FOURCC_NV12M => Ok(Self::Nv12M),
            _ => Err(RotError::InvalidFormat { fourcc }),
        }
    }

    /// The fourcc code for this format.
    #[must_use]
    pub const fn fourcc(self) -> u32 {
        match self {
            Self::Xrgb8888 => FOURCC_XRGB8888,
            Self::Nv12 => FOURCC_NV12,
            Self::Nv12M => FOURCC_NV12M,
        }
    }

    /// Select the limit entry governing this format.
    #[must_use]
    pub const fn limit(self, table: &LimitTable) -> &RotLimit {
        match self {
            Self::Xrgb8888 => &table.rgb888,
            Self::Nv12 | Self::Nv12M => &table.ycbcr420_2p,
        }
    }
}

/// Rotation applied by the destination transform.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Rotation {
    /// No rotation.
    #[default]
    R0,
    /// 90° clockwise.
    R90,
    /// 180°.
    R180,
    /// 270° clockwise.
    R270,
}

impl Rotation {
    /// Whether this rotation swaps the width/height axes downstream.
    #[must_use]
    pub const fn swaps_axes(self) -> bool {
        matches!(self, Self::R90 | Self::R270)
    }
}

/// Mirror applied by the destination transform. Mutually exclusive modes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Flip {
    /// No flip.
    #[default]
    None,
    /// Mirror across the horizontal axis.
    Vertical,
    /// Mirror across the vertical axis.
    Horizontal,
}

/// Plane roles for multi-planar buffers. The slot index is fixed by role.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Plane {
    /// Luma plane.
    Y = 0,
    /// Blue-difference chroma plane.
    Cb = 1,
    /// Red-difference chroma plane.
    Cr = 2,
}

/// Number of plane address slots per endpoint.
pub const PLANE_COUNT: usize = 3;

/// Physical buffer addresses, one slot per plane role.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct PlaneAddrs(pub [u32; PLANE_COUNT]);

impl PlaneAddrs {
    /// Address for one plane role.
    #[must_use]
    pub const fn get(&self, plane: Plane) -> u32 {
        self.0[plane as usize]
    }
}

/// Buffer mapping control passed alongside plane addresses.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BufControl {
    /// Buffer is being mapped in; derived addresses apply.
    Map,
    /// Buffer is being unmapped; addresses are copied verbatim.
    Unmap,
}

/// Crop position and size within a buffer, in pixels.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct Geometry {
    /// Left edge of the crop.
    pub x: u32,
    /// Top edge of the crop.
    pub y: u32,
    /// Crop width.
    pub w: u32,
    /// Crop height.
    pub h: u32,
}

/// Full plane dimensions of a buffer.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct BufferSize {
    /// Horizontal size in pixels.
    pub hsize: u32,
    /// Vertical size in pixels.
    pub vsize: u32,
}

/// Per-endpoint configuration, one each for source and destination.
#[derive(Debug, Clone, Copy, Default)]
pub struct EndpointConfig {
    /// Pixel format, once set.
    pub format: Option<ImageFormat>,
    /// Crop rectangle (post-alignment).
    pub geometry: Geometry,
    /// Declared buffer dimensions (axis-swapped on the destination when
    /// the rotation requires it).
    pub buffer: BufferSize,
    /// Rotation degree (commanded transform on the destination only).
    pub rotation: Rotation,
    /// Flip mode (commanded transform on the destination only).
    pub flip: Flip,
    /// Plane addresses as last programmed.
    pub addrs: PlaneAddrs,
}

/// One in-flight transform request: the source/destination endpoint pair
/// plus the derived axis-swap flag.
///
/// The engine is single-outstanding-request: this state is rebuilt by the
/// next configuration sequence and has no persistence beyond one
/// operation.
#[derive(Debug, Clone, Copy, Default)]
pub struct TransformRequest {
    src: EndpointConfig,
    dst: EndpointConfig,
    needs_axis_swap: bool,
}

impl TransformRequest {
    /// Source endpoint as configured so far.
    #[must_use]
    pub const fn src(&self) -> &EndpointConfig {
        &self.src
    }

    /// Destination endpoint as configured so far.
    #[must_use]
    pub const fn dst(&self) -> &EndpointConfig {
        &self.dst
    }

    /// Whether the commanded rotation swaps width/height downstream.
    #[must_use]
    pub const fn needs_axis_swap(&self) -> bool {
        self.needs_axis_swap
    }

    /// Record the source transform. Only the identity is legal: the
    /// source image is never itself rotated or flipped.
    ///
    /// # Errors
    ///
    /// Returns [`RotError::InvalidTransform`] for any non-identity
    /// transform.
    pub fn set_src_transform(&mut self, rotation: Rotation, flip: Flip) -> Result<()> {
        if rotation != Rotation::R0 {
            return Err(RotError::invalid_transform(format!(
                "source rotation must be 0°, got {rotation:?}"
            )));
        }
        if flip != Flip::None {
            return Err(RotError::invalid_transform(format!(
                "source flip must be none, got {flip:?}"
            )));
        }
        self.src.rotation = rotation;
        self.src.flip = flip;
        Ok(())
    }

    /// Record the destination transform — the operation's commanded
    /// rotation and flip. Returns whether the rotation swaps the
    /// width/height axes for downstream size checks.
    pub fn set_dst_transform(&mut self, rotation: Rotation, flip: Flip) -> bool {
        self.dst.rotation = rotation;
        self.dst.flip = flip;
        self.needs_axis_swap = rotation.swaps_axes();
        self.needs_axis_swap
    }

    /// Record the source crop and buffer size.
    ///
    /// # Errors
    ///
    /// Returns [`RotError::OutOfBounds`] if the crop does not fit in the
    /// buffer.
    pub fn set_src_size(&mut self, pos: Geometry, sz: BufferSize) -> Result<()> {
        check_bounds(pos, sz, false)?;
        self.src.buffer = sz;
        self.src.geometry = pos;
        Ok(())
    }

    /// Record the destination crop and buffer size.
    ///
    /// The crop size must equal the already-configured source crop size
    /// (the engine performs no scaling), and the crop must fit the buffer
    /// with the axes swapped when the commanded rotation requires it.
    /// The stored buffer dimensions are the swapped ones.
    ///
    /// # Errors
    ///
    /// Returns [`RotError::SizeMismatch`] or [`RotError::OutOfBounds`].
    pub fn set_dst_size(&mut self, pos: Geometry, sz: BufferSize) -> Result<()> {
        if self.src.geometry.w != pos.w || self.src.geometry.h != pos.h {
            return Err(RotError::SizeMismatch {
                src_w: self.src.geometry.w,
                src_h: self.src.geometry.h,
                dst_w: pos.w,
                dst_h: pos.h,
            });
        }
        check_bounds(pos, sz, self.needs_axis_swap)?;

        self.dst.buffer = if self.needs_axis_swap {
            BufferSize {
                hsize: sz.vsize,
                vsize: sz.hsize,
            }
        } else {
            sz
        };
        self.dst.geometry.x = pos.x;
        self.dst.geometry.y = pos.y;
        self.dst.geometry.w = pos.w;
        self.dst.geometry.h = pos.h;
        Ok(())
    }

    /// Record the source format, snapping the source crop onto the
    /// format's alignment grid.
    pub fn set_src_format(&mut self, format: ImageFormat, table: &LimitTable) {
        let (w, h) = format
            .limit(table)
            .align_size(self.src.geometry.w, self.src.geometry.h);
        self.src.geometry.w = w;
        self.src.geometry.h = h;
        self.src.format = Some(format);
    }

    /// Record the destination format, which must equal the configured
    /// source format (the rotator performs no format conversion). The
    /// destination crop is snapped onto the format's alignment grid.
    ///
    /// # Errors
    ///
    /// Returns [`RotError::FormatMismatch`] when it differs from the
    /// source's.
    pub fn set_dst_format(&mut self, format: ImageFormat, table: &LimitTable) -> Result<()> {
        if self.src.format != Some(format) {
            return Err(RotError::FormatMismatch {
                src: self.src.format,
                dst: format,
            });
        }
        let (w, h) = format
            .limit(table)
            .align_size(self.dst.geometry.w, self.dst.geometry.h);
        self.dst.geometry.w = w;
        self.dst.geometry.h = h;
        self.dst.format = Some(format);
        Ok(())
    }

    /// Record source plane addresses and return the resolved set to
    /// program. See [`resolve_addrs`] for the NV12 chroma derivation.
    pub fn set_src_addrs(&mut self, base: PlaneAddrs, ctrl: BufControl) -> PlaneAddrs {
        let resolved = resolve_addrs(base, ctrl, self.src.format, self.src.geometry);
        self.src.addrs = resolved;
        resolved
    }

    /// Record destination plane addresses and return the resolved set to
    /// program.
    pub fn set_dst_addrs(&mut self, base: PlaneAddrs, ctrl: BufControl) -> PlaneAddrs {
        let resolved = resolve_addrs(base, ctrl, self.dst.format, self.dst.geometry);
        self.dst.addrs = resolved;
        resolved
    }
}

fn check_bounds(pos: Geometry, sz: BufferSize, swap: bool) -> Result<()> {
    // Widened so that corner-of-range positions reject cleanly instead of
    // wrapping past the buffer.
    let (x, y, w, h) = (
        u64::from(pos.x),
        u64::from(pos.y),
        u64::from(pos.w),
        u64::from(pos.h),
    );
    let fits = if swap {
        x + h <= u64::from(sz.vsize) && y + w <= u64::from(sz.hsize)
    } else {
        x + w <= u64::from(sz.hsize) && y + h <= u64::from(sz.vsize)
    };
    if fits {
        Ok(())
    } else {
        Err(RotError::OutOfBounds {
            x: pos.x,
            y: pos.y,
            w: pos.w,
            h: pos.h,
            hsize: sz.hsize,
            vsize: sz.vsize,
        })
    }
}

/// Resolve the plane address set actually programmed into the hardware.
///
/// For contiguous NV12 under `Map`, the chroma plane address is derived
/// as luma base + crop width × crop height: the chroma plane is assumed
/// to sit immediately after a luma plane sized exactly to the crop. This
/// assumes an unpadded luma stride — correct for the allocator this
/// block ships with, wrong for allocators that pad (see DESIGN.md).
/// `NV12M` planes arrive per-plane from the caller and are never derived.
fn resolve_addrs(
    base: PlaneAddrs,
    ctrl: BufControl,
    format: Option<ImageFormat>,
    geometry: Geometry,
) -> PlaneAddrs {
    let mut addrs = base;
    if ctrl == BufControl::Map && format == Some(ImageFormat::Nv12) {
        addrs.0[Plane::Cb as usize] = addrs.get(Plane::Y) + geometry.w * geometry.h;
    }
    addrs
}

#[cfg(test)]
mod tests {
    use super::*;

    const TABLE: LimitTable = LimitTable::exynos4210();

    fn configured_src(req: &mut TransformRequest, fmt: ImageFormat, w: u32, h: u32) {
        req.set_src_transform(Rotation::R0, Flip::None).unwrap();
        req.set_src_size(
            Geometry { x: 0, y: 0, w, h },
            BufferSize {
                hsize: w * 2,
                vsize: h * 2,
            },
        )
        .unwrap();
        req.set_src_format(fmt, &TABLE);
    }

    #[test]
    fn source_transform_accepts_only_identity() {
        let mut req = TransformRequest::default();
        assert!(req.set_src_transform(Rotation::R0, Flip::None).is_ok());
        assert!(matches!(
            req.set_src_transform(Rotation::R90, Flip::None),
            Err(RotError::InvalidTransform { .. })
        ));
        assert!(matches!(
            req.set_src_transform(Rotation::R0, Flip::Vertical),
            Err(RotError::InvalidTransform { .. })
        ));
    }

    #[test]
    fn dst_transform_reports_axis_swap() {
        let mut req = TransformRequest::default();
        assert!(req.set_dst_transform(Rotation::R90, Flip::None));
        assert!(req.set_dst_transform(Rotation::R270, Flip::Horizontal));
        assert!(!req.set_dst_transform(Rotation::R0, Flip::None));
        assert!(!req.set_dst_transform(Rotation::R180, Flip::Vertical));
    }

    #[test]
    fn src_size_rejects_out_of_bounds_crop() {
        let mut req = TransformRequest::default();
        let sz = BufferSize {
            hsize: 128,
            vsize: 128,
        };
        assert!(req
            .set_src_size(
                Geometry {
                    x: 65,
                    y: 0,
                    w: 64,
                    h: 64
                },
                sz
            )
            .is_err());
        assert!(req
            .set_src_size(
                Geometry {
                    x: 64,
                    y: 64,
                    w: 64,
                    h: 64
                },
                sz
            )
            .is_ok());
    }

    #[test]
    fn corner_of_range_crop_is_rejected_not_wrapped() {
        // x + w past u32::MAX must reject as out of bounds, not wrap
        // around into an in-bounds sum.
        let mut req = TransformRequest::default();
        let sz = BufferSize {
            hsize: 128,
            vsize: 128,
        };
        let err = req
            .set_src_size(
                Geometry {
                    x: u32::MAX - 1,
                    y: 0,
                    w: 4,
                    h: 64,
                },
                sz,
            )
            .unwrap_err();
        assert!(matches!(err, RotError::OutOfBounds { .. }));

        // Same on the swapped destination path.
        let mut req = TransformRequest::default();
        configured_src(&mut req, ImageFormat::Nv12, 64, 64);
        req.set_dst_transform(Rotation::R90, Flip::None);
        let err = req
            .set_dst_size(
                Geometry {
                    x: 0,
                    y: u32::MAX - 1,
                    w: 64,
                    h: 64,
                },
                sz,
            )
            .unwrap_err();
        assert!(matches!(err, RotError::OutOfBounds { .. }));
    }

    #[test]
    fn dst_size_must_match_src_crop() {
        let mut req = TransformRequest::default();
        configured_src(&mut req, ImageFormat::Nv12, 64, 64);
        let sz = BufferSize {
            hsize: 256,
            vsize: 256,
        };
        let err = req
            .set_dst_size(
                Geometry {
                    x: 0,
                    y: 0,
                    w: 64,
                    h: 32,
                },
                sz,
            )
            .unwrap_err();
        assert!(matches!(err, RotError::SizeMismatch { .. }));
    }

    #[test]
    fn dst_size_checks_swapped_bounds_under_rotation() {
        let mut req = TransformRequest::default();
        configured_src(&mut req, ImageFormat::Nv12, 96, 32);
        req.set_dst_transform(Rotation::R90, Flip::None);

        // 96x32 crop at (0,64): swapped check needs x+h <= vsize (32+0 ok)
        // and y+w <= hsize (64+96 > 128) — rejected.
        let err = req
            .set_dst_size(
                Geometry {
                    x: 0,
                    y: 64,
                    w: 96,
                    h: 32,
                },
                BufferSize {
                    hsize: 128,
                    vsize: 128,
                },
            )
            .unwrap_err();
        assert!(matches!(err, RotError::OutOfBounds { .. }));

        // Same request in a tall enough buffer passes, and the stored
        // buffer dimensions are the swapped ones.
        req.set_dst_size(
            Geometry {
                x: 0,
                y: 64,
                w: 96,
                h: 32,
            },
            BufferSize {
                hsize: 192,
                vsize: 128,
            },
        )
        .unwrap();
        assert_eq!(req.dst().buffer.hsize, 128);
        assert_eq!(req.dst().buffer.vsize, 192);
    }

    #[test]
    fn dst_format_must_match_src() {
        let mut req = TransformRequest::default();
        configured_src(&mut req, ImageFormat::Xrgb8888, 64, 64);
        let err = req
            .set_dst_format(ImageFormat::Nv12, &TABLE)
            .unwrap_err();
        assert!(matches!(err, RotError::FormatMismatch { .. }));
        assert!(req.set_dst_format(ImageFormat::Xrgb8888, &TABLE).is_ok());
    }

    #[test]
    fn format_set_aligns_the_crop() {
        let mut req = TransformRequest::default();
        req.set_src_size(
            Geometry {
                x: 0,
                y: 0,
                w: 67,
                h: 69,
            },
            BufferSize {
                hsize: 256,
                vsize: 256,
            },
        )
        .unwrap();
        req.set_src_format(ImageFormat::Nv12, &TABLE);
        // YCbCr aligns to 8-pixel boundaries.
        assert_eq!(req.src().geometry.w, 64);
        assert_eq!(req.src().geometry.h, 72);
    }

    #[test]
    fn nv12_map_derives_chroma_address() {
        let mut req = TransformRequest::default();
        configured_src(&mut req, ImageFormat::Nv12, 64, 64);
        let resolved = req.set_src_addrs(PlaneAddrs([0x1000_0000, 0, 0]), BufControl::Map);
        assert_eq!(resolved.get(Plane::Y), 0x1000_0000);
        assert_eq!(resolved.get(Plane::Cb), 0x1000_0000 + 64 * 64);
    }

    #[test]
    fn nv12m_and_unmap_leave_addresses_verbatim() {
        let mut req = TransformRequest::default();
        configured_src(&mut req, ImageFormat::Nv12M, 64, 64);
        let planes = PlaneAddrs([0x1000_0000, 0x2000_0000, 0]);
        assert_eq!(req.set_src_addrs(planes, BufControl::Map), planes);

        let mut req = TransformRequest::default();
        configured_src(&mut req, ImageFormat::Nv12, 64, 64);
        assert_eq!(req.set_src_addrs(planes, BufControl::Unmap), planes);
    }

    #[test]
    fn fourcc_roundtrip_and_rejection() {
        for fmt in [ImageFormat::Xrgb8888, ImageFormat::Nv12, ImageFormat::Nv12M] {
            assert_eq!(ImageFormat::from_fourcc(fmt.fourcc()).unwrap(), fmt);
        }
        assert!(matches!(
            ImageFormat::from_fourcc(0xdead_beef),
            Err(RotError::InvalidFormat { fourcc: 0xdead_beef })
        ));
    }
}
