//! Silicon model for the Exynos image rotator block.
//!
//! This crate has **no dependencies** and **no hardware access** — it is a
//! pure model of the silicon: register offsets, bit-field encodings, the
//! status-verdict decoding, and the per-format size limit table with its
//! alignment rounding algorithm.
//!
//! The register layout is bit-exact for the rotator block found on
//! Exynos4-class SoCs and must not be changed without re-validating
//! against hardware.
//!
//! # Crate organisation
//!
//! | Module | Contents |
//! |--------|----------|
//! | [`regs`] | Register map — all offsets, bit definitions, packing helpers |
//! | [`limits`] | Per-format size limits and the crop alignment algorithm |

#![forbid(unsafe_code)]
#![warn(missing_docs)]
#![warn(clippy::all, clippy::pedantic)]
#![allow(clippy::module_name_repetitions)]

pub mod limits;
pub mod regs;
