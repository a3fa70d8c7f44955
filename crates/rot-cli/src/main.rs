//! `rot` — command-line interface for the Exynos rotator driver.
//!
//! ```text
//! USAGE:
//!   rot demo                         Run a simulated 90° NV12 rotation
//!   rot align <w> <h> --format FMT   Show the hardware-aligned crop size
//!   rot dump <uio-path>              Dump registers of a real UIO device
//! ```

use std::path::PathBuf;

use anyhow::Result;
use clap::{Parser, Subcommand, ValueEnum};
use tracing_subscriber::EnvFilter;

use rot_chip::{limits::LimitTable, regs};
use rot_driver::prelude::*;
use rot_driver::{NoopClock, RegisterSurface, UioSurface};

#[derive(Parser)]
#[command(name = "rot", about = "Exynos rotator hardware CLI", version)]
struct Cli {
    #[command(subcommand)]
    command: Cmd,
}

#[derive(Clone, Copy, ValueEnum)]
enum FormatArg {
    /// Packed 32-bit XRGB.
    Xrgb8888,
    /// Contiguous YCbCr 4:2:0.
    Nv12,
    /// Multi-plane YCbCr 4:2:0.
    Nv12m,
}

impl From<FormatArg> for ImageFormat {
    fn from(arg: FormatArg) -> Self {
        match arg {
            FormatArg::Xrgb8888 => Self::Xrgb8888,
            FormatArg::Nv12 => Self::Nv12,
            FormatArg::Nv12m => Self::Nv12M,
        }
    }
}

#[derive(Subcommand)]
enum Cmd {
    /// Run a full simulated rotation and print the register traffic.
    Demo,
    /// Show what the hardware makes of a requested crop size.
    Align {
        /// Requested crop width in pixels.
        w: u32,
        /// Requested crop height in pixels.
        h: u32,
        /// Pixel format selecting the limit entry.
        #[arg(long, value_enum, default_value = "nv12")]
        format: FormatArg,
    },
    /// Dump the register bank of a real rotator behind a UIO device.
    Dump {
        /// UIO device path (e.g. /dev/uio0).
        device: PathBuf,
    },
}

fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| "warn".into()))
        .init();

    let cli = Cli::parse();

    match cli.command {
        Cmd::Demo => cmd_demo()?,
        Cmd::Align { w, h, format } => cmd_align(w, h, format.into()),
        Cmd::Dump { device } => cmd_dump(&device)?,
    }

    Ok(())
}

fn cmd_demo() -> Result<()> {
    let sim = std::sync::Arc::new(SimSurface::new());
    let (mut rot, events) = Rotator::new(
        std::sync::Arc::clone(&sim),
        LimitTable::exynos4210(),
        Box::new(NoopClock),
    );
    rot.open()?;

    println!("Configuring: NV12 64x64 @ (0,0) in 128x128, rotate 90°");
    rot.src_set_transform(Rotation::R0, Flip::None)?;
    rot.src_set_size(
        Geometry { x: 0, y: 0, w: 64, h: 64 },
        BufferSize { hsize: 128, vsize: 128 },
    )?;
    rot.src_set_format(ImageFormat::Nv12);
    rot.src_set_addr(PlaneAddrs([0x4000_0000, 0, 0]), BufControl::Map);

    let swap = rot.dst_set_transform(Rotation::R90, Flip::None);
    println!("Axis swap: {swap}");
    rot.dst_set_size(
        Geometry { x: 0, y: 0, w: 64, h: 64 },
        BufferSize { hsize: 128, vsize: 128 },
    )?;
    rot.dst_set_format(ImageFormat::Nv12)?;
    rot.dst_set_addr(PlaneAddrs([0x4800_0000, 0, 0]), BufControl::Map);

    rot.start()?;
    rot.handle_irq();

    println!();
    println!("Register writes:");
    for (offset, value) in sim.journal() {
        println!("  [{offset:#04x}] <- {value:#010x}");
    }

    println!();
    println!("Event: {:?}", events.recv()?);
    rot.close()?;
    Ok(())
}

fn cmd_align(w: u32, h: u32, format: ImageFormat) {
    let table = LimitTable::exynos4210();
    let limit = format.limit(&table);
    let (aw, ah) = limit.align_size(w, h);
    println!("Requested : {w}x{h}");
    println!(
        "Limits    : {}x{} .. {}x{}, {}-pixel alignment",
        limit.min_w,
        limit.min_h,
        limit.max_w,
        limit.max_h,
        1 << limit.align
    );
    println!("Aligned   : {aw}x{ah}");
}

fn cmd_dump(device: &std::path::Path) -> Result<()> {
    let size = rot_driver::surface::uio::map_size(device)?;
    let surface = UioSurface::open(device, size)?;

    println!("Rotator registers @ {}:", device.display());
    for offset in (0..=regs::LAST_REG).step_by(4) {
        println!("  [{offset:#04x}] = {:#010x}", surface.read32(offset));
    }
    Ok(())
}
