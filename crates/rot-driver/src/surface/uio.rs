//! Memory-mapped rotator registers via UIO
//!
//! The rotator block is exposed to userspace through a `uio_pdrv_genirq`
//! platform binding: map 0 of `/dev/uioN` is the register range, and the
//! device's interrupt line is serviced by blocking 4-byte reads of the
//! same fd. `rustix` covers everything needed — no raw ioctls.

// MMIO registers are naturally aligned by hardware, so pointer casts are safe
#![allow(clippy::cast_ptr_alignment)]

use std::fs::{File, OpenOptions};
use std::os::unix::io::AsFd;
use std::path::Path;

use rustix::io::{read, write};
use rustix::mm::{mmap, munmap, MapFlags, ProtFlags};
use tracing::{debug, info};

use crate::error::{Result, RotError};
use super::RegisterSurface;

/// Mapped rotator register range plus the interrupt fd.
pub struct UioSurface {
    /// Memory-mapped register base
    ptr: *mut u8,
    /// Size of the mapping
    size: usize,
    /// Open UIO device; reads block until the next interrupt
    fd: File,
}

impl std::fmt::Debug for UioSurface {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("UioSurface")
            .field("ptr", &format_args!("{:p}", self.ptr))
            .field("size", &self.size)
            .finish()
    }
}

// SAFETY: Send - UioSurface owns the mapping exclusively. Moving between threads
// doesn't invalidate it (mmap'd memory is process-wide). No thread-local state.
unsafe impl Send for UioSurface {}

// SAFETY: Sync - reads and writes are bounds-checked volatile accesses to a
// mapping that stays valid for the surface's lifetime. The caller serializes
// configuration traffic (single outstanding request per device).
unsafe impl Sync for UioSurface {}

impl UioSurface {
    /// Map the register range of a UIO rotator device.
    ///
    /// `size` is the length of map 0; [`map_size`] reads it from sysfs.
    ///
    /// # Errors
    ///
    /// Returns an error if the device cannot be opened or mapped.
    pub fn open(path: &Path, size: usize) -> Result<Self> {
        let fd = OpenOptions::new().read(true).write(true).open(path)?;

        // SAFETY: mmap necessary for MMIO - maps register range into process
        // address space. Invariants: (1) fd open for the surface's lifetime;
        // (2) UIO map 0 lives at file offset 0; (3) ptr valid for size bytes
        // or Err.
        let ptr = unsafe {
            mmap(
                std::ptr::null_mut(),
                size,
                ProtFlags::READ | ProtFlags::WRITE,
                MapFlags::SHARED,
                fd.as_fd(),
                0,
            )
            .map_err(|e| RotError::Io {
                source: std::io::Error::from(e),
            })?
        };

        info!("Mapped rotator registers at {ptr:p}, size={size:#x}");

        Ok(Self {
            ptr: ptr.cast(),
            size,
            fd,
        })
    }

    /// Block until the rotator raises its interrupt line.
    ///
    /// Returns the kernel's interrupt count for the device.
    ///
    /// # Errors
    ///
    /// Returns an error if the read fails.
    pub fn wait_irq(&self) -> Result<u32> {
        let mut buf = [0u8; 4];
        read(self.fd.as_fd(), &mut buf).map_err(|e| RotError::Io {
            source: std::io::Error::from(e),
        })?;
        Ok(u32::from_ne_bytes(buf))
    }

    /// Re-enable interrupt delivery after servicing one.
    ///
    /// `uio_pdrv_genirq` masks the line on each interrupt; writing 1
    /// unmasks it.
    ///
    /// # Errors
    ///
    /// Returns an error if the write fails.
    pub fn rearm_irq(&self) -> Result<()> {
        write(self.fd.as_fd(), &1u32.to_ne_bytes()).map_err(|e| RotError::Io {
            source: std::io::Error::from(e),
        })?;
        Ok(())
    }
}

impl RegisterSurface for UioSurface {
    fn read32(&self, offset: usize) -> u32 {
        assert!(offset + 4 <= self.size, "register offset out of bounds");
        // SAFETY: read_volatile necessary for MMIO - hardware can change value.
        // Invariants: (1) ptr from mmap in open(), valid for self.size;
        // (2) offset+4 <= size; (3) u32 aligned.
        unsafe { std::ptr::read_volatile(self.ptr.add(offset).cast::<u32>()) }
    }

    fn write32(&self, offset: usize, value: u32) {
        assert!(offset + 4 <= self.size, "register offset out of bounds");
        // SAFETY: write_volatile necessary for MMIO - triggers hardware side
        // effects. Invariants: (1) ptr from mmap; (2) offset+4 <= size;
        // (3) u32 aligned.
        unsafe {
            std::ptr::write_volatile(self.ptr.add(offset).cast::<u32>(), value);
        }
    }
}

impl Drop for UioSurface {
    fn drop(&mut self) {
        // SAFETY: munmap necessary - ptr/size were previously mapped in
        // open() and Drop runs at most once.
        unsafe {
            // Ignore error in Drop (can't propagate, would need to log)
            let _ = munmap(self.ptr.cast(), self.size);
        }
        debug!("Unmapped rotator registers");
    }
}

/// Read the size of map 0 for a UIO device from sysfs.
///
/// For `/dev/uio3` this reads `/sys/class/uio/uio3/maps/map0/size`,
/// which holds a hex string such as `0x1000`.
///
/// # Errors
///
/// Returns an error if the sysfs entry is missing or unparseable.
pub fn map_size(dev_path: &Path) -> Result<usize> {
    let name = dev_path
        .file_name()
        .and_then(|n| n.to_str())
        .ok_or_else(|| RotError::Io {
            source: std::io::Error::new(
                std::io::ErrorKind::InvalidInput,
                format!("not a UIO device path: {}", dev_path.display()),
            ),
        })?;

    let sysfs = format!("/sys/class/uio/{name}/maps/map0/size");
    let raw = std::fs::read_to_string(&sysfs)?;
    let trimmed = raw.trim().trim_start_matches("0x");
    usize::from_str_radix(trimmed, 16).map_err(|e| RotError::Io {
        source: std::io::Error::new(
            std::io::ErrorKind::InvalidData,
            format!("bad map size in {sysfs}: {e}"),
        ),
    })
}
