//! Simulated rotator register file
//!
//! Implements [`RegisterSurface`] over an in-memory register bank that
//! reproduces the rotator's observable latching behavior:
//!
//! 1. **Start latches a verdict**: writing the go bit to `CONTROL` raises
//!    the completion pending flag in `STATUS` (or the illegal flag when
//!    primed via [`SimSurface::fail_next_start`]), exactly what the real
//!    block does at the end of an operation.
//!
//! 2. **W1C status**: writing a set pending bit back to `STATUS` clears it.
//!
//! 3. **Write journal**: every write is recorded, so tests can assert that
//!    a rejected configuration call produced *zero* register traffic.
//!
//! All tests pass without a physical rotator; the integration suite runs
//! the full configure/start/interrupt cycle against this surface.

use std::sync::Mutex;

use rot_chip::regs;
use tracing::trace;

use super::RegisterSurface;

const REG_WORDS: usize = regs::LAST_REG / 4 + 1;

#[derive(Debug)]
struct SimState {
    regs: [u32; REG_WORDS],
    journal: Vec<(usize, u32)>,
    fail_next: bool,
}

/// In-memory rotator register bank with hardware-like latching.
#[derive(Debug)]
pub struct SimSurface {
    state: Mutex<SimState>,
}

impl Default for SimSurface {
    fn default() -> Self {
        Self::new()
    }
}

impl SimSurface {
    /// Create a simulator with all registers zeroed.
    #[must_use]
    pub fn new() -> Self {
        Self {
            state: Mutex::new(SimState {
                regs: [0; REG_WORDS],
                journal: Vec::new(),
                fail_next: false,
            }),
        }
    }

    /// Make the next start latch the illegal-configuration verdict
    /// instead of completion.
    pub fn fail_next_start(&self) {
        self.state.lock().unwrap().fail_next = true;
    }

    /// Snapshot of every `(offset, value)` write issued so far.
    #[must_use]
    pub fn journal(&self) -> Vec<(usize, u32)> {
        self.state.lock().unwrap().journal.clone()
    }

    /// Forget the recorded writes (the register contents stay).
    pub fn clear_journal(&self) {
        self.state.lock().unwrap().journal.clear();
    }

    /// Whether any verdict pending flag is currently raised.
    #[must_use]
    pub fn irq_pending(&self) -> bool {
        let state = self.state.lock().unwrap();
        state.regs[regs::STATUS / 4]
            & (regs::status_irq_pending(regs::STATUS_BIT_COMPLETE)
                | regs::status_irq_pending(regs::STATUS_BIT_ILLEGAL))
            != 0
    }
}

impl RegisterSurface for SimSurface {
    fn read32(&self, offset: usize) -> u32 {
        assert!(
            offset % 4 == 0 && offset <= regs::LAST_REG,
            "register offset out of range: {offset:#x}"
        );
        self.state.lock().unwrap().regs[offset / 4]
    }

    fn write32(&self, offset: usize, value: u32) {
        assert!(
            offset % 4 == 0 && offset <= regs::LAST_REG,
            "register offset out of range: {offset:#x}"
        );
        trace!("sim write [{offset:#04x}] = {value:#010x}");

        let mut state = self.state.lock().unwrap();
        state.journal.push((offset, value));

        match offset {
            regs::STATUS => {
                // Pending flags are write-1-to-clear; other bits read-only.
                let w1c = value
                    & (regs::status_irq_pending(regs::STATUS_BIT_COMPLETE)
                        | regs::status_irq_pending(regs::STATUS_BIT_ILLEGAL));
                state.regs[regs::STATUS / 4] &= !w1c;
            }
            regs::CONTROL => {
                // The go bit is self-clearing; latch the verdict it produces.
                state.regs[regs::CONTROL / 4] = value & !regs::CONTROL_START;
                if value & regs::CONTROL_START != 0 {
                    let bit = if state.fail_next {
                        regs::STATUS_BIT_ILLEGAL
                    } else {
                        regs::STATUS_BIT_COMPLETE
                    };
                    state.fail_next = false;
                    state.regs[regs::STATUS / 4] |= regs::status_irq_pending(bit);
                }
            }
            _ => state.regs[offset / 4] = value,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn start_latches_completion_pending() {
        let sim = SimSurface::new();
        assert!(!sim.irq_pending());

        sim.write32(regs::CONTROL, regs::CONTROL_START);
        assert!(sim.irq_pending());
        assert_eq!(
            regs::status_irq(sim.read32(regs::STATUS)),
            regs::STATUS_IRQ_VAL_COMPLETE
        );
        // Go bit self-clears.
        assert_eq!(sim.read32(regs::CONTROL) & regs::CONTROL_START, 0);
    }

    #[test]
    fn primed_start_latches_illegal_pending() {
        let sim = SimSurface::new();
        sim.fail_next_start();
        sim.write32(regs::CONTROL, regs::CONTROL_START);
        assert_eq!(
            regs::status_irq(sim.read32(regs::STATUS)),
            regs::STATUS_IRQ_VAL_ILLEGAL
        );

        // The prime is consumed: the next start completes normally.
        sim.write32(regs::STATUS, 1 << regs::STATUS_BIT_ILLEGAL);
        sim.write32(regs::CONTROL, regs::CONTROL_START);
        assert_eq!(
            regs::status_irq(sim.read32(regs::STATUS)),
            regs::STATUS_IRQ_VAL_COMPLETE
        );
    }

    #[test]
    fn status_write_clears_only_written_pending_bits() {
        let sim = SimSurface::new();
        sim.write32(regs::CONTROL, regs::CONTROL_START);

        // Clearing the illegal bit leaves the completion bit pending.
        sim.write32(regs::STATUS, 1 << regs::STATUS_BIT_ILLEGAL);
        assert!(sim.irq_pending());

        sim.write32(regs::STATUS, 1 << regs::STATUS_BIT_COMPLETE);
        assert!(!sim.irq_pending());
    }

    #[test]
    fn journal_records_every_write() {
        let sim = SimSurface::new();
        sim.write32(regs::SRC_BUF_SIZE, rot_chip::regs::pack_size(128, 128));
        sim.write32(regs::SRC_CROP_POS, 0);
        assert_eq!(
            sim.journal(),
            vec![
                (regs::SRC_BUF_SIZE, rot_chip::regs::pack_size(128, 128)),
                (regs::SRC_CROP_POS, 0),
            ]
        );
        sim.clear_journal();
        assert!(sim.journal().is_empty());
    }
}
