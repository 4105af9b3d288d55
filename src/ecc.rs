//! ECC diagnostic unit
//!
//! Fault injection for the transfer buffer RAM. This is deliberately not a
//! real Hamming computation: when the diagnostic control register holds the
//! magic key, each buffer write is classified by the population count of the
//! written value. Exactly one set bit models a single-bit (correctable)
//! fault, any other nonzero pattern models an uncorrectable fault, and zero
//! is clean. The offending byte offset is captured per half-space and per
//! class, and later reads at that address re-raise the matching error line
//! until software acknowledges the status bit.
//!
//! Register layout (offsets in the controller window):
//!   0x120: PARECC_CTRL   parity control
//!   0x124: PARECC_STAT   fault status, write-1-clear
//!   0x128: UERRADDR1     RX uncorrectable address (read-clears, +0x200 bias)
//!   0x12C: UERRADDR0     TX uncorrectable address (read-clears)
//!   0x140: ECCDIAG_CTRL  diagnostic key (classification active when == 0x5)
//!   0x144: ECCDIAG_STAT  diagnostic status, write-1-clear
//!   0x148: SBERRADDR1    RX single-bit address (read-clears, +0x200 bias)
//!   0x14C: SBERRADDR0    TX single-bit address (read-clears)

use crate::io::Pins;
use crate::ram::{Half, RAM_BYTES};
use crate::regs;

/// ECC control/status state and per-half-space fault addresses
#[derive(Debug, Clone, Default)]
pub struct EccDiag {
    /// PARECC_CTRL register
    pub ctrl: u32,
    /// PARECC_STAT register (fault flags)
    stat: u32,
    /// ECCDIAG_CTRL register (magic key arms classification)
    pub diag_ctrl: u32,
    /// ECCDIAG_STAT register (diagnostic flags)
    diag_stat: u32,
    /// Uncorrectable fault byte offset per half-space
    uerraddr: [u32; 2],
    /// Single-bit fault byte offset per half-space
    sberraddr: [u32; 2],
}

impl EccDiag {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn reset(&mut self) {
        *self = Self::default();
    }

    /// PARECC_STAT value
    pub fn stat(&self) -> u32 {
        self.stat
    }

    /// PARECC_STAT write-1-clear
    pub fn ack_stat(&mut self, mask: u32) {
        self.stat &= !mask;
    }

    /// ECCDIAG_STAT value
    pub fn diag_stat(&self) -> u32 {
        self.diag_stat
    }

    /// ECCDIAG_STAT write-1-clear
    pub fn ack_diag_stat(&mut self, mask: u32) {
        self.diag_stat &= !mask;
    }

    /// Classify a buffer write. Active only while the diagnostic key is set.
    pub fn classify(&mut self, half: Half, offset: u32, value: u32, pins: &mut dyn Pins) {
        if self.diag_ctrl != regs::ECCDIAG_KEY {
            return;
        }
        let i = half.idx();
        match value.count_ones() {
            0 => {}
            1 => {
                self.stat |= regs::SBE_FLG[i];
                self.diag_stat |= regs::DIAG_SE_FLG[i];
                self.sberraddr[i] = offset;
                pins.raise_single_bit_error();
            }
            _ => {
                self.stat |= regs::UERR_FLG[i];
                self.diag_stat |= regs::DIAG_DE_FLG[i];
                self.uerraddr[i] = offset;
                pins.raise_uncorrectable_error();
            }
        }
    }

    /// Re-raise error lines for a buffer word read while its fault status
    /// is still pending at the recorded address.
    pub fn recheck(&self, half: Half, word_index: usize, pins: &mut dyn Pins) {
        let i = half.idx();
        let offset = (word_index * 4) as u32;
        if self.stat & regs::UERR_FLG[i] != 0 && self.uerraddr[i] == offset {
            pins.raise_uncorrectable_error();
        }
        if self.stat & regs::SBE_FLG[i] != 0 && self.sberraddr[i] == offset {
            pins.raise_single_bit_error();
        }
    }

    /// Read-and-clear the uncorrectable fault address. The RX half-space
    /// reads back biased by the TX array's byte length.
    pub fn take_uerraddr(&mut self, half: Half) -> u32 {
        let i = half.idx();
        let bias = match half {
            Half::Tx => 0,
            Half::Rx => RAM_BYTES,
        };
        let addr = self.uerraddr[i] + bias;
        self.uerraddr[i] = 0;
        addr
    }

    /// Read-and-clear the single-bit fault address, RX biased as above
    pub fn take_sberraddr(&mut self, half: Half) -> u32 {
        let i = half.idx();
        let bias = match half {
            Half::Tx => 0,
            Half::Rx => RAM_BYTES,
        };
        let addr = self.sberraddr[i] + bias;
        self.sberraddr[i] = 0;
        addr
    }
}
