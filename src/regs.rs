//! MibSPI register map
//!
//! Byte offsets and bit masks for the controller register file. All
//! registers are 32-bit; only BUF (read) and DAT1 (write) additionally
//! accept 16-bit half accesses, big-endian half order.
//!
//! Register layout:
//!   0x000:       GCR0          global control 0
//!   0x004:       GCR1          global control 1 (bit 24 = enable)
//!   0x008:       INT0          interrupt enable (bit 16 = DMA req enable)
//!   0x010:       FLG           status, write-1-clear on mask 0x15F
//!   0x014:       PC0           pin control (bit 8 = ENA pin function)
//!   0x018-0x034: PC1..PC8     unimplemented pin controls, read as 0
//!   0x038:       DAT0          shadow data register
//!   0x03C:       DAT1          transmit data, low half write triggers
//!   0x040:       BUF           receive result
//!   0x050-0x05C: FMT0..FMT3   data format descriptors
//!   0x070:       RAMCTRL       buffer RAM control (bit 16 = RX write enable)
//!   0x084:       TGINTFLAG     group completion flags, write-1-clear
//!   0x094:       LTGPEND       last-group end pointer
//!   0x098-0x0D4: TG0..TG15CTRL transfer group control
//!   0x120:       PARECC_CTRL   parity/ECC control
//!   0x124:       PARECC_STAT   parity/ECC status, write-1-clear
//!   0x128:       UERRADDR1     RX uncorrectable fault address, read-clears
//!   0x12C:       UERRADDR0     TX uncorrectable fault address, read-clears
//!   0x134:       IOLPBK        I/O loopback test control
//!   0x140:       ECCDIAG_CTRL  ECC diagnostic mode (active when == 0x5)
//!   0x144:       ECCDIAG_STAT  ECC diagnostic status, write-1-clear
//!   0x148:       SBERRADDR1    RX single-bit fault address, read-clears
//!   0x14C:       SBERRADDR0    TX single-bit fault address, read-clears

/// Total size of the register window in bytes
pub const REG_WINDOW_SIZE: u32 = 0x200;

pub const GCR0: u32 = 0x000;
pub const GCR1: u32 = 0x004;
pub const INT0: u32 = 0x008;
pub const FLG: u32 = 0x010;
pub const PC0: u32 = 0x014;
pub const PC1: u32 = 0x018;
pub const PC8: u32 = 0x034;
pub const DAT0: u32 = 0x038;
pub const DAT1: u32 = 0x03C;
pub const BUF: u32 = 0x040;
pub const FMT0: u32 = 0x050;
pub const FMT1: u32 = 0x054;
pub const FMT2: u32 = 0x058;
pub const FMT3: u32 = 0x05C;
pub const RAMCTRL: u32 = 0x070;
pub const TGINTFLAG: u32 = 0x084;
pub const LTGPEND: u32 = 0x094;
pub const TG0CTRL: u32 = 0x098;
pub const TG14CTRL: u32 = 0x0D0;
pub const TG15CTRL: u32 = 0x0D4;
pub const PARECC_CTRL: u32 = 0x120;
pub const PARECC_STAT: u32 = 0x124;
pub const UERRADDR1: u32 = 0x128;
pub const UERRADDR0: u32 = 0x12C;
pub const IOLPBK: u32 = 0x134;
pub const ECCDIAG_CTRL: u32 = 0x140;
pub const ECCDIAG_STAT: u32 = 0x144;
pub const SBERRADDR1: u32 = 0x148;
pub const SBERRADDR0: u32 = 0x14C;

/// GCR1: peripheral enable
pub const GCR1_ENABLE: u32 = 1 << 24;

/// INT0: DMA request enable
pub const INT0_DMAREQEN: u32 = 1 << 16;

/// FLG: bits cleared by writing 1
pub const FLG_W1C_MASK: u32 = 0x15F;

/// PC0: ENA pin function enable
pub const PC0_ENAFUN: u32 = 1 << 8;

/// RAMCTRL: software writes to the RX half-space allowed
pub const RAMCTRL_RX_ACCESS: u32 = 1 << 16;

/// RAMCTRL value after reset (RAM parity default key in bits 8..12)
pub const RAMCTRL_RESET: u32 = 0x5 << 8;

/// TGxCTRL: group enable
pub const TG_ENABLE: u32 = 1 << 31;

/// TGxCTRL: one-shot trigger mode
pub const TG_ONESHOT: u32 = 1 << 30;

/// TGINTFLAG: completion flag for group `n`
pub const fn tg_int_ready(n: usize) -> u32 {
    1 << (n + 16)
}

/// PARECC_STAT: uncorrectable-error flag per half-space (0 = TX, 1 = RX)
pub const UERR_FLG: [u32; 2] = [1 << 0, 1 << 1];

/// PARECC_STAT: single-bit-error flag per half-space
pub const SBE_FLG: [u32; 2] = [1 << 8, 1 << 9];

/// ECCDIAG_STAT: single-bit diagnostic flag per half-space
pub const DIAG_SE_FLG: [u32; 2] = [1 << 0, 1 << 1];

/// ECCDIAG_STAT: double-bit diagnostic flag per half-space
pub const DIAG_DE_FLG: [u32; 2] = [1 << 16, 1 << 17];

/// ECCDIAG_CTRL value that arms fault classification
pub const ECCDIAG_KEY: u32 = 0x5;

/// IOLPBK key-field value that enables loopback
pub const IOLPBK_KEY: u32 = 0xA;
