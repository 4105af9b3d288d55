//! Multi-buffer SPI controller
//!
//! The controller owns the register file, the transfer buffer RAM, the ECC
//! diagnostic unit and the busy/pending engine state, and drives an injected
//! serial bus and output pins. Everything is reactive: all behavior runs
//! synchronously inside a register write, a buffer RAM access or a handshake
//! pin edge. There is no internal thread or scheduler; the only deferred work
//! is the explicit pending state resumed on the next handshake fall and the
//! compatibility DMA re-check serviced by `tick()`.
//!
//! Transfer groups are contiguous buffer ranges: group `n` (0..=14) ends one
//! buffer before the next group's start pointer, group 15 ends at the
//! LTGPEND pointer. Writing a group control word with enable and one-shot
//! set walks the range once, asserting each buffer's (inverted) chip-select
//! mask, shifting the payload through the bus at the selected format's
//! character length, storing the answer in the RX buffer and releasing the
//! chip selects unless the buffer holds them. Only one-shot software
//! triggering is modeled.

use log::warn;

use crate::ecc::EccDiag;
use crate::fields;
use crate::io::{Pins, SerialBus, NUM_CS_LINES};
use crate::ram::{ByteOrder, Half, TransferRam, RAM_BYTES, RAM_WORDS};
use crate::regs;

/// Engine arbitration state. At most one transfer (group or single word) is
/// in flight; triggers arriving while the handshake pin gates activity are
/// parked here and resumed on the next falling edge.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EngineState {
    /// Nothing in flight, triggers run immediately
    Idle,
    /// Handshake pin asserted, triggers must wait
    Busy,
    /// A group trigger is parked: group index and derived end index
    /// (`None` encodes an empty range that still completes)
    PendingGroup { n: usize, end: Option<u32> },
    /// A single-word transfer is parked
    PendingSingleWord,
}

/// Multi-buffer SPI controller instance
pub struct MibSpi {
    gcr0: u32,
    gcr1: u32,
    int0: u32,
    flg: u32,
    pc0: u32,
    dat0: u32,
    dat1: u32,
    buf: u32,
    fmt: [u32; 4],
    ramctrl: u32,
    tgintflag: u32,
    ltgpend: u32,
    tgctrl: [u32; 16],
    iolpbk: u32,

    ram: TransferRam,
    ecc: EccDiag,
    state: EngineState,
    /// Compatibility DMA re-check parked for the next `tick()`
    dma_recheck: bool,

    bus: Box<dyn SerialBus>,
    pins: Box<dyn Pins>,
}

impl MibSpi {
    /// Create a controller in reset state, wired to `bus` and `pins`.
    /// `order` is the byte order software sees in the buffer RAM window.
    pub fn new(order: ByteOrder, bus: Box<dyn SerialBus>, pins: Box<dyn Pins>) -> Self {
        Self {
            gcr0: 0,
            gcr1: 0,
            int0: 0,
            flg: 0,
            pc0: 0,
            dat0: 0,
            dat1: 0,
            buf: 0,
            fmt: [0; 4],
            ramctrl: regs::RAMCTRL_RESET,
            tgintflag: 0,
            ltgpend: 0,
            tgctrl: [0; 16],
            iolpbk: 0,
            ram: TransferRam::new(order),
            ecc: EccDiag::new(),
            state: EngineState::Idle,
            dma_recheck: false,
            bus,
            pins,
        }
    }

    /// Reset all registers, buffers and fault state. Pending work is
    /// discarded unconditionally.
    pub fn reset(&mut self) {
        self.gcr0 = 0;
        self.gcr1 = 0;
        self.int0 = 0;
        self.flg = 0;
        self.pc0 = 0;
        self.dat0 = 0;
        self.dat1 = 0;
        self.buf = 0;
        self.fmt = [0; 4];
        self.ramctrl = regs::RAMCTRL_RESET;
        self.tgintflag = 0;
        self.ltgpend = 0;
        self.tgctrl = [0; 16];
        self.iolpbk = 0;
        self.ram.reset();
        self.ecc.reset();
        self.state = EngineState::Idle;
        self.dma_recheck = false;
        self.pins.set_group_irq(false);
    }

    /// Current engine arbitration state
    pub fn state(&self) -> EngineState {
        self.state
    }

    // ------------------------------------------------------------------
    // Register file
    // ------------------------------------------------------------------

    /// Read a register. `size` is 2 or 4 bytes; 2-byte reads are valid only
    /// for the result register's halves.
    pub fn read(&mut self, offset: u32, size: usize) -> u32 {
        match size {
            2 => self.read16(offset),
            4 => self.read32(offset),
            _ => {
                warn!("mibspi: bad register read size {} at {:#05x}", size, offset);
                0
            }
        }
    }

    /// Write a register. `size` is 2 or 4 bytes; 2-byte writes are valid
    /// only for the transmit data register's halves.
    pub fn write(&mut self, offset: u32, size: usize, value: u32) {
        match size {
            2 => self.write16(offset, value as u16),
            4 => self.write32(offset, value),
            _ => warn!("mibspi: bad register write size {} at {:#05x}", size, offset),
        }
    }

    fn read32(&mut self, offset: u32) -> u32 {
        match offset {
            regs::GCR0 => self.gcr0,
            regs::GCR1 => self.gcr1,
            regs::INT0 => self.int0,
            regs::FLG => self.flg,
            regs::PC0 => self.pc0,
            // Unimplemented pin control block
            o if (regs::PC1..=regs::PC8).contains(&o) => 0,
            regs::DAT0 => self.dat0,
            regs::DAT1 => self.dat1,
            regs::BUF => self.buf,
            o if (regs::FMT0..=regs::FMT3).contains(&o) => {
                self.fmt[((o - regs::FMT0) / 4) as usize]
            }
            regs::RAMCTRL => self.ramctrl,
            regs::TGINTFLAG => self.tgintflag,
            regs::LTGPEND => self.ltgpend,
            o if (regs::TG0CTRL..=regs::TG15CTRL).contains(&o) => {
                self.tgctrl[((o - regs::TG0CTRL) / 4) as usize]
            }
            regs::PARECC_CTRL => self.ecc.ctrl,
            regs::PARECC_STAT => self.ecc.stat(),
            regs::IOLPBK => self.iolpbk,
            regs::ECCDIAG_CTRL => self.ecc.diag_ctrl,
            regs::ECCDIAG_STAT => self.ecc.diag_stat(),
            regs::UERRADDR1 => self.ecc.take_uerraddr(Half::Rx),
            regs::UERRADDR0 => self.ecc.take_uerraddr(Half::Tx),
            regs::SBERRADDR1 => self.ecc.take_sberraddr(Half::Rx),
            regs::SBERRADDR0 => self.ecc.take_sberraddr(Half::Tx),
            _ => {
                warn!("mibspi: bad register read at {:#05x}", offset);
                0
            }
        }
    }

    fn read16(&mut self, offset: u32) -> u32 {
        // The result register is read as big-endian halves
        match offset {
            regs::BUF => fields::extract(self.buf, 16, 16),
            o if o == regs::BUF + 2 => fields::extract(self.buf, 0, 16),
            _ => {
                warn!("mibspi: bad 16-bit register read at {:#05x}", offset);
                0
            }
        }
    }

    fn write32(&mut self, offset: u32, value: u32) {
        match offset {
            regs::GCR0 => self.gcr0 = value,
            regs::GCR1 => {
                self.gcr1 = value;
                self.dma_control_changed();
            }
            regs::INT0 => {
                self.int0 = value;
                self.dma_control_changed();
            }
            regs::FLG => self.flg &= !(value & regs::FLG_W1C_MASK),
            regs::PC0 => self.pc0 = value,
            o if (regs::PC1..=regs::PC8).contains(&o) => {}
            regs::DAT0 => self.dat0 = value,
            // A full-word DAT1 write only stores; the compatibility
            // transfer fires on the 16-bit low-half write
            regs::DAT1 => self.dat1 = value,
            o if (regs::FMT0..=regs::FMT3).contains(&o) => {
                self.fmt[((o - regs::FMT0) / 4) as usize] = value;
            }
            regs::RAMCTRL => self.ramctrl = value,
            regs::TGINTFLAG => {
                self.tgintflag &= !value;
                self.pins.set_group_irq(self.tgintflag != 0);
            }
            regs::LTGPEND => self.ltgpend = value,
            o if (regs::TG0CTRL..=regs::TG14CTRL).contains(&o) => {
                let n = ((o - regs::TG0CTRL) / 4) as usize;
                self.tgctrl[n] = value;
                // End index derives from the next group's start pointer;
                // a start pointer of 0 makes the range empty
                let end = fields::start_pointer(self.tgctrl[n + 1]).checked_sub(1);
                self.trigger_group(n, end);
            }
            regs::TG15CTRL => {
                self.tgctrl[15] = value;
                let end = Some(fields::start_pointer(self.ltgpend));
                self.trigger_group(15, end);
            }
            regs::PARECC_CTRL => self.ecc.ctrl = value,
            regs::PARECC_STAT => self.ecc.ack_stat(value),
            regs::IOLPBK => self.iolpbk = value,
            regs::ECCDIAG_CTRL => self.ecc.diag_ctrl = value,
            regs::ECCDIAG_STAT => self.ecc.ack_diag_stat(value),
            // Fault address registers clear on read only
            regs::UERRADDR1 | regs::UERRADDR0 | regs::SBERRADDR1 | regs::SBERRADDR0 => {}
            _ => warn!("mibspi: bad register write at {:#05x}", offset),
        }
    }

    fn write16(&mut self, offset: u32, value: u16) {
        // The transmit data register is written as big-endian halves; the
        // low half completes the word and triggers the transfer
        match offset {
            regs::DAT1 => self.dat1 = fields::deposit(self.dat1, 16, 16, value as u32),
            o if o == regs::DAT1 + 2 => {
                self.dat1 = fields::deposit(self.dat1, 0, 16, value as u32);
                self.trigger_single_word();
            }
            _ => warn!("mibspi: bad 16-bit register write at {:#05x}", offset),
        }
    }

    // ------------------------------------------------------------------
    // Buffer RAM window (TX half-space at 0x000, RX at 0x200)
    // ------------------------------------------------------------------

    /// Software read from the buffer RAM window
    pub fn ram_read(&mut self, offset: u32, size: usize) -> u32 {
        let Some((half, local)) = Self::split_ram_offset(offset) else {
            warn!("mibspi: bad buffer RAM read at {:#05x}", offset);
            return 0;
        };
        self.ecc.recheck(half, (local / 4) as usize, self.pins.as_mut());
        self.ram.read(half, local, size)
    }

    /// Software write to the buffer RAM window. RX half-space writes are
    /// dropped unless RAMCTRL grants access.
    pub fn ram_write(&mut self, offset: u32, size: usize, value: u32) {
        let Some((half, local)) = Self::split_ram_offset(offset) else {
            warn!("mibspi: bad buffer RAM write at {:#05x}", offset);
            return;
        };
        if half == Half::Rx && self.ramctrl & regs::RAMCTRL_RX_ACCESS == 0 {
            return;
        }
        self.ecc.classify(half, local, value, self.pins.as_mut());
        self.ram.write(half, local, size, value);
    }

    fn split_ram_offset(offset: u32) -> Option<(Half, u32)> {
        match offset {
            o if o < RAM_BYTES => Some((Half::Tx, o)),
            o if o < 2 * RAM_BYTES => Some((Half::Rx, o - RAM_BYTES)),
            _ => None,
        }
    }

    // ------------------------------------------------------------------
    // Handshake pin / busy-pending arbitration
    // ------------------------------------------------------------------

    /// External handshake signal edge. While the signal is high the engine
    /// is gated; a falling edge resumes whatever trigger was parked. The
    /// pin is honored only when its function is enabled in PC0.
    pub fn set_handshake(&mut self, level: bool) {
        if self.pc0 & regs::PC0_ENAFUN == 0 {
            return;
        }
        match self.state {
            EngineState::PendingGroup { n, end } if !level => {
                self.run_group(n, end);
                self.state = EngineState::Idle;
            }
            EngineState::PendingSingleWord if !level => {
                self.run_single_word();
                self.state = EngineState::Idle;
            }
            EngineState::Idle if level => self.state = EngineState::Busy,
            EngineState::Busy if !level => self.state = EngineState::Idle,
            _ => {}
        }
    }

    fn trigger_group(&mut self, n: usize, end: Option<u32>) {
        if self.state != EngineState::Idle {
            self.state = EngineState::PendingGroup { n, end };
            return;
        }
        self.run_group(n, end);
    }

    fn trigger_single_word(&mut self) {
        if self.state != EngineState::Idle {
            self.state = EngineState::PendingSingleWord;
            return;
        }
        self.run_single_word();
    }

    // ------------------------------------------------------------------
    // Transfer engine
    // ------------------------------------------------------------------

    /// One serial transaction for `txword`: pick the format, mask the
    /// payload to its character length, and either shift it through the
    /// bus or echo it back under loopback test mode.
    fn transfer_single(&mut self, txword: u32) -> u16 {
        let fmt = self.fmt[fields::tx_fmt_sel(txword)];
        let char_len = fields::fmt_char_len(fmt);
        let data = fields::tx_data(txword, char_len);

        if fields::loopback_key(self.iolpbk) == regs::IOLPBK_KEY {
            return data;
        }
        self.bus.transfer(char_len, data)
    }

    /// Drive every chip-select line named in `mask`
    fn move_cs(&mut self, mask: u8, asserted: bool) {
        for line in 0..NUM_CS_LINES {
            if mask & (1 << line) != 0 {
                self.pins.set_cs(line, asserted);
            }
        }
    }

    /// Walk group `n` over `start..=end` and mark it complete. Runs only
    /// when the group is enabled for one-shot triggering.
    fn run_group(&mut self, n: usize, end: Option<u32>) {
        let ctrl = self.tgctrl[n];
        if ctrl & regs::TG_ENABLE == 0 || ctrl & regs::TG_ONESHOT == 0 {
            return;
        }

        if let Some(end) = end {
            let start = fields::start_pointer(ctrl) as usize;
            let end = (end as usize).min(RAM_WORDS - 1);
            for i in start..=end {
                // A still-pending TX fault at this buffer re-fires its line
                self.ecc.recheck(Half::Tx, i, self.pins.as_mut());

                let txword = self.ram.word(Half::Tx, i);
                let cs = !fields::tx_cs_mask(txword);

                self.move_cs(cs, true);
                let rxword = self.transfer_single(txword);
                self.ram.set_word(Half::Rx, i, rxword as u32);

                // Hold keeps the selects asserted into the next buffer
                if !fields::tx_cs_hold(txword) {
                    self.move_cs(cs, false);
                }
            }
        }

        self.tgintflag |= regs::tg_int_ready(n);
        self.pins.set_group_irq(true);
    }

    /// Compatibility path: shift DAT1 once, land the result in BUF
    fn run_single_word(&mut self) {
        self.buf = self.transfer_single(self.dat1) as u32;

        if self.compat_dma_enabled() {
            self.pins.raise_dma_req(1);
            self.dma_recheck = true;
        }
    }

    // ------------------------------------------------------------------
    // DMA request generator (compatibility path only)
    // ------------------------------------------------------------------

    fn compat_dma_enabled(&self) -> bool {
        self.int0 & regs::INT0_DMAREQEN != 0 && self.gcr1 & regs::GCR1_ENABLE != 0
    }

    fn dma_control_changed(&mut self) {
        if self.compat_dma_enabled() {
            self.pins.raise_dma_req(0);
        } else {
            self.dma_recheck = false;
        }
    }

    /// Service deferred work. Today that is only the compatibility DMA
    /// re-check parked by a completed single-word transfer.
    pub fn tick(&mut self) {
        if self.dma_recheck {
            self.dma_recheck = false;
            if self.int0 & regs::INT0_DMAREQEN != 0 {
                self.pins.raise_dma_req(0);
            }
        }
    }
}
