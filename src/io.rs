//! Injected collaborator interfaces
//!
//! The controller never talks to real hardware: the serial bus partner and
//! every output line are behind small traits so the engine can run against
//! recording fakes in tests and against the SoC wiring in a full machine.

/// Number of chip-select output lines
pub const NUM_CS_LINES: usize = 8;

/// Number of DMA request output lines
pub const NUM_DMA_REQS: usize = 16;

/// The serial bus "other end". One call per buffer processed.
pub trait SerialBus {
    /// Shift `bits` bits of `data` out and return the word shifted in
    fn transfer(&mut self, bits: u8, data: u16) -> u16;
}

/// Output lines driven by the controller. All methods default to no-ops so
/// a board only wires the lines it cares about.
pub trait Pins {
    /// Chip-select line level change (asserted = driven active)
    fn set_cs(&mut self, line: usize, asserted: bool) {
        let _ = (line, asserted);
    }

    /// DMA request pulse on line `line`
    fn raise_dma_req(&mut self, line: usize) {
        let _ = line;
    }

    /// Single-bit ECC error pulse
    fn raise_single_bit_error(&mut self) {}

    /// Uncorrectable ECC error pulse
    fn raise_uncorrectable_error(&mut self) {}

    /// Group-completion interrupt level (high while any completion flag is set)
    fn set_group_irq(&mut self, level: bool) {
        let _ = level;
    }
}

/// Pins implementation that drops every line change
pub struct NullPins;

impl Pins for NullPins {}

/// Serial bus with nothing connected: reads back as zero
pub struct OpenBus;

impl SerialBus for OpenBus {
    fn transfer(&mut self, _bits: u8, _data: u16) -> u16 {
        0
    }
}
