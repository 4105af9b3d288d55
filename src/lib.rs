//! Multi-buffer SPI (MibSPI) controller model
//!
//! A register-driven model of a multi-buffered synchronous-serial
//! controller peripheral: 128 TX/RX buffer pairs, 16 transfer groups,
//! ECC-protected buffer RAM with a diagnostic fault-injection mode, and a
//! compatibility single-word path with DMA request signaling. The serial
//! bus partner and all output lines are injected interfaces, so the model
//! runs standalone in tests and drops into SoC wiring unchanged.
//!
//! # Architecture
//!
//! - `regs`: register byte offsets and bit masks
//! - `fields`: accessors for the packed TX/format/group control words
//! - `ram`: the TX/RX transfer buffer store
//! - `ecc`: ECC diagnostic unit (fault classification and re-raise)
//! - `io`: `SerialBus` and `Pins` collaborator traits
//! - `controller`: register file, transfer-group engine, busy/pending
//!   state machine and DMA request generation
//!
//! # Address windows
//!
//! | Window          | Range         | Contents               |
//! |-----------------|---------------|------------------------|
//! | registers       | 0x000 - 0x1FF | control/status         |
//! | buffer RAM      | 0x000 - 0x1FF | TX buffer half-space   |
//! | buffer RAM      | 0x200 - 0x3FF | RX buffer half-space   |
//!
//! The register window and the buffer RAM window are separate address
//! spaces (`MibSpi::read`/`write` vs `MibSpi::ram_read`/`ram_write`);
//! the surrounding bus decode decides where each access lands.
//!
//! All processing is synchronous and single-threaded: a transfer group
//! runs to completion inside the register write (or handshake edge) that
//! releases it. The caller serializes access.

pub mod controller;
pub mod ecc;
pub mod fields;
pub mod io;
pub mod ram;
pub mod regs;

#[cfg(test)]
mod group_scenario_test;

pub use controller::{EngineState, MibSpi};
pub use ecc::EccDiag;
pub use io::{NullPins, OpenBus, Pins, SerialBus, NUM_CS_LINES, NUM_DMA_REQS};
pub use ram::{ByteOrder, Half, TransferRam, RAM_BYTES, RAM_WORDS};
