//! Transfer buffer store
//!
//! Two parallel 128-word arrays share one 1 KiB window: the TX buffers at
//! offset 0x000 and the RX buffers at 0x200. The same word index addresses
//! both arrays; the ECC diagnostic unit tracks them as separate half-spaces.
//!
//! Software may access the window at byte, halfword or word granularity.
//! Multi-byte values are assembled according to the byte order the owning
//! SoC variant uses, fixed at construction. The transfer engine always
//! moves whole words.

/// Buffer slots per half-space
pub const RAM_WORDS: usize = 128;

/// Byte length of one half-space
pub const RAM_BYTES: u32 = (RAM_WORDS * 4) as u32;

/// Byte order of multi-byte software accesses into the buffer window
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ByteOrder {
    Little,
    Big,
}

/// Buffer half-space selector
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Half {
    Tx,
    Rx,
}

impl Half {
    /// Index used by the ECC unit's per-half-space state
    pub fn idx(self) -> usize {
        match self {
            Half::Tx => 0,
            Half::Rx => 1,
        }
    }
}

/// TX/RX transfer buffer arrays
#[derive(Debug, Clone)]
pub struct TransferRam {
    tx: [u8; RAM_BYTES as usize],
    rx: [u8; RAM_BYTES as usize],
    order: ByteOrder,
}

impl TransferRam {
    /// Create zeroed buffer arrays with the given software byte order
    pub fn new(order: ByteOrder) -> Self {
        Self {
            tx: [0; RAM_BYTES as usize],
            rx: [0; RAM_BYTES as usize],
            order,
        }
    }

    /// Clear both half-spaces
    pub fn reset(&mut self) {
        self.tx.fill(0);
        self.rx.fill(0);
    }

    fn bytes(&self, half: Half) -> &[u8] {
        match half {
            Half::Tx => &self.tx,
            Half::Rx => &self.rx,
        }
    }

    fn bytes_mut(&mut self, half: Half) -> &mut [u8] {
        match half {
            Half::Tx => &mut self.tx,
            Half::Rx => &mut self.rx,
        }
    }

    /// Read the buffer word at `index` (engine view)
    pub fn word(&self, half: Half, index: usize) -> u32 {
        debug_assert!(index < RAM_WORDS);
        let b = &self.bytes(half)[index * 4..index * 4 + 4];
        let b = [b[0], b[1], b[2], b[3]];
        match self.order {
            ByteOrder::Little => u32::from_le_bytes(b),
            ByteOrder::Big => u32::from_be_bytes(b),
        }
    }

    /// Write the buffer word at `index` (engine view)
    pub fn set_word(&mut self, half: Half, index: usize, value: u32) {
        debug_assert!(index < RAM_WORDS);
        let b = match self.order {
            ByteOrder::Little => value.to_le_bytes(),
            ByteOrder::Big => value.to_be_bytes(),
        };
        self.bytes_mut(half)[index * 4..index * 4 + 4].copy_from_slice(&b);
    }

    /// Software read of `size` bytes (1, 2 or 4) at `offset` within a half-space
    pub fn read(&self, half: Half, offset: u32, size: usize) -> u32 {
        let offset = offset as usize;
        if size == 0 || size > 4 || offset + size > RAM_BYTES as usize {
            return 0;
        }
        let bytes = self.bytes(half);
        let mut value = 0u32;
        for i in 0..size {
            let byte = bytes[offset + i] as u32;
            value |= match self.order {
                ByteOrder::Little => byte << (8 * i),
                ByteOrder::Big => byte << (8 * (size - 1 - i)),
            };
        }
        value
    }

    /// Software write of `size` bytes (1, 2 or 4) at `offset` within a half-space
    pub fn write(&mut self, half: Half, offset: u32, size: usize, value: u32) {
        let offset = offset as usize;
        if size == 0 || size > 4 || offset + size > RAM_BYTES as usize {
            return;
        }
        let order = self.order;
        let bytes = self.bytes_mut(half);
        for i in 0..size {
            let shift = match order {
                ByteOrder::Little => 8 * i,
                ByteOrder::Big => 8 * (size - 1 - i),
            };
            bytes[offset + i] = (value >> shift) as u8;
        }
    }
}
