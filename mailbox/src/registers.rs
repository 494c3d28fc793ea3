use proc_bitfield::bitfield;

pub const DEFAULT_RAM_ADDR_HI: u16 = 0x210;
pub const DEFAULT_RAM_ADDR_LO: u16 = 0x211;
pub const DEFAULT_READ_DATA: u16 = 0x212;
pub const DEFAULT_WRITE_DATA: u16 = 0x213;

/// The four mailbox registers exposed on the LPC bus.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Register {
    RamAddrHi,
    RamAddrLo,
    ReadData,
    WriteData
}

impl std::fmt::Display for Register {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Register::RamAddrHi => write!(f, "RAM Address High"),
            Register::RamAddrLo => write!(f, "RAM Address Low"),
            Register::ReadData => write!(f, "Read address"),
            Register::WriteData => write!(f, "Write address")
        }
    }
}

/// Port numbers of the mailbox registers.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Registers {
    pub ram_addr_hi: u16,
    pub ram_addr_lo: u16,
    pub read_data: u16,
    pub write_data: u16
}

impl Default for Registers {
    fn default() -> Self {
        Self {
            ram_addr_hi: DEFAULT_RAM_ADDR_HI,
            ram_addr_lo: DEFAULT_RAM_ADDR_LO,
            read_data: DEFAULT_READ_DATA,
            write_data: DEFAULT_WRITE_DATA
        }
    }
}

impl Registers {
    #[must_use]
    pub fn port(&self, register: Register) -> u16 {
        match register {
            Register::RamAddrHi => self.ram_addr_hi,
            Register::RamAddrLo => self.ram_addr_lo,
            Register::ReadData => self.read_data,
            Register::WriteData => self.write_data
        }
    }

    #[must_use]
    pub fn ports(&self) -> [u16; 4] {
        [self.ram_addr_hi, self.ram_addr_lo, self.read_data, self.write_data]
    }

    /// Which register, if any, lives at `port`.
    #[must_use]
    pub fn register_at(&self, port: u16) -> Option<Register> {
        [Register::RamAddrHi, Register::RamAddrLo, Register::ReadData, Register::WriteData]
            .into_iter()
            .find(|register| self.port(*register) == port)
    }
}



bitfield! {
    #[derive(Clone, Copy, Default, PartialEq, Eq, Hash)]
    pub struct MailboxAddress(u16) {
        pub lo: u8 @ 0..=7,
        pub hi: u8 @ 8..=15
    }
}

impl MailboxAddress {
    #[must_use]
    pub const fn new(addr: u16) -> Self {
        Self(addr)
    }

    /// Keeps the low 16 bits of `addr`, the same masking the hardware latch does.
    #[must_use]
    pub fn truncated(addr: u32) -> Self {
        #[allow(clippy::cast_possible_truncation)]
        Self((addr & 0xFFFF) as u16)
    }

    #[must_use]
    pub fn raw(&self) -> u16 {
        self.0
    }

    #[must_use]
    pub fn next(&self) -> Self {
        Self(self.0.wrapping_add(1))
    }
}

impl From<u16> for MailboxAddress {
    fn from(addr: u16) -> Self {
        Self::new(addr)
    }
}

impl From<MailboxAddress> for u16 {
    fn from(addr: MailboxAddress) -> Self {
        addr.0
    }
}

impl std::fmt::Debug for MailboxAddress {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "MailboxAddress({:#06x})", self.0)
    }
}

impl std::fmt::Display for MailboxAddress {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{:#06x}", self.0)
    }
}
