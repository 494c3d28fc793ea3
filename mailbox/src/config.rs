use std::path::PathBuf;

use portio::DevPort;

use crate::registers::Registers;

/// Where the mailbox lives: its register map and the port resource to reach it through.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Config {
    pub registers: Registers,
    pub resource: PathBuf
}

impl Default for Config {
    fn default() -> Self {
        Self {
            registers: Registers::default(),
            resource: PathBuf::from(DevPort::DEFAULT_RESOURCE)
        }
    }
}

impl Config {
    #[must_use]
    pub fn dev_port(&self) -> DevPort {
        DevPort::new(&self.resource)
    }

    /// Direct `in`/`out` access limited to the four mailbox registers.
    #[cfg(all(target_os = "linux", any(target_arch = "x86", target_arch = "x86_64")))]
    #[must_use]
    pub fn raw_ports(&self) -> portio::RawPorts {
        portio::RawPorts::new(&self.registers.ports())
    }
}
