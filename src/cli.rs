use std::{num::ParseIntError, path::PathBuf};

use clap::{ArgAction, Parser};
use mailbox::{accessor, registers, Config, MailboxAddress, Registers};
use portio::DevPort;

/// Integer in decimal or with a `0x`, `0o` or `0b` prefix.
pub(crate) fn parse_int(text: &str) -> Result<u64, ParseIntError> {
    let text = text.trim();
    let lowered = text.to_ascii_lowercase();
    if let Some(hex) = lowered.strip_prefix("0x") {
        u64::from_str_radix(hex, 16)
    } else if let Some(oct) = lowered.strip_prefix("0o") {
        u64::from_str_radix(oct, 8)
    } else if let Some(bin) = lowered.strip_prefix("0b") {
        u64::from_str_radix(bin, 2)
    } else {
        text.parse::<u64>()
    }
}

fn parse_port(text: &str) -> Result<u16, String> {
    let value = parse_int(text).map_err(|err| format!("Unable to parse {text} as an integer: {err}"))?;
    u16::try_from(value).map_err(|_| format!("Port {value:#x} is out of range (<= 0xFFFF)"))
}

fn parse_u64(text: &str) -> Result<u64, String> {
    parse_int(text).map_err(|err| format!("Unable to parse {text} as an integer: {err}"))
}

#[derive(Parser, Debug)]
#[command(name = "smfmbox", version, about = "Communicate with SmartFusion chip")]
pub(crate) struct Args {
    /// Address for the RAM_ADDR_HI register
    #[arg(long, alias = "ram_addr_hi", value_parser = parse_port, default_value_t = registers::DEFAULT_RAM_ADDR_HI)]
    pub ram_addr_hi: u16,

    /// Address for the RAM_ADDR_LO register
    #[arg(long, alias = "ram_addr_lo", value_parser = parse_port, default_value_t = registers::DEFAULT_RAM_ADDR_LO)]
    pub ram_addr_lo: u16,

    /// Address for the READ_DATA register
    #[arg(long, alias = "read_reg", value_parser = parse_port, default_value_t = registers::DEFAULT_READ_DATA)]
    pub read_reg: u16,

    /// Address for the WRITE_DATA register
    #[arg(long, alias = "write_reg", value_parser = parse_port, default_value_t = registers::DEFAULT_WRITE_DATA)]
    pub write_reg: u16,

    /// Address to read data from
    #[arg(short, long, value_parser = parse_u64)]
    pub read: Option<u64>,

    /// Address to write data to
    #[arg(short, long, value_parser = parse_u64)]
    pub write: Option<u64>,

    /// Number of bytes to read
    #[arg(short, long, value_parser = parse_u64, default_value_t = 1)]
    pub count: u64,

    /// Data bytes to write
    #[arg(short, long, num_args = 1.., value_parser = parse_u64)]
    pub data: Option<Vec<u64>>,

    /// Device to handle the port access
    #[arg(long, default_value = DevPort::DEFAULT_RESOURCE)]
    pub resource: PathBuf,

    /// Use in/out instructions instead of the port device (Linux x86 only)
    #[arg(long, conflicts_with = "simulate")]
    pub direct: bool,

    /// Run against an in-memory mailbox instead of the hardware
    #[arg(long)]
    pub simulate: bool,

    /// More log output, repeat for more detail
    #[arg(short, long, action = ArgAction::Count)]
    pub verbose: u8
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub(crate) enum Mode {
    Read { address: MailboxAddress, count: usize },
    Write { address: MailboxAddress, data: Vec<u32> }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum UsageError {
    NoMode,
    BothModes,
    MissingData,
    NotBytes
}

impl std::fmt::Display for UsageError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            UsageError::NoMode => write!(f, "Must specify exactly one of --read or --write"),
            UsageError::BothModes => write!(f, "Must specify either of --read or --write"),
            UsageError::MissingData => write!(f, "Must specify --data with --write"),
            UsageError::NotBytes => write!(f, "Must specify --data as individual bytes (<= 0xFF)")
        }
    }
}

impl std::error::Error for UsageError {}

fn mailbox_address(addr: u64) -> MailboxAddress {
    #[allow(clippy::cast_possible_truncation)]
    let truncated = MailboxAddress::new((addr & 0xFFFF) as u16);
    if u64::from(truncated.raw()) != addr {
        log::warn!("Mailbox address {addr:#x} truncated to {truncated}");
    }
    truncated
}

impl Args {
    #[must_use]
    pub fn config(&self) -> Config {
        Config {
            registers: Registers {
                ram_addr_hi: self.ram_addr_hi,
                ram_addr_lo: self.ram_addr_lo,
                read_data: self.read_reg,
                write_data: self.write_reg
            },
            resource: self.resource.clone()
        }
    }

    /// Validates the read/write options before any port is touched.
    pub fn mode(&self) -> Result<Mode, UsageError> {
        let data = match &self.data {
            Some(data) => {
                let values = data
                    .iter()
                    .map(|&value| u32::try_from(value).map_err(|_| UsageError::NotBytes))
                    .collect::<Result<Vec<u32>, UsageError>>()?;
                accessor::to_bytes(&values).map_err(|_| UsageError::NotBytes)?;
                Some(values)
            }
            None => None
        };

        match (self.read, self.write, data) {
            (None, None, _) => Err(UsageError::NoMode),
            (Some(_), Some(_), _) => Err(UsageError::BothModes),
            (None, Some(_), None) => Err(UsageError::MissingData),
            (None, Some(address), Some(data)) => Ok(Mode::Write { address: mailbox_address(address), data }),
            (Some(address), None, _) => {
                // Past the address space the read just wraps, so a count beyond usize is as good as usize::MAX.
                let count = usize::try_from(self.count).unwrap_or(usize::MAX);
                Ok(Mode::Read { address: mailbox_address(address), count })
            }
        }
    }
}
