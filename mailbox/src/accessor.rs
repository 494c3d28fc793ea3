//!
//! The SmartFusion mailbox is reached through four I/O ports:
//!
//!   RAM_ADDR_H  <- high byte of the mailbox address
//!   RAM_ADDR_L  <- low byte of the mailbox address
//!   RAM_R_DATA  -> byte stored at the latched address
//!   RAM_W_DATA  <- byte to store at the latched address
//!
//! Every byte is a complete transaction: open the port resource, latch the
//! address, move one byte through the data register, close the resource.
//! Nothing here serializes access: two processes interleaving their
//! transactions on the same ports will corrupt each other's address latch.
//!

use log::debug;
use portio::{Auto, PortIo};

use crate::{
    error::Error,
    registers::{MailboxAddress, Register, Registers}
};

// Number of distinct mailbox addresses; reads longer than this wrap around.
const MAILBOX_SPAN: usize = 0x1_0000;

pub struct Mailbox<'a, Port: PortIo> {
    port: &'a Port,
    registers: Registers
}

impl<'a, Port: PortIo> Mailbox<'a, Port> {
    #[must_use]
    pub fn new(port: &'a Port, registers: Registers) -> Self {
        Self { port, registers }
    }

    #[must_use]
    pub fn registers(&self) -> &Registers {
        &self.registers
    }

    #[must_use]
    pub fn port(&self) -> &'a Port {
        self.port
    }

    fn seek_to(&self, session: &mut Auto<'_, Port>, register: Register) -> Result<(), Error> {
        let requested = self.registers.port(register);
        let reached = session.seek(u64::from(requested)).map_err(|err| Error::Port(register, err))?;
        if reached == u64::from(requested) {
            Ok(())
        } else {
            Err(Error::SeekMismatch { register, requested, reached })
        }
    }

    fn put(&self, session: &mut Auto<'_, Port>, register: Register, value: u8) -> Result<(), Error> {
        self.seek_to(session, register)?;
        let written = session.write(&[value]).map_err(|err| Error::Port(register, err))?;
        if written == 1 {
            Ok(())
        } else {
            Err(Error::ShortWrite { register, written })
        }
    }

    /// Latches `addr` into the RAM address registers, high byte first.
    ///
    /// # Errors
    ///
    /// Returns an error if a seek lands on the wrong port or a write doesn't take exactly one byte.
    pub fn select(&self, session: &mut Auto<'_, Port>, addr: MailboxAddress) -> Result<(), Error> {
        self.put(session, Register::RamAddrHi, addr.hi())?;
        self.put(session, Register::RamAddrLo, addr.lo())
    }

    /// # Errors
    ///
    /// Returns an error if the port resource can't be opened or any step of the transaction fails.
    /// The resource is closed in either case.
    pub fn read_byte(&self, addr: u16) -> Result<u8, Error> {
        let addr = MailboxAddress::new(addr);
        let mut session = Auto::open(self.port).map_err(Error::Open)?;

        self.select(&mut session, addr)?;
        self.seek_to(&mut session, Register::ReadData)?;

        let mut value = [0u8; 1];
        let read = session.read(&mut value).map_err(|err| Error::Port(Register::ReadData, err))?;
        if read != 1 {
            return Err(Error::ShortRead { register: Register::ReadData, read });
        }

        debug!("mailbox[{addr}] -> {:#04x}", value[0]);
        Ok(value[0])
    }

    /// # Errors
    ///
    /// Returns an error if the port resource can't be opened or any step of the transaction fails.
    /// The resource is closed in either case.
    pub fn write_byte(&self, addr: u16, value: u8) -> Result<(), Error> {
        let addr = MailboxAddress::new(addr);
        let mut session = Auto::open(self.port).map_err(Error::Open)?;

        self.select(&mut session, addr)?;
        self.put(&mut session, Register::WriteData, value)?;

        debug!("mailbox[{addr}] <- {value:#04x}");
        Ok(())
    }

    /// Same as [`Mailbox::write_byte`] for a value that hasn't been narrowed to a byte yet.
    ///
    /// # Errors
    ///
    /// Returns [`Error::InvalidValue`] without touching the ports if `value` > 0xFF.
    pub fn write_value(&self, addr: u16, value: u32) -> Result<(), Error> {
        let byte = to_byte(value)?;
        self.write_byte(addr, byte)
    }

    /// Reads `length` consecutive bytes starting at `addr`. Addresses wrap past 0xFFFF.
    ///
    /// # Errors
    ///
    /// Stops at the first failing byte and returns its error; bytes read before it are dropped.
    pub fn read(&self, addr: u16, length: usize) -> Result<Vec<u8>, Error> {
        let mut addr = MailboxAddress::new(addr);
        let mut buf = Vec::with_capacity(length.min(MAILBOX_SPAN));
        for _ in 0..length {
            let value = self.read_byte(addr.raw()).map_err(|err| {
                debug!("Read aborted at {addr} after {} bytes", buf.len());
                err
            })?;
            buf.push(value);
            addr = addr.next();
        }
        Ok(buf)
    }

    /// Writes `buf` to consecutive addresses starting at `addr`. Addresses wrap past 0xFFFF.
    ///
    /// # Errors
    ///
    /// Stops at the first failing byte and returns its error; earlier bytes stay written.
    pub fn write(&self, addr: u16, buf: &[u8]) -> Result<(), Error> {
        let mut addr = MailboxAddress::new(addr);
        for (written, &value) in buf.iter().enumerate() {
            self.write_byte(addr.raw(), value).map_err(|err| {
                debug!("Write aborted at {addr} after {written} bytes");
                err
            })?;
            addr = addr.next();
        }
        Ok(())
    }

    /// Checks every value before the first port access, then writes them like [`Mailbox::write`].
    ///
    /// # Errors
    ///
    /// Returns [`Error::InvalidValue`] for the first value > 0xFF, or the first transfer error.
    pub fn write_values(&self, addr: u16, values: &[u32]) -> Result<(), Error> {
        let buf = to_bytes(values)?;
        self.write(addr, &buf)
    }
}

fn to_byte(value: u32) -> Result<u8, Error> {
    u8::try_from(value).map_err(|_| Error::InvalidValue(value))
}

/// Narrows every value to a byte, failing on the first one above 0xFF.
///
/// # Errors
///
/// Returns [`Error::InvalidValue`] carrying the offending value.
pub fn to_bytes(values: &[u32]) -> Result<Vec<u8>, Error> {
    values.iter().map(|&value| to_byte(value)).collect()
}
