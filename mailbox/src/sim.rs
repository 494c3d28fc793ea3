//!
//! In-memory stand-in for the SmartFusion mailbox.
//!
//! `SimulatedPort` behaves like the port resource with the microcontroller
//! behind it: writes to the RAM address registers update the address latch,
//! the read/write data registers move bytes in and out of a 64 KiB mailbox
//! memory. Every port operation is recorded, and faults can be injected.
//!

use std::{
    borrow::Cow,
    cell::{Cell, RefCell}
};

use portio::PortIo;

use crate::registers::{MailboxAddress, Register, Registers};

const MAILBOX_SIZE: usize = 0x1_0000;
const FLOATING_BUS: u8 = 0xFF;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Op {
    Open,
    Seek(u64),
    Read(u8),
    Write(u8),
    Close
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Fault {
    OpenFails,
    SeekMisses(u16),          // Seeking to this port lands one past it
    WriteRefused(u16),        // Writes to this port report 0 bytes
    ReadFailsAt(u16)          // Reading this mailbox address is an I/O error
}

pub struct SimHandle {
    position: u64
}

pub struct SimulatedPort {
    registers: Registers,
    memory: RefCell<Vec<u8>>,
    latch: Cell<MailboxAddress>,
    open_handles: Cell<usize>,
    operations: RefCell<Vec<Op>>,
    faults: RefCell<Vec<Fault>>
}

impl SimulatedPort {
    #[must_use]
    pub fn new(registers: Registers) -> Self {
        Self {
            registers,
            memory: RefCell::new(vec![0; MAILBOX_SIZE]),
            latch: Cell::new(MailboxAddress::default()),
            open_handles: Cell::new(0),
            operations: RefCell::new(Vec::new()),
            faults: RefCell::new(Vec::new())
        }
    }

    /// Preloads `bytes` at `addr`, wrapping past the top of the mailbox.
    pub fn load(&self, addr: u16, bytes: &[u8]) {
        let mut memory = self.memory.borrow_mut();
        let mut addr = MailboxAddress::new(addr);
        for &byte in bytes {
            memory[usize::from(addr.raw())] = byte;
            addr = addr.next();
        }
    }

    #[must_use]
    pub fn peek(&self, addr: u16) -> u8 {
        self.memory.borrow()[usize::from(addr)]
    }

    #[must_use]
    pub fn latch(&self) -> MailboxAddress {
        self.latch.get()
    }

    /// Handles opened and not yet closed.
    #[must_use]
    pub fn open_handles(&self) -> usize {
        self.open_handles.get()
    }

    #[must_use]
    pub fn operations(&self) -> Vec<Op> {
        self.operations.borrow().clone()
    }

    pub fn clear_operations(&self) {
        self.operations.borrow_mut().clear();
    }

    pub fn inject(&self, fault: Fault) {
        self.faults.borrow_mut().push(fault);
    }

    pub fn clear_faults(&self) {
        self.faults.borrow_mut().clear();
    }

    fn has_fault(&self, fault: Fault) -> bool {
        self.faults.borrow().contains(&fault)
    }

    fn record(&self, op: Op) {
        self.operations.borrow_mut().push(op);
    }

    fn register_at(&self, position: u64) -> Option<Register> {
        u16::try_from(position).ok().and_then(|port| self.registers.register_at(port))
    }

    fn store(&self, register: Option<Register>, value: u8) {
        let mut latch = self.latch.get();
        match register {
            Some(Register::RamAddrHi) => latch.set_hi(value),
            Some(Register::RamAddrLo) => latch.set_lo(value),
            Some(Register::WriteData) => self.memory.borrow_mut()[usize::from(latch.raw())] = value,
            Some(Register::ReadData) | None => ()
        }
        self.latch.set(latch);
    }

    fn load_byte(&self, register: Option<Register>) -> u8 {
        match register {
            Some(Register::ReadData) => self.memory.borrow()[usize::from(self.latch.get().raw())],
            _ => FLOATING_BUS
        }
    }
}

impl Default for SimulatedPort {
    fn default() -> Self {
        Self::new(Registers::default())
    }
}

impl PortIo for SimulatedPort {
    type Handle = SimHandle;

    fn open(&self) -> Result<SimHandle, portio::Error> {
        if self.has_fault(Fault::OpenFails) {
            return Err(portio::Error::Open(std::io::ErrorKind::PermissionDenied.into()));
        }

        self.open_handles.set(self.open_handles.get() + 1);
        self.record(Op::Open);
        Ok(SimHandle { position: 0 })
    }

    fn seek(&self, handle: &mut SimHandle, offset: u64) -> Result<u64, portio::Error> {
        self.record(Op::Seek(offset));
        let missed = u16::try_from(offset).map_or(false, |port| self.has_fault(Fault::SeekMisses(port)));
        handle.position = if missed { offset + 1 } else { offset };
        Ok(handle.position)
    }

    fn read(&self, handle: &mut SimHandle, buf: &mut [u8]) -> Result<usize, portio::Error> {
        let register = self.register_at(handle.position);
        for byte in buf.iter_mut() {
            if register == Some(Register::ReadData) && self.has_fault(Fault::ReadFailsAt(self.latch.get().raw())) {
                return Err(portio::Error::Read(std::io::ErrorKind::TimedOut.into()));
            }
            *byte = self.load_byte(register);
            self.record(Op::Read(*byte));
        }
        handle.position += buf.len() as u64;
        Ok(buf.len())
    }

    fn write(&self, handle: &mut SimHandle, buf: &[u8]) -> Result<usize, portio::Error> {
        let refused = u16::try_from(handle.position).map_or(false, |port| self.has_fault(Fault::WriteRefused(port)));
        if refused {
            return Ok(0);
        }

        let register = self.register_at(handle.position);
        for &byte in buf {
            self.store(register, byte);
            self.record(Op::Write(byte));
        }
        handle.position += buf.len() as u64;
        Ok(buf.len())
    }

    fn close(&self, _handle: SimHandle) {
        self.open_handles.set(self.open_handles.get().saturating_sub(1));
        self.record(Op::Close);
    }

    fn resource(&self) -> Cow<'_, str> {
        Cow::Borrowed("<simulated mailbox>")
    }
}



#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn address_latch_follows_register_writes() {
        let sim = SimulatedPort::default();
        let mut handle = sim.open().unwrap();
        sim.seek(&mut handle, 0x210).unwrap();
        sim.write(&mut handle, &[0xAB]).unwrap();
        sim.seek(&mut handle, 0x211).unwrap();
        sim.write(&mut handle, &[0xCD]).unwrap();
        assert_eq!(sim.latch().raw(), 0xABCD);

        sim.seek(&mut handle, 0x213).unwrap();
        sim.write(&mut handle, &[0x42]).unwrap();
        assert_eq!(sim.peek(0xABCD), 0x42);
        sim.close(handle);
        assert_eq!(sim.open_handles(), 0);
    }

    #[test]
    fn unmapped_ports_float_high() {
        let sim = SimulatedPort::default();
        let mut handle = sim.open().unwrap();
        sim.seek(&mut handle, 0x80).unwrap();
        let mut buf = [0u8; 1];
        sim.read(&mut handle, &mut buf).unwrap();
        assert_eq!(buf[0], 0xFF);
        sim.close(handle);
    }

    #[test]
    fn seek_fault_lands_elsewhere() {
        let sim = SimulatedPort::default();
        sim.inject(Fault::SeekMisses(0x212));
        let mut handle = sim.open().unwrap();
        assert_eq!(sim.seek(&mut handle, 0x212).unwrap(), 0x213);
        assert_eq!(sim.seek(&mut handle, 0x211).unwrap(), 0x211);
        sim.clear_faults();
        assert_eq!(sim.seek(&mut handle, 0x212).unwrap(), 0x212);
        sim.close(handle);
    }

    #[test]
    fn load_wraps() {
        let sim = SimulatedPort::default();
        sim.load(0xFFFE, &[1, 2, 3]);
        assert_eq!((sim.peek(0xFFFE), sim.peek(0xFFFF), sim.peek(0)), (1, 2, 3));
    }
}
