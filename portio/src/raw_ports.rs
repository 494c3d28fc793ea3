//!
//! Direct port access with `in`/`out` instructions.
//!
//! The process must be allowed to call `ioperm` (root or `CAP_SYS_RAWIO`).
//! Permission is requested for every listed port when a handle is opened
//! and dropped again when it is closed. A "seek" only selects the port the
//! next `in`/`out` goes to.
//!

use std::{arch::asm, borrow::Cow};

use libc::{c_int, c_ulong};

use crate::{error::Error, interface::PortIo};

fn set_permission(port: u16, enable: bool) -> Result<(), Error> {
    let status = unsafe { libc::ioperm(c_ulong::from(port), 1, c_int::from(enable)) };
    if status == 0 {
        Ok(())
    } else {
        Err(Error::Permission(port, std::io::Error::last_os_error()))
    }
}

#[inline]
fn inb(port: u16) -> u8 {
    let value: u8;
    unsafe {
        asm!(
            "in al, dx",
            out("al") value,
            in("dx") port,
            options(nomem, nostack, preserves_flags)
        );
    }
    value
}

#[inline]
fn outb(port: u16, value: u8) {
    unsafe {
        asm!(
            "out dx, al",
            in("dx") port,
            in("al") value,
            options(nomem, nostack, preserves_flags)
        );
    }
}



pub struct RawHandle {
    current: Option<u16>
}

#[derive(Debug, Clone)]
pub struct RawPorts {
    ports: Vec<u16>
}

impl RawPorts {
    #[must_use]
    pub fn new(ports: &[u16]) -> Self {
        let mut ports = ports.to_vec();
        ports.sort_unstable();
        ports.dedup();
        Self { ports }
    }

    #[must_use]
    pub fn ports(&self) -> &[u16] {
        &self.ports
    }

    fn revoke(ports: &[u16]) {
        for &port in ports {
            if let Err(err) = set_permission(port, false) {
                log::warn!("{err}");
            }
        }
    }
}

impl PortIo for RawPorts {
    type Handle = RawHandle;

    fn open(&self) -> Result<RawHandle, Error> {
        for (granted, &port) in self.ports.iter().enumerate() {
            if let Err(err) = set_permission(port, true) {
                Self::revoke(&self.ports[..granted]);
                return Err(err);
            }
        }

        Ok(RawHandle { current: None })
    }

    fn seek(&self, handle: &mut RawHandle, offset: u64) -> Result<u64, Error> {
        match u16::try_from(offset) {
            Ok(port) if self.ports.binary_search(&port).is_ok() => {
                handle.current = Some(port);
                Ok(offset)
            }
            _ => Err(Error::NotGranted(offset))
        }
    }

    fn read(&self, handle: &mut RawHandle, buf: &mut [u8]) -> Result<usize, Error> {
        let port = handle.current.ok_or(Error::Unpositioned)?;
        for byte in buf.iter_mut() {
            *byte = inb(port);
        }
        Ok(buf.len())
    }

    fn write(&self, handle: &mut RawHandle, buf: &[u8]) -> Result<usize, Error> {
        let port = handle.current.ok_or(Error::Unpositioned)?;
        for &byte in buf {
            outb(port, byte);
        }
        Ok(buf.len())
    }

    fn close(&self, _handle: RawHandle) {
        Self::revoke(&self.ports);
    }

    fn resource(&self) -> Cow<'_, str> {
        Cow::Owned(format!("ioperm{:x?}", self.ports))
    }
}
