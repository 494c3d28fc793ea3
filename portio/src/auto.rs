use crate::{error::Error, interface::PortIo};

/// An open port handle which is closed when dropped.
pub struct Auto<'a, Port: PortIo> {
    port: &'a Port,
    handle: Option<Port::Handle>
}

impl<'a, Port: PortIo> Auto<'a, Port> {
    /// # Errors
    ///
    /// Returns an error if the port resource can't be opened.
    pub fn open(port: &'a Port) -> Result<Self, Error> {
        let handle = port.open()?;
        log::trace!("Opened {}", port.resource());
        Ok(Self { port, handle: Some(handle) })
    }

    #[must_use]
    pub fn is_valid(&self) -> bool {
        self.handle.is_some()
    }

    fn handle_mut(&mut self) -> Result<&mut Port::Handle, Error> {
        self.handle.as_mut().ok_or(Error::Closed)
    }

    /// # Errors
    ///
    /// Returns an error if the handle is closed or the backend fails to seek.
    pub fn seek(&mut self, offset: u64) -> Result<u64, Error> {
        let port = self.port;
        let reached = port.seek(self.handle_mut()?, offset)?;
        log::trace!("seek {offset:#06x} -> {reached:#06x}");
        Ok(reached)
    }

    /// # Errors
    ///
    /// Returns an error if the handle is closed or the backend fails to read.
    pub fn read(&mut self, buf: &mut [u8]) -> Result<usize, Error> {
        let port = self.port;
        let count = port.read(self.handle_mut()?, buf)?;
        log::trace!("read {:02x?}", &buf[..count.min(buf.len())]);
        Ok(count)
    }

    /// # Errors
    ///
    /// Returns an error if the handle is closed or the backend fails to write.
    pub fn write(&mut self, buf: &[u8]) -> Result<usize, Error> {
        let port = self.port;
        let count = port.write(self.handle_mut()?, buf)?;
        log::trace!("write {buf:02x?} -> {count}");
        Ok(count)
    }

    pub fn close(&mut self) {
        if let Some(handle) = self.handle.take() {
            self.port.close(handle);
            log::trace!("Closed {}", self.port.resource());
        }
    }
}

impl<'a, Port: PortIo> Drop for Auto<'a, Port> {
    fn drop(&mut self) {
        self.close();
    }
}



#[cfg(test)]
mod tests {
    use std::{borrow::Cow, cell::Cell};

    use super::*;

    #[derive(Default)]
    struct Counting {
        opened: Cell<usize>,
        closed: Cell<usize>
    }

    impl PortIo for Counting {
        type Handle = u64;

        fn open(&self) -> Result<u64, Error> {
            self.opened.set(self.opened.get() + 1);
            Ok(0)
        }

        fn seek(&self, handle: &mut u64, offset: u64) -> Result<u64, Error> {
            *handle = offset;
            Ok(offset)
        }

        fn read(&self, _handle: &mut u64, buf: &mut [u8]) -> Result<usize, Error> {
            buf.fill(0xAA);
            Ok(buf.len())
        }

        fn write(&self, _handle: &mut u64, _buf: &[u8]) -> Result<usize, Error> {
            Err(Error::Write(std::io::ErrorKind::BrokenPipe.into()))
        }

        fn close(&self, _handle: u64) {
            self.closed.set(self.closed.get() + 1);
        }

        fn resource(&self) -> Cow<'_, str> {
            Cow::Borrowed("counting")
        }
    }

    #[test]
    fn closes_on_drop() {
        let port = Counting::default();
        {
            let mut session = Auto::open(&port).unwrap();
            assert_eq!(session.seek(0x212).unwrap(), 0x212);
            let mut buf = [0u8; 2];
            assert_eq!(session.read(&mut buf).unwrap(), 2);
            assert_eq!(buf, [0xAA, 0xAA]);
        }
        assert_eq!(port.opened.get(), 1);
        assert_eq!(port.closed.get(), 1);
    }

    #[test]
    fn closes_once_after_failure() {
        let port = Counting::default();
        {
            let mut session = Auto::open(&port).unwrap();
            assert!(session.write(&[1]).is_err());
            session.close();
            assert!(!session.is_valid());
            assert!(matches!(session.seek(0), Err(Error::Closed)));
        }
        assert_eq!(port.closed.get(), 1);
    }
}
