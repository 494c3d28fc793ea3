use std::borrow::Cow;

use crate::error::Error;

/// A byte-addressable I/O port resource.
///
/// Offsets are absolute port numbers. Every transaction goes through a handle
/// obtained from [`PortIo::open`] and released with [`PortIo::close`]; use
/// [`crate::Auto`] to get the release on every exit path.
pub trait PortIo {
    type Handle;

    /// # Errors
    ///
    /// Returns an error if the resource can't be opened.
    fn open(&self) -> Result<Self::Handle, Error>;

    /// Moves the handle to the absolute `offset` and returns the offset it actually landed on.
    ///
    /// # Errors
    ///
    /// Returns an error if the backend refuses to seek.
    fn seek(&self, handle: &mut Self::Handle, offset: u64) -> Result<u64, Error>;

    /// # Errors
    ///
    /// Returns an error in case of a failed port read.
    fn read(&self, handle: &mut Self::Handle, buf: &mut [u8]) -> Result<usize, Error>;

    /// # Errors
    ///
    /// Returns an error in case of a failed port write.
    fn write(&self, handle: &mut Self::Handle, buf: &[u8]) -> Result<usize, Error>;

    fn close(&self, handle: Self::Handle);

    /// Human-readable name of the resource, used in diagnostics.
    fn resource(&self) -> Cow<'_, str>;
}
