use std::{
    borrow::Cow,
    fs::{File, OpenOptions},
    io::{Read, Seek, SeekFrom, Write},
    path::{Path, PathBuf}
};

use crate::{error::Error, interface::PortIo};

/// Port access through a device node where the file offset is the port number, e.g. `/dev/port`.
#[derive(Debug, Clone)]
pub struct DevPort {
    path: PathBuf
}

impl DevPort {
    pub const DEFAULT_RESOURCE: &'static str = "/dev/port";

    #[must_use]
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    #[must_use]
    pub fn path(&self) -> &Path {
        &self.path
    }
}

impl Default for DevPort {
    fn default() -> Self {
        Self::new(Self::DEFAULT_RESOURCE)
    }
}

impl PortIo for DevPort {
    type Handle = File;

    fn open(&self) -> Result<File, Error> {
        OpenOptions::new()
            .read(true)
            .write(true)
            .open(&self.path)
            .map_err(Error::Open)
    }

    fn seek(&self, file: &mut File, offset: u64) -> Result<u64, Error> {
        file.seek(SeekFrom::Start(offset)).map_err(|err| Error::Seek(offset, err))
    }

    fn read(&self, file: &mut File, buf: &mut [u8]) -> Result<usize, Error> {
        file.read(buf).map_err(Error::Read)
    }

    fn write(&self, file: &mut File, buf: &[u8]) -> Result<usize, Error> {
        file.write(buf).map_err(Error::Write)
    }

    fn close(&self, file: File) {
        drop(file);
    }

    fn resource(&self) -> Cow<'_, str> {
        self.path.to_string_lossy()
    }
}



#[cfg(test)]
mod tests {
    use super::*;

    use crate::Auto;

    // A plain file stands in for the device node: offsets behave the same way.
    fn scratch_file(name: &str, size: usize) -> PathBuf {
        let path = std::env::temp_dir().join(format!("portio-{}-{name}", std::process::id()));
        std::fs::write(&path, vec![0u8; size]).unwrap();
        path
    }

    #[test]
    fn default_resource() {
        assert_eq!(DevPort::default().path(), Path::new("/dev/port"));
    }

    #[test]
    fn seek_write_read_at_offsets() {
        let path = scratch_file("rw", 0x300);
        let port = DevPort::new(&path);
        {
            let mut session = Auto::open(&port).unwrap();
            assert_eq!(session.seek(0x213).unwrap(), 0x213);
            assert_eq!(session.write(&[0x5A]).unwrap(), 1);
            assert_eq!(session.seek(0x213).unwrap(), 0x213);
            let mut value = [0u8; 1];
            assert_eq!(session.read(&mut value).unwrap(), 1);
            assert_eq!(value[0], 0x5A);
        }
        let contents = std::fs::read(&path).unwrap();
        assert_eq!(contents[0x213], 0x5A);
        assert_eq!(contents[0x212], 0);
        std::fs::remove_file(path).unwrap();
    }

    #[test]
    fn open_missing_resource() {
        let port = DevPort::new("/nonexistent/port/device");
        assert!(matches!(Auto::open(&port), Err(Error::Open(_))));
    }
}
