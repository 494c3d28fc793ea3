#[derive(Debug)]
pub enum Error {
    Open(std::io::Error),
    Seek(u64, std::io::Error),
    Read(std::io::Error),
    Write(std::io::Error),
    Permission(u16, std::io::Error),
    NotGranted(u64),
    Unpositioned,
    Closed
}

impl std::fmt::Display for Error {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Error::Open(err) => write!(f, "Unable to open the port resource: {err}"),
            Error::Seek(offset, err) => write!(f, "Unable to seek to {offset:#x}: {err}"),
            Error::Read(err) => write!(f, "Unable to read from the port: {err}"),
            Error::Write(err) => write!(f, "Unable to write to the port: {err}"),
            Error::Permission(port, err) => write!(f, "Unable to get I/O permission for port {port:#x}: {err}"),
            Error::NotGranted(offset) => write!(f, "Port {offset:#x} is outside of the granted range"),
            Error::Unpositioned => write!(f, "No port selected, seek first."),
            Error::Closed => write!(f, "The port handle is already closed.")
        }
    }
}

impl std::error::Error for Error {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            Error::Open(err)
            | Error::Seek(_, err)
            | Error::Read(err)
            | Error::Write(err)
            | Error::Permission(_, err) => Some(err),
            Error::NotGranted(_)
            | Error::Unpositioned
            | Error::Closed => None
        }
    }
}
