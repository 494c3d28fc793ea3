use crate::registers::Register;

#[derive(Debug)]
pub enum Error {
    InvalidValue(u32),
    Open(portio::Error),
    Port(Register, portio::Error),
    SeekMismatch { register: Register, requested: u16, reached: u64 },
    ShortWrite { register: Register, written: usize },
    ShortRead { register: Register, read: usize }
}

impl Error {
    /// The caller passed something the device can't take; nothing was sent to the ports.
    #[must_use]
    pub fn is_validation(&self) -> bool {
        matches!(self, Error::InvalidValue(_))
    }

    #[must_use]
    pub fn is_io(&self) -> bool {
        !self.is_validation()
    }

    #[must_use]
    pub fn register(&self) -> Option<Register> {
        match self {
            Error::Port(register, _)
            | Error::SeekMismatch { register, .. }
            | Error::ShortWrite { register, .. }
            | Error::ShortRead { register, .. } => Some(*register),
            Error::InvalidValue(_)
            | Error::Open(_) => None
        }
    }
}

impl std::fmt::Display for Error {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Error::InvalidValue(value) => write!(f, "Value {value:#x} doesn't fit in a byte (<= 0xFF)"),
            Error::Open(err) => write!(f, "File open failed: {err}"),
            Error::Port(register, err) => write!(f, "Port access to {register} failed: {err}"),
            Error::SeekMismatch { register, requested, reached } => write!(
                f, "Seek failed to {register}: requested {requested:#x}, landed on {reached:#x}"
            ),
            Error::ShortWrite { register, written } => write!(f, "Write failed to {register}: {written} bytes written"),
            Error::ShortRead { register, read } => write!(f, "Read failed from {register}: {read} bytes read")
        }
    }
}

impl std::error::Error for Error {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            Error::Open(err)
            | Error::Port(_, err) => Some(err),
            Error::InvalidValue(_)
            | Error::SeekMismatch { .. }
            | Error::ShortWrite { .. }
            | Error::ShortRead { .. } => None
        }
    }
}
