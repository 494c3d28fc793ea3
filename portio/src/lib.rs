#![warn(clippy::pedantic)]

pub mod interface;
pub mod auto;
pub mod error;
pub mod dev_port;

#[cfg(all(target_os = "linux", any(target_arch = "x86", target_arch = "x86_64")))]
pub mod raw_ports;

pub use interface::PortIo;
pub use auto::Auto;
pub use error::Error;
pub use dev_port::DevPort;

#[cfg(all(target_os = "linux", any(target_arch = "x86", target_arch = "x86_64")))]
pub use raw_ports::RawPorts;
