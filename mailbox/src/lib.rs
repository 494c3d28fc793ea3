#![warn(clippy::pedantic)]

pub mod registers;
pub mod accessor;
pub mod config;
pub mod error;
pub mod sim;

pub use registers::{MailboxAddress, Register, Registers};
pub use accessor::Mailbox;
pub use config::Config;
pub use error::Error;
