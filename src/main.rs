#![warn(clippy::pedantic)]

use std::process::ExitCode;

use anyhow::Context;
use clap::Parser;
use mailbox::{sim::SimulatedPort, Mailbox};
use portio::PortIo;

use crate::cli::{Args, Mode};

mod cli;
mod hexdump;
mod logger;



const EXIT_USAGE: u8 = 1;
const EXIT_DEVICE: u8 = 2;

fn execute<Port: PortIo>(mailbox: &Mailbox<'_, Port>, mode: &Mode) -> anyhow::Result<()> {
    log::info!("Using {} with registers {:x?}", mailbox.port().resource(), mailbox.registers().ports());

    match mode {
        Mode::Read { address, count } => {
            let buf = mailbox
                .read(address.raw(), *count)
                .with_context(|| format!("Unable to read {count} byte(s) at {address}"))?;
            hexdump::print(&buf);
        }
        Mode::Write { address, data } => {
            mailbox
                .write_values(address.raw(), data)
                .with_context(|| format!("Unable to write {} byte(s) at {address}", data.len()))?;
        }
    }

    Ok(())
}

fn run(args: &Args, mode: &Mode) -> anyhow::Result<()> {
    let config = args.config();

    if args.simulate {
        let port = SimulatedPort::new(config.registers);
        return execute(&Mailbox::new(&port, config.registers), mode);
    }

    if args.direct {
        #[cfg(all(target_os = "linux", any(target_arch = "x86", target_arch = "x86_64")))]
        {
            let port = config.raw_ports();
            return execute(&Mailbox::new(&port, config.registers), mode);
        }

        #[cfg(not(all(target_os = "linux", any(target_arch = "x86", target_arch = "x86_64"))))]
        anyhow::bail!("--direct is only available on Linux x86/x86_64");
    }

    let port = config.dev_port();
    execute(&Mailbox::new(&port, config.registers), mode)
}

fn main() -> ExitCode {
    let args = Args::parse();
    logger::init(args.verbose);

    let mode = match args.mode() {
        Ok(mode) => mode,
        Err(err) => {
            eprintln!("{err}");
            return ExitCode::from(EXIT_USAGE);
        }
    };

    match run(&args, &mode) {
        Ok(()) => ExitCode::SUCCESS,
        Err(err) => {
            eprintln!("{err:#}");
            ExitCode::from(exit_code(&err))
        }
    }
}

fn exit_code(err: &anyhow::Error) -> u8 {
    if err.downcast_ref::<mailbox::Error>().is_some_and(mailbox::Error::is_validation) {
        EXIT_USAGE
    } else {
        EXIT_DEVICE
    }
}
