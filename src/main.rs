use std::convert::TryFrom;
use std::path::{Path, PathBuf};
use std::thread;
use std::time::Duration;

use anyhow::anyhow;
use heapless::spsc::Queue;
use structopt::StructOpt;

use irtrx_shared::{Protocol, Sample, Transceiver};

mod capture;
mod console;
mod irsend;
mod playback;
mod vcdutils;

use console::{Console, SerialConsole, StdConsole};
use irsend::{Emitter, VcdEmitter};

/// Capture queue between the replay thread and the poll loop
const CAPTURE_QUEUE_LEN: usize = 1024;

const POLL_INTERVAL: Duration = Duration::from_millis(1);

#[derive(Debug, StructOpt)]
#[structopt(name = "irtrx", about = "Infrared NEC transceiver")]
struct Opt {
    #[structopt(short, long)]
    debug: bool,
    #[structopt(subcommand)]
    cmd: CliCommand,
}

#[derive(StructOpt, Debug)]
enum CliCommand {
    /// Run the transceiver with a command console
    Run {
        /// Serial device used as console. Defaults to stdin and stdout
        #[structopt(long = "device", parse(from_os_str))]
        serial: Option<PathBuf>,
        /// Vcd capture fed to the receiver
        #[structopt(long, parse(from_os_str))]
        replay: Option<PathBuf>,
        /// Write transmitted frames to a vcd file
        #[structopt(long = "tx-vcd", parse(from_os_str))]
        tx_vcd: Option<PathBuf>,
        /// Wire name in the replayed capture
        #[structopt(long, default_value = "ir")]
        wire: String,
    },
    /// Decode a vcd capture
    Decode {
        #[structopt(parse(from_os_str))]
        path: PathBuf,
        #[structopt(long, default_value = "ir")]
        wire: String,
        /// Only run this decoder: nec sony rc5 rc6 panasonic lg jvc samsung whynter denon
        #[structopt(long)]
        protocol: Option<String>,
    },
    /// Print the NEC frame of a code or Zaapa button
    Encode {
        /// Hex code, e.g. 0x10EF, or button name
        code: Option<String>,
        /// Encode the overflow marker instead
        #[structopt(long)]
        overflow: bool,
        #[structopt(long, parse(from_os_str))]
        vcd: Option<PathBuf>,
    },
    /// List serial ports
    Ports,
}

fn main() -> anyhow::Result<()> {
    let opt = Opt::from_args();

    let loglevel = if opt.debug {
        log::LevelFilter::Debug
    } else {
        log::LevelFilter::Info
    };

    env_logger::Builder::from_default_env()
        .filter_level(loglevel)
        .init();

    match opt.cmd {
        CliCommand::Run {
            serial,
            replay,
            tx_vcd,
            wire,
        } => command_run(serial.as_deref(), replay.as_deref(), tx_vcd.as_deref(), &wire),
        CliCommand::Decode {
            path,
            wire,
            protocol,
        } => {
            let protocol = protocol
                .map(|name| {
                    Protocol::try_from(name.to_lowercase().as_str())
                        .map_err(|_| anyhow!("Protocol: {} not found", name))
                })
                .transpose()?;
            playback::command_decode(&path, &wire, protocol)
        }
        CliCommand::Encode {
            code,
            overflow,
            vcd,
        } => irsend::command_encode(code.as_deref(), overflow, vcd.as_deref()),
        CliCommand::Ports => {
            for port in SerialConsole::list_ports()? {
                println!("{}", port.port_name);
            }
            Ok(())
        }
    }
}

fn command_run(
    serial: Option<&Path>,
    replay: Option<&Path>,
    tx_vcd: Option<&Path>,
    wire: &str,
) -> anyhow::Result<()> {
    let console = match serial {
        Some(path) => {
            log::info!("Console on {}", path.display());
            Console::Serial(SerialConsole::open(path)?)
        }
        None => Console::Std(StdConsole::spawn()),
    };

    let emitter = match tx_vcd {
        Some(path) => Emitter::Vcd(VcdEmitter::create(path)?),
        None => Emitter::Log,
    };

    let samples = match replay {
        Some(path) => capture::load(path, wire)?,
        None => Vec::new(),
    };

    let mut queue: Queue<Sample, CAPTURE_QUEUE_LEN> = Queue::new();
    let (producer, consumer) = queue.split();

    thread::scope(|s| {
        let replaying = s.spawn(move || capture::replay(samples, producer));

        let mut transceiver = Transceiver::new(console, consumer, emitter);
        transceiver.start()?;

        loop {
            if let Err(err) = transceiver.poll() {
                log::warn!("Console write failed: {:?}", err);
            }

            let drained = replaying.is_finished() && transceiver.edges_mut().len() == 0;
            if drained && transceiver.serial().is_closed() {
                log::debug!("Input closed, stopping");
                break;
            }

            thread::sleep(POLL_INTERVAL);
        }

        Ok(())
    })
}
