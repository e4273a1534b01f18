use std::fmt;
use std::io::{self, Read, Write};
use std::path::Path;
use std::sync::mpsc::{self, Receiver, TryRecvError};
use std::thread;
use std::time::Duration;

use serialport::{SerialPort, SerialPortInfo};

use irtrx_shared::{SerialIo, SERIAL_BAUDS};

/// Console on the process stdin and stdout. Stdin is read on a helper thread
/// so `read_byte` never blocks.
pub struct StdConsole {
    rx: Receiver<u8>,
    closed: bool,
}

impl StdConsole {
    pub fn spawn() -> Self {
        let (tx, rx) = mpsc::channel();

        thread::spawn(move || {
            for byte in io::stdin().bytes() {
                match byte {
                    Ok(byte) => {
                        if tx.send(byte).is_err() {
                            break;
                        }
                    }
                    Err(err) => {
                        log::warn!("stdin: {}", err);
                        break;
                    }
                }
            }
            log::debug!("stdin closed");
        });

        StdConsole { rx, closed: false }
    }
}

impl fmt::Write for StdConsole {
    fn write_str(&mut self, s: &str) -> fmt::Result {
        let mut stdout = io::stdout();
        stdout.write_all(s.as_bytes()).map_err(|_| fmt::Error)?;
        stdout.flush().map_err(|_| fmt::Error)
    }
}

impl SerialIo for StdConsole {
    fn read_byte(&mut self) -> Option<u8> {
        match self.rx.try_recv() {
            Ok(byte) => Some(byte),
            Err(TryRecvError::Empty) => None,
            Err(TryRecvError::Disconnected) => {
                self.closed = true;
                None
            }
        }
    }
}

/// Console on a serial device, 8N1 at [`SERIAL_BAUDS`]
pub struct SerialConsole {
    port: Box<dyn SerialPort>,
}

impl SerialConsole {
    pub fn open<P: AsRef<Path>>(path: P) -> Result<Self, serialport::Error> {
        let path = path.as_ref().to_string_lossy();
        let port = serialport::new(path, SERIAL_BAUDS)
            .timeout(Duration::from_millis(10))
            .open()?;

        Ok(SerialConsole { port })
    }

    pub fn list_ports() -> Result<Vec<SerialPortInfo>, serialport::Error> {
        serialport::available_ports()
    }
}

impl fmt::Write for SerialConsole {
    fn write_str(&mut self, s: &str) -> fmt::Result {
        self.port.write_all(s.as_bytes()).map_err(|_| fmt::Error)
    }
}

impl SerialIo for SerialConsole {
    fn read_byte(&mut self) -> Option<u8> {
        match self.port.bytes_to_read() {
            Ok(0) => return None,
            Ok(_) => {}
            Err(err) => {
                log::warn!("Serial port: {}", err);
                return None;
            }
        }

        let mut byte = [0u8; 1];
        match self.port.read(&mut byte) {
            Ok(1) => Some(byte[0]),
            Ok(_) => None,
            Err(ref e) if e.kind() == io::ErrorKind::TimedOut => None,
            Err(err) => {
                log::warn!("Serial port: {}", err);
                None
            }
        }
    }
}

pub enum Console {
    Std(StdConsole),
    Serial(SerialConsole),
}

impl Console {
    /// No more input will arrive. A serial device never closes.
    pub fn is_closed(&self) -> bool {
        match self {
            Console::Std(console) => console.closed,
            Console::Serial(_) => false,
        }
    }
}

impl fmt::Write for Console {
    fn write_str(&mut self, s: &str) -> fmt::Result {
        match self {
            Console::Std(console) => fmt::Write::write_str(console, s),
            Console::Serial(console) => fmt::Write::write_str(console, s),
        }
    }
}

impl SerialIo for Console {
    fn read_byte(&mut self) -> Option<u8> {
        match self {
            Console::Std(console) => console.read_byte(),
            Console::Serial(console) => console.read_byte(),
        }
    }
}
