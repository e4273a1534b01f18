//! The poll loop shared by both pipelines.
//!
//! Every [`Transceiver::poll`] drains pending capture samples, handles at
//! most one serial command line and reports at most one captured frame.
//! Nothing in it waits.

use core::fmt::{self, Write};

use crate::capture::{EdgeDetector, EdgeSource};
use crate::decoder::decode;
use crate::dispatch::{Action, Dispatcher, Mode};
use crate::line::{CommandLine, LineAssembler};
use crate::nec::encode_nec;
use crate::pulse::PulseSequence;
use crate::report;

/// Command console: non blocking byte input, text output
pub trait SerialIo: Write {
    fn read_byte(&mut self) -> Option<u8>;
}

/// Infrared output stage
pub trait PulseEmitter {
    type Error: fmt::Debug;

    /// Send one frame. Returns once the whole frame is out.
    fn emit(&mut self, sequence: &PulseSequence) -> Result<(), Self::Error>;
}

pub struct Transceiver<S, E, T> {
    serial: S,
    edges: E,
    emitter: T,
    lines: LineAssembler,
    dispatcher: Dispatcher,
    detector: EdgeDetector,
}

impl<S, E, T> Transceiver<S, E, T>
where
    S: SerialIo,
    E: EdgeSource,
    T: PulseEmitter,
{
    pub fn new(serial: S, edges: E, emitter: T) -> Self {
        Transceiver {
            serial,
            edges,
            emitter,
            lines: LineAssembler::new(),
            dispatcher: Dispatcher::new(),
            detector: EdgeDetector::new(),
        }
    }

    pub fn start(&mut self) -> fmt::Result {
        writeln!(self.serial, "Starting IR receiver...")?;
        writeln!(self.serial, "Setup done.")?;
        writeln!(self.serial)
    }

    pub fn mode(&self) -> Mode {
        self.dispatcher.mode()
    }

    pub fn serial(&self) -> &S {
        &self.serial
    }

    pub fn emitter(&self) -> &T {
        &self.emitter
    }

    pub fn edges_mut(&mut self) -> &mut E {
        &mut self.edges
    }

    /// One iteration of the main loop
    pub fn poll(&mut self) -> fmt::Result {
        self.poll_capture();
        self.poll_serial()?;
        self.poll_decode()
    }

    /// Feed queued samples to the detector. A finished frame stays in place
    /// and later samples stay queued until it has been handled.
    fn poll_capture(&mut self) {
        while !self.detector.is_ready() {
            match self.edges.next_sample() {
                Some(sample) => {
                    self.detector.sample(sample.mark, sample.ts);
                }
                None => break,
            }
        }
    }

    fn poll_serial(&mut self) -> fmt::Result {
        while let Some(byte) = self.serial.read_byte() {
            match self.lines.push(byte) {
                Ok(Some(line)) => return self.handle_line(&line),
                Ok(None) => {}
                Err(err) => log::warn!("Dropping serial input: {}", err),
            }
        }
        Ok(())
    }

    fn handle_line(&mut self, line: &CommandLine) -> fmt::Result {
        let text = match line.as_str() {
            Ok(text) => text,
            Err(err) => {
                log::warn!("Dropping line {:?}: {}", line.as_bytes(), err);
                return Ok(());
            }
        };

        writeln!(self.serial, "> {}", text)?;

        match self.dispatcher.dispatch(text) {
            Action::Help => {
                writeln!(self.serial, "Available commands:")?;
                writeln!(self.serial, "ir mode rx - Change to IR receive signals mode")?;
                writeln!(self.serial, "ir mode tx - Change to IR transmit signals mode")?;
            }
            Action::ModeChanged(Mode::Receive) => {
                writeln!(self.serial, "Changed to IR Receive mode.")?;
            }
            Action::ModeChanged(Mode::Transmit) => {
                writeln!(self.serial, "Changed to IR Transmit mode.")?;
                writeln!(self.serial, "Send IR NEC codes, for example:")?;
                writeln!(self.serial, "0x10EF")?;
                writeln!(self.serial)?;
            }
            Action::Transmit(code) => self.transmit(code)?,
            Action::Ignore => {}
        }

        Ok(())
    }

    fn transmit(&mut self, code: u16) -> fmt::Result {
        let sequence = match encode_nec(code) {
            Ok(sequence) => sequence,
            Err(err) => {
                log::warn!("Cannot encode {:#X}: {}", code, err);
                return Ok(());
            }
        };

        match self.emitter.emit(&sequence) {
            Ok(()) => writeln!(self.serial, "Sent code: 0x{:X}", code),
            Err(err) => {
                log::warn!("Transmit of {:#X} failed: {:?}", code, err);
                Ok(())
            }
        }
    }

    /// Report a finished frame and rearm the detector. Frames captured while
    /// transmitting are dropped.
    fn poll_decode(&mut self) -> fmt::Result {
        let train = match self.detector.frame() {
            Some(train) => train,
            None => return Ok(()),
        };

        let result = if self.dispatcher.mode() == Mode::Receive {
            let signal = decode(train);
            log::info!("Received {} {}", signal.protocol, report::Code(&signal));
            report::write_report(&mut self.serial, &signal, train)
        } else {
            log::debug!("Dropping frame captured in transmit mode");
            Ok(())
        };

        self.detector.reset();
        result
    }
}
