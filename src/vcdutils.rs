use std::fs::File;
use std::io;
use std::io::ErrorKind::InvalidInput;
use std::path::Path;

use vcd::{self, SimulationCommand, TimescaleUnit, Value};

/// Idle time appended after each written frame, in microseconds
const FRAME_GAP_US: u64 = 40_000;

pub struct VcdWriter<W: io::Write> {
    vcd: vcd::Writer<W>,
    timestamp: u64,
    wire_id: vcd::IdCode,
}

impl<W: io::Write> VcdWriter<W> {
    /// Create a new vcd writer
    pub fn new(w: W) -> Self {
        let vcd = vcd::Writer::new(w);

        Self {
            vcd,
            timestamp: 0,
            wire_id: vcd::IdCode::FIRST,
        }
    }

    /// Write the header, one wire named `wire` with a 1 us timescale
    pub fn init(&mut self, wire: &str) -> io::Result<()> {
        let writer = &mut self.vcd;

        writer.timescale(1, TimescaleUnit::US)?;
        writer.add_module("top")?;

        let id = writer.add_wire(1, wire)?;
        self.wire_id = id;

        writer.upscope()?;
        writer.enddefinitions()?;

        // Line starts idle
        writer.begin(SimulationCommand::Dumpvars)?;
        writer.change_scalar(id, Value::V0)?;
        writer.end()?;

        Ok(())
    }

    /// Write one frame of mark/space durations in microseconds, starting
    /// with a mark, and move past it.
    pub fn write_pulses(&mut self, pulses: &[u16]) -> io::Result<()> {
        let mut ts = 0u64;
        let mut mark = true;

        for &usecs in pulses {
            self.write_value(ts, mark)?;
            ts += u64::from(usecs);
            mark = !mark;
        }

        if !mark {
            self.write_value(ts, false)?;
        }

        self.add_offset(ts + FRAME_GAP_US);

        Ok(())
    }

    pub fn write_value(&mut self, ts: u64, high: bool) -> io::Result<()> {
        let offseted_ts = self.timestamp + ts;

        self.vcd.timestamp(offseted_ts)?;
        let value = if high { Value::V1 } else { Value::V0 };
        self.vcd.change_scalar(self.wire_id, value)?;

        Ok(())
    }

    pub fn add_offset(&mut self, offset: u64) {
        self.timestamp += offset;
    }
}

/// Read the level changes of `top.<wire>`. Returns the number of vcd time
/// units per second and the `(timestamp, high)` changes.
pub fn vcdfile_to_vec(path: &Path, wire: &str) -> io::Result<(u32, Vec<(u64, bool)>)> {
    let file = File::open(path)?;
    let mut parser = vcd::Parser::new(&file);

    // Parse the header and find the wire
    let header = parser.parse_header()?;
    let data = header
        .find_var(&["top", wire])
        .ok_or_else(|| io::Error::new(InvalidInput, format!("no wire top.{}", wire)))?
        .code;

    let samplerate = match header.timescale {
        Some((timescale, TimescaleUnit::MS)) => 1_000 / timescale,
        Some((timescale, TimescaleUnit::US)) => 1_000_000 / timescale,
        Some((timescale, TimescaleUnit::NS)) => 1_000_000_000 / timescale,
        other => {
            return Err(io::Error::new(
                InvalidInput,
                format!("unsupported timescale: {:?}", other),
            ))
        }
    };

    log::debug!("{}: samplerate {}", path.display(), samplerate);

    let mut current_ts = 0;
    let mut res: Vec<(u64, bool)> = Vec::new();

    for command_result in parser {
        use vcd::Command::*;
        let command = command_result?;
        match command {
            ChangeScalar(i, v) if i == data => {
                let one = v == Value::V1;
                res.push((current_ts, one));
            }
            Timestamp(ts) => current_ts = ts,
            _ => (),
        }
    }

    Ok((samplerate, res))
}
