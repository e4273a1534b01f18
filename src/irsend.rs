use std::fs::File;
use std::io;
use std::path::Path;

use anyhow::anyhow;

use irtrx_shared::parse::parse_u16;
use irtrx_shared::remotes::zaapa_code;
use irtrx_shared::{
    decode, encode_nec, encode_nec_overflow, report, PulseEmitter, PulseSequence, RawPulseTrain,
};

use crate::vcdutils::VcdWriter;

/// Writes every transmitted frame to a vcd file
pub struct VcdEmitter {
    writer: VcdWriter<File>,
}

impl VcdEmitter {
    pub fn create(path: &Path) -> io::Result<Self> {
        let mut writer = VcdWriter::new(File::create(path)?);
        writer.init("ir")?;
        Ok(VcdEmitter { writer })
    }
}

impl PulseEmitter for VcdEmitter {
    type Error = io::Error;

    fn emit(&mut self, sequence: &PulseSequence) -> io::Result<()> {
        self.writer.write_pulses(sequence.as_slice())
    }
}

pub enum Emitter {
    Vcd(VcdEmitter),
    /// No output stage, frames are only logged
    Log,
}

impl PulseEmitter for Emitter {
    type Error = io::Error;

    fn emit(&mut self, sequence: &PulseSequence) -> io::Result<()> {
        log::info!(
            "Transmit {} pulses at {} kHz, {} us",
            sequence.len(),
            sequence.carrier_khz(),
            sequence.duration()
        );
        log::debug!("{:?}", sequence.as_slice());

        match self {
            Emitter::Vcd(vcd) => vcd.emit(sequence),
            Emitter::Log => Ok(()),
        }
    }
}

/// Code from hex text or a Zaapa button name
pub fn resolve_code(text: &str) -> anyhow::Result<u16> {
    parse_u16(text, 16)
        .ok()
        .or_else(|| zaapa_code(text))
        .ok_or_else(|| anyhow!("Not a code or button: {}", text))
}

/// Build the NEC frame of `code`, print what a receiver would report for it
/// and optionally write it to a vcd file.
pub fn command_encode(code: Option<&str>, overflow: bool, vcd: Option<&Path>) -> anyhow::Result<()> {
    let sequence = if overflow {
        encode_nec_overflow()?
    } else {
        let text = code.ok_or_else(|| anyhow!("Missing code"))?;
        encode_nec(resolve_code(text)?)?
    };

    let train = RawPulseTrain::from_usecs(sequence.as_slice());
    let mut out = String::new();
    report::write_report(&mut out, &decode(&train), &train)?;
    print!("{}", out);

    if let Some(path) = vcd {
        VcdEmitter::create(path)?.emit(&sequence)?;
        log::info!("Wrote {}", path.display());
    }

    Ok(())
}
