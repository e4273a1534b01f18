use std::path::Path;

use irtrx_shared::decoder::decode_as;
use irtrx_shared::report::{self, Code};
use irtrx_shared::{decode, EdgeDetector, Protocol, RawPulseTrain, Sample};

use crate::capture;

/// Run samples through the edge detector and collect the captured trains
pub fn capture_frames(samples: &[Sample]) -> Vec<RawPulseTrain> {
    let mut detector = EdgeDetector::new();
    let mut frames = Vec::new();

    for sample in samples {
        detector.sample(sample.mark, sample.ts);

        if let Some(train) = detector.frame() {
            frames.push(train.clone());
            detector.reset();
        }
    }

    frames
}

/// Decode every frame of a vcd capture. With `protocol` only that matcher
/// is run and its mismatches are reported.
pub fn command_decode(path: &Path, wire: &str, protocol: Option<Protocol>) -> anyhow::Result<()> {
    let samples = capture::load(path, wire)?;
    let frames = capture_frames(&samples);

    if frames.is_empty() {
        println!("No frames captured");
        return Ok(());
    }

    for (i, train) in frames.iter().enumerate() {
        log::debug!("Frame {}: {:?}", i, train.as_slice());

        match protocol {
            Some(protocol) => match decode_as(protocol, train.as_slice()) {
                Ok(signal) => println!("{}\t{}\t{} bits", protocol, Code(&signal), signal.bit_count),
                Err(mismatch) => println!("{}\tno match: {:?}", protocol, mismatch),
            },
            None => {
                let mut out = String::new();
                report::write_report(&mut out, &decode(train), train)?;
                print!("{}", out);
            }
        }
    }

    Ok(())
}
