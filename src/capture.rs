use std::io;
use std::path::Path;
use std::thread;

use heapless::spsc::Producer;

use irtrx_shared::timing::{GAP_TICKS, USECPERTICK};
use irtrx_shared::Sample;

use crate::vcdutils::vcdfile_to_vec;

/// Load a vcd capture as receiver samples
pub fn load(path: &Path, wire: &str) -> io::Result<Vec<Sample>> {
    let (samplerate, edges) = vcdfile_to_vec(path, wire)?;
    log::info!("Loaded {} edges from {}", edges.len(), path.display());
    Ok(samples_from_edges(samplerate, &edges))
}

/// Convert `(timestamp, high)` level changes to samples in receiver ticks.
///
/// Idle samples are appended after the last change so the final frame ends
/// even though the capture holds no further edges.
pub fn samples_from_edges(samplerate: u32, edges: &[(u64, bool)]) -> Vec<Sample> {
    let units_per_tick = u64::from(samplerate) * u64::from(USECPERTICK);
    let to_ticks = |ts: u64| (ts * 1_000_000 / units_per_tick.max(1)) as u32;

    let mut samples: Vec<Sample> = edges
        .iter()
        .map(|&(ts, high)| Sample::new(high, to_ticks(ts)))
        .collect();

    // Close whatever is still open at the end of the capture
    if let Some(last) = samples.last().copied() {
        let end = last.ts.wrapping_add(GAP_TICKS + 1);
        samples.push(Sample::new(false, end));
        samples.push(Sample::new(false, end.wrapping_add(GAP_TICKS + 1)));
    }

    samples
}

/// Feed samples into the capture queue, waiting while it is full
pub fn replay<const N: usize>(samples: Vec<Sample>, mut producer: Producer<'_, Sample, N>) {
    let count = samples.len();

    for sample in samples {
        let mut pending = sample;
        while let Err(rejected) = producer.enqueue(pending) {
            pending = rejected;
            thread::yield_now();
        }
    }

    log::debug!("Replayed {} samples", count);
}

#[cfg(test)]
mod tests {
    use super::*;
    use irtrx_shared::capture::{EdgeDetector, State};

    #[test]
    fn converts_to_ticks() {
        // 1 us timescale
        let edges = [(0, false), (1000, true), (10_000, false), (14_500, true), (15_060, false)];
        let samples = samples_from_edges(1_000_000, &edges);

        assert_eq!(samples[1], Sample::new(true, 20));
        assert_eq!(samples[2], Sample::new(false, 200));
        assert_eq!(samples[3], Sample::new(true, 290));
        assert_eq!(samples[4], Sample::new(false, 301));
        assert_eq!(samples.len(), 7);
    }

    #[test]
    fn back_to_back_frames_from_edges() {
        let edges = [
            (0, true),
            (9000, false),
            (13_500, true),
            (14_060, false),
            (100_000, true),
            (100_560, false),
        ];
        let samples = samples_from_edges(1_000_000, &edges);

        let mut detector = EdgeDetector::new();
        let mut frames = 0;
        for sample in samples {
            if detector.sample(sample.mark, sample.ts) == State::FrameComplete {
                frames += 1;
                detector.reset();
            }
        }
        assert_eq!(frames, 2);
    }
}
