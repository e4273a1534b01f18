use core::convert::TryFrom;

use heapless::Vec;

use crate::error::Error;
use crate::timing::{ticks_to_usecs, usecs_to_ticks};

/// Capacity of the raw capture buffer, in pulses
pub const RAWBUF: usize = 100;

/// Capture of one frame: alternating mark and space durations in ticks,
/// starting with a mark.
#[derive(Clone, Debug, Default, Eq, PartialEq)]
pub struct RawPulseTrain {
    pulses: Vec<u16, RAWBUF>,
    overflow: bool,
}

impl RawPulseTrain {
    pub fn new() -> Self {
        Self::default()
    }

    /// Build a train from tick durations. Durations past the capacity are
    /// dropped and flag the train as overflowed.
    pub fn from_ticks(ticks: &[u16]) -> Self {
        let mut train = Self::new();
        for &t in ticks {
            if train.push(t).is_err() {
                break;
            }
        }
        train
    }

    /// Build a train from durations in microseconds
    pub fn from_usecs(usecs: &[u16]) -> Self {
        let mut train = Self::new();
        for &us in usecs {
            if train.push(usecs_to_ticks(u32::from(us))).is_err() {
                break;
            }
        }
        train
    }

    /// Append a duration. Filling the last slot flags the train as
    /// overflowed, writing past it is rejected.
    pub fn push(&mut self, ticks: u16) -> Result<(), Error> {
        if self.pulses.push(ticks).is_err() {
            self.overflow = true;
            return Err(Error::BufferFull);
        }
        if self.pulses.is_full() {
            self.overflow = true;
        }
        Ok(())
    }

    pub fn clear(&mut self) {
        self.pulses.clear();
        self.overflow = false;
    }

    pub fn len(&self) -> usize {
        self.pulses.len()
    }

    pub fn is_empty(&self) -> bool {
        self.pulses.is_empty()
    }

    pub fn overflow(&self) -> bool {
        self.overflow
    }

    pub fn as_slice(&self) -> &[u16] {
        &self.pulses
    }

    /// Durations scaled back to microseconds
    pub fn usecs(&self) -> impl Iterator<Item = u32> + '_ {
        self.pulses.iter().map(|&t| ticks_to_usecs(t))
    }
}

/// Frame to transmit: mark and space durations in microseconds, starting
/// with a mark, modulated at `carrier_khz`.
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct PulseSequence {
    carrier_khz: u32,
    pulses: Vec<u16, RAWBUF>,
}

impl PulseSequence {
    pub fn new(carrier_khz: u32) -> Self {
        Self {
            carrier_khz,
            pulses: Vec::new(),
        }
    }

    pub fn mark(&mut self, usecs: u32) -> Result<(), Error> {
        self.push(usecs)
    }

    pub fn space(&mut self, usecs: u32) -> Result<(), Error> {
        self.push(usecs)
    }

    fn push(&mut self, usecs: u32) -> Result<(), Error> {
        let usecs = u16::try_from(usecs).map_err(|_| Error::InvalidInput)?;
        self.pulses.push(usecs).map_err(|_| Error::BufferFull)
    }

    pub fn carrier_khz(&self) -> u32 {
        self.carrier_khz
    }

    pub fn as_slice(&self) -> &[u16] {
        &self.pulses
    }

    pub fn len(&self) -> usize {
        self.pulses.len()
    }

    pub fn is_empty(&self) -> bool {
        self.pulses.is_empty()
    }

    /// Total frame duration in microseconds
    pub fn duration(&self) -> u32 {
        self.pulses.iter().map(|&us| u32::from(us)).sum()
    }
}
