#![cfg_attr(not(any(test, feature = "std")), no_std)]

//! Infrared transceiver core.
//!
//! Captures mark/space edges into a [`pulse::RawPulseTrain`], decodes it into a
//! [`decoder::DecodedSignal`] and encodes NEC frames for transmission. The
//! [`transceiver::Transceiver`] ties both pipelines into one poll loop.

pub mod capture;
pub mod decoder;
pub mod dispatch;
pub mod encoder;
pub mod error;
pub mod line;
pub mod nec;
pub mod parse;
pub mod protocol;
pub mod pulse;
pub mod remotes;
pub mod report;
pub mod timing;
pub mod transceiver;

pub use crate::capture::{EdgeDetector, EdgeSource, Sample};
pub use crate::decoder::{decode, DecodedSignal};
pub use crate::dispatch::{Action, Dispatcher, Mode};
pub use crate::error::Error;
pub use crate::nec::{encode_nec, encode_nec_overflow, NEC_INIT_MASK, NEC_OVERFLOW};
pub use crate::protocol::Protocol;
pub use crate::pulse::{PulseSequence, RawPulseTrain};
pub use crate::transceiver::{PulseEmitter, SerialIo, Transceiver};

/// Serial speed of the command console
pub const SERIAL_BAUDS: u32 = 115_200;

/// Serial line buffer size. A line holds at most `RX_BUFFER_SIZE - 1` bytes
pub const RX_BUFFER_SIZE: usize = 512;
