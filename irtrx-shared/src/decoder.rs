//! Multi protocol decoder.
//!
//! [`decode`] runs the matchers in [`Protocol::DECODE_ORDER`] against a
//! captured [`RawPulseTrain`]. The first matcher accepting the train wins.
//! Trains nobody accepts are reported as [`Protocol::Unknown`] with a hash of
//! their timing so the same button keeps yielding the same value.

use crate::nec::{NEC_BITS, NEC_REPEAT};
use crate::protocol::Protocol;
use crate::pulse::RawPulseTrain;
use crate::timing::{
    self, classify_mark, classify_space, match_mark, match_space, matches, BitOrder,
    PulseDistance, MARK_EXCESS,
};

/// Shortest frame any matcher accepts (NEC repeat burst)
pub const MIN_FRAME_LEN: usize = 3;

const FNV_PRIME_32: u32 = 16_777_619;
const FNV_BASIS_32: u32 = 2_166_136_261;

#[derive(Debug, Copy, Clone, Default, Eq, PartialEq)]
pub struct DecodedSignal {
    pub protocol: Protocol,
    pub address: Option<u32>,
    pub value: u32,
    pub bit_count: u8,
    pub overflow: bool,
}

impl DecodedSignal {
    fn new(protocol: Protocol, value: u32, bit_count: u8) -> Self {
        DecodedSignal {
            protocol,
            address: None,
            value,
            bit_count,
            overflow: false,
        }
    }

    fn overflowed() -> Self {
        DecodedSignal {
            overflow: true,
            ..Default::default()
        }
    }

    pub fn is_known(&self) -> bool {
        self.protocol != Protocol::Unknown
    }
}

/// Reason a matcher rejected a train
#[derive(Debug, Copy, Clone, Eq, PartialEq)]
pub enum Mismatch {
    /// Pulse count does not fit the protocol
    Length(usize),
    Header,
    /// Bit `n` out of tolerance
    Bit(usize),
    Trailer,
    /// No matcher for this protocol
    Unsupported,
}

pub fn decode(train: &RawPulseTrain) -> DecodedSignal {
    if train.overflow() {
        log::debug!("Not decoding overflowed train ({} pulses)", train.len());
        return DecodedSignal::overflowed();
    }

    if train.len() < MIN_FRAME_LEN {
        log::debug!("Train too short: {} pulses", train.len());
        return DecodedSignal::default();
    }

    let pulses = train.as_slice();

    for &protocol in Protocol::DECODE_ORDER.iter() {
        match decode_as(protocol, pulses) {
            Ok(signal) => {
                log::debug!("Decoded {:?}", signal);
                return signal;
            }
            Err(mismatch) => log::trace!("{}: {:?}", protocol, mismatch),
        }
    }

    decode_hash(pulses)
}

/// Run the matcher of a single protocol
pub fn decode_as(protocol: Protocol, pulses: &[u16]) -> Result<DecodedSignal, Mismatch> {
    match protocol {
        Protocol::Nec => decode_nec(pulses),
        Protocol::Sony => decode_sony(pulses),
        Protocol::Rc5 => decode_rc5(pulses),
        Protocol::Rc6 => decode_rc6(pulses),
        Protocol::Panasonic => decode_panasonic(pulses),
        Protocol::Lg => decode_fixed(Protocol::Lg, &timing::LG, 28, pulses),
        Protocol::Jvc => decode_fixed(Protocol::Jvc, &timing::JVC, 16, pulses),
        Protocol::Samsung => decode_fixed(Protocol::Samsung, &timing::SAMSUNG, 32, pulses),
        Protocol::Whynter => decode_whynter(pulses),
        Protocol::Denon => decode_fixed(Protocol::Denon, &timing::DENON, 14, pulses),
        Protocol::Unknown
        | Protocol::Dish
        | Protocol::Sharp
        | Protocol::Sanyo
        | Protocol::Mitsubishi
        | Protocol::AiwaRcT501 => Err(Mismatch::Unsupported),
    }
}

/// Read a pulse distance frame of exactly `bits` bits
fn pulse_distance(t: &PulseDistance, bits: u8, pulses: &[u16]) -> Result<u64, Mismatch> {
    if pulses.len() != t.frame_len(bits) {
        return Err(Mismatch::Length(pulses.len()));
    }

    if !match_mark(pulses[0], t.header_mark) || !match_space(pulses[1], t.header_space) {
        return Err(Mismatch::Header);
    }

    let mut value = 0u64;

    for (i, pair) in pulses[2..2 + 2 * bits as usize].chunks_exact(2).enumerate() {
        if !match_mark(pair[0], t.bit_mark) {
            return Err(Mismatch::Bit(i));
        }
        let one = classify_space(pair[1], t.zero_space, t.one_space).ok_or(Mismatch::Bit(i))?;

        value = match t.order {
            BitOrder::LsbFirst => value | (u64::from(one) << i),
            BitOrder::MsbFirst => (value << 1) | u64::from(one),
        };
    }

    if !match_mark(pulses[pulses.len() - 1], t.bit_mark) {
        return Err(Mismatch::Trailer);
    }

    Ok(value)
}

fn decode_fixed(
    protocol: Protocol,
    t: &PulseDistance,
    bits: u8,
    pulses: &[u16],
) -> Result<DecodedSignal, Mismatch> {
    let value = pulse_distance(t, bits, pulses)?;
    Ok(DecodedSignal::new(protocol, value as u32, bits))
}

fn decode_nec(pulses: &[u16]) -> Result<DecodedSignal, Mismatch> {
    if pulses.len() < MIN_FRAME_LEN {
        return Err(Mismatch::Length(pulses.len()));
    }
    if !match_mark(pulses[0], timing::NEC.header_mark) {
        return Err(Mismatch::Header);
    }

    if pulses.len() == 3
        && match_space(pulses[1], timing::NEC_REPEAT_SPACE)
        && match_mark(pulses[2], timing::NEC.bit_mark)
    {
        return Ok(DecodedSignal::new(Protocol::Nec, NEC_REPEAT, 0));
    }

    decode_fixed(Protocol::Nec, &timing::NEC, NEC_BITS, pulses)
}

fn decode_panasonic(pulses: &[u16]) -> Result<DecodedSignal, Mismatch> {
    let raw = pulse_distance(&timing::PANASONIC, 48, pulses)?;

    Ok(DecodedSignal {
        address: Some((raw >> 32) as u32),
        ..DecodedSignal::new(Protocol::Panasonic, raw as u32, 48)
    })
}

/// Whynter frames open with a short start pulse before the header
fn decode_whynter(pulses: &[u16]) -> Result<DecodedSignal, Mismatch> {
    let t = &timing::WHYNTER;
    if pulses.len() < 2 {
        return Err(Mismatch::Length(pulses.len()));
    }
    if !match_mark(pulses[0], t.bit_mark) || !match_space(pulses[1], t.zero_space) {
        return Err(Mismatch::Header);
    }

    decode_fixed(Protocol::Whynter, t, 32, &pulses[2..])
}

/// Pulse width: the mark after each fixed space carries the bit
fn decode_sony(pulses: &[u16]) -> Result<DecodedSignal, Mismatch> {
    let len = pulses.len();
    let bits = (len.saturating_sub(1) / 2) as u8;

    if len % 2 == 0 || !matches!(bits, 12 | 15 | 20) {
        return Err(Mismatch::Length(len));
    }

    if !match_mark(pulses[0], timing::SONY_HDR_MARK) {
        return Err(Mismatch::Header);
    }

    let mut value = 0u32;

    for (i, pair) in pulses[1..].chunks_exact(2).enumerate() {
        if !match_space(pair[0], timing::SONY_HDR_SPACE) {
            return Err(Mismatch::Bit(i));
        }
        let one = classify_mark(pair[1], timing::SONY_ZERO_MARK, timing::SONY_ONE_MARK)
            .ok_or(Mismatch::Bit(i))?;
        value = (value << 1) | u32::from(one);
    }

    Ok(DecodedSignal::new(Protocol::Sony, value, bits))
}

/// Walks a Manchester coded train one half bit at a time
struct Manchester<'a> {
    pulses: &'a [u16],
    offset: usize,
    used: u32,
    t1: u32,
}

impl<'a> Manchester<'a> {
    fn new(pulses: &'a [u16], offset: usize, t1: u32) -> Self {
        Manchester {
            pulses,
            offset,
            used: 0,
            t1,
        }
    }

    fn at_end(&self) -> bool {
        self.offset >= self.pulses.len()
    }

    /// Level of the next half bit, `true` for mark. Past the end of the
    /// capture the line is idle.
    fn level(&mut self) -> Option<bool> {
        let width = match self.pulses.get(self.offset) {
            Some(&width) => width,
            None => return Some(false),
        };

        let mark = self.offset % 2 == 0;
        let nominal = |n: u32| {
            if mark {
                n * self.t1 + MARK_EXCESS
            } else {
                (n * self.t1).saturating_sub(MARK_EXCESS)
            }
        };

        let avail = (1..=3).find(|&n| matches(width, nominal(n)))?;

        self.used += 1;
        if self.used >= avail {
            self.used = 0;
            self.offset += 1;
        }

        Some(mark)
    }

    fn expect(&mut self, mark: bool) -> Result<(), Mismatch> {
        if self.level() == Some(mark) {
            Ok(())
        } else {
            Err(Mismatch::Header)
        }
    }
}

/// Minimum pulses of an RC5 frame
const MIN_RC5_SAMPLES: usize = 11;

fn decode_rc5(pulses: &[u16]) -> Result<DecodedSignal, Mismatch> {
    if pulses.len() < MIN_RC5_SAMPLES {
        return Err(Mismatch::Length(pulses.len()));
    }

    let mut rc = Manchester::new(pulses, 0, timing::RC5_T1);

    // Start bits, the leading space of the first one is not captured
    rc.expect(true)?;
    rc.expect(false)?;
    rc.expect(true)?;

    let mut value = 0u32;
    let mut nbits = 0;

    while !rc.at_end() {
        if nbits == 32 {
            return Err(Mismatch::Length(pulses.len()));
        }
        let bit = match (rc.level(), rc.level()) {
            (Some(false), Some(true)) => 1,
            (Some(true), Some(false)) => 0,
            _ => return Err(Mismatch::Bit(nbits)),
        };
        value = (value << 1) | bit;
        nbits += 1;
    }

    Ok(DecodedSignal::new(Protocol::Rc5, value, nbits as u8))
}

fn decode_rc6(pulses: &[u16]) -> Result<DecodedSignal, Mismatch> {
    if pulses.len() < 4 {
        return Err(Mismatch::Length(pulses.len()));
    }

    if !match_mark(pulses[0], timing::RC6_HDR_MARK)
        || !match_space(pulses[1], timing::RC6_HDR_SPACE)
    {
        return Err(Mismatch::Header);
    }

    let mut rc = Manchester::new(pulses, 2, timing::RC6_T1);

    // Start bit
    rc.expect(true)?;
    rc.expect(false)?;

    let mut value = 0u32;
    let mut nbits = 0;

    while !rc.at_end() {
        if nbits == 32 {
            return Err(Mismatch::Length(pulses.len()));
        }

        let first = rc.level();
        // The trailer bit is twice as wide
        if nbits == 3 && rc.level() != first {
            return Err(Mismatch::Bit(nbits));
        }
        let second = rc.level();
        if nbits == 3 && rc.level() != second {
            return Err(Mismatch::Bit(nbits));
        }

        let bit = match (first, second) {
            (Some(true), Some(false)) => 1,
            (Some(false), Some(true)) => 0,
            _ => return Err(Mismatch::Bit(nbits)),
        };
        value = (value << 1) | bit;
        nbits += 1;
    }

    Ok(DecodedSignal::new(Protocol::Rc6, value, nbits as u8))
}

/// 0 when `new` is clearly shorter than `old`, 2 when clearly longer
fn compare(old: u16, new: u16) -> u32 {
    let (old, new) = (u32::from(old), u32::from(new));
    if new * 10 < old * 8 {
        0
    } else if old * 10 < new * 8 {
        2
    } else {
        1
    }
}

/// FNV-1 hash over the trend of every mark and every space
fn decode_hash(pulses: &[u16]) -> DecodedSignal {
    if pulses.len() < 5 {
        return DecodedSignal::default();
    }

    let hash = pulses
        .windows(3)
        .fold(FNV_BASIS_32, |hash, w| {
            hash.wrapping_mul(FNV_PRIME_32) ^ compare(w[0], w[2])
        });

    DecodedSignal::new(Protocol::Unknown, hash, 32)
}
