//! Tick quantization and timing tolerance.
//!
//! Captured durations are counted in ticks of [`USECPERTICK`] microseconds.
//! Nominal protocol timings are kept in microseconds and converted to a tick
//! window on comparison.

/// Microseconds per capture tick
pub const USECPERTICK: u32 = 50;

/// Accepted deviation from a nominal duration, in percent
pub const TOLERANCE: u32 = 25;

/// Receivers stretch marks and shorten spaces by about this many microseconds
pub const MARK_EXCESS: u32 = 100;

/// Space that terminates a frame, in microseconds
pub const GAP_USECS: u32 = 5000;

/// Space that terminates a frame, in ticks
pub const GAP_TICKS: u32 = GAP_USECS / USECPERTICK;

/// Smallest tick count accepted for `usecs`
pub const fn ticks_low(usecs: u32) -> u32 {
    usecs * (100 - TOLERANCE) / (100 * USECPERTICK)
}

/// Largest tick count accepted for `usecs`
pub const fn ticks_high(usecs: u32) -> u32 {
    usecs * (100 + TOLERANCE) / (100 * USECPERTICK) + 1
}

/// Round a duration in microseconds to the nearest tick
pub fn usecs_to_ticks(usecs: u32) -> u16 {
    let ticks = (usecs + USECPERTICK / 2) / USECPERTICK;
    ticks.min(u32::from(u16::MAX)) as u16
}

pub fn ticks_to_usecs(ticks: u16) -> u32 {
    u32::from(ticks) * USECPERTICK
}

pub fn matches(measured: u16, usecs: u32) -> bool {
    let measured = u32::from(measured);
    measured >= ticks_low(usecs) && measured <= ticks_high(usecs)
}

pub fn match_mark(measured: u16, usecs: u32) -> bool {
    matches(measured, usecs + MARK_EXCESS)
}

pub fn match_space(measured: u16, usecs: u32) -> bool {
    matches(measured, usecs.saturating_sub(MARK_EXCESS))
}

/// Classify a space as a `0` or `1` bit against the midpoint of the two
/// nominal durations, then check it is within tolerance of the chosen one.
pub fn classify_space(measured: u16, zero: u32, one: u32) -> Option<bool> {
    let midpoint = (zero + one) / 2;
    if ticks_to_usecs(measured) + MARK_EXCESS >= midpoint {
        Some(true).filter(|_| match_space(measured, one))
    } else {
        Some(false).filter(|_| match_space(measured, zero))
    }
}

/// Mark counterpart of [`classify_space`] for pulse width protocols
pub fn classify_mark(measured: u16, zero: u32, one: u32) -> Option<bool> {
    let midpoint = (zero + one) / 2;
    if ticks_to_usecs(measured).saturating_sub(MARK_EXCESS) >= midpoint {
        Some(true).filter(|_| match_mark(measured, one))
    } else {
        Some(false).filter(|_| match_mark(measured, zero))
    }
}

#[derive(Debug, Copy, Clone, Eq, PartialEq)]
pub enum BitOrder {
    LsbFirst,
    MsbFirst,
}

/// Pulse distance protocol: every bit is a fixed mark followed by a space
/// whose length carries the bit value.
#[derive(Debug, Copy, Clone, Eq, PartialEq)]
pub struct PulseDistance {
    pub header_mark: u32,
    pub header_space: u32,
    pub bit_mark: u32,
    pub zero_space: u32,
    pub one_space: u32,
    pub order: BitOrder,
    pub carrier_khz: u32,
}

impl PulseDistance {
    /// Number of pulses in a frame of `bits` bits, trailing mark included
    pub const fn frame_len(&self, bits: u8) -> usize {
        2 + 2 * bits as usize + 1
    }
}

pub const NEC: PulseDistance = PulseDistance {
    header_mark: 9000,
    header_space: 4500,
    bit_mark: 560,
    zero_space: 560,
    one_space: 1690,
    order: BitOrder::LsbFirst,
    carrier_khz: 38,
};

pub const NEC_REPEAT_SPACE: u32 = 2250;

pub const JVC: PulseDistance = PulseDistance {
    header_mark: 8000,
    header_space: 4000,
    bit_mark: 600,
    zero_space: 550,
    one_space: 1600,
    order: BitOrder::MsbFirst,
    carrier_khz: 38,
};

pub const LG: PulseDistance = PulseDistance {
    header_mark: 8000,
    header_space: 4000,
    bit_mark: 600,
    zero_space: 550,
    one_space: 1600,
    order: BitOrder::MsbFirst,
    carrier_khz: 38,
};

pub const SAMSUNG: PulseDistance = PulseDistance {
    header_mark: 5000,
    header_space: 5000,
    bit_mark: 560,
    zero_space: 560,
    one_space: 1600,
    order: BitOrder::MsbFirst,
    carrier_khz: 38,
};

pub const PANASONIC: PulseDistance = PulseDistance {
    header_mark: 3502,
    header_space: 1750,
    bit_mark: 502,
    zero_space: 400,
    one_space: 1244,
    order: BitOrder::MsbFirst,
    carrier_khz: 35,
};

pub const WHYNTER: PulseDistance = PulseDistance {
    header_mark: 2850,
    header_space: 2850,
    bit_mark: 750,
    zero_space: 750,
    one_space: 2150,
    order: BitOrder::MsbFirst,
    carrier_khz: 38,
};

pub const DENON: PulseDistance = PulseDistance {
    header_mark: 300,
    header_space: 750,
    bit_mark: 300,
    zero_space: 750,
    one_space: 1800,
    order: BitOrder::MsbFirst,
    carrier_khz: 38,
};

// Sony, pulse width
pub const SONY_HDR_MARK: u32 = 2400;
pub const SONY_HDR_SPACE: u32 = 600;
pub const SONY_ONE_MARK: u32 = 1200;
pub const SONY_ZERO_MARK: u32 = 600;

// Manchester half bit periods
pub const RC5_T1: u32 = 889;
pub const RC6_T1: u32 = 444;
pub const RC6_HDR_MARK: u32 = 2666;
pub const RC6_HDR_SPACE: u32 = 889;
