//! NEC transmission

use crate::encoder;
use crate::error::Error;
use crate::pulse::PulseSequence;
use crate::timing::NEC;

/// Vendor bits set on every transmitted code
pub const NEC_INIT_MASK: u32 = 0x20DF_0000;

/// Sentinel sent to exercise overflow handling on the receiving side
pub const NEC_OVERFLOW: u32 = 0xFFFF_FFFF;

/// Value reported for a NEC repeat burst
pub const NEC_REPEAT: u32 = 0xFFFF_FFFF;

pub const NEC_BITS: u8 = 32;

/// Frame for `code` with the vendor mask applied
pub fn encode_nec(code: u16) -> Result<PulseSequence, Error> {
    encode_nec_raw(NEC_INIT_MASK | u32::from(code))
}

pub fn encode_nec_overflow() -> Result<PulseSequence, Error> {
    encode_nec_raw(NEC_OVERFLOW)
}

/// Frame for a full 32 bit value, no mask applied
pub fn encode_nec_raw(value: u32) -> Result<PulseSequence, Error> {
    encoder::encode(&NEC, u64::from(value), NEC_BITS)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn frame_layout() {
        let seq = encode_nec(0x10EF).unwrap();
        assert_eq!(seq.len(), NEC.frame_len(NEC_BITS));
        assert_eq!(seq.carrier_khz(), 38);

        let pulses = seq.as_slice();
        assert_eq!(&pulses[..2], &[9000, 4500]);
        assert_eq!(pulses[pulses.len() - 1], 560);

        // 0x20DF10EF, LSB first: 1,1,1,1,0,1,1,1
        let spaces: std::vec::Vec<u16> = pulses[3..18].iter().step_by(2).cloned().collect();
        assert_eq!(spaces, vec![1690, 1690, 1690, 1690, 560, 1690, 1690, 1690]);
    }

    #[test]
    fn overflow_sentinel() {
        let seq = encode_nec_overflow().unwrap();
        assert!(seq.as_slice()[3..66].iter().step_by(2).all(|&us| us == 1690));
    }
}
