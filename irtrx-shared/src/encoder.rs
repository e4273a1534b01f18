use crate::error::Error;
use crate::pulse::PulseSequence;
use crate::timing::{BitOrder, PulseDistance};

/// Encode the low `bits` bits of `value` as a pulse distance frame:
/// header, one mark/space pair per bit, trailing mark.
pub fn encode(timing: &PulseDistance, value: u64, bits: u8) -> Result<PulseSequence, Error> {
    if bits > 64 {
        return Err(Error::InvalidInput);
    }

    let mut seq = PulseSequence::new(timing.carrier_khz);

    seq.mark(timing.header_mark)?;
    seq.space(timing.header_space)?;

    for i in 0..bits {
        let shift = match timing.order {
            BitOrder::LsbFirst => i,
            BitOrder::MsbFirst => bits - 1 - i,
        };
        let one = (value >> shift) & 1 == 1;

        seq.mark(timing.bit_mark)?;
        seq.space(if one { timing.one_space } else { timing.zero_space })?;
    }

    seq.mark(timing.bit_mark)?;

    Ok(seq)
}
