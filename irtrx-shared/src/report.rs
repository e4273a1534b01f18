//! Decode reports, printed once per received frame.
//!
//! ```text
//! Encoding  : NEC
//! Code      : 20DF10EF (32 bits)
//! uint16_t  rawData[67] = {9000,4500, 550,1650, ...};  // NEC 20DF10EF
//! uint16_t data = 0x20DF10EF;
//! ```

use core::fmt::{self, Write};

use crate::decoder::DecodedSignal;
use crate::protocol::Protocol;
use crate::pulse::{RawPulseTrain, RAWBUF};
use crate::remotes::zaapa_button;

/// Decoded code, `address:value` in hex for protocols with an address
pub struct Code<'a>(pub &'a DecodedSignal);

impl fmt::Display for Code<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.0.protocol.has_address() {
            write!(f, "{:X}:", self.0.address.unwrap_or(0))?;
        }
        write!(f, "{:X}", self.0.value)
    }
}

pub fn write_report<W: Write>(
    out: &mut W,
    signal: &DecodedSignal,
    train: &RawPulseTrain,
) -> fmt::Result {
    write_info(out, signal)?;
    write_raw(out, signal, train)?;
    writeln!(out)
}

/// Encoding, code and bit count
pub fn write_info<W: Write>(out: &mut W, signal: &DecodedSignal) -> fmt::Result {
    if signal.overflow {
        return writeln!(out, "IR code too long. Increase RAWBUF ({})", RAWBUF);
    }

    writeln!(out, "Encoding  : {}", signal.protocol)?;
    writeln!(out, "Code      : {} ({} bits)", Code(signal), signal.bit_count)?;

    if signal.protocol == Protocol::Nec {
        if let Some(button) = zaapa_button(signal.value) {
            writeln!(out, "Button    : ZAAPA {}", button.name)?;
        }
    }

    Ok(())
}

/// Raw durations as a paste ready C array, then the decoded fields
pub fn write_raw<W: Write>(
    out: &mut W,
    signal: &DecodedSignal,
    train: &RawPulseTrain,
) -> fmt::Result {
    let len = train.len();

    write!(out, "uint16_t  rawData[{}] = {{", len)?;
    for (i, usecs) in train.usecs().enumerate() {
        write!(out, "{}", usecs)?;
        if i + 1 < len {
            out.write_char(',')?;
        }
        // Break after every mark/space pair
        if i % 2 == 1 {
            out.write_char(' ')?;
        }
    }
    writeln!(out, "}};  // {} {}", signal.protocol, Code(signal))?;

    if signal.is_known() {
        if signal.protocol.has_address() {
            writeln!(out, "uint16_t addr = 0x{:X};", signal.address.unwrap_or(0))?;
        }
        writeln!(out, "uint16_t data = 0x{:X};", signal.value)?;
    }

    Ok(())
}
