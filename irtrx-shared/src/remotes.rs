//! Zaapa media player remote, NEC with the `0x20DF` vendor bits

use crate::nec::NEC_INIT_MASK;

#[derive(Debug, Copy, Clone, Eq, PartialEq)]
pub struct Button {
    pub name: &'static str,
    pub code: u16,
}

pub const ZAAPA_VOL_PLUS: u16 = 0x10EF;

const fn button(name: &'static str, code: u16) -> Button {
    Button { name, code }
}

pub const ZAAPA: [Button; 32] = [
    button("OVERFLOW", 0xFFFF),
    button("POWER", 0x30CF),
    button("MUTE", 0xB24D),
    button("VMODE", 0x32CD),
    button("INFO", 0x827D),
    button("SUBT", 0x8A75),
    button("SETUP", 0xD827),
    button("PHOTO", 0x6A95),
    button("MUSIC", 0x02FD),
    button("MOVIE", 0x926D),
    button("FILE", 0xA25D),
    button("HOME", 0x20DF),
    button("DISPLAY", 0x728D),
    button("VOL_PLUS", ZAAPA_VOL_PLUS),
    button("VOL_LESS", 0x50AF),
    button("UP", 0x2AD5),
    button("DOWN", 0xBA45),
    button("LEFT", 0x9A65),
    button("RIGHT", 0x3AC5),
    button("OK", 0xB847),
    button("STOP", 0xF807),
    button("PLAY", 0xE01F),
    button("BACKWARD", 0x08F7),
    button("FORWARD", 0x28D7),
    button("PGUP", 0x18E7),
    button("PGDN", 0x38C7),
    button("STIME", 0x52AD),
    button("REPEAT", 0x40BF),
    button("SMODE", 0x1AE5),
    button("MSLIDE", 0x609F),
    button("ROTATE", 0xA05F),
    button("ZOOM", 0x5AA5),
];

/// Button by name, ignoring case
pub fn zaapa_code(name: &str) -> Option<u16> {
    ZAAPA
        .iter()
        .find(|b| b.name.eq_ignore_ascii_case(name))
        .map(|b| b.code)
}

/// Button for a received 32 bit NEC value
pub fn zaapa_button(value: u32) -> Option<&'static Button> {
    if value & 0xFFFF_0000 != NEC_INIT_MASK {
        return None;
    }
    ZAAPA.iter().find(|b| u32::from(b.code) == value & 0xFFFF)
}
