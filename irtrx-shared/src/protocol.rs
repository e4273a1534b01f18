use core::convert::TryFrom;
use core::fmt;

/// Infrared protocols known to the receiver
#[derive(Debug, Copy, Clone, Eq, PartialEq, Hash)]
pub enum Protocol {
    Unknown,
    Nec,
    Sony,
    Rc5,
    Rc6,
    Dish,
    Sharp,
    Jvc,
    Sanyo,
    Mitsubishi,
    Samsung,
    Lg,
    Whynter,
    AiwaRcT501,
    Panasonic,
    Denon,
}

impl Protocol {
    /// Order in which the decoder tries the protocols
    pub const DECODE_ORDER: [Protocol; 10] = [
        Protocol::Nec,
        Protocol::Sony,
        Protocol::Rc5,
        Protocol::Rc6,
        Protocol::Panasonic,
        Protocol::Lg,
        Protocol::Jvc,
        Protocol::Samsung,
        Protocol::Whynter,
        Protocol::Denon,
    ];

    /// Name used in decode reports
    pub fn name(self) -> &'static str {
        match self {
            Protocol::Unknown => "UNKNOWN",
            Protocol::Nec => "NEC",
            Protocol::Sony => "SONY",
            Protocol::Rc5 => "RC5",
            Protocol::Rc6 => "RC6",
            Protocol::Dish => "DISH",
            Protocol::Sharp => "SHARP",
            Protocol::Jvc => "JVC",
            Protocol::Sanyo => "SANYO",
            Protocol::Mitsubishi => "MITSUBISHI",
            Protocol::Samsung => "SAMSUNG",
            Protocol::Lg => "LG",
            Protocol::Whynter => "WHYNTER",
            Protocol::AiwaRcT501 => "AIWA_RC_T501",
            Protocol::Panasonic => "PANASONIC",
            Protocol::Denon => "Denon",
        }
    }

    /// Protocols whose frames carry an address next to the value
    pub fn has_address(self) -> bool {
        matches!(self, Protocol::Panasonic)
    }
}

impl Default for Protocol {
    fn default() -> Self {
        Protocol::Unknown
    }
}

impl fmt::Display for Protocol {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl TryFrom<&str> for Protocol {
    type Error = ();

    fn try_from(s: &str) -> Result<Self, Self::Error> {
        let protocol = match s {
            "nec" => Protocol::Nec,
            "sony" => Protocol::Sony,
            "rc5" => Protocol::Rc5,
            "rc6" => Protocol::Rc6,
            "dish" => Protocol::Dish,
            "sharp" => Protocol::Sharp,
            "jvc" => Protocol::Jvc,
            "sanyo" => Protocol::Sanyo,
            "mitsubishi" => Protocol::Mitsubishi,
            "samsung" => Protocol::Samsung,
            "lg" => Protocol::Lg,
            "whynter" => Protocol::Whynter,
            "aiwa" => Protocol::AiwaRcT501,
            "panasonic" => Protocol::Panasonic,
            "denon" => Protocol::Denon,
            _ => return Err(()),
        };
        Ok(protocol)
    }
}
