use crate::parse::parse_u16;

#[derive(Debug, Copy, Clone, Eq, PartialEq)]
pub enum Mode {
    Receive,
    Transmit,
}

impl Default for Mode {
    fn default() -> Self {
        Mode::Receive
    }
}

/// What the transceiver does with a command line
#[derive(Debug, Copy, Clone, Eq, PartialEq)]
pub enum Action {
    Help,
    ModeChanged(Mode),
    Transmit(u16),
    Ignore,
}

/// Interprets command lines and owns the operating mode
#[derive(Debug, Default)]
pub struct Dispatcher {
    mode: Mode,
}

impl Dispatcher {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn mode(&self) -> Mode {
        self.mode
    }

    pub fn dispatch(&mut self, line: &str) -> Action {
        match line {
            "help" => Action::Help,
            "ir mode rx" => self.switch(Mode::Receive),
            "ir mode tx" => self.switch(Mode::Transmit),
            _ if self.mode == Mode::Transmit => match parse_u16(line, 16) {
                Ok(code) => Action::Transmit(code),
                Err(err) => {
                    log::debug!("Ignoring {:?}: {}", line, err);
                    Action::Ignore
                }
            },
            _ => Action::Ignore,
        }
    }

    fn switch(&mut self, mode: Mode) -> Action {
        if self.mode == mode {
            return Action::Ignore;
        }
        log::info!("Mode: {:?}", mode);
        self.mode = mode;
        Action::ModeChanged(mode)
    }
}
