//! Maps health state onto discrete indicator lines.

use crate::health::HealthState;

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum StatusLine {
    Power,
    /// Active while storage is unhealthy.
    Storage,
    /// Active while the last consumed rate was plausible.
    Pulse,
    /// Active while the pulse-error flag is latched.
    PulseError,
    Buzzer,
}

const LINE_COUNT: usize = 5;

impl StatusLine {
    pub const ALL: [StatusLine; LINE_COUNT] = [
        StatusLine::Power,
        StatusLine::Storage,
        StatusLine::Pulse,
        StatusLine::PulseError,
        StatusLine::Buzzer,
    ];

    const fn index(self) -> usize {
        self as usize
    }
}

/// Hardware seam. `active` is the logical level; polarity is the board's
/// business.
pub trait StatusOutputs {
    fn drive(&mut self, line: StatusLine, active: bool);
}

pub struct StatusIndicators<O> {
    outputs: O,
    levels: [Option<bool>; LINE_COUNT],
}

impl<O: StatusOutputs> StatusIndicators<O> {
    pub fn new(outputs: O) -> Self {
        Self {
            outputs,
            levels: [None; LINE_COUNT],
        }
    }

    /// Drives `line` only when its level differs from the last one written.
    pub fn set(&mut self, line: StatusLine, active: bool) {
        let slot = &mut self.levels[line.index()];
        if *slot == Some(active) {
            return;
        }
        *slot = Some(active);
        self.outputs.drive(line, active);
    }

    pub fn level(&self, line: StatusLine) -> Option<bool> {
        self.levels[line.index()]
    }

    pub fn refresh(&mut self, health: &HealthState) {
        self.set(StatusLine::Storage, !health.storage_ok());
        self.set(StatusLine::Pulse, health.pulse_ok());
        self.set(StatusLine::PulseError, health.pulse_error());
    }

    #[cfg(test)]
    pub(crate) fn outputs(&self) -> &O {
        &self.outputs
    }
}
