//! Consumer side: drains the sample ring, converts, guards and persists.


use core::fmt;

use crate::{
    buffer::Consumer,
    capture::Acquisition,
    config::{MISSED_BEAT_SAMPLE, SAMPLE_BUFFER_CAPACITY},
    console::{Console, Transport},
    rate::{LogRecord, RateConverter},
    session::{LogWriter, ProvisionError, SessionPhase},
    storage::LogStorage,
    telemetry::CountersSnapshot,
};

#[derive(Debug, PartialEq, Eq)]
pub enum StartupError<E> {
    ConsumerTaken,
    Provision(ProvisionError<E>),
}

impl<E> From<ProvisionError<E>> for StartupError<E> {
    fn from(value: ProvisionError<E>) -> Self {
        Self::Provision(value)
    }
}

impl<E: fmt::Debug> fmt::Display for StartupError<E> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::ConsumerTaken => f.write_str("sample consumer already in use"),
            Self::Provision(err) => write!(f, "{err}"),
        }
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Step {
    /// Nothing buffered.
    Idle,
    Logged(LogRecord),
    /// Terminal: persistence failed and acquisition is disarmed.
    Stopped,
}

pub struct Recorder<'a, S: LogStorage, T: Transport, const N: usize = SAMPLE_BUFFER_CAPACITY> {
    acquisition: &'a Acquisition<N>,
    consumer: Consumer<'a, N>,
    writer: LogWriter<S>,
    console: Console<T>,
    converter: RateConverter,
}

impl<'a, S: LogStorage, T: Transport, const N: usize> Recorder<'a, S, T, N> {
    /// Greets on the console, provisions the log file and arms acquisition.
    ///
    /// On error the context stays disarmed and storage stays flagged unhealthy.
    pub fn start(
        acquisition: &'a Acquisition<N>,
        storage: S,
        transport: T,
    ) -> Result<Self, StartupError<S::Error>> {
        let consumer = acquisition
            .take_consumer()
            .ok_or(StartupError::ConsumerTaken)?;
        let mut console = Console::new(transport);
        console.banner();

        let mut writer = LogWriter::new(storage);
        if let Err(err) = writer.provision(&mut console) {
            acquisition.health().set_storage_ok(false);
            return Err(err.into());
        }

        acquisition.health().set_storage_ok(true);
        acquisition.arm();
        Ok(Self {
            acquisition,
            consumer,
            writer,
            console,
            converter: RateConverter::default(),
        })
    }

    pub fn phase(&self) -> SessionPhase {
        self.writer.phase()
    }

    pub fn writer(&self) -> &LogWriter<S> {
        &self.writer
    }

    pub fn console(&self) -> &Console<T> {
        &self.console
    }

    /// Consumes at most one sample.
    pub fn step(&mut self) -> Step {
        if self.writer.phase() == SessionPhase::Stopped {
            return Step::Stopped;
        }
        let Some(popped) = self.consumer.pop_tracked() else {
            return Step::Idle;
        };

        let health = self.acquisition.health();
        let counters = self.acquisition.counters();
        if popped.lost > 0 {
            counters.record_samples_lost(popped.lost as u32);
            log::warn!("{} samples overwritten before logging", popped.lost);
        }

        let (rate, record) = self.converter.record_for(popped.sample);
        let plausible = rate.is_plausible();
        health.set_pulse_ok(plausible);
        if !plausible {
            counters.record_implausible_rate();
            // The watchdog already alerted for its own sentinel.
            if popped.sample != MISSED_BEAT_SAMPLE {
                health.raise_alert();
            }
        }
        self.console.line(format_args!("{}", record.text()));

        match self.writer.append(&record, &mut self.console) {
            Ok(()) => {
                health.set_storage_ok(true);
                counters.record_written();
                Step::Logged(record)
            }
            Err(err) => {
                health.set_storage_ok(false);
                self.acquisition.disarm();
                log::error!("acquisition stopped: {}", err);
                Step::Stopped
            }
        }
    }

    /// Consumes everything currently buffered, in order.
    pub fn drain(&mut self) -> Step {
        loop {
            match self.step() {
                Step::Logged(_) => continue,
                idle_or_stopped => return idle_or_stopped,
            }
        }
    }

    /// Bare-metal consumer loop: spins while the ring is empty and returns
    /// only once the session has stopped.
    pub fn run_blocking(&mut self) -> CountersSnapshot {
        loop {
            match self.step() {
                Step::Idle => core::hint::spin_loop(),
                Step::Logged(_) => {}
                Step::Stopped => return self.acquisition.counters().snapshot(),
            }
        }
    }
}
