pub(crate) mod config;
mod interrupts;
mod runtime;
mod tasks;

pub use runtime::run;
