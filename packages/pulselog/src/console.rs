//! Human-readable status text over a byte transport.

use core::fmt::{self, Write};

pub trait Transport {
    fn transmit(&mut self, byte: u8);
}

impl<T: Transport + ?Sized> Transport for &mut T {
    fn transmit(&mut self, byte: u8) {
        (**self).transmit(byte);
    }
}

/// Line-oriented writer; every line ends in `"\n\r"` for serial terminals.
pub struct Console<T> {
    transport: T,
}

impl<T: Transport> Console<T> {
    pub fn new(transport: T) -> Self {
        Self { transport }
    }

    pub fn line(&mut self, args: fmt::Arguments<'_>) {
        let _ = self.write_fmt(args);
        self.end_line();
    }

    pub fn end_line(&mut self) {
        self.transport.transmit(b'\n');
        self.transport.transmit(b'\r');
    }

    pub fn banner(&mut self) {
        self.end_line();
        self.end_line();
        self.line(format_args!("** heart rate logger **"));
    }

    pub fn transport(&self) -> &T {
        &self.transport
    }
}

impl<T: Transport> Write for Console<T> {
    fn write_str(&mut self, s: &str) -> fmt::Result {
        for byte in s.bytes() {
            self.transport.transmit(byte);
        }
        Ok(())
    }
}
