// SPDX-License-Identifier: MIT
// © 2025–2026 Christopher Liu

//! USART abstraction layer.
//!
//! - [`Usart`]: transmit-only debug printer, used as the log sink.
//! - [`SerialLink`]: full-duplex host link carrying commands in and telemetry out.
//!
//! Note: When using `writeln!` on a [`Usart`], be sure to include `\r` (CR) in the format string to
//! ensure correct line endings on the terminal.
//!
//! To access the terminal on the host machine, connect to the debug USB port and use
//! ```text
//! $ screen /dev/tty.usbmodem* <baud_rate>
//! ```
//!
//! To close the debug terminal, press `Ctrl+A` then `Ctrl+\` then `y`.

use core::fmt;
use heapless::Deque;
use nb::block;

use stm32f7xx_hal::{
    prelude::*,
    serial::{Instance, Pins, Rx, Serial, Tx},
};

use crate::interfaces::ByteStream;

/// Receive buffer size of a [`SerialLink`].
pub const LINK_RX_BUF_LEN: usize = 256;

pub struct Usart<U: Instance> {
    tx: Tx<U>,
}

impl<U: Instance> Usart<U> {
    pub fn new<PINS: Pins<U>>(serial: Serial<U, PINS>) -> Self {
        let (tx, _rx) = serial.split();
        Self { tx }
    }

    #[inline]
    pub fn write_byte(&mut self, b: u8) {
        let _ = block!(self.tx.write(b));
    }

    pub fn write_str(&mut self, s: &str) {
        for &b in s.as_bytes() {
            self.write_byte(b);
        }
    }

    /// Block until the hardware TX FIFO/drain is flushed.
    #[inline]
    pub fn flush(&mut self) {
        let _ = block!(self.tx.flush());
    }
}

// Implement `core::fmt::Write` so we can use `write!` / `writeln!` on `Usart`.
impl<U: Instance> fmt::Write for Usart<U> {
    fn write_str(&mut self, s: &str) -> fmt::Result {
        Usart::write_str(self, s);
        Ok(())
    }
}

/// Host link over a USART.
///
/// The peripheral only holds one received byte, so the receive register is drained into a software
/// buffer whenever the link is polled, including between transmitted bytes.
pub struct SerialLink<U: Instance> {
    tx: Tx<U>,
    rx: Rx<U>,
    rx_buf: Deque<u8, LINK_RX_BUF_LEN>,
}

impl<U: Instance> SerialLink<U> {
    pub fn new<PINS: Pins<U>>(serial: Serial<U, PINS>) -> Self {
        let (tx, rx) = serial.split();
        Self {
            tx,
            rx,
            rx_buf: Deque::new(),
        }
    }

    /// Move every byte waiting in the receive register into the buffer.
    ///
    /// Bytes arriving while the buffer is full are discarded; the parser resynchronizes on the
    /// next header byte.
    pub fn poll_rx(&mut self) {
        while let Ok(b) = self.rx.read() {
            let _ = self.rx_buf.push_back(b);
        }
    }
}

impl<U: Instance> ByteStream for SerialLink<U> {
    fn available(&mut self) -> usize {
        self.poll_rx();
        self.rx_buf.len()
    }

    fn read(&mut self) -> Option<u8> {
        self.poll_rx();
        self.rx_buf.pop_front()
    }

    fn write(&mut self, bytes: &[u8]) -> usize {
        for &b in bytes {
            let _ = block!(self.tx.write(b));
            self.poll_rx();
        }
        bytes.len()
    }
}
