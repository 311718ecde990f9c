// SPDX-License-Identifier: MIT
// © 2025–2026 Christopher Liu

//! `log` backend printing to the debug USART.
//!
//! Each record becomes one `[LEVEL] message\r\n` line. Output is blocking, so keep `debug` off
//! when the loop timing matters.

use core::cell::RefCell;
use core::fmt::Write;

use cortex_m::interrupt::{self, Mutex};
use log::{LevelFilter, Log, Metadata, Record, SetLoggerError};
use stm32f7xx_hal::pac;

use super::Usart;

/// USART the log lines are written to.
pub type DebugUsart = Usart<pac::USART1>;

struct UsartLogger {
    usart: Mutex<RefCell<Option<DebugUsart>>>,
}

static LOGGER: UsartLogger = UsartLogger {
    usart: Mutex::new(RefCell::new(None)),
};

/// Install the logger on `usart` with the given maximum level.
pub fn init(usart: DebugUsart, level: LevelFilter) -> Result<(), SetLoggerError> {
    interrupt::free(|cs| LOGGER.usart.borrow(cs).replace(Some(usart)));
    log::set_logger(&LOGGER)?;
    log::set_max_level(level);
    Ok(())
}

impl Log for UsartLogger {
    fn enabled(&self, metadata: &Metadata) -> bool {
        metadata.level() <= log::max_level()
    }

    fn log(&self, record: &Record) {
        if !self.enabled(record.metadata()) {
            return;
        }
        interrupt::free(|cs| {
            if let Some(usart) = self.usart.borrow(cs).borrow_mut().as_mut() {
                let _ = write!(usart, "[{}] {}\r\n", record.level(), record.args());
            }
        });
    }

    fn flush(&self) {
        interrupt::free(|cs| {
            if let Some(usart) = self.usart.borrow(cs).borrow_mut().as_mut() {
                usart.flush();
            }
        });
    }
}
