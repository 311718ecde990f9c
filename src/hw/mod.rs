// SPDX-License-Identifier: MIT
// © 2025–2026 Christopher Liu

//! # MCU-Level Wrappers
//!
//! STM32F7 peripherals behind the crate's capability traits.
//!
//! - [`clock`] – TIM2 microsecond counter ([`TimeSource`](crate::interfaces::TimeSource))
//! - [`pwm`] – TIM3 servo PWM ([`PulseOutput`](crate::drivers::PulseOutput))
//! - [`adc`] – non-blocking ADC1 ([`AnalogInput`](crate::drivers::AnalogInput))
//! - [`usart`] – debug printer and host link ([`ByteStream`](crate::interfaces::ByteStream))
//! - [`logger`] – `log` backend on the debug USART

pub mod adc;
pub mod clock;
pub mod logger;
pub mod pwm;
pub mod usart;

pub use adc::Adc;
pub use clock::MicrosClock;
pub use pwm::ServoPwm;
pub use usart::{SerialLink, Usart};
