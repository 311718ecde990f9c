// SPDX-License-Identifier: MIT
// © 2025–2026 Christopher Liu

#![no_main]
#![no_std]

use cortex_m_rt::entry;
use log::{error, info, LevelFilter};
use panic_halt as _;

use hal::{
    pac,
    prelude::*,
    serial::{Config, Serial},
};
use stm32f7xx_hal as hal;

use servo_rig::config::LoopConfig;
use servo_rig::control::RigController;
use servo_rig::drivers::{ChannelMap, RigSensors, ServoP500};
use servo_rig::hw::{logger, Adc, MicrosClock, SerialLink, ServoPwm, Usart};

/// ADC1 inputs: PA3 (IN3), PC0 (IN10), PC3 (IN13), PB1 (IN9).
const FEEDBACK_CHANNELS: ChannelMap = ChannelMap {
    magnetic: 3,
    potentiometer: 10,
    current: 13,
    voltage: 9,
};

#[entry]
fn main() -> ! {
    // Peripherals
    let dp = pac::Peripherals::take().unwrap();

    // Clocks
    let rcc = dp.RCC.constrain();
    let clocks = rcc.cfgr.freeze();
    let timer_clk_hz = clocks.timclk1().raw();

    // GPIO
    let gpioa = dp.GPIOA.split();
    let gpiob = dp.GPIOB.split();
    let gpioc = dp.GPIOC.split();
    let gpiod = dp.GPIOD.split();

    // USART1 (DBG)
    let tx = gpioa.pa9.into_alternate::<7>();
    let rx = gpioa.pa10.into_alternate::<7>();
    let dbg_cfg = Config {
        baud_rate: 115_200.bps(),
        ..Default::default()
    };
    let serial = Serial::new(dp.USART1, (tx, rx), &clocks, dbg_cfg);
    let _ = logger::init(Usart::new(serial), LevelFilter::Info);

    // USART2 (host link)
    let tx = gpiod.pd5.into_alternate::<7>();
    let rx = gpiod.pd6.into_alternate::<7>();
    let link_cfg = Config {
        baud_rate: 460_800.bps(),
        ..Default::default()
    };
    let link = SerialLink::new(Serial::new(dp.USART2, (tx, rx), &clocks, link_cfg));

    // TIM2 time base, TIM3 servo PWM
    let clock = MicrosClock::tim2(dp.TIM2, timer_clk_hz);
    let pwm = ServoPwm::tim3(dp.TIM3, gpiob.pb4.into_alternate::<2>(), timer_clk_hz);
    let servo = ServoP500::new(pwm);

    // ADC1 feedback inputs
    let _mag = gpioa.pa3.into_analog();
    let _pot = gpioc.pc0.into_analog();
    let _cur = gpioc.pc3.into_analog();
    let _vol = gpiob.pb1.into_analog();
    let sensors = RigSensors::new(Adc::adc1(dp.ADC1), FEEDBACK_CHANNELS);

    // Tick pin, high while a tick is processed
    let mut tick_pin = gpioc.pc10.into_push_pull_output();
    tick_pin.set_low();

    let config = LoopConfig::default();
    let mut rig = match RigController::new(config, clock, servo, sensors, link) {
        Ok(rig) => rig,
        Err(e) => {
            error!("invalid loop config: {}", e);
            loop {
                cortex_m::asm::nop();
            }
        }
    };

    rig.init();
    info!(
        "servo rig '{}' running at {} Hz",
        config.source_id,
        config.freq_hz()
    );

    loop {
        while !rig.poll_tick() {
            rig.link_mut().poll_rx();
        }
        tick_pin.set_high();
        rig.tick();
        tick_pin.set_low();
    }
}
