// SPDX-License-Identifier: MIT
// © 2025–2026 Christopher Liu

//! Fixed-rate control loop of the servo rig.
//!
//! [`RigController`] owns the reference angle and the waveform generator and drives one tick per
//! loop period:
//!
//! 1. wait for the interval boundary
//! 2. refresh the sensor snapshot
//! 3. decode at most one host command and apply the mode transition
//! 4. advance the waveform, if one is running
//! 5. command the actuator
//! 6. emit the telemetry burst
//!
//! Typical usage pattern:
//!
//! ```ignore
//! let mut rig = RigController::new(LoopConfig::default(), clock, servo, sensors, link)?;
//! rig.init();
//! rig.run();
//! ```

use log::{debug, info, warn};

use crate::config::{ConfigError, LoopConfig};
use crate::control::interval::IntervalWaiter;
use crate::control::waveform::{Step, Waveform};
use crate::interfaces::{Actuator, ByteStream, SensorFeedback, SensorState, TimeSource};
use crate::protocol::messages::Command;
use crate::protocol::parser::Parser;
use crate::protocol::telemetry::TelemetryWriter;

/// Operating mode of the rig.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum Mode {
    /// Actuator stopped, reference ignored.
    Disabled,

    /// Holding the commanded reference angle.
    Armed,

    /// Reference driven by the waveform generator.
    Waveform,
}

/// Channel index of each debug value in the telemetry burst, in emission order.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
#[repr(u8)]
pub enum DebugChannel {
    LoadCell = 0,
    MagFeedback = 1,
    PotFeedback = 2,
    Reference = 3,
    SupplyCurrent = 4,
    SupplyVoltage = 5,
    Temperature = 6,
}

impl DebugChannel {
    pub const ALL: [DebugChannel; 7] = [
        DebugChannel::LoadCell,
        DebugChannel::MagFeedback,
        DebugChannel::PotFeedback,
        DebugChannel::Reference,
        DebugChannel::SupplyCurrent,
        DebugChannel::SupplyVoltage,
        DebugChannel::Temperature,
    ];

    /// Value reported on this channel.
    fn value(self, state: &SensorState, reference_deg: f32) -> f32 {
        match self {
            DebugChannel::LoadCell => state.load_cell_adc_val as f32,
            DebugChannel::MagFeedback => state.mag_feedback_adc_val as f32,
            DebugChannel::PotFeedback => state.pot_feedback_adc_val as f32,
            DebugChannel::Reference => reference_deg,
            DebugChannel::SupplyCurrent => state.supply_current_a,
            DebugChannel::SupplyVoltage => state.supply_voltage_v,
            DebugChannel::Temperature => state.first_temperature_degc(),
        }
    }
}

/// Control loop state and collaborators.
pub struct RigController<T, A, S, L> {
    config: LoopConfig,
    waiter: IntervalWaiter<T>,
    actuator: A,
    sensors: S,
    link: L,

    parser: Parser,
    telemetry: TelemetryWriter,
    waveform: Waveform,
    mode: Mode,

    /// Commanded angle (deg)
    reference_deg: f32,
}

impl<T, A, S, L> RigController<T, A, S, L>
where
    T: TimeSource,
    A: Actuator,
    S: SensorFeedback,
    L: ByteStream,
{
    /// Validate `config` and open the telemetry stream on `link`. The rig starts disabled.
    pub fn new(
        config: LoopConfig,
        clock: T,
        actuator: A,
        sensors: S,
        mut link: L,
    ) -> Result<Self, ConfigError> {
        config.validate()?;
        let waiter = IntervalWaiter::new(clock, config.period_us)?;
        let waveform = Waveform::new(config.freq_hz(), actuator.range());
        let telemetry = TelemetryWriter::open(&mut link);

        Ok(Self {
            config,
            waiter,
            actuator,
            sensors,
            link,
            parser: Parser::new(),
            telemetry,
            waveform,
            mode: Mode::Disabled,
            reference_deg: 0.0,
        })
    }

    /// One-time sensor setup, then arm.
    pub fn init(&mut self) {
        self.sensors.init();
        self.arm();
    }

    /// Start the actuator holding 0°.
    pub fn arm(&mut self) {
        self.actuator.start();
        self.waveform.clear();
        self.reference_deg = 0.0;
        self.mode = Mode::Armed;
        info!("rig armed");
    }

    /// Stop the actuator and drop any running waveform.
    pub fn disarm(&mut self) {
        self.waveform.clear();
        self.reference_deg = 0.0;
        self.actuator.stop();
        self.mode = Mode::Disabled;
        info!("rig disarmed");
    }

    fn ensure_armed(&mut self) {
        if self.mode == Mode::Disabled {
            self.arm();
        }
    }

    /// Apply one decoded command. Rejected commands leave the mode and reference unchanged.
    pub fn handle_command(&mut self, cmd: Command) {
        match cmd {
            Command::NoCmd => {}

            Command::Stop => {
                self.ensure_armed();
                self.waveform.clear();
                self.reference_deg = 0.0;
                self.mode = Mode::Armed;
                debug!("stop");
            }

            Command::SetAngle(angle_deg) => {
                if !angle_deg.is_finite() {
                    warn!("set angle ignored: non-finite target");
                    return;
                }
                self.ensure_armed();
                self.waveform.clear();
                self.reference_deg = angle_deg;
                self.mode = Mode::Armed;
                debug!("set angle {}", angle_deg);
            }

            Command::StartSin(params) => match self.waveform.start_sinusoid(&params) {
                Ok(()) => {
                    self.ensure_waveform_mode();
                    debug!(
                        "sinusoid [{}, {}] deg, {} s",
                        params.angle_min_deg, params.angle_max_deg, params.period_s
                    );
                }
                Err(e) => warn!("sinusoid rejected: {}", e),
            },

            Command::StartSinSweep(params) => match self.waveform.start_sweep(&params) {
                Ok(()) => {
                    self.ensure_waveform_mode();
                    debug!(
                        "sweep {} -> {} s, {} periods x {} cycles",
                        params.period_max_s,
                        params.period_min_s,
                        params.n_periods,
                        params.n_cycles_per_period
                    );
                }
                Err(e) => warn!("sweep rejected: {}", e),
            },

            Command::StartTrap(_) => warn!("trapezoid profile not supported, ignored"),
        }
    }

    /// Arm without touching the freshly started waveform.
    fn ensure_waveform_mode(&mut self) {
        if self.mode == Mode::Disabled {
            self.actuator.start();
            info!("rig armed");
        }
        self.mode = Mode::Waveform;
    }

    /// Busy-wait for the next loop period.
    #[inline]
    pub fn wait_for_tick(&mut self) {
        self.waiter.wait();
    }

    /// Non-blocking form of [`Self::wait_for_tick`], for boards that service I/O while idle.
    #[inline]
    pub fn poll_tick(&mut self) -> bool {
        self.waiter.next_interval()
    }

    /// One loop iteration without the wait.
    pub fn tick(&mut self) {
        self.sensors.update();

        let cmd = self.parser.poll(&mut self.link);
        self.handle_command(cmd);

        match self.waveform.step() {
            Step::Idle => {}
            Step::Sample(deg) => self.reference_deg = deg,
            Step::Complete => {
                self.reference_deg = 0.0;
                self.mode = Mode::Armed;
                info!("sweep complete");
            }
        }

        if self.mode != Mode::Disabled {
            self.actuator.set_angle(self.reference_deg);
        }

        self.log_telemetry();
    }

    /// Wait for the next period, then run one tick.
    pub fn step(&mut self) {
        self.wait_for_tick();
        self.tick();
    }

    /// Run the loop forever.
    pub fn run(&mut self) -> ! {
        loop {
            self.step();
        }
    }

    /// Emit the per-tick telemetry burst. Write failures are dropped.
    pub fn log_telemetry(&mut self) {
        let state = self.sensors.state();
        let link = &mut self.link;
        let tx = &mut self.telemetry;

        let _ = tx.write_sequence_message(link);
        let _ = tx.write_source_id(link, self.config.source_id);
        let _ = tx.write_time_local(link, self.waiter.now_micros());
        for channel in DebugChannel::ALL {
            let _ = tx.write_debug_value(
                link,
                channel as u8,
                channel.value(&state, self.reference_deg),
            );
        }
    }

    #[inline]
    pub fn mode(&self) -> Mode {
        self.mode
    }

    #[inline]
    pub fn reference_deg(&self) -> f32 {
        self.reference_deg
    }

    #[inline]
    pub fn waveform(&self) -> &Waveform {
        &self.waveform
    }

    #[inline]
    pub fn config(&self) -> &LoopConfig {
        &self.config
    }

    /// Sequence number the next telemetry record will carry.
    #[inline]
    pub fn telemetry_sequence(&self) -> u8 {
        self.telemetry.sequence()
    }

    #[inline]
    pub fn actuator(&self) -> &A {
        &self.actuator
    }

    #[inline]
    pub fn sensors(&self) -> &S {
        &self.sensors
    }

    #[inline]
    pub fn link(&self) -> &L {
        &self.link
    }

    #[inline]
    pub fn link_mut(&mut self) -> &mut L {
        &mut self.link
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::interfaces::AngleRange;
    use core::cell::Cell;

    struct Clock(Cell<u32>);

    impl TimeSource for Clock {
        fn now_micros(&self) -> u32 {
            self.0.get()
        }
    }

    #[derive(Default)]
    struct Servo {
        running: bool,
        starts: u32,
        last: Option<f32>,
    }

    impl Actuator for Servo {
        fn start(&mut self) {
            self.running = true;
            self.starts += 1;
        }

        fn stop(&mut self) {
            self.running = false;
        }

        fn set_angle(&mut self, angle_deg: f32) {
            self.last = Some(angle_deg);
        }

        fn range(&self) -> AngleRange {
            AngleRange::new(-60.0, 60.0)
        }
    }

    #[derive(Default)]
    struct Sensors {
        updates: u32,
    }

    impl SensorFeedback for Sensors {
        fn update(&mut self) {
            self.updates += 1;
        }

        fn state(&self) -> SensorState {
            SensorState::default()
        }
    }

    /// Accepts and discards all output, never has input.
    struct NullLink;

    impl ByteStream for NullLink {
        fn available(&mut self) -> usize {
            0
        }

        fn read(&mut self) -> Option<u8> {
            None
        }

        fn write(&mut self, bytes: &[u8]) -> usize {
            bytes.len()
        }
    }

    fn rig() -> RigController<Clock, Servo, Sensors, NullLink> {
        RigController::new(
            LoopConfig::default(),
            Clock(Cell::new(0)),
            Servo::default(),
            Sensors::default(),
            NullLink,
        )
        .unwrap()
    }

    #[test]
    fn rejects_invalid_config() {
        let r = RigController::new(
            LoopConfig::default().with_period_us(0),
            Clock(Cell::new(0)),
            Servo::default(),
            Sensors::default(),
            NullLink,
        );
        assert!(matches!(r, Err(ConfigError::ZeroPeriod)));
    }

    #[test]
    fn starts_disabled_and_arms_on_init() {
        let mut rig = rig();
        assert_eq!(rig.mode(), Mode::Disabled);
        rig.tick();
        assert_eq!(rig.actuator().last, None);

        rig.init();
        assert_eq!(rig.mode(), Mode::Armed);
        assert!(rig.actuator().running);
        rig.tick();
        assert_eq!(rig.actuator().last, Some(0.0));
    }

    #[test]
    fn command_while_disabled_arms_first() {
        let mut rig = rig();
        rig.handle_command(Command::SetAngle(12.5));
        assert_eq!(rig.mode(), Mode::Armed);
        assert_eq!(rig.actuator().starts, 1);
        assert_eq!(rig.reference_deg(), 12.5);
    }

    #[test]
    fn non_finite_angle_is_ignored() {
        let mut rig = rig();
        rig.init();
        rig.handle_command(Command::SetAngle(7.0));
        rig.handle_command(Command::SetAngle(f32::NAN));
        assert_eq!(rig.reference_deg(), 7.0);
    }

    #[test]
    fn disarm_stops_actuator() {
        let mut rig = rig();
        rig.init();
        rig.handle_command(Command::SetAngle(20.0));
        rig.disarm();
        assert_eq!(rig.mode(), Mode::Disabled);
        assert!(!rig.actuator().running);
        assert_eq!(rig.reference_deg(), 0.0);
    }

    #[test]
    fn debug_channels_are_numbered_in_order() {
        for (i, channel) in DebugChannel::ALL.iter().enumerate() {
            assert_eq!(*channel as u8 as usize, i);
        }
    }

    #[test]
    fn every_tick_refreshes_sensors_and_emits_ten_records() {
        let mut rig = rig();
        rig.init();
        rig.tick();
        rig.tick();
        assert_eq!(rig.sensors().updates, 2);
        assert_eq!(rig.telemetry_sequence(), 20);
    }
}
