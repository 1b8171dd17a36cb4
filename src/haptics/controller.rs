//! Signal state machine
//!
//! Decides once per frame what the actuator should be playing:
//! - nothing when no rod is held
//! - the held rod's own signal while it moves freely, and for the first
//!   `grace_period` frames after grabbing even if it is already touching
//! - a short impulse once a collision outlasts the grace period, then silence
//!   until the rod breaks free again

use glam::Vec2;

use super::device::HapticDevice;
use super::signal::{Signal, SignalTable, signal_type};
use crate::consts::{DEFAULT_GRACE_PERIOD, DEFAULT_IMPULSE_DURATION};
use crate::sim::InteractionState;

/// What the actuator is currently playing
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Playing {
    #[default]
    None,
    Impulse,
    SelectedRodSignal,
}

/// Frame-count timing of the state machine
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Timing {
    pub grace_period: u32,
    pub impulse_duration: u32,
}

impl Default for Timing {
    fn default() -> Self {
        Self {
            grace_period: DEFAULT_GRACE_PERIOD,
            impulse_duration: DEFAULT_IMPULSE_DURATION,
        }
    }
}

/// Maps interaction state to actuator commands
#[derive(Debug, Clone)]
pub struct SignalController {
    playing: Playing,
    table: SignalTable,
    impulse: Signal,
    timing: Timing,
    /// Pointer pixels/frame to device speed units
    speed_scale: f32,
    /// Collision timer value when the impulse started
    impulse_started_at: u32,
}

impl SignalController {
    pub fn new(table: SignalTable, impulse: Signal, timing: Timing, speed_scale: f32) -> Self {
        Self {
            playing: Playing::None,
            table,
            impulse,
            timing,
            speed_scale,
            impulse_started_at: 0,
        }
    }

    pub fn playing(&self) -> Playing {
        self.playing
    }

    pub fn timing(&self) -> Timing {
        self.timing
    }

    /// Silence the actuator and forget what was playing
    pub fn stop(&mut self, device: &mut HapticDevice) {
        if self.playing != Playing::None {
            device.play(false).ok();
            self.transition(Playing::None);
        }
    }

    /// Run one frame of the state machine against the current interaction state
    pub fn update(&mut self, state: &InteractionState, device: &mut HapticDevice) {
        let Some(rod) = state.selected_rod() else {
            self.stop(device);
            return;
        };

        let selection_timer = state.selection.timer();
        let collision_timer = state.collision.timer;
        let grace = self.timing.grace_period;

        if !state.collision.collided {
            if self.playing != Playing::SelectedRodSignal {
                self.start_rod_signal(rod.length(), device);
            }
        } else {
            match self.playing {
                Playing::None if selection_timer <= grace => {
                    self.start_rod_signal(rod.length(), device);
                }
                Playing::Impulse if self.impulse_expired(collision_timer) => {
                    device.play(false).ok();
                    self.transition(Playing::None);
                }
                Playing::SelectedRodSignal if selection_timer > grace => {
                    device.start_signal(self.impulse).ok();
                    self.impulse_started_at = collision_timer;
                    self.transition(Playing::Impulse);
                }
                _ => {}
            }
        }

        let (angle, speed) = direction_from_velocity(state.pointer_velocity, self.speed_scale);
        device.set_direction(angle, speed).ok();
    }

    fn start_rod_signal(&mut self, length: u8, device: &mut HapticDevice) {
        match self.table.get(length) {
            Some(&signal) => {
                log::debug!(
                    "Playing {} signal for rod length {}",
                    signal_type::name(signal.signal_type),
                    length
                );
                device.start_signal(signal).ok();
            }
            None => log::warn!("No signal configured for rod length {}", length),
        }
        self.transition(Playing::SelectedRodSignal);
    }

    fn impulse_expired(&self, collision_timer: u32) -> bool {
        collision_timer
            > self
                .impulse_started_at
                .saturating_add(self.timing.impulse_duration)
    }

    fn transition(&mut self, next: Playing) {
        if next != self.playing {
            log::debug!("Signal state {:?} -> {:?}", self.playing, next);
            self.playing = next;
        }
    }
}

/// Convert a pointer displacement into the device's direction command.
///
/// The angle maps -π..π onto the full i8 range; speed is the displacement
/// length times `speed_scale`, saturated to u16.
pub fn direction_from_velocity(velocity: Vec2, speed_scale: f32) -> (i8, u16) {
    use std::f32::consts::PI;

    let angle = (velocity.y.atan2(velocity.x) * 128.0 / PI)
        .round()
        .clamp(i8::MIN as f32, i8::MAX as f32) as i8;
    let speed = (velocity.length() * speed_scale)
        .round()
        .clamp(0.0, u16::MAX as f32) as u16;
    (angle, speed)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::haptics::device::tests::SharedBuffer;
    use crate::haptics::protocol::Command;
    use crate::sim::{Rod, RodGroup};

    const GRACE: u32 = 3;
    const IMPULSE: u32 = 2;

    fn controller() -> SignalController {
        SignalController::new(
            SignalTable::default(),
            Signal::IMPULSE,
            Timing {
                grace_period: GRACE,
                impulse_duration: IMPULSE,
            },
            1.0,
        )
    }

    fn held_rod(selection_timer: u32, collided: bool, collision_timer: u32) -> InteractionState {
        let mut state = InteractionState::new(RodGroup::new(vec![Rod::new(4, 0.0, 0.0)]));
        state.selection.select(0, Vec2::ZERO, Vec2::ZERO);
        for _ in 0..selection_timer {
            state.selection.advance();
        }
        state.collision.collided = collided;
        state.collision.timer = collision_timer;
        state
    }

    fn signal_commands(sink: &SharedBuffer) -> Vec<Command> {
        sink.take_commands()
            .into_iter()
            .filter(|c| !matches!(c, Command::SetDirection { .. }))
            .collect()
    }

    #[test]
    fn test_free_drag_plays_rod_signal_once() {
        let sink = SharedBuffer::default();
        let mut device = HapticDevice::from_writer(sink.clone());
        let mut ctrl = controller();

        ctrl.update(&held_rod(0, false, 0), &mut device);
        assert_eq!(ctrl.playing(), Playing::SelectedRodSignal);
        let expected = *SignalTable::default().get(4).unwrap();
        assert_eq!(
            signal_commands(&sink),
            vec![
                Command::Clear,
                Command::AddSignal {
                    angle: -1,
                    pulses: -1,
                    signal: expected
                },
                Command::Play(true),
            ]
        );

        ctrl.update(&held_rod(1, false, 0), &mut device);
        assert!(signal_commands(&sink).is_empty());
    }

    #[test]
    fn test_grace_window_plays_rod_signal_while_colliding() {
        let mut device = HapticDevice::disconnected();
        let mut ctrl = controller();

        for frame in 0..=GRACE {
            ctrl.update(&held_rod(frame, true, frame.saturating_sub(1)), &mut device);
            assert_eq!(ctrl.playing(), Playing::SelectedRodSignal, "frame {frame}");
        }

        ctrl.update(&held_rod(GRACE + 1, true, GRACE), &mut device);
        assert_eq!(ctrl.playing(), Playing::Impulse);
    }

    #[test]
    fn test_collision_after_grace_stays_silent_from_none() {
        let mut device = HapticDevice::disconnected();
        let mut ctrl = controller();

        ctrl.update(&held_rod(GRACE + 1, true, 0), &mut device);
        assert_eq!(ctrl.playing(), Playing::None);
    }

    #[test]
    fn test_impulse_cutoff_is_measured_from_impulse_start() {
        let sink = SharedBuffer::default();
        let mut device = HapticDevice::from_writer(sink.clone());
        let mut ctrl = controller();

        ctrl.update(&held_rod(10, false, 0), &mut device);
        let t0 = 4;
        ctrl.update(&held_rod(11, true, t0), &mut device);
        assert_eq!(ctrl.playing(), Playing::Impulse);
        sink.take_commands();

        for t in t0 + 1..=t0 + IMPULSE {
            ctrl.update(&held_rod(11 + t - t0, true, t), &mut device);
            assert_eq!(ctrl.playing(), Playing::Impulse, "collision timer {t}");
        }

        ctrl.update(&held_rod(20, true, t0 + IMPULSE + 1), &mut device);
        assert_eq!(ctrl.playing(), Playing::None);
        assert_eq!(signal_commands(&sink), vec![Command::Play(false)]);

        // Breaking free brings the rod's own signal back
        ctrl.update(&held_rod(21, false, 0), &mut device);
        assert_eq!(ctrl.playing(), Playing::SelectedRodSignal);
    }

    #[test]
    fn test_release_stops_playback() {
        let sink = SharedBuffer::default();
        let mut device = HapticDevice::from_writer(sink.clone());
        let mut ctrl = controller();

        ctrl.update(&held_rod(0, false, 0), &mut device);
        sink.take_commands();

        let released = InteractionState::new(RodGroup::new(vec![Rod::new(4, 0.0, 0.0)]));
        ctrl.update(&released, &mut device);
        assert_eq!(ctrl.playing(), Playing::None);
        assert_eq!(sink.take_commands(), vec![Command::Play(false)]);

        // Already silent: nothing more to send
        ctrl.update(&released, &mut device);
        assert!(sink.take_commands().is_empty());
    }

    #[test]
    fn test_direction_sent_every_held_frame() {
        let sink = SharedBuffer::default();
        let mut device = HapticDevice::from_writer(sink.clone());
        let mut ctrl = controller();

        let mut state = held_rod(5, false, 0);
        state.pointer_velocity = Vec2::new(0.0, 10.0);
        ctrl.update(&state, &mut device);
        ctrl.update(&state, &mut device);

        let directions: Vec<_> = sink
            .take_commands()
            .into_iter()
            .filter(|c| matches!(c, Command::SetDirection { .. }))
            .collect();
        assert_eq!(
            directions,
            vec![Command::SetDirection { angle: 64, speed: 10 }; 2]
        );
    }

    #[test]
    fn test_direction_from_velocity() {
        assert_eq!(direction_from_velocity(Vec2::ZERO, 1.0), (0, 0));
        assert_eq!(direction_from_velocity(Vec2::new(3.0, 4.0), 2.0).1, 10);
        assert_eq!(direction_from_velocity(Vec2::new(-1.0, 0.0), 1.0).0, 127);
        assert_eq!(direction_from_velocity(Vec2::new(0.0, -5.0), 1.0).0, -64);
        assert_eq!(direction_from_velocity(Vec2::new(1e6, 0.0), 1.0).1, u16::MAX);
    }
}
