//! Session state and the per-frame tick
//!
//! `AppState` owns everything that changes during a session. One call to
//! [`AppState::tick`] per rendered frame: drain intents, apply the pointer
//! sample, update the actuator, then advance the timers.

use std::path::Path;

use crate::Result;
use crate::haptics::{HapticDevice, Playing, SignalController};
use crate::intents::{Intent, IntentQueue, IntentSender};
use crate::persistence::{LayoutError, load_layout, save_layout};
use crate::settings::Settings;
use crate::sim::{InteractionState, RodGroup, TickInput, begin_frame, end_frame};

#[derive(Debug)]
pub struct AppState {
    pub sim: InteractionState,
    pub controller: SignalController,
    pub device: HapticDevice,
    intents: IntentQueue,
}

impl AppState {
    pub fn new(rods: RodGroup, settings: &Settings, device: HapticDevice) -> Self {
        Self {
            sim: InteractionState::new(rods),
            controller: SignalController::new(
                settings.signals.clone(),
                settings.impulse,
                settings.timing(),
                settings.speed_scale,
            ),
            device,
            intents: IntentQueue::new(),
        }
    }

    /// Handle for other threads to queue intents
    pub fn intent_sender(&self) -> IntentSender {
        self.intents.sender()
    }

    pub fn rods(&self) -> &RodGroup {
        &self.sim.rods
    }

    pub fn playing(&self) -> Playing {
        self.controller.playing()
    }

    /// Advance the session by one frame.
    ///
    /// Errors are internal-consistency failures from drag resolution; the
    /// session should not continue after one.
    pub fn tick(&mut self, input: &TickInput) -> Result<()> {
        self.apply_intents();
        begin_frame(&mut self.sim, input)?;
        self.controller.update(&self.sim, &mut self.device);
        end_frame(&mut self.sim);
        Ok(())
    }

    /// Swap in a new puzzle, dropping the selection and silencing the actuator
    pub fn replace_puzzle(&mut self, rods: RodGroup) {
        self.controller.stop(&mut self.device);
        log::info!("Switching to a puzzle with {} rods", rods.len());
        self.sim.replace_rods(rods);
    }

    pub fn load_puzzle(&mut self, path: &Path) -> std::result::Result<(), LayoutError> {
        let rods = load_layout(path)?;
        self.replace_puzzle(rods);
        Ok(())
    }

    pub fn save_puzzle(&self, path: &Path) -> std::result::Result<(), LayoutError> {
        save_layout(&self.sim.rods, path)
    }

    fn apply_intents(&mut self) {
        for intent in self.intents.drain() {
            log::debug!("Applying intent {:?}", intent);
            match intent {
                Intent::LoadPuzzle(path) => {
                    if let Err(e) = self.load_puzzle(&path) {
                        log::error!("Could not load puzzle: {}", e);
                    }
                }
                Intent::ReplacePuzzle(rods) => self.replace_puzzle(rods),
                Intent::SavePuzzle(path) => {
                    if let Err(e) = self.save_puzzle(&path) {
                        log::error!("Could not save puzzle: {}", e);
                    }
                }
                Intent::Ping => {
                    self.device.ping().ok();
                }
            }
        }
    }
}
