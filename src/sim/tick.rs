//! Per-frame interaction step
//!
//! A frame is split in two halves so the signal controller can run between
//! them: `begin_frame` applies the pointer sample (grab, drag, release) and
//! `end_frame` advances the selection and collision timers.

use glam::Vec2;

use super::layout::ResolveError;
use super::state::InteractionState;

/// Pointer sample for a single frame
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct TickInput {
    /// Pointer position in surface coordinates
    pub pointer: Vec2,
    /// Button went down this frame
    pub pressed: bool,
    /// Button went up this frame
    pub released: bool,
}

impl TickInput {
    pub fn hover(pointer: Vec2) -> Self {
        Self {
            pointer,
            ..Default::default()
        }
    }

    pub fn press(pointer: Vec2) -> Self {
        Self {
            pointer,
            pressed: true,
            released: false,
        }
    }

    pub fn release(pointer: Vec2) -> Self {
        Self {
            pointer,
            pressed: false,
            released: true,
        }
    }
}

/// Apply the pointer sample: release, grab, then drag the held rod.
pub fn begin_frame(state: &mut InteractionState, input: &TickInput) -> Result<(), ResolveError> {
    let pointer = input.pointer;
    state.pointer_velocity = state
        .last_pointer
        .map(|last| pointer - last)
        .unwrap_or(Vec2::ZERO);
    state.last_pointer = Some(pointer);

    if input.released && state.selection.is_selected() {
        log::debug!("Released rod {:?}", state.selection.selected());
        state.selection.clear();
        state.collision.reset();
    }

    if input.pressed {
        if let Some(index) = state.rods.rod_at(pointer) {
            let top_left = state.rods.rods()[index].top_left();
            state.selection.select(index, top_left, pointer);
            state.collision.reset();
            log::debug!("Selected rod {} at {:?}", index, top_left);
        }
    }

    if state.selection.is_selected() {
        let resolution = state.rods.resolve(&state.selection, pointer)?;
        if resolution.collided {
            state.collision.collided = true;
        }
    }

    Ok(())
}

/// Advance timers once the frame's collision state has been consumed.
pub fn end_frame(state: &mut InteractionState) {
    state.selection.advance();
    state.collision.end_frame();
    state.frame += 1;
}
