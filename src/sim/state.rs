//! Interaction state and per-frame bookkeeping
//!
//! Everything the layout engine and the signal controller read each frame
//! lives here: the rods, which one is held and for how long, and whether the
//! held rod has been pushing into a neighbour.

use glam::Vec2;

use super::layout::RodGroup;
use super::rod::Rod;

/// Which rod is held, since when, and where it was grabbed
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct SelectionState {
    selected: Option<usize>,
    timer: u32,
    offset: Vec2,
}

impl SelectionState {
    /// Grab rod `index`, whose top-left corner is at `rod_top_left`, with the pointer at `pointer`
    pub fn select(&mut self, index: usize, rod_top_left: Vec2, pointer: Vec2) {
        self.selected = Some(index);
        self.timer = 0;
        self.offset = rod_top_left - pointer;
    }

    pub fn clear(&mut self) {
        *self = Self::default();
    }

    pub fn selected(&self) -> Option<usize> {
        self.selected
    }

    pub fn is_selected(&self) -> bool {
        self.selected.is_some()
    }

    /// Frames elapsed since the rod was grabbed
    pub fn timer(&self) -> u32 {
        self.timer
    }

    /// Vector from the pointer to the rod's top-left corner, fixed at grab time
    pub fn offset(&self) -> Vec2 {
        self.offset
    }

    /// Count one more frame of holding
    pub fn advance(&mut self) {
        if self.selected.is_some() {
            self.timer = self.timer.saturating_add(1);
        }
    }
}

/// Collision flags for the held rod
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct CollisionState {
    /// Collided this frame
    pub collided: bool,
    /// Collided last frame
    pub collided_previously: bool,
    /// Consecutive colliding frames, minus the first one
    pub timer: u32,
}

impl CollisionState {
    pub fn reset(&mut self) {
        *self = Self::default();
    }

    /// Roll this frame's flag into history and clear it for the next frame
    pub fn end_frame(&mut self) {
        if !self.collided {
            self.timer = 0;
        } else if self.collided_previously {
            self.timer = self.timer.saturating_add(1);
        }
        self.collided_previously = self.collided;
        self.collided = false;
    }
}

/// Rods plus the selection, collision and pointer tracking for one session
#[derive(Debug, Clone, Default)]
pub struct InteractionState {
    pub rods: RodGroup,
    pub selection: SelectionState,
    pub collision: CollisionState,
    /// Pointer position sampled last frame
    pub last_pointer: Option<Vec2>,
    /// Pointer displacement since last frame
    pub pointer_velocity: Vec2,
    /// Frames elapsed since the session started
    pub frame: u64,
}

impl InteractionState {
    pub fn new(rods: RodGroup) -> Self {
        Self {
            rods,
            ..Default::default()
        }
    }

    /// Swap in a new puzzle, dropping any selection that pointed into the old one
    pub fn replace_rods(&mut self, rods: RodGroup) {
        self.rods = rods;
        self.selection.clear();
        self.collision.reset();
    }

    /// The rod currently held, if any
    pub fn selected_rod(&self) -> Option<&Rod> {
        self.selection.selected().and_then(|i| self.rods.get(i))
    }
}
