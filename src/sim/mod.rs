//! Frame-driven interaction module
//!
//! Rod geometry, collision classification, drag resolution and the
//! selection/collision bookkeeping. This module must stay free of device and
//! platform concerns:
//! - One pointer sample per frame
//! - Stable iteration order (rod load order)
//! - No rendering or I/O

pub mod collision;
pub mod layout;
pub mod rod;
pub mod state;
pub mod tick;

pub use collision::{
    Approach, CollisionError, RelativeX, RelativeY, classify_approach, relative_x, relative_y,
    softly_collide, strictly_collide,
};
pub use layout::{BoundSet, ResolveError, Resolution, RodGroup, XBound, YBound};
pub use rod::{ROD_COLORS, Rect, Rod, RodColor};
pub use state::{CollisionState, InteractionState, SelectionState};
pub use tick::{TickInput, begin_frame, end_frame};
