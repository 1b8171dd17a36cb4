//! Collision classification between rods
//!
//! Two rods only collide when their interiors overlap; sharing an edge is
//! touching, not colliding. When a move produces a collision, the direction
//! of approach is read from where the rod was *before* the move, which tells
//! the layout engine which edge of the obstacle to snap against.

use thiserror::Error;

use super::rod::Rod;

/// Where `a` sits vertically relative to `b`
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RelativeY {
    /// Gap between `a`'s bottom and `b`'s top
    StrictlyAbove,
    /// `a`'s bottom edge lies on `b`'s top edge
    JustAbove,
    StrictlyBelow,
    JustBelow,
    /// Vertical projections overlap
    Aligned,
}

/// Where `a` sits horizontally relative to `b`
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RelativeX {
    StrictlyLeft,
    JustLeft,
    StrictlyRight,
    JustRight,
    /// Horizontal projections overlap
    Aligned,
}

impl RelativeY {
    pub fn is_above(self) -> bool {
        matches!(self, RelativeY::StrictlyAbove | RelativeY::JustAbove)
    }

    pub fn is_below(self) -> bool {
        matches!(self, RelativeY::StrictlyBelow | RelativeY::JustBelow)
    }
}

impl RelativeX {
    pub fn is_left(self) -> bool {
        matches!(self, RelativeX::StrictlyLeft | RelativeX::JustLeft)
    }

    pub fn is_right(self) -> bool {
        matches!(self, RelativeX::StrictlyRight | RelativeX::JustRight)
    }
}

/// Direction a moving rod came from when it ran into another rod
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Approach {
    NoCollision,
    FromAbove,
    FromBelow,
    FromLeft,
    FromRight,
}

/// The rods already overlapped before the move was attempted
#[derive(Debug, Clone, Copy, PartialEq, Error)]
#[error("rods already overlap before the move: {before:?} and {other:?}")]
pub struct CollisionError {
    pub before: Rod,
    pub other: Rod,
}

pub fn relative_y(a: &Rod, b: &Rod) -> RelativeY {
    if a.bottom() < b.top() {
        RelativeY::StrictlyAbove
    } else if a.bottom() == b.top() {
        RelativeY::JustAbove
    } else if a.top() > b.bottom() {
        RelativeY::StrictlyBelow
    } else if a.top() == b.bottom() {
        RelativeY::JustBelow
    } else {
        RelativeY::Aligned
    }
}

pub fn relative_x(a: &Rod, b: &Rod) -> RelativeX {
    if a.right() < b.left() {
        RelativeX::StrictlyLeft
    } else if a.right() == b.left() {
        RelativeX::JustLeft
    } else if a.left() > b.right() {
        RelativeX::StrictlyRight
    } else if a.left() == b.right() {
        RelativeX::JustRight
    } else {
        RelativeX::Aligned
    }
}

/// True when the interiors of the two rods overlap
pub fn strictly_collide(a: &Rod, b: &Rod) -> bool {
    relative_x(a, b) == RelativeX::Aligned && relative_y(a, b) == RelativeY::Aligned
}

/// True when the rods overlap or share an edge.
///
/// Drag resolution only cares about strict collisions; this is here for
/// adjacency checks.
pub fn softly_collide(a: &Rod, b: &Rod) -> bool {
    let x_touching = matches!(
        relative_x(a, b),
        RelativeX::Aligned | RelativeX::JustLeft | RelativeX::JustRight
    );
    let y_touching = matches!(
        relative_y(a, b),
        RelativeY::Aligned | RelativeY::JustAbove | RelativeY::JustBelow
    );
    x_touching && y_touching
}

/// Classify how moving a rod from `before` to `after` runs into `other`.
///
/// Returns an error if `before` already overlapped `other`, since there is
/// then no direction the rod could have come from.
pub fn classify_approach(
    before: &Rod,
    after: &Rod,
    other: &Rod,
) -> Result<Approach, CollisionError> {
    if !strictly_collide(after, other) {
        return Ok(Approach::NoCollision);
    }

    let y = relative_y(before, other);
    if y.is_above() {
        return Ok(Approach::FromAbove);
    }
    if y.is_below() {
        return Ok(Approach::FromBelow);
    }

    let x = relative_x(before, other);
    if x.is_left() {
        Ok(Approach::FromLeft)
    } else if x.is_right() {
        Ok(Approach::FromRight)
    } else {
        Err(CollisionError {
            before: *before,
            other: *other,
        })
    }
}
