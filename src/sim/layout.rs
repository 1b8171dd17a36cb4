//! Rod layout engine
//!
//! Owns the rods of the current puzzle and turns a speculative drag into a
//! committed position. A free move simply follows the pointer. A blocked move
//! snaps to the closest legal position built from the edges of the rods it
//! ran into, falling back to not moving at all.

use glam::Vec2;
use thiserror::Error;

use super::collision::{Approach, CollisionError, classify_approach, strictly_collide};
use super::rod::Rod;
use super::state::SelectionState;

/// Vertical stopping coordinate for the moving rod
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum YBound {
    /// Moving rod's bottom edge goes here
    StayAbove(f32),
    /// Moving rod's top edge goes here
    StayBelow(f32),
}

/// Horizontal stopping coordinate for the moving rod
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum XBound {
    /// Moving rod's right edge goes here
    StayLeftOf(f32),
    /// Moving rod's left edge goes here
    StayRightOf(f32),
}

impl YBound {
    fn apply(self, rod: &mut Rod) {
        match self {
            YBound::StayAbove(edge) => rod.set_bottom(edge),
            YBound::StayBelow(edge) => rod.set_top(edge),
        }
    }
}

impl XBound {
    fn apply(self, rod: &mut Rod) {
        match self {
            XBound::StayLeftOf(edge) => rod.set_right(edge),
            XBound::StayRightOf(edge) => rod.set_left(edge),
        }
    }
}

/// Bounded list of candidate stopping coordinates on one axis
#[derive(Debug, Clone)]
pub struct BoundSet<T> {
    bounds: Vec<T>,
    capacity: usize,
}

impl<T: Copy> BoundSet<T> {
    pub fn with_capacity(capacity: usize) -> Self {
        Self {
            bounds: Vec::with_capacity(capacity),
            capacity,
        }
    }

    pub fn push(&mut self, bound: T) -> Result<(), ResolveError> {
        if self.bounds.len() >= self.capacity {
            return Err(ResolveError::CapacityExceeded {
                capacity: self.capacity,
            });
        }
        self.bounds.push(bound);
        Ok(())
    }

    pub fn len(&self) -> usize {
        self.bounds.len()
    }

    pub fn is_empty(&self) -> bool {
        self.bounds.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = T> + '_ {
        self.bounds.iter().copied()
    }
}

#[derive(Debug, Error)]
pub enum ResolveError {
    #[error("no rod is selected")]
    NothingSelected,
    #[error("selected rod {index} is out of range (group has {len} rods)")]
    NoSuchRod { index: usize, len: usize },
    #[error("more than {capacity} collision bounds on one axis")]
    CapacityExceeded { capacity: usize },
    #[error(transparent)]
    Overlap(#[from] CollisionError),
}

/// Outcome of a single drag step
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Resolution {
    /// Committed top-left corner of the selected rod
    pub position: Vec2,
    /// Whether the speculative move ran into at least one rod
    pub collided: bool,
}

/// Collision bounds gathered for one speculative move
struct Bounds {
    y: BoundSet<YBound>,
    x: BoundSet<XBound>,
}

/// The rods of one puzzle, in load order
#[derive(Debug, Clone, Default, PartialEq)]
pub struct RodGroup {
    rods: Vec<Rod>,
}

impl RodGroup {
    pub fn new(rods: Vec<Rod>) -> Self {
        Self { rods }
    }

    pub fn len(&self) -> usize {
        self.rods.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rods.is_empty()
    }

    pub fn get(&self, index: usize) -> Option<&Rod> {
        self.rods.get(index)
    }

    pub fn rods(&self) -> &[Rod] {
        &self.rods
    }

    pub fn iter(&self) -> impl Iterator<Item = &Rod> {
        self.rods.iter()
    }

    /// Max bounds per axis: one per other rod plus fallbacks, with headroom
    pub fn bound_capacity(&self) -> usize {
        2 * self.rods.len() + 2
    }

    /// Index of the first rod (in load order) under `point`
    pub fn rod_at(&self, point: Vec2) -> Option<usize> {
        self.rods.iter().position(|rod| rod.contains_point(point))
    }

    /// First pair of distinct rods whose interiors overlap, if any
    pub fn find_overlap(&self) -> Option<(usize, usize)> {
        for (i, a) in self.rods.iter().enumerate() {
            for (j, b) in self.rods.iter().enumerate().skip(i + 1) {
                if strictly_collide(a, b) {
                    return Some((i, j));
                }
            }
        }
        None
    }

    /// Move the selected rod toward `pointer` without overlapping any other rod.
    ///
    /// The rod is glued to the pointer through the selection offset. If that
    /// spot is free it is taken as is; otherwise the closest non-overlapping
    /// snap position wins, and if nothing beats staying put the rod does not
    /// move. The group is left untouched on error.
    pub fn resolve(
        &mut self,
        selection: &SelectionState,
        pointer: Vec2,
    ) -> Result<Resolution, ResolveError> {
        let index = selection.selected().ok_or(ResolveError::NothingSelected)?;
        let selected = *self.rods.get(index).ok_or(ResolveError::NoSuchRod {
            index,
            len: self.rods.len(),
        })?;
        let target = selected.moved_to(pointer + selection.offset());

        let bounds = match self.collect_bounds(index, &selected, &target) {
            Ok(Some(bounds)) => bounds,
            Ok(None) => {
                self.rods[index] = target;
                return Ok(Resolution {
                    position: target.top_left(),
                    collided: false,
                });
            }
            Err(ResolveError::CapacityExceeded { capacity }) => {
                log::warn!(
                    "Rod {} hit the collision bound capacity ({}), not moving",
                    index,
                    capacity
                );
                return Ok(Resolution {
                    position: selected.top_left(),
                    collided: true,
                });
            }
            Err(e) => return Err(e),
        };

        let goal = target.top_left();
        let mut best = selected.top_left();
        let mut best_distance = goal.distance_squared(best);

        for y in bounds.y.iter() {
            for x in bounds.x.iter() {
                let mut candidate = selected;
                y.apply(&mut candidate);
                x.apply(&mut candidate);

                let distance = goal.distance_squared(candidate.top_left());
                if distance < best_distance && !self.collides_with_others(index, &candidate) {
                    best = candidate.top_left();
                    best_distance = distance;
                }
            }
        }

        self.rods[index].set_top_left(best);
        Ok(Resolution {
            position: best,
            collided: true,
        })
    }

    /// Gather snap bounds for moving rod `index` from `selected` to `target`.
    ///
    /// Returns `None` when the move runs into nothing.
    fn collect_bounds(
        &self,
        index: usize,
        selected: &Rod,
        target: &Rod,
    ) -> Result<Option<Bounds>, ResolveError> {
        let capacity = self.bound_capacity();
        let mut bounds = Bounds {
            y: BoundSet::with_capacity(capacity),
            x: BoundSet::with_capacity(capacity),
        };

        for (_, other) in self.others(index) {
            match classify_approach(selected, target, other)? {
                Approach::NoCollision => {}
                Approach::FromAbove => bounds.y.push(YBound::StayAbove(other.top()))?,
                Approach::FromBelow => bounds.y.push(YBound::StayBelow(other.bottom()))?,
                Approach::FromLeft => bounds.x.push(XBound::StayLeftOf(other.left()))?,
                Approach::FromRight => bounds.x.push(XBound::StayRightOf(other.right()))?,
            }
        }

        if bounds.y.is_empty() && bounds.x.is_empty() {
            return Ok(None);
        }

        // Not moving on an axis is always a candidate
        bounds.y.push(YBound::StayAbove(target.bottom()))?;
        bounds.y.push(YBound::StayAbove(selected.bottom()))?;
        bounds.x.push(XBound::StayLeftOf(target.right()))?;
        bounds.x.push(XBound::StayLeftOf(selected.right()))?;

        Ok(Some(bounds))
    }

    fn others(&self, index: usize) -> impl Iterator<Item = (usize, &Rod)> {
        self.rods
            .iter()
            .enumerate()
            .filter(move |(i, _)| *i != index)
    }

    fn collides_with_others(&self, index: usize, candidate: &Rod) -> bool {
        self.others(index)
            .any(|(_, other)| strictly_collide(candidate, other))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    fn select(group: &RodGroup, index: usize, grab: Vec2) -> SelectionState {
        let mut selection = SelectionState::default();
        selection.select(index, group.rods()[index].top_left(), grab);
        selection
    }

    /// Drag rod `index` so that its top-left would land on `to`
    fn drag(group: &mut RodGroup, index: usize, to: Vec2) -> Resolution {
        let grab = group.rods()[index].top_left() + Vec2::new(1.0, 1.0);
        let selection = select(group, index, grab);
        group
            .resolve(&selection, to + Vec2::new(1.0, 1.0))
            .expect("resolve")
    }

    #[test]
    fn test_free_move_follows_pointer() {
        let mut group = RodGroup::new(vec![Rod::new(2, 0.0, 0.0), Rod::new(3, 0.0, 200.0)]);
        let result = drag(&mut group, 0, Vec2::new(123.5, 47.25));
        assert!(!result.collided);
        assert_eq!(result.position, Vec2::new(123.5, 47.25));
        assert_eq!(group.rods()[0].top_left(), Vec2::new(123.5, 47.25));
    }

    #[test]
    fn test_snap_against_right_neighbour() {
        let mut group = RodGroup::new(vec![Rod::new(2, 0.0, 0.0), Rod::new(2, 100.0, 0.0)]);
        let result = drag(&mut group, 0, Vec2::new(90.0, 0.0));
        assert!(result.collided);
        assert_eq!(result.position, Vec2::new(20.0, 0.0));
        assert!(group.find_overlap().is_none());
    }

    #[test]
    fn test_snap_on_top_of_rod_below() {
        let mut group = RodGroup::new(vec![Rod::new(2, 0.0, 0.0), Rod::new(4, 0.0, 100.0)]);
        let result = drag(&mut group, 0, Vec2::new(30.0, 90.0));
        assert!(result.collided);
        assert_eq!(result.position, Vec2::new(30.0, 60.0));
    }

    #[test]
    fn test_slides_along_obstacle_from_the_left() {
        // Pushing right and down into a tall stack keeps the vertical motion
        let mut group = RodGroup::new(vec![
            Rod::new(1, 0.0, 0.0),
            Rod::new(1, 100.0, 0.0),
            Rod::new(1, 100.0, 40.0),
        ]);
        let result = drag(&mut group, 0, Vec2::new(80.0, 30.0));
        assert!(result.collided);
        assert_eq!(result.position, Vec2::new(60.0, 30.0));
    }

    #[test]
    fn test_stays_put_when_boxed_in() {
        // Rod 0 sits in a slot exactly its size; every snap still overlaps
        let mut group = RodGroup::new(vec![
            Rod::new(1, 40.0, 40.0),
            Rod::new(3, 0.0, 0.0),
            Rod::new(3, 0.0, 80.0),
            Rod::new(1, 0.0, 40.0),
            Rod::new(1, 80.0, 40.0),
        ]);
        let result = drag(&mut group, 0, Vec2::new(55.0, 52.0));
        assert!(result.collided);
        assert_eq!(result.position, Vec2::new(40.0, 40.0));
        assert_eq!(group.rods()[0].top_left(), Vec2::new(40.0, 40.0));
    }

    #[test]
    fn test_resolve_without_selection_fails() {
        let mut group = RodGroup::new(vec![Rod::new(1, 0.0, 0.0)]);
        let selection = SelectionState::default();
        assert!(matches!(
            group.resolve(&selection, Vec2::ZERO),
            Err(ResolveError::NothingSelected)
        ));
    }

    #[test]
    fn test_resolve_rejects_prior_overlap() {
        let mut group = RodGroup::new(vec![Rod::new(2, 0.0, 0.0), Rod::new(2, 10.0, 10.0)]);
        let selection = select(&group, 0, Vec2::new(1.0, 1.0));
        let result = group.resolve(&selection, Vec2::new(6.0, 1.0));
        assert!(matches!(result, Err(ResolveError::Overlap(_))));
        assert_eq!(group.rods()[0].top_left(), Vec2::ZERO);
    }

    #[test]
    fn test_bound_set_capacity_is_enforced() {
        let mut set = BoundSet::with_capacity(2);
        set.push(XBound::StayLeftOf(1.0)).unwrap();
        set.push(XBound::StayLeftOf(2.0)).unwrap();
        assert!(matches!(
            set.push(XBound::StayLeftOf(3.0)),
            Err(ResolveError::CapacityExceeded { capacity: 2 })
        ));
        assert_eq!(set.len(), 2);
    }

    #[test]
    fn test_rod_at_picks_first_in_order() {
        let group = RodGroup::new(vec![Rod::new(1, 0.0, 0.0), Rod::new(2, 100.0, 0.0)]);
        assert_eq!(group.rod_at(Vec2::new(150.0, 10.0)), Some(1));
        assert_eq!(group.rod_at(Vec2::new(10.0, 10.0)), Some(0));
        assert_eq!(group.rod_at(Vec2::new(90.0, 10.0)), None);
    }

    fn layout_strategy() -> impl Strategy<Value = RodGroup> {
        prop::collection::vec((1u8..=10, 0.0f32..400.0), 2..8).prop_map(|specs| {
            let rods = specs
                .into_iter()
                .enumerate()
                .map(|(row, (length, x))| Rod::new(length, x, row as f32 * 60.0))
                .collect();
            RodGroup::new(rods)
        })
    }

    proptest! {
        #[test]
        fn prop_drags_never_overlap(
            mut group in layout_strategy(),
            moves in prop::collection::vec((0usize..8, -100.0f32..600.0, -100.0f32..600.0), 1..40),
        ) {
            prop_assert!(group.find_overlap().is_none());
            for (index, x, y) in moves {
                let index = index % group.len();
                let before = group.rods()[index].top_left();
                let selection = select(&group, index, before);
                let result = group.resolve(&selection, Vec2::new(x, y)).unwrap();

                prop_assert!(group.find_overlap().is_none());
                prop_assert_eq!(group.rods()[index].top_left(), result.position);
                if !result.collided {
                    prop_assert_eq!(result.position, Vec2::new(x, y));
                }
            }
        }
    }
}
