//! Boundary constraints for connecting moves.
//!
//! A [`BoundarySet`] indexes the outline segments that connecting moves
//! must not cross, backed by an R*-tree so that [`is_clear`] only tests
//! candidates whose bounding boxes actually overlap the move.
//!
//! [`is_clear`]: BoundarySet::is_clear

use rstar::{RTree, RTreeObject, AABB};
use toolpath_core::{Loop, Polyline, Segment2};

#[derive(Debug, Clone)]
struct BoundaryEdge {
    aabb: AABB<[f64; 2]>,
    segment: Segment2,
}

impl BoundaryEdge {
    fn new(segment: Segment2) -> Self {
        let aabb = AABB::from_corners(
            [segment.a.x.min(segment.b.x), segment.a.y.min(segment.b.y)],
            [segment.a.x.max(segment.b.x), segment.a.y.max(segment.b.y)],
        );
        Self { aabb, segment }
    }
}

impl RTreeObject for BoundaryEdge {
    type Envelope = AABB<[f64; 2]>;

    fn envelope(&self) -> Self::Envelope {
        self.aabb
    }
}

/// An indexed set of boundary segments.
///
/// An empty set accepts every move, which is what the sentinel root of an
/// outline hierarchy wants.
#[derive(Debug)]
pub struct BoundarySet {
    index: RTree<BoundaryEdge>,
    tolerance: f64,
}

impl Default for BoundarySet {
    fn default() -> Self {
        Self::new(1e-6)
    }
}

impl BoundarySet {
    /// Creates an empty set. Contact closer than `tolerance` to a
    /// candidate's endpoint does not count as a crossing.
    pub fn new(tolerance: f64) -> Self {
        Self {
            index: RTree::new(),
            tolerance,
        }
    }

    /// Adds one boundary segment.
    pub fn insert_segment(&mut self, segment: Segment2) {
        self.index.insert(BoundaryEdge::new(segment));
    }

    /// Adds every edge of a boundary loop.
    pub fn insert_loop(&mut self, boundary: &Loop) {
        for segment in boundary.segments() {
            self.insert_segment(segment);
        }
    }

    /// Adds every edge of an open boundary path.
    pub fn insert_path(&mut self, path: &Polyline) {
        for segment in path.segments() {
            self.insert_segment(segment);
        }
    }

    /// Number of indexed segments.
    pub fn len(&self) -> usize {
        self.index.size()
    }

    /// Returns true if no segments are indexed.
    pub fn is_empty(&self) -> bool {
        self.index.size() == 0
    }

    /// Whether `candidate` can be traversed without crossing any boundary.
    pub fn is_clear(&self, candidate: &Segment2) -> bool {
        let t = self.tolerance;
        let query = AABB::from_corners(
            [
                candidate.a.x.min(candidate.b.x) - t,
                candidate.a.y.min(candidate.b.y) - t,
            ],
            [
                candidate.a.x.max(candidate.b.x) + t,
                candidate.a.y.max(candidate.b.y) + t,
            ],
        );
        !self
            .index
            .locate_in_envelope_intersecting(&query)
            .any(|edge| candidate.crosses(&edge.segment, t))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use toolpath_core::point::point2;

    fn wall() -> BoundarySet {
        let mut set = BoundarySet::default();
        set.insert_segment(Segment2::new(point2(5.0, -10.0), point2(5.0, 10.0)));
        set
    }

    #[test]
    fn test_empty_set_accepts_everything() {
        let set = BoundarySet::default();
        assert!(set.is_empty());
        assert!(set.is_clear(&Segment2::new(point2(-100.0, 0.0), point2(100.0, 0.0))));
    }

    #[test]
    fn test_crossing_rejected() {
        let set = wall();
        assert_eq!(set.len(), 1);
        assert!(!set.is_clear(&Segment2::new(point2(0.0, 0.0), point2(10.0, 0.0))));
    }

    #[test]
    fn test_non_crossing_accepted() {
        let set = wall();
        assert!(set.is_clear(&Segment2::new(point2(0.0, 0.0), point2(4.0, 0.0))));
        assert!(set.is_clear(&Segment2::new(point2(6.0, -5.0), point2(6.0, 5.0))));
    }

    #[test]
    fn test_endpoint_contact_allowed() {
        // Moves that start or stop on the wall do not cross it.
        let set = wall();
        assert!(set.is_clear(&Segment2::new(point2(0.0, 0.0), point2(5.0, 0.0))));
        assert!(set.is_clear(&Segment2::new(point2(5.0, 0.0), point2(8.0, 0.0))));
    }

    #[test]
    fn test_loop_boundary() {
        let mut set = BoundarySet::default();
        set.insert_loop(&Loop::new(vec![
            point2(0.0, 0.0),
            point2(10.0, 0.0),
            point2(10.0, 10.0),
            point2(0.0, 10.0),
        ]));
        assert_eq!(set.len(), 4);
        // Inside stays clear, escaping does not.
        assert!(set.is_clear(&Segment2::new(point2(2.0, 2.0), point2(8.0, 8.0))));
        assert!(!set.is_clear(&Segment2::new(point2(2.0, 2.0), point2(15.0, 2.0))));
    }
}
