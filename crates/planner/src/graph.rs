//! Spatial graph of labeled extrusion items.
//!
//! A [`SpatialGraph`] buffers the labeled open paths and loops of one
//! hierarchy node, indexed in an R*-tree by bounding box. Its destructive
//! [`optimize`] drains the graph into an output sequence: label classes in
//! comparator order, items within a class chained greedily by travel
//! distance, and consecutive items glued into a single emitted path only
//! when the connecting move stays clear of the node's boundaries.
//!
//! [`optimize`]: SpatialGraph::optimize

use std::cmp::Ordering;

use rstar::{Envelope, PointDistance, RTree, RTreeObject, AABB};
use toolpath_core::{
    distance_squared, LabeledOpenPaths, Loop, PathLabel, Point2, Polyline, Segment2,
};

use crate::boundary::BoundarySet;

#[derive(Debug, Clone)]
enum Item {
    Path(Polyline),
    Loop(Loop),
}

#[derive(Debug, Clone)]
struct Entry {
    item: Item,
    label: PathLabel,
}

impl Entry {
    /// Squared distance from `from` to the item's best pickup point.
    fn pickup_distance_2(&self, from: &Point2) -> f64 {
        match &self.item {
            Item::Path(path) => {
                let head = path
                    .first()
                    .map_or(f64::INFINITY, |p| distance_squared(p, from));
                let tail = path
                    .last()
                    .map_or(f64::INFINITY, |p| distance_squared(p, from));
                head.min(tail)
            }
            Item::Loop(lp) => lp.nearest_vertex_distance_squared(from),
        }
    }

    /// Opens the item into a polyline entered from the end nearest `from`.
    fn into_oriented(self, from: &Point2) -> Polyline {
        match self.item {
            Item::Path(mut path) => {
                let head = path
                    .first()
                    .map_or(f64::INFINITY, |p| distance_squared(p, from));
                let tail = path
                    .last()
                    .map_or(f64::INFINITY, |p| distance_squared(p, from));
                if tail < head {
                    path.reverse();
                }
                path
            }
            Item::Loop(lp) => lp.to_polyline_from(lp.nearest_vertex(from)),
        }
    }
}

#[derive(Debug, Clone)]
struct EntryEnvelope {
    aabb: AABB<[f64; 2]>,
    slot: usize,
}

impl RTreeObject for EntryEnvelope {
    type Envelope = AABB<[f64; 2]>;

    fn envelope(&self) -> Self::Envelope {
        self.aabb
    }
}

impl PointDistance for EntryEnvelope {
    fn distance_2(&self, point: &[f64; 2]) -> f64 {
        self.aabb.distance_2(point)
    }
}

fn envelope_of(points: &[Point2]) -> AABB<[f64; 2]> {
    let mut min = [f64::INFINITY; 2];
    let mut max = [f64::NEG_INFINITY; 2];
    for p in points {
        min[0] = min[0].min(p.x);
        min[1] = min[1].min(p.y);
        max[0] = max[0].max(p.x);
        max[1] = max[1].max(p.y);
    }
    AABB::from_corners(min, max)
}

/// Mutable store of labeled items with a spatial index; see the module
/// docs.
#[derive(Debug, Default)]
pub struct SpatialGraph {
    entries: Vec<Option<Entry>>,
    index: RTree<EntryEnvelope>,
    live: usize,
}

impl SpatialGraph {
    /// Creates an empty graph.
    pub fn new() -> Self {
        Self::default()
    }

    /// Buffers a labeled open path. Paths with fewer than two points carry
    /// no extrusion and are dropped with a warning.
    pub fn insert_path(&mut self, path: Polyline, label: PathLabel) {
        if path.len() < 2 {
            log::warn!("discarding degenerate path of {} point(s)", path.len());
            return;
        }
        let aabb = envelope_of(path.points());
        self.push(Entry {
            item: Item::Path(path),
            label,
        }, aabb);
    }

    /// Buffers a labeled loop. The loop is opened at its best vertex at
    /// emission time.
    pub fn insert_loop(&mut self, lp: Loop, label: PathLabel) {
        if lp.len() < 3 {
            log::warn!("discarding degenerate loop of {} vertices", lp.len());
            return;
        }
        let aabb = envelope_of(lp.vertices());
        self.push(Entry {
            item: Item::Loop(lp),
            label,
        }, aabb);
    }

    fn push(&mut self, entry: Entry, aabb: AABB<[f64; 2]>) {
        let slot = self.entries.len();
        self.entries.push(Some(entry));
        self.index.insert(EntryEnvelope { aabb, slot });
        self.live += 1;
    }

    /// Number of buffered items.
    pub fn len(&self) -> usize {
        self.live
    }

    /// Returns true if no items are buffered.
    pub fn is_empty(&self) -> bool {
        self.live == 0
    }

    /// Drops all items.
    pub fn clear(&mut self) {
        self.entries.clear();
        self.index = RTree::new();
        self.live = 0;
    }

    /// Constant-time content exchange.
    pub fn swap(&mut self, other: &mut Self) {
        std::mem::swap(self, other);
    }

    /// Drains the graph into `result`; see the module docs for the
    /// emission policy. `entry_point` is read for the starting position
    /// and left at the last emitted point.
    pub fn optimize<F>(
        &mut self,
        result: &mut LabeledOpenPaths,
        entry_point: &mut Point2,
        bounder: &BoundarySet,
        label_order: &F,
    ) where
        F: Fn(&PathLabel, &PathLabel) -> Ordering,
    {
        while let Some(class) = self.best_label(label_order) {
            let mut active: Option<(Polyline, PathLabel)> = None;
            while let Some(slot) = self.nearest_in_class(entry_point, &class, label_order) {
                let Some(entry) = self.entries[slot].take() else {
                    continue;
                };
                self.live -= 1;
                let label = entry.label;
                let path = entry.into_oriented(entry_point);
                let Some(start) = path.first().copied() else {
                    continue;
                };
                let link = Segment2::new(*entry_point, start);

                let chains = matches!(
                    &active,
                    Some((_, acc_label)) if *acc_label == label && bounder.is_clear(&link)
                );
                if chains {
                    if let Some((acc, _)) = active.as_mut() {
                        acc.extend_from(&path);
                    }
                } else {
                    if let Some(done) = active.take() {
                        result.push(done);
                    }
                    active = Some((path, label));
                }
                if let Some(last) = active.as_ref().and_then(|(p, _)| p.last()) {
                    *entry_point = *last;
                }
            }
            if let Some(done) = active.take() {
                result.push(done);
            }
        }
        self.clear();
    }

    /// The highest-precedence label among the remaining items. Ties keep
    /// the earliest-inserted label so emission stays deterministic.
    fn best_label<F>(&self, label_order: &F) -> Option<PathLabel>
    where
        F: Fn(&PathLabel, &PathLabel) -> Ordering,
    {
        let mut best: Option<PathLabel> = None;
        for entry in self.entries.iter().flatten() {
            best = Some(match best {
                None => entry.label,
                Some(current) => {
                    if label_order(&entry.label, &current) == Ordering::Less {
                        entry.label
                    } else {
                        current
                    }
                }
            });
        }
        best
    }

    /// The remaining item of `class` nearest to `from`.
    ///
    /// Walks the R*-tree in envelope-distance order and stops once the
    /// envelope lower bound exceeds the best exact pickup distance found.
    fn nearest_in_class<F>(&self, from: &Point2, class: &PathLabel, label_order: &F) -> Option<usize>
    where
        F: Fn(&PathLabel, &PathLabel) -> Ordering,
    {
        let query = [from.x, from.y];
        let mut best: Option<(f64, usize)> = None;
        for envelope in self.index.nearest_neighbor_iter(&query) {
            if let Some((best_d, _)) = best {
                if envelope.aabb.distance_2(&query) > best_d {
                    break;
                }
            }
            let Some(entry) = self.entries[envelope.slot].as_ref() else {
                continue;
            };
            if label_order(&entry.label, class) != Ordering::Equal {
                continue;
            }
            let d = entry.pickup_distance_2(from);
            let better = match best {
                None => true,
                Some((best_d, best_slot)) => {
                    d < best_d || (d == best_d && envelope.slot < best_slot)
                }
            };
            if better {
                best = Some((d, envelope.slot));
            }
        }
        best.map(|(_, slot)| slot)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use toolpath_core::point::point2;
    use toolpath_core::{default_label_order, PathRole};

    fn seg_path(x0: f64, y0: f64, x1: f64, y1: f64) -> Polyline {
        Polyline::new(vec![point2(x0, y0), point2(x1, y1)])
    }

    #[test]
    fn test_len_and_clear() {
        let mut graph = SpatialGraph::new();
        assert!(graph.is_empty());
        graph.insert_path(seg_path(0.0, 0.0, 1.0, 0.0), PathLabel::default());
        graph.insert_loop(
            Loop::new(vec![point2(0.0, 0.0), point2(1.0, 0.0), point2(0.0, 1.0)]),
            PathLabel::default(),
        );
        assert_eq!(graph.len(), 2);
        graph.clear();
        assert!(graph.is_empty());
    }

    #[test]
    fn test_degenerate_items_dropped() {
        let mut graph = SpatialGraph::new();
        graph.insert_path(Polyline::new(vec![point2(0.0, 0.0)]), PathLabel::default());
        graph.insert_loop(
            Loop::new(vec![point2(0.0, 0.0), point2(1.0, 0.0)]),
            PathLabel::default(),
        );
        assert!(graph.is_empty());
    }

    #[test]
    fn test_optimize_orders_by_distance() {
        let mut graph = SpatialGraph::new();
        let label = PathLabel::default();
        graph.insert_path(seg_path(100.0, 0.0, 110.0, 0.0), label);
        graph.insert_path(seg_path(20.0, 0.0, 30.0, 0.0), label);
        graph.insert_path(seg_path(60.0, 0.0, 70.0, 0.0), label);

        let mut result = Vec::new();
        let mut entry = point2(0.0, 0.0);
        let bounder = BoundarySet::default();
        graph.optimize(&mut result, &mut entry, &bounder, &default_label_order);

        // No boundaries: everything chains into one path, nearest first.
        assert!(graph.is_empty());
        assert_eq!(result.len(), 1);
        let path = &result[0].0;
        assert_eq!(path.first(), Some(&point2(20.0, 0.0)));
        assert_eq!(path.last(), Some(&point2(110.0, 0.0)));
        assert_eq!(entry, point2(110.0, 0.0));
    }

    #[test]
    fn test_optimize_reverses_paths_entered_from_the_far_end() {
        let mut graph = SpatialGraph::new();
        graph.insert_path(seg_path(10.0, 0.0, 0.0, 0.0), PathLabel::default());

        let mut result = Vec::new();
        let mut entry = point2(-1.0, 0.0);
        graph.optimize(
            &mut result,
            &mut entry,
            &BoundarySet::default(),
            &default_label_order,
        );
        assert_eq!(result[0].0.first(), Some(&point2(0.0, 0.0)));
        assert_eq!(result[0].0.last(), Some(&point2(10.0, 0.0)));
    }

    #[test]
    fn test_optimize_emits_classes_by_priority() {
        let mut graph = SpatialGraph::new();
        let fill = PathLabel::new(PathRole::Infill, 5);
        let shell = PathLabel::inset(0, 20);
        // The infill sits closer to the entry point, but the shell's class
        // outranks it.
        graph.insert_path(seg_path(1.0, 0.0, 2.0, 0.0), fill);
        graph.insert_path(seg_path(50.0, 0.0, 60.0, 0.0), shell);

        let mut result = Vec::new();
        let mut entry = point2(0.0, 0.0);
        graph.optimize(
            &mut result,
            &mut entry,
            &BoundarySet::default(),
            &default_label_order,
        );

        assert_eq!(result.len(), 2);
        assert_eq!(result[0].1, shell);
        assert_eq!(result[1].1, fill);
    }

    #[test]
    fn test_optimize_opens_loop_at_nearest_vertex() {
        let mut graph = SpatialGraph::new();
        graph.insert_loop(
            Loop::new(vec![
                point2(0.0, 0.0),
                point2(10.0, 0.0),
                point2(10.0, 10.0),
                point2(0.0, 10.0),
            ]),
            PathLabel::inset(0, 10),
        );

        let mut result = Vec::new();
        let mut entry = point2(11.0, 11.0);
        graph.optimize(
            &mut result,
            &mut entry,
            &BoundarySet::default(),
            &default_label_order,
        );

        let path = &result[0].0;
        assert_eq!(path.len(), 5);
        assert_eq!(path.first(), Some(&point2(10.0, 10.0)));
        assert_eq!(path.last(), Some(&point2(10.0, 10.0)));
        assert_eq!(entry, point2(10.0, 10.0));
    }

    #[test]
    fn test_optimize_respects_boundaries_when_chaining() {
        let mut graph = SpatialGraph::new();
        let label = PathLabel::default();
        graph.insert_path(seg_path(0.0, 0.0, 4.0, 0.0), label);
        graph.insert_path(seg_path(6.0, 0.0, 10.0, 0.0), label);

        // A wall at x = 5 splits the chain into two emitted paths.
        let mut wall = BoundarySet::default();
        wall.insert_segment(Segment2::new(point2(5.0, -10.0), point2(5.0, 10.0)));

        let mut result = Vec::new();
        let mut entry = point2(0.0, 0.0);
        graph.optimize(&mut result, &mut entry, &wall, &default_label_order);
        assert_eq!(result.len(), 2);

        // Without the wall they merge.
        let mut graph = SpatialGraph::new();
        graph.insert_path(seg_path(0.0, 0.0, 4.0, 0.0), label);
        graph.insert_path(seg_path(6.0, 0.0, 10.0, 0.0), label);
        let mut result = Vec::new();
        let mut entry = point2(0.0, 0.0);
        graph.optimize(
            &mut result,
            &mut entry,
            &BoundarySet::default(),
            &default_label_order,
        );
        assert_eq!(result.len(), 1);
    }

    #[test]
    fn test_swap_is_total() {
        let mut a = SpatialGraph::new();
        a.insert_path(seg_path(0.0, 0.0, 1.0, 0.0), PathLabel::default());
        let mut b = SpatialGraph::new();
        a.swap(&mut b);
        assert!(a.is_empty());
        assert_eq!(b.len(), 1);
    }
}
