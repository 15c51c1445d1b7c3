//! The outline hierarchy of a layer.
//!
//! Outline loops are the slice boundaries of a layer; nesting them groups
//! sibling islands with their contents and keeps the set of boundaries
//! that any single optimization step must consult small. Each node holds
//! the [`InsetTree`] of its perimeter shells plus a [`SpatialGraph`] of
//! loose items that sit inside the outline but inside none of its insets.

use std::cmp::Ordering;

use toolpath_core::{LabeledOpenPaths, Loop, PathLabel, Point2, Polyline, PlannerConfig, Result};

use crate::boundary::BoundarySet;
use crate::graph::SpatialGraph;
use crate::inset_tree::InsetTree;
use crate::tree::ContainmentTree;

/// Payload of one outline node.
#[derive(Debug, Default)]
pub struct OutlineNode {
    /// The perimeter shells generated for this outline.
    pub insets: InsetTree,
    /// Items inside this outline but not inside any of its insets.
    pub graph: SpatialGraph,
}

/// Containment hierarchy of outline loops; see the module docs.
pub type OutlineTree = ContainmentTree<OutlineNode>;

impl OutlineTree {
    /// Creates a normal outline node for `boundary`.
    pub fn outline_node(boundary: Loop) -> Self {
        Self::node(boundary)
    }

    /// Buffers a labeled open path, routed to the deepest inset that
    /// contains it or to this node's loose graph.
    pub fn insert_path(&mut self, path: Polyline, label: PathLabel) {
        let Some(point) = path.representative_point() else {
            log::warn!("discarding path with no representative point");
            return;
        };
        if self.value.insets.select(&point).is_root() {
            self.value.graph.insert_path(path, label);
        } else {
            self.value.insets.select_mut(&point).insert_path(path, label);
        }
    }

    /// Buffers a labeled loop.
    ///
    /// Inset labels become nodes of this outline's [`InsetTree`]; anything
    /// else is routed like a path. Outline loops must instead be inserted
    /// as tree nodes via [`insert`](ContainmentTree::insert).
    pub fn insert_loop(&mut self, lp: Loop, label: PathLabel) -> Result<()> {
        if label.is_inset() {
            self.value.insets.insert(InsetTree::inset_node(lp, label))?;
            return Ok(());
        }
        let point = lp.representative_point();
        if self.value.insets.select(&point).is_root() {
            self.value.graph.insert_loop(lp, label);
        } else {
            self.value.insets.select_mut(&point).insert_loop(lp, label);
        }
        Ok(())
    }

    /// Destructively emits this subtree into `result`.
    ///
    /// Builds a boundary set from this outline and its direct children
    /// (deeper descendants construct their own when their turn comes),
    /// finishes every child island nearest-first, then emits this node's
    /// insets and loose items under that boundary set.
    pub fn traverse<F>(
        &mut self,
        result: &mut LabeledOpenPaths,
        entry_point: &mut Point2,
        config: &PlannerConfig,
        label_order: &F,
    ) where
        F: Fn(&PathLabel, &PathLabel) -> Ordering,
    {
        let bounder = self.construct_boundaries(config);
        while let Some(idx) = self.select_nearest_child(entry_point) {
            let mut child = self.children.swap_remove(idx);
            child.traverse(result, entry_point, config, label_order);
        }
        self.value
            .insets
            .traverse(result, entry_point, label_order, &bounder);
        self.value
            .graph
            .optimize(result, entry_point, &bounder, label_order);
    }

    /// [`traverse`](Self::traverse) with a caller-supplied boundary set,
    /// used when the caller has precomputed the full recursive set (e.g.
    /// when open boundary paths participate).
    pub fn traverse_with<F>(
        &mut self,
        result: &mut LabeledOpenPaths,
        entry_point: &mut Point2,
        label_order: &F,
        bounder: &BoundarySet,
    ) where
        F: Fn(&PathLabel, &PathLabel) -> Ordering,
    {
        while let Some(idx) = self.select_nearest_child(entry_point) {
            let mut child = self.children.swap_remove(idx);
            child.traverse_with(result, entry_point, label_order, bounder);
        }
        self.value
            .insets
            .traverse(result, entry_point, label_order, bounder);
        self.value
            .graph
            .optimize(result, entry_point, bounder, label_order);
    }

    /// Boundary set of this node's outline and its direct children's.
    ///
    /// A connecting move made while emitting this node's contents stays
    /// inside this outline and outside its children, so no other loop in
    /// the layer can be crossed; consulting the rest would be wasted work.
    pub fn construct_boundaries(&self, config: &PlannerConfig) -> BoundarySet {
        let mut set = BoundarySet::new(config.tolerance);
        if let Some(boundary) = self.boundary() {
            set.insert_loop(boundary);
        }
        for child in &self.children {
            if let Some(boundary) = child.boundary() {
                set.insert_loop(boundary);
            }
        }
        set
    }

    /// Adds this node's outline and every descendant's to `set`.
    pub fn construct_boundaries_recursive(&self, set: &mut BoundarySet) {
        if let Some(boundary) = self.boundary() {
            set.insert_loop(boundary);
        }
        for child in &self.children {
            child.construct_boundaries_recursive(set);
        }
    }

    /// The child island nearest to `entry_point`.
    fn select_nearest_child(&self, entry_point: &Point2) -> Option<usize> {
        let mut best: Option<(usize, f64)> = None;
        for (i, child) in self.children.iter().enumerate() {
            let Some(boundary) = child.boundary() else {
                continue;
            };
            let d = boundary.nearest_vertex_distance_squared(entry_point);
            if best.map_or(true, |(_, best_d)| d < best_d) {
                best = Some((i, d));
            }
        }
        best.map(|(i, _)| i)
    }
}
