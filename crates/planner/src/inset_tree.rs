//! The inset hierarchy of one outline island.
//!
//! Each node is one inset loop (a perimeter shell at some depth) together
//! with a [`SpatialGraph`] of the non-inset items that fall inside this
//! loop but inside none of its child insets. Insideness is geometric only:
//! for insets of a hole the innermost shells are geometrically *outside*
//! the outermost ones, and the containment tree reflects that.
//!
//! Traversal is destructive and label-aware: children whose labels outrank
//! this node's are emitted first, otherwise this node's own material goes
//! first; among same-ranked children the one nearest the current entry
//! point wins.

use std::cmp::Ordering;

use toolpath_core::{LabeledOpenPaths, Loop, PathLabel, Point2, Polyline};

use crate::boundary::BoundarySet;
use crate::graph::SpatialGraph;
use crate::tree::ContainmentTree;

/// Payload of one inset node.
#[derive(Debug, Default)]
pub struct InsetNode {
    /// Label of the inset loop at this depth.
    pub label: PathLabel,
    /// Non-inset items bounded by this loop and by no child loop.
    pub graph: SpatialGraph,
}

/// Containment hierarchy of inset loops; see the module docs.
pub type InsetTree = ContainmentTree<InsetNode>;

impl InsetTree {
    /// Creates a normal inset node for `boundary` labeled `label`.
    pub fn inset_node(boundary: Loop, label: PathLabel) -> Self {
        Self::with_value(
            boundary,
            InsetNode {
                label,
                graph: SpatialGraph::new(),
            },
        )
    }

    /// Label of this node's inset loop.
    pub fn label(&self) -> &PathLabel {
        &self.value.label
    }

    /// Buffers a labeled open path into this node's graph.
    pub fn insert_path(&mut self, path: Polyline, label: PathLabel) {
        self.value.graph.insert_path(path, label);
    }

    /// Buffers a labeled non-inset loop into this node's graph.
    ///
    /// Inset loops must instead be inserted as tree nodes via
    /// [`insert`](ContainmentTree::insert) so they participate in the
    /// hierarchy.
    pub fn insert_loop(&mut self, lp: Loop, label: PathLabel) {
        self.value.graph.insert_loop(lp, label);
    }

    /// Destructively emits this subtree into `result`.
    ///
    /// Children and this node's own material are interleaved by label
    /// precedence, every graph is drained through `bounder`, and
    /// `entry_point` tracks the last emitted position throughout.
    pub fn traverse<F>(
        &mut self,
        result: &mut LabeledOpenPaths,
        entry_point: &mut Point2,
        label_order: &F,
        bounder: &BoundarySet,
    ) where
        F: Fn(&PathLabel, &PathLabel) -> Ordering,
    {
        let mut self_done = false;
        loop {
            let Some(best) = self.select_best_child(entry_point, label_order) else {
                break;
            };
            if !self_done && !self.is_root() {
                let own = self.value.label;
                let child = self.children[best].value.label;
                if label_order(&own, &child) == Ordering::Less {
                    self.traverse_internal(result, entry_point, label_order, bounder);
                    self_done = true;
                    continue;
                }
            }
            let mut child = self.children.swap_remove(best);
            child.traverse(result, entry_point, label_order, bounder);
        }
        if !self_done {
            self.traverse_internal(result, entry_point, label_order, bounder);
        }
    }

    /// Emits the material of this node only: its own loop, tagged with the
    /// node label, plus everything in its graph.
    fn traverse_internal<F>(
        &mut self,
        result: &mut LabeledOpenPaths,
        entry_point: &mut Point2,
        label_order: &F,
        bounder: &BoundarySet,
    ) where
        F: Fn(&PathLabel, &PathLabel) -> Ordering,
    {
        if let Some(own) = self.boundary.clone() {
            let label = self.value.label;
            self.value.graph.insert_loop(own, label);
        }
        self.value
            .graph
            .optimize(result, entry_point, bounder, label_order);
    }

    /// The child to emit next: best label class first, entry-point
    /// distance within a class.
    fn select_best_child<F>(&self, entry_point: &Point2, label_order: &F) -> Option<usize>
    where
        F: Fn(&PathLabel, &PathLabel) -> Ordering,
    {
        let mut best: Option<(usize, PathLabel, f64)> = None;
        for (i, child) in self.children.iter().enumerate() {
            let Some(boundary) = child.boundary() else {
                continue;
            };
            let d = boundary.nearest_vertex_distance_squared(entry_point);
            let label = child.value.label;
            best = Some(match best {
                None => (i, label, d),
                Some(current) => match label_order(&label, &current.1) {
                    Ordering::Less => (i, label, d),
                    Ordering::Greater => current,
                    Ordering::Equal => {
                        if d < current.2 {
                            (i, label, d)
                        } else {
                            current
                        }
                    }
                },
            });
        }
        best.map(|(i, _, _)| i)
    }
}
