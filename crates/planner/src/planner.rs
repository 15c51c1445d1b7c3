//! The public planning surface for one layer.

use std::cmp::Ordering;

use toolpath_core::point::point2;
use toolpath_core::{
    default_label_order, LabeledOpenPaths, Loop, PathLabel, Point2, Polyline, PlannerConfig,
    Result,
};

use crate::boundary::BoundarySet;
use crate::inset_tree::InsetTree;
use crate::outline_tree::OutlineTree;

/// Buffers a layer's outlines, insets and labeled paths, then emits them
/// in optimized order.
///
/// Usage per layer: add every outline (via [`add_boundary_loop`] or an
/// outline-labeled [`add_loop`]), then the insets and loose paths, then
/// call [`optimize`] exactly once. Optimization drains the buffered
/// hierarchy; the planner can be reused for the next layer afterwards. The
/// entry point persists across layers so each layer starts where the
/// previous one ended.
///
/// [`add_boundary_loop`]: Self::add_boundary_loop
/// [`add_loop`]: Self::add_loop
/// [`optimize`]: Self::optimize
#[derive(Debug, Default)]
pub struct LayerPlanner {
    root: OutlineTree,
    loose_boundaries: Vec<Polyline>,
    history: Option<Point2>,
    config: PlannerConfig,
}

impl LayerPlanner {
    /// Creates a planner; the entry point starts at the configured home
    /// position.
    pub fn new(config: PlannerConfig) -> Self {
        Self {
            root: OutlineTree::root(),
            loose_boundaries: Vec::new(),
            history: None,
            config,
        }
    }

    /// The planner's configuration.
    pub fn config(&self) -> &PlannerConfig {
        &self.config
    }

    /// The point the next emission will start from.
    pub fn entry_point(&self) -> Point2 {
        self.history
            .unwrap_or_else(|| point2(self.config.home_position.0, self.config.home_position.1))
    }

    /// Registers an outline loop, creating a node of the outline
    /// hierarchy.
    ///
    /// # Errors
    ///
    /// Never fails for loops that are pairwise disjoint or nested, which
    /// the upstream slicer guarantees per layer; a containment error
    /// indicates crossing outlines.
    pub fn add_boundary_loop(&mut self, outline: Loop) -> Result<()> {
        self.root.insert(OutlineTree::outline_node(outline))?;
        Ok(())
    }

    /// Registers an open boundary path: a barrier for connecting moves
    /// that is not itself an outline region.
    pub fn add_boundary_path(&mut self, path: Polyline) {
        self.loose_boundaries.push(path);
    }

    /// Buffers a labeled loop.
    ///
    /// Outline labels create hierarchy nodes exactly like
    /// [`add_boundary_loop`](Self::add_boundary_loop); everything else is
    /// dispatched to the deepest outline containing it.
    pub fn add_loop(&mut self, lp: Loop, label: PathLabel) -> Result<()> {
        if label.is_outline() {
            return self.add_boundary_loop(lp);
        }
        let point = lp.representative_point();
        self.root.select_mut(&point).insert_loop(lp, label)
    }

    /// Buffers a labeled open path, dispatched to the deepest outline
    /// containing it. Paths outside every outline land in an implicit
    /// root-level graph and are emitted last.
    pub fn add_path(&mut self, path: Polyline, label: PathLabel) {
        let Some(point) = path.representative_point() else {
            log::warn!("discarding empty path");
            return;
        };
        self.root.select_mut(&point).insert_path(path, label);
    }

    /// Drops all buffered paths and insets, keeping registered boundaries.
    pub fn clear_paths(&mut self) {
        fn clear_node(node: &mut OutlineTree) {
            node.value_mut().graph.clear();
            node.value_mut().insets = InsetTree::root();
            for child in node.children.iter_mut() {
                clear_node(child);
            }
        }
        clear_node(&mut self.root);
    }

    /// Drops all registered boundaries, including any paths already
    /// dispatched inside them.
    pub fn clear_boundaries(&mut self) {
        self.root = OutlineTree::root();
        self.loose_boundaries.clear();
    }

    /// Emits every buffered path into `result` under the default label
    /// order, draining the hierarchy.
    pub fn optimize(&mut self, result: &mut LabeledOpenPaths) {
        self.optimize_with(result, &default_label_order);
    }

    /// [`optimize`](Self::optimize) with a caller-supplied label order.
    pub fn optimize_with<F>(&mut self, result: &mut LabeledOpenPaths, label_order: &F)
    where
        F: Fn(&PathLabel, &PathLabel) -> Ordering,
    {
        let mut entry = self.entry_point();
        if self.loose_boundaries.is_empty() {
            self.root
                .traverse(result, &mut entry, &self.config, label_order);
        } else {
            // Open boundary paths cannot be attributed to a single node, so
            // fall back to one comprehensive boundary set.
            let mut bounder = BoundarySet::new(self.config.tolerance);
            self.root.construct_boundaries_recursive(&mut bounder);
            for path in &self.loose_boundaries {
                bounder.insert_path(path);
            }
            self.root
                .traverse_with(result, &mut entry, label_order, &bounder);
        }
        self.history = Some(entry);
    }
}
