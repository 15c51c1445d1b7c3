//! Generic spatial-containment tree.
//!
//! A [`ContainmentTree`] encodes which closed regions of a layer lie inside
//! which others. The *root* variant is a sentinel with no boundary that
//! contains everything; *normal* nodes carry a boundary [`Loop`] and a
//! payload. Parent/child edges always mean geometric containment, and
//! siblings are pairwise disjoint — both guaranteed by [`insert`] as long
//! as the inserted loops themselves are disjoint or nested, which the
//! upstream slicer guarantees for any one layer.
//!
//! [`insert`]: ContainmentTree::insert

use std::fmt::Write as _;

use toolpath_core::{Error, Loop, Point2, Result};

/// A rooted n-ary tree of nested regions; see the module docs.
#[derive(Debug)]
pub struct ContainmentTree<T> {
    pub(crate) boundary: Option<Loop>,
    pub(crate) children: Vec<ContainmentTree<T>>,
    pub(crate) value: T,
}

impl<T: Default> Default for ContainmentTree<T> {
    fn default() -> Self {
        Self::root()
    }
}

impl<T: Default> ContainmentTree<T> {
    /// Creates a root tree: no boundary, no children, default payload.
    pub fn root() -> Self {
        Self {
            boundary: None,
            children: Vec::new(),
            value: T::default(),
        }
    }

    /// Creates a normal node with a default payload.
    pub fn node(boundary: Loop) -> Self {
        Self::with_value(boundary, T::default())
    }
}

impl<T> ContainmentTree<T> {
    /// Creates a normal node carrying `value`.
    pub fn with_value(boundary: Loop, value: T) -> Self {
        Self {
            boundary: Some(boundary),
            children: Vec::new(),
            value,
        }
    }

    /// Returns true for the sentinel root.
    #[inline]
    pub fn is_root(&self) -> bool {
        self.boundary.is_none()
    }

    /// The node's boundary loop; `None` for the root.
    #[inline]
    pub fn boundary(&self) -> Option<&Loop> {
        self.boundary.as_ref()
    }

    /// The node's payload.
    #[inline]
    pub fn value(&self) -> &T {
        &self.value
    }

    /// Mutable access to the node's payload.
    #[inline]
    pub fn value_mut(&mut self) -> &mut T {
        &mut self.value
    }

    /// The node's direct children.
    #[inline]
    pub fn children(&self) -> &[ContainmentTree<T>] {
        &self.children
    }

    /// Whether this tree contains `point`. The root contains every point.
    pub fn contains_point(&self, point: &Point2) -> bool {
        match &self.boundary {
            None => true,
            Some(boundary) => boundary.contains(point),
        }
    }

    /// Whether this tree spatially contains `other`.
    ///
    /// A root contains every normal tree and no root; a normal tree
    /// contains another iff the winding test holds for a vertex of the
    /// other's boundary. One vertex suffices because distinct region loops
    /// in a layer never intersect.
    pub fn contains_tree(&self, other: &Self) -> bool {
        match (&self.boundary, &other.boundary) {
            (_, None) => false,
            (None, Some(_)) => true,
            (Some(own), Some(theirs)) => match theirs.vertices().first() {
                Some(v) => own.contains(v),
                None => false,
            },
        }
    }

    /// The deepest descendant whose boundary contains `point`, or `self`.
    ///
    /// Siblings are disjoint, so at most one child matches per level.
    pub fn select(&self, point: &Point2) -> &Self {
        match self.children.iter().find(|c| c.contains_point(point)) {
            Some(child) => child.select(point),
            None => self,
        }
    }

    /// Mutable variant of [`select`](Self::select).
    pub fn select_mut(&mut self, point: &Point2) -> &mut Self {
        match self.children.iter().position(|c| c.contains_point(point)) {
            Some(idx) => self.children[idx].select_mut(point),
            None => self,
        }
    }

    /// Inserts `other` into this tree, restructuring so the containment
    /// invariants keep holding. Returns the node now holding `other`'s
    /// contents.
    ///
    /// Existing children that `other` contains are re-parented under it;
    /// if an existing child contains `other`, insertion recurses into that
    /// child; if `other` contains this node, the two exchange contents and
    /// the displaced node is re-inserted beneath. All moves are
    /// constant-time content swaps.
    ///
    /// # Errors
    ///
    /// [`Error::Containment`] when `other` is a root, or when neither tree
    /// contains the other at a non-root call site. Inserting through a
    /// root can never fail.
    pub fn insert(&mut self, mut other: Self) -> Result<&mut Self> {
        if other.is_root() {
            return Err(Error::Containment("cannot insert a root tree"));
        }
        if self.is_root() || self.contains_tree(&other) {
            let mut i = 0;
            while i < self.children.len() {
                if other.contains_tree(&self.children[i]) {
                    other.children.push(self.children.swap_remove(i));
                } else {
                    i += 1;
                }
            }
            if let Some(idx) = self.children.iter().position(|c| c.contains_tree(&other)) {
                return self.children[idx].insert(other);
            }
            self.children.push(other);
            Ok(self.children.last_mut().expect("child just pushed"))
        } else if other.contains_tree(self) {
            std::mem::swap(self, &mut other);
            // `other` now holds this node's previous contents; it belongs
            // somewhere beneath the new occupant.
            self.insert(other)?;
            Ok(self)
        } else {
            Err(Error::Containment("neither tree contains the other"))
        }
    }

    /// Constant-time exchange of boundary, children and payload.
    pub fn swap(&mut self, other: &mut Self) {
        std::mem::swap(self, other);
    }

    /// ASCII-art rendering of the tree, one node per line.
    pub fn repr(&self) -> String {
        let mut out = String::new();
        self.repr_level(&mut out, 0);
        out
    }

    fn repr_level(&self, out: &mut String, level: usize) {
        for _ in 0..level {
            out.push_str("  ");
        }
        match &self.boundary {
            None => {
                let _ = writeln!(out, "(root)");
            }
            Some(boundary) => {
                let _ = writeln!(out, "loop[{}]", boundary.len());
            }
        }
        for child in &self.children {
            child.repr_level(out, level + 1);
        }
    }
}
