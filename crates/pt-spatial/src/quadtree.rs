//! Point quadtree with lazy subdivision.
//!
//! # Structure
//!
//! Every node is either a leaf holding `(item, position)` pairs or an
//! internal node with exactly four children covering its quadrants.  Leaves
//! split once they hold `capacity` objects and another one arrives, unless
//! they already sit at `max_depth`, in which case they simply grow.
//!
//! Quadrant ownership is half-open (`min <= p < max`), so each position
//! belongs to exactly one leaf.  Query rectangles are closed.
//!
//! The index never removes objects: the scheduler builds a fresh tree every
//! tick (see [`QuadTree::clear`]).

use pt_core::{Rect, Vec2};

use crate::{SpatialError, SpatialResult};

/// A quadtree over 2D points carrying a small `Copy` payload.
#[derive(Debug)]
pub struct QuadTree<T: Copy> {
    bounds: Rect,
    capacity: usize,
    max_depth: u8,
    depth: u8,
    objects: Vec<(T, Vec2)>,
    children: Option<Box<[QuadTree<T>; 4]>>,
}

impl<T: Copy> QuadTree<T> {
    /// Create an empty root covering `bounds`.
    pub fn new(bounds: Rect, capacity: usize, max_depth: u8) -> SpatialResult<Self> {
        Self::with_depth(bounds, capacity, max_depth, 0)
    }

    /// Create an empty node that sits at level `depth` of a tree.
    ///
    /// Fails with [`SpatialError::DepthExceeded`] if `depth > max_depth`.
    pub fn with_depth(bounds: Rect, capacity: usize, max_depth: u8, depth: u8) -> SpatialResult<Self> {
        if depth > max_depth {
            return Err(SpatialError::DepthExceeded { depth, max_depth });
        }
        if capacity == 0 {
            return Err(SpatialError::InvalidConfig("capacity must be at least 1".into()));
        }
        if !bounds.is_valid() {
            return Err(SpatialError::InvalidConfig(format!("degenerate bounds {bounds}")));
        }
        Ok(Self {
            bounds,
            capacity,
            max_depth,
            depth,
            objects: Vec::new(),
            children: None,
        })
    }

    // ── Accessors ─────────────────────────────────────────────────────────

    #[inline]
    pub fn bounds(&self) -> Rect {
        self.bounds
    }

    #[inline]
    pub fn capacity(&self) -> usize {
        self.capacity
    }

    #[inline]
    pub fn max_depth(&self) -> u8 {
        self.max_depth
    }

    #[inline]
    pub fn is_leaf(&self) -> bool {
        self.children.is_none()
    }

    /// Total number of stored objects.
    pub fn len(&self) -> usize {
        match &self.children {
            Some(children) => children.iter().map(QuadTree::len).sum(),
            None => self.objects.len(),
        }
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Level of the deepest node (the root is level 0).
    pub fn depth(&self) -> u8 {
        match &self.children {
            Some(children) => children.iter().map(QuadTree::depth).max().unwrap_or(self.depth),
            None => self.depth,
        }
    }

    pub fn leaf_count(&self) -> usize {
        match &self.children {
            Some(children) => children.iter().map(QuadTree::leaf_count).sum(),
            None => 1,
        }
    }

    /// Call `f(bounds, depth, objects)` for every leaf.
    pub fn visit_leaves<F>(&self, mut f: F)
    where
        F: FnMut(&Rect, u8, &[(T, Vec2)]),
    {
        self.visit_leaves_inner(&mut f);
    }

    fn visit_leaves_inner<F>(&self, f: &mut F)
    where
        F: FnMut(&Rect, u8, &[(T, Vec2)]),
    {
        match &self.children {
            Some(children) => children.iter().for_each(|c| c.visit_leaves_inner(f)),
            None => f(&self.bounds, self.depth, &self.objects),
        }
    }

    // ── Mutation ──────────────────────────────────────────────────────────

    /// Drop every object and collapse back to a single leaf.
    pub fn clear(&mut self) {
        self.children = None;
        self.objects.clear();
    }

    /// Store `item` at `at`.
    ///
    /// Positions outside the (half-open) root bounds are rejected with
    /// [`SpatialError::OutOfBounds`].
    pub fn insert(&mut self, item: T, at: Vec2) -> SpatialResult<()> {
        if !self.bounds.owns(at) {
            return Err(SpatialError::OutOfBounds { point: at, bounds: self.bounds });
        }
        self.insert_owned(item, at)
    }

    fn insert_owned(&mut self, item: T, at: Vec2) -> SpatialResult<()> {
        if let Some(children) = &mut self.children {
            let q = quadrant_of(&self.bounds, at);
            return children[q].insert_owned(item, at);
        }
        if self.objects.len() >= self.capacity && self.depth < self.max_depth {
            self.subdivide()?;
            return self.insert_owned(item, at);
        }
        self.objects.push((item, at));
        Ok(())
    }

    fn subdivide(&mut self) -> SpatialResult<()> {
        let (capacity, max_depth, depth) = (self.capacity, self.max_depth, self.depth + 1);
        let [tl, tr, bl, br] = self.bounds.quadrants();
        let mut children = Box::new([
            QuadTree::with_depth(tl, capacity, max_depth, depth)?,
            QuadTree::with_depth(tr, capacity, max_depth, depth)?,
            QuadTree::with_depth(bl, capacity, max_depth, depth)?,
            QuadTree::with_depth(br, capacity, max_depth, depth)?,
        ]);
        for (item, at) in std::mem::take(&mut self.objects) {
            children[quadrant_of(&self.bounds, at)].insert_owned(item, at)?;
        }
        self.children = Some(children);
        Ok(())
    }

    // ── Queries ───────────────────────────────────────────────────────────

    /// Call `f(item, position)` for every object inside the closed `rect`.
    /// Only quadrants overlapping `rect` are visited.
    pub fn for_each_in_rect<F>(&self, rect: &Rect, mut f: F)
    where
        F: FnMut(T, Vec2),
    {
        self.rect_inner(rect, &mut f);
    }

    fn rect_inner<F>(&self, rect: &Rect, f: &mut F)
    where
        F: FnMut(T, Vec2),
    {
        if !self.bounds.overlaps(rect) {
            return;
        }
        match &self.children {
            Some(children) => children.iter().for_each(|c| c.rect_inner(rect, f)),
            None => {
                for &(item, at) in &self.objects {
                    if rect.contains(at) {
                        f(item, at);
                    }
                }
            }
        }
    }

    /// Call `f(item, dist_sq)` for every object within `radius` of `center`
    /// (inclusive).  A non-positive radius matches nothing.
    pub fn for_each_in_circle<F>(&self, center: Vec2, radius: f32, mut f: F)
    where
        F: FnMut(T, f32),
    {
        if !(radius > 0.0) {
            return;
        }
        let r_sq = radius * radius;
        self.for_each_in_rect(&Rect::around(center, radius), |item, at| {
            let d = center.dist_sq(at);
            if d <= r_sq {
                f(item, d);
            }
        });
    }

    /// Collect the items inside `rect`.
    pub fn select_rect(&self, rect: &Rect) -> Vec<T> {
        let mut out = Vec::new();
        self.for_each_in_rect(rect, |item, _| out.push(item));
        out
    }

    /// Collect `(item, dist_sq)` for every object within `radius` of `center`.
    pub fn select_circle(&self, center: Vec2, radius: f32) -> Vec<(T, f32)> {
        let mut out = Vec::new();
        self.for_each_in_circle(center, radius, |item, d| out.push((item, d)));
        out
    }
}

/// Index into [`Rect::quadrants`] order (TL, TR, BL, BR) of the quadrant
/// owning `p`.  Uses the same midpoint as `quadrants`, so the two agree.
#[inline]
fn quadrant_of(bounds: &Rect, p: Vec2) -> usize {
    let mid = bounds.center();
    match (p.x >= mid.x, p.y >= mid.y) {
        (false, true) => 0,
        (true, true) => 1,
        (false, false) => 2,
        (true, false) => 3,
    }
}
