//! Scrollable content surfaces
//!
//! The controller talks to its content through [`ScrollableSurface`]:
//! the content size drives the axis ranges, and child lookups back
//! hit-testing and scrolling to a child. [`RegionTree`] is a ready-made
//! surface built from nested rectangles.

use slotmap::{new_key_type, SlotMap};
use smallvec::SmallVec;

new_key_type! {
    /// Identifier of a region within a surface
    pub struct RegionId;
}

/// Content placed inside a pannable area
pub trait ScrollableSurface {
    /// Full content size as `(width, height)`
    fn content_size(&self) -> (f64, f64);

    /// Topmost child under a content-space point
    fn child_at(&self, x: f64, y: f64) -> Option<RegionId>;

    /// Content-space position of a child's top-left corner, or None if
    /// the child is not part of this surface
    fn child_position(&self, child: RegionId) -> Option<(f64, f64)>;
}

/// A rectangle positioned relative to its parent
#[derive(Clone, Debug, PartialEq)]
pub struct Region {
    pub x: f64,
    pub y: f64,
    pub width: f64,
    pub height: f64,
    pub visible: bool,
    /// Leaves only receive hits when they accept events
    pub accepts_events: bool,
    parent: Option<RegionId>,
    children: SmallVec<[RegionId; 4]>,
}

impl Region {
    fn new(x: f64, y: f64, width: f64, height: f64, parent: Option<RegionId>) -> Self {
        Self {
            x,
            y,
            width,
            height,
            visible: true,
            accepts_events: true,
            parent,
            children: SmallVec::new(),
        }
    }

    pub fn parent(&self) -> Option<RegionId> {
        self.parent
    }

    pub fn children(&self) -> &[RegionId] {
        &self.children
    }

    fn contains(&self, x: f64, y: f64) -> bool {
        x >= 0.0 && y >= 0.0 && x < self.width && y < self.height
    }
}

/// Tree of nested regions rooted at the content rectangle
#[derive(Clone, Debug)]
pub struct RegionTree {
    regions: SlotMap<RegionId, Region>,
    root: RegionId,
}

impl RegionTree {
    /// Create a tree whose root covers `width` x `height` of content
    pub fn new(width: f64, height: f64) -> Self {
        let mut regions = SlotMap::with_key();
        let root = regions.insert(Region::new(0.0, 0.0, width, height, None));
        Self { regions, root }
    }

    pub fn root(&self) -> RegionId {
        self.root
    }

    pub fn region(&self, id: RegionId) -> Option<&Region> {
        self.regions.get(id)
    }

    pub fn region_mut(&mut self, id: RegionId) -> Option<&mut Region> {
        self.regions.get_mut(id)
    }

    pub fn len(&self) -> usize {
        self.regions.len()
    }

    pub fn is_empty(&self) -> bool {
        self.regions.is_empty()
    }

    /// Resize the content rectangle
    pub fn set_content_size(&mut self, width: f64, height: f64) {
        if let Some(root) = self.regions.get_mut(self.root) {
            root.width = width;
            root.height = height;
        }
    }

    /// Add a child region. Later children sit on top of earlier ones.
    pub fn add_child(
        &mut self,
        parent: RegionId,
        x: f64,
        y: f64,
        width: f64,
        height: f64,
    ) -> Option<RegionId> {
        if !self.regions.contains_key(parent) {
            return None;
        }
        let id = self
            .regions
            .insert(Region::new(x, y, width, height, Some(parent)));
        if let Some(parent) = self.regions.get_mut(parent) {
            parent.children.push(id);
        }
        Some(id)
    }

    /// Remove a region and its subtree. The root cannot be removed.
    pub fn remove(&mut self, id: RegionId) -> bool {
        if id == self.root {
            return false;
        }
        let Some(region) = self.regions.remove(id) else {
            return false;
        };
        if let Some(parent) = region.parent.and_then(|p| self.regions.get_mut(p)) {
            parent.children.retain(|child| *child != id);
        }
        let mut stack: Vec<RegionId> = region.children.into_iter().collect();
        while let Some(next) = stack.pop() {
            if let Some(removed) = self.regions.remove(next) {
                stack.extend(removed.children);
            }
        }
        true
    }

    pub fn set_visible(&mut self, id: RegionId, visible: bool) {
        if let Some(region) = self.regions.get_mut(id) {
            region.visible = visible;
        }
    }

    pub fn set_accepts_events(&mut self, id: RegionId, accepts: bool) {
        if let Some(region) = self.regions.get_mut(id) {
            region.accepts_events = accepts;
        }
    }

    /// Content-space position of a region's top-left corner
    pub fn absolute_position(&self, id: RegionId) -> Option<(f64, f64)> {
        let mut region = self.regions.get(id)?;
        let (mut x, mut y) = (0.0, 0.0);
        while let Some(parent) = region.parent {
            x += region.x;
            y += region.y;
            region = self.regions.get(parent)?;
        }
        Some((x, y))
    }

    /// Deepest region under a content-space point, with the point in that
    /// region's local coordinates.
    ///
    /// A region with children yields its deepest hit, or itself when the
    /// hit child has no hit of its own. A leaf is only hit when it accepts
    /// events. Later siblings win over earlier ones.
    pub fn topmost_at(&self, x: f64, y: f64) -> Option<(RegionId, f64, f64)> {
        self.topmost_in(self.root, x, y)
    }

    fn topmost_in(&self, id: RegionId, x: f64, y: f64) -> Option<(RegionId, f64, f64)> {
        let region = self.regions.get(id)?;
        if !region.contains(x, y) {
            return None;
        }
        if region.children.is_empty() {
            return Some((id, x, y));
        }

        let mut selected = None;
        for &child_id in &region.children {
            let Some(child) = self.regions.get(child_id) else {
                continue;
            };
            let (cx, cy) = (x - child.x, y - child.y);
            if !child.visible || !child.contains(cx, cy) {
                continue;
            }
            if !child.children.is_empty() {
                selected = self
                    .topmost_in(child_id, cx, cy)
                    .or(Some((child_id, cx, cy)));
            } else if child.accepts_events {
                selected = Some((child_id, cx, cy));
            }
        }
        selected
    }
}

impl ScrollableSurface for RegionTree {
    fn content_size(&self) -> (f64, f64) {
        self.regions
            .get(self.root)
            .map(|root| (root.width, root.height))
            .unwrap_or((0.0, 0.0))
    }

    fn child_at(&self, x: f64, y: f64) -> Option<RegionId> {
        self.topmost_at(x, y).map(|(id, _, _)| id)
    }

    fn child_position(&self, child: RegionId) -> Option<(f64, f64)> {
        self.absolute_position(child)
    }
}
