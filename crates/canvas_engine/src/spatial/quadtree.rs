//! Quadtree spatial partitioning structure
//!
//! Divides a 2D area into quadrants for broad-phase collision queries. A
//! leaf splits into four children once it holds more than `max_objects`
//! entries and the depth limit allows. Entries spanning a midpoint are
//! stored in every quadrant they touch.

use crate::core::config::QuadtreeConfig;
use crate::foundation::math::Rect;
use crate::object::{Bounded, ObjectId};

/// Entry stored in the quadtree
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct QuadtreeEntry {
    /// Object the bounds belong to
    pub id: ObjectId,
    /// World-space bounds at insertion time
    pub bounds: Rect,
}

/// Single node in the quadtree hierarchy
#[derive(Debug, Clone)]
pub struct QuadtreeNode {
    /// Area covered by this node
    pub bounds: Rect,

    /// Entries held by this node (if leaf)
    pub entries: Vec<QuadtreeEntry>,

    /// Child quadrants, `None` if this is a leaf
    pub children: Option<Box<[QuadtreeNode; 4]>>,

    /// Depth in the tree (0 = root)
    pub depth: u32,
}

impl QuadtreeNode {
    /// Create a new leaf node
    pub fn new(bounds: Rect, depth: u32) -> Self {
        Self {
            bounds,
            entries: Vec::new(),
            children: None,
            depth,
        }
    }

    /// Check if this node is a leaf (has no children)
    pub fn is_leaf(&self) -> bool {
        self.children.is_none()
    }

    /// Quadrants a rectangle touches.
    ///
    /// Layout:
    /// 0: top-left, 1: top-right, 2: bottom-left, 3: bottom-right
    fn quadrants(&self, rect: &Rect) -> impl Iterator<Item = usize> {
        let mid_x = self.bounds.x + self.bounds.width / 2.0;
        let mid_y = self.bounds.y + self.bounds.height / 2.0;

        let top = rect.y < mid_y;
        let bottom = rect.y + rect.height >= mid_y;
        let left = rect.x < mid_x;
        let right = rect.x + rect.width >= mid_x;

        [left && top, right && top, left && bottom, right && bottom]
            .into_iter()
            .enumerate()
            .filter_map(|(index, touched)| touched.then_some(index))
    }

    /// Split this node into four children and redistribute its entries
    fn subdivide(&mut self, config: &QuadtreeConfig) {
        if self.children.is_some() {
            return;
        }

        let half_width = self.bounds.width / 2.0;
        let half_height = self.bounds.height / 2.0;
        let (x, y, depth) = (self.bounds.x, self.bounds.y, self.depth + 1);

        self.children = Some(Box::new([
            QuadtreeNode::new(Rect::new(x, y, half_width, half_height), depth),
            QuadtreeNode::new(Rect::new(x + half_width, y, half_width, half_height), depth),
            QuadtreeNode::new(Rect::new(x, y + half_height, half_width, half_height), depth),
            QuadtreeNode::new(Rect::new(x + half_width, y + half_height, half_width, half_height), depth),
        ]));
        log::debug!("Quadtree node at depth {} split", self.depth);

        for entry in std::mem::take(&mut self.entries) {
            self.insert(entry, config);
        }
    }

    /// Insert an entry into this node
    pub fn insert(&mut self, entry: QuadtreeEntry, config: &QuadtreeConfig) {
        let quadrants: Vec<usize> = self.quadrants(&entry.bounds).collect();

        if let Some(children) = self.children.as_mut() {
            for index in quadrants {
                children[index].insert(entry, config);
            }
            return;
        }

        self.entries.push(entry);
        if self.entries.len() > config.max_objects && self.depth < config.max_depth {
            self.subdivide(config);
        }
    }

    /// Collect entries of every leaf the rectangle touches
    pub fn query(&self, rect: &Rect, results: &mut Vec<QuadtreeEntry>) {
        match &self.children {
            Some(children) => {
                for index in self.quadrants(rect) {
                    children[index].query(rect, results);
                }
            }
            None => results.extend_from_slice(&self.entries),
        }
    }

    /// Count entries in this node and all children; straddling entries
    /// count once per quadrant
    pub fn count_entries(&self) -> usize {
        let own = self.entries.len();
        match &self.children {
            Some(children) => own + children.iter().map(QuadtreeNode::count_entries).sum::<usize>(),
            None => own,
        }
    }
}

/// Quadtree spatial partitioning structure
#[derive(Debug, Clone)]
pub struct Quadtree {
    /// Root node covering the whole area
    pub root: QuadtreeNode,

    config: QuadtreeConfig,

    /// Distinct objects added since the last clear
    len: usize,
}

impl Quadtree {
    /// Create a new quadtree over `bounds`
    pub fn new(bounds: Rect, config: QuadtreeConfig) -> Self {
        Self {
            root: QuadtreeNode::new(bounds, 0),
            config,
            len: 0,
        }
    }

    /// Area covered by the tree
    pub fn bounds(&self) -> Rect {
        self.root.bounds
    }

    /// Add an object at its current bounds
    pub fn add(&mut self, object: &impl Bounded) {
        let entry = QuadtreeEntry {
            id: object.object_id(),
            bounds: object.world_rect(),
        };
        self.root.insert(entry, &self.config);
        self.len += 1;
    }

    /// Add every object yielded by `objects`
    pub fn extend<'a, B: Bounded + 'a>(&mut self, objects: impl IntoIterator<Item = &'a B>) {
        for object in objects {
            self.add(object);
        }
    }

    /// Objects sharing a node with `object`, excluding `object` itself
    pub fn get(&self, object: &impl Bounded) -> Vec<ObjectId> {
        let own = object.object_id();
        self.query_rect(&object.world_rect())
            .into_iter()
            .filter(|id| *id != own)
            .collect()
    }

    /// Objects sharing a node with `rect`, each reported once
    pub fn query_rect(&self, rect: &Rect) -> Vec<ObjectId> {
        let mut entries = Vec::new();
        self.root.query(rect, &mut entries);

        let mut ids: Vec<ObjectId> = Vec::with_capacity(entries.len());
        for entry in entries {
            if !ids.contains(&entry.id) {
                ids.push(entry.id);
            }
        }
        ids
    }

    /// Remove every entry and collapse back to a single leaf
    pub fn clear(&mut self) {
        self.root = QuadtreeNode::new(self.root.bounds, 0);
        self.len = 0;
    }

    /// Number of objects added since the last clear
    pub fn len(&self) -> usize {
        self.len
    }

    /// Whether the tree holds no objects
    pub fn is_empty(&self) -> bool {
        self.len == 0
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::object::{Capabilities, Composer, GameObject, ObjectProps};

    fn object_at(x: f32, y: f32, size: f32) -> GameObject {
        Composer::new(Capabilities::RECT).build(ObjectProps::new().with_position(x, y).with_size(size, size))
    }

    fn tree(max_objects: usize) -> Quadtree {
        Quadtree::new(
            Rect::new(0.0, 0.0, 100.0, 100.0),
            QuadtreeConfig { max_depth: 3, max_objects },
        )
    }

    #[test]
    fn test_leaf_returns_everything_before_split() {
        let mut tree = tree(25);
        let a = object_at(10.0, 10.0, 5.0);
        let b = object_at(90.0, 90.0, 5.0);
        tree.add(&a);
        tree.add(&b);

        assert!(tree.root.is_leaf());
        assert_eq!(tree.get(&a), vec![b.id()]);
        assert_eq!(tree.len(), 2);
    }

    #[test]
    fn test_split_separates_quadrants() {
        let mut tree = tree(2);
        let top_left = object_at(5.0, 5.0, 5.0);
        let top_right = object_at(80.0, 5.0, 5.0);
        let bottom_left = object_at(5.0, 80.0, 5.0);
        let bottom_right = object_at(80.0, 80.0, 5.0);
        tree.extend([&top_left, &top_right, &bottom_left, &bottom_right]);

        assert!(!tree.root.is_leaf());
        assert!(tree.get(&top_left).is_empty());
        assert_eq!(tree.query_rect(&Rect::new(60.0, 60.0, 10.0, 10.0)), vec![bottom_right.id()]);
    }

    #[test]
    fn test_straddling_entry_lives_in_every_touched_quadrant() {
        let mut tree = tree(2);
        let center = object_at(45.0, 45.0, 10.0);
        let corner = object_at(5.0, 5.0, 5.0);
        let other = object_at(80.0, 80.0, 5.0);
        tree.extend([&center, &corner, &other]);

        assert_eq!(tree.root.count_entries(), 6);
        assert_eq!(tree.get(&corner), vec![center.id()]);
        assert_eq!(tree.get(&other), vec![center.id()]);
        assert_eq!(tree.get(&center).len(), 2);
    }

    #[test]
    fn test_mirrored_object_survives_split() {
        let mut tree = tree(1);
        let flipped = Composer::new(Capabilities::RECT | Capabilities::SCALE).build(
            ObjectProps::new()
                .with_position(70.0, 10.0)
                .with_size(30.0, 10.0)
                .with_scale(-1.0, 1.0),
        );
        let bottom_left = object_at(5.0, 80.0, 5.0);
        let bottom_right = object_at(80.0, 80.0, 5.0);
        tree.extend([&flipped, &bottom_left, &bottom_right]);

        assert!(!tree.root.is_leaf());
        assert_eq!(tree.root.count_entries(), 4);
        assert_eq!(tree.query_rect(&Rect::new(45.0, 12.0, 2.0, 2.0)), vec![flipped.id()]);
        assert_eq!(tree.query_rect(&Rect::new(60.0, 12.0, 2.0, 2.0)), vec![flipped.id()]);
    }

    #[test]
    fn test_depth_limit_stops_splitting() {
        let mut tree = Quadtree::new(
            Rect::new(0.0, 0.0, 100.0, 100.0),
            QuadtreeConfig { max_depth: 1, max_objects: 1 },
        );
        let objects: Vec<_> = (0..5).map(|i| object_at(1.0 + i as f32, 1.0, 1.0)).collect();
        tree.extend(&objects);

        let top_left = &tree.root.children.as_ref().unwrap()[0];
        assert!(top_left.is_leaf());
        assert_eq!(top_left.entries.len(), 5);
    }

    #[test]
    fn test_clear_resets_to_leaf() {
        let mut tree = tree(1);
        tree.extend([&object_at(5.0, 5.0, 1.0), &object_at(70.0, 70.0, 1.0)]);

        tree.clear();

        assert!(tree.root.is_leaf());
        assert!(tree.is_empty());
        assert_eq!(tree.bounds(), Rect::new(0.0, 0.0, 100.0, 100.0));
    }
}
