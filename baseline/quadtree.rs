use crate::baseline::SpatialIndex;
use crate::rtree::{Point, Rectangle};
use tracing::trace;

/// 每个象限在分裂前最多容纳的点数
pub const CAPACITY: usize = 8;

/// 最大细分深度，达到后象限不再分裂
pub const MAX_DEPTH: usize = 12;

/// 区域四叉树
///
/// 覆盖固定边界，边界外的点会被忽略
#[derive(Debug, Clone)]
pub struct QuadTree {
    root: Quadrant,
    size: usize,
}

#[derive(Debug, Clone)]
struct Quadrant {
    boundary: Rectangle,
    points: Vec<Point>,
    /// 按 NW, NE, SW, SE 顺序排列的子象限
    children: Option<Box<[Quadrant; 4]>>,
    depth: usize,
}

impl QuadTree {
    pub fn new(boundary: Rectangle) -> Self {
        QuadTree {
            root: Quadrant::new(boundary, 0),
            size: 0,
        }
    }

    pub fn boundary(&self) -> &Rectangle {
        &self.root.boundary
    }
}

impl SpatialIndex for QuadTree {
    fn name(&self) -> &'static str {
        "quadtree"
    }

    fn insert(&mut self, point: Point) {
        if self.root.insert(point) {
            self.size += 1;
        } else {
            trace!("{} lies outside quadtree boundary {}, ignored", point, self.root.boundary);
        }
    }

    fn range_query(&self, query: &Rectangle) -> Vec<Point> {
        let mut found = Vec::new();
        self.root.range_query(query, &mut found);
        found
    }

    fn len(&self) -> usize {
        self.size
    }
}

impl Quadrant {
    fn new(boundary: Rectangle, depth: usize) -> Self {
        Quadrant {
            boundary,
            points: Vec::new(),
            children: None,
            depth,
        }
    }

    /// 插入点，点不在边界内时返回 false
    fn insert(&mut self, point: Point) -> bool {
        if !point.within(&self.boundary) {
            return false;
        }

        if self.children.is_none() && (self.points.len() < CAPACITY || self.depth >= MAX_DEPTH) {
            self.points.push(point);
            return true;
        }

        if self.children.is_none() {
            self.subdivide();
        }

        if let Some(children) = self.children.as_mut() {
            if let Some(child) = children.iter_mut().find(|c| point.within(&c.boundary)) {
                return child.insert(point);
            }
        }

        // 子象限覆盖整个边界，正常情况下不会走到这里
        self.points.push(point);
        true
    }

    /// 按中点分为四个子象限，并把已有的点下放
    fn subdivide(&mut self) {
        let b = self.boundary;
        let [mid_x, mid_y] = b.center();
        let depth = self.depth + 1;

        self.children = Some(Box::new([
            Quadrant::new(Rectangle::new(b.min[0], mid_y, mid_x, b.max[1]), depth),
            Quadrant::new(Rectangle::new(mid_x, mid_y, b.max[0], b.max[1]), depth),
            Quadrant::new(Rectangle::new(b.min[0], b.min[1], mid_x, mid_y), depth),
            Quadrant::new(Rectangle::new(mid_x, b.min[1], b.max[0], mid_y), depth),
        ]));

        for point in std::mem::take(&mut self.points) {
            self.insert(point);
        }
    }

    fn range_query(&self, query: &Rectangle, found: &mut Vec<Point>) {
        if !self.boundary.intersects(query) {
            return;
        }

        found.extend(self.points.iter().filter(|p| p.within(query)).copied());

        if let Some(children) = &self.children {
            for child in children.iter() {
                child.range_query(query, found);
            }
        }
    }
}
