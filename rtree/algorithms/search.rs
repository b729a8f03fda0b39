use crate::rtree::node::{Entry, NodeId};
use crate::rtree::point::Point;
use crate::rtree::rectangle::Rectangle;
use crate::rtree::rtree::RStarTree;

/// 搜索操作相关算法
impl RStarTree {
    /// 范围查询 - 返回所有坐标落在闭矩形内的点
    ///
    /// 结果顺序为遍历顺序（节点内按条目插入顺序），每个点只会出现一次
    pub fn range_query(&self, query: &Rectangle) -> Vec<Point> {
        let mut results = Vec::new();
        self.range_query_node(self.root_id(), query, &mut results);
        results
    }

    /// 返回所有已索引的点
    pub fn points(&self) -> Vec<Point> {
        let mut results = Vec::with_capacity(self.len());
        self.collect_points(self.root_id(), &mut results);
        results
    }

    /// 递归范围查询
    ///
    /// 节点MBR与查询不相交时剪枝；节点MBR完全落在查询范围内时
    /// 整棵子树直接加入结果，不再逐点检查
    fn range_query_node(&self, id: NodeId, query: &Rectangle, results: &mut Vec<Point>) {
        let node = self.node(id);
        let Some(mbr) = node.mbr else {
            return;
        };
        if !mbr.intersects(query) {
            return;
        }

        if query.contains(&mbr) {
            self.collect_points(id, results);
            return;
        }

        for entry in &node.entries {
            match entry {
                Entry::Data { point, .. } => {
                    if point.within(query) {
                        results.push(*point);
                    }
                }
                Entry::Node { mbr, node: child } => {
                    if mbr.intersects(query) {
                        self.range_query_node(*child, query, results);
                    }
                }
            }
        }
    }

    /// 收集子树中的所有点
    fn collect_points(&self, id: NodeId, results: &mut Vec<Point>) {
        for entry in &self.node(id).entries {
            match entry {
                Entry::Data { point, .. } => results.push(*point),
                Entry::Node { node: child, .. } => self.collect_points(*child, results),
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::baseline::{LinearScan, SpatialIndex};
    use proptest::prelude::*;
    use rand::rngs::StdRng;
    use rand::{Rng, SeedableRng};
    use std::collections::BTreeSet;

    fn ids(points: &[Point]) -> BTreeSet<u64> {
        points.iter().map(|p| p.id).collect()
    }

    #[test]
    fn test_range_query_empty_tree() {
        let rtree = RStarTree::new(4);
        assert!(rtree.range_query(&Rectangle::new(0.0, 0.0, 100.0, 100.0)).is_empty());
        assert!(rtree.points().is_empty());
    }

    #[test]
    fn test_range_query_small_scenario() {
        let mut rtree = RStarTree::new(4);
        let coords = [(0.0, 0.0), (10.0, 10.0), (20.0, 20.0), (30.0, 30.0), (5.0, 5.0)];
        for (i, &(x, y)) in coords.iter().enumerate() {
            rtree.insert(Point::new(i as u64, x, y));
        }

        rtree.validate().expect("tree invariants");
        let results = rtree.range_query(&Rectangle::new(0.0, 0.0, 10.0, 10.0));
        assert_eq!(ids(&results), BTreeSet::from([0, 1, 4]));
    }

    #[test]
    fn test_range_query_disjoint_and_touching() {
        let mut rtree = RStarTree::new(4);
        for i in 0..20 {
            rtree.insert(Point::new(i, i as f64, i as f64));
        }

        assert!(rtree.range_query(&Rectangle::new(50.0, 50.0, 60.0, 60.0)).is_empty());

        // 查询边界恰好经过点
        let edge = rtree.range_query(&Rectangle::new(19.0, 0.0, 25.0, 19.0));
        assert_eq!(ids(&edge), BTreeSet::from([19]));

        // 退化查询矩形
        let exact = rtree.range_query(&Rectangle::from_point(7.0, 7.0));
        assert_eq!(ids(&exact), BTreeSet::from([7]));
    }

    #[test]
    fn test_range_query_matches_linear_scan() {
        let mut rng = StdRng::seed_from_u64(42);
        let mut rtree = RStarTree::new(8);
        let mut linear = LinearScan::new();

        for i in 0..1000 {
            let point = Point::new(i, rng.gen_range(0.0..1000.0), rng.gen_range(0.0..1000.0));
            rtree.insert(point);
            linear.insert(point);
        }
        rtree.validate().expect("tree invariants");

        let query = Rectangle::new(0.0, 0.0, 100.0, 100.0);
        let first = rtree.range_query(&query);
        assert_eq!(ids(&first), ids(&linear.range_query(&query)));

        // 重复查询结果稳定
        for _ in 0..3 {
            assert_eq!(rtree.range_query(&query).len(), first.len());
        }

        for _ in 0..200 {
            let x = rng.gen_range(0.0..1000.0);
            let y = rng.gen_range(0.0..1000.0);
            let w = rng.gen_range(0.0..300.0);
            let h = rng.gen_range(0.0..300.0);
            let query = Rectangle::new(x, y, x + w, y + h);
            assert_eq!(ids(&rtree.range_query(&query)), ids(&linear.range_query(&query)));
        }
    }

    #[test]
    fn test_range_query_returns_no_duplicates() {
        let mut rtree = RStarTree::new(4);
        for i in 0..300 {
            rtree.insert(Point::new(i, (i % 17) as f64, (i % 13) as f64));
        }
        let results = rtree.range_query(&Rectangle::new(-1.0, -1.0, 100.0, 100.0));
        assert_eq!(results.len(), 300);
        assert_eq!(ids(&results).len(), 300);
    }

    fn arb_points() -> impl Strategy<Value = Vec<(f64, f64)>> {
        prop::collection::vec((0.0..100.0f64, 0.0..100.0f64), 0..300)
    }

    fn arb_query() -> impl Strategy<Value = Rectangle> {
        (0.0..100.0f64, 0.0..100.0f64, 0.0..60.0f64, 0.0..60.0f64)
            .prop_map(|(x, y, w, h)| Rectangle::new(x, y, x + w, y + h))
    }

    proptest! {
        #[test]
        fn prop_range_query_matches_ground_truth(
            coords in arb_points(),
            max_entries in 4usize..12,
            query in arb_query(),
        ) {
            let mut rtree = RStarTree::new(max_entries);
            let mut linear = LinearScan::new();
            for (i, &(x, y)) in coords.iter().enumerate() {
                let point = Point::new(i as u64, x, y);
                rtree.insert(point);
                linear.insert(point);
            }

            prop_assert!(rtree.validate().is_ok());
            prop_assert_eq!(ids(&rtree.range_query(&query)), ids(&linear.range_query(&query)));
        }

        #[test]
        fn prop_membership_is_insertion_order_independent(
            coords in arb_points(),
            query in arb_query(),
            seed in any::<u64>(),
        ) {
            use rand::seq::SliceRandom;

            let points: Vec<Point> = coords
                .iter()
                .enumerate()
                .map(|(i, &(x, y))| Point::new(i as u64, x, y))
                .collect();
            let mut shuffled = points.clone();
            shuffled.shuffle(&mut StdRng::seed_from_u64(seed));

            let mut forward = RStarTree::new(4);
            let mut permuted = RStarTree::new(4);
            for point in &points {
                forward.insert(*point);
            }
            for point in &shuffled {
                permuted.insert(*point);
            }

            prop_assert_eq!(ids(&forward.range_query(&query)), ids(&permuted.range_query(&query)));
        }
    }
}
