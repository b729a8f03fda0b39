use crate::rtree::node::{Entry, Node, NodeId};
use crate::rtree::rtree::RStarTree;
use tracing::{debug, trace};

/// 强制重插入的条目比例
pub const REINSERT_PCT: f64 = 0.3;

/// 溢出处理策略
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum OverflowPolicy {
    /// 非根叶子节点溢出时先尝试强制重插入
    Reinsert,
    /// 只允许分裂，用于重插入过程中和索引节点
    SplitOnly,
}

/// 计算强制重插入的条目数 k = max(1, round(0.3 * n))
pub(crate) fn reinsert_count(entry_count: usize) -> usize {
    ((entry_count as f64 * REINSERT_PCT).round() as usize).max(1)
}

/// 溢出处理 - 强制重插入与分裂
impl RStarTree {
    /// 处理节点溢出
    ///
    /// 只有条目数超过M时才生效。非根叶子节点每次溢出都会尝试强制重插入
    /// （没有"已重插入"标记），重插入引起的溢出只通过分裂解决。
    pub(crate) fn handle_overflow(&mut self, node_id: NodeId, policy: OverflowPolicy) {
        if !self.node(node_id).is_overflowing(self.max_entries()) {
            return;
        }

        if policy == OverflowPolicy::Reinsert
            && self.forced_reinsert(node_id)
            && !self.node(node_id).is_overflowing(self.max_entries())
        {
            return;
        }

        let sibling = self.split(node_id);
        self.propagate_split(node_id, sibling);
    }

    /// 强制重插入
    ///
    /// 把距离节点MBR中心最远的 k 个条目移出，重算MBR后从根节点重新插入。
    /// 返回 false 表示条件不满足，调用者应直接分裂。
    fn forced_reinsert(&mut self, node_id: NodeId) -> bool {
        let min_entries = self.min_entries();
        let node = self.node(node_id);
        if node.is_root() || !node.is_leaf_node() {
            return false;
        }

        let count = node.entries.len();
        let k = reinsert_count(count);
        if k >= count || count - k < min_entries {
            return false;
        }

        let Some(removed) = take_farthest_entries(self.node_mut(node_id), k) else {
            return false;
        };
        self.adjust_tree_upward(node_id);

        debug!(
            "forced reinsert of {} entries from leaf {} ({} remain)",
            removed.len(),
            node_id,
            count - k
        );

        for entry in removed {
            self.insert_entry(entry, OverflowPolicy::SplitOnly);
        }

        true
    }

    /// 分裂后向上传播
    ///
    /// 根节点分裂时生成新的根节点，树长高一层；否则把新兄弟节点挂到父节点，
    /// 父节点因此溢出时继续分裂（索引节点不做重插入）
    fn propagate_split(&mut self, node_id: NodeId, sibling_id: NodeId) {
        let node_mbr = self.bounds_of(node_id);
        let sibling_mbr = self.bounds_of(sibling_id);

        let Some(parent_id) = self.node(node_id).parent else {
            let level = self.node(node_id).level + 1;
            let mut new_root = Node::new_index_node(level);
            new_root.push_entry(Entry::from_child(node_id, node_mbr));
            new_root.push_entry(Entry::from_child(sibling_id, sibling_mbr));

            let root_id = self.alloc_node(new_root);
            self.node_mut(node_id).parent = Some(root_id);
            self.node_mut(sibling_id).parent = Some(root_id);
            self.set_root(root_id);

            debug!("root split, new root {} at depth {}", root_id, level + 1);
            return;
        };

        let max_entries = self.max_entries();
        let parent = self.node_mut(parent_id);
        match parent.entry_for_child_mut(node_id) {
            Some(entry) => *entry.mbr_mut() = node_mbr,
            None => panic!("node {} is missing from its parent {}", node_id, parent_id),
        }
        parent.push_entry(Entry::from_child(sibling_id, sibling_mbr));

        trace!(
            "split {} -> {} under parent {} ({} entries)",
            node_id,
            sibling_id,
            parent_id,
            parent.entries.len()
        );

        if parent.is_overflowing(max_entries) {
            self.handle_overflow(parent_id, OverflowPolicy::SplitOnly);
        }
    }
}

/// 移出距离节点MBR中心最远的 k 个条目，按距离从远到近返回
///
/// 距离相同的条目保持原有顺序
fn take_farthest_entries(node: &mut Node, k: usize) -> Option<Vec<Entry>> {
    let center = node.mbr?.center();

    let mut order: Vec<usize> = (0..node.entries.len()).collect();
    order.sort_by(|&a, &b| {
        let da = node.entries[a].mbr().center_distance(center);
        let db = node.entries[b].mbr().center_distance(center);
        db.total_cmp(&da)
    });

    let mut slots: Vec<Option<Entry>> = std::mem::take(&mut node.entries)
        .into_iter()
        .map(Some)
        .collect();
    let removed: Vec<Entry> = order[..k].iter().filter_map(|&i| slots[i].take()).collect();
    node.entries = slots.into_iter().flatten().collect();

    Some(removed)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::rtree::point::Point;
    use crate::rtree::rectangle::Rectangle;

    #[test]
    fn test_reinsert_count() {
        assert_eq!(reinsert_count(1), 1);
        assert_eq!(reinsert_count(3), 1);
        assert_eq!(reinsert_count(5), 2); // 1.5 四舍五入
        assert_eq!(reinsert_count(17), 5);
    }

    #[test]
    fn test_take_farthest_entries() {
        let mut node = Node::new_leaf_node();
        node.push_entry(Entry::from_point(Point::new(1, 5.0, 5.0)));
        node.push_entry(Entry::from_point(Point::new(2, 0.0, 0.0)));
        node.push_entry(Entry::from_point(Point::new(3, 4.0, 6.0)));
        node.push_entry(Entry::from_point(Point::new(4, 10.0, 10.0)));
        node.push_entry(Entry::from_point(Point::new(5, 6.0, 4.0)));

        let removed = take_farthest_entries(&mut node, 2).expect("non-empty node");
        let removed_ids: Vec<u64> = removed.iter().filter_map(|e| e.point()).map(|p| p.id).collect();
        // (0,0) 与 (10,10) 到中心 (5,5) 距离相同，保持原顺序
        assert_eq!(removed_ids, vec![2, 4]);

        let kept_ids: Vec<u64> = node.entries.iter().filter_map(|e| e.point()).map(|p| p.id).collect();
        assert_eq!(kept_ids, vec![1, 3, 5]);
    }

    #[test]
    fn test_take_farthest_entries_empty_node() {
        let mut node = Node::new_leaf_node();
        assert!(take_farthest_entries(&mut node, 1).is_none());
    }

    #[test]
    fn test_root_leaf_splits_without_reinsert() {
        let mut rtree = RStarTree::new(4);
        for i in 0..5 {
            rtree.insert(Point::new(i, i as f64, 0.0));
        }
        // 根叶子节点不重插入，直接分裂长高
        assert_eq!(rtree.depth(), 2);
        assert_eq!(rtree.len(), 5);
        rtree.validate().expect("tree invariants");
    }

    #[test]
    fn test_forced_reinsert_keeps_all_points() {
        let mut rtree = RStarTree::new(4);
        for i in 0..200 {
            let x = ((i * 37) % 101) as f64;
            let y = ((i * 53) % 97) as f64;
            rtree.insert(Point::new(i, x, y));
            rtree.validate().expect("tree invariants after each insert");
        }

        let mut ids: Vec<u64> = rtree.points().iter().map(|p| p.id).collect();
        ids.sort_unstable();
        assert_eq!(ids, (0..200).collect::<Vec<_>>());
    }

    #[test]
    fn test_coincident_points_split() {
        let mut rtree = RStarTree::new(4);
        for i in 0..50 {
            rtree.insert(Point::new(i, 500.0, 500.0));
        }

        assert!(rtree.depth() > 1, "capacity exceeded, the root must have split");
        rtree.validate().expect("tree invariants");

        let hits = rtree.range_query(&Rectangle::from_point(500.0, 500.0));
        assert_eq!(hits.len(), 50);
    }
}
