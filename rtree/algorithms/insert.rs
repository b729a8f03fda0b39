use crate::rtree::algorithms::overflow::OverflowPolicy;
use crate::rtree::node::{Entry, NodeId};
use crate::rtree::point::Point;
use crate::rtree::rectangle::Rectangle;
use crate::rtree::rtree::RStarTree;

/// 插入操作相关算法
impl RStarTree {
    /// 插入一个点
    ///
    /// 点被包装为数据条目，自顶向下选择叶子节点后追加；
    /// 叶子节点溢出时先尝试强制重插入，再分裂
    pub fn insert(&mut self, point: Point) {
        self.insert_entry(Entry::from_point(point), OverflowPolicy::Reinsert);
        self.record_insert();
    }

    /// 从根节点开始插入条目
    ///
    /// 强制重插入过程中使用 `OverflowPolicy::SplitOnly`，保证不会嵌套重插入
    pub(crate) fn insert_entry(&mut self, entry: Entry, policy: OverflowPolicy) {
        let rect = *entry.mbr();

        // 选择叶子节点
        let leaf = self.choose_leaf(&rect);

        // 添加记录到叶子节点，并沿路径增量扩展MBR
        let max_entries = self.max_entries();
        let leaf_node = self.node_mut(leaf);
        leaf_node.push_entry(entry);
        let overflowing = leaf_node.is_overflowing(max_entries);
        self.expand_tree_upward(leaf, &rect);

        if overflowing {
            self.handle_overflow(leaf, policy);
        }
    }

    /// 选择叶子节点 - 逐层选择扩大面积最小的子树
    pub(crate) fn choose_leaf(&self, rect: &Rectangle) -> NodeId {
        let mut current = self.root_id();

        loop {
            let node = self.node(current);
            if node.is_leaf_node() {
                return current;
            }

            let best_index = choose_subtree(&node.entries, rect);
            current = match node.entries.get(best_index).and_then(Entry::child) {
                Some(child) => child,
                None => panic!("index node {} has no child entry to descend into", current),
            };
        }
    }
}

/// 选择子树 - 扩大面积最小者优先，其次面积最小，再相同时取先出现的条目
pub(crate) fn choose_subtree(entries: &[Entry], rect: &Rectangle) -> usize {
    let mut best_index = 0;
    let mut min_enlargement = f64::INFINITY;
    let mut min_area = f64::INFINITY;

    for (i, entry) in entries.iter().enumerate() {
        let mbr = entry.mbr();
        let enlargement = mbr.enlargement(rect);
        let area = mbr.area();

        if enlargement < min_enlargement || (enlargement == min_enlargement && area < min_area) {
            min_enlargement = enlargement;
            min_area = area;
            best_index = i;
        }
    }

    best_index
}
