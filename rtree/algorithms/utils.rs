use crate::rtree::node::NodeId;
use crate::rtree::rectangle::Rectangle;
use crate::rtree::rtree::RStarTree;

/// R*-tree工具函数实现
///
/// 两种MBR维护方式必须配合使用：插入路径上只做增量扩展，
/// 结构变化（移除条目、分裂）之后做完整重算。
impl RStarTree {
    /// 向上增量扩展MBR
    ///
    /// 从 `start` 节点开始，把 `rect` 并入该节点及所有祖先节点的MBR，
    /// 同时同步父节点中指向当前节点的条目
    pub(crate) fn expand_tree_upward(&mut self, start: NodeId, rect: &Rectangle) {
        self.node_mut(start).expand_mbr(rect);

        let mut current = start;
        while let Some(parent) = self.node(current).parent {
            let current_mbr = self.bounds_of(current);
            let parent_node = self.node_mut(parent);

            if let Some(entry) = parent_node.entry_for_child_mut(current) {
                *entry.mbr_mut() = current_mbr;
            }
            parent_node.expand_mbr(rect);

            current = parent;
        }
    }

    /// 向上调整树 - 完整重算MBR
    ///
    /// 从给定节点向上逐层重算MBR，并同步父节点中的条目MBR，
    /// 用于节点条目被移除之后
    pub(crate) fn adjust_tree_upward(&mut self, start: NodeId) {
        self.node_mut(start).recalc_mbr();

        let mut current = start;
        while let Some(parent) = self.node(current).parent {
            let current_mbr = self.bounds_of(current);
            let parent_node = self.node_mut(parent);

            if let Some(entry) = parent_node.entry_for_child_mut(current) {
                *entry.mbr_mut() = current_mbr;
            }
            parent_node.recalc_mbr();

            current = parent;
        }
    }
}
