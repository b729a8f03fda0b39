use crate::rtree::node::{Entry, Node, NodeId};
use crate::rtree::rectangle::Rectangle;
use crate::rtree::rtree::RStarTree;

/// 面积在分裂评分中的权重，重叠面积的权重为1
const AREA_WEIGHT: f64 = 0.1;

/// 分裂轴
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum Axis {
    X,
    Y,
}

impl Axis {
    fn index(self) -> usize {
        match self {
            Axis::X => 0,
            Axis::Y => 1,
        }
    }
}

/// 节点分裂算法
impl RStarTree {
    /// 分裂溢出节点
    ///
    /// 原节点保留第一组条目，返回承载第二组条目的新兄弟节点。
    /// 两个节点的MBR都从各自条目重算，被移动的子节点改挂到新的父节点。
    pub(crate) fn split(&mut self, node_id: NodeId) -> NodeId {
        let min_entries = self.min_entries();
        let node = self.node_mut(node_id);

        let mut entries = std::mem::take(&mut node.entries);
        let axis = choose_split_axis(&entries);
        let i = axis.index();
        entries.sort_by(|a, b| a.mbr().min[i].total_cmp(&b.mbr().min[i]));

        let split_at = find_best_split_index(&entries, min_entries);
        let group2 = entries.split_off(split_at);

        node.entries = entries;
        node.recalc_mbr();

        let mut sibling = Node::new(node.node_type, node.level);
        sibling.parent = node.parent;
        sibling.entries = group2;
        sibling.recalc_mbr();

        let sibling_id = self.alloc_node(sibling);
        self.adopt_children(node_id);
        self.adopt_children(sibling_id);

        sibling_id
    }

    /// 把节点条目引用的所有子节点的父指针指向该节点
    fn adopt_children(&mut self, parent: NodeId) {
        let children: Vec<NodeId> = self.node(parent).child_ids().collect();
        for child in children {
            self.node_mut(child).parent = Some(parent);
        }
    }
}

/// 选择分裂轴 - 条目在哪个轴上跨度更大就沿哪个轴分裂，相同时取X轴
pub(crate) fn choose_split_axis(entries: &[Entry]) -> Axis {
    match Rectangle::union_all(entries.iter().map(Entry::mbr)) {
        Some(mbr) if mbr.width() < mbr.height() => Axis::Y,
        _ => Axis::X,
    }
}

/// 在已排序的条目上寻找最佳分裂位置
///
/// 候选位置 i 把条目分为前 i 个和剩余部分，范围为
/// `[max(1, n/4), n - max(1, n/4)]` 与 `[m, n - m]` 的交集。
/// 评分为 `overlap + 0.1 * (area1 + area2)`，取最小值，相同时取先出现者。
pub(crate) fn find_best_split_index(sorted: &[Entry], min_entries: usize) -> usize {
    let size = sorted.len();
    let quarter = (size / 4).max(1);
    let lower = quarter.max(min_entries);
    let upper = size.saturating_sub(quarter).min(size.saturating_sub(min_entries));
    if lower > upper {
        return size / 2;
    }

    // prefix[i] 为前 i 个条目的MBR，suffix[i] 为从 i 开始的条目的MBR
    let mut prefix: Vec<Option<Rectangle>> = Vec::with_capacity(size + 1);
    prefix.push(None);
    for entry in sorted {
        let mbr = match prefix.last().copied().flatten() {
            Some(acc) => acc.union(entry.mbr()),
            None => *entry.mbr(),
        };
        prefix.push(Some(mbr));
    }

    let mut suffix: Vec<Option<Rectangle>> = vec![None; size + 1];
    for (i, entry) in sorted.iter().enumerate().rev() {
        suffix[i] = Some(match suffix[i + 1] {
            Some(acc) => acc.union(entry.mbr()),
            None => *entry.mbr(),
        });
    }

    let mut best_index = lower;
    let mut best_score = f64::INFINITY;

    for i in lower..=upper {
        let (Some(mbr1), Some(mbr2)) = (prefix[i], suffix[i]) else {
            continue;
        };
        let score = mbr1.overlap(&mbr2) + AREA_WEIGHT * (mbr1.area() + mbr2.area());

        if score < best_score {
            best_score = score;
            best_index = i;
        }
    }

    best_index
}
