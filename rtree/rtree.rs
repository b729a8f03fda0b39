use crate::rtree::node::{Entry, Node, NodeId, NodeType};
use crate::rtree::point::Point;
use crate::rtree::rectangle::Rectangle;
use serde::{Deserialize, Serialize};

/// 最小允许的最大条目数M
pub const MIN_MAX_ENTRIES: usize = 4;

/// 默认的最大条目数M
pub const DEFAULT_MAX_ENTRIES: usize = 16;

/// 用于JSON序列化的简化树结构
#[derive(Debug, Serialize, Deserialize)]
pub struct TreeVisualization {
    /// 根节点
    pub root: NodeVisualization,
    /// 树的配置参数
    pub config: TreeConfig,
}

/// 用于JSON序列化的树配置
#[derive(Debug, Serialize, Deserialize)]
pub struct TreeConfig {
    pub max_entries: usize,
    pub min_entries: usize,
}

/// 用于JSON序列化的节点结构
#[derive(Debug, Serialize, Deserialize)]
pub struct NodeVisualization {
    /// 节点的最小边界矩形（空树的根节点为 null）
    pub mbr: Option<Rectangle>,
    pub node_type: NodeType,
    pub level: usize,
    /// 点（仅叶子节点）
    pub points: Vec<Point>,
    /// 子节点（仅索引节点）
    pub children: Vec<NodeVisualization>,
}

/// 树的形状统计
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct TreeStats {
    pub points: usize,
    pub nodes: usize,
    pub leaves: usize,
    pub depth: usize,
    pub max_entries: usize,
    pub min_entries: usize,
}

/// R*-tree主结构
///
/// 所有节点保存在节点池中，通过 [`NodeId`] 互相引用。树只增不减：
/// 分裂时原节点保留编号承载第一组条目，新节点承载第二组；
/// 根节点分裂时分配新的根节点。
#[derive(Debug, Clone)]
pub struct RStarTree {
    /// 节点池
    nodes: Vec<Node>,
    /// 根节点
    root: NodeId,
    /// 最大条目数M
    max_entries: usize,
    /// 最小条目数m = max(2, M/2)
    min_entries: usize,
    /// 已索引的点数
    size: usize,
}

impl RStarTree {
    /// 创建新的R*-tree
    ///
    /// `max_entries` 小于4时被调整为4
    pub fn new(max_entries: usize) -> Self {
        let max_entries = max_entries.max(MIN_MAX_ENTRIES);
        let min_entries = (max_entries / 2).max(2);

        RStarTree {
            nodes: vec![Node::new_leaf_node()],
            root: NodeId(0),
            max_entries,
            min_entries,
            size: 0,
        }
    }

    /// 检查R*-tree是否为空
    pub fn is_empty(&self) -> bool {
        self.size == 0
    }

    /// 已索引的点数
    pub fn len(&self) -> usize {
        self.size
    }

    /// 获取R*-tree的根节点MBR
    pub fn root_mbr(&self) -> Option<&Rectangle> {
        self.node(self.root).mbr.as_ref()
    }

    pub fn max_entries(&self) -> usize {
        self.max_entries
    }

    pub fn min_entries(&self) -> usize {
        self.min_entries
    }

    /// 获取树的层数，只有一个叶子根节点时为1
    pub fn depth(&self) -> usize {
        self.node(self.root).level + 1
    }

    pub fn root_id(&self) -> NodeId {
        self.root
    }

    /// 统计树的形状
    pub fn stats(&self) -> TreeStats {
        TreeStats {
            points: self.size,
            nodes: self.nodes.len(),
            leaves: self.nodes.iter().filter(|node| node.is_leaf_node()).count(),
            depth: self.depth(),
            max_entries: self.max_entries,
            min_entries: self.min_entries,
        }
    }

    /// 按编号读取节点
    pub fn node(&self, id: NodeId) -> &Node {
        &self.nodes[id.0]
    }

    pub(crate) fn node_mut(&mut self, id: NodeId) -> &mut Node {
        &mut self.nodes[id.0]
    }

    /// 将节点放入节点池并返回其编号
    pub(crate) fn alloc_node(&mut self, node: Node) -> NodeId {
        let id = NodeId(self.nodes.len());
        self.nodes.push(node);
        id
    }

    pub(crate) fn set_root(&mut self, root: NodeId) {
        self.root = root;
    }

    pub(crate) fn record_insert(&mut self) {
        self.size += 1;
    }

    /// 读取非空节点的MBR
    ///
    /// 非空是结构不变量，违反时直接 panic
    pub(crate) fn bounds_of(&self, id: NodeId) -> Rectangle {
        match self.node(id).mbr {
            Some(mbr) => mbr,
            None => panic!("node {} has no entries outside of a split", id),
        }
    }

    /// 导出树结构为JSON格式
    ///
    /// 返回包含完整树结构的JSON字符串，用于前端可视化
    pub fn export_to_json(&self) -> Result<String, serde_json::Error> {
        let visualization = TreeVisualization {
            root: self.create_node_visualization(self.root),
            config: TreeConfig {
                max_entries: self.max_entries,
                min_entries: self.min_entries,
            },
        };
        serde_json::to_string_pretty(&visualization)
    }

    /// 递归创建节点的可视化结构
    fn create_node_visualization(&self, id: NodeId) -> NodeVisualization {
        let node = self.node(id);
        let mut points = Vec::new();
        let mut children = Vec::new();

        for entry in &node.entries {
            match entry {
                Entry::Data { point, .. } => points.push(*point),
                Entry::Node { node: child, .. } => {
                    children.push(self.create_node_visualization(*child))
                }
            }
        }

        NodeVisualization {
            mbr: node.mbr,
            node_type: node.node_type,
            level: node.level,
            points,
            children,
        }
    }
}

impl Default for RStarTree {
    fn default() -> Self {
        Self::new(DEFAULT_MAX_ENTRIES)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_rtree_creation() {
        let rtree = RStarTree::new(10);
        assert_eq!(rtree.max_entries(), 10);
        assert_eq!(rtree.min_entries(), 5);
        assert!(rtree.is_empty());
        assert_eq!(rtree.depth(), 1);
        assert!(rtree.root_mbr().is_none());
    }

    #[test]
    fn test_max_entries_is_clamped() {
        let rtree = RStarTree::new(1);
        assert_eq!(rtree.max_entries(), 4);
        assert_eq!(rtree.min_entries(), 2);

        let rtree = RStarTree::new(5);
        assert_eq!(rtree.min_entries(), 2);

        let rtree = RStarTree::default();
        assert_eq!(rtree.max_entries(), 16);
        assert_eq!(rtree.min_entries(), 8);
    }

    #[test]
    fn test_rtree_insert_single() {
        let mut rtree = RStarTree::new(4);
        rtree.insert(Point::new(1, 3.0, 4.0));

        assert!(!rtree.is_empty());
        assert_eq!(rtree.len(), 1);
        assert_eq!(rtree.depth(), 1);
        assert_eq!(rtree.root_mbr(), Some(&Rectangle::from_point(3.0, 4.0)));
    }

    #[test]
    fn test_stats() {
        let mut rtree = RStarTree::new(4);
        for i in 0..40 {
            rtree.insert(Point::new(i, (i % 7) as f64, (i / 7) as f64));
        }

        let stats = rtree.stats();
        assert_eq!(stats.points, 40);
        assert!(stats.depth >= 2);
        assert!(stats.leaves >= 40 / 4);
        assert!(stats.nodes > stats.leaves);
    }

    #[test]
    fn test_json_export() {
        let mut rtree = RStarTree::new(4);
        rtree.insert(Point::new(1, 0.0, 0.0));
        rtree.insert(Point::new(2, 5.0, 5.0));
        rtree.insert(Point::new(3, 20.0, 20.0));

        let json = rtree.export_to_json().expect("Failed to export JSON");

        assert!(json.contains("\"max_entries\": 4"));
        assert!(json.contains("\"min_entries\": 2"));
        assert!(json.contains("\"id\": 1"));
        assert!(json.contains("\"id\": 3"));
    }

    #[test]
    fn test_json_export_complex_tree() {
        let mut rtree = RStarTree::new(4);
        for i in 0..30 {
            rtree.insert(Point::new(i, (i as f64) * 10.0, (i as f64) * 5.0));
        }

        let json = rtree.export_to_json().expect("Failed to export JSON");
        let parsed: TreeVisualization = serde_json::from_str(&json).expect("valid JSON");

        fn count_points(node: &NodeVisualization) -> usize {
            node.points.len() + node.children.iter().map(count_points).sum::<usize>()
        }

        assert_eq!(parsed.root.node_type, NodeType::Index);
        assert_eq!(parsed.root.level + 1, rtree.depth());
        assert_eq!(count_points(&parsed.root), 30);
    }
}
