use crate::rtree::point::Point;
use crate::rtree::rectangle::Rectangle;
use derive_more::Display;
use serde::{Deserialize, Serialize};

/// 节点在树的节点池中的稳定编号
///
/// 父子关系都通过编号表示，父指针只是结构关系，不参与所有权管理。
#[derive(Debug, Display, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[display(fmt = "#{}", _0)]
pub struct NodeId(pub(crate) usize);

impl NodeId {
    pub fn index(&self) -> usize {
        self.0
    }
}

/// R*-tree节点类型
///
/// 节点类型在创建时确定，之后不会改变
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum NodeType {
    /// 叶子节点：包含用户插入的点
    Leaf,
    /// 索引节点：包含指向子节点的条目
    Index,
}

/// R*-tree节点条目
///
/// 每个条目都包含一个MBR和对应的内容：
/// - Data条目：存储一个点，MBR为点的退化矩形，只出现在叶子节点中
/// - Node条目：引用一个子节点，MBR恒等于子节点当前的MBR，只出现在索引节点中
#[derive(Debug, Clone, PartialEq)]
pub enum Entry {
    /// 数据条目
    Data { mbr: Rectangle, point: Point },

    /// 节点条目
    Node { mbr: Rectangle, node: NodeId },
}

impl Entry {
    /// 由点构造数据条目
    pub fn from_point(point: Point) -> Self {
        Entry::Data {
            mbr: point.bbox(),
            point,
        }
    }

    /// 由子节点及其当前MBR构造节点条目
    pub fn from_child(node: NodeId, mbr: Rectangle) -> Self {
        Entry::Node { mbr, node }
    }

    /// 获取条目的MBR
    pub fn mbr(&self) -> &Rectangle {
        match self {
            Entry::Data { mbr, .. } => mbr,
            Entry::Node { mbr, .. } => mbr,
        }
    }

    /// 获取条目的MBR（可变引用）
    ///
    /// 子节点MBR变化后用于同步父节点中的条目
    pub fn mbr_mut(&mut self) -> &mut Rectangle {
        match self {
            Entry::Data { mbr, .. } => mbr,
            Entry::Node { mbr, .. } => mbr,
        }
    }

    /// 检查是否为数据条目
    pub fn is_data(&self) -> bool {
        matches!(self, Entry::Data { .. })
    }

    /// 获取数据条目中的点（如果是数据条目）
    pub fn point(&self) -> Option<&Point> {
        match self {
            Entry::Data { point, .. } => Some(point),
            Entry::Node { .. } => None,
        }
    }

    /// 获取节点条目引用的子节点编号（如果是节点条目）
    pub fn child(&self) -> Option<NodeId> {
        match self {
            Entry::Data { .. } => None,
            Entry::Node { node, .. } => Some(*node),
        }
    }
}

/// R*-tree节点
#[derive(Debug, Clone)]
pub struct Node {
    /// 节点的最小边界矩形，恒等于所有条目MBR的并集
    ///
    /// 只有在节点暂时没有条目时为 None
    pub mbr: Option<Rectangle>,

    /// 节点包含的条目列表，顺序为插入顺序
    pub entries: Vec<Entry>,

    pub node_type: NodeType,

    /// 父节点编号，根节点为 None
    pub parent: Option<NodeId>,

    /// 节点在树中的层级，叶子节点为0
    pub level: usize,
}

impl Node {
    /// 创建新的叶子节点
    pub fn new_leaf_node() -> Self {
        Self::new(NodeType::Leaf, 0)
    }

    /// 创建新的索引节点
    ///
    /// # 参数
    /// * `level` - 节点在树中的层级，必须 > 0
    pub fn new_index_node(level: usize) -> Self {
        debug_assert!(level > 0, "index nodes live above the leaf level");
        Self::new(NodeType::Index, level)
    }

    /// 创建指定类型和层级的空节点
    pub fn new(node_type: NodeType, level: usize) -> Self {
        Node {
            mbr: None,
            entries: Vec::new(),
            node_type,
            parent: None,
            level,
        }
    }

    pub fn is_leaf_node(&self) -> bool {
        matches!(self.node_type, NodeType::Leaf)
    }

    pub fn is_index_node(&self) -> bool {
        matches!(self.node_type, NodeType::Index)
    }

    pub fn is_root(&self) -> bool {
        self.parent.is_none()
    }

    /// 根据全部条目重新计算MBR
    ///
    /// 用于结构变化之后（分裂、强制重插入移除条目）
    pub fn recalc_mbr(&mut self) {
        self.mbr = Rectangle::union_all(self.entries.iter().map(Entry::mbr));
    }

    /// 增量扩展MBR以包含新的矩形
    pub fn expand_mbr(&mut self, rect: &Rectangle) {
        match &mut self.mbr {
            Some(mbr) => mbr.expand_to_include(rect),
            None => self.mbr = Some(*rect),
        }
    }

    /// 追加条目并增量更新MBR
    ///
    /// 调用者需要确保条目类型与节点类型匹配
    pub fn push_entry(&mut self, entry: Entry) {
        self.expand_mbr(entry.mbr());
        self.entries.push(entry);
    }

    /// 检查节点是否超过最大条目数
    pub fn is_overflowing(&self, max_entries: usize) -> bool {
        self.entries.len() > max_entries
    }

    /// 检查节点是否需要更多条目
    pub fn needs_more_entries(&self, min_entries: usize) -> bool {
        self.entries.len() < min_entries
    }

    /// 查找引用指定子节点的条目
    pub fn entry_for_child_mut(&mut self, child: NodeId) -> Option<&mut Entry> {
        self.entries
            .iter_mut()
            .find(|entry| entry.child() == Some(child))
    }

    /// 遍历所有子节点编号（叶子节点为空）
    pub fn child_ids(&self) -> impl Iterator<Item = NodeId> + '_ {
        self.entries.iter().filter_map(Entry::child)
    }
}
