use crate::rtree::node::{Entry, NodeId};
use crate::rtree::rectangle::Rectangle;
use crate::rtree::rtree::RStarTree;
use std::fmt::Write;

/// 树结构不变量被破坏的情况
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum InvariantViolation {
    #[error("node {node} holds {count} entries, outside [{min}, {max}]")]
    Fanout {
        node: NodeId,
        count: usize,
        min: usize,
        max: usize,
    },

    #[error("node {node} records parent {recorded:?} but is referenced by {actual:?}")]
    Parent {
        node: NodeId,
        recorded: Option<NodeId>,
        actual: Option<NodeId>,
    },

    #[error("entry for node {child} has bounds {entry} but the child is bounded by {actual:?}")]
    StaleEntry {
        child: NodeId,
        entry: Rectangle,
        actual: Option<Rectangle>,
    },

    #[error("node {node} caches bounds {cached:?} but its entries span {actual:?}")]
    StaleNode {
        node: NodeId,
        cached: Option<Rectangle>,
        actual: Option<Rectangle>,
    },

    #[error("data entry for point {id} has bounds {entry}")]
    StalePoint { id: u64, entry: Rectangle },

    #[error("node {node} mixes entry kinds with its node type")]
    EntryKind { node: NodeId },

    #[error("leaf {node} sits at depth {depth} but other leaves sit at depth {expected}")]
    Unbalanced {
        node: NodeId,
        depth: usize,
        expected: usize,
    },

    #[error("tree reports {expected} points but {found} are reachable")]
    Count { expected: usize, found: usize },
}

/// R*-tree调试功能实现
impl RStarTree {
    /// 校验整棵树的结构不变量
    ///
    /// 检查条目数范围、父指针、MBR精确性、条目类型、叶子深度一致和点数
    pub fn validate(&self) -> Result<(), InvariantViolation> {
        let mut leaf_depth = None;
        let mut found = 0;
        self.validate_node(self.root_id(), None, 0, &mut leaf_depth, &mut found)?;

        if found != self.len() {
            return Err(InvariantViolation::Count {
                expected: self.len(),
                found,
            });
        }
        Ok(())
    }

    fn validate_node(
        &self,
        id: NodeId,
        parent: Option<NodeId>,
        depth: usize,
        leaf_depth: &mut Option<usize>,
        found: &mut usize,
    ) -> Result<(), InvariantViolation> {
        let node = self.node(id);

        if node.parent != parent {
            return Err(InvariantViolation::Parent {
                node: id,
                recorded: node.parent,
                actual: parent,
            });
        }

        let count = node.entries.len();
        if parent.is_some()
            && (node.needs_more_entries(self.min_entries()) || node.is_overflowing(self.max_entries()))
        {
            return Err(InvariantViolation::Fanout {
                node: id,
                count,
                min: self.min_entries(),
                max: self.max_entries(),
            });
        }

        let actual = Rectangle::union_all(node.entries.iter().map(Entry::mbr));
        if node.mbr != actual {
            return Err(InvariantViolation::StaleNode {
                node: id,
                cached: node.mbr,
                actual,
            });
        }

        if node.is_leaf_node() {
            match leaf_depth {
                Some(expected) if *expected != depth => {
                    return Err(InvariantViolation::Unbalanced {
                        node: id,
                        depth,
                        expected: *expected,
                    });
                }
                Some(_) => {}
                None => *leaf_depth = Some(depth),
            }
        }

        for entry in &node.entries {
            match entry {
                Entry::Data { mbr, point } => {
                    if !node.is_leaf_node() {
                        return Err(InvariantViolation::EntryKind { node: id });
                    }
                    if *mbr != point.bbox() {
                        return Err(InvariantViolation::StalePoint {
                            id: point.id,
                            entry: *mbr,
                        });
                    }
                    *found += 1;
                }
                Entry::Node { mbr, node: child } => {
                    if node.is_leaf_node() {
                        return Err(InvariantViolation::EntryKind { node: id });
                    }
                    let child_mbr = self.node(*child).mbr;
                    if child_mbr != Some(*mbr) {
                        return Err(InvariantViolation::StaleEntry {
                            child: *child,
                            entry: *mbr,
                            actual: child_mbr,
                        });
                    }
                    self.validate_node(*child, Some(id), depth + 1, leaf_depth, found)?;
                }
            }
        }

        Ok(())
    }

    /// 生成树结构的文本表示用于调试
    ///
    /// 逐层列出节点类型、层级、MBR和条目
    pub fn dump_structure(&self) -> String {
        let mut out = String::new();
        let _ = writeln!(out, "=== R*-tree Structure ({} points) ===", self.len());
        self.dump_node(self.root_id(), 0, &mut out);
        out.push_str("=== End ===\n");
        out
    }

    fn dump_node(&self, id: NodeId, depth: usize, out: &mut String) {
        let node = self.node(id);
        let indent = "  ".repeat(depth);
        let mbr = node
            .mbr
            .map_or_else(|| "<empty>".to_string(), |mbr| mbr.to_string());
        let _ = writeln!(
            out,
            "{}Node{} (level={}, type={:?}, mbr={}, {} entries):",
            indent,
            id,
            node.level,
            node.node_type,
            mbr,
            node.entries.len()
        );

        for (i, entry) in node.entries.iter().enumerate() {
            match entry {
                Entry::Data { point, .. } => {
                    let _ = writeln!(out, "{}  [{}] {}", indent, i, point);
                }
                Entry::Node { node: child, .. } => self.dump_node(*child, depth + 1, out),
            }
        }
    }
}
