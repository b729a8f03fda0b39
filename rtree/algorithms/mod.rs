// R*-tree算法模块
//
// 这个模块包含R*-tree的所有核心算法实现，按功能分解为不同的子模块：
// - insert: 插入与子树选择
// - overflow: 溢出处理（强制重插入、分裂向上传播）
// - split: 节点分裂（分裂轴与分裂位置选择）
// - search: 范围查询
// - utils: MBR的增量扩展与完整重算
// - debug: 不变量校验和结构输出

pub mod debug;
pub mod insert;
pub mod overflow;
pub mod search;
pub mod split;
pub mod utils;
