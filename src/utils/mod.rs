//! # 工具函数模块
//!
//! 提供美化输出与表格打印。
//!
//! ## 依赖关系
//! - 被 `commands/` 模块使用
//! - 子模块: output, table

pub mod output;
pub mod table;
