//! 错误类型定义

use thiserror::Error;

/// 引擎错误
#[derive(Error, Debug)]
pub enum EngineError {
    /// 无效的方向编号
    #[error("Invalid direction index: {index}")]
    InvalidDirection { index: usize },

    /// 位置超出棋盘范围
    #[error("Position ({x}, {y}) out of bounds for size {size}")]
    InvalidPosition { x: u8, y: u8, size: usize },

    /// 无效的存档数据
    #[error("Invalid snapshot: {reason}")]
    InvalidSnapshot { reason: String },

    /// 无效的布局字符串
    #[error("Invalid layout string: {reason}")]
    InvalidLayout { reason: String },

    /// JSON 序列化错误
    #[error("JSON serialization error: {0}")]
    Json(#[from] serde_json::Error),
}

/// 引擎操作结果类型
pub type Result<T> = std::result::Result<T, EngineError>;
