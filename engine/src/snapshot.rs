//! 对局存档格式
//!
//! 支持 JSON 格式的对局保存与恢复

use serde::{Deserialize, Serialize};

use crate::error::Result;
use crate::tile::TileSnapshot;

/// 棋盘存档
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GridSnapshot {
    /// 棋盘边长
    pub size: usize,
    /// size*size 个格子，索引为 x * size + y
    pub cells: Vec<Option<TileSnapshot>>,
}

/// 对局存档
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GameSnapshot {
    /// 棋盘
    pub grid: GridSnapshot,
    /// 当前得分
    pub score: u32,
    /// 是否已无路可走
    pub over: bool,
    /// 是否已合成过目标方块
    pub won: bool,
    /// 达成目标后是否继续
    pub keep_playing: bool,
}

impl GameSnapshot {
    /// 序列化为 JSON 字符串
    pub fn to_json(&self) -> Result<String> {
        Ok(serde_json::to_string(self)?)
    }

    /// 从 JSON 字符串解析
    pub fn from_json(json: &str) -> Result<GameSnapshot> {
        Ok(serde_json::from_str(json)?)
    }
}
