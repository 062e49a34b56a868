//! 游戏常量定义

/// 默认棋盘边长（4x4）
pub const GRID_SIZE: usize = 4;

/// 开局时生成的方块数量
pub const START_TILES: usize = 2;

/// 新方块取值 4 的概率（其余情况取 2）
pub const FOUR_TILE_PROBABILITY: f64 = 0.1;

/// 新方块的基础数值
pub const BASE_TILE_VALUE: u32 = 2;
