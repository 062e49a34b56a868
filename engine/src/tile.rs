//! 方块与位置定义

use serde::{Deserialize, Serialize};

/// 棋盘位置
///
/// x 为列（向右增大），y 为行（向下增大）。棋盘边长由 `Grid` 决定，
/// 上边界检查在 `Grid::within_bounds` 中完成。
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Position {
    /// 列
    pub x: u8,
    /// 行
    pub y: u8,
}

impl Position {
    /// 创建新位置
    pub const fn new(x: u8, y: u8) -> Self {
        Self { x, y }
    }

    /// 获取偏移后的位置，坐标为负时返回 None
    pub fn offset(&self, dx: i8, dy: i8) -> Option<Position> {
        let new_x = self.x as i16 + dx as i16;
        let new_y = self.y as i16 + dy as i16;
        if new_x >= 0 && new_y >= 0 {
            Some(Position {
                x: new_x as u8,
                y: new_y as u8,
            })
        } else {
            None
        }
    }
}

impl std::fmt::Display for Position {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "({}, {})", self.x, self.y)
    }
}

/// 数字方块
///
/// `previous_position` 与 `merged_from` 是单次移动内的过程信息：前者记录
/// 移动前的位置，后者记录本次移动中合并掉的两个来源方块。`merged_from`
/// 同时充当"每次移动每块至多合并一次"的标记，每次移动开始时清空。
#[derive(Debug, Clone)]
pub struct Tile {
    /// 当前位置
    pub position: Position,
    /// 数值，2 的幂且 >= 2
    pub value: u32,
    /// 本次移动前的位置
    pub previous_position: Option<Position>,
    /// 本次移动中合并的两个来源方块
    pub merged_from: Option<Box<(Tile, Tile)>>,
}

impl Tile {
    /// 创建新方块
    pub fn new(position: Position, value: u32) -> Self {
        Self {
            position,
            value,
            previous_position: None,
            merged_from: None,
        }
    }

    /// 记录当前位置为移动前位置
    pub fn save_position(&mut self) {
        self.previous_position = Some(self.position);
    }

    /// 更新位置
    pub fn update_position(&mut self, position: Position) {
        self.position = position;
    }

    /// 转换为存档形式（丢弃过程信息）
    pub fn to_snapshot(&self) -> TileSnapshot {
        TileSnapshot {
            position: [self.position.x, self.position.y],
            value: self.value,
        }
    }
}

/// 方块的存档形式
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct TileSnapshot {
    /// 位置 [x, y]
    pub position: [u8; 2],
    /// 数值
    pub value: u32,
}

impl TileSnapshot {
    /// 还原为方块
    pub fn to_tile(&self) -> Tile {
        Tile::new(Position::new(self.position[0], self.position[1]), self.value)
    }
}
