//! 棋盘布局文本格式
//!
//! 行间用 `/` 分隔，格间用空白分隔，`.` 表示空格，数字表示方块数值。
//! 行按 y 从上到下，格按 x 从左到右，行数即棋盘边长。
//!
//! 示例（4x4，左上角一对 2）：
//! `2 2 . ./. . . ./. . . ./. . . .`

use crate::error::{EngineError, Result};
use crate::grid::Grid;
use crate::tile::{Position, Tile};

/// 布局格式处理
pub struct Layout;

impl Layout {
    /// 解析布局字符串为棋盘
    pub fn parse(text: &str) -> Result<Grid> {
        if text.trim().is_empty() {
            return Err(EngineError::InvalidLayout {
                reason: "empty layout string".to_string(),
            });
        }

        let rows: Vec<&str> = text.split('/').collect();
        let size = rows.len();
        if size > u8::MAX as usize + 1 {
            return Err(EngineError::InvalidLayout {
                reason: format!("board size {} too large", size),
            });
        }
        let mut grid = Grid::new(size);

        for (y, row) in rows.iter().enumerate() {
            let cells: Vec<&str> = row.split_whitespace().collect();
            if cells.len() != size {
                return Err(EngineError::InvalidLayout {
                    reason: format!("row {} has {} cells, expected {}", y, cells.len(), size),
                });
            }
            for (x, token) in cells.iter().enumerate() {
                if *token == "." {
                    continue;
                }
                let value: u32 = token.parse().map_err(|_| EngineError::InvalidLayout {
                    reason: format!("invalid cell token '{}'", token),
                })?;
                if value < 2 || !value.is_power_of_two() {
                    return Err(EngineError::InvalidLayout {
                        reason: format!("cell value {} is not a power of two >= 2", value),
                    });
                }
                grid.insert_tile(Tile::new(Position::new(x as u8, y as u8), value));
            }
        }

        Ok(grid)
    }

    /// 将棋盘渲染为布局字符串
    pub fn render(grid: &Grid) -> String {
        let size = grid.size();
        let mut rows = Vec::with_capacity(size);
        for y in 0..size {
            let mut cells = Vec::with_capacity(size);
            for x in 0..size {
                let cell = match grid.cell_content(Position::new(x as u8, y as u8)) {
                    Some(tile) => tile.value.to_string(),
                    None => ".".to_string(),
                };
                cells.push(cell);
            }
            rows.push(cells.join(" "));
        }
        rows.join("/")
    }
}
