//! 棋面评估函数

use engine::{Grid, Position};

/// 每个空格的奖励分
pub const EMPTY_CELL_BONUS: f64 = 4096.0;

/// 最大数值方块位于角落的奖励分
pub const CORNER_BONUS: f64 = 4096.0;

/// 方块离最近棋盘边距离的惩罚权重
pub const EDGE_DISTANCE_WEIGHT: f64 = 10.0;

/// 相邻方块数值差的惩罚权重
pub const SMOOTHNESS_WEIGHT: f64 = 10.0;

/// 评估器
pub struct Evaluator;

impl Evaluator {
    /// 评估棋面，分数越高局面越好
    ///
    /// - 每个空格 +4096
    /// - 方块按离最近边的距离受罚：-10 * 距离 * 数值
    /// - 每个处于角落且数值等于全盘最大值的方块 +4096
    /// - 平滑度：相邻方块数值差受罚 -10 * |差|，扫描锚点从 (1,1) 开始，
    ///   第 0 列的纵向相邻与第 0 行的横向相邻不参与计分
    pub fn score(grid: &Grid) -> f64 {
        let size = grid.size();
        let largest = grid.largest();
        let mut score = 0.0;

        for x in 0..size {
            for y in 0..size {
                let pos = Position::new(x as u8, y as u8);
                match grid.cell_content(pos) {
                    None => score += EMPTY_CELL_BONUS,
                    Some(tile) => {
                        let edge_distance = x.min(size - 1 - x).min(y).min(size - 1 - y);
                        score -= EDGE_DISTANCE_WEIGHT * edge_distance as f64 * tile.value as f64;

                        let x_border = x == 0 || x == size - 1;
                        let y_border = y == 0 || y == size - 1;
                        if tile.value == largest && x_border && y_border {
                            score += CORNER_BONUS;
                        }
                    }
                }
            }
        }

        for x in 1..size {
            for y in 1..size {
                let Some(tile) = grid.cell_content(Position::new(x as u8, y as u8)) else {
                    continue;
                };
                if let Some(above) = grid.cell_content(Position::new(x as u8, y as u8 - 1)) {
                    score -= SMOOTHNESS_WEIGHT * (tile.value as f64 - above.value as f64).abs();
                }
                if let Some(left) = grid.cell_content(Position::new(x as u8 - 1, y as u8)) {
                    score -= SMOOTHNESS_WEIGHT * (tile.value as f64 - left.value as f64).abs();
                }
            }
        }

        score
    }
}
