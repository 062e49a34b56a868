//! 方向与移动规则

use serde::{Deserialize, Serialize};

use crate::grid::Grid;
use crate::tile::{Position, Tile};

/// 移动方向，编号 0-3
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Direction {
    /// 上，位移 (0, -1)
    Up,
    /// 右，位移 (1, 0)
    Right,
    /// 下，位移 (0, 1)
    Down,
    /// 左，位移 (-1, 0)
    Left,
}

impl Direction {
    /// 全部方向，按编号顺序
    pub const ALL: [Direction; 4] = [
        Direction::Up,
        Direction::Right,
        Direction::Down,
        Direction::Left,
    ];

    /// 从编号解析，超出 0-3 返回 None
    pub fn from_index(index: usize) -> Option<Direction> {
        match index {
            0 => Some(Direction::Up),
            1 => Some(Direction::Right),
            2 => Some(Direction::Down),
            3 => Some(Direction::Left),
            _ => None,
        }
    }

    /// 方向编号
    pub fn index(&self) -> usize {
        *self as usize
    }

    /// 该方向的单位位移 (dx, dy)
    pub fn vector(&self) -> (i8, i8) {
        match self {
            Direction::Up => (0, -1),
            Direction::Right => (1, 0),
            Direction::Down => (0, 1),
            Direction::Left => (-1, 0),
        }
    }
}

impl std::fmt::Display for Direction {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let name = match self {
            Direction::Up => "up",
            Direction::Right => "right",
            Direction::Down => "down",
            Direction::Left => "left",
        };
        write!(f, "{}", name)
    }
}

impl Grid {
    /// 向指定方向移动全部方块
    ///
    /// 返回本次移动的合并得分（被合并出的方块数值之和，纯滑动为 0）；
    /// 没有任何方块移动或合并时返回 None。
    ///
    /// 从离目标边最近的格子开始逐格处理：方块先滑到该方向上最远的空格，
    /// 若紧邻的阻挡方块等值且本次移动中尚未合并过，则并入对方位置生成
    /// 双倍数值的新方块。由合并产生的方块在同一次移动中不再参与合并。
    pub fn apply_move(&mut self, direction: Direction) -> Option<u32> {
        let vector = direction.vector();
        let (traversals_x, traversals_y) = self.build_traversals(vector);
        let mut moved = false;
        let mut score = 0u32;

        self.prepare_tiles();

        for &x in &traversals_x {
            for &y in &traversals_y {
                let cell = Position::new(x, y);
                let Some(tile_value) = self.cell_content(cell).map(|t| t.value) else {
                    continue;
                };

                let (farthest, next) = self.find_farthest_position(cell, vector);

                // 可合并：阻挡方块等值且尚未带合并标记
                let merge_target = next.filter(|&pos| {
                    self.cell_content(pos).is_some_and(|other| {
                        other.value == tile_value && other.merged_from.is_none()
                    })
                });

                let destination = if let Some(target_pos) = merge_target {
                    let taken = (self.take_tile(cell), self.take_tile(target_pos));
                    if let (Some(source), Some(target)) = taken {
                        let mut moved_source = source.clone();
                        moved_source.update_position(target_pos);

                        let mut merged = Tile::new(target_pos, tile_value * 2);
                        merged.merged_from = Some(Box::new((moved_source, target)));
                        self.insert_tile(merged);

                        score += tile_value * 2;
                    }
                    target_pos
                } else {
                    self.move_tile(cell, farthest);
                    farthest
                };

                if destination != cell {
                    moved = true;
                }
            }
        }

        if moved {
            Some(score)
        } else {
            None
        }
    }

    /// 沿向量找到最远可达的空格，以及其后第一个棋盘内的阻挡位置
    pub fn find_farthest_position(
        &self,
        cell: Position,
        vector: (i8, i8),
    ) -> (Position, Option<Position>) {
        let mut previous = cell;
        loop {
            match previous.offset(vector.0, vector.1) {
                Some(next) if self.cell_available(next) => previous = next,
                Some(next) if self.within_bounds(next) => return (previous, Some(next)),
                _ => return (previous, None),
            }
        }
    }

    /// 遍历顺序：两轴均为升序，向量分量为 +1 的轴反转，
    /// 保证先处理离目标边最近的方块
    fn build_traversals(&self, vector: (i8, i8)) -> (Vec<u8>, Vec<u8>) {
        let mut xs: Vec<u8> = (0..self.size() as u8).collect();
        let mut ys: Vec<u8> = (0..self.size() as u8).collect();
        if vector.0 == 1 {
            xs.reverse();
        }
        if vector.1 == 1 {
            ys.reverse();
        }
        (xs, ys)
    }

    /// 每次移动开始前清空合并标记并记录各方块当前位置
    fn prepare_tiles(&mut self) {
        for tile in self.tiles_mut() {
            tile.merged_from = None;
            tile.save_position();
        }
    }

    fn move_tile(&mut self, from: Position, to: Position) {
        let Some(mut tile) = self.take_tile(from) else {
            return;
        };
        tile.update_position(to);
        self.insert_tile(tile);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::layout::Layout;

    fn value_at(grid: &Grid, x: u8, y: u8) -> Option<u32> {
        grid.cell_content(Position::new(x, y)).map(|t| t.value)
    }

    fn total_value(grid: &Grid) -> u32 {
        let mut sum = 0;
        for x in 0..grid.size() as u8 {
            for y in 0..grid.size() as u8 {
                sum += value_at(grid, x, y).unwrap_or(0);
            }
        }
        sum
    }

    #[test]
    fn test_direction_encoding() {
        for (index, direction) in Direction::ALL.iter().enumerate() {
            assert_eq!(direction.index(), index);
            assert_eq!(Direction::from_index(index), Some(*direction));
        }
        assert_eq!(Direction::from_index(4), None);

        assert_eq!(Direction::Up.vector(), (0, -1));
        assert_eq!(Direction::Right.vector(), (1, 0));
        assert_eq!(Direction::Down.vector(), (0, 1));
        assert_eq!(Direction::Left.vector(), (-1, 0));
    }

    #[test]
    fn test_left_merges_adjacent_pair() {
        let mut grid = Layout::parse("2 2 . ./. . . ./. . . ./. . . .").unwrap();

        let delta = grid.apply_move(Direction::Left);

        assert_eq!(delta, Some(4), "合并两个 2 应得 4 分");
        assert_eq!(value_at(&grid, 0, 0), Some(4));
        assert_eq!(grid.available_cells().count(), 15);
    }

    #[test]
    fn test_slide_without_merge_scores_zero() {
        let mut grid = Layout::parse(". . 2 ./. . . ./. . . ./. . . .").unwrap();

        let delta = grid.apply_move(Direction::Left);

        assert_eq!(delta, Some(0), "纯滑动得 0 分但算有效移动");
        assert_eq!(value_at(&grid, 0, 0), Some(2));
    }

    #[test]
    fn test_noop_returns_none() {
        let mut grid = Layout::parse("2 . . ./. . . ./. . . ./. . . .").unwrap();

        // 方块已贴左边和上边，这两个方向都推不动
        assert_eq!(grid.apply_move(Direction::Left), None);
        assert_eq!(grid.apply_move(Direction::Up), None);
        assert_eq!(grid.apply_move(Direction::Right), Some(0));
    }

    #[test]
    fn test_second_move_same_direction_is_noop() {
        let mut grid = Layout::parse(". 2 . 4/. . 8 ./. . . ./. . . .").unwrap();

        assert_eq!(grid.apply_move(Direction::Left), Some(0));
        // 没有新方块落下时，同方向再推一次必然不动
        assert_eq!(grid.apply_move(Direction::Left), None);
    }

    #[test]
    fn test_merge_precedence_near_wall() {
        let mut grid = Layout::parse("2 2 2 ./. . . ./. . . ./. . . .").unwrap();

        let delta = grid.apply_move(Direction::Left);

        // 靠墙的一对先合并
        assert_eq!(delta, Some(4));
        assert_eq!(value_at(&grid, 0, 0), Some(4));
        assert_eq!(value_at(&grid, 1, 0), Some(2));
        assert_eq!(value_at(&grid, 2, 0), None);
    }

    #[test]
    fn test_two_pairs_merge_once_each() {
        let mut grid = Layout::parse("2 2 2 2/. . . ./. . . ./. . . .").unwrap();

        let delta = grid.apply_move(Direction::Left);

        assert_eq!(delta, Some(8));
        assert_eq!(value_at(&grid, 0, 0), Some(4));
        assert_eq!(value_at(&grid, 1, 0), Some(4));
    }

    #[test]
    fn test_merged_tile_does_not_merge_again() {
        let mut grid = Layout::parse("4 4 8 ./. . . ./. . . ./. . . .").unwrap();

        let delta = grid.apply_move(Direction::Left);

        // 4+4 合并成 8 之后，右侧的 8 不能再并进来
        assert_eq!(delta, Some(8));
        assert_eq!(value_at(&grid, 0, 0), Some(8));
        assert_eq!(value_at(&grid, 1, 0), Some(8));
        assert_eq!(value_at(&grid, 2, 0), None);
    }

    #[test]
    fn test_right_reverses_traversal() {
        let mut grid = Layout::parse(". 2 2 2/. . . ./. . . ./. . . .").unwrap();

        let delta = grid.apply_move(Direction::Right);

        assert_eq!(delta, Some(4));
        assert_eq!(value_at(&grid, 3, 0), Some(4));
        assert_eq!(value_at(&grid, 2, 0), Some(2));
    }

    #[test]
    fn test_down_moves_column() {
        let mut grid = Layout::parse("2 . . ./2 . . ./4 . . ./. . . .").unwrap();

        let delta = grid.apply_move(Direction::Down);

        assert_eq!(delta, Some(4));
        assert_eq!(value_at(&grid, 0, 3), Some(4));
        assert_eq!(value_at(&grid, 0, 2), Some(4));
        assert_eq!(value_at(&grid, 0, 1), None);
    }

    #[test]
    fn test_move_conserves_total_value() {
        let mut grid = Layout::parse("2 2 4 4/8 . 8 ./. 2 . 2/. . . .").unwrap();
        let before = total_value(&grid);

        let delta = grid.apply_move(Direction::Left);

        assert_eq!(total_value(&grid), before, "移动不改变数值总和");
        assert_eq!(delta, Some(4 + 8 + 16 + 4), "得分等于所有合并产物之和");
    }

    #[test]
    fn test_empty_grid_all_moves_noop() {
        let mut grid = Grid::new(4);
        for direction in Direction::ALL {
            assert_eq!(grid.apply_move(direction), None);
        }
    }

    #[test]
    fn test_find_farthest_position() {
        let grid = Layout::parse("2 . . 8/. . . ./. . . ./. . . .").unwrap();

        // (0,0) 向右走到 (2,0)，被 (3,0) 挡住
        let (farthest, next) = grid.find_farthest_position(Position::new(0, 0), (1, 0));
        assert_eq!(farthest, Position::new(2, 0));
        assert_eq!(next, Some(Position::new(3, 0)));

        // (3,0) 向右直接出界
        let (farthest, next) = grid.find_farthest_position(Position::new(3, 0), (1, 0));
        assert_eq!(farthest, Position::new(3, 0));
        assert_eq!(next, None);
    }

    #[test]
    fn test_merge_records_source_tiles() {
        let mut grid = Layout::parse("2 2 . ./. . . ./. . . ./. . . .").unwrap();

        grid.apply_move(Direction::Left);

        let merged = grid.cell_content(Position::new(0, 0)).unwrap();
        let (moved_source, target) = merged.merged_from.as_deref().unwrap();
        assert_eq!(moved_source.value, 2);
        assert_eq!(target.value, 2);
        // 滑入的来源记录了它的出发位置
        assert_eq!(moved_source.previous_position, Some(Position::new(1, 0)));
        assert_eq!(moved_source.position, Position::new(0, 0));
    }
}
