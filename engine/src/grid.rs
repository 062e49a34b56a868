//! 棋盘格状态

use rand::Rng;

use crate::error::{EngineError, Result};
use crate::moves::Direction;
use crate::snapshot::GridSnapshot;
use crate::tile::{Position, Tile};

/// 棋盘格
///
/// 以 Vec 存放 size*size 个格子，索引为 x * size + y。空格枚举、序列化、
/// 指纹哈希等所有按格遍历都按该索引顺序进行，保证各处顺序一致。
#[derive(Debug, Clone)]
pub struct Grid {
    size: usize,
    cells: Vec<Option<Tile>>,
}

impl Grid {
    /// 创建空棋盘
    ///
    /// 坐标以 u8 存放，边长上限 256。
    pub fn new(size: usize) -> Self {
        debug_assert!(size <= u8::MAX as usize + 1, "grid size {} too large", size);
        Self {
            size,
            cells: vec![None; size * size],
        }
    }

    /// 从存档还原棋盘
    ///
    /// 校验格子数量与边长一致、方块记录的位置与所在格一致、数值为
    /// 2 的幂且 >= 2，任一不满足返回 `InvalidSnapshot` 错误。
    pub fn from_snapshot(snapshot: &GridSnapshot) -> Result<Self> {
        let size = snapshot.size;
        if size > u8::MAX as usize + 1 {
            return Err(EngineError::InvalidSnapshot {
                reason: format!("grid size {} too large", size),
            });
        }
        let expected_len = size * size;
        if snapshot.cells.len() != expected_len {
            return Err(EngineError::InvalidSnapshot {
                reason: format!(
                    "expected {} cells for size {}, got {}",
                    expected_len,
                    size,
                    snapshot.cells.len()
                ),
            });
        }

        let mut grid = Grid::new(size);
        for (i, slot) in snapshot.cells.iter().enumerate() {
            let Some(stored) = slot else { continue };
            let slot_pos = Position::new((i / size) as u8, (i % size) as u8);
            let tile_pos = Position::new(stored.position[0], stored.position[1]);
            if tile_pos != slot_pos {
                return Err(EngineError::InvalidSnapshot {
                    reason: format!("tile in cell {} records position {}", slot_pos, tile_pos),
                });
            }
            if stored.value < 2 || !stored.value.is_power_of_two() {
                return Err(EngineError::InvalidSnapshot {
                    reason: format!("tile value {} is not a power of two >= 2", stored.value),
                });
            }
            grid.cells[i] = Some(stored.to_tile());
        }
        Ok(grid)
    }

    /// 转换为存档形式
    pub fn to_snapshot(&self) -> GridSnapshot {
        GridSnapshot {
            size: self.size,
            cells: self
                .cells
                .iter()
                .map(|cell| cell.as_ref().map(Tile::to_snapshot))
                .collect(),
        }
    }

    /// 棋盘边长
    pub fn size(&self) -> usize {
        self.size
    }

    fn index(&self, pos: Position) -> usize {
        pos.x as usize * self.size + pos.y as usize
    }

    /// 检查位置是否在棋盘内
    pub fn within_bounds(&self, pos: Position) -> bool {
        (pos.x as usize) < self.size && (pos.y as usize) < self.size
    }

    /// 获取指定位置的方块，棋盘外返回 None
    pub fn cell_content(&self, pos: Position) -> Option<&Tile> {
        if self.within_bounds(pos) {
            self.cells[self.index(pos)].as_ref()
        } else {
            None
        }
    }

    /// 指定位置是否有方块，棋盘外视为没有
    pub fn cell_occupied(&self, pos: Position) -> bool {
        self.cell_content(pos).is_some()
    }

    /// 指定位置是否为棋盘内的空格
    pub fn cell_available(&self, pos: Position) -> bool {
        self.within_bounds(pos) && !self.cell_occupied(pos)
    }

    /// 是否还有空格
    pub fn cells_available(&self) -> bool {
        self.cells.iter().any(|cell| cell.is_none())
    }

    /// 按固定顺序枚举所有空格
    pub fn available_cells(&self) -> impl Iterator<Item = Position> + '_ {
        let size = self.size;
        self.cells.iter().enumerate().filter_map(move |(i, cell)| {
            cell.is_none()
                .then(|| Position::new((i / size) as u8, (i % size) as u8))
        })
    }

    /// 随机取一个空格，棋盘已满时返回 None
    pub fn random_available_cell<R: Rng + ?Sized>(&self, rng: &mut R) -> Option<Position> {
        let cells: Vec<Position> = self.available_cells().collect();
        if cells.is_empty() {
            None
        } else {
            Some(cells[rng.gen_range(0..cells.len())])
        }
    }

    /// 放置方块到其自身记录的位置
    ///
    /// 不检查目标格是否已被占用，由调用方保证；合并落子时会直接覆盖。
    pub fn insert_tile(&mut self, tile: Tile) {
        if self.within_bounds(tile.position) {
            let index = self.index(tile.position);
            self.cells[index] = Some(tile);
        }
    }

    /// 清除指定位置的方块
    pub fn remove_tile(&mut self, pos: Position) {
        if self.within_bounds(pos) {
            let index = self.index(pos);
            self.cells[index] = None;
        }
    }

    pub(crate) fn take_tile(&mut self, pos: Position) -> Option<Tile> {
        if self.within_bounds(pos) {
            let index = self.index(pos);
            self.cells[index].take()
        } else {
            None
        }
    }

    pub(crate) fn tiles_mut(&mut self) -> impl Iterator<Item = &mut Tile> + '_ {
        self.cells.iter_mut().flatten()
    }

    /// 棋盘上最大的方块数值，空棋盘为 0
    pub fn largest(&self) -> u32 {
        self.cells
            .iter()
            .flatten()
            .map(|tile| tile.value)
            .max()
            .unwrap_or(0)
    }

    /// 比较两个棋盘的占用格与数值是否一致（忽略移动过程信息）
    pub fn equals(&self, other: &Grid) -> bool {
        self.size == other.size
            && self
                .cells
                .iter()
                .zip(other.cells.iter())
                .all(|(a, b)| match (a, b) {
                    (None, None) => true,
                    (Some(a), Some(b)) => a.value == b.value,
                    _ => false,
                })
    }

    /// 是否还有可行的移动：有空格，或存在相邻等值方块
    pub fn moves_available(&self) -> bool {
        self.cells_available() || self.tile_matches_available()
    }

    fn tile_matches_available(&self) -> bool {
        for x in 0..self.size {
            for y in 0..self.size {
                let pos = Position::new(x as u8, y as u8);
                let Some(tile) = self.cell_content(pos) else {
                    continue;
                };
                for direction in Direction::ALL {
                    let (dx, dy) = direction.vector();
                    let neighbor = pos
                        .offset(dx, dy)
                        .and_then(|next| self.cell_content(next));
                    if let Some(other) = neighbor {
                        if other.value == tile.value {
                            return true;
                        }
                    }
                }
            }
        }
        false
    }
}

impl std::fmt::Display for Grid {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        for y in 0..self.size {
            for x in 0..self.size {
                let pos = Position::new(x as u8, y as u8);
                match self.cell_content(pos) {
                    Some(tile) => write!(f, "{:>6}", tile.value)?,
                    None => write!(f, "{:>6}", ".")?,
                }
            }
            writeln!(f)?;
        }
        Ok(())
    }
}
