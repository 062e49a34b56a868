//! 棋面指纹
//!
//! 将整个棋面按固定格序折叠为一个模哈希值，作为记忆表的键。
//! 不同棋面可能产生同一指纹，记忆表不做二次区分。

use engine::{Grid, Position};

/// 哈希底数：每格贡献左移 12 位
pub const HASH_BASE: u64 = 4096;

/// 哈希模数（大质数）
pub const HASH_MODULUS: u64 = 982_451_653;

/// 计算棋面指纹
///
/// 按 x 外层、y 内层的格序对每格数值（空格取 0）做滚动哈希：
/// `hash = (hash * 4096 + value) % 982451653`，初值 0。
/// 只依赖格子内容，是棋面的纯函数。
pub fn fingerprint(grid: &Grid) -> u64 {
    let size = grid.size();
    let mut hash: u64 = 0;
    for x in 0..size {
        for y in 0..size {
            let value = grid
                .cell_content(Position::new(x as u8, y as u8))
                .map_or(0, |tile| tile.value as u64);
            hash = (hash * HASH_BASE + value) % HASH_MODULUS;
        }
    }
    hash
}

#[cfg(test)]
mod tests {
    use super::*;
    use engine::Layout;

    #[test]
    fn test_empty_board_fingerprint_is_zero() {
        assert_eq!(fingerprint(&Grid::new(4)), 0);
    }

    #[test]
    fn test_fingerprint_known_value() {
        // 2x2，仅 (0,0) 为 2：hash = 2 * 4096^3 mod 982451653
        let grid = Layout::parse("2 ./. .").unwrap();
        assert_eq!(fingerprint(&grid), 878_173_705);
    }

    #[test]
    fn test_fingerprint_deterministic() {
        let grid = Layout::parse("2 4 . ./. 8 . ./. . . ./. . 2 .").unwrap();
        assert_eq!(fingerprint(&grid), fingerprint(&grid));
        assert_eq!(fingerprint(&grid), fingerprint(&grid.clone()));
    }

    #[test]
    fn test_fingerprint_sensitive_to_value_and_position() {
        let base = Layout::parse("2 . ./. . ./. . .").unwrap();
        let different_value = Layout::parse("4 . ./. . ./. . .").unwrap();
        let different_cell = Layout::parse(". 2 ./. . ./. . .").unwrap();

        assert_ne!(fingerprint(&base), fingerprint(&different_value));
        assert_ne!(fingerprint(&base), fingerprint(&different_cell));
    }
}
