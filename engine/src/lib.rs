//! 2048 滑块游戏核心引擎
//!
//! 包含:
//! - 方块、棋盘、位置等核心数据结构
//! - 四方向滑动与合并规则
//! - 对局存档格式 (JSON)
//! - 棋盘布局文本格式（测试棋形与日志输出）

mod constants;
mod error;
mod grid;
mod layout;
mod moves;
mod snapshot;
mod tile;

pub use constants::*;
pub use error::{EngineError, Result};
pub use grid::Grid;
pub use layout::Layout;
pub use moves::Direction;
pub use snapshot::{GameSnapshot, GridSnapshot};
pub use tile::{Position, Tile, TileSnapshot};
