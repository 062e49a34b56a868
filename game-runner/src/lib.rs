//! 自动 2048 运行器
//!
//! 包含:
//! - 对局控制
//! - 本地存储

pub mod game;
pub mod storage;

pub use game::Game;
pub use storage::{SavedGame, StorageManager};
