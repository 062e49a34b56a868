//! 2048 自动走子引擎
//!
//! 包含:
//! - 棋面评估函数
//! - Minimax + Alpha-Beta 搜索
//! - 迭代加深
//! - Expectimax 期望搜索
//! - 棋面指纹与记忆表

mod evaluate;
mod fingerprint;
mod memo;
mod search;

pub use evaluate::Evaluator;
pub use fingerprint::{fingerprint, HASH_BASE, HASH_MODULUS};
pub use memo::MemoTable;
pub use search::{
    AiConfig, AiEngine, Algorithm, SearchResult, DEFAULT_DEPTH_LIMIT, SCORE_MAX, SCORE_MIN,
};
