//! 搜索引擎
//!
//! 实现两种走子搜索：
//! - Minimax + Alpha-Beta 剪枝 + 迭代加深
//! - Expectimax 期望搜索 + 记忆表

use engine::{Direction, Grid, Position, Tile};
use rand::Rng;
use serde::{Deserialize, Serialize};

use crate::evaluate::Evaluator;
use crate::fingerprint::fingerprint;
use crate::memo::MemoTable;

/// 搜索分数下界，视为负无穷
pub const SCORE_MIN: f64 = -999_999.0;

/// 搜索分数上界，视为正无穷
pub const SCORE_MAX: f64 = 999_999.0;

/// 默认搜索深度
pub const DEFAULT_DEPTH_LIMIT: u8 = 3;

/// 搜索算法
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Algorithm {
    /// 极小极大 + Alpha-Beta 剪枝
    Minimax,
    /// 期望最大搜索
    Expectimax,
}

impl Algorithm {
    /// 按名称解析
    pub fn from_name(name: &str) -> Option<Algorithm> {
        match name {
            "minimax" => Some(Algorithm::Minimax),
            "expectimax" => Some(Algorithm::Expectimax),
            _ => None,
        }
    }
}

impl std::fmt::Display for Algorithm {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let name = match self {
            Algorithm::Minimax => "minimax",
            Algorithm::Expectimax => "expectimax",
        };
        write!(f, "{}", name)
    }
}

/// AI 配置
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AiConfig {
    pub algorithm: Algorithm,
    pub depth_limit: u8,
}

impl Default for AiConfig {
    fn default() -> Self {
        Self {
            algorithm: Algorithm::Expectimax,
            depth_limit: DEFAULT_DEPTH_LIMIT,
        }
    }
}

/// 一次搜索的结论：推荐方向与对应评分
///
/// `direction` 为 None 表示搜索没有给出方向（深度为 0，或所有方向
/// 都推不动），由调用方决定兜底策略。
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SearchResult {
    pub direction: Option<Direction>,
    pub score: f64,
}

/// 搜索节点的行动方
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Turn {
    /// 玩家选方向，取最大
    Maximizing,
    /// 棋盘落新块，取最小
    Minimizing,
}

/// AI 引擎
pub struct AiEngine {
    config: AiConfig,
    memo: MemoTable,
    nodes_searched: u64,
}

impl AiEngine {
    /// 创建新的 AI 引擎
    pub fn new(config: AiConfig) -> Self {
        Self {
            config,
            memo: MemoTable::new(),
            nodes_searched: 0,
        }
    }

    /// 按算法与深度创建
    pub fn with_algorithm(algorithm: Algorithm, depth_limit: u8) -> Self {
        Self::new(AiConfig {
            algorithm,
            depth_limit,
        })
    }

    /// 当前配置
    pub fn config(&self) -> &AiConfig {
        &self.config
    }

    /// 上次搜索展开的节点数
    pub fn nodes_searched(&self) -> u64 {
        self.nodes_searched
    }

    /// 按配置的算法搜索推荐方向
    ///
    /// 推荐方向不保证在真实棋盘上可行，需要可行方向时用 `best_move`
    pub fn search(&mut self, grid: &Grid) -> SearchResult {
        self.nodes_searched = 0;
        match self.config.algorithm {
            Algorithm::Minimax => self.minimax(grid),
            Algorithm::Expectimax => self.expectimax(grid),
        }
    }

    /// 给出一个在当前棋盘上可行的移动方向
    ///
    /// 搜索结果缺少方向或推荐方向推不动时，均匀随机重采样直到可行。
    /// 调用方需保证棋盘尚未终局，否则不存在可行方向。
    pub fn best_move<R: Rng + ?Sized>(&mut self, grid: &Grid, rng: &mut R) -> Direction {
        let result = self.search(grid);

        let legal = |direction: Direction| grid.clone().apply_move(direction).is_some();

        let direction = match result.direction {
            Some(direction) if legal(direction) => direction,
            _ => loop {
                let candidate = Direction::ALL[rng.gen_range(0..Direction::ALL.len())];
                if legal(candidate) {
                    break candidate;
                }
            },
        };

        tracing::debug!(
            "搜索完成: 方向 {}, 评分 {:.0}, 节点 {}, 记忆表 {} 条目 命中率 {:.2}",
            direction,
            result.score,
            self.nodes_searched,
            self.memo.len(),
            self.memo.hit_rate()
        );

        direction
    }

    /// 迭代加深的 Minimax 搜索
    ///
    /// 从 depth_limit/2 到 depth_limit 逐层完整搜索。带方向的结果
    /// 一律优先于没有方向的结果，即使它的分数低于不动的局面分；
    /// 其余情况保留分数严格更高的一层，同分保留更浅的一层。
    fn minimax(&mut self, grid: &Grid) -> SearchResult {
        let mut best = SearchResult {
            direction: None,
            score: SCORE_MIN,
        };

        let min_depth = self.config.depth_limit / 2;
        for depth in min_depth..=self.config.depth_limit {
            let result = self.minimax_dfs(grid, SCORE_MIN, SCORE_MAX, Turn::Maximizing, depth);
            let replace = match (best.direction, result.direction) {
                (None, Some(_)) => true,
                (Some(_), None) => false,
                _ => result.score > best.score,
            };
            if replace {
                best = result;
            }
        }
        best
    }

    fn minimax_dfs(
        &mut self,
        grid: &Grid,
        mut alpha: f64,
        mut beta: f64,
        turn: Turn,
        depth: u8,
    ) -> SearchResult {
        self.nodes_searched += 1;

        if depth == 0 {
            return SearchResult {
                direction: None,
                score: Evaluator::score(grid),
            };
        }

        match turn {
            Turn::Maximizing => {
                let mut best = SearchResult {
                    direction: None,
                    score: alpha,
                };
                for direction in Direction::ALL {
                    let mut moved = grid.clone();
                    if moved.apply_move(direction).is_none() {
                        continue;
                    }
                    let result =
                        self.minimax_dfs(&moved, alpha, beta, Turn::Minimizing, depth - 1);
                    if result.score > alpha {
                        alpha = result.score;
                        best = SearchResult {
                            direction: Some(direction),
                            score: alpha,
                        };
                    }
                    if beta <= alpha {
                        break;
                    }
                }
                best
            }
            Turn::Minimizing => {
                // 逐个空格尝试落 2 和落 4，beta 收紧到最差情形
                let size = grid.size();
                for x in 0..size {
                    for y in 0..size {
                        let cell = Position::new(x as u8, y as u8);
                        if grid.cell_occupied(cell) {
                            continue;
                        }
                        for value in [2u32, 4] {
                            let mut spawned = grid.clone();
                            spawned.insert_tile(Tile::new(cell, value));
                            let result = self.minimax_dfs(
                                &spawned,
                                alpha,
                                beta,
                                Turn::Maximizing,
                                depth - 1,
                            );
                            beta = beta.min(result.score);
                            if beta <= alpha {
                                return SearchResult {
                                    direction: None,
                                    score: beta,
                                };
                            }
                        }
                    }
                }
                SearchResult {
                    direction: None,
                    score: beta,
                }
            }
        }
    }

    /// 顶层期望搜索，先清空记忆表再展开
    fn expectimax(&mut self, grid: &Grid) -> SearchResult {
        self.memo.clear();
        self.expectimax_dfs(grid, self.config.depth_limit)
    }

    fn expectimax_dfs(&mut self, grid: &Grid, depth: u8) -> SearchResult {
        self.nodes_searched += 1;

        let key = fingerprint(grid);
        if depth == 0 {
            let result = SearchResult {
                direction: None,
                score: Evaluator::score(grid),
            };
            self.memo.store(key, result);
            return result;
        }

        if let Some(cached) = self.memo.lookup(key) {
            return cached;
        }

        let mut candidates = [SCORE_MIN; 4];
        for direction in Direction::ALL {
            let mut moved = grid.clone();
            if moved.apply_move(direction).is_none() {
                continue;
            }

            // 有效移动后的棋盘至少有一个空格；新块在空格上等概率出现，
            // 数值 2 概率 0.9、数值 4 概率 0.1。移动本身的合并得分不计入
            let cells: Vec<Position> = moved.available_cells().collect();
            let weight = 1.0 / cells.len() as f64;
            let mut expected = 0.0;
            for cell in cells {
                let mut with_two = moved.clone();
                with_two.insert_tile(Tile::new(cell, 2));
                expected += 0.9 * weight * self.expectimax_dfs(&with_two, depth - 1).score;

                let mut with_four = moved.clone();
                with_four.insert_tile(Tile::new(cell, 4));
                expected += 0.1 * weight * self.expectimax_dfs(&with_four, depth - 1).score;
            }
            candidates[direction.index()] = expected;
        }

        // 同分保留编号更小的方向；四个方向都推不动时结论是
        // 方向 0 + 下界分，由调用方兜底
        let mut best = SearchResult {
            direction: Some(Direction::Up),
            score: candidates[0],
        };
        for direction in [Direction::Right, Direction::Down, Direction::Left] {
            if candidates[direction.index()] > best.score {
                best = SearchResult {
                    direction: Some(direction),
                    score: candidates[direction.index()],
                };
            }
        }

        self.memo.store(key, best);
        best
    }
}
