//! 对局控制
//!
//! 维护一局 2048 的棋盘、得分与终局状态，每次有效移动后落一个新块

use engine::{
    Direction, GameSnapshot, Grid, Result, Tile, BASE_TILE_VALUE, FOUR_TILE_PROBABILITY,
    START_TILES,
};
use rand::Rng;

/// 一局游戏
#[derive(Debug, Clone)]
pub struct Game {
    /// 棋盘
    grid: Grid,
    /// 累计得分
    score: u32,
    /// 没有可行移动，输掉
    over: bool,
    /// 合成过目标方块
    won: bool,
    /// 获胜后选择继续
    keep_playing: bool,
}

impl Game {
    /// 开新局：空棋盘加上起始随机方块
    pub fn new<R: Rng + ?Sized>(size: usize, rng: &mut R) -> Self {
        let mut game = Self {
            grid: Grid::new(size),
            score: 0,
            over: false,
            won: false,
            keep_playing: false,
        };
        for _ in 0..START_TILES {
            game.add_random_tile(rng);
        }
        game
    }

    /// 在随机空格落一个新块，数值 4 概率 0.1、其余为 2；满盘不落
    fn add_random_tile<R: Rng + ?Sized>(&mut self, rng: &mut R) {
        if let Some(cell) = self.grid.random_available_cell(rng) {
            let value = if rng.gen::<f64>() < FOUR_TILE_PROBABILITY {
                BASE_TILE_VALUE * 2
            } else {
                BASE_TILE_VALUE
            };
            self.grid.insert_tile(Tile::new(cell, value));
        }
    }

    /// 执行一步移动
    ///
    /// 对局已终止或该方向推不动时返回 None 且不落新块；否则把合并
    /// 得分计入总分、落一个新块、检查棋盘是否锁死，返回本步得分增量
    pub fn apply_move<R: Rng + ?Sized>(
        &mut self,
        direction: Direction,
        rng: &mut R,
    ) -> Option<u32> {
        if self.is_terminated() {
            return None;
        }
        let delta = self.grid.apply_move(direction)?;
        self.score += delta;
        self.add_random_tile(rng);
        if !self.grid.moves_available() {
            self.over = true;
        }
        Some(delta)
    }

    /// 对局是否已经结束（锁死，或已获胜且不继续）
    pub fn is_terminated(&self) -> bool {
        self.over || (self.won && !self.keep_playing)
    }

    pub fn grid(&self) -> &Grid {
        &self.grid
    }

    pub fn score(&self) -> u32 {
        self.score
    }

    pub fn is_over(&self) -> bool {
        self.over
    }

    pub fn is_won(&self) -> bool {
        self.won
    }

    /// 获胜后是否继续游戏
    pub fn set_keep_playing(&mut self, keep_playing: bool) {
        self.keep_playing = keep_playing;
    }

    /// 棋盘上最大的方块数值
    pub fn largest(&self) -> u32 {
        self.grid.largest()
    }

    /// 导出对局快照
    pub fn to_snapshot(&self) -> GameSnapshot {
        GameSnapshot {
            grid: self.grid.to_snapshot(),
            score: self.score,
            over: self.over,
            won: self.won,
            keep_playing: self.keep_playing,
        }
    }

    /// 从快照恢复对局
    pub fn from_snapshot(snapshot: &GameSnapshot) -> Result<Self> {
        Ok(Self {
            grid: Grid::from_snapshot(&snapshot.grid)?,
            score: snapshot.score,
            over: snapshot.over,
            won: snapshot.won,
            keep_playing: snapshot.keep_playing,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use engine::Layout;
    use rand::SeedableRng;
    use rand_chacha::ChaCha8Rng;

    fn game_from_layout(layout: &str, score: u32) -> Game {
        Game {
            grid: Layout::parse(layout).unwrap(),
            score,
            over: false,
            won: false,
            keep_playing: false,
        }
    }

    fn occupied(game: &Game) -> usize {
        let size = game.grid().size();
        size * size - game.grid().available_cells().count()
    }

    #[test]
    fn test_new_game_spawns_start_tiles() {
        let mut rng = ChaCha8Rng::seed_from_u64(1);
        let game = Game::new(4, &mut rng);

        assert_eq!(occupied(&game), START_TILES);
        assert_eq!(game.score(), 0);
        assert!(!game.is_terminated());
        // 起始方块只能是 2 或 4
        for cell in game.grid().to_snapshot().cells.iter().flatten() {
            assert!(cell.value == 2 || cell.value == 4);
        }
    }

    #[test]
    fn test_apply_move_scores_and_spawns() {
        let mut rng = ChaCha8Rng::seed_from_u64(7);
        let mut game = game_from_layout("2 2 . ./. . . ./. . . ./. . . .", 0);

        let delta = game.apply_move(Direction::Left, &mut rng);

        assert_eq!(delta, Some(4), "合并两个 2 得 4 分");
        assert_eq!(game.score(), 4);
        // 合并成一块之后又落了一个新块
        assert_eq!(occupied(&game), 2);
    }

    #[test]
    fn test_no_op_move_keeps_board_unchanged() {
        let mut rng = ChaCha8Rng::seed_from_u64(7);
        let mut game = game_from_layout("2 . . ./. . . ./. . . ./. . . .", 0);

        let delta = game.apply_move(Direction::Up, &mut rng);

        assert_eq!(delta, None, "贴着上边推不动");
        assert_eq!(game.score(), 0);
        assert_eq!(occupied(&game), 1, "无效移动不落新块");
    }

    #[test]
    fn test_terminated_game_rejects_moves() {
        let mut rng = ChaCha8Rng::seed_from_u64(7);
        let mut game = game_from_layout("2 2 . ./. . . ./. . . ./. . . .", 0);
        game.over = true;

        assert!(game.is_terminated());
        assert_eq!(game.apply_move(Direction::Left, &mut rng), None);
    }

    #[test]
    fn test_over_set_when_board_locks() {
        // 左移后第 3 行合并出 8，唯一空格 (3,3) 的邻块是 8 和 16，
        // 无论落 2 还是落 4 棋盘都锁死
        let mut rng = ChaCha8Rng::seed_from_u64(7);
        let mut game = game_from_layout("2 4 2 4/4 2 4 2/2 4 2 16/4 2 4 4", 0);

        let delta = game.apply_move(Direction::Left, &mut rng);

        assert_eq!(delta, Some(8));
        assert!(game.is_over());
        assert!(game.is_terminated());
        assert_eq!(game.apply_move(Direction::Left, &mut rng), None);
    }

    #[test]
    fn test_won_respects_keep_playing() {
        let mut game = game_from_layout("2 . . ./. . . ./. . . ./. . . .", 0);
        game.won = true;

        assert!(game.is_terminated(), "获胜且未选择继续时对局终止");

        game.set_keep_playing(true);
        assert!(!game.is_terminated(), "选择继续后对局恢复");
    }

    #[test]
    fn test_snapshot_roundtrip() {
        let mut game = game_from_layout("2 4 . ./. 8 . ./. . . ./. . 16 .", 36);
        game.won = true;
        game.keep_playing = true;

        let restored = Game::from_snapshot(&game.to_snapshot()).unwrap();

        assert!(restored.grid().equals(game.grid()));
        assert_eq!(restored.score(), 36);
        assert!(restored.is_won());
        assert!(!restored.is_terminated());
    }

    #[test]
    fn test_auto_play_runs_to_completion() {
        // 用搜索引擎整局自动走，验证引擎给出的方向始终可行
        let mut rng = ChaCha8Rng::seed_from_u64(42);
        let mut game = Game::new(4, &mut rng);
        let mut ai = game_ai::AiEngine::with_algorithm(game_ai::Algorithm::Expectimax, 2);

        let mut moves = 0;
        let mut total = 0u32;
        while !game.is_terminated() && moves < 200 {
            let direction = ai.best_move(game.grid(), &mut rng);
            let delta = game.apply_move(direction, &mut rng);
            let delta = delta.expect("推荐方向必须可行");
            total += delta;
            moves += 1;
        }

        assert!(moves > 0);
        assert_eq!(game.score(), total, "总分等于各步增量之和");
        assert!(game.largest() >= 4, "两百步内至少合并出过 4");
    }
}
