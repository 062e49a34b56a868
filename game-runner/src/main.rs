use anyhow::{Context, Result};
use engine::GRID_SIZE;
use game_ai::{AiConfig, AiEngine, Algorithm, DEFAULT_DEPTH_LIMIT};
use game_runner::{Game, StorageManager};
use rand::SeedableRng;
use rand_chacha::ChaCha8Rng;
use tracing::{debug, info};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

fn main() -> Result<()> {
    // 初始化日志
    tracing_subscriber::registry()
        .with(tracing_subscriber::fmt::layer())
        .with(
            tracing_subscriber::EnvFilter::from_default_env()
                .add_directive("game_runner=info".parse()?)
                .add_directive("game_ai=info".parse()?),
        )
        .init();

    let (config, seed) = parse_args()?;

    let mut rng = match seed {
        Some(seed) => ChaCha8Rng::seed_from_u64(seed),
        None => ChaCha8Rng::from_entropy(),
    };

    let storage = StorageManager::new()?;

    // 有存档且还没结束就续局，否则开新局
    let mut game = match storage.load_game()? {
        Some(saved) => {
            let game = Game::from_snapshot(&saved.game)?;
            if game.is_terminated() {
                storage.clear_game()?;
                info!("存档已终局，重新开始");
                Game::new(GRID_SIZE, &mut rng)
            } else {
                info!(
                    "续上 {} 保存的对局, 当前得分 {}",
                    saved.saved_at.format("%Y-%m-%d %H:%M"),
                    game.score()
                );
                game
            }
        }
        None => Game::new(GRID_SIZE, &mut rng),
    };

    let mut ai = AiEngine::new(config);
    let mut best_score = storage.best_score();
    let mut moves = 0u64;

    info!(
        "自动对局开始: 算法 {}, 深度 {}, 历史最高 {}",
        ai.config().algorithm,
        ai.config().depth_limit,
        best_score
    );

    while !game.is_terminated() {
        let direction = ai.best_move(game.grid(), &mut rng);
        let Some(delta) = game.apply_move(direction, &mut rng) else {
            break;
        };
        moves += 1;

        debug!("第 {} 步 {} +{}\n{}", moves, direction, delta, game.grid());

        if game.score() > best_score {
            best_score = game.score();
            storage.set_best_score(best_score)?;
        }
        if game.is_terminated() {
            storage.clear_game()?;
        } else {
            storage.save_game(&game.to_snapshot())?;
        }

        if moves % 50 == 0 {
            info!(
                "已走 {} 步, 得分 {}, 最大方块 {}",
                moves,
                game.score(),
                game.largest()
            );
        }
    }

    info!(
        "对局结束: 得分 {}, 最大方块 {}, 共 {} 步, 历史最高 {}",
        game.score(),
        game.largest(),
        moves,
        best_score
    );
    info!("终局棋盘:\n{}", game.grid());

    Ok(())
}

/// 解析位置参数: [expectimax|minimax] [深度] [随机种子]
fn parse_args() -> Result<(AiConfig, Option<u64>)> {
    let mut args = std::env::args().skip(1);

    let algorithm = match args.next() {
        Some(name) => match Algorithm::from_name(&name) {
            Some(algorithm) => algorithm,
            None => anyhow::bail!("未知算法: {} (可选 expectimax / minimax)", name),
        },
        None => Algorithm::Expectimax,
    };
    let depth_limit = match args.next() {
        Some(raw) => raw
            .parse::<u8>()
            .with_context(|| format!("深度须为非负整数: {}", raw))?,
        None => DEFAULT_DEPTH_LIMIT,
    };
    let seed = match args.next() {
        Some(raw) => Some(
            raw.parse::<u64>()
                .with_context(|| format!("随机种子须为整数: {}", raw))?,
        ),
        None => None,
    };

    Ok((
        AiConfig {
            algorithm,
            depth_limit,
        },
        seed,
    ))
}
