//! 本地对局存储
//!
//! 把进行中的对局与历史最高分落盘到平台数据目录，下次启动时续局

use std::fs;
use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use chrono::{DateTime, Utc};
use engine::GameSnapshot;
use serde::{Deserialize, Serialize};

const GAME_STATE_FILE: &str = "game_state.json";
const BEST_SCORE_FILE: &str = "best_score.json";

/// 保存的对局
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SavedGame {
    /// 保存时间
    pub saved_at: DateTime<Utc>,
    /// 对局快照
    pub game: GameSnapshot,
}

/// 存储管理器
pub struct StorageManager {
    data_dir: PathBuf,
}

impl StorageManager {
    /// 创建存储管理器，目录不存在时先建好
    pub fn new() -> Result<Self> {
        Self::with_dir(default_data_directory()?)
    }

    /// 用指定目录创建（测试用）
    pub fn with_dir(data_dir: impl Into<PathBuf>) -> Result<Self> {
        let data_dir = data_dir.into();

        if !data_dir.exists() {
            fs::create_dir_all(&data_dir)
                .with_context(|| format!("无法创建存储目录: {:?}", data_dir))?;
        }

        Ok(Self { data_dir })
    }

    /// 读取保存的对局，没有存档时返回 Ok(None)
    pub fn load_game(&self) -> Result<Option<SavedGame>> {
        let filepath = self.data_dir.join(GAME_STATE_FILE);

        if !filepath.exists() {
            return Ok(None);
        }

        let content = fs::read_to_string(&filepath)
            .with_context(|| format!("读取存档失败: {:?}", filepath))?;
        let saved = serde_json::from_str(&content).context("解析存档失败")?;

        Ok(Some(saved))
    }

    /// 保存当前对局
    pub fn save_game(&self, game: &GameSnapshot) -> Result<()> {
        let saved = SavedGame {
            saved_at: Utc::now(),
            game: game.clone(),
        };

        let filepath = self.data_dir.join(GAME_STATE_FILE);
        let content = serde_json::to_string_pretty(&saved).context("序列化存档失败")?;
        fs::write(&filepath, content)
            .with_context(|| format!("写入存档失败: {:?}", filepath))?;

        Ok(())
    }

    /// 删除存档
    pub fn clear_game(&self) -> Result<()> {
        let filepath = self.data_dir.join(GAME_STATE_FILE);

        if filepath.exists() {
            fs::remove_file(&filepath)
                .with_context(|| format!("删除存档失败: {:?}", filepath))?;
        }

        Ok(())
    }

    /// 历史最高分，没有记录或记录损坏时按 0 处理
    pub fn best_score(&self) -> u32 {
        let filepath = self.data_dir.join(BEST_SCORE_FILE);

        fs::read_to_string(&filepath)
            .ok()
            .and_then(|content| serde_json::from_str(&content).ok())
            .unwrap_or(0)
    }

    /// 更新历史最高分
    pub fn set_best_score(&self, score: u32) -> Result<()> {
        let filepath = self.data_dir.join(BEST_SCORE_FILE);
        let content = serde_json::to_string(&score).context("序列化最高分失败")?;

        fs::write(&filepath, content)
            .with_context(|| format!("写入最高分失败: {:?}", filepath))?;

        Ok(())
    }

    /// 存储目录路径
    pub fn data_directory(&self) -> &Path {
        &self.data_dir
    }
}

/// 平台数据目录下的应用子目录
fn default_data_directory() -> Result<PathBuf> {
    let base = dirs::data_dir().context("无法获取应用数据目录")?;

    Ok(base.join("auto-2048"))
}
