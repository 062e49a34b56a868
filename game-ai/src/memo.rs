//! 搜索记忆表
//!
//! 以棋面指纹为键缓存期望搜索的结果，同一轮搜索内重复出现的棋面
//! 直接复用。每次顶层搜索开始时整表清空。

use std::collections::HashMap;

use crate::search::SearchResult;

/// 记忆表
#[derive(Debug, Default)]
pub struct MemoTable {
    entries: HashMap<u64, SearchResult>,
    lookups: u64,
    hits: u64,
}

impl MemoTable {
    /// 创建空记忆表
    pub fn new() -> Self {
        Self::default()
    }

    /// 查询指纹对应的缓存结果
    pub fn lookup(&mut self, key: u64) -> Option<SearchResult> {
        self.lookups += 1;
        let entry = self.entries.get(&key).copied();
        if entry.is_some() {
            self.hits += 1;
        }
        entry
    }

    /// 写入结果，同一指纹后写覆盖
    pub fn store(&mut self, key: u64, result: SearchResult) {
        self.entries.insert(key, result);
    }

    /// 清空条目与统计
    pub fn clear(&mut self) {
        self.entries.clear();
        self.lookups = 0;
        self.hits = 0;
    }

    /// 条目数量
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// 是否为空
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// 查询次数
    pub fn lookups(&self) -> u64 {
        self.lookups
    }

    /// 命中次数
    pub fn hits(&self) -> u64 {
        self.hits
    }

    /// 命中率
    pub fn hit_rate(&self) -> f64 {
        if self.lookups == 0 {
            0.0
        } else {
            self.hits as f64 / self.lookups as f64
        }
    }
}
