use std::collections::VecDeque;
use std::sync::{Arc, Mutex};

use chrono::{DateTime, Utc};
use tracing::debug;

use crate::errors::{PopupError, PopupResult};

/// 搜索历史记录器（外部协作方）
///
/// 隐藏弹出窗口时调用，写入失败不会阻止隐藏。
pub trait HistoryRecorder {
    fn record(&mut self, term: &str) -> PopupResult<()>;
}

impl<T: HistoryRecorder + ?Sized> HistoryRecorder for Arc<Mutex<T>> {
    fn record(&mut self, term: &str) -> PopupResult<()> {
        self.lock()
            .map_err(|_| PopupError::History("历史记录锁已损坏".to_string()))?
            .record(term)
    }
}

/// 历史条目
#[derive(Debug, Clone, PartialEq)]
pub struct HistoryEntry {
    pub term: String,
    pub recorded_at: DateTime<Utc>,
}

/// 内存中的只追加搜索历史
#[derive(Debug, Clone)]
pub struct SearchHistory {
    entries: VecDeque<HistoryEntry>,
    limit: usize,
}

impl SearchHistory {
    pub fn new(limit: usize) -> Self {
        Self {
            entries: VecDeque::new(),
            limit,
        }
    }

    /// 按时间先后排列的全部条目
    pub fn entries(&self) -> impl Iterator<Item = &HistoryEntry> {
        self.entries.iter()
    }

    /// 最近一次记录的搜索词
    pub fn latest(&self) -> Option<&str> {
        self.entries.back().map(|entry| entry.term.as_str())
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

impl Default for SearchHistory {
    fn default() -> Self {
        Self::new(100)
    }
}

impl HistoryRecorder for SearchHistory {
    fn record(&mut self, term: &str) -> PopupResult<()> {
        let term = term.trim();
        // 空搜索词和连续重复的搜索词不记录
        if term.is_empty() || self.latest() == Some(term) {
            return Ok(());
        }

        self.entries.push_back(HistoryEntry {
            term: term.to_string(),
            recorded_at: Utc::now(),
        });

        while self.entries.len() > self.limit {
            self.entries.pop_front();
        }

        debug!("记录搜索历史: {} (共 {} 条)", term, self.entries.len());
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_skips_empty_and_repeated_terms() {
        let mut history = SearchHistory::new(10);
        history.record("").unwrap();
        history.record("   ").unwrap();
        history.record("report.pdf").unwrap();
        history.record("report.pdf").unwrap();
        history.record("*.rs").unwrap();
        history.record("report.pdf").unwrap();

        let terms: Vec<_> = history.entries().map(|e| e.term.as_str()).collect();
        assert_eq!(terms, vec!["report.pdf", "*.rs", "report.pdf"]);
    }

    #[test]
    fn test_evicts_oldest_beyond_limit() {
        let mut history = SearchHistory::new(2);
        for term in ["a", "b", "c"] {
            history.record(term).unwrap();
        }

        assert_eq!(history.len(), 2);
        assert_eq!(history.entries().next().map(|e| e.term.as_str()), Some("b"));
        assert_eq!(history.latest(), Some("c"));
    }

    #[test]
    fn test_shared_recorder() {
        let shared = Arc::new(Mutex::new(SearchHistory::new(5)));
        let mut recorder: Box<dyn HistoryRecorder> = Box::new(shared.clone());
        recorder.record("invoice").unwrap();

        assert_eq!(shared.lock().unwrap().latest(), Some("invoice"));
    }
}
