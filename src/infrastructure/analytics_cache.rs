//! 学习者快照缓存
//!
//! 由调用方持有并显式传入，带过期时间和显式失效，不存在跨请求的隐藏全局状态

use crate::models::profile::LearnerSnapshot;
use crate::models::question::{LectureId, SubjectId};
use chrono::{DateTime, Duration, Utc};
use std::collections::HashMap;
use tracing::debug;

/// 缓存键：同一学习者在不同课程下的画像互不相同
pub type SnapshotKey = (SubjectId, LectureId);

/// 学习者快照缓存
#[derive(Debug, Clone)]
pub struct AnalyticsCache {
    ttl: Duration,
    entries: HashMap<SnapshotKey, LearnerSnapshot>,
}

impl AnalyticsCache {
    pub fn new(ttl: Duration) -> Self {
        Self {
            ttl,
            entries: HashMap::new(),
        }
    }

    /// 以秒为单位创建
    pub fn with_ttl_secs(secs: u64) -> Self {
        let secs = i64::try_from(secs).unwrap_or(i64::MAX).min(i64::MAX / 1_000);
        Self::new(Duration::seconds(secs))
    }

    pub fn ttl(&self) -> Duration {
        self.ttl
    }

    /// 读取未过期的快照
    pub fn get(
        &self,
        subject_id: &SubjectId,
        lecture_id: &LectureId,
        now: DateTime<Utc>,
    ) -> Option<&LearnerSnapshot> {
        let key = (subject_id.clone(), lecture_id.clone());
        self.entries
            .get(&key)
            .filter(|snapshot| now - snapshot.computed_at < self.ttl)
    }

    pub fn insert(&mut self, lecture_id: &LectureId, snapshot: LearnerSnapshot) {
        let key = (snapshot.subject_id.clone(), lecture_id.clone());
        self.entries.insert(key, snapshot);
    }

    /// 使某个学习者的全部快照失效（新的作答提交后调用）
    pub fn invalidate_subject(&mut self, subject_id: &SubjectId) -> usize {
        let before = self.entries.len();
        self.entries.retain(|(s, _), _| s != subject_id);
        let removed = before - self.entries.len();
        if removed > 0 {
            debug!("学习者 {} 的 {} 个快照已失效", subject_id, removed);
        }
        removed
    }

    /// 清空缓存
    pub fn clear(&mut self) {
        self.entries.clear();
    }

    /// 清理过期条目，返回清理数量
    pub fn purge_expired(&mut self, now: DateTime<Utc>) -> usize {
        let before = self.entries.len();
        let ttl = self.ttl;
        self.entries
            .retain(|_, snapshot| now - snapshot.computed_at < ttl);
        before - self.entries.len()
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}
