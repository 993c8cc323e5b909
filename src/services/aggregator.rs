//! 学习画像聚合服务 - 业务能力层
//!
//! 单次遍历作答记录，按难度和按题目累计统计。
//! 题目必须预先加载成索引，不允许逐条记录回查题库。

use crate::error::{AppError, AppResult};
use crate::models::profile::{PerformanceProfile, QuestionStats};
use crate::models::question::{Difficulty, QuestionId, QuestionItem};
use crate::models::response::ResponseRecord;
use std::collections::HashMap;

/// 题目索引：按 ID 查找题目
///
/// 一次性从预加载的题目集合构建，聚合时只做内存查找
#[derive(Debug, Clone, Default)]
pub struct QuestionIndex {
    by_id: HashMap<QuestionId, QuestionItem>,
}

impl QuestionIndex {
    pub fn new(questions: impl IntoIterator<Item = QuestionItem>) -> Self {
        Self {
            by_id: questions.into_iter().map(|q| (q.id.clone(), q)).collect(),
        }
    }

    pub fn get(&self, id: &QuestionId) -> Option<&QuestionItem> {
        self.by_id.get(id)
    }

    pub fn difficulty_of(&self, id: &QuestionId) -> AppResult<Difficulty> {
        self.get(id)
            .map(|q| q.difficulty)
            .ok_or_else(|| AppError::question_not_found(id.as_str()))
    }

    pub fn len(&self) -> usize {
        self.by_id.len()
    }

    pub fn is_empty(&self) -> bool {
        self.by_id.is_empty()
    }

    pub fn ids(&self) -> Vec<QuestionId> {
        self.by_id.keys().cloned().collect()
    }
}

impl From<HashMap<QuestionId, QuestionItem>> for QuestionIndex {
    fn from(by_id: HashMap<QuestionId, QuestionItem>) -> Self {
        Self { by_id }
    }
}

/// 聚合一个学习者的作答记录
///
/// 作答记录引用了索引中不存在的题目时返回 `NotFound`
pub fn aggregate(
    responses: &[ResponseRecord],
    questions: &QuestionIndex,
) -> AppResult<PerformanceProfile> {
    let mut profile = PerformanceProfile::default();

    for response in responses {
        let difficulty = questions.difficulty_of(&response.question_id)?;
        profile.tier_mut(difficulty).record(response.correct);

        profile
            .questions
            .entry(response.question_id.clone())
            .and_modify(|stats| stats.record(response.correct, response.answered_at))
            .or_insert_with(|| {
                QuestionStats::new(1, u32::from(response.correct), response.answered_at)
            });
    }

    Ok(profile)
}

/// 跨学习者按题目聚合，用于题目难度报表
///
/// 不在索引中的题目被忽略（报表只关心给定的题目集合）
pub fn aggregate_by_question(
    responses: &[ResponseRecord],
    questions: &QuestionIndex,
) -> HashMap<QuestionId, QuestionStats> {
    let mut stats: HashMap<QuestionId, QuestionStats> = HashMap::new();
    for response in responses
        .iter()
        .filter(|r| questions.get(&r.question_id).is_some())
    {
        stats
            .entry(response.question_id.clone())
            .and_modify(|s| s.record(response.correct, response.answered_at))
            .or_insert_with(|| {
                QuestionStats::new(1, u32::from(response.correct), response.answered_at)
            });
    }
    stats
}
