//! 学情分析流程 - 流程层
//!
//! 为报表提供只读的学习画像、学习水平和难度配比，以及题目维度的正确率

use crate::error::AppResult;
use crate::infrastructure::{AnalyticsCache, QuestionRepository, ResponseStore};
use crate::models::profile::LearnerSnapshot;
use crate::models::question::{Difficulty, LectureId, QuestionId, QuestionItem, SubjectId};
use crate::models::response::ResponseRecord;
use crate::services::{aggregate, aggregate_by_question, allocate, classify, QuestionIndex};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use tracing::{debug, warn};

/// 题目维度的统计（跨学习者）
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct QuestionReport {
    pub question_id: QuestionId,
    pub difficulty: Difficulty,
    pub published: bool,
    pub attempts: u32,
    pub correct: u32,
    pub accuracy: f64,
    pub last_attempt_at: Option<DateTime<Utc>>,
}

/// 根据课程题目和学习者作答记录计算快照
///
/// 只统计属于该课程的作答，其他课程的记录被忽略。
/// 没有任何作答时退化为初学者 + 基础配比，不报错。
pub(crate) fn compute_snapshot(
    lecture_questions: &[QuestionItem],
    subject_responses: &[ResponseRecord],
    subject_id: &SubjectId,
    now: DateTime<Utc>,
) -> AppResult<LearnerSnapshot> {
    let index = QuestionIndex::new(lecture_questions.iter().cloned());
    let in_lecture: Vec<ResponseRecord> = subject_responses
        .iter()
        .filter(|r| index.get(&r.question_id).is_some())
        .cloned()
        .collect();
    debug!(
        "学习者 {} 共 {} 条作答，其中 {} 条属于本课程",
        subject_id,
        subject_responses.len(),
        in_lecture.len()
    );

    let profile = aggregate(&in_lecture, &index)?;
    if profile.is_cold_start() {
        warn!("学习者 {} 在本课程没有作答记录，按冷启动处理", subject_id);
    }

    let level = classify(&profile);
    let allocation = allocate(level, &profile);

    Ok(LearnerSnapshot {
        subject_id: subject_id.clone(),
        profile,
        level,
        allocation,
        computed_at: now,
    })
}

/// 学情分析流程
#[derive(Debug, Clone, Default)]
pub struct AnalyticsFlow;

impl AnalyticsFlow {
    pub fn new() -> Self {
        Self
    }

    /// 获取学习者快照，缓存未过期时直接返回缓存
    pub fn snapshot(
        &self,
        questions: &dyn QuestionRepository,
        responses: &dyn ResponseStore,
        subject_id: &SubjectId,
        lecture_id: &LectureId,
        now: DateTime<Utc>,
        cache: &mut AnalyticsCache,
    ) -> AppResult<LearnerSnapshot> {
        if let Some(cached) = cache.get(subject_id, lecture_id, now) {
            debug!("命中快照缓存: {} @ {}", subject_id, lecture_id);
            return Ok(cached.clone());
        }

        let snapshot = self.fresh_snapshot(questions, responses, subject_id, lecture_id, now)?;
        cache.insert(lecture_id, snapshot.clone());
        Ok(snapshot)
    }

    /// 不经过缓存，直接重新计算快照
    pub fn fresh_snapshot(
        &self,
        questions: &dyn QuestionRepository,
        responses: &dyn ResponseStore,
        subject_id: &SubjectId,
        lecture_id: &LectureId,
        now: DateTime<Utc>,
    ) -> AppResult<LearnerSnapshot> {
        let lecture_questions = questions.questions_for_lecture(lecture_id)?;
        let subject_responses = responses.responses_for_subject(subject_id)?;
        compute_snapshot(&lecture_questions, &subject_responses, subject_id, now)
    }

    /// 课程内每道题的跨学习者正确率，按题库顺序排列
    pub fn question_report(
        &self,
        questions: &dyn QuestionRepository,
        responses: &dyn ResponseStore,
        lecture_id: &LectureId,
    ) -> AppResult<Vec<QuestionReport>> {
        let lecture_questions = questions.questions_for_lecture(lecture_id)?;
        let ids: Vec<QuestionId> = lecture_questions.iter().map(|q| q.id.clone()).collect();
        let records = responses.responses_for_questions(&ids)?;

        let index = QuestionIndex::new(lecture_questions.iter().cloned());
        let stats = aggregate_by_question(&records, &index);

        Ok(lecture_questions
            .into_iter()
            .map(|q| {
                let s = stats.get(&q.id);
                QuestionReport {
                    attempts: s.map_or(0, |s| s.attempts),
                    correct: s.map_or(0, |s| s.correct),
                    accuracy: s.map_or(0.0, |s| s.accuracy),
                    last_attempt_at: s.map(|s| s.last_attempt_at),
                    question_id: q.id,
                    difficulty: q.difficulty,
                    published: q.published,
                }
            })
            .collect())
    }
}
