use crate::models::question::{QuestionId, SubjectId};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// 作答记录
///
/// 每个 (学习者, 题目) 只保留一条逻辑记录，重复提交时覆盖答案、对错和时间
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ResponseRecord {
    pub question_id: QuestionId,
    pub subject_id: SubjectId,
    pub answer: String,
    pub correct: bool,
    pub answered_at: DateTime<Utc>,
}

impl ResponseRecord {
    pub fn new(
        subject_id: impl Into<SubjectId>,
        question_id: impl Into<QuestionId>,
        answer: impl Into<String>,
        correct: bool,
        answered_at: DateTime<Utc>,
    ) -> Self {
        Self {
            question_id: question_id.into(),
            subject_id: subject_id.into(),
            answer: answer.into(),
            correct,
            answered_at,
        }
    }

    /// upsert 使用的唯一键
    pub fn key(&self) -> (SubjectId, QuestionId) {
        (self.subject_id.clone(), self.question_id.clone())
    }
}

/// 作答历史文件
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ResponseLog {
    #[serde(default, rename = "response")]
    pub responses: Vec<ResponseRecord>,
}
