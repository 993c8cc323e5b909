//! 题库仓库
//!
//! 只读：按课程列出题目、按 ID 查找题目

use crate::error::{AppError, AppResult};
use crate::models::question::{LectureId, QuestionBank, QuestionId, QuestionItem};
use std::collections::HashMap;

/// 题库仓库接口
pub trait QuestionRepository: Send + Sync {
    /// 列出课程下的全部题目（包含未发布的），课程不存在时返回 `NotFound`
    fn questions_for_lecture(&self, lecture_id: &LectureId) -> AppResult<Vec<QuestionItem>>;

    /// 按 ID 查找题目，不存在时返回 `NotFound`
    fn question(&self, question_id: &QuestionId) -> AppResult<QuestionItem>;
}

/// 内存题库
///
/// 扁平存储，课程与题目之间只通过 ID 关联
#[derive(Debug, Clone, Default)]
pub struct InMemoryQuestionRepository {
    questions: Vec<QuestionItem>,
    by_id: HashMap<QuestionId, usize>,
    lectures: HashMap<LectureId, Vec<usize>>,
}

impl InMemoryQuestionRepository {
    pub fn new() -> Self {
        Self::default()
    }

    /// 添加题目，ID 重复时覆盖旧题目
    pub fn insert(&mut self, question: QuestionItem) {
        if let Some(&slot) = self.by_id.get(&question.id) {
            let old_lecture = self.questions[slot].lecture_id.clone();
            if old_lecture != question.lecture_id {
                if let Some(slots) = self.lectures.get_mut(&old_lecture) {
                    slots.retain(|&s| s != slot);
                }
                self.lectures
                    .entry(question.lecture_id.clone())
                    .or_default()
                    .push(slot);
            }
            self.questions[slot] = question;
            return;
        }

        let slot = self.questions.len();
        self.by_id.insert(question.id.clone(), slot);
        self.lectures
            .entry(question.lecture_id.clone())
            .or_default()
            .push(slot);
        self.questions.push(question);
    }

    /// 从题库文件构建
    pub fn from_banks(banks: impl IntoIterator<Item = QuestionBank>) -> Self {
        let mut repo = Self::new();
        for bank in banks {
            // 空题库也要登记课程，避免被当成不存在
            repo.lectures.entry(bank.lecture_id.clone()).or_default();
            for question in bank.questions {
                repo.insert(question);
            }
        }
        repo
    }

    pub fn len(&self) -> usize {
        self.questions.len()
    }

    pub fn is_empty(&self) -> bool {
        self.questions.is_empty()
    }
}

impl QuestionRepository for InMemoryQuestionRepository {
    fn questions_for_lecture(&self, lecture_id: &LectureId) -> AppResult<Vec<QuestionItem>> {
        let slots = self
            .lectures
            .get(lecture_id)
            .ok_or_else(|| AppError::lecture_not_found(lecture_id.as_str()))?;
        Ok(slots.iter().map(|&s| self.questions[s].clone()).collect())
    }

    fn question(&self, question_id: &QuestionId) -> AppResult<QuestionItem> {
        self.by_id
            .get(question_id)
            .map(|&s| self.questions[s].clone())
            .ok_or_else(|| AppError::question_not_found(question_id.as_str()))
    }
}
