//! 作答提交流程 - 流程层
//!
//! 判分 → 写入作答记录 → 使该学习者的快照缓存失效

use crate::config::GradingConfig;
use crate::error::AppResult;
use crate::infrastructure::{AnalyticsCache, QuestionRepository, ResponseStore};
use crate::models::question::{QuestionId, SubjectId};
use crate::models::response::ResponseRecord;
use crate::services::Grader;
use crate::utils::logging::truncate_text;
use chrono::{DateTime, Utc};
use tracing::{info, warn};

/// 一次提交的结果
#[derive(Debug, Clone, PartialEq)]
pub struct SubmissionOutcome {
    /// 写入存储的作答记录
    pub record: ResponseRecord,
    /// 是否覆盖了该学习者对这道题的旧作答
    pub resubmission: bool,
}

impl SubmissionOutcome {
    pub fn is_correct(&self) -> bool {
        self.record.correct
    }
}

/// 作答提交流程
pub struct SubmissionFlow {
    grader: Grader,
}

impl SubmissionFlow {
    /// 创建新的提交流程
    pub fn new(config: GradingConfig) -> AppResult<Self> {
        Ok(Self {
            grader: Grader::new(config)?,
        })
    }

    /// 提交一份作答
    ///
    /// 题目不存在时返回 `NotFound`，不写入任何记录。
    /// 同一学习者重复作答同一道题时覆盖旧记录。
    #[allow(clippy::too_many_arguments)]
    pub fn submit(
        &self,
        questions: &dyn QuestionRepository,
        responses: &dyn ResponseStore,
        subject_id: &SubjectId,
        question_id: &QuestionId,
        answer: &str,
        now: DateTime<Utc>,
        cache: Option<&mut AnalyticsCache>,
    ) -> AppResult<SubmissionOutcome> {
        let question = questions.question(question_id)?;
        if !question.published {
            warn!("⚠️ 题目 {} 尚未发布，仍然接受学习者 {} 的作答", question_id, subject_id);
        }

        let correct = self.grader.grade_question(&question, answer)?;
        let record = ResponseRecord::new(
            subject_id.clone(),
            question_id.clone(),
            answer,
            correct,
            now,
        );

        let previous = responses.upsert(record.clone())?;
        info!(
            "学习者 {} 作答题目 {}: \"{}\" → {}",
            subject_id,
            question_id,
            truncate_text(answer, 30),
            if correct { "✓ 正确" } else { "✗ 错误" }
        );

        if let Some(cache) = cache {
            cache.invalidate_subject(subject_id);
        }

        Ok(SubmissionOutcome {
            record,
            resubmission: previous.is_some(),
        })
    }
}
