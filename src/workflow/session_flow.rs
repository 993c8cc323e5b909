//! 练习生成流程 - 流程层
//!
//! 核心职责：定义"为一位学习者生成一次练习"的完整流程
//!
//! 流程顺序：
//! 1. 一次性加载课程题目和学习者作答记录
//! 2. 聚合学习画像 → 判断学习水平 → 计算难度配比
//! 3. 只在已发布的题目中按配额选题

use crate::config::Config;
use crate::error::AppResult;
use crate::infrastructure::{QuestionRepository, ResponseStore};
use crate::models::profile::{LearnerSnapshot, SelectionResult};
use crate::models::question::QuestionItem;
use crate::services::Ranker;
use crate::workflow::analytics_flow::compute_snapshot;
use crate::workflow::session_ctx::SessionCtx;
use chrono::{DateTime, Utc};
use serde::Serialize;
use tracing::{debug, info};

/// 一次练习的生成结果
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SessionPlan {
    pub snapshot: LearnerSnapshot,
    pub selection: SelectionResult,
}

/// 练习生成流程
///
/// - 不持有任何存储，只依赖传入的仓库接口
/// - 每次都重新计算画像，不依赖缓存快照
pub struct SessionFlow {
    ranker: Ranker,
    verbose_logging: bool,
}

impl SessionFlow {
    /// 创建新的练习生成流程
    pub fn new(config: &Config) -> Self {
        Self {
            ranker: Ranker::new(config.ranking.clone()),
            verbose_logging: config.verbose_logging,
        }
    }

    pub fn build_session(
        &self,
        questions: &dyn QuestionRepository,
        responses: &dyn ResponseStore,
        ctx: &SessionCtx,
        now: DateTime<Utc>,
    ) -> AppResult<SessionPlan> {
        let lecture_questions = questions.questions_for_lecture(&ctx.lecture_id)?;
        let subject_responses = responses.responses_for_subject(&ctx.subject_id)?;

        let snapshot = compute_snapshot(
            &lecture_questions,
            &subject_responses,
            &ctx.subject_id,
            now,
        )?;
        info!(
            "{} 学习水平: {}，难度配比: {}",
            ctx, snapshot.level, snapshot.allocation
        );

        let candidates: Vec<QuestionItem> = lecture_questions
            .into_iter()
            .filter(|q| q.published)
            .collect();
        debug!("{} 可选题目 {} 道", ctx, candidates.len());

        let selection = self.ranker.select(
            &candidates,
            &snapshot.profile.questions,
            &snapshot.allocation,
            ctx.requested_count,
            now,
        );

        let (easy, medium, hard) = selection.tier_counts();
        info!(
            "{} ✓ 选出 {} 道题 (easy {} / medium {} / hard {})",
            ctx,
            selection.len(),
            easy,
            medium,
            hard
        );

        if self.verbose_logging {
            self.log_selection(ctx, &selection);
        }

        Ok(SessionPlan {
            snapshot,
            selection,
        })
    }

    // ========== 日志辅助方法 ==========

    fn log_selection(&self, ctx: &SessionCtx, selection: &SelectionResult) {
        for (i, q) in selection.questions.iter().enumerate() {
            info!(
                "{}   {}. {} [{}] 分数: {:.2}",
                ctx,
                i + 1,
                q.id,
                q.difficulty,
                q.score
            );
        }
    }
}
