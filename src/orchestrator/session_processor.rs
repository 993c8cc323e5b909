//! 单个学习者处理器 - 编排层
//!
//! ## 职责
//!
//! 为一位学习者生成一次练习并输出统计。
//!
//! ## 核心功能
//!
//! 1. **构建上下文**：校验请求题量，生成 `SessionCtx`
//! 2. **流程调度**：委托 `SessionFlow` 完成画像、配比和选题
//! 3. **统计输出**：记录各难度的选题数量

use crate::config::Config;
use crate::infrastructure::{QuestionRepository, ResponseStore};
use crate::models::question::SubjectId;
use crate::workflow::{SessionCtx, SessionFlow, SessionPlan};
use anyhow::{Context, Result};
use chrono::{DateTime, Utc};
use tracing::{info, warn};

/// 为单个学习者生成练习
///
/// # 参数
/// - `questions`: 题库仓库
/// - `responses`: 作答记录存储
/// - `subject_id`: 学习者
/// - `subject_index`: 学习者序号（用于日志）
/// - `config`: 配置
/// - `now`: 本批次统一使用的当前时间
///
/// # 返回
/// 选出了至少一道题时返回 `true`
pub fn process_subject(
    questions: &dyn QuestionRepository,
    responses: &dyn ResponseStore,
    subject_id: SubjectId,
    subject_index: usize,
    config: &Config,
    now: DateTime<Utc>,
) -> Result<bool> {
    let requested = i64::try_from(config.session_size).context("练习题量超出范围")?;
    let ctx = SessionCtx::new(subject_id, config.lecture_id.as_str(), requested)?
        .with_index(subject_index);

    info!("{} 开始生成练习", ctx);

    let flow = SessionFlow::new(config);
    let plan = flow
        .build_session(questions, responses, &ctx, now)
        .with_context(|| format!("{} 生成练习失败", ctx))?;

    log_session_complete(&ctx, &plan);

    if plan.selection.is_empty() {
        warn!("{} ⚠️ 没有可选的题目", ctx);
        return Ok(false);
    }
    Ok(true)
}

// ========== 日志辅助函数 ==========

fn log_session_complete(ctx: &SessionCtx, plan: &SessionPlan) {
    let (easy, medium, hard) = plan.selection.tier_counts();
    info!(
        "{} 题目统计: 简单 {}, 中等 {}, 困难 {}, 总计 {}",
        ctx,
        easy,
        medium,
        hard,
        plan.selection.len()
    );
    info!(
        "{} 题目列表: {}",
        ctx,
        plan.selection
            .ids()
            .iter()
            .map(|id| id.as_str())
            .collect::<Vec<_>>()
            .join(", ")
    );
    info!("{} ✅ 练习生成完成", ctx);
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::infrastructure::{InMemoryQuestionRepository, InMemoryResponseStore};
    use crate::models::question::{Difficulty, QuestionItem};

    #[test]
    fn test_process_subject_reports_selection() {
        let mut repo = InMemoryQuestionRepository::new();
        repo.insert(QuestionItem::open_form("e1", "rust-101", "?", "a", Difficulty::Easy));
        let store = InMemoryResponseStore::new();

        let ok = process_subject(&repo, &store, "s".into(), 1, &Config::default(), Utc::now())
            .unwrap();
        assert!(ok);
    }

    #[test]
    fn test_empty_lecture_is_not_a_failure() {
        let repo = InMemoryQuestionRepository::from_banks(vec![crate::models::QuestionBank {
            lecture_id: "rust-101".into(),
            ..Default::default()
        }]);
        let store = InMemoryResponseStore::new();

        let ok = process_subject(&repo, &store, "s".into(), 1, &Config::default(), Utc::now())
            .unwrap();
        assert!(!ok);
    }
}
