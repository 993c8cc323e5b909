//! 练习生成上下文
//!
//! 封装"为哪位学习者、在哪个课程、生成几道题"这一信息

use crate::error::{AppResult, InputError};
use crate::models::question::{LectureId, SubjectId};
use std::fmt::Display;

/// 练习生成上下文
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SessionCtx {
    /// 学习者ID
    pub subject_id: SubjectId,

    /// 课程ID
    pub lecture_id: LectureId,

    /// 请求的题目数量
    pub requested_count: usize,

    /// 序号（仅用于日志显示）
    pub session_index: usize,
}

impl SessionCtx {
    /// 创建新的练习上下文
    ///
    /// 请求数量来自外部输入，为负时返回 `InvalidInput`
    pub fn new(
        subject_id: impl Into<SubjectId>,
        lecture_id: impl Into<LectureId>,
        requested_count: i64,
    ) -> AppResult<Self> {
        let requested_count = usize::try_from(requested_count).map_err(|_| {
            InputError::NegativeRequestedCount {
                count: requested_count,
            }
        })?;

        Ok(Self {
            subject_id: subject_id.into(),
            lecture_id: lecture_id.into(),
            requested_count,
            session_index: 0,
        })
    }

    /// 设置日志序号
    pub fn with_index(mut self, session_index: usize) -> Self {
        self.session_index = session_index;
        self
    }
}

impl Display for SessionCtx {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "[练习 #{} 学习者 {} 课程 {} 题量 {}]",
            self.session_index, self.subject_id, self.lecture_id, self.requested_count
        )
    }
}
