//! 流程层（Workflow Layer）
//!
//! 把能力层的纯函数串成完整的业务流程，只依赖基础设施层的接口
//!
//! - `submission_flow`：判分并写入作答记录
//! - `session_flow`：为学习者生成一次练习
//! - `analytics_flow`：只读的学情快照和题目报表

pub mod analytics_flow;
pub mod session_ctx;
pub mod session_flow;
pub mod submission_flow;

pub use analytics_flow::{AnalyticsFlow, QuestionReport};
pub use session_ctx::SessionCtx;
pub use session_flow::{SessionFlow, SessionPlan};
pub use submission_flow::{SubmissionFlow, SubmissionOutcome};
