//! # Adaptive Quiz
//!
//! 自适应练习引擎：判分、学习画像、水平分级、难度配比与选题
//!
//! ## 架构设计
//!
//! 本系统采用四层架构：
//!
//! ### ① 基础设施层（Infrastructure）
//! - `infrastructure/` - 题库仓库、作答存储的接口和内存实现
//! - `AnalyticsCache` - 由调用方持有的学习者快照缓存
//!
//! ### ② 业务能力层（Services）
//! - `services/` - 无副作用的纯函数
//! - `Grader` - 答案判分
//! - `aggregate` - 作答记录 → 学习画像
//! - `classify` - 学习画像 → 学习水平
//! - `allocate` - 学习水平 + 画像 → 难度配比
//! - `Ranker` - 打分并按配额选题
//!
//! ### ③ 流程层（Workflow）
//! - `SubmissionFlow` - 判分 → 写入 → 缓存失效
//! - `SessionFlow` - 为一位学习者生成一次练习
//! - `AnalyticsFlow` - 只读的学情快照和题目报表
//!
//! ### ④ 编排层（Orchestration）
//! - `orchestrator/batch_processor` - 批量处理所有学习者，管理并发
//! - `orchestrator/session_processor` - 单个学习者的练习生成
//!
//! ## 模块结构

pub mod config;
pub mod error;
pub mod infrastructure;

pub mod models;
pub mod orchestrator;
pub mod services;
pub mod utils;
pub mod workflow;

// 重新导出常用类型
pub use config::Config;
pub use error::{AppError, AppResult};
pub use models::{
    AnswerKind, Difficulty, DifficultyAllocation, LearningLevel, PerformanceProfile,
    QuestionItem, ResponseRecord, SelectionResult,
};
pub use orchestrator::App;
pub use services::{aggregate, allocate, classify, grade, select};
pub use workflow::{AnalyticsFlow, SessionCtx, SessionFlow, SubmissionFlow};
