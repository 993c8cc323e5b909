//! 编排层（Orchestration Layer）
//!
//! ## 职责
//!
//! 本层负责批量处理和流程调度，只做调度和统计，不做具体业务判断。
//!
//! ## 模块划分
//!
//! ### `batch_processor` - 批量练习处理器
//! - 加载题库和作答历史
//! - 控制并发数量（Semaphore）
//! - 输出全局统计信息
//!
//! ### `session_processor` - 单个学习者处理器
//! - 构建 `SessionCtx`
//! - 委托 `SessionFlow` 生成练习
//!
//! ## 层次关系
//!
//! ```text
//! batch_processor (处理 Vec<SubjectId>)
//!     ↓
//! session_processor (处理单个学习者)
//!     ↓
//! workflow::SessionFlow (画像 → 水平 → 配比 → 选题)
//!     ↓
//! services (能力层：grader / aggregator / classifier / allocator / ranker)
//!     ↓
//! infrastructure (基础设施：题库仓库、作答存储)
//! ```

pub mod batch_processor;
pub mod session_processor;

// 重新导出主要类型
pub use batch_processor::App;
pub use session_processor::process_subject;
