//! 基础设施层
//!
//! 外部协作方的接口（题库、作答记录）及其内存实现，以及调用方持有的快照缓存

pub mod analytics_cache;
pub mod question_repository;
pub mod response_store;

pub use analytics_cache::AnalyticsCache;
pub use question_repository::{InMemoryQuestionRepository, QuestionRepository};
pub use response_store::{InMemoryResponseStore, ResponseStore};
