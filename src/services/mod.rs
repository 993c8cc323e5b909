pub mod aggregator;
pub mod allocator;
pub mod classifier;
pub mod grader;
pub mod normalizer;
pub mod ranker;

pub use aggregator::{aggregate, aggregate_by_question, QuestionIndex};
pub use allocator::allocate;
pub use classifier::classify;
pub use grader::{grade, GradeOutcome, Grader};
pub use normalizer::Normalizer;
pub use ranker::{select, Ranker};
