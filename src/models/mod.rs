pub mod loaders;
pub mod profile;
pub mod question;
pub mod response;

pub use loaders::{load_all_question_banks, load_question_bank, load_response_log};
pub use profile::{
    DifficultyAllocation, LearnerSnapshot, LearningLevel, PerformanceProfile, QuestionStats,
    SelectedQuestion, SelectionResult, TierStats,
};
pub use question::{
    AnswerKind, Difficulty, LectureId, QuestionBank, QuestionId, QuestionItem, QuestionKind,
    SubjectId,
};
pub use response::{ResponseLog, ResponseRecord};
