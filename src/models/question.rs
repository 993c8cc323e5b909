use serde::{Deserialize, Serialize};
use std::fmt;

/// 定义一个字符串 ID 新类型
macro_rules! string_id {
    ($(#[$meta:meta])* $name:ident) => {
        $(#[$meta])*
        #[derive(
            Debug, Clone, Default, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize,
        )]
        #[serde(transparent)]
        pub struct $name(String);

        impl $name {
            pub fn new(id: impl Into<String>) -> Self {
                Self(id.into())
            }

            pub fn as_str(&self) -> &str {
                &self.0
            }
        }

        impl fmt::Display for $name {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                f.write_str(&self.0)
            }
        }

        impl From<&str> for $name {
            fn from(id: &str) -> Self {
                Self(id.to_string())
            }
        }

        impl From<String> for $name {
            fn from(id: String) -> Self {
                Self(id)
            }
        }
    };
}

string_id!(
    /// 题目 ID
    QuestionId
);
string_id!(
    /// 学习者 ID（不透明、稳定的标识，认证在外部完成）
    SubjectId
);
string_id!(
    /// 课程 / 单元 ID
    LectureId
);

/// 难度等级
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Difficulty {
    Easy,
    Medium,
    Hard,
}

impl Difficulty {
    /// 所有难度，按从易到难排列
    pub const ALL: [Difficulty; 3] = [Difficulty::Easy, Difficulty::Medium, Difficulty::Hard];

    /// 获取标准名称
    pub fn name(self) -> &'static str {
        match self {
            Difficulty::Easy => "easy",
            Difficulty::Medium => "medium",
            Difficulty::Hard => "hard",
        }
    }
}

impl fmt::Display for Difficulty {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.name())
    }
}

/// 题型
///
/// 选择题和问答题的判分方式不同，使用带标签的枚举让判分分派在编译期穷尽
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum QuestionKind {
    /// 选择题：固定选项集合
    ClosedForm {
        options: Vec<String>,
        correct_index: usize,
    },
    /// 问答题：自由文本，模糊匹配标准答案
    OpenForm { canonical_answer: String },
}

impl QuestionKind {
    /// 判分时使用的答案类型
    pub fn answer_kind(&self) -> AnswerKind {
        match self {
            QuestionKind::ClosedForm { .. } => AnswerKind::ClosedForm,
            QuestionKind::OpenForm { .. } => AnswerKind::OpenForm,
        }
    }
}

/// 判分时的答案类型（不携带选项数据）
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum AnswerKind {
    ClosedForm,
    OpenForm,
}

/// 题目
///
/// 创建后不可变，只能由外部的编辑流程修改
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct QuestionItem {
    pub id: QuestionId,
    #[serde(default)]
    pub lecture_id: LectureId,
    pub prompt: String,
    #[serde(flatten)]
    pub kind: QuestionKind,
    pub difficulty: Difficulty,
    #[serde(default = "default_published")]
    pub published: bool,
}

fn default_published() -> bool {
    true
}

impl QuestionItem {
    /// 创建问答题
    pub fn open_form(
        id: impl Into<QuestionId>,
        lecture_id: impl Into<LectureId>,
        prompt: impl Into<String>,
        canonical_answer: impl Into<String>,
        difficulty: Difficulty,
    ) -> Self {
        Self {
            id: id.into(),
            lecture_id: lecture_id.into(),
            prompt: prompt.into(),
            kind: QuestionKind::OpenForm {
                canonical_answer: canonical_answer.into(),
            },
            difficulty,
            published: true,
        }
    }

    /// 创建选择题
    pub fn closed_form(
        id: impl Into<QuestionId>,
        lecture_id: impl Into<LectureId>,
        prompt: impl Into<String>,
        options: Vec<String>,
        correct_index: usize,
        difficulty: Difficulty,
    ) -> Self {
        Self {
            id: id.into(),
            lecture_id: lecture_id.into(),
            prompt: prompt.into(),
            kind: QuestionKind::ClosedForm {
                options,
                correct_index,
            },
            difficulty,
            published: true,
        }
    }

    /// 设置发布状态
    pub fn with_published(mut self, published: bool) -> Self {
        self.published = published;
        self
    }
}

/// 题库文件（一个课程的全部题目）
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct QuestionBank {
    pub lecture_id: LectureId,
    #[serde(default)]
    pub name: String,
    #[serde(default, rename = "question")]
    pub questions: Vec<QuestionItem>,
    #[serde(skip)]
    pub file_path: Option<String>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_question_kind_toml_shape() {
        let raw = r#"
            lecture_id = "L1"

            [[question]]
            id = "q1"
            lecture_id = "L1"
            prompt = "1 + 1 = ?"
            type = "closed_form"
            options = ["1", "2", "3"]
            correct_index = 1
            difficulty = "easy"

            [[question]]
            id = "q2"
            lecture_id = "L1"
            prompt = "什么是所有权？"
            type = "open_form"
            canonical_answer = "每个值都有唯一的所有者"
            difficulty = "hard"
            published = false
        "#;
        let bank: QuestionBank = toml::from_str(raw).unwrap();
        assert_eq!(bank.questions.len(), 2);
        assert_eq!(bank.questions[0].kind.answer_kind(), AnswerKind::ClosedForm);
        assert!(bank.questions[0].published);
        assert_eq!(bank.questions[1].difficulty, Difficulty::Hard);
        assert!(!bank.questions[1].published);
    }
}
