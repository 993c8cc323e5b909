//! 派生数据：学习画像、学习水平、难度配比、选题结果
//!
//! 这些类型都可以随时从作答记录重新计算，不是数据源

use crate::error::{AppResult, InputError};
use crate::models::question::{Difficulty, QuestionId, SubjectId};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::fmt;

/// 计算正确率，尝试次数为 0 时返回 0
pub(crate) fn ratio(correct: u32, attempts: u32) -> f64 {
    if attempts == 0 {
        0.0
    } else {
        f64::from(correct) / f64::from(attempts)
    }
}

/// 单个难度的统计
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct TierStats {
    pub attempts: u32,
    pub correct: u32,
    pub accuracy: f64,
}

impl TierStats {
    pub fn new(attempts: u32, correct: u32) -> Self {
        Self {
            attempts,
            correct,
            accuracy: ratio(correct, attempts),
        }
    }

    pub(crate) fn record(&mut self, correct: bool) {
        self.attempts += 1;
        if correct {
            self.correct += 1;
        }
        self.accuracy = ratio(self.correct, self.attempts);
    }
}

/// 单道题的统计
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct QuestionStats {
    pub attempts: u32,
    pub correct: u32,
    pub accuracy: f64,
    pub last_attempt_at: DateTime<Utc>,
}

impl QuestionStats {
    pub fn new(attempts: u32, correct: u32, last_attempt_at: DateTime<Utc>) -> Self {
        Self {
            attempts,
            correct,
            accuracy: ratio(correct, attempts),
            last_attempt_at,
        }
    }

    pub(crate) fn record(&mut self, correct: bool, at: DateTime<Utc>) {
        self.attempts += 1;
        if correct {
            self.correct += 1;
        }
        self.accuracy = ratio(self.correct, self.attempts);
        if at > self.last_attempt_at {
            self.last_attempt_at = at;
        }
    }
}

/// 学习画像
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct PerformanceProfile {
    pub easy: TierStats,
    pub medium: TierStats,
    pub hard: TierStats,
    #[serde(default)]
    pub questions: HashMap<QuestionId, QuestionStats>,
}

impl PerformanceProfile {
    pub fn tier(&self, difficulty: Difficulty) -> &TierStats {
        match difficulty {
            Difficulty::Easy => &self.easy,
            Difficulty::Medium => &self.medium,
            Difficulty::Hard => &self.hard,
        }
    }

    pub(crate) fn tier_mut(&mut self, difficulty: Difficulty) -> &mut TierStats {
        match difficulty {
            Difficulty::Easy => &mut self.easy,
            Difficulty::Medium => &mut self.medium,
            Difficulty::Hard => &mut self.hard,
        }
    }

    /// 总尝试次数
    pub fn total_attempts(&self) -> u32 {
        self.easy.attempts + self.medium.attempts + self.hard.attempts
    }

    /// 是否冷启动（没有任何作答）
    pub fn is_cold_start(&self) -> bool {
        self.total_attempts() == 0
    }
}

/// 学习水平
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum LearningLevel {
    Beginner,
    Intermediate,
    Advanced,
}

impl LearningLevel {
    pub fn name(self) -> &'static str {
        match self {
            LearningLevel::Beginner => "beginner",
            LearningLevel::Intermediate => "intermediate",
            LearningLevel::Advanced => "advanced",
        }
    }
}

impl fmt::Display for LearningLevel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.name())
    }
}

/// 难度配比
///
/// 三项比例之和恒为 1，任何调整后都会重新归一化
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct DifficultyAllocation {
    easy: f64,
    medium: f64,
    hard: f64,
}

impl DifficultyAllocation {
    /// 校验并归一化调用方给出的配比
    ///
    /// 任一比例为负、大于 1 或不是有限数时返回 `InvalidInput`
    pub fn new(easy: f64, medium: f64, hard: f64) -> AppResult<Self> {
        for (tier, value) in [("easy", easy), ("medium", medium), ("hard", hard)] {
            if !value.is_finite() || !(0.0..=1.0).contains(&value) {
                return Err(InputError::FractionOutOfRange { tier, value }.into());
            }
        }
        if easy + medium + hard <= 0.0 {
            return Err(InputError::EmptyAllocation.into());
        }
        Ok(Self::normalized(easy, medium, hard))
    }

    /// 归一化，调用方保证输入非负且之和大于 0
    pub(crate) fn normalized(easy: f64, medium: f64, hard: f64) -> Self {
        let sum = easy + medium + hard;
        let easy = easy / sum;
        let medium = medium / sum;
        // 最后一项取余量，消除浮点漂移
        let hard = (1.0 - easy - medium).max(0.0);
        Self { easy, medium, hard }
    }

    pub fn easy(&self) -> f64 {
        self.easy
    }

    pub fn medium(&self) -> f64 {
        self.medium
    }

    pub fn hard(&self) -> f64 {
        self.hard
    }

    pub fn get(&self, difficulty: Difficulty) -> f64 {
        match difficulty {
            Difficulty::Easy => self.easy,
            Difficulty::Medium => self.medium,
            Difficulty::Hard => self.hard,
        }
    }

    pub fn sum(&self) -> f64 {
        self.easy + self.medium + self.hard
    }
}

impl<'de> Deserialize<'de> for DifficultyAllocation {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: serde::Deserializer<'de>,
    {
        #[derive(Deserialize)]
        struct Raw {
            easy: f64,
            medium: f64,
            hard: f64,
        }

        let raw = Raw::deserialize(deserializer)?;
        DifficultyAllocation::new(raw.easy, raw.medium, raw.hard).map_err(serde::de::Error::custom)
    }
}

impl fmt::Display for DifficultyAllocation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "easy {:.2} / medium {:.2} / hard {:.2}",
            self.easy, self.medium, self.hard
        )
    }
}

/// 被选中的题目引用
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SelectedQuestion {
    pub id: QuestionId,
    pub difficulty: Difficulty,
    pub score: f64,
}

/// 选题结果：有序、无重复、长度不超过请求数量
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct SelectionResult {
    pub questions: Vec<SelectedQuestion>,
}

impl SelectionResult {
    pub fn len(&self) -> usize {
        self.questions.len()
    }

    pub fn is_empty(&self) -> bool {
        self.questions.is_empty()
    }

    pub fn ids(&self) -> Vec<&QuestionId> {
        self.questions.iter().map(|q| &q.id).collect()
    }

    /// 各难度的题目数量 (easy, medium, hard)
    pub fn tier_counts(&self) -> (usize, usize, usize) {
        let count = |d: Difficulty| self.questions.iter().filter(|q| q.difficulty == d).count();
        (
            count(Difficulty::Easy),
            count(Difficulty::Medium),
            count(Difficulty::Hard),
        )
    }
}

/// 学习者快照，供报表展示
///
/// 宿主可以持久化它，但核心逻辑从不依赖快照是最新的
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LearnerSnapshot {
    pub subject_id: SubjectId,
    pub profile: PerformanceProfile,
    pub level: LearningLevel,
    pub allocation: DifficultyAllocation,
    pub computed_at: DateTime<Utc>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_ratio_guards_zero_attempts() {
        assert_eq!(ratio(0, 0), 0.0);
        assert_eq!(ratio(3, 4), 0.75);
    }

    #[test]
    fn test_allocation_rejects_out_of_range() {
        assert!(DifficultyAllocation::new(-0.1, 0.6, 0.5)
            .unwrap_err()
            .is_invalid_input());
        assert!(DifficultyAllocation::new(1.2, 0.0, 0.0)
            .unwrap_err()
            .is_invalid_input());
        assert!(DifficultyAllocation::new(f64::NAN, 0.5, 0.5)
            .unwrap_err()
            .is_invalid_input());
        assert!(DifficultyAllocation::new(0.0, 0.0, 0.0)
            .unwrap_err()
            .is_invalid_input());
    }

    #[test]
    fn test_allocation_renormalizes() {
        let allocation = DifficultyAllocation::new(0.5, 0.5, 0.5).unwrap();
        assert!((allocation.sum() - 1.0).abs() < 1e-9);
        assert!((allocation.easy() - 1.0 / 3.0).abs() < 1e-9);
    }

    #[test]
    fn test_allocation_deserialize_validates() {
        let ok: DifficultyAllocation =
            serde_json::from_str(r#"{"easy":0.6,"medium":0.3,"hard":0.1}"#).unwrap();
        assert!((ok.sum() - 1.0).abs() < 1e-9);

        let bad = serde_json::from_str::<DifficultyAllocation>(
            r#"{"easy":2.0,"medium":0.3,"hard":0.1}"#,
        );
        assert!(bad.is_err());
    }

    #[test]
    fn test_selection_tier_counts() {
        let selection = SelectionResult {
            questions: vec![
                SelectedQuestion {
                    id: "a".into(),
                    difficulty: Difficulty::Easy,
                    score: 1.0,
                },
                SelectedQuestion {
                    id: "b".into(),
                    difficulty: Difficulty::Hard,
                    score: 1.0,
                },
            ],
        };
        assert_eq!(selection.tier_counts(), (1, 0, 1));
        assert_eq!(selection.len(), 2);
    }
}
