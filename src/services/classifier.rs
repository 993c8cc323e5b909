//! 学习水平分级
//!
//! 规则按顺序判断，第一个命中的规则生效

use crate::models::profile::{LearningLevel, PerformanceProfile};

/// 简单题正确率低于此值 → 初学者
pub const BEGINNER_EASY_ACCURACY: f64 = 0.70;
/// 做过中等题且正确率低于此值 → 初学者
pub const BEGINNER_MEDIUM_ACCURACY: f64 = 0.30;
/// 进阶所需的中等题正确率
pub const ADVANCED_MEDIUM_ACCURACY: f64 = 0.70;
/// 进阶所需的困难题正确率
pub const ADVANCED_HARD_ACCURACY: f64 = 0.50;

/// 根据学习画像判断学习水平
///
/// 冷启动（全零画像）落入第一条规则，返回初学者。
/// 只要中等题表现薄弱，即使简单题全对也不会高于初学者。
pub fn classify(profile: &PerformanceProfile) -> LearningLevel {
    let easy = &profile.easy;
    let medium = &profile.medium;
    let hard = &profile.hard;

    if easy.accuracy < BEGINNER_EASY_ACCURACY
        || (medium.attempts > 0 && medium.accuracy < BEGINNER_MEDIUM_ACCURACY)
    {
        return LearningLevel::Beginner;
    }

    if medium.accuracy >= ADVANCED_MEDIUM_ACCURACY && hard.accuracy >= ADVANCED_HARD_ACCURACY {
        return LearningLevel::Advanced;
    }

    LearningLevel::Intermediate
}
