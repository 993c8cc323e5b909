//! 难度配比
//!
//! 按学习水平查基础配比，简单题表现突出时把比例向中等题和困难题倾斜

use crate::models::profile::{DifficultyAllocation, LearningLevel, PerformanceProfile};

/// 触发倾斜的简单题正确率（严格大于）
pub const EASY_MASTERY_ACCURACY: f64 = 0.90;
/// 触发倾斜所需的最少简单题作答次数
pub const EASY_MASTERY_MIN_ATTEMPTS: u32 = 5;
/// 简单题比例下调幅度
pub const EASY_SHIFT: f64 = 0.10;
/// 简单题比例下限
pub const EASY_FLOOR: f64 = 0.10;
/// 中等题、困难题各自上调幅度
pub const HARDER_SHIFT: f64 = 0.05;

/// 基础配比 (easy, medium, hard)
pub fn base_fractions(level: LearningLevel) -> (f64, f64, f64) {
    match level {
        LearningLevel::Beginner => (0.60, 0.30, 0.10),
        LearningLevel::Intermediate => (0.30, 0.50, 0.20),
        LearningLevel::Advanced => (0.20, 0.40, 0.40),
    }
}

/// 计算目标难度配比，结果之和恒为 1
pub fn allocate(level: LearningLevel, profile: &PerformanceProfile) -> DifficultyAllocation {
    let (mut easy, mut medium, mut hard) = base_fractions(level);

    let easy_stats = &profile.easy;
    if easy_stats.accuracy > EASY_MASTERY_ACCURACY
        && easy_stats.attempts >= EASY_MASTERY_MIN_ATTEMPTS
    {
        easy = (easy - EASY_SHIFT).max(EASY_FLOOR);
        medium += HARDER_SHIFT;
        hard += HARDER_SHIFT;
    }

    DifficultyAllocation::normalized(easy, medium, hard)
}
