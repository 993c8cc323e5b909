//! 选题排序服务 - 业务能力层
//!
//! 给每道候选题打分，再按难度配额挑选出本次练习的题目
//!
//! 打分：
//! - 没做过：基础分 100
//! - 做过：`(1 - 正确率) * 80 + min(距上次天数 * 2, 20) + max(0, 10 - 次数 * 2)`
//! - 最后乘以该难度在配比中的比例
//!
//! 挑选：
//! 1. 每个难度的配额为 `round(请求数量 * 比例)`
//! 2. 按分数降序稳定排序，同分保持输入顺序
//! 3. 第一轮只在该难度配额未满时取题
//! 4. 第一轮不足时，第二轮按分数补齐，不再区分难度

use crate::config::RankingConfig;
use crate::models::profile::{
    DifficultyAllocation, QuestionStats, SelectedQuestion, SelectionResult,
};
use crate::models::question::{Difficulty, QuestionId, QuestionItem};
use chrono::{DateTime, Utc};
use std::collections::{HashMap, HashSet};
use tracing::debug;

const SECONDS_PER_DAY: f64 = 86_400.0;
/// 抵消浮点误差，避免 1.5 被算成 1.4999… 后舍入错误
const ROUNDING_EPSILON: f64 = 1e-9;

/// 带分数的候选题
#[derive(Debug, Clone)]
struct Scored<'a> {
    question: &'a QuestionItem,
    score: f64,
}

/// 选题排序服务
#[derive(Debug, Clone, Default)]
pub struct Ranker {
    config: RankingConfig,
}

impl Ranker {
    pub fn new(config: RankingConfig) -> Self {
        Self { config }
    }

    /// 单道题的分数
    pub fn score(
        &self,
        question: &QuestionItem,
        stats: Option<&QuestionStats>,
        allocation: &DifficultyAllocation,
        now: DateTime<Utc>,
    ) -> f64 {
        let c = &self.config;
        let base = match stats {
            None => c.unseen_score,
            Some(stats) => {
                let weakness = (1.0 - stats.accuracy) * c.weakness_weight;
                let elapsed = (now - stats.last_attempt_at).num_seconds().max(0) as f64;
                let days = elapsed / SECONDS_PER_DAY;
                let spacing = (days * c.spacing_per_day).min(c.spacing_cap);
                let practice =
                    (c.practice_bonus - f64::from(stats.attempts) * c.practice_decay).max(0.0);
                weakness + spacing + practice
            }
        };
        base * allocation.get(question.difficulty)
    }

    /// 挑选本次练习的题目
    ///
    /// 结果长度不超过 `requested_count`、没有重复 ID，相同输入得到相同结果
    pub fn select(
        &self,
        candidates: &[QuestionItem],
        stats: &HashMap<QuestionId, QuestionStats>,
        allocation: &DifficultyAllocation,
        requested_count: usize,
        now: DateTime<Utc>,
    ) -> SelectionResult {
        if candidates.is_empty() || requested_count == 0 {
            return SelectionResult::default();
        }

        let mut scored: Vec<Scored<'_>> = candidates
            .iter()
            .map(|question| Scored {
                question,
                score: self.score(question, stats.get(&question.id), allocation, now),
            })
            .collect();
        // sort_by 是稳定排序，同分保持输入顺序
        scored.sort_by(|a, b| b.score.total_cmp(&a.score));

        let targets: HashMap<Difficulty, usize> = Difficulty::ALL
            .iter()
            .map(|&d| (d, tier_target(requested_count, allocation.get(d))))
            .collect();
        debug!("各难度配额: {:?}", targets);

        let mut taken: HashSet<&QuestionId> = HashSet::new();
        let mut counts: HashMap<Difficulty, usize> = HashMap::new();
        let mut result = SelectionResult::default();

        // 第一轮：按配额取题
        for item in &scored {
            if result.len() >= requested_count {
                break;
            }
            let difficulty = item.question.difficulty;
            let count = counts.entry(difficulty).or_default();
            if *count >= targets[&difficulty] || taken.contains(&item.question.id) {
                continue;
            }
            *count += 1;
            taken.insert(&item.question.id);
            result.questions.push(selected(item));
        }

        // 第二轮：按分数补齐
        for item in &scored {
            if result.len() >= requested_count {
                break;
            }
            if taken.insert(&item.question.id) {
                result.questions.push(selected(item));
            }
        }

        result
    }
}

fn selected(item: &Scored<'_>) -> SelectedQuestion {
    SelectedQuestion {
        id: item.question.id.clone(),
        difficulty: item.question.difficulty,
        score: item.score,
    }
}

/// 单个难度的配额
fn tier_target(requested_count: usize, fraction: f64) -> usize {
    (requested_count as f64 * fraction + ROUNDING_EPSILON).round() as usize
}

/// 使用默认权重选题
pub fn select(
    candidates: &[QuestionItem],
    stats: &HashMap<QuestionId, QuestionStats>,
    allocation: &DifficultyAllocation,
    requested_count: usize,
    now: DateTime<Utc>,
) -> SelectionResult {
    Ranker::default().select(candidates, stats, allocation, requested_count, now)
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{Duration, TimeZone};

    fn now() -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2026, 10, 17, 12, 0, 0).unwrap()
    }

    fn question(id: &str, difficulty: Difficulty) -> QuestionItem {
        QuestionItem::open_form(id, "L1", "prompt", "answer", difficulty)
    }

    /// 20 道没做过的题，三个难度交替排列
    fn pool() -> Vec<QuestionItem> {
        (0..20)
            .map(|i| {
                let difficulty = match i % 3 {
                    0 => Difficulty::Easy,
                    1 => Difficulty::Medium,
                    _ => Difficulty::Hard,
                };
                question(&format!("q{i:02}"), difficulty)
            })
            .collect()
    }

    fn beginner_allocation() -> DifficultyAllocation {
        DifficultyAllocation::new(0.6, 0.3, 0.1).unwrap()
    }

    #[test]
    fn test_empty_pool_returns_empty() {
        let result = select(&[], &HashMap::new(), &beginner_allocation(), 5, now());
        assert!(result.is_empty());
    }

    #[test]
    fn test_zero_requested_returns_empty() {
        let result = select(&pool(), &HashMap::new(), &beginner_allocation(), 0, now());
        assert!(result.is_empty());
    }

    #[test]
    fn test_quota_split_with_rounding() {
        let candidates = pool();
        let result = select(&candidates, &HashMap::new(), &beginner_allocation(), 5, now());

        assert_eq!(result.tier_counts(), (3, 2, 0));
        let ids: Vec<&str> = result.questions.iter().map(|q| q.id.as_str()).collect();
        // 同分题按输入顺序
        assert_eq!(ids, vec!["q00", "q03", "q06", "q01", "q04"]);
    }

    #[test]
    fn test_never_exceeds_requested_and_no_duplicates() {
        let mut candidates = pool();
        // 输入中混入重复 ID
        candidates.push(question("q00", Difficulty::Easy));
        candidates.push(question("q01", Difficulty::Medium));

        for n in 0..30 {
            let result = select(&candidates, &HashMap::new(), &beginner_allocation(), n, now());
            assert!(result.len() <= n);
            let unique: HashSet<_> = result.questions.iter().map(|q| &q.id).collect();
            assert_eq!(unique.len(), result.len());
        }
        let all = select(&candidates, &HashMap::new(), &beginner_allocation(), 100, now());
        assert_eq!(all.len(), 20);
    }

    #[test]
    fn test_second_pass_fills_when_tier_short() {
        // 只有简单题可选，配额不够时由第二轮补齐
        let candidates: Vec<_> = (0..6)
            .map(|i| question(&format!("e{i}"), Difficulty::Easy))
            .collect();
        let result = select(&candidates, &HashMap::new(), &beginner_allocation(), 5, now());
        assert_eq!(result.len(), 5);
        assert_eq!(result.tier_counts(), (5, 0, 0));
    }

    #[test]
    fn test_deterministic() {
        let candidates = pool();
        let a = select(&candidates, &HashMap::new(), &beginner_allocation(), 7, now());
        let b = select(&candidates, &HashMap::new(), &beginner_allocation(), 7, now());
        assert_eq!(a, b);
    }

    #[test]
    fn test_seen_score_components() {
        let ranker = Ranker::default();
        let q = question("q", Difficulty::Medium);
        let even = DifficultyAllocation::new(1.0, 1.0, 1.0).unwrap();

        // 正确率 0.5，3 天前，作答 2 次：40 + 6 + 6 = 52
        let stats = QuestionStats::new(2, 1, now() - Duration::days(3));
        let score = ranker.score(&q, Some(&stats), &even, now());
        assert!((score - 52.0 / 3.0).abs() < 1e-9);

        // 间隔加分封顶 20，练习加分不低于 0
        let stats = QuestionStats::new(8, 8, now() - Duration::days(400));
        let score = ranker.score(&q, Some(&stats), &even, now());
        assert!((score - 20.0 / 3.0).abs() < 1e-9);

        // 未来时间戳不产生负的间隔加分
        let stats = QuestionStats::new(5, 0, now() + Duration::days(2));
        let score = ranker.score(&q, Some(&stats), &even, now());
        assert!((score - 80.0 / 3.0).abs() < 1e-9);
    }

    #[test]
    fn test_weak_items_outrank_mastered_items() {
        let candidates = vec![
            question("mastered", Difficulty::Easy),
            question("weak", Difficulty::Easy),
        ];
        let mut stats = HashMap::new();
        stats.insert(
            QuestionId::from("mastered"),
            QuestionStats::new(3, 3, now() - Duration::days(1)),
        );
        stats.insert(
            QuestionId::from("weak"),
            QuestionStats::new(3, 0, now() - Duration::days(1)),
        );
        let result = select(&candidates, &stats, &beginner_allocation(), 1, now());
        assert_eq!(result.questions[0].id.as_str(), "weak");
    }

    #[test]
    fn test_unseen_preferred_over_seen() {
        let candidates = vec![
            question("seen", Difficulty::Easy),
            question("new", Difficulty::Easy),
        ];
        let mut stats = HashMap::new();
        stats.insert(
            QuestionId::from("seen"),
            QuestionStats::new(1, 0, now() - Duration::days(30)),
        );
        // 80 + 20 + 8 = 108 > 100，薄弱且久未复习的题排在新题前面
        let result = select(&candidates, &stats, &beginner_allocation(), 2, now());
        assert_eq!(result.questions[0].id.as_str(), "seen");
        assert_eq!(result.questions[1].id.as_str(), "new");
    }
}
