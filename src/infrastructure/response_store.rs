//! 作答记录存储
//!
//! 每个 (学习者, 题目) 一条记录；同一键上的并发提交后写者胜，不同键之间互不争用

use crate::error::AppResult;
use crate::models::question::{QuestionId, SubjectId};
use crate::models::response::ResponseRecord;
use dashmap::DashMap;
use std::collections::HashSet;

/// 作答记录存储接口
pub trait ResponseStore: Send + Sync {
    /// 写入或覆盖一条记录，返回被覆盖的旧记录
    fn upsert(&self, record: ResponseRecord) -> AppResult<Option<ResponseRecord>>;

    /// 某个学习者的全部记录
    fn responses_for_subject(&self, subject_id: &SubjectId) -> AppResult<Vec<ResponseRecord>>;

    /// 某道题的全部记录
    fn responses_for_question(&self, question_id: &QuestionId) -> AppResult<Vec<ResponseRecord>>;

    /// 一组题目（通常是一个课程）的全部记录
    fn responses_for_questions(
        &self,
        question_ids: &[QuestionId],
    ) -> AppResult<Vec<ResponseRecord>>;

    /// 有作答记录的全部学习者
    fn subjects(&self) -> AppResult<Vec<SubjectId>>;
}

/// 内存作答记录存储
///
/// 按键分片加锁，不同 (学习者, 题目) 的写入互不阻塞。
/// 读取结果按 (学习者, 题目) 排序，保证顺序稳定
#[derive(Debug, Default)]
pub struct InMemoryResponseStore {
    records: DashMap<(SubjectId, QuestionId), ResponseRecord>,
}

impl InMemoryResponseStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// 批量导入历史记录
    pub fn from_records(records: impl IntoIterator<Item = ResponseRecord>) -> AppResult<Self> {
        let store = Self::new();
        for record in records {
            store.upsert(record)?;
        }
        Ok(store)
    }

    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    fn collect_sorted(&self, keep: impl Fn(&ResponseRecord) -> bool) -> Vec<ResponseRecord> {
        let mut found: Vec<ResponseRecord> = self
            .records
            .iter()
            .filter(|entry| keep(entry.value()))
            .map(|entry| entry.value().clone())
            .collect();
        found.sort_by(|a, b| {
            (&a.subject_id, &a.question_id).cmp(&(&b.subject_id, &b.question_id))
        });
        found
    }
}

impl ResponseStore for InMemoryResponseStore {
    fn upsert(&self, record: ResponseRecord) -> AppResult<Option<ResponseRecord>> {
        Ok(self.records.insert(record.key(), record))
    }

    fn responses_for_subject(&self, subject_id: &SubjectId) -> AppResult<Vec<ResponseRecord>> {
        Ok(self.collect_sorted(|r| &r.subject_id == subject_id))
    }

    fn responses_for_question(&self, question_id: &QuestionId) -> AppResult<Vec<ResponseRecord>> {
        Ok(self.collect_sorted(|r| &r.question_id == question_id))
    }

    fn responses_for_questions(
        &self,
        question_ids: &[QuestionId],
    ) -> AppResult<Vec<ResponseRecord>> {
        let wanted: HashSet<&QuestionId> = question_ids.iter().collect();
        Ok(self.collect_sorted(|r| wanted.contains(&r.question_id)))
    }

    fn subjects(&self) -> AppResult<Vec<SubjectId>> {
        let mut subjects: Vec<SubjectId> =
            self.records.iter().map(|entry| entry.key().0.clone()).collect();
        subjects.sort();
        subjects.dedup();
        Ok(subjects)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{TimeZone, Utc};
    use std::sync::Arc;

    fn record(
        subject: &str,
        question: &str,
        answer: &str,
        correct: bool,
        hour: u32,
    ) -> ResponseRecord {
        ResponseRecord::new(
            subject,
            question,
            answer,
            correct,
            Utc.with_ymd_and_hms(2026, 10, 1, hour, 0, 0).unwrap(),
        )
    }

    #[test]
    fn test_resubmission_overwrites() {
        let store = InMemoryResponseStore::new();
        assert!(store.upsert(record("s", "q", "wrong", false, 1)).unwrap().is_none());
        let old = store.upsert(record("s", "q", "right", true, 2)).unwrap();
        assert_eq!(old.unwrap().answer, "wrong");

        let all = store.responses_for_subject(&"s".into()).unwrap();
        assert_eq!(all.len(), 1);
        assert!(all[0].correct);
        assert_eq!(all[0].answer, "right");
    }

    #[test]
    fn test_bulk_reads() {
        let store = InMemoryResponseStore::from_records(vec![
            record("a", "q1", "x", true, 1),
            record("a", "q2", "x", false, 2),
            record("b", "q1", "x", true, 3),
            record("b", "q3", "x", true, 4),
        ])
        .unwrap();

        assert_eq!(store.responses_for_subject(&"a".into()).unwrap().len(), 2);
        assert_eq!(store.responses_for_question(&"q1".into()).unwrap().len(), 2);
        assert_eq!(
            store
                .responses_for_questions(&["q2".into(), "q3".into()])
                .unwrap()
                .len(),
            2
        );
        assert_eq!(store.subjects().unwrap(), vec!["a".into(), "b".into()] as Vec<SubjectId>);
    }

    #[test]
    fn test_concurrent_upserts_on_distinct_keys() {
        let store = Arc::new(InMemoryResponseStore::new());
        let handles: Vec<_> = (0..8)
            .map(|i| {
                let store = Arc::clone(&store);
                std::thread::spawn(move || {
                    for q in 0..25 {
                        store
                            .upsert(record(&format!("s{i}"), &format!("q{q}"), "x", true, 1))
                            .unwrap();
                    }
                })
            })
            .collect();
        for handle in handles {
            handle.join().unwrap();
        }
        assert_eq!(store.len(), 200);
    }

    #[test]
    fn test_reads_are_sorted_by_key() {
        let store = InMemoryResponseStore::from_records(vec![
            record("b", "q2", "x", true, 1),
            record("a", "q9", "x", true, 2),
            record("b", "q1", "x", false, 3),
            record("a", "q1", "x", true, 4),
        ])
        .unwrap();

        let keys: Vec<(String, String)> = store
            .responses_for_question(&"q1".into())
            .unwrap()
            .iter()
            .map(|r| (r.subject_id.to_string(), r.question_id.to_string()))
            .collect();
        assert_eq!(
            keys,
            vec![("a".to_string(), "q1".to_string()), ("b".to_string(), "q1".to_string())]
        );

        let ids: Vec<String> = store
            .responses_for_subject(&"b".into())
            .unwrap()
            .iter()
            .map(|r| r.question_id.to_string())
            .collect();
        assert_eq!(ids, vec!["q1", "q2"]);
    }

    #[test]
    fn test_writer_on_other_key_not_blocked_by_held_read() {
        let store = Arc::new(InMemoryResponseStore::new());
        let held_key = (SubjectId::from("a"), QuestionId::from("q0"));
        store.upsert(record("a", "q0", "x", true, 1)).unwrap();

        // 选一个落在不同分片上的键
        let held_shard = store.records.determine_map(&held_key);
        let other = (0..1_000)
            .map(|i| (SubjectId::from("b"), QuestionId::from(format!("q{i}"))))
            .find(|key| store.records.determine_map(key) != held_shard)
            .unwrap();

        // 持有学习者 a 的读锁期间，学习者 b 的写入必须能完成
        let guard = store.records.get(&held_key).unwrap();
        let (tx, rx) = std::sync::mpsc::channel();
        let writer = {
            let store = Arc::clone(&store);
            let (subject, question) = other.clone();
            std::thread::spawn(move || {
                store
                    .upsert(ResponseRecord::new(
                        subject,
                        question,
                        "y",
                        false,
                        Utc.with_ymd_and_hms(2026, 10, 1, 2, 0, 0).unwrap(),
                    ))
                    .unwrap();
                tx.send(()).unwrap();
            })
        };
        let finished = rx.recv_timeout(std::time::Duration::from_secs(5));
        drop(guard);
        writer.join().unwrap();

        assert!(finished.is_ok());
        assert_eq!(store.len(), 2);
    }

    #[test]
    fn test_reads_while_other_subject_writes() {
        let store = Arc::new(
            InMemoryResponseStore::from_records(
                (0..2_000).map(|i| record("a", &format!("q{i}"), "x", true, 1)),
            )
            .unwrap(),
        );
        let readers: Vec<_> = (0..4)
            .map(|_| {
                let store = Arc::clone(&store);
                std::thread::spawn(move || {
                    for _ in 0..20 {
                        let seen = store.responses_for_subject(&"a".into()).unwrap();
                        assert_eq!(seen.len(), 2_000);
                    }
                })
            })
            .collect();

        for i in 0..50 {
            store.upsert(record("b", &format!("q{i}"), "x", false, 2)).unwrap();
        }
        for reader in readers {
            reader.join().unwrap();
        }
        assert_eq!(store.responses_for_subject(&"b".into()).unwrap().len(), 50);
    }
}
