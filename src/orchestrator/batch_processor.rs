//! 批量练习处理器 - 编排层
//!
//! ## 职责
//!
//! 本模块是整个应用的入口，负责批量生成练习和资源管理。
//!
//! ## 核心功能
//!
//! 1. **应用初始化**：加载题库文件和作答历史，构建内存存储
//! 2. **并发控制**：使用 Semaphore 限制并发数量
//! 3. **分批处理**：将学习者分批次处理，每批完成后再开始下一批
//! 4. **资源管理**：持有题库仓库和作答存储，通过 Arc 共享给各任务
//! 5. **全局统计**：汇总所有学习者的处理结果
//!
//! ## 设计特点
//!
//! - **顶层编排**：不处理单个学习者的细节
//! - **向下委托**：委托 session_processor 处理单个学习者

use crate::config::Config;
use crate::infrastructure::{InMemoryQuestionRepository, InMemoryResponseStore, ResponseStore};
use crate::models::question::{LectureId, SubjectId};
use crate::models::{
    load_all_question_banks, load_question_bank, load_response_log, QuestionBank,
};
use crate::orchestrator::session_processor;
use crate::utils::logging;
use crate::workflow::AnalyticsFlow;
use anyhow::{Context, Result};
use chrono::{DateTime, Utc};
use std::path::Path;
use std::sync::Arc;
use tokio::sync::Semaphore;
use tracing::{error, info, warn};

/// 应用主结构
pub struct App {
    config: Config,
    questions: Arc<InMemoryQuestionRepository>,
    responses: Arc<InMemoryResponseStore>,
}

impl App {
    /// 初始化应用
    pub async fn initialize(config: Config) -> Result<Self> {
        logging::log_startup(config.max_concurrent_sessions, config.session_size);

        let banks = load_banks(&config).await?;

        info!("📁 正在加载作答历史: {}", config.responses_file);
        let log = load_response_log(Path::new(&config.responses_file))
            .await
            .with_context(|| format!("无法加载作答历史: {}", config.responses_file))?;
        info!("✓ 共 {} 条作答记录", log.responses.len());

        let questions = InMemoryQuestionRepository::from_banks(banks);
        let responses = InMemoryResponseStore::from_records(log.responses)?;

        Ok(Self::with_stores(config, questions, responses))
    }

    /// 使用已构建好的存储创建应用
    pub fn with_stores(
        config: Config,
        questions: InMemoryQuestionRepository,
        responses: InMemoryResponseStore,
    ) -> Self {
        Self {
            config,
            questions: Arc::new(questions),
            responses: Arc::new(responses),
        }
    }

    pub fn questions(&self) -> &InMemoryQuestionRepository {
        &self.questions
    }

    pub fn responses(&self) -> &InMemoryResponseStore {
        &self.responses
    }

    /// 运行应用主逻辑，返回成功处理的学习者数量
    pub async fn run(&self) -> Result<usize> {
        let subjects = self.responses.subjects()?;

        if subjects.is_empty() {
            warn!("⚠️ 没有找到任何学习者的作答记录，程序结束");
            return Ok(0);
        }

        logging::log_subjects_loaded(subjects.len(), self.config.max_concurrent_sessions);

        let now = Utc::now();
        let stats = self.process_all_subjects(subjects, now).await?;

        self.log_question_report();
        logging::print_final_stats(stats.success, stats.failed, stats.total);

        Ok(stats.success)
    }

    /// 处理所有学习者
    async fn process_all_subjects(
        &self,
        subjects: Vec<SubjectId>,
        now: DateTime<Utc>,
    ) -> Result<ProcessingStats> {
        let batch_size = self.config.max_concurrent_sessions.max(1);
        let semaphore = Arc::new(Semaphore::new(batch_size));
        let total = subjects.len();
        let mut stats = ProcessingStats {
            total,
            ..Default::default()
        };

        let total_batches = total.div_ceil(batch_size);
        for (batch_idx, batch) in subjects.chunks(batch_size).enumerate() {
            let batch_start = batch_idx * batch_size;
            let batch_num = batch_idx + 1;

            logging::log_batch_start(
                batch_num,
                total_batches,
                batch_start + 1,
                batch_start + batch.len(),
                total,
            );

            let batch_result = self
                .process_batch(batch, batch_start, semaphore.clone(), now)
                .await?;

            stats.success += batch_result.success;
            stats.failed += batch_result.failed;

            logging::log_batch_complete(
                batch_num,
                batch_result.success,
                batch_result.success + batch_result.failed,
            );
        }

        Ok(stats)
    }

    /// 处理单个批次
    async fn process_batch(
        &self,
        batch: &[SubjectId],
        batch_start: usize,
        semaphore: Arc<Semaphore>,
        now: DateTime<Utc>,
    ) -> Result<BatchResult> {
        let mut indices = Vec::with_capacity(batch.len());
        let mut handles = Vec::with_capacity(batch.len());

        for (idx, subject_id) in batch.iter().enumerate() {
            let subject_index = batch_start + idx + 1;
            let permit = semaphore.clone().acquire_owned().await?;

            let questions = Arc::clone(&self.questions);
            let responses = Arc::clone(&self.responses);
            let config = self.config.clone();
            let subject_id = subject_id.clone();

            let handle = tokio::spawn(async move {
                let _permit = permit;
                session_processor::process_subject(
                    questions.as_ref(),
                    responses.as_ref(),
                    subject_id,
                    subject_index,
                    &config,
                    now,
                )
                .map_err(|e| {
                    error!("[练习 #{}] ❌ 处理过程中发生错误: {:#}", subject_index, e);
                    e
                })
            });
            indices.push(subject_index);
            handles.push(handle);
        }

        // 等待本批所有任务完成
        let mut result = BatchResult::default();
        for (subject_index, joined) in indices
            .into_iter()
            .zip(futures::future::join_all(handles).await)
        {
            match joined {
                Ok(Ok(true)) => result.success += 1,
                Ok(Ok(false)) | Ok(Err(_)) => result.failed += 1,
                Err(e) => {
                    error!("[练习 #{}] 任务执行失败: {}", subject_index, e);
                    result.failed += 1;
                }
            }
        }

        Ok(result)
    }

    /// 输出课程内每道题的正确率
    fn log_question_report(&self) {
        let lecture_id = LectureId::from(self.config.lecture_id.as_str());
        match AnalyticsFlow::new().question_report(
            self.questions.as_ref(),
            self.responses.as_ref(),
            &lecture_id,
        ) {
            Ok(report) => {
                info!("📈 课程 {} 题目正确率", lecture_id);
                for row in report.iter().filter(|r| r.attempts > 0) {
                    info!(
                        "  {} [{}] {}/{} ({:.0}%)",
                        row.question_id,
                        row.difficulty,
                        row.correct,
                        row.attempts,
                        row.accuracy * 100.0
                    );
                }
            }
            Err(e) => warn!("⚠️ 无法生成题目报表: {}", e),
        }
    }
}

/// 加载题库：配置了目录时加载目录下全部课程，否则只加载单个文件
async fn load_banks(config: &Config) -> Result<Vec<QuestionBank>> {
    if let Some(dir) = &config.question_bank_dir {
        info!("📁 正在扫描题库目录: {}", dir);
        let banks = load_all_question_banks(dir)
            .await
            .with_context(|| format!("无法加载题库目录: {}", dir))?;
        if banks.is_empty() {
            warn!("⚠️ 题库目录中没有可用的题库: {}", dir);
        }
        info!("✓ 共加载 {} 个课程的题库", banks.len());
        return Ok(banks);
    }

    info!("📁 正在加载题库: {}", config.question_bank_file);
    let bank = load_question_bank(Path::new(&config.question_bank_file))
        .await
        .with_context(|| format!("无法加载题库: {}", config.question_bank_file))?;
    info!("✓ 题库 [{}] 共 {} 道题目", bank.name, bank.questions.len());
    Ok(vec![bank])
}

/// 处理统计
#[derive(Debug, Default)]
struct ProcessingStats {
    success: usize,
    failed: usize,
    total: usize,
}

/// 批次处理结果
#[derive(Debug, Default)]
struct BatchResult {
    success: usize,
    failed: usize,
}
