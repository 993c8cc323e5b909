use crate::error::{AppError, AppResult, FileError};
use crate::models::question::QuestionBank;
use crate::models::response::ResponseLog;
use serde::de::DeserializeOwned;
use std::path::{Path, PathBuf};
use tokio::fs;

/// 读取并解析单个 TOML 文件
async fn read_toml<T: DeserializeOwned>(path: &Path) -> AppResult<T> {
    let display = path.display().to_string();
    if !path.exists() {
        return Err(FileError::NotFound { path: display }.into());
    }

    let content = fs::read_to_string(path)
        .await
        .map_err(|e| AppError::file_read_failed(&display, e))?;

    toml::from_str(&content).map_err(|e| AppError::toml_parse_failed(display, e))
}

/// 从 TOML 文件加载题库
pub async fn load_question_bank(toml_file_path: &Path) -> AppResult<QuestionBank> {
    let mut bank: QuestionBank = read_toml(toml_file_path).await?;

    // 设置文件路径
    bank.file_path = Some(toml_file_path.to_string_lossy().to_string());

    // 题目未写课程 ID 时继承题库的课程 ID
    for question in bank.questions.iter_mut() {
        if question.lecture_id.as_str().is_empty() {
            question.lecture_id = bank.lecture_id.clone();
        }
    }

    Ok(bank)
}

/// 从 TOML 文件加载作答历史
pub async fn load_response_log(toml_file_path: &Path) -> AppResult<ResponseLog> {
    read_toml(toml_file_path).await
}

/// 从文件夹中加载所有题库文件
///
/// 单个文件解析失败只记录警告，不影响其他文件
pub async fn load_all_question_banks(folder_path: &str) -> AppResult<Vec<QuestionBank>> {
    let folder = PathBuf::from(folder_path);

    if !folder.exists() {
        return Err(FileError::NotFound {
            path: folder_path.to_string(),
        }
        .into());
    }

    let mut entries = fs::read_dir(&folder)
        .await
        .map_err(|e| AppError::file_read_failed(folder_path, e))?;

    let mut paths = Vec::new();
    while let Some(entry) = entries.next_entry().await? {
        let path = entry.path();
        if path.extension().and_then(|s| s.to_str()) == Some("toml") {
            paths.push(path);
        }
    }
    // read_dir 的顺序依赖平台
    paths.sort();

    let mut banks = Vec::new();
    for path in paths {
        tracing::info!(
            "正在加载题库: {}",
            path.file_name().unwrap_or_default().to_string_lossy()
        );

        match load_question_bank(&path).await {
            Ok(bank) => {
                tracing::info!("成功加载 {} 道题目", bank.questions.len());
                banks.push(bank);
            }
            Err(e) => {
                tracing::warn!("加载文件失败 {}: {}", path.display(), e);
            }
        }
    }

    Ok(banks)
}
