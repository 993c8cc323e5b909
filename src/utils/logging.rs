/// 日志工具模块
///
/// 提供日志初始化以及批量运行时的格式化输出
use tracing::info;
use tracing_subscriber::EnvFilter;

/// 初始化日志
///
/// 级别由 `RUST_LOG` 控制，未设置时为 `info`。重复调用不会报错（测试中会多次调用）
pub fn init() {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    let _ = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .try_init();
}

/// 记录程序启动信息
///
/// # 参数
/// - `max_concurrent`: 最大并发数
/// - `session_size`: 每次练习的题目数量
pub fn log_startup(max_concurrent: usize, session_size: usize) {
    info!("{}", "=".repeat(60));
    info!("🚀 程序启动 - 批量生成自适应练习");
    info!("📊 最大并发数: {}", max_concurrent);
    info!("📝 每次练习题量: {}", session_size);
    info!("{}", "=".repeat(60));
}

/// 记录学习者加载信息
pub fn log_subjects_loaded(total: usize, max_concurrent: usize) {
    info!("✓ 找到 {} 位学习者", total);
    info!("📋 将以每批 {} 位的方式处理", max_concurrent);
}

/// 记录批次开始信息
///
/// # 参数
/// - `batch_num`: 批次编号
/// - `total_batches`: 批次总数
/// - `start`: 起始编号
/// - `end`: 结束编号
/// - `total`: 总数
pub fn log_batch_start(
    batch_num: usize,
    total_batches: usize,
    start: usize,
    end: usize,
    total: usize,
) {
    info!("{}", "=".repeat(60));
    info!("📦 开始处理第 {}/{} 批", batch_num, total_batches);
    info!("👥 本批学习者: {}-{} / 共 {} 位", start, end, total);
    info!("{}", "=".repeat(60));
}

/// 记录批次完成信息
pub fn log_batch_complete(batch_num: usize, success: usize, total: usize) {
    info!("{}", "─".repeat(60));
    info!("✓ 第 {} 批完成: 成功 {}/{}", batch_num, success, total);
    info!("{}", "─".repeat(60));
}

/// 打印最终统计信息
pub fn print_final_stats(success: usize, failed: usize, total: usize) {
    info!("{}", "=".repeat(60));
    info!("📊 全部处理完成统计");
    info!(
        "完成时间: {}",
        chrono::Local::now().format("%Y-%m-%d %H:%M:%S")
    );
    info!("{}", "=".repeat(60));
    info!("✅ 成功: {}/{}", success, total);
    info!("❌ 失败: {}", failed);
    info!("{}", "=".repeat(60));
}

/// 截断长文本用于日志显示
///
/// # 参数
/// - `text`: 原始文本
/// - `max_len`: 最大长度（字符数）
///
/// # 返回
/// 返回截断后的文本
pub fn truncate_text(text: &str, max_len: usize) -> String {
    if text.chars().count() > max_len {
        text.chars().take(max_len).collect::<String>() + "..."
    } else {
        text.to_string()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_truncate_counts_chars_not_bytes() {
        assert_eq!(truncate_text("借用检查器", 2), "借用...");
        assert_eq!(truncate_text("short", 10), "short");
    }

    #[test]
    fn test_init_twice_is_harmless() {
        init();
        init();
    }
}
