// ==========================================
// 售后派工系统 - 命令行入口
// ==========================================
// 用途: 读取周期快照 JSON,执行派工,输出指派结果
// 使用: labor-dispatch <snapshot.json>
// ==========================================

use anyhow::{Context, Result};
use labor_dispatch::{DispatchOrchestrator, DispatchSnapshot};

fn main() -> Result<()> {
    // 初始化日志系统
    labor_dispatch::logging::init();

    tracing::info!("==================================================");
    tracing::info!("{} - 派工决策引擎", labor_dispatch::APP_NAME);
    tracing::info!("系统版本: {}", labor_dispatch::VERSION);
    tracing::info!("==================================================");

    let path = std::env::args()
        .nth(1)
        .context("用法: labor-dispatch <snapshot.json>")?;
    tracing::info!("读取周期快照: {}", path);

    let raw = std::fs::read_to_string(&path)
        .with_context(|| format!("读取快照文件失败: {}", path))?;
    let mut snapshot: DispatchSnapshot =
        serde_json::from_str(&raw).with_context(|| format!("解析快照 JSON 失败: {}", path))?;

    let orchestrator = DispatchOrchestrator::new();
    let outcome = orchestrator.run_cycle(&mut snapshot)?;

    println!(
        "{}",
        serde_json::to_string_pretty(&outcome).context("序列化派工结果失败")?
    );

    tracing::info!("派工周期结束: {}", outcome.state);
    Ok(())
}
