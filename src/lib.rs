// ==========================================
// 售后派工系统 - 核心库
// ==========================================
// 系统定位: 售后工程师派工决策引擎
// 输入: 工单/人员/配置快照 (JSON)
// 输出: 工单指派结果 + 更新后的人员排班
// ==========================================

// ==========================================
// 模块声明
// ==========================================

// 领域层 - 实体与类型
pub mod domain;

// 引擎层 - 派工规则
pub mod engine;

// 配置层 - 周期配置
pub mod config;

// 错误类型
pub mod error;

// 日志系统
pub mod logging;

// ==========================================
// 重导出核心类型
// ==========================================

// 领域类型
pub use domain::types::{DispatchState, FulfillmentStatus, WorkStatus};

// 领域实体
pub use domain::{DispatchSnapshot, Order, ScheduleEntry, Staff, WorkType};

// 配置
pub use config::DispatchConfig;

// 引擎
pub use engine::{
    AssignmentSolver, AvailabilityResolver, CalendarIndex, DispatchOrchestrator,
    DispatchOutcome, PriorityRanker, ScheduleUpdater, WorkloadScorer,
};

// 错误
pub use error::{DispatchError, DispatchResult};

// ==========================================
// 常量定义
// ==========================================

// 系统版本
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

// 系统名称
pub const APP_NAME: &str = "售后派工系统";

// ==========================================
// 预编译检查
// ==========================================

// 确保编译时所有模块可见
#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_version() {
        assert!(!VERSION.is_empty());
    }
}
