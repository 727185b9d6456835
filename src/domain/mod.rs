// ==========================================
// 售后派工系统 - 领域模型层
// ==========================================
// 职责: 定义领域实体与闭集类型
// 红线: 不含数据访问逻辑,不含引擎逻辑
// ==========================================

pub mod order;
pub mod snapshot;
pub mod staff;
pub mod types;

// 重导出核心类型
pub use order::{Order, WorkType};
pub use snapshot::DispatchSnapshot;
pub use staff::{ScheduleEntry, Staff};
pub use types::{DispatchState, FulfillmentStatus, WorkStatus};
