// ==========================================
// 售后派工系统 - 错误类型
// ==========================================
// 工具: thiserror 派生宏
// 红线: 人员不足不是错误,通过满足状态透出;
//       排班冲突是内部不变量破坏,属致命错误
// ==========================================

use chrono::NaiveDate;
use thiserror::Error;

/// 派工核心错误类型
#[derive(Error, Debug)]
pub enum DispatchError {
    // ===== 配置错误(处理前即失败) =====
    #[error("配置错误: {message}")]
    Configuration { message: String },

    // ===== 数据错误(单条坏记录即中止装载) =====
    #[error("数据错误: {message}")]
    Data { message: String },

    // ===== 内部不变量破坏 =====
    // 求解器/提交器正确实现时不可达:同一人同一日被两个工单占用
    #[error("排班冲突: staff_id={staff_id}, date={date}, 已占用工单={existing_order}, 新工单={new_order}")]
    ScheduleConflict {
        staff_id: String,
        date: NaiveDate,
        existing_order: String,
        new_order: String,
    },

    // ===== 通用错误 =====
    #[error(transparent)]
    Other(#[from] anyhow::Error),
}

/// Result 类型别名
pub type DispatchResult<T> = Result<T, DispatchError>;
