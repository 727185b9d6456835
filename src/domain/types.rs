// ==========================================
// 售后派工系统 - 领域类型定义
// ==========================================
// 职责: 派工核心的闭集枚举
// 红线: 排班状态是闭集,未知状态码是数据错误而不是第三种状态
// ==========================================

use serde::{Deserialize, Serialize};
use std::fmt;

// ==========================================
// 排班状态 (Work Status)
// ==========================================
// 序列化格式: SCREAMING_SNAKE_CASE
// 兼容旧数据源的中文状态码("公司"/"休假"/"出差")
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum WorkStatus {
    #[serde(alias = "公司")]
    Available, // 在公司,可派工
    #[serde(alias = "休假")]
    Unavailable, // 休假/不可派工
    #[serde(alias = "出差")]
    Assigned, // 已派工出差
}

impl fmt::Display for WorkStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            WorkStatus::Available => write!(f, "AVAILABLE"),
            WorkStatus::Unavailable => write!(f, "UNAVAILABLE"),
            WorkStatus::Assigned => write!(f, "ASSIGNED"),
        }
    }
}

// ==========================================
// 工单满足状态 (Fulfillment Status)
// ==========================================
// 人员不足不是硬失败,通过此状态向下游透出
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum FulfillmentStatus {
    Full,    // 派足 sent_num 人
    Partial, // 派出部分人员
    None,    // 无人可派
}

impl fmt::Display for FulfillmentStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            FulfillmentStatus::Full => write!(f, "FULL"),
            FulfillmentStatus::Partial => write!(f, "PARTIAL"),
            FulfillmentStatus::None => write!(f, "NONE"),
        }
    }
}

// ==========================================
// 派工周期状态 (Dispatch State)
// ==========================================
// 状态机: PENDING → IN_PROGRESS → {COMPLETE, PARTIAL}
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum DispatchState {
    Pending,    // 未开始
    InProgress, // 周期内
    Complete,   // 全部工单派足
    Partial,    // 存在未满足需求且无法继续推进
}

impl fmt::Display for DispatchState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            DispatchState::Pending => write!(f, "PENDING"),
            DispatchState::InProgress => write!(f, "IN_PROGRESS"),
            DispatchState::Complete => write!(f, "COMPLETE"),
            DispatchState::Partial => write!(f, "PARTIAL"),
        }
    }
}
