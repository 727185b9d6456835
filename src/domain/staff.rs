// ==========================================
// 售后派工系统 - 人员领域模型
// ==========================================
// 红线: 排班表是唯一事实层,每人每日至多承接一个工单
// 用途: 装载层写入;周期内仅 ScheduleUpdater 可变更
// ==========================================

use crate::domain::types::WorkStatus;
use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

// ==========================================
// ScheduleEntry - 单日排班条目
// ==========================================
// order_id 仅在 ASSIGNED 状态下非空
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ScheduleEntry {
    #[serde(alias = "workStatus")]
    pub status: WorkStatus, // 当日状态
    #[serde(default)]
    pub order_id: String, // 承接的工单号(未派工为空串)
}

impl ScheduleEntry {
    pub fn available() -> Self {
        Self {
            status: WorkStatus::Available,
            order_id: String::new(),
        }
    }

    pub fn assigned(order_id: &str) -> Self {
        Self {
            status: WorkStatus::Assigned,
            order_id: order_id.to_string(),
        }
    }
}

// ==========================================
// Staff - 人员主数据
// ==========================================
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Staff {
    // ===== 主键 =====
    pub staff_id: String, // 人员唯一标识

    // ===== 基础信息 =====
    pub staff_name: String,     // 姓名(排他名单按姓名匹配)
    pub staff_province: String, // 常驻省
    pub staff_city: String,     // 常驻市

    // ===== 排班与技能 =====
    pub schedule: BTreeMap<NaiveDate, ScheduleEntry>, // 日期 → 当日排班
    pub ability: BTreeMap<String, bool>,              // 设备型号族 → 是否具备能力

    // ===== 累计负荷计数器(ScheduleUpdater 写入) =====
    pub total_dealt_devices: f64, // 累计处理设备台数(双人单按份额累计,可为小数)
    pub total_errand_days: f64,   // 累计出差天数
    pub total_errand_times: u32,  // 累计出差次数

    // ===== 派生字段(WorkloadScorer 写入,不信任输入值) =====
    #[serde(default)]
    pub workload_index: f64, // 群体相对负荷指数,越低越闲
}

impl Staff {
    /// 当日是否可派工(排班条目存在且为 AVAILABLE)
    pub fn is_available_on(&self, date: NaiveDate) -> bool {
        self.schedule
            .get(&date)
            .map(|entry| entry.status == WorkStatus::Available)
            .unwrap_or(false)
    }

    /// 区间内是否无阻塞: 已有排班条目必须全部为 AVAILABLE
    ///
    /// 排期边界外没有条目的日期不构成阻塞(提交时补建条目)
    pub fn is_free_over(&self, span: &[NaiveDate]) -> bool {
        span.iter().all(|date| match self.schedule.get(date) {
            Some(entry) => entry.status == WorkStatus::Available,
            None => true,
        })
    }

    /// 是否具备指定型号族的能力(未登记视为不具备)
    pub fn supports_family(&self, family: &str) -> bool {
        self.ability.get(family).copied().unwrap_or(false)
    }

    /// 当日承接的工单号
    pub fn assigned_order_on(&self, date: NaiveDate) -> Option<&str> {
        self.schedule.get(&date).and_then(|entry| {
            if entry.status == WorkStatus::Assigned {
                Some(entry.order_id.as_str())
            } else {
                None
            }
        })
    }
}
