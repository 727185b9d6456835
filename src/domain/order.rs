// ==========================================
// 售后派工系统 - 工单领域模型
// ==========================================
// 用途: 外部装载层写入,引擎层只读
// 字段命名: 与上游 JSON 数据源保持 camelCase 对齐
// ==========================================

use chrono::{Duration, NaiveDate};
use serde::{Deserialize, Serialize};

// ==========================================
// WorkType - 作业类型标志集
// ==========================================
// troubleshooting 影响紧急工单的候选日期方向(越早越好)
#[derive(Debug, Clone, Copy, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct WorkType {
    pub installation: bool,    // 安装
    pub adjustment: bool,      // 调试
    pub inspection: bool,      // 巡检
    pub troubleshooting: bool, // 故障排除
    pub otherwork: bool,       // 其他作业
}

// ==========================================
// Order - 工单主数据
// ==========================================
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Order {
    // ===== 主键 =====
    pub order_id: String, // 工单唯一标识

    // ===== 客户信息 =====
    pub customer_name: String,    // 客户名称
    pub customer_province: String, // 客户所在省
    pub customer_city: String,    // 客户所在市

    // ===== 时间信息 =====
    pub order_date: NaiveDate,   // 下单日期
    pub arrival_date: NaiveDate, // 要求到场日期
    pub expect_days: f64,        // 预计作业天数(可为小数,占用天数向上取整)

    // ===== 设备信息 =====
    pub work_type: WorkType,   // 作业类型标志集
    pub device_model: String,  // 设备型号全称,前3个字符为通用型号族
    pub device_number: u32,    // 设备台数
    pub first_device: bool,    // 客户首台设备(强制双人)
    pub special_model: bool,   // 特殊型号标记

    // ===== 排他约束 =====
    pub exclusive_staff: Vec<String>, // 客户明确排除的人员姓名
}

impl Order {
    /// 占用天数(向上取整,至少1天)
    ///
    /// expect_days 为小数时整个占用日仍被计入,
    /// 但 total_errand_days 累计使用原始小数值
    pub fn span_days(&self) -> i64 {
        (self.expect_days.ceil() as i64).max(1)
    }

    /// 预计结束日期(不含): start + span_days
    pub fn expect_end_date(&self, start: NaiveDate) -> NaiveDate {
        start + Duration::days(self.span_days())
    }

    /// 以 start 为起点的占用日期区间 [start, expect_end_date)
    pub fn active_span(&self, start: NaiveDate) -> Vec<NaiveDate> {
        (0..self.span_days())
            .map(|offset| start + Duration::days(offset))
            .collect()
    }

    /// 通用设备型号族: 型号全称的前3个字符
    ///
    /// 型号为中英混排(如 "FM5一体式无旁路" → "FM5"),按字符而非字节截取
    pub fn device_family(&self) -> String {
        self.device_model.chars().take(3).collect()
    }

    /// 派工人数: 首台设备或台数达到阈值时双人,否则单人
    pub fn sent_num(&self, device_threshold: u32) -> u32 {
        if self.first_device || self.device_number >= device_threshold {
            2
        } else {
            1
        }
    }
}
