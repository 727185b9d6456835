// ==========================================
// 售后派工系统 - 派工配置
// ==========================================
// 职责: 周期级配置记录与校验
// 红线: 权重和必须为 1(容差 ε),违反即配置错误,处理前失败
// ==========================================

use crate::error::{DispatchError, DispatchResult};
use serde::{Deserialize, Serialize};

/// 权重和校验容差
pub const WEIGHT_SUM_EPSILON: f64 = 1e-6;

// ==========================================
// DispatchConfig - 派工配置记录
// ==========================================
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DispatchConfig {
    // ===== 过滤开关 =====
    pub include_ability: bool, // 是否启用型号族能力过滤

    // ===== 周期参数 =====
    pub schedule_period: u32,     // 排期跨度(天)
    pub response_time_limit: u32, // 响应时限(天),小于该时限的工单按紧急单生成候选日期

    // ===== 负荷权重(和为 1 ± ε) =====
    pub errand_days_weight: f64,  // 累计出差天数权重
    pub device_num_weight: f64,   // 累计处理台数权重
    pub errand_times_weight: f64, // 累计出差次数权重

    // ===== 双人派工阈值 =====
    pub device_threshold: u32, // 台数达到该值即双人派工

    // ===== 调休参数(预留,读入但不参与任何逻辑) =====
    pub comp_time_limit: u32,
    pub comp_time_days: u32,
}

impl DispatchConfig {
    /// 配置校验(致命,处理前执行)
    ///
    /// 校验项:
    /// 1) 三项权重之和为 1 ± ε
    /// 2) schedule_period / response_time_limit / device_threshold 为正
    pub fn validate(&self) -> DispatchResult<()> {
        let weight_sum =
            self.errand_days_weight + self.device_num_weight + self.errand_times_weight;
        if (weight_sum - 1.0).abs() > WEIGHT_SUM_EPSILON {
            return Err(DispatchError::Configuration {
                message: format!(
                    "负荷权重之和必须为1: errand_days={} + device_num={} + errand_times={} = {}",
                    self.errand_days_weight,
                    self.device_num_weight,
                    self.errand_times_weight,
                    weight_sum
                ),
            });
        }

        if self.schedule_period == 0 {
            return Err(DispatchError::Configuration {
                message: "schedule_period 必须为正".to_string(),
            });
        }
        if self.response_time_limit == 0 {
            return Err(DispatchError::Configuration {
                message: "response_time_limit 必须为正".to_string(),
            });
        }
        if self.device_threshold == 0 {
            return Err(DispatchError::Configuration {
                message: "device_threshold 必须为正".to_string(),
            });
        }

        Ok(())
    }
}

impl Default for DispatchConfig {
    /// 与历史数据口径一致的默认配置
    fn default() -> Self {
        Self {
            include_ability: false,
            schedule_period: 30,
            response_time_limit: 3,
            errand_days_weight: 0.7,
            device_num_weight: 0.2,
            errand_times_weight: 0.1,
            device_threshold: 4,
            comp_time_limit: 3,
            comp_time_days: 2,
        }
    }
}
