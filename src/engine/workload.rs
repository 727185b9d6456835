// ==========================================
// 售后派工系统 - 负荷指数引擎
// ==========================================
// 职责: 计算群体相对负荷指数 workload_index
// 输入: 全量人员 + 配置权重
// 输出: 更新 staff.workload_index
// 红线: 每次提交后必须全量重算,派工决策只信任最新指数
// ==========================================

use crate::config::DispatchConfig;
use crate::domain::staff::Staff;
use tracing::instrument;

// ==========================================
// WorkloadScorer - 负荷指数引擎
// ==========================================
pub struct WorkloadScorer {
    // 无状态引擎,不需要注入依赖
}

impl WorkloadScorer {
    pub fn new() -> Self {
        Self {}
    }

    // ==========================================
    // 核心方法
    // ==========================================

    /// 全量重算负荷指数
    ///
    /// 公式:
    /// workload_index = (出差天数/Σ天数)·w_days
    ///               + (处理台数/Σ台数)·w_devices
    ///               + (出差次数/Σ次数)·w_times
    ///
    /// 群体某项合计为 0 时该项对所有人贡献 0(避免除零)
    #[instrument(skip(self, staff, config), fields(staff_count = staff.len()))]
    pub fn score_all(&self, staff: &mut [Staff], config: &DispatchConfig) {
        let days_sum: f64 = staff.iter().map(|s| s.total_errand_days).sum();
        let devices_sum: f64 = staff.iter().map(|s| s.total_dealt_devices).sum();
        let times_sum: f64 = staff.iter().map(|s| s.total_errand_times as f64).sum();

        for member in staff.iter_mut() {
            member.workload_index = Self::share(member.total_errand_days, days_sum)
                * config.errand_days_weight
                + Self::share(member.total_dealt_devices, devices_sum)
                    * config.device_num_weight
                + Self::share(member.total_errand_times as f64, times_sum)
                    * config.errand_times_weight;
        }
    }

    // ==========================================
    // 辅助方法
    // ==========================================

    /// 群体份额,合计非正时记 0
    fn share(value: f64, sum: f64) -> f64 {
        if sum > 0.0 {
            value / sum
        } else {
            0.0
        }
    }
}

// ==========================================
// Default trait 实现
// ==========================================
impl Default for WorkloadScorer {
    fn default() -> Self {
        Self::new()
    }
}

// ==========================================
// 单元测试
// ==========================================
#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::BTreeMap;

    fn base_staff(staff_id: &str, days: f64, devices: f64, times: u32) -> Staff {
        Staff {
            staff_id: staff_id.to_string(),
            staff_name: staff_id.to_string(),
            staff_province: "浙江省".to_string(),
            staff_city: "杭州市".to_string(),
            schedule: BTreeMap::new(),
            ability: BTreeMap::new(),
            total_dealt_devices: devices,
            total_errand_days: days,
            total_errand_times: times,
            workload_index: f64::NAN, // 不信任输入值,必须被重算覆盖
        }
    }

    #[test]
    fn test_sole_member_owns_full_share() {
        // 唯一成员在每项指标上份额均为 100%
        // 1·0.7 + 1·0.2 + 1·0.1 = 1.0
        let scorer = WorkloadScorer::new();
        let config = DispatchConfig::default();
        let mut staff = vec![base_staff("0001", 10.0, 20.0, 5)];

        scorer.score_all(&mut staff, &config);

        assert!(
            (staff[0].workload_index - 1.0).abs() < 1e-9,
            "唯一成员负荷指数应为1.0, 实际 {}",
            staff[0].workload_index
        );
    }

    #[test]
    fn test_zero_population_sums_yield_zero() {
        // 全员计数器为0时每项贡献0,指数为0
        let scorer = WorkloadScorer::new();
        let config = DispatchConfig::default();
        let mut staff = vec![
            base_staff("0001", 0.0, 0.0, 0),
            base_staff("0002", 0.0, 0.0, 0),
        ];

        scorer.score_all(&mut staff, &config);

        for member in &staff {
            assert_eq!(member.workload_index, 0.0);
        }
    }

    #[test]
    fn test_index_bounds_and_ordering() {
        // 各项份额在 [0,1],总指数非负;计数器更高者指数更高
        let scorer = WorkloadScorer::new();
        let config = DispatchConfig::default();
        let mut staff = vec![
            base_staff("0001", 10.0, 20.0, 5),
            base_staff("0002", 30.0, 10.0, 15),
            base_staff("0003", 0.0, 0.0, 0),
        ];

        scorer.score_all(&mut staff, &config);

        let sum: f64 = staff.iter().map(|s| s.workload_index).sum();
        for member in &staff {
            assert!(member.workload_index >= 0.0);
            assert!(member.workload_index <= 1.0 + 1e-9);
        }
        // 全体指数之和等于权重之和(=1)
        assert!((sum - 1.0).abs() < 1e-9, "群体指数之和应为1, 实际 {}", sum);
        assert_eq!(staff[2].workload_index, 0.0, "零计数成员指数为0");
        assert!(
            staff[1].workload_index > staff[0].workload_index,
            "负荷更重者指数应更高"
        );
    }

    #[test]
    fn test_partial_zero_sum_only_drops_that_term() {
        // 仅出差次数合计为0时,其余两项照常计算
        let scorer = WorkloadScorer::new();
        let config = DispatchConfig::default();
        let mut staff = vec![base_staff("0001", 10.0, 20.0, 0)];

        scorer.score_all(&mut staff, &config);

        // 1·0.7 + 1·0.2 + 0 = 0.9
        assert!((staff[0].workload_index - 0.9).abs() < 1e-9);
    }
}
