// ==========================================
// 售后派工系统 - 候选排序引擎
// ==========================================
// 职责: 将逐日合格名单压平为单一有序候选列表
// 排序键: 日期优先级升序 → workload_index 升序(负荷轻者优先,主动回摆负荷)
//         → staff_id 升序(确定性)
// ==========================================

use crate::config::DispatchConfig;
use crate::domain::order::Order;
use crate::domain::staff::Staff;
use crate::engine::availability::DateCandidates;
use chrono::NaiveDate;
use std::cmp::Ordering;
use std::collections::{BTreeMap, BTreeSet};
use tracing::warn;

// ==========================================
// RankedCandidate - 有序候选条目
// ==========================================
#[derive(Debug, Clone)]
pub struct RankedCandidate {
    pub staff_id: String,
    pub date: NaiveDate,
    pub date_priority: u32,
    pub workload_index: f64,
}

// ==========================================
// RankOutcome - 单工单排序结果
// ==========================================
#[derive(Debug, Clone)]
pub struct RankOutcome {
    pub order_id: String,
    pub sent_num: u32,                  // 需求人数(1或2)
    pub candidates: Vec<RankedCandidate>, // 跨候选日的全量有序候选
    pub understaffed: bool,             // 去重后候选人数 < sent_num
}

impl RankOutcome {
    /// 限定某一天的候选(求解器按竞争日消费)
    pub fn candidates_on(&self, date: NaiveDate) -> Vec<&RankedCandidate> {
        self.candidates
            .iter()
            .filter(|c| c.date == date)
            .collect()
    }
}

// ==========================================
// PriorityRanker - 候选排序引擎
// ==========================================
pub struct PriorityRanker {
    // 无状态引擎,不需要注入依赖
}

impl PriorityRanker {
    pub fn new() -> Self {
        Self {}
    }

    // ==========================================
    // 核心方法
    // ==========================================

    /// 排序一个工单的全部候选
    ///
    /// 候选不足 sent_num 时标记 understaffed 并原样返回(可能为空);
    /// 替补/升级决策不在本引擎职责内
    pub fn rank(
        &self,
        order: &Order,
        date_candidates: &[DateCandidates],
        staff_index: &BTreeMap<String, &Staff>,
        config: &DispatchConfig,
    ) -> RankOutcome {
        let sent_num = order.sent_num(config.device_threshold);

        let mut candidates: Vec<RankedCandidate> = Vec::new();
        for day in date_candidates {
            for staff_id in &day.eligible {
                let workload_index = staff_index
                    .get(staff_id)
                    .map(|member| member.workload_index)
                    .unwrap_or(0.0);
                candidates.push(RankedCandidate {
                    staff_id: staff_id.clone(),
                    date: day.date,
                    date_priority: day.priority,
                    workload_index,
                });
            }
        }

        candidates.sort_by(|a, b| Self::compare(a, b));

        let distinct: BTreeSet<&str> =
            candidates.iter().map(|c| c.staff_id.as_str()).collect();
        let understaffed = (distinct.len() as u32) < sent_num;
        if understaffed {
            warn!(
                order_id = %order.order_id,
                sent_num,
                available = distinct.len(),
                "候选人员不足"
            );
        }

        RankOutcome {
            order_id: order.order_id.clone(),
            sent_num,
            candidates,
            understaffed,
        }
    }

    // ==========================================
    // 比较方法
    // ==========================================

    /// 三键比较: 日期优先级 → 负荷指数(升序) → staff_id
    fn compare(a: &RankedCandidate, b: &RankedCandidate) -> Ordering {
        match a.date_priority.cmp(&b.date_priority) {
            Ordering::Equal => {}
            other => return other,
        }

        // 负荷指数升序: 负荷轻者优先
        match a.workload_index.total_cmp(&b.workload_index) {
            Ordering::Equal => {}
            other => return other,
        }

        a.staff_id.cmp(&b.staff_id)
    }
}

// ==========================================
// Default trait 实现
// ==========================================
impl Default for PriorityRanker {
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
    use crate::domain::order::WorkType;

    fn date(d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(2021, 3, d).unwrap()
    }

    fn base_order(device_number: u32, first_device: bool) -> Order {
        Order {
            order_id: "000001".to_string(),
            customer_name: "上海电气".to_string(),
            customer_province: "浙江省".to_string(),
            customer_city: "杭州市".to_string(),
            order_date: date(1),
            arrival_date: date(5),
            expect_days: 1.0,
            work_type: WorkType::default(),
            device_model: "FM5一体式无旁路".to_string(),
            device_number,
            first_device,
            special_model: false,
            exclusive_staff: vec![],
        }
    }

    fn base_staff(staff_id: &str, workload_index: f64) -> Staff {
        Staff {
            staff_id: staff_id.to_string(),
            staff_name: staff_id.to_string(),
            staff_province: "浙江省".to_string(),
            staff_city: "杭州市".to_string(),
            schedule: BTreeMap::new(),
            ability: BTreeMap::new(),
            total_dealt_devices: 0.0,
            total_errand_days: 0.0,
            total_errand_times: 0,
            workload_index,
        }
    }

    fn index<'a>(staff: &'a [Staff]) -> BTreeMap<String, &'a Staff> {
        staff.iter().map(|s| (s.staff_id.clone(), s)).collect()
    }

    #[test]
    fn test_sort_date_priority_then_lighter_workload_first() {
        let ranker = PriorityRanker::new();
        let config = DispatchConfig::default();
        let order = base_order(1, false);

        let staff = vec![
            base_staff("0001", 0.8),
            base_staff("0002", 0.2),
            base_staff("0003", 0.5),
        ];

        let date_candidates = vec![
            DateCandidates {
                date: date(5),
                priority: 1,
                eligible: vec!["0001".to_string(), "0002".to_string()],
            },
            DateCandidates {
                date: date(4),
                priority: 2,
                eligible: vec!["0003".to_string()],
            },
        ];

        let outcome = ranker.rank(&order, &date_candidates, &index(&staff), &config);

        // 优先级1的日期在前;同日内负荷轻者(0002)在前
        let ordered: Vec<&str> = outcome
            .candidates
            .iter()
            .map(|c| c.staff_id.as_str())
            .collect();
        assert_eq!(ordered, vec!["0002", "0001", "0003"]);
        assert!(!outcome.understaffed);
        assert_eq!(outcome.sent_num, 1);
    }

    #[test]
    fn test_equal_workload_ties_break_by_staff_id() {
        let ranker = PriorityRanker::new();
        let config = DispatchConfig::default();
        let order = base_order(1, false);

        let staff = vec![base_staff("0009", 0.5), base_staff("0002", 0.5)];
        let date_candidates = vec![DateCandidates {
            date: date(5),
            priority: 1,
            eligible: vec!["0009".to_string(), "0002".to_string()],
        }];

        let outcome = ranker.rank(&order, &date_candidates, &index(&staff), &config);
        assert_eq!(outcome.candidates[0].staff_id, "0002", "同负荷按 staff_id 定序");
    }

    #[test]
    fn test_understaffed_flag_on_dual_demand() {
        // 首台设备需双人,仅1名候选 → understaffed,原样返回
        let ranker = PriorityRanker::new();
        let config = DispatchConfig::default();
        let order = base_order(1, true);

        let staff = vec![base_staff("0001", 0.3)];
        let date_candidates = vec![DateCandidates {
            date: date(5),
            priority: 1,
            eligible: vec!["0001".to_string()],
        }];

        let outcome = ranker.rank(&order, &date_candidates, &index(&staff), &config);
        assert_eq!(outcome.sent_num, 2);
        assert!(outcome.understaffed);
        assert_eq!(outcome.candidates.len(), 1, "已有候选仍然返回");
    }

    #[test]
    fn test_same_staff_on_two_days_counts_once() {
        // 同一人横跨两个候选日只算一名可派人员
        let ranker = PriorityRanker::new();
        let config = DispatchConfig::default();
        let order = base_order(4, false); // 台数达阈值,双人

        let staff = vec![base_staff("0001", 0.3)];
        let date_candidates = vec![
            DateCandidates {
                date: date(3),
                priority: 1,
                eligible: vec!["0001".to_string()],
            },
            DateCandidates {
                date: date(2),
                priority: 2,
                eligible: vec!["0001".to_string()],
            },
        ];

        let outcome = ranker.rank(&order, &date_candidates, &index(&staff), &config);
        assert!(outcome.understaffed, "同一人不可既当第一人又当第二人");
    }

    #[test]
    fn test_candidates_on_filters_by_date() {
        let ranker = PriorityRanker::new();
        let config = DispatchConfig::default();
        let order = base_order(1, false);

        let staff = vec![base_staff("0001", 0.3), base_staff("0002", 0.1)];
        let date_candidates = vec![
            DateCandidates {
                date: date(3),
                priority: 1,
                eligible: vec!["0001".to_string()],
            },
            DateCandidates {
                date: date(2),
                priority: 2,
                eligible: vec!["0002".to_string()],
            },
        ];

        let outcome = ranker.rank(&order, &date_candidates, &index(&staff), &config);
        let on_day = outcome.candidates_on(date(2));
        assert_eq!(on_day.len(), 1);
        assert_eq!(on_day[0].staff_id, "0002");
    }
}
