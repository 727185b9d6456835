// ==========================================
// 售后派工系统 - 排班提交引擎
// ==========================================
// 职责: 将竞争日裁定结果原子提交回人员排班与累计计数器
// 红线: 工单一经指派即占用人员完整预计作业区间,
//       区间内任何已占用日都意味着不变量被破坏(致命)
// ==========================================

use crate::domain::order::Order;
use crate::domain::staff::{ScheduleEntry, Staff};
use crate::domain::types::WorkStatus;
use crate::error::{DispatchError, DispatchResult};
use chrono::NaiveDate;
use tracing::{info, instrument};

// ==========================================
// ScheduleUpdater - 排班提交引擎
// ==========================================
pub struct ScheduleUpdater {
    // 无状态引擎,不需要注入依赖
}

impl ScheduleUpdater {
    pub fn new() -> Self {
        Self {}
    }

    // ==========================================
    // 核心方法
    // ==========================================

    /// 提交一个工单的裁定(起工日 start,人员 staff_ids)
    ///
    /// 两段式保证原子性: 先只读校验全部人员的完整区间,
    /// 再统一写入;校验失败时排班不发生任何变更
    ///
    /// 写入内容:
    /// 1) 区间 [start, start+span_days) 每日标记 ASSIGNED + 工单号
    /// 2) total_dealt_devices += device_number / sent_num (按需求人数分摊)
    /// 3) total_errand_days += expect_days (原始小数值)
    /// 4) total_errand_times += 1
    #[instrument(skip(self, order, staff), fields(order_id = %order.order_id, start = %start))]
    pub fn commit(
        &self,
        order: &Order,
        start: NaiveDate,
        sent_num: u32,
        staff_ids: &[String],
        staff: &mut [Staff],
    ) -> DispatchResult<()> {
        let span = order.active_span(start);

        // 第一段: 只读校验,任何一日已被其他工单占用即冲突
        for staff_id in staff_ids {
            let member = Self::find(staff, staff_id)?;
            for &date in &span {
                if let Some(entry) = member.schedule.get(&date) {
                    if entry.status == WorkStatus::Assigned
                        && entry.order_id != order.order_id
                    {
                        return Err(DispatchError::ScheduleConflict {
                            staff_id: staff_id.clone(),
                            date,
                            existing_order: entry.order_id.clone(),
                            new_order: order.order_id.clone(),
                        });
                    }
                }
            }
        }

        // 第二段: 统一写入
        let device_share = order.device_number as f64 / sent_num as f64;
        for staff_id in staff_ids {
            let member = Self::find_mut(staff, staff_id)?;
            for &date in &span {
                member
                    .schedule
                    .insert(date, ScheduleEntry::assigned(&order.order_id));
            }
            member.total_dealt_devices += device_share;
            member.total_errand_days += order.expect_days;
            member.total_errand_times += 1;
        }

        info!(
            order_id = %order.order_id,
            staff_count = staff_ids.len(),
            span_days = span.len(),
            "派工提交完成"
        );
        Ok(())
    }

    // ==========================================
    // 辅助方法
    // ==========================================

    fn find<'a>(staff: &'a [Staff], staff_id: &str) -> DispatchResult<&'a Staff> {
        staff
            .iter()
            .find(|member| member.staff_id == staff_id)
            .ok_or_else(|| DispatchError::Data {
                message: format!("裁定结果引用了不存在的人员: {}", staff_id),
            })
    }

    fn find_mut<'a>(staff: &'a mut [Staff], staff_id: &str) -> DispatchResult<&'a mut Staff> {
        staff
            .iter_mut()
            .find(|member| member.staff_id == staff_id)
            .ok_or_else(|| DispatchError::Data {
                message: format!("裁定结果引用了不存在的人员: {}", staff_id),
            })
    }
}

// ==========================================
// Default trait 实现
// ==========================================
impl Default for ScheduleUpdater {
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
    use std::collections::BTreeMap;

    fn date(d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(2021, 3, d).unwrap()
    }

    fn base_order(expect_days: f64, device_number: u32) -> Order {
        Order {
            order_id: "000001".to_string(),
            customer_name: "上海电气".to_string(),
            customer_province: "浙江省".to_string(),
            customer_city: "杭州市".to_string(),
            order_date: date(1),
            arrival_date: date(3),
            expect_days,
            work_type: WorkType::default(),
            device_model: "FM5一体式无旁路".to_string(),
            device_number,
            first_device: false,
            special_model: false,
            exclusive_staff: vec![],
        }
    }

    fn base_staff(staff_id: &str) -> Staff {
        let mut schedule = BTreeMap::new();
        for d in 1..=10 {
            schedule.insert(date(d), ScheduleEntry::available());
        }
        Staff {
            staff_id: staff_id.to_string(),
            staff_name: staff_id.to_string(),
            staff_province: "浙江省".to_string(),
            staff_city: "杭州市".to_string(),
            schedule,
            ability: BTreeMap::new(),
            total_dealt_devices: 0.0,
            total_errand_days: 0.0,
            total_errand_times: 0,
            workload_index: 0.0,
        }
    }

    #[test]
    fn test_commit_marks_full_span_and_counters() {
        let updater = ScheduleUpdater::new();
        let order = base_order(2.0, 3);
        let mut staff = vec![base_staff("0001")];

        updater
            .commit(&order, date(3), 1, &["0001".to_string()], &mut staff)
            .unwrap();

        // 完整区间被占用,而不仅是起工日
        assert_eq!(staff[0].assigned_order_on(date(3)), Some("000001"));
        assert_eq!(staff[0].assigned_order_on(date(4)), Some("000001"));
        assert_eq!(staff[0].assigned_order_on(date(5)), None, "区间外不占用");

        assert_eq!(staff[0].total_dealt_devices, 3.0);
        assert_eq!(staff[0].total_errand_days, 2.0);
        assert_eq!(staff[0].total_errand_times, 1);
    }

    #[test]
    fn test_dual_staff_device_share_split() {
        // 双人单台数按 sent_num 分摊
        let updater = ScheduleUpdater::new();
        let order = base_order(1.0, 5);
        let mut staff = vec![base_staff("0001"), base_staff("0002")];

        updater
            .commit(
                &order,
                date(3),
                2,
                &["0001".to_string(), "0002".to_string()],
                &mut staff,
            )
            .unwrap();

        assert_eq!(staff[0].total_dealt_devices, 2.5);
        assert_eq!(staff[1].total_dealt_devices, 2.5);
        assert_eq!(staff[0].total_errand_times, 1);
        assert_eq!(staff[1].total_errand_times, 1);
    }

    #[test]
    fn test_conflict_detected_and_nothing_written() {
        // 区间第2天已被其他工单占用 → 冲突,且第一人也不得被写入
        let updater = ScheduleUpdater::new();
        let order = base_order(2.0, 1);
        let mut staff = vec![base_staff("0001"), base_staff("0002")];
        staff[1]
            .schedule
            .insert(date(4), ScheduleEntry::assigned("000009"));

        let err = updater
            .commit(
                &order,
                date(3),
                2,
                &["0001".to_string(), "0002".to_string()],
                &mut staff,
            )
            .unwrap_err();

        assert!(matches!(err, DispatchError::ScheduleConflict { .. }));
        // 原子性: 校验先于写入,0001 的排班与计数器未被污染
        assert_eq!(staff[0].assigned_order_on(date(3)), None);
        assert_eq!(staff[0].total_errand_times, 0);
    }

    #[test]
    fn test_recommit_same_order_is_not_conflict() {
        // 同一工单重复提交不构成冲突(幂等重放)
        let updater = ScheduleUpdater::new();
        let order = base_order(1.0, 1);
        let mut staff = vec![base_staff("0001")];

        updater
            .commit(&order, date(3), 1, &["0001".to_string()], &mut staff)
            .unwrap();
        let result = updater.commit(&order, date(3), 1, &["0001".to_string()], &mut staff);
        assert!(result.is_ok());
    }

    #[test]
    fn test_span_beyond_horizon_inserts_entries() {
        // 区间越过排期边界时补建条目,占用事实不丢失
        let updater = ScheduleUpdater::new();
        let order = base_order(3.0, 1);
        let mut staff = vec![base_staff("0001")];

        updater
            .commit(&order, date(9), 1, &["0001".to_string()], &mut staff)
            .unwrap();

        assert_eq!(staff[0].assigned_order_on(date(11)), Some("000001"));
    }

    #[test]
    fn test_unknown_staff_id_is_data_error() {
        let updater = ScheduleUpdater::new();
        let order = base_order(1.0, 1);
        let mut staff = vec![base_staff("0001")];

        let err = updater
            .commit(&order, date(3), 1, &["0099".to_string()], &mut staff)
            .unwrap_err();
        assert!(matches!(err, DispatchError::Data { .. }));
    }
}
