// ==========================================
// 售后派工系统 - 周期输入快照
// ==========================================
// 职责: 承载一个派工周期的工单/人员/配置快照
// 所有权: 编排器在周期内独占快照,引擎借用只读,
//         仅 ScheduleUpdater 在提交步骤获得人员可变借用
// ==========================================

use crate::config::DispatchConfig;
use crate::domain::order::Order;
use crate::domain::staff::Staff;
use crate::error::{DispatchError, DispatchResult};
use serde::{Deserialize, Serialize};
use std::collections::BTreeSet;

// ==========================================
// DispatchSnapshot - 派工周期快照
// ==========================================
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DispatchSnapshot {
    pub orders: Vec<Order>,  // 工单集合(只读)
    pub staff: Vec<Staff>,   // 人员集合(排班与计数器会被提交步骤变更)
    pub config: DispatchConfig, // 派工配置
}

impl DispatchSnapshot {
    /// 快照级数据校验(致命,单条坏记录即中止)
    ///
    /// 校验项:
    /// 1) 工单号唯一
    /// 2) 人员号唯一
    /// 3) arrival_date >= order_date
    /// 4) expect_days > 0
    ///
    /// 日期与排班状态的可解析性由装载层(serde)保证,
    /// 解析失败同样按数据错误处理
    pub fn validate(&self) -> DispatchResult<()> {
        let mut order_ids = BTreeSet::new();
        for order in &self.orders {
            if !order_ids.insert(order.order_id.as_str()) {
                return Err(DispatchError::Data {
                    message: format!("工单号重复: {}", order.order_id),
                });
            }
            if order.arrival_date < order.order_date {
                return Err(DispatchError::Data {
                    message: format!(
                        "工单 {} 到场日期早于下单日期: arrival_date={}, order_date={}",
                        order.order_id, order.arrival_date, order.order_date
                    ),
                });
            }
            if order.expect_days <= 0.0 {
                return Err(DispatchError::Data {
                    message: format!(
                        "工单 {} 预计作业天数非正: expect_days={}",
                        order.order_id, order.expect_days
                    ),
                });
            }
        }

        let mut staff_ids = BTreeSet::new();
        for member in &self.staff {
            if !staff_ids.insert(member.staff_id.as_str()) {
                return Err(DispatchError::Data {
                    message: format!("人员号重复: {}", member.staff_id),
                });
            }
            Self::validate_schedule_coverage(member)?;
        }

        Ok(())
    }

    /// 排班区间内不得有空洞(首日到末日逐日连续)
    fn validate_schedule_coverage(member: &Staff) -> DispatchResult<()> {
        let (first, last) = match (
            member.schedule.keys().next(),
            member.schedule.keys().next_back(),
        ) {
            (Some(first), Some(last)) => (*first, *last),
            _ => return Ok(()), // 空排班: 无可派日,不构成数据错误
        };

        let expected = (last - first).num_days() + 1;
        if member.schedule.len() as i64 != expected {
            return Err(DispatchError::Data {
                message: format!(
                    "人员 {} 排班存在空洞: {} 至 {} 应覆盖 {} 天,实际 {} 天",
                    member.staff_id,
                    first,
                    last,
                    expected,
                    member.schedule.len()
                ),
            });
        }
        Ok(())
    }
}
