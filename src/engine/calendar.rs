// ==========================================
// 售后派工系统 - 工单日历索引
// ==========================================
// 职责: 工单 → 日期占用位图,统计逐日竞争强度
// 输入: 当前工单集合(占用区间以 arrival_date 为锚)
// 输出: 指定日期上未决工单的同时活跃数
// ==========================================

use crate::domain::order::Order;
use chrono::NaiveDate;
use std::collections::{BTreeMap, BTreeSet};

// ==========================================
// CalendarIndex - 日历占用索引
// ==========================================
#[derive(Debug, Clone)]
pub struct CalendarIndex {
    // 工单号 → 占用日期集合 [arrival_date, expect_end_date)
    occupancy: BTreeMap<String, BTreeSet<NaiveDate>>,
}

impl CalendarIndex {
    /// 从当前工单集合构建索引
    pub fn build(orders: &[Order]) -> Self {
        let mut occupancy = BTreeMap::new();
        for order in orders {
            let dates: BTreeSet<NaiveDate> =
                order.active_span(order.arrival_date).into_iter().collect();
            occupancy.insert(order.order_id.clone(), dates);
        }
        Self { occupancy }
    }

    /// 工单在指定日期是否处于作业中
    pub fn is_active(&self, order_id: &str, date: NaiveDate) -> bool {
        self.occupancy
            .get(order_id)
            .map(|dates| dates.contains(&date))
            .unwrap_or(false)
    }

    /// 指定日期上未决工单的同时活跃数
    pub fn contention_on(&self, date: NaiveDate, unresolved: &BTreeSet<String>) -> usize {
        unresolved
            .iter()
            .filter(|order_id| self.is_active(order_id, date))
            .count()
    }
}
