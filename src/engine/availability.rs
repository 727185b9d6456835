// ==========================================
// 售后派工系统 - 可用人员解析引擎
// ==========================================
// 职责: 逐工单生成候选日期(带日期优先级)及各日合格人员
// 过滤: 当日 AVAILABLE + 不在排他名单 + (开关开启时)型号族能力
//       + 整个预计作业区间无阻塞(保证提交永不双占)
// ==========================================

use crate::config::DispatchConfig;
use crate::domain::order::Order;
use crate::domain::staff::Staff;
use chrono::{Duration, NaiveDate};
use tracing::debug;

// ==========================================
// DateCandidates - 单候选日解析结果
// ==========================================
// priority: 1 = 最优先
#[derive(Debug, Clone)]
pub struct DateCandidates {
    pub date: NaiveDate,
    pub priority: u32,
    pub eligible: Vec<String>, // 合格人员 staff_id,按 id 升序
}

// ==========================================
// AvailabilityResolver - 可用人员解析引擎
// ==========================================
pub struct AvailabilityResolver {
    // 无状态引擎,不需要注入依赖
}

impl AvailabilityResolver {
    pub fn new() -> Self {
        Self {}
    }

    // ==========================================
    // 核心方法
    // ==========================================

    /// 生成候选日期序列
    ///
    /// 规则:
    /// - 下单到场间隔 >= response_time_limit → 唯一候选 arrival_date,优先级1
    /// - 紧急工单生成 response_time_limit - 1 个候选:
    ///   * troubleshooting: 从 order_date+1 起正向推进,越早优先级越高
    ///     (紧急故障越早修越好)
    ///   * 其他作业: 从 order_date + response_time_limit 向回推,
    ///     离时限最近的日期优先级1(非故障单尽量压后,为其他工单保留弹性)
    pub fn candidate_dates(
        &self,
        order: &Order,
        config: &DispatchConfig,
    ) -> Vec<(NaiveDate, u32)> {
        let limit = config.response_time_limit as i64;
        let gap = (order.arrival_date - order.order_date).num_days();

        if gap >= limit {
            return vec![(order.arrival_date, 1)];
        }

        let mut candidates = Vec::new();
        for priority in 1..limit {
            let offset = if order.work_type.troubleshooting {
                priority
            } else {
                limit - priority
            };
            candidates.push((order.order_date + Duration::days(offset), priority as u32));
        }
        candidates
    }

    /// 解析一个工单的候选日期及各日合格人员
    pub fn resolve(
        &self,
        order: &Order,
        staff: &[Staff],
        config: &DispatchConfig,
    ) -> Vec<DateCandidates> {
        let family = order.device_family();
        let resolved: Vec<DateCandidates> = self
            .candidate_dates(order, config)
            .into_iter()
            .map(|(date, priority)| {
                let eligible = staff
                    .iter()
                    .filter(|member| self.is_eligible(order, member, date, &family, config))
                    .map(|member| member.staff_id.clone())
                    .collect();
                DateCandidates {
                    date,
                    priority,
                    eligible,
                }
            })
            .collect();

        debug!(
            order_id = %order.order_id,
            candidate_days = resolved.len(),
            eligible_total = resolved.iter().map(|c| c.eligible.len()).sum::<usize>(),
            "候选日期解析完成"
        );
        resolved
    }

    // ==========================================
    // 过滤方法
    // ==========================================

    /// 单人单候选日合格性判定
    ///
    /// 某日不合格不影响该人在其他候选日的资格
    fn is_eligible(
        &self,
        order: &Order,
        member: &Staff,
        date: NaiveDate,
        family: &str,
        config: &DispatchConfig,
    ) -> bool {
        // 1. 候选日当天必须 AVAILABLE
        if !member.is_available_on(date) {
            return false;
        }

        // 2. 排他名单按姓名匹配,无条件排除
        if order
            .exclusive_staff
            .iter()
            .any(|name| name == &member.staff_name)
        {
            return false;
        }

        // 3. 能力过滤(仅开关开启时)
        if config.include_ability && !member.supports_family(family) {
            return false;
        }

        // 4. 整个预计作业区间无阻塞(提交按完整区间占用)
        member.is_free_over(&order.active_span(date))
    }
}

// ==========================================
// Default trait 实现
// ==========================================
impl Default for AvailabilityResolver {
    fn default() -> Self {
        Self::new()
    }
}
