// ==========================================
// 售后派工系统 - 引擎编排器
// ==========================================
// 用途: 协调负荷/候选/排序/求解/提交五大引擎的执行顺序
// 主流程: 校验 → 幂等重放 → 负荷重算 →
//         [解析候选 → 挑竞争日 → 联合求解 → 提交 → 重算] 循环
// 红线: 每轮提交后必须重算负荷指数,后续轮次只信任最新指数
// ==========================================

use crate::config::DispatchConfig;
use crate::domain::order::Order;
use crate::domain::snapshot::DispatchSnapshot;
use crate::domain::types::{DispatchState, FulfillmentStatus, WorkStatus};
use crate::engine::availability::AvailabilityResolver;
use crate::engine::calendar::CalendarIndex;
use crate::engine::ranker::{PriorityRanker, RankOutcome};
use crate::engine::solver::{
    AssignmentSolver, OrderDemand, SolverEdge, DATE_PRIORITY_PENALTY,
};
use crate::engine::updater::ScheduleUpdater;
use crate::engine::workload::WorkloadScorer;
use crate::error::{DispatchError, DispatchResult};
use chrono::NaiveDate;
use serde::Serialize;
use std::cmp::Reverse;
use std::collections::{BTreeMap, BTreeSet};
use tracing::{debug, info, instrument, warn};

// ==========================================
// DispatchOutcome - 周期派工结果
// ==========================================
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct DispatchOutcome {
    // 工单号 → 派出人员(落空工单为空列表)
    pub assignments: BTreeMap<String, Vec<String>>,
    // 工单号 → 满足程度
    pub fulfillment: BTreeMap<String, FulfillmentStatus>,
    // 全部 FULL 为 COMPLETE,否则 PARTIAL
    pub state: DispatchState,
}

// ==========================================
// DispatchOrchestrator - 引擎编排器
// ==========================================
pub struct DispatchOrchestrator {
    scorer: WorkloadScorer,
    resolver: AvailabilityResolver,
    ranker: PriorityRanker,
    solver: AssignmentSolver,
    updater: ScheduleUpdater,
}

impl DispatchOrchestrator {
    pub fn new() -> Self {
        Self {
            scorer: WorkloadScorer::new(),
            resolver: AvailabilityResolver::new(),
            ranker: PriorityRanker::new(),
            solver: AssignmentSolver::new(),
            updater: ScheduleUpdater::new(),
        }
    }

    // ==========================================
    // 核心方法
    // ==========================================

    /// 执行一个完整派工周期
    ///
    /// 每轮挑出竞争最激烈的候选日做联合求解,提交后重算负荷
    /// 再进入下一轮;当剩余工单在任何候选日都无人可派时,
    /// 全部按 NONE 结算并退出.每轮至少结算一个工单,循环必然终止
    #[instrument(skip(self, snapshot), fields(order_count = snapshot.orders.len(), staff_count = snapshot.staff.len()))]
    pub fn run_cycle(&self, snapshot: &mut DispatchSnapshot) -> DispatchResult<DispatchOutcome> {
        snapshot.config.validate()?;
        snapshot.validate()?;

        let orders = snapshot.orders.clone();
        let config = snapshot.config.clone();
        let calendar = CalendarIndex::build(&orders);

        let mut assignments: BTreeMap<String, Vec<String>> = BTreeMap::new();
        let mut fulfillment: BTreeMap<String, FulfillmentStatus> = BTreeMap::new();

        // 幂等重放: 排班中已出现的工单视为已结算,不重复派工、不重复计数
        let mut unresolved: BTreeSet<String> = BTreeSet::new();
        let preassigned = Self::scan_preassigned(snapshot);
        for order in &orders {
            match preassigned.get(&order.order_id) {
                Some(staff_ids) => {
                    let sent_num = order.sent_num(config.device_threshold);
                    let status = if staff_ids.len() as u32 >= sent_num {
                        FulfillmentStatus::Full
                    } else {
                        FulfillmentStatus::Partial
                    };
                    info!(
                        order_id = %order.order_id,
                        staff_count = staff_ids.len(),
                        "工单已在排班中,跳过重复派工"
                    );
                    assignments
                        .insert(order.order_id.clone(), staff_ids.iter().cloned().collect());
                    fulfillment.insert(order.order_id.clone(), status);
                }
                None => {
                    unresolved.insert(order.order_id.clone());
                }
            }
        }

        self.scorer.score_all(&mut snapshot.staff, &config);

        while !unresolved.is_empty() {
            // 本轮全部未决工单的有序候选(提交会改变排班,每轮重算)
            let outcomes = self.rank_unresolved(&orders, &unresolved, snapshot, &config);

            // 允许起工日: 至少一个未决工单在该日有合格候选
            let mut allowed: BTreeSet<NaiveDate> = outcomes
                .values()
                .flat_map(|outcome| outcome.candidates.iter().map(|c| c.date))
                .collect();

            let mut committed = false;
            while let Some(day) = Self::select_day(&outcomes, &allowed, &calendar, &unresolved) {
                let demands = Self::build_demands(&outcomes, day);
                let awards = self.solver.solve(&demands);

                let useful: Vec<_> = awards
                    .iter()
                    .filter(|award| !award.staff_ids.is_empty())
                    .collect();
                if useful.is_empty() {
                    allowed.remove(&day);
                    continue;
                }

                debug!(day = %day, settled = useful.len(), "竞争日裁定完成");
                for award in useful {
                    let order = Self::find_order(&orders, &award.order_id)?;
                    let sent_num = outcomes[&award.order_id].sent_num;
                    // 台数分摊按需求人数,部分派工时份额不放大
                    self.updater.commit(
                        order,
                        day,
                        sent_num,
                        &award.staff_ids,
                        &mut snapshot.staff,
                    )?;

                    let status = if award.staff_ids.len() as u32 >= sent_num {
                        FulfillmentStatus::Full
                    } else {
                        FulfillmentStatus::Partial
                    };
                    if status == FulfillmentStatus::Partial {
                        warn!(
                            order_id = %award.order_id,
                            awarded = award.staff_ids.len(),
                            sent_num,
                            "人员不足,部分派工"
                        );
                    }
                    assignments.insert(award.order_id.clone(), award.staff_ids.clone());
                    fulfillment.insert(award.order_id.clone(), status);
                    unresolved.remove(&award.order_id);
                }

                self.scorer.score_all(&mut snapshot.staff, &config);
                committed = true;
                break;
            }

            if !committed {
                // 剩余工单在全部候选日上都无人可派
                for order_id in &unresolved {
                    warn!(order_id = %order_id, "无可行指派,工单落空");
                    assignments.insert(order_id.clone(), Vec::new());
                    fulfillment.insert(order_id.clone(), FulfillmentStatus::None);
                }
                unresolved.clear();
            }
        }

        let state = if fulfillment
            .values()
            .all(|status| *status == FulfillmentStatus::Full)
        {
            DispatchState::Complete
        } else {
            DispatchState::Partial
        };

        info!(
            settled = fulfillment.len(),
            state = %state,
            "派工周期完成"
        );

        Ok(DispatchOutcome {
            assignments,
            fulfillment,
            state,
        })
    }

    // ==========================================
    // 流程步骤
    // ==========================================

    /// 收集排班中已被指派的工单(工单号 → 人员集合)
    fn scan_preassigned(snapshot: &DispatchSnapshot) -> BTreeMap<String, BTreeSet<String>> {
        let mut preassigned: BTreeMap<String, BTreeSet<String>> = BTreeMap::new();
        for member in &snapshot.staff {
            for entry in member.schedule.values() {
                if entry.status == WorkStatus::Assigned && !entry.order_id.is_empty() {
                    preassigned
                        .entry(entry.order_id.clone())
                        .or_default()
                        .insert(member.staff_id.clone());
                }
            }
        }
        preassigned
    }

    /// 对全部未决工单解析候选日期并排序
    fn rank_unresolved(
        &self,
        orders: &[Order],
        unresolved: &BTreeSet<String>,
        snapshot: &DispatchSnapshot,
        config: &DispatchConfig,
    ) -> BTreeMap<String, RankOutcome> {
        let staff_index: BTreeMap<String, &crate::domain::staff::Staff> = snapshot
            .staff
            .iter()
            .map(|member| (member.staff_id.clone(), member))
            .collect();

        orders
            .iter()
            .filter(|order| unresolved.contains(&order.order_id))
            .map(|order| {
                let date_candidates = self.resolver.resolve(order, &snapshot.staff, config);
                let outcome = self.ranker.rank(order, &date_candidates, &staff_index, config);
                (order.order_id.clone(), outcome)
            })
            .collect()
    }

    /// 竞争日挑选: 日期优先级最高(数值最小)的日子先解,
    /// 同级先解竞争最激烈的日子,再并列取最早
    ///
    /// 优先级压过竞争强度,否则紧急故障单会被推离最早候选日
    fn select_day(
        outcomes: &BTreeMap<String, RankOutcome>,
        allowed: &BTreeSet<NaiveDate>,
        calendar: &CalendarIndex,
        unresolved: &BTreeSet<String>,
    ) -> Option<NaiveDate> {
        allowed.iter().copied().min_by_key(|&day| {
            let best_priority = outcomes
                .values()
                .flat_map(|outcome| outcome.candidates_on(day))
                .map(|candidate| candidate.date_priority)
                .min()
                .unwrap_or(u32::MAX);
            (
                best_priority,
                Reverse(calendar.contention_on(day, unresolved)),
                day,
            )
        })
    }

    /// 组装竞争日求解输入: 边费用 = 负荷指数 + 日期优先级惩罚
    fn build_demands(outcomes: &BTreeMap<String, RankOutcome>, day: NaiveDate) -> Vec<OrderDemand> {
        outcomes
            .values()
            .filter_map(|outcome| {
                let edges: Vec<SolverEdge> = outcome
                    .candidates_on(day)
                    .into_iter()
                    .map(|candidate| SolverEdge {
                        staff_id: candidate.staff_id.clone(),
                        cost: candidate.workload_index
                            + DATE_PRIORITY_PENALTY * (candidate.date_priority - 1) as f64,
                    })
                    .collect();
                if edges.is_empty() {
                    return None;
                }
                Some(OrderDemand {
                    order_id: outcome.order_id.clone(),
                    demand: outcome.sent_num,
                    edges,
                })
            })
            .collect()
    }

    fn find_order<'a>(orders: &'a [Order], order_id: &str) -> DispatchResult<&'a Order> {
        orders
            .iter()
            .find(|order| order.order_id == order_id)
            .ok_or_else(|| DispatchError::Data {
                message: format!("裁定结果引用了不存在的工单: {}", order_id),
            })
    }
}

// ==========================================
// Default trait 实现
// ==========================================
impl Default for DispatchOrchestrator {
    fn default() -> Self {
        Self::new()
    }
}
