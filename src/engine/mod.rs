// ==========================================
// 售后派工系统 - 引擎层
// ==========================================
// 职责: 实现派工业务规则,不做数据装载
// 红线: 引擎只借用快照,排班写入集中在 ScheduleUpdater
// ==========================================

pub mod availability;
pub mod calendar;
pub mod orchestrator;
pub mod ranker;
pub mod solver;
pub mod updater;
pub mod workload;

// 重导出核心引擎
pub use availability::{AvailabilityResolver, DateCandidates};
pub use calendar::CalendarIndex;
pub use orchestrator::{DispatchOrchestrator, DispatchOutcome};
pub use ranker::{PriorityRanker, RankOutcome, RankedCandidate};
pub use solver::{AssignmentSolver, DayAward, OrderDemand, SolverEdge};
pub use updater::ScheduleUpdater;
pub use workload::WorkloadScorer;
