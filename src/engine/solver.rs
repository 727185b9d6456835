// ==========================================
// 售后派工系统 - 派工求解引擎
// ==========================================
// 职责: 对单个竞争日做联合指派,消解多工单争抢同一人员
// 模型: 二部图最小费用最大流
//       工单节点需求 sent_num,人员节点容量 1,
//       边费用 = workload_index + 日期优先级惩罚
// 红线: 逐单贪心会在共享日期上双占人员,必须按日联合求解
// ==========================================

use std::collections::{BTreeMap, BTreeSet};
use tracing::{debug, instrument};

/// 非最优候选日的费用惩罚(每降一级优先级加一档)
///
/// workload_index 恒在 [0,1] 区间,惩罚档位取 10 可保证
/// 日期优先级始终压过负荷差异
pub const DATE_PRIORITY_PENALTY: f64 = 10.0;

// ==========================================
// 求解输入/输出
// ==========================================

/// 单工单在竞争日上的需求与可行边
#[derive(Debug, Clone)]
pub struct OrderDemand {
    pub order_id: String,
    pub demand: u32,
    pub edges: Vec<SolverEdge>, // 通过该工单当日合格过滤的人员
}

/// 可行指派边
#[derive(Debug, Clone)]
pub struct SolverEdge {
    pub staff_id: String,
    pub cost: f64, // workload_index + DATE_PRIORITY_PENALTY·(priority-1)
}

/// 单工单当日裁定结果
#[derive(Debug, Clone)]
pub struct DayAward {
    pub order_id: String,
    pub staff_ids: Vec<String>, // 可能短于 demand(人员不足时部分满足)
}

// ==========================================
// 残量网络
// ==========================================

#[derive(Debug, Clone)]
struct FlowEdge {
    to: usize,
    cap: i64,
    cost: f64,
}

struct FlowGraph {
    edges: Vec<FlowEdge>,
    adj: Vec<Vec<usize>>,
}

impl FlowGraph {
    fn new(node_count: usize) -> Self {
        Self {
            edges: Vec::new(),
            adj: vec![Vec::new(); node_count],
        }
    }

    fn add_edge(&mut self, from: usize, to: usize, cap: i64, cost: f64) -> usize {
        let index = self.edges.len();
        self.adj[from].push(index);
        self.edges.push(FlowEdge { to, cap, cost });
        self.adj[to].push(index + 1);
        self.edges.push(FlowEdge {
            to: from,
            cap: 0,
            cost: -cost,
        });
        index
    }
}

// ==========================================
// AssignmentSolver - 派工求解引擎
// ==========================================
pub struct AssignmentSolver {
    // 无状态引擎,不需要注入依赖
}

impl AssignmentSolver {
    pub fn new() -> Self {
        Self {}
    }

    // ==========================================
    // 核心方法
    // ==========================================

    /// 求解一个竞争日的最小费用指派
    ///
    /// 连续最短增广路:每轮 Bellman-Ford 找费用最短的增广路,
    /// 按 1 单位推流直至无路可增.边按 (order_id, staff_id) 升序
    /// 建图,同费用路径的选择因此确定(并列按工单号、人员号取小)
    #[instrument(skip(self, demands), fields(order_count = demands.len()))]
    pub fn solve(&self, demands: &[OrderDemand]) -> Vec<DayAward> {
        if demands.is_empty() {
            return Vec::new();
        }

        // 节点编号: 0=源, 1..=n 工单, n+1..=n+m 人员, n+m+1=汇
        let mut ordered: Vec<&OrderDemand> = demands.iter().collect();
        ordered.sort_by(|a, b| a.order_id.cmp(&b.order_id));

        let staff_ids: BTreeSet<&str> = ordered
            .iter()
            .flat_map(|d| d.edges.iter().map(|e| e.staff_id.as_str()))
            .collect();
        let staff_list: Vec<&str> = staff_ids.into_iter().collect();
        let staff_node: BTreeMap<&str, usize> = staff_list
            .iter()
            .enumerate()
            .map(|(i, id)| (*id, ordered.len() + 1 + i))
            .collect();

        let node_count = ordered.len() + staff_list.len() + 2;
        let source = 0;
        let sink = node_count - 1;
        let mut graph = FlowGraph::new(node_count);

        // 源 → 工单(容量=需求)
        for (i, demand) in ordered.iter().enumerate() {
            graph.add_edge(source, i + 1, demand.demand as i64, 0.0);
        }

        // 工单 → 人员(容量1,费用=负荷+日期惩罚)
        let mut award_edges: Vec<(usize, String, String)> = Vec::new();
        for (i, demand) in ordered.iter().enumerate() {
            let mut edges: Vec<&SolverEdge> = demand.edges.iter().collect();
            edges.sort_by(|a, b| a.staff_id.cmp(&b.staff_id));
            for edge in edges {
                let index = graph.add_edge(i + 1, staff_node[edge.staff_id.as_str()], 1, edge.cost);
                award_edges.push((index, demand.order_id.clone(), edge.staff_id.clone()));
            }
        }

        // 人员 → 汇(容量1,每人每日至多承接一单)
        for staff in &staff_list {
            graph.add_edge(staff_node[*staff], sink, 1, 0.0);
        }

        // 连续最短增广
        let mut total_flow = 0;
        while self.augment_once(&mut graph, source, sink) {
            total_flow += 1;
        }

        // 提取结果: 工单→人员边残量为0即被选用
        let mut awards: BTreeMap<String, Vec<String>> = ordered
            .iter()
            .map(|d| (d.order_id.clone(), Vec::new()))
            .collect();
        for (index, order_id, staff_id) in award_edges {
            if graph.edges[index].cap == 0 {
                if let Some(list) = awards.get_mut(&order_id) {
                    list.push(staff_id);
                }
            }
        }

        debug!(total_flow, "竞争日指派求解完成");

        awards
            .into_iter()
            .map(|(order_id, staff_ids)| DayAward {
                order_id,
                staff_ids,
            })
            .collect()
    }

    // ==========================================
    // 增广路搜索
    // ==========================================

    /// Bellman-Ford 找一条费用最短增广路并推 1 单位流
    ///
    /// 残量边可能带负费用,不能用 Dijkstra;
    /// 松弛采用严格小于,遍历顺序固定,结果确定
    fn augment_once(&self, graph: &mut FlowGraph, source: usize, sink: usize) -> bool {
        let node_count = graph.adj.len();
        let mut dist = vec![f64::INFINITY; node_count];
        let mut prev_edge = vec![usize::MAX; node_count];
        dist[source] = 0.0;

        for _ in 0..node_count {
            let mut changed = false;
            for node in 0..node_count {
                if !dist[node].is_finite() {
                    continue;
                }
                for &edge_index in &graph.adj[node] {
                    let edge = &graph.edges[edge_index];
                    if edge.cap <= 0 {
                        continue;
                    }
                    let candidate = dist[node] + edge.cost;
                    if candidate + 1e-12 < dist[edge.to] {
                        dist[edge.to] = candidate;
                        prev_edge[edge.to] = edge_index;
                        changed = true;
                    }
                }
            }
            if !changed {
                break;
            }
        }

        if !dist[sink].is_finite() {
            return false;
        }

        // 回溯路径,推 1 单位流
        let mut node = sink;
        while node != source {
            let edge_index = prev_edge[node];
            graph.edges[edge_index].cap -= 1;
            graph.edges[edge_index ^ 1].cap += 1;
            node = graph.edges[edge_index ^ 1].to;
        }
        true
    }
}

// ==========================================
// Default trait 实现
// ==========================================
impl Default for AssignmentSolver {
    fn default() -> Self {
        Self::new()
    }
}
