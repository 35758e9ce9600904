//! Policy contract and the planning/execution context policies are built on.
//! Concrete behaviour tiers live with the game; this module only fixes the calls
//! they make.

use std::sync::Arc;

use async_trait::async_trait;
use tracing::debug;

use crate::body::{AgentBody, LiveAgent};
use crate::config::AgentConfig;
use crate::executor::{MovementExecutor, PauseSignal, PlanReport};
use crate::search::RouteFinder;
use crate::state::SharedArena;
use crate::threat::ThreatOracle;
use crate::types::{Action, Plan, PlayerId};

/// Result of one decision cycle.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Cycle {
    Continue,
    Finished,
}

#[async_trait]
pub trait AgentPolicy: Send {
    /// Decide and carry out one cycle of behaviour.
    async fn act(&mut self) -> Cycle;

    /// Execute `plan`. A plan made `in_danger` runs to completion; any other plan
    /// may be cut short between actions.
    async fn perform_moves(&mut self, plan: Plan, in_danger: bool) -> PlanReport;

    async fn perform_planned_moves(&mut self, plan: Plan) -> PlanReport {
        self.perform_moves(plan, false).await
    }
}

/// Everything a policy needs to plan against fresh snapshots and drive its agent.
pub struct AgentContext {
    arena: SharedArena,
    id: PlayerId,
    oracle: Arc<dyn ThreatOracle>,
    config: AgentConfig,
    executor: MovementExecutor<LiveAgent>,
}

impl AgentContext {
    pub fn new(
        arena: SharedArena,
        id: PlayerId,
        oracle: Arc<dyn ThreatOracle>,
        config: AgentConfig,
        pause: PauseSignal,
    ) -> Self {
        let body = LiveAgent::new(arena.clone(), id);
        let executor = MovementExecutor::new(
            body,
            Arc::clone(&oracle),
            config.executor.clone(),
            config.geometry,
            pause,
        );
        Self { arena, id, oracle, config, executor }
    }

    pub fn id(&self) -> PlayerId {
        self.id
    }

    pub fn config(&self) -> &AgentConfig {
        &self.config
    }

    pub fn oracle(&self) -> &dyn ThreatOracle {
        self.oracle.as_ref()
    }

    pub fn executor(&self) -> &MovementExecutor<LiveAgent> {
        &self.executor
    }

    /// Runs `query` against a snapshot taken now. `None` if the arena is unreadable.
    pub fn plan<R>(&self, query: impl FnOnce(&RouteFinder<'_>) -> R) -> Option<R> {
        let snapshot = self.arena.snapshot()?;
        let finder =
            RouteFinder::new(&snapshot, self.id, self.oracle.as_ref(), &self.config.planner);
        Some(query(&finder))
    }

    /// Executes `plan`. Unless `in_danger`, execution stops before any action that
    /// would start while the agent's cell is under a live blast.
    pub async fn execute(&self, plan: &[Action], in_danger: bool) -> PlanReport {
        let body = self.executor.body();
        let oracle = self.oracle.as_ref();
        let still_safe = || {
            let Some(cell) = body.cell() else {
                return true;
            };
            !oracle.tiles_affected_by_bombs().contains(&cell)
        };
        let report = self.executor.execute_plan(plan, || in_danger || still_safe()).await;
        if report.interrupted {
            debug!(id = ?self.id, executed = report.executed, "planned moves cut short by danger");
        }
        report
    }
}
