//! Turns plans into intent changes over real time.
//! This module exists to drive one agent through a plan one action at a time.
//! It does not own planning, physics or the decision to interrupt a plan.

use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};
use std::time::Duration;

use tokio::time::{Instant, sleep};
use tracing::{debug, trace};

use crate::body::AgentBody;
use crate::config::{ExecutorConfig, Geometry};
use crate::state::cell_origin;
use crate::threat::ThreatOracle;
use crate::types::{Action, Direction, Intent, MoveOutcome, PixelPos, Pos};

/// Cooperative pause flag shared between a scheduler and its agents.
#[derive(Clone, Debug, Default)]
pub struct PauseSignal {
    paused: Arc<AtomicBool>,
}

impl PauseSignal {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn pause(&self) {
        if !self.paused.swap(true, Ordering::SeqCst) {
            debug!("paused");
        }
    }

    pub fn resume(&self) {
        if self.paused.swap(false, Ordering::SeqCst) {
            debug!("resumed");
        }
    }

    pub fn is_paused(&self) -> bool {
        self.paused.load(Ordering::SeqCst)
    }

    /// Returns once the flag is clear, polling every `poll`.
    pub async fn wait_while_paused(&self, poll: Duration) {
        while self.is_paused() {
            sleep(poll).await;
        }
    }
}

/// How far a plan got before it stopped.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct PlanReport {
    /// Actions that reached a terminal state, the failing one included.
    pub executed: usize,
    /// Outcome of the last executed action; `Arrived` for an empty plan.
    pub outcome: MoveOutcome,
    /// The caller stopped the plan between actions.
    pub interrupted: bool,
}

impl PlanReport {
    pub fn completed(&self, plan_len: usize) -> bool {
        self.executed == plan_len && self.outcome == MoveOutcome::Arrived
    }
}

/// Whether a footprint at `pixel` lies inside `cell` on both axes.
pub fn footprint_within(pixel: PixelPos, cell: Pos, geometry: &Geometry) -> bool {
    let origin = cell_origin(cell, geometry);
    let slack = geometry.block_size - geometry.player_size;
    let inside = |at: i32, from: i32| at >= from && at - from < slack;
    inside(pixel.x, origin.x) && inside(pixel.y, origin.y)
}

pub struct MovementExecutor<B> {
    body: B,
    oracle: Arc<dyn ThreatOracle>,
    config: ExecutorConfig,
    geometry: Geometry,
    pause: PauseSignal,
}

impl<B: AgentBody> MovementExecutor<B> {
    pub fn new(
        body: B,
        oracle: Arc<dyn ThreatOracle>,
        config: ExecutorConfig,
        geometry: Geometry,
        pause: PauseSignal,
    ) -> Self {
        Self { body, oracle, config, geometry, pause }
    }

    pub fn body(&self) -> &B {
        &self.body
    }

    pub fn pause_signal(&self) -> &PauseSignal {
        &self.pause
    }

    /// Runs `plan` in order, asking `should_continue` before each action. Stops at
    /// the first action that does not arrive.
    pub async fn execute_plan<Continue>(
        &self,
        plan: &[Action],
        mut should_continue: Continue,
    ) -> PlanReport
    where
        Continue: FnMut() -> bool + Send,
    {
        let mut report =
            PlanReport { executed: 0, outcome: MoveOutcome::Arrived, interrupted: false };
        for action in plan {
            if !should_continue() {
                report.interrupted = true;
                break;
            }
            report.outcome = self.execute_action(*action).await;
            report.executed += 1;
            if report.outcome != MoveOutcome::Arrived {
                break;
            }
        }
        let PlanReport { executed, outcome, interrupted } = report;
        debug!(len = plan.len(), executed, ?outcome, interrupted, "plan finished");
        report
    }

    pub async fn execute_action(&self, action: Action) -> MoveOutcome {
        match action {
            Action::PlaceBomb => self.place_bomb().await,
            Action::Wait => self.stand_off().await,
            _ => match action.direction() {
                Some(direction) => self.step(direction, action).await,
                None => MoveOutcome::Arrived,
            },
        }
    }

    async fn step(&self, direction: Direction, action: Action) -> MoveOutcome {
        let Some(from) = self.body.cell() else {
            return MoveOutcome::Aborted;
        };
        let destination = from.step(action);
        self.body.set_intent(Intent::moving(direction));

        let mut polls = 0u32;
        let outcome = loop {
            self.pause.wait_while_paused(self.config.pause_poll()).await;
            if !self.body.is_alive() {
                break MoveOutcome::Aborted;
            }
            if self.oracle.is_imminent_bomb_at(destination) {
                break MoveOutcome::Aborted;
            }
            match self.body.pixel() {
                None => break MoveOutcome::Aborted,
                Some(pixel) if footprint_within(pixel, destination, &self.geometry) => {
                    break MoveOutcome::Arrived;
                }
                Some(_) => {}
            }
            if polls >= self.config.stuck_poll_cap {
                break MoveOutcome::StuckTimeout;
            }
            polls += 1;
            sleep(self.config.poll_interval()).await;
        };

        self.body.set_intent(Intent::NEUTRAL);
        trace!(?from, ?destination, polls, ?outcome, "move finished");
        outcome
    }

    async fn place_bomb(&self) -> MoveOutcome {
        self.pause.wait_while_paused(self.config.pause_poll()).await;
        if !self.body.is_alive() {
            return MoveOutcome::Aborted;
        }
        self.body.set_intent(Intent::placing_bomb());
        sleep(self.config.poll_interval()).await;
        self.body.set_intent(Intent::NEUTRAL);
        if self.body.is_alive() { MoveOutcome::Arrived } else { MoveOutcome::Aborted }
    }

    async fn stand_off(&self) -> MoveOutcome {
        self.body.set_intent(Intent::NEUTRAL);
        let deadline = Instant::now() + self.config.standoff();
        loop {
            self.pause.wait_while_paused(self.config.pause_poll()).await;
            if !self.body.is_alive() {
                return MoveOutcome::Aborted;
            }
            if self.oracle.tiles_affected_by_bombs().is_empty() || Instant::now() >= deadline {
                return MoveOutcome::Arrived;
            }
            sleep(self.config.poll_interval()).await;
        }
    }
}
