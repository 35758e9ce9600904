//! Agent task runtime: one tokio task per autonomous agent.

use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};

use tokio::task::{JoinError, JoinHandle};
use tokio::time::sleep;
use tracing::{debug, info};

use crate::config::ExecutorConfig;
use crate::executor::PauseSignal;
use crate::policy::{AgentPolicy, Cycle};

/// Control surface for a spawned agent.
#[derive(Debug)]
pub struct AgentHandle {
    pause: PauseSignal,
    stop: Arc<AtomicBool>,
    task: JoinHandle<u64>,
}

impl AgentHandle {
    pub fn pause(&self) {
        self.pause.pause();
    }

    pub fn resume(&self) {
        self.pause.resume();
    }

    pub fn pause_signal(&self) -> &PauseSignal {
        &self.pause
    }

    /// Ask the agent to stop after its current decision cycle.
    pub fn stop(&self) {
        self.stop.store(true, Ordering::SeqCst);
    }

    pub fn is_finished(&self) -> bool {
        self.task.is_finished()
    }

    /// Waits for the task and returns the number of completed decision cycles.
    pub async fn join(self) -> Result<u64, JoinError> {
        self.task.await
    }
}

/// Spawns `policy` onto the current tokio runtime. The task sleeps through the
/// startup delay once, then runs decision cycles `decision_interval` apart until
/// the policy finishes or a stop is requested. `pause` should be the signal the
/// policy's executor watches, so one flag holds both.
pub fn spawn_agent<P>(mut policy: P, config: &ExecutorConfig, pause: PauseSignal) -> AgentHandle
where
    P: AgentPolicy + 'static,
{
    let stop = Arc::new(AtomicBool::new(false));
    let startup = config.startup_delay();
    let interval = config.decision_interval();
    let pause_poll = config.pause_poll();

    let task = {
        let stop = Arc::clone(&stop);
        let pause = pause.clone();
        tokio::spawn(async move {
            sleep(startup).await;
            let mut cycles = 0u64;
            loop {
                if stop.load(Ordering::SeqCst) {
                    debug!(cycles, "stop requested");
                    break;
                }
                pause.wait_while_paused(pause_poll).await;
                let cycle = policy.act().await;
                cycles += 1;
                if cycle == Cycle::Finished {
                    info!(cycles, "agent finished");
                    break;
                }
                sleep(interval).await;
            }
            cycles
        })
    };

    AgentHandle { pause, stop, task }
}
