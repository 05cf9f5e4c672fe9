//! # Simulation Scheduler
//!
//! One tick = propagate, then update:
//!
//! 1. Every connection copies its source output into its target input, reading
//!    outputs as the previous tick left them.
//! 2. Every component runs `update` in workspace insertion order.
//!
//! No component observes another component's output from the same tick, which
//! keeps feedback loops bounded: a tick is always `O(connections + components)`.
//! Along a feedback-free chain a value advances one component per tick.

use serde::{Deserialize, Serialize};

use crate::signal::Signal;
use crate::workspace::Workspace;

/// Work performed by a single tick.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct TickStats {
    /// Tick number, starting at 1 for the first tick.
    pub tick: u64,
    pub connections_propagated: usize,
    pub components_updated: usize,
}

/// Drives a workspace one tick at a time.
#[derive(Clone, Debug, Default)]
pub struct Scheduler {
    ticks: u64,
}

impl Scheduler {
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of ticks executed so far.
    pub fn ticks(&self) -> u64 {
        self.ticks
    }

    pub fn step<V: Signal>(&mut self, workspace: &mut Workspace<V>) -> TickStats {
        let connections_propagated = workspace.propagate();
        let components_updated = workspace.update_components();
        self.ticks += 1;

        tracing::trace!(
            workspace = %workspace.name(),
            tick = self.ticks,
            connections_propagated,
            components_updated,
            "Tick complete"
        );

        TickStats {
            tick: self.ticks,
            connections_propagated,
            components_updated,
        }
    }

    /// Runs `count` ticks and returns the stats of the last one.
    pub fn run<V: Signal>(&mut self, workspace: &mut Workspace<V>, count: usize) -> TickStats {
        let mut last = TickStats {
            tick: self.ticks,
            ..Default::default()
        };
        for _ in 0..count {
            last = self.step(workspace);
        }
        last
    }
}
