//! Tick-driven scenario harness.
//!
//! A scenario steps a small simulation for a fixed number of ticks and captures
//! selected state after every step. The resulting report can be compared against a
//! golden file or against a second run of the same scenario.

use crate::snapshot::assert_json_snapshot;
use anyhow::Result;
use mdsandbox_core::SimTick;
use serde::Serialize;
use std::path::PathBuf;

/// Configuration for a scenario run.
#[derive(Debug, Clone)]
pub struct ScenarioConfig {
    /// Human-readable name (written into the report).
    pub name: String,
    /// Number of ticks to step (the report also holds the initial frame).
    pub ticks: u64,
}

/// Single frame captured at a given tick.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ScenarioFrame<S> {
    /// Tick number.
    pub tick: u64,
    /// Captured state.
    pub snapshot: S,
}

/// Every frame of a finished scenario.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ScenarioReport<S> {
    /// Scenario name.
    pub name: String,
    /// Frames in tick order.
    pub frames: Vec<ScenarioFrame<S>>,
}

impl<S> ScenarioReport<S> {
    /// Frame captured last.
    pub fn last(&self) -> Option<&S> {
        self.frames.last().map(|frame| &frame.snapshot)
    }
}

/// Run a scenario and return its report.
///
/// Captures the initial state at tick 0, then steps `config.ticks` times,
/// capturing after each step (so the report contains `ticks + 1` frames).
pub fn run_scenario<State, Snapshot, StepFn, SnapFn>(
    config: &ScenarioConfig,
    mut state: State,
    mut step: StepFn,
    mut snapshot: SnapFn,
) -> ScenarioReport<Snapshot>
where
    StepFn: FnMut(SimTick, &mut State),
    SnapFn: FnMut(SimTick, &State) -> Snapshot,
{
    let mut frames = Vec::with_capacity(config.ticks as usize + 1);

    let mut tick = SimTick::ZERO;
    frames.push(ScenarioFrame {
        tick: tick.0,
        snapshot: snapshot(tick, &state),
    });

    for _ in 0..config.ticks {
        step(tick, &mut state);
        tick = tick.advance(1);
        frames.push(ScenarioFrame {
            tick: tick.0,
            snapshot: snapshot(tick, &state),
        });
    }

    ScenarioReport {
        name: config.name.clone(),
        frames,
    }
}

/// Run a scenario and assert (or update) its golden file.
pub fn run_snapshot_scenario<State, Snapshot, StepFn, SnapFn>(
    config: &ScenarioConfig,
    snapshot_path: PathBuf,
    state: State,
    step: StepFn,
    snapshot: SnapFn,
) -> Result<()>
where
    Snapshot: Serialize,
    StepFn: FnMut(SimTick, &mut State),
    SnapFn: FnMut(SimTick, &State) -> Snapshot,
{
    let report = run_scenario(config, state, step, snapshot);
    assert_json_snapshot(snapshot_path, &report)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn captures_initial_and_every_step() {
        let config = ScenarioConfig {
            name: "counter".into(),
            ticks: 3,
        };
        let report = run_scenario(&config, 0u32, |tick, n| *n += tick.0 as u32 + 1, |_, n| *n);
        let values: Vec<u32> = report.frames.iter().map(|f| f.snapshot).collect();
        assert_eq!(values, vec![0, 1, 3, 6]);
        assert_eq!(report.frames[3].tick, 3);
        assert_eq!(report.last(), Some(&6));
    }

    #[test]
    fn golden_file_matches_a_replay() {
        let config = ScenarioConfig {
            name: "doubling".into(),
            ticks: 4,
        };
        let path = std::env::temp_dir()
            .join(format!("mds-scenario-{}", std::process::id()))
            .join("doubling.json");
        let report = run_scenario(&config, 1u64, |_, n| *n *= 2, |_, n| *n);
        crate::snapshot::check_json_snapshot(&path, &report, true).expect("golden written");

        run_snapshot_scenario(&config, path.clone(), 1u64, |_, n| *n *= 2, |_, n| *n)
            .expect("replay matches golden");
        assert!(
            run_snapshot_scenario(&config, path.clone(), 1u64, |_, n| *n *= 3, |_, n| *n)
                .is_err()
                || crate::snapshot::should_update_snapshots()
        );
        std::fs::remove_dir_all(path.parent().unwrap()).ok();
    }
}
