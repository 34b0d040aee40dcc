use anyhow::Result;
use mdsandbox_core::SimTick;
use mdsandbox_world::TickInput;
use serde::Deserialize;
use std::{fs, path::Path};

#[derive(Debug, Deserialize)]
struct InputScriptFile {
    steps: Vec<InputScriptStepDef>,
}

#[derive(Debug, Clone, Deserialize)]
struct InputScriptStepDef {
    tick: u64,
    /// Number of consecutive ticks the input is held.
    #[serde(default = "one")]
    hold: u64,
    #[serde(flatten)]
    input: TickInput,
}

fn one() -> u64 {
    1
}

#[derive(Debug, Clone)]
struct InputScriptStep {
    start: SimTick,
    end: SimTick,
    input: TickInput,
}

/// Deterministic, tick-indexed player input.
///
/// Scripts are a list of `{tick, hold, ...TickInput}` steps sorted by tick. Steps that
/// overlap on a tick are merged in file order.
#[derive(Debug, Default)]
pub struct InputScript {
    steps: Vec<InputScriptStep>,
}

impl InputScript {
    /// Load a script from a JSON file on disk.
    pub fn from_path(path: &Path) -> Result<Self> {
        let contents = fs::read_to_string(path)?;
        Self::from_str(&contents)
    }

    /// Load a script from an in-memory JSON string.
    pub fn from_str(contents: &str) -> Result<Self> {
        let file: InputScriptFile = serde_json::from_str(contents)?;
        if file.steps.is_empty() {
            anyhow::bail!("input script contains no steps");
        }

        let mut steps = Vec::with_capacity(file.steps.len());
        let mut last_tick: Option<u64> = None;
        for step in file.steps {
            if let Some(prev) = last_tick {
                if step.tick < prev {
                    anyhow::bail!("input script steps must be sorted by tick");
                }
            }
            if step.hold == 0 {
                anyhow::bail!("input script step at tick {} holds for zero ticks", step.tick);
            }
            last_tick = Some(step.tick);
            steps.push(InputScriptStep {
                start: SimTick(step.tick),
                end: SimTick(step.tick.saturating_add(step.hold)),
                input: step.input,
            });
        }

        Ok(Self { steps })
    }

    /// Merged input for `tick`. Empty when no step covers it.
    pub fn input_at(&self, tick: SimTick) -> TickInput {
        self.steps
            .iter()
            .take_while(|step| step.start <= tick)
            .filter(|step| tick < step.end)
            .fold(TickInput::default(), |acc, step| merge(acc, &step.input))
    }

    /// Last tick any step covers, plus one.
    pub fn end_tick(&self) -> SimTick {
        self.steps
            .iter()
            .map(|step| step.end)
            .max()
            .unwrap_or(SimTick::ZERO)
    }
}

fn merge(acc: TickInput, next: &TickInput) -> TickInput {
    TickInput {
        move_x: if next.move_x != 0.0 { next.move_x } else { acc.move_x },
        jump: acc.jump || next.jump,
        attack: acc.attack || next.attack,
        interact: next.interact.or(acc.interact),
        release: acc.release || next.release,
        select: next.select.or(acc.select),
        eat: acc.eat || next.eat,
        equip: acc.equip || next.equip,
    }
}
