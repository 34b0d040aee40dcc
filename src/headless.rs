use crate::input_script::InputScript;
use anyhow::{Context, Result};
use mdsandbox_core::SimTick;
use mdsandbox_testkit::{
    BlockMetrics, EventRecord, ExecutionMetrics, JsonlSink, MetricsReportBuilder, MetricsSink,
    PersistenceMetrics, PopulationMetrics, TerrainMetrics,
};
use mdsandbox_world::{GameConfig, GameState, TerrainGenerator};
use std::path::PathBuf;
use std::time::Instant;
use tracing::{info, warn};

pub struct HeadlessConfig {
    pub game: GameConfig,
    pub ticks: u64,
    pub dt_ms: f32,
    pub script: Option<PathBuf>,
    pub events: Option<PathBuf>,
    pub save: Option<PathBuf>,
    pub load: Option<PathBuf>,
    pub metrics: Option<PathBuf>,
}

/// What a finished run did.
#[derive(Debug, Clone, PartialEq)]
pub struct RunSummary {
    pub ticks: u64,
    pub events: usize,
    pub blocks_broken: usize,
    pub kills: usize,
    pub player_health: f32,
    pub time_string: String,
}

pub fn run(cfg: HeadlessConfig) -> Result<RunSummary> {
    let started = Instant::now();
    let (world, stats) = TerrainGenerator::new(cfg.game.seed)
        .generate_with_stats(cfg.game.width, cfg.game.height);
    let gen_time_ms = started.elapsed().as_secs_f64() * 1000.0;
    let terrain = TerrainMetrics {
        width: world.width(),
        height: world.height(),
        trees: stats.trees,
        cave_cells: stats.cave_cells,
        river_columns: stats.river_columns,
        gen_time_ms,
    };
    let mut game = GameState::from_world(cfg.game, world);

    if let Some(path) = &cfg.load {
        game.load_from(path)
            .with_context(|| format!("failed to load save {}", path.display()))?;
    }

    let script = match &cfg.script {
        Some(path) => InputScript::from_path(path)
            .with_context(|| format!("failed to load input script {}", path.display()))?,
        None => InputScript::default(),
    };
    if script.end_tick().0 > cfg.ticks {
        warn!(
            script_end = script.end_tick().0,
            ticks = cfg.ticks,
            "Input script runs past the last simulated tick"
        );
    }

    let mut sink = cfg
        .events
        .as_ref()
        .map(JsonlSink::create)
        .transpose()
        .context("failed to open event log")?;

    let mut execution = ExecutionMetrics {
        ticks: cfg.ticks,
        ..ExecutionMetrics::default()
    };
    let mut events = 0;
    for step in 0..cfg.ticks {
        let input = script.input_at(SimTick(step));
        let report = game.tick(&input, cfg.dt_ms);
        for event in &report.events {
            execution.record_event(event.kind());
            if let Some(sink) = sink.as_mut() {
                sink.write(&EventRecord {
                    tick: report.tick,
                    kind: event.kind(),
                    payload: event,
                })?;
            }
        }
        events += report.events.len();
    }
    if let Some(sink) = sink.as_mut() {
        sink.flush()?;
    }

    let mut persistence = None;
    if let Some(path) = &cfg.save {
        let save_started = Instant::now();
        game.save_to(path)
            .with_context(|| format!("failed to write save {}", path.display()))?;
        let bytes_written = std::fs::metadata(path).map(|meta| meta.len()).unwrap_or(0);
        persistence = Some(PersistenceMetrics {
            bytes_written,
            save_time_ms: save_started.elapsed().as_secs_f64() * 1000.0,
        });
        info!(path = %path.display(), bytes_written, "Save written");
    }

    let summary = RunSummary {
        ticks: cfg.ticks,
        events,
        blocks_broken: execution.event_count("block_broken"),
        kills: execution.event_count("entity_killed"),
        player_health: game.player.health(),
        time_string: game.clock.time_string(),
    };

    if let Some(path) = &cfg.metrics {
        execution.duration_seconds = started.elapsed().as_secs_f64();
        let population = PopulationMetrics {
            enemies_spawned: execution.event_count("enemy_spawned"),
            animals_spawned: execution.event_count("animal_spawned"),
            kills: summary.kills,
            player_respawns: execution.event_count("player_respawned"),
        };
        let blocks = BlockMetrics {
            broken: summary.blocks_broken,
            placed: execution.event_count("block_placed"),
        };
        let mut builder = MetricsReportBuilder::new("headless")
            .terrain(terrain)
            .population(population)
            .blocks(blocks)
            .execution(execution);
        if let Some(persistence) = persistence {
            builder = builder.persistence(persistence);
        }
        MetricsSink::create(path)?.write(&builder.build())?;
    }

    info!(
        ticks = summary.ticks,
        events = summary.events,
        health = summary.player_health,
        time = %summary.time_string,
        "Headless run finished"
    );
    Ok(summary)
}
