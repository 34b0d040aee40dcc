//! Run metrics written as JSON next to event logs.
//!
//! A [`MetricsReport`] summarises one headless run or test: terrain shape,
//! population churn, block edits and wall time. Sections a run did not measure are
//! left out of the JSON.

use anyhow::Result;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::fs::{self, File};
use std::io::Write;
use std::path::Path;

/// Top-level metrics report.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MetricsReport {
    /// Run or test identifier
    pub test_name: String,

    /// Timestamp when metrics were collected (RFC 3339)
    pub timestamp: String,

    /// Overall result
    pub result: TestResult,

    /// World generation metrics
    #[serde(skip_serializing_if = "Option::is_none")]
    pub terrain: Option<TerrainMetrics>,

    /// Creature population metrics
    #[serde(skip_serializing_if = "Option::is_none")]
    pub population: Option<PopulationMetrics>,

    /// Block edit metrics
    #[serde(skip_serializing_if = "Option::is_none")]
    pub blocks: Option<BlockMetrics>,

    /// Save file metrics
    #[serde(skip_serializing_if = "Option::is_none")]
    pub persistence: Option<PersistenceMetrics>,

    /// Execution metrics
    pub execution: ExecutionMetrics,
}

/// Overall result status
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TestResult {
    /// Run completed
    Pass,
    /// Run failed
    Fail,
    /// Run was skipped
    Skip,
}

/// World generation metrics
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TerrainMetrics {
    /// Width in cells
    pub width: i32,
    /// Height in cells
    pub height: i32,
    /// Trees planted
    pub trees: usize,
    /// Cells hollowed out as caves
    pub cave_cells: usize,
    /// Columns flooded by rivers
    pub river_columns: usize,
    /// Generation wall time (milliseconds)
    pub gen_time_ms: f64,
}

/// Creature population metrics
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct PopulationMetrics {
    /// Hostiles spawned
    pub enemies_spawned: usize,
    /// Animals spawned
    pub animals_spawned: usize,
    /// Creatures killed
    pub kills: usize,
    /// Player respawns
    pub player_respawns: usize,
}

/// Block edit metrics
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct BlockMetrics {
    /// Blocks mined out
    pub broken: usize,
    /// Blocks placed
    pub placed: usize,
}

/// Save file metrics
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PersistenceMetrics {
    /// Size of the written save
    pub bytes_written: u64,
    /// Save wall time (milliseconds)
    pub save_time_ms: f64,
}

/// Execution metrics
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ExecutionMetrics {
    /// Ticks simulated
    pub ticks: u64,
    /// Total duration (seconds)
    pub duration_seconds: f64,
    /// Events emitted, by kind
    pub events: BTreeMap<String, usize>,
}

impl ExecutionMetrics {
    /// Count one event of `kind`.
    pub fn record_event(&mut self, kind: &str) {
        *self.events.entry(kind.to_owned()).or_default() += 1;
    }

    /// Events of `kind` seen so far.
    pub fn event_count(&self, kind: &str) -> usize {
        self.events.get(kind).copied().unwrap_or(0)
    }
}

/// Builder for constructing metrics reports
pub struct MetricsReportBuilder {
    report: MetricsReport,
}

impl MetricsReportBuilder {
    /// Create a new builder with test name
    pub fn new(test_name: impl Into<String>) -> Self {
        Self {
            report: MetricsReport {
                test_name: test_name.into(),
                timestamp: chrono::Utc::now().to_rfc3339(),
                result: TestResult::Pass,
                terrain: None,
                population: None,
                blocks: None,
                persistence: None,
                execution: ExecutionMetrics::default(),
            },
        }
    }

    /// Set result
    pub fn result(mut self, result: TestResult) -> Self {
        self.report.result = result;
        self
    }

    /// Add terrain metrics
    pub fn terrain(mut self, metrics: TerrainMetrics) -> Self {
        self.report.terrain = Some(metrics);
        self
    }

    /// Add population metrics
    pub fn population(mut self, metrics: PopulationMetrics) -> Self {
        self.report.population = Some(metrics);
        self
    }

    /// Add block metrics
    pub fn blocks(mut self, metrics: BlockMetrics) -> Self {
        self.report.blocks = Some(metrics);
        self
    }

    /// Add persistence metrics
    pub fn persistence(mut self, metrics: PersistenceMetrics) -> Self {
        self.report.persistence = Some(metrics);
        self
    }

    /// Set execution metrics
    pub fn execution(mut self, metrics: ExecutionMetrics) -> Self {
        self.report.execution = metrics;
        self
    }

    /// Build the final report
    pub fn build(self) -> MetricsReport {
        self.report
    }
}

/// Sink for writing metrics reports to JSON files
pub struct MetricsSink {
    path: std::path::PathBuf,
}

impl MetricsSink {
    /// Create a new metrics sink at the specified path
    pub fn create<P: AsRef<Path>>(path: P) -> Result<Self> {
        let path = path.as_ref().to_path_buf();

        if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
            fs::create_dir_all(parent)?;
        }

        Ok(Self { path })
    }

    /// Write metrics report to file
    pub fn write(&self, report: &MetricsReport) -> Result<()> {
        let json = serde_json::to_string_pretty(report)?;
        let mut file = File::create(&self.path)?;
        file.write_all(json.as_bytes())?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::time::{SystemTime, UNIX_EPOCH};

    #[test]
    fn metrics_report_roundtrip() {
        let mut execution = ExecutionMetrics {
            ticks: 600,
            duration_seconds: 0.25,
            ..ExecutionMetrics::default()
        };
        execution.record_event("block_broken");
        execution.record_event("block_broken");
        execution.record_event("enemy_spawned");

        let report = MetricsReportBuilder::new("headless_run")
            .terrain(TerrainMetrics {
                width: 300,
                height: 100,
                trees: 14,
                cave_cells: 120,
                river_columns: 9,
                gen_time_ms: 3.5,
            })
            .blocks(BlockMetrics {
                broken: 2,
                placed: 0,
            })
            .execution(execution)
            .build();

        let json = serde_json::to_string_pretty(&report).unwrap();
        assert!(!json.contains("population"));
        let parsed: MetricsReport = serde_json::from_str(&json).unwrap();

        assert_eq!(parsed.test_name, "headless_run");
        assert_eq!(parsed.result, TestResult::Pass);
        assert_eq!(parsed.terrain.as_ref().unwrap().trees, 14);
        assert_eq!(parsed.execution.event_count("block_broken"), 2);
        assert_eq!(parsed.execution.event_count("player_damaged"), 0);
    }

    #[test]
    fn metrics_sink_writes_file() {
        let path = std::env::temp_dir().join(format!(
            "mds-metrics-{}.json",
            SystemTime::now()
                .duration_since(UNIX_EPOCH)
                .unwrap()
                .as_nanos()
        ));

        let report = MetricsReportBuilder::new("sink_test")
            .result(TestResult::Pass)
            .build();

        let sink = MetricsSink::create(&path).unwrap();
        sink.write(&report).unwrap();

        let contents = fs::read_to_string(&path).unwrap();
        assert!(contents.contains("sink_test"));
        assert!(contents.contains("\"result\": \"pass\""));

        fs::remove_file(&path).ok();
    }
}
