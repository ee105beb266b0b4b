use std::path::Path;

use crate::runner::BenchmarkResult;

/// A complete baseline containing results from all scenes.
#[derive(Debug, Clone, serde::Serialize, serde::Deserialize)]
pub struct Baseline {
    pub timestamp: String,
    pub results: Vec<BenchmarkResult>,
}

/// Load a baseline from a JSON file. Returns None if the file is missing or
/// was written by an incompatible version.
pub fn load_baseline(path: &Path) -> Option<Baseline> {
    let contents = std::fs::read_to_string(path).ok()?;
    match serde_json::from_str(&contents) {
        Ok(baseline) => Some(baseline),
        Err(e) => {
            log::warn!("Ignoring unreadable baseline {}: {e}", path.display());
            None
        }
    }
}

/// Save a baseline to a JSON file.
pub fn save_baseline(path: &Path, baseline: &Baseline) -> std::io::Result<()> {
    if let Some(parent) = path.parent() {
        std::fs::create_dir_all(parent)?;
    }
    let json = serde_json::to_string_pretty(baseline).map_err(std::io::Error::other)?;
    std::fs::write(path, json)
}

/// Timing that a regression is measured on.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Metric {
    /// Mean of the steady-state frames.
    FrameMean,
    /// First frame, which builds every cache.
    InitialBuild,
}

impl Metric {
    fn label(self) -> &'static str {
        match self {
            Metric::FrameMean => "frame mean",
            Metric::InitialBuild => "initial build",
        }
    }

    fn of(self, result: &BenchmarkResult) -> f64 {
        match self {
            Metric::FrameMean => result.timings.mean_ms,
            Metric::InitialBuild => result.initial_build_ms,
        }
    }
}

/// One scene metric that got slower than the threshold allows.
#[derive(Debug, Clone, PartialEq)]
pub struct Regression {
    pub scene: String,
    pub metric: Metric,
    pub baseline_ms: f64,
    pub current_ms: f64,
    pub pct_change: f64,
}

/// Compare current results against a baseline, scene by scene. Scenes missing
/// from the baseline and metrics with a zero baseline are skipped.
pub fn compare(
    current: &[BenchmarkResult],
    baseline: &Baseline,
    threshold_pct: f64,
) -> Vec<Regression> {
    let mut regressions = Vec::new();
    for result in current {
        let Some(base) = baseline
            .results
            .iter()
            .find(|b| b.scene_name == result.scene_name)
        else {
            continue;
        };
        for metric in [Metric::FrameMean, Metric::InitialBuild] {
            let (was, now) = (metric.of(base), metric.of(result));
            if was <= 0.0 {
                continue;
            }
            let pct_change = (now - was) / was * 100.0;
            if pct_change > threshold_pct {
                regressions.push(Regression {
                    scene: result.scene_name.clone(),
                    metric,
                    baseline_ms: was,
                    current_ms: now,
                    pct_change,
                });
            }
        }
    }
    regressions
}

/// Markdown table with one row per scene: sizes, cache churn, then timings.
pub fn format_markdown(results: &[BenchmarkResult]) -> String {
    let columns = [
        "Scene",
        "Tiles",
        "Chunks",
        "Build (ms)",
        "Meshes/tick",
        "Colliders/tick",
        "Mean (ms)",
        "Median (ms)",
        "P95 (ms)",
        "P99 (ms)",
        "Max (ms)",
    ];
    let mut out = format!("| {} |\n", columns.join(" | "));
    out.push_str(&format!("|{}\n", "---|".repeat(columns.len())));

    for r in results {
        let t = &r.timings;
        out.push_str(&format!(
            "| {} | {} | {} | {:.2} | {:.1} | {:.1} | {:.2} | {:.2} | {:.2} | {:.2} | {:.2} |\n",
            r.scene_name,
            r.tile_count,
            r.chunk_count,
            r.initial_build_ms,
            r.mean_meshes_rebuilt,
            r.mean_colliders_replaced,
            t.mean_ms,
            t.median_ms,
            t.p95_ms,
            t.p99_ms,
            t.max_ms,
        ));
    }
    out
}

/// Human-readable summary of a `compare` pass.
pub fn format_comparison(regressions: &[Regression], threshold_pct: f64) -> String {
    if regressions.is_empty() {
        return format!("No regressions above {threshold_pct:.0}%.\n");
    }

    let mut out = format!(
        "{} regressions above {threshold_pct:.0}%:\n",
        regressions.len()
    );
    for r in regressions {
        out.push_str(&format!(
            "  - {} {}: {:.2}ms -> {:.2}ms (+{:.1}%)\n",
            r.scene,
            r.metric.label(),
            r.baseline_ms,
            r.current_ms,
            r.pct_change
        ));
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::runner::TimingSeries;

    fn result(name: &str, mean_ms: f64) -> BenchmarkResult {
        BenchmarkResult {
            scene_name: name.to_string(),
            tile_count: 100,
            chunk_count: 4,
            tick_count: 10,
            initial_build_ms: 4.0,
            mean_meshes_rebuilt: 2.0,
            mean_colliders_replaced: 1.0,
            timings: TimingSeries {
                mean_ms,
                median_ms: mean_ms,
                p95_ms: mean_ms,
                p99_ms: mean_ms,
                min_ms: mean_ms,
                max_ms: mean_ms,
            },
        }
    }

    #[test]
    fn test_compare_flags_only_regressions() {
        let baseline = Baseline {
            timestamp: "bench-1".to_string(),
            results: vec![result("a", 10.0), result("b", 10.0), result("c", 0.0)],
        };
        let current = [result("a", 10.5), result("b", 12.0), result("c", 5.0), result("d", 1.0)];
        let regressions = compare(&current, &baseline, 10.0);
        assert_eq!(regressions.len(), 1);
        assert_eq!(regressions[0].scene, "b");
        assert_eq!(regressions[0].metric, Metric::FrameMean);
        assert!((regressions[0].pct_change - 20.0).abs() < 1e-9);
    }

    #[test]
    fn test_compare_flags_slower_initial_build() {
        let baseline = Baseline {
            timestamp: "bench-1".to_string(),
            results: vec![result("a", 10.0)],
        };
        let mut slow_build = result("a", 10.0);
        slow_build.initial_build_ms = 8.0;
        let regressions = compare(&[slow_build], &baseline, 10.0);
        assert_eq!(regressions.len(), 1);
        assert_eq!(regressions[0].metric, Metric::InitialBuild);
        assert_eq!(regressions[0].baseline_ms, 4.0);
        assert!(format_comparison(&regressions, 10.0).contains("a initial build: 4.00ms -> 8.00ms"));
    }

    #[test]
    fn test_baseline_json_roundtrip() {
        let baseline = Baseline {
            timestamp: "bench-7".to_string(),
            results: vec![result("a", 3.0)],
        };
        let json = serde_json::to_string(&baseline).expect("serialize");
        let back: Baseline = serde_json::from_str(&json).expect("deserialize");
        assert_eq!(back.results[0].scene_name, "a");
        assert_eq!(back.results[0].timings.mean_ms, 3.0);
    }

    #[test]
    fn test_markdown_has_row_per_scene() {
        let table = format_markdown(&[result("a", 1.0), result("b", 2.0)]);
        assert_eq!(table.lines().count(), 4);
        assert!(table.lines().next().expect("header").starts_with("| Scene | Tiles |"));
        assert!(format_comparison(&[], 10.0).contains("No regressions"));
    }
}
