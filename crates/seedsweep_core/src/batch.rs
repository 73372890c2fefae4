//! Batch mesh builds over an expanded seed schema.
//!
//! This is the thin runner the CLI uses to build one deck per parameter set.
//! It is not a scheduler: every request is independent, nothing is cached,
//! and a failed set never stops the others.
//!
//! ```ignore
//! use seedsweep_core::batch::{BatchConfig, BuildPlan, BuildProgress, run_builds};
//!
//! let plan = BuildPlan::new(&schema, &template, &output_dir, "model")?;
//! let progress = BuildProgress::new();
//! let results = run_builds(&builder, &plan, &BatchConfig::default(), Some(&progress));
//! ```

use std::path::Path;
use std::sync::Arc;
use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};

#[cfg(feature = "parallel")]
use rayon::prelude::*;
use serde::{Deserialize, Serialize};

use crate::error::{ExternalToolError, PlanError, SchemaError};
use crate::mesh::{MeshArtifact, MeshBuilder, MeshRequest, MeshTemplate};
use crate::sweep::{GLOBAL_SEED, ParameterSet, Schema, SweepGrid};
use crate::validate::Seed;

/// File extension of exported decks
pub const EXPORT_EXTENSION: &str = "e";

/// Shared handle for watching and stopping a running batch.
///
/// Clones observe the same counters, so one can be handed to another thread
/// while `run_builds` works.
#[derive(Debug, Clone, Default)]
pub struct BuildProgress {
    finished: Arc<AtomicUsize>,
    cancelled: Arc<AtomicBool>,
}

impl BuildProgress {
    pub fn new() -> Self {
        Self::default()
    }

    /// Builds that have finished, successful or not
    #[must_use]
    pub fn completed(&self) -> usize {
        self.finished.load(Ordering::Relaxed)
    }

    /// Stop the batch. Builds already running finish; the rest never start.
    pub fn cancel(&self) {
        self.cancelled.store(true, Ordering::Relaxed);
    }

    #[must_use]
    pub fn is_cancelled(&self) -> bool {
        self.cancelled.load(Ordering::Relaxed)
    }

    fn record_finished(&self) {
        self.finished.fetch_add(1, Ordering::Relaxed);
    }
}

/// Runner settings
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BatchConfig {
    /// Number of builds run at once (defaults to CPU count)
    #[serde(default = "default_parallel_jobs")]
    pub parallel_jobs: usize,
}

fn default_parallel_jobs() -> usize {
    std::thread::available_parallelism()
        .map(|n| n.get())
        .unwrap_or(1)
}

impl Default for BatchConfig {
    fn default() -> Self {
        Self {
            parallel_jobs: default_parallel_jobs(),
        }
    }
}

/// One parameter set and the request built from it
#[derive(Debug, Clone)]
pub struct PlannedBuild {
    pub set: ParameterSet<f64>,
    pub request: MeshRequest,
}

/// Every build request for a schema, in expansion order.
#[derive(Debug, Clone)]
pub struct BuildPlan {
    shape: Vec<usize>,
    builds: Vec<PlannedBuild>,
}

impl BuildPlan {
    /// Expand `schema` and render one request per parameter set.
    ///
    /// Each set must assign a valid seed to `global_seed`. Decks are exported
    /// to `output_dir/<stem>_<slug>.e`; slugs differ between sets, so no two
    /// builds write the same file.
    pub fn new(
        schema: &Schema,
        template: &MeshTemplate,
        output_dir: &Path,
        stem: &str,
    ) -> Result<Self, PlanError> {
        let sets = schema.expand()?;
        if schema.get(GLOBAL_SEED).is_none() {
            return Err(SchemaError::MissingParameter(GLOBAL_SEED.to_string()).into());
        }

        let mut builds = Vec::with_capacity(sets.len());
        for set in sets {
            let value = set
                .get(GLOBAL_SEED)
                .copied()
                .ok_or_else(|| SchemaError::MissingParameter(GLOBAL_SEED.to_string()))?;
            let seed = Seed::try_from(value)?;
            let slug = set.slug();
            let export_path = output_dir.join(format!("{stem}_{slug}.{EXPORT_EXTENSION}"));
            let request = template.request(slug, seed, export_path);
            builds.push(PlannedBuild { set, request });
        }

        Ok(Self {
            shape: schema.shape(),
            builds,
        })
    }

    pub fn builds(&self) -> &[PlannedBuild] {
        &self.builds
    }

    /// Grid shape, one dimension per schema parameter
    pub fn shape(&self) -> &[usize] {
        &self.shape
    }

    pub fn len(&self) -> usize {
        self.builds.len()
    }

    pub fn is_empty(&self) -> bool {
        self.builds.is_empty()
    }
}

/// Result of one build
pub type BuildOutcome = Result<MeshArtifact, ExternalToolError>;

/// Outcomes for every set of a plan, laid out like the schema.
///
/// A cell is `None` when its build never ran because the batch was cancelled.
#[derive(Debug, Clone)]
pub struct BuildResults {
    pub sets: Vec<ParameterSet<f64>>,
    pub outcomes: SweepGrid<Option<BuildOutcome>>,
}

impl BuildResults {
    /// Get the outcome at the given candidate indices
    #[must_use]
    pub fn get(&self, indices: &[usize]) -> Option<&BuildOutcome> {
        self.outcomes.get(indices).and_then(Option::as_ref)
    }

    /// `(set, outcome)` pairs in expansion order, skipping builds that never ran
    pub fn iter(&self) -> impl Iterator<Item = (&ParameterSet<f64>, &BuildOutcome)> {
        self.sets
            .iter()
            .zip(self.outcomes.data())
            .filter_map(|(set, outcome)| outcome.as_ref().map(|o| (set, o)))
    }

    pub fn artifacts(&self) -> impl Iterator<Item = &MeshArtifact> {
        self.iter().filter_map(|(_, outcome)| outcome.as_ref().ok())
    }

    pub fn failures(&self) -> impl Iterator<Item = (&ParameterSet<f64>, &ExternalToolError)> {
        self.iter()
            .filter_map(|(set, outcome)| outcome.as_ref().err().map(|e| (set, e)))
    }

    /// Check if every build ran
    pub fn is_complete(&self) -> bool {
        self.outcomes.data().iter().all(Option::is_some)
    }

    /// Check if every build ran and succeeded
    pub fn all_succeeded(&self) -> bool {
        self.outcomes
            .data()
            .iter()
            .all(|cell| matches!(cell, Some(Ok(_))))
    }

    #[must_use]
    pub fn completed_count(&self) -> usize {
        self.outcomes.data().iter().filter(|o| o.is_some()).count()
    }
}

/// Run every build in `plan` through `builder`.
///
/// With the `parallel` feature, up to `config.parallel_jobs` builds run at
/// once; otherwise they run in expansion order on the calling thread.
pub fn run_builds<B>(
    builder: &B,
    plan: &BuildPlan,
    config: &BatchConfig,
    progress: Option<&BuildProgress>,
) -> BuildResults
where
    B: MeshBuilder + Sync + ?Sized,
{
    tracing::info!(
        builds = plan.len(),
        jobs = config.parallel_jobs,
        "Starting mesh batch"
    );

    let run_one = |planned: &PlannedBuild| -> Option<BuildOutcome> {
        if progress.is_some_and(BuildProgress::is_cancelled) {
            return None;
        }
        let outcome = builder.build(&planned.request);
        if let Err(err) = &outcome {
            tracing::warn!(set = %planned.set, "Mesh build failed: {err}");
        }
        if let Some(p) = progress {
            p.record_finished();
        }
        Some(outcome)
    };

    let outcomes = collect_outcomes(plan, config, &run_one);

    let mut grid = SweepGrid::new(plan.shape.clone(), None);
    for (planned, outcome) in plan.builds.iter().zip(outcomes) {
        grid.set(planned.set.indices(), outcome);
    }

    let results = BuildResults {
        sets: plan.builds.iter().map(|b| b.set.clone()).collect(),
        outcomes: grid,
    };

    tracing::info!(
        completed = results.completed_count(),
        failed = results.failures().count(),
        "Mesh batch finished"
    );

    results
}

#[cfg(feature = "parallel")]
fn collect_outcomes<F>(
    plan: &BuildPlan,
    config: &BatchConfig,
    run_one: &F,
) -> Vec<Option<BuildOutcome>>
where
    F: Fn(&PlannedBuild) -> Option<BuildOutcome> + Sync,
{
    let run_all = || -> Vec<Option<BuildOutcome>> { plan.builds.par_iter().map(run_one).collect() };

    match rayon::ThreadPoolBuilder::new()
        .num_threads(config.parallel_jobs.max(1))
        .build()
    {
        Ok(pool) => pool.install(run_all),
        Err(e) => {
            tracing::warn!("Failed to build thread pool, using the global pool: {e}");
            run_all()
        }
    }
}

#[cfg(not(feature = "parallel"))]
fn collect_outcomes<F>(
    plan: &BuildPlan,
    _config: &BatchConfig,
    run_one: &F,
) -> Vec<Option<BuildOutcome>>
where
    F: Fn(&PlannedBuild) -> Option<BuildOutcome>,
{
    plan.builds.iter().map(run_one).collect()
}
