//! Tests for build planning and the batch runner
//!
//! The meshing tool is replaced by `RecordingMeshBuilder`, which records every
//! request and fails the seeds it is told to.

use std::collections::HashSet;
use std::path::{Path, PathBuf};
use std::sync::Mutex;

use crate::batch::{BatchConfig, BuildPlan, BuildProgress, run_builds};
use crate::error::{ArgumentError, ExternalToolError, PlanError, SchemaError};
use crate::mesh::{MeshArtifact, MeshBuilder, MeshRequest, MeshTemplate};
use crate::sweep::{GLOBAL_SEED, Schema, build_default_schema, build_schema};

#[derive(Default)]
struct RecordingMeshBuilder {
    requests: Mutex<Vec<MeshRequest>>,
    failing_seeds: Vec<f64>,
}

impl RecordingMeshBuilder {
    fn failing(seeds: &[f64]) -> Self {
        Self {
            failing_seeds: seeds.to_vec(),
            ..Default::default()
        }
    }

    fn recorded_labels(&self) -> Vec<String> {
        let mut labels: Vec<_> = self
            .requests
            .lock()
            .unwrap()
            .iter()
            .map(|r| r.label.clone())
            .collect();
        labels.sort();
        labels
    }
}

impl MeshBuilder for RecordingMeshBuilder {
    fn build(&self, request: &MeshRequest) -> Result<MeshArtifact, ExternalToolError> {
        self.requests.lock().unwrap().push(request.clone());
        if self.failing_seeds.contains(&request.seed.get()) {
            return Err(ExternalToolError::Failed {
                program: "mesher".to_string(),
                status: Some(1),
                stderr: format!("degenerate mesh at size {}", request.seed),
            });
        }
        Ok(MeshArtifact {
            label: request.label.clone(),
            seed: request.seed,
            export_path: request.export_path.clone(),
            journal_path: None,
        })
    }
}

fn plan(schema: &Schema) -> BuildPlan {
    BuildPlan::new(schema, &MeshTemplate::default(), Path::new("out"), "model").unwrap()
}

#[test]
fn plan_has_one_request_per_set() {
    let plan = plan(&build_default_schema());
    assert_eq!(plan.len(), 4);
    assert_eq!(plan.shape(), &[4]);

    let paths: Vec<_> = plan
        .builds()
        .iter()
        .map(|b| b.request.export_path.clone())
        .collect();
    assert_eq!(
        paths,
        vec![
            PathBuf::from("out/model_global_seed-1.e"),
            PathBuf::from("out/model_global_seed-0.5.e"),
            PathBuf::from("out/model_global_seed-0.25.e"),
            PathBuf::from("out/model_global_seed-0.125.e"),
        ]
    );
}

#[test]
fn export_paths_are_distinct_across_parameters() {
    let schema = Schema::new()
        .parameter(GLOBAL_SEED, &[1.0, 0.5])
        .parameter("thickness", &[1.0, 2.0, 3.0]);
    let plan = plan(&schema);

    let unique: HashSet<_> = plan
        .builds()
        .iter()
        .map(|b| b.request.export_path.clone())
        .collect();
    assert_eq!(unique.len(), 6);
    assert_eq!(
        plan.builds()[1].request.export_path,
        PathBuf::from("out/model_global_seed-1_thickness-2.e")
    );
}

#[test]
fn journal_embeds_each_sets_seed() {
    let plan = plan(&build_schema(&[0.25]));
    let journal = &plan.builds()[0].request.journal;
    assert!(journal.contains("surface 1 size 0.25\n"));
    assert!(journal.contains("export mesh \"out/model_global_seed-0.25.e\""));
}

#[test]
fn plan_requires_global_seed() {
    let schema = Schema::new().parameter("thickness", &[1.0]);
    let err = BuildPlan::new(&schema, &MeshTemplate::default(), Path::new("out"), "m").unwrap_err();
    assert_eq!(
        err,
        PlanError::Schema(SchemaError::MissingParameter(GLOBAL_SEED.to_string()))
    );
}

#[test]
fn plan_rejects_negative_seed() {
    let err = BuildPlan::new(
        &build_schema(&[0.5, -1.0]),
        &MeshTemplate::default(),
        Path::new("out"),
        "m",
    )
    .unwrap_err();
    assert!(matches!(
        err,
        PlanError::Argument(ArgumentError::OutOfDomain(_))
    ));
}

#[test]
fn plan_rejects_empty_seed_list() {
    let err = BuildPlan::new(&build_schema(&[]), &MeshTemplate::default(), Path::new("out"), "m")
        .unwrap_err();
    assert_eq!(
        err,
        PlanError::Schema(SchemaError::EmptyDomain(GLOBAL_SEED.to_string()))
    );
}

#[test]
fn runs_every_build() {
    let builder = RecordingMeshBuilder::default();
    let plan = plan(&build_default_schema());
    let progress = BuildProgress::new();

    let results = run_builds(&builder, &plan, &BatchConfig { parallel_jobs: 2 }, Some(&progress));

    assert!(results.is_complete());
    assert!(results.all_succeeded());
    assert_eq!(results.artifacts().count(), 4);
    assert_eq!(progress.completed(), 4);
    assert_eq!(
        builder.recorded_labels(),
        vec![
            "global_seed-0.125",
            "global_seed-0.25",
            "global_seed-0.5",
            "global_seed-1"
        ]
    );
}

#[test]
fn results_are_laid_out_like_the_schema() {
    let builder = RecordingMeshBuilder::default();
    let plan = plan(&build_default_schema());

    let results = run_builds(&builder, &plan, &BatchConfig::default(), None);

    let artifact = results.get(&[2]).unwrap().as_ref().unwrap();
    assert_eq!(artifact.seed.get(), 0.25);
    let in_order: Vec<f64> = results.artifacts().map(|a| a.seed.get()).collect();
    assert_eq!(in_order, vec![1.0, 0.5, 0.25, 0.125]);
}

#[test]
fn failures_are_isolated_and_verbatim() {
    let builder = RecordingMeshBuilder::failing(&[0.125]);
    let plan = plan(&build_default_schema());

    let results = run_builds(&builder, &plan, &BatchConfig::default(), None);

    assert!(results.is_complete());
    assert!(!results.all_succeeded());
    assert_eq!(results.artifacts().count(), 3);

    let failures: Vec<_> = results.failures().collect();
    assert_eq!(failures.len(), 1);
    let (set, err) = failures[0];
    assert_eq!(set.get(GLOBAL_SEED), Some(&0.125));
    assert_eq!(
        err.to_string(),
        "'mesher' exited with status 1: degenerate mesh at size 0.125"
    );
}

#[test]
fn cancelled_batch_starts_nothing() {
    let builder = RecordingMeshBuilder::default();
    let plan = plan(&build_default_schema());
    let progress = BuildProgress::new();
    progress.cancel();

    let results = run_builds(&builder, &plan, &BatchConfig::default(), Some(&progress));

    assert_eq!(results.completed_count(), 0);
    assert!(!results.is_complete());
    assert!(results.get(&[0]).is_none());
    assert!(builder.recorded_labels().is_empty());
}

#[test]
fn cancelling_a_clone_stops_the_batch() {
    let builder = RecordingMeshBuilder::default();
    let plan = plan(&build_default_schema());
    let progress = BuildProgress::new();
    let handle = progress.clone();
    handle.cancel();

    let results = run_builds(&builder, &plan, &BatchConfig { parallel_jobs: 1 }, Some(&progress));

    assert!(progress.is_cancelled());
    assert_eq!(progress.completed(), 0);
    assert_eq!(results.completed_count(), 0);
}
