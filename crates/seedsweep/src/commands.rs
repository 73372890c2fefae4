//! Subcommand handlers.
//!
//! Each handler writes its normal output to `out` so it can be tested without
//! touching stdout.

use std::io::Write;
use std::path::{Path, PathBuf};

use color_eyre::eyre::{WrapErr, bail, eyre};
use seedsweep_core::batch::{BuildPlan, BuildProgress, EXPORT_EXTENSION, run_builds};
use seedsweep_core::{DEFAULT_GLOBAL_SEED, MeshBuilder, Schema, Seed, build_schema};

use crate::cli::{Command, Format, SchemaSource, SeedArgs};
use crate::config::SweepSettings;
use crate::manifest::{BuildManifest, EntryStatus};

/// Run one subcommand against `settings`
pub fn run(
    command: Command,
    settings: &SweepSettings,
    config_path: &Path,
    out: &mut impl Write,
) -> color_eyre::Result<()> {
    match command {
        Command::Schema { seeds, format } => print_schema(&schema_from_seeds(&seeds), format, out),
        Command::Expand { source } => expand(&load_schema(&source)?, out),
        Command::Journal { seed, export } => {
            let export = export.unwrap_or_else(|| default_export(settings));
            journal(settings, Seed::new(seed)?, &export, out)
        }
        Command::Build {
            source,
            output_dir,
            jobs,
        } => {
            let mut settings = settings.clone();
            if let Some(dir) = output_dir {
                settings.output_dir = dir;
            }
            if jobs.is_some() {
                settings.jobs = jobs;
            }
            let builder = settings.mesh_builder();
            build(&settings, &load_schema(&source)?, &builder, out)
        }
        Command::InitConfig { force } => init_config(config_path, force, out),
    }
}

/// Schema over the given seeds, or [`DEFAULT_GLOBAL_SEED`] when none were passed
pub fn schema_from_seeds(args: &SeedArgs) -> Schema {
    if args.seeds.is_empty() {
        build_schema(&DEFAULT_GLOBAL_SEED)
    } else {
        build_schema(&args.seeds)
    }
}

/// Read the schema file, or build one from the seed flags
pub fn load_schema(source: &SchemaSource) -> color_eyre::Result<Schema> {
    let Some(path) = &source.schema else {
        return Ok(schema_from_seeds(&source.seeds));
    };

    let content = std::fs::read_to_string(path)
        .wrap_err_with(|| format!("Failed to read schema {}", path.display()))?;

    let is_json = path
        .extension()
        .is_some_and(|ext| ext.eq_ignore_ascii_case("json"));
    let schema = if is_json {
        Schema::from_json(&content)
    } else {
        Schema::from_yaml(&content)
    };
    schema.wrap_err_with(|| format!("Invalid schema {}", path.display()))
}

fn default_export(settings: &SweepSettings) -> PathBuf {
    settings
        .output_dir
        .join(format!("{}.{EXPORT_EXTENSION}", settings.stem))
}

fn print_schema(schema: &Schema, format: Format, out: &mut impl Write) -> color_eyre::Result<()> {
    let text = match format {
        Format::Json => schema.to_json()?,
        Format::Yaml => schema.to_yaml()?,
    };
    writeln!(out, "{}", text.trim_end())?;
    Ok(())
}

fn expand(schema: &Schema, out: &mut impl Write) -> color_eyre::Result<()> {
    for set in schema.expand()? {
        writeln!(out, "{}", serde_json::to_string(&set)?)?;
    }
    Ok(())
}

fn journal(
    settings: &SweepSettings,
    seed: Seed,
    export: &Path,
    out: &mut impl Write,
) -> color_eyre::Result<()> {
    write!(out, "{}", settings.template.render(seed, export))?;
    Ok(())
}

/// Build every parameter set with `builder` and write the manifest.
///
/// Fails after writing the manifest if any build failed.
pub fn build<B>(
    settings: &SweepSettings,
    schema: &Schema,
    builder: &B,
    out: &mut impl Write,
) -> color_eyre::Result<()>
where
    B: MeshBuilder + Sync + ?Sized,
{
    let plan = BuildPlan::new(schema, &settings.template, &settings.output_dir, &settings.stem)?;
    std::fs::create_dir_all(&settings.output_dir).wrap_err_with(|| {
        format!(
            "Failed to create output directory {}",
            settings.output_dir.display()
        )
    })?;

    let progress = BuildProgress::new();
    let results = run_builds(builder, &plan, &settings.batch_config(), Some(&progress));

    let manifest = BuildManifest::new(&settings.mesher.program, schema, &results);
    let manifest_path = settings.manifest_path();
    manifest.save(&manifest_path)?;

    for entry in &manifest.builds {
        match (&entry.export, &entry.error) {
            (Some(export), _) => writeln!(out, "built   {} -> {}", entry.set, export.display())?,
            (None, Some(error)) => writeln!(out, "failed  {}: {error}", entry.set)?,
            (None, None) => writeln!(out, "skipped {}", entry.set)?,
        }
    }
    writeln!(out, "manifest: {}", manifest_path.display())?;

    let failed = manifest.count(EntryStatus::Failed);
    if failed > 0 {
        tracing::error!(failed, total = plan.len(), "Mesh batch had failures");
        return Err(eyre!("{failed} of {} builds failed", plan.len()));
    }
    Ok(())
}

fn init_config(path: &Path, force: bool, out: &mut impl Write) -> color_eyre::Result<()> {
    if path.exists() && !force {
        bail!(
            "{} already exists (use --force to replace it)",
            path.display()
        );
    }
    SweepSettings::default().save(path)?;
    writeln!(out, "wrote {}", path.display())?;
    Ok(())
}
