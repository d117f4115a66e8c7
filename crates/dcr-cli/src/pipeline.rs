//! Reconciliation run: load every input, reconcile, resolve, write.
//!
//! All reads happen in [`load_inputs`] before anything is written, so a bad
//! input aborts the run with the previous outputs intact.

use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use tracing::{info, info_span};

use dcr_core::{
    CompoundLookup, LookupCache, Reconciliation, ResolveStats, reconcile, resolve_missing,
    unresolved_ignores,
};
use dcr_ingest::{
    Roster, TrialLoad, read_corrections, read_ignored, read_missing, read_roster, read_trials,
    stage_merged, stage_missing,
};
use dcr_model::{IgnoredEntry, MissingEntry};
use dcr_normalization::{CorrectionTable, NameNormalizer};

use crate::config::RunConfig;
use crate::report::RunReport;

/// Everything a run reads.
#[derive(Debug, Clone)]
pub struct Inputs {
    pub trials_path: PathBuf,
    pub roster_path: PathBuf,
    pub trials: TrialLoad,
    pub roster: Roster,
    pub ignored: Vec<IgnoredEntry>,
    /// Missing-list from the previous run, seeds the lookup cache.
    pub previous_missing: Vec<MissingEntry>,
    pub normalizer: NameNormalizer,
}

#[derive(Debug, Clone, Copy, Default)]
pub struct RunFlags {
    /// Query every missing name, ignoring answers from the previous run.
    pub refresh_lookups: bool,
    /// Compute and report without writing any file.
    pub dry_run: bool,
}

#[derive(Debug, Clone)]
pub struct RunOutcome {
    pub reconciliation: Reconciliation,
    pub lookups: ResolveStats,
    pub written: Vec<PathBuf>,
}

/// Builds the normalizer from the built-in table plus the configured file.
pub fn build_normalizer(config: &RunConfig) -> Result<NameNormalizer> {
    let mut corrections = CorrectionTable::builtin();
    if let Some(path) = config.paths.corrections_path() {
        let pairs = read_corrections(&path)
            .with_context(|| format!("read corrections {}", path.display()))?;
        corrections.extend(pairs);
    }
    Ok(NameNormalizer::new(corrections)
        .with_non_drug_prefixes(config.normalization.non_drug_prefixes.iter().cloned()))
}

/// Reads a curation list written by an earlier run; absent means empty.
fn read_optional<T>(
    path: &Path,
    what: &str,
    read: impl FnOnce(&Path) -> dcr_ingest::Result<Vec<T>>,
) -> Result<Vec<T>> {
    if !path.exists() {
        info!(path = %path.display(), "no {what} yet, starting empty");
        return Ok(Vec::new());
    }
    read(path).with_context(|| format!("read {what} {}", path.display()))
}

pub fn read_trial_source(config: &RunConfig) -> Result<(PathBuf, TrialLoad)> {
    let path = config.paths.trials_path();
    let trials = read_trials(&path, &config.trials)
        .with_context(|| format!("read trial export {}", path.display()))?;
    Ok((path, trials))
}

pub fn load_inputs(config: &RunConfig) -> Result<Inputs> {
    let span = info_span!("load_inputs", data_dir = %config.paths.data_dir.display());
    let _guard = span.enter();

    let normalizer = build_normalizer(config)?;
    let (trials_path, trials) = read_trial_source(config)?;
    let roster_path = config.paths.roster_path();
    let roster = read_roster(&roster_path, &config.roster)
        .with_context(|| format!("read roster {}", roster_path.display()))?;
    let ignored = read_optional(&config.paths.ignored_path(), "ignore-list", read_ignored)?;
    let previous_missing =
        read_optional(&config.paths.missing_path(), "missing-list", read_missing)?;

    Ok(Inputs {
        trials_path,
        roster_path,
        trials,
        roster,
        ignored,
        previous_missing,
        normalizer,
    })
}

/// Reconciles the loaded inputs. Missing names are not looked up yet.
pub fn reconcile_inputs(config: &RunConfig, inputs: &Inputs) -> Result<Reconciliation> {
    reconcile(
        inputs.roster.compounds.clone(),
        &inputs.trials.records,
        &inputs.ignored,
        &inputs.normalizer,
        &config.reconcile,
    )
    .context("reconcile trials against roster")
}

/// Attaches lookup results to the missing names.
///
/// Answers from the previous missing-list are reused unless
/// `flags.refresh_lookups` is set. With `lookup` set to `None` uncached
/// names are marked skipped. `on_progress` gets each resolved entry and the
/// number of missing names.
pub fn resolve_lookups<F>(
    inputs: &Inputs,
    reconciliation: &mut Reconciliation,
    lookup: Option<&dyn CompoundLookup>,
    flags: RunFlags,
    mut on_progress: F,
) -> ResolveStats
where
    F: FnMut(&MissingEntry, usize),
{
    let cache = if flags.refresh_lookups {
        LookupCache::default()
    } else {
        LookupCache::from_entries(&inputs.previous_missing)
    };
    let total = reconciliation.missing.len();
    resolve_missing(&mut reconciliation.missing, lookup, &cache, |entry| {
        on_progress(entry, total);
    })
}

/// Writes the merged table, the missing-list and the optional report.
///
/// Both tables are staged before either replaces its previous version, so a
/// failed write leaves the last run's pair intact.
pub fn write_outputs(config: &RunConfig, inputs: &Inputs, outcome: &mut RunOutcome) -> Result<()> {
    let merged_path = config.paths.merged_path();
    let merged = stage_merged(
        &merged_path,
        &inputs.roster.headers,
        &outcome.reconciliation.compounds,
        &config.roster,
        &config.merged,
    )
    .with_context(|| format!("write merged output {}", merged_path.display()))?;
    let missing_path = config.paths.missing_path();
    let missing = stage_missing(&missing_path, &outcome.reconciliation.missing)
        .with_context(|| format!("write missing-list {}", missing_path.display()))?;

    for staged in [merged, missing] {
        let path = staged.path().to_path_buf();
        staged
            .commit()
            .with_context(|| format!("replace {}", path.display()))?;
        outcome.written.push(path);
    }

    if let Some(path) = config.paths.report_path() {
        RunReport::new(inputs, outcome).write(&path)?;
        outcome.written.push(path);
    }
    for path in &outcome.written {
        info!(path = %path.display(), "wrote output");
    }
    Ok(())
}

/// Ignore-list rows for missing names the previous lookups found nothing for.
///
/// Works from the cached answers only; names never looked up are left out.
pub fn propose_ignores(config: &RunConfig, inputs: &Inputs) -> Result<Vec<IgnoredEntry>> {
    let mut reconciliation = reconcile_inputs(config, inputs)?;
    resolve_lookups(inputs, &mut reconciliation, None, RunFlags::default(), |_, _| {});
    Ok(unresolved_ignores(
        &reconciliation.missing,
        &inputs.trials.records,
        &config.curation.kept_trial_type,
    ))
}

/// Full run: load, reconcile, resolve and (unless dry-run) write.
pub fn run<F>(
    config: &RunConfig,
    lookup: Option<&dyn CompoundLookup>,
    flags: RunFlags,
    on_progress: F,
) -> Result<(Inputs, RunOutcome)>
where
    F: FnMut(&MissingEntry, usize),
{
    let inputs = load_inputs(config)?;
    let mut reconciliation = reconcile_inputs(config, &inputs)?;
    let lookups = resolve_lookups(&inputs, &mut reconciliation, lookup, flags, on_progress);
    let mut outcome = RunOutcome {
        reconciliation,
        lookups,
        written: Vec::new(),
    };
    if flags.dry_run {
        info!("dry run, no files written");
    } else {
        write_outputs(config, &inputs, &mut outcome)?;
    }
    Ok((inputs, outcome))
}
