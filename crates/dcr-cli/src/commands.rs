use anyhow::{Context, Result};
use indicatif::{ProgressBar, ProgressStyle};
use tracing::{info, info_span};

use dcr_core::{CompoundLookup, DuplicateTrials, lookup_status, mention_counts, trial_types};
use dcr_ingest::append_ignored;
use dcr_lookup::CompoundLookupClient;
use dcr_model::TrialDisplay;

use dcr_cli::config::RunConfig;
use dcr_cli::pipeline::{
    Inputs, RunFlags, RunOutcome, build_normalizer, load_inputs, propose_ignores,
    read_trial_source, run,
};

use crate::cli::{
    DuplicatesArg, IgnoreArgs, LookupArgs, ReconcileArgs, SourceArgs, StatsArgs, TrialDisplayArg,
};
use crate::summary::{print_ignore_proposals, print_lookup_results, print_stats};

fn load_config(source: &SourceArgs) -> Result<RunConfig> {
    let mut config = match &source.config {
        Some(path) => RunConfig::load(path)?,
        None => RunConfig::default(),
    };
    if let Some(dir) = &source.data_dir {
        config.paths.data_dir = dir.clone();
    }
    Ok(config)
}

fn apply_overrides(config: &mut RunConfig, args: &ReconcileArgs) {
    if args.strict_synonyms {
        config.reconcile.strict_synonyms = true;
    }
    if let Some(duplicates) = args.duplicates {
        config.reconcile.duplicates = match duplicates {
            DuplicatesArg::Collapse => DuplicateTrials::Collapse,
            DuplicatesArg::Keep => DuplicateTrials::Keep,
        };
    }
    if let Some(display) = args.trial_display {
        config.reconcile.display = match display {
            TrialDisplayArg::Html => TrialDisplay::Html,
            TrialDisplayArg::Id => TrialDisplay::Id,
        };
    }
    if let Some(report) = &args.report {
        config.paths.report = Some(report.clone());
    }
}

fn lookup_progress() -> ProgressBar {
    let bar = ProgressBar::new(0);
    if let Ok(style) =
        ProgressStyle::with_template("{spinner:.cyan} lookups {pos}/{len} [{bar:30}] {wide_msg}")
    {
        bar.set_style(style.progress_chars("=> "));
    }
    bar
}

pub fn run_reconcile(args: &ReconcileArgs) -> Result<(Inputs, RunOutcome)> {
    let mut config = load_config(&args.source)?;
    apply_overrides(&mut config, args);
    config.validate()?;
    let span = info_span!("run", data_dir = %config.paths.data_dir.display());
    let _guard = span.enter();

    let client = if args.offline {
        None
    } else {
        Some(CompoundLookupClient::new(&config.lookup).context("build lookup client")?)
    };
    let lookup = client.as_ref().map(|client| client as &dyn CompoundLookup);
    let flags = RunFlags {
        refresh_lookups: args.refresh_lookups,
        dry_run: args.dry_run,
    };
    let bar = lookup_progress();
    let result = run(&config, lookup, flags, |entry, total| {
        bar.set_length(total as u64);
        bar.set_message(entry.drug_name.clone());
        bar.inc(1);
    });
    bar.finish_and_clear();
    result
}

pub fn run_lookup(args: &LookupArgs) -> Result<()> {
    let config = load_config(&args.source)?;
    let client = CompoundLookupClient::new(&config.lookup).context("build lookup client")?;
    let results: Vec<_> = args
        .names
        .iter()
        .map(|name| {
            let result = client.lookup(name);
            let status = lookup_status(&result);
            (name.clone(), status, result.unwrap_or_default())
        })
        .collect();
    print_lookup_results(&results);
    Ok(())
}

pub fn run_stats(args: &StatsArgs) -> Result<()> {
    let config = load_config(&args.source)?;
    let normalizer = build_normalizer(&config)?;
    let (path, trials) = read_trial_source(&config)?;
    let expansion = normalizer.expand(&trials.records);
    let counts = mention_counts(&expansion.mentions);
    let types = trial_types(&trials.records);
    println!("Trial export: {}", path.display());
    print_stats(&trials, &expansion, &counts, &types, args.top);
    Ok(())
}

pub fn run_ignore_unresolved(args: &IgnoreArgs) -> Result<()> {
    let config = load_config(&args.source)?;
    let inputs = load_inputs(&config)?;
    let proposals = propose_ignores(&config, &inputs)?;
    print_ignore_proposals(&proposals);
    if args.dry_run || proposals.is_empty() {
        return Ok(());
    }
    let path = config.paths.ignored_path();
    let written = append_ignored(&path, &proposals)
        .with_context(|| format!("update ignore-list {}", path.display()))?;
    info!(path = %path.display(), entries = written.len(), "updated ignore-list");
    println!("Ignore-list: {} ({} entries)", path.display(), written.len());
    Ok(())
}
