use std::error::Error;
use std::path::PathBuf;

use clap::{Parser, error::ErrorKind};

use crate::config::LoaderConfig;
use crate::constants::datasets::CIFAR10;
use crate::constants::sampler::DEFAULT_SEED;
use crate::loader::{LoaderPlan, TrainSampler};
use crate::metrics::batch_composition;
use crate::sampler::BatchSampler;

#[derive(Debug, Parser)]
#[command(
    name = "batch_preview",
    disable_help_subcommand = true,
    about = "Preview semi-supervised training batches",
    long_about = "Discover an image folder dataset, apply a label manifest, and print the first training batches with their labeled/unlabeled makeup.",
    after_help = "The data directory must contain `train/<class>/...` and `val/<class>/...` image folders."
)]
/// CLI for `batch_preview`.
///
/// Common usage:
/// - Two-stream batches: `--data-dir data/cifar10 --labels labels/00.txt`
/// - Labeled-only batches: add `--exclude-unlabeled`
/// - Machine-readable batches: add `--json`
struct BatchPreviewCli {
    #[arg(long = "data-dir", value_name = "DIR", help = "Dataset root holding train/ and val/")]
    data_dir: PathBuf,
    #[arg(
        long,
        value_name = "PATH",
        help = "Two-column label manifest (`<file name> <class>` per line)"
    )]
    labels: Option<PathBuf>,
    #[arg(long, default_value = CIFAR10, help = "Dataset profile name")]
    dataset: String,
    #[arg(
        long = "batch-size",
        default_value_t = 256,
        value_parser = parse_positive_usize,
        help = "Total positions per training batch"
    )]
    batch_size: usize,
    #[arg(
        long = "labeled-batch-size",
        default_value_t = 62,
        help = "Labeled positions per training batch"
    )]
    labeled_batch_size: usize,
    #[arg(
        long = "exclude-unlabeled",
        help = "Sample labeled positions only (drops the unlabeled stream)"
    )]
    exclude_unlabeled: bool,
    #[arg(long, default_value_t = 4, help = "Training loader workers")]
    workers: usize,
    #[arg(long, default_value_t = DEFAULT_SEED, help = "Deterministic seed")]
    seed: u64,
    #[arg(long, default_value_t = 3, help = "Number of batches to print")]
    limit: usize,
    #[arg(long, help = "Print each batch as a JSON array of positions")]
    json: bool,
}

impl BatchPreviewCli {
    fn loader_config(&self) -> LoaderConfig {
        LoaderConfig {
            dataset: self.dataset.clone(),
            batch_size: self.batch_size,
            labeled_batch_size: self.labeled_batch_size,
            exclude_unlabeled: self.exclude_unlabeled,
            labels: self.labels.clone(),
            workers: self.workers,
        }
    }
}

/// Run the batch preview CLI with `args_iter` (program name excluded).
pub fn run_batch_preview<I>(args_iter: I) -> Result<(), Box<dyn Error>>
where
    I: Iterator<Item = String>,
{
    let _ = tracing_subscriber::fmt()
        .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
        .try_init();

    let Some(cli) =
        parse_cli::<BatchPreviewCli, _>(std::iter::once("batch_preview".to_string()).chain(args_iter))?
    else {
        return Ok(());
    };

    let config = cli.loader_config();
    let mut plan = LoaderPlan::build(config, &cli.data_dir, cli.seed)?;

    if !cli.json {
        println!("config: {}", serde_json::to_string(&plan.config)?);
        println!(
            "train: {} samples ({} labeled, {} unlabeled)",
            plan.train.len(),
            plan.train.labeled_positions.len(),
            plan.train.unlabeled_positions.len()
        );
        let mode = match &plan.train_sampler {
            TrainSampler::TwoStream(sampler) => format!(
                "two-stream ({} labeled + {} unlabeled)",
                sampler.labeled_batch_size(),
                sampler.unlabeled_batch_size()
            ),
            TrainSampler::LabeledOnly(_) => "labeled only".to_string(),
        };
        println!(
            "sampler: {mode}, {} batches of {} per pass",
            plan.train_sampler.len(),
            plan.train_sampler.batch_size()
        );
        println!(
            "eval: {} samples in {} batches; workers train={} eval={}",
            plan.eval_samples.len(),
            plan.eval_sampler.len(),
            plan.train_workers,
            plan.eval_workers
        );
    }

    let samples = &plan.train.samples;
    for (idx, batch) in plan.train_sampler.batches().take(cli.limit).enumerate() {
        if cli.json {
            println!("{}", serde_json::to_string(&batch)?);
            continue;
        }
        let composition = batch_composition(samples, &batch);
        let head: Vec<String> = batch.iter().take(8).map(|pos| pos.to_string()).collect();
        println!(
            "batch {idx}: {} labeled / {} unlabeled [{}{}]",
            composition.labeled,
            composition.unlabeled,
            head.join(", "),
            if batch.len() > head.len() { ", ..." } else { "" }
        );
    }

    Ok(())
}

fn parse_positive_usize(raw: &str) -> Result<usize, String> {
    let parsed = raw.parse::<usize>().map_err(|_| {
        format!(
            "Could not parse --batch-size value '{}' as a positive integer",
            raw
        )
    })?;
    if parsed == 0 {
        return Err("--batch-size must be greater than zero".to_string());
    }
    Ok(parsed)
}

fn parse_cli<T, I>(args: I) -> Result<Option<T>, Box<dyn Error>>
where
    T: Parser,
    I: IntoIterator,
    I::Item: Into<std::ffi::OsString> + Clone,
{
    match T::try_parse_from(args) {
        Ok(cli) => Ok(Some(cli)),
        Err(err) => match err.kind() {
            ErrorKind::DisplayHelp | ErrorKind::DisplayVersion => {
                err.print()?;
                Ok(None)
            }
            _ => Err(err.into()),
        },
    }
}
