use std::io::Write;
use std::path::Path;

use rayon::prelude::*;

use crate::args::PredictArgs;
use crate::constants::NULL_REFERENCE_WEIGHT;
use crate::errors::*;
use crate::generator::{write_ranked_reads_samples, Candidates};
use crate::model::{predict_with, FeatureMatrix, PredictOptions, TrainedModel};
use crate::profile::{write_samples, Sample};
use crate::progress;
use crate::table::open_file_or_stdout;

fn sample_id(path: &str) -> String {
    Path::new(path)
        .file_stem()
        .map(|v| v.to_string_lossy().into_owned())
        .unwrap_or_else(|| path.to_owned())
}

fn predict_sample(
    path: &str,
    model: &TrainedModel,
    options: &PredictOptions,
) -> Result<(Sample, f64)> {
    let matrix =
        FeatureMatrix::read(&path).chain_err(|| format!("failed to read features {:?}", path))?;
    let prediction = predict_with(&matrix, model, options)
        .chain_err(|| format!("failed to predict profile for {:?}", path))?;

    let sample = Sample {
        id: Some(sample_id(path)),
        profile: prediction.profile,
    };

    Ok((sample, prediction.in_frame_percent))
}

pub fn main(args: &PredictArgs) -> Result<()> {
    if args.reads_output.is_some() && args.reads.len() != args.features.len() {
        bail!(
            "{} reads file(s) given for {} feature table(s)",
            args.reads.len(),
            args.features.len()
        );
    }

    ::rayon::ThreadPoolBuilder::new()
        .num_threads(args.threads)
        .build_global()
        .chain_err(|| "failed to build thread pool")?;

    eprintln!("\nReading model from {:?}", args.model);
    let model = TrainedModel::read(&args.model)
        .chain_err(|| format!("failed to read model {:?}", args.model))?;
    eprintln!("  model has {} feature columns", model.columns().len());

    let options = PredictOptions {
        scale: args.scale,
        null_weight: if args.null {
            Some(NULL_REFERENCE_WEIGHT)
        } else {
            None
        },
    };

    eprintln!("Predicting profiles for {} target(s)", args.features.len());
    let progress = progress::with_prefix(args.features.len(), "  ");
    let predictions = args
        .features
        .par_iter()
        .map(|path| {
            let result = predict_sample(path, &model, &options);
            progress.inc(1);

            result
        })
        .collect::<Result<Vec<_>>>()?;

    progress.finish();

    for (sample, in_frame) in &predictions {
        let id = sample.id.as_ref().map_or("", |v| v.as_str());
        eprintln!("  {}: {} outcomes, {:.1}% in frame", id, sample.profile.len(), in_frame);
    }

    let samples: Vec<Sample> = predictions.into_iter().map(|(sample, _)| sample).collect();
    let mut out = open_file_or_stdout(&args.output)?;
    write_samples(&mut out, &samples)?;
    out.flush().chain_err(|| "failed to flush output")?;

    if args.reads_output.is_some() {
        write_reads(args, &samples)?;
    }

    Ok(())
}

fn write_reads(args: &PredictArgs, samples: &[Sample]) -> Result<()> {
    eprintln!("Writing representative reads to {:?}", args.reads_output);
    let candidates = args
        .reads
        .par_iter()
        .map(|path| {
            Candidates::read(path).chain_err(|| format!("failed to read reads {:?}", path))
        })
        .collect::<Result<Vec<_>>>()?;

    let blocks: Vec<_> = samples
        .iter()
        .zip(&candidates)
        .map(|(sample, reads)| (sample.id.clone(), &sample.profile, reads))
        .collect();

    let mut out = open_file_or_stdout(&args.reads_output)?;
    write_ranked_reads_samples(&mut out, &blocks)?;
    out.flush().chain_err(|| "failed to flush reads output")
}
