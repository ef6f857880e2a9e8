use std::io::Write;

use rayon::prelude::*;

use crate::args::CompareArgs;
use crate::divergence::{aggregate, symmetric_kl_divergence};
use crate::errors::*;
use crate::profile::{read_samples, Sample};
use crate::table::open_file_or_stdout;

fn label(sample: &Sample) -> &str {
    sample.id.as_ref().map_or("NA", |v| v.as_str())
}

/// Pairs observed and predicted samples by ID; single unnamed samples are
/// paired with each other.
fn pair_samples<'a>(
    expected: &'a [Sample],
    predicted: &'a [Sample],
) -> Vec<(&'a Sample, &'a Sample)> {
    if expected.len() == 1 && predicted.len() == 1 {
        return vec![(&expected[0], &predicted[0])];
    }

    let mut pairs = Vec::new();
    for sample in expected {
        match predicted.iter().find(|other| other.id == sample.id) {
            Some(other) => pairs.push((sample, other)),
            None => warn!("no prediction for sample {:?}; skipping", label(sample)),
        }
    }

    pairs
}

pub fn main(args: &CompareArgs) -> Result<()> {
    ::rayon::ThreadPoolBuilder::new()
        .num_threads(args.threads)
        .build_global()
        .chain_err(|| "failed to build thread pool")?;

    eprintln!("\nReading observed profiles from {:?}", args.expected);
    let expected = read_samples(&args.expected)
        .chain_err(|| format!("failed to read profiles {:?}", args.expected))?;
    eprintln!("Reading predicted profiles from {:?}", args.predicted);
    let predicted = read_samples(&args.predicted)
        .chain_err(|| format!("failed to read profiles {:?}", args.predicted))?;

    let pairs = pair_samples(&expected, &predicted);
    eprintln!("  comparing {} sample(s)", pairs.len());

    let scores: Vec<f64> = pairs
        .par_iter()
        .map(|(obs, pred)| symmetric_kl_divergence(&obs.profile, &pred.profile, args.ignore_null))
        .collect();

    let mut out = open_file_or_stdout(&args.output)?;
    writeln!(out, "Sample\tSymmetricKL").chain_err(|| "failed to write output header")?;
    for ((sample, _), score) in pairs.iter().zip(&scores) {
        let result = if score.is_nan() {
            writeln!(out, "{}\tNA", label(sample))
        } else {
            writeln!(out, "{}\t{}", label(sample), score)
        };

        result.chain_err(|| "failed to write output row")?;
    }

    let summary = aggregate(scores);
    eprintln!(
        "  mean symmetric KL {:.4} over {} sample(s); {} not comparable",
        summary.mean, summary.comparable, summary.incomparable
    );

    out.flush().chain_err(|| "failed to flush output")
}
