use std::io::Write;

use crate::args::SummarizeArgs;
use crate::errors::*;
use crate::profile::{frame_split, read_samples, summarize};
use crate::table::open_file_or_stdout;

pub fn main(args: &SummarizeArgs) -> Result<()> {
    eprintln!("\nReading profiles from {:?}", args.profiles);
    let samples = read_samples(&args.profiles)
        .chain_err(|| format!("failed to read profiles {:?}", args.profiles))?;
    eprintln!("  read {} profile(s)", samples.len());

    let mut out = open_file_or_stdout(&args.output)?;
    writeln!(out, "Sample\tIndel\tWeight\tPercent\tPercentNonNull")
        .chain_err(|| "failed to write output header")?;

    for sample in &samples {
        let id = sample.id.as_ref().map_or("NA", |v| v.as_str());
        for entry in summarize(&sample.profile) {
            writeln!(
                out,
                "{}\t{}\t{}\t{:.3}\t{:.3}",
                id, entry.token, entry.weight, entry.pct_of_total, entry.pct_of_non_null_total
            )
            .chain_err(|| "failed to write output row")?;
        }

        let split = frame_split(&sample.profile)
            .chain_err(|| format!("failed to classify outcomes of {:?}", id))?;
        eprintln!("  {}: {:.1}% in frame", id, split.in_frame_percent());
    }

    out.flush().chain_err(|| "failed to flush output")
}
