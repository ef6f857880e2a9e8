use std::io::Write;

use crate::args::CandidatesArgs;
use crate::constants::NULL_TOKEN;
use crate::errors::*;
use crate::generator::IndelGenerator;
use crate::table::open_file_or_stdout;

pub fn main(args: &CandidatesArgs) -> Result<()> {
    let generator = IndelGenerator::new(&args.indelgen);

    eprintln!("\nGenerating candidate indels with {:?}", generator.executable());
    let candidates = generator
        .generate(&args.target, args.pam_index)
        .chain_err(|| "failed to generate candidate indels")?;
    eprintln!("  found {} candidate(s)", candidates.len());

    let mut out = open_file_or_stdout(&args.output)?;
    writeln!(out, "{}\t{}", NULL_TOKEN, candidates.null_read(&args.target))
        .chain_err(|| "failed to write output row")?;

    for (token, read) in candidates.iter() {
        if token != NULL_TOKEN {
            writeln!(out, "{}\t{}", token, read).chain_err(|| "failed to write output row")?;
        }
    }

    out.flush().chain_err(|| "failed to flush output")
}
