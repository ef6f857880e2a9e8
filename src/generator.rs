use std::collections::BTreeMap;
use std::fmt::Debug;
use std::fs::{self, File};
use std::io::prelude::*;
use std::io::BufReader;
use std::path::{Path, PathBuf};
use std::process::Command;
use std::sync::atomic::{AtomicUsize, Ordering};

use crate::constants::*;
use crate::errors::*;
use crate::indel;
use crate::profile::{summarize, Profile};
use crate::target::validate_target;

// Distinguishes temporary files of concurrent invocations
static INVOCATIONS: AtomicUsize = AtomicUsize::new(0);

// Number of leading read bases used to locate the read in the target
const ANCHOR_LEN: usize = 10;

/// Candidate indels mapped to their representative reads.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct Candidates {
    reads: BTreeMap<String, String>,
}

impl Candidates {
    pub fn get(&self, token: &str) -> Option<&str> {
        self.reads.get(token).map(|v| v.as_str())
    }

    pub fn len(&self) -> usize {
        self.reads.len()
    }

    pub fn is_empty(&self) -> bool {
        self.reads.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &str)> {
        self.reads.iter().map(|(k, v)| (k.as_str(), v.as_str()))
    }

    /// Parses generator output: tab-separated rows with the token first and
    /// the representative read last. Version rows mentioning `Git` are skipped.
    pub fn parse<R: BufRead>(reader: R) -> Result<Candidates> {
        let mut reads = BTreeMap::new();
        for line in reader.lines() {
            let line = line.chain_err(|| "error reading generated indels")?;
            let row: Vec<&str> = line.trim_end().split('\t').collect();
            if row[0].is_empty() || row[0].contains("Git") {
                continue;
            }

            indel::parse(row[0])?;
            reads.insert(row[0].to_owned(), row[row.len() - 1].to_owned());
        }

        Ok(Candidates { reads })
    }

    pub fn read<P: AsRef<Path> + Debug>(path: &P) -> Result<Candidates> {
        let file = File::open(path).chain_err(|| format!("failed to open reads {:?}", path))?;

        Candidates::parse(BufReader::new(file))
    }

    /// Read representing the unedited target, trimmed on the left to where
    /// the read of the smallest candidate begins.
    pub fn null_read(&self, target: &str) -> String {
        let smallest = self
            .reads
            .keys()
            .filter_map(|token| indel::parse(token).ok().map(|t| (t.size(), token)))
            .min();

        let left_trim = match smallest {
            Some((size, token)) if size > 0 => {
                let read = &self.reads[token];
                let anchor = read.get(..ANCHOR_LEN).unwrap_or(read);

                target.find(anchor).unwrap_or(0)
            }
            _ => 0,
        };

        target[left_trim..].to_owned()
    }
}

/// Runs the external candidate generator executable.
#[derive(Clone, Debug, PartialEq)]
pub struct IndelGenerator {
    executable: PathBuf,
    workdir: PathBuf,
}

impl IndelGenerator {
    pub fn new<P: Into<PathBuf>>(executable: P) -> IndelGenerator {
        IndelGenerator {
            executable: executable.into(),
            workdir: std::env::temp_dir(),
        }
    }

    /// Directory receiving the generator's temporary output files.
    pub fn with_workdir<P: Into<PathBuf>>(mut self, workdir: P) -> IndelGenerator {
        self.workdir = workdir.into();
        self
    }

    pub fn executable(&self) -> &Path {
        &self.executable
    }

    pub fn generate(&self, target: &str, pam_idx: usize) -> Result<Candidates> {
        validate_target(target, pam_idx)?;

        let output = self.workdir.join(format!(
            "genindels_{}_{}_{}.txt",
            std::process::id(),
            INVOCATIONS.fetch_add(1, Ordering::SeqCst),
            pam_idx
        ));

        debug!("running {:?} on target with PAM at {}", self.executable, pam_idx);
        let status = Command::new(&self.executable)
            .arg(target)
            .arg(pam_idx.to_string())
            .arg(&output)
            .status()
            .chain_err(|| format!("failed to run {:?}", self.executable))?;

        if !status.success() {
            let _ = fs::remove_file(&output);
            bail!("{:?} exited with {}", self.executable, status);
        }

        let candidates = File::open(&output)
            .chain_err(|| format!("failed to open generated indels {:?}", output))
            .and_then(|file| Candidates::parse(BufReader::new(file)));

        fs::remove_file(&output)
            .chain_err(|| format!("failed to remove temporary file {:?}", output))?;

        candidates
    }
}

/// Writes `<rank>\t<read>\t<token>` for every outcome shown in the summary
/// of `profile`, ranked as in the summary. Every such outcome needs a read.
pub fn write_ranked_reads(
    out: &mut dyn Write,
    profile: &Profile,
    candidates: &Candidates,
) -> Result<()> {
    let mut rank = 0;
    for entry in summarize(profile) {
        if entry.weight < DISPLAY_THRESHOLD {
            continue;
        }

        let read = match candidates.get(&entry.token) {
            Some(read) => read,
            None => {
                let msg = format!("no representative read for {:?}", entry.token);
                return Err(ErrorKind::MalformedTable(msg).into());
            }
        };

        writeln!(out, "{}\t{}\t{}", rank, read, entry.token)
            .chain_err(|| "failed to write read row")?;
        rank += 1;
    }

    Ok(())
}

/// Like `write_ranked_reads`, one block per profile; blocks are marked with
/// `@@@<id>` when more than one profile is written.
pub fn write_ranked_reads_samples(
    out: &mut dyn Write,
    samples: &[(Option<String>, &Profile, &Candidates)],
) -> Result<()> {
    for (id, profile, candidates) in samples {
        if samples.len() > 1 {
            let id = id.as_ref().map_or("", |v| v.as_str());
            writeln!(out, "{}{}", SAMPLE_MARKER, id).chain_err(|| "failed to write sample id")?;
        }

        write_ranked_reads(out, profile, candidates)?;
    }

    Ok(())
}
