use std::cmp::Ordering;
use std::collections::btree_map;
use std::collections::BTreeMap;
use std::fmt::Debug;
use std::fs::File;
use std::io::prelude::*;
use std::io::BufReader;
use std::path::Path;

use crate::constants::*;
use crate::errors::*;
use crate::indel::{self, Frame};
use crate::table;

/// Distribution of repair outcomes, keyed by the encoded indel token.
///
/// Weights are unnormalized pseudo-counts; every weight is finite and
/// non-negative. Iteration is ordered by token.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct Profile {
    weights: BTreeMap<String, f64>,
}

impl Profile {
    pub fn new() -> Profile {
        Profile::default()
    }

    pub fn from_pairs<I, S>(pairs: I) -> Result<Profile>
    where
        I: IntoIterator<Item = (S, f64)>,
        S: Into<String>,
    {
        let mut profile = Profile::new();
        for (token, weight) in pairs {
            profile.insert(token, weight)?;
        }

        Ok(profile)
    }

    /// Sets the weight of `token`, replacing any previous weight.
    pub fn insert<S: Into<String>>(&mut self, token: S, weight: f64) -> Result<()> {
        let token = token.into();
        check_weight(&token, weight)?;
        self.weights.insert(token, weight);

        Ok(())
    }

    /// Adds `weight` to the weight of `token`.
    pub fn add<S: Into<String>>(&mut self, token: S, weight: f64) -> Result<()> {
        let token = token.into();
        check_weight(&token, weight)?;

        let entry = self.weights.entry(token).or_insert(0.0);
        *entry += weight;

        Ok(())
    }

    pub fn get(&self, token: &str) -> Option<f64> {
        self.weights.get(token).copied()
    }

    pub fn len(&self) -> usize {
        self.weights.len()
    }

    pub fn is_empty(&self) -> bool {
        self.weights.is_empty()
    }

    pub fn iter(&self) -> btree_map::Iter<String, f64> {
        self.weights.iter()
    }

    pub fn total(&self) -> f64 {
        self.weights.values().sum()
    }

    pub fn null_weight(&self) -> f64 {
        self.get(NULL_TOKEN).unwrap_or(0.0)
    }

    /// Copy of the profile with the unedited category set to `weight`.
    pub fn with_null(&self, weight: f64) -> Result<Profile> {
        let mut profile = self.clone();
        profile.insert(NULL_TOKEN, weight)?;

        Ok(profile)
    }

    /// Copy of the profile with non-null weights rescaled to sum to `total`.
    /// Profiles without non-null mass are returned unchanged.
    pub fn scaled_to(&self, total: f64) -> Result<Profile> {
        let indel_total = self.total() - self.null_weight();
        if indel_total <= 0.0 {
            return Ok(self.clone());
        }

        let mut profile = Profile::new();
        for (token, &weight) in self.iter() {
            if token == NULL_TOKEN {
                profile.insert(token.clone(), weight)?;
            } else {
                profile.insert(token.clone(), weight * total / indel_total)?;
            }
        }

        Ok(profile)
    }
}

fn check_weight(token: &str, weight: f64) -> Result<()> {
    if weight.is_finite() && weight >= 0.0 {
        Ok(())
    } else {
        Err(ErrorKind::InvalidWeight(token.to_owned(), weight).into())
    }
}

impl<'a> IntoIterator for &'a Profile {
    type Item = (&'a String, &'a f64);
    type IntoIter = btree_map::Iter<'a, String, f64>;

    fn into_iter(self) -> Self::IntoIter {
        self.iter()
    }
}

#[derive(Clone, Debug, PartialEq)]
pub struct SummaryEntry {
    pub weight: f64,
    pub token: String,
    pub pct_of_total: f64,
    pub pct_of_non_null_total: f64,
}

fn by_weight_desc(a: &SummaryEntry, b: &SummaryEntry) -> Ordering {
    b.weight
        .partial_cmp(&a.weight)
        .unwrap_or(Ordering::Equal)
        .then_with(|| b.token.cmp(&a.token))
}

/// Ranks the entries of a profile by weight, with the unedited entry first.
pub fn summarize(profile: &Profile) -> Vec<SummaryEntry> {
    let total = profile.total();
    if total <= 0.0 {
        return Vec::new();
    }

    let null_weight = profile.null_weight();
    let indel_total = total - null_weight;

    let mut entries: Vec<SummaryEntry> = profile
        .iter()
        .map(|(token, &weight)| {
            let is_null = token == NULL_TOKEN;
            let pct_of_non_null_total = if indel_total > 0.0 {
                100.0 * weight / indel_total
            } else if is_null {
                100.0
            } else {
                0.0
            };

            SummaryEntry {
                weight,
                token: token.clone(),
                pct_of_total: 100.0 * weight / total,
                pct_of_non_null_total,
            }
        })
        .collect();

    entries.sort_by(by_weight_desc);
    if let Some(idx) = entries.iter().position(|e| e.token == NULL_TOKEN) {
        let null = entries.remove(idx);
        entries.insert(0, null);
    }

    entries
}

#[derive(Clone, Debug, PartialEq)]
pub struct FrameSplit {
    pub in_frame: f64,
    pub out_of_frame: f64,
    pub classes: BTreeMap<String, Frame>,
}

impl FrameSplit {
    /// Percentage of non-null weight that is in-frame; NaN without any.
    pub fn in_frame_percent(&self) -> f64 {
        let total = self.in_frame + self.out_of_frame;
        if total > 0.0 {
            100.0 * self.in_frame / total
        } else {
            std::f64::NAN
        }
    }
}

pub fn frame_split(profile: &Profile) -> Result<FrameSplit> {
    let mut split = FrameSplit {
        in_frame: 0.0,
        out_of_frame: 0.0,
        classes: BTreeMap::new(),
    };

    for (token, &weight) in profile {
        if token == NULL_TOKEN {
            continue;
        }

        let frame = indel::parse(token)?.frame();
        match frame {
            Frame::InFrame => split.in_frame += weight,
            Frame::OutOfFrame => split.out_of_frame += weight,
        }

        split.classes.insert(token.clone(), frame);
    }

    Ok(split)
}

/// A named profile as found in summary files.
#[derive(Clone, Debug, PartialEq)]
pub struct Sample {
    pub id: Option<String>,
    pub profile: Profile,
}

/// Writes retained entries as `<token>\t-\t<count>`, counts rounded half
/// to even.
pub fn write_summary(out: &mut dyn Write, profile: &Profile) -> Result<()> {
    for entry in summarize(profile) {
        if entry.weight < DISPLAY_THRESHOLD {
            continue;
        }

        writeln!(out, "{}\t-\t{}", entry.token, entry.weight.round_ties_even())
            .chain_err(|| "failed to write summary row")?;
    }

    Ok(())
}

/// Writes one block per sample; blocks are marked with `@@@<id>` when more
/// than one sample is written.
pub fn write_samples(out: &mut dyn Write, samples: &[Sample]) -> Result<()> {
    for sample in samples {
        if samples.len() > 1 {
            let id = sample.id.as_ref().map_or("", |v| v.as_str());
            writeln!(out, "{}{}", SAMPLE_MARKER, id).chain_err(|| "failed to write sample id")?;
        }

        write_summary(out, &sample.profile)?;
    }

    Ok(())
}

pub fn parse_samples<R: BufRead>(reader: R) -> Result<Vec<Sample>> {
    let mut samples: Vec<Sample> = Vec::new();

    for (idx, line) in reader.lines().enumerate() {
        let line = line.chain_err(|| "error reading line from summary")?;
        let line = line.trim_end();

        if let Some(id) = line.strip_prefix(SAMPLE_MARKER) {
            samples.push(Sample {
                id: Some(id.to_owned()),
                profile: Profile::new(),
            });
            continue;
        } else if line.trim().is_empty() {
            continue;
        }

        let row: Vec<&str> = line.split('\t').collect();
        if row.len() < 2 {
            let msg = format!("line {} has {} column(s), expected at least 2", idx + 1, row.len());
            return Err(ErrorKind::MalformedTable(msg).into());
        }

        let weight = table::parse_f64(row[row.len() - 1], "outcome count")?;
        if samples.is_empty() {
            samples.push(Sample {
                id: None,
                profile: Profile::new(),
            });
        }

        if let Some(sample) = samples.last_mut() {
            sample.profile.add(row[0], weight)?;
        }
    }

    Ok(samples)
}

pub fn read_samples<P: AsRef<Path> + Debug>(path: &P) -> Result<Vec<Sample>> {
    let file = File::open(path).chain_err(|| format!("failed to open summary {:?}", path))?;

    parse_samples(BufReader::new(file))
}
