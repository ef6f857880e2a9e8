use std::collections::HashSet;
use std::fmt::Debug;
use std::fs::File;
use std::io::prelude::*;
use std::io::BufReader;
use std::path::Path;

use crate::constants::*;
use crate::errors::*;
use crate::indel;
use crate::profile::{frame_split, Profile};
use crate::table;

/// Per-feature coefficients ("theta") of the log-linear model.
#[derive(Clone, Debug, PartialEq)]
pub struct TrainedModel {
    columns: Vec<String>,
    theta: Vec<f64>,
    metadata: Vec<(String, String)>,
}

impl TrainedModel {
    pub fn new(columns: Vec<String>, theta: Vec<f64>) -> Result<TrainedModel> {
        if columns.len() != theta.len() {
            let msg = format!(
                "{} feature columns but {} coefficients",
                columns.len(),
                theta.len()
            );
            return Err(ErrorKind::MalformedTable(msg).into());
        }

        check_unique(&columns)?;

        Ok(TrainedModel {
            columns,
            theta,
            metadata: Vec::new(),
        })
    }

    pub fn columns(&self) -> &[String] {
        &self.columns
    }

    pub fn theta(&self) -> &[f64] {
        &self.theta
    }

    /// Training-set information carried along with the coefficients.
    pub fn metadata(&self) -> &[(String, String)] {
        &self.metadata
    }

    pub fn coefficient(&self, column: &str) -> Option<f64> {
        self.columns
            .iter()
            .position(|c| c == column)
            .map(|idx| self.theta[idx])
    }

    /// Parses a model file: `# key: value` lines hold metadata, every other
    /// non-blank line is `<column>\t<coefficient>`.
    pub fn parse<R: BufRead>(reader: R) -> Result<TrainedModel> {
        let mut columns = Vec::new();
        let mut theta = Vec::new();
        let mut metadata = Vec::new();

        for (idx, line) in reader.lines().enumerate() {
            let line = line.chain_err(|| "error reading line from model")?;
            let line = line.trim_end();

            if let Some(comment) = line.strip_prefix('#') {
                let comment = comment.trim_start_matches('#');
                if let Some(pos) = comment.find(':') {
                    let key = comment[..pos].trim().to_owned();
                    let value = comment[pos + 1..].trim().to_owned();
                    metadata.push((key, value));
                }
                continue;
            } else if line.trim().is_empty() {
                continue;
            }

            let row: Vec<&str> = line.split('\t').collect();
            if row.len() != 2 {
                let msg = format!("model line {} has {} column(s), expected 2", idx + 1, row.len());
                return Err(ErrorKind::MalformedTable(msg).into());
            }

            columns.push(row[0].to_owned());
            theta.push(table::parse_f64(row[1], row[0])?);
        }

        let mut model = TrainedModel::new(columns, theta)?;
        model.metadata = metadata;

        Ok(model)
    }

    pub fn read<P: AsRef<Path> + Debug>(path: &P) -> Result<TrainedModel> {
        let file = File::open(path).chain_err(|| format!("failed to open model {:?}", path))?;

        TrainedModel::parse(BufReader::new(file))
    }
}

fn check_unique(columns: &[String]) -> Result<()> {
    let mut seen = HashSet::new();
    for column in columns {
        if !seen.insert(column) {
            let msg = format!("duplicate feature column {:?}", column);
            return Err(ErrorKind::MalformedTable(msg).into());
        }
    }

    Ok(())
}

/// Feature vectors of candidate indels, one row per token.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct FeatureMatrix {
    columns: Vec<String>,
    rows: Vec<(String, Vec<f64>)>,
    tokens: HashSet<String>,
}

impl FeatureMatrix {
    pub fn new(columns: Vec<String>) -> Result<FeatureMatrix> {
        check_unique(&columns)?;

        Ok(FeatureMatrix {
            columns,
            rows: Vec::new(),
            tokens: HashSet::new(),
        })
    }

    pub fn push_row<S: Into<String>>(&mut self, token: S, values: Vec<f64>) -> Result<()> {
        let token = token.into();
        indel::parse(&token)?;

        if values.len() != self.columns.len() {
            let msg = format!(
                "row {:?} has {} value(s) for {} column(s)",
                token,
                values.len(),
                self.columns.len()
            );
            return Err(ErrorKind::MalformedTable(msg).into());
        } else if !self.tokens.insert(token.clone()) {
            let msg = format!("duplicate candidate {:?}", token);
            return Err(ErrorKind::MalformedTable(msg).into());
        }

        self.rows.push((token, values));

        Ok(())
    }

    pub fn columns(&self) -> &[String] {
        &self.columns
    }

    pub fn rows(&self) -> &[(String, Vec<f64>)] {
        &self.rows
    }

    pub fn len(&self) -> usize {
        self.rows.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    /// Index of each requested column in this matrix, in request order.
    fn positions(&self, columns: &[String]) -> Result<Vec<usize>> {
        let mut positions = Vec::with_capacity(columns.len());
        let mut missing = Vec::new();

        for column in columns {
            match self.columns.iter().position(|c| c == column) {
                Some(idx) => positions.push(idx),
                None => missing.push(column.clone()),
            }
        }

        if missing.is_empty() {
            Ok(positions)
        } else {
            Err(ErrorKind::IncompatibleFeatureSet(missing).into())
        }
    }

    /// Parses a feature table whose header names an `Indel` column and the
    /// feature columns.
    pub fn parse<R: BufRead>(reader: R) -> Result<FeatureMatrix> {
        let mut lines = table::parse(reader)?.into_iter();
        let header = match lines.next() {
            Some(header) => header,
            None => return Err(ErrorKind::MalformedTable("empty feature table".into()).into()),
        };

        let indel_idx = match header.iter().position(|c| c == INDEL_COLUMN) {
            Some(idx) => idx,
            None => {
                let msg = format!("feature table lacks {:?} column", INDEL_COLUMN);
                return Err(ErrorKind::MalformedTable(msg).into());
            }
        };

        let columns: Vec<String> = header
            .iter()
            .enumerate()
            .filter(|&(idx, _)| idx != indel_idx)
            .map(|(_, c)| c.clone())
            .collect();

        let mut matrix = FeatureMatrix::new(columns)?;
        for row in lines {
            if row.len() != header.len() {
                let msg = format!("row has {} fields, header has {}", row.len(), header.len());
                return Err(ErrorKind::MalformedTable(msg).into());
            }

            let mut values = Vec::with_capacity(row.len() - 1);
            for (idx, value) in row.iter().enumerate() {
                if idx != indel_idx {
                    values.push(table::parse_f64(value, &header[idx])?);
                }
            }

            matrix.push_row(row[indel_idx].as_str(), values)?;
        }

        Ok(matrix)
    }

    pub fn read<P: AsRef<Path> + Debug>(path: &P) -> Result<FeatureMatrix> {
        let file = File::open(path).chain_err(|| format!("failed to open features {:?}", path))?;

        FeatureMatrix::parse(BufReader::new(file))
    }
}

/// Linear score `theta . x` of every candidate, in row order.
fn linear_scores(matrix: &FeatureMatrix, model: &TrainedModel) -> Result<Vec<f64>> {
    let positions = matrix.positions(model.columns())?;
    if matrix.columns().len() > positions.len() {
        debug!(
            "ignoring {} feature column(s) not used by the model",
            matrix.columns().len() - positions.len()
        );
    }

    if matrix.is_empty() {
        warn!("no candidate indels to score; returning empty profile");
    }

    Ok(matrix
        .rows()
        .iter()
        .map(|(_, values)| {
            positions
                .iter()
                .zip(model.theta())
                .map(|(&idx, &theta)| theta * values[idx])
                .sum()
        })
        .collect())
}

/// Builds a profile of `exp(score - shift)` weights.
fn exp_profile(matrix: &FeatureMatrix, scores: &[f64], shift: f64) -> Result<Profile> {
    let mut profile = Profile::new();
    for ((token, _), &score) in matrix.rows().iter().zip(scores) {
        let weight = (score - shift).exp();
        if !weight.is_finite() {
            return Err(ErrorKind::NonFiniteWeight(token.clone(), weight).into());
        }

        profile.insert(token.clone(), weight)?;
    }

    Ok(profile)
}

/// Scores every candidate as `exp(theta . x)`.
///
/// Columns of the matrix not used by the model are ignored; columns of the
/// model missing from the matrix are an error. Weights are not normalized.
pub fn predict(matrix: &FeatureMatrix, model: &TrainedModel) -> Result<Profile> {
    let scores = linear_scores(matrix, model)?;

    exp_profile(matrix, &scores, 0.0)
}

#[derive(Clone, Debug, PartialEq)]
pub struct PredictOptions {
    // Total the non-null weights are rescaled to, if any
    pub scale: Option<f64>,
    // Weight of the injected unedited category, if any
    pub null_weight: Option<f64>,
}

impl Default for PredictOptions {
    fn default() -> Self {
        PredictOptions {
            scale: Some(NULL_REFERENCE_WEIGHT),
            null_weight: Some(NULL_REFERENCE_WEIGHT),
        }
    }
}

#[derive(Clone, Debug, PartialEq)]
pub struct Prediction {
    pub profile: Profile,
    pub in_frame_percent: f64,
}

/// Predicts a profile and prepares it for reporting: optional rescaling to
/// a pseudo-read total, then optional injection of the unedited category.
/// The in-frame percentage is taken before the unedited category is added.
pub fn predict_with(
    matrix: &FeatureMatrix,
    model: &TrainedModel,
    options: &PredictOptions,
) -> Result<Prediction> {
    let mut profile = match options.scale {
        Some(total) => {
            // Shifting by the largest score leaves the normalized weights
            // unchanged and keeps exp() within range.
            let scores = linear_scores(matrix, model)?;
            let shift = scores.iter().cloned().fold(std::f64::NEG_INFINITY, f64::max);
            let shift = if shift.is_finite() { shift } else { 0.0 };

            exp_profile(matrix, &scores, shift)?.scaled_to(total)?
        }
        None => predict(matrix, model)?,
    };

    let in_frame_percent = frame_split(&profile)?.in_frame_percent();
    if let Some(weight) = options.null_weight {
        profile = profile.with_null(weight)?;
    }

    Ok(Prediction {
        profile,
        in_frame_percent,
    })
}
