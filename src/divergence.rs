use std::collections::BTreeSet;

use crate::constants::{MISSING_PSEUDOCOUNT, NULL_TOKEN};
use crate::profile::Profile;

fn support(profile: &Profile, ignore_null: bool) -> BTreeSet<&str> {
    profile
        .iter()
        .filter(|&(token, &weight)| weight > 0.0 && !(ignore_null && token == NULL_TOKEN))
        .map(|(token, _)| token.as_str())
        .collect()
}

fn weight(profile: &Profile, token: &str) -> f64 {
    profile.get(token).unwrap_or(0.0)
}

/// KL divergence of `q` from `p` in bits.
///
/// Outcomes seen in only one profile are given `missing_count` pseudo-reads
/// in the other. Returns NaN if either profile has no eligible mass, i.e.
/// the pair is not comparable.
pub fn kl_divergence(p: &Profile, q: &Profile, ignore_null: bool, missing_count: f64) -> f64 {
    let p_indels = support(p, ignore_null);
    let q_indels = support(q, ignore_null);

    let p_only: Vec<&str> = p_indels.difference(&q_indels).copied().collect();
    let q_only: Vec<&str> = q_indels.difference(&p_indels).copied().collect();

    let p_total: f64 = p_indels.iter().map(|t| weight(p, t)).sum::<f64>()
        + missing_count * q_only.len() as f64;
    let q_total: f64 = q_indels.iter().map(|t| weight(q, t)).sum::<f64>()
        + missing_count * p_only.len() as f64;

    if !(p_total > 0.0 && q_total > 0.0) {
        return std::f64::NAN;
    }

    let (p_norm, q_norm) = (1.0 / p_total, 1.0 / q_total);
    let term = |p_weight: f64, q_weight: f64| {
        p_weight * p_norm * (p_weight * p_norm / (q_weight * q_norm)).log2()
    };

    let mut score = 0.0;
    for token in p_indels.intersection(&q_indels) {
        score += term(weight(p, token), weight(q, token));
    }

    for token in &p_only {
        score += term(weight(p, token), missing_count);
    }

    for token in &q_only {
        score += term(missing_count, weight(q, token));
    }

    score
}

/// Average of the KL divergence in both directions; symmetric in `p`, `q`.
pub fn symmetric_kl_divergence(p: &Profile, q: &Profile, ignore_null: bool) -> f64 {
    0.5 * kl_divergence(p, q, ignore_null, MISSING_PSEUDOCOUNT)
        + 0.5 * kl_divergence(q, p, ignore_null, MISSING_PSEUDOCOUNT)
}

#[derive(Clone, Debug, PartialEq)]
pub struct Aggregate {
    // NaN when no comparable scores were seen
    pub mean: f64,
    pub comparable: usize,
    pub incomparable: usize,
}

/// Mean of a batch of divergence scores; incomparable (NaN) scores are
/// counted but excluded.
pub fn aggregate<I: IntoIterator<Item = f64>>(scores: I) -> Aggregate {
    let mut sum = 0.0;
    let mut comparable = 0;
    let mut incomparable = 0;

    for score in scores {
        if score.is_nan() {
            incomparable += 1;
        } else {
            sum += score;
            comparable += 1;
        }
    }

    Aggregate {
        mean: if comparable > 0 {
            sum / comparable as f64
        } else {
            std::f64::NAN
        },
        comparable,
        incomparable,
    }
}
