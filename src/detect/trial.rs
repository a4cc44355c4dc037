//! One Monte-Carlo trial of the naive Bayes update.

use rand::rngs::StdRng;
use rand::seq::SliceRandom;

/// Policy constants for a single trial, derived from the detector config.
#[derive(Debug, Clone, Copy)]
pub(crate) struct TrialParams {
    /// Additive smoothing term applied to every likelihood.
    pub smoothing: f64,
    /// Weight of the trained likelihood, `1 - alpha`.
    pub likelihood_weight: f64,
    pub max_updates: usize,
    pub convergence_threshold: f64,
    pub convergence_steps: usize,
}

/// Result of one trial.
#[derive(Debug, Clone)]
pub(crate) struct TrialOutcome {
    pub probabilities: Vec<f64>,
    pub updates: usize,
    pub converged: bool,
}

/// Visit `features` in a random permutation, multiplying each language's
/// probability by its smoothed likelihood and renormalizing after every step.
///
/// Stops after `max_updates` updates, or once the top probability has stayed
/// above the convergence threshold for `convergence_steps` consecutive updates.
pub(crate) fn run_trial(
    features: &[&[f64]],
    prior: &[f64],
    params: &TrialParams,
    rng: &mut StdRng,
) -> TrialOutcome {
    let mut order: Vec<usize> = (0..features.len()).collect();
    order.shuffle(rng);

    let mut prob = prior.to_vec();
    let mut updates = 0;
    let mut streak = 0;
    let mut converged = false;

    for &feature in order.iter().take(params.max_updates) {
        let likelihood = features[feature];
        for (p, &l) in prob.iter_mut().zip(likelihood) {
            *p *= params.smoothing + params.likelihood_weight * l;
        }
        let max = normalize(&mut prob);
        updates += 1;
        tracing::trace!(update = updates, max, ?prob, "bayes update");

        if max > params.convergence_threshold {
            streak += 1;
            if streak >= params.convergence_steps {
                converged = true;
                break;
            }
        } else {
            streak = 0;
        }
    }

    TrialOutcome {
        probabilities: prob,
        updates,
        converged,
    }
}

/// Scale `prob` to sum to one and return its largest entry.
///
/// A vector that has collapsed to zero is left untouched.
pub(crate) fn normalize(prob: &mut [f64]) -> f64 {
    let sum: f64 = prob.iter().sum();
    if sum > 0.0 && sum.is_finite() {
        for p in prob.iter_mut() {
            *p /= sum;
        }
    }
    prob.iter().copied().fold(0.0, f64::max)
}
