/// inverse of the standard binary logit (logistic) CDF, scaled to
/// `loc + scale * ln(p / (1 - p))`. `p` must lie in `(0, 1)`.
pub fn inverse_binary_logit(p: f64, loc: f64, scale: f64) -> f64 {
    loc + scale * (p / (1.0 - p)).ln()
}

/// rescales a caller-visible `cutoff_prob` (fraction of demand to drop, in
/// `[0, 1]`) into the `[0.5, 1.0]` domain the inverse logit needs to stay
/// non-negative, per the path-size-logit cutoff rule.
pub fn scaled_cutoff_prob(cutoff_prob: f64) -> f64 {
    0.5 + (1.0 - cutoff_prob) * 0.5
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn midpoint_is_zero() {
        assert!((inverse_binary_logit(0.5, 0.0, 1.0)).abs() < 1e-12);
    }

    #[test]
    fn zero_cutoff_prob_scales_to_one_half() {
        assert!((scaled_cutoff_prob(0.0) - 1.0).abs() < 1e-12);
    }

    #[test]
    fn full_cutoff_prob_scales_to_one_half_boundary() {
        assert!((scaled_cutoff_prob(1.0) - 0.5).abs() < 1e-12);
    }
}
