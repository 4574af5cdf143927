/// Computes the arithmetic mean of a slice of values. Returns 0.0 for empty input.
pub fn mean(values: &[f64]) -> f64 {
    if values.is_empty() {
        return 0.0;
    }
    values.iter().sum::<f64>() / values.len() as f64
}

/// Computes the population standard deviation given a pre-computed mean.
/// Returns 0.0 for empty input.
pub fn stddev(values: &[f64], mean: f64) -> f64 {
    if values.is_empty() {
        return 0.0;
    }
    let variance = values.iter().map(|v| (v - mean).powi(2)).sum::<f64>() / values.len() as f64;

    variance.sqrt()
}

/// Percentage of `part` within `total`. Returns 0.0 for an empty total.
pub fn pct(part: u64, total: u64) -> f64 {
    if total == 0 {
        return 0.0;
    }
    (part as f64 / total as f64) * 100.0
}

/// Pearson correlation coefficient over paired samples.
///
/// Returns 0.0 when either side has zero variance; a constant column carries
/// no linear signal. The result is clamped to [-1, 1] so downstream strength
/// buckets never see a float artefact beyond the legal range.
pub fn pearson(xs: &[f64], ys: &[f64]) -> f64 {
    debug_assert_eq!(xs.len(), ys.len());
    if xs.is_empty() {
        return 0.0;
    }
    let mean_x = mean(xs);
    let mean_y = mean(ys);

    let mut covariance = 0.0;
    let mut var_x = 0.0;
    let mut var_y = 0.0;
    for (x, y) in xs.iter().zip(ys) {
        let dx = x - mean_x;
        let dy = y - mean_y;
        covariance += dx * dy;
        var_x += dx * dx;
        var_y += dy * dy;
    }
    if var_x == 0.0 || var_y == 0.0 {
        return 0.0;
    }
    (covariance / (var_x * var_y).sqrt()).clamp(-1.0, 1.0)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_mean_handles_empty_and_plain_input() {
        assert_eq!(mean(&[]), 0.0);
        assert!((mean(&[2.0, 4.0, 9.0]) - 5.0).abs() < 1e-9);
    }

    #[test]
    fn test_stddev_is_population_flavoured() {
        let values = [2.0, 4.0, 4.0, 4.0, 5.0, 5.0, 7.0, 9.0];
        let m = mean(&values);
        assert!((stddev(&values, m) - 2.0).abs() < 1e-9);
    }

    #[test]
    fn test_pct_guards_zero_total() {
        assert_eq!(pct(3, 0), 0.0);
        assert!((pct(3, 4) - 75.0).abs() < 1e-9);
    }

    #[test]
    fn test_pearson_detects_perfect_linear_relations() {
        let xs = [1.0, 2.0, 3.0, 4.0];
        let up = [10.0, 20.0, 30.0, 40.0];
        let down = [8.0, 6.0, 4.0, 2.0];

        assert!((pearson(&xs, &up) - 1.0).abs() < 1e-9);
        assert!((pearson(&xs, &down) + 1.0).abs() < 1e-9);
    }

    #[test]
    fn test_pearson_is_zero_for_constant_columns() {
        let xs = [5.0, 5.0, 5.0];
        let ys = [1.0, 2.0, 3.0];
        assert_eq!(pearson(&xs, &ys), 0.0);
        assert_eq!(pearson(&ys, &xs), 0.0);
    }

    #[test]
    fn test_pearson_stays_within_unit_range() {
        let xs = [0.1, 0.2, 0.3, 0.4, 0.5];
        let ys = [0.2, 0.4, 0.6, 0.8, 1.0];
        let r = pearson(&xs, &ys);
        assert!(r <= 1.0 && r >= -1.0);
    }
}
