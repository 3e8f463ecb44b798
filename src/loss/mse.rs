pub struct MseLoss;

impl MseLoss {
    /// Scalar MSE: sum((expected - predicted)²) / len(expected)
    pub fn loss(predicted: &[f64], expected: &[f64]) -> f64 {
        let n = expected.len() as f64;
        predicted.iter().zip(expected.iter())
            .map(|(a, b)| (b - a).powi(2))
            .sum::<f64>() / n
    }

    /// ½·sum((predicted - expected)²); backprop differentiates this, not `loss`.
    pub fn half_sum_squared(predicted: &[f64], expected: &[f64]) -> f64 {
        0.5 * predicted.iter().zip(expected.iter())
            .map(|(a, b)| (a - b).powi(2))
            .sum::<f64>()
    }
}
