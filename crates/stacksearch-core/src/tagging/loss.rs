//! Multi-label objective
//!
//! The classifier was trained with independent binary cross-entropy per tag,
//! summed over tags and averaged over the batch. Evaluation reuses the same
//! formula so reported losses are comparable with training logs.

/// Clip bound applied to predictions before taking logs
pub const LOSS_EPSILON: f32 = 1e-7;

/// Mean over the batch of the per-sample summed binary cross-entropy
///
/// `y_true` and `y_pred` are `[batch][tags]`. Returns `0.0` for an empty batch.
pub fn multitask_loss(y_true: &[Vec<f32>], y_pred: &[Vec<f32>]) -> f32 {
    let batch = y_true.len().min(y_pred.len());
    if batch == 0 {
        return 0.0;
    }

    let total: f32 = y_true
        .iter()
        .zip(y_pred)
        .map(|(truth, pred)| sample_loss(truth, pred))
        .sum();

    total / batch as f32
}

/// Summed binary cross-entropy over the tags of one sample
pub fn sample_loss(truth: &[f32], pred: &[f32]) -> f32 {
    truth
        .iter()
        .zip(pred)
        .map(|(t, p)| {
            let p = p.clamp(LOSS_EPSILON, 1.0 - LOSS_EPSILON);
            -t * p.ln() - (1.0 - t) * (1.0 - p).ln()
        })
        .sum()
}
