//! Sentence pooling over token-level transformer output.

use ndarray::{ArrayView2, ArrayView3, Axis};

/// Attention-masked mean over the sequence axis.
///
/// `hidden` is `[batch, seq_len, hidden_dim]`, `mask` is `[batch, seq_len]`
/// with 1 for real tokens and 0 for padding. Returns one `hidden_dim`
/// vector per batch row.
pub fn mean_pool(hidden: ArrayView3<'_, f32>, mask: ArrayView2<'_, i64>) -> Vec<Vec<f32>> {
    let hidden_dim = hidden.shape()[2];
    let mut pooled = Vec::with_capacity(hidden.shape()[0]);

    for (row, row_mask) in hidden.axis_iter(Axis(0)).zip(mask.axis_iter(Axis(0))) {
        let mut sum = vec![0.0f32; hidden_dim];
        let mut count = 0.0f32;

        for (token, &m) in row.axis_iter(Axis(0)).zip(row_mask.iter()) {
            if m == 0 {
                continue;
            }
            count += 1.0;
            for (acc, &value) in sum.iter_mut().zip(token.iter()) {
                *acc += value;
            }
        }

        let denom = count.max(1e-9);
        for acc in &mut sum {
            *acc /= denom;
        }
        pooled.push(sum);
    }

    pooled
}

/// Scale `v` to unit L2 norm in place. Zero vectors are left untouched.
pub fn l2_normalize(v: &mut [f32]) {
    let norm = v.iter().map(|x| x * x).sum::<f32>().sqrt();
    if norm > 0.0 {
        for x in v.iter_mut() {
            *x /= norm;
        }
    }
}
