// Copyright (c) 2025 Fabstir
// SPDX-License-Identifier: BUSL-1.1

//! Mean pooling and L2 normalization
//!
//! Reduces per-token encoder outputs to one sentence vector each:
//! attention-mask-weighted mean over the sequence axis, then scaling to
//! unit Euclidean length. This is pure array math with no device or
//! model awareness, so it is tested directly on in-memory arrays.

use crate::embeddings::EmbeddingError;
use ndarray::{ArrayView2, ArrayView3, Axis};

/// Minimum token count used as the division denominator. Keeps the mean
/// finite when a sentence tokenizes to zero real tokens.
const MIN_TOKEN_COUNT: f32 = 1e-9;

/// Pools per-token hidden states into one normalized vector per sentence.
///
/// # Arguments
/// - `hidden_states`: encoder output shaped (batch, seq_len, hidden_dim),
///   padded positions included
/// - `attention_mask`: (batch, seq_len) with 1.0 for real tokens and 0.0
///   for padding
///
/// # Algorithm
/// 1. Expand the mask over the hidden dimension and gate each token vector
/// 2. Sum gated vectors over the sequence axis (sum of real token vectors)
/// 3. Divide by the per-sentence real-token count, clamped to a minimum
///    of 1e-9 so an all-padding sentence cannot divide by zero
/// 4. L2-normalize each pooled vector
///
/// # Degenerate inputs
/// A sentence whose mask is all zeros pools to the zero vector, and the
/// zero vector is returned as-is instead of being normalized. Callers get
/// a well-shaped, NaN-free result for every sentence in the batch.
///
/// # Errors
/// Returns [`EmbeddingError::ShapeMismatch`] if the batch or sequence
/// dimensions of the two inputs disagree.
pub fn pool_and_normalize(
    hidden_states: ArrayView3<f32>,
    attention_mask: ArrayView2<f32>,
) -> Result<Vec<Vec<f32>>, EmbeddingError> {
    let (batch, seq_len, hidden_dim) = hidden_states.dim();
    let (mask_batch, mask_seq) = attention_mask.dim();

    if batch != mask_batch || seq_len != mask_seq {
        return Err(EmbeddingError::ShapeMismatch {
            hidden: vec![batch, seq_len, hidden_dim],
            mask: vec![mask_batch, mask_seq],
        });
    }

    // (B, T, 1) mask view, broadcast over the hidden dimension
    let expanded_mask = attention_mask.insert_axis(Axis(2));

    // Sum of real (non-padding) token vectors per sentence: (B, H)
    let weighted = &hidden_states * &expanded_mask;
    let summed = weighted.sum_axis(Axis(1));

    // Count of real tokens per sentence: (B,)
    let token_counts = attention_mask.sum_axis(Axis(1));

    let mut embeddings = Vec::with_capacity(batch);
    for (row, &count) in summed.outer_iter().zip(token_counts.iter()) {
        let denom = count.max(MIN_TOKEN_COUNT);
        let mut pooled: Vec<f32> = row.iter().map(|v| v / denom).collect();

        l2_normalize(&mut pooled);
        embeddings.push(pooled);
    }

    Ok(embeddings)
}

/// Scales a vector to unit Euclidean length in place.
///
/// A zero vector is left untouched; dividing by a zero norm would turn
/// every component into NaN.
pub fn l2_normalize(vector: &mut [f32]) {
    let norm = vector.iter().map(|v| v * v).sum::<f32>().sqrt();
    if norm > 0.0 {
        for v in vector.iter_mut() {
            *v /= norm;
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use ndarray::{Array2, Array3};

    const TOLERANCE: f32 = 1e-5;

    fn norm(v: &[f32]) -> f32 {
        v.iter().map(|x| x * x).sum::<f32>().sqrt()
    }

    #[test]
    fn test_shape_mismatch_rejected() {
        let hidden = Array3::<f32>::zeros((2, 4, 8));
        let mask = Array2::<f32>::ones((2, 3));

        let result = pool_and_normalize(hidden.view(), mask.view());
        assert!(matches!(
            result,
            Err(EmbeddingError::ShapeMismatch { .. })
        ));
    }

    #[test]
    fn test_batch_size_preserved() {
        let hidden = Array3::<f32>::ones((3, 5, 8));
        let mask = Array2::<f32>::ones((3, 5));

        let embeddings = pool_and_normalize(hidden.view(), mask.view()).unwrap();
        assert_eq!(embeddings.len(), 3);
        assert_eq!(embeddings[0].len(), 8);
    }

    #[test]
    fn test_empty_batch() {
        let hidden = Array3::<f32>::zeros((0, 4, 8));
        let mask = Array2::<f32>::zeros((0, 4));

        let embeddings = pool_and_normalize(hidden.view(), mask.view()).unwrap();
        assert!(embeddings.is_empty());
    }

    #[test]
    fn test_unit_norm() {
        let hidden = Array3::from_shape_fn((2, 4, 6), |(b, t, h)| {
            (b as f32 + 1.0) * 0.3 + t as f32 * 0.1 - h as f32 * 0.05
        });
        let mask = Array2::<f32>::ones((2, 4));

        let embeddings = pool_and_normalize(hidden.view(), mask.view()).unwrap();
        for emb in &embeddings {
            assert!((norm(emb) - 1.0).abs() < TOLERANCE);
        }
    }

    #[test]
    fn test_padding_positions_ignored() {
        // One sentence with 2 real tokens padded to length 4, the padded
        // positions filled with garbage that must not leak into the mean.
        let mut padded = Array3::<f32>::zeros((1, 4, 3));
        padded
            .slice_mut(ndarray::s![0, 0, ..])
            .assign(&ndarray::arr1(&[1.0, 2.0, 3.0]));
        padded
            .slice_mut(ndarray::s![0, 1, ..])
            .assign(&ndarray::arr1(&[3.0, 2.0, 1.0]));
        padded
            .slice_mut(ndarray::s![0, 2, ..])
            .assign(&ndarray::arr1(&[99.0, -99.0, 42.0]));
        padded
            .slice_mut(ndarray::s![0, 3, ..])
            .assign(&ndarray::arr1(&[-7.0, 7.0, 7.0]));
        let padded_mask = Array2::from_shape_vec((1, 4), vec![1.0, 1.0, 0.0, 0.0]).unwrap();

        // Same sentence without any padding
        let unpadded = Array3::from_shape_vec(
            (1, 2, 3),
            vec![1.0, 2.0, 3.0, 3.0, 2.0, 1.0],
        )
        .unwrap();
        let unpadded_mask = Array2::<f32>::ones((1, 2));

        let from_padded = pool_and_normalize(padded.view(), padded_mask.view()).unwrap();
        let from_unpadded = pool_and_normalize(unpadded.view(), unpadded_mask.view()).unwrap();

        for (a, b) in from_padded[0].iter().zip(from_unpadded[0].iter()) {
            assert!((a - b).abs() < TOLERANCE);
        }
    }

    #[test]
    fn test_zero_mask_yields_zero_vector() {
        let hidden = Array3::<f32>::ones((1, 3, 4));
        let mask = Array2::<f32>::zeros((1, 3));

        let embeddings = pool_and_normalize(hidden.view(), mask.view()).unwrap();
        assert_eq!(embeddings.len(), 1);
        for v in &embeddings[0] {
            assert_eq!(*v, 0.0);
            assert!(v.is_finite());
        }
    }

    #[test]
    fn test_all_ones_hidden_states() {
        // Every token vector is (1, 1): the mean is (1, 1) regardless of
        // padding, and normalization lands on (1/sqrt(2), 1/sqrt(2)).
        let hidden = Array3::<f32>::ones((2, 4, 2));
        let mask =
            Array2::from_shape_vec((2, 4), vec![1.0, 1.0, 1.0, 1.0, 1.0, 1.0, 0.0, 0.0]).unwrap();

        let embeddings = pool_and_normalize(hidden.view(), mask.view()).unwrap();
        let expected = 1.0 / 2.0_f32.sqrt();
        for emb in &embeddings {
            assert_eq!(emb.len(), 2);
            assert!((emb[0] - expected).abs() < TOLERANCE);
            assert!((emb[1] - expected).abs() < TOLERANCE);
        }
    }

    #[test]
    fn test_l2_normalize_zero_vector_untouched() {
        let mut v = vec![0.0_f32; 4];
        l2_normalize(&mut v);
        assert!(v.iter().all(|x| *x == 0.0));
    }
}
