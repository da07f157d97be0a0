//! Average-linkage agglomerative clustering
//!
//! Operates on an embedding matrix: condensed Euclidean pairwise distances, a
//! percentile helper for deriving the merge cutoff, and threshold-cut
//! clustering that produces a variable number of groups.

use ndarray::Array2;
use rayon::prelude::*;

/// Condensed pairwise Euclidean distances over the rows of `x`.
///
/// Entries are ordered `(0,1), (0,2), .., (0,n-1), (1,2), ..` — row-major
/// over the strict upper triangle.
pub fn pairwise_distances(x: &Array2<f32>) -> Vec<f64> {
    let n = x.nrows();
    if n < 2 {
        return Vec::new();
    }

    (0..n - 1)
        .into_par_iter()
        .map(|i| {
            let row = x.row(i);
            ((i + 1)..n)
                .map(|j| {
                    row.iter()
                        .zip(x.row(j).iter())
                        .map(|(a, b)| ((a - b) as f64).powi(2))
                        .sum::<f64>()
                        .sqrt()
                })
                .collect::<Vec<f64>>()
        })
        .flatten()
        .collect()
}

/// Percentile of `values` with linear interpolation between closest ranks.
///
/// `pct` is in `[0, 100]`. Returns 0.0 for an empty slice.
pub fn percentile(values: &[f64], pct: f64) -> f64 {
    if values.is_empty() {
        return 0.0;
    }

    let mut sorted = values.to_vec();
    sorted.sort_by(|a, b| a.partial_cmp(b).unwrap_or(std::cmp::Ordering::Equal));

    let rank = pct.clamp(0.0, 100.0) / 100.0 * (sorted.len() - 1) as f64;
    let lo = rank.floor() as usize;
    let hi = rank.ceil() as usize;
    if lo == hi {
        return sorted[lo];
    }
    let fraction = rank - lo as f64;
    sorted[lo] + (sorted[hi] - sorted[lo]) * fraction
}

/// Average-linkage agglomerative clustering cut at `threshold`.
///
/// Repeatedly merges the closest pair of clusters while their linkage
/// distance is within the threshold. Inter-cluster distances are maintained
/// with the size-weighted average (Lance-Williams) update, so the result
/// matches a dendrogram cut at `threshold`. Labels are normalized to `0..k`
/// in order of first appearance over the input rows.
///
/// Ties on the minimum distance resolve to the lexicographically smallest
/// cluster pair, keeping the output deterministic. The merge loop scans the
/// full distance matrix, which is quadratic per merge; acceptable for inputs
/// in the low thousands of rows.
pub fn average_linkage_labels(x: &Array2<f32>, threshold: f64) -> Vec<usize> {
    let n = x.nrows();
    if n == 0 {
        return Vec::new();
    }
    if n == 1 {
        return vec![0];
    }

    // Full symmetric distance matrix; simpler to update in place than the
    // condensed form.
    let condensed = pairwise_distances(x);
    let mut dist = vec![0.0f64; n * n];
    let mut offset = 0;
    for i in 0..n - 1 {
        for j in i + 1..n {
            dist[i * n + j] = condensed[offset];
            dist[j * n + i] = condensed[offset];
            offset += 1;
        }
    }

    let mut active = vec![true; n];
    let mut size = vec![1usize; n];
    let mut members: Vec<Vec<usize>> = (0..n).map(|i| vec![i]).collect();

    loop {
        let mut best: Option<(usize, usize, f64)> = None;
        for i in 0..n {
            if !active[i] {
                continue;
            }
            for j in i + 1..n {
                if !active[j] {
                    continue;
                }
                let d = dist[i * n + j];
                if best.map_or(true, |(_, _, bd)| d < bd) {
                    best = Some((i, j, d));
                }
            }
        }

        let (i, j, d) = match best {
            Some(found) => found,
            None => break,
        };
        if d > threshold {
            break;
        }

        // Merge j into i, updating linkage distances to every other cluster.
        let (si, sj) = (size[i] as f64, size[j] as f64);
        for k in 0..n {
            if !active[k] || k == i || k == j {
                continue;
            }
            let merged = (si * dist[i * n + k] + sj * dist[j * n + k]) / (si + sj);
            dist[i * n + k] = merged;
            dist[k * n + i] = merged;
        }
        size[i] += size[j];
        active[j] = false;
        let moved = std::mem::take(&mut members[j]);
        members[i].extend(moved);
    }

    // Normalize labels by first appearance in row order.
    let mut root_of = vec![0usize; n];
    for (root, rows) in members.iter().enumerate() {
        for &row in rows {
            root_of[row] = root;
        }
    }
    let mut label_of_root = vec![usize::MAX; n];
    let mut labels = Vec::with_capacity(n);
    let mut next = 0;
    for row in 0..n {
        let root = root_of[row];
        if label_of_root[root] == usize::MAX {
            label_of_root[root] = next;
            next += 1;
        }
        labels.push(label_of_root[root]);
    }

    labels
}
