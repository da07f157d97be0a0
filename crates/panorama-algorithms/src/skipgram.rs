//! Skip-gram embedding trainer
//!
//! Fits skip-gram with negative sampling (SGNS) over a corpus of walks,
//! treating each walk as a token sequence and each node index as a token.
//! Training is single-threaded and fully determined by the configured seed.

use ndarray::Array2;
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};

/// Skip-gram training parameters
#[derive(Debug, Clone)]
pub struct SkipGramConfig {
    /// Embedding dimension
    pub dimension: usize,
    /// Context window radius on each side of the center token
    pub window: usize,
    /// Negative samples drawn per positive pair
    pub negative_samples: usize,
    /// Passes over the walk corpus
    pub epochs: usize,
    /// Initial learning rate, decayed linearly per epoch
    pub learning_rate: f64,
    /// Seed for weight initialization and negative sampling
    pub seed: u64,
}

impl Default for SkipGramConfig {
    fn default() -> Self {
        Self {
            dimension: 64,
            window: 5,
            negative_samples: 5,
            epochs: 5,
            learning_rate: 0.025,
            seed: 0,
        }
    }
}

/// Train node embeddings over the walk corpus.
///
/// Returns a `vocab_size x dimension` matrix whose row `i` is the embedding
/// of node index `i`. Nodes that never occur in `walks` keep their small
/// random initialization.
pub fn train_embeddings(
    walks: &[Vec<usize>],
    vocab_size: usize,
    config: &SkipGramConfig,
) -> Array2<f32> {
    let dim = config.dimension;
    let mut rng = StdRng::seed_from_u64(config.seed);

    // Input vectors get a small uniform init, output vectors start at zero.
    let span = 0.5 / dim as f32;
    let mut input = Array2::from_shape_fn((vocab_size, dim), |_| rng.gen_range(-span..span));
    let mut output = Array2::<f32>::zeros((vocab_size, dim));

    if vocab_size < 2 {
        return input;
    }

    let mut gradient = vec![0f32; dim];
    for epoch in 0..config.epochs {
        let progress = epoch as f64 / config.epochs.max(1) as f64;
        let lr = (config.learning_rate * (1.0 - progress)).max(config.learning_rate * 1e-2) as f32;

        for walk in walks {
            for (pos, &center) in walk.iter().enumerate() {
                let lo = pos.saturating_sub(config.window);
                let hi = (pos + config.window + 1).min(walk.len());

                for &context in &walk[lo..pos] {
                    train_pair(&mut input, &mut output, center, context, config, lr, &mut rng, &mut gradient, vocab_size);
                }
                for &context in &walk[pos + 1..hi] {
                    train_pair(&mut input, &mut output, center, context, config, lr, &mut rng, &mut gradient, vocab_size);
                }
            }
        }
    }

    input
}

#[allow(clippy::too_many_arguments)]
fn train_pair(
    input: &mut Array2<f32>,
    output: &mut Array2<f32>,
    center: usize,
    context: usize,
    config: &SkipGramConfig,
    lr: f32,
    rng: &mut StdRng,
    gradient: &mut [f32],
    vocab_size: usize,
) {
    let dim = gradient.len();
    gradient.fill(0.0);

    for sample in 0..=config.negative_samples {
        let (target, label) = if sample == 0 {
            (context, 1.0f32)
        } else {
            let mut negative = rng.gen_range(0..vocab_size);
            if negative == context {
                negative = rng.gen_range(0..vocab_size);
            }
            (negative, 0.0f32)
        };

        let dot: f32 = input.row(center).dot(&output.row(target));
        let g = (label - sigmoid(dot)) * lr;

        let mut target_row = output.row_mut(target);
        for d in 0..dim {
            gradient[d] += g * target_row[d];
            target_row[d] += g * input[[center, d]];
        }
    }

    let mut center_row = input.row_mut(center);
    for d in 0..dim {
        center_row[d] += gradient[d];
    }
}

fn sigmoid(x: f32) -> f32 {
    let clamped = x.clamp(-6.0, 6.0);
    1.0 / (1.0 + (-clamped).exp())
}
