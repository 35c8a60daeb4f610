//! Text embeddings for corpus records and queries
//!
//! The default model is Harmonic Token Projection (HTP): every token is read as
//! a base-2^16 integer, reduced modulo a set of coprime moduli, and each residue
//! is projected onto the unit circle. Token vectors are mean-pooled and L2
//! normalized. Deterministic, training-free, no model file.
//!
//! See "Harmonic Token Projection: A Vocabulary-Free, Training-Free,
//! Deterministic, and Reversible Embedding Methodology" (arXiv 2511.20665).

use std::f64::consts::TAU;

use crate::error::Result;

/// Output dimension of [`HarmonicEmbedder`]
pub const EMBEDDING_DIM: usize = 384;

/// Tokens longer than this many code points are cut
const MAX_TOKEN_LENGTH: usize = 64;

/// Anything that turns text into a fixed-size vector
pub trait Embedder {
    fn dimension(&self) -> usize;

    fn embed(&self, text: &str) -> Result<Vec<f32>>;
}

/// Harmonic Token Projection embedder
#[derive(Debug, Clone)]
pub struct HarmonicEmbedder {
    moduli: Vec<u64>,
}

impl HarmonicEmbedder {
    pub fn new() -> Self {
        Self {
            moduli: first_primes(EMBEDDING_DIM / 2),
        }
    }

    /// `[sin, cos]` of each residue angle
    fn embed_token(&self, token: &str) -> Vec<f64> {
        let n = token_to_integer(token);
        let mut embedding = Vec::with_capacity(self.moduli.len() * 2);

        for &m in &self.moduli {
            let theta = TAU * ((n % m) as f64) / (m as f64);
            embedding.push(theta.sin());
            embedding.push(theta.cos());
        }

        embedding
    }
}

impl Default for HarmonicEmbedder {
    fn default() -> Self {
        Self::new()
    }
}

impl Embedder for HarmonicEmbedder {
    fn dimension(&self) -> usize {
        self.moduli.len() * 2
    }

    fn embed(&self, text: &str) -> Result<Vec<f32>> {
        let tokens = tokenize(text);
        let dim = self.dimension();

        if tokens.is_empty() {
            return Ok(vec![0.0; dim]);
        }

        let mut pooled = vec![0.0f64; dim];
        for token in &tokens {
            for (acc, val) in pooled.iter_mut().zip(self.embed_token(token)) {
                *acc += val;
            }
        }

        let count = tokens.len() as f64;
        pooled.iter_mut().for_each(|v| *v /= count);

        let norm = pooled.iter().map(|x| x * x).sum::<f64>().sqrt();
        let scale = if norm > 0.0 { norm } else { 1.0 };

        Ok(pooled.iter().map(|x| (x / scale) as f32).collect())
    }
}

/// First `count` primes; pairwise coprime by construction
fn first_primes(count: usize) -> Vec<u64> {
    let mut primes: Vec<u64> = Vec::with_capacity(count);
    let mut candidate = 2u64;

    while primes.len() < count {
        let is_prime = primes
            .iter()
            .take_while(|&&p| p * p <= candidate)
            .all(|&p| candidate % p != 0);
        if is_prime {
            primes.push(candidate);
        }
        candidate += 1;
    }

    primes
}

/// N = sum of u_j * 2^(16 * (L - j)), wrapping on overflow
fn token_to_integer(token: &str) -> u64 {
    token
        .chars()
        .take(MAX_TOKEN_LENGTH)
        .fold(0u64, |n, c| n.wrapping_mul(65536).wrapping_add(c as u64))
}

/// Lowercased words split on whitespace and ASCII punctuation
fn tokenize(text: &str) -> Vec<String> {
    text.split(|c: char| c.is_whitespace() || c.is_ascii_punctuation())
        .filter(|s| !s.is_empty())
        .map(str::to_lowercase)
        .collect()
}

/// Cosine similarity; 0.0 for mismatched lengths or zero vectors
pub fn cosine_similarity(a: &[f32], b: &[f32]) -> f32 {
    if a.len() != b.len() {
        return 0.0;
    }

    let dot: f32 = a.iter().zip(b).map(|(x, y)| x * y).sum();
    let norm_a: f32 = a.iter().map(|x| x * x).sum::<f32>().sqrt();
    let norm_b: f32 = b.iter().map(|x| x * x).sum::<f32>().sqrt();

    if norm_a > 0.0 && norm_b > 0.0 {
        dot / (norm_a * norm_b)
    } else {
        0.0
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_first_primes() {
        assert_eq!(first_primes(6), vec![2, 3, 5, 7, 11, 13]);
        let primes = first_primes(EMBEDDING_DIM / 2);
        assert_eq!(primes.len(), 192);
        assert_eq!(primes.last(), Some(&1163));
    }

    #[test]
    fn test_deterministic() {
        let a = HarmonicEmbedder::new();
        let b = HarmonicEmbedder::new();

        let text = "What is the capital of France?";
        assert_eq!(a.embed(text).unwrap(), b.embed(text).unwrap());
        assert_ne!(a.embed(text).unwrap(), a.embed("cooking recipes").unwrap());
    }

    #[test]
    fn test_normalized_output() {
        let model = HarmonicEmbedder::new();
        let emb = model.embed("capital of France").unwrap();

        assert_eq!(emb.len(), EMBEDDING_DIM);
        let norm: f32 = emb.iter().map(|x| x * x).sum::<f32>().sqrt();
        assert!((norm - 1.0).abs() < 0.01);
    }

    #[test]
    fn test_empty_text_is_zero_vector() {
        let model = HarmonicEmbedder::new();
        let emb = model.embed("  ?! ").unwrap();
        assert!(emb.iter().all(|v| *v == 0.0));
    }

    #[test]
    fn test_shared_tokens_rank_higher() {
        let model = HarmonicEmbedder::new();
        let query = model.embed("capital of France").unwrap();
        let close = model.embed("Question: What is the capital of France?").unwrap();
        let far = model.embed("Question: How many legs does a spider have?").unwrap();

        assert!(cosine_similarity(&query, &close) > cosine_similarity(&query, &far));
    }

    #[test]
    fn test_case_and_punctuation_ignored() {
        let model = HarmonicEmbedder::new();
        assert_eq!(
            model.embed("Hello, World!").unwrap(),
            model.embed("hello world").unwrap()
        );
    }

    #[test]
    fn test_cosine_similarity() {
        let a = vec![1.0, 0.0, 0.0];
        assert!((cosine_similarity(&a, &[1.0, 0.0, 0.0]) - 1.0).abs() < 0.001);
        assert!(cosine_similarity(&a, &[0.0, 1.0, 0.0]).abs() < 0.001);
        assert!((cosine_similarity(&a, &[-1.0, 0.0, 0.0]) + 1.0).abs() < 0.001);
        assert_eq!(cosine_similarity(&a, &[1.0]), 0.0);
    }
}
