use std::path::Path;

use anyhow::{Context, Result};
use rand::Rng;
use tracing::{info, warn};

/// Ordered, zero-indexed table of lines loaded from a text resource.
///
/// Built once at startup and never mutated afterwards.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Corpus {
    lines: Vec<String>,
}

impl Corpus {
    /// Build a corpus from text, one entry per line in file order.
    /// Line terminators are stripped, nothing else is trimmed.
    pub fn from_text(text: &str) -> Self {
        Self {
            lines: text.lines().map(str::to_string).collect(),
        }
    }

    /// Load a corpus from disk. A missing or unreadable file is logged and
    /// yields an empty corpus so the bot keeps running.
    pub fn load(path: &Path) -> Self {
        match read_corpus(path) {
            Ok(corpus) => {
                info!("Loaded {} lines from {}", corpus.len(), path.display());
                corpus
            }
            Err(e) => {
                warn!("{:#}, continuing with an empty corpus", e);
                Self::default()
            }
        }
    }

    pub fn len(&self) -> usize {
        self.lines.len()
    }

    pub fn is_empty(&self) -> bool {
        self.lines.is_empty()
    }

    pub fn get(&self, index: usize) -> Option<&str> {
        self.lines.get(index).map(String::as_str)
    }

    /// All lines concatenated without separators.
    pub fn joined(&self) -> String {
        self.lines.concat()
    }

    /// Uniform pick over `[0, len)` using the thread-local PRNG.
    pub fn random(&self) -> Option<&str> {
        self.choose(&mut rand::thread_rng())
    }

    /// Uniform pick over `[0, len)` using the given RNG.
    pub fn choose<R: Rng + ?Sized>(&self, rng: &mut R) -> Option<&str> {
        if self.is_empty() {
            return None;
        }
        let index = rng.gen_range(0..self.lines.len());
        self.get(index)
    }
}

fn read_corpus(path: &Path) -> Result<Corpus> {
    let content = std::fs::read_to_string(path)
        .with_context(|| format!("Failed to read corpus file: {}", path.display()))?;
    Ok(Corpus::from_text(&content))
}
