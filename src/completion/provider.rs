//! Candidate providers for completion suggestions
//!
//! This module provides the trait the engine uses to look up which words may
//! follow a given context, plus the stock implementations.

use super::context::ContextTree;
use super::trie::PrefixTrie;

/// Trait for providing completion candidates
///
/// The engine calls [`resolve`](CandidateProvider::resolve) once per distinct
/// context and caches the result until the context changes, so providers are
/// expected to answer the same context with the same candidates.
pub trait CandidateProvider: Send + Sync {
    /// Candidates for the word following `context`
    ///
    /// # Arguments
    /// * `context` - Text before the word being completed, trailing whitespace removed
    fn resolve(&self, context: &str) -> PrefixTrie;
}

impl CandidateProvider for ContextTree {
    fn resolve(&self, context: &str) -> PrefixTrie {
        ContextTree::resolve(self, context)
    }
}

/// Any function from context to candidate list.
impl<F> CandidateProvider for F
where
    F: Fn(&str) -> Vec<String> + Send + Sync,
{
    fn resolve(&self, context: &str) -> PrefixTrie {
        PrefixTrie::from_candidates(self(context))
    }
}

/// One flat vocabulary offered for every word, whatever precedes it.
#[derive(Debug, Clone, Default)]
pub struct StaticOptions {
    trie: PrefixTrie,
}

impl StaticOptions {
    /// Create a provider for a fixed list of candidates
    ///
    /// # Arguments
    /// * `options` - Candidate words; empty strings are ignored
    pub fn new<I, S>(options: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        Self {
            trie: PrefixTrie::from_candidates(options),
        }
    }

    pub fn len(&self) -> usize {
        self.trie.len()
    }

    pub fn is_empty(&self) -> bool {
        self.trie.is_empty()
    }
}

impl CandidateProvider for StaticOptions {
    fn resolve(&self, _context: &str) -> PrefixTrie {
        self.trie.clone()
    }
}
