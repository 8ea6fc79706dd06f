//! Context-dependent vocabularies
//!
//! A [`ContextTree`] maps the words typed before the cursor to the candidate
//! set that applies to the word being typed. Each node either lists its
//! children (the words that may follow) or holds an explicit option list.

use std::collections::HashMap;

use super::trie::PrefixTrie;

/// Node of the vocabulary tree.
///
/// Children and explicit options are mutually exclusive: setting one clears
/// the other.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ContextTree {
    children: HashMap<String, ContextTree>,
    options: Option<Vec<String>>,
    /// Stay at this node when a token matches no child.
    multi: bool,
}

impl ContextTree {
    /// Create an empty node with no children, options or repetition.
    pub fn new() -> Self {
        Self::default()
    }

    /// Get or create the child reached by `word`.
    ///
    /// Adding a child drops any explicit options this node had.
    pub fn child(&mut self, word: impl Into<String>) -> &mut ContextTree {
        self.options = None;
        self.children.entry(word.into()).or_default()
    }

    /// Replace this node's vocabulary with an explicit option list.
    ///
    /// Option lists are free-form and may repeat, so the node also becomes
    /// multi-valued. Any children are dropped.
    pub fn options<I, S>(&mut self, options: I) -> &mut Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.children.clear();
        self.options = Some(options.into_iter().map(Into::into).collect());
        self.multi = true;
        self
    }

    /// Let unmatched tokens repeat at this node instead of ending the context.
    pub fn mark_multi(&mut self) -> &mut Self {
        self.multi = true;
        self
    }

    pub fn is_multi(&self) -> bool {
        self.multi
    }

    /// Words valid directly at this node: the explicit options if present,
    /// otherwise the names of the children.
    pub fn vocabulary(&self) -> Vec<String> {
        match &self.options {
            Some(options) => options.clone(),
            None => self.children.keys().cloned().collect(),
        }
    }

    /// Candidate set for the word following `context`.
    ///
    /// `context` is split into whitespace-separated tokens and walked from
    /// this node. A token naming a child descends into it. A token matching no
    /// child keeps the walk here if the node is multi-valued and yields an
    /// empty set otherwise. When the tokens run out, the vocabulary of the
    /// node reached is returned.
    ///
    /// # Arguments
    /// * `context` - Text before the word being completed
    ///
    /// # Returns
    /// * `PrefixTrie` - Candidates for that word, possibly empty
    pub fn resolve(&self, context: &str) -> PrefixTrie {
        let mut node = self;
        for token in context.split_whitespace() {
            match node.children.get(token) {
                Some(child) => node = child,
                None if node.multi => {}
                None => return PrefixTrie::new(),
            }
        }
        PrefixTrie::from_candidates(node.vocabulary())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    /// node -> { install|i -> options, run -> { build, test } }, plus git
    fn sample() -> ContextTree {
        let mut root = ContextTree::new();
        {
            let node = root.child("node");
            node.child("i").options(["express", "react", "ramda"]);
            node.child("install").options(["express", "react"]);
            let run = node.child("run");
            run.child("build");
            run.child("test");
        }
        root.child("git");
        root
    }

    fn sorted(trie_words: Vec<String>) -> Vec<String> {
        let mut words = trie_words;
        words.sort();
        words
    }

    #[test]
    fn test_empty_context_lists_roots() {
        let root = sample();
        let trie = root.resolve("");
        assert_eq!(trie.len(), 2);
        assert!(trie.contains("node"));
        assert!(trie.contains("git"));
    }

    #[test]
    fn test_descends_through_children() {
        let root = sample();
        let trie = root.resolve("node run");
        assert!(trie.contains("build"));
        assert!(trie.contains("test"));
        assert_eq!(trie.len(), 2);
    }

    #[test]
    fn test_options_are_multi_valued() {
        let root = sample();
        for context in ["node i", "node i express", "node i express react"] {
            let trie = root.resolve(context);
            assert_eq!(trie.len(), 3, "context {context:?}");
            assert!(trie.contains("ramda"));
        }
    }

    #[test]
    fn test_unknown_token_without_multi_is_empty() {
        let root = sample();
        assert!(root.resolve("cargo").is_empty());
        assert!(root.resolve("node run build").is_empty());
        assert!(root.resolve("node x").is_empty());
    }

    #[test]
    fn test_whitespace_is_collapsed() {
        let root = sample();
        let trie = root.resolve("   node \t run  ");
        assert!(trie.contains("build"));
    }

    #[test]
    fn test_mark_multi_repeats_children() {
        let mut root = ContextTree::new();
        let cmd = root.child("cmd").mark_multi();
        cmd.child("--verbose");
        cmd.child("--force");

        let trie = root.resolve("cmd --verbose");
        assert!(trie.is_empty());
        let trie = root.resolve("cmd somefile");
        assert!(trie.contains("--force"));
        assert!(trie.contains("--verbose"));
    }

    #[test]
    fn test_options_and_children_are_exclusive() {
        let mut node = ContextTree::new();
        node.child("a");
        node.options(["x", "y"]);
        assert_eq!(sorted(node.vocabulary()), vec!["x", "y"]);
        assert!(node.is_multi());

        node.child("b");
        assert_eq!(node.vocabulary(), vec!["b"]);
    }

    #[test]
    fn test_empty_tree_resolves_to_empty_trie() {
        let root = ContextTree::new();
        assert!(root.resolve("").is_empty());
        assert!(root.resolve("anything").is_empty());
    }
}
