//! Prefix trie answering "how far can this word be completed without guessing?"

/// A node of the trie. The root carries no character of its own; every
/// other node is reached through the character it is keyed by.
#[derive(Debug, Clone, Default)]
struct TrieNode {
    /// Children keyed by distinct characters. The branching factor is bounded
    /// by the alphabet actually in use, so a linear scan is fine.
    children: Vec<(char, TrieNode)>,
    /// A full candidate ends here.
    terminal: bool,
}

impl TrieNode {
    fn child(&self, c: char) -> Option<&TrieNode> {
        self.children
            .iter()
            .find(|(key, _)| *key == c)
            .map(|(_, node)| node)
    }

    fn child_or_insert(&mut self, c: char) -> &mut TrieNode {
        let index = match self.children.iter().position(|(key, _)| *key == c) {
            Some(index) => index,
            None => {
                self.children.push((c, TrieNode::default()));
                self.children.len() - 1
            }
        };
        &mut self.children[index].1
    }
}

/// A finite set of candidate strings, compared character by character
/// without case folding.
///
/// # Example
///
/// ```
/// use ghostline::completion::PrefixTrie;
///
/// let trie = PrefixTrie::from_candidates(["test", "testing", "foo"]);
/// assert_eq!(trie.longest_unambiguous_extension("f").as_deref(), Some("foo"));
/// // "test" is a complete candidate, so completion stops there
/// assert_eq!(trie.longest_unambiguous_extension("t").as_deref(), Some("test"));
/// assert_eq!(trie.longest_unambiguous_extension("x"), None);
/// ```
#[derive(Debug, Clone, Default)]
pub struct PrefixTrie {
    root: TrieNode,
    len: usize,
}

impl PrefixTrie {
    /// Create an empty trie. It never matches anything.
    pub fn new() -> Self {
        Self::default()
    }

    pub fn from_candidates<I, S>(candidates: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        let mut trie = Self::new();
        for candidate in candidates {
            trie.insert(candidate.as_ref());
        }
        trie
    }

    /// Add a candidate. Empty strings are never eligible and are skipped;
    /// inserting a candidate twice has no further effect.
    pub fn insert(&mut self, candidate: &str) {
        if candidate.is_empty() {
            return;
        }
        let mut node = &mut self.root;
        for c in candidate.chars() {
            node = node.child_or_insert(c);
        }
        if !node.terminal {
            node.terminal = true;
            self.len += 1;
        }
    }

    /// Whether `candidate` was inserted as a full candidate.
    pub fn contains(&self, candidate: &str) -> bool {
        !candidate.is_empty() && self.node(candidate).is_some_and(|node| node.terminal)
    }

    /// Number of distinct candidates.
    pub fn len(&self) -> usize {
        self.len
    }

    pub fn is_empty(&self) -> bool {
        self.len == 0
    }

    /// Extend `prefix` for as long as exactly one continuation exists.
    ///
    /// Returns `None` if no candidate starts with `prefix`. Otherwise the
    /// result starts with `prefix` and grows one character at a time while
    /// the current node has a single child, stopping early as soon as it
    /// spells a complete candidate, even if a longer candidate would still
    /// be unambiguous. When the node for `prefix` has zero or several
    /// children, `prefix` comes back unchanged.
    pub fn longest_unambiguous_extension(&self, prefix: &str) -> Option<String> {
        let mut node = self.node(prefix)?;
        let mut result = prefix.to_string();
        while let [(c, child)] = node.children.as_slice() {
            result.push(*c);
            node = child;
            if node.terminal {
                break;
            }
        }
        Some(result)
    }

    fn node(&self, prefix: &str) -> Option<&TrieNode> {
        prefix
            .chars()
            .try_fold(&self.root, |node, c| node.child(c))
    }
}

impl<S: AsRef<str>> FromIterator<S> for PrefixTrie {
    fn from_iter<I: IntoIterator<Item = S>>(iter: I) -> Self {
        Self::from_candidates(iter)
    }
}
