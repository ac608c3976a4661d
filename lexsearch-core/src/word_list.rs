use crate::error::Error;
use std::sync::Arc;
pub use string_cache::DefaultAtom as Atom;

/// Ordered dictionary the participant searches through.
///
/// Words are interned so cloning the list and comparing a confirmed word
/// against the target are both cheap.
#[derive(Debug, Clone, PartialEq)]
pub struct WordList {
    words: Arc<[Atom]>,
}

impl WordList {
    pub fn new<I, S>(words: I) -> Result<Self, Error>
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        let words: Vec<Atom> = words.into_iter().map(|w| Atom::from(w.as_ref())).collect();
        if words.is_empty() {
            return Err(Error::EmptyWordList);
        }
        Ok(Self {
            words: words.into(),
        })
    }

    pub fn len(&self) -> usize {
        self.words.len()
    }

    /// Always false; kept for API symmetry with slices.
    pub fn is_empty(&self) -> bool {
        self.words.is_empty()
    }

    pub fn last_index(&self) -> usize {
        self.words.len() - 1
    }

    /// Word at a clamped index, never fails.
    pub fn word_at(&self, index: i64) -> &str {
        &self.words[self.clamp(index)]
    }

    /// Saturates any requested index into `[0, len - 1]`.
    pub fn clamp(&self, index: i64) -> usize {
        index.clamp(0, self.last_index() as i64) as usize
    }

    /// Index of the first occurrence of `word`, or -1 when absent.
    pub fn position_of(&self, word: &str) -> i64 {
        let atom = Atom::from(word);
        self.words
            .iter()
            .position(|a| *a == atom)
            .map_or(-1, |i| i as i64)
    }

    pub fn contains(&self, word: &str) -> bool {
        self.position_of(word) >= 0
    }

    pub fn iter(&self) -> impl Iterator<Item = &str> {
        self.words.iter().map(|a| &**a)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn list() -> WordList {
        WordList::new(["abaisser", "abandon", "abattre", "abeille"]).unwrap()
    }

    #[test]
    fn empty_list_is_rejected() {
        let words: Vec<String> = Vec::new();
        assert!(matches!(WordList::new(words), Err(Error::EmptyWordList)));
    }

    #[test]
    fn clamp_saturates_both_ends() {
        let words = list();
        assert_eq!(words.clamp(-7), 0);
        assert_eq!(words.clamp(2), 2);
        assert_eq!(words.clamp(99), 3);
        assert_eq!(words.word_at(-1), "abaisser");
        assert_eq!(words.word_at(42), "abeille");
    }

    #[test]
    fn position_of_absent_word_is_minus_one() {
        let words = list();
        assert_eq!(words.position_of("abandon"), 1);
        assert_eq!(words.position_of("zèbre"), -1);
        assert!(!words.contains("zèbre"));
    }

    #[test]
    fn duplicate_words_resolve_to_first_index() {
        let words = WordList::new(["amour", "aimer", "amour"]).unwrap();
        assert_eq!(words.position_of("amour"), 0);
    }
}
