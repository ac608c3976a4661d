use crate::error::Result;
use lexsearch_core::WordList;
use std::path::Path;
use tracing::info;

/// Small alphabetical French dictionary used when no word file is given.
pub const BUILTIN_WORDS: [&str; 30] = [
    "abaisser", "abandon", "abattre", "abeille", "abolir", "abricot", "absence", "accident",
    "accorder", "acheter", "acteur", "admirer", "affaire", "agacer", "aider", "aimer", "ajouter",
    "alarme", "aller", "allumer", "amener", "amour", "analyser", "animal", "année", "appeler",
    "apporter", "apprendre", "arriver", "article",
];

pub fn builtin_word_list() -> WordList {
    WordList::new(BUILTIN_WORDS).expect("built-in word list is non-empty")
}

/// Reads the first column of every row of a header-less CSV file.
///
/// Entries are trimmed and blank ones skipped.
pub fn load_word_list(path: &Path) -> Result<WordList> {
    let mut reader = csv::ReaderBuilder::new()
        .has_headers(false)
        .flexible(true)
        .from_path(path)?;

    let mut words = Vec::new();
    for record in reader.records() {
        let record = record?;
        if let Some(word) = record.get(0).map(str::trim).filter(|w| !w.is_empty()) {
            words.push(word.to_string());
        }
    }

    let list = WordList::new(words)?;
    info!(path = %path.display(), words = list.len(), "word list loaded");
    Ok(list)
}
