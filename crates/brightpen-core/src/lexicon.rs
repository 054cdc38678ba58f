//! The resource store: ordered word lists per lexicon category.

use std::collections::{HashMap, HashSet};

use crate::error::ConfigError;
use crate::model::{GradeBand, LexiconCategory};

/// Categories the analyzer and the template renderer read from.
///
/// Every one of them must be present and non-empty for the active grade band.
pub const REQUIRED_CATEGORIES: [LexiconCategory; 12] = LexiconCategory::ALL;

/// Word lists for one grade band. Read-only after construction.
#[derive(Debug, Clone, Default)]
pub struct Lexicon {
    grade: GradeBand,
    words: HashMap<LexiconCategory, Vec<String>>,
    index: HashMap<LexiconCategory, HashSet<String>>,
}

impl Lexicon {
    /// Build a lexicon from `(category, words)` pairs.
    ///
    /// Repeated categories are concatenated in order; duplicate words keep
    /// their first position.
    pub fn new<I, W>(grade: GradeBand, entries: I) -> Self
    where
        I: IntoIterator<Item = (LexiconCategory, W)>,
        W: IntoIterator<Item = String>,
    {
        let mut words: HashMap<LexiconCategory, Vec<String>> = HashMap::new();
        let mut index: HashMap<LexiconCategory, HashSet<String>> = HashMap::new();
        for (category, list) in entries {
            let seen = index.entry(category).or_default();
            let ordered = words.entry(category).or_default();
            for word in list {
                let word = word.trim().to_string();
                if !word.is_empty() && seen.insert(word.clone()) {
                    ordered.push(word);
                }
            }
        }
        Self {
            grade,
            words,
            index,
        }
    }

    /// Ordered words of a category (empty if the category is absent).
    pub fn words(&self, category: LexiconCategory) -> &[String] {
        self.words
            .get(&category)
            .map(Vec::as_slice)
            .unwrap_or_default()
    }

    /// Whether `token` is an entry of `category`.
    pub fn contains(&self, category: LexiconCategory, token: &str) -> bool {
        self.index
            .get(&category)
            .is_some_and(|set| set.contains(token))
    }

    /// Whether `token` is an entry of any of `categories`.
    pub fn contains_any(&self, categories: &[LexiconCategory], token: &str) -> bool {
        categories.iter().any(|c| self.contains(*c, token))
    }

    /// Every distinct word across all categories, used to seed the segmenter.
    pub fn all_words(&self) -> impl Iterator<Item = &str> {
        let mut seen = HashSet::new();
        LexiconCategory::ALL
            .into_iter()
            .flat_map(move |c| self.words(c).iter())
            .filter(move |w| seen.insert(w.as_str()))
            .map(String::as_str)
    }

    /// Fail if a required category is missing or empty.
    pub fn ensure_complete(&self) -> Result<(), ConfigError> {
        for category in REQUIRED_CATEGORIES {
            match self.words.get(&category) {
                None => {
                    return Err(ConfigError::MissingCategory {
                        category: category.name().to_string(),
                        grade: self.grade.to_string(),
                    })
                }
                Some(list) if list.is_empty() => {
                    return Err(ConfigError::EmptyCategory {
                        category: category.name().to_string(),
                        grade: self.grade.to_string(),
                    })
                }
                Some(_) => {}
            }
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn words(list: &[&str]) -> Vec<String> {
        list.iter().map(|s| s.to_string()).collect()
    }

    #[test]
    fn keeps_order_and_drops_duplicates() {
        let lex = Lexicon::new(
            GradeBand::default(),
            vec![
                (LexiconCategory::Metaphor, words(&["像", "好像", "像"])),
                (LexiconCategory::Metaphor, words(&["彷彿", " 好像 "])),
            ],
        );
        assert_eq!(lex.words(LexiconCategory::Metaphor), ["像", "好像", "彷彿"]);
        assert!(lex.contains(LexiconCategory::Metaphor, "彷彿"));
        assert!(!lex.contains(LexiconCategory::Personification, "彷彿"));
        assert!(lex.words(LexiconCategory::Moral).is_empty());
    }

    #[test]
    fn missing_category_is_reported() {
        let lex = Lexicon::new(
            GradeBand::default(),
            vec![(LexiconCategory::Subject, words(&["我"]))],
        );
        let err = lex.ensure_complete().unwrap_err();
        assert!(matches!(err, ConfigError::MissingCategory { .. }));
        assert!(err.to_string().contains("3-6年級"));
    }

    #[test]
    fn empty_category_is_reported() {
        let mut entries: Vec<(LexiconCategory, Vec<String>)> = LexiconCategory::ALL
            .into_iter()
            .map(|c| (c, words(&["詞"])))
            .collect();
        entries[3].1 = words(&["  "]);
        let lex = Lexicon::new(GradeBand::default(), entries);
        assert!(matches!(
            lex.ensure_complete(),
            Err(ConfigError::EmptyCategory { .. })
        ));
    }

    #[test]
    fn all_words_is_distinct() {
        let lex = Lexicon::new(
            GradeBand::default(),
            vec![
                (LexiconCategory::Subject, words(&["寵物", "我"])),
                (LexiconCategory::Object, words(&["寵物", "玩具"])),
            ],
        );
        let all: Vec<&str> = lex.all_words().collect();
        assert_eq!(all, vec!["寵物", "我", "玩具"]);
    }
}
