//! Sentence analyzer.
//!
//! Tokenises a sentence and sets one boolean per [`Feature`] when any token
//! belongs to one of the feature's lexicon categories. Which categories feed
//! which feature is the [`FEATURE_TABLE`]; nothing else decides a flag.

use std::collections::HashSet;

use serde::{Deserialize, Serialize};

use crate::lexicon::Lexicon;
use crate::model::LexiconCategory;
use crate::segmenter::Segmenter;

/// A lexical feature of a sentence.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Feature {
    Subject,
    Predicate,
    Object,
    Rhetoric,
    Adjective,
    Detail,
    Feeling,
}

/// Feature → lexicon categories whose words switch the feature on.
pub const FEATURE_TABLE: &[(Feature, &[LexiconCategory])] = &[
    (Feature::Subject, &[LexiconCategory::Subject]),
    (Feature::Predicate, &[LexiconCategory::Predicate]),
    (Feature::Object, &[LexiconCategory::Object]),
    (
        Feature::Rhetoric,
        &[LexiconCategory::Metaphor, LexiconCategory::Personification],
    ),
    (Feature::Adjective, &[LexiconCategory::Adjective]),
    (
        Feature::Detail,
        &[LexiconCategory::Time, LexiconCategory::Place],
    ),
    (Feature::Feeling, &[LexiconCategory::Feeling]),
];

/// Per-sentence analysis. Built fresh on every call.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct SentenceAnalysis {
    pub has_subject: bool,
    pub has_predicate: bool,
    pub has_object: bool,
    pub has_rhetoric: bool,
    pub has_adjective: bool,
    pub has_detail: bool,
    pub has_feeling: bool,
    /// Number of tokens the segmenter produced.
    pub token_count: usize,
    /// Jaccard similarity of the token sets of this and the previous sentence.
    pub similarity: f64,
    /// The tokens themselves, in sentence order.
    #[serde(skip)]
    pub tokens: Vec<String>,
}

impl SentenceAnalysis {
    pub fn has(&self, feature: Feature) -> bool {
        match feature {
            Feature::Subject => self.has_subject,
            Feature::Predicate => self.has_predicate,
            Feature::Object => self.has_object,
            Feature::Rhetoric => self.has_rhetoric,
            Feature::Adjective => self.has_adjective,
            Feature::Detail => self.has_detail,
            Feature::Feeling => self.has_feeling,
        }
    }

    fn set(&mut self, feature: Feature) {
        let flag = match feature {
            Feature::Subject => &mut self.has_subject,
            Feature::Predicate => &mut self.has_predicate,
            Feature::Object => &mut self.has_object,
            Feature::Rhetoric => &mut self.has_rhetoric,
            Feature::Adjective => &mut self.has_adjective,
            Feature::Detail => &mut self.has_detail,
            Feature::Feeling => &mut self.has_feeling,
        };
        *flag = true;
    }
}

/// Token-set Jaccard similarity; 0.0 when either side is empty.
pub fn jaccard(a: &[String], b: &[String]) -> f64 {
    if a.is_empty() || b.is_empty() {
        return 0.0;
    }
    let a: HashSet<&str> = a.iter().map(String::as_str).collect();
    let b: HashSet<&str> = b.iter().map(String::as_str).collect();
    let common = a.intersection(&b).count();
    let union = a.union(&b).count();
    common as f64 / union as f64
}

/// Analyzer over a lexicon and a segmenter.
pub struct SentenceAnalyzer<'a> {
    lexicon: &'a Lexicon,
    segmenter: &'a dyn Segmenter,
}

impl<'a> SentenceAnalyzer<'a> {
    pub fn new(lexicon: &'a Lexicon, segmenter: &'a dyn Segmenter) -> Self {
        Self { lexicon, segmenter }
    }

    pub fn tokenize(&self, text: &str) -> Vec<String> {
        self.segmenter.segment(text)
    }

    /// Analyze `sentence`, comparing it with `previous` for similarity.
    pub fn analyze(&self, sentence: &str, previous: &str) -> SentenceAnalysis {
        let tokens = self.tokenize(sentence);
        let previous_tokens = self.tokenize(previous);

        let mut analysis = SentenceAnalysis {
            token_count: tokens.len(),
            similarity: jaccard(&tokens, &previous_tokens),
            ..SentenceAnalysis::default()
        };

        for (feature, categories) in FEATURE_TABLE {
            if tokens
                .iter()
                .any(|t| self.lexicon.contains_any(categories, t))
            {
                analysis.set(*feature);
            }
        }

        analysis.tokens = tokens;
        analysis
    }

    /// Whether any token of `text` is a word of `category`.
    pub fn mentions(&self, text: &str, category: LexiconCategory) -> bool {
        self.tokenize(text)
            .iter()
            .any(|t| self.lexicon.contains(category, t))
    }
}
