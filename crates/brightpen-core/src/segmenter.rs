//! Word segmentation.
//!
//! Chinese text has no word delimiters, so the default segmenter is jieba.
//! Lexicon words are registered as user words so that multi-character
//! entries (`可愛的`, `去年夏天`) come out as single tokens.

use jieba_rs::Jieba;

use crate::lexicon::Lexicon;

/// Frequency given to lexicon words registered with jieba.
const USER_WORD_FREQ: usize = 200_000;

/// Splits a sentence into word-like tokens.
pub trait Segmenter: Send + Sync {
    fn segment(&self, text: &str) -> Vec<String>;
}

/// jieba-rs segmenter with the HMM enabled.
pub struct JiebaSegmenter {
    jieba: Jieba,
}

impl JiebaSegmenter {
    /// Plain jieba with its bundled dictionary.
    pub fn new() -> Self {
        Self {
            jieba: Jieba::new(),
        }
    }

    /// jieba with every lexicon word added as a user word.
    pub fn with_lexicon(lexicon: &Lexicon) -> Self {
        let mut jieba = Jieba::new();
        let mut added = 0usize;
        for word in lexicon.all_words() {
            jieba.add_word(word, Some(USER_WORD_FREQ), None);
            added += 1;
        }
        tracing::debug!(words = added, "registered lexicon words with jieba");
        Self { jieba }
    }
}

impl Default for JiebaSegmenter {
    fn default() -> Self {
        Self::new()
    }
}

impl Segmenter for JiebaSegmenter {
    fn segment(&self, text: &str) -> Vec<String> {
        self.jieba
            .cut(text.trim(), true)
            .into_iter()
            .filter(|t| !t.trim().is_empty())
            .map(str::to_string)
            .collect()
    }
}

/// Splits on whitespace. Gives a fixed, predictable segmentation for
/// pre-tokenised input and tests.
#[derive(Debug, Clone, Copy, Default)]
pub struct WhitespaceSegmenter;

impl Segmenter for WhitespaceSegmenter {
    fn segment(&self, text: &str) -> Vec<String> {
        text.split_whitespace().map(str::to_string).collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::{GradeBand, LexiconCategory};

    #[test]
    fn whitespace_segmentation() {
        let seg = WhitespaceSegmenter;
        assert_eq!(seg.segment(" 我  喜歡 小狗 "), vec!["我", "喜歡", "小狗"]);
        assert!(seg.segment("   ").is_empty());
    }

    #[test]
    fn jieba_drops_whitespace_tokens() {
        let seg = JiebaSegmenter::new();
        let tokens = seg.segment("我 喜歡 小狗");
        assert!(!tokens.is_empty());
        assert!(tokens.iter().all(|t| !t.trim().is_empty()));
        assert!(seg.segment("").is_empty());
    }

    #[test]
    fn jieba_keeps_lexicon_words_whole() {
        let lex = Lexicon::new(
            GradeBand::default(),
            vec![(
                LexiconCategory::Adjective,
                vec!["圓滾滾的".to_string()],
            )],
        );
        let seg = JiebaSegmenter::with_lexicon(&lex);
        let tokens = seg.segment("我有一隻圓滾滾的小狗");
        assert!(tokens.iter().any(|t| t == "圓滾滾的"), "tokens: {tokens:?}");
    }
}
