//! Practice-mode helpers built on the engine.
//!
//! Sentence-pattern practice (造句模式), speech transcription clean-up
//! (講話轉寫模式) and the composition buffer helper (作文模式).

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::engine::WritingEngine;
use crate::generator::{attributive, SUGGESTION_COUNT};
use crate::lexicon::Lexicon;
use crate::model::{GradeBand, LexiconCategory};
use crate::random::{self, RandomSource};
use crate::scorer::SENTENCE_TERMINATOR;

/// Score saved for a pattern sentence that passes [`check_pattern`].
pub const PATTERN_VALID_SCORE: f64 = 100.0;
/// Score saved for a pattern sentence that does not.
pub const PATTERN_INVALID_SCORE: f64 = 80.0;
/// Score saved for every speech transcription record.
pub const SPEECH_SCORE: f64 = 90.0;
/// Topic saved with speech transcription records.
pub const SPEECH_TOPIC: &str = "口語轉書面語練習";

/// Colloquial → written replacements, applied in order.
const WRITTEN_REPLACEMENTS: [(&str, &str); 6] = [
    ("啦", "了"),
    ("喔", "哦"),
    ("呢", ""),
    ("然後呢", "然後"),
    ("後來呀", "後來"),
    ("就是說", "也就是"),
];

/// Sentence patterns offered in sentence-making practice.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub enum SentencePattern {
    Metaphor,
    Personification,
    Detail,
    Free,
}

impl SentencePattern {
    pub const ALL: [SentencePattern; 4] = [
        SentencePattern::Free,
        SentencePattern::Metaphor,
        SentencePattern::Personification,
        SentencePattern::Detail,
    ];

    pub fn name(self) -> &'static str {
        match self {
            SentencePattern::Metaphor => "比喻句",
            SentencePattern::Personification => "擬人句",
            SentencePattern::Detail => "含細節句",
            SentencePattern::Free => "一般句",
        }
    }

    /// Lexicon categories whose words mark this pattern. Empty for `Free`.
    pub fn marker_categories(self) -> &'static [LexiconCategory] {
        match self {
            SentencePattern::Metaphor => &[LexiconCategory::Metaphor],
            SentencePattern::Personification => &[LexiconCategory::Personification],
            SentencePattern::Detail => &[LexiconCategory::Time, LexiconCategory::Place],
            SentencePattern::Free => &[],
        }
    }

    fn missing_reason(self) -> &'static str {
        match self {
            SentencePattern::Metaphor => "未使用比喻詞（像/好像/彷彿）",
            SentencePattern::Personification => "未使用擬人詞（跳舞/唱歌/微笑）",
            SentencePattern::Detail => "未包含時間/地點細節",
            SentencePattern::Free => "",
        }
    }
}

impl fmt::Display for SentencePattern {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl FromStr for SentencePattern {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "比喻句" | "metaphor" => Ok(SentencePattern::Metaphor),
            "擬人句" | "personification" => Ok(SentencePattern::Personification),
            "含細節句" | "detail" => Ok(SentencePattern::Detail),
            "一般句" | "通用造句" | "free" => Ok(SentencePattern::Free),
            other => Err(format!("unknown sentence pattern: {other}")),
        }
    }
}

impl TryFrom<String> for SentencePattern {
    type Error = String;

    fn try_from(s: String) -> Result<Self, Self::Error> {
        s.parse()
    }
}

impl From<SentencePattern> for String {
    fn from(p: SentencePattern) -> Self {
        p.name().to_string()
    }
}

fn has_marker(text: &str, pattern: SentencePattern, lexicon: &Lexicon) -> bool {
    pattern
        .marker_categories()
        .iter()
        .flat_map(|c| lexicon.words(*c))
        .any(|w| text.contains(w.as_str()))
}

/// Keep suggestions that contain a marker word of `pattern`.
///
/// Matching is by substring. `Free` keeps everything.
pub fn filter_for_pattern(
    suggestions: Vec<String>,
    pattern: SentencePattern,
    lexicon: &Lexicon,
) -> Vec<String> {
    if pattern == SentencePattern::Free {
        return suggestions;
    }
    suggestions
        .into_iter()
        .filter(|s| has_marker(s, pattern, lexicon))
        .collect()
}

/// A keyword-based example sentence for `pattern`.
pub fn pattern_suggestion(
    keyword: &str,
    pattern: SentencePattern,
    lexicon: &Lexicon,
    rng: &mut dyn RandomSource,
) -> String {
    let mut word = |category: LexiconCategory| {
        random::choose(rng, lexicon.words(category))
            .unwrap_or_default()
            .to_string()
    };
    let adjective = attributive(&word(LexiconCategory::Adjective));
    match pattern {
        SentencePattern::Metaphor => format!(
            "{adjective}{keyword} {} {}一樣，真可愛～",
            word(LexiconCategory::Metaphor),
            word(LexiconCategory::Vehicle)
        ),
        SentencePattern::Personification => format!(
            "{keyword}在{}裡{}著，好像在跟我打招呼～",
            word(LexiconCategory::Place),
            word(LexiconCategory::Personification)
        ),
        SentencePattern::Detail => format!(
            "{}，我在{}看到{adjective}{keyword}，心裡真{}～",
            word(LexiconCategory::Time),
            word(LexiconCategory::Place),
            word(LexiconCategory::Feeling)
        ),
        SentencePattern::Free => format!(
            "{adjective}{keyword}讓我覺得{}，每次看到都很開心～",
            word(LexiconCategory::Feeling)
        ),
    }
}

/// Suggestions for a practice sentence that should follow `pattern`.
///
/// Engine suggestions without the pattern's markers are dropped and the
/// list is padded with [`pattern_suggestion`] to exactly three.
pub fn pattern_suggestions(
    engine: &mut WritingEngine,
    text: &str,
    keyword: &str,
    pattern: SentencePattern,
    grade: &GradeBand,
) -> Vec<String> {
    let generated = engine.generate(text, "", grade);
    let (lexicon, rng) = engine.lexicon_and_rng();
    let mut suggestions = filter_for_pattern(generated, pattern, lexicon);
    tracing::debug!(%pattern, kept = suggestions.len(), "filtered suggestions for pattern");
    while suggestions.len() < SUGGESTION_COUNT {
        suggestions.push(pattern_suggestion(keyword, pattern, lexicon, rng));
    }
    suggestions
}

/// Outcome of checking a practice sentence against its pattern.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "status", rename_all = "snake_case")]
pub enum PatternCheck {
    Empty,
    MissingKeyword { keyword: String },
    MissingMarker { reason: String },
    Valid,
}

impl PatternCheck {
    pub fn is_valid(&self) -> bool {
        matches!(self, PatternCheck::Valid)
    }

    /// The score saved with the practice record.
    pub fn score(&self) -> f64 {
        if self.is_valid() {
            PATTERN_VALID_SCORE
        } else {
            PATTERN_INVALID_SCORE
        }
    }
}

impl fmt::Display for PatternCheck {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            PatternCheck::Empty => f.write_str("請輸入造句後再驗證！"),
            PatternCheck::MissingKeyword { keyword } => {
                write!(f, "造句未包含關鍵詞「{keyword}」，請修改！")
            }
            PatternCheck::MissingMarker { reason } => {
                write!(f, "造句不符合句式要求：{reason}，參考建議修改～")
            }
            PatternCheck::Valid => f.write_str("造句符合要求！句子完整、生動"),
        }
    }
}

/// Check that `text` uses `keyword` and a marker word of `pattern`.
pub fn check_pattern(
    text: &str,
    keyword: &str,
    pattern: SentencePattern,
    lexicon: &Lexicon,
) -> PatternCheck {
    let text = text.trim();
    if text.is_empty() {
        return PatternCheck::Empty;
    }
    if !text.contains(keyword.trim()) {
        return PatternCheck::MissingKeyword {
            keyword: keyword.trim().to_string(),
        };
    }
    if pattern != SentencePattern::Free && !has_marker(text, pattern, lexicon) {
        return PatternCheck::MissingMarker {
            reason: pattern.missing_reason().to_string(),
        };
    }
    PatternCheck::Valid
}

/// Topic saved with a sentence-making record.
pub fn pattern_topic(keyword: &str, pattern: SentencePattern) -> String {
    format!("關鍵詞「{}」-{}", keyword.trim(), pattern)
}

/// Rewrite colloquial particles into written style.
pub fn to_written(text: &str) -> String {
    WRITTEN_REPLACEMENTS
        .iter()
        .fold(text.trim().to_string(), |acc, (from, to)| acc.replace(from, to))
}

/// Suggestions for a speech transcription.
///
/// Engine suggestions are generated on the written form; the last slot
/// holds the written form itself.
pub fn speech_suggestions(engine: &mut WritingEngine, text: &str, grade: &GradeBand) -> Vec<String> {
    let written = to_written(text);
    let mut suggestions = engine.generate(&written, "", grade);
    suggestions.truncate(SUGGESTION_COUNT - 1);
    suggestions.push(format!(
        "書面語優化：{written}（刪除口語助詞，更符合作文要求）"
    ));
    suggestions
}

/// The last finished sentence of a composition buffer.
///
/// A sentence is finished once the buffer ends with 。 or a newline. The
/// result is the text before the final 。 on the last non-empty line (or the
/// whole line when it has none), and `None` when that is under two
/// characters.
pub fn completed_sentence(buffer: &str) -> Option<String> {
    if !(buffer.ends_with(SENTENCE_TERMINATOR) || buffer.ends_with('\n')) {
        return None;
    }
    let line = buffer.trim().lines().last()?.trim();
    let sentence = match line.rfind(SENTENCE_TERMINATOR) {
        Some(end) => {
            let before = &line[..end];
            match before.rfind(SENTENCE_TERMINATOR) {
                Some(start) => &before[start + SENTENCE_TERMINATOR.len_utf8()..],
                None => before,
            }
        }
        None => line,
    };
    let sentence = sentence.trim();
    (sentence.chars().count() >= 2).then(|| sentence.to_string())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::engine::EngineConfig;
    use crate::parser::seed_dataset;
    use crate::random::FirstPick;
    use crate::segmenter::WhitespaceSegmenter;

    fn engine() -> WritingEngine {
        let set = seed_dataset().unwrap();
        let config = EngineConfig::from_dataset(&set, &GradeBand::default()).unwrap();
        WritingEngine::with_parts(config, Box::new(WhitespaceSegmenter), Box::new(FirstPick))
    }

    #[test]
    fn pattern_names_parse() {
        for p in SentencePattern::ALL {
            assert_eq!(p.name().parse::<SentencePattern>().unwrap(), p);
        }
        assert_eq!(
            "通用造句".parse::<SentencePattern>().unwrap(),
            SentencePattern::Free
        );
        assert!("排比句".parse::<SentencePattern>().is_err());
    }

    #[test]
    fn check_pattern_outcomes() {
        let e = engine();
        let lex = e.lexicon();
        assert_eq!(
            check_pattern("  ", "小狗", SentencePattern::Metaphor, lex),
            PatternCheck::Empty
        );
        assert!(matches!(
            check_pattern("小貓好像棉花糖", "小狗", SentencePattern::Metaphor, lex),
            PatternCheck::MissingKeyword { .. }
        ));
        let missing = check_pattern("小狗很可愛", "小狗", SentencePattern::Metaphor, lex);
        assert_eq!(
            missing,
            PatternCheck::MissingMarker {
                reason: "未使用比喻詞（像/好像/彷彿）".into()
            }
        );
        assert_eq!(missing.score(), 80.0);

        let ok = check_pattern("小狗像棉花糖一樣軟", "小狗", SentencePattern::Metaphor, lex);
        assert!(ok.is_valid());
        assert_eq!(ok.score(), 100.0);
        assert!(check_pattern("週末小狗很乖", "小狗", SentencePattern::Detail, lex).is_valid());
        assert!(check_pattern("小狗很乖", "小狗", SentencePattern::Free, lex).is_valid());
    }

    #[test]
    fn filter_keeps_only_marked_suggestions() {
        let e = engine();
        let input = vec!["小狗像太陽".to_string(), "小狗很乖".to_string()];
        let kept = filter_for_pattern(input.clone(), SentencePattern::Metaphor, e.lexicon());
        assert_eq!(kept, vec!["小狗像太陽".to_string()]);
        assert_eq!(
            filter_for_pattern(input.clone(), SentencePattern::Free, e.lexicon()),
            input
        );
    }

    #[test]
    fn pattern_suggestion_uses_keyword_and_marker() {
        let e = engine();
        let mut rng = FirstPick;
        let s = pattern_suggestion("小狗", SentencePattern::Metaphor, e.lexicon(), &mut rng);
        assert_eq!(s, "可愛的小狗 像 小太陽一樣，真可愛～");
        let s = pattern_suggestion("小狗", SentencePattern::Free, e.lexicon(), &mut rng);
        assert!(!s.contains("的的"));
        assert!(s.starts_with("可愛的小狗"));
    }

    #[test]
    fn pattern_suggestions_pad_to_three_with_markers() {
        let mut e = engine();
        let out = pattern_suggestions(
            &mut e,
            "小狗 很 乖",
            "小狗",
            SentencePattern::Personification,
            &GradeBand::default(),
        );
        assert_eq!(out.len(), 3);
        let lex = e.lexicon();
        for s in &out {
            assert!(has_marker(s, SentencePattern::Personification, lex), "{s}");
        }
    }

    #[test]
    fn written_form_replacements() {
        assert_eq!(to_written("我吃飽啦"), "我吃飽了");
        assert_eq!(to_written("好喔"), "好哦");
        assert_eq!(to_written("然後呢我們就回家"), "然後我們就回家");
        assert_eq!(to_written("後來呀下雨了"), "後來下雨了");
        assert_eq!(to_written("就是說很好玩"), "也就是很好玩");
    }

    #[test]
    fn speech_suggestions_end_with_written_form() {
        let mut e = engine();
        let out = speech_suggestions(&mut e, "我 吃飽 啦", &GradeBand::default());
        assert_eq!(out.len(), 3);
        assert_eq!(
            out[2],
            "書面語優化：我 吃飽 了（刪除口語助詞，更符合作文要求）"
        );
    }

    #[test]
    fn completed_sentence_from_buffer() {
        assert_eq!(completed_sentence("我有一隻小狗"), None);
        assert_eq!(
            completed_sentence("我有一隻小狗。"),
            Some("我有一隻小狗".into())
        );
        assert_eq!(
            completed_sentence("第一句。\n它很可愛。它會握手。"),
            Some("它會握手".into())
        );
        assert_eq!(completed_sentence("好。\n"), None);
        assert_eq!(
            completed_sentence("沒有句號的一行\n"),
            Some("沒有句號的一行".into())
        );
    }

    #[test]
    fn pattern_topic_format() {
        assert_eq!(
            pattern_topic("小狗", SentencePattern::Metaphor),
            "關鍵詞「小狗」-比喻句"
        );
    }
}
