//! Rubric scoring for a whole composition.
//!
//! Four categories, each floored or capped on its own:
//!
//! | category        | range  | how                                              |
//! |-----------------|--------|--------------------------------------------------|
//! | mechanics       | 0..=30 | starts full, penalised per sentence              |
//! | expressiveness  | 0..=25 | rhetoric ×5 + adjective ×3                       |
//! | structure       | 0..=25 | connector sentences ×4 + intro 5 + conclusion 5  |
//! | content         | 0..=20 | detail ×3 + feeling ×2                           |
//!
//! The total is the plain sum; no global clamp is applied.

use std::fmt;

use serde::{Deserialize, Serialize};

use crate::analyzer::{SentenceAnalysis, SentenceAnalyzer};
use crate::model::LexiconCategory;

/// Sentence terminator used to split a composition.
pub const SENTENCE_TERMINATOR: char = '。';
/// Marks that count as terminal punctuation.
pub const TERMINAL_MARKS: [char; 3] = ['。', '！', '？'];

pub const MECHANICS_MAX: f64 = 30.0;
pub const EXPRESSIVENESS_MAX: f64 = 25.0;
pub const STRUCTURE_MAX: f64 = 25.0;
pub const CONTENT_MAX: f64 = 20.0;

const NO_PREDICATE_PENALTY: f64 = 5.0;
const LENGTH_PENALTY: f64 = 3.0;
const PUNCTUATION_PENALTY: f64 = 2.0;
const MIN_TOKENS: usize = 8;
const MAX_TOKENS: usize = 20;

const RHETORIC_POINTS: f64 = 5.0;
const ADJECTIVE_POINTS: f64 = 3.0;
const CONNECTOR_POINTS: f64 = 4.0;
const FRAMING_POINTS: f64 = 5.0;
const DETAIL_POINTS: f64 = 3.0;
const FEELING_POINTS: f64 = 2.0;

const INTRO_MARKERS: [&str; 2] = ["是我", "讓我"];
const CONCLUSION_MARKERS: [&str; 2] = ["明白了", "難忘"];

/// The four rubric categories.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ScoreCategory {
    Mechanics,
    Expressiveness,
    Structure,
    Content,
}

impl ScoreCategory {
    pub const ALL: [ScoreCategory; 4] = [
        ScoreCategory::Mechanics,
        ScoreCategory::Expressiveness,
        ScoreCategory::Structure,
        ScoreCategory::Content,
    ];

    /// Maximum points of the category.
    pub fn max(self) -> f64 {
        match self {
            ScoreCategory::Mechanics => MECHANICS_MAX,
            ScoreCategory::Expressiveness => EXPRESSIVENESS_MAX,
            ScoreCategory::Structure => STRUCTURE_MAX,
            ScoreCategory::Content => CONTENT_MAX,
        }
    }

    /// Label shown to students.
    pub fn label(self) -> &'static str {
        match self {
            ScoreCategory::Mechanics => "基礎規範",
            ScoreCategory::Expressiveness => "表達技巧",
            ScoreCategory::Structure => "結構邏輯",
            ScoreCategory::Content => "內容充實",
        }
    }
}

impl fmt::Display for ScoreCategory {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

/// Points per category.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct ScoreBreakdown {
    pub mechanics: f64,
    pub expressiveness: f64,
    pub structure: f64,
    pub content: f64,
}

impl ScoreBreakdown {
    pub fn get(&self, category: ScoreCategory) -> f64 {
        match category {
            ScoreCategory::Mechanics => self.mechanics,
            ScoreCategory::Expressiveness => self.expressiveness,
            ScoreCategory::Structure => self.structure,
            ScoreCategory::Content => self.content,
        }
    }

    pub fn total(&self) -> f64 {
        self.mechanics + self.expressiveness + self.structure + self.content
    }

    pub fn iter(&self) -> impl Iterator<Item = (ScoreCategory, f64)> + '_ {
        ScoreCategory::ALL.into_iter().map(|c| (c, self.get(c)))
    }
}

/// Result of scoring a composition.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ScoreReport {
    pub total: f64,
    pub breakdown: ScoreBreakdown,
}

impl ScoreReport {
    fn new(breakdown: ScoreBreakdown) -> Self {
        Self {
            total: breakdown.total(),
            breakdown,
        }
    }

    /// One hint per weak category, or a single message when none is weak.
    pub fn advice(&self) -> Vec<String> {
        let b = &self.breakdown;
        let mut hints = Vec::new();
        if b.mechanics < 20.0 {
            hints.push("注意句子完整性（包含主謂賓），避免過短/過長句子，句末記得加標點～".to_string());
        }
        if b.expressiveness < 15.0 {
            hints.push("多使用比喻句、擬人句和形容詞，讓句子更生動有趣哦～".to_string());
        }
        if b.structure < 15.0 {
            hints.push("段落間加入「首先、然後、此外」等銜接詞，開頭總起、結尾總結～".to_string());
        }
        if b.content < 10.0 {
            hints.push("補充時間、地點、動作等細節，加入真實感受，讓作文內容更豐富～".to_string());
        }
        if hints.is_empty() {
            hints.push("各項表現優秀！繼續保持，你已經掌握高分作文技巧啦～".to_string());
        }
        hints
    }
}

/// Split a composition into sentences.
///
/// Each sentence keeps its terminator; blank fragments are dropped.
pub fn split_sentences(text: &str) -> Vec<&str> {
    text.split_inclusive(SENTENCE_TERMINATOR)
        .map(str::trim)
        .filter(|s| !s.trim_matches(SENTENCE_TERMINATOR).trim().is_empty())
        .collect()
}

/// A sentence without its terminal marks.
pub fn sentence_body(sentence: &str) -> &str {
    sentence.trim_end_matches(TERMINAL_MARKS).trim_end()
}

/// Score a composition. Deterministic for a given text and lexicon.
pub fn score(analyzer: &SentenceAnalyzer<'_>, text: &str) -> ScoreReport {
    let sentences = split_sentences(text);
    // Terminators are checked on `sentences` but never counted as tokens.
    let bodies: Vec<&str> = sentences.iter().map(|s| sentence_body(s)).collect();
    let analyses: Vec<_> = bodies.iter().map(|s| analyzer.analyze(s, "")).collect();

    let mut mechanics = MECHANICS_MAX;
    for (sentence, analysis) in sentences.iter().zip(&analyses) {
        if !analysis.has_predicate {
            mechanics -= NO_PREDICATE_PENALTY;
        }
        if analysis.token_count < MIN_TOKENS || analysis.token_count > MAX_TOKENS {
            mechanics -= LENGTH_PENALTY;
        }
        if !sentence.ends_with(TERMINAL_MARKS) {
            mechanics -= PUNCTUATION_PENALTY;
        }
    }

    let count = |pred: fn(&SentenceAnalysis) -> bool| {
        analyses.iter().filter(|a| pred(a)).count() as f64
    };

    let expressiveness = (count(|a| a.has_rhetoric) * RHETORIC_POINTS
        + count(|a| a.has_adjective) * ADJECTIVE_POINTS)
        .min(EXPRESSIVENESS_MAX);

    let connectors = bodies
        .iter()
        .filter(|s| analyzer.mentions(s, LexiconCategory::Connector))
        .count() as f64;
    let intro = sentences
        .first()
        .is_some_and(|s| INTRO_MARKERS.iter().any(|m| s.contains(m)));
    let conclusion = sentences
        .last()
        .is_some_and(|s| CONCLUSION_MARKERS.iter().any(|m| s.contains(m)));
    let structure = (connectors * CONNECTOR_POINTS
        + if intro { FRAMING_POINTS } else { 0.0 }
        + if conclusion { FRAMING_POINTS } else { 0.0 })
    .min(STRUCTURE_MAX);

    let content = (count(|a| a.has_detail) * DETAIL_POINTS
        + count(|a| a.has_feeling) * FEELING_POINTS)
        .min(CONTENT_MAX);

    let report = ScoreReport::new(ScoreBreakdown {
        mechanics: mechanics.max(0.0),
        expressiveness,
        structure,
        content,
    });
    tracing::debug!(
        sentences = sentences.len(),
        total = report.total,
        "scored composition"
    );
    report
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::lexicon::Lexicon;
    use crate::model::GradeBand;
    use crate::segmenter::WhitespaceSegmenter;

    fn lexicon() -> Lexicon {
        let w = |list: &[&str]| list.iter().map(|s| s.to_string()).collect::<Vec<_>>();
        Lexicon::new(
            GradeBand::default(),
            vec![
                (LexiconCategory::Predicate, w(&["喜歡", "陪伴", "玩耍"])),
                (LexiconCategory::Adjective, w(&["可愛的"])),
                (LexiconCategory::Metaphor, w(&["像"])),
                (LexiconCategory::Personification, w(&["微笑"])),
                (LexiconCategory::Connector, w(&["首先", "然後"])),
                (LexiconCategory::Time, w(&["週末"])),
                (LexiconCategory::Place, w(&["公園"])),
                (LexiconCategory::Feeling, w(&["開心"])),
            ],
        )
    }

    fn score_text(text: &str) -> ScoreReport {
        let lex = lexicon();
        let seg = WhitespaceSegmenter;
        score(&SentenceAnalyzer::new(&lex, &seg), text)
    }

    #[test]
    fn split_keeps_terminators_and_drops_blanks() {
        assert_eq!(
            split_sentences("我 喜歡 狗。 。它 很 乖！\n"),
            vec!["我 喜歡 狗。", "它 很 乖！"]
        );
        assert!(split_sentences("  。。 ").is_empty());
    }

    #[test]
    fn empty_text_scores_only_full_mechanics() {
        let report = score_text("");
        assert_eq!(report.breakdown.mechanics, 30.0);
        assert_eq!(report.breakdown.expressiveness, 0.0);
        assert_eq!(report.breakdown.structure, 0.0);
        assert_eq!(report.breakdown.content, 0.0);
        assert_eq!(report.total, 30.0);
    }

    #[test]
    fn mechanics_penalties() {
        // 3 words, has predicate, terminated: -3
        let r = score_text("我 喜歡 狗 。");
        assert_eq!(r.breakdown.mechanics, 27.0);
        // no predicate, short, unterminated: -5 -3 -2
        let r = score_text("我 有 狗");
        assert_eq!(r.breakdown.mechanics, 20.0);
        // 7 words: the terminator does not lift it to 8
        let r = score_text("週末 我 和 小狗 在 公園 玩耍 。");
        assert_eq!(r.breakdown.mechanics, 27.0);
        let r = score_text("週末 我 和 小狗 在 公園 玩耍");
        assert_eq!(r.breakdown.mechanics, 25.0);
    }

    fn words(n: usize) -> String {
        let mut list = vec!["玩耍"];
        list.resize(n, "狗");
        list.join(" ")
    }

    #[test]
    fn length_bounds_count_words_only() {
        let cases = [(7, 27.0), (8, 30.0), (20, 30.0), (21, 27.0)];
        for (n, expected) in cases {
            let terminated = format!("{}。", words(n));
            assert_eq!(score_text(&terminated).breakdown.mechanics, expected, "{n} words + 。");
            let spaced = format!("{} ！", words(n));
            assert_eq!(score_text(&spaced).breakdown.mechanics, expected, "{n} words + ！");
        }
    }

    #[test]
    fn sentence_body_strips_terminal_marks() {
        assert_eq!(sentence_body("我 喜歡 狗 。"), "我 喜歡 狗");
        assert_eq!(sentence_body("真好玩！？"), "真好玩");
        assert_eq!(sentence_body("沒有標點"), "沒有標點");
    }

    #[test]
    fn mechanics_is_floored_at_zero() {
        let text = "狗 。".repeat(10);
        let r = score_text(&text);
        assert_eq!(r.breakdown.mechanics, 0.0);
    }

    #[test]
    fn expressiveness_structure_content_are_capped() {
        let sentence = "首先 可愛的 小狗 像 太陽 一樣 在 公園 微笑 我 很 開心 。";
        let text = sentence.repeat(8);
        let r = score_text(&text);
        assert_eq!(r.breakdown.expressiveness, 25.0);
        assert_eq!(r.breakdown.structure, 25.0);
        assert_eq!(r.breakdown.content, 20.0);
        assert_eq!(r.total, r.breakdown.total());
    }

    #[test]
    fn intro_and_conclusion_markers() {
        let r = score_text("小狗 是我 的 好朋友 。它 很 乖 。這 真是 難忘 的 一天 。");
        assert_eq!(r.breakdown.structure, 10.0);
        // Markers only count in the first / last sentence.
        let r = score_text("它 很 乖 。小狗 是我 的 好朋友 。它 很 乖 。");
        assert_eq!(r.breakdown.structure, 0.0);
    }

    #[test]
    fn scoring_is_deterministic() {
        let text = "週末 我 在 公園 陪伴 可愛的 小狗 。然後 我們 很 開心 。";
        assert_eq!(score_text(text), score_text(text));
    }

    #[test]
    fn categories_stay_in_range() {
        let long = "我 。".repeat(30);
        for text in ["", "狗", "首先 像 微笑 可愛的 週末 開心 。", long.as_str()] {
            let r = score_text(text);
            for (category, points) in r.breakdown.iter() {
                assert!(points >= 0.0 && points <= category.max(), "{category}: {points}");
            }
        }
    }

    #[test]
    fn advice_for_weak_and_strong_reports() {
        let weak = score_text("狗 。狗");
        assert_eq!(weak.advice().len(), 4);
        let strong = ScoreReport::new(ScoreBreakdown {
            mechanics: 30.0,
            expressiveness: 20.0,
            structure: 20.0,
            content: 15.0,
        });
        let advice = strong.advice();
        assert_eq!(advice.len(), 1);
        assert!(advice[0].contains("優秀"));
    }
}
