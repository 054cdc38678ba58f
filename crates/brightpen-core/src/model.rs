//! Core data model types for brightpen.
//!
//! Lexicon categories, rules, trigger labels, template placeholders and the
//! practice record shape shared by the engine, the store and the CLI.

use std::fmt;
use std::str::FromStr;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Default grade band for the seed dataset.
pub const DEFAULT_GRADE: &str = "3-6年級";

/// A grade band tag such as `"3-6年級"`.
///
/// Rules and resources are scoped by exact tag equality.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct GradeBand(String);

impl GradeBand {
    pub fn new(tag: impl Into<String>) -> Self {
        Self(tag.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl Default for GradeBand {
    fn default() -> Self {
        Self(DEFAULT_GRADE.to_string())
    }
}

impl fmt::Display for GradeBand {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<&str> for GradeBand {
    fn from(s: &str) -> Self {
        Self(s.to_string())
    }
}

/// The closed set of lexicon categories in the resource store.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub enum LexiconCategory {
    Subject,
    Predicate,
    Object,
    Adjective,
    Metaphor,
    Personification,
    Connector,
    Time,
    Place,
    Vehicle,
    Feeling,
    Moral,
}

impl LexiconCategory {
    pub const ALL: [LexiconCategory; 12] = [
        LexiconCategory::Subject,
        LexiconCategory::Predicate,
        LexiconCategory::Object,
        LexiconCategory::Adjective,
        LexiconCategory::Metaphor,
        LexiconCategory::Personification,
        LexiconCategory::Connector,
        LexiconCategory::Time,
        LexiconCategory::Place,
        LexiconCategory::Vehicle,
        LexiconCategory::Feeling,
        LexiconCategory::Moral,
    ];

    /// The dataset name of this category.
    pub fn name(self) -> &'static str {
        match self {
            LexiconCategory::Subject => "主語詞",
            LexiconCategory::Predicate => "謂語",
            LexiconCategory::Object => "賓語詞",
            LexiconCategory::Adjective => "形容詞",
            LexiconCategory::Metaphor => "比喻詞",
            LexiconCategory::Personification => "擬人詞",
            LexiconCategory::Connector => "銜接詞",
            LexiconCategory::Time => "時間詞",
            LexiconCategory::Place => "地點詞",
            LexiconCategory::Vehicle => "喻體",
            LexiconCategory::Feeling => "感受詞",
            LexiconCategory::Moral => "道理詞",
        }
    }

    fn slug(self) -> &'static str {
        match self {
            LexiconCategory::Subject => "subject",
            LexiconCategory::Predicate => "predicate",
            LexiconCategory::Object => "object",
            LexiconCategory::Adjective => "adjective",
            LexiconCategory::Metaphor => "metaphor",
            LexiconCategory::Personification => "personification",
            LexiconCategory::Connector => "connector",
            LexiconCategory::Time => "time",
            LexiconCategory::Place => "place",
            LexiconCategory::Vehicle => "vehicle",
            LexiconCategory::Feeling => "feeling",
            LexiconCategory::Moral => "moral",
        }
    }
}

impl fmt::Display for LexiconCategory {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl FromStr for LexiconCategory {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let s = s.trim();
        LexiconCategory::ALL
            .into_iter()
            .find(|c| c.name() == s || c.slug().eq_ignore_ascii_case(s))
            .ok_or_else(|| format!("unknown lexicon category: {s}"))
    }
}

impl TryFrom<String> for LexiconCategory {
    type Error = String;

    fn try_from(s: String) -> Result<Self, Self::Error> {
        s.parse()
    }
}

impl From<LexiconCategory> for String {
    fn from(c: LexiconCategory) -> Self {
        c.name().to_string()
    }
}

/// The four rubric families a rule belongs to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub enum RuleType {
    Mechanics,
    Expressiveness,
    Structure,
    Content,
}

impl RuleType {
    pub fn name(self) -> &'static str {
        match self {
            RuleType::Mechanics => "基礎規範",
            RuleType::Expressiveness => "表達技巧",
            RuleType::Structure => "結構邏輯",
            RuleType::Content => "內容充實",
        }
    }
}

impl fmt::Display for RuleType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl FromStr for RuleType {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim() {
            "基礎規範" | "mechanics" => Ok(RuleType::Mechanics),
            "表達技巧" | "expressiveness" => Ok(RuleType::Expressiveness),
            "結構邏輯" | "structure" => Ok(RuleType::Structure),
            "內容充實" | "content" => Ok(RuleType::Content),
            other => Err(format!("unknown rule type: {other}")),
        }
    }
}

impl TryFrom<String> for RuleType {
    type Error = String;

    fn try_from(s: String) -> Result<Self, Self::Error> {
        s.parse()
    }
}

impl From<RuleType> for String {
    fn from(t: RuleType) -> Self {
        t.name().to_string()
    }
}

/// A single writing rule. Immutable once loaded.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Rule {
    /// Rubric family.
    pub rule_type: RuleType,
    /// What the rule asks of the student.
    #[serde(default)]
    pub description: String,
    /// Trigger label; joined against the generator's derived labels.
    pub trigger_condition: String,
    /// Suggestion template with 【…】 placeholders.
    pub template: String,
    /// Rubric weight of this rule.
    pub weight: f64,
    /// Grade band this rule applies to.
    pub grade_range: GradeBand,
}

/// Deficiency labels the suggestion generator derives from an analysis.
///
/// The labels are the join key against [`Rule::trigger_condition`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum TriggerCondition {
    NoPredicate,
    NoAdjective,
    NoRhetoric,
    LowSimilarity,
    TooShort,
    NoDetail,
    NoFeeling,
}

impl TriggerCondition {
    pub const ALL: [TriggerCondition; 7] = [
        TriggerCondition::NoPredicate,
        TriggerCondition::NoAdjective,
        TriggerCondition::NoRhetoric,
        TriggerCondition::LowSimilarity,
        TriggerCondition::TooShort,
        TriggerCondition::NoDetail,
        TriggerCondition::NoFeeling,
    ];

    pub fn label(self) -> &'static str {
        match self {
            TriggerCondition::NoPredicate => "句子無謂語",
            TriggerCondition::NoAdjective => "句子無形容詞",
            TriggerCondition::NoRhetoric => "連續3句無比喻詞",
            TriggerCondition::LowSimilarity => "上下句關鍵詞相似度<30%",
            TriggerCondition::TooShort => "句子長度<8字",
            TriggerCondition::NoDetail => "句子無細節描寫",
            TriggerCondition::NoFeeling => "句子無感受詞",
        }
    }

    /// Looks up the condition for a rule-table label.
    pub fn from_label(label: &str) -> Option<Self> {
        TriggerCondition::ALL
            .into_iter()
            .find(|c| c.label() == label)
    }
}

impl fmt::Display for TriggerCondition {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

/// Template placeholders, written as `【name】` inside rule templates.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Placeholder {
    Subject,
    Predicate,
    RecommendedPredicate,
    Adjective,
    Metaphor,
    Connector,
    Object,
    Personification,
    Time,
    Place,
    Feeling,
    Vehicle,
    Moral,
    Sentence,
    Topic,
    NextSentence,
    ShortRewrite,
    CorrectedForm,
    TypoKind,
    Action,
}

impl Placeholder {
    pub const ALL: [Placeholder; 20] = [
        Placeholder::Subject,
        Placeholder::Predicate,
        Placeholder::RecommendedPredicate,
        Placeholder::Adjective,
        Placeholder::Metaphor,
        Placeholder::Connector,
        Placeholder::Object,
        Placeholder::Personification,
        Placeholder::Time,
        Placeholder::Place,
        Placeholder::Feeling,
        Placeholder::Vehicle,
        Placeholder::Moral,
        Placeholder::Sentence,
        Placeholder::Topic,
        Placeholder::NextSentence,
        Placeholder::ShortRewrite,
        Placeholder::CorrectedForm,
        Placeholder::TypoKind,
        Placeholder::Action,
    ];

    pub fn name(self) -> &'static str {
        match self {
            Placeholder::Subject => "主語",
            Placeholder::Predicate => "謂語",
            Placeholder::RecommendedPredicate => "推薦謂語",
            Placeholder::Adjective => "形容詞",
            Placeholder::Metaphor => "比喻詞",
            Placeholder::Connector => "銜接詞",
            Placeholder::Object => "賓語",
            Placeholder::Personification => "擬人詞",
            Placeholder::Time => "時間",
            Placeholder::Place => "地點",
            Placeholder::Feeling => "感受",
            Placeholder::Vehicle => "喻體",
            Placeholder::Moral => "道理",
            Placeholder::Sentence => "句子",
            Placeholder::Topic => "主題",
            Placeholder::NextSentence => "下句優化",
            Placeholder::ShortRewrite => "優化後短句",
            Placeholder::CorrectedForm => "正確表述",
            Placeholder::TypoKind => "錯別字類型",
            Placeholder::Action => "動作",
        }
    }

    pub fn from_name(name: &str) -> Option<Self> {
        Placeholder::ALL.into_iter().find(|p| p.name() == name)
    }

    /// The marker as it appears in a template.
    pub fn marker(self) -> String {
        format!("{OPEN_MARK}{}{CLOSE_MARK}", self.name())
    }
}

pub const OPEN_MARK: char = '【';
pub const CLOSE_MARK: char = '】';

/// Names of every `【…】` marker in a template, in order of appearance.
pub fn placeholder_names(template: &str) -> Vec<&str> {
    let mut names = Vec::new();
    let mut rest = template;
    while let Some(start) = rest.find(OPEN_MARK) {
        let after = &rest[start + OPEN_MARK.len_utf8()..];
        let Some(end) = after.find(CLOSE_MARK) else {
            break;
        };
        names.push(&after[..end]);
        rest = &after[end + CLOSE_MARK.len_utf8()..];
    }
    names
}

/// One entry of a suggestion list, as shown to the student.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Suggestion {
    /// 1-based position in the list.
    pub index: usize,
    /// The suggested sentence.
    pub text: String,
}

impl Suggestion {
    /// Number a list of suggestion strings from 1.
    pub fn numbered(texts: Vec<String>) -> Vec<Suggestion> {
        texts
            .into_iter()
            .enumerate()
            .map(|(i, text)| Suggestion { index: i + 1, text })
            .collect()
    }
}

impl fmt::Display for Suggestion {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}. {}", self.index, self.text)
    }
}

/// Practice modes offered by the calling UI.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub enum PracticeMode {
    Composition,
    SentenceMaking,
    SpeechTranscription,
}

impl PracticeMode {
    pub fn name(self) -> &'static str {
        match self {
            PracticeMode::Composition => "作文模式",
            PracticeMode::SentenceMaking => "造句模式",
            PracticeMode::SpeechTranscription => "講話轉寫模式",
        }
    }
}

impl fmt::Display for PracticeMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl FromStr for PracticeMode {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "作文模式" | "composition" => Ok(PracticeMode::Composition),
            "造句模式" | "sentence" | "sentence-making" => Ok(PracticeMode::SentenceMaking),
            "講話轉寫模式" | "speech" | "speech-transcription" => {
                Ok(PracticeMode::SpeechTranscription)
            }
            other => Err(format!("unknown practice mode: {other}")),
        }
    }
}

impl TryFrom<String> for PracticeMode {
    type Error = String;

    fn try_from(s: String) -> Result<Self, Self::Error> {
        s.parse()
    }
}

impl From<PracticeMode> for String {
    fn from(m: PracticeMode) -> Self {
        m.name().to_string()
    }
}

/// One saved practice attempt. Append-only.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PracticeRecord {
    pub id: i64,
    pub student_id: String,
    pub mode: PracticeMode,
    pub topic: String,
    pub input_text: String,
    pub suggested_text: String,
    pub score: f64,
    pub created_at: DateTime<Utc>,
}
