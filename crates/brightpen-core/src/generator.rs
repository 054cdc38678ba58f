//! Suggestion generator.
//!
//! Turns an analysis into trigger labels, picks matching rules for the grade
//! band, and fills their templates with words from the sentence and the
//! lexicon. Always yields exactly [`SUGGESTION_COUNT`] suggestions.

use std::collections::HashMap;

use crate::analyzer::{SentenceAnalysis, SentenceAnalyzer};
use crate::lexicon::Lexicon;
use crate::model::{
    GradeBand, LexiconCategory, Placeholder, Rule, TriggerCondition, CLOSE_MARK, OPEN_MARK,
};
use crate::random::{self, RandomSource};
use crate::rules::RuleTable;

/// Suggestions returned per call.
pub const SUGGESTION_COUNT: usize = 3;

/// Below this similarity to the previous sentence a connector is suggested.
pub const SIMILARITY_THRESHOLD: f64 = 0.30;

/// Sentences with fewer tokens than this are flagged as too short.
pub const MIN_TOKENS: usize = 8;

const SUBJECT_CANDIDATES: [&str; 5] = ["我", "你", "他", "寵物", "學校"];
const OBJECT_CANDIDATES: [&str; 4] = ["玩具", "朋友", "風景", "寵物"];
const FALLBACK_SUBJECT: &str = "我";
const FALLBACK_OBJECT: &str = "事情";

/// The particle swapped by the 【正確表述】 placeholder.
const CONFUSABLE: char = '的';
const CONFUSABLE_FIX: char = '得';
const TYPO_KIND: &str = "的/得/地";

/// Deficiency labels for an analysis, in a fixed order.
pub fn derive_triggers(analysis: &SentenceAnalysis) -> Vec<TriggerCondition> {
    let mut triggers = Vec::new();
    if !analysis.has_predicate {
        triggers.push(TriggerCondition::NoPredicate);
    }
    if !analysis.has_adjective {
        triggers.push(TriggerCondition::NoAdjective);
    }
    if !analysis.has_rhetoric {
        triggers.push(TriggerCondition::NoRhetoric);
    }
    if analysis.similarity < SIMILARITY_THRESHOLD {
        triggers.push(TriggerCondition::LowSimilarity);
    }
    if analysis.token_count < MIN_TOKENS {
        triggers.push(TriggerCondition::TooShort);
    }
    if !analysis.has_detail {
        triggers.push(TriggerCondition::NoDetail);
    }
    if !analysis.has_feeling {
        triggers.push(TriggerCondition::NoFeeling);
    }
    triggers
}

/// Swap a trailing confusable particle: `跑的` → `跑得`.
///
/// Only the last two characters are touched, and only when one of them is
/// the particle.
pub fn corrected_form(sentence: &str) -> String {
    let sentence = sentence.trim();
    let chars: Vec<char> = sentence.chars().collect();
    let tail_start = chars.len().saturating_sub(2);
    if !chars[tail_start..].contains(&CONFUSABLE) {
        return sentence.to_string();
    }
    chars
        .iter()
        .enumerate()
        .map(|(i, &c)| {
            if i >= tail_start && c == CONFUSABLE {
                CONFUSABLE_FIX
            } else {
                c
            }
        })
        .collect()
}

/// Concrete words chosen for one generate call.
#[derive(Debug, Clone, Default)]
struct Fillers {
    subject: String,
    object: String,
    predicate: String,
    adjective: String,
    metaphor: String,
    connector: String,
    personification: String,
    time: String,
    place: String,
    feeling: String,
    vehicle: String,
    moral: String,
}

impl Fillers {
    fn pick(lexicon: &Lexicon, tokens: &[String], rng: &mut dyn RandomSource) -> Self {
        let mut word = |category: LexiconCategory| {
            random::choose(rng, lexicon.words(category))
                .unwrap_or_default()
                .to_string()
        };
        let subject = first_hit(tokens, &SUBJECT_CANDIDATES).unwrap_or(FALLBACK_SUBJECT);
        let object = first_hit(tokens, &OBJECT_CANDIDATES).unwrap_or(FALLBACK_OBJECT);
        let predicate = tokens
            .iter()
            .find(|t| lexicon.contains(LexiconCategory::Predicate, t))
            .cloned()
            .unwrap_or_else(|| word(LexiconCategory::Predicate));

        Self {
            subject: subject.to_string(),
            object: object.to_string(),
            predicate,
            adjective: word(LexiconCategory::Adjective),
            metaphor: word(LexiconCategory::Metaphor),
            connector: word(LexiconCategory::Connector),
            personification: word(LexiconCategory::Personification),
            time: word(LexiconCategory::Time),
            place: word(LexiconCategory::Place),
            feeling: word(LexiconCategory::Feeling),
            vehicle: word(LexiconCategory::Vehicle),
            moral: word(LexiconCategory::Moral),
        }
    }
}

fn first_hit<'a>(tokens: &[String], candidates: &[&'a str]) -> Option<&'a str> {
    tokens
        .iter()
        .find_map(|t| candidates.iter().copied().find(|c| *c == t.as_str()))
}

/// Adjectives in the lexicon already end in 的; strip it before re-adding.
pub(crate) fn attributive(adjective: &str) -> String {
    format!("{}的", adjective.strip_suffix('的').unwrap_or(adjective))
}

/// Rule matching and template filling over one lexicon and rule table.
pub struct SuggestionGenerator<'a> {
    analyzer: SentenceAnalyzer<'a>,
    lexicon: &'a Lexicon,
    rules: &'a RuleTable,
}

impl<'a> SuggestionGenerator<'a> {
    pub fn new(analyzer: SentenceAnalyzer<'a>, lexicon: &'a Lexicon, rules: &'a RuleTable) -> Self {
        Self {
            analyzer,
            lexicon,
            rules,
        }
    }

    /// Exactly three suggestions for `sentence`.
    pub fn generate(
        &self,
        sentence: &str,
        previous: &str,
        grade: &GradeBand,
        rng: &mut dyn RandomSource,
    ) -> Vec<String> {
        let analysis = self.analyzer.analyze(sentence, previous);
        let triggers = derive_triggers(&analysis);
        let labels: Vec<&str> = triggers.iter().map(|t| t.label()).collect();

        let matched: Vec<&Rule> = if labels.is_empty() {
            self.rules.first_for_grade(grade, SUGGESTION_COUNT)
        } else {
            random::shuffle(rng, self.rules.matching(grade, &labels))
        };
        tracing::debug!(
            triggers = ?labels,
            matched = matched.len(),
            %grade,
            "matched writing rules"
        );

        let fillers = Fillers::pick(self.lexicon, &analysis.tokens, rng);
        let mut suggestions: Vec<String> = matched
            .iter()
            .take(SUGGESTION_COUNT)
            .map(|rule| self.render(&rule.template, sentence, &fillers, rng))
            .collect();

        if suggestions.len() < SUGGESTION_COUNT {
            tracing::debug!(
                rendered = suggestions.len(),
                "padding suggestions with fallback templates"
            );
        }
        while suggestions.len() < SUGGESTION_COUNT {
            suggestions.push(fallback(&fillers, rng));
        }
        suggestions
    }

    /// Fill `template` in one left-to-right pass. Inserted values are never
    /// scanned again, so markers inside the user's sentence stay as typed.
    fn render(
        &self,
        template: &str,
        sentence: &str,
        f: &Fillers,
        rng: &mut dyn RandomSource,
    ) -> String {
        let sentence = sentence.trim();
        // One value per placeholder, so repeated markers agree.
        let mut values: HashMap<Placeholder, String> = HashMap::new();
        let mut out = String::with_capacity(template.len());
        let mut rest = template;
        while let Some(start) = rest.find(OPEN_MARK) {
            out.push_str(&rest[..start]);
            let after = &rest[start + OPEN_MARK.len_utf8()..];
            let found = after.find(CLOSE_MARK).and_then(|end| {
                Placeholder::from_name(&after[..end]).map(|p| (p, end))
            });
            let Some((placeholder, end)) = found else {
                out.push(OPEN_MARK);
                rest = after;
                continue;
            };
            rest = &after[end + CLOSE_MARK.len_utf8()..];
            let value = values
                .entry(placeholder)
                .or_insert_with(|| self.fill(placeholder, sentence, f, rng));
            // 【形容詞】的 would double the particle of lexicon adjectives.
            if placeholder == Placeholder::Adjective {
                if let Some(tail) = rest.strip_prefix('的') {
                    out.push_str(&attributive(value));
                    rest = tail;
                    continue;
                }
            }
            out.push_str(value);
        }
        out.push_str(rest);
        out
    }

    fn fill(
        &self,
        placeholder: Placeholder,
        sentence: &str,
        f: &Fillers,
        rng: &mut dyn RandomSource,
    ) -> String {
        match placeholder {
            Placeholder::Subject => f.subject.clone(),
            Placeholder::Predicate => f.predicate.clone(),
            Placeholder::RecommendedPredicate | Placeholder::Action => {
                random::choose(rng, self.lexicon.words(LexiconCategory::Predicate))
                    .unwrap_or_default()
                    .to_string()
            }
            Placeholder::Adjective => f.adjective.clone(),
            Placeholder::Metaphor => f.metaphor.clone(),
            Placeholder::Connector => f.connector.clone(),
            Placeholder::Object => f.object.clone(),
            Placeholder::Personification => f.personification.clone(),
            Placeholder::Time => f.time.clone(),
            Placeholder::Place => f.place.clone(),
            Placeholder::Feeling => f.feeling.clone(),
            Placeholder::Vehicle => f.vehicle.clone(),
            Placeholder::Moral => f.moral.clone(),
            Placeholder::Sentence | Placeholder::NextSentence => sentence.to_string(),
            Placeholder::Topic => format!("{}的{}", f.subject, f.object),
            Placeholder::ShortRewrite => format!(
                "{}{}{}{}",
                attributive(&f.adjective),
                f.subject,
                f.predicate,
                f.object
            ),
            Placeholder::CorrectedForm => corrected_form(sentence),
            Placeholder::TypoKind => TYPO_KIND.to_string(),
        }
    }
}

/// One of the hard-coded fallback sentences, one per sentence family.
fn fallback(f: &Fillers, rng: &mut dyn RandomSource) -> String {
    let adjective = attributive(&f.adjective);
    let options = [
        format!(
            "可以加入細節：{}，{}在{} {} {}，{}極了～",
            f.time, f.subject, f.place, f.predicate, f.object, f.feeling
        ),
        format!(
            "用擬人句試試：{} {}著{}，好像在跟我互動呢～",
            f.object, f.personification, f.predicate
        ),
        format!(
            "讓句子更生動：{}{} {} {}一樣 {}，真有趣～",
            adjective, f.subject, f.metaphor, f.vehicle, f.predicate
        ),
        format!(
            "加入銜接詞：{}，{}{}讓我{}到難以忘懷～",
            f.connector, adjective, f.object, f.feeling
        ),
    ];
    let idx = rng.pick_index(options.len()).min(options.len() - 1);
    options[idx].clone()
}
