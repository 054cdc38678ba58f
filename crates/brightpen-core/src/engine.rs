//! The writing engine.
//!
//! Owns an immutable [`EngineConfig`] (lexicon and rule table for one grade
//! band) plus the two injectable seams: the segmenter and the random source.

use crate::analyzer::{SentenceAnalysis, SentenceAnalyzer};
use crate::error::ConfigError;
use crate::generator::SuggestionGenerator;
use crate::lexicon::Lexicon;
use crate::model::{GradeBand, Suggestion};
use crate::parser::Dataset;
use crate::random::{RandomSource, SeededRandom};
use crate::rules::RuleTable;
use crate::scorer::{self, ScoreReport};
use crate::segmenter::{JiebaSegmenter, Segmenter};

/// Lexicon and rules for one grade band. Validated on construction.
#[derive(Debug, Clone)]
pub struct EngineConfig {
    pub grade: GradeBand,
    pub lexicon: Lexicon,
    pub rules: RuleTable,
}

impl EngineConfig {
    /// Build and validate a configuration.
    ///
    /// Fails if a lexicon category is missing or empty for `grade`, or if a
    /// rule template uses a placeholder the renderer cannot fill.
    pub fn new(grade: GradeBand, lexicon: Lexicon, rules: RuleTable) -> Result<Self, ConfigError> {
        lexicon.ensure_complete()?;
        rules.ensure_renderable()?;
        Ok(Self {
            grade,
            lexicon,
            rules,
        })
    }

    /// Select the lexicon for `grade` from a dataset and validate it.
    pub fn from_dataset(dataset: &Dataset, grade: &GradeBand) -> Result<Self, ConfigError> {
        let config = Self::new(grade.clone(), dataset.lexicon(grade), dataset.rule_table())?;
        tracing::info!(
            dataset = %dataset.id,
            %grade,
            rules = config.rules.len(),
            "loaded writing dataset"
        );
        Ok(config)
    }
}

/// Analyze, suggest and score over one [`EngineConfig`].
pub struct WritingEngine {
    config: EngineConfig,
    segmenter: Box<dyn Segmenter>,
    rng: Box<dyn RandomSource>,
}

impl WritingEngine {
    /// Engine with jieba (seeded with the lexicon) and an entropy-seeded RNG.
    pub fn new(config: EngineConfig) -> Self {
        let segmenter = JiebaSegmenter::with_lexicon(&config.lexicon);
        Self::with_parts(config, Box::new(segmenter), Box::new(SeededRandom::from_entropy()))
    }

    /// Engine with an explicit segmenter and random source.
    pub fn with_parts(
        config: EngineConfig,
        segmenter: Box<dyn Segmenter>,
        rng: Box<dyn RandomSource>,
    ) -> Self {
        Self {
            config,
            segmenter,
            rng,
        }
    }

    pub fn config(&self) -> &EngineConfig {
        &self.config
    }

    pub fn lexicon(&self) -> &Lexicon {
        &self.config.lexicon
    }

    pub fn grade(&self) -> &GradeBand {
        &self.config.grade
    }

    /// A fresh analyzer over this engine's lexicon and segmenter.
    pub fn analyzer(&self) -> SentenceAnalyzer<'_> {
        SentenceAnalyzer::new(&self.config.lexicon, &*self.segmenter)
    }

    pub fn analyze(&self, sentence: &str, previous: &str) -> SentenceAnalysis {
        self.analyzer().analyze(sentence, previous)
    }

    /// Exactly three suggestions for `sentence`, using rules of `grade`.
    pub fn generate(&mut self, sentence: &str, previous: &str, grade: &GradeBand) -> Vec<String> {
        let analyzer = SentenceAnalyzer::new(&self.config.lexicon, &*self.segmenter);
        let generator = SuggestionGenerator::new(analyzer, &self.config.lexicon, &self.config.rules);
        generator.generate(sentence, previous, grade, &mut *self.rng)
    }

    /// [`generate`](Self::generate), numbered for display.
    pub fn suggestions(
        &mut self,
        sentence: &str,
        previous: &str,
        grade: &GradeBand,
    ) -> Vec<Suggestion> {
        Suggestion::numbered(self.generate(sentence, previous, grade))
    }

    /// Rubric score of a full text. Deterministic.
    pub fn score(&self, text: &str) -> ScoreReport {
        scorer::score(&self.analyzer(), text)
    }

    /// The lexicon together with the random source, for callers that fill
    /// their own templates.
    pub fn lexicon_and_rng(&mut self) -> (&Lexicon, &mut dyn RandomSource) {
        (&self.config.lexicon, &mut *self.rng)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::generator::SUGGESTION_COUNT;
    use crate::model::{LexiconCategory, OPEN_MARK};
    use crate::parser::seed_dataset;
    use crate::random::FirstPick;
    use crate::scorer::ScoreBreakdown;
    use crate::segmenter::WhitespaceSegmenter;

    fn seeded_config() -> EngineConfig {
        let set = seed_dataset().unwrap();
        EngineConfig::from_dataset(&set, &GradeBand::default()).unwrap()
    }

    fn whitespace_engine() -> WritingEngine {
        WritingEngine::with_parts(
            seeded_config(),
            Box::new(WhitespaceSegmenter),
            Box::new(FirstPick),
        )
    }

    #[test]
    fn missing_category_fails_at_construction() {
        let set = seed_dataset().unwrap();
        let err = EngineConfig::from_dataset(&set, &GradeBand::from("1-2年級")).unwrap_err();
        assert!(matches!(err, ConfigError::MissingCategory { .. }));
    }

    #[test]
    fn unknown_placeholder_fails_at_construction() {
        let set = seed_dataset().unwrap();
        let mut rules: Vec<_> = set.rules.clone();
        rules[0].template = "【顏色】的花".into();
        let err = EngineConfig::new(
            GradeBand::default(),
            set.lexicon(&GradeBand::default()),
            RuleTable::new(rules),
        )
        .unwrap_err();
        assert!(matches!(err, ConfigError::UnknownPlaceholder { .. }));
    }

    #[test]
    fn short_sentence_yields_three_filled_suggestions() {
        let mut engine = WritingEngine::with_parts(
            seeded_config(),
            Box::new(JiebaSegmenter::with_lexicon(&seeded_config().lexicon)),
            Box::new(SeededRandom::seeded(3)),
        );
        let analysis = engine.analyze("我有一隻寵物", "");
        assert!(analysis.token_count < 8);
        assert!(!analysis.has_detail && !analysis.has_feeling);
        assert!(!analysis.has_rhetoric && !analysis.has_adjective);

        let out = engine.generate("我有一隻寵物", "", &GradeBand::default());
        assert_eq!(out.len(), SUGGESTION_COUNT);
        for s in &out {
            assert!(!s.is_empty());
            assert!(!s.contains(OPEN_MARK), "unresolved marker in {s}");
        }
    }

    #[test]
    fn empty_sentence_still_gets_three() {
        let mut engine = whitespace_engine();
        assert_eq!(engine.generate("", "", &GradeBand::default()).len(), 3);
        assert_eq!(engine.generate("   ", "", &GradeBand::default()).len(), 3);
    }

    #[test]
    fn unknown_grade_falls_back() {
        let mut engine = whitespace_engine();
        let out = engine.generate("我 喜歡 玩具", "", &GradeBand::from("1-2年級"));
        assert_eq!(out.len(), 3);
        assert!(out.iter().all(|s| !s.contains(OPEN_MARK)));
    }

    #[test]
    fn suggestions_are_numbered() {
        let mut engine = whitespace_engine();
        let list = engine.suggestions("我 喜歡 玩具", "", &GradeBand::default());
        let indexes: Vec<usize> = list.iter().map(|s| s.index).collect();
        assert_eq!(indexes, vec![1, 2, 3]);
    }

    #[test]
    fn seeded_engines_agree() {
        let make = || {
            WritingEngine::with_parts(
                seeded_config(),
                Box::new(WhitespaceSegmenter),
                Box::new(SeededRandom::seeded(11)),
            )
        };
        let mut a = make();
        let mut b = make();
        for _ in 0..5 {
            assert_eq!(
                a.generate("小狗 很 可愛", "我 喜歡 小狗", &GradeBand::default()),
                b.generate("小狗 很 可愛", "我 喜歡 小狗", &GradeBand::default())
            );
        }
    }

    #[test]
    fn example_composition_scores_low_on_lexicon_coverage() {
        let engine = WritingEngine::new(seeded_config());
        let text = "我有一隻可愛的小狗。它很聰明，會握手和坐下。每天放學回家，它都會搖著尾巴跑來迎接我。我很喜歡我的小狗。";
        let report = engine.score(text);
        let b = &report.breakdown;
        // Three sentences lack a predicate (-15); the first and last are
        // under eight words (-6). The second sits near the boundary.
        assert!(
            b.mechanics == 9.0 || b.mechanics == 6.0,
            "mechanics {}",
            b.mechanics
        );
        assert_eq!(b.expressiveness, 3.0);
        assert_eq!(b.structure, 0.0);
        assert_eq!(b.content, 0.0);
        assert!(report.total < 60.0);
        assert_eq!(report, engine.score(text));
        assert!(engine.lexicon().contains(LexiconCategory::Adjective, "可愛的"));
    }

    #[test]
    fn segmented_composition_has_exact_breakdown() {
        let engine = whitespace_engine();
        let text = "我 有 一隻 可愛的 小狗 。\
                    它 很 聰明 ， 會 握手 和 坐下 。\
                    每天 放學 回家 ， 它 都 會 搖著 尾巴 跑來 迎接 我 。\
                    我 很 喜歡 我 的 小狗 。";
        let report = engine.score(text);
        assert_eq!(
            report.breakdown,
            ScoreBreakdown {
                mechanics: 9.0,
                expressiveness: 3.0,
                structure: 0.0,
                content: 0.0,
            }
        );
        assert_eq!(report.total, 12.0);
    }
}
