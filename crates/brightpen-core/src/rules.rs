//! The rule table: an ordered, immutable list of writing rules.

use crate::error::ConfigError;
use crate::model::{placeholder_names, GradeBand, Placeholder, Rule};

/// Ordered rules, queried by grade band and trigger label.
#[derive(Debug, Clone, Default)]
pub struct RuleTable {
    rules: Vec<Rule>,
}

impl RuleTable {
    pub fn new(rules: Vec<Rule>) -> Self {
        Self { rules }
    }

    pub fn len(&self) -> usize {
        self.rules.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rules.is_empty()
    }

    /// Rules for `grade` whose trigger label is one of `labels`, in table order.
    pub fn matching<'a>(&'a self, grade: &GradeBand, labels: &[&str]) -> Vec<&'a Rule> {
        self.rules
            .iter()
            .filter(|r| &r.grade_range == grade && labels.contains(&r.trigger_condition.as_str()))
            .collect()
    }

    /// The first `n` rules for `grade`, ignoring triggers.
    pub fn first_for_grade<'a>(&'a self, grade: &GradeBand, n: usize) -> Vec<&'a Rule> {
        self.rules
            .iter()
            .filter(|r| &r.grade_range == grade)
            .take(n)
            .collect()
    }

    /// Fail on the first template marker the renderer cannot fill.
    pub fn ensure_renderable(&self) -> Result<(), ConfigError> {
        for rule in &self.rules {
            for name in placeholder_names(&rule.template) {
                if Placeholder::from_name(name).is_none() {
                    return Err(ConfigError::UnknownPlaceholder {
                        rule: rule.description.clone(),
                        placeholder: name.to_string(),
                    });
                }
            }
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::RuleType;

    fn rule(trigger: &str, grade: &str, template: &str) -> Rule {
        Rule {
            rule_type: RuleType::Mechanics,
            description: format!("{trigger} rule"),
            trigger_condition: trigger.into(),
            template: template.into(),
            weight: 0.1,
            grade_range: grade.into(),
        }
    }

    fn table() -> RuleTable {
        RuleTable::new(vec![
            rule("句子無謂語", "3-6年級", "【謂語】"),
            rule("句子無形容詞", "3-6年級", "【形容詞】"),
            rule("開頭無總起句", "4-6年級", "【主題】"),
            rule("句子無感受詞", "3-6年級", "【感受】"),
        ])
    }

    #[test]
    fn matching_filters_by_grade_and_label() {
        let t = table();
        let grade = GradeBand::from("3-6年級");
        let hits = t.matching(&grade, &["句子無謂語", "句子無感受詞", "開頭無總起句"]);
        let triggers: Vec<&str> = hits.iter().map(|r| r.trigger_condition.as_str()).collect();
        assert_eq!(triggers, vec!["句子無謂語", "句子無感受詞"]);
        assert!(t.matching(&grade, &[]).is_empty());
    }

    #[test]
    fn first_for_grade_takes_table_order() {
        let t = table();
        let first = t.first_for_grade(&GradeBand::from("3-6年級"), 2);
        assert_eq!(first.len(), 2);
        assert_eq!(first[0].trigger_condition, "句子無謂語");
        assert!(t.first_for_grade(&GradeBand::from("1-2年級"), 3).is_empty());
    }

    #[test]
    fn unknown_placeholder_fails() {
        let t = RuleTable::new(vec![rule("句子無謂語", "3-6年級", "【顏色】的花")]);
        let err = t.ensure_renderable().unwrap_err();
        assert!(matches!(err, ConfigError::UnknownPlaceholder { ref placeholder, .. } if placeholder == "顏色"));
        assert!(table().ensure_renderable().is_ok());
    }
}
