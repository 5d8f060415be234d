//! Maritime pattern definitions and the compiled pattern table.

use regex::{Regex, RegexBuilder};
use serde::{Deserialize, Serialize};

use crate::keyword::Category;

/// Error type for pattern building.
#[derive(Debug)]
pub enum BuildError {
    /// The regex pattern is invalid.
    Regex(String),

    /// The category cannot be produced by extraction.
    Category(Category),
}

impl std::fmt::Display for BuildError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Regex(e) => write!(f, "invalid regex: {e}"),
            Self::Category(c) => write!(f, "category {c} is not extractable"),
        }
    }
}

impl std::error::Error for BuildError {}

impl From<regex::Error> for BuildError {
    fn from(err: regex::Error) -> Self {
        Self::Regex(err.to_string())
    }
}

/// Ordered matching rules for one category.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PatternDef {
    pub category: Category,

    /// Regex sources, applied in order. Compiled case-insensitive with ASCII
    /// word boundaries and ASCII case folding.
    pub patterns: Vec<String>,
}

impl PatternDef {
    fn compile(&self) -> Result<Vec<Regex>, BuildError> {
        if !self.category.is_extractable() {
            return Err(BuildError::Category(self.category));
        }
        self.patterns
            .iter()
            .map(|p| {
                RegexBuilder::new(p)
                    .case_insensitive(true)
                    .unicode(false)
                    .build()
                    .map_err(BuildError::from)
            })
            .collect()
    }
}

/// Immutable category -> rules table, built once at start-up.
#[derive(Debug, Clone)]
pub struct PatternTable {
    entries: Vec<(Category, Vec<Regex>)>,
}

impl PatternTable {
    /// Compile pattern definitions, keeping declaration order.
    ///
    /// Repeated definitions for the same category are appended to the first
    /// entry for that category.
    ///
    /// # Errors
    /// Returns an error if a regex is invalid or a definition targets `other`.
    pub fn from_defs(defs: &[PatternDef]) -> Result<Self, BuildError> {
        let mut entries: Vec<(Category, Vec<Regex>)> = Vec::with_capacity(defs.len());
        for def in defs {
            let rules = def.compile()?;
            match entries.iter_mut().find(|(c, _)| *c == def.category) {
                Some((_, existing)) => existing.extend(rules),
                None => entries.push((def.category, rules)),
            }
        }
        Ok(Self { entries })
    }

    /// The built-in maritime table.
    ///
    /// # Errors
    /// Returns an error if default pattern compilation fails.
    pub fn with_defaults() -> Result<Self, BuildError> {
        Self::from_defs(&default_patterns())
    }

    pub fn iter(&self) -> impl Iterator<Item = (Category, &[Regex])> {
        self.entries.iter().map(|(c, rules)| (*c, rules.as_slice()))
    }

    pub fn categories(&self) -> impl Iterator<Item = Category> + '_ {
        self.entries.iter().map(|(c, _)| *c)
    }

    #[must_use]
    pub fn rules(&self, category: Category) -> &[Regex] {
        self.entries
            .iter()
            .find(|(c, _)| *c == category)
            .map(|(_, rules)| rules.as_slice())
            .unwrap_or_default()
    }

    #[must_use]
    pub fn rule_count(&self) -> usize {
        self.entries.iter().map(|(_, rules)| rules.len()).sum()
    }
}

/// Default maritime pattern set, one definition per extractable category.
#[must_use]
pub fn default_patterns() -> Vec<PatternDef> {
    vec![
        vessel_patterns(),
        port_patterns(),
        cargo_patterns(),
        documentation_patterns(),
        safety_patterns(),
    ]
}

fn vessel_patterns() -> PatternDef {
    PatternDef {
        category: Category::Vessel,
        patterns: vec![
            r"\b(ship|vessel|boat|tanker|cargo|container|bulk carrier|ferry|yacht|tug|barge)\b"
                .to_string(),
            r"\b(bow|stern|deck|hull|bridge|anchor|propeller|rudder)\b".to_string(),
            r"\b(captain|crew|sailor|helmsman|navigator)\b".to_string(),
        ],
    }
}

fn port_patterns() -> PatternDef {
    PatternDef {
        category: Category::Port,
        patterns: vec![
            r"\b(port|harbor|terminal|berth|dock|wharf|pier|jetty|quay)\b".to_string(),
            r"\b(stevedore|longshoreman|port authority|pilot|agent)\b".to_string(),
            r"\b(loading|unloading|berthing|mooring|departure|arrival)\b".to_string(),
        ],
    }
}

fn cargo_patterns() -> PatternDef {
    PatternDef {
        category: Category::Cargo,
        patterns: vec![
            r"\b(container|bulk|break-bulk|ro-ro|liquid|cargo|freight|goods)\b".to_string(),
            r"\b(loading|discharge|stowage|lashing|securing|handling)\b".to_string(),
            r"\b(tonnage|weight|volume|measurement|package|unit)\b".to_string(),
        ],
    }
}

fn documentation_patterns() -> PatternDef {
    PatternDef {
        category: Category::Documentation,
        patterns: vec![
            r"\b(bill of lading|manifest|certificate|document|declaration)\b".to_string(),
            r"\b(customs|clearance|permit|license|inspection|survey)\b".to_string(),
            r"\b(insurance|policy|claim|coverage|liability)\b".to_string(),
        ],
    }
}

fn safety_patterns() -> PatternDef {
    PatternDef {
        category: Category::Safety,
        patterns: vec![
            r"\b(safety|security|emergency|hazard|risk|danger|accident)\b".to_string(),
            r"\b(equipment|gear|device|system|procedure|protocol)\b".to_string(),
            r"\b(inspection|audit|compliance|regulation|standard)\b".to_string(),
        ],
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    #[expect(clippy::expect_used, reason = "Test failure should panic with context")]
    fn test_default_table_builds_in_declaration_order() {
        let table = PatternTable::with_defaults().expect("default patterns should build");
        let categories: Vec<Category> = table.categories().collect();
        assert_eq!(categories, Category::EXTRACTABLE.to_vec());
        assert_eq!(table.rule_count(), 15);
        assert!(table.rules(Category::Other).is_empty());
    }

    #[test]
    #[expect(clippy::expect_used, reason = "Test failure should panic with context")]
    fn test_rules_are_case_insensitive_without_inline_flag() {
        let def = PatternDef {
            category: Category::Port,
            patterns: vec![r"\bquay\b".to_string()],
        };
        let table = PatternTable::from_defs(&[def]).expect("valid pattern should build");
        assert!(table.rules(Category::Port)[0].is_match("Along the QUAY wall"));
    }

    #[test]
    #[expect(clippy::expect_used, reason = "Test failure should panic with context")]
    fn test_word_boundaries_are_ascii() {
        let def = PatternDef {
            category: Category::Vessel,
            patterns: vec![r"\bship\b".to_string()],
        };
        let table = PatternTable::from_defs(&[def]).expect("valid pattern should build");
        let rule = &table.rules(Category::Vessel)[0];
        // A non-ASCII letter is not a word character, so the boundary holds.
        assert_eq!(rule.find("éship").map(|m| m.as_str()), Some("ship"));
        // Long s does not fold to s.
        assert!(!rule.is_match("ſhip"));
    }

    #[test]
    fn test_invalid_regex_is_rejected() {
        let def = PatternDef {
            category: Category::Cargo,
            patterns: vec![r"(unclosed".to_string()],
        };
        assert!(matches!(
            PatternTable::from_defs(&[def]),
            Err(BuildError::Regex(_))
        ));
    }

    #[test]
    fn test_other_category_is_rejected() {
        let def = PatternDef {
            category: Category::Other,
            patterns: vec![r"\bbuoy\b".to_string()],
        };
        assert!(matches!(
            PatternTable::from_defs(&[def]),
            Err(BuildError::Category(Category::Other))
        ));
    }

    #[test]
    #[expect(clippy::expect_used, reason = "Test failure should panic with context")]
    fn test_repeated_category_definitions_are_merged() {
        let defs = [
            PatternDef {
                category: Category::Safety,
                patterns: vec![r"\bdrill\b".to_string()],
            },
            PatternDef {
                category: Category::Vessel,
                patterns: vec![r"\bkeel\b".to_string()],
            },
            PatternDef {
                category: Category::Safety,
                patterns: vec![r"\blifeboat\b".to_string()],
            },
        ];
        let table = PatternTable::from_defs(&defs).expect("valid patterns should build");
        let categories: Vec<Category> = table.categories().collect();
        assert_eq!(categories, vec![Category::Safety, Category::Vessel]);
        assert_eq!(table.rules(Category::Safety).len(), 2);
    }

    #[test]
    #[expect(clippy::expect_used, reason = "Test failure should panic with context")]
    fn test_pattern_def_serialization() {
        let def = vessel_patterns();
        let json = serde_json::to_string(&def).expect("pattern should serialize");
        assert!(json.contains("\"category\":\"vessel\""));

        let deserialized: PatternDef =
            serde_json::from_str(&json).expect("valid JSON should deserialize");
        assert_eq!(deserialized.patterns, def.patterns);
    }
}
