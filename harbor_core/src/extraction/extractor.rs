use serde::ser::SerializeMap;
use serde::{Deserialize, Serialize, Serializer};
use std::sync::Arc;

use super::patterns::PatternTable;
use crate::keyword::Category;

/// How many substrings a single rule may contribute per evaluation.
#[derive(Debug, Clone, Copy, Default, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub enum MatchMode {
    /// Leftmost match only.
    #[default]
    First,
    /// Every non-overlapping match.
    All,
}

impl std::str::FromStr for MatchMode {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "first" => Ok(Self::First),
            "all" => Ok(Self::All),
            _ => Err(format!("unknown match mode: {s}")),
        }
    }
}

/// Distinct lowercase terms per category, in table order.
///
/// Categories without a match are never present.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ExtractedKeywords {
    entries: Vec<(Category, Vec<String>)>,
}

impl ExtractedKeywords {
    #[must_use]
    pub fn get(&self, category: Category) -> Option<&[String]> {
        self.entries
            .iter()
            .find(|(c, _)| *c == category)
            .map(|(_, terms)| terms.as_slice())
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    #[must_use]
    pub fn term_count(&self) -> usize {
        self.entries.iter().map(|(_, terms)| terms.len()).sum()
    }

    pub fn categories(&self) -> impl Iterator<Item = Category> + '_ {
        self.entries.iter().map(|(c, _)| *c)
    }

    pub fn iter(&self) -> impl Iterator<Item = (Category, &[String])> {
        self.entries.iter().map(|(c, terms)| (*c, terms.as_slice()))
    }

    /// Flattened `(category, term)` pairs in output order.
    #[must_use]
    pub fn pairs(&self) -> Vec<(Category, String)> {
        self.entries
            .iter()
            .flat_map(|(c, terms)| terms.iter().map(move |t| (*c, t.clone())))
            .collect()
    }
}

impl Serialize for ExtractedKeywords {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let mut map = serializer.serialize_map(Some(self.entries.len()))?;
        for (category, terms) in &self.entries {
            map.serialize_entry(category.as_str(), terms)?;
        }
        map.end()
    }
}

/// Applies a shared [`PatternTable`] to free text.
#[derive(Debug, Clone)]
pub struct Extractor {
    table: Arc<PatternTable>,
    mode: MatchMode,
}

impl Extractor {
    #[must_use]
    pub const fn new(table: Arc<PatternTable>, mode: MatchMode) -> Self {
        Self { table, mode }
    }

    #[must_use]
    pub fn table(&self) -> &PatternTable {
        &self.table
    }

    /// Evaluate every rule of every category once against `text`.
    #[must_use]
    pub fn extract(&self, text: &str) -> ExtractedKeywords {
        let mut entries = Vec::new();

        for (category, rules) in self.table.iter() {
            let mut terms: Vec<String> = Vec::new();
            for rule in rules {
                match self.mode {
                    MatchMode::First => {
                        if let Some(m) = rule.find(text) {
                            push_distinct(&mut terms, m.as_str());
                        }
                    }
                    MatchMode::All => {
                        for m in rule.find_iter(text) {
                            push_distinct(&mut terms, m.as_str());
                        }
                    }
                }
            }
            if !terms.is_empty() {
                entries.push((category, terms));
            }
        }

        ExtractedKeywords { entries }
    }
}

fn push_distinct(terms: &mut Vec<String>, matched: &str) {
    let term = matched.to_lowercase();
    if !terms.contains(&term) {
        terms.push(term);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::extraction::patterns::PatternDef;

    const SCENARIO: &str = "The cargo vessel departed the port terminal safely";

    #[expect(clippy::expect_used, reason = "Test failure should panic with context")]
    fn extractor(mode: MatchMode) -> Extractor {
        let table = PatternTable::with_defaults().expect("default patterns should build");
        Extractor::new(Arc::new(table), mode)
    }

    fn terms(found: &ExtractedKeywords, category: Category) -> Vec<&str> {
        found
            .get(category)
            .map(|t| t.iter().map(String::as_str).collect())
            .unwrap_or_default()
    }

    #[test]
    fn test_scenario_first_match_per_rule() {
        let found = extractor(MatchMode::First).extract(SCENARIO);

        // "cargo" precedes "vessel" in the text and both sit in the first vessel rule.
        assert_eq!(terms(&found, Category::Vessel), vec!["cargo"]);
        assert_eq!(terms(&found, Category::Port), vec!["port"]);
        assert_eq!(terms(&found, Category::Cargo), vec!["cargo"]);
        assert!(found.get(Category::Safety).is_none());
        assert!(found.get(Category::Documentation).is_none());
    }

    #[test]
    fn test_scenario_all_matches() {
        let found = extractor(MatchMode::All).extract(SCENARIO);

        let vessel = terms(&found, Category::Vessel);
        assert!(vessel.contains(&"vessel"));
        assert!(vessel.contains(&"cargo"));
        let port = terms(&found, Category::Port);
        assert!(port.contains(&"port"));
        assert!(port.contains(&"terminal"));
        assert_eq!(terms(&found, Category::Cargo), vec!["cargo"]);
        // "safely" is not "safety".
        assert!(found.get(Category::Safety).is_none());
    }

    #[test]
    fn test_no_empty_categories() {
        let found = extractor(MatchMode::All).extract("Nothing nautical here at all.");
        assert!(found.is_empty());
        assert_eq!(found.term_count(), 0);

        let found = extractor(MatchMode::All).extract("Customs clearance pending");
        assert!(found.iter().all(|(_, terms)| !terms.is_empty()));
        assert_eq!(
            found.categories().collect::<Vec<_>>(),
            vec![Category::Documentation]
        );
    }

    #[test]
    fn test_extract_is_deterministic() {
        let extractor = extractor(MatchMode::All);
        let text =
            "Captain inspected the HULL, the bill of lading and the safety gear at the quay.";
        let first = extractor.extract(text);
        for _ in 0..5 {
            assert_eq!(extractor.extract(text), first);
        }
    }

    #[test]
    fn test_every_term_matches_a_rule_of_its_category() {
        let extractor = extractor(MatchMode::All);
        let text = "Ferry CREW loading freight; customs INSPECTION found a hazard near the Pier.";
        let found = extractor.extract(text);
        let lowered = text.to_lowercase();

        for (category, terms) in found.iter() {
            for term in terms {
                assert!(lowered.contains(term.as_str()), "{term} not in input");
                assert!(
                    extractor
                        .table()
                        .rules(category)
                        .iter()
                        .any(|rule| rule.is_match(term)),
                    "{term} matches no {category} rule"
                );
            }
        }
    }

    #[test]
    fn test_terms_are_lowercased_and_deduplicated() {
        let found = extractor(MatchMode::All).extract("SHIP ship Ship");
        assert_eq!(terms(&found, Category::Vessel), vec!["ship"]);
    }

    #[test]
    fn test_non_ascii_letters_do_not_join_or_fold_terms() {
        let extractor = extractor(MatchMode::First);

        assert_eq!(terms(&extractor.extract("éship"), Category::Vessel), vec!["ship"]);
        assert!(extractor.extract("ſhip").get(Category::Vessel).is_none());

        let found = extractor.extract("the ſafety gear");
        assert_eq!(terms(&found, Category::Safety), vec!["gear"]);
    }

    #[test]
    fn test_first_mode_takes_one_term_per_rule() {
        let found = extractor(MatchMode::First).extract("tug, barge and ferry");
        assert_eq!(terms(&found, Category::Vessel), vec!["tug"]);
    }

    #[test]
    fn test_term_shared_by_two_categories_appears_in_both() {
        let found = extractor(MatchMode::First).extract("Loading started.");
        assert_eq!(terms(&found, Category::Port), vec!["loading"]);
        assert_eq!(terms(&found, Category::Cargo), vec!["loading"]);
        assert_eq!(
            found.pairs(),
            vec![
                (Category::Port, "loading".to_string()),
                (Category::Cargo, "loading".to_string()),
            ]
        );
    }

    #[test]
    fn test_multi_word_terms() {
        let found =
            extractor(MatchMode::First).extract("Issue the Bill of Lading to the Port Authority");
        assert_eq!(terms(&found, Category::Documentation), vec!["bill of lading"]);
        // First port rule hits "port" inside "Port Authority" before the second rule runs.
        assert_eq!(terms(&found, Category::Port), vec!["port", "port authority"]);
    }

    #[test]
    #[expect(clippy::expect_used, reason = "Test failure should panic with context")]
    fn test_serializes_in_table_order() {
        let found = extractor(MatchMode::First).extract("safety first on the ship");
        let json = serde_json::to_string(&found).expect("extraction should serialize");
        assert_eq!(json, r#"{"vessel":["ship"],"safety":["safety"]}"#);
    }

    #[test]
    #[expect(clippy::expect_used, reason = "Test failure should panic with context")]
    fn test_custom_table() {
        let table = PatternTable::from_defs(&[PatternDef {
            category: Category::Safety,
            patterns: vec![r"\blife ?jackets?\b".to_string()],
        }])
        .expect("valid pattern should build");
        let extractor = Extractor::new(Arc::new(table), MatchMode::All);
        let found = extractor.extract("Two Life Jackets and one lifejacket");
        assert_eq!(terms(&found, Category::Safety), vec!["life jackets", "lifejacket"]);
    }

    #[test]
    fn test_match_mode_parses() {
        assert_eq!("first".parse::<MatchMode>(), Ok(MatchMode::First));
        assert_eq!("all".parse::<MatchMode>(), Ok(MatchMode::All));
        assert!("some".parse::<MatchMode>().is_err());
    }
}
