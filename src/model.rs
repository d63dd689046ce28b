//! Timeline Data Model
//!
//! The wire shape of one acquisition: a chronologically ordered set of
//! legal-philosophy figures. Field names are fixed camelCase identifiers on
//! the wire; free-text values arrive in the configured display language.
//!
//! All fields are required. A payload missing any of them on any record is
//! rejected in full by the provider layer; there is no partial dataset.

use serde::{Deserialize, Serialize};

/// One historical thinker on the timeline
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Philosopher {
    /// Stable key within one dataset; also seeds the portrait lookup
    pub id: u32,
    /// Display name
    pub name: String,
    /// Lifespan or active period, free text (e.g. "384–322 BC")
    pub years: String,
    /// Category label (e.g. Natural Law, Legal Positivism)
    pub school_of_thought: String,
    /// One-sentence overview for the collapsed card
    pub short_summary: String,
    /// Full paragraph, shown only in the detail overlay
    pub detailed_theory: String,
    /// Representative writings, may be empty
    pub major_works: Vec<String>,
    /// Famous quotes related to law, may be empty
    pub key_quotes: Vec<String>,
}

impl Philosopher {
    /// Deterministic portrait URL, keyed off the figure id.
    ///
    /// The image service is an opaque external resource; the seed scheme
    /// just has to be stable for a given id.
    pub fn portrait_url(&self) -> String {
        format!("https://picsum.photos/seed/{}/200/200", self.id as u64 * 123)
    }
}

/// Ordered collection of figures from one successful acquisition
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Timeline {
    /// Figures in chronological order as produced by the provider.
    /// Never re-sorted or deduplicated here.
    pub philosophers: Vec<Philosopher>,
}

impl Timeline {
    /// Number of figures in the dataset
    pub fn len(&self) -> usize {
        self.philosophers.len()
    }

    /// Whether the dataset is empty (schema-valid, just nothing to show)
    pub fn is_empty(&self) -> bool {
        self.philosophers.is_empty()
    }

    /// Figure at a timeline position
    pub fn get(&self, index: usize) -> Option<&Philosopher> {
        self.philosophers.get(index)
    }
}

#[cfg(test)]
pub(crate) fn sample_figure(id: u32, name: &str) -> Philosopher {
    Philosopher {
        id,
        name: name.to_string(),
        years: "1907–1992".to_string(),
        school_of_thought: "Positivism".to_string(),
        short_summary: format!("{name} in one sentence."),
        detailed_theory: format!("{name} at length."),
        major_works: vec!["The Concept of Law".to_string()],
        key_quotes: vec!["Where there is law, there are rules.".to_string()],
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn test_deserialize_full_record() {
        let json = r#"{
            "id": 3,
            "name": "H. L. A. Hart",
            "years": "1907–1992",
            "schoolOfThought": "Legal Positivism",
            "shortSummary": "Law as a union of primary and secondary rules.",
            "detailedTheory": "Hart rebuilt positivism around social rules.",
            "majorWorks": ["The Concept of Law"],
            "keyQuotes": ["The rule of recognition exists only as a practice."]
        }"#;

        let figure: Philosopher = serde_json::from_str(json).unwrap();
        assert_eq!(figure.id, 3);
        assert_eq!(figure.name, "H. L. A. Hart");
        assert_eq!(figure.school_of_thought, "Legal Positivism");
        assert_eq!(figure.major_works.len(), 1);
        assert_eq!(figure.key_quotes.len(), 1);
    }

    #[test]
    fn test_deserialize_missing_field_fails() {
        // No shortSummary: the record must be rejected outright
        let json = r#"{
            "id": 1,
            "name": "Aristotle",
            "years": "384–322 BC",
            "schoolOfThought": "Natural Law",
            "detailedTheory": "...",
            "majorWorks": [],
            "keyQuotes": []
        }"#;

        assert!(serde_json::from_str::<Philosopher>(json).is_err());
    }

    #[test]
    fn test_empty_work_and_quote_lists_allowed() {
        let json = r#"{
            "id": 2,
            "name": "Ulpian",
            "years": "c. 170–223",
            "schoolOfThought": "Roman Law",
            "shortSummary": "Justice is the constant will to give each his due.",
            "detailedTheory": "...",
            "majorWorks": [],
            "keyQuotes": []
        }"#;

        let figure: Philosopher = serde_json::from_str(json).unwrap();
        assert!(figure.major_works.is_empty());
        assert!(figure.key_quotes.is_empty());
    }

    #[test]
    fn test_portrait_url_is_seeded_by_id() {
        let figure = sample_figure(5, "Hart");
        assert_eq!(figure.portrait_url(), "https://picsum.photos/seed/615/200/200");
    }

    #[test]
    fn test_timeline_preserves_order() {
        let timeline = Timeline {
            philosophers: vec![sample_figure(9, "Dworkin"), sample_figure(1, "Plato")],
        };
        assert_eq!(timeline.len(), 2);
        assert_eq!(timeline.get(0).unwrap().name, "Dworkin");
        assert_eq!(timeline.get(1).unwrap().name, "Plato");
    }
}
