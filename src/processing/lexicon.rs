//! Synonym and weight tables used by the requirement evaluator
//!
//! Both tables are keyed by stems, so a requirement word and every form
//! listed for it go through [`stem`] before they are compared.

use crate::processing::tokenizer::stem;
use once_cell::sync::Lazy;
use std::collections::{HashMap, HashSet};

/// Canonical word and the surface forms accepted as evidence for it.
const SYNONYM_ENTRIES: &[(&str, &[&str])] = &[
    ("maintain", &["maintain", "update", "improve", "keep"]),
    (
        "documentation",
        &["documentation", "documents", "records", "manual", "procedure", "procedures", "instructions", "docs"],
    ),
    (
        "audit",
        &["audit", "auditing", "audits", "review", "reviews", "compliance", "monitoring", "monitor"],
    ),
    ("compliance", &["compliance", "conformance", "conformity", "conform"]),
    ("calibration", &["calibration", "calibrated", "calibrating", "calibrate"]),
    ("proficiency", &["proficiency", "competence", "competency"]),
    ("quality", &["quality", "qms"]),
    ("management", &["management", "manage", "managing", "managed"]),
    ("training", &["training", "train", "trained", "coaching", "learning"]),
    ("performance", &["performance", "kpi", "analysis", "monitoring"]),
    ("customer", &["customer", "client", "stakeholder"]),
    ("nonconformity", &["nonconformity", "deviation", "noncompliance"]),
    ("feedback", &["feedback", "survey", "comments"]),
    ("report", &["report", "reporting"]),
    ("investigation", &["investigation", "investigate", "analysis", "analyzing"]),
    ("competency", &["competency", "competence", "competences"]),
    (
        "communication",
        &["communication", "communicator", "communicate", "communicating", "communicated", "communications"],
    ),
];

/// Domain terms whose presence doubles a requirement word's weight.
const CRITICAL_WORDS: &[&str] = &[
    "iso", "17025", "9001", "audit", "auditing", "compliance", "quality", "calibration",
    "proficiency", "testing", "management", "review", "analysis",
];

/// Mapping from a canonical stem to the stems of its accepted forms.
#[derive(Debug)]
pub struct SynonymTable {
    entries: HashMap<String, Vec<String>>,
}

impl SynonymTable {
    fn build(entries: &[(&str, &[&str])]) -> Self {
        let entries = entries
            .iter()
            .map(|(canonical, forms)| {
                let stems = forms.iter().map(|form| stem(form)).collect();
                (stem(canonical), stems)
            })
            .collect();
        Self { entries }
    }

    /// Stems accepted for `stem`, in table order. Unknown stems only accept themselves.
    pub fn forms_of<'a>(&'a self, stem: &'a str) -> Vec<&'a str> {
        match self.entries.get(stem) {
            Some(forms) => forms.iter().map(String::as_str).collect(),
            None => vec![stem],
        }
    }

    pub fn contains_key(&self, stem: &str) -> bool {
        self.entries.contains_key(stem)
    }

    pub fn keys(&self) -> impl Iterator<Item = &str> {
        self.entries.keys().map(String::as_str)
    }
}

/// Set of stems that carry double weight.
#[derive(Debug)]
pub struct CriticalTokenSet {
    stems: HashSet<String>,
}

impl CriticalTokenSet {
    fn build(words: &[&str]) -> Self {
        Self {
            stems: words.iter().map(|w| stem(w)).collect(),
        }
    }

    pub fn contains(&self, stem: &str) -> bool {
        self.stems.contains(stem)
    }

    /// Scoring weight of a requirement stem.
    pub fn weight(&self, stem: &str) -> u32 {
        if self.contains(stem) {
            2
        } else {
            1
        }
    }
}

/// Process-wide scoring vocabulary.
#[derive(Debug)]
pub struct Lexicon {
    pub synonyms: SynonymTable,
    pub critical: CriticalTokenSet,
}

static LEXICON: Lazy<Lexicon> = Lazy::new(|| Lexicon {
    synonyms: SynonymTable::build(SYNONYM_ENTRIES),
    critical: CriticalTokenSet::build(CRITICAL_WORDS),
});

impl Lexicon {
    pub fn global() -> &'static Lexicon {
        &LEXICON
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_every_canonical_word_reaches_its_entry() {
        let lexicon = Lexicon::global();
        for (canonical, _) in SYNONYM_ENTRIES {
            assert!(
                lexicon.synonyms.contains_key(&stem(canonical)),
                "{} is unreachable after stemming",
                canonical
            );
        }
    }

    #[test]
    fn test_canonical_word_is_its_own_synonym() {
        let lexicon = Lexicon::global();
        for key in lexicon.synonyms.keys() {
            assert!(lexicon.synonyms.forms_of(key).contains(&key), "{} missing itself", key);
        }
    }

    #[test]
    fn test_training_forms_share_a_stem() {
        let lexicon = Lexicon::global();
        // "training" and "trained" both stem to "train"
        assert_eq!(stem("training"), "train");
        assert_eq!(stem("trained"), "train");
        let forms = lexicon.synonyms.forms_of("train");
        assert!(forms.contains(&"coach"));
        assert!(forms.contains(&"learn"));
    }

    #[test]
    fn test_every_key_reaches_its_own_entry() {
        let synonyms = &Lexicon::global().synonyms;
        for key in synonyms.keys() {
            assert_eq!(stem(key), key, "key {} is not a fixed point of stem", key);
            assert!(synonyms.forms_of(key).contains(&key), "{} does not accept itself", key);
        }
    }

    #[test]
    fn test_unknown_stem_maps_to_itself() {
        let lexicon = Lexicon::global();
        assert_eq!(lexicon.synonyms.forms_of("kubernet"), vec!["kubernet"]);
    }

    #[test]
    fn test_communication_accepts_communicator() {
        let lexicon = Lexicon::global();
        let key = stem("communication");
        let forms = lexicon.synonyms.forms_of(&key);
        assert!(forms.contains(&"communicator"));
    }

    #[test]
    fn test_critical_weights_use_stems() {
        let critical = &Lexicon::global().critical;
        assert_eq!(critical.weight("iso"), 2);
        assert_eq!(critical.weight(&stem("auditing")), 2);
        assert_eq!(critical.weight(&stem("testing")), 2);
        assert_eq!(critical.weight(&stem("analysis")), 2);
        assert_eq!(critical.weight("documentation"), 1);
    }
}
