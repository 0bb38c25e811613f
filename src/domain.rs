//! Sector labels and the keyword-based domain classifier.

use serde::{Deserialize, Serialize};

/// The sector a report is filed under.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, clap::ValueEnum)]
#[serde(rename_all = "lowercase")]
pub enum Sector {
    Education,
    Health,
    Environment,
    /// No keyword matched. Only produced by the classifier.
    #[value(skip)]
    Unknown,
}

impl Sector {
    pub fn as_str(&self) -> &'static str {
        match self {
            Sector::Education => "education",
            Sector::Health => "health",
            Sector::Environment => "environment",
            Sector::Unknown => "unknown",
        }
    }
}

impl std::fmt::Display for Sector {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// Keyword lists, checked in this order.
static SECTOR_KEYWORDS: &[(Sector, &[&str])] = &[
    (
        Sector::Education,
        &["student", "teacher", "school", "classroom", "learning"],
    ),
    (
        Sector::Health,
        &["patient", "hospital", "doctor", "vaccine", "disease"],
    ),
    (
        Sector::Environment,
        &["climate", "tree", "pollution", "water", "recycle"],
    ),
];

/// Guess the sector of a source unit from keyword substrings.
///
/// The first sector with any keyword present wins; there is no scoring.
pub fn classify(text: &str) -> Sector {
    let lowered = text.to_lowercase();
    SECTOR_KEYWORDS
        .iter()
        .find(|(_, words)| words.iter().any(|w| lowered.contains(w)))
        .map(|(sector, _)| *sector)
        .unwrap_or(Sector::Unknown)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_classify() {
        assert_eq!(classify("grades = load_student_grades()"), Sector::Education);
        assert_eq!(classify("PATIENT_RECORDS = []"), Sector::Health);
        assert_eq!(classify("def recycle(): pass"), Sector::Environment);
        assert_eq!(classify("x = 1"), Sector::Unknown);
    }

    #[test]
    fn test_first_matching_sector_wins() {
        // Mentions both a hospital and a school.
        assert_eq!(classify("hospital school"), Sector::Education);
    }

    #[test]
    fn test_substring_match() {
        // "street" contains "tree".
        assert_eq!(classify("street = 'Main'"), Sector::Environment);
    }

    #[test]
    fn test_parse_sector() {
        let sector: Sector = serde_json::from_str("\"health\"").unwrap();
        assert_eq!(sector, Sector::Health);
        assert!(serde_json::from_str::<Sector>("\"finance\"").is_err());
        assert_eq!(Sector::Environment.to_string(), "environment");
    }
}
