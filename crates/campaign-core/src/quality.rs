//! Keyword-based quality label for a generated analysis.
//!
//! Each keyword group contributes its weight at most once, so adding positive
//! wording to a text never lowers its label.

use serde::{Deserialize, Serialize};

/// Budget above which the score is boosted.
pub const HIGH_BUDGET: u32 = 20_000;
/// Budget below which the score is reduced.
pub const LOW_BUDGET: u32 = 5_000;

/// Score at or above which a text is `Excellent`.
pub const EXCELLENT_CUTOFF: f64 = 5.0;
/// Score at or above which a text is `Good`.
pub const GOOD_CUTOFF: f64 = 3.0;

const ROI_ADJECTIVES: &[&str] = &["élevé", "fort", "important", "supérieur", "excellent"];
const CPA_ADJECTIVES: &[&str] = &["faible", "bas", "réduit", "optimisé"];
const EXCEPTIONAL_WORDS: &[&str] = &["exceptionnel", "exceptionnelle", "excellent", "remarquable"];
const EFFICIENCY_WORDS: &[&str] = &["efficace", "performant", "rentable"];

/// Coarse quality label.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum QualityLabel {
    Normal,
    Good,
    Excellent,
}

impl QualityLabel {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Normal => "normal",
            Self::Good => "good",
            Self::Excellent => "excellent",
        }
    }

    /// Label from an adjusted score; cutoffs are inclusive.
    pub fn from_score(score: f64) -> Self {
        if score >= EXCELLENT_CUTOFF {
            Self::Excellent
        } else if score >= GOOD_CUTOFF {
            Self::Good
        } else {
            Self::Normal
        }
    }

    /// Headline shown on the celebration banner.
    pub fn headline(&self) -> &'static str {
        match self {
            Self::Excellent => "Analyse Exceptionnelle!",
            Self::Good => "Résultats Impressionnants!",
            Self::Normal => "Analyse Terminée!",
        }
    }

    /// Badge appended to history entries.
    pub fn badge(&self) -> &'static str {
        match self {
            Self::Excellent => "🏆",
            Self::Good => "⭐",
            Self::Normal => "",
        }
    }
}

impl std::fmt::Display for QualityLabel {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Detailed scoring, kept for logging.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct QualityScore {
    pub positive_indicators: u32,
    pub budget_factor: f64,
    pub adjusted: f64,
    pub label: QualityLabel,
}

/// Multiplier applied for the budget tier.
pub fn budget_factor(budget: u32) -> f64 {
    if budget > HIGH_BUDGET {
        1.2
    } else if budget < LOW_BUDGET {
        0.8
    } else {
        1.0
    }
}

/// Sum of weights of the keyword groups present in `text`.
pub fn positive_indicators(text: &str) -> u32 {
    let lower = text.to_lowercase();
    let any = |words: &[&str]| words.iter().any(|w| lower.contains(w));

    let mut score = 0;
    if lower.contains("roi") && any(ROI_ADJECTIVES) {
        score += 2;
    }
    if lower.contains("cpa") && any(CPA_ADJECTIVES) {
        score += 2;
    }
    if any(EXCEPTIONAL_WORDS) {
        score += 3;
    }
    if any(EFFICIENCY_WORDS) {
        score += 2;
    }
    score
}

/// Score a generated analysis against its budget.
pub fn score(text: &str, budget: u32) -> QualityScore {
    let positive_indicators = positive_indicators(text);
    let budget_factor = budget_factor(budget);
    let adjusted = f64::from(positive_indicators) * budget_factor;
    QualityScore {
        positive_indicators,
        budget_factor,
        adjusted,
        label: QualityLabel::from_score(adjusted),
    }
}

/// Quality label for a generated analysis.
pub fn evaluate(text: &str, budget: u32) -> QualityLabel {
    score(text, budget).label
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_roi_and_cpa_keywords_score_good() {
        let text = "### Analyse Prédictive\n- ROI élevé attendu\n- CPA optimisé sur Meta";
        let s = score(text, 15_000);
        assert_eq!(s.positive_indicators, 4);
        assert_eq!(s.budget_factor, 1.0);
        assert_eq!(s.label, QualityLabel::Good);
    }

    #[test]
    fn test_no_keywords_is_normal() {
        assert_eq!(evaluate("Une campagne standard.", 15_000), QualityLabel::Normal);
    }

    #[test]
    fn test_adjective_without_metric_does_not_count() {
        assert_eq!(positive_indicators("Un potentiel élevé et un coût faible"), 0);
    }

    #[test]
    fn test_matching_is_case_insensitive() {
        assert_eq!(positive_indicators("UN ROI ÉLEVÉ"), 2);
    }

    #[test]
    fn test_cutoffs_are_inclusive() {
        assert_eq!(QualityLabel::from_score(5.0), QualityLabel::Excellent);
        assert_eq!(QualityLabel::from_score(4.99), QualityLabel::Good);
        assert_eq!(QualityLabel::from_score(3.0), QualityLabel::Good);
        assert_eq!(QualityLabel::from_score(2.99), QualityLabel::Normal);
    }

    #[test]
    fn test_exceptional_word_alone_reaches_good_cutoff() {
        // 3 points at the neutral tier lands exactly on the cutoff.
        assert_eq!(evaluate("Un résultat remarquable.", 10_000), QualityLabel::Good);
    }

    #[test]
    fn test_budget_tiers() {
        assert_eq!(budget_factor(20_000), 1.0);
        assert_eq!(budget_factor(20_001), 1.2);
        assert_eq!(budget_factor(5_000), 1.0);
        assert_eq!(budget_factor(4_999), 0.8);

        let text = "ROI fort et CPA bas";
        assert_eq!(evaluate(text, 15_000), QualityLabel::Good);
        // 4 * 1.2 = 4.8, still below the excellent cutoff
        assert_eq!(evaluate(text, 30_000), QualityLabel::Good);
        // 4 * 0.8 = 3.2
        assert_eq!(evaluate(text, 2_000), QualityLabel::Good);
        // 2 * 0.8 = 1.6
        assert_eq!(evaluate("ROI fort", 2_000), QualityLabel::Normal);
    }

    #[test]
    fn test_more_keywords_never_lower_the_label() {
        let fragments = [
            "Le ROI sera élevé.",
            "Un CPA réduit.",
            "Une stratégie efficace.",
            "Un lancement exceptionnel.",
        ];
        for budget in [2_000, 15_000, 40_000] {
            let mut text = String::from("Analyse.");
            let mut previous = evaluate(&text, budget);
            for fragment in fragments {
                text.push(' ');
                text.push_str(fragment);
                let current = evaluate(&text, budget);
                assert!(current >= previous, "{} dropped at budget {}", text, budget);
                previous = current;
            }
            assert_eq!(previous, QualityLabel::Excellent);
        }
    }
}
