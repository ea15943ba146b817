//! Scorer - substring evidence accumulation over the rule table
//!
//! Matching is literal substring containment: no normalization, no
//! tokenization, no word-boundary check. A keyword contributes at most
//! once no matter how often it occurs (presence test, not count).

use crate::constitution::ConstitutionType;
use crate::rules::Rulebook;

/// Whether a matched keyword counts for or against a category
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Polarity {
    /// Keyword supports the category; weight is added
    Positive,
    /// Keyword contradicts the category; weight is subtracted
    Negative,
}

impl Polarity {
    /// Get the polarity as a string
    pub fn as_str(&self) -> &'static str {
        match self {
            Polarity::Positive => "positive",
            Polarity::Negative => "negative",
        }
    }
}

/// One keyword that fired for a category during scoring
#[derive(Debug, Clone, PartialEq)]
pub struct MatchEvidence {
    /// The configured keyword found in the input text
    pub keyword: &'static str,
    /// Its configured weight (positive magnitude for both polarities)
    pub weight: f64,
    /// Whether the weight was added or subtracted
    pub polarity: Polarity,
}

/// Raw score and evidence for one category
#[derive(Debug, Clone, PartialEq)]
pub struct ScoreResult {
    /// Sum of matched positive weights minus matched negative weights.
    /// May be zero or negative (net counter-evidence).
    pub raw_score: f64,
    /// Matched keywords in discovery order: positives in table order,
    /// then negatives in table order.
    pub evidence: Vec<MatchEvidence>,
}

impl ScoreResult {
    fn empty() -> Self {
        Self {
            raw_score: 0.0,
            evidence: Vec::new(),
        }
    }
}

/// Per-category score results, one per constitution type.
///
/// Fixed shape: every type always has a result. Iteration follows the
/// enumeration order.
#[derive(Debug, Clone, PartialEq)]
pub struct ScoreSet {
    results: [ScoreResult; 9],
}

impl ScoreSet {
    /// Get the result for one constitution type
    pub fn get(&self, constitution: ConstitutionType) -> &ScoreResult {
        &self.results[constitution.index()]
    }

    /// Iterate results in enumeration order
    pub fn iter(&self) -> impl Iterator<Item = (ConstitutionType, &ScoreResult)> {
        ConstitutionType::ALL
            .iter()
            .map(move |&constitution| (constitution, self.get(constitution)))
    }

    #[cfg(test)]
    pub(crate) fn from_raw_scores(raw_scores: [f64; 9]) -> Self {
        Self {
            results: raw_scores.map(|raw_score| ScoreResult {
                raw_score,
                evidence: Vec::new(),
            }),
        }
    }
}

/// Score a symptom description against every constitution type.
///
/// Pure function of the rulebook and the text: no clock, no randomness,
/// no side effects. Identical input always yields an identical result,
/// and any text (including the empty string) produces a well-formed
/// score set.
pub fn score(rulebook: &Rulebook, text: &str) -> ScoreSet {
    let mut results: [ScoreResult; 9] = std::array::from_fn(|_| ScoreResult::empty());

    for constitution in ConstitutionType::ALL {
        let entry = rulebook.entry(constitution);
        let result = &mut results[constitution.index()];

        for &(keyword, weight) in entry.positive_keywords() {
            if text.contains(keyword) {
                result.raw_score += weight;
                result.evidence.push(MatchEvidence {
                    keyword,
                    weight,
                    polarity: Polarity::Positive,
                });
            }
        }

        for &(keyword, weight) in entry.negative_keywords() {
            if text.contains(keyword) {
                result.raw_score -= weight;
                result.evidence.push(MatchEvidence {
                    keyword,
                    weight,
                    polarity: Polarity::Negative,
                });
            }
        }
    }

    ScoreSet { results }
}
