//! Decision policy - turns raw per-type scores into a verdict
//!
//! The policy is total: any well-formed score set (including all-zero
//! and all-negative) produces a verdict. The only verdict shapes are
//! insufficient-evidence, decided-with-clarification, and
//! decided-confident, determined by two threshold comparisons.

use crate::constitution::ConstitutionType;
use crate::rules::Rulebook;
use crate::scorer::{MatchEvidence, ScoreSet};

/// Tunable constant: minimum winning score for a classification (default: 3.0)
pub const INSUFFICIENT_THRESHOLD: f64 = 3.0;

/// Tunable constant: score distance within which a runner-up is offered
/// as a secondary candidate (default: 5.0)
pub const SECONDARY_BAND: f64 = 5.0;

/// Tunable constant: smoothing term K in confidence = s / (s + K) (default: 10.0)
pub const CONFIDENCE_SMOOTHING: f64 = 10.0;

/// Tunable constant: confidence below which clarification questions are
/// attached to a decided verdict (default: 0.5)
pub const CLARIFY_THRESHOLD: f64 = 0.5;

/// Maximum number of secondary candidates
const SECONDARY_CAP: usize = 2;

/// Maximum number of clarification questions attached to a verdict
const QUESTION_CAP: usize = 10;

/// Fixed disclaimer attached to every verdict
pub const DISCLAIMER: &str = "本服务基于规则系统进行体质倾向性分析，仅供参考，不构成医疗诊断。\
不提供疾病诊断、用药建议或处方。如有健康问题，请咨询专业医生或中医师。\
本服务不对任何医疗决策负责。";

/// Configuration for the decision policy
#[derive(Debug, Clone)]
pub struct DecisionConfig {
    /// Winning scores below this produce an insufficient-evidence
    /// verdict. A score exactly at the threshold is sufficient.
    pub insufficient_threshold: f64,
    /// Runner-up categories within this distance of the winning score
    /// are offered as secondary candidates.
    pub secondary_band: f64,
    /// Smoothing term K: confidence = max_score / (max_score + K).
    pub confidence_smoothing: f64,
    /// Decided verdicts below this confidence carry clarification
    /// questions.
    pub clarify_threshold: f64,
}

impl Default for DecisionConfig {
    fn default() -> Self {
        Self {
            insufficient_threshold: INSUFFICIENT_THRESHOLD,
            secondary_band: SECONDARY_BAND,
            confidence_smoothing: CONFIDENCE_SMOOTHING,
            clarify_threshold: CLARIFY_THRESHOLD,
        }
    }
}

/// Evidence summary for one type surfaced in a decided verdict
#[derive(Debug, Clone, PartialEq)]
pub struct EvidenceSummary {
    /// The type this evidence belongs to (primary or secondary)
    pub constitution: ConstitutionType,
    /// The type's raw score
    pub raw_score: f64,
    /// Keywords that fired, with weight and polarity
    pub matched: Vec<MatchEvidence>,
}

/// The classification outcome.
///
/// A tagged variant rather than one struct with nullable fields: the
/// two shapes have genuinely different required contents. Insufficient
/// evidence is a first-class outcome, not an error.
#[derive(Debug, Clone, PartialEq)]
pub enum Verdict {
    /// No category scored high enough to classify
    Insufficient {
        /// Questions to ask before retrying; never empty
        questions: Vec<&'static str>,
    },
    /// A primary type was identified
    Decided {
        /// The winning category
        primary: ConstitutionType,
        /// Runner-up candidates, highest score first, at most two
        secondary: Vec<ConstitutionType>,
        /// Saturating normalization of the winning score, in (0, 1)
        confidence: f64,
        /// Evidence for the primary type followed by each secondary
        evidence: Vec<EvidenceSummary>,
        /// Clarification questions when confidence is low; empty otherwise
        questions: Vec<&'static str>,
    },
}

impl Verdict {
    /// The fixed disclaimer, attached to every verdict unconditionally
    pub fn disclaimer(&self) -> &'static str {
        DISCLAIMER
    }

    /// The verdict's confidence: 0 for insufficient evidence
    pub fn confidence(&self) -> f64 {
        match self {
            Verdict::Insufficient { .. } => 0.0,
            Verdict::Decided { confidence, .. } => *confidence,
        }
    }
}

/// Apply the decision policy to a score set.
///
/// Total over any well-formed score set; the rulebook is consulted only
/// for the clarification prompt banks.
pub fn decide(rulebook: &Rulebook, scores: &ScoreSet, config: &DecisionConfig) -> Verdict {
    // Winner: highest raw score, ties resolved to the earlier variant
    // in enumeration order (strict comparison keeps the first winner).
    let mut top = ConstitutionType::Balanced;
    let mut max_score = f64::NEG_INFINITY;
    for (constitution, result) in scores.iter() {
        if result.raw_score > max_score {
            max_score = result.raw_score;
            top = constitution;
        }
    }

    if max_score < config.insufficient_threshold {
        return Verdict::Insufficient {
            questions: insufficient_questions(rulebook, scores),
        };
    }

    let primary = top;

    // Secondary candidates: within the band of the winner, never with a
    // negative score (a contradicted category must not be offered even
    // when the band would reach it), at most two.
    let mut candidates: Vec<(ConstitutionType, f64)> = scores
        .iter()
        .filter(|&(constitution, result)| {
            constitution != primary
                && result.raw_score >= max_score - config.secondary_band
                && result.raw_score >= 0.0
        })
        .map(|(constitution, result)| (constitution, result.raw_score))
        .collect();
    // Stable sort: equal scores keep enumeration order.
    candidates.sort_by(|a, b| b.1.partial_cmp(&a.1).unwrap_or(std::cmp::Ordering::Equal));
    candidates.truncate(SECONDARY_CAP);
    let secondary: Vec<ConstitutionType> = candidates.into_iter().map(|(c, _)| c).collect();

    // Saturating normalization: monotonically increasing in the winning
    // score, strictly inside (0, 1) whenever the score is positive.
    let confidence = if max_score > 0.0 {
        max_score / (max_score + config.confidence_smoothing)
    } else {
        0.0
    };

    let questions = if confidence < config.clarify_threshold {
        clarify_questions(rulebook, primary, &secondary)
    } else {
        Vec::new()
    };

    let evidence = std::iter::once(primary)
        .chain(secondary.iter().copied())
        .map(|constitution| {
            let result = scores.get(constitution);
            EvidenceSummary {
                constitution,
                raw_score: result.raw_score,
                matched: result.evidence.clone(),
            }
        })
        .collect();

    Verdict::Decided {
        primary,
        secondary,
        confidence,
        evidence,
        questions,
    }
}

/// Questions for the insufficient-evidence branch: prompt banks of the
/// weakly indicated categories (positive raw score), or the generic
/// bank when nothing is indicated at all.
fn insufficient_questions(rulebook: &Rulebook, scores: &ScoreSet) -> Vec<&'static str> {
    let indicated: Vec<ConstitutionType> = scores
        .iter()
        .filter(|&(_, result)| result.raw_score > 0.0)
        .map(|(constitution, _)| constitution)
        .collect();

    if indicated.is_empty() {
        return rulebook.generic_questions();
    }

    let mut questions = Vec::new();
    for constitution in indicated {
        push_questions(&mut questions, rulebook.entry(constitution).questions());
    }
    questions
}

/// Questions for a low-confidence decided verdict: prompt banks of the
/// primary and secondary categories.
fn clarify_questions(
    rulebook: &Rulebook,
    primary: ConstitutionType,
    secondary: &[ConstitutionType],
) -> Vec<&'static str> {
    let mut questions = Vec::new();
    push_questions(&mut questions, rulebook.entry(primary).questions());
    for &constitution in secondary {
        push_questions(&mut questions, rulebook.entry(constitution).questions());
    }
    questions
}

fn push_questions(questions: &mut Vec<&'static str>, bank: &[&'static str]) {
    for &q in bank {
        if questions.len() == QUESTION_CAP {
            return;
        }
        if !questions.contains(&q) {
            questions.push(q);
        }
    }
}
