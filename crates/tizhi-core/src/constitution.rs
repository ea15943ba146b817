//! Constitution type module - the nine classification categories
//!
//! The category set is closed and the enumeration order is load-bearing:
//! score ties resolve to the earlier variant, so `ALL` must never be
//! reordered.

/// One of the nine constitution categories.
///
/// Based on the nine-category constitutional classification scheme.
/// The variant order matches the rulebook table order and is the fixed
/// tie-break order for the decision policy.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ConstitutionType {
    /// 平和质 - balanced, the baseline healthy tendency
    Balanced,

    /// 气虚质 - qi deficiency (fatigue, shortness of breath)
    QiDeficiency,

    /// 阳虚质 - yang deficiency (cold intolerance, cold extremities)
    YangDeficiency,

    /// 阴虚质 - yin deficiency (dry mouth, night sweats)
    YinDeficiency,

    /// 痰湿质 - phlegm-dampness (heaviness, greasy tongue coating)
    PhlegmDampness,

    /// 湿热质 - damp-heat (bitter taste, acne, yellow coating)
    DampHeat,

    /// 血瘀质 - blood stasis (fixed pain, dark complexion)
    BloodStasis,

    /// 气郁质 - qi stagnation (low mood, sighing, chest oppression)
    QiStagnation,

    /// 特禀质 - special/allergic (intrinsic allergic tendency)
    Special,
}

impl ConstitutionType {
    /// All nine types in fixed enumeration order.
    pub const ALL: [ConstitutionType; 9] = [
        ConstitutionType::Balanced,
        ConstitutionType::QiDeficiency,
        ConstitutionType::YangDeficiency,
        ConstitutionType::YinDeficiency,
        ConstitutionType::PhlegmDampness,
        ConstitutionType::DampHeat,
        ConstitutionType::BloodStasis,
        ConstitutionType::QiStagnation,
        ConstitutionType::Special,
    ];

    /// Get the type name as a stable lowercase identifier
    pub fn as_str(&self) -> &'static str {
        match self {
            ConstitutionType::Balanced => "balanced",
            ConstitutionType::QiDeficiency => "qi-deficiency",
            ConstitutionType::YangDeficiency => "yang-deficiency",
            ConstitutionType::YinDeficiency => "yin-deficiency",
            ConstitutionType::PhlegmDampness => "phlegm-dampness",
            ConstitutionType::DampHeat => "damp-heat",
            ConstitutionType::BloodStasis => "blood-stasis",
            ConstitutionType::QiStagnation => "qi-stagnation",
            ConstitutionType::Special => "special",
        }
    }

    /// Get the Chinese display label used in API responses
    pub fn label(&self) -> &'static str {
        match self {
            ConstitutionType::Balanced => "平和质",
            ConstitutionType::QiDeficiency => "气虚质",
            ConstitutionType::YangDeficiency => "阳虚质",
            ConstitutionType::YinDeficiency => "阴虚质",
            ConstitutionType::PhlegmDampness => "痰湿质",
            ConstitutionType::DampHeat => "湿热质",
            ConstitutionType::BloodStasis => "血瘀质",
            ConstitutionType::QiStagnation => "气郁质",
            ConstitutionType::Special => "特禀质",
        }
    }

    /// Parse a type from its lowercase identifier
    pub fn parse(s: &str) -> Option<Self> {
        match s {
            "balanced" => Some(ConstitutionType::Balanced),
            "qi-deficiency" => Some(ConstitutionType::QiDeficiency),
            "yang-deficiency" => Some(ConstitutionType::YangDeficiency),
            "yin-deficiency" => Some(ConstitutionType::YinDeficiency),
            "phlegm-dampness" => Some(ConstitutionType::PhlegmDampness),
            "damp-heat" => Some(ConstitutionType::DampHeat),
            "blood-stasis" => Some(ConstitutionType::BloodStasis),
            "qi-stagnation" => Some(ConstitutionType::QiStagnation),
            "special" => Some(ConstitutionType::Special),
            _ => None,
        }
    }

    /// Position of this type in the fixed enumeration order
    pub fn index(&self) -> usize {
        match self {
            ConstitutionType::Balanced => 0,
            ConstitutionType::QiDeficiency => 1,
            ConstitutionType::YangDeficiency => 2,
            ConstitutionType::YinDeficiency => 3,
            ConstitutionType::PhlegmDampness => 4,
            ConstitutionType::DampHeat => 5,
            ConstitutionType::BloodStasis => 6,
            ConstitutionType::QiStagnation => 7,
            ConstitutionType::Special => 8,
        }
    }
}

impl std::str::FromStr for ConstitutionType {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::parse(s).ok_or_else(|| format!("Invalid constitution type: {}", s))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_all_covers_every_variant_once() {
        for (i, t) in ConstitutionType::ALL.iter().enumerate() {
            assert_eq!(t.index(), i);
        }
        assert_eq!(ConstitutionType::ALL.len(), 9);
    }

    #[test]
    fn test_enumeration_order() {
        assert_eq!(ConstitutionType::ALL[0], ConstitutionType::Balanced);
        assert_eq!(ConstitutionType::ALL[2], ConstitutionType::YangDeficiency);
        assert_eq!(ConstitutionType::ALL[8], ConstitutionType::Special);
    }

    #[test]
    fn test_parse_round_trip() {
        for t in ConstitutionType::ALL {
            assert_eq!(ConstitutionType::parse(t.as_str()), Some(t));
        }
        assert_eq!(ConstitutionType::parse("unknown"), None);
    }

    #[test]
    fn test_labels() {
        assert_eq!(ConstitutionType::Balanced.label(), "平和质");
        assert_eq!(ConstitutionType::YangDeficiency.label(), "阳虚质");
        assert_eq!(ConstitutionType::Special.label(), "特禀质");
    }
}
