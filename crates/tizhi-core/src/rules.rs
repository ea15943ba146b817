//! Rule database - keyword/weight tables for the nine constitution types
//!
//! One `RuleEntry` per type: ordered positive keywords (evidence for),
//! ordered negative keywords (evidence against), and the clarification
//! prompts to ask when that type is weakly indicated. The table is
//! data-only; nothing in the scorer or decision policy references
//! individual keywords by name.
//!
//! The rulebook is built once at process startup and shared read-only.
//! Construction validates every entry and panics on malformed data -
//! a bad table is a build defect, not a per-request condition.

use crate::constitution::ConstitutionType;

/// Rule record for one constitution type.
///
/// Keyword order is preserved: the scorer walks the table in order and
/// evidence is reported in discovery order. Negative weights are stored
/// as positive magnitudes and subtracted at scoring time.
#[derive(Debug, Clone)]
pub struct RuleEntry {
    positive: Vec<(&'static str, f64)>,
    negative: Vec<(&'static str, f64)>,
    questions: &'static [&'static str],
}

impl RuleEntry {
    fn new(
        positive: Vec<(&'static str, f64)>,
        negative: Vec<(&'static str, f64)>,
        questions: &'static [&'static str],
    ) -> Self {
        Self {
            positive,
            negative,
            questions,
        }
    }

    /// Positive keyword/weight pairs in table order
    pub fn positive_keywords(&self) -> &[(&'static str, f64)] {
        &self.positive
    }

    /// Negative keyword/weight pairs in table order (weights are
    /// positive magnitudes, subtracted by the scorer)
    pub fn negative_keywords(&self) -> &[(&'static str, f64)] {
        &self.negative
    }

    /// Clarification prompts for this type
    pub fn questions(&self) -> &'static [&'static str] {
        self.questions
    }

    /// Validate table invariants. Panics on malformed data.
    fn validate(&self, constitution: ConstitutionType) {
        for &(keyword, weight) in self.positive.iter().chain(self.negative.iter()) {
            assert!(
                !keyword.is_empty(),
                "{}: empty keyword in rule table",
                constitution.as_str()
            );
            assert!(
                weight.is_finite() && weight >= 0.0,
                "{}: keyword '{}' has invalid weight {}",
                constitution.as_str(),
                keyword,
                weight
            );
        }
        for &(keyword, _) in &self.positive {
            assert!(
                !self.negative.iter().any(|&(neg, _)| neg == keyword),
                "{}: keyword '{}' appears as both positive and negative",
                constitution.as_str(),
                keyword
            );
        }
        assert!(
            !self.questions.is_empty(),
            "{}: empty clarification prompt bank",
            constitution.as_str()
        );
    }
}

/// Maximum number of clarification questions returned from the generic bank
const GENERIC_QUESTION_CAP: usize = 10;

/// The complete rule database: exactly one entry per constitution type.
#[derive(Debug, Clone)]
pub struct Rulebook {
    entries: [RuleEntry; 9],
}

impl Rulebook {
    /// Build and validate the full rule table.
    ///
    /// # Panics
    /// Panics if any entry is malformed (empty keyword, non-finite or
    /// negative weight, keyword listed as both positive and negative,
    /// empty prompt bank). Intended to run once at process startup.
    pub fn new() -> Self {
        let entries = [
            balanced(),
            qi_deficiency(),
            yang_deficiency(),
            yin_deficiency(),
            phlegm_dampness(),
            damp_heat(),
            blood_stasis(),
            qi_stagnation(),
            special(),
        ];

        for (entry, constitution) in entries.iter().zip(ConstitutionType::ALL) {
            entry.validate(constitution);
        }

        Self { entries }
    }

    /// Get the rule entry for a constitution type
    pub fn entry(&self, constitution: ConstitutionType) -> &RuleEntry {
        &self.entries[constitution.index()]
    }

    /// Generic clarification prompt bank.
    ///
    /// Per-type prompts concatenated in enumeration order, deduplicated
    /// keeping the first occurrence, capped at 10. Deterministic: the
    /// same questions in the same order on every call.
    pub fn generic_questions(&self) -> Vec<&'static str> {
        let mut questions = Vec::new();
        for constitution in ConstitutionType::ALL {
            for &q in self.entry(constitution).questions() {
                if !questions.contains(&q) {
                    questions.push(q);
                    if questions.len() == GENERIC_QUESTION_CAP {
                        return questions;
                    }
                }
            }
        }
        questions
    }
}

impl Default for Rulebook {
    fn default() -> Self {
        Self::new()
    }
}

fn balanced() -> RuleEntry {
    RuleEntry::new(
        vec![
            ("精力充沛", 3.0),
            ("精神好", 3.0),
            ("体力好", 3.0),
            ("不易疲劳", 3.0),
            ("睡眠好", 3.0),
            ("睡眠安稳", 3.0),
            ("入睡快", 2.0),
            ("睡眠质量好", 3.0),
            ("二便正常", 3.0),
            ("大便正常", 3.0),
            ("小便正常", 2.0),
            ("排便规律", 2.0),
            ("舌淡红", 2.0),
            ("苔薄白", 2.0),
            ("舌苔正常", 2.0),
            ("情绪稳定", 2.0),
            ("心情好", 2.0),
            ("不易生气", 2.0),
            ("食欲好", 2.0),
            ("消化好", 2.0),
            ("不易感冒", 2.0),
            ("抵抗力好", 2.0),
        ],
        vec![
            ("乏力", 2.0),
            ("疲劳", 2.0),
            ("怕冷", 2.0),
            ("怕热", 2.0),
            ("失眠", 2.0),
            ("便秘", 2.0),
            ("腹泻", 2.0),
            ("易感冒", 2.0),
        ],
        &["是否容易疲劳？", "睡眠质量如何？", "二便是否正常？"],
    )
}

fn qi_deficiency() -> RuleEntry {
    RuleEntry::new(
        vec![
            ("容易疲劳", 4.0),
            ("乏力", 4.0),
            ("没力气", 4.0),
            ("疲倦", 3.0),
            ("累", 3.0),
            ("气短", 4.0),
            ("懒言", 3.0),
            ("不想说话", 3.0),
            ("说话声音低", 2.0),
            ("自汗", 3.0),
            ("容易出汗", 3.0),
            ("动则汗出", 3.0),
            ("出汗多", 2.0),
            ("易感冒", 4.0),
            ("经常感冒", 3.0),
            ("抵抗力差", 3.0),
            ("免疫力低", 2.0),
            ("食欲不振", 2.0),
            ("不想吃饭", 2.0),
            ("腹胀", 2.0),
            ("舌淡", 2.0),
            ("舌边有齿痕", 2.0),
            ("苔白", 1.0),
            ("面色苍白", 2.0),
            ("面色萎黄", 2.0),
        ],
        vec![
            ("精力充沛", 3.0),
            ("体力好", 3.0),
            ("不易疲劳", 3.0),
            ("怕热", 2.0),
            ("五心烦热", 2.0),
            ("盗汗", 2.0),
        ],
        &[
            "是否容易疲劳？",
            "是否容易出汗？",
            "是否容易感冒？",
            "说话声音如何？",
        ],
    )
}

fn yang_deficiency() -> RuleEntry {
    RuleEntry::new(
        vec![
            ("怕冷", 5.0),
            ("畏寒", 5.0),
            ("手脚冷", 4.0),
            ("手脚冰凉", 4.0),
            ("四肢不温", 3.0),
            ("喜热饮", 4.0),
            ("喜欢热饮", 3.0),
            ("喝热水", 3.0),
            ("不敢吃凉的", 3.0),
            ("精神不振", 3.0),
            ("精神萎靡", 3.0),
            ("嗜睡", 2.0),
            ("便溏", 3.0),
            ("大便不成形", 3.0),
            ("腹泻", 2.0),
            ("拉肚子", 2.0),
            ("腰膝酸软", 3.0),
            ("腰酸", 2.0),
            ("腿软", 2.0),
            ("面色苍白", 2.0),
            ("舌淡", 2.0),
            ("苔白", 2.0),
            ("舌胖大", 2.0),
            ("夜尿多", 2.0),
            ("小便清长", 2.0),
            ("性欲减退", 1.0),
            ("月经推迟", 1.0),
        ],
        vec![
            ("怕热", 4.0),
            ("五心烦热", 4.0),
            ("盗汗", 4.0),
            ("口干", 2.0),
            ("喜冷饮", 3.0),
            ("便秘", 2.0),
            ("大便干", 2.0),
        ],
        &[
            "是否怕冷？",
            "手脚是否冰凉？",
            "是否喜欢热饮？",
            "大便情况如何？",
        ],
    )
}

fn yin_deficiency() -> RuleEntry {
    RuleEntry::new(
        vec![
            ("口干", 4.0),
            ("咽燥", 4.0),
            ("口燥咽干", 4.0),
            ("口渴", 3.0),
            ("想喝水", 2.0),
            ("五心烦热", 4.0),
            ("手心热", 3.0),
            ("脚心热", 3.0),
            ("手足心热", 3.0),
            ("盗汗", 4.0),
            ("夜间出汗", 3.0),
            ("睡觉出汗", 3.0),
            ("便干", 3.0),
            ("便秘", 3.0),
            ("大便干结", 3.0),
            ("大便困难", 2.0),
            ("失眠", 3.0),
            ("入睡困难", 2.0),
            ("多梦", 2.0),
            ("舌红", 3.0),
            ("少苔", 3.0),
            ("无苔", 2.0),
            ("苔少", 2.0),
            ("皮肤干燥", 2.0),
            ("眼干", 2.0),
            ("眼涩", 2.0),
            ("易怒", 2.0),
            ("烦躁", 2.0),
            ("脾气大", 2.0),
        ],
        vec![
            ("怕冷", 4.0),
            ("畏寒", 4.0),
            ("手脚冷", 4.0),
            ("便溏", 3.0),
            ("腹泻", 3.0),
            ("舌淡", 2.0),
            ("苔白厚", 2.0),
        ],
        &[
            "是否口干？",
            "是否怕热？",
            "夜间是否出汗？",
            "大便是否干燥？",
        ],
    )
}

fn phlegm_dampness() -> RuleEntry {
    RuleEntry::new(
        vec![
            ("体胖", 4.0),
            ("肥胖", 4.0),
            ("超重", 3.0),
            ("体重超标", 3.0),
            ("困重", 3.0),
            ("身体困重", 3.0),
            ("沉重感", 2.0),
            ("乏力", 2.0),
            ("痰多", 4.0),
            ("有痰", 3.0),
            ("咳痰", 3.0),
            ("痰多黏腻", 3.0),
            ("胸闷", 3.0),
            ("胸脘痞闷", 3.0),
            ("胸口闷", 2.0),
            ("苔腻", 4.0),
            ("苔厚腻", 4.0),
            ("舌苔厚", 3.0),
            ("苔白腻", 3.0),
            ("口黏", 3.0),
            ("口中黏腻", 3.0),
            ("口甜", 2.0),
            ("大便黏", 3.0),
            ("大便不成形", 2.0),
            ("便溏", 2.0),
            ("嗜睡", 2.0),
            ("爱睡觉", 2.0),
            ("容易困", 2.0),
            ("腹部肥满", 2.0),
            ("肚子大", 2.0),
        ],
        vec![
            ("消瘦", 3.0),
            ("体瘦", 3.0),
            ("体重轻", 2.0),
            ("口干", 2.0),
            ("便干", 2.0),
            ("便秘", 2.0),
        ],
        &[
            "体型如何？",
            "是否有痰？",
            "舌苔是否厚腻？",
            "是否感觉身体困重？",
        ],
    )
}

fn damp_heat() -> RuleEntry {
    RuleEntry::new(
        vec![
            ("口苦", 4.0),
            ("口黏", 3.0),
            ("口中黏腻", 3.0),
            ("口臭", 2.0),
            ("痤疮", 4.0),
            ("长痘", 3.0),
            ("痘痘", 3.0),
            ("粉刺", 2.0),
            ("尿黄", 3.0),
            ("小便黄", 3.0),
            ("尿赤", 2.0),
            ("苔黄腻", 4.0),
            ("舌苔黄腻", 4.0),
            ("苔黄", 3.0),
            ("身热", 3.0),
            ("身体发热", 2.0),
            ("烦躁", 2.0),
            ("大便黏腻", 3.0),
            ("大便不爽", 2.0),
            ("肛门灼热", 2.0),
            ("白带多", 2.0),
            ("白带黄", 2.0),
            ("带下多", 1.0),
            ("面垢", 2.0),
            ("面色发黄", 2.0),
            ("油光满面", 2.0),
        ],
        vec![
            ("怕冷", 3.0),
            ("畏寒", 3.0),
            ("手脚冷", 3.0),
            ("便溏", 2.0),
            ("舌淡", 2.0),
            ("苔白", 2.0),
        ],
        &[
            "是否有口苦？",
            "是否长痤疮？",
            "舌苔是否黄腻？",
            "小便颜色如何？",
        ],
    )
}

fn blood_stasis() -> RuleEntry {
    RuleEntry::new(
        vec![
            ("刺痛", 4.0),
            ("固定痛", 3.0),
            ("疼痛固定", 3.0),
            ("色斑", 4.0),
            ("长斑", 3.0),
            ("黄褐斑", 2.0),
            ("老年斑", 1.0),
            ("唇暗", 3.0),
            ("嘴唇暗", 3.0),
            ("唇色暗", 2.0),
            ("舌紫暗", 4.0),
            ("舌有瘀点", 4.0),
            ("舌有瘀斑", 3.0),
            ("舌下静脉曲张", 3.0),
            ("肌肤甲错", 3.0),
            ("皮肤粗糙", 2.0),
            ("皮肤干燥", 2.0),
            ("健忘", 2.0),
            ("记忆力差", 2.0),
            ("痛经", 2.0),
            ("月经有血块", 2.0),
            ("经色暗", 2.0),
            ("易烦躁", 2.0),
            ("易怒", 1.0),
        ],
        vec![
            ("面色红润", 2.0),
            ("唇色红润", 2.0),
            ("舌淡红", 2.0),
        ],
        &[
            "是否有色斑？",
            "唇色如何？",
            "是否有固定疼痛？",
            "舌质颜色如何？",
        ],
    )
}

fn qi_stagnation() -> RuleEntry {
    RuleEntry::new(
        vec![
            ("情绪抑郁", 4.0),
            ("抑郁", 4.0),
            ("心情不好", 3.0),
            ("情绪低落", 3.0),
            ("易叹气", 4.0),
            ("爱叹气", 3.0),
            ("经常叹气", 3.0),
            ("胸胁胀", 3.0),
            ("胸胁胀痛", 3.0),
            ("两胁胀痛", 3.0),
            ("胸闷", 2.0),
            ("咽中异物感", 3.0),
            ("梅核气", 3.0),
            ("喉咙有东西", 2.0),
            ("咽部不适", 2.0),
            ("失眠", 3.0),
            ("入睡困难", 2.0),
            ("多梦", 2.0),
            ("易紧张", 2.0),
            ("焦虑", 2.0),
            ("担心", 2.0),
            ("思虑多", 2.0),
            ("食欲不振", 2.0),
            ("不想吃饭", 2.0),
            ("月经不调", 2.0),
            ("痛经", 1.0),
        ],
        vec![
            ("情绪稳定", 3.0),
            ("心情好", 3.0),
            ("开朗", 2.0),
        ],
        &[
            "情绪如何？",
            "是否容易叹气？",
            "是否有胸闷？",
            "睡眠如何？",
        ],
    )
}

fn special() -> RuleEntry {
    RuleEntry::new(
        vec![
            ("过敏", 5.0),
            ("过敏体质", 5.0),
            ("容易过敏", 4.0),
            ("鼻炎", 4.0),
            ("过敏性鼻炎", 4.0),
            ("鼻塞", 2.0),
            ("打喷嚏", 2.0),
            ("荨麻疹", 4.0),
            ("风疹", 3.0),
            ("皮肤过敏", 3.0),
            ("湿疹", 2.0),
            ("对气味敏感", 3.0),
            ("闻不得味", 2.0),
            ("气味过敏", 2.0),
            ("对食物敏感", 3.0),
            ("食物过敏", 3.0),
            ("不能吃某些食物", 2.0),
            ("哮喘", 3.0),
            ("过敏性哮喘", 3.0),
            ("遗传", 2.0),
            ("家族史", 2.0),
            ("父母过敏", 1.0),
        ],
        vec![
            ("不过敏", 3.0),
            ("无过敏史", 3.0),
        ],
        &[
            "是否有过敏史？",
            "是否有鼻炎或荨麻疹？",
            "对什么过敏？",
        ],
    )
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_every_type_has_an_entry() {
        let rulebook = Rulebook::new();
        for constitution in ConstitutionType::ALL {
            let entry = rulebook.entry(constitution);
            assert!(
                !entry.positive_keywords().is_empty(),
                "{} has no positive keywords",
                constitution.as_str()
            );
            assert!(!entry.questions().is_empty());
        }
    }

    #[test]
    fn test_weights_are_finite_and_positive() {
        let rulebook = Rulebook::new();
        for constitution in ConstitutionType::ALL {
            let entry = rulebook.entry(constitution);
            for &(_, w) in entry
                .positive_keywords()
                .iter()
                .chain(entry.negative_keywords())
            {
                assert!(w.is_finite());
                assert!(w > 0.0);
            }
        }
    }

    #[test]
    fn test_no_positive_negative_overlap_within_entry() {
        let rulebook = Rulebook::new();
        for constitution in ConstitutionType::ALL {
            let entry = rulebook.entry(constitution);
            for &(keyword, _) in entry.positive_keywords() {
                assert!(
                    !entry
                        .negative_keywords()
                        .iter()
                        .any(|&(neg, _)| neg == keyword),
                    "{}: '{}' listed both ways",
                    constitution.as_str(),
                    keyword
                );
            }
        }
    }

    #[test]
    fn test_known_weights() {
        let rulebook = Rulebook::new();
        let yang = rulebook.entry(ConstitutionType::YangDeficiency);
        assert!(yang.positive_keywords().contains(&("怕冷", 5.0)));
        assert!(yang.positive_keywords().contains(&("手脚冰凉", 4.0)));
        assert!(yang.negative_keywords().contains(&("怕热", 4.0)));
    }

    #[test]
    fn test_generic_questions_deterministic_and_capped() {
        let rulebook = Rulebook::new();
        let first = rulebook.generic_questions();
        let second = rulebook.generic_questions();
        assert_eq!(first, second);
        assert!(!first.is_empty());
        assert!(first.len() <= 10);

        // No duplicates
        for (i, q) in first.iter().enumerate() {
            assert!(!first[i + 1..].contains(q));
        }
    }

    #[test]
    fn test_generic_questions_start_in_enumeration_order() {
        let rulebook = Rulebook::new();
        let questions = rulebook.generic_questions();
        // Balanced is first in enumeration order, so its first prompt leads
        assert_eq!(questions[0], "是否容易疲劳？");
    }
}
