//! Static lifestyle/diet/escalation text bank keyed by primary type.
//!
//! Pure lookup data owned by the boundary. The classification engine
//! never consults it; the server attaches the entry for the verdict's
//! primary type to the response.

use tizhi_core::ConstitutionType;

/// Recommendation texts for one constitution type
#[derive(Debug, Clone, Copy)]
pub struct Recommendation {
    /// Daily-routine and exercise suggestions
    pub lifestyle: &'static [&'static str],
    /// Dietary suggestions
    pub diet: &'static [&'static str],
    /// When to escalate to a professional
    pub when_to_seek_help: &'static [&'static str],
}

/// Fallback shown on the insufficient-evidence path
pub const INSUFFICIENT_EVIDENCE: Recommendation = Recommendation {
    lifestyle: &[],
    diet: &[],
    when_to_seek_help: &["请补充更多症状信息后重新判定"],
};

/// Look up the recommendation bank entry for a constitution type
pub fn for_constitution(constitution: ConstitutionType) -> Recommendation {
    match constitution {
        ConstitutionType::Balanced => Recommendation {
            lifestyle: &[
                "保持规律作息，早睡早起",
                "适度运动，如散步、慢跑、太极拳",
                "保持心情愉悦，避免过度劳累",
            ],
            diet: &[
                "饮食均衡，不偏食",
                "可适量食用各类食物，保持营养平衡",
                "避免暴饮暴食",
            ],
            when_to_seek_help: &["如出现明显不适症状，建议咨询专业中医师"],
        },
        ConstitutionType::QiDeficiency => Recommendation {
            lifestyle: &[
                "避免过度劳累，注意休息",
                "适度运动，以不感到疲劳为宜，如散步、太极拳",
                "保证充足睡眠，避免熬夜",
            ],
            diet: &[
                "可适当食用补气食物，如山药、大枣、小米等",
                "避免生冷、寒凉食物",
                "饮食规律，少食多餐",
            ],
            when_to_seek_help: &["如疲劳感持续加重，建议咨询专业中医师"],
        },
        ConstitutionType::YangDeficiency => Recommendation {
            lifestyle: &[
                "注意保暖，尤其是腹部和足部",
                "适度运动，以温和运动为主，如慢跑、太极拳",
                "多晒太阳，避免长时间待在寒冷环境",
            ],
            diet: &[
                "可适当食用温阳食物，如羊肉、生姜、桂圆等",
                "避免生冷、寒凉食物和冷饮",
                "饮食宜温热",
            ],
            when_to_seek_help: &["如畏寒症状明显，建议咨询专业中医师"],
        },
        ConstitutionType::YinDeficiency => Recommendation {
            lifestyle: &[
                "避免熬夜，保证充足睡眠",
                "适度运动，避免剧烈运动，可选择瑜伽、散步",
                "保持心情平静，避免急躁",
            ],
            diet: &[
                "可适当食用滋阴食物，如银耳、百合、梨等",
                "避免辛辣、燥热食物",
                "多喝水，饮食宜清淡",
            ],
            when_to_seek_help: &["如口干、失眠等症状明显，建议咨询专业中医师"],
        },
        ConstitutionType::PhlegmDampness => Recommendation {
            lifestyle: &[
                "适度运动，以有氧运动为主，如快走、游泳",
                "避免久坐，多活动",
                "保证充足睡眠，但避免过度嗜睡",
            ],
            diet: &[
                "饮食清淡，可适当食用健脾祛湿食物，如薏米、冬瓜、白萝卜等",
                "避免油腻、甜腻、生冷食物",
                "控制食量，避免暴饮暴食",
            ],
            when_to_seek_help: &["如体重持续增加或痰多症状明显，建议咨询专业中医师"],
        },
        ConstitutionType::DampHeat => Recommendation {
            lifestyle: &[
                "适度运动，以出汗为宜，如慢跑、游泳",
                "保持居住环境干燥通风",
                "避免熬夜，保证充足睡眠",
            ],
            diet: &[
                "饮食清淡，可适当食用清热祛湿食物，如绿豆、苦瓜、冬瓜等",
                "避免辛辣、油腻、甜腻食物",
                "少饮酒，多喝水",
            ],
            when_to_seek_help: &["如痤疮、口苦等症状明显，建议咨询专业中医师"],
        },
        ConstitutionType::BloodStasis => Recommendation {
            lifestyle: &[
                "适度运动，促进血液循环，如慢跑、太极拳、瑜伽",
                "保持心情愉悦，避免长期抑郁",
                "保证充足睡眠",
            ],
            diet: &[
                "可适当食用活血化瘀食物，如山楂、黑豆、玫瑰花茶等",
                "避免生冷、寒凉食物",
                "饮食宜温热",
            ],
            when_to_seek_help: &["如疼痛、色斑等症状明显，建议咨询专业中医师"],
        },
        ConstitutionType::QiStagnation => Recommendation {
            lifestyle: &[
                "保持心情愉悦，多与朋友交流",
                "适度运动，如散步、瑜伽、听音乐",
                "培养兴趣爱好，转移注意力",
                "保证充足睡眠",
            ],
            diet: &[
                "可适当食用理气食物，如柑橘、玫瑰花茶、薄荷等",
                "避免过度饮酒和刺激性食物",
                "饮食规律",
            ],
            when_to_seek_help: &["如情绪持续低落或出现明显抑郁症状，建议咨询专业心理医生或中医师"],
        },
        ConstitutionType::Special => Recommendation {
            lifestyle: &[
                "避免接触已知的过敏原",
                "保持居住环境清洁，避免尘螨、花粉等",
                "适度运动，增强体质，但避免在过敏季节户外运动",
                "保证充足睡眠",
            ],
            diet: &[
                "避免食用已知的过敏食物",
                "饮食清淡，可适当食用抗过敏食物，如红枣、蜂蜜等",
                "注意观察食物反应",
            ],
            when_to_seek_help: &[
                "如出现严重过敏反应，应立即就医",
                "建议咨询专业医生进行过敏原检测",
            ],
        },
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_every_type_has_full_entry() {
        for constitution in ConstitutionType::ALL {
            let rec = for_constitution(constitution);
            assert!(!rec.lifestyle.is_empty(), "{}", constitution.as_str());
            assert!(!rec.diet.is_empty(), "{}", constitution.as_str());
            assert!(
                !rec.when_to_seek_help.is_empty(),
                "{}",
                constitution.as_str()
            );
        }
    }

    #[test]
    fn test_insufficient_fallback() {
        assert!(INSUFFICIENT_EVIDENCE.lifestyle.is_empty());
        assert!(INSUFFICIENT_EVIDENCE.diet.is_empty());
        assert_eq!(INSUFFICIENT_EVIDENCE.when_to_seek_help.len(), 1);
    }
}
