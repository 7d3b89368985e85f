//! Static, read-only catalogue data attached to placement reports.
//!
//! Nothing here is personalised by a trace: the level profile is looked up by
//! the determined level, and the tip/technique/resource lists are constant.

use serde::Serialize;

use crate::model::CefrLevel;

/// Symbolic accent for a level; hosts map it to colours or gradients.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "kebab-case")]
pub enum AccentTag {
    RedOrange,
    OrangeAmber,
    AmberYellow,
    YellowLime,
    LimeGreen,
    GreenEmerald,
}

/// Symbolic icon for a study tip; hosts map it to a glyph.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum IconTag {
    Calendar,
    Headphones,
    Pencil,
    Mic,
    Timer,
    Repeat,
    Map,
    Zap,
}

/// Descriptive data for one proficiency level.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct LevelProfile {
    pub level: CefrLevel,
    pub name: &'static str,
    pub localized_name: &'static str,
    pub description: &'static str,
    pub accent: AccentTag,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct StudyTip {
    pub title: &'static str,
    pub description: &'static str,
    pub icon: IconTag,
}

static LEVEL_PROFILES: [LevelProfile; 6] = [
    LevelProfile {
        level: CefrLevel::A1,
        name: "Beginner",
        localized_name: "مبتدئ",
        description: "يمكنك فهم واستخدام تعبيرات يومية بسيطة",
        accent: AccentTag::RedOrange,
    },
    LevelProfile {
        level: CefrLevel::A2,
        name: "Elementary",
        localized_name: "أساسي",
        description: "يمكنك التواصل في مواقف بسيطة ومتكررة",
        accent: AccentTag::OrangeAmber,
    },
    LevelProfile {
        level: CefrLevel::B1,
        name: "Intermediate",
        localized_name: "متوسط",
        description: "يمكنك التعامل مع معظم المواقف أثناء السفر",
        accent: AccentTag::AmberYellow,
    },
    LevelProfile {
        level: CefrLevel::B2,
        name: "Upper Intermediate",
        localized_name: "فوق المتوسط",
        description: "يمكنك التفاعل بطلاقة مع المتحدثين الأصليين",
        accent: AccentTag::YellowLime,
    },
    LevelProfile {
        level: CefrLevel::C1,
        name: "Advanced",
        localized_name: "متقدم",
        description: "يمكنك استخدام اللغة بمرونة وفعالية",
        accent: AccentTag::LimeGreen,
    },
    LevelProfile {
        level: CefrLevel::C2,
        name: "Proficient",
        localized_name: "متمكن",
        description: "يمكنك فهم كل ما تسمعه أو تقرأه بسهولة",
        accent: AccentTag::GreenEmerald,
    },
];

static STUDY_TIPS: [StudyTip; 4] = [
    StudyTip {
        title: "المراجعة اليومية",
        description: "خصص 15-30 دقيقة يومياً لمراجعة القواعد والمفردات الجديدة",
        icon: IconTag::Calendar,
    },
    StudyTip {
        title: "الاستماع النشط",
        description: "استمع للبودكاست والأفلام بالإنجليزية مع الترجمة",
        icon: IconTag::Headphones,
    },
    StudyTip {
        title: "الكتابة اليومية",
        description: "اكتب يومياً 3-5 جمل عن يومك لتحسين مهارات الكتابة",
        icon: IconTag::Pencil,
    },
    StudyTip {
        title: "التحدث بصوت عالٍ",
        description: "تدرب على نطق الجمل بصوت عالٍ لتحسين النطق",
        icon: IconTag::Mic,
    },
];

static STUDY_TECHNIQUES: [StudyTip; 4] = [
    StudyTip {
        title: "تقنية بومودورو",
        description: "ادرس 25 دقيقة ثم استرح 5 دقائق. كرر 4 مرات ثم خذ استراحة طويلة 15-30 دقيقة",
        icon: IconTag::Timer,
    },
    StudyTip {
        title: "التكرار المتباعد",
        description: "راجع المعلومات على فترات متزايدة: بعد يوم، ثم 3 أيام، ثم أسبوع، ثم شهر",
        icon: IconTag::Repeat,
    },
    StudyTip {
        title: "الخرائط الذهنية",
        description: "ارسم خرائط ذهنية لربط الكلمات والقواعد ببعضها البعض",
        icon: IconTag::Map,
    },
    StudyTip {
        title: "التعلم النشط",
        description: "لا تقرأ فقط، بل حاول تطبيق ما تعلمته في جمل ومحادثات",
        icon: IconTag::Zap,
    },
];

static RESOURCES: [&str; 4] = [
    "تطبيق Duolingo للتدريب اليومي",
    "قناة BBC Learning English على يوتيوب",
    "موقع British Council للدروس المجانية",
    "تطبيق Anki للبطاقات التعليمية",
];

/// Profile for `level`.
#[must_use]
pub fn level_profile(level: CefrLevel) -> &'static LevelProfile {
    &LEVEL_PROFILES[level.index()]
}

#[must_use]
pub fn study_tips() -> &'static [StudyTip] {
    &STUDY_TIPS
}

#[must_use]
pub fn study_techniques() -> &'static [StudyTip] {
    &STUDY_TECHNIQUES
}

#[must_use]
pub fn resources() -> &'static [&'static str] {
    &RESOURCES
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn profiles_are_indexed_by_level() {
        for level in CefrLevel::ALL {
            assert_eq!(level_profile(level).level, level);
        }
        assert_eq!(level_profile(CefrLevel::B2).name, "Upper Intermediate");
    }

    #[test]
    fn catalogues_have_four_entries_each() {
        assert_eq!(study_tips().len(), 4);
        assert_eq!(study_techniques().len(), 4);
        assert_eq!(resources().len(), 4);
    }

    #[test]
    fn tags_serialize_symbolically() {
        let json = serde_json::to_string(&level_profile(CefrLevel::A1).accent).unwrap();
        assert_eq!(json, "\"red-orange\"");
        let json = serde_json::to_string(&study_techniques()[0].icon).unwrap();
        assert_eq!(json, "\"timer\"");
    }
}
