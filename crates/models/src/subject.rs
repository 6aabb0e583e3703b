use serde::Serialize;
use strum::{AsRefStr, EnumIter, EnumProperty, EnumString, IntoEnumIterator};

/// Exam family a subject code belongs to
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, EnumIter, AsRefStr, EnumProperty)]
pub enum SubjectGroup {
    #[strum(serialize = "TGAT", props(name = "TGAT ความถนัดทั่วไป"))]
    Tgat,
    #[strum(serialize = "TPAT", props(name = "TPAT ความถนัดวิชาชีพ"))]
    Tpat,
    #[strum(serialize = "ALEVEL", props(name = "A-Level ความรู้เชิงวิชาการ"))]
    ALevel,
}

impl SubjectGroup {
    pub fn name(&self) -> &'static str {
        self.get_str("name").unwrap_or_default()
    }
}

/// Known exam subject codes a reviewer can report a score for.
///
/// Stored scores are an open map keyed by code, so codes outside this list
/// still round-trip; this list only drives what the form offers.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, EnumString, EnumIter, AsRefStr, EnumProperty,
)]
pub enum Subject {
    #[strum(serialize = "TGAT1", props(label = "TGAT1 การสื่อสารภาษาอังกฤษ"))]
    Tgat1,
    #[strum(serialize = "TGAT2", props(label = "TGAT2 การคิดวิเคราะห์"))]
    Tgat2,
    #[strum(serialize = "TGAT3", props(label = "TGAT3 สมรรถนะการทำงาน"))]
    Tgat3,
    #[strum(serialize = "TPAT1", props(label = "TPAT1 ความถนัดแพทย์ (กสพท.)"))]
    Tpat1,
    #[strum(serialize = "TPAT2", props(label = "TPAT2 ความถนัดศิลปกรรมศาสตร์"))]
    Tpat2,
    #[strum(serialize = "TPAT3", props(label = "TPAT3 วิทย์-เทคโนโลยี-วิศวะ"))]
    Tpat3,
    #[strum(serialize = "TPAT4", props(label = "TPAT4 ความถนัดสถาปัตยกรรม"))]
    Tpat4,
    #[strum(serialize = "TPAT5", props(label = "TPAT5 ครุศาสตร์-ศึกษาศาสตร์"))]
    Tpat5,
    #[strum(serialize = "A_Math1", props(label = "คณิตศาสตร์ประยุกต์ 1"))]
    AMath1,
    #[strum(serialize = "A_Math2", props(label = "คณิตศาสตร์ประยุกต์ 2"))]
    AMath2,
    #[strum(serialize = "A_Sci", props(label = "วิทยาศาสตร์ประยุกต์"))]
    ASci,
    #[strum(serialize = "A_Phy", props(label = "ฟิสิกส์"))]
    APhy,
    #[strum(serialize = "A_Chem", props(label = "เคมี"))]
    AChem,
    #[strum(serialize = "A_Bio", props(label = "ชีววิทยา"))]
    ABio,
    #[strum(serialize = "A_Thai", props(label = "ภาษาไทย"))]
    AThai,
    #[strum(serialize = "A_Eng", props(label = "ภาษาอังกฤษ"))]
    AEng,
    #[strum(serialize = "A_Soc", props(label = "สังคมศึกษา"))]
    ASoc,
    #[strum(serialize = "A_FR", props(label = "ภาษาฝรั่งเศส"))]
    AFr,
    #[strum(serialize = "A_DE", props(label = "ภาษาเยอรมัน"))]
    ADe,
    #[strum(serialize = "A_ZH", props(label = "ภาษาจีน"))]
    AZh,
    #[strum(serialize = "A_JA", props(label = "ภาษาญี่ปุ่น"))]
    AJa,
    #[strum(serialize = "A_KO", props(label = "ภาษาเกาหลี"))]
    AKo,
    #[strum(serialize = "A_PA", props(label = "ภาษาบาลี"))]
    APa,
}

impl Subject {
    pub fn code(&self) -> &str {
        self.as_ref()
    }

    pub fn label(&self) -> &'static str {
        self.get_str("label").unwrap_or_default()
    }

    pub fn group(&self) -> SubjectGroup {
        match self {
            Self::Tgat1 | Self::Tgat2 | Self::Tgat3 => SubjectGroup::Tgat,
            Self::Tpat1 | Self::Tpat2 | Self::Tpat3 | Self::Tpat4 | Self::Tpat5 => {
                SubjectGroup::Tpat
            }
            _ => SubjectGroup::ALevel,
        }
    }

    pub fn all() -> Vec<Subject> {
        Subject::iter().collect()
    }

    /// Looks up a display label for any stored code, falling back to the code itself
    pub fn label_for(code: &str) -> String {
        code.parse::<Subject>()
            .map(|subject| subject.label().to_string())
            .unwrap_or_else(|_| code.to_string())
    }
}

#[cfg(test)]
mod test {
    use super::*;
    use std::str::FromStr;

    #[test]
    fn test_subject_codes() {
        assert_eq!(Subject::from_str("A_Math1"), Ok(Subject::AMath1));
        assert_eq!(Subject::AMath1.code(), "A_Math1");
        assert_eq!(Subject::Tpat3.group(), SubjectGroup::Tpat);
        assert_eq!(Subject::APa.group(), SubjectGroup::ALevel);
        assert_eq!(Subject::all().len(), 23);
    }

    #[test]
    fn test_label_for_unknown_code() {
        assert_eq!(Subject::label_for("A_Phy"), "ฟิสิกส์");
        assert_eq!(Subject::label_for("O-NET"), "O-NET");
    }

    #[test]
    fn test_group_names() {
        assert_eq!(SubjectGroup::Tgat.name(), "TGAT ความถนัดทั่วไป");
        assert_eq!(SubjectGroup::ALevel.as_ref(), "ALEVEL");
    }
}
