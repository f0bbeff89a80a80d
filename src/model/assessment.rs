use std::{fmt, str::FromStr};

use serde::{Deserialize, Serialize};

use super::UnknownLabel;

/// Which of the three test versions a battery belongs to.
#[derive(Serialize, Deserialize, Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum VersionType {
    Diagnostic,
    Formative,
    Summative,
}

impl VersionType {
    pub const ALL: [VersionType; 3] = [
        VersionType::Diagnostic,
        VersionType::Formative,
        VersionType::Summative,
    ];

    /// Purpose text used when a test version is first scaffolded.
    pub fn default_purpose(self) -> &'static str {
        match self {
            VersionType::Diagnostic => "Assess entry-level knowledge",
            VersionType::Formative => "Check-on-learning during module",
            VersionType::Summative => "Final proficiency validation",
        }
    }

    pub fn as_str(self) -> &'static str {
        match self {
            VersionType::Diagnostic => "Diagnostic",
            VersionType::Formative => "Formative",
            VersionType::Summative => "Summative",
        }
    }
}

impl fmt::Display for VersionType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for VersionType {
    type Err = UnknownLabel;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        VersionType::ALL
            .into_iter()
            .find(|v| v.as_str().eq_ignore_ascii_case(s.trim()))
            .ok_or_else(|| UnknownLabel::new("test version", s))
    }
}

#[derive(Serialize, Deserialize, Debug, Clone, Copy, PartialEq, Eq)]
pub enum TestItemType {
    #[serde(rename = "Multiple Choice")]
    MultipleChoice,
    #[serde(rename = "Complex Multiple Choice")]
    ComplexMultipleChoice,
    #[serde(rename = "Short Answer Essay")]
    ShortAnswerEssay,
    #[serde(rename = "True/False")]
    TrueFalse,
    #[serde(rename = "Fill in the Blank")]
    FillInTheBlank,
}

impl TestItemType {
    const ALL: [TestItemType; 5] = [
        TestItemType::MultipleChoice,
        TestItemType::ComplexMultipleChoice,
        TestItemType::ShortAnswerEssay,
        TestItemType::TrueFalse,
        TestItemType::FillInTheBlank,
    ];

    pub fn as_str(self) -> &'static str {
        match self {
            TestItemType::MultipleChoice => "Multiple Choice",
            TestItemType::ComplexMultipleChoice => "Complex Multiple Choice",
            TestItemType::ShortAnswerEssay => "Short Answer Essay",
            TestItemType::TrueFalse => "True/False",
            TestItemType::FillInTheBlank => "Fill in the Blank",
        }
    }

    /// Choice items are answered by picking from a lettered option list.
    pub fn is_choice(self) -> bool {
        matches!(
            self,
            TestItemType::MultipleChoice
                | TestItemType::ComplexMultipleChoice
                | TestItemType::TrueFalse
        )
    }

    pub fn takes_rubric(self) -> bool {
        matches!(self, TestItemType::ShortAnswerEssay)
    }
}

impl fmt::Display for TestItemType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for TestItemType {
    type Err = UnknownLabel;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let wanted = s.trim();
        TestItemType::ALL
            .into_iter()
            .find(|t| t.as_str().eq_ignore_ascii_case(wanted))
            .or(match wanted.to_ascii_lowercase().as_str() {
                "true-false" | "true false" => Some(TestItemType::TrueFalse),
                "fill-in-blank" | "fill in blank" | "fill-in-the-blank" => {
                    Some(TestItemType::FillInTheBlank)
                }
                _ => None,
            })
            .ok_or_else(|| UnknownLabel::new("test item type", s))
    }
}

/// Bloom's taxonomy tier of a test item, K1 (recall) to K4 (analysis).
#[derive(Serialize, Deserialize, Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Default)]
pub enum BloomLevel {
    #[default]
    K1,
    K2,
    K3,
    K4,
}

impl BloomLevel {
    pub fn as_str(self) -> &'static str {
        match self {
            BloomLevel::K1 => "K1",
            BloomLevel::K2 => "K2",
            BloomLevel::K3 => "K3",
            BloomLevel::K4 => "K4",
        }
    }

    pub fn describe(self) -> &'static str {
        match self {
            BloomLevel::K1 => "Knowledge",
            BloomLevel::K2 => "Comprehension",
            BloomLevel::K3 => "Application",
            BloomLevel::K4 => "Analysis",
        }
    }
}

impl fmt::Display for BloomLevel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for BloomLevel {
    type Err = UnknownLabel;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_uppercase().as_str() {
            "K1" => Ok(BloomLevel::K1),
            "K2" => Ok(BloomLevel::K2),
            "K3" => Ok(BloomLevel::K3),
            "K4" => Ok(BloomLevel::K4),
            _ => Err(UnknownLabel::new("bloom level", s)),
        }
    }
}

#[derive(Serialize, Deserialize, Debug, Clone, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct TestItem {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub id: Option<String>,
    #[serde(rename = "type")]
    pub item_type: TestItemType,
    pub question: String,
    /// Lettered choices; only present on choice items.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub options: Option<Vec<String>>,
    pub answer: String,
    /// Grading rubric; only present on essay items.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub rubric: Option<String>,
    pub bloom_level: BloomLevel,
}

#[derive(Serialize, Deserialize, Debug, Clone, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct TestVersion {
    pub version_type: VersionType,
    pub purpose: String,
    #[serde(default)]
    pub items: Vec<TestItem>,
}

impl TestVersion {
    pub fn scaffold(version_type: VersionType) -> Self {
        Self {
            version_type,
            purpose: version_type.default_purpose().to_string(),
            items: Vec::new(),
        }
    }
}

/// The diagnostic/formative/summative triple held by a course (and by each lesson).
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq)]
pub struct TestSet {
    pub diagnostic: TestVersion,
    pub formative: TestVersion,
    pub summative: TestVersion,
}

impl TestSet {
    pub fn get(&self, version: VersionType) -> &TestVersion {
        match version {
            VersionType::Diagnostic => &self.diagnostic,
            VersionType::Formative => &self.formative,
            VersionType::Summative => &self.summative,
        }
    }

    pub fn get_mut(&mut self, version: VersionType) -> &mut TestVersion {
        match version {
            VersionType::Diagnostic => &mut self.diagnostic,
            VersionType::Formative => &mut self.formative,
            VersionType::Summative => &mut self.summative,
        }
    }

    pub fn iter(&self) -> impl Iterator<Item = &TestVersion> {
        [&self.diagnostic, &self.formative, &self.summative].into_iter()
    }

    pub fn item_count(&self) -> usize {
        self.iter().map(|t| t.items.len()).sum()
    }
}

impl Default for TestSet {
    fn default() -> Self {
        Self {
            diagnostic: TestVersion::scaffold(VersionType::Diagnostic),
            formative: TestVersion::scaffold(VersionType::Formative),
            summative: TestVersion::scaffold(VersionType::Summative),
        }
    }
}
