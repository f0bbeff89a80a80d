use std::{fmt, str::FromStr};

use serde::{Deserialize, Serialize};

use super::{assessment::TestSet, UnknownLabel};

/// Terminal learning objective: what the student does, under which
/// conditions, to which standard.
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq, Eq, Default)]
pub struct Tlo {
    pub action: String,
    pub condition: String,
    pub standard: String,
}

#[derive(Serialize, Deserialize, Debug, Clone, Copy, PartialEq, Eq)]
pub enum InstructionalMethod {
    Lecture,
    #[serde(rename = "Practical Exercise")]
    PracticalExercise,
    Discussion,
    Demonstration,
    #[serde(rename = "Role Play")]
    RolePlay,
}

impl InstructionalMethod {
    const ALL: [InstructionalMethod; 5] = [
        InstructionalMethod::Lecture,
        InstructionalMethod::PracticalExercise,
        InstructionalMethod::Discussion,
        InstructionalMethod::Demonstration,
        InstructionalMethod::RolePlay,
    ];

    pub fn as_str(self) -> &'static str {
        match self {
            InstructionalMethod::Lecture => "Lecture",
            InstructionalMethod::PracticalExercise => "Practical Exercise",
            InstructionalMethod::Discussion => "Discussion",
            InstructionalMethod::Demonstration => "Demonstration",
            InstructionalMethod::RolePlay => "Role Play",
        }
    }
}

impl fmt::Display for InstructionalMethod {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for InstructionalMethod {
    type Err = UnknownLabel;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        InstructionalMethod::ALL
            .into_iter()
            .find(|m| m.as_str().eq_ignore_ascii_case(s.trim()))
            .ok_or_else(|| UnknownLabel::new("instructional method", s))
    }
}

#[derive(Serialize, Deserialize, Debug, Clone, Copy, PartialEq, Eq)]
pub enum ExerciseType {
    Simulation,
    #[serde(rename = "Hands-on")]
    HandsOn,
    #[serde(rename = "Team Scenario")]
    TeamScenario,
    #[serde(rename = "Individual Job Aid")]
    IndividualJobAid,
    #[serde(rename = "Role Play")]
    RolePlay,
}

impl ExerciseType {
    const ALL: [ExerciseType; 5] = [
        ExerciseType::Simulation,
        ExerciseType::HandsOn,
        ExerciseType::TeamScenario,
        ExerciseType::IndividualJobAid,
        ExerciseType::RolePlay,
    ];

    pub fn as_str(self) -> &'static str {
        match self {
            ExerciseType::Simulation => "Simulation",
            ExerciseType::HandsOn => "Hands-on",
            ExerciseType::TeamScenario => "Team Scenario",
            ExerciseType::IndividualJobAid => "Individual Job Aid",
            ExerciseType::RolePlay => "Role Play",
        }
    }
}

impl fmt::Display for ExerciseType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for ExerciseType {
    type Err = UnknownLabel;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let wanted = s.trim();
        ExerciseType::ALL
            .into_iter()
            .find(|t| t.as_str().eq_ignore_ascii_case(wanted))
            .or_else(|| wanted.eq_ignore_ascii_case("hands on").then_some(ExerciseType::HandsOn))
            .ok_or_else(|| UnknownLabel::new("exercise type", s))
    }
}

#[derive(Serialize, Deserialize, Debug, Clone, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct PracticalExercise {
    pub title: String,
    #[serde(rename = "type")]
    pub exercise_type: ExerciseType,
    pub description: String,
    /// execution steps, in order
    #[serde(default)]
    pub steps: Vec<String>,
    /// observer checklist
    #[serde(default)]
    pub scoring_criteria: Vec<String>,
}

#[derive(Serialize, Deserialize, Debug, Clone, PartialEq, Eq)]
pub struct CheckOnLearning {
    pub question: String,
    pub answer: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub remediation: Option<String>,
}

#[derive(Serialize, Deserialize, Debug, Clone, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct LearningStepActivity {
    pub title: String,
    pub time_minutes: u32,
    pub method: InstructionalMethod,
    pub description: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub guidance: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub practical_exercise: Option<PracticalExercise>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub check_on_learning: Option<CheckOnLearning>,
}

#[derive(Serialize, Deserialize, Debug, Clone, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct EnablingObjective {
    /// unique within the owning lesson
    pub id: String,
    pub title: String,
    #[serde(default)]
    pub learning_step_activities: Vec<LearningStepActivity>,
}

#[derive(Serialize, Deserialize, Debug, Clone, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct Slide {
    pub id: String,
    pub title: String,
    #[serde(default)]
    pub bullet_points: Vec<String>,
    #[serde(default)]
    pub instructor_notes: String,
}

#[derive(Serialize, Deserialize, Debug, Clone, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct Lesson {
    /// unique within the course; lesson order is the instructional sequence
    pub id: String,

    pub title: String,

    pub duration_hours: u32,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub tlo: Option<Tlo>,

    #[serde(default)]
    pub elos: Vec<EnablingObjective>,

    // generated artifacts, absent until a lesson-detail call succeeds
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub slides: Option<Vec<Slide>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub script: Option<String>,
    #[serde(
        default,
        rename = "armyRegulations",
        skip_serializing_if = "Option::is_none"
    )]
    pub regulations: Option<Vec<String>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub scope: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub prerequisites: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub instructor_qualifications: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub safety_considerations: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub summary: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub media: Option<String>,
    /// instructor to student ratio
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub ratio: Option<String>,

    #[serde(default)]
    pub tests: TestSet,
}

impl Lesson {
    pub fn activities(&self) -> impl Iterator<Item = &LearningStepActivity> {
        self.elos
            .iter()
            .flat_map(|elo| elo.learning_step_activities.iter())
    }

    pub fn elo(&self, elo_id: &str) -> Option<&EnablingObjective> {
        self.elos.iter().find(|elo| elo.id == elo_id)
    }

    /// Planned minutes across every learning step activity.
    pub fn activity_minutes(&self) -> u32 {
        self.activities()
            .fold(0u32, |total, lsa| total.saturating_add(lsa.time_minutes))
    }
}
