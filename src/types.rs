use chrono::{SecondsFormat, Utc};
use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Where a new record lands in its collection.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum InsertOrder {
    Append,
    Prepend,
}

/// A record kind stored as one JSON array under a fixed storage key.
pub trait Entity: Clone + fmt::Debug + Serialize + DeserializeOwned + 'static {
    const STORAGE_KEY: &'static str;
    /// Human readable kind, used in errors and log lines.
    const KIND: &'static str;
    const INSERT_ORDER: InsertOrder = InsertOrder::Append;

    /// Every field except `id` and `createdAt`.
    type Draft: Clone + fmt::Debug;

    fn from_draft(id: String, created_at: String, draft: Self::Draft) -> Self;

    fn apply_draft(&mut self, draft: Self::Draft);

    fn to_draft(&self) -> Self::Draft;

    fn id(&self) -> &str;

    fn created_at(&self) -> &str;
}

/// ISO-8601 UTC timestamp with millisecond precision, e.g. `2024-05-01T10:00:00.000Z`.
pub fn timestamp_now() -> String {
    Utc::now().to_rfc3339_opts(SecondsFormat::Millis, true)
}

/// Treat blank optional form input as absent.
pub fn non_empty(value: Option<String>) -> Option<String> {
    value
        .map(|v| v.trim().to_string())
        .filter(|v| !v.is_empty())
}

/// Comma separated tech stack input, e.g. `"Rust, Axum ,, SQLite"`.
pub fn parse_tech_stack(input: &str) -> Vec<String> {
    split_trimmed(input, ',')
}

/// One company resource per line.
pub fn parse_resources(input: &str) -> Vec<String> {
    split_trimmed(input, '\n')
}

fn split_trimmed(input: &str, sep: char) -> Vec<String> {
    input
        .split(sep)
        .map(str::trim)
        .filter(|s| !s.is_empty())
        .map(str::to_string)
        .collect()
}

macro_rules! string_enum {
    ($name:ident { $($variant:ident => $text:literal),+ $(,)? }) => {
        impl $name {
            pub const ALL: &'static [$name] = &[$($name::$variant),+];

            pub fn as_str(&self) -> &'static str {
                match self {
                    $($name::$variant => $text,)+
                }
            }
        }

        impl fmt::Display for $name {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                f.write_str(self.as_str())
            }
        }

        impl FromStr for $name {
            type Err = String;

            fn from_str(s: &str) -> Result<Self, Self::Err> {
                match s.trim().to_ascii_lowercase().as_str() {
                    $($text => Ok($name::$variant),)+
                    _ => Err(format!(
                        "Unknown {}: {s} (expected one of: {})",
                        stringify!($name),
                        [$($text),+].join(", ")
                    )),
                }
            }
        }
    };
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum PdfCategory {
    Dsa,
    Notes,
    Resume,
    Company,
    Other,
}

string_enum!(PdfCategory {
    Dsa => "dsa",
    Notes => "notes",
    Resume => "resume",
    Company => "company",
    Other => "other",
});

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum InterviewResult {
    Selected,
    Rejected,
    #[default]
    Pending,
}

string_enum!(InterviewResult {
    Selected => "selected",
    Rejected => "rejected",
    Pending => "pending",
});

impl InterviewResult {
    pub fn label(&self) -> &'static str {
        match self {
            InterviewResult::Selected => "Selected",
            InterviewResult::Rejected => "Rejected",
            InterviewResult::Pending => "Pending",
        }
    }
}

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum QuestionCategory {
    #[default]
    Hr,
    Technical,
}

string_enum!(QuestionCategory {
    Hr => "hr",
    Technical => "technical",
});

// Coding profiles

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CodingProfile {
    pub id: String,
    pub name: String,
    pub platform: String,
    pub url: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub icon: Option<String>,
    pub created_at: String,
}

#[derive(Clone, Debug, Default, PartialEq)]
pub struct CodingProfileDraft {
    pub name: String,
    pub platform: String,
    pub url: String,
    pub icon: Option<String>,
}

impl Entity for CodingProfile {
    const STORAGE_KEY: &'static str = "codingProfiles";
    const KIND: &'static str = "Coding profile";
    type Draft = CodingProfileDraft;

    fn from_draft(id: String, created_at: String, draft: Self::Draft) -> Self {
        let mut profile = CodingProfile {
            id,
            name: String::new(),
            platform: String::new(),
            url: String::new(),
            icon: None,
            created_at,
        };
        profile.apply_draft(draft);
        profile
    }

    fn apply_draft(&mut self, draft: Self::Draft) {
        self.name = draft.name;
        self.platform = draft.platform;
        self.url = draft.url;
        self.icon = non_empty(draft.icon);
    }

    fn to_draft(&self) -> Self::Draft {
        CodingProfileDraft {
            name: self.name.clone(),
            platform: self.platform.clone(),
            url: self.url.clone(),
            icon: self.icon.clone(),
        }
    }

    fn id(&self) -> &str {
        &self.id
    }

    fn created_at(&self) -> &str {
        &self.created_at
    }
}

// PDF resources

/// `url` holds either a remote link or an embedded `data:` URL.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PdfResource {
    pub id: String,
    pub name: String,
    pub category: PdfCategory,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub subject: Option<String>,
    pub url: String,
    pub created_at: String,
}

#[derive(Clone, Debug, PartialEq)]
pub struct PdfResourceDraft {
    pub name: String,
    pub category: PdfCategory,
    pub subject: Option<String>,
    pub url: String,
}

impl Entity for PdfResource {
    const STORAGE_KEY: &'static str = "pdfResources";
    const KIND: &'static str = "PDF resource";
    type Draft = PdfResourceDraft;

    fn from_draft(id: String, created_at: String, draft: Self::Draft) -> Self {
        PdfResource {
            id,
            name: draft.name,
            category: draft.category,
            subject: non_empty(draft.subject),
            url: draft.url,
            created_at,
        }
    }

    fn apply_draft(&mut self, draft: Self::Draft) {
        self.name = draft.name;
        self.category = draft.category;
        self.subject = non_empty(draft.subject);
        self.url = draft.url;
    }

    fn to_draft(&self) -> Self::Draft {
        PdfResourceDraft {
            name: self.name.clone(),
            category: self.category,
            subject: self.subject.clone(),
            url: self.url.clone(),
        }
    }

    fn id(&self) -> &str {
        &self.id
    }

    fn created_at(&self) -> &str {
        &self.created_at
    }
}

// Interview experiences

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct InterviewExperience {
    pub id: String,
    pub company: String,
    pub role: String,
    pub date: String,
    pub rounds: String,
    pub experience: String,
    pub result: InterviewResult,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub tips: Option<String>,
    pub created_at: String,
}

#[derive(Clone, Debug, Default, PartialEq)]
pub struct InterviewExperienceDraft {
    pub company: String,
    pub role: String,
    pub date: String,
    pub rounds: String,
    pub experience: String,
    pub result: InterviewResult,
    pub tips: Option<String>,
}

impl Entity for InterviewExperience {
    const STORAGE_KEY: &'static str = "interviewExperiences";
    const KIND: &'static str = "Interview experience";
    // Newest first.
    const INSERT_ORDER: InsertOrder = InsertOrder::Prepend;
    type Draft = InterviewExperienceDraft;

    fn from_draft(id: String, created_at: String, draft: Self::Draft) -> Self {
        InterviewExperience {
            id,
            company: draft.company,
            role: draft.role,
            date: draft.date,
            rounds: draft.rounds,
            experience: draft.experience,
            result: draft.result,
            tips: non_empty(draft.tips),
            created_at,
        }
    }

    fn apply_draft(&mut self, draft: Self::Draft) {
        self.company = draft.company;
        self.role = draft.role;
        self.date = draft.date;
        self.rounds = draft.rounds;
        self.experience = draft.experience;
        self.result = draft.result;
        self.tips = non_empty(draft.tips);
    }

    fn to_draft(&self) -> Self::Draft {
        InterviewExperienceDraft {
            company: self.company.clone(),
            role: self.role.clone(),
            date: self.date.clone(),
            rounds: self.rounds.clone(),
            experience: self.experience.clone(),
            result: self.result,
            tips: self.tips.clone(),
        }
    }

    fn id(&self) -> &str {
        &self.id
    }

    fn created_at(&self) -> &str {
        &self.created_at
    }
}

// Projects

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Project {
    pub id: String,
    pub name: String,
    pub description: String,
    pub tech_stack: Vec<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub github_url: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub live_url: Option<String>,
    pub created_at: String,
}

#[derive(Clone, Debug, Default, PartialEq)]
pub struct ProjectDraft {
    pub name: String,
    pub description: String,
    pub tech_stack: Vec<String>,
    pub github_url: Option<String>,
    pub live_url: Option<String>,
}

impl Entity for Project {
    const STORAGE_KEY: &'static str = "projects";
    const KIND: &'static str = "Project";
    type Draft = ProjectDraft;

    fn from_draft(id: String, created_at: String, draft: Self::Draft) -> Self {
        Project {
            id,
            name: draft.name,
            description: draft.description,
            tech_stack: draft.tech_stack,
            github_url: non_empty(draft.github_url),
            live_url: non_empty(draft.live_url),
            created_at,
        }
    }

    fn apply_draft(&mut self, draft: Self::Draft) {
        self.name = draft.name;
        self.description = draft.description;
        self.tech_stack = draft.tech_stack;
        self.github_url = non_empty(draft.github_url);
        self.live_url = non_empty(draft.live_url);
    }

    fn to_draft(&self) -> Self::Draft {
        ProjectDraft {
            name: self.name.clone(),
            description: self.description.clone(),
            tech_stack: self.tech_stack.clone(),
            github_url: self.github_url.clone(),
            live_url: self.live_url.clone(),
        }
    }

    fn id(&self) -> &str {
        &self.id
    }

    fn created_at(&self) -> &str {
        &self.created_at
    }
}

// HR and technical questions

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct HrQuestion {
    pub id: String,
    pub question: String,
    pub answer: String,
    pub category: QuestionCategory,
    pub created_at: String,
}

#[derive(Clone, Debug, Default, PartialEq)]
pub struct HrQuestionDraft {
    pub question: String,
    pub answer: String,
    pub category: QuestionCategory,
}

impl Entity for HrQuestion {
    const STORAGE_KEY: &'static str = "hrQuestions";
    const KIND: &'static str = "Question";
    type Draft = HrQuestionDraft;

    fn from_draft(id: String, created_at: String, draft: Self::Draft) -> Self {
        HrQuestion {
            id,
            question: draft.question,
            answer: draft.answer,
            category: draft.category,
            created_at,
        }
    }

    fn apply_draft(&mut self, draft: Self::Draft) {
        self.question = draft.question;
        self.answer = draft.answer;
        self.category = draft.category;
    }

    fn to_draft(&self) -> Self::Draft {
        HrQuestionDraft {
            question: self.question.clone(),
            answer: self.answer.clone(),
            category: self.category,
        }
    }

    fn id(&self) -> &str {
        &self.id
    }

    fn created_at(&self) -> &str {
        &self.created_at
    }
}

// Company preparation notes

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CompanyPrep {
    pub id: String,
    pub company: String,
    pub notes: String,
    pub resources: Vec<String>,
    pub created_at: String,
}

#[derive(Clone, Debug, Default, PartialEq)]
pub struct CompanyPrepDraft {
    pub company: String,
    pub notes: String,
    pub resources: Vec<String>,
}

impl Entity for CompanyPrep {
    const STORAGE_KEY: &'static str = "companyPrep";
    const KIND: &'static str = "Company prep";
    type Draft = CompanyPrepDraft;

    fn from_draft(id: String, created_at: String, draft: Self::Draft) -> Self {
        CompanyPrep {
            id,
            company: draft.company,
            notes: draft.notes,
            resources: draft.resources,
            created_at,
        }
    }

    fn apply_draft(&mut self, draft: Self::Draft) {
        self.company = draft.company;
        self.notes = draft.notes;
        self.resources = draft.resources;
    }

    fn to_draft(&self) -> Self::Draft {
        CompanyPrepDraft {
            company: self.company.clone(),
            notes: self.notes.clone(),
            resources: self.resources.clone(),
        }
    }

    fn id(&self) -> &str {
        &self.id
    }

    fn created_at(&self) -> &str {
        &self.created_at
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_split_helpers_drop_blank_entries() {
        assert_eq!(parse_tech_stack(" Rust, Axum ,, SQLite ,"), vec!["Rust", "Axum", "SQLite"]);
        assert_eq!(
            parse_resources("https://a.dev\n\n  notes.md  \n"),
            vec!["https://a.dev", "notes.md"]
        );
        assert!(parse_tech_stack("  ").is_empty());
    }

    #[test]
    fn test_enum_parsing_is_case_insensitive() {
        assert_eq!("DSA".parse::<PdfCategory>().unwrap(), PdfCategory::Dsa);
        assert_eq!(" technical ".parse::<QuestionCategory>().unwrap(), QuestionCategory::Technical);
        let err = "maybe".parse::<InterviewResult>().unwrap_err();
        assert!(err.contains("selected, rejected, pending"));
    }

    #[test]
    fn test_project_uses_camel_case_layout() {
        let project = Project::from_draft(
            "1".into(),
            "2024-01-01T00:00:00.000Z".into(),
            ProjectDraft {
                name: "Tracker".into(),
                description: "Job tracker".into(),
                tech_stack: vec!["Rust".into()],
                github_url: Some("https://github.com/u/tracker".into()),
                live_url: Some("   ".into()),
            },
        );
        let value = serde_json::to_value(&project).unwrap();
        assert_eq!(
            value,
            json!({
                "id": "1",
                "name": "Tracker",
                "description": "Job tracker",
                "techStack": ["Rust"],
                "githubUrl": "https://github.com/u/tracker",
                "createdAt": "2024-01-01T00:00:00.000Z"
            })
        );
    }

    #[test]
    fn test_reads_records_written_by_the_web_dashboard() {
        let raw = r##"[{"id":"1712","name":"DBMS Notes","category":"notes",
            "subject":"Database Management","url":"#","createdAt":"2024-04-10T08:00:00.000Z"}]"##;
        let pdfs: Vec<PdfResource> = serde_json::from_str(raw).unwrap();
        assert_eq!(pdfs[0].category, PdfCategory::Notes);
        assert_eq!(pdfs[0].subject.as_deref(), Some("Database Management"));
    }

    #[test]
    fn test_apply_draft_keeps_identity() {
        let mut exp = InterviewExperience::from_draft(
            "9".into(),
            "2024-02-02T00:00:00.000Z".into(),
            InterviewExperienceDraft {
                company: "Acme".into(),
                role: "SDE".into(),
                ..Default::default()
            },
        );
        let mut draft = exp.to_draft();
        draft.result = InterviewResult::Selected;
        draft.tips = Some("Revise graphs".into());
        exp.apply_draft(draft);

        assert_eq!(exp.id, "9");
        assert_eq!(exp.created_at, "2024-02-02T00:00:00.000Z");
        assert_eq!(exp.result, InterviewResult::Selected);
        assert_eq!(exp.tips.as_deref(), Some("Revise graphs"));
    }
}
