use std::path::PathBuf;

use clap::{Args, Parser, Subcommand};

use crate::metadata::{PKG_DESCRIPTION, PKG_NAME, PKG_VERSION};
use crate::types::{
    CodingProfileDraft, CompanyPrepDraft, HrQuestionDraft, InterviewExperienceDraft,
    InterviewResult, PdfCategory, PdfResourceDraft, ProjectDraft, QuestionCategory, parse_resources,
    parse_tech_stack,
};

#[derive(Parser, Debug, Clone)]
#[command(name = PKG_NAME)]
#[command(version = PKG_VERSION)]
#[command(about = PKG_DESCRIPTION, long_about = None)]
pub struct Cli {
    /// Settings file (defaults to ~/.placement-workspace/settings.json)
    #[arg(long, global = true, env = "PLACEMENT_SETTINGS")]
    pub settings: Option<PathBuf>,

    /// Directory holding one JSON document per collection
    #[arg(long, global = true, env = "PLACEMENT_DATA_DIR")]
    pub data_dir: Option<PathBuf>,

    /// Keep all changes in memory for this run only
    #[arg(long, global = true, default_value_t = false)]
    pub ephemeral: bool,

    /// Print JSON instead of cards
    #[arg(long, global = true, default_value_t = false)]
    pub json: bool,

    #[command(subcommand)]
    pub command: Command,
}

#[derive(Subcommand, Debug, Clone)]
pub enum Command {
    /// Show counts, category cards and preparation progress
    Dashboard,
    /// Render a page by its path, e.g. `/notes`
    Open { path: String },
    /// Search profiles, PDFs, interviews and projects
    Search(SearchArgs),
    /// Coding profile links
    #[command(subcommand)]
    Profiles(ProfileAction),
    /// DSA sheets, subject notes and other PDFs
    #[command(subcommand)]
    Pdfs(PdfAction),
    /// Interview write-ups, newest first
    #[command(subcommand)]
    Interviews(InterviewAction),
    /// Project summaries
    #[command(subcommand)]
    Projects(ProjectAction),
    /// Resumes and the primary resume
    #[command(subcommand)]
    Resume(ResumeAction),
    /// Company-specific notes and resources
    #[command(subcommand)]
    Company(CompanyAction),
    /// HR and technical questions with answers
    #[command(subcommand)]
    Hr(HrAction),
    /// Show or edit settings.json
    #[command(subcommand)]
    Config(ConfigAction),
    /// Print version information
    Version,
}

#[derive(Args, Debug, Clone)]
pub struct SearchArgs {
    /// Text to look for; case-insensitive substring match
    pub query: Option<String>,

    /// Prompt for queries and open the selected result's page
    #[arg(long, short, default_value_t = false)]
    pub interactive: bool,
}

// Coding profiles

#[derive(Subcommand, Debug, Clone)]
pub enum ProfileAction {
    List,
    Add(ProfileFields),
    Edit {
        id: String,
        #[command(flatten)]
        patch: ProfilePatch,
    },
    Delete {
        id: String,
    },
}

#[derive(Args, Debug, Clone)]
pub struct ProfileFields {
    #[arg(long)]
    pub name: String,
    /// LeetCode, GeeksforGeeks, CodeChef, ...
    #[arg(long)]
    pub platform: String,
    #[arg(long)]
    pub url: String,
    #[arg(long)]
    pub icon: Option<String>,
}

impl From<ProfileFields> for CodingProfileDraft {
    fn from(fields: ProfileFields) -> Self {
        CodingProfileDraft {
            name: fields.name,
            platform: fields.platform,
            url: fields.url,
            icon: fields.icon,
        }
    }
}

#[derive(Args, Debug, Clone, Default)]
pub struct ProfilePatch {
    #[arg(long)]
    pub name: Option<String>,
    #[arg(long)]
    pub platform: Option<String>,
    #[arg(long)]
    pub url: Option<String>,
    #[arg(long)]
    pub icon: Option<String>,
}

impl ProfilePatch {
    pub fn apply(self, draft: &mut CodingProfileDraft) {
        replace(&mut draft.name, self.name);
        replace(&mut draft.platform, self.platform);
        replace(&mut draft.url, self.url);
        if self.icon.is_some() {
            draft.icon = self.icon;
        }
    }
}

// PDF resources

#[derive(Subcommand, Debug, Clone)]
pub enum PdfAction {
    List {
        #[arg(long)]
        category: Option<PdfCategory>,
        #[arg(long)]
        subject: Option<String>,
    },
    Add(PdfFields),
    Edit {
        id: String,
        #[command(flatten)]
        patch: PdfPatch,
    },
    Delete {
        id: String,
    },
    /// Write an uploaded PDF back to disk
    Export {
        id: String,
        out: PathBuf,
    },
    /// List the subjects used by notes
    Subjects,
}

#[derive(Args, Debug, Clone)]
pub struct PdfFields {
    /// Defaults to the file name when uploading
    #[arg(long)]
    pub name: Option<String>,
    #[arg(long, default_value_t = PdfCategory::Dsa)]
    pub category: PdfCategory,
    #[arg(long)]
    pub subject: Option<String>,
    #[command(flatten)]
    pub source: SourceArgs,
}

/// Where a PDF comes from: a link, or a local file embedded into the record.
#[derive(Args, Debug, Clone)]
#[group(required = true, multiple = false)]
pub struct SourceArgs {
    #[arg(long)]
    pub url: Option<String>,
    #[arg(long)]
    pub file: Option<PathBuf>,
}

#[derive(Args, Debug, Clone, Default)]
pub struct PdfPatch {
    #[arg(long)]
    pub name: Option<String>,
    #[arg(long)]
    pub category: Option<PdfCategory>,
    #[arg(long)]
    pub subject: Option<String>,
    #[arg(long)]
    pub url: Option<String>,
}

impl PdfPatch {
    pub fn apply(self, draft: &mut PdfResourceDraft) {
        replace(&mut draft.name, self.name);
        replace(&mut draft.category, self.category);
        replace(&mut draft.url, self.url);
        if self.subject.is_some() {
            draft.subject = self.subject;
        }
    }
}

// Interview experiences

#[derive(Subcommand, Debug, Clone)]
pub enum InterviewAction {
    List {
        #[arg(long)]
        result: Option<InterviewResult>,
    },
    Add(InterviewFields),
    Edit {
        id: String,
        #[command(flatten)]
        patch: InterviewPatch,
    },
    Delete {
        id: String,
    },
}

#[derive(Args, Debug, Clone)]
pub struct InterviewFields {
    #[arg(long)]
    pub company: String,
    #[arg(long)]
    pub role: String,
    #[arg(long, default_value = "")]
    pub date: String,
    /// Free text, e.g. "OA, 2 technical, HR"
    #[arg(long, default_value = "")]
    pub rounds: String,
    #[arg(long, default_value = "")]
    pub experience: String,
    #[arg(long, default_value_t = InterviewResult::Pending)]
    pub result: InterviewResult,
    #[arg(long)]
    pub tips: Option<String>,
}

impl From<InterviewFields> for InterviewExperienceDraft {
    fn from(fields: InterviewFields) -> Self {
        InterviewExperienceDraft {
            company: fields.company,
            role: fields.role,
            date: fields.date,
            rounds: fields.rounds,
            experience: fields.experience,
            result: fields.result,
            tips: fields.tips,
        }
    }
}

#[derive(Args, Debug, Clone, Default)]
pub struct InterviewPatch {
    #[arg(long)]
    pub company: Option<String>,
    #[arg(long)]
    pub role: Option<String>,
    #[arg(long)]
    pub date: Option<String>,
    #[arg(long)]
    pub rounds: Option<String>,
    #[arg(long)]
    pub experience: Option<String>,
    #[arg(long)]
    pub result: Option<InterviewResult>,
    #[arg(long)]
    pub tips: Option<String>,
}

impl InterviewPatch {
    pub fn apply(self, draft: &mut InterviewExperienceDraft) {
        replace(&mut draft.company, self.company);
        replace(&mut draft.role, self.role);
        replace(&mut draft.date, self.date);
        replace(&mut draft.rounds, self.rounds);
        replace(&mut draft.experience, self.experience);
        replace(&mut draft.result, self.result);
        if self.tips.is_some() {
            draft.tips = self.tips;
        }
    }
}

// Projects

#[derive(Subcommand, Debug, Clone)]
pub enum ProjectAction {
    List,
    Add(ProjectFields),
    Edit {
        id: String,
        #[command(flatten)]
        patch: ProjectPatch,
    },
    Delete {
        id: String,
    },
}

#[derive(Args, Debug, Clone)]
pub struct ProjectFields {
    #[arg(long)]
    pub name: String,
    #[arg(long, default_value = "")]
    pub description: String,
    /// Comma separated, e.g. "Rust, Axum, SQLite"
    #[arg(long, default_value = "")]
    pub tech: String,
    #[arg(long)]
    pub github: Option<String>,
    #[arg(long)]
    pub live: Option<String>,
}

impl From<ProjectFields> for ProjectDraft {
    fn from(fields: ProjectFields) -> Self {
        ProjectDraft {
            name: fields.name,
            description: fields.description,
            tech_stack: parse_tech_stack(&fields.tech),
            github_url: fields.github,
            live_url: fields.live,
        }
    }
}

#[derive(Args, Debug, Clone, Default)]
pub struct ProjectPatch {
    #[arg(long)]
    pub name: Option<String>,
    #[arg(long)]
    pub description: Option<String>,
    #[arg(long)]
    pub tech: Option<String>,
    #[arg(long)]
    pub github: Option<String>,
    #[arg(long)]
    pub live: Option<String>,
}

impl ProjectPatch {
    pub fn apply(self, draft: &mut ProjectDraft) {
        replace(&mut draft.name, self.name);
        replace(&mut draft.description, self.description);
        replace(&mut draft.tech_stack, self.tech.as_deref().map(parse_tech_stack));
        if self.github.is_some() {
            draft.github_url = self.github;
        }
        if self.live.is_some() {
            draft.live_url = self.live;
        }
    }
}

// Resumes

#[derive(Subcommand, Debug, Clone)]
pub enum ResumeAction {
    List,
    Add {
        #[arg(long)]
        name: Option<String>,
        #[command(flatten)]
        source: SourceArgs,
    },
    Delete {
        id: String,
    },
    /// Mark a resume as the primary one
    Primary {
        id: String,
    },
}

// Company prep

#[derive(Subcommand, Debug, Clone)]
pub enum CompanyAction {
    List,
    Add(CompanyFields),
    Edit {
        id: String,
        #[command(flatten)]
        patch: CompanyPatch,
    },
    Delete {
        id: String,
    },
}

#[derive(Args, Debug, Clone)]
pub struct CompanyFields {
    #[arg(long)]
    pub company: String,
    #[arg(long, default_value = "")]
    pub notes: String,
    /// One link or note per flag; newlines split further
    #[arg(long = "resource")]
    pub resources: Vec<String>,
}

impl From<CompanyFields> for CompanyPrepDraft {
    fn from(fields: CompanyFields) -> Self {
        CompanyPrepDraft {
            company: fields.company,
            notes: fields.notes,
            resources: parse_resources(&fields.resources.join("\n")),
        }
    }
}

#[derive(Args, Debug, Clone, Default)]
pub struct CompanyPatch {
    #[arg(long)]
    pub company: Option<String>,
    #[arg(long)]
    pub notes: Option<String>,
    /// Replaces the whole resource list
    #[arg(long = "resource")]
    pub resources: Vec<String>,
}

impl CompanyPatch {
    pub fn apply(self, draft: &mut CompanyPrepDraft) {
        replace(&mut draft.company, self.company);
        replace(&mut draft.notes, self.notes);
        if !self.resources.is_empty() {
            draft.resources = parse_resources(&self.resources.join("\n"));
        }
    }
}

// HR and technical questions

#[derive(Subcommand, Debug, Clone)]
pub enum HrAction {
    List {
        #[arg(long)]
        category: Option<QuestionCategory>,
    },
    Add(HrFields),
    Edit {
        id: String,
        #[command(flatten)]
        patch: HrPatch,
    },
    Delete {
        id: String,
    },
}

#[derive(Args, Debug, Clone)]
pub struct HrFields {
    #[arg(long)]
    pub question: String,
    #[arg(long, default_value = "")]
    pub answer: String,
    #[arg(long, default_value_t = QuestionCategory::Hr)]
    pub category: QuestionCategory,
}

impl From<HrFields> for HrQuestionDraft {
    fn from(fields: HrFields) -> Self {
        HrQuestionDraft {
            question: fields.question,
            answer: fields.answer,
            category: fields.category,
        }
    }
}

#[derive(Args, Debug, Clone, Default)]
pub struct HrPatch {
    #[arg(long)]
    pub question: Option<String>,
    #[arg(long)]
    pub answer: Option<String>,
    #[arg(long)]
    pub category: Option<QuestionCategory>,
}

impl HrPatch {
    pub fn apply(self, draft: &mut HrQuestionDraft) {
        replace(&mut draft.question, self.question);
        replace(&mut draft.answer, self.answer);
        replace(&mut draft.category, self.category);
    }
}

#[derive(Subcommand, Debug, Clone)]
pub enum ConfigAction {
    /// Print the resolved settings
    Show,
    /// Edit settings interactively
    Edit,
    /// Print the settings file location
    Path,
}

fn replace<T>(slot: &mut T, value: Option<T>) {
    if let Some(value) = value {
        *slot = value;
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::CommandFactory;

    #[test]
    fn test_cli_definition_is_consistent() {
        Cli::command().debug_assert();
    }

    #[test]
    fn test_parses_project_add() {
        let cli = Cli::try_parse_from([
            "placement-workspace",
            "projects",
            "add",
            "--name",
            "Tracker",
            "--tech",
            "Rust, SQLite",
        ])
        .unwrap();
        let Command::Projects(ProjectAction::Add(fields)) = cli.command else {
            panic!("unexpected command");
        };
        let draft = ProjectDraft::from(fields);
        assert_eq!(draft.tech_stack, vec!["Rust", "SQLite"]);
    }

    #[test]
    fn test_pdf_add_needs_exactly_one_source() {
        let base = ["placement-workspace", "pdfs", "add", "--name", "Sheet"];
        assert!(Cli::try_parse_from(base).is_err());
        let both = [&base[..], &["--url", "https://a.dev", "--file", "a.pdf"]].concat();
        assert!(Cli::try_parse_from(both).is_err());
        let cli = Cli::try_parse_from([&base[..], &["--url", "https://a.dev", "--category", "notes"]].concat())
            .unwrap();
        let Command::Pdfs(PdfAction::Add(fields)) = cli.command else {
            panic!("unexpected command");
        };
        assert_eq!(fields.category, PdfCategory::Notes);
    }

    #[test]
    fn test_patch_only_touches_given_fields() {
        let mut draft = CodingProfileDraft {
            name: "My LeetCode".into(),
            platform: "LeetCode".into(),
            url: "https://leetcode.com/u".into(),
            icon: None,
        };
        ProfilePatch {
            name: Some("Main LeetCode".into()),
            ..Default::default()
        }
        .apply(&mut draft);
        assert_eq!(draft.name, "Main LeetCode");
        assert_eq!(draft.platform, "LeetCode");
    }
}
