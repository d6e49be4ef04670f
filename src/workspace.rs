use std::collections::BTreeMap;

use crate::collections::Collection;
use crate::resume::{PRIMARY_RESUME_KEY, ResumeBook};
use crate::search::SearchSources;
use crate::store::{PersistentCell, SharedStorage};
use crate::types::{
    CodingProfile, CompanyPrep, HrQuestion, InterviewExperience, PdfCategory, PdfResource,
    Project, QuestionCategory,
};

/// All collections of one user, each opened from storage the first time it
/// is used and owned by this workspace for the rest of the session.
pub struct Workspace {
    storage: SharedStorage,
    profiles: Option<Collection<CodingProfile>>,
    pdfs: Option<Collection<PdfResource>>,
    interviews: Option<Collection<InterviewExperience>>,
    projects: Option<Collection<Project>>,
    hr_questions: Option<Collection<HrQuestion>>,
    company_prep: Option<Collection<CompanyPrep>>,
    primary_resume: Option<PersistentCell<Option<String>>>,
}

impl Workspace {
    pub fn new(storage: SharedStorage) -> Self {
        Self {
            storage,
            profiles: None,
            pdfs: None,
            interviews: None,
            projects: None,
            hr_questions: None,
            company_prep: None,
            primary_resume: None,
        }
    }

    pub fn profiles(&mut self) -> &mut Collection<CodingProfile> {
        let storage = &self.storage;
        self.profiles
            .get_or_insert_with(|| Collection::open(storage.clone()))
    }

    pub fn pdfs(&mut self) -> &mut Collection<PdfResource> {
        let storage = &self.storage;
        self.pdfs.get_or_insert_with(|| Collection::open(storage.clone()))
    }

    pub fn interviews(&mut self) -> &mut Collection<InterviewExperience> {
        let storage = &self.storage;
        self.interviews
            .get_or_insert_with(|| Collection::open(storage.clone()))
    }

    pub fn projects(&mut self) -> &mut Collection<Project> {
        let storage = &self.storage;
        self.projects
            .get_or_insert_with(|| Collection::open(storage.clone()))
    }

    pub fn hr_questions(&mut self) -> &mut Collection<HrQuestion> {
        let storage = &self.storage;
        self.hr_questions
            .get_or_insert_with(|| Collection::open(storage.clone()))
    }

    pub fn company_prep(&mut self) -> &mut Collection<CompanyPrep> {
        let storage = &self.storage;
        self.company_prep
            .get_or_insert_with(|| Collection::open(storage.clone()))
    }

    pub fn primary_resume_id(&mut self) -> &mut PersistentCell<Option<String>> {
        let storage = &self.storage;
        self.primary_resume
            .get_or_insert_with(|| PersistentCell::open(storage.clone(), PRIMARY_RESUME_KEY, None))
    }

    pub fn resume_book(&mut self) -> ResumeBook<'_> {
        let storage = &self.storage;
        let pdfs = self
            .pdfs
            .get_or_insert_with(|| Collection::open(storage.clone()));
        let primary = self
            .primary_resume
            .get_or_insert_with(|| PersistentCell::open(storage.clone(), PRIMARY_RESUME_KEY, None));
        ResumeBook::new(pdfs, primary)
    }

    /// Snapshots of the searchable collections, opening any not yet used.
    pub fn search_sources(&mut self) -> SearchSources<'_> {
        self.profiles();
        self.pdfs();
        self.interviews();
        self.projects();
        SearchSources {
            profiles: self.profiles.as_ref().map(|c| c.items()).unwrap_or_default(),
            pdfs: self.pdfs.as_ref().map(|c| c.items()).unwrap_or_default(),
            interviews: self.interviews.as_ref().map(|c| c.items()).unwrap_or_default(),
            projects: self.projects.as_ref().map(|c| c.items()).unwrap_or_default(),
        }
    }

    pub fn pdfs_in(&mut self, category: PdfCategory) -> Vec<PdfResource> {
        self.pdfs()
            .items()
            .iter()
            .filter(|pdf| pdf.category == category)
            .cloned()
            .collect()
    }

    /// Distinct note subjects in the order they first appear.
    pub fn note_subjects(&mut self) -> Vec<String> {
        let mut subjects: Vec<String> = Vec::new();
        for pdf in self.pdfs().items() {
            if pdf.category != PdfCategory::Notes {
                continue;
            }
            if let Some(subject) = &pdf.subject {
                if !subjects.contains(subject) {
                    subjects.push(subject.clone());
                }
            }
        }
        subjects
    }

    pub fn questions_in(&mut self, category: QuestionCategory) -> Vec<HrQuestion> {
        self.hr_questions()
            .items()
            .iter()
            .filter(|q| q.category == category)
            .cloned()
            .collect()
    }

    pub fn question_counts(&mut self) -> BTreeMap<&'static str, usize> {
        let mut counts: BTreeMap<&'static str, usize> = QuestionCategory::ALL
            .iter()
            .map(|c| (c.as_str(), 0))
            .collect();
        for question in self.hr_questions().items() {
            *counts.entry(question.category.as_str()).or_default() += 1;
        }
        counts
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::storage::{KeyValueStorage, MemoryStorage};
    use crate::types::{HrQuestionDraft, PdfResourceDraft};
    use std::sync::Arc;

    fn note(name: &str, subject: Option<&str>) -> PdfResourceDraft {
        PdfResourceDraft {
            name: name.into(),
            category: PdfCategory::Notes,
            subject: subject.map(str::to_string),
            url: "#".into(),
        }
    }

    #[test]
    fn test_cells_open_lazily() {
        let raw = Arc::new(MemoryStorage::new());
        raw.set_item("projects", r#"[{"id":"1","name":"Old","description":"","techStack":[],"createdAt":"x"}]"#)
            .unwrap();
        let storage: SharedStorage = raw.clone();
        let mut workspace = Workspace::new(storage);

        // Changed after construction but before first use: the workspace sees it.
        raw.set_item("projects", r#"[]"#).unwrap();
        assert!(workspace.projects().is_empty());
    }

    #[test]
    fn test_primary_pointer_is_shared_with_resume_book() {
        let mut workspace = Workspace::new(Arc::new(MemoryStorage::new()));
        let resume = workspace
            .resume_book()
            .add_resume("SDE resume".into(), "#".into())
            .unwrap();
        assert_eq!(workspace.primary_resume_id().get().as_deref(), Some(resume.id.as_str()));

        workspace.primary_resume_id().set(None).unwrap();
        assert!(workspace.resume_book().primary_resume().is_none());
    }

    #[test]
    fn test_note_subjects_are_distinct_in_first_seen_order() {
        let mut workspace = Workspace::new(Arc::new(MemoryStorage::new()));
        for (name, subject) in [
            ("DBMS", Some("Databases")),
            ("OS", Some("Operating Systems")),
            ("SQL", Some("Databases")),
            ("Misc", None),
        ] {
            workspace.pdfs().add(note(name, subject)).unwrap();
        }
        assert_eq!(workspace.note_subjects(), ["Databases", "Operating Systems"]);
        assert_eq!(workspace.pdfs_in(PdfCategory::Notes).len(), 4);
        assert!(workspace.pdfs_in(PdfCategory::Dsa).is_empty());
    }

    #[test]
    fn test_question_counts_include_empty_categories() {
        let mut workspace = Workspace::new(Arc::new(MemoryStorage::new()));
        workspace
            .hr_questions()
            .add(HrQuestionDraft {
                question: "Tell me about yourself".into(),
                answer: "...".into(),
                category: QuestionCategory::Hr,
            })
            .unwrap();
        let counts = workspace.question_counts();
        assert_eq!(counts["hr"], 1);
        assert_eq!(counts["technical"], 0);
        assert_eq!(workspace.questions_in(QuestionCategory::Technical).len(), 0);
    }
}
