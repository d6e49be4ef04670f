//! Dispatches parsed commands against a [`Workspace`] and writes either
//! rendered pages or JSON to the output.

use colored::Colorize;
use dialoguer::{Confirm, Input, Select};
use serde::Serialize;
use serde_json::json;
use std::fs;
use std::io::Write;
use std::path::PathBuf;
use tracing::{debug, info};

use crate::attachment::{PdfLocation, decode_data_url, read_file_as_data_url};
use crate::cli::{
    CompanyAction, Command, ConfigAction, HrAction, InterviewAction, PdfAction, ProfileAction,
    ProjectAction, ResumeAction, SearchArgs, SourceArgs,
};
use crate::config::Settings;
use crate::dashboard::Dashboard;
use crate::error::{ServiceError, ServiceResult, WorkspaceError, WorkspaceResult};
use crate::metadata::{PKG_NAME, PKG_VERSION};
use crate::navigation::Route;
use crate::pages;
use crate::search::{SearchSurface, search};
use crate::types::{
    CodingProfileDraft, CompanyPrepDraft, Entity, HrQuestionDraft, InterviewExperienceDraft,
    PdfResourceDraft, ProjectDraft,
};
use crate::workspace::Workspace;

pub struct Handler<W: Write> {
    workspace: Workspace,
    settings: Settings,
    settings_path: PathBuf,
    json: bool,
    out: W,
}

impl<W: Write> Handler<W> {
    pub fn new(workspace: Workspace, settings: Settings, settings_path: PathBuf, out: W) -> Self {
        Self {
            workspace,
            settings,
            settings_path,
            json: false,
            out,
        }
    }

    pub fn with_json(mut self, json: bool) -> Self {
        self.json = json;
        self
    }

    pub fn workspace(&mut self) -> &mut Workspace {
        &mut self.workspace
    }

    pub fn into_output(self) -> W {
        self.out
    }

    pub fn run(&mut self, command: Command) -> ServiceResult<()> {
        debug!(?command, "running command");
        match command {
            Command::Dashboard => self.open(Route::Dashboard),
            Command::Open { path } => self.open(Route::from_path(&path)),
            Command::Search(args) => self.search(args),
            Command::Profiles(action) => self.profiles(action),
            Command::Pdfs(action) => self.pdfs(action),
            Command::Interviews(action) => self.interviews(action),
            Command::Projects(action) => self.projects(action),
            Command::Resume(action) => self.resume(action),
            Command::Company(action) => self.company(action),
            Command::Hr(action) => self.hr(action),
            Command::Config(action) => self.config(action),
            Command::Version => {
                writeln!(self.out, "{PKG_NAME} {PKG_VERSION}")?;
                Ok(())
            }
        }
    }

    fn open(&mut self, route: Route) -> ServiceResult<()> {
        if self.json && route == Route::Dashboard {
            let dashboard = Dashboard::build(&mut self.workspace, &self.settings.progress);
            return write_json(&mut self.out, &dashboard);
        }
        pages::render_route(
            &mut self.out,
            &mut self.workspace,
            route,
            &self.settings.progress,
        )?;
        Ok(())
    }

    fn search(&mut self, args: SearchArgs) -> ServiceResult<()> {
        if args.interactive {
            return self.search_interactive(args.query.unwrap_or_default());
        }
        let query = args.query.unwrap_or_default();
        let results = search(&query, self.workspace.search_sources());
        if self.json {
            return write_json(&mut self.out, &results);
        }
        pages::render_search_results(&mut self.out, &query, &results)?;
        Ok(())
    }

    /// Prompt for a query, pick a hit, and show its page. An empty query
    /// closes the search; Esc in the picker goes back to the query.
    fn search_interactive(&mut self, initial: String) -> ServiceResult<()> {
        let mut surface = SearchSurface::new();
        surface.set_query(initial);
        surface.open();
        while surface.is_open() {
            let query: String = Input::new()
                .with_prompt("Search")
                .with_initial_text(surface.query())
                .allow_empty(true)
                .interact_text()?;
            if query.trim().is_empty() {
                surface.close();
                break;
            }
            surface.set_query(query);
            let results = surface.results(self.workspace.search_sources());
            if results.is_empty() {
                pages::render_search_results(&mut self.out, surface.query(), &results)?;
                continue;
            }
            let labels: Vec<String> = results
                .iter()
                .map(|r| format!("{}  {}", r.title, r.subtitle.dimmed()))
                .collect();
            let picked = Select::new()
                .with_prompt("Open")
                .items(&labels)
                .default(0)
                .interact_opt()?;
            if let Some(index) = picked {
                let route = surface.select(&results[index]);
                info!(route = %route, "opening search result");
                self.open(route)?;
            }
        }
        Ok(())
    }

    fn profiles(&mut self, action: ProfileAction) -> ServiceResult<()> {
        let profiles = self.workspace.profiles();
        match action {
            ProfileAction::List => {
                if self.json {
                    return write_json(&mut self.out, profiles.items());
                }
                pages::render_profiles(&mut self.out, profiles.items())?;
                Ok(())
            }
            ProfileAction::Add(fields) => {
                let draft = CodingProfileDraft::from(fields);
                validate_profile(&draft)?;
                let added = profiles.add(draft)?;
                self.report("Added", &added)
            }
            ProfileAction::Edit { id, patch } => {
                let edited = profiles.patch(&id, |draft| {
                    patch.apply(draft);
                    validate_profile(draft)
                })?;
                self.report("Updated", &edited)
            }
            ProfileAction::Delete { id } => {
                let removed = profiles.delete(&id)?;
                self.report("Deleted", &removed)
            }
        }
    }

    fn pdfs(&mut self, action: PdfAction) -> ServiceResult<()> {
        match action {
            PdfAction::List { category, subject } => {
                let pdfs: Vec<_> = self
                    .workspace
                    .pdfs()
                    .items()
                    .iter()
                    .filter(|pdf| category.is_none_or(|c| pdf.category == c))
                    .filter(|pdf| {
                        subject.as_deref().is_none_or(|s| {
                            pdf.subject
                                .as_deref()
                                .is_some_and(|own| own.eq_ignore_ascii_case(s))
                        })
                    })
                    .cloned()
                    .collect();
                if self.json {
                    return write_json(&mut self.out, &pdfs);
                }
                pages::render_pdf_list(&mut self.out, &pdfs)?;
                Ok(())
            }
            PdfAction::Add(fields) => {
                let (url, file_name) = resolve_source(fields.source)?;
                let name = pick_name(fields.name, file_name)?;
                let added = self.workspace.resume_book().add_pdf(PdfResourceDraft {
                    name,
                    category: fields.category,
                    subject: fields.subject,
                    url,
                })?;
                self.report("Added", &added)
            }
            PdfAction::Edit { id, patch } => {
                let edited = self.workspace.resume_book().patch_pdf(&id, |draft| {
                    patch.apply(draft);
                    require("name", &draft.name)?;
                    require("url", &draft.url)
                })?;
                self.report("Updated", &edited)
            }
            PdfAction::Delete { id } => {
                let removed = self.workspace.resume_book().delete_pdf(&id)?;
                self.report("Deleted", &removed)
            }
            PdfAction::Export { id, out } => {
                let pdf = self
                    .workspace
                    .pdfs()
                    .get(&id)
                    .cloned()
                    .ok_or_else(|| WorkspaceError::not_found("PDF resource", &id))?;
                if PdfLocation::classify(&pdf.url) != PdfLocation::Embedded {
                    return Err(ServiceError::FromString(format!(
                        "{} is not an uploaded file; open {} instead",
                        pdf.name, pdf.url
                    )));
                }
                let bytes = decode_data_url(&pdf.url)?;
                fs::write(&out, &bytes)?;
                info!(id = %id, path = %out.display(), bytes = bytes.len(), "exported PDF");
                if self.json {
                    return write_json(&mut self.out, &json!({ "id": id, "path": out, "bytes": bytes.len() }));
                }
                writeln!(self.out, "{} {} to {}", "Exported".green(), pdf.name, out.display())?;
                Ok(())
            }
            PdfAction::Subjects => {
                let subjects = self.workspace.note_subjects();
                if self.json {
                    return write_json(&mut self.out, &subjects);
                }
                for subject in subjects {
                    writeln!(self.out, "{subject}")?;
                }
                Ok(())
            }
        }
    }

    fn interviews(&mut self, action: InterviewAction) -> ServiceResult<()> {
        let interviews = self.workspace.interviews();
        match action {
            InterviewAction::List { result } => {
                let items: Vec<_> = interviews
                    .items()
                    .iter()
                    .filter(|exp| result.is_none_or(|r| exp.result == r))
                    .cloned()
                    .collect();
                if self.json {
                    return write_json(&mut self.out, &items);
                }
                pages::render_interviews(&mut self.out, &items)?;
                Ok(())
            }
            InterviewAction::Add(fields) => {
                let draft = InterviewExperienceDraft::from(fields);
                validate_interview(&draft)?;
                let added = interviews.add(draft)?;
                self.report("Added", &added)
            }
            InterviewAction::Edit { id, patch } => {
                let edited = interviews.patch(&id, |draft| {
                    patch.apply(draft);
                    validate_interview(draft)
                })?;
                self.report("Updated", &edited)
            }
            InterviewAction::Delete { id } => {
                let removed = interviews.delete(&id)?;
                self.report("Deleted", &removed)
            }
        }
    }

    fn projects(&mut self, action: ProjectAction) -> ServiceResult<()> {
        let projects = self.workspace.projects();
        match action {
            ProjectAction::List => {
                if self.json {
                    return write_json(&mut self.out, projects.items());
                }
                pages::render_projects(&mut self.out, projects.items())?;
                Ok(())
            }
            ProjectAction::Add(fields) => {
                let draft = ProjectDraft::from(fields);
                require("name", &draft.name)?;
                let added = projects.add(draft)?;
                self.report("Added", &added)
            }
            ProjectAction::Edit { id, patch } => {
                let edited = projects.patch(&id, |draft| {
                    patch.apply(draft);
                    require("name", &draft.name)
                })?;
                self.report("Updated", &edited)
            }
            ProjectAction::Delete { id } => {
                let removed = projects.delete(&id)?;
                self.report("Deleted", &removed)
            }
        }
    }

    fn resume(&mut self, action: ResumeAction) -> ServiceResult<()> {
        match action {
            ResumeAction::List => {
                let book = self.workspace.resume_book();
                let primary = book.primary_resume().map(|r| r.id.clone());
                let resumes: Vec<_> = book.resumes().into_iter().cloned().collect();
                if self.json {
                    return write_json(&mut self.out, &json!({
                        "primaryResumeId": primary,
                        "resumes": resumes,
                    }));
                }
                let refs: Vec<_> = resumes.iter().collect();
                pages::render_resumes(&mut self.out, &refs, primary.as_deref())?;
                Ok(())
            }
            ResumeAction::Add { name, source } => {
                let (url, file_name) = resolve_source(source)?;
                let name = pick_name(name, file_name)?;
                let added = self.workspace.resume_book().add_resume(name, url)?;
                self.report("Added", &added)
            }
            ResumeAction::Delete { id } => {
                let removed = self.workspace.resume_book().delete_resume(&id)?;
                self.report("Deleted", &removed)
            }
            ResumeAction::Primary { id } => {
                self.workspace.resume_book().set_primary(&id)?;
                if self.json {
                    return write_json(&mut self.out, &json!({ "primaryResumeId": id }));
                }
                writeln!(self.out, "{} {id}", "Primary resume set to".green())?;
                Ok(())
            }
        }
    }

    fn company(&mut self, action: CompanyAction) -> ServiceResult<()> {
        let preps = self.workspace.company_prep();
        match action {
            CompanyAction::List => {
                if self.json {
                    return write_json(&mut self.out, preps.items());
                }
                pages::render_company_prep(&mut self.out, preps.items())?;
                Ok(())
            }
            CompanyAction::Add(fields) => {
                let draft = CompanyPrepDraft::from(fields);
                require("company", &draft.company)?;
                let added = preps.add(draft)?;
                self.report("Added", &added)
            }
            CompanyAction::Edit { id, patch } => {
                let edited = preps.patch(&id, |draft| {
                    patch.apply(draft);
                    require("company", &draft.company)
                })?;
                self.report("Updated", &edited)
            }
            CompanyAction::Delete { id } => {
                let removed = preps.delete(&id)?;
                self.report("Deleted", &removed)
            }
        }
    }

    fn hr(&mut self, action: HrAction) -> ServiceResult<()> {
        match action {
            HrAction::List { category } => {
                let counts = self.workspace.question_counts();
                let questions: Vec<_> = match category {
                    Some(category) => self.workspace.questions_in(category),
                    None => self.workspace.hr_questions().items().to_vec(),
                };
                if self.json {
                    return write_json(&mut self.out, &json!({ "counts": counts, "questions": questions }));
                }
                pages::render_questions(&mut self.out, &counts, &questions)?;
                Ok(())
            }
            HrAction::Add(fields) => {
                let draft = HrQuestionDraft::from(fields);
                require("question", &draft.question)?;
                let added = self.workspace.hr_questions().add(draft)?;
                self.report("Added", &added)
            }
            HrAction::Edit { id, patch } => {
                let edited = self.workspace.hr_questions().patch(&id, |draft| {
                    patch.apply(draft);
                    require("question", &draft.question)
                })?;
                self.report("Updated", &edited)
            }
            HrAction::Delete { id } => {
                let removed = self.workspace.hr_questions().delete(&id)?;
                self.report("Deleted", &removed)
            }
        }
    }

    fn config(&mut self, action: ConfigAction) -> ServiceResult<()> {
        match action {
            ConfigAction::Show => {
                let text = serde_json::to_string_pretty(&self.settings)?;
                writeln!(self.out, "{text}")?;
            }
            ConfigAction::Path => {
                writeln!(self.out, "{}", self.settings_path.display())?;
            }
            ConfigAction::Edit => {
                let edited = prompt_settings(&self.settings)?;
                let save = Confirm::new()
                    .with_prompt(format!("Save to {}?", self.settings_path.display()))
                    .default(true)
                    .interact()?;
                if save {
                    edited.save(&self.settings_path)?;
                    info!(path = %self.settings_path.display(), "saved settings");
                    self.settings = edited;
                    writeln!(self.out, "{}", "Settings saved".green())?;
                }
            }
        }
        Ok(())
    }

    fn report<E: Entity>(&mut self, verb: &str, record: &E) -> ServiceResult<()> {
        if self.json {
            return write_json(&mut self.out, record);
        }
        writeln!(
            self.out,
            "{} {} {}",
            verb.green(),
            E::KIND.to_lowercase(),
            record.id().bold()
        )?;
        Ok(())
    }
}

fn write_json<T: Serialize + ?Sized>(out: &mut dyn Write, value: &T) -> ServiceResult<()> {
    let text = serde_json::to_string_pretty(value)?;
    writeln!(out, "{text}")?;
    Ok(())
}

fn require(field: &'static str, value: &str) -> WorkspaceResult<()> {
    if value.trim().is_empty() {
        return Err(WorkspaceError::InvalidInput {
            field,
            reason: "must not be empty".to_string(),
        });
    }
    Ok(())
}

fn validate_profile(draft: &CodingProfileDraft) -> WorkspaceResult<()> {
    require("name", &draft.name)?;
    require("platform", &draft.platform)?;
    require("url", &draft.url)
}

fn validate_interview(draft: &InterviewExperienceDraft) -> WorkspaceResult<()> {
    require("company", &draft.company)?;
    require("role", &draft.role)
}

/// The stored URL, plus a default name when the source is a local file.
fn resolve_source(source: SourceArgs) -> WorkspaceResult<(String, Option<String>)> {
    match (source.url, source.file) {
        (_, Some(path)) => {
            let attachment = read_file_as_data_url(&path)?;
            debug!(path = %path.display(), "embedded file");
            Ok((attachment.data_url, Some(attachment.name)))
        }
        (Some(url), None) => {
            require("url", &url)?;
            Ok((url, None))
        }
        (None, None) => Err(WorkspaceError::InvalidInput {
            field: "url",
            reason: "pass --url or --file".to_string(),
        }),
    }
}

fn pick_name(given: Option<String>, from_file: Option<String>) -> WorkspaceResult<String> {
    let name = given
        .filter(|n| !n.trim().is_empty())
        .or(from_file)
        .unwrap_or_default();
    require("name", &name)?;
    Ok(name)
}

fn prompt_settings(current: &Settings) -> ServiceResult<Settings> {
    let data_dir: String = Input::new()
        .with_prompt("Data directory (empty for default)")
        .with_initial_text(
            current
                .data_dir
                .as_ref()
                .map(|d| d.display().to_string())
                .unwrap_or_default(),
        )
        .allow_empty(true)
        .interact_text()?;
    let log_filter: String = Input::new()
        .with_prompt("Log filter")
        .default(current.log_filter.clone())
        .interact_text()?;
    let quota: String = Input::new()
        .with_prompt("Storage quota in bytes (empty for none)")
        .with_initial_text(current.quota_bytes.map(|q| q.to_string()).unwrap_or_default())
        .allow_empty(true)
        .validate_with(|input: &String| -> Result<(), String> {
            if input.trim().is_empty() || input.trim().parse::<u64>().is_ok() {
                Ok(())
            } else {
                Err("Enter a whole number of bytes".to_string())
            }
        })
        .interact_text()?;

    let mut progress = current.progress.clone();
    for (label, slot) in [
        ("Coding profiles target", &mut progress.coding_profiles),
        ("DSA sheets target", &mut progress.dsa_pdfs),
        ("Subject notes target", &mut progress.notes),
        ("Interview experiences target", &mut progress.interviews),
        ("Projects target", &mut progress.projects),
        ("HR answers target", &mut progress.hr_questions),
        ("Companies target", &mut progress.company_prep),
    ] {
        *slot = Input::new()
            .with_prompt(label)
            .default(*slot)
            .interact_text()?;
    }

    let data_dir = data_dir.trim();
    Ok(Settings {
        data_dir: (!data_dir.is_empty()).then(|| PathBuf::from(data_dir)),
        log_filter,
        quota_bytes: quota.trim().parse().ok(),
        progress,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::cli::{PdfFields, PdfPatch, ProfileFields, ProfilePatch};
    use crate::storage::MemoryStorage;
    use crate::types::PdfCategory;
    use std::sync::Arc;

    fn handler() -> Handler<Vec<u8>> {
        colored::control::set_override(false);
        let workspace = Workspace::new(Arc::new(MemoryStorage::new()));
        Handler::new(workspace, Settings::default(), PathBuf::from("settings.json"), Vec::new())
    }

    fn output(handler: Handler<Vec<u8>>) -> String {
        String::from_utf8(handler.into_output()).unwrap()
    }

    fn leetcode() -> ProfileFields {
        ProfileFields {
            name: "My LeetCode".into(),
            platform: "LeetCode".into(),
            url: "https://leetcode.com/u".into(),
            icon: None,
        }
    }

    #[test]
    fn test_profile_lifecycle() {
        let mut handler = handler();
        handler
            .run(Command::Profiles(ProfileAction::Add(leetcode())))
            .unwrap();
        let id = handler.workspace().profiles().items()[0].id.clone();
        handler
            .run(Command::Profiles(ProfileAction::Edit {
                id: id.clone(),
                patch: ProfilePatch {
                    name: Some("Main LeetCode".into()),
                    ..Default::default()
                },
            }))
            .unwrap();
        assert_eq!(handler.workspace().profiles().items()[0].name, "Main LeetCode");

        handler
            .run(Command::Profiles(ProfileAction::Delete { id }))
            .unwrap();
        assert!(handler.workspace().profiles().is_empty());
        let out = output(handler);
        assert!(out.contains("Added coding profile"));
        assert!(out.contains("Deleted coding profile"));
    }

    #[test]
    fn test_blank_required_field_is_rejected() {
        let mut handler = handler();
        let err = handler
            .run(Command::Profiles(ProfileAction::Add(ProfileFields {
                name: "  ".into(),
                ..leetcode()
            })))
            .unwrap_err();
        assert!(err.to_string().contains("Invalid name"));
        assert!(handler.workspace().profiles().is_empty());
    }

    #[test]
    fn test_resume_category_pdf_goes_through_resume_book() {
        let mut handler = handler();
        handler
            .run(Command::Pdfs(PdfAction::Add(PdfFields {
                name: Some("SDE resume".into()),
                category: PdfCategory::Resume,
                subject: None,
                source: SourceArgs {
                    url: Some("https://drive.example/cv.pdf".into()),
                    file: None,
                },
            })))
            .unwrap();
        let id = handler.workspace().pdfs().items()[0].id.clone();
        assert_eq!(
            handler.workspace().resume_book().primary_id(),
            Some(id.as_str())
        );

        handler.run(Command::Pdfs(PdfAction::Delete { id })).unwrap();
        assert_eq!(handler.workspace().resume_book().primary_id(), None);
    }

    fn resume_fields(name: &str) -> PdfFields {
        PdfFields {
            name: Some(name.into()),
            category: PdfCategory::Resume,
            subject: None,
            source: SourceArgs {
                url: Some("https://drive.example/cv.pdf".into()),
                file: None,
            },
        }
    }

    #[test]
    fn test_editing_primary_out_of_resumes_moves_pointer() {
        let mut handler = handler();
        for name in ["SDE resume", "ML resume"] {
            handler
                .run(Command::Pdfs(PdfAction::Add(resume_fields(name))))
                .unwrap();
        }
        let items = handler.workspace().pdfs().items().to_vec();
        let (first, second) = (items[0].id.clone(), items[1].id.clone());
        assert_eq!(handler.workspace().resume_book().primary_id(), Some(first.as_str()));

        handler
            .run(Command::Pdfs(PdfAction::Edit {
                id: first,
                patch: PdfPatch {
                    category: Some(PdfCategory::Dsa),
                    ..Default::default()
                },
            }))
            .unwrap();
        let workspace = handler.workspace();
        let book = workspace.resume_book();
        assert_eq!(book.primary_id(), Some(second.as_str()));
        assert!(book.primary_resume().is_some());
    }

    #[test]
    fn test_editing_pdf_into_first_resume_makes_it_primary() {
        let mut handler = handler();
        handler
            .run(Command::Pdfs(PdfAction::Add(PdfFields {
                category: PdfCategory::Dsa,
                ..resume_fields("Striver Sheet")
            })))
            .unwrap();
        let id = handler.workspace().pdfs().items()[0].id.clone();
        assert_eq!(handler.workspace().resume_book().primary_id(), None);

        handler
            .run(Command::Pdfs(PdfAction::Edit {
                id: id.clone(),
                patch: PdfPatch {
                    category: Some(PdfCategory::Resume),
                    ..Default::default()
                },
            }))
            .unwrap();
        assert_eq!(handler.workspace().resume_book().primary_id(), Some(id.as_str()));
    }

    #[test]
    fn test_export_writes_embedded_file() {
        let dir = tempfile::tempdir().unwrap();
        let source = dir.path().join("Striver Sheet.pdf");
        fs::write(&source, b"%PDF-1.4 sheet").unwrap();

        let mut handler = handler();
        handler
            .run(Command::Pdfs(PdfAction::Add(PdfFields {
                name: None,
                category: PdfCategory::Dsa,
                subject: None,
                source: SourceArgs {
                    url: None,
                    file: Some(source),
                },
            })))
            .unwrap();
        let pdf = handler.workspace().pdfs().items()[0].clone();
        assert_eq!(pdf.name, "Striver Sheet");

        let out = dir.path().join("copy.pdf");
        handler
            .run(Command::Pdfs(PdfAction::Export {
                id: pdf.id,
                out: out.clone(),
            }))
            .unwrap();
        assert_eq!(fs::read(out).unwrap(), b"%PDF-1.4 sheet");
    }

    #[test]
    fn test_json_search_output() {
        let mut handler = handler().with_json(true);
        handler
            .run(Command::Profiles(ProfileAction::Add(leetcode())))
            .unwrap();
        let before = handler.out.len();
        handler
            .run(Command::Search(SearchArgs {
                query: Some("leet".into()),
                interactive: false,
            }))
            .unwrap();
        let text = String::from_utf8(handler.into_output()[before..].to_vec()).unwrap();
        let value: serde_json::Value = serde_json::from_str(&text).unwrap();
        assert_eq!(value[0]["kind"], "profile");
        assert_eq!(value[0]["route"], "/coding-profiles");
    }

    #[test]
    fn test_unknown_path_renders_not_found() {
        let mut handler = handler();
        handler
            .run(Command::Open {
                path: "/nowhere".into(),
            })
            .unwrap();
        assert!(output(handler).contains("404"));
    }
}
