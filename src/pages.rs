//! Terminal rendering of each page as a list of cards.

use colored::Colorize;
use std::collections::BTreeMap;
use std::io::{self, Write};

use crate::attachment::PdfLocation;
use crate::config::ProgressTargets;
use crate::dashboard::Dashboard;
use crate::navigation::Route;
use crate::search::SearchResult;
use crate::types::{
    CodingProfile, CompanyPrep, Entity, HrQuestion, InterviewExperience, InterviewResult,
    PdfCategory, PdfResource, Project, QuestionCategory,
};
use crate::workspace::Workspace;

pub fn render_route(
    out: &mut dyn Write,
    workspace: &mut Workspace,
    route: Route,
    targets: &ProgressTargets,
) -> io::Result<()> {
    match route {
        Route::Dashboard => render_dashboard(out, &Dashboard::build(workspace, targets)),
        Route::CodingProfiles => render_profiles(out, workspace.profiles().items()),
        Route::DsaPdfs => render_pdfs(out, Route::DsaPdfs, &workspace.pdfs_in(PdfCategory::Dsa)),
        Route::Notes => {
            let subjects = workspace.note_subjects();
            render_notes(out, &subjects, &workspace.pdfs_in(PdfCategory::Notes))
        }
        Route::Interviews => render_interviews(out, workspace.interviews().items()),
        Route::Projects => render_projects(out, workspace.projects().items()),
        Route::Resume => {
            let book = workspace.resume_book();
            let primary = book.primary_resume().map(|r| r.id.as_str());
            render_resumes(out, &book.resumes(), primary)
        }
        Route::CompanyPrep => render_company_prep(out, workspace.company_prep().items()),
        Route::HrQna => {
            let counts = workspace.question_counts();
            render_questions(out, &counts, workspace.hr_questions().items())
        }
        Route::NotFound => render_not_found(out),
    }
}

fn header(out: &mut dyn Write, route: Route, subtitle: &str) -> io::Result<()> {
    writeln!(out, "{}", route.title().bold())?;
    writeln!(out, "{}", subtitle.dimmed())?;
    writeln!(out)
}

fn empty_state(out: &mut dyn Write, title: &str) -> io::Result<()> {
    writeln!(out, "  {}", title.italic())
}

fn id_line<E: Entity>(out: &mut dyn Write, record: &E) -> io::Result<()> {
    writeln!(out, "    {} {}", record.id().dimmed(), record.created_at().dimmed())
}

pub fn render_dashboard(out: &mut dyn Write, dashboard: &Dashboard) -> io::Result<()> {
    header(out, Route::Dashboard, "Your Personal Placement Hub")?;
    let stats = &dashboard.stats;
    writeln!(
        out,
        "  {} Profiles   {} PDFs   {} Interviews   {} Projects",
        stats.profiles.to_string().green().bold(),
        stats.pdfs.to_string().green().bold(),
        stats.interviews.to_string().green().bold(),
        stats.projects.to_string().green().bold(),
    )?;
    writeln!(out)?;
    for card in &dashboard.cards {
        writeln!(
            out,
            "  {:<24} {:>3}  {}",
            card.title.bold(),
            card.count,
            card.route.path().cyan()
        )?;
        writeln!(out, "    {}", card.description.dimmed())?;
    }
    writeln!(out)?;
    writeln!(
        out,
        "{} {}%",
        "Preparation Progress".bold(),
        dashboard.overall_progress
    )?;
    for item in &dashboard.progress {
        let mark = if item.is_complete() {
            "✓".green()
        } else {
            "○".normal()
        };
        writeln!(
            out,
            "  {mark} {:<24} {}/{} ({:.0}%)",
            item.label,
            item.current,
            item.target,
            item.percent()
        )?;
    }
    if dashboard.overall_progress == 100 {
        writeln!(
            out,
            "  {}",
            "You're fully prepared! Keep practicing to stay sharp.".green()
        )?;
    }
    Ok(())
}

pub fn render_profiles(out: &mut dyn Write, profiles: &[CodingProfile]) -> io::Result<()> {
    header(
        out,
        Route::CodingProfiles,
        "Store and quickly access all your coding platform profiles",
    )?;
    if profiles.is_empty() {
        return empty_state(out, "No coding profiles yet");
    }
    for profile in profiles {
        writeln!(out, "  {} ({})", profile.name.bold(), profile.platform)?;
        writeln!(out, "    {}", profile.url.cyan())?;
        id_line(out, profile)?;
    }
    Ok(())
}

fn pdf_card(out: &mut dyn Write, pdf: &PdfResource) -> io::Result<()> {
    let location = match PdfLocation::classify(&pdf.url) {
        PdfLocation::External => pdf.url.cyan().to_string(),
        PdfLocation::Embedded => format!("uploaded file ({} bytes encoded)", pdf.url.len()),
        PdfLocation::Other => pdf.url.clone(),
    };
    match &pdf.subject {
        Some(subject) => writeln!(out, "  {} [{}]", pdf.name.bold(), subject)?,
        None => writeln!(out, "  {}", pdf.name.bold())?,
    }
    writeln!(out, "    {location}")?;
    id_line(out, pdf)
}

pub fn render_pdfs(out: &mut dyn Write, route: Route, pdfs: &[PdfResource]) -> io::Result<()> {
    header(out, route, "Your collection of DSA sheets and problem sets")?;
    if pdfs.is_empty() {
        return empty_state(out, "No DSA PDFs yet");
    }
    pdfs.iter().try_for_each(|pdf| pdf_card(out, pdf))
}

/// Filtered PDF listing outside of any page.
pub fn render_pdf_list(out: &mut dyn Write, pdfs: &[PdfResource]) -> io::Result<()> {
    if pdfs.is_empty() {
        return empty_state(out, "No PDFs found");
    }
    for pdf in pdfs {
        writeln!(out, "{}", pdf.category.as_str().to_uppercase().yellow())?;
        pdf_card(out, pdf)?;
    }
    Ok(())
}

pub fn render_notes(
    out: &mut dyn Write,
    subjects: &[String],
    notes: &[PdfResource],
) -> io::Result<()> {
    header(out, Route::Notes, "Subject-wise notes for technical interviews")?;
    if !subjects.is_empty() {
        writeln!(out, "  Subjects: {}", subjects.join(", ").yellow())?;
        writeln!(out)?;
    }
    if notes.is_empty() {
        return empty_state(out, "No subject notes yet");
    }
    notes.iter().try_for_each(|pdf| pdf_card(out, pdf))
}

fn result_badge(result: InterviewResult) -> colored::ColoredString {
    match result {
        InterviewResult::Selected => result.label().green(),
        InterviewResult::Rejected => result.label().red(),
        InterviewResult::Pending => result.label().yellow(),
    }
}

pub fn render_interviews(
    out: &mut dyn Write,
    interviews: &[InterviewExperience],
) -> io::Result<()> {
    header(
        out,
        Route::Interviews,
        "Document and learn from your interview journey",
    )?;
    if interviews.is_empty() {
        return empty_state(out, "No interview experiences yet");
    }
    for exp in interviews {
        writeln!(
            out,
            "  {} - {} [{}]",
            exp.company.bold(),
            exp.role,
            result_badge(exp.result)
        )?;
        if !exp.date.is_empty() {
            writeln!(out, "    Date: {}", exp.date)?;
        }
        if !exp.rounds.is_empty() {
            writeln!(out, "    Rounds: {}", exp.rounds)?;
        }
        if !exp.experience.is_empty() {
            writeln!(out, "    {}", exp.experience)?;
        }
        if let Some(tips) = &exp.tips {
            writeln!(out, "    Tips: {}", tips.italic())?;
        }
        id_line(out, exp)?;
    }
    Ok(())
}

pub fn render_projects(out: &mut dyn Write, projects: &[Project]) -> io::Result<()> {
    header(out, Route::Projects, "Showcase your best projects and tech stack")?;
    if projects.is_empty() {
        return empty_state(out, "No projects yet");
    }
    for project in projects {
        writeln!(out, "  {}", project.name.bold())?;
        if !project.description.is_empty() {
            writeln!(out, "    {}", project.description)?;
        }
        if !project.tech_stack.is_empty() {
            writeln!(out, "    Tech: {}", project.tech_stack.join(", ").yellow())?;
        }
        if let Some(url) = &project.github_url {
            writeln!(out, "    GitHub: {}", url.cyan())?;
        }
        if let Some(url) = &project.live_url {
            writeln!(out, "    Live: {}", url.cyan())?;
        }
        id_line(out, project)?;
    }
    Ok(())
}

pub fn render_resumes(
    out: &mut dyn Write,
    resumes: &[&PdfResource],
    primary_id: Option<&str>,
) -> io::Result<()> {
    header(out, Route::Resume, "Keep your latest resume ready and accessible")?;
    if resumes.is_empty() {
        return empty_state(out, "No resume uploaded yet");
    }
    for resume in resumes {
        if primary_id == Some(resume.id.as_str()) {
            writeln!(out, "  {}", "★ Primary".yellow().bold())?;
        }
        pdf_card(out, resume)?;
    }
    Ok(())
}

pub fn render_company_prep(out: &mut dyn Write, preps: &[CompanyPrep]) -> io::Result<()> {
    header(
        out,
        Route::CompanyPrep,
        "Company-specific preparation notes and resources",
    )?;
    if preps.is_empty() {
        return empty_state(out, "No company prep yet");
    }
    for prep in preps {
        writeln!(out, "  {}", prep.company.bold())?;
        if !prep.notes.is_empty() {
            writeln!(out, "    {}", prep.notes)?;
        }
        for resource in &prep.resources {
            writeln!(out, "    - {}", resource.cyan())?;
        }
        id_line(out, prep)?;
    }
    Ok(())
}

pub fn render_questions(
    out: &mut dyn Write,
    counts: &BTreeMap<&'static str, usize>,
    questions: &[HrQuestion],
) -> io::Result<()> {
    header(out, Route::HrQna, "Common questions and your best answers")?;
    for category in QuestionCategory::ALL {
        let count = counts.get(category.as_str()).copied().unwrap_or(0);
        let label = match category {
            QuestionCategory::Hr => "HR Questions",
            QuestionCategory::Technical => "Technical Questions",
        };
        writeln!(out, "{} ({count})", label.bold())?;
        let mut section = questions.iter().filter(|q| q.category == *category).peekable();
        if section.peek().is_none() {
            let empty = match category {
                QuestionCategory::Hr => "No HR questions yet",
                QuestionCategory::Technical => "No technical questions yet",
            };
            empty_state(out, empty)?;
        }
        for question in section {
            writeln!(out, "  Q: {}", question.question.bold())?;
            writeln!(out, "  A: {}", question.answer)?;
            id_line(out, question)?;
        }
        writeln!(out)?;
    }
    Ok(())
}

pub fn render_search_results(
    out: &mut dyn Write,
    query: &str,
    results: &[SearchResult],
) -> io::Result<()> {
    if query.trim().is_empty() {
        writeln!(out, "Start typing to search...")?;
        return writeln!(out, "{}", "Search across all your resources".dimmed());
    }
    if results.is_empty() {
        return writeln!(out, "No results found for \"{query}\"");
    }
    for result in results {
        writeln!(
            out,
            "  {:<30} {:<20} {}",
            result.title.bold(),
            result.subtitle,
            result.route.path().cyan()
        )?;
    }
    Ok(())
}

pub fn render_not_found(out: &mut dyn Write) -> io::Result<()> {
    writeln!(out, "{} {}", "404".red().bold(), Route::NotFound.title())?;
    writeln!(out, "Available pages:")?;
    for route in Route::PAGES {
        writeln!(out, "  {:<16} {}", route.path().cyan(), route.title())?;
    }
    Ok(())
}
