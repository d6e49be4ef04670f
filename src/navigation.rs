use std::fmt;

use crate::types::PdfCategory;

/// Pages of the workspace. Any unknown path resolves to [`Route::NotFound`].
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum Route {
    Dashboard,
    CodingProfiles,
    DsaPdfs,
    Notes,
    Interviews,
    Projects,
    Resume,
    CompanyPrep,
    HrQna,
    NotFound,
}

impl Route {
    pub const PAGES: [Route; 9] = [
        Route::Dashboard,
        Route::CodingProfiles,
        Route::DsaPdfs,
        Route::Notes,
        Route::Interviews,
        Route::Projects,
        Route::Resume,
        Route::CompanyPrep,
        Route::HrQna,
    ];

    pub fn path(&self) -> &'static str {
        match self {
            Route::Dashboard => "/",
            Route::CodingProfiles => "/coding-profiles",
            Route::DsaPdfs => "/dsa-pdfs",
            Route::Notes => "/notes",
            Route::Interviews => "/interviews",
            Route::Projects => "/projects",
            Route::Resume => "/resume",
            Route::CompanyPrep => "/company-prep",
            Route::HrQna => "/hr-qna",
            Route::NotFound => "*",
        }
    }

    pub fn title(&self) -> &'static str {
        match self {
            Route::Dashboard => "My Placement Workspace",
            Route::CodingProfiles => "Coding Profiles",
            Route::DsaPdfs => "DSA PDFs",
            Route::Notes => "Subject Notes",
            Route::Interviews => "Interview Experiences",
            Route::Projects => "Projects",
            Route::Resume => "Resume",
            Route::CompanyPrep => "Company Prep",
            Route::HrQna => "HR & Technical QnA",
            Route::NotFound => "Page not found",
        }
    }

    /// Accepts paths with or without the leading slash and ignores a
    /// trailing one, so `notes`, `/notes` and `/notes/` are the same page.
    pub fn from_path(path: &str) -> Route {
        let trimmed = path.trim().trim_end_matches('/');
        let normalized = trimmed.strip_prefix('/').unwrap_or(trimmed);
        if normalized.is_empty() {
            return Route::Dashboard;
        }
        Route::PAGES
            .into_iter()
            .find(|route| route.path().trim_start_matches('/') == normalized)
            .unwrap_or(Route::NotFound)
    }
}

impl fmt::Display for Route {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.path())
    }
}

impl PdfCategory {
    /// Page a PDF search hit opens: DSA sheets have their own page, every
    /// other category is shown with the notes.
    pub fn search_route(&self) -> Route {
        match self {
            PdfCategory::Dsa => Route::DsaPdfs,
            PdfCategory::Notes | PdfCategory::Resume | PdfCategory::Company | PdfCategory::Other => {
                Route::Notes
            }
        }
    }
}
