//! Cross-collection search.
//!
//! A query is matched as a case-insensitive substring against a fixed set of
//! fields per kind. Collections are scanned in a fixed order (profiles, PDFs,
//! interviews, projects), each in its own order, and the combined list is cut
//! at [`MAX_RESULTS`]. Nothing is cached: every call rescans the snapshots it
//! is given, which is fine for the tens of records a workspace holds.

use serde::Serialize;

use crate::navigation::Route;
use crate::types::{CodingProfile, InterviewExperience, PdfResource, Project};

pub const MAX_RESULTS: usize = 10;

#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum ResultKind {
    Profile,
    Pdf,
    Interview,
    Project,
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
pub struct SearchResult {
    pub id: String,
    pub kind: ResultKind,
    pub title: String,
    pub subtitle: String,
    #[serde(serialize_with = "serialize_route")]
    pub route: Route,
}

fn serialize_route<S: serde::Serializer>(route: &Route, s: S) -> Result<S::Ok, S::Error> {
    s.serialize_str(route.path())
}

/// Snapshots of the indexed collections.
#[derive(Clone, Copy, Debug, Default)]
pub struct SearchSources<'a> {
    pub profiles: &'a [CodingProfile],
    pub pdfs: &'a [PdfResource],
    pub interviews: &'a [InterviewExperience],
    pub projects: &'a [Project],
}

struct Matcher {
    needle: String,
}

impl Matcher {
    fn new(query: &str) -> Option<Self> {
        if query.trim().is_empty() {
            return None;
        }
        Some(Self {
            needle: query.to_lowercase(),
        })
    }

    fn any(&self, fields: &[&str]) -> bool {
        fields
            .iter()
            .any(|field| field.to_lowercase().contains(&self.needle))
    }
}

pub fn search(query: &str, sources: SearchSources<'_>) -> Vec<SearchResult> {
    let Some(matcher) = Matcher::new(query) else {
        return Vec::new();
    };

    let profiles = sources
        .profiles
        .iter()
        .filter(|p| matcher.any(&[p.name.as_str(), p.platform.as_str()]))
        .map(|p| SearchResult {
            id: p.id.clone(),
            kind: ResultKind::Profile,
            title: p.name.clone(),
            subtitle: p.platform.clone(),
            route: Route::CodingProfiles,
        });

    let pdfs = sources
        .pdfs
        .iter()
        .filter(|p| matcher.any(&[p.name.as_str(), p.category.as_str()]))
        .map(|p| SearchResult {
            id: p.id.clone(),
            kind: ResultKind::Pdf,
            title: p.name.clone(),
            subtitle: p.category.as_str().to_uppercase(),
            route: p.category.search_route(),
        });

    let interviews = sources
        .interviews
        .iter()
        .filter(|i| matcher.any(&[i.company.as_str(), i.role.as_str()]))
        .map(|i| SearchResult {
            id: i.id.clone(),
            kind: ResultKind::Interview,
            title: i.company.clone(),
            subtitle: i.role.clone(),
            route: Route::Interviews,
        });

    let projects = sources
        .projects
        .iter()
        .filter(|p| matcher.any(&[p.name.as_str(), p.description.as_str()]))
        .map(|p| SearchResult {
            id: p.id.clone(),
            kind: ResultKind::Project,
            title: p.name.clone(),
            subtitle: p.tech_stack.join(", "),
            route: Route::Projects,
        });

    profiles
        .chain(pdfs)
        .chain(interviews)
        .chain(projects)
        .take(MAX_RESULTS)
        .collect()
}

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct KeyEvent {
    pub key: char,
    pub ctrl: bool,
    /// Command on macOS.
    pub meta: bool,
}

impl KeyEvent {
    pub fn ctrl(key: char) -> Self {
        Self {
            key,
            ctrl: true,
            meta: false,
        }
    }

    fn is_search_shortcut(&self) -> bool {
        (self.ctrl || self.meta) && self.key.eq_ignore_ascii_case(&'k')
    }
}

/// State of the search overlay: whether it is shown and the query typed so far.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct SearchSurface {
    open: bool,
    query: String,
}

impl SearchSurface {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn is_open(&self) -> bool {
        self.open
    }

    pub fn query(&self) -> &str {
        &self.query
    }

    pub fn open(&mut self) {
        self.open = true;
    }

    /// Dismiss the overlay. The query typed so far is kept, as closing the
    /// overlay mid-typing has nothing to undo.
    pub fn close(&mut self) {
        self.open = false;
    }

    pub fn set_query(&mut self, query: impl Into<String>) {
        self.query = query.into();
    }

    pub fn results(&self, sources: SearchSources<'_>) -> Vec<SearchResult> {
        search(&self.query, sources)
    }

    /// Ctrl/Cmd+K closes an open overlay. It never opens one; returns whether
    /// the event was consumed.
    pub fn handle_key(&mut self, event: KeyEvent) -> bool {
        if !event.is_search_shortcut() {
            return false;
        }
        if self.open {
            self.close();
        }
        true
    }

    /// Navigate to the hit's page, then close the overlay and clear the query.
    pub fn select(&mut self, result: &SearchResult) -> Route {
        let route = result.route;
        self.close();
        self.query.clear();
        route
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::PdfCategory;

    fn profile(id: &str, name: &str, platform: &str) -> CodingProfile {
        CodingProfile {
            id: id.into(),
            name: name.into(),
            platform: platform.into(),
            url: "https://example.com".into(),
            icon: None,
            created_at: "2024-01-01T00:00:00.000Z".into(),
        }
    }

    fn pdf(id: &str, name: &str, category: PdfCategory) -> PdfResource {
        PdfResource {
            id: id.into(),
            name: name.into(),
            category,
            subject: None,
            url: "#".into(),
            created_at: "2024-01-01T00:00:00.000Z".into(),
        }
    }

    #[test]
    fn test_blank_query_returns_nothing() {
        let profiles = vec![profile("1", "Google Profile", "LeetCode")];
        let sources = SearchSources {
            profiles: &profiles,
            ..Default::default()
        };
        assert!(search("", sources).is_empty());
        assert!(search("   \t", sources).is_empty());
    }

    #[test]
    fn test_matches_name_case_insensitively() {
        let profiles = vec![profile("1", "Google Profile", "LeetCode")];
        let sources = SearchSources {
            profiles: &profiles,
            ..Default::default()
        };
        let hits = search("GOO", sources);
        assert_eq!(hits.len(), 1);
        assert_eq!(hits[0].title, "Google Profile");
        assert_eq!(hits[0].subtitle, "LeetCode");
        assert_eq!(hits[0].route, Route::CodingProfiles);
        assert!(search("amazon", sources).is_empty());
    }

    #[test]
    fn test_pdf_category_label_is_searchable_and_routes() {
        let pdfs = vec![
            pdf("1", "Striver Sheet", PdfCategory::Dsa),
            pdf("2", "OS Concepts", PdfCategory::Notes),
            pdf("3", "My Resume", PdfCategory::Resume),
        ];
        let sources = SearchSources {
            pdfs: &pdfs,
            ..Default::default()
        };
        let hits = search("dsa", sources);
        assert_eq!(hits.len(), 1);
        assert_eq!(hits[0].subtitle, "DSA");
        assert_eq!(hits[0].route, Route::DsaPdfs);

        let hits = search("resume", sources);
        assert_eq!(hits[0].route, Route::Notes);
    }

    #[test]
    fn test_shortcut_only_closes() {
        let mut surface = SearchSurface::new();
        assert!(surface.handle_key(KeyEvent::ctrl('k')));
        assert!(!surface.is_open());

        surface.open();
        let cmd_k = KeyEvent {
            key: 'K',
            ctrl: false,
            meta: true,
        };
        assert!(surface.handle_key(cmd_k));
        assert!(!surface.is_open());

        surface.open();
        assert!(!surface.handle_key(KeyEvent { key: 'k', ..Default::default() }));
        assert!(surface.is_open());
    }

    #[test]
    fn test_select_closes_and_clears() {
        let profiles = vec![profile("1", "LeetCode Profile", "LeetCode")];
        let mut surface = SearchSurface::new();
        surface.open();
        surface.set_query("leet");
        let hits = surface.results(SearchSources {
            profiles: &profiles,
            ..Default::default()
        });
        let route = surface.select(&hits[0]);
        assert_eq!(route, Route::CodingProfiles);
        assert!(!surface.is_open());
        assert_eq!(surface.query(), "");
    }
}
