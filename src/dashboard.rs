use serde::Serialize;

use crate::config::ProgressTargets;
use crate::navigation::Route;
use crate::types::{
    CodingProfile, CompanyPrep, Entity, HrQuestion, InterviewExperience, PdfCategory, PdfResource,
    Project,
};
use crate::workspace::Workspace;

/// The collection a dashboard card counts.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub enum CardSource {
    Profiles,
    Pdfs,
    Interviews,
    Projects,
    CompanyPrep,
    HrQuestions,
}

impl CardSource {
    pub fn storage_key(self) -> &'static str {
        match self {
            CardSource::Profiles => CodingProfile::STORAGE_KEY,
            CardSource::Pdfs => PdfResource::STORAGE_KEY,
            CardSource::Interviews => InterviewExperience::STORAGE_KEY,
            CardSource::Projects => Project::STORAGE_KEY,
            CardSource::CompanyPrep => CompanyPrep::STORAGE_KEY,
            CardSource::HrQuestions => HrQuestion::STORAGE_KEY,
        }
    }
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
pub struct CategoryCard {
    pub title: &'static str,
    pub description: &'static str,
    #[serde(serialize_with = "serialize_route")]
    pub route: Route,
    pub source: CardSource,
    pub storage_key: &'static str,
    pub count: usize,
}

fn serialize_route<S: serde::Serializer>(route: &Route, s: S) -> Result<S::Ok, S::Error> {
    s.serialize_str(route.path())
}

const CARDS: [(Route, &str, CardSource); 8] = [
    (
        Route::CodingProfiles,
        "Store and access your LeetCode, GFG, CodeChef profiles",
        CardSource::Profiles,
    ),
    (
        Route::DsaPdfs,
        "Your collection of DSA sheets and problem sets",
        CardSource::Pdfs,
    ),
    (
        Route::Notes,
        "Subject-wise notes for technical interviews",
        CardSource::Pdfs,
    ),
    (
        Route::Interviews,
        "Document and learn from interview experiences",
        CardSource::Interviews,
    ),
    (
        Route::Projects,
        "Showcase your best projects and tech stack",
        CardSource::Projects,
    ),
    (
        Route::Resume,
        "Keep your latest resume ready and accessible",
        CardSource::Pdfs,
    ),
    (
        Route::CompanyPrep,
        "Company-specific preparation and resources",
        CardSource::CompanyPrep,
    ),
    (
        Route::HrQna,
        "Common questions and best answers",
        CardSource::HrQuestions,
    ),
];

#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
pub struct QuickStats {
    pub profiles: usize,
    pub pdfs: usize,
    pub interviews: usize,
    pub projects: usize,
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
pub struct ProgressItem {
    pub label: &'static str,
    pub current: u32,
    pub target: u32,
}

impl ProgressItem {
    /// Percentage towards the target, capped at 100.
    pub fn percent(&self) -> f64 {
        if self.target == 0 {
            return 0.0;
        }
        (f64::from(self.current) / f64::from(self.target) * 100.0).min(100.0)
    }

    pub fn is_complete(&self) -> bool {
        self.current >= self.target
    }
}

/// Overall readiness; progress beyond an item's target does not count.
pub fn overall_progress(items: &[ProgressItem]) -> u32 {
    let current: u64 = items
        .iter()
        .map(|item| u64::from(item.current.min(item.target)))
        .sum();
    let target: u64 = items.iter().map(|item| u64::from(item.target)).sum();
    if target == 0 {
        return 0;
    }
    (current as f64 / target as f64 * 100.0).round() as u32
}

#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct Dashboard {
    pub stats: QuickStats,
    pub cards: Vec<CategoryCard>,
    pub progress: Vec<ProgressItem>,
    pub overall_progress: u32,
}

impl Dashboard {
    pub fn build(workspace: &mut Workspace, targets: &ProgressTargets) -> Self {
        let stats = QuickStats {
            profiles: workspace.profiles().len(),
            pdfs: workspace.pdfs().len(),
            interviews: workspace.interviews().len(),
            projects: workspace.projects().len(),
        };
        let hr_questions = workspace.hr_questions().len();
        let company_prep = workspace.company_prep().len();

        // Every PDF page counts the whole PDF collection.
        let count_for = |source: CardSource| match source {
            CardSource::Profiles => stats.profiles,
            CardSource::Pdfs => stats.pdfs,
            CardSource::Interviews => stats.interviews,
            CardSource::Projects => stats.projects,
            CardSource::CompanyPrep => company_prep,
            CardSource::HrQuestions => hr_questions,
        };
        let cards = CARDS
            .iter()
            .map(|&(route, description, source)| CategoryCard {
                title: route.title(),
                description,
                route,
                source,
                storage_key: source.storage_key(),
                count: count_for(source),
            })
            .collect();

        let count = |n: usize| u32::try_from(n).unwrap_or(u32::MAX);
        let progress = vec![
            ProgressItem {
                label: "Coding profiles",
                current: count(stats.profiles),
                target: targets.coding_profiles,
            },
            ProgressItem {
                label: "DSA sheets",
                current: count(workspace.pdfs_in(PdfCategory::Dsa).len()),
                target: targets.dsa_pdfs,
            },
            ProgressItem {
                label: "Subject notes",
                current: count(workspace.pdfs_in(PdfCategory::Notes).len()),
                target: targets.notes,
            },
            ProgressItem {
                label: "Interview experiences",
                current: count(stats.interviews),
                target: targets.interviews,
            },
            ProgressItem {
                label: "Projects",
                current: count(stats.projects),
                target: targets.projects,
            },
            ProgressItem {
                label: "HR & technical answers",
                current: count(hr_questions),
                target: targets.hr_questions,
            },
            ProgressItem {
                label: "Companies researched",
                current: count(company_prep),
                target: targets.company_prep,
            },
        ];
        let overall = overall_progress(&progress);

        Dashboard {
            stats,
            cards,
            progress,
            overall_progress: overall,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::storage::MemoryStorage;
    use crate::types::{
        CompanyPrepDraft, HrQuestionDraft, PdfResourceDraft, ProjectDraft, QuestionCategory,
    };
    use std::sync::Arc;

    fn item(current: u32, target: u32) -> ProgressItem {
        ProgressItem {
            label: "x",
            current,
            target,
        }
    }

    #[test]
    fn test_item_percent_is_capped() {
        assert_eq!(item(6, 3).percent(), 100.0);
        assert_eq!(item(1, 4).percent(), 25.0);
        assert_eq!(item(2, 0).percent(), 0.0);
        assert!(item(3, 3).is_complete());
    }

    #[test]
    fn test_overall_ignores_overshoot() {
        // (min(6,3) + 1) / (3 + 3) = 66.67%
        assert_eq!(overall_progress(&[item(6, 3), item(1, 3)]), 67);
        assert_eq!(overall_progress(&[]), 0);
        assert_eq!(overall_progress(&[item(5, 0)]), 0);
    }

    #[test]
    fn test_pdf_cards_count_the_whole_collection() {
        let mut workspace = Workspace::new(Arc::new(MemoryStorage::new()));
        for category in [PdfCategory::Dsa, PdfCategory::Notes] {
            workspace
                .pdfs()
                .add(PdfResourceDraft {
                    name: "sheet".into(),
                    category,
                    subject: None,
                    url: "#".into(),
                })
                .unwrap();
        }
        workspace
            .projects()
            .add(ProjectDraft {
                name: "Tracker".into(),
                ..Default::default()
            })
            .unwrap();

        let dashboard = Dashboard::build(&mut workspace, &ProgressTargets::default());
        assert_eq!(dashboard.stats.pdfs, 2);
        assert_eq!(dashboard.cards.len(), 8);
        let pdf_counts: Vec<_> = dashboard
            .cards
            .iter()
            .filter(|c| c.source == CardSource::Pdfs)
            .map(|c| c.count)
            .collect();
        assert_eq!(pdf_counts, [2, 2, 2]);
        let dsa = dashboard.progress.iter().find(|p| p.label == "DSA sheets").unwrap();
        assert_eq!(dsa.current, 1);
    }

    #[test]
    fn test_every_card_counts_its_own_collection() {
        let mut workspace = Workspace::new(Arc::new(MemoryStorage::new()));
        workspace
            .company_prep()
            .add(CompanyPrepDraft {
                company: "Google".into(),
                ..Default::default()
            })
            .unwrap();
        for question in ["Tell me about yourself", "Why us?"] {
            workspace
                .hr_questions()
                .add(HrQuestionDraft {
                    question: question.into(),
                    answer: "...".into(),
                    category: QuestionCategory::Hr,
                })
                .unwrap();
        }

        let dashboard = Dashboard::build(&mut workspace, &ProgressTargets::default());
        let count = |route: Route| {
            dashboard
                .cards
                .iter()
                .find(|c| c.route == route)
                .map(|c| c.count)
        };
        assert_eq!(count(Route::CompanyPrep), Some(1));
        assert_eq!(count(Route::HrQna), Some(2));
        assert_eq!(count(Route::Projects), Some(0));
        let keys: Vec<_> = dashboard.cards.iter().map(|c| c.storage_key).collect();
        assert_eq!(
            keys,
            [
                "codingProfiles",
                "pdfResources",
                "pdfResources",
                "interviewExperiences",
                "projects",
                "pdfResources",
                "companyPrep",
                "hrQuestions",
            ]
        );
    }
}
