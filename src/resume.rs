//! Resume page logic: resumes are PDF resources of category `resume`, and one
//! of them may be marked primary through the `primaryResumeId` key.
//!
//! The pointer lives under its own key and is written separately from the PDF
//! list, so it can dangle after an interrupted delete. A pointer that matches
//! no resume is read as "no primary", and the next change made through the
//! book moves it to the first resume.

use tracing::info;

use crate::collections::Collection;
use crate::error::{WorkspaceError, WorkspaceResult};
use crate::storage::StorageError;
use crate::store::PersistentCell;
use crate::types::{PdfCategory, PdfResource, PdfResourceDraft};

pub const PRIMARY_RESUME_KEY: &str = "primaryResumeId";

pub struct ResumeBook<'a> {
    pdfs: &'a mut Collection<PdfResource>,
    primary: &'a mut PersistentCell<Option<String>>,
}

impl<'a> ResumeBook<'a> {
    pub fn new(
        pdfs: &'a mut Collection<PdfResource>,
        primary: &'a mut PersistentCell<Option<String>>,
    ) -> Self {
        Self { pdfs, primary }
    }

    pub fn resumes(&self) -> Vec<&PdfResource> {
        self.pdfs
            .items()
            .iter()
            .filter(|pdf| pdf.category == PdfCategory::Resume)
            .collect()
    }

    /// The raw pointer as stored, which may not resolve.
    pub fn primary_id(&self) -> Option<&str> {
        self.primary.get().as_deref()
    }

    pub fn primary_resume(&self) -> Option<&PdfResource> {
        let id = self.primary_id()?;
        self.resumes().into_iter().find(|r| r.id == id)
    }

    /// Add a resume; the first one becomes primary.
    pub fn add_resume(&mut self, name: String, url: String) -> WorkspaceResult<PdfResource> {
        self.add_pdf(PdfResourceDraft {
            name,
            category: PdfCategory::Resume,
            subject: None,
            url,
        })
    }

    /// Add a PDF of any category. A resume added while none exist becomes
    /// primary.
    pub fn add_pdf(&mut self, draft: PdfResourceDraft) -> WorkspaceResult<PdfResource> {
        let added = self.pdfs.add(draft);
        let synced = self.sync_primary();
        let added = added?;
        synced?;
        Ok(added)
    }

    /// Edit a PDF. Moving the primary resume out of the resume category
    /// hands the pointer to the first remaining resume.
    pub fn patch_pdf(
        &mut self,
        id: &str,
        f: impl FnOnce(&mut PdfResourceDraft) -> WorkspaceResult<()>,
    ) -> WorkspaceResult<PdfResource> {
        let edited = self.pdfs.patch(id, f);
        let synced = self.sync_primary();
        let edited = edited?;
        synced?;
        Ok(edited)
    }

    /// Delete a resume. Deleting the primary moves the pointer to the first
    /// remaining resume, or clears it when none is left.
    pub fn delete_resume(&mut self, id: &str) -> WorkspaceResult<PdfResource> {
        if !self.resumes().iter().any(|r| r.id == id) {
            return Err(WorkspaceError::not_found("Resume", id));
        }
        self.delete_pdf(id)
    }

    pub fn delete_pdf(&mut self, id: &str) -> WorkspaceResult<PdfResource> {
        let removed = self.pdfs.delete(id);
        let synced = self.sync_primary();
        let removed = removed?;
        synced?;
        Ok(removed)
    }

    pub fn set_primary(&mut self, id: &str) -> WorkspaceResult<()> {
        if !self.resumes().iter().any(|r| r.id == id) {
            return Err(WorkspaceError::not_found("Resume", id));
        }
        self.primary.set(Some(id.to_string()))?;
        Ok(())
    }

    /// Point at the first resume when the pointer no longer resolves.
    ///
    /// Runs against the in-memory list even when the PDF write before it was
    /// rejected, so the session stays consistent.
    fn sync_primary(&mut self) -> Result<(), StorageError> {
        if self.primary_resume().is_some() {
            return Ok(());
        }
        let next = self.resumes().first().map(|r| r.id.clone());
        if next.as_deref() == self.primary_id() {
            return Ok(());
        }
        info!(previous = ?self.primary_id(), next = ?next, "primary resume moved");
        match next {
            Some(id) => self.primary.set(Some(id)),
            None => self.primary.reset(),
        }
    }
}
