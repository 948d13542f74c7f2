//! Document stitcher - merges several documents into a new one.
//!
//! One request runs start to finish through [`DocumentStitcher::run`]:
//!
//! 1. read the selection (codes and model name),
//! 2. load the documents, dropping any whose currency or counterpart differs
//!    from the ones already accepted, and sort them oldest first,
//! 3. refuse duplicated submissions,
//! 4. when a target `status` was posted, collect the approved lines, hand them
//!    to the generator, close the source documents that are now fully served
//!    and point the caller at the first generated document.
//!
//! Business failures never surface as `Err`: they are written to the message
//! log and reflected in the returned [`StitchOutcome`].

use crate::{
    core::{
        document::{LoadedDocument, TransformableDocument, are_compatible, sort_chronologically},
        generator::{DocumentGenerator, GenerationProperties, GenerationResult},
        kind::{DocumentKind, document_url},
        messages::MessageLog,
        request::RequestParams,
        selector::select,
        status::{get_available_statuses, get_generate_class},
        token::MultiRequestProtection,
    },
    entities::{document, document_line, document_status},
    errors::Result,
};
use sea_orm::DatabaseConnection;
use std::collections::HashMap;
use tracing::{debug, error, info, instrument, warn};

/// Message key for a repeated `multireqtoken`
pub const DUPLICATED_REQUEST: &str = "duplicated-request";
/// Message key for a document rejected by the compatibility check
pub const INCOMPATIBLE_DOCUMENT: &str = "incompatible-document";
/// Message key for a failed generation
pub const RECORD_SAVE_ERROR: &str = "record-save-error";
/// Message key for a successful generation
pub const RECORD_UPDATED_CORRECTLY: &str = "record-updated-correctly";

/// How a request ended
#[derive(Debug, Clone, PartialEq)]
pub enum StitchOutcome {
    /// No target status was posted; documents were only loaded
    Viewed,
    /// The request token had already been used
    Duplicate,
    /// No document or no approved line was left to merge
    NothingToMerge,
    /// The target class could not be resolved or the generator failed
    GenerationFailed,
    /// New documents were generated
    Generated {
        /// Location of the first generated document
        redirect: Option<String>,
        /// Every generated document header
        documents: Vec<document::Model>,
    },
}

/// Lines picked for a merge, with the quantity approved for each
#[derive(Debug, Clone, PartialEq)]
pub struct MergePlan<'d> {
    /// Document whose header seeds the new document
    pub prototype: &'d LoadedDocument,
    /// Lines to carry over, in document then line order
    pub lines: Vec<document_line::Model>,
    /// Approved quantity per line id
    pub quantities: HashMap<i64, f64>,
}

/// Gathers the approved lines of `documents`.
///
/// A line approved with zero is left out unless its ordered quantity is also
/// zero, so users can merge only part of a document. Returns `None` when
/// there is nothing to merge.
pub fn collect_lines<F>(documents: &[LoadedDocument], approved: F) -> Option<MergePlan<'_>>
where
    F: Fn(i64) -> f64,
{
    let prototype = documents.first()?;
    let mut lines = Vec::new();
    let mut quantities = HashMap::new();

    for doc in documents {
        for line in doc.lines() {
            let quantity = approved(line.id);
            if quantity == 0.0 && line.quantity != 0.0 {
                continue;
            }

            quantities.insert(line.id, quantity);
            lines.push(line.clone());
        }
    }

    if lines.is_empty() {
        return None;
    }

    Some(MergePlan {
        prototype,
        lines,
        quantities,
    })
}

/// Request-scoped merge workflow
pub struct DocumentStitcher<'a> {
    db: &'a DatabaseConnection,
    tokens: &'a dyn MultiRequestProtection,
    generator: &'a dyn DocumentGenerator,
    /// Selected document codes
    pub codes: Vec<String>,
    /// Selected model name
    pub model_name: String,
    /// Accepted documents, oldest first once loaded
    pub documents: Vec<LoadedDocument>,
    /// Messages for the user
    pub log: MessageLog,
}

impl<'a> DocumentStitcher<'a> {
    /// Creates a stitcher over the given collaborators
    #[must_use]
    pub fn new(
        db: &'a DatabaseConnection,
        tokens: &'a dyn MultiRequestProtection,
        generator: &'a dyn DocumentGenerator,
    ) -> Self {
        Self {
            db,
            tokens,
            generator,
            codes: Vec::new(),
            model_name: String::new(),
            documents: Vec::new(),
            log: MessageLog::new(),
        }
    }

    /// Handles one request.
    #[instrument(skip_all)]
    pub async fn run(&mut self, params: &RequestParams) -> Result<StitchOutcome> {
        let selection = select(params);
        self.codes = selection.codes;
        self.model_name = selection.model_name;
        self.load_documents().await?;

        if let Some(token) = params.token() {
            if self.tokens.token_exists(token) {
                self.log.warning(DUPLICATED_REQUEST, &[]);
                return Ok(StitchOutcome::Duplicate);
            }
        }

        match params.status() {
            Some(status_id) => {
                let properties = GenerationProperties {
                    date: params.date_override(),
                };
                self.generate_new_document(
                    status_id,
                    |line_id| params.approved_quantity(line_id),
                    &properties,
                )
                .await
            }
            None => Ok(StitchOutcome::Viewed),
        }
    }

    /// Accepts `doc` unless its currency or counterpart differs from an accepted one.
    pub fn add_document(&mut self, doc: LoadedDocument) -> bool {
        if self.documents.iter().any(|accepted| !are_compatible(accepted, &doc)) {
            self.log.warning(INCOMPATIBLE_DOCUMENT, &[("%code%", doc.code())]);
            return false;
        }

        self.documents.push(doc);
        true
    }

    /// Loads every selected code, keeps the compatible documents and sorts them by date.
    ///
    /// Codes that do not load are skipped; an unregistered model loads nothing.
    pub async fn load_documents(&mut self) -> Result<()> {
        let Some(kind) = DocumentKind::from_model_name(&self.model_name) else {
            debug!("Model '{}' is not transformable, nothing to load", self.model_name);
            return Ok(());
        };

        let codes = self.codes.clone();
        for code in &codes {
            match LoadedDocument::load_from_code(self.db, kind, code).await? {
                Some(doc) => {
                    self.add_document(doc);
                }
                None => debug!("{} '{}' not found, skipping", kind, code),
            }
        }

        sort_chronologically(&mut self.documents);
        debug!("Accepted {} documents", self.documents.len());
        Ok(())
    }

    /// Statuses of the selected model that can be used as merge targets
    pub async fn available_statuses(&self) -> Result<Vec<document_status::Model>> {
        get_available_statuses(self.db, &self.model_name).await
    }

    /// Merges the approved lines of the accepted documents into a new document.
    ///
    /// `approved` returns the quantity approved for a line id.
    pub async fn generate_new_document<F>(
        &mut self,
        status_id: i32,
        approved: F,
        properties: &GenerationProperties,
    ) -> Result<StitchOutcome>
    where
        F: Fn(i64) -> f64,
    {
        let (new_class, generated) = {
            let Some(plan) = collect_lines(&self.documents, approved) else {
                debug!("Nothing approved for merging");
                return Ok(StitchOutcome::NothingToMerge);
            };

            let Some(new_class) = get_generate_class(self.db, status_id).await? else {
                warn!("Status {} does not generate any document", status_id);
                self.log.error(RECORD_SAVE_ERROR);
                return Ok(StitchOutcome::GenerationFailed);
            };

            let generated = self
                .generator
                .generate(
                    self.db,
                    plan.prototype,
                    &new_class,
                    &plan.lines,
                    &plan.quantities,
                    properties,
                )
                .await;
            (new_class, generated)
        };

        match generated {
            Ok(result) => self.end_generation_and_redirect(result, status_id).await,
            Err(e) => {
                error!("Generating {} failed: {}", new_class, e);
                self.log.error(RECORD_SAVE_ERROR);
                Ok(StitchOutcome::GenerationFailed)
            }
        }
    }

    /// Closes fully served source documents and picks the redirect target.
    ///
    /// Partially served documents are left as they were, still open for later merges.
    pub async fn end_generation_and_redirect(
        &mut self,
        result: GenerationResult,
        status_id: i32,
    ) -> Result<StitchOutcome> {
        for doc in &mut self.documents {
            doc.reload_lines(self.db).await?;
            if !doc.is_fully_served() {
                continue;
            }

            doc.set_document_generation(false);
            doc.set_status(status_id);
            if let Err(e) = doc.save(self.db).await {
                error!("Failed to close {} {}: {}", doc.kind(), doc.code(), e);
                self.log.error(RECORD_SAVE_ERROR);
            } else {
                info!(
                    "{} {} fully served, moved to status {}",
                    doc.kind(),
                    doc.code(),
                    status_id
                );
            }
        }

        let redirect = result
            .last_docs()
            .first()
            .map(|doc| document_url(&doc.doc_type, &doc.code));
        if redirect.is_some() {
            self.log.notice(RECORD_UPDATED_CORRECTLY);
        }

        Ok(StitchOutcome::Generated {
            redirect,
            documents: result.into_documents(),
        })
    }
}
