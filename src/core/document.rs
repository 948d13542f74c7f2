//! Transformable documents - loading, compatibility and served-state checks.
//!
//! `TransformableDocument` is the capability set the stitcher relies on;
//! `LoadedDocument` implements it over a header row plus its lines.

use crate::{
    core::kind::DocumentKind,
    entities::{Document, DocumentLine, document, document_line},
    errors::{Error, Result},
};
use chrono::NaiveDateTime;
use sea_orm::{QueryOrder, Set, prelude::*, sea_query::Expr};
use serde::Serialize;
use std::cmp::Ordering;

/// What a document must offer to take part in a merge
pub trait TransformableDocument {
    /// Registered type of the document
    fn kind(&self) -> DocumentKind;
    /// Public document code
    fn code(&self) -> &str;
    /// Currency code
    fn currency(&self) -> &str;
    /// Counterpart identity (customer or supplier code, depending on kind)
    fn subject_value(&self) -> Option<&str>;
    /// Date and time combined
    fn timestamp(&self) -> NaiveDateTime;
    /// Lines in their stored order
    fn lines(&self) -> &[document_line::Model];

    /// Canonical location of the document
    fn url(&self) -> String {
        self.kind().url(self.code())
    }

    /// True when every line has been served at least its ordered quantity
    fn is_fully_served(&self) -> bool {
        self.lines().iter().all(|line| line.served >= line.quantity)
    }
}

/// Two documents can be merged together only with equal currency and counterpart
pub fn are_compatible<A, B>(a: &A, b: &B) -> bool
where
    A: TransformableDocument + ?Sized,
    B: TransformableDocument + ?Sized,
{
    a.currency() == b.currency() && a.subject_value() == b.subject_value()
}

/// Orders documents by date and time, oldest first
pub fn compare_chronologically<D: TransformableDocument>(a: &D, b: &D) -> Ordering {
    a.timestamp().cmp(&b.timestamp())
}

/// Sorts documents oldest first; equal timestamps keep their insertion order
pub fn sort_chronologically<D: TransformableDocument>(documents: &mut [D]) {
    documents.sort_by(compare_chronologically);
}

/// A document header together with its lines
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct LoadedDocument {
    /// Registered type
    pub kind: DocumentKind,
    /// Header row
    pub header: document::Model,
    /// Line rows ordered by id
    pub lines: Vec<document_line::Model>,
}

impl LoadedDocument {
    /// Loads a document of `kind` by code, returning `None` when there is no such document.
    pub async fn load_from_code<C>(db: &C, kind: DocumentKind, code: &str) -> Result<Option<Self>>
    where
        C: ConnectionTrait,
    {
        let Some(header) = Document::find()
            .filter(document::Column::DocType.eq(kind.model_name()))
            .filter(document::Column::Code.eq(code))
            .one(db)
            .await?
        else {
            return Ok(None);
        };

        let lines = find_lines(db, header.id).await?;
        Ok(Some(Self {
            kind,
            header,
            lines,
        }))
    }

    /// Re-reads the lines, picking up `served` changes made by a generator.
    pub async fn reload_lines<C>(&mut self, db: &C) -> Result<()>
    where
        C: ConnectionTrait,
    {
        self.lines = find_lines(db, self.header.id).await?;
        Ok(())
    }

    /// Clears or sets the generation-pending flag
    pub const fn set_document_generation(&mut self, pending: bool) {
        self.header.pending_generation = pending;
    }

    /// Moves the document to another status
    pub const fn set_status(&mut self, status_id: i32) {
        self.header.status_id = Some(status_id);
    }

    /// Persists the header's status and generation-pending flag.
    pub async fn save<C>(&self, db: &C) -> Result<document::Model>
    where
        C: ConnectionTrait,
    {
        let mut header: document::ActiveModel = Document::find_by_id(self.header.id)
            .one(db)
            .await?
            .ok_or_else(|| Error::DocumentNotFound {
                code: self.header.code.clone(),
            })?
            .into();

        header.status_id = Set(self.header.status_id);
        header.pending_generation = Set(self.header.pending_generation);
        header.update(db).await.map_err(Into::into)
    }
}

impl TransformableDocument for LoadedDocument {
    fn kind(&self) -> DocumentKind {
        self.kind
    }

    fn code(&self) -> &str {
        &self.header.code
    }

    fn currency(&self) -> &str {
        &self.header.currency
    }

    fn subject_value(&self) -> Option<&str> {
        self.kind.subject_value(&self.header)
    }

    fn timestamp(&self) -> NaiveDateTime {
        self.header.date.and_time(self.header.time)
    }

    fn lines(&self) -> &[document_line::Model] {
        &self.lines
    }
}

async fn find_lines<C>(db: &C, document_id: i64) -> Result<Vec<document_line::Model>>
where
    C: ConnectionTrait,
{
    DocumentLine::find()
        .filter(document_line::Column::DocumentId.eq(document_id))
        .order_by_asc(document_line::Column::Id)
        .all(db)
        .await
        .map_err(Into::into)
}

/// Adds `delta` to a line's served quantity with a single UPDATE.
///
/// `UPDATE business_document_lines SET served = served + delta WHERE id = ?`
pub async fn add_served_atomic<C>(db: &C, line_id: i64, delta: f64) -> Result<()>
where
    C: ConnectionTrait,
{
    let result = DocumentLine::update_many()
        .col_expr(
            document_line::Column::Served,
            Expr::col(document_line::Column::Served).add(delta),
        )
        .filter(document_line::Column::Id.eq(line_id))
        .exec(db)
        .await?;

    if result.rows_affected == 0 {
        return Err(Error::DocumentNotFound {
            code: format!("line {line_id}"),
        });
    }
    Ok(())
}
