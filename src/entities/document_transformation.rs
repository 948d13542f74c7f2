//! Document transformation entity - Audit trail of carried-over lines.
//!
//! One row per line copied from a source document into a generated one.
use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};

/// Document transformation database model
#[derive(Clone, Debug, PartialEq, DeriveEntityModel, Serialize, Deserialize)]
#[sea_orm(table_name = "document_transformations")]
pub struct Model {
    /// Unique identifier
    #[sea_orm(primary_key)]
    pub id: i64,
    /// Model name of the source document
    pub source_doc_type: String,
    /// Source document id
    pub source_id: i64,
    /// Source line id
    pub source_line_id: i64,
    /// Model name of the generated document
    pub target_doc_type: String,
    /// Generated document id
    pub target_id: i64,
    /// Generated line id
    pub target_line_id: i64,
    /// Quantity carried over
    pub quantity: f64,
}

/// `DocumentTransformation` rows are looked up by plain columns
#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {}

impl ActiveModelBehavior for ActiveModel {}
