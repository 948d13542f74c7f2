//! Business document entity - Header of a transformable document.
//!
//! Every document type (quotes, orders, delivery notes, invoices) shares this
//! table; `doc_type` holds the model name that selects its behaviour.
//! The counterpart is `customer_code` for sales and `supplier_code` for purchases.

use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};

/// Business document database model
#[derive(Clone, Debug, PartialEq, DeriveEntityModel, Serialize, Deserialize)]
#[sea_orm(table_name = "business_documents")]
pub struct Model {
    /// Unique identifier for the document
    #[sea_orm(primary_key)]
    pub id: i64,
    /// Model name of the document type (e.g. `"CustomerOrder"`)
    pub doc_type: String,
    /// Public document code, unique per type
    pub code: String,
    /// ISO currency code (e.g. `"EUR"`)
    pub currency: String,
    /// Customer code for sales documents
    pub customer_code: Option<String>,
    /// Supplier code for purchase documents
    pub supplier_code: Option<String>,
    /// Document date
    pub date: Date,
    /// Document time
    pub time: Time,
    /// Current status, if any
    pub status_id: Option<i32>,
    /// True while the document still waits to be consumed by a downstream document
    pub pending_generation: bool,
}

/// Defines relationships between documents and other entities
#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    /// One document has many lines
    #[sea_orm(has_many = "super::document_line::Entity")]
    Lines,
    /// Each document may point at a status
    #[sea_orm(
        belongs_to = "super::document_status::Entity",
        from = "Column::StatusId",
        to = "super::document_status::Column::Id"
    )]
    Status,
}

impl Related<super::document_line::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Lines.def()
    }
}

impl Related<super::document_status::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Status.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}
