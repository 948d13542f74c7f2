//! Document line entity - One line of a business document.
//!
//! `quantity` is what was ordered; `served` grows as downstream documents
//! carry the line over. A line is fully served once `served >= quantity`.

use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};

/// Document line database model
#[derive(Clone, Debug, PartialEq, DeriveEntityModel, Serialize, Deserialize)]
#[sea_orm(table_name = "business_document_lines")]
pub struct Model {
    /// Unique identifier for the line
    #[sea_orm(primary_key)]
    pub id: i64,
    /// Owning document
    pub document_id: i64,
    /// Optional product reference
    pub reference: Option<String>,
    /// Free text description
    pub description: String,
    /// Ordered quantity
    pub quantity: f64,
    /// Quantity already carried over to downstream documents
    pub served: f64,
    /// Unit price in document currency
    pub unit_price: f64,
}

/// Defines relationships between lines and other entities
#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    /// Each line belongs to one document
    #[sea_orm(
        belongs_to = "super::document::Entity",
        from = "Column::DocumentId",
        to = "super::document::Column::Id"
    )]
    Document,
}

impl Related<super::document::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Document.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}
