//! Document status entity - Workflow states per document type.
//!
//! A status whose `generates` is set names the model to generate when a
//! document reaches it (e.g. an order status "Approved" generates a delivery note).

use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};

/// Document status database model
#[derive(Clone, Debug, PartialEq, Eq, DeriveEntityModel, Serialize, Deserialize)]
#[sea_orm(table_name = "document_statuses")]
pub struct Model {
    /// Unique identifier
    #[sea_orm(primary_key, auto_increment = false)]
    pub id: i32,
    /// Model name this status applies to
    pub doc_type: String,
    /// Display name
    pub name: String,
    /// Model name generated on reaching this status, if any
    pub generates: Option<String>,
    /// Status assigned to new documents of this type
    pub is_default: bool,
    /// Whether documents in this status may still be edited
    pub editable: bool,
}

/// `DocumentStatus` has no navigable relations
#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {}

impl ActiveModelBehavior for ActiveModel {}
