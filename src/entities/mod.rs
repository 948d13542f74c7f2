//! Entity module - Contains all SeaORM entity definitions for the database.
//! These entities represent the database tables and their relationships.
//! Each entity has a Model struct for data and an Entity struct for operations.

pub mod document;
pub mod document_line;
pub mod document_status;
pub mod document_transformation;

// Re-export specific types to avoid conflicts
pub use document::{Column as DocumentColumn, Entity as Document, Model as DocumentModel};
pub use document_line::{
    Column as DocumentLineColumn, Entity as DocumentLine, Model as DocumentLineModel,
};
pub use document_status::{
    Column as DocumentStatusColumn, Entity as DocumentStatus, Model as DocumentStatusModel,
};
pub use document_transformation::{
    Column as DocumentTransformationColumn, Entity as DocumentTransformation,
    Model as DocumentTransformationModel,
};
