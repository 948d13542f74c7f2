//! Document generation - builds the merged document.
//!
//! The stitcher only knows the [`DocumentGenerator`] trait. The bundled
//! [`BusinessDocumentGenerator`] writes the new document, its lines, the
//! served quantities of the source lines and the transformation trail in a
//! single database transaction, so a failure leaves nothing behind.

use crate::{
    core::{
        document::{LoadedDocument, TransformableDocument, add_served_atomic},
        kind::DocumentKind,
        status::get_default_status,
    },
    entities::{document, document_line, document_transformation},
    errors::{Error, Result},
};
use async_trait::async_trait;
use chrono::NaiveDate;
use sea_orm::{Set, TransactionTrait, prelude::*};
use std::collections::HashMap;
use tracing::{debug, info, instrument};

/// Header values to apply to the generated document
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct GenerationProperties {
    /// Document date; today when `None`
    pub date: Option<NaiveDate>,
}

/// Documents created by one generation
#[derive(Debug, Clone, Default, PartialEq)]
pub struct GenerationResult {
    documents: Vec<document::Model>,
}

impl GenerationResult {
    /// Wraps the generated headers
    #[must_use]
    pub const fn new(documents: Vec<document::Model>) -> Self {
        Self { documents }
    }

    /// Generated headers in creation order
    #[must_use]
    pub fn last_docs(&self) -> &[document::Model] {
        &self.documents
    }

    /// Takes ownership of the generated headers
    #[must_use]
    pub fn into_documents(self) -> Vec<document::Model> {
        self.documents
    }
}

/// Service that turns selected lines into a new document
#[async_trait]
pub trait DocumentGenerator: Send + Sync {
    /// Generates a `new_class` document from `prototype`'s header and the given lines.
    ///
    /// `quantities` maps line ids to the quantity to carry over.
    async fn generate(
        &self,
        db: &DatabaseConnection,
        prototype: &LoadedDocument,
        new_class: &str,
        lines: &[document_line::Model],
        quantities: &HashMap<i64, f64>,
        properties: &GenerationProperties,
    ) -> Result<GenerationResult>;
}

/// Generator backed by the business document tables
#[derive(Debug, Clone, Copy, Default)]
pub struct BusinessDocumentGenerator;

#[async_trait]
impl DocumentGenerator for BusinessDocumentGenerator {
    #[instrument(skip(self, db, prototype, lines, quantities), fields(prototype = prototype.code()))]
    async fn generate(
        &self,
        db: &DatabaseConnection,
        prototype: &LoadedDocument,
        new_class: &str,
        lines: &[document_line::Model],
        quantities: &HashMap<i64, f64>,
        properties: &GenerationProperties,
    ) -> Result<GenerationResult> {
        let target: DocumentKind = new_class.parse()?;
        if lines.is_empty() {
            return Err(Error::Generation {
                message: "no lines to generate from".to_string(),
            });
        }
        for line in lines {
            let quantity = quantity_for(line, quantities);
            if quantity < 0.0 || !quantity.is_finite() {
                return Err(Error::InvalidQuantity { quantity });
            }
        }

        // Dropping the transaction on an early return rolls everything back
        let txn = db.begin().await?;

        let status = get_default_status(&txn, target.model_name()).await?;
        let now = chrono::Utc::now().naive_utc();
        let header = document::ActiveModel {
            doc_type: Set(target.model_name().to_string()),
            code: Set(String::new()),
            currency: Set(prototype.header.currency.clone()),
            customer_code: Set(prototype.header.customer_code.clone()),
            supplier_code: Set(prototype.header.supplier_code.clone()),
            date: Set(properties.date.unwrap_or_else(|| now.date())),
            time: Set(now.time()),
            status_id: Set(status.map(|s| s.id)),
            pending_generation: Set(true),
            ..Default::default()
        }
        .insert(&txn)
        .await?;

        let code = format!("{}{:05}", target.code_prefix(), header.id);
        let mut header: document::ActiveModel = header.into();
        header.code = Set(code);
        let header = header.update(&txn).await?;

        for line in lines {
            let quantity = quantity_for(line, quantities);
            let new_line = document_line::ActiveModel {
                document_id: Set(header.id),
                reference: Set(line.reference.clone()),
                description: Set(line.description.clone()),
                quantity: Set(quantity),
                served: Set(0.0),
                unit_price: Set(line.unit_price),
                ..Default::default()
            }
            .insert(&txn)
            .await?;

            add_served_atomic(&txn, line.id, quantity).await?;

            document_transformation::ActiveModel {
                source_doc_type: Set(prototype.kind().model_name().to_string()),
                source_id: Set(line.document_id),
                source_line_id: Set(line.id),
                target_doc_type: Set(header.doc_type.clone()),
                target_id: Set(header.id),
                target_line_id: Set(new_line.id),
                quantity: Set(quantity),
                ..Default::default()
            }
            .insert(&txn)
            .await?;
            debug!(
                "Carried line {} into {} with quantity {}",
                line.id, header.code, quantity
            );
        }

        txn.commit().await?;
        info!(
            "Generated {} {} from {} lines",
            header.doc_type,
            header.code,
            lines.len()
        );
        Ok(GenerationResult::new(vec![header]))
    }
}

/// Approved quantity for a line; lines without an entry carry their full quantity
fn quantity_for(line: &document_line::Model, quantities: &HashMap<i64, f64>) -> f64 {
    quantities.get(&line.id).copied().unwrap_or(line.quantity)
}

#[cfg(test)]
mod tests {
    #![allow(clippy::unwrap_used)]
    #![allow(clippy::float_cmp)]
    use super::*;
    use crate::entities::{Document, DocumentLine, DocumentTransformation};
    use crate::test_utils::*;

    #[tokio::test]
    async fn test_generate_creates_document_and_serves_lines() -> Result<()> {
        let db = setup_test_db().await?;
        create_test_status(&db, 20, "CustomerDeliveryNote", "Open", None, true).await?;
        let header = create_test_document(&db, DocumentKind::CustomerOrder, "OC1").await?;
        let first = create_test_line(&db, header.id, 5.0, 0.0).await?;
        let second = create_test_line(&db, header.id, 2.0, 0.0).await?;
        let prototype = load(&db, DocumentKind::CustomerOrder, "OC1").await?;

        let quantities = HashMap::from([(first.id, 3.0), (second.id, 2.0)]);
        let properties = GenerationProperties {
            date: NaiveDate::from_ymd_opt(2024, 6, 1),
        };
        let result = BusinessDocumentGenerator
            .generate(
                &db,
                &prototype,
                "CustomerDeliveryNote",
                &prototype.lines,
                &quantities,
                &properties,
            )
            .await?;

        let generated = &result.last_docs()[0];
        assert_eq!(generated.doc_type, "CustomerDeliveryNote");
        assert_eq!(generated.code, format!("DC{:05}", generated.id));
        assert_eq!(generated.currency, "EUR");
        assert_eq!(generated.customer_code.as_deref(), Some("CUST1"));
        assert_eq!(generated.date, NaiveDate::from_ymd_opt(2024, 6, 1).unwrap());
        assert_eq!(generated.status_id, Some(20));
        assert!(generated.pending_generation);

        let new_lines = DocumentLine::find()
            .filter(document_line::Column::DocumentId.eq(generated.id))
            .all(&db)
            .await?;
        assert_eq!(new_lines.len(), 2);
        assert_eq!(new_lines[0].quantity, 3.0);
        assert_eq!(new_lines[0].served, 0.0);

        let source = DocumentLine::find_by_id(first.id).one(&db).await?.unwrap();
        assert_eq!(source.served, 3.0);
        let source = DocumentLine::find_by_id(second.id).one(&db).await?.unwrap();
        assert_eq!(source.served, 2.0);

        let trail = DocumentTransformation::find().all(&db).await?;
        assert_eq!(trail.len(), 2);
        assert_eq!(trail[0].source_doc_type, "CustomerOrder");
        assert_eq!(trail[0].target_id, generated.id);
        Ok(())
    }

    #[tokio::test]
    async fn test_generate_unknown_class_writes_nothing() -> Result<()> {
        let db = setup_test_db().await?;
        let header = create_test_document(&db, DocumentKind::CustomerOrder, "OC1").await?;
        create_test_line(&db, header.id, 5.0, 0.0).await?;
        let prototype = load(&db, DocumentKind::CustomerOrder, "OC1").await?;

        let result = BusinessDocumentGenerator
            .generate(
                &db,
                &prototype,
                "Spaceship",
                &prototype.lines,
                &HashMap::new(),
                &GenerationProperties::default(),
            )
            .await;
        assert!(matches!(result, Err(Error::UnknownModel { .. })));
        assert_eq!(Document::find().all(&db).await?.len(), 1);
        Ok(())
    }

    #[tokio::test]
    async fn test_generate_rejects_negative_quantity() -> Result<()> {
        let db = setup_test_db().await?;
        let header = create_test_document(&db, DocumentKind::CustomerOrder, "OC1").await?;
        let line = create_test_line(&db, header.id, 5.0, 0.0).await?;
        let prototype = load(&db, DocumentKind::CustomerOrder, "OC1").await?;

        let result = BusinessDocumentGenerator
            .generate(
                &db,
                &prototype,
                "CustomerInvoice",
                &prototype.lines,
                &HashMap::from([(line.id, -1.0)]),
                &GenerationProperties::default(),
            )
            .await;
        assert!(matches!(result, Err(Error::InvalidQuantity { .. })));
        let source = DocumentLine::find_by_id(line.id).one(&db).await?.unwrap();
        assert_eq!(source.served, 0.0);
        Ok(())
    }

    #[tokio::test]
    async fn test_generate_without_lines_fails() -> Result<()> {
        let db = setup_test_db().await?;
        create_test_document(&db, DocumentKind::CustomerOrder, "OC1").await?;
        let prototype = load(&db, DocumentKind::CustomerOrder, "OC1").await?;

        let result = BusinessDocumentGenerator
            .generate(
                &db,
                &prototype,
                "CustomerInvoice",
                &[],
                &HashMap::new(),
                &GenerationProperties::default(),
            )
            .await;
        assert!(matches!(result, Err(Error::Generation { .. })));
        Ok(())
    }
}
