//! Shared test utilities for the document stitcher.
//!
//! This module provides common helper functions for setting up test databases
//! and creating test documents, lines and statuses with sensible defaults.

use crate::{
    core::{document::LoadedDocument, kind::DocumentKind, kind::Counterpart},
    entities::{document, document_line, document_status},
    errors::{Error, Result},
};
use chrono::{NaiveDate, NaiveTime};
use sea_orm::{ActiveModelTrait, DatabaseConnection, Set};
use tracing_subscriber::EnvFilter;

/// Routes tracing output through the test harness; safe to call repeatedly.
pub fn init_test_tracing() {
    let _ = tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("debug")),
        )
        .with_test_writer()
        .try_init();
}

/// Creates an in-memory `SQLite` database with all tables initialized.
/// This is the standard setup for all integration tests.
pub async fn setup_test_db() -> Result<DatabaseConnection> {
    init_test_tracing();
    let db = sea_orm::Database::connect("sqlite::memory:").await?;
    crate::config::database::create_tables(&db).await?;
    Ok(db)
}

/// Creates a test document with sensible defaults.
///
/// # Defaults
/// * `currency`: `"EUR"`
/// * counterpart: `"CUST1"` for sales kinds, `"SUP1"` for purchase kinds
/// * date/time: 2024-01-01 10:00:00
/// * no status, generation pending
pub async fn create_test_document(
    db: &DatabaseConnection,
    kind: DocumentKind,
    code: &str,
) -> Result<document::Model> {
    let subject = match kind.counterpart() {
        Counterpart::Customer => "CUST1",
        Counterpart::Supplier => "SUP1",
    };
    create_custom_document(
        db,
        kind,
        code,
        "EUR",
        subject,
        NaiveDate::from_ymd_opt(2024, 1, 1).unwrap_or_default(),
        NaiveTime::from_hms_opt(10, 0, 0).unwrap_or_default(),
    )
    .await
}

/// Creates a test document with custom header values.
pub async fn create_custom_document(
    db: &DatabaseConnection,
    kind: DocumentKind,
    code: &str,
    currency: &str,
    subject: &str,
    date: NaiveDate,
    time: NaiveTime,
) -> Result<document::Model> {
    let (customer_code, supplier_code) = match kind.counterpart() {
        Counterpart::Customer => (Some(subject.to_string()), None),
        Counterpart::Supplier => (None, Some(subject.to_string())),
    };

    document::ActiveModel {
        doc_type: Set(kind.model_name().to_string()),
        code: Set(code.to_string()),
        currency: Set(currency.to_string()),
        customer_code: Set(customer_code),
        supplier_code: Set(supplier_code),
        date: Set(date),
        time: Set(time),
        status_id: Set(None),
        pending_generation: Set(true),
        ..Default::default()
    }
    .insert(db)
    .await
    .map_err(Into::into)
}

/// Creates a test line on `document_id` with the given ordered and served quantities.
pub async fn create_test_line(
    db: &DatabaseConnection,
    document_id: i64,
    quantity: f64,
    served: f64,
) -> Result<document_line::Model> {
    document_line::ActiveModel {
        document_id: Set(document_id),
        reference: Set(Some("REF".to_string())),
        description: Set("Test line".to_string()),
        quantity: Set(quantity),
        served: Set(served),
        unit_price: Set(10.0),
        ..Default::default()
    }
    .insert(db)
    .await
    .map_err(Into::into)
}

/// Creates a status row with a fixed id.
pub async fn create_test_status(
    db: &DatabaseConnection,
    id: i32,
    doc_type: &str,
    name: &str,
    generates: Option<&str>,
    is_default: bool,
) -> Result<document_status::Model> {
    document_status::ActiveModel {
        id: Set(id),
        doc_type: Set(doc_type.to_string()),
        name: Set(name.to_string()),
        generates: Set(generates.map(str::to_string)),
        is_default: Set(is_default),
        editable: Set(true),
    }
    .insert(db)
    .await
    .map_err(Into::into)
}

/// Seeds a minimal order → delivery note workflow.
///
/// * 1: `CustomerOrder` "Pending" (default)
/// * 2: `CustomerOrder` "Shipped", generates `CustomerDeliveryNote`
/// * 10: `CustomerDeliveryNote` "Open" (default)
pub async fn seed_order_workflow(db: &DatabaseConnection) -> Result<()> {
    create_test_status(db, 1, "CustomerOrder", "Pending", None, true).await?;
    create_test_status(
        db,
        2,
        "CustomerOrder",
        "Shipped",
        Some("CustomerDeliveryNote"),
        false,
    )
    .await?;
    create_test_status(db, 10, "CustomerDeliveryNote", "Open", None, true).await?;
    Ok(())
}

/// Loads a document that must exist.
pub async fn load(db: &DatabaseConnection, kind: DocumentKind, code: &str) -> Result<LoadedDocument> {
    LoadedDocument::load_from_code(db, kind, code)
        .await?
        .ok_or_else(|| Error::DocumentNotFound {
            code: code.to_string(),
        })
}

/// Builds an in-memory `CustomerOrder` without lines, for tests that skip the database.
pub fn loaded_fixture(
    code: &str,
    currency: &str,
    customer: &str,
    (year, month, day): (i32, u32, u32),
    (hour, minute): (u32, u32),
) -> LoadedDocument {
    LoadedDocument {
        kind: DocumentKind::CustomerOrder,
        header: document::Model {
            id: 0,
            doc_type: DocumentKind::CustomerOrder.model_name().to_string(),
            code: code.to_string(),
            currency: currency.to_string(),
            customer_code: Some(customer.to_string()),
            supplier_code: None,
            date: NaiveDate::from_ymd_opt(year, month, day).unwrap_or_default(),
            time: NaiveTime::from_hms_opt(hour, minute, 0).unwrap_or_default(),
            status_id: None,
            pending_generation: true,
        },
        lines: Vec::new(),
    }
}

/// Builds an in-memory line.
pub fn line_fixture(id: i64, quantity: f64, served: f64) -> document_line::Model {
    document_line::Model {
        id,
        document_id: 0,
        reference: None,
        description: format!("Line {id}"),
        quantity,
        served,
        unit_price: 1.0,
    }
}
