//! Registry of transformable document types.
//!
//! Requests name the document type by its model name (`model=CustomerOrder`).
//! `DocumentKind` maps those names to the behaviour each type needs: which
//! column identifies its counterpart and how its codes are prefixed.

use crate::{
    entities::document,
    errors::{Error, Result},
};
use serde::Serialize;
use std::{fmt, str::FromStr};

/// Which party a document is addressed to
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum Counterpart {
    /// Sales documents, identified by customer code
    Customer,
    /// Purchase documents, identified by supplier code
    Supplier,
}

/// A document type that can be merged into another document type
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
pub enum DocumentKind {
    /// Sales quote
    CustomerEstimation,
    /// Sales order
    CustomerOrder,
    /// Sales delivery note
    CustomerDeliveryNote,
    /// Sales invoice
    CustomerInvoice,
    /// Purchase quote
    SupplierEstimation,
    /// Purchase order
    SupplierOrder,
    /// Goods receipt
    SupplierDeliveryNote,
    /// Purchase invoice
    SupplierInvoice,
}

impl DocumentKind {
    /// Every registered kind, in workflow order (sales first, then purchases)
    pub const ALL: [Self; 8] = [
        Self::CustomerEstimation,
        Self::CustomerOrder,
        Self::CustomerDeliveryNote,
        Self::CustomerInvoice,
        Self::SupplierEstimation,
        Self::SupplierOrder,
        Self::SupplierDeliveryNote,
        Self::SupplierInvoice,
    ];

    /// Model name used in requests, URLs and the `doc_type` column
    #[must_use]
    pub const fn model_name(self) -> &'static str {
        match self {
            Self::CustomerEstimation => "CustomerEstimation",
            Self::CustomerOrder => "CustomerOrder",
            Self::CustomerDeliveryNote => "CustomerDeliveryNote",
            Self::CustomerInvoice => "CustomerInvoice",
            Self::SupplierEstimation => "SupplierEstimation",
            Self::SupplierOrder => "SupplierOrder",
            Self::SupplierDeliveryNote => "SupplierDeliveryNote",
            Self::SupplierInvoice => "SupplierInvoice",
        }
    }

    /// Looks up a kind by model name; `None` for unregistered names
    #[must_use]
    pub fn from_model_name(name: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|kind| kind.model_name() == name)
    }

    /// The party this kind of document is addressed to
    #[must_use]
    pub const fn counterpart(self) -> Counterpart {
        match self {
            Self::CustomerEstimation
            | Self::CustomerOrder
            | Self::CustomerDeliveryNote
            | Self::CustomerInvoice => Counterpart::Customer,
            Self::SupplierEstimation
            | Self::SupplierOrder
            | Self::SupplierDeliveryNote
            | Self::SupplierInvoice => Counterpart::Supplier,
        }
    }

    /// Prefix for codes of newly generated documents
    #[must_use]
    pub const fn code_prefix(self) -> &'static str {
        match self {
            Self::CustomerEstimation => "QC",
            Self::CustomerOrder => "OC",
            Self::CustomerDeliveryNote => "DC",
            Self::CustomerInvoice => "IC",
            Self::SupplierEstimation => "QS",
            Self::SupplierOrder => "OS",
            Self::SupplierDeliveryNote => "DS",
            Self::SupplierInvoice => "IS",
        }
    }

    /// Value of the counterpart column on a document header of this kind
    #[must_use]
    pub fn subject_value(self, header: &document::Model) -> Option<&str> {
        match self.counterpart() {
            Counterpart::Customer => header.customer_code.as_deref(),
            Counterpart::Supplier => header.supplier_code.as_deref(),
        }
    }

    /// Canonical location of a document of this kind
    #[must_use]
    pub fn url(self, code: &str) -> String {
        document_url(self.model_name(), code)
    }
}

/// Canonical location of any stored document, registered kind or not
#[must_use]
pub fn document_url(model_name: &str, code: &str) -> String {
    format!("Edit{model_name}?code={code}")
}

impl fmt::Display for DocumentKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.model_name())
    }
}

impl FromStr for DocumentKind {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        Self::from_model_name(s).ok_or_else(|| Error::UnknownModel {
            name: s.to_string(),
        })
    }
}
