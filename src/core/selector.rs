//! Selector - which documents the request is about.

use crate::core::request::RequestParams;
use serde::Serialize;

/// Document codes and model name picked by the user
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct Selection {
    /// Codes in the order they were submitted
    pub codes: Vec<String>,
    /// Model name of the selected documents
    pub model_name: String,
}

/// Reads the selection from a request.
///
/// A posted `code` list wins; otherwise the comma-separated `codes` value is
/// used. Nothing is validated here: unknown codes simply fail to load later.
#[must_use]
pub fn select(params: &RequestParams) -> Selection {
    let listed = params.code_list();
    let codes = if listed.is_empty() {
        params.comma_codes()
    } else {
        listed
    };

    Selection {
        codes,
        model_name: params.model(),
    }
}
