//! Inbound request parameters.
//!
//! A request carries two parameter bags: the query string and the form body.
//! Accessors here decide which bag each workflow parameter is read from and how
//! missing or malformed values default, so the rest of the crate only sees typed values.

use chrono::NaiveDate;
use serde::Deserialize;
use tracing::debug;

/// Form field holding the duplicate-submission token
pub const TOKEN_PARAM: &str = "multireqtoken";
/// Prefix of per-line approved quantity fields, followed by the line id
pub const APPROVE_QUANT_PREFIX: &str = "approve_quant_";

/// Ordered list of `name=value` pairs, as decoded from a query string or form body
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
#[serde(transparent)]
pub struct ParameterBag(Vec<(String, String)>);

impl ParameterBag {
    /// Builds a bag from anything yielding name/value pairs
    pub fn from_pairs<I, K, V>(pairs: I) -> Self
    where
        I: IntoIterator<Item = (K, V)>,
        K: Into<String>,
        V: Into<String>,
    {
        Self(
            pairs
                .into_iter()
                .map(|(k, v)| (k.into(), v.into()))
                .collect(),
        )
    }

    /// First value for `name`
    #[must_use]
    pub fn get(&self, name: &str) -> Option<&str> {
        self.0
            .iter()
            .find(|(key, _)| key == name)
            .map(|(_, value)| value.as_str())
    }

    /// Every value for `name`, in submission order
    pub fn get_all<'a>(&'a self, name: &'a str) -> impl Iterator<Item = &'a str> + 'a {
        self.0
            .iter()
            .filter(move |(key, _)| key == name)
            .map(|(_, value)| value.as_str())
    }

    /// True when no pairs were submitted
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

/// Query string and form body of one request
#[derive(Debug, Clone, Default)]
pub struct RequestParams {
    /// Parameters from the query string
    pub query: ParameterBag,
    /// Parameters from the form body
    pub body: ParameterBag,
}

impl RequestParams {
    /// Creates request parameters from both bags
    #[must_use]
    pub const fn new(query: ParameterBag, body: ParameterBag) -> Self {
        Self { query, body }
    }

    /// Looks in the query first, then the body
    #[must_use]
    pub fn get(&self, name: &str) -> Option<&str> {
        self.query.get(name).or_else(|| self.body.get(name))
    }

    /// Document codes posted as a list (`code[]` or repeated `code`)
    #[must_use]
    pub fn code_list(&self) -> Vec<String> {
        self.body
            .get_all("code[]")
            .chain(self.body.get_all("code"))
            .filter(|code| !code.is_empty())
            .map(str::to_string)
            .collect()
    }

    /// Document codes sent as one comma-separated `codes` value
    #[must_use]
    pub fn comma_codes(&self) -> Vec<String> {
        self.get("codes")
            .unwrap_or_default()
            .split(',')
            .map(str::trim)
            .filter(|code| !code.is_empty())
            .map(str::to_string)
            .collect()
    }

    /// Model name; a body value overrides the query one
    #[must_use]
    pub fn model(&self) -> String {
        self.body
            .get("model")
            .or_else(|| self.get("model"))
            .unwrap_or_default()
            .to_string()
    }

    /// Duplicate-submission token, if a non-empty one was posted
    #[must_use]
    pub fn token(&self) -> Option<&str> {
        self.body.get(TOKEN_PARAM).filter(|token| !token.is_empty())
    }

    /// Target status id, if a non-empty `status` was posted.
    ///
    /// Values that are not integers read as `0`, which matches no status.
    #[must_use]
    pub fn status(&self) -> Option<i32> {
        self.body
            .get("status")
            .filter(|status| !status.is_empty())
            .map(|status| status.trim().parse().unwrap_or(0))
    }

    /// Date override for the generated document.
    ///
    /// Accepts `dd-mm-YYYY` and `YYYY-mm-dd`; anything else is ignored.
    #[must_use]
    pub fn date_override(&self) -> Option<NaiveDate> {
        let raw = self.body.get("fecha")?.trim();
        if raw.is_empty() {
            return None;
        }
        let parsed = NaiveDate::parse_from_str(raw, "%d-%m-%Y")
            .or_else(|_| NaiveDate::parse_from_str(raw, "%Y-%m-%d"))
            .ok();
        if parsed.is_none() {
            debug!("Ignoring unparsable date override '{}'", raw);
        }
        parsed
    }

    /// Approved quantity for a line, `0` when absent or not a finite number
    #[must_use]
    pub fn approved_quantity(&self, line_id: i64) -> f64 {
        self.body
            .get(&format!("{APPROVE_QUANT_PREFIX}{line_id}"))
            .and_then(|raw| raw.trim().parse::<f64>().ok())
            .filter(|quantity| quantity.is_finite())
            .unwrap_or(0.0)
    }
}
