//! Core business logic - framework-agnostic document consolidation.
//!
//! Nothing here knows about HTTP; the web layer turns requests into
//! [`request::RequestParams`] and outcomes into responses.

/// Transformable document capability, loading and served-state checks
pub mod document;
/// Document generation service and its database-backed implementation
pub mod generator;
/// Registry of transformable document types
pub mod kind;
/// User-visible message log
pub mod messages;
/// Typed access to request parameters
pub mod request;
/// Selection of codes and model name
pub mod selector;
/// Document status lookups and seeding
pub mod status;
/// Merge workflow orchestration
pub mod stitcher;
/// Duplicate-submission protection
pub mod token;
