//! # Elastic REST Shared
//!
//! Domain types shared by the elastic-rest client and its command line tool:
//! index and document identifiers, stored documents, search responses and
//! query bodies.

pub mod document;
pub mod model;
pub mod query;

pub use document::{ElasticDocument, SearchHits, SearchResponse, TotalHits, TotalRelation};
pub use model::{DocumentId, FieldName, FieldValue, IndexName};
pub use query::{InlineScript, StringSearchQuery, UpdateByStringQuery};
