// crates/fixzit-access-core/src/runtime/org_filter.rs
// ============================================================================
// Module: Fixzit Org Filter Adapter
// Description: Org-scoped query predicates for the external document store.
// Purpose: Expand a canonical org id into every legacy on-disk representation.
// Dependencies: crate::core, serde_json
// ============================================================================

//! ## Overview
//! The core never issues queries. It builds an [`OrgFilter`] over a canonical
//! [`OrgId`] and renders it into a document-store predicate at the
//! persistence boundary. Historical data stores the org under `orgId` or
//! `org_id`; marketplace (souq) collections additionally store it as a plain
//! string or one of two ObjectId wrapper forms. The rendered predicate matches
//! when any tolerated key/representation combination matches.
//!
//! Contract: callers apply the rendered predicate as-is and must not strip
//! the org clause.

// ============================================================================
// SECTION: Imports
// ============================================================================

use serde_json::Map;
use serde_json::Value;
use serde_json::json;

use crate::core::OrgId;

// ============================================================================
// SECTION: Constants
// ============================================================================

/// Field spellings the org id has been stored under.
pub const ORG_FIELD_KEYS: [&str; 2] = ["orgId", "org_id"];

/// Record id field.
pub const RECORD_ID_KEY: &str = "_id";

/// Length of a hex-encoded ObjectId.
const OBJECT_ID_HEX_LEN: usize = 24;

// ============================================================================
// SECTION: Filter Model
// ============================================================================

/// Collection family the filter targets.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CollectionFamily {
    /// Facilities collections: org stored as a string.
    Facilities,
    /// Marketplace collections: org stored as a string or ObjectId wrapper.
    Marketplace,
}

/// Identifier representation tolerated at the persistence boundary.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum IdRepresentation {
    /// Plain string.
    String,
    /// Driver-level ObjectId (`{"$oid": ...}`).
    DriverObjectId,
    /// ORM-level ObjectId (`{"$objectId": ...}`).
    ModelObjectId,
}

impl IdRepresentation {
    /// Renders a value in this representation.
    fn render(self, value: &str) -> Value {
        match self {
            Self::String => Value::String(value.to_string()),
            Self::DriverObjectId => json!({ "$oid": value }),
            Self::ModelObjectId => json!({ "$objectId": value }),
        }
    }
}

/// Org-scoped filter over a canonical organization id.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct OrgFilter {
    /// Organization the filter is scoped to.
    pub org_id: OrgId,
    /// Optional record id.
    pub record_id: Option<String>,
    /// Collection family.
    pub family: CollectionFamily,
}

impl OrgFilter {
    /// Returns the representations the org id is matched under.
    ///
    /// ObjectId wrappers only apply to marketplace ids that look like an
    /// ObjectId.
    #[must_use]
    pub fn representations(&self) -> Vec<IdRepresentation> {
        let mut out = vec![IdRepresentation::String];
        if self.family == CollectionFamily::Marketplace && is_object_id_hex(self.org_id.as_str()) {
            out.push(IdRepresentation::DriverObjectId);
            out.push(IdRepresentation::ModelObjectId);
        }
        out
    }

    /// Renders the document-store predicate.
    #[must_use]
    pub fn to_predicate(&self) -> Value {
        let mut clauses = Vec::new();
        for key in ORG_FIELD_KEYS {
            for representation in self.representations() {
                let mut clause = Map::new();
                clause.insert(key.to_string(), representation.render(self.org_id.as_str()));
                clauses.push(Value::Object(clause));
            }
        }
        let mut predicate = Map::new();
        if let Some(record_id) = &self.record_id {
            predicate.insert(RECORD_ID_KEY.to_string(), Value::String(record_id.clone()));
        }
        predicate.insert("$or".to_string(), Value::Array(clauses));
        Value::Object(predicate)
    }
}

/// Returns true for 24 hexadecimal characters.
fn is_object_id_hex(value: &str) -> bool {
    value.len() == OBJECT_ID_HEX_LEN && value.chars().all(|ch| ch.is_ascii_hexdigit())
}

// ============================================================================
// SECTION: Builders
// ============================================================================

/// Builds a facilities predicate matching one record within an organization.
#[must_use]
pub fn build_org_scoped_filter(record_id: &str, org_id: &OrgId) -> Value {
    OrgFilter {
        org_id: org_id.clone(),
        record_id: Some(record_id.to_string()),
        family: CollectionFamily::Facilities,
    }
    .to_predicate()
}

/// Builds a facilities predicate matching every record of an organization.
#[must_use]
pub fn build_org_only_filter(org_id: &OrgId) -> Value {
    OrgFilter {
        org_id: org_id.clone(),
        record_id: None,
        family: CollectionFamily::Facilities,
    }
    .to_predicate()
}

/// Builds a marketplace predicate, optionally scoped to one record.
#[must_use]
pub fn build_souq_org_filter(org_id: &OrgId, record_id: Option<&str>) -> Value {
    OrgFilter {
        org_id: org_id.clone(),
        record_id: record_id.map(str::to_string),
        family: CollectionFamily::Marketplace,
    }
    .to_predicate()
}
