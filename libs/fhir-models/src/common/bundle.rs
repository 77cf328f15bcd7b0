//! FHIR Bundle model
//!
//! Generic over the resource union of a FHIR release, so `r4::Bundle` holds
//! `r4::Resource` entries and `r5::Bundle` holds `r5::Resource` entries.

use async_trait::async_trait;
use chrono::{SecondsFormat, Utc};
use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use std::fmt;
use uuid::Uuid;

use super::builder::ModelBuilder;
use super::datatypes::{Element, Extension, Identifier, Meta, Signature};
use super::decimal::Decimal;
use super::model::{FhirModel, ResourceBase, ResourceTag};

/// FHIR Bundle resource
///
/// A container for a collection of resources.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct Bundle<R> {
    #[serde(default = "ResourceTag::new")]
    pub resource_type: ResourceTag<Bundle<R>>,

    /// Logical id of this artifact
    #[serde(skip_serializing_if = "Option::is_none")]
    pub id: Option<String>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub meta: Option<Meta>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub implicit_rules: Option<String>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub language: Option<String>,

    /// Persistent identifier for the bundle
    #[serde(skip_serializing_if = "Option::is_none")]
    pub identifier: Option<Identifier>,

    /// Indicates the purpose of this bundle - how it was intended to be used
    #[serde(rename = "type")]
    pub bundle_type: BundleType,

    /// When the bundle was assembled
    #[serde(skip_serializing_if = "Option::is_none")]
    pub timestamp: Option<String>,

    #[serde(rename = "_timestamp", skip_serializing_if = "Option::is_none")]
    pub timestamp_ext: Option<Element>,

    /// If search, the total number of matches
    #[serde(skip_serializing_if = "Option::is_none")]
    pub total: Option<u32>,

    /// Links related to this Bundle
    #[serde(skip_serializing_if = "Option::is_none")]
    pub link: Option<Vec<BundleLink>>,

    /// Entry in the bundle - will have a resource or information
    #[serde(skip_serializing_if = "Option::is_none")]
    pub entry: Option<Vec<BundleEntry<R>>>,

    /// Digital Signature
    #[serde(skip_serializing_if = "Option::is_none")]
    pub signature: Option<Signature>,

    /// Additional content beyond core fields (e.g. R5 `issues`)
    #[serde(flatten)]
    pub additional: Map<String, Value>,
}

/// Type of Bundle
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum BundleType {
    /// Document Bundle - A set of resources composing a single coherent document
    Document,
    /// Message Bundle - A message (application/response or application/request)
    Message,
    /// Transaction Bundle - A transaction - intended to be processed atomically
    Transaction,
    /// Transaction Response Bundle - Response to a transaction
    TransactionResponse,
    /// Batch Bundle - A set of resources collected for a specific purpose
    Batch,
    /// Batch Response Bundle - Response to a batch
    BatchResponse,
    /// History Bundle - A list of resources with history
    History,
    /// Search Results Bundle - Results of a search operation
    Searchset,
    /// Collection Bundle - A set of resources collected for a specific purpose
    #[default]
    Collection,
    /// R5 subscription notification
    SubscriptionNotification,
}

/// Links related to this Bundle
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct BundleLink {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub id: Option<String>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub extension: Option<Vec<Extension>>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub modifier_extension: Option<Vec<Extension>>,

    /// See http://www.iana.org/assignments/link-relations/link-relations.xhtml#link-relations-1
    pub relation: String,

    /// Reference details for the link
    pub url: String,

    #[serde(flatten)]
    pub additional: Map<String, Value>,
}

crate::fhir_model!(BundleLink, "Bundle.link");
crate::impl_backbone_element!(BundleLink);

/// Entry in the bundle
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct BundleEntry<R> {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub id: Option<String>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub extension: Option<Vec<Extension>>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub modifier_extension: Option<Vec<Extension>>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub link: Option<Vec<BundleLink>>,

    /// Full URL for the entry (relative to the base URL, or absolute)
    #[serde(skip_serializing_if = "Option::is_none")]
    pub full_url: Option<String>,

    /// A resource in this bundle
    #[serde(skip_serializing_if = "Option::is_none")]
    pub resource: Option<R>,

    /// Search-related information
    #[serde(skip_serializing_if = "Option::is_none")]
    pub search: Option<BundleEntrySearch>,

    /// Additional execution information (transaction/batch/history)
    #[serde(skip_serializing_if = "Option::is_none")]
    pub request: Option<BundleEntryRequest>,

    /// Results of execution (transaction/batch/history)
    #[serde(skip_serializing_if = "Option::is_none")]
    pub response: Option<BundleEntryResponse<R>>,

    #[serde(flatten)]
    pub additional: Map<String, Value>,
}

impl<R> Default for BundleEntry<R> {
    fn default() -> Self {
        Self {
            id: None,
            extension: None,
            modifier_extension: None,
            link: None,
            full_url: None,
            resource: None,
            search: None,
            request: None,
            response: None,
            additional: Map::new(),
        }
    }
}

impl<R> BundleEntry<R> {
    pub fn with_resource(full_url: impl Into<String>, resource: R) -> Self {
        Self {
            full_url: Some(full_url.into()),
            resource: Some(resource),
            ..Default::default()
        }
    }
}

/// HTTP verb of a transaction/batch entry
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum HttpVerb {
    Get,
    Head,
    Post,
    Put,
    Delete,
    Patch,
}

impl fmt::Display for HttpVerb {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let verb = match self {
            HttpVerb::Get => "GET",
            HttpVerb::Head => "HEAD",
            HttpVerb::Post => "POST",
            HttpVerb::Put => "PUT",
            HttpVerb::Delete => "DELETE",
            HttpVerb::Patch => "PATCH",
        };
        f.write_str(verb)
    }
}

/// Request details for a Bundle entry
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct BundleEntryRequest {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub id: Option<String>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub extension: Option<Vec<Extension>>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub modifier_extension: Option<Vec<Extension>>,

    /// GET | HEAD | POST | PUT | DELETE | PATCH
    pub method: HttpVerb,

    /// URL for HTTP equivalent of this entry
    pub url: String,

    /// For managing cache validation
    #[serde(skip_serializing_if = "Option::is_none")]
    pub if_none_match: Option<String>,

    /// For managing cache validation
    #[serde(skip_serializing_if = "Option::is_none")]
    pub if_modified_since: Option<String>,

    /// For managing update contention
    #[serde(skip_serializing_if = "Option::is_none")]
    pub if_match: Option<String>,

    /// For conditional creates
    #[serde(skip_serializing_if = "Option::is_none")]
    pub if_none_exist: Option<String>,

    #[serde(flatten)]
    pub additional: Map<String, Value>,
}

impl BundleEntryRequest {
    pub fn new(method: HttpVerb, url: impl Into<String>) -> Self {
        Self {
            id: None,
            extension: None,
            modifier_extension: None,
            method,
            url: url.into(),
            if_none_match: None,
            if_modified_since: None,
            if_match: None,
            if_none_exist: None,
            additional: Map::new(),
        }
    }
}

/// Response details for a Bundle entry
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct BundleEntryResponse<R> {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub id: Option<String>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub extension: Option<Vec<Extension>>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub modifier_extension: Option<Vec<Extension>>,

    /// Status response code (text)
    pub status: String,

    /// The location (if the operation returns a location)
    #[serde(skip_serializing_if = "Option::is_none")]
    pub location: Option<String>,

    /// The Etag for the resource (if relevant)
    #[serde(skip_serializing_if = "Option::is_none")]
    pub etag: Option<String>,

    /// Server's date time modified
    #[serde(skip_serializing_if = "Option::is_none")]
    pub last_modified: Option<String>,

    /// OperationOutcome with hints and warnings (for batch/transaction)
    #[serde(skip_serializing_if = "Option::is_none")]
    pub outcome: Option<R>,

    #[serde(flatten)]
    pub additional: Map<String, Value>,
}

/// Search-related information for a Bundle entry
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct BundleEntrySearch {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub id: Option<String>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub extension: Option<Vec<Extension>>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub modifier_extension: Option<Vec<Extension>>,

    /// Why this entry is in the result set - whether it's included as a match or because of an _include requirement
    #[serde(rename = "mode", skip_serializing_if = "Option::is_none")]
    pub search_mode: Option<BundleEntrySearchMode>,

    /// Search ranking (between 0 and 1)
    #[serde(skip_serializing_if = "Option::is_none")]
    pub score: Option<Decimal>,

    #[serde(flatten)]
    pub additional: Map<String, Value>,
}

crate::fhir_model!(BundleEntrySearch, "Bundle.entry.search");
crate::impl_backbone_element!(BundleEntrySearch);

/// Why an entry is in the result set
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum BundleEntrySearchMode {
    /// This resource matched the search specification
    Match,
    /// This resource is returned because it is referred to from another resource in the search set
    Include,
    /// An OperationOutcome providing additional information about the processing of a search entry
    Outcome,
}

impl<R> Default for Bundle<R> {
    fn default() -> Self {
        Self::new(BundleType::default())
    }
}

impl<R> Bundle<R> {
    /// Create a new Bundle with minimal required fields
    pub fn new(bundle_type: BundleType) -> Self {
        Self {
            resource_type: ResourceTag::new(),
            id: None,
            meta: None,
            implicit_rules: None,
            language: None,
            identifier: None,
            bundle_type,
            timestamp: None,
            timestamp_ext: None,
            total: None,
            link: None,
            entry: None,
            signature: None,
            additional: Map::new(),
        }
    }

    /// Check if this is a transaction bundle
    pub fn is_transaction(&self) -> bool {
        matches!(self.bundle_type, BundleType::Transaction)
    }

    /// Check if this is a batch bundle
    pub fn is_batch(&self) -> bool {
        matches!(self.bundle_type, BundleType::Batch)
    }

    /// Check if this is a search result bundle
    pub fn is_searchset(&self) -> bool {
        matches!(self.bundle_type, BundleType::Searchset)
    }

    /// Get the number of entries in the bundle
    pub fn entry_count(&self) -> usize {
        self.entry.as_ref().map(|e| e.len()).unwrap_or(0)
    }

    /// Get entries as a slice
    pub fn entries(&self) -> &[BundleEntry<R>] {
        self.entry.as_deref().unwrap_or(&[])
    }

    /// Get entries as a mutable slice
    pub fn entries_mut(&mut self) -> &mut [BundleEntry<R>] {
        self.entry.as_deref_mut().unwrap_or(&mut [])
    }

    /// Resources of all entries that carry one
    pub fn resources(&self) -> impl Iterator<Item = &R> {
        self.entries().iter().filter_map(|e| e.resource.as_ref())
    }

    /// Entry whose fullUrl matches exactly
    pub fn entry_by_full_url(&self, full_url: &str) -> Option<&BundleEntry<R>> {
        self.entries()
            .iter()
            .find(|e| e.full_url.as_deref() == Some(full_url))
    }

    /// Add an entry to the bundle
    pub fn add_entry(&mut self, entry: BundleEntry<R>) {
        self.entry.get_or_insert_with(Vec::new).push(entry);
    }

    /// Add a link to the bundle
    pub fn add_link(&mut self, relation: impl Into<String>, url: impl Into<String>) {
        self.link.get_or_insert_with(Vec::new).push(BundleLink {
            relation: relation.into(),
            url: url.into(),
            ..Default::default()
        });
    }

    /// URL of the link with the given relation (`self`, `next`, ...)
    pub fn link_url(&self, relation: &str) -> Option<&str> {
        self.link
            .as_deref()
            .unwrap_or(&[])
            .iter()
            .find(|l| l.relation == relation)
            .map(|l| l.url.as_str())
    }
}

impl<R> ResourceBase for Bundle<R> {
    const RESOURCE_TYPE: &'static str = "Bundle";

    fn id(&self) -> Option<&str> {
        self.id.as_deref()
    }

    fn set_id(&mut self, id: Option<String>) {
        self.id = id;
    }

    fn meta(&self) -> Option<&Meta> {
        self.meta.as_ref()
    }

    fn meta_mut(&mut self) -> &mut Meta {
        self.meta.get_or_insert_with(Default::default)
    }

    fn language(&self) -> Option<&str> {
        self.language.as_deref()
    }
}

impl<R> FhirModel for Bundle<R>
where
    R: Serialize + DeserializeOwned + Clone + PartialEq + fmt::Debug,
{
    const TYPE_NAME: &'static str = "Bundle";
}

impl<R: Serialize> fmt::Display for Bundle<R> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let json = serde_json::to_string(self).map_err(|_| fmt::Error)?;
        f.write_str(&json)
    }
}

/// Assembles bundles, generating `urn:uuid:` full URLs for new entries
#[derive(Debug, Clone)]
pub struct BundleBuilder<R> {
    draft: Bundle<R>,
}

impl<R> BundleBuilder<R> {
    pub fn new(bundle_type: BundleType) -> Self {
        Self {
            draft: Bundle::new(bundle_type),
        }
    }

    pub fn set_id(mut self, id: impl Into<String>) -> Self {
        self.draft.id = Some(id.into());
        self
    }

    pub fn set_identifier(mut self, identifier: impl Into<Identifier>) -> Self {
        self.draft.identifier = Some(identifier.into());
        self
    }

    pub fn set_timestamp(mut self, timestamp: impl Into<String>) -> Self {
        self.draft.timestamp = Some(timestamp.into());
        self
    }

    /// Set `timestamp` to the current UTC instant
    pub fn stamp_now(self) -> Self {
        let now = Utc::now().to_rfc3339_opts(SecondsFormat::Millis, true);
        self.set_timestamp(now)
    }

    pub fn set_total(mut self, total: u32) -> Self {
        self.draft.total = Some(total);
        self
    }

    pub fn add_link(mut self, relation: impl Into<String>, url: impl Into<String>) -> Self {
        self.draft.add_link(relation, url);
        self
    }

    pub fn add_entry(mut self, entry: BundleEntry<R>) -> Self {
        self.draft.add_entry(entry);
        self
    }

    /// Add a resource under a fresh `urn:uuid:` full URL
    pub fn add_resource(self, resource: R) -> Self {
        let full_url = new_full_url();
        self.add_entry(BundleEntry::with_resource(full_url, resource))
    }

    /// Add a transaction/batch entry with a fresh `urn:uuid:` full URL
    pub fn add_request(self, method: HttpVerb, url: impl Into<String>, resource: Option<R>) -> Self {
        let entry = BundleEntry {
            full_url: Some(new_full_url()),
            resource,
            request: Some(BundleEntryRequest::new(method, url)),
            ..Default::default()
        };
        self.add_entry(entry)
    }
}

/// `urn:uuid:` URL for an entry that has no server identity yet
pub fn new_full_url() -> String {
    format!("urn:uuid:{}", Uuid::new_v4())
}

#[async_trait]
impl<R> ModelBuilder for BundleBuilder<R>
where
    R: Serialize + DeserializeOwned + Clone + PartialEq + fmt::Debug + Send,
{
    type Model = Bundle<R>;

    fn draft(&self) -> &Bundle<R> {
        &self.draft
    }

    fn draft_mut(&mut self) -> &mut Bundle<R> {
        &mut self.draft
    }

    fn build(self) -> Bundle<R> {
        self.draft
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    type JsonBundle = Bundle<Value>;

    #[test]
    fn test_deserialize_bundle() {
        let json = json!({
            "resourceType": "Bundle",
            "id": "example-bundle",
            "type": "searchset",
            "total": 1,
            "link": [{"relation": "next", "url": "http://example.org/fhir/Patient?page=2"}],
            "entry": [
                {
                    "fullUrl": "http://example.org/fhir/Patient/123",
                    "resource": {
                        "resourceType": "Patient",
                        "id": "123"
                    },
                    "search": {
                        "mode": "match",
                        "score": 0.5
                    }
                }
            ]
        });

        let bundle = JsonBundle::from_json(&json).unwrap();
        assert_eq!(bundle.id, Some("example-bundle".to_string()));
        assert_eq!(bundle.bundle_type, BundleType::Searchset);
        assert_eq!(bundle.total, Some(1));
        assert_eq!(bundle.entry_count(), 1);
        assert_eq!(bundle.link_url("next"), Some("http://example.org/fhir/Patient?page=2"));
        assert!(bundle
            .entry_by_full_url("http://example.org/fhir/Patient/123")
            .is_some());
        assert_eq!(bundle.to_json().unwrap(), json);
    }

    #[test]
    fn test_serialize_bundle() {
        let bundle = JsonBundle::new(BundleType::Transaction);
        let json = serde_json::to_value(&bundle).unwrap();
        assert_eq!(json["resourceType"], "Bundle");
        assert_eq!(json["type"], "transaction");
    }

    #[test]
    fn test_wrong_resource_type_rejected() {
        let err = JsonBundle::from_json(&json!({"resourceType": "Patient", "type": "batch"}));
        assert!(err.is_err());
    }

    #[test]
    fn test_bundle_type_predicates() {
        assert!(JsonBundle::new(BundleType::Transaction).is_transaction());
        assert!(JsonBundle::new(BundleType::Batch).is_batch());
        assert!(JsonBundle::new(BundleType::Searchset).is_searchset());
        assert!(!JsonBundle::new(BundleType::Batch).is_transaction());
    }

    #[test]
    fn test_builder_generates_uuid_urls() {
        let bundle = BundleBuilder::new(BundleType::Transaction)
            .stamp_now()
            .add_request(
                HttpVerb::Post,
                "Patient",
                Some(json!({"resourceType": "Patient"})),
            )
            .add_resource(json!({"resourceType": "Observation"}))
            .build();

        assert_eq!(bundle.entry_count(), 2);
        let urls: Vec<_> = bundle
            .entries()
            .iter()
            .filter_map(|e| e.full_url.as_deref())
            .collect();
        assert!(urls.iter().all(|u| u.starts_with("urn:uuid:")));
        assert_ne!(urls[0], urls[1]);
        assert!(bundle.timestamp.as_deref().unwrap().ends_with('Z'));

        let json = bundle.to_json().unwrap();
        assert_eq!(json["entry"][0]["request"]["method"], "POST");
    }

    #[test]
    fn test_bundle_entry_response() {
        let response: BundleEntryResponse<Value> = serde_json::from_value(json!({
            "status": "201 Created",
            "location": "Patient/123/_history/1",
            "etag": "W/\"1\""
        }))
        .unwrap();
        assert_eq!(response.status, "201 Created");
        assert_eq!(response.location.as_deref(), Some("Patient/123/_history/1"));
    }
}
