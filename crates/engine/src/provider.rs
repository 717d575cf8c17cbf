//! Provider facade: which data sources exist and how to build them.

use std::sync::Arc;

use docsource_api::StoreConnector;
use docsource_util::ProviderConfig;
use indexmap::IndexMap;
use serde::Serialize;
use serde_json::{Map as JsonMap, Value};

use crate::lookup::DocumentDataSource;
use crate::model::ReadResponse;
use crate::schema::Schema;

/// A read-only data source exposed by the provider.
pub trait DataSource: Send + Sync {
    /// Registered type name, prefixed with the provider type.
    fn type_name(&self) -> &str;
    fn schema(&self) -> &Schema;
    /// Run one read. Never panics on bad input; problems come back as diagnostics.
    fn read(&self, config: &JsonMap<String, Value>) -> ReadResponse;
}

/// Builds a data source for a provider.
pub type DataSourceConstructor = fn(&Provider) -> Box<dyn DataSource>;

const DATA_SOURCES: &[DataSourceConstructor] = &[document_data_source];

fn document_data_source(provider: &Provider) -> Box<dyn DataSource> {
    Box::new(DocumentDataSource::new(&provider.type_name, Arc::clone(&provider.connector)))
}

/// Names of everything the provider registers.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ProviderMetadata {
    pub type_name: String,
    pub version: String,
    pub data_sources: Vec<String>,
    pub resources: Vec<String>,
}

pub struct Provider {
    type_name: String,
    connector: Arc<dyn StoreConnector>,
}

impl Provider {
    pub fn new(config: &ProviderConfig, connector: Arc<dyn StoreConnector>) -> Self {
        Self {
            type_name: config.provider_type.clone(),
            connector,
        }
    }

    pub fn type_name(&self) -> &str {
        &self.type_name
    }

    pub fn data_sources(&self) -> &'static [DataSourceConstructor] {
        DATA_SOURCES
    }

    /// Build the data source registered as `type_name`.
    pub fn data_source(&self, type_name: &str) -> Option<Box<dyn DataSource>> {
        self.data_sources()
            .iter()
            .map(|construct| construct(self))
            .find(|source| source.type_name() == type_name)
    }

    pub fn schemas(&self) -> IndexMap<String, Schema> {
        self.data_sources()
            .iter()
            .map(|construct| {
                let source = construct(self);
                (source.type_name().to_string(), source.schema().clone())
            })
            .collect()
    }

    pub fn metadata(&self) -> ProviderMetadata {
        ProviderMetadata {
            type_name: self.type_name.clone(),
            version: env!("CARGO_PKG_VERSION").to_string(),
            data_sources: self.schemas().into_keys().collect(),
            resources: Vec::new(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use docsource_api::MemoryStore;

    fn provider(provider_type: &str) -> Provider {
        let config = ProviderConfig {
            provider_type: provider_type.to_string(),
            ..ProviderConfig::default()
        };
        Provider::new(&config, Arc::new(MemoryStore::new()))
    }

    #[test]
    fn registers_the_document_data_source() {
        let provider = provider("docsource");
        let metadata = provider.metadata();
        assert_eq!(metadata.data_sources, vec!["docsource_firestore_document".to_string()]);
        assert!(metadata.resources.is_empty());
        assert!(provider.data_source("docsource_firestore_document").is_some());
        assert!(provider.data_source("docsource_firestore_collection").is_none());
    }

    #[test]
    fn provider_type_prefixes_type_names() {
        let provider = provider("google");
        assert_eq!(provider.type_name(), "google");
        assert!(provider.schemas().contains_key("google_firestore_document"));
    }
}
