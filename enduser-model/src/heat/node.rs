use serde_json::Value;

use crate::document::{self, Document, DocumentError};
use crate::heat::{HeatConsumer, HeatProducer, HeatStorage};

/// A self-contained heat sub-network.
///
/// Producers, storages and consumers attached to the same node exchange heat
/// freely; separate nodes are thermally independent. Electrically, every heat
/// producer draws from the shared power balance of the end user.
#[derive(Debug, Clone, PartialEq)]
pub struct HeatNode {
    /// Name of the instantiated object, for logging.
    pub name: String,
    pub heatproducers: Vec<HeatProducer>,
    pub heatstorages: Vec<HeatStorage>,
    pub heatconsumers: Vec<HeatConsumer>,
}

impl HeatNode {
    pub fn new() -> Self {
        Self {
            name: "HeatNode".to_string(),
            heatproducers: Vec::new(),
            heatstorages: Vec::new(),
            heatconsumers: Vec::new(),
        }
    }

    pub fn to_dict(&self, include_results: bool) -> Document {
        let mut data = Document::new();

        let mut producers = Document::new();
        for (i, heatproducer) in self.heatproducers.iter().enumerate() {
            producers.insert(i.to_string(), Value::Object(heatproducer.to_dict(include_results)));
        }
        data.insert("heatproducers_d".into(), Value::Object(producers));

        let mut storages = Document::new();
        for (i, heatstorage) in self.heatstorages.iter().enumerate() {
            storages.insert(i.to_string(), Value::Object(heatstorage.to_dict(include_results)));
        }
        data.insert("heatstorages_d".into(), Value::Object(storages));

        let mut consumers = Document::new();
        for (i, heatconsumer) in self.heatconsumers.iter().enumerate() {
            consumers.insert(i.to_string(), Value::Object(heatconsumer.to_dict(include_results)));
        }
        data.insert("heatconsumers_d".into(), Value::Object(consumers));

        data
    }

    pub fn from_dict(data: &Document, include_results: bool) -> Result<Self, DocumentError> {
        let mut node = Self::new();

        for entry in document::get_entries(data, "heatproducers_d")? {
            node.heatproducers
                .push(HeatProducer::from_dict(entry, include_results)?);
        }
        for entry in document::get_entries(data, "heatstorages_d")? {
            node.heatstorages
                .push(HeatStorage::from_dict(entry, include_results)?);
        }
        for entry in document::get_entries(data, "heatconsumers_d")? {
            node.heatconsumers
                .push(HeatConsumer::from_dict(entry, include_results)?);
        }

        Ok(node)
    }
}

impl Default for HeatNode {
    fn default() -> Self {
        Self::new()
    }
}
