use serde::{Deserialize, Serialize};

/// Label document served next to the model: `{ "labels": [...] }`.
/// Other fields in the document are ignored.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct LabelMetadata {
    #[serde(default)]
    pub labels: Option<Vec<String>>,
}

impl LabelMetadata {
    pub fn from_labels(labels: Vec<String>) -> Self {
        Self {
            labels: Some(labels),
        }
    }

    pub fn from_json_slice(bytes: &[u8]) -> Result<Self, serde_json::Error> {
        serde_json::from_slice(bytes)
    }

    pub fn label(&self, index: usize) -> Option<&str> {
        self.labels
            .as_ref()
            .and_then(|labels| labels.get(index))
            .map(String::as_str)
    }

    pub fn label_count(&self) -> Option<usize> {
        self.labels.as_ref().map(Vec::len)
    }
}
