pub mod context;
pub mod error;
pub mod template;

pub use context::{Context, Env};
pub use error::MissingProperty;
pub use template::{generate, reference};

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

/// A single resource entry of the Deployment Manager config
///
/// Either `type` (a resource to create) or `action` (a call to make) is set.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct Resource {
    pub name: String,

    #[serde(rename = "type", default, skip_serializing_if = "Option::is_none")]
    pub kind: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub action: Option<String>,

    #[serde(default, skip_serializing_if = "Value::is_null")]
    pub properties: Value,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub metadata: Option<Metadata>,

    /// Fields not interpreted here, e.g. `accessControl`, kept as written
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct Metadata {
    #[serde(rename = "dependsOn", default, skip_serializing_if = "Vec::is_empty")]
    pub depends_on: Vec<String>,

    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

impl Resource {
    /// Names of the resources this one must be applied after
    pub fn depends_on(&self) -> &[String] {
        self.metadata
            .as_ref()
            .map(|metadata| metadata.depends_on.as_slice())
            .unwrap_or_default()
    }
}

/// Named value exposed by the template once the deployment is done
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct Output {
    pub name: String,
    pub value: Value,
}

/// Everything the template returns to Deployment Manager
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct ResourceBundle {
    pub resources: Vec<Resource>,
    pub outputs: Vec<Output>,
}

impl ResourceBundle {
    pub fn output(&self, name: &str) -> Option<&Value> {
        self.outputs
            .iter()
            .find(|output| output.name == name)
            .map(|output| &output.value)
    }
}
