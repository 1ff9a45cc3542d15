use crate::error::MissingProperty;
use serde_json::{Map, Value};

/// Ambient values Deployment Manager passes to every template
#[derive(Clone, Debug, Default, PartialEq)]
pub struct Env {
    /// Name of the resource the template is expanded for
    pub name: String,

    pub project: String,

    pub deployment: Option<String>,

    /// Template type as written in the config, e.g. `cloud_spanner.py`
    pub kind: Option<String>,
}

impl Env {
    pub fn new(name: &str, project: &str) -> Self {
        Env {
            name: name.to_string(),
            project: project.to_string(),
            ..Default::default()
        }
    }
}

/// Input of a single template expansion
#[derive(Clone, Debug, Default, PartialEq)]
pub struct Context {
    pub properties: Map<String, Value>,
    pub env: Env,
}

impl Context {
    pub fn new(properties: Map<String, Value>, env: Env) -> Self {
        Context { properties, env }
    }

    /// Build a context out of an arbitrary properties value
    ///
    /// Anything other than a mapping (or null) is rejected.
    pub fn from_value(properties: Value, env: Env) -> eyre::Result<Self> {
        let properties = match properties {
            Value::Object(map) => map,
            Value::Null => Map::new(),
            other => eyre::bail!("Properties must be a mapping, got {other}"),
        };

        Ok(Context::new(properties, env))
    }

    /// Property value, explicit nulls are treated as absent
    pub fn property(&self, key: &str) -> Option<&Value> {
        self.properties.get(key).filter(|value| !value.is_null())
    }

    /// Property value which must be present
    pub fn required(&self, key: &str) -> eyre::Result<&Value> {
        self.property(key)
            .ok_or_else(|| MissingProperty::new(key).into())
    }

    /// Property rendered as text, or the fallback when the property is absent
    pub fn text_or(&self, key: &str, fallback: &str) -> String {
        self.property(key)
            .map(text)
            .unwrap_or_else(|| fallback.to_string())
    }
}

/// Whether a value counts as set
///
/// Nulls, `false`, zero, and empty strings, lists or mappings are not set.
pub(crate) fn is_truthy(value: &Value) -> bool {
    match value {
        Value::Null => false,
        Value::Bool(flag) => *flag,
        Value::Number(number) => number.as_f64().is_some_and(|n| n != 0.0),
        Value::String(string) => !string.is_empty(),
        Value::Array(items) => !items.is_empty(),
        Value::Object(map) => !map.is_empty(),
    }
}

/// Render a scalar for use inside a resource path
pub fn text(value: &Value) -> String {
    match value {
        Value::String(string) => string.clone(),
        other => other.to_string(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn falsy_values() {
        for value in [
            json!(null),
            json!(false),
            json!(0),
            json!(0.0),
            json!(""),
            json!([]),
            json!({}),
        ] {
            assert!(!is_truthy(&value), "{value} must be falsy");
        }
    }

    #[test]
    fn truthy_values() {
        for value in [
            json!(true),
            json!(3),
            json!("x"),
            json!([1]),
            json!({"env": "prod"}),
        ] {
            assert!(is_truthy(&value), "{value} must be truthy");
        }
    }

    #[test]
    fn required_property_reports_key() {
        let context = Context::from_value(json!({"nodeCount": null}), Env::new("a", "b")).unwrap();
        let error = context.required("nodeCount").unwrap_err();

        assert_eq!(
            error.downcast_ref::<MissingProperty>(),
            Some(&MissingProperty::new("nodeCount"))
        );
    }

    #[test]
    fn text_falls_back_to_env() {
        let context =
            Context::from_value(json!({"project": "other"}), Env::new("inst1", "proj1")).unwrap();

        assert_eq!(context.text_or("name", &context.env.name), "inst1");
        assert_eq!(context.text_or("project", &context.env.project), "other");
    }

    #[test]
    fn non_mapping_properties_rejected() {
        assert!(Context::from_value(json!([1, 2]), Env::new("a", "b")).is_err());
        assert!(Context::from_value(json!(null), Env::new("a", "b")).is_ok());
    }
}
