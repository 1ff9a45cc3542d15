use crate::context::{is_truthy, text, Context};
use crate::error::MissingProperty;
use crate::{Metadata, Output, Resource, ResourceBundle};
use eyre::{eyre, WrapErr};
use serde_json::{json, Map, Value};
use std::collections::HashSet;

// https://cloud.google.com/spanner/docs/reference/rest/v1/projects.instances
const INSTANCE_TYPE: &str = "gcp-types/spanner-v1:projects.instances";

// https://cloud.google.com/spanner/docs/reference/rest/v1/projects.instances.databases
const DATABASE_TYPE: &str = "gcp-types/spanner-v1:projects.instances.databases";

// https://cloud.google.com/spanner/docs/reference/rest/v1/projects.instances/setIamPolicy
const INSTANCE_POLICY_ACTION: &str =
    "gcp-types/spanner-v1:spanner.projects.instances.setIamPolicy";

// https://cloud.google.com/spanner/docs/reference/rest/v1/projects.instances.databases/setIamPolicy
const DATABASE_POLICY_ACTION: &str =
    "gcp-types/spanner-v1:spanner.projects.instances.databases.setIamPolicy";

/// Instance properties copied over only when set
const OPTIONAL_PROPERTIES: [&str; 1] = ["labels"];

/// Deferred reference to a field of another resource, resolved by Deployment Manager
pub fn reference(resource: &str, field: &str) -> String {
    format!("$(ref.{resource}.{field})")
}

/// Database entry of the `databases` property
#[derive(Clone, Debug)]
struct Database {
    /// Full resource path, also used as the DM resource name
    resource_name: String,
    id: String,
    bindings: Option<Value>,
}

/// Accumulates resources in the order Deployment Manager should see them
#[derive(Debug, Default)]
struct Template {
    bundle: ResourceBundle,
    names: HashSet<String>,
}

impl Template {
    /// Append a resource, keeping names unique and dependencies resolvable
    fn add_resource(&mut self, resource: Resource) -> eyre::Result<()> {
        for dependency in resource.depends_on() {
            if !self.names.contains(dependency) {
                eyre::bail!(
                    "Resource {} depends on {dependency} which is not defined before it",
                    resource.name
                );
            }
        }

        if !self.names.insert(resource.name.clone()) {
            eyre::bail!("Duplicate resource name {}", resource.name);
        }

        log::debug!("Adding resource {}", resource.name);
        self.bundle.resources.push(resource);
        Ok(())
    }

    fn instance(context: &Context, name: &str, project_id: &str) -> eyre::Result<Resource> {
        let instance_id = instance_id(project_id, name);

        let instance_config = format!(
            "projects/{project_id}/instanceConfigs/{config}",
            config = text(context.required("instanceConfig")?)
        );

        let mut properties = json!({
            "instanceId": name,
            "parent": format!("projects/{project_id}"),
            "instance": {
                "name": instance_id,
                "config": instance_config,
                "nodeCount": context.required("nodeCount")?,
                "displayName": context.required("displayName")?,
            }
        });

        for key in OPTIONAL_PROPERTIES {
            if let Some(value) = context.property(key).filter(|v| is_truthy(v)) {
                properties[key] = value.clone();
            }
        }

        Ok(Resource {
            name: name.to_string(),
            kind: Some(INSTANCE_TYPE.into()),
            action: None,
            properties,
            metadata: None,
            extra: Map::new(),
        })
    }

    /// IAM policy applied to an already declared resource
    fn policy(action: &str, governed: &str, path: &str, bindings: &Value) -> Resource {
        Resource {
            name: format!("{governed}-setIamPolicy"),
            kind: None,
            action: Some(action.into()),
            properties: json!({
                "resource": path,
                "policy": {
                    "bindings": bindings,
                }
            }),
            metadata: Some(Metadata {
                depends_on: vec![governed.to_string()],
                ..Default::default()
            }),
            extra: Map::new(),
        }
    }

    fn database(instance_name: &str, instance_id: &str, database: &Database) -> Resource {
        Resource {
            name: database.resource_name.clone(),
            kind: Some(DATABASE_TYPE.into()),
            action: None,
            properties: json!({
                "parent": instance_id,
                "databaseId": database.id,
            }),
            metadata: Some(Metadata {
                depends_on: vec![instance_name.to_string()],
                ..Default::default()
            }),
            extra: Map::new(),
        }
    }
}

fn instance_id(project_id: &str, name: &str) -> String {
    format!("projects/{project_id}/instances/{name}")
}

/// Read the `databases` property, an absent or null list means no databases
fn databases(context: &Context, instance_id: &str) -> eyre::Result<Vec<Database>> {
    let Some(entries) = context.property("databases") else {
        return Ok(vec![]);
    };

    let entries = entries
        .as_array()
        .ok_or_else(|| eyre!("Property [databases] must be a list"))?;

    entries
        .iter()
        .enumerate()
        .map(|(index, entry)| -> eyre::Result<Database> {
            let entry = entry
                .as_object()
                .ok_or_else(|| eyre!("Property [databases[{index}]] must be a mapping"))?;

            let id = entry
                .get("name")
                .filter(|name| !name.is_null())
                .map(text)
                .ok_or_else(|| MissingProperty::new(&format!("databases[{index}].name")))?;

            Ok(Database {
                resource_name: format!("{instance_id}/databases/{id}"),
                id,
                bindings: entry.get("bindings").filter(|b| is_truthy(b)).cloned(),
            })
        })
        .collect()
}

/// Generate the resources Deployment Manager needs to create a Cloud Spanner
/// instance, its databases and their IAM policies
///
/// All required properties are read before anything is added, so a missing
/// one fails the whole generation without partial output.
pub fn generate(context: &Context) -> eyre::Result<ResourceBundle> {
    let name = context.text_or("name", &context.env.name);
    let project_id = context.text_or("project", &context.env.project);
    let instance_id = instance_id(&project_id, &name);

    let instance = Template::instance(context, &name, &project_id)
        .wrap_err_with(|| format!("Failed to build Spanner instance {name}"))?;

    let databases = databases(context, &instance_id)
        .wrap_err_with(|| format!("Failed to read databases of {name}"))?;

    let mut template = Template::default();
    template.add_resource(instance)?;

    if let Some(bindings) = context.property("bindings").filter(|b| is_truthy(b)) {
        template.add_resource(Template::policy(
            INSTANCE_POLICY_ACTION,
            &name,
            &instance_id,
            bindings,
        ))?;
    }

    let mut out = Map::new();

    for database in databases.iter() {
        template.add_resource(Template::database(&name, &instance_id, database))?;

        if let Some(bindings) = &database.bindings {
            template.add_resource(Template::policy(
                DATABASE_POLICY_ACTION,
                &database.resource_name,
                &database.resource_name,
                bindings,
            ))?;
        }

        out.insert(
            database.resource_name.clone(),
            json!({ "state": reference(&database.resource_name, "state") }),
        );
    }

    template.bundle.outputs = vec![
        Output {
            name: "state".into(),
            value: Value::String(reference(&name, "state")),
        },
        Output {
            name: "databases".into(),
            value: Value::Object(out),
        },
    ];

    Ok(template.bundle)
}
