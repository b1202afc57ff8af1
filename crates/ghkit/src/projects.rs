//! Project (v2) field and view operations (GraphQL).

use crate::error::{Error, Result};
use crate::queries;
use crate::request::GraphQlRequest;
use crate::types::{FieldInput, Project, ProjectField, ProjectView};
use crate::Client;
use serde::de::DeserializeOwned;
use serde_json::{Value, json};

impl Client {
    /// Look up project `number` owned by `owner`, with fields and views.
    pub fn project(&self, owner: &str, number: u64) -> Result<Project> {
        let request = GraphQlRequest::new(queries::PROJECT)
            .var("owner", owner)
            .var("number", number);
        let data = self.graphql(&request)?;

        let owner_node = &data["repositoryOwner"];
        if owner_node.is_null() {
            return Err(Error::NotFound {
                message: format!("no user or organization named '{owner}'"),
            });
        }
        let node = &owner_node["projectV2"];
        if node.is_null() {
            return Err(Error::NotFound {
                message: format!("project {number} not found for '{owner}'"),
            });
        }

        Ok(Project {
            id: str_member(node, "id")?,
            title: str_member(node, "title")?,
            url: str_member(node, "url")?,
            viewer_can_update: node["viewerCanUpdate"].as_bool().unwrap_or(false),
            fields: nodes(&node["fields"])?,
            views: nodes::<ProjectView>(&node["views"])?,
        })
    }

    /// Create a custom field on a project.
    pub fn create_field(&self, project_id: &str, field: &FieldInput) -> Result<ProjectField> {
        let mut input = json!({
            "projectId": project_id,
            "name": field.name,
            "dataType": field.data_type.as_graphql(),
        });
        if !field.options.is_empty() {
            input["singleSelectOptions"] = serde_json::to_value(&field.options)?;
        }
        let data = self.graphql(&GraphQlRequest::new(queries::CREATE_FIELD).var("input", input))?;
        let created = data["createProjectV2Field"]["projectV2Field"].clone();
        serde_json::from_value(created).map_err(|e| {
            Error::UnexpectedResponse(format!("createProjectV2Field returned no field: {e}"))
        })
    }

    /// Rename a field and replace its single-select options.
    ///
    /// GitHub replaces the whole option list, so every option must be sent.
    pub fn update_field(&self, field_id: &str, field: &FieldInput) -> Result<()> {
        let mut input = json!({
            "fieldId": field_id,
            "name": field.name,
        });
        if !field.options.is_empty() {
            input["singleSelectOptions"] = serde_json::to_value(&field.options)?;
        }
        self.graphql(&GraphQlRequest::new(queries::UPDATE_FIELD).var("input", input))?;
        Ok(())
    }

    /// Delete a custom field.
    pub fn delete_field(&self, field_id: &str) -> Result<()> {
        let input = json!({ "fieldId": field_id });
        self.graphql(&GraphQlRequest::new(queries::DELETE_FIELD).var("input", input))?;
        Ok(())
    }
}

fn str_member(node: &Value, name: &str) -> Result<String> {
    node[name]
        .as_str()
        .map(ToString::to_string)
        .ok_or_else(|| Error::UnexpectedResponse(format!("project is missing '{name}'")))
}

/// Items of a GraphQL connection, skipping nodes no fragment matched.
fn nodes<T: DeserializeOwned>(connection: &Value) -> Result<Vec<T>> {
    connection["nodes"]
        .as_array()
        .map(Vec::as_slice)
        .unwrap_or_default()
        .iter()
        .filter(|n| n.get("id").is_some())
        .map(|n| T::deserialize(n).map_err(Error::from))
        .collect()
}
