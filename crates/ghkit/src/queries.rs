//! GraphQL documents for Projects (v2).
//!
//! All dynamic values are bound as variables.

/// Look up a project with its fields and views by owner login and number.
pub const PROJECT: &str = r"
query($owner: String!, $number: Int!) {
  repositoryOwner(login: $owner) {
    ... on ProjectV2Owner {
      projectV2(number: $number) {
        id
        title
        url
        viewerCanUpdate
        fields(first: 100) {
          nodes {
            ... on ProjectV2Field { id name dataType }
            ... on ProjectV2IterationField { id name dataType }
            ... on ProjectV2SingleSelectField {
              id name dataType
              options { id name color description }
            }
          }
        }
        views(first: 50) {
          nodes { id name layout }
        }
      }
    }
  }
}
";

/// Create a custom field.
pub const CREATE_FIELD: &str = r"
mutation($input: CreateProjectV2FieldInput!) {
  createProjectV2Field(input: $input) {
    projectV2Field {
      ... on ProjectV2Field { id name dataType }
      ... on ProjectV2SingleSelectField {
        id name dataType
        options { id name color description }
      }
    }
  }
}
";

/// Rename a field or replace its single-select options.
pub const UPDATE_FIELD: &str = r"
mutation($input: UpdateProjectV2FieldInput!) {
  updateProjectV2Field(input: $input) {
    projectV2Field {
      ... on ProjectV2Field { id }
      ... on ProjectV2SingleSelectField { id }
    }
  }
}
";

/// Delete a custom field.
pub const DELETE_FIELD: &str = r"
mutation($input: DeleteProjectV2FieldInput!) {
  deleteProjectV2Field(input: $input) {
    projectV2Field {
      ... on ProjectV2Field { id }
      ... on ProjectV2SingleSelectField { id }
    }
  }
}
";
