//! Repository label operations (REST).

use crate::error::Result;
use crate::request::{RestRequest, segment};
use crate::types::{Label, LabelInput};
use crate::{Client, repo_path};

impl Client {
    /// List every label of a repository.
    pub fn list_labels(&self, owner: &str, repo: &str) -> Result<Vec<Label>> {
        let path = format!("{}/labels?per_page=100", repo_path(owner, repo));
        self.rest_list(&RestRequest::get(path))
    }

    /// Create a label.
    pub fn create_label(&self, owner: &str, repo: &str, label: &LabelInput) -> Result<Label> {
        let request = RestRequest::post(format!("{}/labels", repo_path(owner, repo)))
            .field("name", &label.name)
            .field("color", &label.color)
            .field("description", &label.description);
        self.rest_as(&request)
    }

    /// Update the label currently named `current`, possibly renaming it.
    pub fn update_label(
        &self,
        owner: &str,
        repo: &str,
        current: &str,
        label: &LabelInput,
    ) -> Result<Label> {
        let request = RestRequest::patch(label_path(owner, repo, current))
            .field("new_name", &label.name)
            .field("color", &label.color)
            .field("description", &label.description);
        self.rest_as(&request)
    }

    /// Delete a label by name.
    pub fn delete_label(&self, owner: &str, repo: &str, name: &str) -> Result<()> {
        self.rest(&RestRequest::delete(label_path(owner, repo, name)))?;
        Ok(())
    }
}

fn label_path(owner: &str, repo: &str, name: &str) -> String {
    format!("{}/labels/{}", repo_path(owner, repo), segment(name))
}

#[cfg(test)]
mod tests {
    use crate::backend::CommandOutput;
    use crate::testing::Scripted;
    use crate::{Client, ErrorCategory, LabelInput};

    fn input() -> LabelInput {
        LabelInput {
            name: "type: bug".into(),
            color: "d73a4a".into(),
            description: "Something isn't working".into(),
        }
    }

    #[test]
    fn test_update_label_encodes_current_name() {
        let backend = Scripted::new(vec![CommandOutput::ok(
            r#"{"name":"type: bug","color":"d73a4a","description":"Something isn't working"}"#,
        )]);
        let calls = backend.calls_handle();
        let client = Client::with_backend(Box::new(backend));

        let label = client
            .update_label("acme", "widgets", "type: bug", &input())
            .unwrap();
        assert_eq!(label.color, "d73a4a");

        let calls = calls.lock().unwrap();
        let args = &calls[0].args;
        assert_eq!(args[2], "PATCH");
        assert_eq!(args[3], "repos/acme/widgets/labels/type%3A%20bug");
        assert!(args.contains(&"new_name=type: bug".to_string()));
    }

    #[test]
    fn test_create_label_conflict() {
        let client = Client::with_backend(Box::new(Scripted::new(vec![CommandOutput {
            success: false,
            stdout: r#"{"message":"Validation Failed","errors":[{"resource":"Label","code":"already_exists","field":"name"}],"documentation_url":"https://docs.github.com/rest/issues/labels#create-a-label","status":"422"}"#.to_string(),
            stderr: "gh: Validation Failed (HTTP 422)\n".to_string(),
        }])));
        let err = client.create_label("acme", "widgets", &input()).unwrap_err();
        assert_eq!(err.category(), ErrorCategory::Conflict);
    }

    #[test]
    fn test_delete_label_not_found() {
        let client = Client::with_backend(Box::new(Scripted::new(vec![CommandOutput::failed(
            "gh: Not Found (HTTP 404)",
        )])));
        let err = client.delete_label("acme", "widgets", "invalid").unwrap_err();
        assert_eq!(err.category(), ErrorCategory::NotFound);
    }
}
