//! Reading and searching files under the root.

use actloop_core::{Action, ActionError, ObjectSchema};
use serde::Deserialize;
use tracing::debug;

use crate::root::FileRoot;

#[derive(Debug, Deserialize)]
struct ReadArgs {
    file_name: String,
}

#[derive(Debug, Deserialize)]
struct SearchArgs {
    file_name: String,
    search_term: String,
}

/// `read_file(file_name)`: the file's contents as text.
pub fn read_file(root: FileRoot) -> Action {
    Action::typed("read_file", move |args: ReadArgs| {
        let root = root.clone();
        async move {
            let path = root.resolve(&args.file_name)?;
            let content = tokio::fs::read_to_string(&path).await?;
            debug!(path = %path.display(), bytes = content.len(), "Read file");
            Ok::<_, ActionError>(content)
        }
    })
    .description("Reads the content of a specified file in the directory.")
    .parameters(
        ObjectSchema::new()
            .param_with_description::<String>("file_name", "Name of the file to read")
            .build(),
    )
    .tags(["file_operations", "read"])
    .build()
}

/// `search_in_file(file_name, search_term)`: `[line_no, line]` pairs for
/// every line containing the term. Line numbers start at 1 and lines are
/// trimmed.
pub fn search_in_file(root: FileRoot) -> Action {
    Action::typed("search_in_file", move |args: SearchArgs| {
        let root = root.clone();
        async move {
            let path = root.resolve(&args.file_name)?;
            let content = tokio::fs::read_to_string(&path).await?;
            Ok::<_, ActionError>(matching_lines(&content, &args.search_term))
        }
    })
    .description("Search for a term in a specific file")
    .parameters(
        ObjectSchema::new()
            .param_with_description::<String>("file_name", "Name of the file to search in")
            .param_with_description::<String>("search_term", "Text to search for")
            .build(),
    )
    .tags(["file_operations", "read", "search"])
    .build()
}

fn matching_lines(content: &str, term: &str) -> Vec<(usize, String)> {
    content
        .lines()
        .enumerate()
        .filter(|(_, line)| line.contains(term))
        .map(|(i, line)| (i + 1, line.trim().to_string()))
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn fixture() -> tempfile::TempDir {
        let dir = tempfile::tempdir().unwrap();
        std::fs::write(
            dir.path().join("notes.txt"),
            "alpha\n    TODO: write docs\nbeta\n\tTODO: add tests  \n",
        )
        .unwrap();
        dir
    }

    #[tokio::test]
    async fn reads_file_contents() {
        let dir = fixture();
        let action = read_file(FileRoot::new(dir.path()));

        let result = action.execute(json!({"file_name": "notes.txt"})).await.unwrap();
        assert!(result.as_str().unwrap().starts_with("alpha\n"));
    }

    #[tokio::test]
    async fn missing_file_is_an_io_error() {
        let dir = fixture();
        let action = read_file(FileRoot::new(dir.path()));

        let err = action.execute(json!({"file_name": "nope.txt"})).await.unwrap_err();
        assert!(matches!(err, ActionError::Io(_)));
    }

    #[tokio::test]
    async fn missing_argument_is_rejected() {
        let action = read_file(FileRoot::new("."));
        let err = action.execute(json!({})).await.unwrap_err();
        assert!(matches!(err, ActionError::InvalidArguments(_)));
    }

    #[tokio::test]
    async fn traversal_is_rejected_before_touching_disk() {
        let dir = fixture();
        let action = read_file(FileRoot::new(dir.path()));

        let err = action
            .execute(json!({"file_name": "../../etc/passwd"}))
            .await
            .unwrap_err();
        assert!(matches!(err, ActionError::InvalidArguments(_)));
    }

    #[tokio::test]
    async fn search_reports_one_based_trimmed_lines() {
        let dir = fixture();
        let action = search_in_file(FileRoot::new(dir.path()));

        let result = action
            .execute(json!({"file_name": "notes.txt", "search_term": "TODO"}))
            .await
            .unwrap();
        assert_eq!(
            result,
            json!([[2, "TODO: write docs"], [4, "TODO: add tests"]])
        );
    }

    #[tokio::test]
    async fn search_without_matches_is_empty() {
        let dir = fixture();
        let action = search_in_file(FileRoot::new(dir.path()));

        let result = action
            .execute(json!({"file_name": "notes.txt", "search_term": "gamma"}))
            .await
            .unwrap();
        assert_eq!(result, json!([]));
    }

    #[test]
    fn schemas_require_their_arguments() {
        let action = search_in_file(FileRoot::new("."));
        assert_eq!(
            action.parameters()["required"],
            json!(["file_name", "search_term"])
        );
    }
}
