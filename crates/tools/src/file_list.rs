//! Directory listing actions.

use actloop_core::{Action, ActionError, ObjectSchema, empty_object_schema};
use serde::Deserialize;
use tracing::debug;

use crate::root::FileRoot;

const DEFAULT_EXTENSION: &str = "rs";

#[derive(Debug, Deserialize)]
struct NoArgs {}

#[derive(Debug, Deserialize)]
struct ProjectFilesArgs {
    #[serde(default)]
    extension: Option<String>,
}

/// `list_files()`: every entry in the root, sorted by name.
pub fn list_files(root: FileRoot) -> Action {
    Action::typed("list_files", move |_: NoArgs| {
        let root = root.clone();
        async move { entry_names(&root, |_| true).await }
    })
    .description("Returns a list of files in the directory.")
    .parameters(empty_object_schema())
    .tags(["file_operations", "list", "read"])
    .build()
}

/// `list_project_files(extension?)`: regular files with the given
/// extension (default `rs`), sorted by name.
pub fn list_project_files(root: FileRoot) -> Action {
    Action::typed("list_project_files", move |args: ProjectFilesArgs| {
        let root = root.clone();
        async move {
            let extension = args.extension.unwrap_or_else(|| DEFAULT_EXTENSION.to_string());
            let extension = extension.trim_start_matches('.').to_string();
            project_files(&root, &extension).await
        }
    })
    .description(
        "Lists all project source files in the directory with the given extension \
         (defaults to \"rs\"), sorted by name.",
    )
    .parameters(
        ObjectSchema::new()
            .param_with_description::<Option<String>>(
                "extension",
                "File extension to match, without the leading dot",
            )
            .build(),
    )
    .tags(["file_operations", "list", "read"])
    .build()
}

async fn entry_names(
    root: &FileRoot,
    keep: impl Fn(&std::fs::FileType) -> bool,
) -> Result<Vec<String>, ActionError> {
    let mut entries = tokio::fs::read_dir(root.dir()).await?;
    let mut names = Vec::new();
    while let Some(entry) = entries.next_entry().await? {
        let file_type = entry.file_type().await?;
        if keep(&file_type) {
            names.push(entry.file_name().to_string_lossy().into_owned());
        }
    }
    names.sort();
    debug!(dir = %root.dir().display(), count = names.len(), "Listed directory");
    Ok(names)
}

async fn project_files(root: &FileRoot, extension: &str) -> Result<Vec<String>, ActionError> {
    let suffix = format!(".{extension}");
    let files = entry_names(root, |t| t.is_file()).await?;
    Ok(files.into_iter().filter(|name| name.ends_with(&suffix)).collect())
}
