//! Writing files under the root.

use actloop_core::{Action, ActionError, ObjectSchema};
use serde::Deserialize;
use tracing::debug;

use crate::root::FileRoot;

#[derive(Debug, Deserialize)]
struct WriteArgs {
    file_name: String,
    content: String,
}

/// `write_file(file_name, content)`: create or overwrite the file and
/// return the number of bytes written. Missing parent directories are
/// created.
pub fn write_file(root: FileRoot) -> Action {
    Action::typed("write_file", move |args: WriteArgs| {
        let root = root.clone();
        async move {
            let path = root.resolve(&args.file_name)?;
            if let Some(parent) = path.parent() {
                tokio::fs::create_dir_all(parent).await?;
            }
            tokio::fs::write(&path, args.content.as_bytes()).await?;
            debug!(path = %path.display(), bytes = args.content.len(), "Wrote file");
            Ok::<_, ActionError>(args.content.len())
        }
    })
    .description("Writes content to a file. Creates the file if it doesn't exist, overwrites it if it does.")
    .parameters(
        ObjectSchema::new()
            .param_with_description::<String>("file_name", "Name of the file to write")
            .param_with_description::<String>("content", "The content to write")
            .build(),
    )
    .tags(["file_operations", "write"])
    .build()
}
