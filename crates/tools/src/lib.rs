//! Built-in actions for ActLoop.
//!
//! Everything here works on files under a single root directory: listing,
//! reading, searching and writing. `terminate` ends the run with a summary
//! for the user.
//!
//! Tags group the actions so an agent can be handed a focused catalog:
//!
//! | tag               | actions                                             |
//! |-------------------|-----------------------------------------------------|
//! | `file_operations` | every file action                                   |
//! | `read`            | list_files, list_project_files, read_file, search_in_file |
//! | `list`            | list_files, list_project_files                      |
//! | `search`          | search_in_file                                      |
//! | `write`           | write_file                                          |
//! | `system`          | terminate                                           |

pub mod file_list;
pub mod file_read;
pub mod file_write;
pub mod root;
pub mod terminate;

use actloop_core::ActionCatalog;
use std::path::PathBuf;

pub use root::FileRoot;

/// A catalog with every built-in action, rooted at `root`.
pub fn full_catalog(root: impl Into<PathBuf>) -> ActionCatalog {
    let root = FileRoot::new(root);
    let mut catalog = ActionCatalog::new();
    catalog.register(file_list::list_files(root.clone()));
    catalog.register(file_list::list_project_files(root.clone()));
    catalog.register(file_read::read_file(root.clone()));
    catalog.register(file_read::search_in_file(root.clone()));
    catalog.register(file_write::write_file(root));
    catalog.register(terminate::terminate());
    catalog
}

/// The built-in actions carrying any of `tags`, in registration order.
pub fn catalog_for_tags<S: AsRef<str>>(root: impl Into<PathBuf>, tags: &[S]) -> ActionCatalog {
    ActionCatalog::with_tags(&full_catalog(root), tags)
}
