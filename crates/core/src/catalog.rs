//! The action catalog — every operation an agent is allowed to choose.
//!
//! The loop uses the catalog to:
//! 1. Enumerate actions when building a prompt
//! 2. Resolve a decoded invocation's `tool` name to an [`Action`]
//!
//! Tag filtering doubles as capability scoping: a read-only agent is simply
//! an agent whose catalog was built with [`ActionCatalog::with_tags`].

use std::collections::HashMap;
use tracing::debug;

use crate::action::Action;
use crate::error::CatalogError;

#[derive(Debug, Clone, Default)]
pub struct ActionCatalog {
    /// Actions in first-registration order
    actions: Vec<Action>,
    /// name → position in `actions`
    by_name: HashMap<String, usize>,
    /// tag → names, in registration order
    by_tag: HashMap<String, Vec<String>>,
    /// Tags in first-seen order
    tag_order: Vec<String>,
}

impl ActionCatalog {
    pub fn new() -> Self {
        Self::default()
    }

    /// A catalog holding the actions of `source` whose tags intersect `tags`.
    pub fn with_tags<S: AsRef<str>>(source: &ActionCatalog, tags: &[S]) -> Self {
        let mut catalog = Self::new();
        for action in source.list_actions_with_tags(tags) {
            catalog.register(action.clone());
        }
        catalog
    }

    /// Register an action.
    ///
    /// Registering a name that already exists replaces the earlier action
    /// (last write wins). The replacement keeps the original position in
    /// enumeration order and in every tag it still carries; it leaves tags it
    /// dropped and joins the end of tags it gained. Registering an identical
    /// action again changes nothing.
    pub fn register(&mut self, action: Action) {
        let name = action.name().to_string();

        let previous_tags = match self.by_name.get(&name) {
            Some(&idx) => {
                debug!(action = %name, "Replacing registered action");
                let previous = self.actions[idx].tags().to_vec();
                self.actions[idx] = action;
                previous
            }
            None => {
                self.by_name.insert(name.clone(), self.actions.len());
                self.actions.push(action);
                Vec::new()
            }
        };

        let idx = self.by_name[&name];
        let current_tags = self.actions[idx].tags().to_vec();

        for tag in previous_tags.iter().filter(|t| !current_tags.contains(t)) {
            self.leave_tag(tag, &name);
        }
        for tag in current_tags.iter().filter(|t| !previous_tags.contains(t)) {
            self.join_tag(tag, &name);
        }
    }

    fn join_tag(&mut self, tag: &str, name: &str) {
        let names = self.by_tag.entry(tag.to_string()).or_default();
        if names.is_empty() {
            self.tag_order.push(tag.to_string());
        }
        if !names.iter().any(|n| n == name) {
            names.push(name.to_string());
        }
    }

    fn leave_tag(&mut self, tag: &str, name: &str) {
        let Some(names) = self.by_tag.get_mut(tag) else {
            return;
        };
        names.retain(|n| n != name);
        if names.is_empty() {
            self.by_tag.remove(tag);
            self.tag_order.retain(|t| t != tag);
        }
    }

    /// Look up an action by name.
    pub fn get_action(&self, name: &str) -> Result<&Action, CatalogError> {
        self.by_name
            .get(name)
            .map(|&idx| &self.actions[idx])
            .ok_or_else(|| CatalogError::UnknownAction(name.to_string()))
    }

    /// All actions in registration order.
    pub fn list_actions(&self) -> Vec<&Action> {
        self.actions.iter().collect()
    }

    /// Actions carrying at least one of `tags`, in registration order.
    pub fn list_actions_with_tags<S: AsRef<str>>(&self, tags: &[S]) -> Vec<&Action> {
        self.actions.iter().filter(|a| a.has_any_tag(tags)).collect()
    }

    /// Names registered under a single tag, in registration order.
    pub fn names_for_tag(&self, tag: &str) -> &[String] {
        self.by_tag.get(tag).map(Vec::as_slice).unwrap_or(&[])
    }

    /// Every tag seen so far, in first-seen order.
    pub fn tags(&self) -> &[String] {
        &self.tag_order
    }

    pub fn names(&self) -> Vec<&str> {
        self.actions.iter().map(|a| a.name()).collect()
    }

    pub fn contains(&self, name: &str) -> bool {
        self.by_name.contains_key(name)
    }

    pub fn len(&self) -> usize {
        self.actions.len()
    }

    pub fn is_empty(&self) -> bool {
        self.actions.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::Value;

    fn action(name: &str, tags: &[&str]) -> Action {
        Action::from_fn(name, |_| Ok(Value::Null))
            .tags(tags.iter().copied())
            .build()
    }

    fn sample() -> ActionCatalog {
        let mut catalog = ActionCatalog::new();
        catalog.register(action("read_file", &["file_operations", "read"]));
        catalog.register(action("write_file", &["file_operations", "write"]));
        catalog.register(action("query_database", &["database", "read"]));
        catalog.register(action("terminate", &["system"]));
        catalog
    }

    #[test]
    fn register_and_lookup() {
        let catalog = sample();
        assert!(catalog.get_action("read_file").is_ok());
        assert_eq!(
            catalog.get_action("nonexistent").unwrap_err(),
            CatalogError::UnknownAction("nonexistent".into())
        );
    }

    #[test]
    fn list_preserves_registration_order() {
        let catalog = sample();
        let names: Vec<_> = catalog.list_actions().iter().map(|a| a.name()).collect();
        assert_eq!(names, ["read_file", "write_file", "query_database", "terminate"]);
    }

    #[test]
    fn tag_filter_is_a_deduplicated_union() {
        let catalog = sample();
        let names: Vec<_> = catalog
            .list_actions_with_tags(&["read", "file_operations"])
            .iter()
            .map(|a| a.name())
            .collect();
        assert_eq!(names, ["read_file", "write_file", "query_database"]);
    }

    #[test]
    fn empty_filter_selects_nothing() {
        let catalog = sample();
        let none: [&str; 0] = [];
        assert!(catalog.list_actions_with_tags(&none).is_empty());
    }

    #[test]
    fn tag_index_matches_registrations() {
        let catalog = sample();
        assert_eq!(catalog.names_for_tag("read"), ["read_file", "query_database"]);
        assert_eq!(catalog.names_for_tag("unknown"), [] as [String; 0]);
        assert_eq!(
            catalog.tags(),
            ["file_operations", "read", "write", "database", "system"]
        );
    }

    #[test]
    fn last_registration_wins() {
        let mut catalog = sample();
        let replacement = Action::from_fn("read_file", |_| Ok(Value::Bool(true)))
            .description("second")
            .tags(["read"])
            .build();
        catalog.register(replacement.clone());

        let found = catalog.get_action("read_file").unwrap();
        assert!(found.same_handler(&replacement));
        assert_eq!(found.description(), "second");
        assert_eq!(catalog.len(), 4);
        assert_eq!(catalog.names()[0], "read_file");
        // The replacement no longer carries file_operations.
        assert_eq!(catalog.names_for_tag("file_operations"), ["write_file"]);
        assert_eq!(catalog.names_for_tag("read"), ["read_file", "query_database"]);
    }

    #[test]
    fn replacement_joins_new_tags_at_the_end() {
        let mut catalog = sample();
        catalog.register(action("read_file", &["read", "database"]));

        assert_eq!(catalog.names_for_tag("read"), ["read_file", "query_database"]);
        assert_eq!(catalog.names_for_tag("database"), ["query_database", "read_file"]);
    }

    #[test]
    fn dropped_tags_disappear_when_empty() {
        let mut catalog = ActionCatalog::new();
        catalog.register(action("x", &["old"]));
        catalog.register(action("x", &["new"]));

        assert_eq!(catalog.tags(), ["new"]);
        assert_eq!(catalog.names_for_tag("old"), [] as [String; 0]);
        assert_eq!(catalog.list_actions_with_tags(&["old"]).len(), 0);
    }

    #[test]
    fn dropped_tags_with_other_members_stay() {
        let mut catalog = sample();
        catalog.register(action("write_file", &["write"]));

        assert_eq!(catalog.names_for_tag("file_operations"), ["read_file"]);
        assert_eq!(
            catalog.tags(),
            ["file_operations", "read", "write", "database", "system"]
        );
    }

    #[test]
    fn identical_reregistration_is_idempotent() {
        let mut catalog = sample();
        let before_read = catalog.names_for_tag("read").to_vec();
        let before_tags = catalog.tags().to_vec();

        let same = catalog.get_action("read_file").unwrap().clone();
        catalog.register(same.clone());
        catalog.register(same);

        assert_eq!(catalog.len(), 4);
        assert_eq!(catalog.names_for_tag("read"), before_read.as_slice());
        assert_eq!(catalog.names_for_tag("file_operations"), ["read_file", "write_file"]);
        assert_eq!(catalog.tags(), before_tags.as_slice());
        assert_eq!(catalog.names(), ["read_file", "write_file", "query_database", "terminate"]);
    }

    #[test]
    fn scoped_catalog_for_read_only_agents() {
        let catalog = sample();
        let read_only = ActionCatalog::with_tags(&catalog, &["read"]);
        assert_eq!(read_only.names(), ["read_file", "query_database"]);
        assert!(!read_only.contains("write_file"));
    }
}
