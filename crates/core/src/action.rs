//! Actions — the named, schema-described operations an agent may invoke.
//!
//! An [`Action`] is the catalog-population record: name, description,
//! parameter schema, terminal flag, tags, and the handler that does the work.
//! Actions are assembled with [`ActionBuilder`] at composition time and are
//! immutable once built.

use async_trait::async_trait;
use serde::Serialize;
use serde::de::DeserializeOwned;
use serde_json::Value;
use std::fmt;
use std::future::Future;
use std::marker::PhantomData;
use std::sync::Arc;

use crate::error::ActionError;
use crate::provider::ToolDefinition;
use crate::schema::empty_object_schema;

/// Description used when an action is built without one.
pub const DEFAULT_DESCRIPTION: &str = "No description provided.";

/// The callable behind an action.
///
/// Receives the decoded `args` object and returns a JSON-serializable value,
/// or an error that the environment will turn into a failed result.
#[async_trait]
pub trait ActionHandler: Send + Sync {
    async fn call(&self, args: Value) -> Result<Value, ActionError>;
}

/// Adapts a synchronous closure over raw JSON arguments.
pub struct FnHandler<F>(pub F);

#[async_trait]
impl<F> ActionHandler for FnHandler<F>
where
    F: Fn(Value) -> Result<Value, ActionError> + Send + Sync,
{
    async fn call(&self, args: Value) -> Result<Value, ActionError> {
        (self.0)(args)
    }
}

/// Adapts an async function over a typed argument struct.
///
/// The JSON `args` object is deserialized into `A`, so each field of `A` is
/// one named parameter. Deserialization failures surface as
/// [`ActionError::InvalidArguments`].
pub struct TypedHandler<A, F> {
    f: F,
    _args: PhantomData<fn(A)>,
}

impl<A, F> TypedHandler<A, F> {
    pub fn new(f: F) -> Self {
        Self {
            f,
            _args: PhantomData,
        }
    }
}

#[async_trait]
impl<A, R, F, Fut> ActionHandler for TypedHandler<A, F>
where
    A: DeserializeOwned + Send + 'static,
    R: Serialize + Send + 'static,
    F: Fn(A) -> Fut + Send + Sync,
    Fut: Future<Output = Result<R, ActionError>> + Send,
{
    async fn call(&self, args: Value) -> Result<Value, ActionError> {
        let args: A = serde_json::from_value(args)
            .map_err(|e| ActionError::InvalidArguments(e.to_string()))?;
        let output = (self.f)(args).await?;
        Ok(serde_json::to_value(output)?)
    }
}

/// A registered operation. Cheap to clone; the handler is shared.
#[derive(Clone)]
pub struct Action {
    name: String,
    description: String,
    parameters: Value,
    handler: Arc<dyn ActionHandler>,
    terminal: bool,
    tags: Vec<String>,
}

impl Action {
    /// Start building an action around an existing handler.
    pub fn builder(name: impl Into<String>, handler: impl ActionHandler + 'static) -> ActionBuilder {
        ActionBuilder::new(name, Arc::new(handler))
    }

    /// Start building an action around a synchronous closure.
    pub fn from_fn<F>(name: impl Into<String>, f: F) -> ActionBuilder
    where
        F: Fn(Value) -> Result<Value, ActionError> + Send + Sync + 'static,
    {
        Self::builder(name, FnHandler(f))
    }

    /// Start building an action around an async function of typed arguments.
    pub fn typed<A, R, F, Fut>(name: impl Into<String>, f: F) -> ActionBuilder
    where
        A: DeserializeOwned + Send + 'static,
        R: Serialize + Send + 'static,
        F: Fn(A) -> Fut + Send + Sync + 'static,
        Fut: Future<Output = Result<R, ActionError>> + Send + 'static,
    {
        Self::builder(name, TypedHandler::new(f))
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn description(&self) -> &str {
        &self.description
    }

    /// JSON Schema describing the action's arguments.
    pub fn parameters(&self) -> &Value {
        &self.parameters
    }

    /// Whether selecting this action ends the loop.
    pub fn is_terminal(&self) -> bool {
        self.terminal
    }

    /// Tags in declaration order, without duplicates.
    pub fn tags(&self) -> &[String] {
        &self.tags
    }

    pub fn has_any_tag<S: AsRef<str>>(&self, tags: &[S]) -> bool {
        tags.iter().any(|t| self.tags.iter().any(|own| own == t.as_ref()))
    }

    /// Run the handler. Errors propagate; see `Environment` for the
    /// non-propagating wrapper the loop uses.
    pub async fn execute(&self, args: Value) -> Result<Value, ActionError> {
        self.handler.call(args).await
    }

    /// Whether both values share the same handler instance.
    pub fn same_handler(&self, other: &Action) -> bool {
        Arc::ptr_eq(&self.handler, &other.handler)
    }

    /// Convert this action into a ToolDefinition for sending to the model.
    pub fn to_definition(&self) -> ToolDefinition {
        ToolDefinition {
            name: self.name.clone(),
            description: self.description.clone(),
            parameters: self.parameters.clone(),
        }
    }
}

impl fmt::Debug for Action {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Action")
            .field("name", &self.name)
            .field("description", &self.description)
            .field("parameters", &self.parameters)
            .field("terminal", &self.terminal)
            .field("tags", &self.tags)
            .finish_non_exhaustive()
    }
}

/// Builder for [`Action`].
pub struct ActionBuilder {
    name: String,
    description: Option<String>,
    parameters: Option<Value>,
    handler: Arc<dyn ActionHandler>,
    terminal: bool,
    tags: Vec<String>,
}

impl ActionBuilder {
    pub fn new(name: impl Into<String>, handler: Arc<dyn ActionHandler>) -> Self {
        Self {
            name: name.into(),
            description: None,
            parameters: None,
            handler,
            terminal: false,
            tags: Vec::new(),
        }
    }

    pub fn description(mut self, description: impl Into<String>) -> Self {
        self.description = Some(description.into());
        self
    }

    pub fn parameters(mut self, schema: Value) -> Self {
        self.parameters = Some(schema);
        self
    }

    pub fn terminal(mut self, terminal: bool) -> Self {
        self.terminal = terminal;
        self
    }

    pub fn tag(mut self, tag: impl Into<String>) -> Self {
        let tag = tag.into();
        if !self.tags.contains(&tag) {
            self.tags.push(tag);
        }
        self
    }

    pub fn tags<I, S>(self, tags: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        tags.into_iter().fold(self, |builder, tag| builder.tag(tag))
    }

    pub fn build(self) -> Action {
        let description = self
            .description
            .map(|d| d.trim().to_string())
            .filter(|d| !d.is_empty())
            .unwrap_or_else(|| DEFAULT_DESCRIPTION.to_string());

        Action {
            name: self.name,
            description,
            parameters: self.parameters.unwrap_or_else(empty_object_schema),
            handler: self.handler,
            terminal: self.terminal,
            tags: self.tags,
        }
    }
}
