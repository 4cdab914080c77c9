//! The terminal action.

use actloop_core::{Action, ActionError, ObjectSchema};
use serde::Deserialize;

#[derive(Debug, Deserialize)]
struct TerminateArgs {
    message: String,
}

/// `terminate(message)`: ends the run, echoing the summary for the user.
pub fn terminate() -> Action {
    Action::typed("terminate", |args: TerminateArgs| async move {
        Ok::<_, ActionError>(format!("{}\nTerminating...", args.message))
    })
    .description("Terminates the session and prints the message to the user.")
    .parameters(
        ObjectSchema::new()
            .param_with_description::<String>("message", "Summary for the user")
            .build(),
    )
    .terminal(true)
    .tags(["system"])
    .build()
}
