//! `actloop tools` — list the built-in actions.

use actloop_config::AppConfig;
use actloop_core::ActionCatalog;

pub fn run(tags: Option<Vec<String>>) -> Result<(), Box<dyn std::error::Error>> {
    let config = AppConfig::load().map_err(|e| format!("Failed to load config: {e}"))?;
    let catalog = match tags {
        Some(tags) => actloop_tools::catalog_for_tags(&config.tools.root, tags.as_slice()),
        None => actloop_tools::full_catalog(&config.tools.root),
    };

    print!("{}", render_table(&catalog));
    Ok(())
}

fn render_table(catalog: &ActionCatalog) -> String {
    if catalog.is_empty() {
        return "  No actions match the given tags.\n".to_string();
    }

    let mut out = String::new();
    for action in catalog.list_actions() {
        let terminal = if action.is_terminal() { " (terminal)" } else { "" };
        out.push_str(&format!("  {}{terminal}\n", action.name()));
        out.push_str(&format!("    tags: {}\n", action.tags().join(", ")));
        out.push_str(&format!("    {}\n", action.description()));
    }
    out
}
