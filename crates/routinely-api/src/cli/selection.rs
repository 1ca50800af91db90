//! Selection commands: `toggle`, `remove`, `clear`, `selection`.
//!
//! Every mutation is persisted before the command prints anything.

use anyhow::{bail, Result};
use console::style;
use dialoguer::Confirm;

use routinely_core::view::{render_selection, SelectionView};

use crate::state::AppState;

/// Toggle a product by name.
///
/// The product is looked up in the catalog first, then in the current
/// selection so a product dropped from the catalog can still be deselected.
pub async fn toggle(state: &AppState, name: &str, json: bool) -> Result<()> {
    if let Err(err) = state.load_catalog().await {
        tracing::warn!("{err:#}");
    }

    let catalog = state.catalog.read().await;
    let mut selection = state.selection.lock().await;

    let product = match catalog.find(name) {
        Some(product) => product.clone(),
        None => match selection.selection().items().iter().find(|p| p.name == name) {
            Some(product) => product.clone(),
            None => bail!("Product '{name}' not found in catalog"),
        },
    };

    let selected = selection.toggle(&product).await?;

    if json {
        let result = serde_json::json!({
            "name": product.name,
            "selected": selected,
            "selection": render_selection(selection.selection()),
        });
        println!("{}", serde_json::to_string_pretty(&result)?);
    } else {
        println!();
        if selected {
            println!(
                "  {} Selected {} ({})",
                style("+").green().bold(),
                style(&product.name).cyan(),
                product.brand
            );
        } else {
            println!(
                "  {} Deselected {}",
                style("-").yellow().bold(),
                style(&product.name).cyan()
            );
        }
        print_selection(&render_selection(selection.selection()));
    }

    Ok(())
}

/// Remove a product from the selection. Absent names are a no-op.
pub async fn remove(state: &AppState, name: &str, json: bool) -> Result<()> {
    let mut selection = state.selection.lock().await;
    let removed = selection.remove(name).await?;

    if json {
        let result = serde_json::json!({
            "name": name,
            "removed": removed,
            "selection": render_selection(selection.selection()),
        });
        println!("{}", serde_json::to_string_pretty(&result)?);
    } else {
        println!();
        if removed {
            println!("  {} Removed {}", style("ok").green(), style(name).cyan());
        } else {
            println!(
                "  {} '{}' was not selected",
                style("i").blue().bold(),
                style(name).cyan()
            );
        }
        print_selection(&render_selection(selection.selection()));
    }

    Ok(())
}

/// Clear the whole selection, confirming first unless `force` or `json`.
pub async fn clear(state: &AppState, force: bool, json: bool) -> Result<()> {
    let mut selection = state.selection.lock().await;
    let count = selection.selection().len();

    if count > 0 && !force && !json {
        let confirmed = Confirm::new()
            .with_prompt(format!("Remove all {count} selected product(s)?"))
            .default(false)
            .interact()?;

        if !confirmed {
            println!("  Cancelled.");
            return Ok(());
        }
    }

    selection.clear().await?;

    if json {
        let result = serde_json::json!({ "cleared": count });
        println!("{}", serde_json::to_string_pretty(&result)?);
    } else {
        println!();
        println!("  {} Cleared {} product(s)", style("ok").green(), count);
        println!();
    }

    Ok(())
}

/// Show the current selection.
pub async fn show(state: &AppState, json: bool) -> Result<()> {
    let selection = state.selection.lock().await;

    if json {
        println!("{}", serde_json::to_string_pretty(selection.selection())?);
    } else {
        println!();
        print_selection(&render_selection(selection.selection()));
    }

    Ok(())
}

pub fn print_selection(view: &SelectionView) {
    println!();
    println!("  {}", style("Selected products").bold());
    match view {
        SelectionView::Placeholder { message } => {
            println!("  {}", style(message).dim());
        }
        SelectionView::Items { items } => {
            for item in items {
                println!("  {} {}", style("•").cyan(), item.label);
            }
        }
    }
    println!();
}
