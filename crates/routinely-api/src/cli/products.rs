//! Catalog browsing commands: `products` and `categories`.

use anyhow::Result;
use comfy_table::{presets, Cell, Color, ContentArrangement, Table};
use console::style;

use routinely_core::filter;
use routinely_core::view::{
    render_products_with_panels, render_unavailable, DescriptionPanels, ProductCard, ProductGrid,
};
use routinely_types::filter::FilterState;

use crate::state::AppState;

/// List products matching the filter, marking selected ones.
pub async fn list_products(
    state: &AppState,
    category: Option<String>,
    search: Option<String>,
    expand: Vec<String>,
    json: bool,
) -> Result<()> {
    // A failed load renders as the unavailable grid below.
    if let Err(err) = state.load_catalog().await {
        tracing::warn!("{err:#}");
    }

    let mut filter_state = FilterState::default();
    filter_state.set_category(category);
    filter_state.set_search_term(search.unwrap_or_default());
    let mut panels = DescriptionPanels::new();
    for name in &expand {
        panels.expand(name);
    }

    let catalog = state.catalog.read().await;
    let selection = state.selection.lock().await;
    let grid = match catalog.unavailable() {
        Some(_) => render_unavailable(),
        None => {
            let filtered = filter::apply_state(catalog.all(), &filter_state);
            render_products_with_panels(&filtered, selection.selection(), &panels)
        }
    };

    if json {
        println!("{}", serde_json::to_string_pretty(&grid)?);
        return Ok(());
    }

    match &grid {
        ProductGrid::Empty { message } => {
            println!();
            println!("  {} {}", style("i").blue().bold(), message);
            println!();
        }
        ProductGrid::Unavailable { message } => {
            println!();
            println!("  {} {}", style("!").red().bold(), message);
            println!();
        }
        ProductGrid::Cards { cards } => {
            println!();
            println!("{}", product_table(cards));
            for card in cards.iter().filter(|c| c.description_expanded) {
                println!();
                println!("  {}", style(&card.name).cyan().bold());
                println!("  {}", card.description);
            }
            println!();
            println!(
                "  {} product(s), {} selected",
                cards.len(),
                cards.iter().filter(|c| c.selected).count()
            );
            println!();
        }
    }

    Ok(())
}

/// List distinct categories in catalog order.
pub async fn list_categories(state: &AppState, json: bool) -> Result<()> {
    state.load_catalog().await?;
    let catalog = state.catalog.read().await;
    let categories = catalog.categories();

    if json {
        println!("{}", serde_json::to_string_pretty(&categories)?);
        return Ok(());
    }

    println!();
    if categories.is_empty() {
        println!("  {} The catalog is empty.", style("i").blue().bold());
    }
    for category in categories {
        println!("  {}", style(category).cyan());
    }
    println!();
    Ok(())
}

/// Build the product table. Selected rows get a check mark and are highlighted.
pub fn product_table(cards: &[ProductCard]) -> Table {
    let mut table = Table::new();
    table.load_preset(presets::UTF8_FULL_CONDENSED);
    table.set_content_arrangement(ContentArrangement::Dynamic);

    table.set_header(vec![
        Cell::new("").fg(Color::White),
        Cell::new("Name").fg(Color::White),
        Cell::new("Brand").fg(Color::White),
        Cell::new("Category").fg(Color::White),
    ]);

    for card in cards {
        let (mark, name) = if card.selected {
            (Cell::new("✓").fg(Color::Green), Cell::new(&card.name).fg(Color::Green))
        } else {
            (Cell::new(""), Cell::new(&card.name))
        };
        table.add_row(vec![
            mark,
            name,
            Cell::new(&card.brand),
            Cell::new(&card.category).fg(Color::DarkGrey),
        ]);
    }

    table
}
