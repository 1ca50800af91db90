//! View renderer: pure transforms from store state to view models.
//!
//! Nothing here touches the stores. The terminal and HTTP surfaces both
//! render from these serde-serializable structures.

pub mod chat;
pub mod products;
pub mod selection;

pub use chat::{render_chat_status, render_transcript, ChatBubble, AWAITING_MESSAGE};
pub use products::{
    render_products, render_products_with_panels, render_unavailable, DescriptionPanels,
    ProductCard, ProductGrid, CATALOG_UNAVAILABLE_MESSAGE, NO_PRODUCTS_MESSAGE,
};
pub use selection::{render_selection, SelectionItem, SelectionView, NO_SELECTION_MESSAGE};
