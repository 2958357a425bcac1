//! Plain-text output of the rendered view state.

use std::fmt::Write as _;

use jvapes_storefront::render::{
    CartView, EMPTY_CART_MESSAGE, FilterOption, FilterOptionsView, GridState,
    STANDARD_FLAVOR_LABEL,
};

/// Printed instead of any command output until age is confirmed.
pub const AGE_GATE_NOTICE: &str =
    "You must be 18 or older to use this store. Run `jvapes age confirm` to continue.";

/// Printed after declining the age gate.
pub const AGE_DECLINED: &str = "Sorry, you must be 18 or older to enter.";

/// Printed after an item is added.
pub const ADDED_TOAST: &str = "Added to bag";

/// Write command output to stdout.
#[allow(clippy::print_stdout)]
pub fn print(text: &str) {
    println!("{text}");
}

/// The product grid, one block per card.
#[must_use]
pub fn grid(state: &GridState) -> String {
    let cards = match state {
        GridState::Loading => return "Loading products...".to_string(),
        GridState::Empty => return "No products match your filters.".to_string(),
        GridState::Unavailable(message) => return message.clone(),
        GridState::Products(cards) => cards,
    };

    let mut out = String::new();
    for card in cards {
        let _ = write!(out, "[{}] {}  {}", card.id, card.name, card.price);
        if let (Some(original), Some(badge)) = (&card.original_price, &card.sale_badge) {
            let _ = write!(out, "  (was {original}, {badge})");
        }
        let _ = write!(out, "\n    {} • {}", card.brand, card.puffs);
        if let Some(nicotine) = &card.nicotine {
            let _ = write!(out, " • {nicotine}");
        }
        if card.has_standard_flavor() {
            let _ = writeln!(out, "\n    {STANDARD_FLAVOR_LABEL}");
        } else {
            let _ = writeln!(out, "\n    Flavors: {}", card.flavors.join(", "));
        }
    }
    out.trim_end().to_string()
}

/// Brand and puff choices available in the catalog.
#[must_use]
pub fn filter_options(options: &FilterOptionsView) -> String {
    // The first entry of each list is the "all" wildcard.
    let values = |list: &[FilterOption]| {
        list.iter()
            .skip(1)
            .map(|o| o.value.as_str())
            .collect::<Vec<_>>()
            .join(", ")
    };
    format!(
        "Brands: {}\nPuffs: {}",
        values(&options.brands),
        values(&options.puffs)
    )
}

/// The cart drawer.
#[must_use]
pub fn cart(view: &CartView) -> String {
    if view.is_empty() {
        return EMPTY_CART_MESSAGE.to_string();
    }

    let mut out = format!("Your Bag ({})\n", view.total_quantity);
    for line in &view.lines {
        let _ = writeln!(
            out,
            "  {} [{}]\n    Flavor: {} | {}\n    x{}  {}",
            line.name, line.product_id, line.flavor, line.brand, line.quantity, line.line_total
        );
    }
    let _ = write!(out, "Total: {}", view.total);
    out
}
