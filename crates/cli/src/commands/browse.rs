//! Product grid.

use std::path::Path;

use jvapes_storefront::Session;
use jvapes_storefront::filter::{FilterSpec, PriceBucket, Selection};
use jvapes_storefront::render::HtmlRenderer;

use super::CommandError;
use crate::console;

/// Build the filter spec from command-line values.
#[must_use]
pub fn filter_spec(search: String, brand: &str, puffs: &str, price: PriceBucket) -> FilterSpec {
    FilterSpec {
        search,
        brand: Selection::from_value(brand),
        puffs: Selection::from_value(puffs),
        price,
    }
}

/// Apply the filters, print the grid, and optionally export the page.
///
/// # Errors
///
/// Returns `CommandError` if the HTML export fails.
pub async fn run(
    session: &mut Session<HtmlRenderer>,
    filter: FilterSpec,
    html: Option<&Path>,
) -> Result<(), CommandError> {
    session.set_filter(filter);

    let renderer = session.renderer();
    console::print(&console::filter_options(renderer.filters()));
    console::print(&console::grid(renderer.grid()));

    if let Some(path) = html {
        let page = renderer
            .render_page()
            .map_err(|e| CommandError::Render(e.to_string()))?;
        tokio::fs::write(path, page).await?;
        tracing::info!(path = %path.display(), "Page exported");
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_filter_spec_from_args() {
        let spec = filter_spec(String::new(), "all", "all", PriceBucket::All);
        assert!(spec.is_wildcard());

        let spec = filter_spec("mango".to_string(), "Elf Bar", "5000", PriceBucket::Sale);
        assert_eq!(spec.brand, Selection::Exact("Elf Bar".to_string()));
        assert_eq!(spec.puffs, Selection::Exact("5000".to_string()));
        assert_eq!(spec.price, PriceBucket::Sale);
    }
}
