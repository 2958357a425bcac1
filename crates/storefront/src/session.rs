//! Storefront session.
//!
//! A [`Session`] owns everything one visitor interacts with: the catalog, the
//! current filters, the cart, the storage collaborator, and the renderer. It
//! calls the pure components (filter engine, cart reducer, checkout composer)
//! and pushes the resulting view state to the renderer.
//!
//! # Startup order
//!
//! 1. The cart starts empty.
//! 2. The catalog is fetched. Failure disables the grid for the whole
//!    session; cart and age gate keep working.
//! 3. The saved cart and the age flag are loaded.
//!
//! # Storage failures
//!
//! If the store cannot be read or written, the session logs a warning and
//! switches to an in-memory store. The visitor never sees an error for it.

use jvapes_core::ProductId;
use tracing::{debug, info, instrument, warn};
use url::Url;

use crate::cart::{Cart, CartLineKey, DEFAULT_FLAVOR};
use crate::catalog::{Catalog, CatalogSource, Product};
use crate::checkout;
use crate::config::CheckoutConfig;
use crate::error::{Result, StorefrontError, add_breadcrumb};
use crate::filter::{FilterSpec, PriceBucket, Selection, visible_products};
use crate::render::{
    CATALOG_ERROR_MESSAGE, CartView, FilterOptionsView, Renderer, product_cards,
};
use crate::storage::{self, KeyValueStore, MemoryStore, StorageError};

/// One visitor's storefront session.
pub struct Session<R: Renderer> {
    catalog: Option<Catalog>,
    filter: FilterSpec,
    cart: Cart,
    age_verified: bool,
    store: Box<dyn KeyValueStore>,
    persistent: bool,
    renderer: R,
    checkout: CheckoutConfig,
}

impl<R: Renderer> Session<R> {
    /// Start a session: fetch the catalog, restore saved state, and render
    /// the initial page.
    ///
    /// Never fails. A catalog failure is reported and rendered as the grid's
    /// error state; storage failures degrade to memory.
    #[instrument(skip_all)]
    pub async fn start(
        source: &dyn CatalogSource,
        store: Box<dyn KeyValueStore>,
        renderer: R,
        checkout: CheckoutConfig,
    ) -> Self {
        let mut session = Self {
            catalog: None,
            filter: FilterSpec::default(),
            cart: Cart::new(),
            age_verified: false,
            store,
            persistent: true,
            renderer,
            checkout,
        };

        match Catalog::fetch(source).await {
            Ok(catalog) => {
                info!(products = catalog.len(), "Catalog loaded");
                session.catalog = Some(catalog);
            }
            Err(e) => StorefrontError::CatalogFetchFailed(e).report(),
        }
        session.render_filter_options();
        session.render_grid();

        match storage::load_cart(session.store.as_ref()).await {
            Ok(cart) => session.cart = cart,
            Err(e) => session.degrade(e),
        }
        session.render_cart();

        match storage::load_age_verified(session.store.as_ref()).await {
            Ok(verified) => session.age_verified = verified,
            Err(e) => session.degrade(e),
        }
        session.renderer.render_age_gate(!session.age_verified);

        session
    }

    // =========================================================================
    // Accessors
    // =========================================================================

    /// The loaded catalog, or `None` if it failed to load.
    #[must_use]
    pub const fn catalog(&self) -> Option<&Catalog> {
        self.catalog.as_ref()
    }

    /// Whether the catalog loaded.
    #[must_use]
    pub const fn catalog_available(&self) -> bool {
        self.catalog.is_some()
    }

    #[must_use]
    pub const fn filter(&self) -> &FilterSpec {
        &self.filter
    }

    #[must_use]
    pub const fn cart(&self) -> &Cart {
        &self.cart
    }

    /// Whether cart changes still reach durable storage.
    #[must_use]
    pub const fn is_persistent(&self) -> bool {
        self.persistent
    }

    #[must_use]
    pub const fn renderer(&self) -> &R {
        &self.renderer
    }

    pub const fn renderer_mut(&mut self) -> &mut R {
        &mut self.renderer
    }

    /// End the session, handing back the renderer.
    #[must_use]
    pub fn into_renderer(self) -> R {
        self.renderer
    }

    /// Products matching the current filters, in catalog order.
    #[must_use]
    pub fn visible_products(&self) -> Vec<&Product> {
        self.catalog
            .as_ref()
            .map(|c| visible_products(c.products(), &self.filter))
            .unwrap_or_default()
    }

    // =========================================================================
    // Filters
    // =========================================================================

    /// Replace the search text and repaint the grid.
    pub fn set_search(&mut self, query: impl Into<String>) {
        self.filter.search = query.into();
        self.filters_changed();
    }

    /// Select a brand (`"all"` for every brand) and repaint the grid.
    pub fn set_brand(&mut self, brand: &str) {
        self.filter.brand = Selection::from_value(brand);
        self.filters_changed();
    }

    /// Select a puff count (`"all"` for every count) and repaint the grid.
    pub fn set_puffs(&mut self, puffs: &str) {
        self.filter.puffs = Selection::from_value(puffs);
        self.filters_changed();
    }

    /// Select a price bucket and repaint the grid.
    pub fn set_price(&mut self, price: PriceBucket) {
        self.filter.price = price;
        self.filters_changed();
    }

    /// Replace every filter at once.
    pub fn set_filter(&mut self, filter: FilterSpec) {
        self.filter = filter;
        self.filters_changed();
    }

    /// Back to the full catalog.
    pub fn reset_filters(&mut self) {
        self.set_filter(FilterSpec::default());
    }

    // =========================================================================
    // Cart
    // =========================================================================

    /// Add one unit of a product to the cart.
    ///
    /// With no flavor given, the product's first flavor is used, or the
    /// default flavor for products without a choice.
    ///
    /// # Errors
    ///
    /// - `ProductNotFound` if the id is not in the catalog; the cart is untouched
    /// - `FlavorUnavailable` if the product does not come in `flavor`
    #[instrument(skip(self))]
    pub async fn add_to_cart(&mut self, product_id: &ProductId, flavor: Option<&str>) -> Result<()> {
        let Some(product) = self.catalog.as_ref().and_then(|c| c.find(product_id)) else {
            warn!(product_id = %product_id, "Add to cart for unknown product ignored");
            return Err(StorefrontError::ProductNotFound(product_id.clone()));
        };

        let flavor = resolve_flavor(product, flavor).inspect_err(|e| {
            warn!(
                product_id = %product_id,
                error = %e,
                "Add to cart with unavailable flavor ignored"
            );
        })?;
        self.cart = std::mem::take(&mut self.cart).add_item(product, flavor.as_deref());

        add_breadcrumb(
            "cart",
            "Added item",
            Some(&[
                ("product_id", product_id.as_str()),
                ("flavor", flavor.as_deref().unwrap_or(DEFAULT_FLAVOR)),
            ]),
        );
        self.cart_changed().await;
        self.renderer.show_added_toast();
        Ok(())
    }

    /// Remove a cart line whatever its quantity. Unknown keys are ignored.
    #[instrument(skip(self), fields(line = %key))]
    pub async fn remove_line(&mut self, key: &CartLineKey) {
        self.cart = std::mem::take(&mut self.cart).remove_line(key);
        let line = key.to_string();
        add_breadcrumb("cart", "Removed line", Some(&[("line", line.as_str())]));
        self.cart_changed().await;
    }

    /// Change a line's quantity; the line goes away at zero.
    #[instrument(skip(self), fields(line = %key))]
    pub async fn adjust_quantity(&mut self, key: &CartLineKey, delta: i64) {
        self.cart = std::mem::take(&mut self.cart).adjust_quantity(key, delta);
        self.cart_changed().await;
    }

    /// Empty the cart.
    pub async fn clear_cart(&mut self) {
        self.cart = Cart::new();
        add_breadcrumb("cart", "Cleared cart", None);
        self.cart_changed().await;
    }

    // =========================================================================
    // Checkout
    // =========================================================================

    /// The order message for the current cart.
    #[must_use]
    pub fn order_message(&self) -> String {
        checkout::compose_order_message(&self.cart, &self.checkout)
    }

    /// The chat link that hands the order off.
    ///
    /// # Errors
    ///
    /// Returns `EmptyCart` when there is nothing to order.
    pub fn checkout_link(&self) -> Result<Url> {
        let link = checkout::checkout_link(&self.cart, &self.checkout)
            .ok_or(StorefrontError::EmptyCart)?;
        info!(lines = self.cart.len(), "Checkout link composed");
        Ok(link)
    }

    // =========================================================================
    // Age gate
    // =========================================================================

    /// Whether the age gate must be shown.
    #[must_use]
    pub const fn age_gate_required(&self) -> bool {
        !self.age_verified
    }

    /// Record the visitor's confirmation and hide the gate.
    pub async fn confirm_age(&mut self) {
        self.age_verified = true;
        if let Err(e) = storage::save_age_verified(self.store.as_ref()).await {
            self.degrade(e);
        }
        self.renderer.render_age_gate(false);
    }

    /// The visitor declined; the gate stays up.
    pub fn decline_age(&mut self) {
        info!("Age confirmation declined");
        self.renderer.render_age_gate(!self.age_verified);
    }

    // =========================================================================
    // Internals
    // =========================================================================

    fn filters_changed(&mut self) {
        debug!(
            search = %self.filter.search,
            brand = %self.filter.brand,
            puffs = %self.filter.puffs,
            price = %self.filter.price,
            "Filters changed"
        );
        self.render_filter_options();
        self.render_grid();
    }

    fn render_grid(&mut self) {
        let Some(catalog) = &self.catalog else {
            self.renderer.render_catalog_unavailable(CATALOG_ERROR_MESSAGE);
            return;
        };

        let visible = visible_products(catalog.products(), &self.filter);
        debug!(visible = visible.len(), total = catalog.len(), "Grid recomputed");
        if visible.is_empty() {
            self.renderer.render_empty();
        } else {
            let cards = product_cards(&visible);
            self.renderer.render_products(&cards);
        }
    }

    fn render_filter_options(&mut self) {
        if let Some(catalog) = &self.catalog {
            let options = FilterOptionsView::new(catalog, &self.filter);
            self.renderer.render_filter_options(&options);
        }
    }

    fn render_cart(&mut self) {
        self.renderer.render_cart(&CartView::from(&self.cart));
    }

    async fn cart_changed(&mut self) {
        if let Err(e) = storage::save_cart(self.store.as_ref(), &self.cart).await {
            self.degrade(e);
        }
        self.render_cart();
    }

    /// Switch to an in-memory store after a storage failure.
    fn degrade(&mut self, error: StorageError) {
        if self.persistent {
            StorefrontError::StorageUnavailable(error).report();
            info!("Continuing with in-memory storage for this session");
            self.store = Box::new(MemoryStore::new());
            self.persistent = false;
        } else {
            debug!(error = %error, "In-memory storage failed");
        }
    }
}

/// Decide which flavor goes into the cart line.
fn resolve_flavor(product: &Product, requested: Option<&str>) -> Result<Option<String>> {
    match requested {
        None => Ok(product.default_flavor().map(str::to_string)),
        Some(flavor) if product.offers_flavor(flavor) => Ok(Some(flavor.to_string())),
        Some(flavor) if product.flavors.is_empty() && flavor == DEFAULT_FLAVOR => Ok(None),
        Some(flavor) => Err(StorefrontError::FlavorUnavailable {
            product_id: product.id.clone(),
            flavor: flavor.to_string(),
        }),
    }
}
