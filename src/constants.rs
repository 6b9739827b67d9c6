//! Shared crate-wide constants.

/// Vertical tolerance (in layout units) within which two cards are treated
/// as sitting on the same row when the navigation model is measured.
///
/// Units match whatever the `LayoutMeasure` implementation reports. Pixel
/// based measurers use this default; the terminal grid overrides it because
/// its rows are whole cells apart.
pub const ROW_TOLERANCE: f32 = 10.0;

/// Toolbar entry for the core update counter.
pub const UPDATES_ID: &str = "wp-admin-bar-updates";

/// Toolbar badge contributed by the commerce plugin.
pub const COMMERCE_BADGE_ID: &str = "wp-admin-bar-woocommerce-site-visibility-badge";

/// The overlay's own trigger inside the host toolbar. Never rendered as a card.
pub const TOGGLE_ID: &str = "wp-admin-bar-cch-popout-toggle";

pub const UPDATES_AVAILABLE_LABEL: &str = "Updates available";
pub const UP_TO_DATE_LABEL: &str = "Up to date";
pub const COMMERCE_FALLBACK_LABEL: &str = "WooCommerce";
pub const EDIT_PROFILE_LABEL: &str = "Edit Profile";

pub const UPDATES_ICON: &str = "dashicons-update";
pub const COMMERCE_ICON: &str = "dashicons-cart";

pub const OVERLAY_TITLE: &str = "Quick Menu";
pub const SEARCH_PLACEHOLDER: &str = "Filter apps and actions...";

/// Storage key of the persisted layout preference.
pub const VIEW_KEY: &str = "cch:view";

/// Toolbar height assumed when the host toolbar cannot be measured.
pub const FALLBACK_TOOLBAR_HEIGHT: u16 = 1;
