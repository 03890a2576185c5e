//! Core domain entities.
//!
//! Plain data structures shared by the rewriting core and the options surface.
//!
//! - [`ProductIdentifier`] / [`AffiliateTag`] - Validated value types
//! - [`ConversionRecord`] - One logged rewrite
//! - [`Settings`] - Synced user settings snapshot
//! - [`Charity`] - Static catalog of selectable beneficiaries

pub mod charity;
pub mod conversion;
pub mod product;
pub mod settings;

pub use charity::{CHARITIES, Charity, DEFAULT_CHARITY_ID, find_charity};
pub use conversion::{CONVERSIONS_KEY, ConversionRecord, ConversionSummary};
pub use product::{AffiliateTag, DEFAULT_AFFILIATE_ID, ProductIdentifier};
pub use settings::{AFFILIATE_ID_KEY, ENABLED_KEY, SELECTED_CHARITY_KEY, Settings};
