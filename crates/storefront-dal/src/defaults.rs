// File: storefront-dal/src/defaults.rs
// Purpose: Well-known ids installed with every store

/// The system language every other language falls back to
pub const LANGUAGE_SYSTEM: &str = "2fbb5fe2e29a4d70aa5854ce7ce3e20b";

/// Default currency (EUR)
pub const CURRENCY: &str = "b7d2554b0ce847cd82f3ac9bd1c0dfca";

/// Locale of the system language (en-GB)
pub const LOCALE_SYSTEM: &str = "c1a28776116d4431a2208eb2960ec340";

/// Default snippet set (BASE en-GB)
pub const SNIPPET_SET: &str = "71a916e745114d72abafbfdc51cbd9d0";
