pub mod domain;
pub mod test_utils;

/// Account applied to records that name no publishing account.
pub const DEFAULT_ACCOUNT_ID: &'static str = "default";

// expose domain module

pub use domain::*;
