use nutype::nutype;
use uuid::Uuid;

use crate::DEFAULT_ACCOUNT_ID;

pub mod article;
pub mod seed;

pub use article::{Article, ArticleDraft, ArticlePatch, ArticleStatus};

/// Wrapper to prevent ID confusion
#[nutype(
    sanitize(trim),
    validate(not_empty),
    derive(
        Clone,
        Debug,
        Display,
        AsRef,
        PartialEq,
        Eq,
        PartialOrd,
        Ord,
        Hash,
        Serialize,
        Deserialize
    )
)]
pub struct ArticleId(String);

impl ArticleId {
    /// Mint a fresh id for a newly created article. Ids are opaque to
    /// callers and never change after creation.
    pub fn generate() -> Self {
        Self::try_new(Uuid::new_v4().simple().to_string()).expect("generated ids are non-empty")
    }
}

/// Opaque reference to a publishing account. The account itself is not
/// modeled here.
#[nutype(
    sanitize(trim),
    validate(not_empty),
    derive(
        Clone,
        Debug,
        Display,
        AsRef,
        PartialEq,
        Eq,
        PartialOrd,
        Ord,
        Hash,
        Serialize,
        Deserialize
    )
)]
pub struct AccountId(String);

impl AccountId {
    pub fn default_account() -> Self {
        Self::try_new(DEFAULT_ACCOUNT_ID).expect("default account id is non-empty")
    }
}
