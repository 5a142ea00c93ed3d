//! Directive errors.

/// Errors raised while declaring or validating a cache directive.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum DirectiveError {
    #[error("unknown cache directive: '{0}'")]
    UnknownDirective(String),

    #[error("unknown cache life profile: '{0}'")]
    UnknownProfile(String),

    #[error("revalidate ({revalidate}s) must not exceed expire ({expire}s)")]
    RevalidateExceedsExpire { revalidate: u64, expire: u64 },

    #[error("cache tag must not be empty")]
    EmptyTag,

    #[error("cache tag exceeds {max} characters: '{tag}'")]
    TagTooLong { tag: String, max: usize },

    #[error("too many cache tags: {count} (max {max})")]
    TooManyTags { count: usize, max: usize },
}
