//! Cache directives and cache-life profiles.

use std::fmt;
use std::str::FromStr;
use std::time::Duration;

use serde::{Deserialize, Serialize};

use crate::error::DirectiveError;
use crate::tag::{validate_tags, CacheTag};

/// Which cache a segment's output is placed in.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum CacheKind {
    /// `use cache`: the server's default in-memory cache.
    #[default]
    Default,
    /// `use cache: remote`: a shared cache outside the server process.
    Remote,
    /// `use cache: private`: per-user, never shared.
    Private,
}

impl CacheKind {
    /// The directive text that declares this kind.
    pub fn directive(&self) -> &'static str {
        match self {
            Self::Default => "use cache",
            Self::Remote => "use cache: remote",
            Self::Private => "use cache: private",
        }
    }

    /// Check if entries of this kind may be shared between users.
    pub fn is_shared(&self) -> bool {
        !matches!(self, Self::Private)
    }
}

impl FromStr for CacheKind {
    type Err = DirectiveError;

    /// Parse directive text, e.g. `'use cache: remote'`.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let text = s
            .trim()
            .trim_end_matches(';')
            .trim_matches(|c| c == '\'' || c == '"' || c == '`')
            .trim();

        let rest = text
            .strip_prefix("use cache")
            .ok_or_else(|| DirectiveError::UnknownDirective(s.to_string()))?
            .trim_start();

        if rest.is_empty() {
            return Ok(Self::Default);
        }

        match rest.strip_prefix(':').map(str::trim) {
            Some("remote") => Ok(Self::Remote),
            Some("private") => Ok(Self::Private),
            _ => Err(DirectiveError::UnknownDirective(s.to_string())),
        }
    }
}

impl fmt::Display for CacheKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.directive())
    }
}

/// Built-in cache-life profiles.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum CacheProfile {
    Default,
    Seconds,
    Minutes,
    Hours,
    Days,
    Weeks,
    Max,
}

const MINUTE: u64 = 60;
const HOUR: u64 = 60 * MINUTE;
const DAY: u64 = 24 * HOUR;

impl CacheProfile {
    /// All profiles, shortest first.
    pub const ALL: [CacheProfile; 7] = [
        Self::Default,
        Self::Seconds,
        Self::Minutes,
        Self::Hours,
        Self::Days,
        Self::Weeks,
        Self::Max,
    ];

    /// The windows this profile stands for.
    pub fn life(&self) -> CacheLife {
        let (stale, revalidate, expire) = match self {
            Self::Default => (5 * MINUTE, 15 * MINUTE, None),
            Self::Seconds => (0, 1, Some(MINUTE)),
            Self::Minutes => (5 * MINUTE, MINUTE, Some(HOUR)),
            Self::Hours => (5 * MINUTE, HOUR, Some(DAY)),
            Self::Days => (5 * MINUTE, DAY, Some(7 * DAY)),
            Self::Weeks => (5 * MINUTE, 7 * DAY, Some(30 * DAY)),
            Self::Max => (5 * MINUTE, 30 * DAY, None),
        };

        CacheLife {
            stale: Duration::from_secs(stale),
            revalidate: Duration::from_secs(revalidate),
            expire: expire.map(Duration::from_secs),
        }
    }

    /// Profile name as written in configuration.
    pub fn name(&self) -> &'static str {
        match self {
            Self::Default => "default",
            Self::Seconds => "seconds",
            Self::Minutes => "minutes",
            Self::Hours => "hours",
            Self::Days => "days",
            Self::Weeks => "weeks",
            Self::Max => "max",
        }
    }
}

impl FromStr for CacheProfile {
    type Err = DirectiveError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::ALL
            .into_iter()
            .find(|p| p.name() == s.trim())
            .ok_or_else(|| DirectiveError::UnknownProfile(s.to_string()))
    }
}

/// How long a cached entry is served, revalidated and kept.
///
/// `stale` is how long a client may reuse the entry without asking,
/// `revalidate` how often the server refreshes it in the background, and
/// `expire` how long it may be served at all (`None` = never expires).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct CacheLife {
    #[serde(with = "secs")]
    pub stale: Duration,
    #[serde(with = "secs")]
    pub revalidate: Duration,
    #[serde(with = "opt_secs", skip_serializing_if = "Option::is_none", default)]
    pub expire: Option<Duration>,
}

impl Default for CacheLife {
    fn default() -> Self {
        CacheProfile::Default.life()
    }
}

impl CacheLife {
    /// Start a custom life; unset windows keep the default profile's values.
    pub fn custom() -> Self {
        Self::default()
    }

    /// Look up a named profile.
    pub fn profile(name: &str) -> Result<Self, DirectiveError> {
        Ok(name.parse::<CacheProfile>()?.life())
    }

    /// Set the client stale window.
    pub fn stale(mut self, stale: Duration) -> Self {
        self.stale = stale;
        self
    }

    /// Set the revalidation interval.
    pub fn revalidate(mut self, revalidate: Duration) -> Self {
        self.revalidate = revalidate;
        self
    }

    /// Set the expiry.
    pub fn expire(mut self, expire: Duration) -> Self {
        self.expire = Some(expire);
        self
    }

    /// Check that the windows are consistent.
    pub fn validate(&self) -> Result<(), DirectiveError> {
        if let Some(expire) = self.expire {
            if self.revalidate > expire {
                return Err(DirectiveError::RevalidateExceedsExpire {
                    revalidate: self.revalidate.as_secs(),
                    expire: expire.as_secs(),
                });
            }
        }
        Ok(())
    }
}

/// A segment's cache declaration.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CacheDirective {
    /// Cache the output lands in.
    pub kind: CacheKind,
    /// Stale / revalidate / expire windows.
    pub life: CacheLife,
    /// Tags for invalidation.
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub tags: Vec<String>,
}

impl CacheDirective {
    /// Declare a directive with the default life and no tags.
    pub fn new(kind: CacheKind) -> Self {
        Self {
            kind,
            life: CacheLife::default(),
            tags: Vec::new(),
        }
    }

    /// Parse directive text (`use cache`, `use cache: remote`, ...).
    pub fn parse(text: &str) -> Result<Self, DirectiveError> {
        Ok(Self::new(text.parse()?))
    }

    /// Set the cache life.
    pub fn with_life(mut self, life: CacheLife) -> Self {
        self.life = life;
        self
    }

    /// Add a cache tag for invalidation.
    pub fn with_tag(mut self, tag: impl Into<String>) -> Self {
        self.tags.push(tag.into());
        self
    }

    /// Validate the life windows and every tag.
    pub fn validate(&self) -> Result<Vec<CacheTag>, DirectiveError> {
        self.life.validate()?;
        validate_tags(&self.tags)
    }

    /// Generate Cache-Control header value.
    pub fn cache_control_header(&self) -> String {
        if !self.kind.is_shared() {
            return "private, no-store".to_string();
        }

        let mut parts = vec![format!("s-maxage={}", self.life.revalidate.as_secs())];

        match self.life.expire {
            Some(expire) => parts.push(format!(
                "stale-while-revalidate={}",
                expire.saturating_sub(self.life.revalidate).as_secs()
            )),
            None => parts.push("stale-while-revalidate".to_string()),
        }

        parts.join(", ")
    }
}

mod secs {
    use std::time::Duration;

    use serde::{Deserialize, Deserializer, Serializer};

    pub fn serialize<S: Serializer>(d: &Duration, s: S) -> Result<S::Ok, S::Error> {
        s.serialize_u64(d.as_secs())
    }

    pub fn deserialize<'de, D: Deserializer<'de>>(d: D) -> Result<Duration, D::Error> {
        u64::deserialize(d).map(Duration::from_secs)
    }
}

mod opt_secs {
    use std::time::Duration;

    use serde::{Deserialize, Deserializer, Serializer};

    pub fn serialize<S: Serializer>(d: &Option<Duration>, s: S) -> Result<S::Ok, S::Error> {
        match d {
            Some(d) => s.serialize_some(&d.as_secs()),
            None => s.serialize_none(),
        }
    }

    pub fn deserialize<'de, D: Deserializer<'de>>(d: D) -> Result<Option<Duration>, D::Error> {
        Option::<u64>::deserialize(d).map(|v| v.map(Duration::from_secs))
    }
}
