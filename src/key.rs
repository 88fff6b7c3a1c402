use alloc::{borrow::Cow, string::String};
use core::{
    borrow::Borrow,
    fmt::{self, Display, Formatter},
};

/// Name of one service slot in a container.
///
/// Keys compare by their string content, so `ServiceKey::from("db")` and
/// `ServiceKey::from(String::from("db"))` name the same slot.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct ServiceKey(Cow<'static, str>);

impl ServiceKey {
    #[inline]
    #[must_use]
    pub const fn from_static(key: &'static str) -> Self {
        Self(Cow::Borrowed(key))
    }

    #[inline]
    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl From<&'static str> for ServiceKey {
    #[inline]
    fn from(key: &'static str) -> Self {
        Self::from_static(key)
    }
}

impl From<String> for ServiceKey {
    #[inline]
    fn from(key: String) -> Self {
        Self(Cow::Owned(key))
    }
}

impl Borrow<str> for ServiceKey {
    #[inline]
    fn borrow(&self) -> &str {
        &self.0
    }
}

impl AsRef<str> for ServiceKey {
    #[inline]
    fn as_ref(&self) -> &str {
        &self.0
    }
}

impl Display for ServiceKey {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl PartialEq<str> for ServiceKey {
    fn eq(&self, other: &str) -> bool {
        self.as_str() == other
    }
}

impl PartialEq<&str> for ServiceKey {
    fn eq(&self, other: &&str) -> bool {
        self.as_str() == *other
    }
}
