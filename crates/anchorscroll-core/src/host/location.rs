use url::Url;

use crate::Result;

/// Location-like view of the current page
pub trait Location {
    /// Full URL of the current page
    fn href(&self) -> &str;

    fn hostname(&self) -> &str;

    fn pathname(&self) -> &str;
}

/// Location backed by a parsed URL
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PageLocation {
    url: Url,
}

impl PageLocation {
    pub fn new(url: Url) -> Self {
        Self { url }
    }

    pub fn parse(href: &str) -> Result<Self> {
        Ok(Self::new(Url::parse(href)?))
    }

    pub fn url(&self) -> &Url {
        &self.url
    }
}

impl From<Url> for PageLocation {
    fn from(url: Url) -> Self {
        Self::new(url)
    }
}

impl Location for PageLocation {
    fn href(&self) -> &str {
        self.url.as_str()
    }

    fn hostname(&self) -> &str {
        self.url.host_str().unwrap_or("")
    }

    fn pathname(&self) -> &str {
        self.url.path()
    }
}
