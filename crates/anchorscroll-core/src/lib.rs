pub mod config;
pub mod engine;
pub mod enhancer;
pub mod error;
pub mod fetch;
pub mod host;
pub mod html;
pub mod page;

pub use config::AppConfig;
pub use engine::{BootstrapScript, NoopEngine, ScrollEngine};
pub use enhancer::{EnhanceOutcome, EnhanceReport, Enhancer, EnhancerOptions, SkipReason};
pub use error::{Error, Result};
pub use fetch::PageFetcher;
pub use host::{Capabilities, Capability, Document, ElementQuery, Location, PageLocation};
pub use html::HtmlDocument;
pub use page::{enhance_page, inspect_page, EnhancedPage};
