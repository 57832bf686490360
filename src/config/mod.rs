//! Configuration module

mod site;

pub use site::CategoryRule;
pub use site::MenuItem;
pub use site::SiteConfig;
