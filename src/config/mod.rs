//! Configuration module

mod site;

pub use site::SiteConfig;
pub use site::REVALIDATION_SECRET_ENV;
