//! Localized site surface: dictionaries and sitemap.

pub mod i18n;
pub mod sitemap;
