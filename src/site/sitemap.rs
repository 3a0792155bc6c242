use std::{fs, path::Path};

use chrono::{DateTime, SecondsFormat, Utc};

use crate::core::error::ScoutError;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ChangeFrequency {
    Daily,
    Weekly,
}

impl ChangeFrequency {
    fn as_str(self) -> &'static str {
        match self {
            ChangeFrequency::Daily => "daily",
            ChangeFrequency::Weekly => "weekly",
        }
    }
}

#[derive(Debug, Clone)]
pub struct SitemapEntry {
    pub loc: String,
    pub last_modified: DateTime<Utc>,
    pub change_frequency: ChangeFrequency,
    pub priority: f32,
    /// `(hreflang, href)` pairs, including `x-default`.
    pub alternates: Vec<(String, String)>,
}

/// One entry per locale and static route.
pub fn entries(
    base_url: &str,
    routes: &[String],
    locales: &[String],
    default_locale: &str,
    last_modified: DateTime<Utc>,
) -> Vec<SitemapEntry> {
    let base = base_url.trim_end_matches('/');
    let mut out = Vec::with_capacity(routes.len() * locales.len());

    for route in routes {
        let route = normalize_route(route);
        let alternates: Vec<(String, String)> = locales
            .iter()
            .map(|l| (l.clone(), localized_url(base, l, &route)))
            .chain(std::iter::once((
                "x-default".to_string(),
                localized_url(base, default_locale, &route),
            )))
            .collect();
        let is_home = route.is_empty();

        for locale in locales {
            out.push(SitemapEntry {
                loc: localized_url(base, locale, &route),
                last_modified,
                change_frequency: if is_home {
                    ChangeFrequency::Daily
                } else {
                    ChangeFrequency::Weekly
                },
                priority: if is_home { 1.0 } else { 0.8 },
                alternates: alternates.clone(),
            });
        }
    }
    out
}

pub fn render_xml(entries: &[SitemapEntry]) -> String {
    let mut xml = String::from(
        "<?xml version=\"1.0\" encoding=\"UTF-8\"?>\n\
         <urlset xmlns=\"http://www.sitemaps.org/schemas/sitemap/0.9\" \
         xmlns:xhtml=\"http://www.w3.org/1999/xhtml\">\n",
    );
    for entry in entries {
        xml.push_str("  <url>\n");
        xml.push_str(&format!("    <loc>{}</loc>\n", escape_xml(&entry.loc)));
        for (lang, href) in &entry.alternates {
            xml.push_str(&format!(
                "    <xhtml:link rel=\"alternate\" hreflang=\"{}\" href=\"{}\"/>\n",
                escape_xml(lang),
                escape_xml(href)
            ));
        }
        xml.push_str(&format!(
            "    <lastmod>{}</lastmod>\n",
            entry
                .last_modified
                .to_rfc3339_opts(SecondsFormat::Secs, true)
        ));
        xml.push_str(&format!(
            "    <changefreq>{}</changefreq>\n",
            entry.change_frequency.as_str()
        ));
        xml.push_str(&format!("    <priority>{:.1}</priority>\n", entry.priority));
        xml.push_str("  </url>\n");
    }
    xml.push_str("</urlset>\n");
    xml
}

pub fn write_sitemap(entries: &[SitemapEntry], path: &Path) -> Result<(), ScoutError> {
    if let Some(parent) = path.parent() {
        fs::create_dir_all(parent)?;
    }
    fs::write(path, render_xml(entries))?;
    tracing::info!("sitemap with {} urls written to {}", entries.len(), path.display());
    Ok(())
}

fn normalize_route(route: &str) -> String {
    let trimmed = route.trim().trim_end_matches('/');
    if trimmed.is_empty() {
        String::new()
    } else if trimmed.starts_with('/') {
        trimmed.to_string()
    } else {
        format!("/{trimmed}")
    }
}

fn localized_url(base: &str, locale: &str, route: &str) -> String {
    format!("{base}/{locale}{route}")
}

fn escape_xml(value: &str) -> String {
    let mut out = String::with_capacity(value.len());
    for c in value.chars() {
        match c {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            '"' => out.push_str("&quot;"),
            '\'' => out.push_str("&apos;"),
            _ => out.push(c),
        }
    }
    out
}
