use crate::{model::ProcessedModel, normalize::all_providers};
use std::fmt::Write;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ChangeFrequency {
    Daily,
    Weekly,
}

impl ChangeFrequency {
    fn as_str(&self) -> &'static str {
        match self {
            ChangeFrequency::Daily => "daily",
            ChangeFrequency::Weekly => "weekly",
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct SitemapEntry {
    pub url: String,
    pub change_frequency: ChangeFrequency,
    pub priority: f32,
}

/// Home page, then one page per provider, then one compare page per model.
pub fn sitemap_entries(base_url: &str, models: &[ProcessedModel]) -> Vec<SitemapEntry> {
    let base_url = base_url.trim_end_matches('/');
    let mut entries = vec![SitemapEntry {
        url: base_url.to_string(),
        change_frequency: ChangeFrequency::Daily,
        priority: 1.0,
    }];

    entries.extend(all_providers(models).into_iter().map(|provider| SitemapEntry {
        url: format!("{base_url}/provider/{}", urlencoding::encode(&provider)),
        change_frequency: ChangeFrequency::Weekly,
        priority: 0.7,
    }));

    entries.extend(models.iter().map(|model| SitemapEntry {
        url: format!(
            "{base_url}/compare/{}/{}",
            urlencoding::encode(&model.provider),
            model.slug
        ),
        change_frequency: ChangeFrequency::Weekly,
        priority: 0.8,
    }));

    entries
}

fn escape_xml(text: &str) -> String {
    text.replace('&', "&amp;")
        .replace('<', "&lt;")
        .replace('>', "&gt;")
        .replace('"', "&quot;")
        .replace('\'', "&apos;")
}

pub fn render_sitemap(entries: &[SitemapEntry]) -> String {
    let mut xml = String::from(
        "<?xml version=\"1.0\" encoding=\"UTF-8\"?>\n<urlset xmlns=\"http://www.sitemaps.org/schemas/sitemap/0.9\">\n",
    );
    for entry in entries {
        // Writing to a String cannot fail.
        let _ = write!(
            xml,
            "<url>\n<loc>{}</loc>\n<changefreq>{}</changefreq>\n<priority>{:.1}</priority>\n</url>\n",
            escape_xml(&entry.url),
            entry.change_frequency.as_str(),
            entry.priority
        );
    }
    xml.push_str("</urlset>\n");
    xml
}
