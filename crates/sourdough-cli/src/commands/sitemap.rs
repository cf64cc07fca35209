//! Sitemap command - write sitemap.xml and robots.txt for a built site

use std::path::Path;
use std::process::ExitCode;

use anyhow::{Context, Result};
use url::Url;

use crate::output::OutputContext;

pub const DEFAULT_ROUTES: &[&str] = &["/", "/about", "/contact", "/services"];

/// Render `sitemap.xml` for `routes` under `base_url`
pub fn render_sitemap(base_url: &str, routes: &[String]) -> String {
    let base = base_url.trim_end_matches('/');
    let urls: Vec<String> = routes
        .iter()
        .map(|route| {
            let (path, priority) = if route == "/" {
                ("", "1.0")
            } else {
                (route.as_str(), "0.8")
            };
            format!(
                "  <url>\n    <loc>{}{}</loc>\n    <changefreq>weekly</changefreq>\n    <priority>{}</priority>\n  </url>",
                escape_xml(base),
                escape_xml(path),
                priority
            )
        })
        .collect();

    format!(
        "<?xml version=\"1.0\" encoding=\"UTF-8\"?>\n<urlset xmlns=\"http://www.sitemaps.org/schemas/sitemap/0.9\">\n{}\n</urlset>\n",
        urls.join("\n")
    )
}

/// Render `robots.txt` allowing or disallowing every crawler
pub fn render_robots(base_url: &str, allow_all: bool) -> String {
    let rule = if allow_all { "Allow" } else { "Disallow" };
    format!(
        "User-agent: *\n{}: /\n\nSitemap: {}/sitemap.xml\n",
        rule,
        base_url.trim_end_matches('/')
    )
}

fn escape_xml(raw: &str) -> String {
    raw.replace('&', "&amp;")
        .replace('<', "&lt;")
        .replace('>', "&gt;")
        .replace('"', "&quot;")
        .replace('\'', "&apos;")
}

pub fn sitemap(
    base_url: &str,
    routes: &[String],
    out_dir: &Path,
    disallow: bool,
    ctx: &OutputContext,
) -> Result<ExitCode> {
    Url::parse(base_url).with_context(|| format!("Invalid base URL '{}'", base_url))?;

    let routes: Vec<String> = if routes.is_empty() {
        DEFAULT_ROUTES.iter().map(|r| r.to_string()).collect()
    } else {
        routes.to_vec()
    };
    if let Some(bad) = routes.iter().find(|r| !r.starts_with('/')) {
        ctx.error(&format!("Error: route '{}' must start with '/'", bad));
        return Ok(ExitCode::FAILURE);
    }

    std::fs::create_dir_all(out_dir)
        .with_context(|| format!("Failed to create {}", out_dir.display()))?;

    let sitemap_path = out_dir.join("sitemap.xml");
    std::fs::write(&sitemap_path, render_sitemap(base_url, &routes))
        .with_context(|| format!("Failed to write {}", sitemap_path.display()))?;
    ctx.success(&format!("Generated {}", sitemap_path.display()));

    let robots_path = out_dir.join("robots.txt");
    std::fs::write(&robots_path, render_robots(base_url, !disallow))
        .with_context(|| format!("Failed to write {}", robots_path.display()))?;
    ctx.success(&format!("Generated {}", robots_path.display()));
    ctx.info(&format!("{} route(s) under {}", routes.len(), base_url));

    Ok(ExitCode::SUCCESS)
}
