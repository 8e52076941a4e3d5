//! Built-in HTML newsletter templates.
//!
//! Every template shares one document structure and differs in palette,
//! typography and layout. Templates are looked up by name; an unknown name is
//! a [`NewsletterError::TemplateNotFound`].
//!
//! Each article renders as exactly one `<article class="item">` element
//! holding its title, summary and call-to-action link.

use crate::error::{NewsletterError, Result};
use crate::generator::{NewsletterContext, NewsletterItem};
use crate::utils::slugify_title;
use html_escape::{encode_double_quoted_attribute, encode_text};
use itertools::Itertools;
use std::fmt::{self, Write};
use tracing::{debug, instrument, warn};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Layout {
    /// Articles as boxed cards.
    Cards,
    /// Articles separated by rules, no boxes.
    Plain,
}

#[derive(Debug)]
pub struct Template {
    pub name: &'static str,
    background: &'static str,
    surface: &'static str,
    text: &'static str,
    muted: &'static str,
    accent: &'static str,
    font: &'static str,
    layout: Layout,
}

const SANS: &str = "'Helvetica Neue', Helvetica, Arial, sans-serif";
const SERIF: &str = "Georgia, 'Times New Roman', serif";
const MONO: &str = "'JetBrains Mono', 'Fira Code', Menlo, monospace";

pub static TEMPLATES: [Template; 8] = [
    Template {
        name: "default",
        background: "#f4f4f7",
        surface: "#ffffff",
        text: "#1f2933",
        muted: "#6b7280",
        accent: "#2563eb",
        font: SANS,
        layout: Layout::Cards,
    },
    Template {
        name: "professional",
        background: "#0b0f0c",
        surface: "#141a16",
        text: "#e6f2ea",
        muted: "#8fa396",
        accent: "#39ff14",
        font: SANS,
        layout: Layout::Cards,
    },
    Template {
        name: "marketing",
        background: "#fff7ed",
        surface: "#ffffff",
        text: "#1c1917",
        muted: "#78716c",
        accent: "#f97316",
        font: SANS,
        layout: Layout::Cards,
    },
    Template {
        name: "clean",
        background: "#ffffff",
        surface: "#ffffff",
        text: "#111827",
        muted: "#6b7280",
        accent: "#0f766e",
        font: SANS,
        layout: Layout::Plain,
    },
    Template {
        name: "tech",
        background: "#0f172a",
        surface: "#1e293b",
        text: "#e2e8f0",
        muted: "#94a3b8",
        accent: "#38bdf8",
        font: MONO,
        layout: Layout::Cards,
    },
    Template {
        name: "finance",
        background: "#f8fafc",
        surface: "#ffffff",
        text: "#0f172a",
        muted: "#475569",
        accent: "#15803d",
        font: SERIF,
        layout: Layout::Cards,
    },
    Template {
        name: "corporate",
        background: "#eef2f7",
        surface: "#ffffff",
        text: "#1e293b",
        muted: "#64748b",
        accent: "#1e3a8a",
        font: SANS,
        layout: Layout::Plain,
    },
    Template {
        name: "minimal",
        background: "#ffffff",
        surface: "#ffffff",
        text: "#000000",
        muted: "#555555",
        accent: "#000000",
        font: SERIF,
        layout: Layout::Plain,
    },
];

/// Names of every built-in template, in catalogue order.
pub fn template_names() -> impl Iterator<Item = &'static str> {
    TEMPLATES.iter().map(|t| t.name)
}

pub fn find_template(name: &str) -> Result<&'static Template> {
    TEMPLATES
        .iter()
        .find(|t| t.name == name)
        .ok_or_else(|| {
            warn!(requested = name, available = %template_names().join(", "), "Unknown template");
            NewsletterError::TemplateNotFound(name.to_string())
        })
}

/// Render `ctx` with the template called `name`.
#[instrument(level = "info", skip(ctx), fields(sections = ctx.sections.len()))]
pub fn render(name: &str, ctx: &NewsletterContext) -> Result<String> {
    let template = find_template(name)?;
    let mut html = String::new();
    template.write_document(&mut html, ctx)?;
    debug!(bytes = html.len(), "Rendered newsletter");
    Ok(html)
}

impl Template {
    fn write_document(&self, out: &mut String, ctx: &NewsletterContext) -> fmt::Result {
        let title = encode_text(&ctx.newsletter_title);

        writeln!(out, "<!DOCTYPE html>")?;
        writeln!(out, "<html lang=\"en\">")?;
        writeln!(out, "<head>")?;
        writeln!(out, "<meta charset=\"utf-8\">")?;
        writeln!(out, "<meta name=\"viewport\" content=\"width=device-width, initial-scale=1\">")?;
        writeln!(out, "<title>{title}</title>")?;
        writeln!(out, "<style>")?;
        self.write_style(out)?;
        writeln!(out, "</style>")?;
        writeln!(out, "</head>")?;
        writeln!(out, "<body class=\"template-{}\">", self.name)?;
        writeln!(out, "<div class=\"wrapper\">")?;
        writeln!(out, "<header class=\"masthead\">")?;
        writeln!(out, "<h1>{title}</h1>")?;
        writeln!(
            out,
            "<p class=\"meta\">Tone: {} &middot; Summary length: {}</p>",
            ctx.tone, ctx.length
        )?;
        writeln!(out, "</header>")?;

        for section in &ctx.sections {
            let heading = section.category.as_str();
            writeln!(out, "<section id=\"{}\">", slugify_title(heading))?;
            writeln!(out, "<h2>{}</h2>", encode_text(heading))?;
            for item in &section.items {
                write_item(out, item)?;
            }
            writeln!(out, "</section>")?;
        }

        writeln!(out, "<footer class=\"footer\">")?;
        writeln!(
            out,
            "<a href=\"{}\">Manage your preferences</a>",
            encode_double_quoted_attribute(&ctx.manage_link)
        )?;
        writeln!(out, "</footer>")?;
        writeln!(out, "</div>")?;
        writeln!(out, "</body>")?;
        writeln!(out, "</html>")
    }

    fn write_style(&self, out: &mut String) -> fmt::Result {
        writeln!(
            out,
            "body {{ margin: 0; background: {}; color: {}; font-family: {}; line-height: 1.55; }}",
            self.background, self.text, self.font
        )?;
        writeln!(out, ".wrapper {{ max-width: 680px; margin: 0 auto; padding: 32px 20px; }}")?;
        writeln!(
            out,
            ".masthead {{ border-bottom: 3px solid {}; margin-bottom: 28px; }}",
            self.accent
        )?;
        writeln!(out, ".masthead h1 {{ margin: 0 0 6px; font-size: 28px; }}")?;
        writeln!(out, ".meta {{ color: {}; font-size: 13px; margin: 0 0 14px; }}", self.muted)?;
        writeln!(
            out,
            "section h2 {{ color: {}; font-size: 14px; letter-spacing: 0.08em; text-transform: uppercase; }}",
            self.accent
        )?;
        match self.layout {
            Layout::Cards => writeln!(
                out,
                "article.item {{ background: {}; border-radius: 10px; padding: 18px 22px; margin: 0 0 18px; box-shadow: 0 1px 4px rgba(0,0,0,0.12); }}",
                self.surface
            )?,
            Layout::Plain => writeln!(
                out,
                "article.item {{ padding: 14px 0; border-bottom: 1px solid {}; }}",
                self.muted
            )?,
        }
        writeln!(out, "article.item h3 {{ margin: 0 0 8px; font-size: 18px; }}")?;
        writeln!(out, ".summary {{ margin: 0 0 12px; padding-left: 20px; }}")?;
        writeln!(
            out,
            ".cta {{ color: {}; font-weight: bold; text-decoration: none; }}",
            self.accent
        )?;
        writeln!(
            out,
            ".footer {{ margin-top: 32px; font-size: 12px; color: {}; }}",
            self.muted
        )?;
        writeln!(out, ".footer a {{ color: {}; }}", self.muted)
    }
}

fn write_item(out: &mut String, item: &NewsletterItem) -> fmt::Result {
    writeln!(out, "<article class=\"item\">")?;
    writeln!(out, "<h3>{}</h3>", encode_text(&item.title))?;
    write_summary(out, &item.summary)?;
    writeln!(
        out,
        "<a class=\"cta\" href=\"{}\">{}</a>",
        encode_double_quoted_attribute(&item.url),
        encode_text(&item.cta)
    )?;
    writeln!(out, "</article>")
}

/// Bullet lines become a list; any other non-empty line becomes a paragraph.
fn write_summary(out: &mut String, summary: &str) -> fmt::Result {
    let mut in_list = false;
    for line in summary.lines().map(str::trim).filter(|l| !l.is_empty()) {
        match strip_bullet(line) {
            Some(point) => {
                if !in_list {
                    writeln!(out, "<ul class=\"summary\">")?;
                    in_list = true;
                }
                writeln!(out, "<li>{}</li>", encode_text(point))?;
            }
            None => {
                if in_list {
                    writeln!(out, "</ul>")?;
                    in_list = false;
                }
                writeln!(out, "<p class=\"summary\">{}</p>", encode_text(line))?;
            }
        }
    }
    if in_list {
        writeln!(out, "</ul>")?;
    }
    Ok(())
}

fn strip_bullet(line: &str) -> Option<&str> {
    ["- ", "* ", "• "]
        .iter()
        .find_map(|marker| line.strip_prefix(marker))
        .map(str::trim)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::generator::Section;
    use crate::models::{Category, SummaryLength, Tone};

    fn context(items: Vec<NewsletterItem>) -> NewsletterContext {
        NewsletterContext {
            newsletter_title: "AI-Powered Daily Newsletter".to_string(),
            tone: Tone::Professional,
            length: SummaryLength::Short,
            manage_link: "#".to_string(),
            sections: vec![Section {
                category: Category::AI,
                items,
            }],
        }
    }

    fn item(title: &str, summary: &str) -> NewsletterItem {
        NewsletterItem {
            title: title.to_string(),
            summary: summary.to_string(),
            url: "https://example.com/a?x=1&y=2".to_string(),
            cta: "Read Full Article →".to_string(),
        }
    }

    #[test]
    fn test_every_template_renders() {
        let ctx = context(vec![item("Story", "- one\n- two")]);
        for name in template_names() {
            let html = render(name, &ctx).unwrap();
            assert!(html.starts_with("<!DOCTYPE html>"));
            assert_eq!(html.matches("<article").count(), 1, "template {name}");
            assert!(html.contains(&format!("template-{name}")));
        }
        assert_eq!(template_names().count(), 8);
    }

    #[test]
    fn test_unknown_template_is_not_found() {
        let err = render("neon", &context(vec![])).unwrap_err();
        assert!(matches!(err, NewsletterError::TemplateNotFound(ref name) if name == "neon"));
    }

    #[test]
    fn test_text_and_urls_are_escaped() {
        let html = render("default", &context(vec![item("<script>alert(1)</script>", "")])).unwrap();
        assert!(!html.contains("<script>"));
        assert!(html.contains("&lt;script&gt;"));
        assert!(html.contains("href=\"https://example.com/a?x=1&amp;y=2\""));
        assert!(html.contains("Read Full Article →"));
    }

    #[test]
    fn test_summary_bullets_become_list() {
        let mut out = String::new();
        write_summary(&mut out, "- first point\n* second point\nTrailing note").unwrap();
        assert_eq!(
            out,
            "<ul class=\"summary\">\n<li>first point</li>\n<li>second point</li>\n</ul>\n\
             <p class=\"summary\">Trailing note</p>\n"
        );
    }

    #[test]
    fn test_empty_summary_renders_nothing() {
        let mut out = String::new();
        write_summary(&mut out, "").unwrap();
        assert!(out.is_empty());
    }

    #[test]
    fn test_sections_get_anchor_ids() {
        let html = render("minimal", &context(vec![item("Story", "- x")])).unwrap();
        assert!(html.contains("<section id=\"ai\">"));
        assert!(html.contains("<h2>AI</h2>"));
    }
}
