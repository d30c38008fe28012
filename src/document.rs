//! Pattern-based substitution of an [`Article`] into the site's HTML.
//!
//! The document layout is fixed and owned by the same project, so each
//! field is located with a small non-greedy pattern instead of a parsed
//! tree. Every pattern replaces only the first region it finds. A region
//! that cannot be found is left exactly as it was and reported back in
//! [`Rendered::missed`].

use crate::article::Article;
use crate::utils::display_date;
use chrono::NaiveDate;
use once_cell::sync::Lazy;
use regex::{NoExpand, Regex};
use std::fmt;
use tracing::{debug, instrument, warn};

/// Fixed reading-time suffix shown after the publish date.
pub const READ_TIME_SUFFIX: &str = " · 8 min read";

/// Glyph closing every article body.
pub const END_MARK: &str = "◆";

/// The six marker regions of the document, in substitution order.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Region {
    Kicker,
    Headline,
    Subhead,
    Timestamp,
    Body,
    Sources,
}

impl Region {
    pub const ALL: [Region; 6] = [
        Region::Kicker,
        Region::Headline,
        Region::Subhead,
        Region::Timestamp,
        Region::Body,
        Region::Sources,
    ];

    fn pattern(self) -> &'static Regex {
        match self {
            Region::Kicker => &*KICKER,
            Region::Headline => &*HEADLINE,
            Region::Subhead => &*SUBHEAD,
            Region::Timestamp => &*TIMESTAMP,
            Region::Body => &*BODY,
            Region::Sources => &*SOURCES,
        }
    }
}

impl fmt::Display for Region {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Region::Kicker => "kicker",
            Region::Headline => "headline",
            Region::Subhead => "subhead",
            Region::Timestamp => "timestamp",
            Region::Body => "body",
            Region::Sources => "sources",
        };
        f.write_str(name)
    }
}

static KICKER: Lazy<Regex> =
    Lazy::new(|| Regex::new(r#"(?s)<span class="article-kicker">.*?</span>"#).unwrap());
static HEADLINE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r#"(?s)<h1 class="article-headline">.*?</h1>"#).unwrap());
static SUBHEAD: Lazy<Regex> =
    Lazy::new(|| Regex::new(r#"(?s)<p class="article-subhead">.*?</p>"#).unwrap());
static TIMESTAMP: Lazy<Regex> =
    Lazy::new(|| Regex::new(r#"(?s)<span class="article-timestamp">.*?</span>"#).unwrap());
static BODY: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r#"(?s)<div class="article-body">.*?<p class="article-end-mark">◆</p>\s*</div>"#)
        .unwrap()
});
static SOURCES: Lazy<Regex> =
    Lazy::new(|| Regex::new(r#"(?s)<ul class="sources-list">.*?</ul>"#).unwrap());

/// Result of splicing an article into a document.
#[derive(Debug)]
pub struct Rendered {
    pub html: String,
    /// Regions whose pattern found no match and were left unchanged.
    pub missed: Vec<Region>,
}

/// Markup that replaces `region` for this article and publish date.
pub fn region_markup(region: Region, article: &Article, date: NaiveDate) -> String {
    match region {
        Region::Kicker => format!(r#"<span class="article-kicker">{}</span>"#, article.kicker),
        Region::Headline => {
            format!(r#"<h1 class="article-headline">{}</h1>"#, article.headline)
        }
        Region::Subhead => format!(r#"<p class="article-subhead">{}</p>"#, article.subhead),
        Region::Timestamp => format!(
            r#"<span class="article-timestamp">{}{READ_TIME_SUFFIX}</span>"#,
            display_date(date)
        ),
        Region::Body => body_block(article),
        Region::Sources => format!(
            "<ul class=\"sources-list\">\n                    \
             <li><a href=\"{}\" target=\"_blank\" rel=\"noopener\">{}</a> — {}</li>\n                \
             </ul>",
            article.source_url, article.source_name, article.source_description
        ),
    }
}

fn body_block(article: &Article) -> String {
    format!(
        "<div class=\"article-body\">\n                \
         <p class=\"article-lede\"><span class=\"drop-cap\">{}</span>{}</p>\n\n                \
         {}\n\n                \
         <p class=\"article-end-mark\">{END_MARK}</p>\n            \
         </div>",
        article.lede_first_letter, article.lede_rest, article.body_html
    )
}

/// Splice `article` into `html`, stamping it with `date`.
///
/// Substitutions run in [`Region::ALL`] order, each on the output of the
/// previous one, and each replaces only the first match.
#[instrument(level = "info", skip_all, fields(bytes = html.len(), %date))]
pub fn render_document(html: &str, article: &Article, date: NaiveDate) -> Rendered {
    let mut out = html.to_string();
    let mut missed = Vec::new();

    for region in Region::ALL {
        let pattern = region.pattern();
        if !pattern.is_match(&out) {
            warn!(%region, "Marker region not found; leaving it unchanged");
            missed.push(region);
            continue;
        }
        let markup = region_markup(region, article, date);
        out = pattern.replace(&out, NoExpand(&markup)).into_owned();
        debug!(%region, "Replaced marker region");
    }

    Rendered { html: out, missed }
}
