//! Prompt construction for the daily article request.
//!
//! The date is written into the prompt so the model anchors "recent" to the
//! day of the run. The JSON shape is only requested, never enforced; the
//! article decoder is responsible for rejecting anything that does not fit.

use crate::utils::display_date;
use chrono::NaiveDate;

/// Subject areas the publication covers.
pub const TOPICS: [&str; 3] = ["AI", "Quantum Computing", "Technology Policy"];

const PUBLICATION: &str = "The Daily Signal";

/// Build the natural-language instruction sent to the model for `date`.
pub fn build_prompt(date: NaiveDate) -> String {
    let today = display_date(date);
    let beat = format!("{}, {}, and {}", TOPICS[0], TOPICS[1], TOPICS[2]);
    let search = format!("{}, {}, or {}", TOPICS[0], TOPICS[1], TOPICS[2]);

    format!(
        r#"You are a journalist for "{PUBLICATION}", a news site covering {beat}.

Today is {today}. Search your knowledge for the most significant, globally-relevant news story in {search} from the past 24-48 hours.

Requirements:
- Choose a story with GLOBAL significance (affects multiple countries/regions)
- Write in the style of investigative journalism (like Seymour Hersh)
- Be factual and cite real institutions, researchers, or officials
- Article should be 800-1200 words
- Include a compelling headline and subheadline
- Include 3-4 section headers (h2)
- Include one relevant quote (can be paraphrased from real sources)

Return the article in this exact JSON format:
{{
  "kicker": "CATEGORY · SUBCATEGORY",
  "headline": "Main headline here",
  "subhead": "Compelling subheadline that expands on the story",
  "lede_first_letter": "T",
  "lede_rest": "he rest of the opening paragraph...",
  "body_html": "<p>Rest of article with <h2>Section Headers</h2> and <blockquote class=\"article-quote\">quotes<cite>— Source</cite></blockquote></p>",
  "source_url": "https://...",
  "source_name": "Source Name",
  "source_description": "Brief description of the source"
}}

IMPORTANT: Return ONLY valid JSON, no markdown code blocks."#
    )
}
