use lazy_static::lazy_static;
use regex::Regex;
use serde::{Deserialize, Serialize};
use time::OffsetDateTime;

pub type ArticleId = String;

lazy_static! {
    static ref TAG: Regex = Regex::new(r"<.*?>").expect("valid regex");
}

const MONTHS_FR: [&str; 12] = [
    "janvier", "février", "mars", "avril", "mai", "juin",
    "juillet", "août", "septembre", "octobre", "novembre", "décembre",
];

/// One row of the legal-code dataset.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Article {
    pub article_id: ArticleId,
    /// Citation as printed in the code, e.g. `L1234-5`.
    pub article_num: String,
    /// Milliseconds since the Unix epoch, kept as text.
    pub date_deb: String,
    /// Raw text with inline HTML markup.
    pub texte: String,
    /// Bracketed, comma-separated, quoted list of section titles.
    pub path_title: String,
}

impl Article {
    /// Length used for BM25 normalization: raw character count, markup included.
    pub fn raw_len(&self) -> usize {
        self.texte.chars().count()
    }

    pub fn titles(&self) -> Vec<String> {
        extract_titles(&self.path_title)
    }

    /// `None` when `date_deb` is not a valid millisecond timestamp.
    pub fn effective_date(&self) -> Option<OffsetDateTime> {
        parse_millis(&self.date_deb)
    }

    /// Text split into display lines with markup removed.
    pub fn paragraphs(&self) -> Vec<String> {
        let text = self
            .texte
            .replace("<p>", "")
            .replace("</p>", "\n")
            .replace("<br/>", "\n");
        TAG.replace_all(&text, "")
            .lines()
            .map(str::trim)
            .filter(|line| !line.is_empty())
            .map(str::to_string)
            .collect()
    }
}

pub fn extract_titles(path_title: &str) -> Vec<String> {
    path_title
        .trim_matches(|c: char| c == '[' || c == ']')
        .split(',')
        .map(|t| t.trim_matches(|c: char| c == ' ' || c == '"').to_string())
        .collect()
}

pub fn parse_millis(raw: &str) -> Option<OffsetDateTime> {
    let millis: i64 = raw.trim().parse().ok()?;
    OffsetDateTime::from_unix_timestamp_nanos(millis as i128 * 1_000_000).ok()
}

/// Long French date, e.g. `1 mai 2008`.
pub fn format_date_fr(date: OffsetDateTime) -> String {
    let month = MONTHS_FR[u8::from(date.month()) as usize - 1];
    format!("{} {} {}", date.day(), month, date.year())
}
