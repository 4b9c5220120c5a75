//! Outgoing chat messages.

use comfy_table::presets::ASCII_FULL_CONDENSED;
use comfy_table::Table;

const MARKDOWN_V2_SPECIAL: &[char] = &[
    '_', '*', '[', ']', '(', ')', '~', '`', '>', '#', '+', '-', '=', '|', '{', '}', '.', '!',
    '\\',
];

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ParseMode {
    Plain,
    MarkdownV2,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Reply {
    pub text: String,
    pub parse_mode: ParseMode,
}

impl Reply {
    pub fn plain(text: impl Into<String>) -> Self {
        Self {
            text: text.into(),
            parse_mode: ParseMode::Plain,
        }
    }

    /// Renders rows as a numbered text table inside a MarkdownV2 code block.
    pub fn table(headers: &[&str], rows: &[Vec<String>]) -> Self {
        let numbered: Vec<Vec<String>> = rows
            .iter()
            .enumerate()
            .map(|(idx, row)| {
                std::iter::once((idx + 1).to_string())
                    .chain(row.iter().cloned())
                    .collect()
            })
            .collect();
        let headers: Vec<String> = std::iter::once("ID")
            .chain(headers.iter().copied())
            .map(str::to_uppercase)
            .collect();

        let table = render_table(&headers, &numbered);
        Self {
            text: format!("```\n{}\n```", escape_markdown_v2(&table)),
            parse_mode: ParseMode::MarkdownV2,
        }
    }
}

pub fn escape_markdown_v2(text: &str) -> String {
    let mut escaped = String::with_capacity(text.len());
    for c in text.chars() {
        if MARKDOWN_V2_SPECIAL.contains(&c) {
            escaped.push('\\');
        }
        escaped.push(c);
    }
    escaped
}

fn render_table(headers: &[String], rows: &[Vec<String>]) -> String {
    let mut table = Table::new();
    table.load_preset(ASCII_FULL_CONDENSED).set_header(headers);
    for row in rows {
        table.add_row(row);
    }
    table.to_string()
}
