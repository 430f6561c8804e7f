//! Stylesheet for rendered sheet tables.
//!
//! Every CSS rule the renderer sees is produced here: the `@page` block from
//! [`PageSetup`], the fixed table rules in [`TABLE_CSS`], and optionally the
//! user's own rules from [`crate::config::BatchConfig::extra_css`]. User CSS
//! comes last so it wins on equal specificity.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Table rules shared by every rendered document.
///
/// `word-wrap` keeps long cell values from overflowing the page edge.
pub const TABLE_CSS: &str = r#"table {
    width: 100%;
    border-collapse: collapse;
    margin-bottom: 15px;
}
th, td {
    border: 1px solid #cccccc;
    padding: 4px 6px;
    text-align: left;
    word-wrap: break-word;
    overflow-wrap: anywhere;
}
th {
    background-color: #f2f2f2;
    font-weight: bold;
}
thead {
    display: table-header-group;
}
tr {
    page-break-inside: avoid;
}
caption {
    caption-side: top;
    font-size: 1.2em;
    font-weight: bold;
    margin-bottom: 10px;
    text-align: left;
}
"#;

/// Default body font stack.
pub const DEFAULT_FONT_FAMILY: &str = "'Arial', 'Helvetica', 'DejaVu Sans', sans-serif";

// ── Page geometry ────────────────────────────────────────────────────────

/// Paper size used in the `@page` rule.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum PageSize {
    /// ISO A3.
    A3,
    /// ISO A4. (default)
    #[default]
    A4,
    /// ISO A5.
    A5,
    /// US Letter.
    Letter,
    /// US Legal.
    Legal,
}

impl PageSize {
    /// CSS keyword for the `size` descriptor.
    pub fn css_keyword(self) -> &'static str {
        match self {
            PageSize::A3 => "A3",
            PageSize::A4 => "A4",
            PageSize::A5 => "A5",
            PageSize::Letter => "letter",
            PageSize::Legal => "legal",
        }
    }
}

impl fmt::Display for PageSize {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.css_keyword())
    }
}

impl FromStr for PageSize {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "a3" => Ok(PageSize::A3),
            "a4" => Ok(PageSize::A4),
            "a5" => Ok(PageSize::A5),
            "letter" => Ok(PageSize::Letter),
            "legal" => Ok(PageSize::Legal),
            other => Err(format!(
                "unknown page size '{other}' (expected a3, a4, a5, letter or legal)"
            )),
        }
    }
}

/// Page orientation. Spreadsheets are usually wider than tall.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum Orientation {
    Portrait,
    /// (default)
    #[default]
    Landscape,
}

impl Orientation {
    pub fn css_keyword(self) -> &'static str {
        match self {
            Orientation::Portrait => "portrait",
            Orientation::Landscape => "landscape",
        }
    }
}

/// Page geometry and base typography for rendered documents.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PageSetup {
    /// Paper size. Default: A4.
    pub size: PageSize,
    /// Orientation. Default: landscape.
    pub orientation: Orientation,
    /// CSS length applied to all four margins. Default: `0.75in`.
    pub margin: String,
    /// Body font size in points. Default: 9.
    pub font_size_pt: f32,
}

impl Default for PageSetup {
    fn default() -> Self {
        Self {
            size: PageSize::default(),
            orientation: Orientation::default(),
            margin: "0.75in".to_string(),
            font_size_pt: 9.0,
        }
    }
}

impl PageSetup {
    /// Render the `@page` and `body` rules.
    pub fn page_css(&self) -> String {
        format!(
            "@page {{\n    size: {} {};\n    margin: {};\n}}\n\
             body {{\n    font-family: {};\n    font-size: {}pt;\n}}\n",
            self.size.css_keyword(),
            self.orientation.css_keyword(),
            self.margin,
            DEFAULT_FONT_FAMILY,
            self.font_size_pt,
        )
    }
}

/// Build the full stylesheet: page setup, table rules, then any user CSS.
pub fn build_stylesheet(setup: &PageSetup, extra_css: Option<&str>) -> String {
    let mut css = setup.page_css();
    css.push_str(TABLE_CSS);
    if let Some(extra) = extra_css.map(str::trim).filter(|s| !s.is_empty()) {
        css.push_str("\n/* user stylesheet */\n");
        css.push_str(extra);
        css.push('\n');
    }
    css
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_is_a4_landscape() {
        let css = PageSetup::default().page_css();
        assert!(css.contains("size: A4 landscape;"), "got: {css}");
        assert!(css.contains("margin: 0.75in;"));
        assert!(css.contains("font-size: 9pt;"));
    }

    #[test]
    fn portrait_letter() {
        let setup = PageSetup {
            size: PageSize::Letter,
            orientation: Orientation::Portrait,
            margin: "1cm".into(),
            font_size_pt: 10.5,
        };
        let css = setup.page_css();
        assert!(css.contains("size: letter portrait;"));
        assert!(css.contains("margin: 1cm;"));
        assert!(css.contains("font-size: 10.5pt;"));
    }

    #[test]
    fn stylesheet_includes_table_rules() {
        let css = build_stylesheet(&PageSetup::default(), None);
        assert!(css.contains("border-collapse: collapse;"));
        assert!(css.contains("background-color: #f2f2f2;"));
        assert!(css.contains("word-wrap: break-word;"));
        assert!(!css.contains("user stylesheet"));
    }

    #[test]
    fn user_css_is_appended_last() {
        let extra = "body { font-family: 'MyFont'; }";
        let css = build_stylesheet(&PageSetup::default(), Some(extra));
        let user_at = css.find("MyFont").unwrap();
        let table_at = css.find("border-collapse").unwrap();
        assert!(user_at > table_at);
    }

    #[test]
    fn blank_user_css_is_ignored() {
        let css = build_stylesheet(&PageSetup::default(), Some("   \n"));
        assert!(!css.contains("user stylesheet"));
    }

    #[test]
    fn page_size_parsing() {
        assert_eq!("A4".parse::<PageSize>().unwrap(), PageSize::A4);
        assert_eq!(" letter ".parse::<PageSize>().unwrap(), PageSize::Letter);
        assert!("tabloid".parse::<PageSize>().is_err());
    }
}
