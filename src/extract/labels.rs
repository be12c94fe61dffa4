//! Label-driven cell lookup over a parsed HTML document.
//!
//! Tracker pages lay out records as `<td>label</td><td>value</td>` pairs with
//! no stable ids, so a value is found by locating the label cell and taking
//! the next `td` in document order. Checkbox indicators sit inside the label
//! cell or *before* it, so they are found by looking inward first and then
//! searching backward.
//!
//! Every function here is a pure read of the document: absence is reported as
//! `None`, never as an error.
//!
//! # Example
//!
//! ```
//! use scraper::Html;
//! use tracker_core::extract::{LabelMatcher, extract_by_label};
//!
//! let doc = Html::parse_document(
//!     "<table><tr><td>Project Type:</td><td> Alteration </td></tr></table>",
//! );
//! let matcher = LabelMatcher::exact("project type:");
//! assert_eq!(extract_by_label(&doc, &matcher).as_deref(), Some("Alteration"));
//! ```

use regex::{Regex, RegexBuilder};
use scraper::{ElementRef, Html};

use super::ExtractError;
use crate::project::Indicator;

/// How a label cell's text is compared against the wanted label.
#[derive(Debug, Clone)]
pub enum LabelMatcher {
    /// Whole-cell equality after whitespace normalization, ignoring case.
    /// Holds the normalized, lowercased label.
    Exact(String),
    /// Regex search anywhere in the normalized cell text.
    Pattern(Regex),
}

impl LabelMatcher {
    /// Matches cells whose entire text is `label`.
    #[must_use]
    pub fn exact(label: &str) -> Self {
        Self::Exact(normalize_text(label).to_lowercase())
    }

    /// Matches cells whose text contains `pattern`, case-insensitively.
    ///
    /// # Errors
    ///
    /// Returns [`ExtractError::InvalidPattern`] if `pattern` does not compile.
    pub fn pattern(pattern: &str) -> Result<Self, ExtractError> {
        RegexBuilder::new(pattern)
            .case_insensitive(true)
            .build()
            .map(Self::Pattern)
            .map_err(|source| ExtractError::invalid_pattern(pattern, source))
    }

    /// Matches cells with an already-compiled regex, used as given.
    #[must_use]
    pub fn regex(regex: Regex) -> Self {
        Self::Pattern(regex)
    }

    /// Returns true if normalized cell text satisfies this matcher.
    #[must_use]
    pub fn matches(&self, cell_text: &str) -> bool {
        match self {
            Self::Exact(label) => cell_text.to_lowercase() == *label,
            Self::Pattern(regex) => regex.is_match(cell_text),
        }
    }
}

/// Collapses runs of whitespace (including non-breaking spaces) to one
/// space and trims the ends.
#[must_use]
pub fn normalize_text(text: &str) -> String {
    text.split_whitespace().collect::<Vec<_>>().join(" ")
}

/// Returns an element's text content, normalized.
#[must_use]
pub fn cell_text(element: ElementRef<'_>) -> String {
    normalize_text(&element.text().collect::<String>())
}

/// Returns a value cell's text: each text fragment trimmed, then joined
/// without separators, so `<span>$1,200</span> <span>.00</span>` reads
/// `$1,200.00`.
#[must_use]
pub fn value_text(element: ElementRef<'_>) -> String {
    element.text().map(normalize_text).collect()
}

/// Returns the first label cell matching `matcher`, in document order.
///
/// Only innermost cells qualify: a `td` wrapping a nested table would
/// otherwise match on its whole subtree's text.
#[must_use]
pub fn find_label_cell<'a>(doc: &'a Html, matcher: &LabelMatcher) -> Option<ElementRef<'a>> {
    elements(doc).find(|element| is_leaf_cell(*element) && matcher.matches(&cell_text(*element)))
}

/// Returns the text of the cell following the first label matching
/// `matcher`.
///
/// `None` when the label is absent or nothing follows it. A present but
/// blank value cell yields `Some("")`; callers decide whether that counts.
#[must_use]
pub fn extract_by_label(doc: &Html, matcher: &LabelMatcher) -> Option<String> {
    let label = find_label_cell(doc, matcher)?;
    next_cell(doc, label).map(value_text)
}

/// Reads the checkbox indicator labelled exactly `label`.
///
/// The checkbox is the one inside the label cell when there is one
/// (`<td><input type=checkbox><label>HPS</label></td>`), otherwise the
/// nearest one before the label cell.
///
/// - label cell absent: `None`
/// - that checkbox has a `checked` attribute: `Some(Yes)`
/// - otherwise, including no checkbox at all: `Some(No)`
#[must_use]
pub fn extract_indicator(doc: &Html, label: &str) -> Option<Indicator> {
    let label_cell = find_label_cell(doc, &LabelMatcher::exact(label))?;
    let checkbox = label_cell
        .descendants()
        .filter_map(ElementRef::wrap)
        .find(|element| is_checkbox(*element))
        .or_else(|| {
            elements(doc)
                .take_while(|element| element.id() != label_cell.id())
                .filter(|element| is_checkbox(*element))
                .last()
        });
    let checked = checkbox.is_some_and(|checkbox| checkbox.value().attr("checked").is_some());
    Some(Indicator::from(checked))
}

/// All elements of `doc` in document (pre-)order.
pub(crate) fn elements(doc: &Html) -> impl Iterator<Item = ElementRef<'_>> {
    doc.root_element()
        .descendants()
        .filter_map(ElementRef::wrap)
}

fn next_cell<'a>(doc: &'a Html, after: ElementRef<'a>) -> Option<ElementRef<'a>> {
    elements(doc)
        .skip_while(|element| element.id() != after.id())
        .skip(1)
        .find(|element| element.value().name() == "td")
}

fn is_leaf_cell(element: ElementRef<'_>) -> bool {
    element.value().name() == "td"
        && !element
            .descendants()
            .skip(1)
            .filter_map(ElementRef::wrap)
            .any(|inner| inner.value().name() == "td")
}

fn is_checkbox(element: ElementRef<'_>) -> bool {
    element.value().name() == "input"
        && element
            .value()
            .attr("type")
            .is_some_and(|kind| kind.eq_ignore_ascii_case("checkbox"))
}
