//! Plain-text view of a grid template.
//!
//! Every cell shows its area id, `.` stays `.`, and ids that failed
//! resolution are wrapped in brackets. Columns are padded to the widest
//! label by display width so wide characters stay aligned.

use std::collections::HashSet;

use unicode_width::UnicodeWidthStr;

use crate::layout::ResolveFailure;
use crate::spec::{LayoutSpec, PLACEHOLDER};

pub fn grid_preview(spec: &LayoutSpec, failure: Option<&ResolveFailure>) -> String {
    let broken: HashSet<&str> = failure
        .map(|failure| failure.errors.iter().map(|err| err.id()).collect())
        .unwrap_or_default();

    let labels: Vec<Vec<String>> = spec
        .cells()
        .into_iter()
        .map(|row| {
            row.into_iter()
                .map(|token| {
                    if token != PLACEHOLDER && broken.contains(token) {
                        format!("[{token}]")
                    } else {
                        token.to_string()
                    }
                })
                .collect()
        })
        .collect();

    let width = labels
        .iter()
        .flatten()
        .map(|label| label.width())
        .max()
        .unwrap_or(0);

    labels
        .iter()
        .map(|row| {
            row.iter()
                .map(|label| pad(label, width))
                .collect::<Vec<_>>()
                .join(" ")
                .trim_end()
                .to_string()
        })
        .collect::<Vec<_>>()
        .join("\n")
}

fn pad(label: &str, width: usize) -> String {
    let fill = width.saturating_sub(label.width());
    format!("{label}{}", " ".repeat(fill))
}
