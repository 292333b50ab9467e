//! Selection expressions for picking items out of a numbered listing
//!
//! Grammar:
//!
//! ```text
//! selection := "all" | term ("," term)*
//! term      := index | index "-" index
//! ```
//!
//! Indices are 1-based. Terms are evaluated left to right and their
//! contributions concatenated without sorting or deduplication.

use thiserror::Error;

/// Why a selection expression could not be resolved.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum SelectionError {
    /// A term that is not an index or a range.
    #[error("'{term}' is not a number or range")]
    Malformed { term: String },

    /// A bare index outside `1..=len`.
    #[error("{index} is out of range (1-{len})")]
    OutOfRange { index: usize, len: usize },
}

/// What to do when a selection expression fails to parse.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum SelectionPolicy {
    /// Abandon partial results and take every candidate.
    #[default]
    FallbackToAll,
    /// Take nothing and report the error.
    Strict,
}

/// Result of resolving a selection expression against a listing.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Selection {
    /// 1-based indices in the order the user wrote them
    pub indices: Vec<usize>,
    /// Set when the expression failed to parse and the policy kicked in
    pub warning: Option<SelectionError>,
}

impl Selection {
    pub fn is_empty(&self) -> bool {
        self.indices.is_empty()
    }

    /// Map the indices onto `items`, cloning each picked element.
    pub fn pick<T: Clone>(&self, items: &[T]) -> Vec<T> {
        self.indices
            .iter()
            .filter_map(|&i| items.get(i.checked_sub(1)?).cloned())
            .collect()
    }
}

/// Parse `input` against a listing of `len` items.
///
/// Returns the raw indices, or the first error encountered. Ranges are
/// clamped to the listing and a reversed range contributes nothing; only a
/// bare index outside the listing is an error.
pub fn parse_selection(input: &str, len: usize) -> Result<Vec<usize>, SelectionError> {
    let input = input.trim().to_lowercase();

    if input == "all" {
        return Ok((1..=len).collect());
    }

    let mut indices = Vec::new();
    for raw in input.split(',') {
        let term = raw.trim();
        match term.split_once('-') {
            Some((start, end)) => {
                let start = parse_index(start, term)?;
                let end = parse_index(end, term)?;
                let end = end.min(len);
                if start <= end {
                    indices.extend(start..=end);
                }
            }
            None => {
                let index = parse_index(term, term)?;
                if index > len {
                    return Err(SelectionError::OutOfRange { index, len });
                }
                indices.push(index);
            }
        }
    }

    Ok(indices)
}

/// Resolve `input` under `policy`, never failing.
pub fn resolve_selection(input: &str, len: usize, policy: SelectionPolicy) -> Selection {
    match parse_selection(input, len) {
        Ok(indices) => Selection {
            indices,
            warning: None,
        },
        Err(err) => {
            tracing::debug!(input, len, error = %err, "selection rejected");
            let indices = match policy {
                SelectionPolicy::FallbackToAll => (1..=len).collect(),
                SelectionPolicy::Strict => Vec::new(),
            };
            Selection {
                indices,
                warning: Some(err),
            }
        }
    }
}

fn parse_index(text: &str, term: &str) -> Result<usize, SelectionError> {
    let malformed = || SelectionError::Malformed {
        term: term.to_string(),
    };
    let text = text.trim();
    if text.is_empty() || !text.bytes().all(|b| b.is_ascii_digit()) {
        return Err(malformed());
    }
    match text.parse::<usize>() {
        Ok(0) | Err(_) => Err(malformed()),
        Ok(index) => Ok(index),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_all_returns_every_index_in_order() {
        assert_eq!(parse_selection("all", 4).unwrap(), vec![1, 2, 3, 4]);
        assert_eq!(parse_selection("  ALL ", 2).unwrap(), vec![1, 2]);
        assert!(parse_selection("all", 0).unwrap().is_empty());
    }

    #[test]
    fn test_range_is_inclusive() {
        assert_eq!(parse_selection("2-6", 10).unwrap(), vec![2, 3, 4, 5, 6]);
        assert_eq!(parse_selection("3-3", 3).unwrap(), vec![3]);
    }

    #[test]
    fn test_term_order_is_preserved() {
        assert_eq!(parse_selection("3,1-2", 3).unwrap(), vec![3, 1, 2]);
    }

    #[test]
    fn test_overlapping_terms_keep_duplicates() {
        assert_eq!(parse_selection("1,1-2", 5).unwrap(), vec![1, 1, 2]);
    }

    #[test]
    fn test_reversed_range_contributes_nothing() {
        assert!(parse_selection("5-2", 10).unwrap().is_empty());
        assert_eq!(parse_selection("5-2,7", 10).unwrap(), vec![7]);
    }

    #[test]
    fn test_range_past_end_is_truncated() {
        assert_eq!(parse_selection("4-9", 5).unwrap(), vec![4, 5]);
        assert!(parse_selection("7-9", 5).unwrap().is_empty());
    }

    #[test]
    fn test_whitespace_around_terms_is_ignored() {
        assert_eq!(parse_selection(" 1 , 3 - 4 ", 5).unwrap(), vec![1, 3, 4]);
    }

    #[test]
    fn test_bare_index_out_of_range_errors() {
        assert_eq!(
            parse_selection("9", 3),
            Err(SelectionError::OutOfRange { index: 9, len: 3 })
        );
    }

    #[test]
    fn test_malformed_terms_error() {
        for input in ["abc", "1,,2", "1-", "-3", "0", "1-2-3", "2,x", ""] {
            assert!(
                matches!(parse_selection(input, 5), Err(SelectionError::Malformed { .. })),
                "expected malformed for {:?}",
                input
            );
        }
    }

    #[test]
    fn test_fallback_policy_selects_all_with_warning() {
        let selection = resolve_selection("abc", 3, SelectionPolicy::FallbackToAll);
        assert_eq!(selection.indices, vec![1, 2, 3]);
        assert!(selection.warning.is_some());
    }

    #[test]
    fn test_strict_policy_selects_nothing() {
        let selection = resolve_selection("9", 3, SelectionPolicy::Strict);
        assert!(selection.is_empty());
        assert_eq!(
            selection.warning,
            Some(SelectionError::OutOfRange { index: 9, len: 3 })
        );
    }

    #[test]
    fn test_pick_maps_indices_to_items() {
        let items = ["a", "b", "c"];
        let selection = resolve_selection("3,1", 3, SelectionPolicy::default());
        assert_eq!(selection.pick(&items), vec!["c", "a"]);
    }
}
