// ============================================================
// Layer 4: Padding and Truncation
// ============================================================
// Forces an index sequence to exactly `seq_len` entries.
//
// Two independent choices:
//   truncating: which end loses tokens when the sequence is too long
//   padding   : which end receives zeros when it is too short
//
// With seq_len = 4:
//
//   ids             truncating=pre   truncating=post
//   [1 2 3 4 5 6]   [3 4 5 6]        [1 2 3 4]
//
//   ids             padding=pre      padding=post
//   [7 8]           [0 0 7 8]        [7 8 0 0]
//
// The combination matters downstream: with padding=post every
// row starts with its first real token in column 0. With
// padding=pre the first real token of a short row lands at a
// column that depends on the row's length, while a long row
// (truncated) starts at column 0.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::data::error::EncoderError;
use crate::data::vocabulary::PAD_INDEX;

/// Which end of a sequence padding or truncation applies to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum PadSide {
    /// The front of the sequence
    Pre,
    /// The back of the sequence
    Post,
}

impl fmt::Display for PadSide {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            PadSide::Pre  => write!(f, "pre"),
            PadSide::Post => write!(f, "post"),
        }
    }
}

impl FromStr for PadSide {
    type Err = EncoderError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "pre"  => Ok(PadSide::Pre),
            "post" => Ok(PadSide::Post),
            other  => Err(EncoderError::invalid_configuration(format!(
                "side must be 'pre' or 'post', got '{other}'"
            ))),
        }
    }
}

/// Truncate then pad `ids` to exactly `seq_len` entries.
///
/// A `seq_len` of 0 always yields an empty row; callers validate
/// the configuration before getting here.
pub fn pad_and_truncate(
    mut ids:    Vec<u32>,
    seq_len:    usize,
    padding:    PadSide,
    truncating: PadSide,
) -> Vec<u32> {
    // ── Truncate ──────────────────────────────────────────────────────────────
    if ids.len() > seq_len {
        let excess = ids.len() - seq_len;
        match truncating {
            PadSide::Pre  => { ids.drain(..excess); }
            PadSide::Post => ids.truncate(seq_len),
        }
    }

    // ── Pad ───────────────────────────────────────────────────────────────────
    let missing = seq_len - ids.len();
    if missing == 0 {
        return ids;
    }
    match padding {
        PadSide::Pre => {
            let mut out = vec![PAD_INDEX; missing];
            out.extend(ids);
            out
        }
        PadSide::Post => {
            ids.resize(seq_len, PAD_INDEX);
            ids
        }
    }
}

// ─── Unit Tests ───────────────────────────────────────────────────────────────
#[cfg(test)]
mod tests {
    use super::*;
    use PadSide::{Post, Pre};

    #[test]
    fn test_truncate_pre_keeps_the_tail() {
        assert_eq!(pad_and_truncate(vec![1, 2, 3, 4, 5, 6], 4, Pre, Pre), vec![3, 4, 5, 6]);
    }

    #[test]
    fn test_truncate_post_keeps_the_head() {
        assert_eq!(pad_and_truncate(vec![1, 2, 3, 4, 5, 6], 4, Pre, Post), vec![1, 2, 3, 4]);
    }

    #[test]
    fn test_pad_pre_and_post() {
        assert_eq!(pad_and_truncate(vec![7, 8], 4, Pre, Pre),  vec![0, 0, 7, 8]);
        assert_eq!(pad_and_truncate(vec![7, 8], 4, Post, Pre), vec![7, 8, 0, 0]);
    }

    #[test]
    fn test_exact_length_is_untouched() {
        for padding in [Pre, Post] {
            for truncating in [Pre, Post] {
                assert_eq!(pad_and_truncate(vec![1, 2, 3], 3, padding, truncating), vec![1, 2, 3]);
            }
        }
    }

    #[test]
    fn test_empty_input_is_all_padding() {
        assert_eq!(pad_and_truncate(vec![], 4, Post, Post), vec![0, 0, 0, 0]);
    }

    #[test]
    fn test_parse_sides() {
        assert_eq!("pre".parse::<PadSide>().unwrap(), Pre);
        assert_eq!(" POST ".parse::<PadSide>().unwrap(), Post);
        let err = "middle".parse::<PadSide>().unwrap_err();
        assert!(matches!(err, EncoderError::InvalidConfiguration { .. }));
    }

    #[test]
    fn test_display_matches_parse() {
        for side in [Pre, Post] {
            assert_eq!(side.to_string().parse::<PadSide>().unwrap(), side);
        }
    }

    #[test]
    fn test_serde_lowercase() {
        assert_eq!(serde_json::to_string(&Post).unwrap(), "\"post\"");
        assert_eq!(serde_json::from_str::<PadSide>("\"pre\"").unwrap(), Pre);
    }
}
