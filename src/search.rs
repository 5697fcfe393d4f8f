//! Back-reference search within a bounded sliding window.
//!
//! The finder is stateless: given the source, a head position and the window
//! size it scans every candidate offset and extends the match bytewise.
//! Complexity is O(window · match length) per position, which is fine for
//! register streams (tens of thousands of frames, small windows).

use crate::codec::{Codec, Match};
use crate::config::{MAX_MATCH_LEN, MIN_MATCH_LEN};

/// Length of the run at `head` matching the run `offset` bytes back.
#[inline]
fn match_length(data: &[u8], head: usize, offset: usize) -> usize {
    let check = head - offset;
    let mut len = 0;
    while head + len < data.len() && data[check + len] == data[head + len] && len < MAX_MATCH_LEN {
        len += 1;
    }
    len
}

/// Longest match at `head` within `distance`, smallest offset winning ties.
///
/// Returns [`Match::NONE`] when nothing of at least [`MIN_MATCH_LEN`] exists.
pub fn find_longest_match(data: &[u8], head: usize, distance: usize) -> Match {
    let mut best = Match::NONE;
    let max_dist = distance.min(head);

    for offset in 1..=max_dist {
        let len = match_length(data, head, offset);
        if len >= MIN_MATCH_LEN && len > best.len {
            best = Match { len, off: offset };
        }
    }
    best
}

/// Cheapest-rate match at `head` within `distance`.
///
/// Rate is encoded cost per covered byte; a candidate is only kept while its
/// rate is below 1.0 byte/byte, since anything at or above that loses to
/// plain literals.
pub fn find_cheapest_match(codec: &Codec, data: &[u8], head: usize, distance: usize) -> Match {
    let mut best = Match::NONE;
    let mut best_rate = 1.0f64;
    let max_dist = distance.min(head);

    for offset in 1..=max_dist {
        let len = match_length(data, head, offset);
        if len >= MIN_MATCH_LEN {
            let m = Match { len, off: offset };
            let rate = codec.cost(0, m) as f64 / len as f64;
            if rate < best_rate {
                best_rate = rate;
                best = m;
            }
        }
    }
    best
}
