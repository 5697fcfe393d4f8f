//! Stream tokenizers — greedy and lazy parsing strategies.
//!
//! Both walk the source left to right and produce a token list that covers it
//! exactly.  The lazy strategy (the production default) refines each candidate
//! match twice using the codec's byte-exact cost function:
//!
//! 1. literal-vs-match: drop the match when emitting its span as literals is
//!    strictly cheaper;
//! 2. one-step look-ahead: emit a single literal and restart when the match
//!    at `head + 1` has a strictly better cost rate.
//!
//! The look-ahead is deliberately limited to one position so the hot loop
//! stays O(frames · window).

use crate::codec::{Codec, Match, Token};
use crate::config::MAX_LITERAL_RUN;
use crate::search::{find_cheapest_match, find_longest_match};
use crate::stats::percent;

/// Packing configuration for a single register stream.
#[derive(Debug, Clone, Copy)]
pub struct StreamPackConfig {
    /// Sliding-window size for this stream; also the cache the player
    /// reserves for it.
    pub buffer_size: usize,
    /// Print per-stream tokenization detail.
    pub verbose: bool,
}

/// Append one literal at `pos`, coalescing into an open literal run.
///
/// Runs are split before [`MAX_LITERAL_RUN`] so their length always fits the
/// codecs' 16-bit length extension.
fn push_literal(tokens: &mut Vec<Token>, pos: usize) {
    if let Some(Token::Literal { len, .. }) = tokens.last_mut() {
        if *len < MAX_LITERAL_RUN {
            *len += 1;
            return;
        }
    }
    tokens.push(Token::Literal { len: 1, pos });
}

/// Greedy parse: take the longest match at every position, else one literal.
///
/// Never consults the cost function, so it runs without encoder state.
pub fn tokenize_greedy(data: &[u8], cfg: &StreamPackConfig) -> Vec<Token> {
    let mut tokens = Vec::new();
    let mut head = 0;
    let mut match_bytes = 0;
    let mut lit_bytes = 0;

    while head < data.len() {
        let best = find_longest_match(data, head, cfg.buffer_size);
        if !best.is_none() {
            head += best.len;
            match_bytes += best.len;
            tokens.push(Token::Match(best));
        } else {
            push_literal(&mut tokens, head);
            head += 1;
            lit_bytes += 1;
        }
    }
    if cfg.verbose {
        println!(
            "\tGreedy: Matches {} Literals {} ({:.2}%)",
            match_bytes,
            lit_bytes,
            percent(match_bytes, lit_bytes + match_bytes)
        );
    }
    tokens
}

/// Lazy parse with cost-driven refinement.
///
/// `use_cheapest` selects the cheapest-rate finder instead of the longest;
/// the small minimizer uses it when tuning per-stream cache sizes.  The
/// codec's running literal count is updated through `apply_lit` /
/// `apply_match` as tokens are emitted, keeping later cost queries exact.
pub fn tokenize_lazy(
    codec: &mut Codec,
    data: &[u8],
    use_cheapest: bool,
    cfg: &StreamPackConfig,
) -> Vec<Token> {
    let mut tokens = Vec::new();
    let mut head = 0;

    let mut used_match = 0;
    let mut used_matchlit = 0;
    let mut used_second = 0;
    let mut match_bytes = 0;
    let mut lit_bytes = 0;

    let window = cfg.buffer_size;
    let find = |codec: &Codec, head: usize| -> Match {
        if use_cheapest {
            find_cheapest_match(codec, data, head, window)
        } else {
            find_longest_match(data, head, window)
        }
    };

    while head < data.len() {
        let best0 = find(codec, head);
        let mut choose_lit = best0.is_none();

        // A match must beat the cost of spelling its span out as literals.
        if !choose_lit {
            let cost_match = codec.cost(0, best0);
            let cost_lit = codec.cost(best0.len, Match::NONE);
            if cost_lit < cost_match {
                choose_lit = true;
                used_matchlit += 1;
            }
        }

        // Look one byte ahead; a strictly better rate there means the match
        // at `head` was premature.
        if !choose_lit && head + 1 < data.len() {
            let best1 = find(codec, head + 1);
            if !best1.is_none() {
                let rate0 = codec.cost(0, best0) as f64 / best0.len as f64;
                let rate1 = codec.cost(1, best1) as f64 / (1 + best1.len) as f64;
                if rate1 < rate0 {
                    choose_lit = true;
                    used_second += 1;
                }
            }
        }

        if choose_lit {
            push_literal(&mut tokens, head);
            head += 1;
            codec.apply_lit(1);
            lit_bytes += 1;
        } else {
            tokens.push(Token::Match(best0));
            head += best0.len;
            codec.apply_match(best0);
            used_match += 1;
            match_bytes += best0.len;
        }
    }

    if cfg.verbose {
        println!(
            "\tLazy: Matches {} Literals {} ({:.2}%)",
            match_bytes,
            lit_bytes,
            percent(match_bytes, lit_bytes + match_bytes)
        );
        println!(
            "\tLazy: Used match: {} used matchlit: {} used second: {}",
            used_match, used_matchlit, used_second
        );
    }

    tokens
}

#[cfg(test)]
mod tests {
    use super::*;

    const QUIET: StreamPackConfig = StreamPackConfig { buffer_size: 16, verbose: false };

    fn coverage(tokens: &[Token]) -> usize {
        tokens.iter().map(Token::len).sum()
    }

    #[test]
    fn literals_coalesce() {
        let mut tokens = Vec::new();
        for pos in 0..5 {
            push_literal(&mut tokens, pos);
        }
        assert_eq!(tokens, [Token::Literal { len: 5, pos: 0 }]);
    }

    #[test]
    fn literal_run_splits_at_cap() {
        let mut tokens = vec![Token::Literal { len: MAX_LITERAL_RUN, pos: 0 }];
        push_literal(&mut tokens, MAX_LITERAL_RUN);
        assert_eq!(tokens.len(), 2);
        assert_eq!(tokens[1], Token::Literal { len: 1, pos: MAX_LITERAL_RUN });
    }

    #[test]
    fn greedy_covers_source() {
        let data: Vec<u8> = (0..64).map(|i| (i % 7) as u8).collect();
        let tokens = tokenize_greedy(&data, &QUIET);
        assert_eq!(coverage(&tokens), data.len());
    }

    #[test]
    fn lazy_covers_source() {
        let data: Vec<u8> = (0..64).map(|i| (i % 7) as u8).collect();
        let mut codec = Codec::from_id(1).unwrap();
        let tokens = tokenize_lazy(&mut codec, &data, false, &QUIET);
        assert_eq!(coverage(&tokens), data.len());
    }
}
