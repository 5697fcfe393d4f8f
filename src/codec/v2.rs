//! Codec v2 — nybble-packed tokens.
//!
//! The header byte's top nybble selects the token type:
//!
//! ```text
//! LLLL OOOO   match:   L = start length 1..=0xE (0 = extended),
//!                      O = start offset 1..=0xF (0 = extended)
//! 1111 LLLL   literal: L = start length 1..=0xF (0 = extended)
//! ```
//!
//! An extended length cascades: one byte holding 1..=255, or a zero byte
//! followed by a big-endian 16-bit word.  An extended offset uses the same
//! zero-prefix form as codec v1.  Extensions follow the header in the order
//! length, then offset; the literal payload comes last.

use super::{copy_match, decode_offset, enc_word, encode_offset, offset_cost, Match, Token};

/// Top-nybble value marking a literal header.
const LITERAL_NYBBLE: u8 = 0xF0;

/// Longest match length that fits the header's top nybble.
const SHORT_MATCH_LEN: usize = 0xE;

/// Longest literal length that fits the header's low nybble.
const SHORT_LIT_LEN: usize = 0xF;

/// Largest offset that fits the header's low nybble.
const SHORT_OFFSET: usize = 0xF;

/// Nybble-packed codec.
#[derive(Debug, Clone, Default)]
pub struct CodecV2 {
    /// Literals emitted since the last match.  Read by `cost`, moved only by
    /// `apply_lit` / `apply_match`.
    num_literals: usize,
}

// ── Wire helpers ──────────────────────────────────────────────────────────────

/// Append a cascaded length extension: one byte, or `0x00` plus a word.
fn encode_count(out: &mut Vec<u8>, count: usize) {
    if count < 256 {
        out.push(count as u8);
    } else {
        out.push(0);
        enc_word(out, count as u16);
    }
}

/// Read a cascaded length extension, advancing `head`.
fn decode_count(input: &[u8], head: &mut usize) -> usize {
    let mut count = input[*head] as usize;
    *head += 1;
    if count == 0 {
        count = (input[*head] as usize) << 8 | input[*head + 1] as usize;
        *head += 2;
    }
    count
}

impl CodecV2 {
    /// Full byte cost of a literal run of `count`, including its payload.
    fn lit_cost(&self, count: usize) -> usize {
        if count == 0 {
            return 0;
        }
        let mut cost = 1;
        if count > SHORT_LIT_LEN {
            cost += 1;
            if count > 0xFF {
                cost += 2;
            }
        }
        cost + count
    }

    /// Full byte cost of a match.
    fn match_cost(&self, m: Match) -> usize {
        if m.is_none() {
            return 0;
        }
        let mut cost = 1;
        if m.len > SHORT_MATCH_LEN {
            cost += 1;
            if m.len > 0xFF {
                cost += 2;
            }
        }
        if m.off > SHORT_OFFSET {
            cost += offset_cost(m.off);
        }
        cost
    }

    /// Additional byte cost of `lit_count` more literals followed by `m`,
    /// with the literal part taken as a delta against the running count.
    pub fn cost(&self, lit_count: usize, m: Match) -> usize {
        let mut cost = 0;
        if lit_count != 0 {
            cost += self.lit_cost(self.num_literals + lit_count) - self.lit_cost(self.num_literals);
        }
        cost + self.match_cost(m)
    }

    pub fn apply_lit(&mut self, lit_count: usize) {
        self.num_literals += lit_count;
    }

    pub fn apply_match(&mut self, _m: Match) {
        self.num_literals = 0;
    }

    pub fn reset(&mut self) {
        self.num_literals = 0;
    }

    /// Append the encoding of one token to `out`.
    pub fn encode(&self, t: &Token, out: &mut Vec<u8>, src: &[u8]) {
        match *t {
            Token::Match(m) => {
                // A zero offset nybble means "extension follows", so the
                // sentinel offset 0 has no encoding at all.
                assert!(m.off != 0, "zero match offset at encode time");
                // Zero nybbles flag "extension follows".
                let start_len = if m.len <= SHORT_MATCH_LEN { m.len as u8 } else { 0 };
                let start_off = if m.off <= SHORT_OFFSET { m.off as u8 } else { 0 };
                out.push(start_len << 4 | start_off);
                if m.len > SHORT_MATCH_LEN {
                    encode_count(out, m.len);
                }
                if m.off > SHORT_OFFSET {
                    encode_offset(out, m.off);
                }
            }
            Token::Literal { len, pos } => {
                if len <= SHORT_LIT_LEN {
                    out.push(LITERAL_NYBBLE + len as u8);
                } else {
                    out.push(LITERAL_NYBBLE);
                    encode_count(out, len);
                }
                out.extend_from_slice(&src[pos..pos + len]);
            }
        }
    }

    /// Decode one token at `*head`, appending its expansion to `out`.
    pub fn decode_token(&self, input: &[u8], head: &mut usize, out: &mut Vec<u8>) {
        let top = input[*head];
        *head += 1;

        if top & LITERAL_NYBBLE == LITERAL_NYBBLE {
            let mut count = (top & 0x0F) as usize;
            if count == 0 {
                count = decode_count(input, head);
            }
            out.extend_from_slice(&input[*head..*head + count]);
            *head += count;
        } else {
            let mut count = (top >> 4) as usize;
            let mut offset = (top & 0x0F) as usize;
            if count == 0 {
                count = decode_count(input, head);
            }
            if offset == 0 {
                offset = decode_offset(input, head);
            }
            copy_match(out, offset, count);
        }
    }
}
