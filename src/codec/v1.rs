//! Codec v1 — byte-level, length-prefix tokens with zero-prefix offsets.
//!
//! Every token starts with a header byte.  Top bit clear = match, set =
//! literal run.  The low 7 bits carry a short length 1..=127; zero means the
//! real length follows as a big-endian 16-bit word.  A match is completed by
//! a zero-prefix offset; a literal run is completed by its payload bytes.

use super::{copy_match, decode_offset, enc_word, encode_offset, offset_cost, Match, Token};

/// Header-byte flag marking a literal run.
const LITERAL_FLAG: u8 = 0x80;

/// Lengths below this fit the header byte's low 7 bits.
const SHORT_LEN_LIMIT: usize = 128;

/// Byte-level length-prefix codec.
#[derive(Debug, Clone, Default)]
pub struct CodecV1 {
    /// Literals emitted since the last match.  Read by `cost`, moved only by
    /// `apply_lit` / `apply_match`.
    num_literals: usize,
}

// ── Wire helpers ──────────────────────────────────────────────────────────────

/// Append a length with the literal/match flag folded into the header byte.
fn encode_count(out: &mut Vec<u8>, count: usize, flag: u8) {
    if count < SHORT_LEN_LIMIT {
        out.push(count as u8 | flag);
    } else {
        out.push(flag);
        enc_word(out, count as u16);
    }
}

impl CodecV1 {
    /// Full byte cost of a literal run of `count`, including its payload.
    fn lit_cost(&self, count: usize) -> usize {
        if count == 0 {
            return 0;
        }
        let header = if count < SHORT_LEN_LIMIT { 1 } else { 3 };
        header + count
    }

    /// Full byte cost of a match.  A match always opens a new token, so no
    /// delta against running state is involved.
    fn match_cost(&self, m: Match) -> usize {
        if m.is_none() {
            return 0;
        }
        let mut cost = 1;
        if m.len >= SHORT_LEN_LIMIT {
            cost += 2;
        }
        cost + offset_cost(m.off)
    }

    /// Additional byte cost of `lit_count` more literals followed by `m`.
    ///
    /// The literal part is a delta: extending an open run may cost only the
    /// payload bytes, or payload plus the header growth when the run crosses
    /// the short-length limit.
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
                encode_count(out, m.len, 0);
                encode_offset(out, m.off);
            }
            Token::Literal { len, pos } => {
                encode_count(out, len, LITERAL_FLAG);
                out.extend_from_slice(&src[pos..pos + len]);
            }
        }
    }

    /// Decode one token at `*head`, appending its expansion to `out`.
    pub fn decode_token(&self, input: &[u8], head: &mut usize, out: &mut Vec<u8>) {
        let top = input[*head];
        *head += 1;

        let mut count = (top & 0x7F) as usize;
        if count == 0 {
            count = (input[*head] as usize) << 8 | input[*head + 1] as usize;
            *head += 2;
        }

        if top & LITERAL_FLAG != 0 {
            // Literal run: the next `count` packed bytes are the payload.
            out.extend_from_slice(&input[*head..*head + count]);
            *head += count;
        } else {
            let offset = decode_offset(input, head);
            copy_match(out, offset, count);
        }
    }
}
