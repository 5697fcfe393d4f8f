//! Uncompressed alternate outputs: frame-major de-interleave and delta packs.
//!
//! Neither goes through the token pipeline; they exist for players that want
//! trivially cheap decoding at the price of size.

use crate::codec::enc_long;
use crate::config::NUM_YM_REGS;
use crate::streams::RawRegisters;

/// De-interleave to per-frame register blocks.
///
/// Output: `'Y','U'`, a 32-bit frame count, then one 14-byte block of
/// register values per frame.
pub fn encode_simple(raw: &RawRegisters) -> Vec<u8> {
    let num_frames = raw.data[0].len();

    let mut out = Vec::with_capacity(6 + num_frames * NUM_YM_REGS);
    out.push(b'Y');
    out.push(b'U');
    enc_long(&mut out, num_frames as u32);

    for frame in 0..num_frames {
        for reg in 0..NUM_YM_REGS {
            out.push(raw.data[reg][frame]);
        }
    }
    out
}

/// Delta-pack: per frame, emit only the registers that changed.
///
/// Output: `'Y','D'`, a 32-bit frame count, then per frame two groups
/// (registers 0..=6 and 7..=13), each a change mask followed by the changed
/// values.  The mask accumulates MSB-first and is written shifted left one
/// bit, its bottom bit unused.  Register 13 (envelope shape) is special: a
/// write retriggers the envelope, so it is emitted only when the value is
/// not the 0xFF rest marker, regardless of history.
pub fn encode_delta(raw: &RawRegisters) -> Vec<u8> {
    let num_frames = raw.data[0].len();

    let mut out = Vec::new();
    out.push(b'Y');
    out.push(b'D');
    enc_long(&mut out, num_frames as u32);

    let mut previous = [0xFFu8; NUM_YM_REGS];
    let mut vals: Vec<u8> = Vec::with_capacity(NUM_YM_REGS);

    for frame in 0..num_frames {
        let mut mask: u8 = 0;
        for reg in 0..NUM_YM_REGS {
            let value = raw.data[reg][frame];
            let do_out = if reg == 13 {
                value != 0xFF
            } else {
                value != previous[reg] || frame == 0
            };

            mask <<= 1;
            if do_out {
                mask |= 1;
                vals.push(value);
            }
            previous[reg] = value;

            if reg == 6 || reg == 13 {
                out.push(mask << 1);
                out.append(&mut vals);
                mask = 0;
            }
        }
    }
    out
}
