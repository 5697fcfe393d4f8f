// config.rs — Compile-time configuration constants and display infrastructure.

use std::sync::atomic::{AtomicU32, Ordering};

// ── Stream model ──────────────────────────────────────────────────────────────

/// Number of register streams in the packed representation.  One fewer than
/// the chip's register count: the mixer register is folded into the three
/// channel-volume streams before packing.
pub const NUM_STREAMS: usize = 13;

/// Number of raw registers in a YM dump frame.
pub const NUM_YM_REGS: usize = 14;

// ── Token limits ──────────────────────────────────────────────────────────────

/// Shortest back-reference worth emitting.
pub const MIN_MATCH_LEN: usize = 3;

/// Longest encodable back-reference.  Capped below 0xFFFF so the playback
/// decoder's 16-bit length counter cannot overflow mid-copy.
pub const MAX_MATCH_LEN: usize = 0xFF00;

/// Literal runs are split before reaching this length so they stay encodable
/// in a 16-bit length extension.
pub const MAX_LITERAL_RUN: usize = 0xFFF0;

// ── Container ─────────────────────────────────────────────────────────────────

/// Version byte written after the `'Y'` magic in the packed container.
pub const CONTAINER_VERSION: u8 = 0x03;

/// Sentinel word terminating the cache-set descriptor table.
pub const SET_TABLE_END: u16 = 0xFFFF;

// ── Minimizer search ranges ───────────────────────────────────────────────────

/// Quick mode, pass 1: uniform cache sizes swept from here...
pub const QUICK_BROAD_MIN: usize = 64;
/// ...up to and including here...
pub const QUICK_BROAD_MAX: usize = 1024;
/// ...in steps of this.
pub const QUICK_BROAD_STEP: usize = 32;

/// Quick mode, pass 2: half-width of the window around pass 1's winner.
pub const QUICK_NARROW_SPAN: usize = 32;
/// Quick mode, pass 2 step.
pub const QUICK_NARROW_STEP: usize = 2;

/// Small mode: per-stream cache sizes swept from here (inclusive)...
pub const SMALL_MIN: usize = 8;
/// ...to here (exclusive)...
pub const SMALL_MAX: usize = 1024;
/// ...in steps of this.
pub const SMALL_STEP: usize = 16;

/// Default total cache budget for the `pack` command (split evenly).
pub const DEFAULT_TOTAL_CACHE: usize = NUM_STREAMS * 512;

// ── Display level ─────────────────────────────────────────────────────────────
//
// 0 = quiet, 1 = normal (progress and reports).  Shared across modules as a
// crate-level atomic; per-stream verbosity travels in the pack configs
// instead, so parallel minimizer tasks stay silent without touching it.

pub static DISPLAY_LEVEL: AtomicU32 = AtomicU32::new(1);

/// Returns the current display level.
#[inline]
pub fn display_level() -> u32 {
    DISPLAY_LEVEL.load(Ordering::Relaxed)
}

/// Sets the display level.
#[inline]
pub fn set_display_level(level: u32) {
    DISPLAY_LEVEL.store(level, Ordering::Relaxed);
}

/// Print to stdout at or above display level 1.
#[macro_export]
macro_rules! display {
    ($($arg:tt)*) => {
        if $crate::config::display_level() >= 1 {
            print!($($arg)*);
        }
    };
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn stream_counts() {
        assert_eq!(NUM_YM_REGS, NUM_STREAMS + 1);
    }

    #[test]
    fn token_limits_fit_sixteen_bits() {
        assert!(MAX_MATCH_LEN < 0xFFFF);
        assert!(MAX_LITERAL_RUN < 0xFFFF);
    }
}
