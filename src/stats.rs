//! Token statistics gathered during packing, and the histogram report.

use std::collections::BTreeMap;

use crate::codec::Token;

/// Fraction `num / denom`, zero when the denominator is zero.
#[inline]
pub fn ratio(num: usize, denom: usize) -> f32 {
    if denom == 0 {
        return 0.0;
    }
    num as f32 / denom as f32
}

/// `ratio` scaled to a percentage.
#[inline]
pub fn percent(num: usize, denom: usize) -> f32 {
    100.0 * ratio(num, denom)
}

/// Aggregate statistics over every token emitted for a file.
#[derive(Debug, Default)]
pub struct PackStats {
    /// match length -> count
    len_map: BTreeMap<usize, usize>,
    /// match distance -> count
    dist_map: BTreeMap<usize, usize>,
    /// literal run length -> count
    litlen_map: BTreeMap<usize, usize>,
    pub num_matches: usize,
    pub num_tokens: usize,
    pub match_size: usize,
}

impl PackStats {
    pub fn new() -> Self {
        Self::default()
    }

    /// Fold one stream's token list into the running histograms.
    pub fn record(&mut self, tokens: &[Token]) {
        for t in tokens {
            match *t {
                Token::Match(m) => {
                    *self.len_map.entry(m.len).or_default() += 1;
                    *self.dist_map.entry(m.off).or_default() += 1;
                    self.num_matches += 1;
                    self.match_size += m.len;
                }
                Token::Literal { len, .. } => {
                    *self.litlen_map.entry(len).or_default() += 1;
                }
            }
        }
        self.num_tokens += tokens.len();
    }

    /// Print the three histograms as star-bar charts.
    pub fn print_histograms(&self) {
        println!("\nMatch Distances:");
        print_map(&self.dist_map);
        println!("\nMatch Lengths:");
        print_map(&self.len_map);
        println!("\nLiteral Lengths:");
        print_map(&self.litlen_map);
    }
}

/// One histogram, largest key first, bars scaled to the modal count.
fn print_map(map: &BTreeMap<usize, usize>) {
    let max = map.values().copied().max().unwrap_or(0);
    let total: usize = map.values().sum();
    if max == 0 {
        return;
    }
    for (&key, &count) in map.iter().rev() {
        let bar = 80 * count / max;
        if bar != 0 {
            println!(
                "[{:4}] {} {} ({}%)",
                key,
                "*".repeat(bar),
                count,
                count * 100 / total
            );
        } else {
            println!("[{:4}] {}", key, count);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::codec::Match;

    #[test]
    fn ratio_handles_zero_denominator() {
        assert_eq!(ratio(5, 0), 0.0);
        assert_eq!(percent(1, 2), 50.0);
    }

    #[test]
    fn record_counts_tokens() {
        let mut stats = PackStats::new();
        stats.record(&[
            Token::Literal { len: 4, pos: 0 },
            Token::Match(Match { len: 7, off: 2 }),
        ]);
        assert_eq!(stats.num_tokens, 2);
        assert_eq!(stats.num_matches, 1);
        assert_eq!(stats.match_size, 7);
    }
}
