use anyhow::{anyhow, bail, Context, Result};
use sh3_rng_core::PackedCode;

/// Seeds are hex, as read off a memory viewer; the `0x` prefix is optional.
pub fn parse_seed(seed: &str) -> Result<u32> {
    let s = seed.trim();
    if s.is_empty() {
        return Err(anyhow!("empty seed"));
    }
    let hex = s
        .strip_prefix("0x")
        .or_else(|| s.strip_prefix("0X"))
        .unwrap_or(s);
    u32::from_str_radix(hex, 16).with_context(|| format!("invalid hex seed: {s}"))
}

pub fn seed_to_hex(seed: u32) -> String {
    format!("{seed:08X}")
}

pub fn parse_seed_csv(input: &str) -> Result<Vec<u32>> {
    let mut seeds = Vec::new();
    for token in input.split(',') {
        let token = token.trim();
        if token.is_empty() {
            continue;
        }
        seeds.push(parse_seed(token)?);
    }
    if seeds.is_empty() {
        return Err(anyhow!("no seeds parsed from {input:?}"));
    }
    Ok(seeds)
}

/// Digit rules a puzzle's code input must satisfy.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum CodeRules {
    /// Four unique digits 0-9.
    Shakespeare,
    /// Four unique digits 1-9.
    Hospital,
    /// Four unique digits 0-9, one of them 7.
    Crematorium,
}

impl CodeRules {
    fn min_digit(self) -> u8 {
        match self {
            Self::Hospital => 1,
            Self::Shakespeare | Self::Crematorium => 0,
        }
    }

    fn requires_seven(self) -> bool {
        matches!(self, Self::Crematorium)
    }
}

/// Accepts `0123` (four decimal digits) or packed hex (`0x0123`, or any
/// input containing a hex letter).
pub fn parse_code(input: &str, rules: CodeRules) -> Result<PackedCode> {
    let compact: String = input.chars().filter(|ch| !ch.is_whitespace()).collect();
    if compact.is_empty() {
        bail!("empty code");
    }

    let prefixed = compact.strip_prefix("0x").or_else(|| compact.strip_prefix("0X"));
    let looks_hex = prefixed.is_some() || compact.chars().any(|ch| matches!(ch, 'a'..='f' | 'A'..='F'));

    let packed = if looks_hex {
        let hex = prefixed.unwrap_or(&compact);
        if hex.is_empty() || hex.len() > 4 {
            bail!("packed code must be 1-4 hex digits: {input}");
        }
        u16::from_str_radix(hex, 16).with_context(|| format!("invalid packed code: {input}"))?
    } else {
        if compact.len() != 4 || !compact.chars().all(|ch| ch.is_ascii_digit()) {
            bail!("code must be exactly four digits: {input}");
        }
        compact
            .bytes()
            .fold(0u16, |packed, byte| (packed << 4) | u16::from(byte - b'0'))
    };

    let code = PackedCode::from_packed(packed);
    let digits = code.digits();
    let mut seen = [false; 16];
    for digit in digits {
        if digit < rules.min_digit() || digit > 9 {
            bail!(
                "digit {digit} outside {}-9 in code {code}",
                rules.min_digit()
            );
        }
        if seen[digit as usize] {
            bail!("digit {digit} repeats in code {code}");
        }
        seen[digit as usize] = true;
    }
    if rules.requires_seven() && !code.contains(7) {
        bail!("code {code} must include a 7");
    }

    Ok(code)
}
