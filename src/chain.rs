// src/chain.rs

//! Small chain-level value types: addresses, private keys and ether amounts.
//!
//! These only validate shape. Nothing here talks to a node.

use std::fmt;
use std::str::FromStr;
use std::sync::LazyLock;

use regex::Regex;

static ADDRESS_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^0x[0-9a-fA-F]{40}$").expect("valid address regex"));

static PRIVATE_KEY_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^0x[0-9a-fA-F]{64}$").expect("valid private key regex"));

/// Number of decimals of one ether in wei.
pub const ETHER_DECIMALS: u32 = 18;

/// A 20-byte hex address, kept in the caller's original casing.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct Address(String);

impl Address {
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl FromStr for Address {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let s = s.trim();
        if ADDRESS_RE.is_match(s) {
            Ok(Address(s.to_string()))
        } else {
            Err(format!("invalid address '{s}' (expected 0x followed by 40 hex digits)"))
        }
    }
}

impl fmt::Display for Address {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// A 32-byte hex private key. `Debug` and `Display` never print the key.
#[derive(Clone, PartialEq, Eq)]
pub struct PrivateKey(String);

impl PrivateKey {
    /// The raw key, for handing to the signing tool.
    pub fn expose(&self) -> &str {
        &self.0
    }
}

impl FromStr for PrivateKey {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let s = s.trim();
        if PRIVATE_KEY_RE.is_match(s) {
            Ok(PrivateKey(s.to_string()))
        } else {
            Err("invalid private key (expected 0x followed by 64 hex digits)".to_string())
        }
    }
}

impl fmt::Debug for PrivateKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("PrivateKey(<redacted>)")
    }
}

impl fmt::Display for PrivateKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("<redacted>")
    }
}

/// Parse a decimal ether amount (`"10"`, `"0.5"`, `"1.000000000000000001"`)
/// into wei.
pub fn parse_ether(s: &str) -> Result<u128, String> {
    let s = s.trim();
    if s.is_empty() {
        return Err("empty ether amount".to_string());
    }

    let (whole, frac) = match s.split_once('.') {
        Some((w, f)) => (w, f),
        None => (s, ""),
    };

    if whole.is_empty() && frac.is_empty() {
        return Err(format!("invalid ether amount '{s}'"));
    }
    if !whole.chars().all(|c| c.is_ascii_digit()) || !frac.chars().all(|c| c.is_ascii_digit()) {
        return Err(format!("invalid ether amount '{s}' (digits and one '.' only)"));
    }
    if frac.len() > ETHER_DECIMALS as usize {
        return Err(format!(
            "ether amount '{s}' has more than {ETHER_DECIMALS} decimal places"
        ));
    }

    let scale = 10u128.pow(ETHER_DECIMALS);
    let whole_wei = if whole.is_empty() {
        0
    } else {
        whole
            .parse::<u128>()
            .ok()
            .and_then(|w| w.checked_mul(scale))
            .ok_or_else(|| format!("ether amount '{s}' is too large"))?
    };

    let frac_wei = if frac.is_empty() {
        0
    } else {
        let padded = format!("{frac:0<width$}", width = ETHER_DECIMALS as usize);
        padded
            .parse::<u128>()
            .map_err(|e| format!("invalid ether fraction '{frac}': {e}"))?
    };

    whole_wei
        .checked_add(frac_wei)
        .ok_or_else(|| format!("ether amount '{s}' is too large"))
}

/// Parse a token amount in the contract's smallest unit (`"50000"`,
/// `"1_000_000_000_000_000_000_000"`).
pub fn parse_token_amount(s: &str) -> Result<u128, String> {
    let s = s.trim();
    let digits: String = s.chars().filter(|&c| c != '_').collect();
    if digits.is_empty() || !digits.chars().all(|c| c.is_ascii_digit()) {
        return Err(format!("invalid token amount '{s}' (whole units only)"));
    }
    digits
        .parse::<u128>()
        .map_err(|_| format!("token amount '{s}' is too large"))
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    #[test]
    fn parses_whole_and_fractional_ether() {
        assert_eq!(parse_ether("10").unwrap(), 10_000_000_000_000_000_000);
        assert_eq!(parse_ether("0.5").unwrap(), 500_000_000_000_000_000);
        assert_eq!(parse_ether(".25").unwrap(), 250_000_000_000_000_000);
        assert_eq!(parse_ether("1.000000000000000001").unwrap(), 1_000_000_000_000_000_001);
    }

    #[test]
    fn rejects_malformed_ether() {
        for bad in ["", ".", "1.2.3", "-1", "1e18", "0.0000000000000000001", "ten"] {
            assert!(parse_ether(bad).is_err(), "{bad:?} should be rejected");
        }
    }

    #[test]
    fn token_amounts_beyond_i64() {
        assert_eq!(parse_token_amount("50000").unwrap(), 50_000);
        assert_eq!(
            parse_token_amount("1_000_000_000_000_000_000_000").unwrap(),
            1_000_000_000_000_000_000_000
        );
        for bad in ["", "_", "1.5", "-3", "0x10"] {
            assert!(parse_token_amount(bad).is_err(), "{bad:?} should be rejected");
        }
        assert!(parse_token_amount(&format!("{}0", u128::MAX)).is_err());
    }

    #[test]
    fn address_shape() {
        let a: Address = "0xf39Fd6e51aad88F6F4ce6aB8827279cffFb92266".parse().unwrap();
        assert_eq!(a.as_str(), "0xf39Fd6e51aad88F6F4ce6aB8827279cffFb92266");
        assert!("0x1234".parse::<Address>().is_err());
        assert!("f39Fd6e51aad88F6F4ce6aB8827279cffFb92266".parse::<Address>().is_err());
    }

    #[test]
    fn private_key_never_printed() {
        let key: PrivateKey = "0xac0974bec39a17e36ba4a6b4d238ff944bacb478cbed5efcae784d7bf4f2ff80"
            .parse()
            .unwrap();
        assert!(!format!("{key:?}").contains("ac0974"));
        assert!(!key.to_string().contains("ac0974"));
    }

    proptest! {
        #[test]
        fn whole_ether_scales_by_ten_to_the_eighteen(n in 0u64..1_000_000_000) {
            prop_assert_eq!(parse_ether(&n.to_string()).unwrap(), n as u128 * 10u128.pow(18));
        }

        #[test]
        fn fraction_digits_are_right_padded(whole in 0u32..1000, frac in "[0-9]{1,18}") {
            let wei = parse_ether(&format!("{whole}.{frac}")).unwrap();
            let padded: u128 = format!("{frac:0<18}").parse().unwrap();
            prop_assert_eq!(wei, whole as u128 * 10u128.pow(18) + padded);
        }
    }
}
