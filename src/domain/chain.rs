//! Networks the sampler knows how to ask for

use std::fmt;

/// Chains exposed by the selector. Only Ethereum is active; Arbitrum
/// parses from the wire but cannot be chosen.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum Chain {
    #[default]
    Ethereum,
    Arbitrum,
}

impl Chain {
    pub const ALL: [Chain; 2] = [Chain::Ethereum, Chain::Arbitrum];

    pub fn display_name(&self) -> &'static str {
        match self {
            Chain::Ethereum => "Ethereum",
            Chain::Arbitrum => "Arbitrum",
        }
    }

    /// Value sent as the `chain` query parameter
    pub fn wire_value(&self) -> &'static str {
        match self {
            Chain::Ethereum => "eth",
            Chain::Arbitrum => "arbitrum",
        }
    }

    pub fn from_wire(value: &str) -> Option<Chain> {
        match value.trim().to_ascii_lowercase().as_str() {
            "eth" => Some(Chain::Ethereum),
            "arbitrum" => Some(Chain::Arbitrum),
            _ => None,
        }
    }

    pub fn is_selectable(&self) -> bool {
        matches!(self, Chain::Ethereum)
    }

    pub fn help_text() -> &'static str {
        "Currently, only Ethereum is supported."
    }
}

impl fmt::Display for Chain {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.display_name())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_wire_values_round_trip() {
        for chain in Chain::ALL {
            assert_eq!(Chain::from_wire(chain.wire_value()), Some(chain));
        }
        assert_eq!(Chain::from_wire(" ETH "), Some(Chain::Ethereum));
        assert_eq!(Chain::from_wire("polygon"), None);
        assert_eq!(Chain::from_wire("Ethereum"), None);
    }

    #[test]
    fn test_only_ethereum_is_selectable() {
        assert!(Chain::Ethereum.is_selectable());
        assert!(!Chain::Arbitrum.is_selectable());
        assert_eq!(Chain::default(), Chain::Ethereum);
    }
}
