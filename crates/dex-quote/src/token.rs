use std::collections::HashMap;
use std::fmt;

use serde::{Deserialize, Serialize};

use crate::amount::Decimal;

/// Chains the swap widget trades on.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Chain {
    /// Cadence contracts on Flow.
    Flow,
    /// Soroban contracts on Stellar.
    Stellar,
}

impl Chain {
    fn namespace(&self) -> &'static str {
        match self {
            Chain::Flow => "flow",
            Chain::Stellar => "stellar",
        }
    }
}

/// Token reference data plus the wallet balance and quote-currency price,
/// which are refreshed from external sources.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Token {
    pub symbol: String,
    pub name: String,

    #[serde(rename = "icon")]
    #[serde(default)]
    pub icon_ref: String,

    pub chain: Chain,

    /// Contract address (Flow `0x…` or Stellar contract id).
    pub address: String,

    #[serde(default)]
    pub balance: Decimal,

    /// Quote-currency (USD) price per unit.
    #[serde(default)]
    pub price: Decimal,

    pub decimals: u8,
}

impl Token {
    pub fn key(&self) -> TokenLookupKey {
        TokenLookupKey::new(self.chain, &self.address)
    }

    /// Whether both tokens refer to the same on-chain asset.
    pub fn same_asset(&self, other: &Token) -> bool {
        self.key() == other.key()
    }
}

/// Normalized token lookup key: `{chain}:{address}`.
///
/// Flow addresses are hex and compared case-insensitively; Stellar strkeys
/// are upper-case base32.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct TokenLookupKey(pub String);

impl TokenLookupKey {
    pub fn new(chain: Chain, address: &str) -> Self {
        let addr = match chain {
            Chain::Flow => address.trim().to_lowercase(),
            Chain::Stellar => address.trim().to_uppercase(),
        };
        Self(format!("{}:{addr}", chain.namespace()))
    }
}

impl fmt::Display for TokenLookupKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// Trait for token data providers (wallet session, balance indexers).
pub trait TokenSource {
    fn lookup(&self, key: &TokenLookupKey) -> Option<Token>;
}

/// A no-op token source that always returns None.
pub struct EmptyTokenSource;

impl TokenSource for EmptyTokenSource {
    fn lookup(&self, _key: &TokenLookupKey) -> Option<Token> {
        None
    }
}

/// In-memory token registry.
pub struct StaticTokenSource {
    tokens: HashMap<TokenLookupKey, Token>,
}

impl StaticTokenSource {
    pub fn new() -> Self {
        Self {
            tokens: HashMap::new(),
        }
    }

    pub fn insert(&mut self, token: Token) {
        self.tokens.insert(token.key(), token);
    }

    /// Update the balance of a registered token. Returns false if unknown.
    pub fn set_balance(&mut self, key: &TokenLookupKey, balance: Decimal) -> bool {
        match self.tokens.get_mut(key) {
            Some(token) => {
                token.balance = balance;
                true
            }
            None => false,
        }
    }

    /// Registered tokens, sorted by symbol.
    pub fn tokens(&self) -> Vec<&Token> {
        let mut all: Vec<&Token> = self.tokens.values().collect();
        all.sort_by(|a, b| a.symbol.cmp(&b.symbol));
        all
    }
}

impl Default for StaticTokenSource {
    fn default() -> Self {
        Self::new()
    }
}

impl TokenSource for StaticTokenSource {
    fn lookup(&self, key: &TokenLookupKey) -> Option<Token> {
        self.tokens.get(key).cloned()
    }
}


#[cfg(test)]
mod tests {
    use super::fixtures::*;
    use super::*;

    #[test]
    fn test_lookup_key_normalization() {
        assert_eq!(
            TokenLookupKey::new(Chain::Flow, "0x0AE53CB6E3F42A79"),
            TokenLookupKey::new(Chain::Flow, "0x0ae53cb6e3f42a79")
        );
        assert_eq!(
            TokenLookupKey::new(Chain::Flow, "0xabc").to_string(),
            "flow:0xabc"
        );
        assert_eq!(
            TokenLookupKey::new(Chain::Stellar, "cabc").to_string(),
            "stellar:CABC"
        );
        assert_ne!(
            TokenLookupKey::new(Chain::Flow, "0xabc"),
            TokenLookupKey::new(Chain::Stellar, "0xabc")
        );
    }

    #[test]
    fn test_static_source_lookup_and_balance() {
        let mut source = StaticTokenSource::new();
        source.insert(flow());
        source.insert(test_token());

        let key = TokenLookupKey::new(Chain::Flow, "0x0ae53cb6e3f42a79");
        assert_eq!(source.lookup(&key).map(|t| t.symbol), Some("TEST".to_string()));

        assert!(source.set_balance(&key, Decimal::parse("12.5").unwrap()));
        assert_eq!(
            source.lookup(&key).unwrap().balance,
            Decimal::parse("12.5").unwrap()
        );

        let missing = TokenLookupKey::new(Chain::Flow, "0xdead");
        assert!(!source.set_balance(&missing, Decimal::zero()));
        assert!(EmptyTokenSource.lookup(&key).is_none());

        let symbols: Vec<&str> = source.tokens().iter().map(|t| t.symbol.as_str()).collect();
        assert_eq!(symbols, vec!["FLOW", "TEST"]);
    }

    #[test]
    fn test_token_from_json() {
        let json = r#"{
            "symbol": "USDC",
            "name": "USD Coin",
            "icon": "usdc.svg",
            "chain": "stellar",
            "address": "CCW67TSZV3SSS2HXMBQ5JFGCKJNXKZM7UQUWUZPUTHXSTZLEO7SJMI75",
            "balance": "20",
            "decimals": 7
        }"#;
        let token: Token = serde_json::from_str(json).unwrap();
        assert_eq!(token.chain, Chain::Stellar);
        assert_eq!(token.balance, Decimal::from(20));
        assert!(token.price.is_zero());
        assert!(token.same_asset(&usdc()));
    }
}
