use serde::{Deserialize, Serialize};

use crate::amount::Decimal;
use crate::error::Error;

/// Swap widget configuration, loaded from JSON with camelCase keys. Missing
/// keys fall back to the defaults below.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct SwapConfig {
    /// Fractional digits of derived amounts.
    pub display_decimals: u32,

    /// Percent.
    pub default_slippage: Decimal,
    pub min_slippage: Decimal,
    pub max_slippage: Decimal,

    /// Slippage above this is accepted with a warning.
    pub high_slippage_warning: Decimal,

    /// Smallest amount accepted for submission.
    pub min_amount: Decimal,

    pub price_feed_url: String,
}

impl Default for SwapConfig {
    fn default() -> Self {
        Self {
            display_decimals: 6,
            default_slippage: Decimal::from_units(5u32.into(), 1),
            min_slippage: Decimal::from_units(1u32.into(), 2),
            max_slippage: Decimal::from(50),
            high_slippage_warning: Decimal::from(10),
            min_amount: Decimal::from_units(1u32.into(), 4),
            price_feed_url: "ws://localhost:8081".to_string(),
        }
    }
}

impl SwapConfig {
    /// Parse and validate a config document.
    pub fn from_json(json: &str) -> Result<Self, Error> {
        let config: SwapConfig =
            serde_json::from_str(json).map_err(|e| Error::Config(e.to_string()))?;
        config.validate()?;
        Ok(config)
    }

    pub fn to_json(&self) -> Result<String, serde_json::Error> {
        serde_json::to_string_pretty(self)
    }

    pub fn validate(&self) -> Result<(), Error> {
        if self.display_decimals > 18 {
            return Err(Error::Config(format!(
                "displayDecimals must be at most 18, got {}",
                self.display_decimals
            )));
        }
        if self.min_slippage > self.max_slippage {
            return Err(Error::Config(format!(
                "minSlippage {} exceeds maxSlippage {}",
                self.min_slippage, self.max_slippage
            )));
        }
        if self.max_slippage >= Decimal::from(100) {
            return Err(Error::Config(format!(
                "maxSlippage must be below 100, got {}",
                self.max_slippage
            )));
        }
        if self.default_slippage < self.min_slippage || self.default_slippage > self.max_slippage
        {
            return Err(Error::Config(format!(
                "defaultSlippage {} outside [{}, {}]",
                self.default_slippage, self.min_slippage, self.max_slippage
            )));
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let config = SwapConfig::default();
        assert_eq!(config.display_decimals, 6);
        assert_eq!(config.default_slippage.to_string(), "0.5");
        assert_eq!(config.min_slippage.to_string(), "0.01");
        assert_eq!(config.min_amount.to_string(), "0.0001");
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_partial_json_uses_defaults() {
        let config = SwapConfig::from_json(
            r#"{ "displayDecimals": 7, "defaultSlippage": 1, "priceFeedUrl": "ws://feed:9000" }"#,
        )
        .unwrap();
        assert_eq!(config.display_decimals, 7);
        assert_eq!(config.default_slippage, Decimal::from(1));
        assert_eq!(config.max_slippage, Decimal::from(50));
        assert_eq!(config.price_feed_url, "ws://feed:9000");
    }

    #[test]
    fn test_json_round_trip() {
        let config = SwapConfig::default();
        let json = config.to_json().unwrap();
        assert!(json.contains("\"minAmount\": \"0.0001\""));
        assert_eq!(SwapConfig::from_json(&json).unwrap(), config);
    }

    #[test]
    fn test_rejects_inconsistent_bounds() {
        assert!(matches!(
            SwapConfig::from_json(r#"{ "minSlippage": "5", "maxSlippage": "1" }"#),
            Err(Error::Config(_))
        ));
        assert!(matches!(
            SwapConfig::from_json(r#"{ "maxSlippage": 100 }"#),
            Err(Error::Config(_))
        ));
        assert!(matches!(
            SwapConfig::from_json(r#"{ "defaultSlippage": "60" }"#),
            Err(Error::Config(_))
        ));
        assert!(matches!(
            SwapConfig::from_json(r#"{ "displayDecimals": 40 }"#),
            Err(Error::Config(_))
        ));
        assert!(matches!(
            SwapConfig::from_json("not json"),
            Err(Error::Config(_))
        ));
    }
}
