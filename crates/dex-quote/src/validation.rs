use crate::amount::Decimal;
use crate::error::ValidationError;
use crate::token::Chain;
use crate::types::config::SwapConfig;

/// How risky an accepted slippage setting is.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SlippageLevel {
    Normal,
    /// Accepted, but the user may lose significant value.
    High,
}

/// Check an amount before it is submitted. Returns the parsed amount.
pub fn validate_swap_amount(
    amount: &str,
    balance: &Decimal,
    symbol: &str,
    min_amount: &Decimal,
) -> Result<Decimal, ValidationError> {
    if amount.trim().is_empty() {
        return Err(ValidationError::AmountRequired);
    }

    let value = Decimal::parse(amount).map_err(|_| ValidationError::NotPositive)?;
    if value.is_zero() {
        return Err(ValidationError::NotPositive);
    }

    if value < *min_amount {
        return Err(ValidationError::BelowMinimum {
            minimum: min_amount.to_string(),
            symbol: symbol.to_string(),
        });
    }

    if value > *balance {
        return Err(ValidationError::InsufficientBalance {
            symbol: symbol.to_string(),
        });
    }

    Ok(value)
}

/// Check a slippage percentage typed by the user.
pub fn validate_slippage(
    input: &str,
    config: &SwapConfig,
) -> Result<(Decimal, SlippageLevel), ValidationError> {
    let input = input.trim();
    if input.starts_with('-') {
        return Err(ValidationError::NegativeSlippage);
    }

    let value =
        Decimal::parse(input).map_err(|_| ValidationError::InvalidSlippage(input.to_string()))?;

    if value > config.max_slippage {
        return Err(ValidationError::SlippageTooHigh {
            max: config.max_slippage.to_string(),
        });
    }

    let level = if value > config.high_slippage_warning {
        SlippageLevel::High
    } else {
        SlippageLevel::Normal
    };
    Ok((value, level))
}

/// Shape check for a wallet or contract address on `chain`.
///
/// Flow: `0x` followed by 16 hex digits. Stellar: 56-character strkey
/// starting with `G` (account) or `C` (contract). Strkey checksums are not
/// verified.
pub fn is_valid_address(chain: Chain, address: &str) -> bool {
    match chain {
        Chain::Flow => address
            .strip_prefix("0x")
            .filter(|hex_part| hex_part.len() == 16)
            .is_some_and(|hex_part| hex::decode(hex_part).is_ok()),
        Chain::Stellar => {
            address.len() == 56
                && (address.starts_with('G') || address.starts_with('C'))
                && address
                    .bytes()
                    .all(|b| b.is_ascii_uppercase() || (b'2'..=b'7').contains(&b))
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn d(s: &str) -> Decimal {
        Decimal::parse(s).unwrap()
    }

    #[test]
    fn test_amount_checks() {
        let balance = d("10");
        let min = d("0.0001");

        assert_eq!(
            validate_swap_amount("", &balance, "FLOW", &min),
            Err(ValidationError::AmountRequired)
        );
        assert_eq!(
            validate_swap_amount("0", &balance, "FLOW", &min),
            Err(ValidationError::NotPositive)
        );
        assert_eq!(
            validate_swap_amount("abc", &balance, "FLOW", &min),
            Err(ValidationError::NotPositive)
        );
        assert_eq!(
            validate_swap_amount("0.00001", &balance, "FLOW", &min),
            Err(ValidationError::BelowMinimum {
                minimum: "0.0001".to_string(),
                symbol: "FLOW".to_string()
            })
        );
        assert_eq!(
            validate_swap_amount("10.000001", &balance, "FLOW", &min),
            Err(ValidationError::InsufficientBalance {
                symbol: "FLOW".to_string()
            })
        );
        assert_eq!(validate_swap_amount("10", &balance, "FLOW", &min), Ok(d("10")));
        assert_eq!(validate_swap_amount("0.0001", &balance, "FLOW", &min), Ok(d("0.0001")));
    }

    #[test]
    fn test_below_minimum_message() {
        let err = validate_swap_amount("0.00001", &d("1"), "TEST", &d("0.0001")).unwrap_err();
        assert_eq!(err.to_string(), "Minimum amount is 0.0001 TEST");
    }

    #[test]
    fn test_slippage_checks() {
        let config = SwapConfig::default();
        assert_eq!(
            validate_slippage("-1", &config),
            Err(ValidationError::NegativeSlippage)
        );
        assert_eq!(
            validate_slippage("51", &config),
            Err(ValidationError::SlippageTooHigh {
                max: "50".to_string()
            })
        );
        assert!(matches!(
            validate_slippage("x", &config),
            Err(ValidationError::InvalidSlippage(_))
        ));
        assert_eq!(
            validate_slippage("0.5", &config),
            Ok((d("0.5"), SlippageLevel::Normal))
        );
        assert_eq!(
            validate_slippage("10", &config),
            Ok((d("10"), SlippageLevel::Normal))
        );
        assert_eq!(
            validate_slippage("12", &config),
            Ok((d("12"), SlippageLevel::High))
        );
    }

    #[test]
    fn test_flow_addresses() {
        assert!(is_valid_address(Chain::Flow, "0x7e60df042a9c0868"));
        assert!(is_valid_address(Chain::Flow, "0x0AE53CB6E3F42A79"));
        assert!(!is_valid_address(Chain::Flow, "7e60df042a9c0868"));
        assert!(!is_valid_address(Chain::Flow, "0x7e60df042a9c08"));
        assert!(!is_valid_address(Chain::Flow, "0x7e60df042a9c086g"));
    }

    #[test]
    fn test_stellar_addresses() {
        assert!(is_valid_address(
            Chain::Stellar,
            "CCW67TSZV3SSS2HXMBQ5JFGCKJNXKZM7UQUWUZPUTHXSTZLEO7SJMI75"
        ));
        assert!(is_valid_address(
            Chain::Stellar,
            "GA5ZSEJYB37JRC5AVCIA5MOP4RHTM335X2KGX3IHOJAPP5RE34K4KZVN"
        ));
        assert!(!is_valid_address(
            Chain::Stellar,
            "XA5ZSEJYB37JRC5AVCIA5MOP4RHTM335X2KGX3IHOJAPP5RE34K4KZVN"
        ));
        assert!(!is_valid_address(Chain::Stellar, "GA5ZSEJYB37JRC5AVCIA"));
        assert!(!is_valid_address(
            Chain::Stellar,
            "ga5zsejyb37jrc5avcia5mop4rhtm335x2kgx3ihojapp5re34k4kzvn"
        ));
        assert!(!is_valid_address(
            Chain::Stellar,
            "GA5ZSEJYB37JRC5AVCIA5MOP4RHTM335X2KGX3IHOJAPP5RE34K4KZV1"
        ));
    }
}
