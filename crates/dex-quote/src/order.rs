use std::fmt;
use std::future::Future;

use num_bigint::BigUint;
use serde::{Serialize, Serializer};

use crate::amount::{Decimal, Rounding};
use crate::error::{AmountError, Error, SubmitError, ValidationError};
use crate::token::Chain;
use crate::types::state::{Side, SwapState};

/// Which amount is fixed in the on-chain call.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "kind", rename_all = "camelCase", rename_all_fields = "camelCase")]
pub enum OrderKind {
    /// The user typed the input amount (`swap_exact_amount_in`).
    ExactIn {
        #[serde(serialize_with = "units_as_string")]
        amount_in: BigUint,
        #[serde(serialize_with = "units_as_string")]
        min_amount_out: BigUint,
    },
    /// The user typed the output amount (`swap_exact_amount_out`).
    ExactOut {
        #[serde(serialize_with = "units_as_string")]
        amount_out: BigUint,
        #[serde(serialize_with = "units_as_string")]
        max_amount_in: BigUint,
    },
}

/// Finalized swap handed to a transaction submitter. Amounts are chain
/// integer units at each token's `decimals`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SwapOrder {
    pub chain: Chain,
    pub token_in: String,
    pub token_out: String,
    #[serde(flatten)]
    pub kind: OrderKind,
}

fn units_as_string<S: Serializer>(units: &BigUint, serializer: S) -> Result<S::Ok, S::Error> {
    serializer.collect_str(units)
}

/// Identifier returned by the chain for a submitted transaction.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct TxId(pub String);

impl fmt::Display for TxId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// Executes a swap on chain (Flow transaction template, Soroban contract
/// call). Implementations own signing and encoding.
pub trait TransactionSubmitter {
    fn submit(&self, order: &SwapOrder) -> impl Future<Output = Result<TxId, SubmitError>>;
}

/// Build the order for the current state, applying the slippage tolerance
/// to the derived amount.
///
/// ExactIn rounds the minimum output down; ExactOut rounds the maximum
/// input up, so the bound never loosens past the tolerance.
pub fn build_order(state: &SwapState) -> Result<SwapOrder, Error> {
    let from = &state.from_token;
    let to = &state.to_token;

    if from.chain != to.chain {
        return Err(ValidationError::ChainMismatch {
            token_in: from.symbol.clone(),
            token_out: to.symbol.clone(),
        }
        .into());
    }
    if from.same_asset(to) {
        return Err(ValidationError::SameToken.into());
    }

    let authoritative = Decimal::parse(state.authoritative())?;
    let derived = Decimal::parse(state.derived()).map_err(|e| match e {
        AmountError::Empty => Error::Validation(ValidationError::QuoteUnavailable),
        other => Error::Amount(other),
    })?;

    let decimals_in = u32::from(from.decimals);
    let decimals_out = u32::from(to.decimals);

    let kind = match state.last_edited {
        Side::From => OrderKind::ExactIn {
            amount_in: authoritative.to_units(decimals_in, Rounding::Floor),
            min_amount_out: with_slippage(&derived, &state.slippage, Bound::Lower)
                .to_units(decimals_out, Rounding::Floor),
        },
        Side::To => OrderKind::ExactOut {
            amount_out: authoritative.to_units(decimals_out, Rounding::Floor),
            max_amount_in: with_slippage(&derived, &state.slippage, Bound::Upper)
                .to_units(decimals_in, Rounding::Ceil),
        },
    };

    Ok(SwapOrder {
        chain: from.chain,
        token_in: from.address.clone(),
        token_out: to.address.clone(),
        kind,
    })
}

enum Bound {
    Lower,
    Upper,
}

/// `amount * (1 ∓ slippage / 100)`, exact.
fn with_slippage(amount: &Decimal, slippage_percent: &Decimal, bound: Bound) -> Decimal {
    let hundred = Decimal::from(100);
    let factor = match bound {
        Bound::Lower => hundred.saturating_sub(slippage_percent),
        Bound::Upper => hundred.checked_add(slippage_percent),
    };
    amount.mul_exact(&factor).div_pow10(2)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::token::fixtures::{flow, test_token, usdc};

    fn state(side: Side, from: &str, to: &str, slippage: &str) -> SwapState {
        let mut state = SwapState::new(flow(), test_token(), Decimal::parse(slippage).unwrap());
        state.from_amount = from.to_string();
        state.to_amount = to.to_string();
        state.last_edited = side;
        state
    }

    #[test]
    fn test_exact_in_applies_min_out() {
        let order = build_order(&state(Side::From, "2", "3.000000", "0.5")).unwrap();
        assert_eq!(order.chain, Chain::Flow);
        assert_eq!(order.token_in, "0x7e60df042a9c0868");
        assert_eq!(order.token_out, "0x0AE53CB6E3F42A79");
        assert_eq!(
            order.kind,
            OrderKind::ExactIn {
                amount_in: BigUint::from(200_000_000u64),
                min_amount_out: BigUint::from(298_500_000u64),
            }
        );
    }

    #[test]
    fn test_exact_out_applies_max_in() {
        let order = build_order(&state(Side::To, "2.000000", "3", "1")).unwrap();
        assert_eq!(
            order.kind,
            OrderKind::ExactOut {
                amount_out: BigUint::from(300_000_000u64),
                max_amount_in: BigUint::from(202_000_000u64),
            }
        );
    }

    #[test]
    fn test_bounds_round_conservatively() {
        // 0.333333 * 0.995 = 0.331666335 -> floor at 8 decimals
        let order = build_order(&state(Side::From, "1", "0.333333", "0.5")).unwrap();
        let OrderKind::ExactIn { min_amount_out, .. } = order.kind else {
            panic!("expected ExactIn");
        };
        assert_eq!(min_amount_out, BigUint::from(33_166_633u64));

        // 0.333333 * 1.005 = 0.334999665 -> ceil at 8 decimals
        let order = build_order(&state(Side::To, "0.333333", "1", "0.5")).unwrap();
        let OrderKind::ExactOut { max_amount_in, .. } = order.kind else {
            panic!("expected ExactOut");
        };
        assert_eq!(max_amount_in, BigUint::from(33_499_967u64));
    }

    #[test]
    fn test_missing_quote() {
        let err = build_order(&state(Side::From, "2", "", "0.5")).unwrap_err();
        assert!(matches!(
            err,
            Error::Validation(ValidationError::QuoteUnavailable)
        ));

        let err = build_order(&state(Side::From, "x", "1", "0.5")).unwrap_err();
        assert!(matches!(err, Error::Amount(AmountError::Invalid(_))));
    }

    #[test]
    fn test_rejects_bad_pairs() {
        let mut s = state(Side::From, "1", "1", "0.5");
        s.to_token = usdc();
        assert!(matches!(
            build_order(&s).unwrap_err(),
            Error::Validation(ValidationError::ChainMismatch { .. })
        ));

        s.to_token = flow();
        assert!(matches!(
            build_order(&s).unwrap_err(),
            Error::Validation(ValidationError::SameToken)
        ));
    }

    #[test]
    fn test_order_json() {
        let order = build_order(&state(Side::From, "2", "3", "0.5")).unwrap();
        let json = serde_json::to_value(&order).unwrap();
        assert_eq!(json["kind"], "exactIn");
        assert_eq!(json["amountIn"], "200000000");
        assert_eq!(json["minAmountOut"], "298500000");
        assert_eq!(json["chain"], "flow");
        assert_eq!(json["tokenIn"], "0x7e60df042a9c0868");
    }
}
