use log::{debug, warn};

use crate::amount::{Decimal, Rounding};
use crate::price::Price;
use crate::types::state::{Side, SwapState};

/// What a recomputation did to the derived amount.
///
/// None of these are errors: the calculator never fails on normal input
/// variation.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum QuoteOutcome {
    /// Derived amount recomputed from the authoritative amount.
    Quoted,
    /// Authoritative amount is empty; derived amount cleared.
    Cleared,
    /// Authoritative amount is not a number; derived amount cleared.
    InvalidInput,
    /// Price is zero; derived amount left as it was.
    SkippedZeroPrice,
}

/// Quote the amount on the opposite side of `side`.
///
/// `price` is output-per-input for the (from, to) pair. Editing `from`
/// multiplies by the price; editing `to` divides by it. `None` for a zero
/// price.
pub fn quote_amount(side: Side, amount: &Decimal, price: &Price, decimals: u32) -> Option<Decimal> {
    if price.is_zero() {
        return None;
    }
    match side {
        Side::From => Some(price.convert(amount, decimals, Rounding::HalfUp)),
        Side::To => price.convert_back(amount, decimals, Rounding::HalfUp),
    }
}

/// Recompute the derived amount of `state` in place.
///
/// The authoritative amount is never modified. Running this twice with the
/// same inputs leaves the state unchanged the second time.
pub fn recompute(state: &mut SwapState, price: &Price, display_decimals: u32) -> QuoteOutcome {
    let side = state.last_edited;
    let derived_side = side.opposite();

    if state.authoritative().trim().is_empty() {
        state.set_amount(derived_side, String::new());
        debug!("quote cleared: no {side:?} amount");
        return QuoteOutcome::Cleared;
    }

    let amount = match Decimal::parse(state.authoritative()) {
        Ok(amount) => amount,
        Err(e) => {
            state.set_amount(derived_side, String::new());
            debug!("quote cleared: {e}");
            return QuoteOutcome::InvalidInput;
        }
    };

    let Some(quoted) = quote_amount(side, &amount, price, display_decimals) else {
        warn!(
            "zero price for {}/{}, keeping stale quote {:?}",
            state.from_token.symbol,
            state.to_token.symbol,
            state.derived()
        );
        return QuoteOutcome::SkippedZeroPrice;
    };

    let rendered = quoted.to_fixed(display_decimals);
    debug!(
        "quoted {side:?} {} {} -> {derived_side:?} {rendered} {} at {price}",
        amount,
        state.token(side).symbol,
        state.token(derived_side).symbol,
    );
    state.set_amount(derived_side, rendered);
    QuoteOutcome::Quoted
}

/// Non-mutating form of [`recompute`].
pub fn requote(state: &SwapState, price: &Price, display_decimals: u32) -> (SwapState, QuoteOutcome) {
    let mut next = state.clone();
    let outcome = recompute(&mut next, price, display_decimals);
    (next, outcome)
}
