pub mod amount;
pub mod error;
pub mod format;
pub mod order;
pub mod price;
pub mod quote;
pub mod session;
pub mod token;
pub mod types;
pub mod validation;

use error::Error;

// Re-exports for convenience
pub use amount::{sanitize_input, Decimal, Rounding};
pub use order::{build_order, OrderKind, SwapOrder, TransactionSubmitter, TxId};
pub use price::{Price, PriceFeed, PriceSource, PriceSubscription, PriceUpdate, StaticPriceSource};
pub use quote::{recompute, requote, QuoteOutcome};
pub use session::SwapSession;
pub use token::{Chain, Token, TokenLookupKey, TokenSource};
pub use types::config::SwapConfig;
pub use types::state::{Side, SwapState, SwapStatus};

/// Requote `state` against the pair price from `prices`.
///
/// A pair with no known price is treated like a zero price: the previous
/// derived amount is kept.
pub fn quote_pair(
    state: &SwapState,
    prices: &dyn PriceSource,
    config: &SwapConfig,
) -> (SwapState, QuoteOutcome) {
    let price = prices
        .price(&state.from_token.key(), &state.to_token.key())
        .unwrap_or_else(Price::zero);
    requote(state, &price, config.display_decimals)
}

/// Quote a single typed amount without a swap state.
///
/// Returns the other side's amount at the display precision, an empty string
/// for empty or unparseable input, or `None` when the price is zero.
pub fn quote_input(
    side: Side,
    input: &str,
    price: &Price,
    config: &SwapConfig,
) -> Option<String> {
    let amount = match Decimal::parse(input) {
        Ok(amount) => amount,
        Err(_) => return Some(String::new()),
    };
    quote::quote_amount(side, &amount, price, config.display_decimals)
        .map(|quoted| quoted.to_fixed(config.display_decimals))
}

/// Load a config document and build a session for a token pair.
pub fn open_session(from: Token, to: Token, config_json: &str) -> Result<SwapSession, Error> {
    let config = SwapConfig::from_json(config_json)?;
    Ok(SwapSession::new(from, to, config))
}
