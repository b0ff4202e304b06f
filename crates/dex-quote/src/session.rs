use log::{debug, info, warn};

use crate::amount::{sanitize_input, Decimal, Rounding};
use crate::error::{Error, ValidationError};
use crate::format::format_rate;
use crate::order::{build_order, OrderKind, SwapOrder, TransactionSubmitter, TxId};
use crate::price::{Price, PriceSource, PriceUpdate};
use crate::quote::{self, QuoteOutcome};
use crate::token::{Token, TokenSource};
use crate::types::config::SwapConfig;
use crate::types::state::{Side, SwapState, SwapStatus};
use crate::validation::{validate_slippage, validate_swap_amount, SlippageLevel};

/// One swap form: the state, its configuration, and the latest price for
/// the current (from, to) orientation.
///
/// Every input event (typed amount, token change, price update) ends in a
/// full recomputation from the current authoritative amount, so the order
/// in which events arrive never leaves a stale derived amount behind,
/// except under a zero or missing price, where the last quote is kept for
/// display but no order can be built from it.
#[derive(Debug, Clone)]
pub struct SwapSession {
    state: SwapState,
    config: SwapConfig,
    price: Option<Price>,
    /// Whether the derived amount was quoted from the current authoritative
    /// amount, pair and price.
    quoted: bool,
}

impl SwapSession {
    pub fn new(from_token: Token, to_token: Token, config: SwapConfig) -> Self {
        let state = SwapState::new(from_token, to_token, config.default_slippage.clone());
        Self {
            state,
            config,
            price: None,
            quoted: false,
        }
    }

    pub fn state(&self) -> &SwapState {
        &self.state
    }

    pub fn config(&self) -> &SwapConfig {
        &self.config
    }

    /// Whether the derived amount is a live quote that an order can be
    /// built from. False after a zero or missing price kept a stale value.
    pub fn is_quoted(&self) -> bool {
        self.quoted
    }

    /// Output-per-input price of the current pair, if one has arrived.
    pub fn price(&self) -> Option<&Price> {
        self.price.as_ref()
    }

    /// Handle text typed into one amount field.
    pub fn set_amount(&mut self, side: Side, input: &str) -> QuoteOutcome {
        let decimals = u32::from(self.state.token(side).decimals);
        self.edit(side, sanitize_input(input, decimals))
    }

    /// Fill `side` with the full wallet balance. `None` when the balance is
    /// zero.
    pub fn set_max(&mut self, side: Side) -> Option<QuoteOutcome> {
        let balance = &self.state.token(side).balance;
        if balance.is_zero() {
            return None;
        }
        // Round down so the filled amount never exceeds the balance.
        let digits = self.config.display_decimals;
        let value = balance.rescale(digits, Rounding::Floor).to_fixed(digits);
        Some(self.edit(side, value))
    }

    /// Step `side` up by one whole unit. The `from` side is capped at the
    /// balance; `None` when it is already there.
    pub fn increase(&mut self, side: Side) -> Option<QuoteOutcome> {
        let current = Decimal::parse(self.state.amount(side)).unwrap_or_default();
        let balance = self.state.token(side).balance.clone();
        let capped = side == Side::From && !balance.is_zero();

        if capped && current >= balance {
            return None;
        }

        let mut next = current.checked_add(&Decimal::from(1));
        if capped && next > balance {
            next = balance;
        }
        Some(self.edit(side, next.to_string()))
    }

    /// Step `side` down by one whole unit; at or below one the field is
    /// cleared.
    pub fn decrease(&mut self, side: Side) -> QuoteOutcome {
        let one = Decimal::from(1);
        let next = match Decimal::parse(self.state.amount(side)) {
            Ok(current) if current > one => current.saturating_sub(&one).to_string(),
            _ => String::new(),
        };
        self.edit(side, next)
    }

    fn edit(&mut self, side: Side, value: String) -> QuoteOutcome {
        self.state.set_amount(side, value);
        self.state.last_edited = side;
        self.recompute()
    }

    /// Replace the token on `side`. Picking the token already on the other
    /// side flips the pair instead. The pair price is looked up again.
    pub fn select_token(
        &mut self,
        side: Side,
        token: Token,
        prices: &dyn PriceSource,
    ) -> QuoteOutcome {
        if token.same_asset(self.state.token(side.opposite())) {
            self.flip();
        } else {
            *self.state.token_mut(side) = token;
        }
        self.refresh_price(prices)
    }

    /// Exchange tokens and amounts. The price is inverted with them; the
    /// amounts are already consistent so no recomputation runs.
    pub fn flip(&mut self) {
        self.state.flip();
        self.price = self
            .price
            .take()
            .map(|price| price.inverse().unwrap_or_else(Price::zero));
    }

    /// Store a new price for the current pair and recompute.
    pub fn apply_price(&mut self, price: Price) -> QuoteOutcome {
        debug!(
            "price for {}/{}: {price}",
            self.state.from_token.symbol, self.state.to_token.symbol
        );
        self.price = Some(price);
        self.recompute()
    }

    pub fn apply_update(&mut self, update: &PriceUpdate) -> QuoteOutcome {
        self.apply_price(update.price.clone())
    }

    /// Look up the current pair in `prices` and recompute. A missing price
    /// keeps the last quote.
    pub fn refresh_price(&mut self, prices: &dyn PriceSource) -> QuoteOutcome {
        let from = self.state.from_token.key();
        let to = self.state.to_token.key();
        self.price = prices.price(&from, &to);
        if self.price.is_none() {
            warn!("no price for {from} -> {to}");
        }
        self.recompute()
    }

    fn recompute(&mut self) -> QuoteOutcome {
        // A missing price behaves like a zero price: empty or invalid input
        // still clears, anything else keeps the stale quote.
        let price = self.price.clone().unwrap_or_else(Price::zero);
        let outcome = quote::recompute(&mut self.state, &price, self.config.display_decimals);
        self.quoted = outcome == QuoteOutcome::Quoted;
        outcome
    }

    /// Pull balances and USD prices for both tokens from the wallet session.
    pub fn refresh_balances(&mut self, tokens: &dyn TokenSource) {
        for side in [Side::From, Side::To] {
            let token = self.state.token_mut(side);
            if let Some(fresh) = tokens.lookup(&token.key()) {
                token.balance = fresh.balance;
                token.price = fresh.price;
            }
        }
    }

    pub fn set_balance(&mut self, side: Side, balance: Decimal) {
        self.state.token_mut(side).balance = balance;
    }

    /// Set slippage, clamped into the configured bounds.
    pub fn set_slippage(&mut self, percent: Decimal) -> &Decimal {
        let clamped = percent
            .max(self.config.min_slippage.clone())
            .min(self.config.max_slippage.clone());
        self.state.slippage = clamped;
        &self.state.slippage
    }

    /// Validate and apply slippage typed by the user.
    pub fn set_slippage_input(&mut self, input: &str) -> Result<SlippageLevel, ValidationError> {
        let (value, level) = validate_slippage(input, &self.config)?;
        self.set_slippage(value);
        Ok(level)
    }

    /// `1 FROM = x TO` for the current price.
    pub fn rate_label(&self) -> Option<String> {
        let price = self.price.as_ref().filter(|p| !p.is_zero())?;
        Some(format_rate(
            &self.state.from_token.symbol,
            &self.state.to_token.symbol,
            price,
            self.config.display_decimals,
        ))
    }

    /// `1 TO = x FROM`, from the inverse of the current price.
    pub fn inverse_rate_label(&self) -> Option<String> {
        let inverse = self.price.as_ref().and_then(Price::inverse)?;
        Some(format_rate(
            &self.state.to_token.symbol,
            &self.state.from_token.symbol,
            &inverse,
            self.config.display_decimals,
        ))
    }

    /// Run the pre-submission checks and build the order.
    ///
    /// Fails with `QuoteUnavailable` when the derived amount is stale. In
    /// ExactOut mode the balance must also cover the slippage-adjusted
    /// maximum input.
    pub fn prepare_order(&self) -> Result<SwapOrder, Error> {
        let from = &self.state.from_token;
        validate_swap_amount(
            &self.state.from_amount,
            &from.balance,
            &from.symbol,
            &self.config.min_amount,
        )?;
        if !self.quoted {
            return Err(ValidationError::QuoteUnavailable.into());
        }

        let order = build_order(&self.state)?;
        if let OrderKind::ExactOut { max_amount_in, .. } = &order.kind {
            let max_spend = Decimal::from_units(max_amount_in.clone(), u32::from(from.decimals));
            if max_spend > from.balance {
                return Err(ValidationError::InsufficientBalance {
                    symbol: from.symbol.clone(),
                }
                .into());
            }
        }
        Ok(order)
    }

    /// Validate, hand the order to `submitter`, and track the outcome in the
    /// state. On success both amounts are cleared.
    pub async fn submit<S: TransactionSubmitter>(&mut self, submitter: &S) -> Result<TxId, Error> {
        let order = match self.prepare_order() {
            Ok(order) => order,
            Err(e) => {
                let message = match &e {
                    Error::Validation(v) => v.to_string(),
                    other => other.to_string(),
                };
                self.fail(message);
                return Err(e);
            }
        };

        self.state.status = SwapStatus::Loading;
        self.state.error_message = None;

        match submitter.submit(&order).await {
            Ok(tx_id) => {
                info!(
                    "swap {} -> {} submitted: {tx_id}",
                    self.state.from_token.symbol, self.state.to_token.symbol
                );
                self.state.status = SwapStatus::Success;
                self.state.clear_amounts();
                self.quoted = false;
                Ok(tx_id)
            }
            Err(e) => {
                warn!("swap submission failed: {e}");
                self.fail(e.to_string());
                Err(e.into())
            }
        }
    }

    fn fail(&mut self, message: String) {
        self.state.status = SwapStatus::Error;
        self.state.error_message = Some(message);
    }

    /// Return to `Idle` after a success or error has been shown.
    pub fn reset_status(&mut self) {
        self.state.status = SwapStatus::Idle;
        self.state.error_message = None;
    }
}
