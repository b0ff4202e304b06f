use std::collections::HashMap;
use std::fmt;

use log::{debug, warn};
use num_bigint::BigUint;
use serde::{Deserialize, Serialize};
use time::OffsetDateTime;
use tokio::sync::watch;

use crate::amount::{div_round, is_zero, pow10, Decimal, Rounding};
use crate::error::AmountError;
use crate::token::TokenLookupKey;

/// Digits kept when a price is rendered as a decimal.
pub const PRICE_DISPLAY_DECIMALS: u32 = 7;

/// Exchange rate in output units per input unit, held as an exact fraction.
///
/// Keeping numerator and denominator separate makes the inverse exact, so
/// quoting one way and then the other only loses the display rounding.
#[derive(Debug, Clone)]
pub struct Price {
    num: BigUint,
    den: BigUint,
}

impl Price {
    /// `None` when the denominator is zero.
    pub fn new(num: BigUint, den: BigUint) -> Option<Self> {
        if is_zero(&den) {
            return None;
        }
        Some(Self { num, den })
    }

    pub fn zero() -> Self {
        Self {
            num: BigUint::default(),
            den: BigUint::from(1u32),
        }
    }

    pub fn from_decimal(value: &Decimal) -> Self {
        Self {
            num: value.units().clone(),
            den: pow10(value.scale()),
        }
    }

    pub fn parse(input: &str) -> Result<Self, AmountError> {
        Decimal::parse(input).map(|d| Self::from_decimal(&d))
    }

    /// Price reported by a contract as integer units at a fixed scale
    /// (Soroban pools report spot prices scaled by `10^7`).
    pub fn from_units(units: BigUint, decimals: u32) -> Self {
        Self {
            num: units,
            den: pow10(decimals),
        }
    }

    /// Price pushed by the live feed as a JSON number.
    pub fn from_f64(value: f64) -> Result<Self, AmountError> {
        Decimal::from_f64(value).map(|d| Self::from_decimal(&d))
    }

    pub fn is_zero(&self) -> bool {
        is_zero(&self.num)
    }

    /// `1 / price`; `None` for a zero price.
    pub fn inverse(&self) -> Option<Self> {
        if self.is_zero() {
            return None;
        }
        Some(Self {
            num: self.den.clone(),
            den: self.num.clone(),
        })
    }

    /// `amount * price`, rounded to `scale` fractional digits.
    pub fn convert(&self, amount: &Decimal, scale: u32, rounding: Rounding) -> Decimal {
        let numerator = amount.units() * &self.num * pow10(scale);
        let denominator = &self.den * pow10(amount.scale());
        Decimal::from_units(div_round(&numerator, &denominator, rounding), scale)
    }

    /// `amount / price`; `None` for a zero price.
    pub fn convert_back(&self, amount: &Decimal, scale: u32, rounding: Rounding) -> Option<Decimal> {
        self.inverse()
            .map(|inverse| inverse.convert(amount, scale, rounding))
    }

    pub fn to_decimal(&self, scale: u32) -> Decimal {
        self.convert(&Decimal::from(1), scale, Rounding::HalfUp)
    }
}

impl PartialEq for Price {
    fn eq(&self, other: &Self) -> bool {
        &self.num * &other.den == &other.num * &self.den
    }
}

impl Eq for Price {}

impl fmt::Display for Price {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.to_decimal(PRICE_DISPLAY_DECIMALS))
    }
}

/// Trait for on-demand price lookups (pool contracts, static tables).
pub trait PriceSource {
    /// Output-per-input price for swapping `from` into `to`.
    fn price(&self, from: &TokenLookupKey, to: &TokenLookupKey) -> Option<Price>;
}

/// In-memory price table. Each pair is stored in one direction; the reverse
/// direction is answered with the inverse.
pub struct StaticPriceSource {
    prices: HashMap<(TokenLookupKey, TokenLookupKey), Price>,
}

impl StaticPriceSource {
    pub fn new() -> Self {
        Self {
            prices: HashMap::new(),
        }
    }

    pub fn insert(&mut self, from: TokenLookupKey, to: TokenLookupKey, price: Price) {
        self.prices.remove(&(to.clone(), from.clone()));
        self.prices.insert((from, to), price);
    }
}

impl Default for StaticPriceSource {
    fn default() -> Self {
        Self::new()
    }
}

impl PriceSource for StaticPriceSource {
    fn price(&self, from: &TokenLookupKey, to: &TokenLookupKey) -> Option<Price> {
        if let Some(price) = self.prices.get(&(from.clone(), to.clone())) {
            return Some(price.clone());
        }
        let reverse = self.prices.get(&(to.clone(), from.clone()))?;
        // A zero reverse price has no inverse; report it as zero so the
        // calculator keeps the stale quote.
        Some(reverse.inverse().unwrap_or_else(Price::zero))
    }
}

/// Wire format of the live price feed:
/// `{"type":"price","price":1.5,"timestamp":1700000000000}`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PriceMessage {
    #[serde(rename = "type")]
    pub kind: String,

    /// Absent on control frames such as `{"type":"subscribed"}`.
    #[serde(default)]
    #[serde(skip_serializing_if = "Option::is_none")]
    pub price: Option<f64>,

    /// Milliseconds since the Unix epoch.
    #[serde(default)]
    #[serde(skip_serializing_if = "Option::is_none")]
    pub timestamp: Option<i64>,
}

/// A price accepted from the feed.
#[derive(Debug, Clone, PartialEq)]
pub struct PriceUpdate {
    pub price: Price,
    pub received_at: Option<OffsetDateTime>,
}

impl PriceUpdate {
    pub fn new(price: Price) -> Self {
        Self {
            price,
            received_at: None,
        }
    }

    /// Parse one feed message. Messages of another `type`, malformed JSON,
    /// and negative or non-finite prices yield `None`.
    pub fn from_message(json: &str) -> Option<Self> {
        let msg: PriceMessage = match serde_json::from_str(json) {
            Ok(msg) => msg,
            Err(e) => {
                warn!("ignoring malformed price message: {e}");
                return None;
            }
        };
        if msg.kind != "price" {
            debug!("ignoring feed message of type {:?}", msg.kind);
            return None;
        }
        let Some(value) = msg.price else {
            warn!("ignoring price message without a price");
            return None;
        };
        let price = match Price::from_f64(value) {
            Ok(price) => price,
            Err(e) => {
                warn!("ignoring price message: {e}");
                return None;
            }
        };
        let received_at = msg.timestamp.and_then(|ms| {
            OffsetDateTime::from_unix_timestamp_nanos(i128::from(ms) * 1_000_000).ok()
        });
        Some(Self { price, received_at })
    }

    /// `HH:MM:SS UTC` for the "last updated" label.
    pub fn received_label(&self) -> Option<String> {
        let format = time::macros::format_description!("[hour]:[minute]:[second] UTC");
        self.received_at.and_then(|at| at.format(&format).ok())
    }
}

/// Latest-value cell for a pushed price feed.
///
/// Only the newest price is retained; a slow reader skips intermediate
/// updates rather than queueing them.
pub struct PriceFeed {
    tx: watch::Sender<Option<PriceUpdate>>,
}

impl PriceFeed {
    pub fn new() -> Self {
        let (tx, _rx) = watch::channel(None);
        Self { tx }
    }

    pub fn publish(&self, update: PriceUpdate) {
        debug!("price feed update: {}", update.price);
        self.tx.send_replace(Some(update));
    }

    /// Feed one raw message; returns whether it carried a price.
    pub fn ingest(&self, json: &str) -> bool {
        match PriceUpdate::from_message(json) {
            Some(update) => {
                self.publish(update);
                true
            }
            None => false,
        }
    }

    pub fn latest(&self) -> Option<PriceUpdate> {
        self.tx.borrow().clone()
    }

    pub fn subscribe(&self) -> PriceSubscription {
        PriceSubscription {
            rx: self.tx.subscribe(),
        }
    }
}

impl Default for PriceFeed {
    fn default() -> Self {
        Self::new()
    }
}

/// Receiving half of a [`PriceFeed`].
pub struct PriceSubscription {
    rx: watch::Receiver<Option<PriceUpdate>>,
}

impl PriceSubscription {
    pub fn latest(&self) -> Option<PriceUpdate> {
        self.rx.borrow().clone()
    }

    /// Wait for the next published price. Returns `None` once the feed is
    /// dropped.
    pub async fn changed(&mut self) -> Option<PriceUpdate> {
        loop {
            self.rx.changed().await.ok()?;
            if let Some(update) = self.rx.borrow_and_update().clone() {
                return Some(update);
            }
        }
    }
}
