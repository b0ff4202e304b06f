use serde::{Deserialize, Serialize};

use crate::amount::Decimal;
use crate::token::Token;

/// One side of the swap form.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Side {
    From,
    To,
}

impl Side {
    pub fn opposite(self) -> Side {
        match self {
            Side::From => Side::To,
            Side::To => Side::From,
        }
    }
}

/// Lifecycle of a swap submission.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SwapStatus {
    #[default]
    Idle,
    Loading,
    Success,
    Error,
}

/// State of one swap form.
///
/// The amount on the `last_edited` side is what the user typed; the other
/// amount is derived and overwritten on every recomputation. An empty string
/// means "no amount entered".
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SwapState {
    pub from_token: Token,
    pub to_token: Token,
    pub from_amount: String,
    pub to_amount: String,

    /// Tolerance in percent (`0.5` = 0.5%).
    pub slippage: Decimal,

    pub last_edited: Side,
    pub status: SwapStatus,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub error_message: Option<String>,
}

impl SwapState {
    pub fn new(from_token: Token, to_token: Token, slippage: Decimal) -> Self {
        Self {
            from_token,
            to_token,
            from_amount: String::new(),
            to_amount: String::new(),
            slippage,
            last_edited: Side::From,
            status: SwapStatus::Idle,
            error_message: None,
        }
    }

    pub fn token(&self, side: Side) -> &Token {
        match side {
            Side::From => &self.from_token,
            Side::To => &self.to_token,
        }
    }

    pub fn token_mut(&mut self, side: Side) -> &mut Token {
        match side {
            Side::From => &mut self.from_token,
            Side::To => &mut self.to_token,
        }
    }

    pub fn amount(&self, side: Side) -> &str {
        match side {
            Side::From => &self.from_amount,
            Side::To => &self.to_amount,
        }
    }

    /// Overwrite one amount field without touching `last_edited`.
    pub fn set_amount(&mut self, side: Side, value: String) {
        match side {
            Side::From => self.from_amount = value,
            Side::To => self.to_amount = value,
        }
    }

    /// The amount the user typed.
    pub fn authoritative(&self) -> &str {
        self.amount(self.last_edited)
    }

    /// The amount computed from the other side.
    pub fn derived(&self) -> &str {
        self.amount(self.last_edited.opposite())
    }

    /// Exchange tokens and amounts. `last_edited` moves with the typed value
    /// so it stays authoritative on its new side.
    pub fn flip(&mut self) {
        std::mem::swap(&mut self.from_token, &mut self.to_token);
        std::mem::swap(&mut self.from_amount, &mut self.to_amount);
        self.last_edited = self.last_edited.opposite();
    }

    pub fn clear_amounts(&mut self) {
        self.from_amount.clear();
        self.to_amount.clear();
    }
}
