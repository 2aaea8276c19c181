//! Built-in signal policies.
//!
//! - [`RsiSmaCrossover`]: RSI oversold/overbought gated by SMA trend
//! - [`MomentumOnly`]: sign of the one-bar price change
//! - [`EmaMomentumConfirmed`]: EMA crossover confirmed by momentum sign

mod ema_momentum;
mod momentum;
mod rsi_sma;

pub use ema_momentum::EmaMomentumConfirmed;
pub use momentum::MomentumOnly;
pub use rsi_sma::RsiSmaCrossover;
