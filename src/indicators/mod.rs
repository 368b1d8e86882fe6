// =============================================================================
// Technical Indicators Module
// =============================================================================
//
// Pure, side-effect-free indicator implementations. Every public function
// takes slices (closes or bars, oldest first) and returns `Option<T>` or a
// possibly-empty `Vec` so callers are forced to handle insufficient-history
// and numerical-edge-case scenarios. A missing value is a sentinel, never an
// error: downstream signal logic treats `None` as "does not vote".

pub mod atr;
pub mod bollinger;
pub mod directional;
pub mod ema;
pub mod macd;
pub mod money_flow;
pub mod moving_average;
pub mod obv;
pub mod rsi;
pub mod stochastic;
