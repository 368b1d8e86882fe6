// =============================================================================
// External providers — market data and AI narrative
// =============================================================================
//
// Both collaborators sit behind traits so the pipeline can be driven with
// in-process fakes in tests. The concrete clients speak to the Yahoo Finance
// chart API and the Gemini generateContent API over reqwest.

pub mod market_data;
pub mod narrative;

pub use market_data::{SeriesProvider, YahooFinanceClient};
pub use narrative::{GeminiClient, NarrativeProvider};
