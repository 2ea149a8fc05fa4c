//! Per-token prices from the catalog's two pricing sources.
//!
//! Each side (input, output) is resolved independently: the confirmed price
//! is used when present, otherwise the advertised one. The sources are never
//! blended.

use modelnamer_provider::CatalogModel;

/// Tokens per pricing unit in the output config.
pub const TOKENS_PER_UNIT: f64 = 1_000_000.0;

/// Share of the input price charged for cached input.
pub const CACHED_INPUT_RATE: f64 = 0.5;

/// Share of the output price charged for cached output.
pub const CACHED_OUTPUT_RATE: f64 = 0.25;

/// A catalog pricing source.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PriceSource {
    Confirmed,
    Advertised,
}

impl PriceSource {
    /// Sources in order of precedence.
    pub const ORDER: [PriceSource; 2] = [PriceSource::Confirmed, PriceSource::Advertised];

    /// Raw input price string carried by this source, if non-empty.
    fn input<'a>(self, model: &'a CatalogModel) -> Option<&'a str> {
        let raw = match self {
            PriceSource::Confirmed => &model.pricing.confirmed.input_cost,
            PriceSource::Advertised => &model.pricing.advertised.input_cost_per_token,
        };
        non_empty(raw)
    }

    /// Raw output price string carried by this source, if non-empty.
    fn output<'a>(self, model: &'a CatalogModel) -> Option<&'a str> {
        let raw = match self {
            PriceSource::Confirmed => &model.pricing.confirmed.output_cost,
            PriceSource::Advertised => &model.pricing.advertised.output_cost_per_token,
        };
        non_empty(raw)
    }
}

fn non_empty(s: &str) -> Option<&str> {
    (!s.is_empty()).then_some(s)
}

/// Parse a decimal price string. Unparsable values count as free.
fn parse_price(raw: &str) -> f64 {
    raw.parse().unwrap_or(0.0)
}

/// Per-token cost in both directions.
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct TokenPrices {
    pub input: f64,
    pub output: f64,
}

impl TokenPrices {
    /// Resolve prices for `model`, consulting [`PriceSource::ORDER`] per side.
    pub fn for_model(model: &CatalogModel) -> Self {
        let input = PriceSource::ORDER
            .iter()
            .find_map(|source| source.input(model))
            .map(parse_price)
            .unwrap_or(0.0);
        let output = PriceSource::ORDER
            .iter()
            .find_map(|source| source.output(model))
            .map(parse_price)
            .unwrap_or(0.0);
        Self { input, output }
    }

    pub fn per_million_in(&self) -> f64 {
        self.input * TOKENS_PER_UNIT
    }

    pub fn per_million_out(&self) -> f64 {
        self.output * TOKENS_PER_UNIT
    }

    pub fn per_million_in_cached(&self) -> f64 {
        self.per_million_in() * CACHED_INPUT_RATE
    }

    pub fn per_million_out_cached(&self) -> f64 {
        self.per_million_out() * CACHED_OUTPUT_RATE
    }
}
