//! Deterministic cost breakdown for a validated quote request.
//!
//! All arithmetic is plain `f64` with no intermediate rounding; two-decimal
//! presentation belongs to whoever renders the figures.

use serde::Serialize;

use super::domain::{City, CleaningType, QuoteRequest};

/// Dollars per square foot.
pub const BASE_RATE: f64 = 0.10;
pub const LABOR_RATE: f64 = 0.05;
pub const SUPPLIES_RATE: f64 = 0.02;
/// Applied only to [`CleaningType::Specialized`].
pub const SPECIALIZED_RATE: f64 = 0.03;
/// Fraction of the square-footage costs.
pub const OVERHEAD_RATE: f64 = 0.15;

pub const QUEENS_TRAVEL_COST: f64 = 50.0;
pub const NASSAU_TRAVEL_COST: f64 = 30.0;

/// Itemized quote. `total_cost` is always the sum of the six components.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CostBreakdown {
    base_cost: f64,
    labor_cost: f64,
    supplies_cost: f64,
    specialized_cost: f64,
    overhead_cost: f64,
    travel_cost: f64,
    total_cost: f64,
}

impl CostBreakdown {
    pub fn base_cost(&self) -> f64 {
        self.base_cost
    }

    pub fn labor_cost(&self) -> f64 {
        self.labor_cost
    }

    pub fn supplies_cost(&self) -> f64 {
        self.supplies_cost
    }

    pub fn specialized_cost(&self) -> f64 {
        self.specialized_cost
    }

    pub fn overhead_cost(&self) -> f64 {
        self.overhead_cost
    }

    pub fn travel_cost(&self) -> f64 {
        self.travel_cost
    }

    pub fn total_cost(&self) -> f64 {
        self.total_cost
    }

    /// Display label and amount for each component, in presentation order.
    pub fn components(&self) -> [(&'static str, f64); 6] {
        [
            ("Base Cost", self.base_cost),
            ("Labor Cost", self.labor_cost),
            ("Supplies Cost", self.supplies_cost),
            ("Specialized Cost", self.specialized_cost),
            ("Overhead Cost", self.overhead_cost),
            ("Travel Cost", self.travel_cost),
        ]
    }
}

pub fn travel_cost(city: City) -> f64 {
    match city {
        City::Queens => QUEENS_TRAVEL_COST,
        City::Nassau => NASSAU_TRAVEL_COST,
    }
}

/// Price a request. Pure; identical input yields a bit-identical breakdown.
pub fn compute_breakdown(request: &QuoteRequest) -> CostBreakdown {
    let size = request.property_size();

    let base_cost = size * BASE_RATE;
    let labor_cost = size * LABOR_RATE;
    let supplies_cost = size * SUPPLIES_RATE;
    let specialized_cost = match request.cleaning_type() {
        CleaningType::Specialized => size * SPECIALIZED_RATE,
        CleaningType::Basic | CleaningType::Deep => 0.0,
    };
    let overhead_cost = (base_cost + labor_cost + supplies_cost + specialized_cost) * OVERHEAD_RATE;
    let travel_cost = travel_cost(request.city());

    let total_cost =
        base_cost + labor_cost + supplies_cost + specialized_cost + overhead_cost + travel_cost;

    CostBreakdown {
        base_cost,
        labor_cost,
        supplies_cost,
        specialized_cost,
        overhead_cost,
        travel_cost,
        total_cost,
    }
}
