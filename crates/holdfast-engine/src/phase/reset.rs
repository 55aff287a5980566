//! Per-round budgets.

use holdfast_rules::budgets::{influence_budget, labor_budget};
use holdfast_rules::section_events::apply_delta;
use holdfast_rules::{Catalog, EventModifiers};
use holdfast_types::{Holdings, RulesConfig};

/// Labor and influence available for one round.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct Budgets {
    /// Labor to invest.
    pub labor: u32,
    /// Influence to spend.
    pub influence: u32,
}

/// Budgets for the coming round, with active event deltas applied.
pub fn budgets(
    holdings: &Holdings,
    rules: &RulesConfig,
    mods: &EventModifiers,
    catalog: &Catalog,
) -> Budgets {
    Budgets {
        labor: apply_delta(labor_budget(holdings, rules, catalog), mods.labor_delta),
        influence: apply_delta(influence_budget(holdings, rules, catalog), mods.influence_delta),
    }
}
