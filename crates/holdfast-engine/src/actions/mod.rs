//! Player action decisions.
//!
//! Every handler follows the same pipeline: the acting player is resolved
//! and the phase checked when the [`Acting`] context is built, then the
//! handler validates input, then resources, then claims an action slot, and
//! only then rolls dice. Nothing that can fail happens after the first
//! draw, so a rejected command never advances the RNG.
//!
//! # Submodules
//!
//! - [`checks`] -- Gather, gain influence and lend: the d20-checked actions.
//! - [`trade`] -- Market sales and purchases.
//! - [`acquisitions`] -- New holdings, tenants, troops, specialists, upgrades.
//! - [`building`] -- Facilities and holding mode switches.

pub mod acquisitions;
pub mod building;
pub mod checks;
pub mod trade;

#[cfg(test)]
mod fixture;

use std::collections::BTreeMap;

use holdfast_rules::EventModifiers;
use holdfast_types::{
    ActionUsage, CampaignState, CampaignId, Event, EventPayload, MarketId, MarketInstance,
    MaterialId, Phase, PlayerState, SuccessTier,
};

use crate::context::Actor;
use crate::error::RuleViolation;

/// A player acting during the actions phase.
#[derive(Debug, Clone)]
pub struct Acting<'s> {
    /// The campaign acted in.
    pub campaign: &'s CampaignState,
    /// The acting player.
    pub player: &'s PlayerState,
    /// Combined modifiers of the events active this round.
    pub mods: EventModifiers,
}

impl<'s> Acting<'s> {
    /// Resolve the acting player and require the actions phase.
    pub fn begin(
        state: Option<&'s CampaignState>,
        campaign_id: &CampaignId,
        actor: &Actor,
    ) -> Result<Self, RuleViolation> {
        let campaign = require_campaign(state, campaign_id)?;
        let player = require_player(campaign, actor)?;
        if campaign.phase != Phase::Actions {
            return Err(RuleViolation::phase(format!(
                "actions are only allowed in the actions phase, not {}",
                campaign.phase
            )));
        }
        let mods = EventModifiers::active(&campaign.global_events, campaign.round);
        Ok(Self { campaign, player, mods })
    }

    /// Claim an action slot. Fails if the key was already used this round
    /// or the slot budget would be exceeded.
    pub fn claim_slot(&self, key: &str, cost: u32) -> Result<ActionUsage, RuleViolation> {
        let turn = &self.player.turn;
        if turn.has_used(key) {
            return Err(RuleViolation::actions(format!("action `{key}` already used this round")));
        }
        if turn.actions_used.saturating_add(cost) > self.campaign.rules.actions_per_round {
            return Err(RuleViolation::actions(format!(
                "no action slots left ({} of {} used)",
                turn.actions_used, self.campaign.rules.actions_per_round
            )));
        }
        Ok(ActionUsage { key: key.to_owned(), cost })
    }

    /// The ID the next created entity of this player will carry.
    pub fn next_id(&self, prefix: &str) -> String {
        format!("{prefix}-{}", self.player.holdings.next_seq.saturating_add(1))
    }

    /// Wrap a payload as an event visible only to the acting player.
    pub fn private(&self, payload: EventPayload) -> Event {
        Event::private(self.player.id.clone(), payload)
    }

    /// A public log line attributed to the current round and phase.
    pub fn log(&self, message: impl Into<String>) -> Event {
        log_entry(self.campaign, message)
    }

    /// Look up a tradable market for the acting player.
    pub fn market(&self, market_id: &MarketId) -> Result<&'s MarketInstance, RuleViolation> {
        let market = self
            .campaign
            .market(market_id)
            .ok_or_else(|| RuleViolation::input(format!("unknown market `{market_id}`")))?;
        if market.requires_trade_enterprise && self.player.holdings.trade_enterprises.is_empty() {
            return Err(RuleViolation::state(format!(
                "market `{market_id}` requires a trade enterprise"
            )));
        }
        Ok(market)
    }

    /// Fail with `RESOURCES` unless the player holds at least `amount` gold.
    pub fn require_gold(&self, amount: u32, purpose: &str) -> Result<(), RuleViolation> {
        let gold = self.player.economy.gold;
        if gold < amount {
            return Err(RuleViolation::resources(format!(
                "{purpose} costs {amount} gold, only {gold} available"
            )));
        }
        Ok(())
    }
}

/// The campaign addressed by a command.
pub fn require_campaign<'s>(
    state: Option<&'s CampaignState>,
    campaign_id: &CampaignId,
) -> Result<&'s CampaignState, RuleViolation> {
    let campaign =
        state.ok_or_else(|| RuleViolation::state(format!("campaign `{campaign_id}` not found")))?;
    if &campaign.id != campaign_id {
        return Err(RuleViolation::state(format!(
            "command addresses campaign `{campaign_id}`, state holds `{}`",
            campaign.id
        )));
    }
    Ok(campaign)
}

/// The seat owned by the acting user.
pub fn require_player<'s>(
    campaign: &'s CampaignState,
    actor: &Actor,
) -> Result<&'s PlayerState, RuleViolation> {
    campaign.player_by_user(&actor.user_id).ok_or_else(|| {
        RuleViolation::auth(format!("user `{}` has not joined this campaign", actor.user_id))
    })
}

/// A public log line for the campaign's current round and phase.
pub fn log_entry(campaign: &CampaignState, message: impl Into<String>) -> Event {
    Event::public(EventPayload::PublicLogEntryAdded {
        round: campaign.round,
        phase: campaign.phase,
        message: message.into(),
    })
}

/// Fail with `INPUT` unless `1 <= value <= cap`.
pub fn require_range(value: u32, cap: u32, what: &str) -> Result<(), RuleViolation> {
    if value == 0 {
        return Err(RuleViolation::input(format!("{what} must be at least 1")));
    }
    if value > cap {
        return Err(RuleViolation::input(format!("{what} {value} exceeds the cap of {cap}")));
    }
    Ok(())
}

/// Lower-case label of a success tier for log lines.
pub const fn tier_label(tier: SuccessTier) -> &'static str {
    match tier {
        SuccessTier::VeryGood => "very good",
        SuccessTier::Good => "good",
        SuccessTier::Success => "success",
        SuccessTier::Poor => "poor",
        SuccessTier::Fail => "fail",
    }
}

/// Remove up to `amount` units from a stock, materials in ID order.
///
/// Returns what was taken. Materials emptied by the draw are removed from
/// the stock.
pub fn draw_in_id_order(
    stock: &mut BTreeMap<MaterialId, u32>,
    amount: u32,
) -> BTreeMap<MaterialId, u32> {
    let mut taken = BTreeMap::new();
    let mut remaining = amount;
    for (id, units) in stock.iter_mut() {
        if remaining == 0 {
            break;
        }
        let take = remaining.min(*units);
        if take > 0 {
            *units = units.saturating_sub(take);
            remaining = remaining.saturating_sub(take);
            taken.insert(id.clone(), take);
        }
    }
    stock.retain(|_, units| *units > 0);
    taken
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn draws_take_materials_in_id_order() {
        let mut stock = BTreeMap::new();
        stock.insert(MaterialId::new("raw.ore"), 2);
        stock.insert(MaterialId::new("raw.grain"), 3);
        let taken = draw_in_id_order(&mut stock, 4);
        assert_eq!(taken.get(&MaterialId::new("raw.grain")), Some(&3));
        assert_eq!(taken.get(&MaterialId::new("raw.ore")), Some(&1));
        assert_eq!(stock.get(&MaterialId::new("raw.ore")), Some(&1));
        assert!(!stock.contains_key(&MaterialId::new("raw.grain")));
    }

    #[test]
    fn draws_saturate_at_empty_stock() {
        let mut stock = BTreeMap::new();
        stock.insert(MaterialId::new("raw.grain"), 1);
        let taken = draw_in_id_order(&mut stock, 10);
        assert_eq!(taken.values().sum::<u32>(), 1);
        assert!(stock.is_empty());
    }

    #[test]
    fn ranges_reject_zero_and_overflow() {
        assert_eq!(require_range(0, 4, "count").map_err(|e| e.code), Err(holdfast_types::ErrorCode::Input));
        assert!(require_range(5, 4, "count").is_err());
        assert!(require_range(4, 4, "count").is_ok());
    }
}
