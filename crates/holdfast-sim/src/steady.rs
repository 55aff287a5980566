//! A conservative scripted planner.

use holdfast_engine::actions::checks::LEND_GOLD_PER_INVESTMENT;
use holdfast_engine::planner::Planner;
use holdfast_rules::budgets::{gather_cap, trade_cap};
use holdfast_rules::market::RAW_LOT_SIZE;
use holdfast_types::{CampaignState, Command, MarketId, PlayerState, SaleItem};

/// Gathers as much as labor allows, then sells whole lots at the first
/// open market, or lends spare gold when there is nothing to sell.
#[derive(Debug, Clone, Copy, Default)]
pub struct SteadyPlanner;

impl SteadyPlanner {
    fn open_market(campaign: &CampaignState, player: &PlayerState) -> Option<MarketId> {
        let has_enterprise = !player.holdings.trade_enterprises.is_empty();
        campaign
            .markets
            .iter()
            .find(|m| has_enterprise || !m.requires_trade_enterprise)
            .map(|m| m.id.clone())
    }
}

impl Planner for SteadyPlanner {
    fn plan(
        &mut self,
        campaign: &CampaignState,
        player: &PlayerState,
        _round: u32,
    ) -> Vec<Command> {
        let campaign_id = campaign.id.clone();
        let mut commands = Vec::new();

        let labor = player.turn.labor_available.min(gather_cap(&player.holdings));
        if labor > 0 {
            commands.push(Command::GatherMaterials {
                campaign_id: campaign_id.clone(),
                investments: labor,
            });
        }

        let cap = trade_cap(&player.holdings);
        let items: Vec<SaleItem> = player
            .economy
            .raw
            .iter()
            .filter_map(|(material_id, units)| {
                let lots = units.checked_div(RAW_LOT_SIZE).unwrap_or(0).min(cap);
                (lots > 0).then(|| SaleItem { material_id: material_id.clone(), lots })
            })
            .take(1)
            .collect();
        match Self::open_market(campaign, player) {
            Some(market_id) if !items.is_empty() => {
                commands.push(Command::SellMaterials { campaign_id, market_id, items });
            }
            _ => {
                let investments =
                    player.economy.gold.checked_div(LEND_GOLD_PER_INVESTMENT).unwrap_or(0).min(cap);
                if investments > 0 {
                    commands.push(Command::LendMoney { campaign_id, investments });
                }
            }
        }
        commands
    }
}
