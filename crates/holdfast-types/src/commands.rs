//! Command vocabulary.
//!
//! Commands express player or GM intent. They are validated by the decision
//! engine, which either rejects them or turns them into events; a command
//! never touches state by itself.

use serde::{Deserialize, Serialize};

use crate::enums::{
    CityPropertyMode, DomainTier, HoldingSize, OfficeYieldMode, OrganizationKind, SpecialistKind,
    TroopKind,
};
use crate::holdings::HoldingRef;
use crate::ids::{CampaignId, HoldingId, MarketId, MaterialId, UserId};
use crate::rules::RulesConfig;

/// One material offered in a sale.
///
/// Raw materials are sold in lots of six units; special materials are sold
/// one unit per lot.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SaleItem {
    /// Material to sell.
    pub material_id: MaterialId,
    /// Number of lots.
    pub lots: u32,
}

/// A command submitted by a GM or a player.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum Command {
    // --- GM ---
    /// Create a new campaign. The actor becomes its GM.
    CreateCampaign {
        /// Identifier of the new campaign.
        campaign_id: CampaignId,
        /// Display name.
        name: String,
        /// User that will own GM rights.
        gm_user_id: UserId,
        /// Rules fixed for the campaign's lifetime.
        #[serde(default)]
        rules: RulesConfig,
    },
    /// Move the campaign to its next phase, resolving the transition.
    AdvancePhase {
        /// Target campaign.
        campaign_id: CampaignId,
    },

    // --- Seat ---
    /// Take a player seat.
    JoinCampaign {
        /// Target campaign.
        campaign_id: CampaignId,
        /// Name shown to other players.
        display_name: String,
    },

    // --- Checked actions ---
    /// Invest labor in gathering raw materials from domains.
    GatherMaterials {
        /// Target campaign.
        campaign_id: CampaignId,
        /// Labor invested.
        investments: u32,
    },
    /// Spend gold to gain influence.
    GainInfluence {
        /// Target campaign.
        campaign_id: CampaignId,
        /// Gold invested.
        investments: u32,
    },
    /// Lend gold for a payout at the next maintenance.
    LendMoney {
        /// Target campaign.
        campaign_id: CampaignId,
        /// Investments of two gold each.
        investments: u32,
    },
    /// Sell materials at a market.
    SellMaterials {
        /// Target campaign.
        campaign_id: CampaignId,
        /// Venue.
        market_id: MarketId,
        /// Materials offered.
        items: Vec<SaleItem>,
    },
    /// Buy materials at a market.
    BuyMaterials {
        /// Target campaign.
        campaign_id: CampaignId,
        /// Venue.
        market_id: MarketId,
        /// Material bought.
        material_id: MaterialId,
        /// Lots bought.
        lots: u32,
    },
    /// Sell and buy at the same market in one action.
    SellBuy {
        /// Target campaign.
        campaign_id: CampaignId,
        /// Venue.
        market_id: MarketId,
        /// Materials offered.
        items: Vec<SaleItem>,
        /// Material bought.
        buy_material_id: MaterialId,
        /// Lots bought.
        buy_lots: u32,
    },

    // --- Acquisitions ---
    /// Acquire a political office.
    AcquireOffice {
        /// Target campaign.
        campaign_id: CampaignId,
        /// Office size.
        size: HoldingSize,
    },
    /// Acquire a domain producing `primary_raw`.
    AcquireDomain {
        /// Target campaign.
        campaign_id: CampaignId,
        /// Domain tier. The starter tier cannot be bought.
        tier: DomainTier,
        /// Raw material the domain will produce.
        primary_raw: MaterialId,
    },
    /// Acquire a leased city property.
    AcquireCityProperty {
        /// Target campaign.
        campaign_id: CampaignId,
        /// Property size.
        size: HoldingSize,
    },
    /// Acquire a workshop.
    AcquireWorkshop {
        /// Target campaign.
        campaign_id: CampaignId,
        /// Workshop size.
        size: HoldingSize,
    },
    /// Acquire a storage.
    AcquireStorage {
        /// Target campaign.
        campaign_id: CampaignId,
        /// Storage size.
        size: HoldingSize,
    },
    /// Acquire a trade enterprise.
    AcquireTradeEnterprise {
        /// Target campaign.
        campaign_id: CampaignId,
        /// Enterprise size.
        size: HoldingSize,
    },
    /// Acquire an organization.
    AcquireOrganization {
        /// Target campaign.
        campaign_id: CampaignId,
        /// Organization flavor.
        kind: OrganizationKind,
        /// Organization size.
        size: HoldingSize,
    },
    /// Settle tenant families on a domain.
    AcquireTenants {
        /// Target campaign.
        campaign_id: CampaignId,
        /// Domain receiving the tenants.
        domain_id: HoldingId,
        /// Tenant families.
        count: u32,
    },
    /// Recruit troop units.
    RecruitTroops {
        /// Target campaign.
        campaign_id: CampaignId,
        /// Unit kind.
        kind: TroopKind,
        /// Units, 1 to 4.
        count: u32,
    },
    /// Hire a specialist retainer.
    HireSpecialist {
        /// Target campaign.
        campaign_id: CampaignId,
        /// Specialty.
        kind: SpecialistKind,
    },
    /// Raise a holding by one rank.
    Upgrade {
        /// Target campaign.
        campaign_id: CampaignId,
        /// Holding to upgrade. Offices and organizations included.
        target: HoldingRef,
    },

    // --- Free actions ---
    /// Build a catalog facility on a holding.
    BuildFacility {
        /// Target campaign.
        campaign_id: CampaignId,
        /// Holding receiving the facility.
        host: HoldingRef,
        /// Catalog key of the facility.
        facility_key: String,
    },
    /// Switch a city property between leased and production use.
    SetCityPropertyMode {
        /// Target campaign.
        campaign_id: CampaignId,
        /// City property.
        property_id: HoldingId,
        /// New mode.
        mode: CityPropertyMode,
    },
    /// Switch what an office yields.
    SetOfficeYieldMode {
        /// Target campaign.
        campaign_id: CampaignId,
        /// Office.
        office_id: HoldingId,
        /// New yield.
        mode: OfficeYieldMode,
    },
    /// Record a note only the author can see. Allowed in any phase.
    AddPrivateNote {
        /// Target campaign.
        campaign_id: CampaignId,
        /// Note text, 1 to 500 characters.
        text: String,
    },
}

impl Command {
    /// The campaign the command targets.
    pub const fn campaign_id(&self) -> &CampaignId {
        match self {
            Self::CreateCampaign { campaign_id, .. }
            | Self::AdvancePhase { campaign_id }
            | Self::JoinCampaign { campaign_id, .. }
            | Self::GatherMaterials { campaign_id, .. }
            | Self::GainInfluence { campaign_id, .. }
            | Self::LendMoney { campaign_id, .. }
            | Self::SellMaterials { campaign_id, .. }
            | Self::BuyMaterials { campaign_id, .. }
            | Self::SellBuy { campaign_id, .. }
            | Self::AcquireOffice { campaign_id, .. }
            | Self::AcquireDomain { campaign_id, .. }
            | Self::AcquireCityProperty { campaign_id, .. }
            | Self::AcquireWorkshop { campaign_id, .. }
            | Self::AcquireStorage { campaign_id, .. }
            | Self::AcquireTradeEnterprise { campaign_id, .. }
            | Self::AcquireOrganization { campaign_id, .. }
            | Self::AcquireTenants { campaign_id, .. }
            | Self::RecruitTroops { campaign_id, .. }
            | Self::HireSpecialist { campaign_id, .. }
            | Self::Upgrade { campaign_id, .. }
            | Self::BuildFacility { campaign_id, .. }
            | Self::SetCityPropertyMode { campaign_id, .. }
            | Self::SetOfficeYieldMode { campaign_id, .. }
            | Self::AddPrivateNote { campaign_id, .. } => campaign_id,
        }
    }

    /// Short stable name for logging.
    pub const fn name(&self) -> &'static str {
        match self {
            Self::CreateCampaign { .. } => "create_campaign",
            Self::AdvancePhase { .. } => "advance_phase",
            Self::JoinCampaign { .. } => "join_campaign",
            Self::GatherMaterials { .. } => "gather_materials",
            Self::GainInfluence { .. } => "gain_influence",
            Self::LendMoney { .. } => "lend_money",
            Self::SellMaterials { .. } => "sell_materials",
            Self::BuyMaterials { .. } => "buy_materials",
            Self::SellBuy { .. } => "sell_buy",
            Self::AcquireOffice { .. } => "acquire_office",
            Self::AcquireDomain { .. } => "acquire_domain",
            Self::AcquireCityProperty { .. } => "acquire_city_property",
            Self::AcquireWorkshop { .. } => "acquire_workshop",
            Self::AcquireStorage { .. } => "acquire_storage",
            Self::AcquireTradeEnterprise { .. } => "acquire_trade_enterprise",
            Self::AcquireOrganization { .. } => "acquire_organization",
            Self::AcquireTenants { .. } => "acquire_tenants",
            Self::RecruitTroops { .. } => "recruit_troops",
            Self::HireSpecialist { .. } => "hire_specialist",
            Self::Upgrade { .. } => "upgrade",
            Self::BuildFacility { .. } => "build_facility",
            Self::SetCityPropertyMode { .. } => "set_city_property_mode",
            Self::SetOfficeYieldMode { .. } => "set_office_yield_mode",
            Self::AddPrivateNote { .. } => "add_private_note",
        }
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    #[test]
    fn commands_are_tagged_by_type() {
        let cmd = Command::GatherMaterials {
            campaign_id: CampaignId::new("c1"),
            investments: 2,
        };
        let json = serde_json::to_value(&cmd).unwrap();
        assert_eq!(json.get("type").and_then(|v| v.as_str()), Some("gather_materials"));
        assert_eq!(json.get("campaign_id").and_then(|v| v.as_str()), Some("c1"));
        assert_eq!(cmd.name(), "gather_materials");
    }

    #[test]
    fn create_campaign_defaults_rules() {
        let json = r#"{"type":"create_campaign","campaign_id":"c1","name":"Vale","gm_user_id":"gm"}"#;
        let cmd: Command = serde_json::from_str(json).unwrap();
        assert!(matches!(
            cmd,
            Command::CreateCampaign { ref rules, .. } if *rules == RulesConfig::default()
        ));
    }
}
