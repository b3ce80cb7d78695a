// =============================================================================
// YIELD DELEGATION STATE MODULE
// =============================================================================
//
// Architecture:
// - ModuleGlobals: governance, hub binding, treasury, global slot counter
// - CurrencyRoute: currency -> (yield pool, position token)
// - EntityConfig: fee / lock / currency snapshot per publication or profile
// - DelegationPosition: open delegation per (entity, counterparty)
// =============================================================================

pub mod globals;
pub mod currency_route;
pub mod entity_config;
pub mod position;

pub use globals::*;
pub use currency_route::*;
pub use entity_config::*;
pub use position::*;
