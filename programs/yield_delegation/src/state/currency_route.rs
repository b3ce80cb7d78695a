use anchor_lang::prelude::*;
use crate::errors::YieldDelegationError;
use crate::state::ModuleGlobals;

/// Which half of a route a governance update targets.
#[derive(AnchorSerialize, AnchorDeserialize, Clone, Copy, Debug, PartialEq, Eq)]
pub enum RouteField {
    YieldPool,
    PositionToken,
}

/// Per-currency routing: which yield pool a settlement currency is deposited
/// into, and which position-token ("ticket") mint that pool issues.
#[account]
pub struct CurrencyRoute {
    /// Settlement currency mint this route belongs to
    pub currency: Pubkey,
    /// Yield pool state account deposits go to
    pub yield_pool: Pubkey,
    /// Position-token mint minted by the pool
    pub position_mint: Pubkey,
    /// PDA bump seed
    pub bump: u8,
}

impl CurrencyRoute {
    pub const SIZE: usize = 8 + 32 + 32 + 32 + 1;

    pub fn has_pool(&self) -> bool {
        self.yield_pool != Pubkey::default()
    }

    pub fn has_position_token(&self) -> bool {
        self.position_mint != Pubkey::default()
    }

    /// Both halves of the route must be set before a currency can be used.
    pub fn is_usable(&self) -> bool {
        self.has_pool() && self.has_position_token()
    }

    /// Returns `(yield_pool, position_mint)`.
    pub fn resolve(&self) -> Result<(Pubkey, Pubkey)> {
        require!(
            self.is_usable(),
            YieldDelegationError::NoYieldPoolConfigured
        );
        Ok((self.yield_pool, self.position_mint))
    }

    /// Governance-only mutation, limited to whitelisted currencies. Nothing
    /// is written unless both checks pass.
    pub fn update(
        &mut self,
        globals: &ModuleGlobals,
        caller: &Pubkey,
        currency: Pubkey,
        currency_whitelisted: bool,
        field: RouteField,
        value: Pubkey,
    ) -> Result<()> {
        globals.assert_governance(caller)?;
        require!(currency_whitelisted, YieldDelegationError::NotWhitelisted);

        self.currency = currency;
        match field {
            RouteField::YieldPool => self.yield_pool = value,
            RouteField::PositionToken => self.position_mint = value,
        }
        Ok(())
    }

    /// Reads a route PDA that may not have been created yet.
    pub fn load_optional(info: &AccountInfo) -> Result<Option<CurrencyRoute>> {
        if info.data_is_empty() || *info.owner != crate::ID {
            return Ok(None);
        }
        let data = info.try_borrow_data()?;
        let route = CurrencyRoute::try_deserialize(&mut &data[..])?;
        Ok(Some(route))
    }
}

#[cfg(all(test, not(target_arch = "bpf")))]
mod tests {
    use super::*;
    use crate::test_utils::{error_code, globals, route};

    #[test]
    fn resolve_returns_pool_and_ticket() {
        let r = route(Pubkey::new_unique());
        assert_eq!(r.resolve().unwrap(), (r.yield_pool, r.position_mint));
    }

    #[test]
    fn half_configured_route_is_unusable() {
        let mut r = route(Pubkey::new_unique());
        r.position_mint = Pubkey::default();
        assert!(r.has_pool());
        assert!(!r.is_usable());

        let mut r = route(Pubkey::new_unique());
        r.yield_pool = Pubkey::default();
        let err = r.resolve().unwrap_err();
        assert_eq!(error_code(&err), u32::from(YieldDelegationError::NoYieldPoolConfigured));
    }

    #[test]
    fn non_governance_update_leaves_route_unchanged() {
        let governance = Pubkey::new_unique();
        let g = globals(governance);
        let currency = Pubkey::new_unique();
        let mut r = route(currency);
        let before = (r.yield_pool, r.position_mint);

        let err = r
            .update(&g, &Pubkey::new_unique(), currency, true, RouteField::YieldPool, Pubkey::new_unique())
            .unwrap_err();
        assert_eq!(error_code(&err), u32::from(YieldDelegationError::NotGovernance));
        assert_eq!((r.yield_pool, r.position_mint), before);
    }

    #[test]
    fn unwhitelisted_currency_cannot_be_routed() {
        let governance = Pubkey::new_unique();
        let g = globals(governance);
        let currency = Pubkey::new_unique();
        let mut r = route(currency);
        let before = r.position_mint;

        let err = r
            .update(&g, &governance, currency, false, RouteField::PositionToken, Pubkey::new_unique())
            .unwrap_err();
        assert_eq!(error_code(&err), u32::from(YieldDelegationError::NotWhitelisted));
        assert_eq!(r.position_mint, before);
    }

    #[test]
    fn governance_sets_each_half() {
        let governance = Pubkey::new_unique();
        let g = globals(governance);
        let currency = Pubkey::new_unique();
        let mut r = CurrencyRoute {
            currency: Pubkey::default(),
            yield_pool: Pubkey::default(),
            position_mint: Pubkey::default(),
            bump: 0,
        };

        let pool = Pubkey::new_unique();
        r.update(&g, &governance, currency, true, RouteField::YieldPool, pool).unwrap();
        assert!(!r.is_usable());

        let ticket = Pubkey::new_unique();
        r.update(&g, &governance, currency, true, RouteField::PositionToken, ticket).unwrap();
        assert_eq!(r.resolve().unwrap(), (pool, ticket));
        assert_eq!(r.currency, currency);
    }

    #[test]
    fn clearing_the_pool_makes_the_route_unusable() {
        let governance = Pubkey::new_unique();
        let g = globals(governance);
        let currency = Pubkey::new_unique();
        let mut r = route(currency);

        r.update(&g, &governance, currency, true, RouteField::YieldPool, Pubkey::default())
            .unwrap();
        assert!(!r.is_usable());
        let err = r.resolve().unwrap_err();
        assert_eq!(error_code(&err), u32::from(YieldDelegationError::NoYieldPoolConfigured));
    }
}
