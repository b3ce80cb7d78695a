use anchor_lang::prelude::*;

#[error_code]
pub enum YieldDelegationError {
    #[msg("Invalid parameters: configuration is malformed or out of range")]
    InvalidParameters,

    #[msg("Currency is not whitelisted or does not match the configured currency")]
    NotWhitelisted,

    #[msg("No yield pool configured for this currency")]
    NoYieldPoolConfigured,

    #[msg("Lock period has not elapsed for this position")]
    LockNotElapsed,

    #[msg("Not authorized: caller is not the configured recipient")]
    NotAuthorized,

    #[msg("Not governance: caller is not the governance authority")]
    NotGovernance,

    #[msg("Caller is not the trusted hub authority")]
    NotHub,

    #[msg("Account is not owned by the hub program or is malformed")]
    NotHubAccount,

    #[msg("Entity configuration has not been initialized")]
    ConfigNotInitialized,

    #[msg("Only followers of this profile may perform this action")]
    FollowerOnly,

    #[msg("Deposit produced no position tokens")]
    NothingStaked,

    #[msg("Position account does not match the expected address")]
    InvalidPositionAccount,

    #[msg("Math overflow")]
    ArithmeticOverflow,

    #[msg("Entity config does not belong to the named entity")]
    EntityMismatch,

    #[msg("Token account has the wrong mint or owner")]
    InvalidTokenAccount,
}
