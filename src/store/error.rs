use std::fmt;
use thiserror::Error;

/// Kind of record a lookup failed on
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Entity {
    User,
    Location,
    Reward,
    Post,
}

impl fmt::Display for Entity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Entity::User => "User",
            Entity::Location => "Location",
            Entity::Reward => "Reward",
            Entity::Post => "Post",
        };
        write!(f, "{}", name)
    }
}

#[derive(Debug, Error, PartialEq, Eq)]
pub enum StoreError {
    #[error("{0} not found")]
    NotFound(Entity),

    #[error("Insufficient points: need {required}, have {available}")]
    InsufficientPoints { required: u32, available: u32 },

    #[error("Conflict: {0}")]
    Conflict(String),

    #[error("Balance of {balance} cannot take a credit of {credit}")]
    BalanceOverflow { balance: u32, credit: u32 },
}
