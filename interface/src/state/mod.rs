use solana_sdk::pubkey::Pubkey;

pub const U8_SIZE: usize = core::mem::size_of::<u8>();
pub const U64_SIZE: usize = core::mem::size_of::<u64>();

/// A little-endian `u64` stored as raw bytes, so structs holding it have an alignment of 1.
pub type LeU64 = [u8; U64_SIZE];

/// The account space the program expects for a subscription plan record.
pub const SUBSCRIPTION_PLAN_SIZE: usize = 81;

/// The account space the program expects for a subscription record.
pub const SUBSCRIPTION_SIZE: usize = 162;

pub const CLOCK_SYSVAR_ID: Pubkey =
    Pubkey::from_str_const("SysvarC1ock11111111111111111111111111111111");
