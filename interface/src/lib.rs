//! Instruction layouts, record sizes and error codes for the recurring-payments program.
//!
//! Everything here is pure: instructions are packed into fixed-width little-endian buffers and
//! paired with the ordered account list the on-chain program expects.

pub mod error;
pub mod instructions;
pub mod pack;
pub mod state;

pub use instructions::{
    create_subscription::{
        encode_subscription,
        CreateSubscription,
        SubscriptionInstructionData,
    },
    create_subscription_plan::{
        encode_subscription_plan,
        CreateSubscriptionPlan,
        SubscriptionPlanInstructionData,
    },
    InstructionTag,
};
