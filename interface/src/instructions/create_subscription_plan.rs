use core::mem::MaybeUninit;

use solana_sdk::{
    instruction::{
        AccountMeta,
        Instruction,
    },
    pubkey::Pubkey,
};
use static_assertions::const_assert_eq;

use crate::{
    error::{
        EncodingError,
        EncodingResult,
    },
    instructions::{
        check_tagged,
        narrow_u64,
        InstructionTag,
        INSTRUCTION_DATA_LEN,
    },
    pack::{
        read_le_u64,
        write_bytes,
        Pack,
    },
    state::{
        LeU64,
        U64_SIZE,
        U8_SIZE,
    },
};

/// The arguments of a `CreateSubscriptionPlan` instruction.
///
/// Instruction data layout:
///   - [0]: the instruction tag, 1 byte
///   - [1..9]: the u64 `subscription_timeframe` as little-endian bytes, 8 bytes
///   - [9..17]: the u64 `max_amount` as little-endian bytes, 8 bytes
#[repr(C)]
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct SubscriptionPlanInstructionData {
    /// Length of one billing cycle.
    subscription_timeframe: LeU64,
    /// The most that can be withdrawn within one cycle.
    max_amount: LeU64,
}

const_assert_eq!(
    U8_SIZE + size_of::<SubscriptionPlanInstructionData>(),
    INSTRUCTION_DATA_LEN
);
const_assert_eq!(1, align_of::<SubscriptionPlanInstructionData>());

impl SubscriptionPlanInstructionData {
    pub fn new(subscription_timeframe: u64, max_amount: u64) -> Self {
        Self {
            subscription_timeframe: subscription_timeframe.to_le_bytes(),
            max_amount: max_amount.to_le_bytes(),
        }
    }

    /// Builds the instruction data from arbitrary integer arguments, failing if either doesn't fit
    /// in a `u64`.
    pub fn try_new<T, M>(subscription_timeframe: T, max_amount: M) -> EncodingResult<Self>
    where
        T: TryInto<u64>,
        M: TryInto<u64>,
    {
        Ok(Self::new(
            narrow_u64(
                subscription_timeframe,
                EncodingError::SubscriptionTimeframeOutOfRange,
            )?,
            narrow_u64(max_amount, EncodingError::MaxAmountOutOfRange)?,
        ))
    }

    #[inline(always)]
    pub fn subscription_timeframe(&self) -> u64 {
        u64::from_le_bytes(self.subscription_timeframe)
    }

    #[inline(always)]
    pub fn max_amount(&self) -> u64 {
        u64::from_le_bytes(self.max_amount)
    }

    pub fn unpack(data: &[u8]) -> EncodingResult<Self> {
        check_tagged(data, InstructionTag::CreateSubscriptionPlan)?;
        Ok(Self::new(
            read_le_u64(data, U8_SIZE)?,
            read_le_u64(data, U8_SIZE + U64_SIZE)?,
        ))
    }
}

// Safety: all 17 bytes are written below.
unsafe impl Pack<INSTRUCTION_DATA_LEN> for SubscriptionPlanInstructionData {
    fn pack_into_slice(&self, dst: &mut [MaybeUninit<u8>; INSTRUCTION_DATA_LEN]) {
        dst[0].write(InstructionTag::CreateSubscriptionPlan as u8);
        write_bytes(&mut dst[1..9], &self.subscription_timeframe);
        write_bytes(&mut dst[9..17], &self.max_amount);
    }
}

/// Packs a `CreateSubscriptionPlan` instruction: tag `1`, then the timeframe, then the max amount.
pub fn encode_subscription_plan<T, M>(
    subscription_timeframe: T,
    max_amount: M,
) -> EncodingResult<[u8; INSTRUCTION_DATA_LEN]>
where
    T: TryInto<u64>,
    M: TryInto<u64>,
{
    SubscriptionPlanInstructionData::try_new(subscription_timeframe, max_amount)
        .map(|data| data.pack())
}

/// Initializes a subscription plan record owned by the recurring-payments program.
///
/// The plan account must already be allocated with
/// [`SUBSCRIPTION_PLAN_SIZE`](crate::state::SUBSCRIPTION_PLAN_SIZE) bytes and be owned by the
/// program.
///
/// ### Accounts
///  0. `[WRITE]` Subscription plan account
///  1. `[READ]` Token account the plan is paid into
///  2. `[READ]` Plan owner
#[derive(Clone, Debug)]
pub struct CreateSubscriptionPlan {
    pub subscription_plan: Pubkey,
    pub token: Pubkey,
    pub owner: Pubkey,
    pub data: SubscriptionPlanInstructionData,
}

impl CreateSubscriptionPlan {
    pub fn create_account_metas(&self) -> [AccountMeta; 3] {
        [
            AccountMeta::new(self.subscription_plan, false),
            AccountMeta::new_readonly(self.token, false),
            AccountMeta::new_readonly(self.owner, false),
        ]
    }

    pub fn pack_instruction_data(&self) -> [u8; INSTRUCTION_DATA_LEN] {
        self.data.pack()
    }

    pub fn create_instruction(&self, program_id: &Pubkey) -> Instruction {
        Instruction::new_with_bytes(
            *program_id,
            &self.pack_instruction_data(),
            self.create_account_metas().to_vec(),
        )
    }
}
