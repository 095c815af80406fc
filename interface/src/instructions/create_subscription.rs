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
        CLOCK_SYSVAR_ID,
        U64_SIZE,
        U8_SIZE,
    },
};

/// The arguments of a `CreateSubscription` instruction.
///
/// The field order is the reverse of [`SubscriptionPlanInstructionData`]; the program reads the
/// max amount first for this instruction.
///
/// Instruction data layout:
///   - [0]: the instruction tag, 1 byte
///   - [1..9]: the u64 `max_amount` as little-endian bytes, 8 bytes
///   - [9..17]: the u64 `subscription_timeframe` as little-endian bytes, 8 bytes
///
/// [`SubscriptionPlanInstructionData`]: crate::SubscriptionPlanInstructionData
#[repr(C)]
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct SubscriptionInstructionData {
    max_amount: LeU64,
    subscription_timeframe: LeU64,
}

const_assert_eq!(
    U8_SIZE + size_of::<SubscriptionInstructionData>(),
    INSTRUCTION_DATA_LEN
);
const_assert_eq!(1, align_of::<SubscriptionInstructionData>());

impl SubscriptionInstructionData {
    pub fn new(max_amount: u64, subscription_timeframe: u64) -> Self {
        Self {
            max_amount: max_amount.to_le_bytes(),
            subscription_timeframe: subscription_timeframe.to_le_bytes(),
        }
    }

    pub fn try_new<M, T>(max_amount: M, subscription_timeframe: T) -> EncodingResult<Self>
    where
        M: TryInto<u64>,
        T: TryInto<u64>,
    {
        Ok(Self::new(
            narrow_u64(max_amount, EncodingError::MaxAmountOutOfRange)?,
            narrow_u64(
                subscription_timeframe,
                EncodingError::SubscriptionTimeframeOutOfRange,
            )?,
        ))
    }

    #[inline(always)]
    pub fn max_amount(&self) -> u64 {
        u64::from_le_bytes(self.max_amount)
    }

    #[inline(always)]
    pub fn subscription_timeframe(&self) -> u64 {
        u64::from_le_bytes(self.subscription_timeframe)
    }

    pub fn unpack(data: &[u8]) -> EncodingResult<Self> {
        check_tagged(data, InstructionTag::CreateSubscription)?;
        Ok(Self::new(
            read_le_u64(data, U8_SIZE)?,
            read_le_u64(data, U8_SIZE + U64_SIZE)?,
        ))
    }
}

// Safety: all 17 bytes are written below.
unsafe impl Pack<INSTRUCTION_DATA_LEN> for SubscriptionInstructionData {
    fn pack_into_slice(&self, dst: &mut [MaybeUninit<u8>; INSTRUCTION_DATA_LEN]) {
        dst[0].write(InstructionTag::CreateSubscription as u8);
        write_bytes(&mut dst[1..9], &self.max_amount);
        write_bytes(&mut dst[9..17], &self.subscription_timeframe);
    }
}

/// Packs a `CreateSubscription` instruction: tag `0`, then the max amount, then the timeframe.
pub fn encode_subscription<M, T>(
    max_amount: M,
    subscription_timeframe: T,
) -> EncodingResult<[u8; INSTRUCTION_DATA_LEN]>
where
    M: TryInto<u64>,
    T: TryInto<u64>,
{
    SubscriptionInstructionData::try_new(max_amount, subscription_timeframe).map(|data| data.pack())
}

/// Initializes a subscription record for a customer against a token account.
///
/// ### Accounts
///  0. `[WRITE]` Subscription account
///  1. `[READ]` Token account
///  2. `[READ]` Customer
///  3. `[READ]` Payout address
///  4. `[READ]` Clock sysvar
#[derive(Clone, Debug)]
pub struct CreateSubscription {
    pub subscription: Pubkey,
    pub token: Pubkey,
    pub customer: Pubkey,
    pub payout_address: Pubkey,
    pub data: SubscriptionInstructionData,
}

impl CreateSubscription {
    pub fn create_account_metas(&self) -> [AccountMeta; 5] {
        [
            AccountMeta::new(self.subscription, false),
            AccountMeta::new_readonly(self.token, false),
            AccountMeta::new_readonly(self.customer, false),
            AccountMeta::new_readonly(self.payout_address, false),
            AccountMeta::new_readonly(CLOCK_SYSVAR_ID, false),
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

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn pack_layout() {
        let packed = SubscriptionInstructionData::new(u64::MAX, 0x0304).pack();
        assert_eq!(packed[0], 0);
        assert_eq!(&packed[1..9], &[0xff; 8]);
        assert_eq!(&packed[9..17], &[4, 3, 0, 0, 0, 0, 0, 0]);
    }

    #[test]
    fn unpack_recovers_fields() {
        let packed = encode_subscription(10u64, 20u64).unwrap();
        let data = SubscriptionInstructionData::unpack(&packed).unwrap();
        assert_eq!(data.max_amount(), 10);
        assert_eq!(data.subscription_timeframe(), 20);
    }

    #[test]
    fn unpack_rejects_short_data() {
        let packed = encode_subscription(10u64, 20u64).unwrap();
        assert_eq!(
            SubscriptionInstructionData::unpack(&packed[..9]),
            Err(EncodingError::InvalidDataLength)
        );
    }

    #[test]
    fn out_of_range_arguments_fail() {
        assert_eq!(
            encode_subscription(u128::MAX, 1u8),
            Err(EncodingError::MaxAmountOutOfRange)
        );
        assert_eq!(
            encode_subscription(1u8, i64::MIN),
            Err(EncodingError::SubscriptionTimeframeOutOfRange)
        );
    }

    #[test]
    fn clock_sysvar_is_last_and_read_only() {
        let ix = CreateSubscription {
            subscription: Pubkey::new_unique(),
            token: Pubkey::new_unique(),
            customer: Pubkey::new_unique(),
            payout_address: Pubkey::new_unique(),
            data: SubscriptionInstructionData::new(1, 2),
        };
        let metas = ix.create_account_metas();
        assert_eq!(
            metas.iter().map(|m| m.pubkey).collect::<Vec<_>>(),
            [
                ix.subscription,
                ix.token,
                ix.customer,
                ix.payout_address,
                CLOCK_SYSVAR_ID
            ]
        );
        assert_eq!(
            metas.iter().map(|m| m.is_writable).collect::<Vec<_>>(),
            [true, false, false, false, false]
        );
        assert!(metas.iter().all(|m| !m.is_signer));
    }
}
