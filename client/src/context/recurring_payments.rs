//! Builds recurring-payments program instructions against a deployed program id.

use recurring_payments_interface::{
    error::EncodingResult,
    state::{
        SUBSCRIPTION_PLAN_SIZE,
        SUBSCRIPTION_SIZE,
    },
    CreateSubscription,
    CreateSubscriptionPlan,
    SubscriptionInstructionData,
    SubscriptionPlanInstructionData,
};
use solana_sdk::{
    instruction::Instruction,
    pubkey::Pubkey,
};
use solana_system_interface::instruction::create_account;

use crate::{
    config_store::DeploymentRecord,
    transactions::CustomRpcClient,
};

/// The kinds of program-owned records, each with the account space the program expects.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum RecordKind {
    SubscriptionPlan,
    Subscription,
}

impl RecordKind {
    pub const fn space(&self) -> usize {
        match self {
            Self::SubscriptionPlan => SUBSCRIPTION_PLAN_SIZE,
            Self::Subscription => SUBSCRIPTION_SIZE,
        }
    }
}

pub struct RecurringPaymentsContext {
    pub program_id: Pubkey,
}

impl RecurringPaymentsContext {
    pub const fn new(program_id: Pubkey) -> Self {
        Self { program_id }
    }

    pub fn from_record(record: &DeploymentRecord) -> Self {
        Self::new(record.program_id)
    }

    /// Builds a system `create_account` for `space` bytes owned by the program.
    pub fn create_program_account(
        &self,
        payer: &Pubkey,
        account: &Pubkey,
        lamports: u64,
        space: usize,
    ) -> Instruction {
        create_account(payer, account, lamports, space as u64, &self.program_id)
    }

    /// Like [`RecurringPaymentsContext::create_program_account`], funding the account with the
    /// rent-exempt minimum for `kind` fetched from the node.
    pub async fn create_record_account(
        &self,
        rpc: &CustomRpcClient,
        payer: &Pubkey,
        account: &Pubkey,
        kind: RecordKind,
    ) -> anyhow::Result<Instruction> {
        let lamports = rpc.rent_exempt_minimum(kind.space()).await?;
        Ok(self.create_program_account(payer, account, lamports, kind.space()))
    }

    pub fn create_subscription_plan<T, M>(
        &self,
        subscription_plan: Pubkey,
        token: Pubkey,
        owner: Pubkey,
        subscription_timeframe: T,
        max_amount: M,
    ) -> EncodingResult<Instruction>
    where
        T: TryInto<u64>,
        M: TryInto<u64>,
    {
        let data = SubscriptionPlanInstructionData::try_new(subscription_timeframe, max_amount)?;
        Ok(CreateSubscriptionPlan {
            subscription_plan,
            token,
            owner,
            data,
        }
        .create_instruction(&self.program_id))
    }

    pub fn create_subscription<M, T>(
        &self,
        subscription: Pubkey,
        token: Pubkey,
        customer: Pubkey,
        payout_address: Pubkey,
        max_amount: M,
        subscription_timeframe: T,
    ) -> EncodingResult<Instruction>
    where
        M: TryInto<u64>,
        T: TryInto<u64>,
    {
        let data = SubscriptionInstructionData::try_new(max_amount, subscription_timeframe)?;
        Ok(CreateSubscription {
            subscription,
            token,
            customer,
            payout_address,
            data,
        }
        .create_instruction(&self.program_id))
    }
}
