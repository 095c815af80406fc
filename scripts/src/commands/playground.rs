use anyhow::Context;
use recurring_payments_client::{
    config_store::{
        DeploymentRecord,
        RECURRING_PAYMENTS_RECORD,
    },
    context::{
        recurring_payments::{
            RecordKind,
            RecurringPaymentsContext,
        },
        token::{
            TokenContext,
            DEFAULT_MINT_DECIMALS,
        },
    },
    format_lamports,
    logs::log_divider,
    print_kv,
};
use recurring_payments_interface::{
    encode_subscription,
    encode_subscription_plan,
};
use solana_sdk::signature::{
    Keypair,
    Signer,
};

use super::Environment;

/// Whole tokens minted to the owner's token account.
const INITIAL_SUPPLY: u64 = 1000;

/// Against the recorded deployment: creates a token and a funded token account, approves the
/// program as a delegate, then creates a subscription plan and a subscription in one transaction.
pub async fn playground(
    env: &Environment,
    max_amount: u128,
    subscription_timeframe: u128,
    approve_amount: u64,
) -> anyhow::Result<()> {
    let record: DeploymentRecord = env
        .config_store
        .load(RECURRING_PAYMENTS_RECORD)
        .context("No deployment recorded; run `deploy` first")?;

    // Reject out of range arguments before anything is sent.
    encode_subscription_plan(subscription_timeframe, max_amount)?;
    encode_subscription(max_amount, subscription_timeframe)?;

    let payer = env.signer()?;
    let mut rpc = env.connect().await?;
    rpc.watch_program(record.program_id);
    let program = RecurringPaymentsContext::from_record(&record);

    print_kv!(
        "Data account balance",
        format_lamports(rpc.balance(&record.account_id).await?)
    );
    log_divider();

    let token = TokenContext::create_mint(&rpc, &payer, DEFAULT_MINT_DECIMALS, None, None).await?;
    let token_account = token
        .create_token_account(&rpc, &payer, &payer.pubkey())
        .await?;
    print_kv!("Token account", token_account);

    let mint = token.mint_to(&token_account, token.to_atoms(INITIAL_SUPPLY)?)?;
    rpc.send_single_signer(&payer, [mint])
        .await
        .context("Failed to mint the initial supply")?;

    let approve = token.approve(
        &token_account,
        &record.program_id,
        &payer.pubkey(),
        approve_amount,
    )?;
    rpc.send_single_signer(&payer, [approve])
        .await
        .context("Failed to approve the program as a delegate")?;

    let subscription = Keypair::new();
    let subscription_plan = Keypair::new();
    let customer = Keypair::new().pubkey();
    let payout_address = Keypair::new().pubkey();
    print_kv!("Subscription", subscription.pubkey());
    print_kv!("Subscription plan", subscription_plan.pubkey());

    let instructions = [
        program
            .create_record_account(
                &rpc,
                &payer.pubkey(),
                &subscription.pubkey(),
                RecordKind::Subscription,
            )
            .await?,
        program
            .create_record_account(
                &rpc,
                &payer.pubkey(),
                &subscription_plan.pubkey(),
                RecordKind::SubscriptionPlan,
            )
            .await?,
        program.create_subscription_plan(
            subscription_plan.pubkey(),
            token_account,
            payer.pubkey(),
            subscription_timeframe,
            max_amount,
        )?,
        program.create_subscription(
            subscription.pubkey(),
            token_account,
            customer,
            payout_address,
            max_amount,
            subscription_timeframe,
        )?,
    ];

    let signature = rpc
        .send_and_confirm_txn(&payer, &[&subscription, &subscription_plan], &instructions)
        .await?;
    log_divider();
    print_kv!("Signature", signature);

    Ok(())
}
