use std::path::Path;

use anyhow::Context;
use recurring_payments_client::{
    config_store::{
        DeploymentRecord,
        PENDING_DEPLOYMENT_RECORD,
        RECURRING_PAYMENTS_RECORD,
    },
    context::recurring_payments::RecurringPaymentsContext,
    deploy::{
        complete_deployment,
        deploy_program,
        deploy_stage,
        estimate_deploy_cost,
        read_program,
        record_uploaded_program,
        DeployStage,
    },
    format_lamports,
    logs::{
        log_divider,
        log_info,
        log_success,
        log_warning,
    },
    print_kv,
    transactions::CustomRpcClient,
};
use solana_sdk::{
    pubkey::Pubkey,
    signature::{
        Keypair,
        Signer,
    },
};

use super::Environment;

/// Deploys the program at `program_path` and creates a program-owned data account of
/// `data_space` bytes, recording both addresses. Does nothing if a deployment is already recorded.
///
/// A recorded upload without a data account, or an explicit `program_id`, skips straight to the
/// data account.
pub async fn deploy(
    env: &Environment,
    program_path: &Path,
    data_space: usize,
    program_id: Option<Pubkey>,
) -> anyhow::Result<()> {
    let program = match deploy_stage(&env.config_store, program_id)? {
        DeployStage::Deployed(record) => {
            log_warning(
                "Program has already been deployed",
                format!("{} with data account {}", record.program_id, record.account_id),
            );
            return Ok(());
        }
        DeployStage::CreateDataAccount(program_id) => {
            log_info("Resuming deployment of", program_id);
            Err(program_id)
        }
        DeployStage::UploadProgram => Ok(read_program(program_path).with_context(|| {
            format!(
                "No program at {}; build the on-chain program first",
                program_path.display()
            )
        })?),
    };
    let payer = env.signer()?;
    let rpc = env.connect().await?;

    log_divider();
    let program_id = match program {
        Ok(program) => upload(env, &rpc, &payer, &program).await?,
        Err(program_id) => program_id,
    };

    let data_account = Keypair::new();
    create_data_account(&rpc, &payer, &data_account, program_id, data_space)
        .await
        .with_context(|| {
            format!(
                "Failed to create the data account for program {program_id}; \
                 rerun `deploy` to retry"
            )
        })?;
    log_success("Data account", data_account.pubkey());

    let record = DeploymentRecord {
        program_id,
        account_id: data_account.pubkey(),
    };
    complete_deployment(&env.config_store, &record)?;
    log_info(
        "Saved deployment",
        env.config_store.path_for(RECURRING_PAYMENTS_RECORD).display(),
    );
    log_divider();

    Ok(())
}

/// Uploads the program and records its id before anything else can fail.
async fn upload(
    env: &Environment,
    rpc: &CustomRpcClient,
    payer: &Keypair,
    program: &[u8],
) -> anyhow::Result<Pubkey> {
    let estimate = estimate_deploy_cost(rpc, &payer.pubkey(), program.len()).await?;
    print_kv!("Estimated cost", format_lamports(estimate.total()));
    print_kv!("Buffer rent (refunded)", format_lamports(estimate.buffer_rent));

    let starting_balance = rpc.balance(&payer.pubkey()).await?;
    if starting_balance < estimate.total() + estimate.buffer_rent {
        log_warning(
            "Balance may not cover the deploy",
            format_lamports(starting_balance),
        );
    }

    let program_id = deploy_program(rpc, payer, program).await?;
    record_uploaded_program(&env.config_store, program_id)?;
    log_info(
        "Recorded upload",
        env.config_store.path_for(PENDING_DEPLOYMENT_RECORD).display(),
    );

    let after_deploy = rpc.balance(&payer.pubkey()).await?;
    log_success(
        "Program deployed",
        format!(
            "{program_id}, cost was {}",
            format_lamports(starting_balance.saturating_sub(after_deploy))
        ),
    );

    Ok(program_id)
}

async fn create_data_account(
    rpc: &CustomRpcClient,
    payer: &Keypair,
    data_account: &Keypair,
    program_id: Pubkey,
    data_space: usize,
) -> anyhow::Result<()> {
    let lamports = rpc.rent_exempt_minimum(data_space).await?;
    let create = RecurringPaymentsContext::new(program_id).create_program_account(
        &payer.pubkey(),
        &data_account.pubkey(),
        lamports,
        data_space,
    );
    rpc.send_and_confirm_txn(payer, &[data_account], &[create])
        .await?;
    Ok(())
}
