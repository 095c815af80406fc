//! Loads a compiled program through the upgradeable loader: create a buffer, write the bytes in
//! chunks, then deploy from the buffer.

use std::{
    fs,
    path::Path,
};

use anyhow::Context;
use solana_loader_v3_interface::{
    instruction::{
        create_buffer,
        deploy_with_max_program_len,
        write,
    },
    state::UpgradeableLoaderState,
};
use solana_sdk::{
    message::Message,
    pubkey::Pubkey,
    signature::{
        Keypair,
        Signer,
    },
};

use crate::{
    config_store::{
        ConfigStore,
        DeploymentRecord,
        PendingDeployment,
        PENDING_DEPLOYMENT_RECORD,
        RECURRING_PAYMENTS_RECORD,
    },
    error::{
        StoreError,
        StoreResult,
    },
    logs::log_info,
    transactions::CustomRpcClient,
};

/// Bytes per loader `write`, small enough that one write fits in a single transaction.
pub const WRITE_CHUNK_SIZE: usize = 900;

/// Reads the compiled program. A missing file is [`StoreError::NotFound`].
pub fn read_program(path: &Path) -> Result<Vec<u8>, StoreError> {
    fs::read(path).map_err(|e| StoreError::io(path, e))
}

pub fn write_transaction_count(program_len: usize) -> usize {
    program_len.div_ceil(WRITE_CHUNK_SIZE)
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct DeployCost {
    /// Rent for the program account and its program data account.
    pub rent: u64,
    /// Rent briefly held by the buffer account; moved into the program data account on deploy.
    pub buffer_rent: u64,
    /// Signature fees across every transaction the deploy sends.
    pub fees: u64,
}

impl DeployCost {
    /// The lamports the payer ends up spending.
    pub fn total(&self) -> u64 {
        self.rent + self.fees
    }
}

/// Estimates what deploying a program of `program_len` bytes costs `payer`.
pub async fn estimate_deploy_cost(
    rpc: &CustomRpcClient,
    payer: &Pubkey,
    program_len: usize,
) -> anyhow::Result<DeployCost> {
    let programdata_rent = rpc
        .rent_exempt_minimum(UpgradeableLoaderState::size_of_programdata(program_len))
        .await?;
    let program_rent = rpc
        .rent_exempt_minimum(UpgradeableLoaderState::size_of_program())
        .await?;
    let buffer_rent = rpc
        .rent_exempt_minimum(UpgradeableLoaderState::size_of_buffer(program_len))
        .await?;

    // A write is signed by the payer alone, so its fee is the price of one signature.
    let sample = Message::new(
        &[write(
            &Pubkey::new_unique(),
            payer,
            0,
            vec![0; WRITE_CHUNK_SIZE],
        )],
        Some(payer),
    );
    let fee_per_signature = rpc
        .client
        .get_fee_for_message(&sample)
        .await
        .context("Couldn't fetch the fee for a write transaction")?;

    // The buffer creation and the deploy are each signed twice.
    let signatures = write_transaction_count(program_len) as u64 + 2 * 2;
    let fees = fee_per_signature * signatures;

    Ok(DeployCost {
        rent: programdata_rent + program_rent,
        buffer_rent,
        fees,
    })
}

/// How far a deployment got, according to the config store.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum DeployStage {
    /// Nothing deployed yet.
    UploadProgram,
    /// The program is on chain but its data account was never created.
    CreateDataAccount(Pubkey),
    Deployed(DeploymentRecord),
}

/// Reads the deployment state. A completed record wins over everything, then `program_id`, then
/// a pending upload.
pub fn deploy_stage(store: &ConfigStore, program_id: Option<Pubkey>) -> StoreResult<DeployStage> {
    if let Some(record) = store.load_optional::<DeploymentRecord>(RECURRING_PAYMENTS_RECORD)? {
        return Ok(DeployStage::Deployed(record));
    }
    if let Some(program_id) = program_id {
        return Ok(DeployStage::CreateDataAccount(program_id));
    }
    Ok(
        match store.load_optional::<PendingDeployment>(PENDING_DEPLOYMENT_RECORD)? {
            Some(pending) => DeployStage::CreateDataAccount(pending.program_id),
            None => DeployStage::UploadProgram,
        },
    )
}

/// Records an uploaded program so a failure before [`complete_deployment`] can resume from it.
pub fn record_uploaded_program(store: &ConfigStore, program_id: Pubkey) -> StoreResult<()> {
    store.save(PENDING_DEPLOYMENT_RECORD, &PendingDeployment { program_id })
}

/// Saves the finished deployment and drops the pending upload.
pub fn complete_deployment(store: &ConfigStore, record: &DeploymentRecord) -> StoreResult<()> {
    store.save(RECURRING_PAYMENTS_RECORD, record)?;
    store.remove(PENDING_DEPLOYMENT_RECORD)
}

/// Deploys `program` with `payer` as the upgrade authority and returns the program id.
///
/// Transactions are sent one at a time; an interruption part way through leaves a funded buffer
/// account behind.
pub async fn deploy_program(
    rpc: &CustomRpcClient,
    payer: &Keypair,
    program: &[u8],
) -> anyhow::Result<Pubkey> {
    let buffer = Keypair::new();
    let program_account = Keypair::new();
    let authority = payer.pubkey();
    log_info("Program account", program_account.pubkey());

    let buffer_rent = rpc
        .rent_exempt_minimum(UpgradeableLoaderState::size_of_buffer(program.len()))
        .await?;
    let create = create_buffer(
        &payer.pubkey(),
        &buffer.pubkey(),
        &authority,
        buffer_rent,
        program.len(),
    )
    .map_err(|e| anyhow::anyhow!("Couldn't build the buffer instructions: {e}"))?;
    rpc.send_and_confirm_txn(payer, &[&buffer], &create)
        .await
        .context("Failed to create the program buffer")?;

    let chunks = write_transaction_count(program.len());
    for (i, chunk) in program.chunks(WRITE_CHUNK_SIZE).enumerate() {
        let offset = u32::try_from(i * WRITE_CHUNK_SIZE).context("Program is too large")?;
        let instruction = write(&buffer.pubkey(), &authority, offset, chunk.to_vec());
        rpc.send_single_signer(payer, [instruction])
            .await
            .with_context(|| format!("Failed to write chunk {}/{chunks}", i + 1))?;
    }

    let program_rent = rpc
        .rent_exempt_minimum(UpgradeableLoaderState::size_of_program())
        .await?;
    let deploy = deploy_with_max_program_len(
        &payer.pubkey(),
        &program_account.pubkey(),
        &buffer.pubkey(),
        &authority,
        program_rent,
        program.len(),
    )
    .map_err(|e| anyhow::anyhow!("Couldn't build the deploy instructions: {e}"))?;
    rpc.send_and_confirm_txn(payer, &[&program_account], &deploy)
        .await
        .context("Failed to deploy the program")?;

    Ok(program_account.pubkey())
}

#[cfg(test)]
mod tests {
    use std::path::PathBuf;

    use super::*;

    fn scratch_store(name: &str) -> ConfigStore {
        let dir: PathBuf =
            std::env::temp_dir().join(format!("rp-deploy-{name}-{}", std::process::id()));
        let _ = fs::remove_dir_all(&dir);
        ConfigStore::new(dir)
    }

    #[test]
    fn upload_is_recorded_before_the_data_account() {
        let store = scratch_store("stages");
        assert_eq!(deploy_stage(&store, None).unwrap(), DeployStage::UploadProgram);

        let program_id = Pubkey::new_unique();
        record_uploaded_program(&store, program_id).unwrap();
        // A failure here leaves the upload resumable instead of paying for it again.
        assert_eq!(
            deploy_stage(&store, None).unwrap(),
            DeployStage::CreateDataAccount(program_id)
        );

        let record = DeploymentRecord {
            program_id,
            account_id: Pubkey::new_unique(),
        };
        complete_deployment(&store, &record).unwrap();
        assert_eq!(
            deploy_stage(&store, None).unwrap(),
            DeployStage::Deployed(record)
        );
        assert!(!store.contains(PENDING_DEPLOYMENT_RECORD));
    }

    #[test]
    fn explicit_program_id_skips_the_upload() {
        let store = scratch_store("explicit");
        let program_id = Pubkey::new_unique();
        assert_eq!(
            deploy_stage(&store, Some(program_id)).unwrap(),
            DeployStage::CreateDataAccount(program_id)
        );

        let record = DeploymentRecord {
            program_id: Pubkey::new_unique(),
            account_id: Pubkey::new_unique(),
        };
        complete_deployment(&store, &record).unwrap();
        assert_eq!(
            deploy_stage(&store, Some(program_id)).unwrap(),
            DeployStage::Deployed(record)
        );
    }

    #[test]
    fn write_count_rounds_up() {
        assert_eq!(write_transaction_count(0), 0);
        assert_eq!(write_transaction_count(1), 1);
        assert_eq!(write_transaction_count(WRITE_CHUNK_SIZE), 1);
        assert_eq!(write_transaction_count(WRITE_CHUNK_SIZE + 1), 2);
    }

    #[test]
    fn missing_program_file_is_not_found() {
        let err = read_program(Path::new("target/deploy/does-not-exist.so")).unwrap_err();
        assert!(err.is_not_found());
    }

    #[test]
    fn total_excludes_the_reclaimed_buffer() {
        let cost = DeployCost {
            rent: 10,
            buffer_rent: 1_000,
            fees: 5,
        };
        assert_eq!(cost.total(), 15);
    }
}
