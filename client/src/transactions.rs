use std::{
    collections::HashSet,
    time::Duration,
};

use anyhow::Context;
use colored::Colorize;
use recurring_payments_interface::{
    error::RecurringPaymentsError,
    InstructionTag,
};
use solana_client::{
    client_error::{
        ClientError,
        ClientErrorKind,
    },
    nonblocking::rpc_client::RpcClient,
    rpc_request::{
        RpcError::RpcResponseError,
        RpcResponseErrorData,
    },
    rpc_response::RpcSimulateTransactionResult,
};
use solana_compute_budget_interface::ComputeBudgetInstruction;
use solana_instruction_error::InstructionError;
use solana_sdk::{
    message::{
        Instruction,
        Message,
    },
    pubkey::Pubkey,
    signature::{
        Keypair,
        Signature,
        Signer,
    },
    transaction::Transaction,
};
use solana_transaction_error::TransactionError;
use tokio::time::sleep;

use crate::{
    cluster::ClusterConfig,
    format_lamports,
    logs::{
        log_error,
        log_info,
        log_success,
        LogColor,
    },
};

const AIRDROP_CONFIRMATION_POLLS: usize = 20;
const AIRDROP_POLL_INTERVAL_MS: u64 = 500;

pub struct SendTransactionConfig {
    pub compute_budget: Option<u32>,
    pub debug_logs: Option<bool>,
    /// Programs whose custom errors are decoded as [`RecurringPaymentsError`]s on failure.
    pub program_id_filter: HashSet<Pubkey>,
}

impl Default for SendTransactionConfig {
    fn default() -> Self {
        SendTransactionConfig {
            compute_budget: Default::default(),
            debug_logs: Some(true),
            program_id_filter: Default::default(),
        }
    }
}

pub struct CustomRpcClient {
    pub client: RpcClient,
    pub config: SendTransactionConfig,
}

impl CustomRpcClient {
    pub fn new(cluster: &ClusterConfig, config: Option<SendTransactionConfig>) -> Self {
        Self {
            client: cluster.rpc_client(),
            config: config.unwrap_or_default(),
        }
    }

    /// Creates the client and checks the node answers by fetching its version.
    pub async fn connect(
        cluster: &ClusterConfig,
        config: Option<SendTransactionConfig>,
    ) -> anyhow::Result<Self> {
        let rpc = Self::new(cluster, config);
        let version = rpc
            .client
            .get_version()
            .await
            .with_context(|| format!("Couldn't connect to {}", cluster.url))?;
        log_info(
            "Connection to cluster established",
            format!("{} (version {})", cluster.url, version.solana_core),
        );
        Ok(rpc)
    }

    pub fn watch_program(&mut self, program_id: Pubkey) {
        self.config.program_id_filter.insert(program_id);
    }

    pub async fn balance(&self, address: &Pubkey) -> anyhow::Result<u64> {
        self.client
            .get_balance(address)
            .await
            .with_context(|| format!("Couldn't retrieve the balance of {address}"))
    }

    pub async fn rent_exempt_minimum(&self, space: usize) -> anyhow::Result<u64> {
        self.client
            .get_minimum_balance_for_rent_exemption(space)
            .await
            .with_context(|| format!("Couldn't fetch the rent-exempt minimum for {space} bytes"))
    }

    /// Requests an airdrop and polls for its confirmation. The request itself is never retried.
    pub async fn fund_account(&self, address: &Pubkey, lamports: u64) -> anyhow::Result<Signature> {
        let airdrop_signature = self
            .client
            .request_airdrop(address, lamports)
            .await
            .context("Failed to request airdrop")?;

        for _ in 0..AIRDROP_CONFIRMATION_POLLS {
            if self
                .client
                .confirm_transaction(&airdrop_signature)
                .await
                .context("Couldn't confirm transaction")?
            {
                log_success(
                    "Airdrop",
                    format!("{} to {address}", format_lamports(lamports)),
                );
                return Ok(airdrop_signature);
            }
            sleep(Duration::from_millis(AIRDROP_POLL_INTERVAL_MS)).await;
        }

        anyhow::bail!("Airdrop {airdrop_signature} wasn't confirmed in time")
    }

    pub async fn send_single_signer(
        &self,
        signer: &Keypair,
        instructions: impl AsRef<[Instruction]>,
    ) -> anyhow::Result<Signature> {
        self.send_and_confirm_txn(signer, &[], instructions.as_ref())
            .await
    }

    /// Signs with `payer` plus `signers` and sends the transaction, waiting for confirmation.
    pub async fn send_and_confirm_txn(
        &self,
        payer: &Keypair,
        signers: &[&Keypair],
        instructions: &[Instruction],
    ) -> anyhow::Result<Signature> {
        let bh = self
            .client
            .get_latest_blockhash()
            .await
            .context("Couldn't fetch the latest blockhash")?;

        let SendTransactionConfig {
            compute_budget,
            debug_logs,
            program_id_filter,
        } = &self.config;

        let budget_instructions = compute_budget.map_or(vec![], |budget| {
            vec![
                ComputeBudgetInstruction::set_compute_unit_limit(budget),
                ComputeBudgetInstruction::set_compute_unit_price(1),
            ]
        });
        let all_instructions = [budget_instructions, instructions.to_vec()].concat();
        let msg = Message::new(&all_instructions, Some(&payer.pubkey()));

        let mut tx = Transaction::new_unsigned(msg);
        tx.try_sign(
            &[std::iter::once(payer)
                .chain(signers.iter().cloned())
                .collect::<Vec<_>>()]
            .concat(),
            bh,
        )
        .context("Failed to sign transaction")?;

        match self.client.send_and_confirm_transaction(&tx).await {
            Ok(sig) => {
                if matches!(debug_logs, Some(true)) {
                    let sender_info =
                        format!("{}: {}", "sender".color(LogColor::Gray), payer.pubkey());
                    log_success("Signature", format!("{sig}\n{sender_info}"));
                }
                Ok(sig)
            }
            Err(error) => {
                log_instruction_error(&error, &all_instructions, program_id_filter);
                log_info("Payer", payer.pubkey());

                Err(error).context("Failed transaction submission")
            }
        }
    }
}

/// Logs the failing instruction of a preflight failure, decoding recurring-payments custom errors.
pub fn log_instruction_error(
    error: &ClientError,
    instructions: &[Instruction],
    program_id_filter: &HashSet<Pubkey>,
) {
    match describe_instruction_error(error, instructions, program_id_filter) {
        Some((label, msg)) => log_error(label, msg),
        None => log_error("Generic error", error),
    }
}

/// Extracts the failing instruction's index and error from a preflight simulation failure.
pub fn preflight_instruction_error(error: &ClientError) -> Option<(u8, InstructionError)> {
    let ClientErrorKind::RpcError(RpcResponseError {
        data:
            RpcResponseErrorData::SendTransactionPreflightFailure(RpcSimulateTransactionResult {
                err: Some(ui_err),
                ..
            }),
        ..
    }) = error.kind()
    else {
        return None;
    };

    match ui_err.clone().into() {
        TransactionError::InstructionError(ixn_idx, ixn_error) => Some((ixn_idx, ixn_error)),
        _ => None,
    }
}

/// Returns a log label and message for a failed instruction, or `None` when `error` isn't an
/// instruction error from preflight or its index is outside `instructions`.
///
/// `Custom(code)` errors from a program in `program_id_filter` are decoded as
/// [`RecurringPaymentsError`]s and paired with the instruction's tag.
pub fn describe_instruction_error(
    error: &ClientError,
    instructions: &[Instruction],
    program_id_filter: &HashSet<Pubkey>,
) -> Option<(&'static str, String)> {
    let (ixn_idx, ixn_error) = preflight_instruction_error(error)?;
    let instruction = instructions.get(ixn_idx as usize)?;
    Some(describe_failed_instruction(
        ixn_idx,
        &ixn_error,
        instruction,
        program_id_filter,
    ))
}

fn describe_failed_instruction(
    ixn_idx: u8,
    ixn_error: &InstructionError,
    instruction: &Instruction,
    program_id_filter: &HashSet<Pubkey>,
) -> (&'static str, String) {
    match ixn_error {
        InstructionError::Custom(code) if program_id_filter.contains(&instruction.program_id) => {
            let tag = instruction
                .data
                .first()
                .and_then(|tag| InstructionTag::try_from(*tag).ok())
                .map_or("UnknownInstruction".to_string(), |tag| tag.to_string());
            let msg = match RecurringPaymentsError::from_custom_code(*code) {
                Some(error) => format!("({tag}, {error})"),
                None => format!("({tag}, Custom({code}))"),
            };
            ("Recurring payments error", msg)
        }
        other => (
            "Instruction error",
            format!("#{ixn_idx} on {}: {other}", instruction.program_id),
        ),
    }
}

#[cfg(test)]
mod tests {
    use solana_sdk::instruction::AccountMeta;

    use super::*;

    fn preflight_failure(ixn_idx: u8, ixn_error: InstructionError) -> ClientError {
        let err: TransactionError = TransactionError::InstructionError(ixn_idx, ixn_error);
        let simulation: RpcSimulateTransactionResult = serde_json::from_value(serde_json::json!({
            "err": err,
            "logs": null,
            "accounts": null,
            "unitsConsumed": null,
            "returnData": null,
        }))
        .unwrap();

        ClientErrorKind::RpcError(RpcResponseError {
            code: -32002,
            message: "Transaction simulation failed".to_string(),
            data: RpcResponseErrorData::SendTransactionPreflightFailure(simulation),
        })
        .into()
    }

    fn instruction(program_id: Pubkey, tag: u8) -> Instruction {
        Instruction::new_with_bytes(
            program_id,
            &[tag; 17],
            vec![AccountMeta::new(Pubkey::new_unique(), false)],
        )
    }

    #[test]
    fn custom_errors_on_the_program_are_decoded_with_the_tag() {
        let program_id = Pubkey::new_unique();
        let instructions = [
            instruction(Pubkey::new_unique(), 0),
            instruction(program_id, 1),
        ];
        let error = preflight_failure(1, InstructionError::Custom(1));

        assert_eq!(
            describe_instruction_error(&error, &instructions, &HashSet::from([program_id])),
            Some((
                "Recurring payments error",
                "(CreateSubscriptionPlan, InvalidMaxAmount: Invalid max amount)".to_string()
            ))
        );
    }

    #[test]
    fn unknown_codes_and_tags_stay_raw() {
        let program_id = Pubkey::new_unique();
        let filter = HashSet::from([program_id]);

        let error = preflight_failure(0, InstructionError::Custom(77));
        let (_, msg) =
            describe_instruction_error(&error, &[instruction(program_id, 0)], &filter).unwrap();
        assert_eq!(msg, "(CreateSubscription, Custom(77))");

        let error = preflight_failure(0, InstructionError::Custom(0));
        let (_, msg) =
            describe_instruction_error(&error, &[instruction(program_id, 9)], &filter).unwrap();
        assert_eq!(msg, "(UnknownInstruction, InvalidInstruction: Invalid instruction)");
    }

    #[test]
    fn other_programs_use_the_plain_instruction_error() {
        let other = Pubkey::new_unique();
        let error = preflight_failure(0, InstructionError::Custom(1));
        let (label, msg) = describe_instruction_error(
            &error,
            &[instruction(other, 1)],
            &HashSet::from([Pubkey::new_unique()]),
        )
        .unwrap();

        assert_eq!(label, "Instruction error");
        assert!(msg.starts_with(&format!("#0 on {other}: ")));
    }

    #[test]
    fn out_of_range_instruction_index_is_undescribed() {
        let program_id = Pubkey::new_unique();
        let error = preflight_failure(5, InstructionError::Custom(1));
        assert_eq!(
            describe_instruction_error(
                &error,
                &[instruction(program_id, 1)],
                &HashSet::from([program_id])
            ),
            None
        );
    }

    #[test]
    fn non_preflight_errors_are_undescribed() {
        let error: ClientError = ClientErrorKind::Custom("connection refused".to_string()).into();
        assert_eq!(preflight_instruction_error(&error), None);
        assert_eq!(describe_instruction_error(&error, &[], &HashSet::new()), None);
    }
}
