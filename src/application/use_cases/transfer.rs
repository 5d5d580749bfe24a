//! `/transfer` use case: an all-or-nothing batch of internal book transfers.

use std::collections::{HashMap, HashSet};
use std::sync::Arc;

use rust_decimal::Decimal;
use uuid::Uuid;

use crate::application::ports::{AddressRegistry, AddressRepository, CoinSettingsRepository};
use crate::domain::entities::DepositAddress;
use crate::domain::services::Clock;
use crate::domain::value_objects::RefUuid;

#[derive(Debug, Clone)]
pub struct TransferLine {
    pub coin_name: String,
    pub from_address: String,
    pub to_address: String,
    pub amount: Decimal,
    pub remark: String,
}

#[derive(Debug, Clone)]
pub struct TransferCommand {
    pub api_id: Uuid,
    pub lines: Vec<TransferLine>,
}

#[derive(Debug, Clone)]
pub struct TransferResult {
    pub ref_uuid: String,
    pub processed: usize,
}

#[derive(Debug, Clone)]
pub struct LineError {
    pub index: usize,
    pub coin_name: String,
    pub reason: String,
}

impl LineError {
    /// Wire form used by the batch-transfer error list: `"{coin}, {reason}"`.
    pub fn display(&self) -> String {
        if self.coin_name.is_empty() {
            self.reason.clone()
        } else {
            format!("{}, {}", self.coin_name, self.reason)
        }
    }
}

pub struct TransferUseCase<C: Clock> {
    clock: Arc<C>,
    addresses: Arc<dyn AddressRepository>,
    transfers: Arc<dyn crate::application::ports::TransferRepository>,
    coin_settings: Arc<dyn CoinSettingsRepository>,
    registry: Arc<dyn AddressRegistry>,
}

impl<C: Clock> TransferUseCase<C> {
    pub fn new(
        clock: Arc<C>,
        addresses: Arc<dyn AddressRepository>,
        transfers: Arc<dyn crate::application::ports::TransferRepository>,
        coin_settings: Arc<dyn CoinSettingsRepository>,
        registry: Arc<dyn AddressRegistry>,
    ) -> Self {
        Self {
            clock,
            addresses,
            transfers,
            coin_settings,
            registry,
        }
    }

    pub async fn execute(
        &self,
        cmd: TransferCommand,
    ) -> Result<TransferResult, Vec<LineError>> {
        if cmd.lines.is_empty() {
            return Err(vec![LineError {
                index: 0,
                coin_name: String::new(),
                reason: "empty transfer batch.".into(),
            }]);
        }

        let mut scratch: HashMap<(String, String), Decimal> = HashMap::new();
        let mut resolved: HashMap<(String, String), DepositAddress> = HashMap::new();
        let mut seen_pairs: HashSet<String> = HashSet::new();
        let mut errors = Vec::new();

        for (index, line) in cmd.lines.iter().enumerate() {
            if let Err(reason) = self
                .validate_line(line, &cmd.api_id, &mut scratch, &mut resolved, &mut seen_pairs)
                .await
            {
                errors.push(LineError {
                    index,
                    coin_name: line.coin_name.clone(),
                    reason,
                });
            }
        }

        if !errors.is_empty() {
            return Err(errors);
        }

        let ref_uuid = RefUuid::new();
        let now = self.clock.now();

        for line in &cmd.lines {
            let from_key = (line.coin_name.clone(), line.from_address.clone());
            let to_key = (line.coin_name.clone(), line.to_address.clone());

            let mut from = resolved.get(&from_key).cloned().expect("validated above");
            from.debit_transfer_out(line.amount);
            resolved.insert(from_key.clone(), from);

            let mut to = resolved.get(&to_key).cloned().expect("validated above");
            to.credit_transfer_in(line.amount);
            resolved.insert(to_key.clone(), to);
        }

        for address in resolved.into_values() {
            self.addresses.save(address).await;
        }

        for line in &cmd.lines {
            let from = self
                .registry
                .lookup(&line.coin_name, &line.from_address)
                .await
                .expect("validated above");
            let to = self
                .registry
                .lookup(&line.coin_name, &line.to_address)
                .await
                .expect("validated above");
            let transfer = crate::domain::entities::Transfer::new(
                cmd.api_id,
                line.from_address.clone(),
                from.id,
                line.to_address.clone(),
                to.id,
                line.amount,
                line.coin_name.clone(),
                line.remark.clone(),
                ref_uuid,
                now,
            );
            self.transfers.save(transfer).await;
        }

        self.registry.refresh().await;

        Ok(TransferResult {
            ref_uuid: ref_uuid.to_string(),
            processed: cmd.lines.len(),
        })
    }

    #[allow(clippy::too_many_arguments)]
    async fn validate_line(
        &self,
        line: &TransferLine,
        api_id: &Uuid,
        scratch: &mut HashMap<(String, String), Decimal>,
        resolved: &mut HashMap<(String, String), DepositAddress>,
        seen_pairs: &mut HashSet<String>,
    ) -> Result<(), String> {
        if line.remark.len() > 99 {
            return Err("remark too long.".into());
        }
        if line.from_address == line.to_address {
            return Err("from and to address are the same.".into());
        }

        let settings = self
            .coin_settings
            .get(&line.coin_name)
            .await
            .ok_or_else(|| "coin not in the supported list!".to_string())?;
        if line.amount < settings.min_transfer || line.amount > settings.max_transfer {
            return Err("amount outside allowed range.".into());
        }

        let pair_key = crate::domain::entities::Transfer::unordered_pair_key(
            &line.coin_name,
            &line.from_address,
            &line.to_address,
        );
        if !seen_pairs.insert(pair_key) {
            return Err("loop transfer detected.".into());
        }

        let from_key = (line.coin_name.clone(), line.from_address.clone());
        let to_key = (line.coin_name.clone(), line.to_address.clone());

        let from_addr = match resolved.get(&from_key) {
            Some(a) => a.clone(),
            None => {
                let addr = self
                    .registry
                    .lookup(&line.coin_name, &line.from_address)
                    .await
                    .ok_or_else(|| "from_address not in registry.".to_string())?;
                resolved.insert(from_key.clone(), addr.clone());
                scratch.insert(from_key.clone(), addr.raw_balance());
                addr
            }
        };
        if from_addr.api_id != *api_id {
            return Err("you do not own from_address.".into());
        }

        if !resolved.contains_key(&to_key) {
            let addr = self
                .registry
                .lookup(&line.coin_name, &line.to_address)
                .await
                .ok_or_else(|| "to_address not in registry.".to_string())?;
            scratch.insert(to_key.clone(), addr.raw_balance());
            resolved.insert(to_key.clone(), addr);
        }

        let from_balance = scratch.get_mut(&from_key).expect("inserted above");
        *from_balance -= line.amount;
        if *from_balance < Decimal::ZERO {
            return Err("insufficient balance for this transfer.".into());
        }

        let to_balance = scratch.get_mut(&to_key).expect("inserted above");
        *to_balance += line.amount;

        Ok(())
    }
}
