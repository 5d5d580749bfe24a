//! `/noted/{coin}/{tx}`: downstream acknowledgment of a deposit.

use std::sync::Arc;

use crate::application::ports::{DepositReader, DepositWriter};
use crate::domain::services::Clock;

pub struct NoteDepositUseCase<C: Clock> {
    clock: Arc<C>,
    deposits: Arc<dyn DepositReader>,
    deposits_writer: Arc<dyn DepositWriter>,
}

impl<C: Clock> NoteDepositUseCase<C> {
    pub fn new(
        clock: Arc<C>,
        deposits: Arc<dyn DepositReader>,
        deposits_writer: Arc<dyn DepositWriter>,
    ) -> Self {
        Self {
            clock,
            deposits,
            deposits_writer,
        }
    }

    /// Returns `true` if a matching deposit was found and marked noted.
    /// A miss is not an error: callers render the "no such transaction"
    /// acknowledgment instead of a failure response.
    pub async fn execute(&self, coin_name: &str, txid: &str) -> bool {
        let matches = self.deposits.list_by_txid(coin_name, txid).await;
        if matches.is_empty() {
            return false;
        }
        let now = self.clock.now();
        for mut deposit in matches {
            deposit.mark_noted(now);
            self.deposits_writer.save(deposit).await;
        }
        true
    }
}
