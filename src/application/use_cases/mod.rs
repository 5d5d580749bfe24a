mod get_balance;
mod hold_balance;
mod issue_address;
mod list_queries;
mod note_deposit;
mod status;
mod transfer;
mod withdraw;

pub use get_balance::{GetBalanceError, GetBalanceQuery, GetBalanceUseCase};
pub use hold_balance::{HoldBalanceCommand, HoldBalanceError, HoldBalanceUseCase};
pub use issue_address::{IssueAddressCommand, IssueAddressError, IssueAddressResult, IssueAddressUseCase};
pub use list_queries::{ListQueriesError, ListQueriesUseCase};
pub use note_deposit::NoteDepositUseCase;
pub use status::{CoinStatus, StatusUseCase};
pub use transfer::{LineError, TransferCommand, TransferLine, TransferResult, TransferUseCase};
pub use withdraw::{WithdrawCommand, WithdrawError, WithdrawResult, WithdrawUseCase};
