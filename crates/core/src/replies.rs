//! Canned reply texts. Returned verbatim, never templated.

use crate::models::BillPolicy;

pub const EMPTY: &str = "Please enter a message so I can help you.";

pub const DEPOSIT: &str = "To deposit money, open Transactions > Deposit, enter amount, and submit.";

pub const WITHDRAW: &str =
    "For withdrawal, open Transactions > Withdrawal, enter amount, and submit.";

pub const TRANSFER: &str = "For transfer, open Transactions > Transfer, enter destination account number and amount, then submit.";

pub const BILL_UNAVAILABLE: &str = "Bill payment is not available in the current application.";

pub const BILL_AVAILABLE: &str =
    "To pay a bill, open Transactions > Bill Payment, choose the biller, enter amount, and submit.";

pub const SUPPORT: &str = "Open Customer Support > Create Ticket, add subject and issue details, then create the ticket.";

pub const PROFILE: &str = "Your dashboard profile card shows account number, address, phone number, and current balance.";

pub const GREETING: &str =
    "Hello! Ask me about deposits, withdrawals, transfers, profile details, or support tickets.";

pub const FALLBACK: &str = "I can help with transactions, profile details, and support tickets.";

pub const UNAVAILABLE: &str = "I am temporarily unavailable. Please try again shortly.";

const WELCOME: &str = "Hello! I can help with deposits, withdrawals, transfers, and support tickets.";

const WELCOME_WITH_BILLS: &str =
    "Hello! I can help with deposits, withdrawals, transfers, and bill payments.";

pub fn bill(policy: BillPolicy) -> &'static str {
    match policy {
        BillPolicy::Unavailable => BILL_UNAVAILABLE,
        BillPolicy::Available => BILL_AVAILABLE,
    }
}

/// First bubble a chat client shows. Only advertises bill payments when they exist.
pub fn welcome(policy: BillPolicy) -> &'static str {
    match policy {
        BillPolicy::Unavailable => WELCOME,
        BillPolicy::Available => WELCOME_WITH_BILLS,
    }
}
