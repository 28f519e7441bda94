use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::error::CoreError;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Intent {
    Empty,
    Deposit,
    Withdraw,
    Transfer,
    Bill,
    Support,
    Profile,
    Greeting,
    Unknown,
}

impl Intent {
    pub const COUNT: usize = 9;

    pub const ALL: [Intent; Intent::COUNT] = [
        Self::Empty,
        Self::Deposit,
        Self::Withdraw,
        Self::Transfer,
        Self::Bill,
        Self::Support,
        Self::Profile,
        Self::Greeting,
        Self::Unknown,
    ];

    pub fn as_code(self) -> &'static str {
        match self {
            Self::Empty => "empty",
            Self::Deposit => "deposit",
            Self::Withdraw => "withdraw",
            Self::Transfer => "transfer",
            Self::Bill => "bill",
            Self::Support => "support",
            Self::Profile => "profile",
            Self::Greeting => "greeting",
            Self::Unknown => "unknown",
        }
    }

    /// Position in [`Intent::ALL`], used to index per-intent counters.
    pub fn index(self) -> usize {
        self as usize
    }
}

impl fmt::Display for Intent {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_code())
    }
}

/// Deployment choice for what the bill rule answers.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum BillPolicy {
    #[default]
    Unavailable,
    Available,
}

impl BillPolicy {
    pub fn parse(value: &str) -> Option<Self> {
        match value.trim().to_lowercase().as_str() {
            "unavailable" | "disabled" | "off" | "false" => Some(Self::Unavailable),
            "available" | "enabled" | "on" | "true" => Some(Self::Available),
            _ => None,
        }
    }

    pub fn as_code(self) -> &'static str {
        match self {
            Self::Unavailable => "unavailable",
            Self::Available => "available",
        }
    }
}

impl FromStr for BillPolicy {
    type Err = CoreError;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        Self::parse(value).ok_or_else(|| CoreError::UnknownBillPolicy(value.trim().to_string()))
    }
}

/// One chat message as received from a caller. Lives for a single request.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct IncomingMessage {
    pub message: Option<String>,
}

impl IncomingMessage {
    pub fn as_deref(&self) -> Option<&str> {
        self.message.as_deref()
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ChatbotReply {
    pub reply: String,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct Classification {
    pub intent: Intent,
    pub reply: &'static str,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct RuleEntry {
    pub order: usize,
    pub intent: Intent,
    pub keywords: Vec<&'static str>,
    pub reply: &'static str,
}

/// Export of a rule table for clients that keep a local copy of the replies.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct RuleCatalog {
    pub bill_policy: BillPolicy,
    pub rules: Vec<RuleEntry>,
    pub empty_reply: &'static str,
    pub fallback_reply: &'static str,
    pub welcome_reply: &'static str,
    pub unavailable_reply: &'static str,
}
