use once_cell::sync::Lazy;

use crate::models::{BillPolicy, Classification, Intent, RuleCatalog, RuleEntry};
use crate::replies;

static DEFAULT_RULES: Lazy<RuleTable> = Lazy::new(RuleTable::default);

/// Lower-cases the raw text. Absent input becomes the empty string.
pub fn normalize_message(raw: Option<&str>) -> String {
    raw.unwrap_or_default().to_lowercase()
}

/// Blank after trimming whitespace and byte-order marks.
pub fn is_effectively_empty(normalized: &str) -> bool {
    normalized
        .trim_matches(|ch: char| ch.is_whitespace() || ch == '\u{feff}')
        .is_empty()
}

/// Reply for `raw` using the default rule table.
pub fn classify(raw: Option<&str>) -> &'static str {
    DEFAULT_RULES.reply(raw)
}

pub fn classify_intent(raw: Option<&str>) -> Intent {
    DEFAULT_RULES.classify(raw).intent
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct IntentRule {
    pub intent: Intent,
    pub keywords: &'static [&'static str],
    pub reply: &'static str,
}

impl IntentRule {
    pub const fn new(
        intent: Intent,
        keywords: &'static [&'static str],
        reply: &'static str,
    ) -> Self {
        Self {
            intent,
            keywords,
            reply,
        }
    }

    /// Plain substring containment against an already lower-cased message.
    pub fn matches(&self, normalized: &str) -> bool {
        contains_any(normalized, self.keywords)
    }
}

/// Ordered keyword rules. The first rule with a keyword hit decides the reply.
#[derive(Debug, Clone)]
pub struct RuleTable {
    rules: Vec<IntentRule>,
    bill_policy: BillPolicy,
}

impl RuleTable {
    pub fn new(bill_policy: BillPolicy) -> Self {
        Self::from_rules(
            vec![
                IntentRule::new(Intent::Deposit, &["deposit"], replies::DEPOSIT),
                IntentRule::new(Intent::Withdraw, &["withdraw"], replies::WITHDRAW),
                IntentRule::new(Intent::Transfer, &["transfer"], replies::TRANSFER),
                IntentRule::new(Intent::Bill, &["bill"], replies::bill(bill_policy)),
                IntentRule::new(Intent::Support, &["ticket", "support"], replies::SUPPORT),
                IntentRule::new(
                    Intent::Profile,
                    &["balance", "account", "address", "phone"],
                    replies::PROFILE,
                ),
                IntentRule::new(Intent::Greeting, &["hello", "hi"], replies::GREETING),
            ],
            bill_policy,
        )
    }

    pub fn from_rules(rules: Vec<IntentRule>, bill_policy: BillPolicy) -> Self {
        Self { rules, bill_policy }
    }

    pub fn rules(&self) -> &[IntentRule] {
        &self.rules
    }

    pub fn bill_policy(&self) -> BillPolicy {
        self.bill_policy
    }

    pub fn classify(&self, raw: Option<&str>) -> Classification {
        let normalized = normalize_message(raw);

        if is_effectively_empty(&normalized) {
            return Classification {
                intent: Intent::Empty,
                reply: replies::EMPTY,
            };
        }

        self.rules
            .iter()
            .find(|rule| rule.matches(&normalized))
            .map(|rule| Classification {
                intent: rule.intent,
                reply: rule.reply,
            })
            .unwrap_or(Classification {
                intent: Intent::Unknown,
                reply: replies::FALLBACK,
            })
    }

    pub fn reply(&self, raw: Option<&str>) -> &'static str {
        self.classify(raw).reply
    }

    pub fn catalog(&self) -> RuleCatalog {
        RuleCatalog {
            bill_policy: self.bill_policy,
            rules: self
                .rules
                .iter()
                .enumerate()
                .map(|(position, rule)| RuleEntry {
                    order: position + 1,
                    intent: rule.intent,
                    keywords: rule.keywords.to_vec(),
                    reply: rule.reply,
                })
                .collect(),
            empty_reply: replies::EMPTY,
            fallback_reply: replies::FALLBACK,
            welcome_reply: replies::welcome(self.bill_policy),
            unavailable_reply: replies::UNAVAILABLE,
        }
    }
}

impl Default for RuleTable {
    fn default() -> Self {
        Self::new(BillPolicy::default())
    }
}

fn contains_any(input: &str, needles: &[&str]) -> bool {
    needles.iter().any(|needle| input.contains(needle))
}
