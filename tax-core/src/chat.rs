//! Scripted follow-up answers about a calculation.
//!
//! Questions are matched against an ordered list of keyword rules; the
//! first rule that matches picks the template. Keywords are Portuguese or
//! English and case-insensitive. Verb and noun stems match any inflection
//! (`venc` covers "vence" and "vencimentos"); short tax names and `real`
//! only match as whole words.

use std::sync::LazyLock;

use chrono::{DateTime, Utc};
use regex::Regex;
use serde::{Deserialize, Serialize};

use crate::models::TaxCalculation;

/// How many taxes the deadline answer lists.
const DEADLINE_PREVIEW: usize = 3;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ChatRole {
    User,
    Assistant,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ChatMessage {
    pub id: String,
    pub role: ChatRole,
    pub content: String,
    pub timestamp: DateTime<Utc>,
}

/// What a question was recognised as being about.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ChatTopic {
    Savings,
    Deadlines,
    Categories,
    Regime,
    General,
}

struct ChatRule {
    topic: ChatTopic,
    pattern: Regex,
}

static RULES: LazyLock<Vec<ChatRule>> = LazyLock::new(|| {
    [
        (
            ChatTopic::Savings,
            r"(?i)\b(?:reduz|reduç|reduc|diminu|econom|sav|lower)\w*",
        ),
        (
            ChatTopic::Deadlines,
            r"(?i)\b(?:(?:prazo|venc|deadline)\w*|quando|when|due)\b",
        ),
        (
            ChatTopic::Categories,
            r"(?i)\b(?:icms|iss|states?|(?:federa|estadua|munic[ií]p)\w*)\b",
        ),
        (ChatTopic::Regime, r"(?i)\b(?:simples|presumid[oa]s?|real|regimes?)\b"),
    ]
    .into_iter()
    .map(|(topic, pattern)| ChatRule {
        topic,
        pattern: Regex::new(pattern).expect("Invalid chat rule pattern"),
    })
    .collect()
});

/// First matching topic, or [`ChatTopic::General`].
pub fn classify(question: &str) -> ChatTopic {
    RULES
        .iter()
        .find(|rule| rule.pattern.is_match(question))
        .map(|rule| rule.topic)
        .unwrap_or(ChatTopic::General)
}

/// Canned answer to `question` in the context of `calculation`.
pub fn respond(
    question: &str,
    calculation: &TaxCalculation,
) -> String {
    let client = &calculation.client;

    match classify(question) {
        ChatTopic::Savings => format!(
            "To reduce the tax burden of {}, a few strategies are worth considering:\n\n\
             1. **Tax planning**: review the current regime enrollment\n\
             2. **Legal deductions**: use every tax incentive available\n\
             3. **Timing**: schedule revenue and expenses strategically\n\n\
             A more detailed review focused on the {} sector is recommended.",
            client.name,
            client.sector.label().to_lowercase()
        ),
        ChatTopic::Deadlines => {
            let deadlines: Vec<String> = calculation
                .line_items
                .iter()
                .take(DEADLINE_PREVIEW)
                .map(|item| format!("• {}: {}", item.name, item.due_date))
                .collect();
            format!(
                "The main deadlines for {} are:\n\n{}\n\n\
                 Keep the tax calendar up to date to avoid fines and interest.",
                client.name,
                deadlines.join("\n")
            )
        }
        ChatTopic::Categories => "Based on this calculation, the taxes are grouped by sphere:\n\n\
             • **National**: IRPJ, CSLL, PIS, COFINS, INSS Patronal\n\
             • **State**: ICMS (when applicable)\n\
             • **Municipal**: ISS (for service providers)\n\n\
             Each sphere has its own rules and deadlines. Want details on a specific one?"
            .to_string(),
        ChatTopic::Regime => format!(
            "The current regime ({}) was taken into account in this calculation.\n\n\
             Some points to keep in mind:\n\
             • Each regime has its own rates and rules\n\
             • A regime change should be evaluated every year\n\
             • Simples Nacional tends to pay off for lower revenues\n\n\
             Would you like to simulate other regimes?",
            client.company_type.label()
        ),
        ChatTopic::General => format!(
            "I understood your question about \"{}\".\n\n\
             Based on the calculation for {}, I can help with:\n\
             • Details on specific taxes\n\
             • Tax planning strategies\n\
             • Deadlines and obligations\n\
             • Comparing regimes\n\n\
             How can I be more specific?",
            question.trim(),
            client.name
        ),
    }
}
