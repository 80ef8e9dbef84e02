//! Optional rule-set extension blocks.
//!
//! A config carries at most one: anchor regex rules under `regexConfig`, or
//! value separators under `separadores`.

pub mod anchor;
pub mod separators;

use serde::{Deserialize, Serialize};
use tracing::warn;

use crate::error::Result;

pub use anchor::{ApplyMode, RegexRule, StopKind, StopLine};
pub use separators::{Separator, SeparatorDraft};

/// Exported rule block, flattened into the top level of the config.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum RuleSet {
    #[serde(rename = "regexConfig")]
    Regex(Vec<RegexRule>),
    #[serde(rename = "separadores")]
    Separators(Vec<Separator>),
}

/// Rule block as edited, before cleaning.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum RuleDrafts {
    #[serde(rename = "regexConfig")]
    Regex(Vec<RegexRule>),
    #[serde(rename = "separadores")]
    Separators(Vec<SeparatorDraft>),
}

impl RuleDrafts {
    /// Clean the drafts into an exportable block.
    ///
    /// Regex rules with nothing exportable give `None`; separators with
    /// nothing complete are an error.
    pub fn export(&self) -> Result<Option<RuleSet>> {
        match self {
            RuleDrafts::Regex(rules) => {
                let exported = anchor::export_rules(rules);
                if exported.is_empty() {
                    warn!(drafts = rules.len(), "no regex rule is complete; block omitted");
                    return Ok(None);
                }
                Ok(Some(RuleSet::Regex(exported)))
            }
            RuleDrafts::Separators(drafts) => Ok(Some(RuleSet::Separators(
                separators::export_separators(drafts)?,
            ))),
        }
    }
}
