//! Anchor/stop-line regex rules (`regexConfig` block).

use regex::Regex;
use serde::{Deserialize, Serialize};
use tracing::warn;

use crate::error::Result;

/// Where the rule's regex applies.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ApplyMode {
    /// Only at the anchor row.
    #[default]
    Inicial,
    /// At the anchor and the rows below it, until a stop line.
    Abaixo,
}

/// What happens when a stop line matches.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum StopKind {
    /// Halt processing.
    #[default]
    PararTotal,
    /// Apply the stop-line regex once, then halt.
    AplicarEParar,
    /// Apply the stop-line regex, then continue with a nested rule.
    IgnorarEContinuar,
}

impl StopKind {
    /// Kinds that carry their own stop-line regex.
    pub fn applies_regex(&self) -> bool {
        matches!(self, StopKind::AplicarEParar | StopKind::IgnorarEContinuar)
    }
}

/// Row that ends (or redirects) a rule.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct StopLine {
    pub nome: String,
    pub tipo: StopKind,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub regex_linha_parada: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub nova_configuracao_abaixo: Option<Box<RegexRule>>,
}

impl StopLine {
    pub fn new(nome: impl Into<String>, tipo: StopKind) -> Self {
        Self {
            nome: nome.into(),
            tipo,
            ..Default::default()
        }
    }

    /// Change the kind, dropping fields the new kind does not use.
    pub fn set_kind(&mut self, tipo: StopKind) {
        self.tipo = tipo;
        if tipo == StopKind::PararTotal {
            self.regex_linha_parada = None;
        }
        if tipo != StopKind::IgnorarEContinuar {
            self.nova_configuracao_abaixo = None;
        }
    }

    /// Stop-line patterns, split on commas and newlines.
    pub fn patterns(&self) -> Vec<String> {
        self.regex_linha_parada
            .as_deref()
            .map(parse_variations)
            .unwrap_or_default()
    }

    fn has_regex(&self) -> bool {
        self.regex_linha_parada
            .as_deref()
            .is_some_and(|r| !r.is_empty())
    }
}

/// One anchor rule with its variations and optional stop line.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RegexRule {
    pub inicio: String,
    #[serde(default)]
    pub variacoes: Vec<String>,
    #[serde(default)]
    pub regex_ativado: bool,
    #[serde(default)]
    pub aplicar_regex: ApplyMode,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub linha_parada: Option<StopLine>,
}

impl RegexRule {
    pub fn new(inicio: impl Into<String>) -> Self {
        Self {
            inicio: inicio.into(),
            ..Default::default()
        }
    }

    /// Replace variations from free text (comma or newline separated).
    pub fn set_variations(&mut self, text: &str) {
        self.variacoes = parse_variations(text);
    }

    /// Turning the regex off resets the apply mode.
    pub fn set_regex_enabled(&mut self, enabled: bool) {
        self.regex_ativado = enabled;
        if !enabled {
            self.aplicar_regex = ApplyMode::Inicial;
        }
    }

    /// Switching to `Inicial` drops the stop line.
    pub fn set_apply_mode(&mut self, mode: ApplyMode) {
        self.aplicar_regex = mode;
        if mode == ApplyMode::Inicial {
            self.linha_parada = None;
        }
    }

    /// Complete enough to export: has an anchor and variations, and a
    /// stop line in use is filled in for its kind.
    pub fn is_valid(&self) -> bool {
        if self.inicio.trim().is_empty() || self.variacoes.is_empty() {
            return false;
        }

        let stop = match &self.linha_parada {
            Some(stop) if self.regex_ativado && self.aplicar_regex == ApplyMode::Abaixo => stop,
            _ => return true,
        };

        if stop.nome.trim().is_empty() {
            return false;
        }
        match stop.tipo {
            StopKind::PararTotal => true,
            StopKind::AplicarEParar => stop.has_regex(),
            StopKind::IgnorarEContinuar => {
                if !stop.has_regex() {
                    return false;
                }
                match &stop.nova_configuracao_abaixo {
                    Some(nested) => !nested.inicio.trim().is_empty() && !nested.variacoes.is_empty(),
                    None => true,
                }
            }
        }
    }

    /// Trimmed copy for export.
    ///
    /// Blank variations go; an unnamed stop line goes; the stop-line regex
    /// is kept only for kinds that apply it; a nested rule is kept only for
    /// `IgnorarEContinuar` when it has an anchor and variations.
    pub fn cleaned(&self) -> RegexRule {
        let linha_parada = self
            .linha_parada
            .as_ref()
            .filter(|stop| !stop.nome.trim().is_empty())
            .map(|stop| StopLine {
                nome: stop.nome.trim().to_string(),
                tipo: stop.tipo,
                regex_linha_parada: stop
                    .regex_linha_parada
                    .as_deref()
                    .map(str::trim)
                    .filter(|r| !r.is_empty() && stop.tipo.applies_regex())
                    .map(String::from),
                nova_configuracao_abaixo: stop
                    .nova_configuracao_abaixo
                    .as_ref()
                    .filter(|_| stop.tipo == StopKind::IgnorarEContinuar)
                    .map(|nested| nested.cleaned())
                    .filter(|nested| !nested.inicio.is_empty() && !nested.variacoes.is_empty())
                    .map(Box::new),
            });

        RegexRule {
            inicio: self.inicio.trim().to_string(),
            variacoes: self
                .variacoes
                .iter()
                .map(|v| v.trim())
                .filter(|v| !v.is_empty())
                .map(String::from)
                .collect(),
            regex_ativado: self.regex_ativado,
            aplicar_regex: self.aplicar_regex,
            linha_parada,
        }
    }

    /// Stop-line patterns here or in nested rules that do not compile.
    pub fn invalid_patterns(&self) -> Vec<String> {
        let mut invalid = Vec::new();
        if let Some(stop) = &self.linha_parada {
            invalid.extend(stop.patterns().into_iter().filter(|p| Regex::new(p).is_err()));
            if let Some(nested) = &stop.nova_configuracao_abaixo {
                invalid.extend(nested.invalid_patterns());
            }
        }
        invalid
    }

    /// Compile every stop-line pattern in this rule and its nested rules.
    pub fn check_patterns(&self) -> Result<()> {
        if let Some(stop) = &self.linha_parada {
            for pattern in stop.patterns() {
                Regex::new(&pattern)?;
            }
            if let Some(nested) = &stop.nova_configuracao_abaixo {
                nested.check_patterns()?;
            }
        }
        Ok(())
    }
}

/// Split free text on commas or newlines, trimming and dropping blanks.
pub fn parse_variations(text: &str) -> Vec<String> {
    text.split([',', '\n'])
        .map(|v| v.trim())
        .filter(|v| !v.is_empty())
        .map(String::from)
        .collect()
}

/// Rules worth exporting, cleaned: each needs an anchor and one variation.
///
/// Stop-line patterns the `regex` crate cannot compile are logged and kept;
/// the consumer may use a different dialect.
pub fn export_rules(rules: &[RegexRule]) -> Vec<RegexRule> {
    rules
        .iter()
        .filter(|r| !r.inicio.trim().is_empty() && r.variacoes.iter().any(|v| !v.trim().is_empty()))
        .map(|rule| {
            if let Err(e) = rule.check_patterns() {
                warn!(inicio = %rule.inicio, error = %e, "stop-line pattern does not compile");
            }
            rule.cleaned()
        })
        .collect()
}
