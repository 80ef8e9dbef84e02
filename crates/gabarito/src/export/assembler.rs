//! Builds the exported config from a session snapshot.

use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::input::SourceTable;
use crate::mapping::{ColumnMapping, MappingSet, SourceFile, SourceValue};
use crate::merge::MergeConfig;
use crate::pages::PageConfig;
use crate::rules::RuleSet;
use crate::schema::SchemaSnapshot;
use crate::session::Session;

/// Shared name given to immutable optional columns nobody mapped.
pub const IMMUTABLE_DEFAULT_NAME: &str = "VAZIO";

/// Shared name forced onto merge-locked columns in the locked variant.
pub const MERGE_LOCKED_NAME: &str = "MERGE";

/// Product flavour of the export.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ProductVariant {
    #[default]
    Standard,
    /// Merge-locked columns are filled by the merge and the join is pinned.
    Locked,
}

impl std::str::FromStr for ProductVariant {
    type Err = String;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "standard" => Ok(ProductVariant::Standard),
            "locked" => Ok(ProductVariant::Locked),
            other => Err(format!("unknown variant '{}': use standard or locked", other)),
        }
    }
}

/// What still blocks the export.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Readiness {
    pub has_source: bool,
    /// Required columns not yet mapped, in schema order.
    pub missing_required: Vec<String>,
    /// Merge keys chosen; always true with a single source.
    pub merge_ready: bool,
}

impl Readiness {
    pub fn is_ready(&self) -> bool {
        self.has_source && self.missing_required.is_empty() && self.merge_ready
    }
}

/// A source as listed in the export.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FileDescriptor {
    pub columns: Vec<String>,
    /// Source file name.
    pub path: String,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct FileDescriptors {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub custo: Option<FileDescriptor>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub venda: Option<FileDescriptor>,
}

/// The exported mapping config.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ExportedConfig {
    pub gabarito: SchemaSnapshot,
    pub files: FileDescriptors,
    pub column_mapping: Vec<ColumnMapping>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub merge_config: Option<MergeConfig>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub color_column: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub pages: Option<Vec<PageConfig>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub stop_row: Option<u32>,
    #[serde(flatten)]
    pub rules: Option<RuleSet>,
}

/// Turns settled sessions into exported configs.
#[derive(Debug, Clone, Copy, Default)]
pub struct ConfigAssembler {
    variant: ProductVariant,
}

impl ConfigAssembler {
    pub fn new(variant: ProductVariant) -> Self {
        Self { variant }
    }

    pub fn variant(&self) -> ProductVariant {
        self.variant
    }

    /// Check the export preconditions.
    ///
    /// Needs a source, every required column mapped (the locked variant
    /// counts merge-locked columns as mapped), and with both sources
    /// attached a merge config whose two keys are set.
    pub fn readiness(&self, session: &Session) -> Readiness {
        let schema = session.schema();
        let reconciler = session.reconciler();

        let missing_required = schema
            .required_columns
            .iter()
            .filter(|c| !(self.variant == ProductVariant::Locked && schema.is_merge_locked(c)))
            .filter(|c| !reconciler.is_mapped(session.mappings(), c))
            .cloned()
            .collect();

        let merge_ready = !session.has_both_sources()
            || session.merge_config().is_some_and(MergeConfig::is_ready);

        Readiness {
            has_source: session.has_any_source(),
            missing_required,
            merge_ready,
        }
    }

    /// Build the config, or `None` while the session is not ready.
    pub fn assemble(&self, session: &Session) -> Option<ExportedConfig> {
        let readiness = self.readiness(session);
        if !readiness.is_ready() {
            debug!(?readiness, "export withheld");
            return None;
        }

        let schema = session.schema();
        let files = FileDescriptors {
            custo: session.source(SourceFile::Custo).map(describe),
            venda: session.source(SourceFile::Venda).map(describe),
        };

        let merge_config = match self.variant {
            ProductVariant::Standard => session.merge_config().cloned(),
            ProductVariant::Locked => session.merge_config().map(MergeConfig::locked),
        };

        let pages: Vec<PageConfig> = SourceFile::ALL
            .iter()
            .flat_map(|&file| session.pages(file).iter().map(move |p| p.stamped(file)))
            .collect();

        Some(ExportedConfig {
            gabarito: schema.snapshot(),
            files,
            column_mapping: self.final_mappings(session).into_vec(),
            merge_config,
            color_column: Some(schema.variation_column.clone()),
            pages: (!pages.is_empty()).then_some(pages),
            stop_row: session.stop_row(),
            rules: session.rules().cloned(),
        })
    }

    /// User mappings plus the injected defaults.
    fn final_mappings(&self, session: &Session) -> MappingSet {
        let schema = session.schema();
        let primary = session.reconciler().primary_file();
        let mut mappings = session.mappings().clone().into_vec();

        if self.variant == ProductVariant::Locked {
            mappings.retain(|m| !schema.is_merge_locked(&m.gabarito_column));
            mappings.extend(schema.merge_locked_columns.iter().map(|column| {
                ColumnMapping::new(column.clone(), SourceValue::Empty, primary)
                    .with_name(MERGE_LOCKED_NAME)
            }));
        }

        if session.has_any_source() {
            let defaults: Vec<ColumnMapping> = schema
                .immutable_optional_columns
                .iter()
                .filter(|column| !mappings.iter().any(|m| &m.gabarito_column == *column))
                .map(|column| {
                    ColumnMapping::new(column.clone(), SourceValue::Empty, primary)
                        .with_name(IMMUTABLE_DEFAULT_NAME)
                })
                .collect();
            mappings.extend(defaults);
        }

        MappingSet::from_mappings(mappings)
    }
}

fn describe(table: &SourceTable) -> FileDescriptor {
    FileDescriptor {
        columns: table.columns.clone(),
        path: table.name.clone(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::merge::JoinKind;
    use crate::schema::CanonicalSchema;
    use crate::session::MappingAction;
    use serde_json::json;

    fn table(name: &str, columns: &[&str]) -> SourceTable {
        SourceTable::new(name, columns.iter().map(|c| c.to_string()).collect(), vec![])
    }

    fn schema() -> CanonicalSchema {
        CanonicalSchema::new(["DESCRICAO", "CUSTO"], ["MARCA", "COD_PRODUTO"], "DESCRICAO")
            .with_immutable_optional(["COD_PRODUTO"])
            .with_merge_locked(["CUSTO"])
    }

    fn set(column: &str, value: &str, file: SourceFile) -> MappingAction {
        MappingAction::SetSingle {
            column: column.into(),
            value: value.into(),
            file,
        }
    }

    fn single_source() -> Session {
        Session::new(schema()).with_source(SourceFile::Custo, table("custo.csv", &["SKU", "COST"]))
    }

    #[test]
    fn test_no_source_not_ready() {
        let r = ConfigAssembler::default().readiness(&Session::new(schema()));
        assert!(!r.has_source);
        assert!(!r.is_ready());
        assert!(ConfigAssembler::default().assemble(&Session::new(schema())).is_none());
    }

    #[test]
    fn test_missing_required_withholds_export() {
        let s = single_source().apply(&MappingAction::ToggleVariation {
            column: None,
            value: "SKU".into(),
            file: SourceFile::Custo,
            checked: true,
        });
        let r = ConfigAssembler::default().readiness(&s);
        assert_eq!(r.missing_required, vec!["CUSTO"]);
        assert!(ConfigAssembler::default().assemble(&s).is_none());

        // locked variant fills CUSTO itself
        assert!(ConfigAssembler::new(ProductVariant::Locked).readiness(&s).is_ready());
    }

    #[test]
    fn test_single_source_export_shape() {
        let s = single_source()
            .apply(&MappingAction::ToggleVariation {
                column: None,
                value: "SKU".into(),
                file: SourceFile::Custo,
                checked: true,
            })
            .apply(&set("CUSTO", "COST", SourceFile::Custo));

        let config = ConfigAssembler::default().assemble(&s).unwrap();
        let value = serde_json::to_value(&config).unwrap();
        assert_eq!(
            value,
            json!({
                "gabarito": {
                    "requiredColumns": ["DESCRICAO", "CUSTO"],
                    "optionalColumns": ["MARCA", "COD_PRODUTO"],
                    "allColumns": ["DESCRICAO", "CUSTO", "MARCA", "COD_PRODUTO"]
                },
                "files": {"custo": {"columns": ["SKU", "COST"], "path": "custo.csv"}},
                "columnMapping": [
                    {"gabaritoColumn": "DESCRICAO", "sourceColumn": ["SKU"], "sourceFile": "custo"},
                    {"gabaritoColumn": "CUSTO", "sourceColumn": "COST", "sourceFile": "custo"},
                    {"gabaritoColumn": "COD_PRODUTO", "sourceColumn": "__EMPTY__", "sourceFile": "custo", "name": "VAZIO"}
                ],
                "colorColumn": "DESCRICAO"
            })
        );
    }

    #[test]
    fn test_both_sources_need_merge_keys() {
        let s = single_source()
            .with_source(SourceFile::Venda, table("venda.csv", &["SKU", "PRICE"]))
            .apply(&set("CUSTO", "COST", SourceFile::Custo))
            .apply(&MappingAction::ToggleVariation {
                column: None,
                value: "SKU".into(),
                file: SourceFile::Venda,
                checked: true,
            });

        let assembler = ConfigAssembler::default();
        assert!(!assembler.readiness(&s).merge_ready);

        let s = s.with_merge_config(Some(MergeConfig::default().with_keys("SKU", "")));
        assert!(!assembler.readiness(&s).merge_ready);

        let s = s.with_merge_config(Some(
            MergeConfig::default().with_keys("SKU", "SKU").with_how(JoinKind::Left),
        ));
        let config = assembler.assemble(&s).unwrap();
        assert_eq!(config.merge_config.unwrap().how, JoinKind::Left);
        assert!(config.files.venda.is_some());
    }

    #[test]
    fn test_locked_variant_overrides() {
        let s = single_source()
            .with_source(SourceFile::Venda, table("venda.csv", &["SKU"]))
            .apply(&set("CUSTO", "COST", SourceFile::Custo))
            .apply(&set("DESCRICAO", "SKU", SourceFile::Venda))
            .with_merge_config(Some(
                MergeConfig::default().with_keys("SKU", "SKU").with_how(JoinKind::Outer),
            ));

        let config = ConfigAssembler::new(ProductVariant::Locked).assemble(&s).unwrap();
        let merge = config.merge_config.unwrap();
        assert_eq!(merge.how, JoinKind::Inner);
        assert!(merge.include_variation_key);

        let custo: Vec<&ColumnMapping> = config
            .column_mapping
            .iter()
            .filter(|m| m.gabarito_column == "CUSTO")
            .collect();
        assert_eq!(custo.len(), 1);
        assert_eq!(custo[0].name.as_deref(), Some(MERGE_LOCKED_NAME));
        assert_eq!(custo[0].source_column, SourceValue::Empty);
    }

    #[test]
    fn test_mapped_immutable_column_not_defaulted() {
        let s = single_source()
            .apply(&set("DESCRICAO", "SKU", SourceFile::Custo))
            .apply(&set("CUSTO", "COST", SourceFile::Custo))
            .apply(&set("COD_PRODUTO", "SKU", SourceFile::Custo));
        let config = ConfigAssembler::default().assemble(&s).unwrap();
        let cod: Vec<&ColumnMapping> = config
            .column_mapping
            .iter()
            .filter(|m| m.gabarito_column == "COD_PRODUTO")
            .collect();
        assert_eq!(cod.len(), 1);
        assert!(cod[0].name.is_none());
    }

    #[test]
    fn test_pages_custo_then_venda_and_stamped() {
        let s = single_source()
            .apply(&set("DESCRICAO", "SKU", SourceFile::Custo))
            .apply(&set("CUSTO", "COST", SourceFile::Custo));
        let mut venda_page = PageConfig::new(0, "V");
        venda_page
            .column_mappings
            .push(ColumnMapping::new("CUSTO", SourceValue::from("X"), SourceFile::Custo));
        let s = s
            .with_pages(SourceFile::Venda, vec![venda_page])
            .with_pages(SourceFile::Custo, vec![PageConfig::new(1, "C")])
            .with_stop_row(Some(40));

        let config = ConfigAssembler::default().assemble(&s).unwrap();
        let pages = config.pages.unwrap();
        assert_eq!(pages[0].page_name, "C");
        assert_eq!(pages[1].page_name, "V");
        assert_eq!(pages[1].column_mappings[0].source_file, SourceFile::Venda);
        assert_eq!(config.stop_row, Some(40));
    }

    #[test]
    fn test_rules_block_flattened() {
        use crate::rules::{RegexRule, RuleSet};

        let mut rule = RegexRule::new("REF");
        rule.variacoes = vec!["P".into()];
        let s = single_source()
            .apply(&set("DESCRICAO", "SKU", SourceFile::Custo))
            .apply(&set("CUSTO", "COST", SourceFile::Custo))
            .with_rules(Some(RuleSet::Regex(vec![rule])));

        let value = serde_json::to_value(ConfigAssembler::default().assemble(&s).unwrap()).unwrap();
        assert_eq!(value["regexConfig"][0]["inicio"], "REF");
        assert!(value.get("separadores").is_none());
        assert!(value.get("pages").is_none());
    }

    #[test]
    fn test_variant_from_str() {
        assert_eq!("Locked".parse::<ProductVariant>().unwrap(), ProductVariant::Locked);
        assert!("other".parse::<ProductVariant>().is_err());
    }
}
