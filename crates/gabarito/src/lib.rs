//! Gabarito: maps cost and sale spreadsheets onto a canonical column schema.
//!
//! Source files (CSV, XLS, XLSX, XLSM) are loaded into workbooks, a header
//! row is located for a chosen start cell, and the user's column choices
//! are reconciled into a mapping list. The result is a JSON config a
//! downstream pipeline uses to normalize and merge the two sources.
//!
//! # Example
//!
//! ```no_run
//! use gabarito::{ConfigAssembler, Gabarito, MappingAction, Session, SourceFile};
//! use gabarito::schema::CanonicalSchema;
//!
//! let gabarito = Gabarito::new();
//! let custo = gabarito.read_sheet("custo.xlsx", 0, "A4", None).unwrap();
//!
//! let session = Session::new(CanonicalSchema::default())
//!     .with_source(SourceFile::Custo, custo)
//!     .apply(&MappingAction::SetSingle {
//!         column: "CUSTO".into(),
//!         value: "VALOR".into(),
//!         file: SourceFile::Custo,
//!     });
//!
//! match ConfigAssembler::default().assemble(&session) {
//!     Some(config) => println!("{}", config.to_json_pretty().unwrap()),
//!     None => println!("not ready"),
//! }
//! ```

pub mod error;
pub mod export;
pub mod extract;
pub mod input;
pub mod mapping;
pub mod merge;
pub mod pages;
pub mod plan;
pub mod rules;
pub mod schema;
pub mod session;

mod gabarito;

pub use crate::gabarito::{BuildResult, Gabarito, GabaritoConfig, DEFAULT_OUTPUT_NAME};
pub use error::{GabaritoError, Result};
pub use export::{ConfigAssembler, ExportedConfig, ProductVariant, Readiness};
pub use extract::{HeaderPolicy, Resolver};
pub use input::{Loader, SourceMetadata, SourceTable, Workbook};
pub use mapping::{ColumnMapping, MappingSet, Reconciler, SourceFile, SourceValue};
pub use merge::{JoinKind, MergeConfig};
pub use pages::{Aggregation, PageConfig, PageManager};
pub use plan::WizardPlan;
pub use session::{MappingAction, Session};
