//! Detection rule catalog.
//!
//! The catalog is read-only, process-wide data: the built-in table is
//! compiled once on first use, and custom catalogs are compiled when loaded.
//! Consumers receive it by reference so tests can substitute their own.

mod builtin;
mod parser;
mod schema;

pub use parser::{
    CatalogError, PatternDefinition, Rule, RuleCatalog, RuleDefinition, RulePattern,
};
pub use schema::{validate_catalog_schema, SchemaError};

use lazy_static::lazy_static;

lazy_static! {
    static ref BUILTIN_CATALOG: RuleCatalog = RuleCatalog::from_definitions(builtin::definitions())
        .expect("built-in rule catalog must compile");
}

impl RuleCatalog {
    /// The built-in marketing compliance catalog.
    pub fn builtin() -> &'static RuleCatalog {
        &BUILTIN_CATALOG
    }
}
