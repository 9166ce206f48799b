//! Data models: partner registry, pipeline configuration, import result.

pub mod config;
pub mod parsed;
pub mod partner;

pub use config::ImportConfig;
pub use parsed::ParsedInvoice;
pub use partner::{
    DateFormat, ExtractRule, FieldConfig, FieldKind, FieldName, PageScope, Partner,
    PartnerRegistry,
};
