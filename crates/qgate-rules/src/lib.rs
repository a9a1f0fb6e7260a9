//! # qgate-rules
//!
//! Built-in quality gate rules for qgate.
//!
//! Every rule subscribes to a few node kinds and inspects one node (plus its
//! ancestors and members) per call.
//!
//! ## Available Rules
//!
//! | Code | Name | Description |
//! |------|------|-------------|
//! | QG001 | `declaration-order` | Constructors before methods, then by decreasing visibility |
//! | QG002 | `brace-structure` | Layout of array initializer braces |
//! | QG003 | `doc-param-order` | `@param` tags follow the declared parameter order |
//! | QG004 | `record-shape` | Records are final, have components and no instance fields |
//! | QG005 | `non-static-candidate` | Methods that use no instance state should be static |
//! | QG006 | `unused-private-constructor` | Private constructors nobody calls |
//! | QG007 | `protected-in-final` | Protected members of final classes |
//! | QG008 | `mandatory-final-class` | Classes must be final or abstract |
//!
//! ## Usage
//!
//! ```ignore
//! use qgate_core::Analyzer;
//! use qgate_java::JavaTreeBuilder;
//! use qgate_rules::{DeclarationOrder, RecordShape};
//!
//! let analyzer = Analyzer::builder()
//!     .root("./src")
//!     .tree_builder(JavaTreeBuilder::new())
//!     .rule(DeclarationOrder::new())
//!     .rule(RecordShape::new())
//!     .build()?;
//! ```

#![forbid(unsafe_code)]
#![warn(missing_docs)]

mod brace_structure;
mod declaration_order;
mod doc_param_order;
mod mandatory_final_class;
mod non_static_candidate;
mod presets;
mod protected_in_final;
mod record_shape;
mod unused_private_constructor;

pub use brace_structure::BraceStructure;
pub use declaration_order::DeclarationOrder;
pub use doc_param_order::{DocParamOrder, TypeParamPosition};
pub use mandatory_final_class::MandatoryFinalClass;
pub use non_static_candidate::NonStaticCandidate;
pub use presets::{
    all_rules, find_rule, minimal_rules, recommended_rules, rule_from_config, rule_names,
    rules_from_config, selected_rules, strict_rules, Preset,
};
pub use protected_in_final::ProtectedInFinal;
pub use record_shape::RecordShape;
pub use unused_private_constructor::UnusedPrivateConstructor;

/// Re-export core types for convenience.
pub use qgate_core::{Rule, Severity, Violation};
