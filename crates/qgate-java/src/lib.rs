//! # qgate-java
//!
//! Tree-sitter powered Java front end for qgate.
//!
//! [`JavaTreeBuilder`] implements [`qgate_core::TreeBuilder`]: it parses a
//! Java file and maps its declarations, bodies, initializer blocks, array
//! initializers and Javadoc comments into a [`qgate_core::SyntaxTree`].

#![forbid(unsafe_code)]
#![warn(missing_docs)]

mod body;
pub mod java;

pub use java::JavaTreeBuilder;
