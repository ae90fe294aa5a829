//! The pathway data model: frames, pathways, ensembles, symbol tables,
//! and the pairwise distance matrix.

pub mod matrix;
pub mod pathway;
pub mod symbols;

pub use matrix::DistanceMatrix;
pub use pathway::{Frame, Pathway, PathwayEnsemble, WEIGHT_COLUMN_MIN};
pub use symbols::{StateId, SymbolTable, UNKNOWN_SYMBOL};
