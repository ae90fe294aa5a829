//! # pathline-storage
//!
//! Persistence layer for pathline: pathway files (JSON), NPY arrays for
//! distance matrices and cluster labels, and the SQLite ensemble archive.

pub mod archive;
pub mod npy;
pub mod pathway_io;

pub use archive::EnsembleArchive;
pub use pathway_io::{load_pathways, save_pathways};
