//! Core series handling shared by validation and search.

mod split;

pub use split::split_train_test;
