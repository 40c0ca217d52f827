//! Data transformations applied before model fitting.

mod boxcox;

pub use boxcox::{boxcox_lambda, is_boxcox_suitable, BoxCox};
