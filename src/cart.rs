pub(crate) mod cache;
pub(crate) mod model;
pub(crate) mod mutator;
pub(crate) mod patch;
pub(crate) mod pricing;
