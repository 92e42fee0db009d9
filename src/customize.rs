pub(crate) mod design;
pub(crate) mod options;
pub(crate) mod payload;
pub(crate) mod product;
pub(crate) mod session;
