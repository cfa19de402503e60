pub(crate) mod annotation;
pub(crate) mod layout;
