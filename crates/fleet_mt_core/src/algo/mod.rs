pub(crate) mod aggregate;
pub(crate) mod escalate;
pub(crate) mod extract;
pub(crate) mod partition;
