pub(crate) mod decode;
pub(crate) mod derive;
pub(crate) mod layout;
pub(crate) mod source;
