//! Response bodies. Request bodies are the forms in `tana_auth::credential`.

pub mod response;
