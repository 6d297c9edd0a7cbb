//! Firestore implementation of the document store.
//!
//! Talks to the Firestore REST API (`documents:runQuery`) with `reqwest` and
//! decodes Firestore's typed values into plain JSON.

mod provider;
mod value;

pub use provider::FirestoreStore;
pub use value::{decode_fields, decode_value, document_from_json, encode_value};
