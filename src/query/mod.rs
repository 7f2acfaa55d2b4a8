//! Question handling: classify, then answer from the scoped records or hand
//! off to the fallback responder.

pub mod engine;
pub mod format;
pub mod intent;
