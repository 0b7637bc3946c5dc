// ============================================================
// Layer 2 — Application / Use Cases
// ============================================================
// Coordinates the other layers into the full preparation run.
// No tokenization rules or file formats live here, only the
// order of the steps and the config that drives them.

// The prepare_text workflow
pub mod prepare_use_case;
