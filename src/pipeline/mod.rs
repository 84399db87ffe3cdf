pub mod preprocess; // Deterministic text normalization + temporal hints
pub mod structuring; // Prompting, model call, response parsing
