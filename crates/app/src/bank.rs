use std::path::Path;
use std::sync::Arc;

use placement_core::model::QuestionBank;

/// Built-in twelve-question bank, two questions per level.
const DEFAULT_BANK_JSON: &str = include_str!("../assets/placement_bank.json");

/// Parse and validate a bank from its JSON form.
///
/// # Errors
///
/// Returns the `serde_json` error, which carries validation failures from
/// `QuestionBank`'s deserializer.
pub fn parse_bank(json: &str) -> Result<Arc<QuestionBank>, serde_json::Error> {
    serde_json::from_str::<QuestionBank>(json).map(Arc::new)
}

/// Load the bank at `path`, or the built-in bank when `path` is `None`.
pub fn load_bank(path: Option<&Path>) -> Result<Arc<QuestionBank>, Box<dyn std::error::Error>> {
    let Some(path) = path else {
        return Ok(parse_bank(DEFAULT_BANK_JSON)?);
    };

    let raw = std::fs::read_to_string(path)
        .map_err(|e| format!("cannot read bank {}: {e}", path.display()))?;
    let bank = parse_bank(&raw).map_err(|e| format!("invalid bank {}: {e}", path.display()))?;
    tracing::info!(path = %path.display(), questions = bank.len(), "question bank loaded");
    Ok(bank)
}
