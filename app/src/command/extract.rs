use harbor_core::{Extractor, MatchMode, PatternTable};
use serde_json::{Value, json};
use std::io::Read;
use std::sync::Arc;

/// Input for the extract command.
#[derive(Debug, Clone, Copy)]
pub struct ExtractInput {
    pub match_mode: MatchMode,
}

/// Strategy for the stdin JSON extraction protocol.
///
/// Reads `{"text": "..."}` from stdin and writes one JSON object to stdout:
/// `{"success": true, "keywords": {...}}` or `{"success": false, "error": "..."}`.
/// Nothing is stored.
#[derive(Debug, Clone, Copy)]
pub struct ExtractStrategy;

impl super::CommandStrategy for ExtractStrategy {
    type Input = ExtractInput;

    async fn execute(&self, input: Self::Input) -> anyhow::Result<()> {
        let mut raw = String::new();
        std::io::stdin().read_to_string(&mut raw)?;

        let table = PatternTable::with_defaults()?;
        let extractor = Extractor::new(Arc::new(table), input.match_mode);

        println!("{}", respond(&raw, &extractor));
        Ok(())
    }
}

fn respond(raw: &str, extractor: &Extractor) -> Value {
    let Ok(request) = serde_json::from_str::<Value>(raw) else {
        return failure("Invalid JSON input");
    };

    let Some(fields) = request.as_object() else {
        return failure("Input must be a JSON object");
    };

    let text = match fields.get("text") {
        None | Some(Value::Null) => "",
        Some(Value::String(text)) => text.as_str(),
        Some(_) => return failure("Field \"text\" must be a string"),
    };

    match serde_json::to_value(extractor.extract(text)) {
        Ok(keywords) => json!({ "success": true, "keywords": keywords }),
        Err(e) => failure(&e.to_string()),
    }
}

fn failure(message: &str) -> Value {
    json!({ "success": false, "error": message })
}
