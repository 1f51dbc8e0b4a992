pub mod stream_writer;

use std::io::Write;

use demandlab_core::Envelope;
use serde_json::Value;

use crate::cli::OutputFormat;
use crate::error::CliError;

pub fn render<W: Write>(
    out: &mut W,
    envelope: &Envelope<Value>,
    format: OutputFormat,
    pretty: bool,
) -> Result<(), CliError> {
    match format {
        OutputFormat::Json => {
            let payload = if pretty {
                serde_json::to_string_pretty(envelope)?
            } else {
                serde_json::to_string(envelope)?
            };
            writeln!(out, "{payload}")?;
        }
        OutputFormat::Table => render_table(out, envelope)?,
    }

    Ok(())
}

/// Scalars of the payload on one line each; nested values as indented JSON.
fn render_table<W: Write>(out: &mut W, envelope: &Envelope<Value>) -> Result<(), CliError> {
    writeln!(out, "request_id  : {}", envelope.meta.request_id)?;
    writeln!(out, "generated_at: {}", envelope.meta.generated_at)?;
    if let Some(dataset) = &envelope.meta.dataset {
        writeln!(out, "dataset     : {dataset}")?;
    }
    writeln!(out, "latency_ms  : {}", envelope.meta.latency_ms)?;

    if !envelope.meta.warnings.is_empty() {
        writeln!(out, "warnings:")?;
        for warning in &envelope.meta.warnings {
            writeln!(out, "  - {warning}")?;
        }
    }

    match &envelope.data {
        Value::Null => {}
        Value::Object(fields) => {
            writeln!(out, "data:")?;
            let width = fields.keys().map(String::len).max().unwrap_or(0);
            for (name, value) in fields {
                match value {
                    Value::Object(_) | Value::Array(_) => {
                        writeln!(out, "  {name}:")?;
                        for line in serde_json::to_string_pretty(value)?.lines() {
                            writeln!(out, "    {line}")?;
                        }
                    }
                    Value::String(text) => writeln!(out, "  {name:<width$} : {text}")?,
                    scalar => writeln!(out, "  {name:<width$} : {scalar}")?,
                }
            }
        }
        other => writeln!(out, "data: {other}")?,
    }

    if !envelope.errors.is_empty() {
        writeln!(out, "errors:")?;
        for error in &envelope.errors {
            writeln!(out, "  - {}: {}", error.code, error.message)?;
        }
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use demandlab_core::{EnvelopeError, EnvelopeMeta};
    use serde_json::json;

    use super::*;

    fn envelope(data: Value) -> Envelope<Value> {
        let meta = EnvelopeMeta::new("request-12345", "v1.0.0", 2)
            .expect("valid meta")
            .with_dataset("panel.json");
        Envelope::success(meta, data)
    }

    fn rendered(envelope: &Envelope<Value>, format: OutputFormat, pretty: bool) -> String {
        let mut sink = Vec::<u8>::new();
        render(&mut sink, envelope, format, pretty).expect("render");
        String::from_utf8(sink).expect("utf8")
    }

    #[test]
    fn json_output_is_one_line_unless_pretty() {
        let envelope = envelope(json!({ "row_count": 3 }));

        let compact = rendered(&envelope, OutputFormat::Json, false);
        assert_eq!(compact.lines().count(), 1);

        let pretty = rendered(&envelope, OutputFormat::Json, true);
        assert!(pretty.lines().count() > 1);
        let parsed: Value = serde_json::from_str(&pretty).expect("valid json");
        assert_eq!(parsed["meta"]["dataset"], "panel.json");
    }

    #[test]
    fn table_lists_scalars_and_errors() {
        let mut envelope = envelope(json!({ "summary": { "regime": "ELASTIC" }, "n_obs": 12 }));
        envelope
            .push_error(EnvelopeError::new("fit.degenerate", "insufficient variation").expect("valid"))
            .expect("push");

        let table = rendered(&envelope, OutputFormat::Table, false);
        assert!(table.contains("dataset     : panel.json"));
        assert!(table.contains("n_obs"));
        assert!(table.contains("\"regime\": \"ELASTIC\""));
        assert!(table.contains("- fit.degenerate: insufficient variation"));
    }
}
