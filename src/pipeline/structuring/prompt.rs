use crate::pipeline::preprocess::Hints;

/// Header of the block listing pre-extracted hints.
const HINTS_HEADER: &str = "Informações pré-extraídas pelo sistema:";

/// JSON output contract given to the model. Mirrors `Incident`.
pub const FORMAT_INSTRUCTIONS: &str = r#"The output should be formatted as a JSON instance that conforms to the JSON schema below.

As an example, for the schema {"properties": {"foo": {"title": "Foo", "description": "a list of strings", "type": "array", "items": {"type": "string"}}}, "required": ["foo"]}
the object {"foo": ["bar", "baz"]} is a well-formatted instance of the schema. The object {"properties": {"foo": ["bar", "baz"]}} is not well-formatted.

Here is the output schema:
```
{"properties": {"data_ocorrencia": {"anyOf": [{"type": "string"}, {"type": "null"}], "default": null, "description": "Data e hora do ocorrido no formato YYYY-MM-DD HH:MM. Use \"INVALIDO\" se houver hora impossível no texto."}, "local": {"anyOf": [{"type": "string"}, {"type": "null"}], "default": null, "description": "Cidade, local público ou referência espacial mencionada"}, "tipo_incidente": {"anyOf": [{"type": "string"}, {"type": "null"}], "default": null, "description": "Descrição resumida do que aconteceu"}, "impacto": {"anyOf": [{"type": "string"}, {"type": "null"}], "default": null, "description": "Consequência do incidente ou sistemas afetados"}}}
```"#;

/// Build the hints block placed above the report in the prompt.
///
/// Empty when there are neither hints nor extra context.
pub fn build_hints_block(hints: &Hints, extra_context: &str) -> String {
    if hints.is_empty() && extra_context.is_empty() {
        return String::new();
    }

    let mut lines = vec![HINTS_HEADER.to_string()];
    for (kind, value) in hints {
        lines.push(format!("- {kind}: {value}"));
    }

    if !extra_context.is_empty() {
        lines.push(format!("\nContexto adicional: {extra_context}"));
    }

    lines.join("\n")
}

/// Build the extraction prompt for one preprocessed report.
pub fn build_incident_prompt(cleaned_text: &str, hints_block: &str) -> String {
    format!(
        r#"Você é um assistente de extração de dados estruturados a partir de QUALQUER relato de incidente.

Regras obrigatórias:
- Extraia qualquer informação possível, mesmo que parcial.
- Não invente dados.
- Use null apenas se o campo realmente não puder ser inferido.
- Se o texto mencionar uma hora ou data impossível,
  preencha data_ocorrencia como "INVALIDO".

{hints_block}

Texto:
"""
{cleaned_text}
"""

{format_instructions}
"#,
        format_instructions = FORMAT_INSTRUCTIONS,
    )
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::pipeline::preprocess::HintKind;

    #[test]
    fn empty_hints_and_context_give_empty_block() {
        assert_eq!(build_hints_block(&Hints::new(), ""), "");
    }

    #[test]
    fn hints_are_listed_as_bullets() {
        let mut hints = Hints::new();
        hints.insert(HintKind::NormalizedTime, "14:00".into());
        hints.insert(HintKind::ReferenceDate, "2026-02-24".into());

        let block = build_hints_block(&hints, "");
        assert_eq!(
            block,
            "Informações pré-extraídas pelo sistema:\n- reference_date: 2026-02-24\n- normalized_time: 14:00"
        );
    }

    #[test]
    fn extra_context_is_appended_after_blank_line() {
        let mut hints = Hints::new();
        hints.insert(HintKind::NormalizedTime, "INVALIDO".into());

        let block = build_hints_block(&hints, "relato enviado pelo app");
        assert!(block.ends_with("- normalized_time: INVALIDO\n\nContexto adicional: relato enviado pelo app"));
    }

    #[test]
    fn extra_context_alone_still_has_header() {
        let block = build_hints_block(&Hints::new(), "turno da noite");
        assert_eq!(
            block,
            "Informações pré-extraídas pelo sistema:\n\nContexto adicional: turno da noite"
        );
    }

    #[test]
    fn format_instructions_show_a_worked_example() {
        assert!(FORMAT_INSTRUCTIONS.contains("As an example, for the schema"));
        assert!(FORMAT_INSTRUCTIONS.contains(r#"the object {"foo": ["bar", "baz"]} is a well-formatted instance"#));
        let example = FORMAT_INSTRUCTIONS.find("As an example").unwrap();
        let schema = FORMAT_INSTRUCTIONS.find("Here is the output schema").unwrap();
        assert!(example < schema);

        let prompt = build_incident_prompt("queda no patio", "");
        assert!(prompt.contains("is not well-formatted."));
    }

    #[test]
    fn prompt_contains_text_hints_and_schema() {
        let prompt = build_incident_prompt("queda no patio", "- normalized_time: 09:00");
        assert!(prompt.contains("\"\"\"\nqueda no patio\n\"\"\""));
        assert!(prompt.contains("- normalized_time: 09:00"));
        assert!(prompt.contains("\"data_ocorrencia\""));
        assert!(prompt.contains("INVALIDO"));
    }
}
