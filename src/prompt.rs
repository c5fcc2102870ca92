//! Prompt serialization for the hosted translation model.
//!
//! The model consumes a single delimited string describing the database
//! schema followed by the question. The token grammar is a wire contract:
//!
//! ```text
//! <db_id>{id}<table>{name}<col>{col1}<sep>{col2}...<question>{question}
//! ```
//!
//! Primary-key columns are prefixed with `<primary_key>`, foreign-key
//! columns are suffixed with `<parent_table>{t}<referred_key>{c}`, and
//! consecutive tables are concatenated with no separator in between. No
//! escaping is performed; delimiter tokens occurring inside names pass
//! through as-is.

use crate::schema::Table;

/// Serialize a schema and question into the model's input format.
///
/// Pure and deterministic; the output must match the wire contract
/// byte-for-byte or the remote model will mis-tokenize the schema.
pub fn serialize_prompt(database_id: &str, tables: &[Table], question: &str) -> String {
    let mut prompt = format!("<db_id>{}", database_id);

    for table in tables {
        prompt.push_str("<table>");
        prompt.push_str(&table.table_name);
        prompt.push_str("<col>");

        let column_tokens: Vec<String> = table
            .columns
            .iter()
            .map(|col| {
                let mut token = if col.is_primary_key {
                    format!("<primary_key>{}", col.name)
                } else {
                    col.name.clone()
                };
                if let Some(fk) = &col.foreign_key {
                    token.push_str("<parent_table>");
                    token.push_str(&fk.parent_table);
                    token.push_str("<referred_key>");
                    token.push_str(&fk.parent_column);
                }
                token
            })
            .collect();
        prompt.push_str(&column_tokens.join("<sep>"));
    }

    prompt.push_str("<question>");
    prompt.push_str(question);
    prompt
}
