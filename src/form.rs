use std::collections::HashMap;

use axum::extract::Multipart;
use serde_json::Value;

use crate::error::AppResult;
use crate::models::media_model::UploadedFile;

/// A fully buffered `multipart/form-data` body.
#[derive(Debug, Default)]
pub struct FormData {
    fields: HashMap<String, Vec<String>>,
    files: HashMap<String, UploadedFile>,
}

impl FormData {
    pub async fn from_multipart(mut multipart: Multipart) -> AppResult<Self> {
        let mut form = FormData::default();

        while let Some(field) = multipart.next_field().await? {
            let Some(name) = field.name().map(str::to_string) else {
                continue;
            };

            match field.file_name().map(str::to_string) {
                Some(file_name) => {
                    let content_type = field
                        .content_type()
                        .unwrap_or("application/octet-stream")
                        .to_string();
                    let bytes = field.bytes().await?;
                    if file_name.is_empty() && bytes.is_empty() {
                        continue;
                    }
                    form.files.insert(
                        name,
                        UploadedFile {
                            file_name,
                            content_type,
                            bytes: bytes.to_vec(),
                        },
                    );
                }
                None => {
                    let text = field.text().await?;
                    form.fields.entry(name).or_default().push(text);
                }
            }
        }

        Ok(form)
    }

    /// First value of a text field, trimmed; blank values count as missing.
    pub fn text(&self, name: &str) -> Option<&str> {
        self.fields
            .get(name)
            .and_then(|values| values.first())
            .map(|v| v.trim())
            .filter(|v| !v.is_empty())
    }

    pub fn texts(&self, name: &str) -> &[String] {
        self.fields.get(name).map(Vec::as_slice).unwrap_or(&[])
    }

    pub fn file(&self, name: &str) -> Option<&UploadedFile> {
        self.files.get(name)
    }

    #[cfg(test)]
    pub fn insert_text(&mut self, name: &str, value: &str) {
        self.fields
            .entry(name.to_string())
            .or_default()
            .push(value.to_string());
    }

    #[cfg(test)]
    pub fn insert_file(&mut self, name: &str, file: UploadedFile) {
        self.files.insert(name.to_string(), file);
    }
}

/// Splits `"Drama, Crime,"` into trimmed, non-empty entries.
pub fn comma_list(raw: &str) -> Vec<String> {
    raw.split(',')
        .map(str::trim)
        .filter(|s| !s.is_empty())
        .map(str::to_string)
        .collect()
}

/// Decodes a JSON array if `raw` holds one, otherwise falls back to [`comma_list`].
pub fn json_or_comma_list(raw: &str) -> Vec<String> {
    match serde_json::from_str::<Value>(raw) {
        Ok(Value::Array(items)) => items
            .into_iter()
            .map(|item| match item {
                Value::String(s) => s.trim().to_string(),
                other => other.to_string(),
            })
            .filter(|s| !s.is_empty())
            .collect(),
        Ok(Value::String(s)) => comma_list(&s),
        _ => comma_list(raw),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn comma_lists_drop_blanks() {
        assert_eq!(comma_list(" Drama, ,Crime ,"), vec!["Drama", "Crime"]);
        assert!(comma_list("  ").is_empty());
    }

    #[test]
    fn json_arrays_are_preferred() {
        assert_eq!(
            json_or_comma_list(r#"["Sci-Fi", " Thriller ", ""]"#),
            vec!["Sci-Fi", "Thriller"]
        );
        assert_eq!(json_or_comma_list("Action, Comedy"), vec!["Action", "Comedy"]);
        assert_eq!(json_or_comma_list(r#""Horror, Mystery""#), vec!["Horror", "Mystery"]);
    }

    #[test]
    fn blank_text_counts_as_missing() {
        let mut form = FormData::default();
        form.insert_text("title", "   ");
        form.insert_text("runtime", " 120 ");
        assert_eq!(form.text("title"), None);
        assert_eq!(form.text("runtime"), Some("120"));
        assert_eq!(form.texts("genres[]").len(), 0);
    }
}
