//! Load raw corpus records from files on disk

use std::fs;
use std::path::Path;

use serde::Deserialize;
use walkdir::WalkDir;

use super::record::Record;
use crate::error::{QaError, Result};

const SUPPORTED_EXTENSIONS: &[&str] = &["json", "jsonl", "yaml", "yml", "txt", "md"];

/// A record as written in import files: either a bare string or `{ content }`
#[derive(Debug, Deserialize)]
#[serde(untagged)]
enum RawRecord {
    Text(String),
    Object { content: String },
}

impl RawRecord {
    fn into_content(self) -> String {
        match self {
            Self::Text(content) | Self::Object { content } => content,
        }
    }
}

/// Load records from a single file or, recursively, a directory.
///
/// Whitespace-only records are dropped. Files with unknown extensions
/// inside a directory are ignored.
pub fn load_records(path: &Path) -> Result<Vec<Record>> {
    if path.is_dir() {
        let mut records = Vec::new();
        let mut files: Vec<_> = WalkDir::new(path)
            .into_iter()
            .filter_map(|e| e.ok())
            .filter(|e| e.file_type().is_file() && is_supported(e.path()))
            .map(|e| e.into_path())
            .collect();
        files.sort();

        for file in files {
            records.extend(load_file(&file)?);
        }
        return Ok(records);
    }

    load_file(path)
}

fn is_supported(path: &Path) -> bool {
    extension(path)
        .map(|ext| SUPPORTED_EXTENSIONS.contains(&ext.as_str()))
        .unwrap_or(false)
}

fn extension(path: &Path) -> Option<String> {
    path.extension()
        .and_then(|e| e.to_str())
        .map(|e| e.to_ascii_lowercase())
}

fn load_file(path: &Path) -> Result<Vec<Record>> {
    let source = path.display().to_string();
    let import_error = |message: String| QaError::Import {
        path: source.clone(),
        message,
    };

    let text = fs::read_to_string(path).map_err(|e| import_error(e.to_string()))?;

    let contents: Vec<String> = match extension(path).as_deref() {
        Some("json") => serde_json::from_str::<Vec<RawRecord>>(&text)
            .map_err(|e| import_error(e.to_string()))?
            .into_iter()
            .map(RawRecord::into_content)
            .collect(),
        Some("jsonl") => text
            .lines()
            .enumerate()
            .filter(|(_, line)| !line.trim().is_empty())
            .map(|(n, line)| {
                serde_json::from_str::<RawRecord>(line)
                    .map(RawRecord::into_content)
                    .map_err(|e| import_error(format!("line {}: {}", n + 1, e)))
            })
            .collect::<Result<_>>()?,
        Some("yaml") | Some("yml") => serde_yaml::from_str::<Vec<RawRecord>>(&text)
            .map_err(|e| import_error(e.to_string()))?
            .into_iter()
            .map(RawRecord::into_content)
            .collect(),
        Some("txt") | Some("md") => vec![text],
        _ => return Err(import_error("unsupported file type".to_string())),
    };

    Ok(contents
        .into_iter()
        .filter(|c| !c.trim().is_empty())
        .map(|c| Record::new(c).with_source(source.clone()))
        .collect())
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;

    #[test]
    fn test_load_json_mixed_shapes() -> anyhow::Result<()> {
        let dir = tempfile::tempdir()?;
        let path = dir.path().join("corpus.json");
        fs::write(
            &path,
            r#"["Question: a? Answer: 1", {"content": "Question: b? Answer: 2"}, "   "]"#,
        )?;

        let records = load_records(&path)?;
        assert_eq!(records.len(), 2);
        assert_eq!(records[0].content, "Question: a? Answer: 1");
        assert_eq!(records[1].content, "Question: b? Answer: 2");
        assert_eq!(records[0].source.as_deref(), Some(path.display().to_string().as_str()));
        Ok(())
    }

    #[test]
    fn test_load_jsonl_reports_line() -> anyhow::Result<()> {
        let dir = tempfile::tempdir()?;
        let path = dir.path().join("corpus.jsonl");
        fs::write(&path, "{\"content\": \"ok\"}\n\nnot json\n")?;

        let err = load_records(&path).unwrap_err();
        assert!(err.to_string().contains("line 3"));
        Ok(())
    }

    #[test]
    fn test_load_directory() -> anyhow::Result<()> {
        let dir = tempfile::tempdir()?;
        fs::create_dir(dir.path().join("nested"))?;
        fs::write(dir.path().join("a.txt"), "Question: x? Answer: y")?;
        fs::write(
            dir.path().join("nested/b.yaml"),
            "- \"Question: p? Answer: q\"\n- content: \"Question: r? Answer: s\"\n",
        )?;
        fs::write(dir.path().join("ignored.csv"), "nope")?;

        let records = load_records(dir.path())?;
        let contents: Vec<_> = records.iter().map(|r| r.content.as_str()).collect();
        assert_eq!(
            contents,
            vec![
                "Question: x? Answer: y",
                "Question: p? Answer: q",
                "Question: r? Answer: s"
            ]
        );
        Ok(())
    }

    #[test]
    fn test_unsupported_single_file() -> anyhow::Result<()> {
        let dir = tempfile::tempdir()?;
        let path = dir.path().join("corpus.csv");
        fs::write(&path, "a,b")?;
        assert!(matches!(load_records(&path), Err(QaError::Import { .. })));
        Ok(())
    }
}
