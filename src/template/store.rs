//! Template store.
//!
//! Loaded once at startup and read-only afterwards; share it behind an `Arc`.

use std::borrow::Cow;
use std::collections::HashMap;
use std::path::Path;

use walkdir::WalkDir;

use super::{default_template, Template, TemplateError};
use crate::document::DocumentType;

/// Templates keyed by id, kept in load order.
#[derive(Debug, Clone, Default)]
pub struct TemplateStore {
    templates: Vec<Template>,
    by_id: HashMap<String, usize>,
}

impl TemplateStore {
    /// An empty store; every lookup falls back to the built-in template.
    pub fn empty() -> Self {
        Self::default()
    }

    /// Build a store from already-parsed templates.
    pub fn from_templates(templates: impl IntoIterator<Item = Template>) -> Self {
        let mut store = Self::default();
        for template in templates {
            store.insert(template);
        }
        store
    }

    /// Load every `.json`, `.yaml` and `.yml` file directly inside `dir`.
    ///
    /// Files are read in file-name order. A later file with an id that is
    /// already loaded replaces the earlier one. A missing or unreadable
    /// directory yields an empty store; bad files are skipped.
    pub fn load(dir: &Path) -> Self {
        let mut store = Self::default();

        if !dir.is_dir() {
            tracing::warn!(
                dir = %dir.display(),
                "Template directory not found, using built-in template"
            );
            return store;
        }

        // Symlinked template files count like regular ones
        let walker =
            WalkDir::new(dir).min_depth(1).max_depth(1).follow_links(true).sort_by_file_name();
        for entry in walker {
            let entry = match entry {
                Ok(entry) => entry,
                Err(e) => {
                    tracing::warn!(
                        dir = %dir.display(),
                        error = %e,
                        "Failed to read template directory entry"
                    );
                    continue;
                }
            };

            let path = entry.path();
            if !entry.file_type().is_file() || !is_template_file(path) {
                continue;
            }

            match load_file(path) {
                Ok(template) => {
                    tracing::info!(
                        id = %template.id,
                        document_type = %template.document_type,
                        "Loaded template"
                    );
                    store.insert(template);
                }
                Err(e) => tracing::warn!(error = %e, "Skipping template file"),
            }
        }

        store
    }

    fn insert(&mut self, template: Template) {
        if let Some(&idx) = self.by_id.get(&template.id) {
            tracing::warn!(id = %template.id, "Template id loaded twice, keeping the later one");
            self.templates[idx] = template;
        } else {
            self.by_id.insert(template.id.clone(), self.templates.len());
            self.templates.push(template);
        }
    }

    /// Pick the template for a request.
    ///
    /// An explicit id wins when it is loaded, then the first template of the
    /// requested type, then the built-in default. Never fails.
    pub fn resolve(
        &self,
        document_type: DocumentType,
        template_id: Option<&str>,
    ) -> Cow<'_, Template> {
        if let Some(id) = template_id {
            if let Some(template) = self.get(id) {
                return Cow::Borrowed(template);
            }
            tracing::warn!(template_id = id, "Requested template not loaded");
        }

        if let Some(template) = self.templates.iter().find(|t| t.document_type == document_type) {
            return Cow::Borrowed(template);
        }

        tracing::warn!(
            document_type = %document_type,
            "No template for document type, using built-in template"
        );
        Cow::Owned(default_template(document_type))
    }

    /// Look up a template by id.
    pub fn get(&self, id: &str) -> Option<&Template> {
        self.by_id.get(id).map(|&idx| &self.templates[idx])
    }

    /// Templates in load order.
    pub fn iter(&self) -> impl Iterator<Item = &Template> {
        self.templates.iter()
    }

    pub fn len(&self) -> usize {
        self.templates.len()
    }

    pub fn is_empty(&self) -> bool {
        self.templates.is_empty()
    }
}

fn is_template_file(path: &Path) -> bool {
    matches!(path.extension().and_then(|e| e.to_str()), Some("json" | "yaml" | "yml"))
}

/// Parse and validate one template file.
fn load_file(path: &Path) -> Result<Template, TemplateError> {
    let content = std::fs::read_to_string(path)
        .map_err(|source| TemplateError::Io { path: path.to_path_buf(), source })?;

    let parse_error = |message: String| TemplateError::Parse { path: path.to_path_buf(), message };

    let mut template: Template = match path.extension().and_then(|e| e.to_str()) {
        Some("json") => serde_json::from_str(&content).map_err(|e| parse_error(e.to_string()))?,
        _ => serde_yaml::from_str(&content).map_err(|e| parse_error(e.to_string()))?,
    };

    if template.id.is_empty() {
        template.id =
            path.file_stem().and_then(|s| s.to_str()).unwrap_or_default().to_string();
    }

    template.validate()?;
    Ok(template)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;
    use tempfile::TempDir;

    fn write(dir: &TempDir, name: &str, content: &str) {
        fs::write(dir.path().join(name), content).unwrap();
    }

    #[test]
    fn test_missing_directory_yields_empty_store() {
        let store = TemplateStore::load(Path::new("/definitely/not/a/template/dir"));
        assert!(store.is_empty());

        let template = store.resolve(DocumentType::Proposal, None);
        assert_eq!(template.id, "default");
        assert_eq!(template.sections.len(), 7);
    }

    #[test]
    fn test_load_json_and_yaml() {
        let dir = TempDir::new().unwrap();
        write(
            &dir,
            "a_proposal.json",
            r#"{"id": "proposal-std", "document_type": "proposal",
                "sections": [{"name": "Summary", "required": true}]}"#,
        );
        write(
            &dir,
            "b_spec.yaml",
            "document_type: technical_spec\n\
             sections:\n  - name: Scope\n    body: \"Scope of {{title}}\"\n",
        );
        write(&dir, "notes.txt", "ignored");

        let store = TemplateStore::load(dir.path());
        assert_eq!(store.len(), 2);
        assert!(store.get("proposal-std").is_some());

        // id falls back to the file stem
        let spec = store.get("b_spec").unwrap();
        assert_eq!(spec.document_type, DocumentType::TechnicalSpec);
        assert_eq!(spec.sections[0].body.as_deref(), Some("Scope of {{title}}"));
    }

    #[test]
    fn test_invalid_files_are_skipped() {
        let dir = TempDir::new().unwrap();
        write(&dir, "broken.json", "{not json");
        write(
            &dir,
            "dup.json",
            r#"{"document_type": "proposal", "sections": [{"name": "A"}, {"name": "A"}]}"#,
        );
        write(
            &dir,
            "nested.json",
            r#"{"document_type": "proposal",
                "sections": [{"name": "A", "body": "{if a}{if b}x{endif}{endif}"}]}"#,
        );
        write(&dir, "ok.json", r#"{"document_type": "contract", "sections": [{"name": "Terms"}]}"#);

        let store = TemplateStore::load(dir.path());
        assert_eq!(store.len(), 1);
        assert!(store.get("ok").is_some());
    }

    #[cfg(unix)]
    #[test]
    fn test_symlinked_template_is_loaded() {
        let source = TempDir::new().unwrap();
        write(
            &source,
            "real.json",
            r#"{"id": "shared", "document_type": "proposal", "sections": [{"name": "Summary"}]}"#,
        );

        let dir = TempDir::new().unwrap();
        std::os::unix::fs::symlink(source.path().join("real.json"), dir.path().join("linked.json"))
            .unwrap();
        std::os::unix::fs::symlink(dir.path().join("gone.json"), dir.path().join("dangling.json"))
            .unwrap();

        let store = TemplateStore::load(dir.path());
        assert_eq!(store.len(), 1);
        assert_eq!(store.get("shared").unwrap().section_names(), vec!["Summary"]);
    }

    #[test]
    fn test_later_file_wins_on_id_collision() {
        let dir = TempDir::new().unwrap();
        write(
            &dir,
            "1.json",
            r#"{"id": "same", "document_type": "proposal", "sections": [{"name": "First"}]}"#,
        );
        write(
            &dir,
            "2.json",
            r#"{"id": "same", "document_type": "proposal", "sections": [{"name": "Second"}]}"#,
        );

        let store = TemplateStore::load(dir.path());
        assert_eq!(store.len(), 1);
        assert_eq!(store.get("same").unwrap().section_names(), vec!["Second"]);
    }

    #[test]
    fn test_resolve_order() {
        let dir = TempDir::new().unwrap();
        write(
            &dir,
            "a.json",
            r#"{"id": "p1", "document_type": "proposal", "sections": [{"name": "P1"}]}"#,
        );
        write(
            &dir,
            "b.json",
            r#"{"id": "p2", "document_type": "proposal", "sections": [{"name": "P2"}]}"#,
        );
        let store = TemplateStore::load(dir.path());

        assert_eq!(store.resolve(DocumentType::Proposal, Some("p2")).id, "p2");
        assert_eq!(store.resolve(DocumentType::Proposal, None).id, "p1");
        assert_eq!(store.resolve(DocumentType::Proposal, Some("nope")).id, "p1");
        assert_eq!(store.resolve(DocumentType::Contract, None).id, "default");
    }

    #[test]
    fn test_resolved_sections_unique_and_ordered() {
        let dir = TempDir::new().unwrap();
        write(
            &dir,
            "t.json",
            r#"{"document_type": "reference",
                "sections": [{"name": "C"}, {"name": "A"}, {"name": "B"}]}"#,
        );
        let store = TemplateStore::load(dir.path());

        for t in DocumentType::ALL {
            let template = store.resolve(t, None);
            let names = template.section_names();
            let mut unique = names.clone();
            unique.sort_unstable();
            unique.dedup();
            assert_eq!(unique.len(), names.len());
        }
        let reference = store.resolve(DocumentType::Reference, None);
        assert_eq!(reference.section_names(), vec!["C", "A", "B"]);
    }
}
