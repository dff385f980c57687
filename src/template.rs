//! Page, section and table-of-contents templates.
//!
//! Built-in templates are embedded at compile time. A template directory may
//! replace any of them; a file missing from that directory keeps the built-in.

use log::debug;
use minijinja::{AutoEscape, Environment, context};
use serde::Serialize;
use std::borrow::Cow;
use std::io;
use std::path::Path;
use tokio::fs;

use crate::document::{CodeSection, Document, TableOfContents};
use crate::error::RenderError;
use html_escape::{encode_double_quoted_attribute, encode_text};

pub const DOCUMENT_TEMPLATE: &str = "document.html";
pub const SECTION_TEMPLATE: &str = "section.html";
pub const TOC_TEMPLATE: &str = "toc.html";

const BUILTIN_DOCUMENT: &str = include_str!("../templates/document.html");
const BUILTIN_SECTION: &str = include_str!("../templates/section.html");
const BUILTIN_TOC: &str = include_str!("../templates/toc.html");

#[derive(Debug, Clone)]
pub struct Templates {
    document: Cow<'static, str>,
    section: Cow<'static, str>,
    toc: Cow<'static, str>,
}

impl Default for Templates {
    fn default() -> Self {
        Self::builtin()
    }
}

impl Templates {
    pub fn builtin() -> Self {
        Self {
            document: Cow::Borrowed(BUILTIN_DOCUMENT),
            section: Cow::Borrowed(BUILTIN_SECTION),
            toc: Cow::Borrowed(BUILTIN_TOC),
        }
    }

    /// Built-in templates, overridden by whatever `dir` provides.
    pub async fn load(dir: Option<&Path>) -> Result<Self, RenderError> {
        let mut templates = Self::builtin();
        let Some(dir) = dir else {
            return Ok(templates);
        };

        if let Some(source) = read_override(dir, DOCUMENT_TEMPLATE).await? {
            templates.document = Cow::Owned(source);
        }
        if let Some(source) = read_override(dir, SECTION_TEMPLATE).await? {
            templates.section = Cow::Owned(source);
        }
        if let Some(source) = read_override(dir, TOC_TEMPLATE).await? {
            templates.toc = Cow::Owned(source);
        }

        Ok(templates)
    }

    /// Renders the whole page.
    pub fn render(&self, document: &Document) -> Result<String, RenderError> {
        let env = self.environment()?;

        let section_template = env.get_template(SECTION_TEMPLATE)?;
        let mut sections = String::new();
        for section in &document.sections {
            sections.push_str(&section_template.render(SectionContext::new(section))?);
            sections.push('\n');
        }

        let toc = match &document.toc {
            Some(toc) => env.get_template(TOC_TEMPLATE)?.render(TocContext::new(toc))?,
            None => String::new(),
        };

        let page = env.get_template(DOCUMENT_TEMPLATE)?.render(context! {
            title => encode_text(&document.title).into_owned(),
            toc => toc,
            sections => sections,
        })?;

        Ok(page)
    }

    fn environment(&self) -> Result<Environment<'_>, RenderError> {
        let mut env = Environment::new();
        env.set_trim_blocks(true);
        env.set_lstrip_blocks(true);
        // Values are escaped (or trusted) before they reach a template
        env.set_auto_escape_callback(|_| AutoEscape::None);
        env.add_template(DOCUMENT_TEMPLATE, &self.document)?;
        env.add_template(SECTION_TEMPLATE, &self.section)?;
        env.add_template(TOC_TEMPLATE, &self.toc)?;
        Ok(env)
    }
}

async fn read_override(dir: &Path, name: &str) -> Result<Option<String>, RenderError> {
    let path = dir.join(name);
    match fs::read_to_string(&path).await {
        Ok(source) => {
            debug!("Using template override: {}", path.display());
            Ok(Some(source))
        }
        Err(err) if err.kind() == io::ErrorKind::NotFound => Ok(None),
        Err(err) => Err(RenderError::Config(format!(
            "failed to read template {}: {err}",
            path.display()
        ))),
    }
}

#[derive(Serialize)]
struct SectionContext<'a> {
    anchor: String,
    path: String,
    extension: String,
    code: &'a str,
}

impl<'a> SectionContext<'a> {
    fn new(section: &'a CodeSection) -> Self {
        Self {
            anchor: encode_double_quoted_attribute(&section.anchor).into_owned(),
            path: encode_text(&section.display_path).into_owned(),
            extension: encode_double_quoted_attribute(&section.extension).into_owned(),
            code: section.code.as_str(),
        }
    }
}

#[derive(Serialize)]
struct TocContext {
    folder: String,
    count: usize,
    entries: Vec<TocEntryContext>,
}

#[derive(Serialize)]
struct TocEntryContext {
    anchor: String,
    label: String,
}

impl TocContext {
    fn new(toc: &TableOfContents) -> Self {
        Self {
            folder: encode_text(&toc.folder).into_owned(),
            count: toc.entries.len(),
            entries: toc
                .entries
                .iter()
                .map(|entry| TocEntryContext {
                    anchor: encode_double_quoted_attribute(&entry.anchor).into_owned(),
                    label: encode_text(&entry.label).into_owned(),
                })
                .collect(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::highlight::HtmlFragment;

    fn section(path: &str, code: &str) -> CodeSection {
        CodeSection {
            anchor: path.to_string(),
            display_path: path.to_string(),
            extension: "py".to_string(),
            code: HtmlFragment::trusted(code),
        }
    }

    #[test]
    fn test_single_file_page_has_no_toc() -> anyhow::Result<()> {
        let document = Document::assemble(vec![section("notes.py", "x")], None);
        let html = Templates::builtin().render(&document)?;

        assert!(html.contains("<title>Code Listing</title>"));
        assert!(!html.contains("table-of-contents\">"));
        assert!(html.contains(r#"<h2 id="notes.py" class="file-heading">notes.py</h2>"#));
        assert!(html.contains(r#"<code class="hl py">x</code>"#));
        Ok(())
    }

    #[test]
    fn test_fragment_is_inserted_verbatim() -> anyhow::Result<()> {
        let code = r#"<span class="hl-keyword">def</span> f(): &lt;"#;
        let document = Document::assemble(vec![section("a.py", code)], None);
        let html = Templates::builtin().render(&document)?;
        assert!(html.contains(code));
        Ok(())
    }

    #[test]
    fn test_paths_are_escaped() -> anyhow::Result<()> {
        let document = Document::assemble(vec![section("root/<b>&.py", "x")], Some("root"));
        let html = Templates::builtin().render(&document)?;
        assert!(html.contains("root/&lt;b&gt;&amp;.py"));
        assert!(!html.contains("<b>"));
        Ok(())
    }

    #[test]
    fn test_quotes_are_escaped_in_attributes_only() -> anyhow::Result<()> {
        let document = Document::assemble(vec![section(r#"root/say "hi".py"#, "x")], Some("root"));
        let html = Templates::builtin().render(&document)?;

        assert!(html.contains(r#"id="root/say &quot;hi&quot;.py""#));
        assert!(html.contains(r##"href="#root/say &quot;hi&quot;.py""##));
        assert!(html.contains(r#"class="file-heading">root/say "hi".py</h2>"#));
        Ok(())
    }

    #[test]
    fn test_directory_page_lists_sections() -> anyhow::Result<()> {
        let document = Document::assemble(
            vec![section("root/a.py", "1"), section("root/b/c.js", "2")],
            Some("root"),
        );
        let html = Templates::builtin().render(&document)?;

        assert!(html.contains("<title>Code Listing - root</title>"));
        assert!(html.contains("<h1>Folder root</h1>"));
        assert!(html.contains("<h2>2 printable files</h2>"));
        let first = html.find(r##"<a href="#root/a.py">"##).unwrap();
        let second = html.find(r##"<a href="#root/b/c.js">"##).unwrap();
        assert!(first < second);
        Ok(())
    }

    #[tokio::test]
    async fn test_override_directory_replaces_only_present_files() -> anyhow::Result<()> {
        let dir = tempfile::tempdir()?;
        std::fs::write(
            dir.path().join(SECTION_TEMPLATE),
            "<section id=\"{{ anchor }}\">{{ code }}</section>",
        )?;

        let templates = Templates::load(Some(dir.path())).await?;
        let document = Document::assemble(vec![section("a.py", "x")], None);
        let html = templates.render(&document)?;

        assert!(html.contains(r#"<section id="a.py">x</section>"#));
        assert!(html.contains("<!DOCTYPE html>"));
        Ok(())
    }

    #[test]
    fn test_broken_template_is_a_template_error() {
        let templates = Templates {
            section: Cow::Borrowed("{% for %}"),
            ..Templates::builtin()
        };
        let document = Document::assemble(vec![section("a.py", "x")], None);
        assert!(matches!(
            templates.render(&document),
            Err(RenderError::Template(_))
        ));
    }
}
