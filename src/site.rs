//! Static-site generation: walk a content tree, render each markdown page
//! into a template and mirror static assets next to the output.

use std::fs;
use std::io;
use std::path::{Path, PathBuf};

use log::{debug, info, warn};
use thiserror::Error;
use walkdir::WalkDir;

use crate::config::Config;

pub const TITLE_PLACEHOLDER: &str = "{{ Title }}";
pub const CONTENT_PLACEHOLDER: &str = "{{ Content }}";

/// Failures turning one markdown page into HTML.
#[derive(Debug, Error)]
pub enum PageError {
    #[error(transparent)]
    Markdown(#[from] crate::Error),

    #[error("no `# ` title line found")]
    MissingTitle,
}

#[derive(Debug, Error)]
pub enum SiteError {
    #[error("IO error at {path}: {source}")]
    Io { path: PathBuf, source: io::Error },

    #[error("Failed to render {path}: {source}")]
    Page { path: PathBuf, source: PageError },

    #[error("{path} is not inside {root}")]
    OutsideRoot { path: PathBuf, root: PathBuf },

    #[error(transparent)]
    Walk(#[from] walkdir::Error),
}

fn io_error(path: &Path) -> impl FnOnce(io::Error) -> SiteError + '_ {
    move |source| SiteError::Io {
        path: path.to_path_buf(),
        source,
    }
}

/// Counts reported after a full build.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct BuildSummary {
    pub pages: usize,
    pub static_files: usize,
}

/// Text of the first `# ` heading line, trimmed.
pub fn extract_title(markdown: &str) -> Option<String> {
    markdown
        .lines()
        .filter_map(|line| line.trim_start().strip_prefix("# "))
        .map(str::trim)
        .find(|title| !title.is_empty())
        .map(str::to_string)
}

/// Rewrite root-relative `href="/` and `src="/` to live under `base_path`.
pub fn rewrite_base_path(html: &str, base_path: &str) -> String {
    let base = base_path.trim_end_matches('/');
    html.replace("href=\"/", &format!("href=\"{base}/"))
        .replace("src=\"/", &format!("src=\"{base}/"))
}

/// Render a markdown page into `template`.
pub fn render_page(markdown: &str, template: &str, base_path: &str) -> Result<String, PageError> {
    let content = crate::markdown_to_html(markdown)?;
    let title = extract_title(markdown).ok_or(PageError::MissingTitle)?;

    let page = template
        .replace(TITLE_PLACEHOLDER, &title)
        .replace(CONTENT_PLACEHOLDER, &content);
    Ok(rewrite_base_path(&page, base_path))
}

/// Render the markdown file at `from` into `dest` using the template at `template_path`.
pub fn generate_page(
    from: &Path,
    template_path: &Path,
    dest: &Path,
    base_path: &str,
) -> Result<(), SiteError> {
    let template = fs::read_to_string(template_path).map_err(io_error(template_path))?;
    write_page(from, &template, dest, base_path)
}

fn write_page(from: &Path, template: &str, dest: &Path, base_path: &str) -> Result<(), SiteError> {
    info!("Generating page from {} to {}", from.display(), dest.display());

    let markdown = fs::read_to_string(from).map_err(io_error(from))?;
    let page = render_page(&markdown, template, base_path).map_err(|source| SiteError::Page {
        path: from.to_path_buf(),
        source,
    })?;

    if let Some(parent) = dest.parent() {
        fs::create_dir_all(parent).map_err(io_error(parent))?;
    }
    fs::write(dest, page).map_err(io_error(dest))
}

fn relative_to<'a>(path: &'a Path, root: &Path) -> Result<&'a Path, SiteError> {
    path.strip_prefix(root)
        .map_err(|_| SiteError::OutsideRoot {
            path: path.to_path_buf(),
            root: root.to_path_buf(),
        })
}

/// Render every `.md` file under `content_dir` to the matching `.html` path
/// under `dest_dir`. Returns the number of pages written.
pub fn generate_pages_recursive(
    content_dir: &Path,
    template_path: &Path,
    dest_dir: &Path,
    base_path: &str,
) -> Result<usize, SiteError> {
    let template = fs::read_to_string(template_path).map_err(io_error(template_path))?;
    let mut pages = 0;

    for entry in WalkDir::new(content_dir).sort_by_file_name() {
        let entry = entry?;
        if !entry.file_type().is_file() {
            continue;
        }

        let path = entry.path();
        if path.extension().is_none_or(|ext| ext != "md") {
            debug!("Skipping non-markdown file {}", path.display());
            continue;
        }

        let dest = dest_dir
            .join(relative_to(path, content_dir)?)
            .with_extension("html");
        write_page(path, &template, &dest, base_path)?;
        pages += 1;
    }

    Ok(pages)
}

/// Mirror `src` into `dst`. Returns the number of files copied.
pub fn copy_dir_recursive(src: &Path, dst: &Path) -> Result<usize, SiteError> {
    let mut copied = 0;

    for entry in WalkDir::new(src).sort_by_file_name() {
        let entry = entry?;
        let target = dst.join(relative_to(entry.path(), src)?);

        if entry.file_type().is_dir() {
            fs::create_dir_all(&target).map_err(io_error(&target))?;
        } else {
            debug!("Copying {} to {}", entry.path().display(), target.display());
            fs::copy(entry.path(), &target).map_err(io_error(&target))?;
            copied += 1;
        }
    }

    Ok(copied)
}

/// Clear the output directory, copy static files, and render all pages.
pub fn build_site(config: &Config) -> Result<BuildSummary, SiteError> {
    let output = &config.output_dir;
    if output.exists() {
        info!("Removing {}", output.display());
        fs::remove_dir_all(output).map_err(io_error(output))?;
    }
    fs::create_dir_all(output).map_err(io_error(output))?;

    let static_files = if config.static_dir.is_dir() {
        copy_dir_recursive(&config.static_dir, output)?
    } else {
        warn!(
            "Static directory {} not found, skipping",
            config.static_dir.display()
        );
        0
    };

    let pages = generate_pages_recursive(
        &config.content_dir,
        &config.template,
        output,
        &config.base_path,
    )?;

    Ok(BuildSummary {
        pages,
        static_files,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;
    use rstest::rstest;

    const TEMPLATE: &str = "<title>{{ Title }}</title><a href=\"/index.html\">home</a>{{ Content }}";

    fn init_logger() {
        let _ = env_logger::builder().is_test(true).try_init();
    }

    #[rstest]
    #[case("# heading", Some("heading"))]
    #[case("#   Hello world   ", Some("Hello world"))]
    #[case("# First\n\n# Second", Some("First"))]
    #[case("## Not it\n### Also not it\n# Yes it", Some("Yes it"))]
    #[case("This is # not a header\n\n# Real", Some("Real"))]
    #[case("   # Indented", Some("Indented"))]
    #[case("#Nope\n# Yep", Some("Yep"))]
    #[case("Title\n=====\n", None)]
    #[case("", None)]
    #[case("#", None)]
    #[case("## heading\nsome text\n### more", None)]
    fn extracts_title(#[case] markdown: &str, #[case] expected: Option<&str>) {
        assert_eq!(extract_title(markdown).as_deref(), expected);
    }

    #[rstest]
    #[case("/", r#"<a href="/x">"#)]
    #[case("/blog", r#"<a href="/blog/x">"#)]
    #[case("/blog/", r#"<a href="/blog/x">"#)]
    fn rewrites_base_path(#[case] base: &str, #[case] expected: &str) {
        assert_eq!(rewrite_base_path(r#"<a href="/x">"#, base), expected);
    }

    #[test]
    fn rewrites_image_sources_too() {
        assert_eq!(
            rewrite_base_path(r#"<img src="/a.png" alt="a">"#, "/site"),
            r#"<img src="/site/a.png" alt="a">"#
        );
    }

    #[test]
    fn renders_into_template() {
        let page = render_page("# Hello\n\nBody _text_", TEMPLATE, "/base").unwrap();
        assert_eq!(
            page,
            "<title>Hello</title><a href=\"/base/index.html\">home</a><div><h1>Hello</h1><p>Body <i>text</i></p></div>"
        );
    }

    #[test]
    fn page_without_title_fails() {
        assert!(matches!(
            render_page("just text", TEMPLATE, "/"),
            Err(PageError::MissingTitle)
        ));
    }

    #[test]
    fn builds_a_site() {
        init_logger();
        let root = tempfile::tempdir().unwrap();
        let content = root.path().join("content");
        let statics = root.path().join("static");
        fs::create_dir_all(content.join("blog")).unwrap();
        fs::create_dir_all(statics.join("images")).unwrap();
        fs::write(content.join("index.md"), "# Home\n\nWelcome").unwrap();
        fs::write(content.join("blog").join("post.md"), "# Post\n\n- one\n- two").unwrap();
        fs::write(content.join("notes.txt"), "ignored").unwrap();
        fs::write(statics.join("index.css"), "body {}").unwrap();
        fs::write(statics.join("images").join("logo.png"), [0u8, 1, 2]).unwrap();
        let template = root.path().join("template.html");
        fs::write(&template, TEMPLATE).unwrap();

        let config = Config {
            content_dir: content,
            static_dir: statics,
            output_dir: root.path().join("docs"),
            template,
            base_path: "/".to_string(),
        };
        fs::create_dir_all(config.output_dir.join("stale")).unwrap();

        let summary = build_site(&config).unwrap();
        assert_eq!(
            summary,
            BuildSummary {
                pages: 2,
                static_files: 2
            }
        );

        let out = &config.output_dir;
        assert!(!out.join("stale").exists());
        assert!(out.join("images").join("logo.png").is_file());
        assert!(!out.join("notes.html").exists());
        let post = fs::read_to_string(out.join("blog").join("post.html")).unwrap();
        assert!(post.contains("<title>Post</title>"));
        assert!(post.contains("<ul><li>one</li><li>two</li></ul>"));
    }

    #[test]
    fn bad_page_names_its_path() {
        init_logger();
        let root = tempfile::tempdir().unwrap();
        let from = root.path().join("bad.md");
        let template = root.path().join("template.html");
        fs::write(&from, "# Bad\n\nunclosed **bold").unwrap();
        fs::write(&template, TEMPLATE).unwrap();

        let err = generate_page(&from, &template, &root.path().join("bad.html"), "/").unwrap_err();
        match err {
            SiteError::Page { path, .. } => assert_eq!(path, from),
            other => panic!("unexpected error: {other}"),
        }
    }
}
