//! Where saved reports go

use std::fs;
use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use url::Url;

const REPORT_EXTENSION: &str = "json";

/// Where `--save` writes: `base` itself when it already names a `.json`
/// file, otherwise a URL-derived file inside the `base` directory
pub fn build_output_path(base: &Path, url: &Url) -> PathBuf {
    match base.extension() {
        Some(ext) if ext.eq_ignore_ascii_case(REPORT_EXTENSION) => base.to_path_buf(),
        _ => base.join(derive_output_filename(url)),
    }
}

/// `host__path[__query].json`, with every unsafe character mapped to `_`
pub fn derive_output_filename(url: &Url) -> String {
    let path = match url.path().trim_matches('/') {
        "" => "index",
        trimmed => trimmed,
    };
    let stem = [url.host_str().or(Some("page")), Some(path), url.query()]
        .into_iter()
        .flatten()
        .filter(|part| !part.is_empty())
        .map(filename_safe)
        .collect::<Vec<_>>()
        .join("__");
    format!("{stem}.{REPORT_EXTENSION}")
}

fn filename_safe(part: &str) -> String {
    part.chars()
        .map(|c| match c {
            'a'..='z' | 'A'..='Z' | '0'..='9' | '-' | '_' => c,
            _ => '_',
        })
        .collect()
}

/// Write `contents` to `path`, creating parent directories as needed
pub fn write_report(path: &Path, contents: &str) -> Result<()> {
    if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
        fs::create_dir_all(parent)
            .with_context(|| format!("failed to create output directory {}", parent.display()))?;
    }
    fs::write(path, contents.as_bytes())
        .with_context(|| format!("failed to write output file {}", path.display()))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn filename_from_host_path_and_query() {
        let url = Url::parse("https://shop.example.com/bags/tote?color=brown").unwrap();
        assert_eq!(
            derive_output_filename(&url),
            "shop_example_com__bags_tote__color_brown.json"
        );
    }

    #[test]
    fn root_path_becomes_index() {
        let url = Url::parse("https://example.com/").unwrap();
        assert_eq!(derive_output_filename(&url), "example_com__index.json");
    }

    #[test]
    fn explicit_json_file_is_kept() {
        let url = Url::parse("https://example.com/").unwrap();
        assert_eq!(
            build_output_path(Path::new("out/report.JSON"), &url),
            PathBuf::from("out/report.JSON")
        );
        assert_eq!(
            build_output_path(Path::new("reports"), &url),
            PathBuf::from("reports").join("example_com__index.json")
        );
    }

    #[test]
    fn write_report_creates_directories() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("nested").join("report.json");
        write_report(&path, "{}").unwrap();
        assert_eq!(fs::read_to_string(path).unwrap(), "{}");
    }
}
