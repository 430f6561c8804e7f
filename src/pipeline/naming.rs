//! Output path policy: where each sheet's PDF goes.
//!
//! | Workbook | Output |
//! |----------|--------|
//! | one sheet | `{dir}/{base}.pdf` |
//! | several sheets | `{dir}/{base}_{sanitized sheet}.pdf` for each |
//!
//! The decision uses the workbook's total sheet count, not the number of
//! non-empty sheets, so a two-sheet workbook with one empty sheet still gets
//! a sheet-qualified file name.

use std::collections::HashSet;
use std::path::{Path, PathBuf};

/// Extension of every file the batch writes.
pub const PDF_EXTENSION: &str = "pdf";

/// Make a sheet name safe for use inside a file name.
///
/// Every character that is not alphanumeric, a space, `_` or `-` becomes `_`;
/// trailing whitespace is then removed. Total and deterministic: the empty
/// string maps to itself and an all-symbol name maps to underscores.
pub fn sanitize_sheet_name(name: &str) -> String {
    let replaced: String = name
        .chars()
        .map(|c| {
            if c.is_alphanumeric() || matches!(c, ' ' | '_' | '-') {
                c
            } else {
                '_'
            }
        })
        .collect();
    replaced.trim_end().to_string()
}

/// Compute one output path per sheet, in sheet order.
///
/// When two names sanitize to the same fragment, later ones get `_2`, `_3`, …
/// appended so no two sheets of a workbook share an output path. Names that
/// differ only by case count as the same, since they would share a file on
/// case-insensitive filesystems.
pub fn sheet_output_paths(dir: &Path, base_name: &str, sheet_names: &[String]) -> Vec<PathBuf> {
    if sheet_names.len() == 1 {
        return vec![workbook_output_path(dir, base_name)];
    }

    let mut seen: HashSet<String> = HashSet::with_capacity(sheet_names.len());
    sheet_names
        .iter()
        .map(|name| {
            let fragment = sanitize_sheet_name(name);
            let mut stem = format!("{base_name}_{fragment}");
            let mut n = 2;
            while !seen.insert(stem.to_lowercase()) {
                stem = format!("{base_name}_{fragment}_{n}");
                n += 1;
            }
            dir.join(format!("{stem}.{PDF_EXTENSION}"))
        })
        .collect()
}

/// `{dir}/{base}.pdf`: single-sheet workbooks and combined layout.
pub fn workbook_output_path(dir: &Path, base_name: &str) -> PathBuf {
    dir.join(format!("{base_name}.{PDF_EXTENSION}"))
}

/// Directory a discovered file's PDFs are written to.
///
/// With mirroring on, a file found in `{input}/a/b/` lands in
/// `{output}/a/b/`; files at the input root, and every file when mirroring
/// is off, land directly in `output_root`.
pub fn output_dir_for(output_root: &Path, relative_dir: &Path, mirror: bool) -> PathBuf {
    if mirror && !relative_dir.as_os_str().is_empty() {
        output_root.join(relative_dir)
    } else {
        output_root.to_path_buf()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn names(v: &[&str]) -> Vec<String> {
        v.iter().map(|s| s.to_string()).collect()
    }

    fn file_names(paths: &[PathBuf]) -> Vec<String> {
        paths
            .iter()
            .map(|p| p.file_name().unwrap().to_string_lossy().into_owned())
            .collect()
    }

    #[test]
    fn sanitize_replaces_symbols() {
        assert_eq!(sanitize_sheet_name("Notes!"), "Notes_");
        assert_eq!(sanitize_sheet_name("Q1 2024"), "Q1 2024");
        assert_eq!(sanitize_sheet_name("a/b\\c:d"), "a_b_c_d");
        assert_eq!(sanitize_sheet_name("keep_me-too"), "keep_me-too");
    }

    #[test]
    fn sanitize_strips_trailing_whitespace() {
        assert_eq!(sanitize_sheet_name("Data   "), "Data");
        assert_eq!(sanitize_sheet_name("  Lead"), "  Lead");
        // a tab is not an allowed character, so it is replaced, not stripped
        assert_eq!(sanitize_sheet_name("Tab\t"), "Tab_");
    }

    #[test]
    fn sanitize_is_total() {
        assert_eq!(sanitize_sheet_name(""), "");
        assert_eq!(sanitize_sheet_name("!?*"), "___");
        assert_eq!(sanitize_sheet_name("   "), "");
    }

    #[test]
    fn sanitize_keeps_unicode_letters() {
        assert_eq!(sanitize_sheet_name("Übersicht"), "Übersicht");
        assert_eq!(sanitize_sheet_name("売上 #1"), "売上 _1");
    }

    #[test]
    fn sanitize_output_alphabet_and_determinism() {
        let samples = [
            "Q1 2024", "Notes!", "", "   ", "a\u{0}b", "💰 budget ", "x/y/z", "tab\tend",
            "emoji🙂", "--__--", "dots.and,commas;",
        ];
        for s in samples {
            let once = sanitize_sheet_name(s);
            assert_eq!(once, sanitize_sheet_name(s), "not deterministic for {s:?}");
            assert!(
                once.chars()
                    .all(|c| c.is_alphanumeric() || matches!(c, ' ' | '_' | '-')),
                "bad char in {once:?}"
            );
            assert_eq!(once, once.trim_end(), "trailing whitespace in {once:?}");
        }
    }

    #[test]
    fn single_sheet_uses_bare_base_name() {
        let paths = sheet_output_paths(Path::new("out"), "report", &names(&["Data"]));
        assert_eq!(paths, vec![PathBuf::from("out").join("report.pdf")]);
    }

    #[test]
    fn multiple_sheets_embed_sanitized_names() {
        let paths = sheet_output_paths(Path::new("out"), "report", &names(&["Q1 2024", "Notes!"]));
        assert_eq!(
            file_names(&paths),
            vec!["report_Q1 2024.pdf", "report_Notes_.pdf"]
        );
        assert!(paths.iter().all(|p| p.parent() == Some(Path::new("out"))));
    }

    #[test]
    fn colliding_sheet_names_get_suffixes() {
        let paths = sheet_output_paths(
            Path::new("out"),
            "r",
            &names(&["A!", "A?", "A*", "B"]),
        );
        assert_eq!(
            file_names(&paths),
            vec!["r_A_.pdf", "r_A__2.pdf", "r_A__3.pdf", "r_B.pdf"]
        );
    }

    #[test]
    fn suffix_does_not_clash_with_real_sheet_name() {
        let paths = sheet_output_paths(Path::new("out"), "r", &names(&["A_2", "A!", "A?"]));
        let unique: HashSet<_> = paths.iter().collect();
        assert_eq!(unique.len(), 3);
    }

    #[test]
    fn names_differing_only_by_case_collide() {
        let paths = sheet_output_paths(Path::new("out"), "r", &names(&["A!", "a?"]));
        assert_eq!(file_names(&paths), vec!["r_A_.pdf", "r_a__2.pdf"]);
    }

    #[test]
    fn no_sheets_no_paths() {
        assert!(sheet_output_paths(Path::new("out"), "r", &[]).is_empty());
    }

    #[test]
    fn mirror_places_file_under_relative_dir() {
        let dir = output_dir_for(Path::new("output"), Path::new("sub"), true);
        assert_eq!(dir, PathBuf::from("output").join("sub"));
        assert_eq!(
            workbook_output_path(&dir, "a"),
            PathBuf::from("output").join("sub").join("a.pdf")
        );
    }

    #[test]
    fn no_mirror_or_root_file_uses_output_root() {
        assert_eq!(
            output_dir_for(Path::new("output"), Path::new("sub"), false),
            PathBuf::from("output")
        );
        assert_eq!(
            output_dir_for(Path::new("output"), Path::new(""), true),
            PathBuf::from("output")
        );
    }
}
