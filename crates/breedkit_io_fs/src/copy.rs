//! Category enumeration, image selection and copy orchestration.

use std::collections::HashSet;
use std::ffi::OsString;
use std::fs;
use std::path::{Path, PathBuf};

use tracing::{debug, info, warn};

use crate::report::{ReportSample, ReportSampleBuilder};
use crate::spec::{
    EnumSampleFailureMode, EnumSampleStaleFileStrategy, SampleTreeError, SpecCategoryOutcome,
    SpecImageSelection, SpecSampleError, SpecSampleOptions,
};
use crate::util::{
    SpecExtensionMatcher, copy_file_with_metadata, derive_output_name, is_overlap,
    validate_destination_entry, validate_ext_output,
};

#[derive(Debug, Clone)]
struct SpecCategoryEntry {
    path_dir_src_sub: PathBuf,
    name_dir: OsString,
}

#[derive(Debug, Clone)]
struct SpecImageEntry {
    path_file_src: PathBuf,
    name_file: OsString,
}

#[derive(Debug)]
struct SpecSampleContext {
    path_dir_dst: PathBuf,
    spec_sample_options: SpecSampleOptions,
    matcher: SpecExtensionMatcher,
    builder_sample_report: ReportSampleBuilder,
}

/// Copy the first few images of every category folder under `dir_source`
/// into a same-named folder under `dir_destination`, renamed `1.jpg`,
/// `2.jpg`, ...
///
/// Behavior is controlled by [`SpecSampleOptions`]:
/// - selection count and accepted extensions,
/// - output extension,
/// - stale destination file policy,
/// - per-category failure policy,
/// - metadata preservation and dry-run.
///
/// This function performs:
/// 1. Option validation and source/destination checks.
/// 2. Destination root initialization.
/// 3. One pass over the category folders, in name order.
/// 4. Report aggregation.
///
/// Returns [`ReportSample`] when the run completes (with possible per-category
/// errors stored in the report). Returns [`SampleTreeError`] for setup
/// failures, a missing source root (nothing is written in that case), and
/// the first category failure under [`EnumSampleFailureMode::Abort`].
pub fn sample_tree<P, Q>(
    dir_source: P,
    dir_destination: Q,
    spec_sample_options: SpecSampleOptions,
) -> Result<ReportSample, SampleTreeError>
where
    P: AsRef<Path>,
    Q: AsRef<Path>,
{
    if spec_sample_options.count_per_category == 0 {
        return Err(SampleTreeError::InvalidOptions(
            "Arg `count_per_category` must be >= 1.".to_string(),
        ));
    }
    let matcher = SpecExtensionMatcher::from_extensions(&spec_sample_options.extensions)?;
    validate_ext_output(&spec_sample_options.ext_output)?;

    let path_dir_src = dir_source.as_ref().to_path_buf();
    let path_dir_dst = dir_destination.as_ref().to_path_buf();

    if !path_dir_src.exists() {
        return Err(SampleTreeError::SourceMissing(path_dir_src));
    }
    if !path_dir_src.is_dir() {
        return Err(SampleTreeError::SourceNotDirectory(path_dir_src));
    }
    if is_overlap(&path_dir_src, &path_dir_dst) {
        return Err(SampleTreeError::SourceDestinationOverlap {
            path_source: path_dir_src,
            path_destination: path_dir_dst,
        });
    }

    let mut builder_sample_report = ReportSampleBuilder::default();
    builder_sample_report.if_created_destination =
        init_destination_root(&path_dir_dst, spec_sample_options.if_dry_run)?;

    let l_categories = list_categories(&path_dir_src, &mut builder_sample_report)?;
    info!(
        source = %path_dir_src.display(),
        destination = %path_dir_dst.display(),
        categories = l_categories.len(),
        "sampling categories"
    );

    let mut spec_sample_ctx = SpecSampleContext {
        path_dir_dst,
        spec_sample_options,
        matcher,
        builder_sample_report,
    };

    for spec_category_entry in l_categories {
        handle_category_entry(spec_category_entry, &mut spec_sample_ctx)?;
    }

    let report = spec_sample_ctx.builder_sample_report.build();
    info!(
        copied = report.cnt_copied,
        errors = report.error_count(),
        "sampling finished"
    );
    Ok(report)
}

/// Returns `true` when the root did not exist (and was created unless dry-run).
fn init_destination_root(path_dir_dst: &Path, if_dry_run: bool) -> Result<bool, SampleTreeError> {
    match fs::symlink_metadata(path_dir_dst) {
        Ok(meta_dir_dst) => {
            if meta_dir_dst.file_type().is_symlink() {
                return Err(SampleTreeError::DestinationInitFailed {
                    path: path_dir_dst.to_path_buf(),
                    message: "Destination root path must not be a symbolic link.".to_string(),
                });
            }
            if !meta_dir_dst.is_dir() {
                return Err(SampleTreeError::DestinationInitFailed {
                    path: path_dir_dst.to_path_buf(),
                    message: "Destination root exists and is not a directory.".to_string(),
                });
            }
            Ok(false)
        }
        Err(_) if if_dry_run => Ok(true),
        Err(_) => {
            fs::create_dir_all(path_dir_dst).map_err(|e| {
                SampleTreeError::DestinationInitFailed {
                    path: path_dir_dst.to_path_buf(),
                    message: e.to_string(),
                }
            })?;
            info!(destination = %path_dir_dst.display(), "created destination root");
            Ok(true)
        }
    }
}

fn list_categories(
    path_dir_src: &Path,
    builder_sample_report: &mut ReportSampleBuilder,
) -> Result<Vec<SpecCategoryEntry>, SampleTreeError> {
    let iter_entries =
        fs::read_dir(path_dir_src).map_err(|e| SampleTreeError::SourceReadFailed {
            path: path_dir_src.to_path_buf(),
            message: e.to_string(),
        })?;

    let mut l_categories = Vec::new();
    for _entry_res in iter_entries {
        let entry = match _entry_res {
            Ok(v) => v,
            Err(e) => {
                builder_sample_report.add_warning(format!(
                    "Failed to read directory entry under {} ({e})",
                    path_dir_src.display()
                ));
                continue;
            }
        };

        let path_entry = entry.path();
        let cfg_file_type = match entry.file_type() {
            Ok(v) => v,
            Err(e) => {
                builder_sample_report
                    .add_warning(format!("Failed to inspect {} ({e})", path_entry.display()));
                continue;
            }
        };

        // Symlinked folders count as categories.
        let b_is_dir = cfg_file_type.is_dir() || (cfg_file_type.is_symlink() && path_entry.is_dir());
        if b_is_dir {
            l_categories.push(SpecCategoryEntry {
                path_dir_src_sub: path_entry,
                name_dir: entry.file_name(),
            });
        }
    }

    l_categories.sort_by(|a, b| a.name_dir.cmp(&b.name_dir));
    Ok(l_categories)
}

fn handle_category_entry(
    spec_category_entry: SpecCategoryEntry,
    spec_sample_ctx: &mut SpecSampleContext,
) -> Result<(), SampleTreeError> {
    let name_category = spec_category_entry.name_dir.to_string_lossy().to_string();
    spec_sample_ctx.builder_sample_report.add_category();

    let mut spec_outcome = SpecCategoryOutcome {
        name: name_category.clone(),
        ..SpecCategoryOutcome::default()
    };
    let res_category = sample_category(&spec_category_entry, &mut spec_outcome, spec_sample_ctx);
    spec_sample_ctx
        .builder_sample_report
        .push_category(spec_outcome);

    let Err(spec_error) = res_category else {
        debug!(category = %name_category, "category done");
        return Ok(());
    };

    warn!(
        category = %name_category,
        path = %spec_error.path.display(),
        "{}",
        spec_error.exception
    );
    match spec_sample_ctx.spec_sample_options.rule_failure {
        EnumSampleFailureMode::Isolate => {
            spec_sample_ctx.builder_sample_report.add_error(
                &spec_error.category,
                spec_error.path,
                spec_error.exception,
            );
            Ok(())
        }
        EnumSampleFailureMode::Abort => Err(SampleTreeError::CategoryFailed {
            category: name_category,
            path: spec_error.path,
            exception: spec_error.exception,
        }),
    }
}

fn category_error(name_category: &str, path: &Path, exception: String) -> SpecSampleError {
    SpecSampleError {
        category: name_category.to_string(),
        path: path.to_path_buf(),
        exception,
    }
}

fn sample_category(
    spec_category_entry: &SpecCategoryEntry,
    spec_outcome: &mut SpecCategoryOutcome,
    spec_sample_ctx: &mut SpecSampleContext,
) -> Result<(), SpecSampleError> {
    let name_category = spec_outcome.name.clone();
    let if_dry_run = spec_sample_ctx.spec_sample_options.if_dry_run;
    let path_dir_dst_sub = spec_sample_ctx
        .path_dir_dst
        .join(&spec_category_entry.name_dir);

    validate_destination_entry(&path_dir_dst_sub)
        .map_err(|message| category_error(&name_category, &path_dir_dst_sub, message))?;
    if path_dir_dst_sub.exists() {
        if !path_dir_dst_sub.is_dir() {
            return Err(category_error(
                &name_category,
                &path_dir_dst_sub,
                format!(
                    "Destination is a file, expected directory: {}",
                    path_dir_dst_sub.display()
                ),
            ));
        }
    } else {
        if !if_dry_run {
            fs::create_dir_all(&path_dir_dst_sub)
                .map_err(|e| category_error(&name_category, &path_dir_dst_sub, e.to_string()))?;
        }
        spec_outcome.if_created = true;
    }

    let l_images = list_images(
        &spec_category_entry.path_dir_src_sub,
        &name_category,
        spec_sample_ctx,
    )?;
    spec_outcome.cnt_images = l_images.len();

    let n_count = spec_sample_ctx.spec_sample_options.count_per_category;
    let if_preserve_metadata = spec_sample_ctx.spec_sample_options.if_preserve_metadata;
    for (idx, spec_image_entry) in l_images.into_iter().take(n_count).enumerate() {
        let name_dst = derive_output_name(idx + 1, &spec_sample_ctx.spec_sample_options.ext_output);
        let path_file_dst = path_dir_dst_sub.join(&name_dst);

        if if_dry_run {
            spec_sample_ctx.builder_sample_report.add_skipped();
        } else {
            validate_destination_entry(&path_file_dst)
                .and_then(|_| {
                    copy_file_with_metadata(
                        &spec_image_entry.path_file_src,
                        &path_file_dst,
                        if_preserve_metadata,
                    )
                    .map_err(|e| e.to_string())
                })
                .map_err(|message| category_error(&name_category, &path_file_dst, message))?;
            spec_sample_ctx.builder_sample_report.add_copied();
            debug!(
                src = %spec_image_entry.path_file_src.display(),
                dst = %path_file_dst.display(),
                "copied image"
            );
        }

        spec_outcome.selections.push(SpecImageSelection {
            path_src: spec_image_entry.path_file_src,
            path_dst: path_file_dst,
            name_src: spec_image_entry.name_file.to_string_lossy().to_string(),
            name_dst,
        });
    }

    if spec_sample_ctx.spec_sample_options.rule_stale == EnumSampleStaleFileStrategy::Remove {
        remove_stale_files(&path_dir_dst_sub, spec_outcome, spec_sample_ctx)?;
    }
    Ok(())
}

/// Qualifying images directly inside one category folder, sorted by name.
fn list_images(
    path_dir_src_sub: &Path,
    name_category: &str,
    spec_sample_ctx: &mut SpecSampleContext,
) -> Result<Vec<SpecImageEntry>, SpecSampleError> {
    let iter_entries = fs::read_dir(path_dir_src_sub)
        .map_err(|e| category_error(name_category, path_dir_src_sub, e.to_string()))?;

    let mut l_images = Vec::new();
    for _entry_res in iter_entries {
        let entry = match _entry_res {
            Ok(v) => v,
            Err(e) => {
                spec_sample_ctx.builder_sample_report.add_warning(format!(
                    "Failed to read directory entry under {} ({e})",
                    path_dir_src_sub.display()
                ));
                continue;
            }
        };
        spec_sample_ctx.builder_sample_report.add_scanned();

        let name_file = entry.file_name();
        if !spec_sample_ctx.matcher.is_match(&name_file) {
            continue;
        }

        let path_file_src = entry.path();
        // Follows symlinks.
        let b_is_file = fs::metadata(&path_file_src).is_ok_and(|m| m.is_file());
        if !b_is_file {
            spec_sample_ctx.builder_sample_report.add_warning(format!(
                "Non-file entry skipped: {}",
                path_file_src.display()
            ));
            continue;
        }

        spec_sample_ctx.builder_sample_report.add_matched();
        l_images.push(SpecImageEntry {
            path_file_src,
            name_file,
        });
    }

    l_images.sort_by(|a, b| a.name_file.cmp(&b.name_file));
    Ok(l_images)
}

fn remove_stale_files(
    path_dir_dst_sub: &Path,
    spec_outcome: &mut SpecCategoryOutcome,
    spec_sample_ctx: &mut SpecSampleContext,
) -> Result<(), SpecSampleError> {
    if !path_dir_dst_sub.is_dir() {
        return Ok(());
    }
    let name_category = spec_outcome.name.clone();
    let set_names_target: HashSet<OsString> = spec_outcome
        .selections
        .iter()
        .map(|s| OsString::from(&s.name_dst))
        .collect();

    let iter_entries = fs::read_dir(path_dir_dst_sub)
        .map_err(|e| category_error(&name_category, path_dir_dst_sub, e.to_string()))?;
    for _entry_res in iter_entries {
        let entry = _entry_res
            .map_err(|e| category_error(&name_category, path_dir_dst_sub, e.to_string()))?;
        if set_names_target.contains(&entry.file_name()) {
            continue;
        }

        let path_entry = entry.path();
        let cfg_file_type = entry
            .file_type()
            .map_err(|e| category_error(&name_category, &path_entry, e.to_string()))?;
        if cfg_file_type.is_dir() {
            spec_sample_ctx.builder_sample_report.add_warning(format!(
                "Stale directory left in place: {}",
                path_entry.display()
            ));
            continue;
        }

        if !spec_sample_ctx.spec_sample_options.if_dry_run {
            fs::remove_file(&path_entry)
                .map_err(|e| category_error(&name_category, &path_entry, e.to_string()))?;
            spec_sample_ctx.builder_sample_report.add_removed();
            debug!(path = %path_entry.display(), "removed stale file");
        }
        spec_outcome.stale_removed.push(path_entry);
    }

    spec_outcome.stale_removed.sort();
    Ok(())
}

#[cfg(test)]
mod tests {
    use std::path::Path;

    use tempfile::TempDir;

    use super::sample_tree;
    use crate::spec::{
        EnumSampleFailureMode, EnumSampleStaleFileStrategy, SampleTreeError, SpecSampleOptions,
    };

    fn write_bytes(path: &Path, data: &[u8]) {
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent).expect("create parent");
        }
        std::fs::write(path, data).expect("write bytes");
    }

    fn list_names(path: &Path) -> Vec<String> {
        let mut names: Vec<String> = std::fs::read_dir(path)
            .expect("read dir")
            .map(|e| e.expect("entry").file_name().to_string_lossy().to_string())
            .collect();
        names.sort();
        names
    }

    fn setup_breeds(tmp: &TempDir) -> (std::path::PathBuf, std::path::PathBuf) {
        let src = tmp.path().join("Images");
        let dst = tmp.path().join("public/breeds");
        write_bytes(&src.join("beagle/a.png"), b"a-png");
        write_bytes(&src.join("beagle/b.jpg"), b"b-jpg");
        write_bytes(&src.join("beagle/c.jpeg"), b"c-jpeg");
        write_bytes(&src.join("beagle/d.jpg"), b"d-jpg");
        write_bytes(&src.join("beagle/z.txt"), b"notes");
        write_bytes(&src.join("pug/only.jpg"), b"only");
        (src, dst)
    }

    #[test]
    fn sample_tree_copies_first_three_sorted_images() {
        let tmp = tempfile::tempdir().expect("tempdir");
        let (src, dst) = setup_breeds(&tmp);

        let report = sample_tree(&src, &dst, SpecSampleOptions::default()).expect("sample tree");
        assert_eq!(report.error_count(), 0);
        assert!(report.if_created_destination);
        assert_eq!(report.cnt_categories, 2);
        assert_eq!(report.cnt_scanned, 6);
        assert_eq!(report.cnt_matched, 5);
        assert_eq!(report.cnt_copied, 4);

        assert_eq!(list_names(&dst.join("beagle")), ["1.jpg", "2.jpg", "3.jpg"]);
        assert_eq!(std::fs::read(dst.join("beagle/1.jpg")).expect("read"), b"a-png");
        assert_eq!(std::fs::read(dst.join("beagle/2.jpg")).expect("read"), b"b-jpg");
        assert_eq!(std::fs::read(dst.join("beagle/3.jpg")).expect("read"), b"c-jpeg");
        assert_eq!(list_names(&dst.join("pug")), ["1.jpg"]);
        assert_eq!(std::fs::read(dst.join("pug/1.jpg")).expect("read"), b"only");

        let names_beagle: Vec<&str> = report.categories[0]
            .selections
            .iter()
            .map(|s| s.name_src.as_str())
            .collect();
        assert_eq!(report.categories[0].name, "beagle");
        assert_eq!(report.categories[0].cnt_images, 4);
        assert_eq!(names_beagle, ["a.png", "b.jpg", "c.jpeg"]);
    }

    #[test]
    fn sample_tree_is_deterministic_across_runs() {
        let tmp = tempfile::tempdir().expect("tempdir");
        let (src, dst) = setup_breeds(&tmp);

        let selected_pairs = |report: &crate::report::ReportSample| -> Vec<(String, String, String)> {
            report
                .categories
                .iter()
                .flat_map(|c| {
                    c.selections
                        .iter()
                        .map(|s| (c.name.clone(), s.name_src.clone(), s.name_dst.clone()))
                })
                .collect()
        };

        let report_first = sample_tree(&src, &dst, SpecSampleOptions::default()).expect("first");
        let bytes_first = std::fs::read(dst.join("beagle/3.jpg")).expect("read");
        let report_second = sample_tree(&src, &dst, SpecSampleOptions::default()).expect("second");

        assert!(report_first.if_created_destination);
        assert!(!report_second.if_created_destination);
        assert!(report_second.categories.iter().all(|c| !c.if_created));
        assert_eq!(selected_pairs(&report_first), selected_pairs(&report_second));
        assert_eq!(selected_pairs(&report_second).len(), 4);
        assert_eq!(std::fs::read(dst.join("beagle/3.jpg")).expect("read"), bytes_first);
        assert_eq!(list_names(&dst.join("beagle")), ["1.jpg", "2.jpg", "3.jpg"]);
    }

    #[test]
    fn sample_tree_matches_extensions_case_insensitively() {
        let tmp = tempfile::tempdir().expect("tempdir");
        let src = tmp.path().join("src");
        let dst = tmp.path().join("dst");
        write_bytes(&src.join("husky/Photo.PNG"), b"upper");
        write_bytes(&src.join("husky/readme.md"), b"md");

        let report = sample_tree(&src, &dst, SpecSampleOptions::default()).expect("sample tree");
        assert_eq!(report.cnt_copied, 1);
        assert_eq!(std::fs::read(dst.join("husky/1.jpg")).expect("read"), b"upper");
    }

    #[test]
    fn sample_tree_empty_category_creates_empty_folder() {
        let tmp = tempfile::tempdir().expect("tempdir");
        let src = tmp.path().join("src");
        let dst = tmp.path().join("dst");
        write_bytes(&src.join("corgi/notes.txt"), b"none");
        std::fs::create_dir_all(src.join("akita")).expect("mkdir");

        let report = sample_tree(&src, &dst, SpecSampleOptions::default()).expect("sample tree");
        assert_eq!(report.error_count(), 0);
        assert!(dst.join("corgi").is_dir());
        assert!(list_names(&dst.join("corgi")).is_empty());
        assert!(list_names(&dst.join("akita")).is_empty());
        assert!(report.categories.iter().all(|c| c.if_created));
    }

    #[test]
    fn sample_tree_missing_source_leaves_destination_untouched() {
        let tmp = tempfile::tempdir().expect("tempdir");
        let src = tmp.path().join("missing");
        let dst = tmp.path().join("out/breeds");

        let err = sample_tree(&src, &dst, SpecSampleOptions::default()).expect_err("must fail");
        assert!(matches!(err, SampleTreeError::SourceMissing(_)));
        assert!(!tmp.path().join("out").exists());
    }

    #[test]
    fn sample_tree_root_files_are_not_categories() {
        let tmp = tempfile::tempdir().expect("tempdir");
        let src = tmp.path().join("src");
        let dst = tmp.path().join("dst");
        write_bytes(&src.join("stray.jpg"), b"x");
        write_bytes(&src.join("lab/1.jpg"), b"y");

        let report = sample_tree(&src, &dst, SpecSampleOptions::default()).expect("sample tree");
        assert_eq!(report.cnt_categories, 1);
        assert_eq!(list_names(&dst), ["lab"]);
    }

    #[test]
    fn sample_tree_skips_directories_named_like_images() {
        let tmp = tempfile::tempdir().expect("tempdir");
        let src = tmp.path().join("src");
        let dst = tmp.path().join("dst");
        std::fs::create_dir_all(src.join("boxer/album.jpg")).expect("mkdir");
        write_bytes(&src.join("boxer/b.jpg"), b"b");

        let report = sample_tree(&src, &dst, SpecSampleOptions::default()).expect("sample tree");
        assert_eq!(report.error_count(), 0);
        assert_eq!(report.warning_count(), 1);
        assert_eq!(std::fs::read(dst.join("boxer/1.jpg")).expect("read"), b"b");
        assert!(!dst.join("boxer/2.jpg").exists());
    }

    #[test]
    fn sample_tree_keeps_stale_files_by_default() {
        let tmp = tempfile::tempdir().expect("tempdir");
        let (src, dst) = setup_breeds(&tmp);
        write_bytes(&dst.join("pug/old.png"), b"old");
        write_bytes(&dst.join("pug/2.jpg"), b"old-two");

        let report = sample_tree(&src, &dst, SpecSampleOptions::default()).expect("sample tree");
        assert_eq!(report.cnt_removed, 0);
        assert_eq!(list_names(&dst.join("pug")), ["1.jpg", "2.jpg", "old.png"]);
        assert_eq!(std::fs::read(dst.join("pug/2.jpg")).expect("read"), b"old-two");
    }

    #[test]
    fn sample_tree_removes_stale_files_when_requested() {
        let tmp = tempfile::tempdir().expect("tempdir");
        let (src, dst) = setup_breeds(&tmp);
        write_bytes(&dst.join("pug/old.png"), b"old");
        write_bytes(&dst.join("pug/2.jpg"), b"old-two");
        std::fs::create_dir_all(dst.join("pug/keepme")).expect("mkdir");

        let spec_sample_options = SpecSampleOptions {
            rule_stale: EnumSampleStaleFileStrategy::Remove,
            ..SpecSampleOptions::default()
        };
        let report = sample_tree(&src, &dst, spec_sample_options).expect("sample tree");
        assert_eq!(report.cnt_removed, 2);
        assert_eq!(report.warning_count(), 1);
        assert_eq!(list_names(&dst.join("pug")), ["1.jpg", "keepme"]);
    }

    #[test]
    fn sample_tree_honors_count_and_output_extension() {
        let tmp = tempfile::tempdir().expect("tempdir");
        let (src, dst) = setup_breeds(&tmp);

        let spec_sample_options = SpecSampleOptions {
            count_per_category: 1,
            ext_output: "img".to_string(),
            ..SpecSampleOptions::default()
        };
        let report = sample_tree(&src, &dst, spec_sample_options).expect("sample tree");
        assert_eq!(report.cnt_copied, 2);
        assert_eq!(list_names(&dst.join("beagle")), ["1.img"]);
    }

    #[test]
    fn sample_tree_dry_run_writes_nothing() {
        let tmp = tempfile::tempdir().expect("tempdir");
        let (src, dst) = setup_breeds(&tmp);

        let spec_sample_options = SpecSampleOptions {
            if_dry_run: true,
            ..SpecSampleOptions::default()
        };
        let report = sample_tree(&src, &dst, spec_sample_options).expect("sample tree");
        assert!(!dst.exists());
        assert!(report.if_created_destination);
        assert_eq!(report.cnt_copied, 0);
        assert_eq!(report.cnt_skipped, 4);
        assert_eq!(report.categories[0].selections.len(), 3);
    }

    #[test]
    fn sample_tree_isolates_failing_category() {
        let tmp = tempfile::tempdir().expect("tempdir");
        let src = tmp.path().join("src");
        let dst = tmp.path().join("dst");
        write_bytes(&src.join("a_bad/x.jpg"), b"x");
        write_bytes(&src.join("b_good/y.jpg"), b"y");
        write_bytes(&dst.join("a_bad"), b"not a dir");

        let report = sample_tree(&src, &dst, SpecSampleOptions::default()).expect("sample tree");
        assert_eq!(report.error_count(), 1);
        assert_eq!(report.errors[0].category, "a_bad");
        assert_eq!(report.errors[0].path, dst.join("a_bad"));
        assert!(dst.join("b_good/1.jpg").exists());
    }

    #[test]
    fn sample_tree_abort_mode_stops_at_first_failure() {
        let tmp = tempfile::tempdir().expect("tempdir");
        let src = tmp.path().join("src");
        let dst = tmp.path().join("dst");
        write_bytes(&src.join("a_bad/x.jpg"), b"x");
        write_bytes(&src.join("b_good/y.jpg"), b"y");
        write_bytes(&dst.join("a_bad"), b"not a dir");

        let spec_sample_options = SpecSampleOptions {
            rule_failure: EnumSampleFailureMode::Abort,
            ..SpecSampleOptions::default()
        };
        let err = sample_tree(&src, &dst, spec_sample_options).expect_err("must fail");
        assert!(matches!(
            err,
            SampleTreeError::CategoryFailed { ref category, .. } if category == "a_bad"
        ));
        assert!(!dst.join("b_good").exists());
    }

    #[test]
    fn sample_tree_overlap_rejected() {
        let tmp = tempfile::tempdir().expect("tempdir");
        let src = tmp.path().join("src");
        std::fs::create_dir_all(&src).expect("mkdir src");

        let err = sample_tree(&src, &src, SpecSampleOptions::default()).expect_err("must fail");
        assert!(matches!(
            err,
            SampleTreeError::SourceDestinationOverlap { .. }
        ));
        let err = sample_tree(&src, src.join("nested"), SpecSampleOptions::default())
            .expect_err("must fail");
        assert!(matches!(
            err,
            SampleTreeError::SourceDestinationOverlap { .. }
        ));
    }

    #[test]
    fn sample_tree_overlap_through_parent_components_rejected() {
        let tmp = tempfile::tempdir().expect("tempdir");
        let src = tmp.path().join("src");
        write_bytes(&src.join("pug/only.jpg"), b"only");

        let dst = tmp.path().join("other").join("..").join("src").join("out");
        let err = sample_tree(&src, &dst, SpecSampleOptions::default()).expect_err("must fail");
        assert!(matches!(
            err,
            SampleTreeError::SourceDestinationOverlap { .. }
        ));
        assert!(!src.join("out").exists());
        assert!(!tmp.path().join("other").exists());
    }

    #[cfg(unix)]
    #[test]
    fn sample_tree_overlap_through_symlinked_source_rejected() {
        use std::os::unix::fs::symlink;

        let tmp = tempfile::tempdir().expect("tempdir");
        let real = tmp.path().join("real");
        write_bytes(&real.join("pug/only.jpg"), b"only");
        let link = tmp.path().join("link");
        symlink(&real, &link).expect("symlink");

        let err = sample_tree(&link, link.join("out"), SpecSampleOptions::default())
            .expect_err("must fail");
        assert!(matches!(
            err,
            SampleTreeError::SourceDestinationOverlap { .. }
        ));
        assert_eq!(list_names(&real), ["pug"]);
    }

    #[test]
    fn sample_tree_zero_count_rejected() {
        let tmp = tempfile::tempdir().expect("tempdir");
        let spec_sample_options = SpecSampleOptions {
            count_per_category: 0,
            ..SpecSampleOptions::default()
        };
        let err = sample_tree(tmp.path(), tmp.path().join("dst"), spec_sample_options)
            .expect_err("must fail");
        assert!(matches!(err, SampleTreeError::InvalidOptions(_)));
    }

    #[cfg(unix)]
    #[test]
    fn sample_tree_follows_symlinked_category() {
        use std::os::unix::fs::symlink;

        let tmp = tempfile::tempdir().expect("tempdir");
        let src = tmp.path().join("src");
        let dst = tmp.path().join("dst");
        write_bytes(&tmp.path().join("elsewhere/shiba/s.jpg"), b"s");
        std::fs::create_dir_all(&src).expect("mkdir src");
        symlink(tmp.path().join("elsewhere/shiba"), src.join("shiba")).expect("symlink");

        let report = sample_tree(&src, &dst, SpecSampleOptions::default()).expect("sample tree");
        assert_eq!(report.cnt_categories, 1);
        assert_eq!(std::fs::read(dst.join("shiba/1.jpg")).expect("read"), b"s");
    }
}
