use std::ffi::OsStr;
use std::fs;
use std::io;
use std::path::{Component, Path, PathBuf};

use globset::{GlobBuilder, GlobSet, GlobSetBuilder};

use crate::spec::SampleTreeError;

////////////////////////////////////////////////////////////////////////////////
// #region ExtensionMatching

/// Case-insensitive "name ends with `.<ext>`" matcher over a set of extensions.
#[derive(Debug, Clone)]
pub(crate) struct SpecExtensionMatcher {
    glob_set: GlobSet,
}

impl SpecExtensionMatcher {
    pub(crate) fn from_extensions(extensions: &[String]) -> Result<Self, SampleTreeError> {
        if extensions.is_empty() {
            return Err(SampleTreeError::InvalidOptions(
                "Arg `extensions` must contain at least one extension.".to_string(),
            ));
        }

        let mut builder = GlobSetBuilder::new();
        for ext in extensions {
            let ext_clean = ext.trim().trim_start_matches('.');
            if ext_clean.is_empty() {
                return Err(SampleTreeError::InvalidOptions(format!(
                    "Invalid extension in `extensions`: `{ext}`"
                )));
            }
            let glob = GlobBuilder::new(&format!("*.{}", globset::escape(ext_clean)))
                .case_insensitive(true)
                .build()
                .map_err(|e| {
                    SampleTreeError::InvalidOptions(format!(
                        "Invalid extension in `extensions`: {e}"
                    ))
                })?;
            builder.add(glob);
        }
        let glob_set = builder.build().map_err(|e| {
            SampleTreeError::InvalidOptions(format!("Invalid extension in `extensions`: {e}"))
        })?;
        Ok(Self { glob_set })
    }

    pub(crate) fn is_match(&self, name_file: &OsStr) -> bool {
        self.glob_set.is_match(Path::new(name_file))
    }
}

// #endregion
////////////////////////////////////////////////////////////////////////////////
// #region Naming

pub(crate) fn validate_ext_output(ext_output: &str) -> Result<(), SampleTreeError> {
    let ext_clean = ext_output.trim_start_matches('.');
    if ext_clean.is_empty() || ext_clean.contains(['/', '\\']) {
        return Err(SampleTreeError::InvalidOptions(format!(
            "Invalid output extension: `{ext_output}`"
        )));
    }
    Ok(())
}

/// Target name for the `index`-th (1-based) selected image.
///
/// ```ignore
/// assert_eq!(derive_output_name(2, "jpg"), "2.jpg");
/// assert_eq!(derive_output_name(1, ".png"), "1.png");
/// ```
pub(crate) fn derive_output_name(index: usize, ext_output: &str) -> String {
    format!("{index}.{}", ext_output.trim_start_matches('.'))
}

// #endregion
////////////////////////////////////////////////////////////////////////////////
// #region PathUtilities

fn _absolutize_path(path: &Path) -> PathBuf {
    if path.is_absolute() {
        return path.to_path_buf();
    }
    std::env::current_dir()
        .unwrap_or_else(|_| PathBuf::from("."))
        .join(path)
}

/// Resolve `path` even when its tail does not exist yet: canonicalize the
/// longest existing prefix (resolving symlinks and `..` there), then apply
/// the remaining components lexically.
fn _normalize_path(path: &Path) -> PathBuf {
    let path_abs = _absolutize_path(path);
    let l_components: Vec<Component<'_>> = path_abs.components().collect();

    for n_prefix in (1..=l_components.len()).rev() {
        let path_prefix: PathBuf = l_components[..n_prefix].iter().collect();
        let Ok(mut path_resolved) = fs::canonicalize(&path_prefix) else {
            continue;
        };
        for component in &l_components[n_prefix..] {
            match component {
                Component::Normal(part) => path_resolved.push(part),
                Component::ParentDir => {
                    path_resolved.pop();
                }
                Component::CurDir | Component::RootDir | Component::Prefix(_) => {}
            }
        }
        return path_resolved;
    }
    path_abs
}

pub(crate) fn is_overlap(src: &Path, dst: &Path) -> bool {
    let src_resolved = _normalize_path(src);
    let dst_resolved = _normalize_path(dst);
    dst_resolved.starts_with(&src_resolved) || src_resolved.starts_with(&dst_resolved)
}

/// Reject destination entries that are symbolic links, so writes never
/// escape the destination root.
pub(crate) fn validate_destination_entry(path_dst: &Path) -> Result<(), String> {
    match fs::symlink_metadata(path_dst) {
        Ok(meta_dst) if meta_dst.file_type().is_symlink() => Err(format!(
            "Unsafe destination path is an existing symlink: {}",
            path_dst.display()
        )),
        Ok(_) => Ok(()),
        Err(e) if e.kind() == io::ErrorKind::NotFound => Ok(()),
        Err(e) => Err(format!(
            "Failed to inspect destination path {} ({e})",
            path_dst.display()
        )),
    }
}

// #endregion
////////////////////////////////////////////////////////////////////////////////
// #region FileCopy

pub(crate) fn copy_file_with_metadata(
    path_file_src: &Path,
    path_file_dst: &Path,
    if_preserve_metadata: bool,
) -> Result<(), io::Error> {
    fs::copy(path_file_src, path_file_dst)?;
    if if_preserve_metadata {
        apply_metadata(path_file_src, path_file_dst)?;
    }
    Ok(())
}

fn apply_metadata(path_file_src: &Path, path_file_dst: &Path) -> Result<(), io::Error> {
    use filetime::{FileTime, set_file_times};

    let stat_src = fs::metadata(path_file_src)?;
    fs::set_permissions(path_file_dst, stat_src.permissions())?;

    let file_time_access = FileTime::from_last_access_time(&stat_src);
    let file_time_modify = FileTime::from_last_modification_time(&stat_src);
    set_file_times(path_file_dst, file_time_access, file_time_modify)?;

    #[cfg(target_os = "linux")]
    copy_xattrs_linux(path_file_src, path_file_dst);
    Ok(())
}

#[cfg(target_os = "linux")]
fn copy_xattrs_linux(path_file_src: &Path, path_file_dst: &Path) {
    let iter_xattr_names = match xattr::list(path_file_src) {
        Ok(v) => v,
        Err(_) => return,
    };

    for name in iter_xattr_names {
        let Some(raw_value) = xattr::get(path_file_src, &name).ok().flatten() else {
            continue;
        };
        let _ = xattr::set(path_file_dst, &name, &raw_value);
    }
}

// #endregion
////////////////////////////////////////////////////////////////////////////////
