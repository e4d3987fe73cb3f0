use std::path::{Path, PathBuf};

/// Staging path for an in-flight download: the final file name plus a
/// `.part` suffix. The suffix is appended, not swapped in for the real
/// extension, so `model.safetensors` stages as `model.safetensors.part`
/// and a repo file literally named `model.part` cannot collide with it.
/// Downloads write here and rename on completion, so a truncated
/// transfer never sits at the final path where an exists-check would
/// mistake it for a complete artifact.
pub(crate) fn staging_path(dest: &Path) -> PathBuf {
    let mut name = dest
        .file_name()
        .map(|n| n.to_os_string())
        .unwrap_or_default();
    name.push(".part");
    dest.with_file_name(name)
}
