use crate::PackageError;
use flate2::write::GzEncoder;
use flate2::Compression;
use sapic_schema::{ExtensionManifest, MANIFEST_FILE};
use std::fs;
use std::io::Write;
use std::os::unix::fs::PermissionsExt;
use std::path::{Path, PathBuf};
use tempfile::NamedTempFile;
use tracing::{debug, warn};

/// Fixed suffix appended to the extension directory basename.
pub const ARCHIVE_SUFFIX: &str = ".tar.gz";

/// A built extension archive: the output path plus the compressed bytes.
///
/// Owned by one pipeline run and consumed exactly once by publishing.
#[derive(Debug)]
pub struct Artifact {
    pub path: PathBuf,
    pub data: Vec<u8>,
}

impl Artifact {
    /// Archive filename, used as the `file` part filename when publishing.
    pub fn file_name(&self) -> &str {
        self.path
            .file_name()
            .and_then(|n| n.to_str())
            .unwrap_or("extension.tar.gz")
    }
}

/// Build the `.tar.gz` artifact for an extension.
///
/// Every folder named by `contributes` is included under its relative
/// path, plus the manifest file itself at the archive root. Entries are
/// sorted, timestamps zeroed, and ownership set to 0:0, so re-running
/// with unchanged inputs yields the same entry set and content.
///
/// The output file is written atomically: a missing contribution folder
/// or any packing failure leaves nothing at the output path.
pub fn build_artifact(
    manifest: &ExtensionManifest,
    extension_root: &Path,
    output_dir: &Path,
) -> Result<Artifact, PackageError> {
    for folder in manifest.contributes.values() {
        if !extension_root.join(folder).is_dir() {
            return Err(PackageError::MissingContribution(PathBuf::from(folder)));
        }
    }

    let tar_data = pack_extension(manifest, extension_root)?;
    let mut encoder = GzEncoder::new(Vec::new(), Compression::default());
    encoder.write_all(&tar_data)?;
    let compressed = encoder.finish()?;

    let canonical = extension_root.canonicalize()?;
    let base = canonical
        .file_name()
        .and_then(|n| n.to_str())
        .ok_or_else(|| PackageError::InvalidRoot(extension_root.to_path_buf()))?;
    let path = output_dir.join(format!("{base}{ARCHIVE_SUFFIX}"));

    fs::create_dir_all(output_dir)?;
    let mut tmp = NamedTempFile::new_in(output_dir)?;
    tmp.write_all(&compressed)?;
    tmp.as_file().sync_all()?;
    tmp.persist(&path).map_err(|e| PackageError::Io(e.error))?;

    debug!(
        "packed {} ({} bytes compressed) -> {}",
        manifest.identifier,
        compressed.len(),
        path.display()
    );

    Ok(Artifact {
        path,
        data: compressed,
    })
}

/// Create the uncompressed tar archive for all contribution folders plus
/// the manifest file. Entry paths are relative to the extension root.
fn pack_extension(
    manifest: &ExtensionManifest,
    extension_root: &Path,
) -> Result<Vec<u8>, PackageError> {
    let mut entries: Vec<(String, PathBuf)> = Vec::new();
    let mut folders: Vec<&String> = manifest.contributes.values().collect();
    folders.sort();
    folders.dedup();
    for folder in folders {
        collect_entries(extension_root, &extension_root.join(folder), &mut entries)?;
    }
    entries.push((
        MANIFEST_FILE.to_owned(),
        extension_root.join(MANIFEST_FILE),
    ));
    entries.sort_by(|a, b| a.0.cmp(&b.0));
    entries.dedup_by(|a, b| a.0 == b.0);

    let mut ar = tar::Builder::new(Vec::new());
    ar.follow_symlinks(false);

    for (rel_path, full_path) in &entries {
        let ft = full_path.symlink_metadata()?.file_type();
        if ft.is_file() {
            append_file(&mut ar, rel_path, full_path)?;
        } else if ft.is_symlink() {
            append_symlink(&mut ar, rel_path, full_path)?;
        } else {
            warn!("skipping unsupported file type: {rel_path}");
        }
    }

    Ok(ar.into_inner()?)
}

/// Recursively collect (relative_path, full_path) pairs for regular files
/// and symlinks under `current`. Directories are traversed but emit no
/// entry of their own; the archive's entry set is exactly its files.
fn collect_entries(
    root: &Path,
    current: &Path,
    out: &mut Vec<(String, PathBuf)>,
) -> Result<(), PackageError> {
    for entry in fs::read_dir(current)? {
        let entry = entry?;
        let full = entry.path();
        let rel = full
            .strip_prefix(root)
            .map_err(|e| std::io::Error::other(format!("path strip: {e}")))?
            .to_string_lossy()
            .to_string();

        let meta = full.symlink_metadata()?;
        if meta.is_dir() {
            collect_entries(root, &full, out)?;
        } else {
            out.push((rel, full));
        }
    }
    Ok(())
}

fn make_header(full_path: &Path, entry_type: tar::EntryType) -> Result<tar::Header, PackageError> {
    let meta = full_path.symlink_metadata()?;
    let mut header = tar::Header::new_gnu();
    header.set_entry_type(entry_type);
    header.set_mtime(0);
    header.set_uid(0);
    header.set_gid(0);
    header.set_mode(meta.permissions().mode());
    Ok(header)
}

fn append_file(
    ar: &mut tar::Builder<Vec<u8>>,
    rel_path: &str,
    full_path: &Path,
) -> Result<(), PackageError> {
    let data = fs::read(full_path)?;
    let mut header = make_header(full_path, tar::EntryType::Regular)?;
    header.set_size(data.len() as u64);
    header.set_cksum();
    ar.append_data(&mut header, rel_path, data.as_slice())?;
    Ok(())
}

fn append_symlink(
    ar: &mut tar::Builder<Vec<u8>>,
    rel_path: &str,
    full_path: &Path,
) -> Result<(), PackageError> {
    let target = fs::read_link(full_path)?;
    let mut header = make_header(full_path, tar::EntryType::Symlink)?;
    header.set_size(0);
    header.set_cksum();
    ar.append_link(&mut header, rel_path, &target)?;
    Ok(())
}
