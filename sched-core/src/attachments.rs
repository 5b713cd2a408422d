//! Resume and Aadhaar file selections, and the download handles offered back for them.
//!
//! Selections live as long as the session. Download handles are staged
//! copies inside a `DownloadShelf`, which is owned by an open event detail:
//! dropping the shelf (closing the detail) removes every staged copy, and
//! staging a new file of the same kind removes the previous one.

use std::fmt;
use std::path::{Path, PathBuf};

use tempfile::TempDir;
use url::Url;

use crate::error::{ScheduleError, ScheduleResult};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum AttachmentKind {
    Resume,
    Aadhaar,
}

impl AttachmentKind {
    pub const ALL: [AttachmentKind; 2] = [AttachmentKind::Resume, AttachmentKind::Aadhaar];

    pub fn label(&self) -> &'static str {
        match self {
            AttachmentKind::Resume => "resume",
            AttachmentKind::Aadhaar => "Aadhaar",
        }
    }

    pub fn accepted_extensions(&self) -> &'static [&'static str] {
        match self {
            AttachmentKind::Resume => &["pdf", "doc", "docx"],
            AttachmentKind::Aadhaar => &["pdf", "jpg", "png"],
        }
    }

    pub fn accepts(&self, path: &Path) -> bool {
        path.extension()
            .and_then(|ext| ext.to_str())
            .map(|ext| {
                self.accepted_extensions()
                    .iter()
                    .any(|accepted| ext.eq_ignore_ascii_case(accepted))
            })
            .unwrap_or(false)
    }
}

impl fmt::Display for AttachmentKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

/// A file picked from the local filesystem.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SelectedFile {
    pub name: String,
    pub path: PathBuf,
    pub size: u64,
}

impl SelectedFile {
    /// Pick a file for `kind`. Only the extension is checked, never the content.
    pub fn pick(kind: AttachmentKind, path: impl AsRef<Path>) -> ScheduleResult<Self> {
        let path = path.as_ref();

        let name = path
            .file_name()
            .and_then(|n| n.to_str())
            .ok_or_else(|| ScheduleError::NotAFile(path.to_path_buf()))?
            .to_string();

        if !kind.accepts(path) {
            return Err(ScheduleError::UnsupportedFile {
                file: name,
                kind: kind.label(),
                accepted: kind.accepted_extensions().join(", "),
            });
        }

        let metadata = std::fs::metadata(path)?;
        if !metadata.is_file() {
            return Err(ScheduleError::NotAFile(path.to_path_buf()));
        }

        Ok(SelectedFile {
            name,
            path: path.to_path_buf(),
            size: metadata.len(),
        })
    }
}

/// At most one file per kind; a new pick replaces the old one.
#[derive(Debug, Clone, Default)]
pub struct FileSelections {
    resume: Option<SelectedFile>,
    aadhaar: Option<SelectedFile>,
}

impl FileSelections {
    pub fn get(&self, kind: AttachmentKind) -> Option<&SelectedFile> {
        match kind {
            AttachmentKind::Resume => self.resume.as_ref(),
            AttachmentKind::Aadhaar => self.aadhaar.as_ref(),
        }
    }

    /// Store `file` and return whatever it replaced.
    pub fn set(&mut self, kind: AttachmentKind, file: SelectedFile) -> Option<SelectedFile> {
        let slot = match kind {
            AttachmentKind::Resume => &mut self.resume,
            AttachmentKind::Aadhaar => &mut self.aadhaar,
        };
        slot.replace(file)
    }

    /// Forget the file of `kind`, returning it.
    pub fn clear(&mut self, kind: AttachmentKind) -> Option<SelectedFile> {
        match kind {
            AttachmentKind::Resume => self.resume.take(),
            AttachmentKind::Aadhaar => self.aadhaar.take(),
        }
    }

    pub fn iter(&self) -> impl Iterator<Item = (AttachmentKind, &SelectedFile)> {
        AttachmentKind::ALL
            .into_iter()
            .filter_map(move |kind| self.get(kind).map(|file| (kind, file)))
    }

    pub fn is_empty(&self) -> bool {
        self.resume.is_none() && self.aadhaar.is_none()
    }
}

/// A staged copy of a selected file, removed from disk when dropped.
#[derive(Debug)]
pub struct DownloadLink {
    pub kind: AttachmentKind,
    pub file_name: String,
    staged: PathBuf,
}

impl DownloadLink {
    pub fn staged_path(&self) -> &Path {
        &self.staged
    }

    /// `file://` URL of the staged copy.
    pub fn href(&self) -> Option<Url> {
        Url::from_file_path(&self.staged).ok()
    }

    /// Copy the file into `dir` under its original name.
    pub fn save_to(&self, dir: &Path) -> ScheduleResult<PathBuf> {
        std::fs::create_dir_all(dir)?;
        let target = dir.join(&self.file_name);
        std::fs::copy(&self.staged, &target)?;
        tracing::info!(file = %self.file_name, target = %target.display(), "saved download");
        Ok(target)
    }
}

impl Drop for DownloadLink {
    fn drop(&mut self) {
        if let Err(e) = std::fs::remove_file(&self.staged) {
            tracing::debug!(path = %self.staged.display(), error = %e, "staged download already gone");
        }
    }
}

/// Temporary directory holding the download links of one open detail.
///
/// Every staged copy gets its own numbered directory, `<kind>/<n>/<name>`,
/// so a new link never shares a path with the one it replaces.
#[derive(Debug)]
pub struct DownloadShelf {
    resume: Option<DownloadLink>,
    aadhaar: Option<DownloadLink>,
    staged: u32,
    // Dropped after the links so each link removes its own copy first.
    dir: TempDir,
}

impl DownloadShelf {
    pub fn new() -> ScheduleResult<Self> {
        let dir = tempfile::Builder::new().prefix("sched-downloads-").tempdir()?;
        Ok(DownloadShelf {
            resume: None,
            aadhaar: None,
            staged: 0,
            dir,
        })
    }

    pub fn dir(&self) -> &Path {
        self.dir.path()
    }

    /// Copy `file` onto the shelf and swap it in for the previous link of the
    /// same kind. If the copy fails the previous link stays in place.
    pub fn stage(&mut self, kind: AttachmentKind, file: &SelectedFile) -> ScheduleResult<&DownloadLink> {
        self.staged += 1;
        let stage_dir = self
            .dir
            .path()
            .join(kind.label().to_lowercase())
            .join(self.staged.to_string());
        std::fs::create_dir_all(&stage_dir)?;

        let staged = stage_dir.join(&file.name);
        if let Err(e) = std::fs::copy(&file.path, &staged) {
            if let Err(cleanup) = std::fs::remove_dir_all(&stage_dir) {
                tracing::debug!(path = %stage_dir.display(), error = %cleanup, "could not clean up failed stage");
            }
            return Err(e.into());
        }

        let link = DownloadLink {
            kind,
            file_name: file.name.clone(),
            staged,
        };
        Ok(&*self.slot(kind).insert(link))
    }

    pub fn link(&self, kind: AttachmentKind) -> Option<&DownloadLink> {
        match kind {
            AttachmentKind::Resume => self.resume.as_ref(),
            AttachmentKind::Aadhaar => self.aadhaar.as_ref(),
        }
    }

    pub fn links(&self) -> impl Iterator<Item = &DownloadLink> {
        self.resume.iter().chain(self.aadhaar.iter())
    }

    fn slot(&mut self, kind: AttachmentKind) -> &mut Option<DownloadLink> {
        match kind {
            AttachmentKind::Resume => &mut self.resume,
            AttachmentKind::Aadhaar => &mut self.aadhaar,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn write_file(dir: &Path, name: &str, contents: &str) -> PathBuf {
        let path = dir.join(name);
        std::fs::write(&path, contents).unwrap();
        path
    }

    #[test]
    fn accept_lists_differ_per_kind() {
        assert!(AttachmentKind::Resume.accepts(Path::new("cv.DOCX")));
        assert!(!AttachmentKind::Resume.accepts(Path::new("id.png")));
        assert!(AttachmentKind::Aadhaar.accepts(Path::new("id.png")));
        assert!(!AttachmentKind::Aadhaar.accepts(Path::new("cv.docx")));
        assert!(!AttachmentKind::Aadhaar.accepts(Path::new("noext")));
    }

    #[test]
    fn pick_rejects_wrong_extension_and_missing_files() {
        let tmp = tempfile::tempdir().unwrap();
        let png = write_file(tmp.path(), "id.png", "img");

        assert!(matches!(
            SelectedFile::pick(AttachmentKind::Resume, &png),
            Err(ScheduleError::UnsupportedFile { .. })
        ));
        assert!(matches!(
            SelectedFile::pick(AttachmentKind::Resume, tmp.path().join("gone.pdf")),
            Err(ScheduleError::Io(_))
        ));

        let picked = SelectedFile::pick(AttachmentKind::Aadhaar, &png).unwrap();
        assert_eq!(picked.name, "id.png");
        assert_eq!(picked.size, 3);
    }

    #[test]
    fn selections_replace_per_kind() {
        let tmp = tempfile::tempdir().unwrap();
        let first = write_file(tmp.path(), "a.pdf", "a");
        let second = write_file(tmp.path(), "b.pdf", "b");

        let mut selections = FileSelections::default();
        assert!(selections.is_empty());
        selections.set(
            AttachmentKind::Resume,
            SelectedFile::pick(AttachmentKind::Resume, &first).unwrap(),
        );
        let replaced = selections.set(
            AttachmentKind::Resume,
            SelectedFile::pick(AttachmentKind::Resume, &second).unwrap(),
        );

        assert_eq!(replaced.unwrap().name, "a.pdf");
        assert_eq!(selections.get(AttachmentKind::Resume).unwrap().name, "b.pdf");
        assert!(selections.get(AttachmentKind::Aadhaar).is_none());
        assert_eq!(selections.iter().count(), 1);

        assert_eq!(selections.clear(AttachmentKind::Resume).unwrap().name, "b.pdf");
        assert!(selections.is_empty());
    }

    #[test]
    fn staging_releases_previous_link() {
        let tmp = tempfile::tempdir().unwrap();
        let first = SelectedFile::pick(
            AttachmentKind::Resume,
            write_file(tmp.path(), "old.pdf", "old"),
        )
        .unwrap();
        let second = SelectedFile::pick(
            AttachmentKind::Resume,
            write_file(tmp.path(), "new.pdf", "new"),
        )
        .unwrap();

        let mut shelf = DownloadShelf::new().unwrap();
        let old_path = shelf
            .stage(AttachmentKind::Resume, &first)
            .unwrap()
            .staged_path()
            .to_path_buf();
        assert!(old_path.exists());

        let link = shelf.stage(AttachmentKind::Resume, &second).unwrap();
        assert_eq!(link.file_name, "new.pdf");
        assert!(link.href().unwrap().as_str().starts_with("file://"));
        assert!(!old_path.exists());
    }

    #[test]
    fn restaging_the_same_name_keeps_the_new_copy() {
        let tmp = tempfile::tempdir().unwrap();
        let file = SelectedFile::pick(
            AttachmentKind::Resume,
            write_file(tmp.path(), "cv.pdf", "v1"),
        )
        .unwrap();

        let mut shelf = DownloadShelf::new().unwrap();
        shelf.stage(AttachmentKind::Resume, &file).unwrap();
        std::fs::write(&file.path, "v2").unwrap();
        let link = shelf.stage(AttachmentKind::Resume, &file).unwrap();

        assert_eq!(std::fs::read_to_string(link.staged_path()).unwrap(), "v2");
    }

    #[test]
    fn failed_copy_keeps_previous_link() {
        let tmp = tempfile::tempdir().unwrap();
        let first = SelectedFile::pick(
            AttachmentKind::Resume,
            write_file(tmp.path(), "a.pdf", "a"),
        )
        .unwrap();
        let second = SelectedFile::pick(
            AttachmentKind::Resume,
            write_file(tmp.path(), "b.pdf", "b"),
        )
        .unwrap();
        std::fs::remove_file(&second.path).unwrap();

        let mut shelf = DownloadShelf::new().unwrap();
        shelf.stage(AttachmentKind::Resume, &first).unwrap();

        assert!(matches!(
            shelf.stage(AttachmentKind::Resume, &second),
            Err(ScheduleError::Io(_))
        ));
        let link = shelf.link(AttachmentKind::Resume).unwrap();
        assert_eq!(link.file_name, "a.pdf");
        assert!(link.staged_path().exists());
        assert_eq!(shelf.links().count(), 1);
    }

    #[test]
    fn dropping_the_shelf_removes_staged_copies() {
        let tmp = tempfile::tempdir().unwrap();
        let file =
            SelectedFile::pick(AttachmentKind::Aadhaar, write_file(tmp.path(), "id.jpg", "x"))
                .unwrap();

        let mut shelf = DownloadShelf::new().unwrap();
        shelf.stage(AttachmentKind::Aadhaar, &file).unwrap();
        let dir = shelf.dir().to_path_buf();
        assert_eq!(shelf.links().count(), 1);
        assert!(dir.exists());

        drop(shelf);
        assert!(!dir.exists());
        // The original file is untouched.
        assert!(tmp.path().join("id.jpg").exists());
    }

    #[test]
    fn save_to_keeps_the_file_name() {
        let tmp = tempfile::tempdir().unwrap();
        let file = SelectedFile::pick(
            AttachmentKind::Resume,
            write_file(tmp.path(), "jane-doe.pdf", "%PDF"),
        )
        .unwrap();

        let mut shelf = DownloadShelf::new().unwrap();
        let link = shelf.stage(AttachmentKind::Resume, &file).unwrap();
        let out = tmp.path().join("downloads");
        let saved = link.save_to(&out).unwrap();

        assert_eq!(saved, out.join("jane-doe.pdf"));
        assert_eq!(std::fs::read_to_string(saved).unwrap(), "%PDF");
    }
}
