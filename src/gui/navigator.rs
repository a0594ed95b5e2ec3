use std::path::{Path, PathBuf};

use eframe::egui;

/// The file-browser panel: lists the image files of the current directory
/// and tracks the selected one.
///
/// Selection is pending while the directory is empty; as soon as a filtered
/// entry exists the first one is auto-selected. Every operation that changes
/// the selection reports the newly selected absolute path so the app can
/// load the image.
#[derive(Default)]
pub struct Navigator {
    directory: PathBuf,
    entries: Vec<PathBuf>,
    selected: Option<usize>,
}

impl Navigator {
    /// Point the navigator at a new directory. Selection resets and the
    /// auto-select-first behavior re-applies once entries exist.
    pub fn set_directory(&mut self, directory: PathBuf, extensions: &[String]) {
        self.directory = directory;
        self.selected = None;
        self.rescan(extensions);
    }

    /// Re-enumerate the directory, keeping the selected file if it is still
    /// present.
    pub fn rescan(&mut self, extensions: &[String]) {
        let selected_path = self.selected_path();
        self.entries = scan_directory(&self.directory, extensions);
        self.selected = selected_path
            .and_then(|path| self.entries.iter().position(|entry| *entry == path));
    }

    /// Auto-select the first entry while nothing valid is selected. Called
    /// every frame; returns the path when the selection just became valid.
    ///
    /// While the filtered list is empty the directory is re-enumerated on
    /// every call, so a file appearing later is picked up without an explicit
    /// refresh.
    pub fn auto_select_first(&mut self, extensions: &[String]) -> Option<PathBuf> {
        if self.selected.is_some() {
            return None;
        }
        if self.entries.is_empty() {
            self.rescan(extensions);
        }
        if self.entries.is_empty() {
            return None;
        }
        self.selected = Some(0);
        self.selected_path()
    }

    pub fn selected_path(&self) -> Option<PathBuf> {
        self.selected.map(|i| self.entries[i].clone())
    }

    pub fn select_first(&mut self) -> Option<PathBuf> {
        self.select_index(0)
    }

    pub fn select_last(&mut self) -> Option<PathBuf> {
        self.select_index(self.entries.len().wrapping_sub(1))
    }

    pub fn select_prev(&mut self) -> Option<PathBuf> {
        let i = self.selected?;
        self.select_index(i.checked_sub(1)?)
    }

    pub fn select_next(&mut self) -> Option<PathBuf> {
        let i = self.selected?;
        self.select_index(i + 1)
    }

    fn select_index(&mut self, index: usize) -> Option<PathBuf> {
        if index >= self.entries.len() || self.selected == Some(index) {
            return None;
        }
        self.selected = Some(index);
        self.selected_path()
    }

    /// Show the file list. Returns the path of a newly clicked entry.
    pub fn show(&mut self, ui: &mut egui::Ui) -> Option<PathBuf> {
        let mut clicked = None;

        egui::ScrollArea::vertical()
            .auto_shrink(false)
            .show(ui, |ui| {
                for (index, entry) in self.entries.iter().enumerate() {
                    let name = entry
                        .file_name()
                        .map(|n| n.to_string_lossy().into_owned())
                        .unwrap_or_default();

                    let selected = self.selected == Some(index);
                    if ui.selectable_label(selected, name).clicked() && !selected {
                        clicked = Some(index);
                    }
                }
            });

        if let Some(index) = clicked {
            self.selected = Some(index);
            return self.selected_path();
        }
        None
    }
}

/// Files of `directory` whose extension matches `extensions`
/// (case-insensitive), sorted by name. Unreadable directories yield an empty
/// list; browsing recovers as soon as the directory does.
fn scan_directory(directory: &Path, extensions: &[String]) -> Vec<PathBuf> {
    let Ok(read_dir) = std::fs::read_dir(directory) else {
        log::warn!("Could not read directory `{}`", directory.display());
        return Vec::new();
    };

    let mut entries: Vec<PathBuf> = read_dir
        .filter_map(|entry| {
            let path = entry.ok()?.path();
            if !path.is_file() {
                return None;
            }
            let ext = path.extension()?.to_string_lossy().to_lowercase();
            extensions.contains(&ext).then_some(path)
        })
        .collect();

    entries.sort();
    entries
}

#[cfg(test)]
mod tests {
    use super::*;

    fn extensions() -> Vec<String> {
        vec!["png".to_owned(), "jpg".to_owned()]
    }

    fn touch(dir: &Path, name: &str) {
        std::fs::write(dir.join(name), b"").unwrap();
    }

    #[test]
    fn scan_filters_and_sorts_by_name() {
        let dir = tempfile::tempdir().unwrap();
        touch(dir.path(), "b.png");
        touch(dir.path(), "a.JPG");
        touch(dir.path(), "notes.txt");
        std::fs::create_dir(dir.path().join("sub.png")).unwrap();

        let entries = scan_directory(dir.path(), &extensions());
        let names: Vec<_> = entries
            .iter()
            .map(|p| p.file_name().unwrap().to_str().unwrap())
            .collect();
        assert_eq!(names, ["a.JPG", "b.png"]);
    }

    #[test]
    fn empty_directory_keeps_selection_pending() {
        let dir = tempfile::tempdir().unwrap();
        let mut nav = Navigator::default();
        nav.set_directory(dir.path().to_owned(), &extensions());

        assert!(nav.auto_select_first(&extensions()).is_none());
        assert!(nav.selected_path().is_none());
    }

    #[test]
    fn first_entry_is_auto_selected_once_it_appears() {
        let dir = tempfile::tempdir().unwrap();
        let mut nav = Navigator::default();
        nav.set_directory(dir.path().to_owned(), &extensions());
        assert!(nav.auto_select_first(&extensions()).is_none());

        // no explicit refresh: the pending auto-select rescans by itself
        touch(dir.path(), "page1.png");
        let selected = nav.auto_select_first(&extensions()).unwrap();
        assert_eq!(selected.file_name().unwrap(), "page1.png");

        // already valid: no repeated notification
        assert!(nav.auto_select_first(&extensions()).is_none());
    }

    #[test]
    fn changing_directory_reapplies_auto_select_first() {
        let dir_a = tempfile::tempdir().unwrap();
        let dir_b = tempfile::tempdir().unwrap();
        touch(dir_a.path(), "a.png");
        touch(dir_b.path(), "b.png");

        let mut nav = Navigator::default();
        nav.set_directory(dir_a.path().to_owned(), &extensions());
        assert_eq!(
            nav.auto_select_first(&extensions())
                .unwrap()
                .file_name()
                .unwrap(),
            "a.png"
        );

        nav.set_directory(dir_b.path().to_owned(), &extensions());
        assert_eq!(
            nav.auto_select_first(&extensions())
                .unwrap()
                .file_name()
                .unwrap(),
            "b.png"
        );
    }

    #[test]
    fn next_and_prev_walk_the_sorted_entries() {
        let dir = tempfile::tempdir().unwrap();
        for name in ["1.png", "2.png", "3.png"] {
            touch(dir.path(), name);
        }

        let mut nav = Navigator::default();
        nav.set_directory(dir.path().to_owned(), &extensions());
        nav.auto_select_first(&extensions());

        assert_eq!(nav.select_next().unwrap().file_name().unwrap(), "2.png");
        assert_eq!(nav.select_last().unwrap().file_name().unwrap(), "3.png");
        assert!(nav.select_next().is_none());
        assert_eq!(nav.select_prev().unwrap().file_name().unwrap(), "2.png");
        assert_eq!(nav.select_first().unwrap().file_name().unwrap(), "1.png");
        assert!(nav.select_prev().is_none());
    }

    #[test]
    fn rescan_keeps_the_selected_file_when_it_survives() {
        let dir = tempfile::tempdir().unwrap();
        touch(dir.path(), "keep.png");

        let mut nav = Navigator::default();
        nav.set_directory(dir.path().to_owned(), &extensions());
        nav.auto_select_first(&extensions());

        touch(dir.path(), "added.png");
        nav.rescan(&extensions());
        assert_eq!(
            nav.selected_path().unwrap().file_name().unwrap(),
            "keep.png"
        );
    }
}
