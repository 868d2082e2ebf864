/// Custom actions for Project records.
///
/// Each swap installs a new stored file name and hands back the one it
/// replaced, so the caller can remove the superseded file afterwards.
#[derive(Debug, Clone)]
pub enum ProjectAction {
    /// Points the project at a newly stored archive.
    SwapArchive(String),
    /// Points the project at a newly stored preview image.
    SwapPreview(String),
}

/// Results from ProjectActions - variants match 1:1 with ProjectAction
#[derive(Debug, Clone, PartialEq)]
pub enum ProjectActionResult {
    ArchiveSwapped { previous: String },
    PreviewSwapped { previous: Option<String> },
}
