use std::path::PathBuf;

/// The five artifact paths of one session, derived from the user-supplied
/// prefix by fixed suffixes.
#[derive(Debug, Clone)]
pub struct SessionPaths {
    pub audio: PathBuf,
    pub video: PathBuf,
    pub transcript: PathBuf,
    pub summary: PathBuf,
    pub activity: PathBuf,
}

impl SessionPaths {
    pub fn for_prefix(prefix: &str) -> Self {
        Self {
            audio: PathBuf::from(format!("{prefix}_audio.wav")),
            video: PathBuf::from(format!("{prefix}_screen.avi")),
            transcript: PathBuf::from(format!("{prefix}_transcript.txt")),
            summary: PathBuf::from(format!("{prefix}_summary.txt")),
            activity: PathBuf::from(format!("{prefix}_activity.json")),
        }
    }
}
