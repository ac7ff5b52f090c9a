//! Song ID derivation for projects whose directory name carries none
//!
//! A song ID has the form `DDMMYYYY_NN_GENRE`: the day the project directory
//! was created, the project's rank among the projects created that same day,
//! and the genre abbreviation.

use crate::config::{config_path, schema, ProjectConfig};
use crate::error::{BouncerError, Result, CONFIG_FILE_NAME};
use chrono::{DateTime, Local};
use std::path::Path;
use std::time::SystemTime;
use tracing::{debug, info};
use walkdir::WalkDir;

/// Creation time of a path, falling back to modification time on
/// filesystems that do not record creation
fn created_at(path: &Path) -> std::io::Result<SystemTime> {
    let metadata = std::fs::metadata(path)?;
    metadata.created().or_else(|_| metadata.modified())
}

fn day_stamp(time: SystemTime) -> String {
    DateTime::<Local>::from(time).format("%d%m%Y").to_string()
}

/// Compose a song ID from its parts
pub fn format_song_id(date: &str, day_rank: usize, genre_abbreviation: &str) -> String {
    format!("{}_{:02}_{}", date, day_rank, genre_abbreviation.trim())
}

/// Derive the song ID of `source_dir` from its creation date and its rank
/// among sibling directories created the same day
pub fn derive_song_id(source_dir: &Path, genre_abbreviation: &str) -> Result<String> {
    let created = created_at(source_dir)?;
    let date = day_stamp(created);

    let name = source_dir
        .file_name()
        .ok_or_else(|| BouncerError::SourceDirMissing(source_dir.to_path_buf()))?;
    let parent = source_dir
        .parent()
        .filter(|p| !p.as_os_str().is_empty())
        .unwrap_or_else(|| Path::new("."));

    let mut same_day: Vec<(SystemTime, std::ffi::OsString)> = WalkDir::new(parent)
        .min_depth(1)
        .max_depth(1)
        .into_iter()
        .filter_map(|e| e.ok())
        .filter(|e| e.file_type().is_dir())
        .filter_map(|e| {
            let time = created_at(e.path()).ok()?;
            (day_stamp(time) == date).then(|| (time, e.file_name().to_os_string()))
        })
        .collect();
    same_day.sort();

    let rank = same_day
        .iter()
        .position(|(_, sibling)| sibling.as_os_str() == name)
        .map(|i| i + 1)
        .unwrap_or(same_day.len() + 1);

    debug!(
        "{} is project {} of {} created on {}",
        source_dir.display(),
        rank,
        same_day.len(),
        date
    );

    Ok(format_song_id(&date, rank, genre_abbreviation))
}

/// Derive the song ID and store it in the project's config file
pub fn assign_song_id(source_dir: &Path) -> Result<String> {
    let path = config_path(source_dir);
    let mut config = ProjectConfig::load(&path)?;

    if !config.has_section(schema::SONG_DETAILS) {
        return Err(BouncerError::missing_section(schema::SONG_DETAILS));
    }

    let genre = config
        .get(schema::SONG_DETAILS, schema::GENRE_ABBREVIATION)
        .unwrap_or_default()
        .to_string();
    let song_id = derive_song_id(source_dir, &genre)?;

    config.set(schema::METADATA, schema::SONG_ID, song_id.as_str());
    config.save(&path)?;

    info!("Song ID updated to {} in {}", song_id, CONFIG_FILE_NAME);
    Ok(song_id)
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn test_format_song_id() {
        assert_eq!(format_song_id("01012024", 1, "POP"), "01012024_01_POP");
        assert_eq!(format_song_id("31122023", 12, " "), "31122023_12_");
    }

    #[test]
    fn test_single_project_ranks_first() {
        let root = TempDir::new().unwrap();
        let project = root.path().join("only project");
        std::fs::create_dir(&project).unwrap();

        let id = derive_song_id(&project, "HIP").unwrap();
        let today = day_stamp(SystemTime::now());
        assert_eq!(id, format!("{}_01_HIP", today));
    }

    #[test]
    fn test_rank_counts_same_day_siblings() {
        let root = TempDir::new().unwrap();
        for name in ["a", "b", "c"] {
            std::fs::create_dir(root.path().join(name)).unwrap();
        }
        // Plain files are not projects
        std::fs::write(root.path().join("notes.txt"), "x").unwrap();

        let ids: Vec<String> = ["a", "b", "c"]
            .iter()
            .map(|n| derive_song_id(&root.path().join(n), "POP").unwrap())
            .collect();

        let mut ranks: Vec<&str> = ids.iter().map(|id| &id[9..11]).collect();
        ranks.sort();
        assert_eq!(ranks, vec!["01", "02", "03"]);
    }

    #[test]
    fn test_assign_song_id_writes_config() {
        let root = TempDir::new().unwrap();
        let project = root.path().join("project");
        std::fs::create_dir(&project).unwrap();
        let mut config = ProjectConfig::template();
        config.set("Song Details", "Genre Abbreviation", "EDM");
        config.save(&config_path(&project)).unwrap();

        let id = assign_song_id(&project).unwrap();
        assert!(id.ends_with("_01_EDM"));
        let reloaded = ProjectConfig::load(&config_path(&project)).unwrap();
        assert_eq!(reloaded.get("Metadata", "songID"), Some(id.as_str()));
    }
}
