//! Pipeline orchestration
//!
//! One run: make sure the project config is complete, resolve the print and
//! showcase directories, then run the three phases in order (showcase
//! export, release note, POST package) and bump the version.

use crate::audio::Transcoder;
use crate::config::schema;
use crate::config::{check, config_path, increment_version, ConfigStatus, ProjectConfig, Settings};
use crate::discovery::{
    assign_song_id, initialize_from_dir_name, latest_print, parse_project_dir, PrintSource,
};
use crate::error::{BouncerError, Result, CONFIG_FILE_NAME};
use crate::export::{build_post_package, export_master, write_release_note, PostReport, ShowcaseExport};
use crate::prompt::{Prompt, ALP_LABEL, SHOWCASE_LABEL, STEMS_LABEL};
use crate::types::{ProjectOptions, StemType};
use std::path::{Path, PathBuf};
use tracing::{debug, info, warn};

/// How a run ended
#[derive(Debug)]
pub enum RunOutcome {
    /// `config.ini` was created; the user completes it and reruns
    Initialized { matched_dir_name: bool },
    /// `config.ini` has empty or missing fields
    NeedsInput,
    /// All phases ran
    Completed(RunSummary),
}

/// Outputs of a completed run
#[derive(Debug)]
pub struct RunSummary {
    /// Version the outputs were created for
    pub version: u32,
    /// Version stored in `config.ini` for the next run
    pub next_version: u32,
    pub showcase_file: PathBuf,
    pub release_note: PathBuf,
    pub post: PostReport,
}

/// Run the full pipeline for `settings.source_dir`
pub fn run(
    settings: &Settings,
    prompt: &dyn Prompt,
    transcoder: &dyn Transcoder,
) -> Result<RunOutcome> {
    let source_dir = settings.source_dir.as_path();
    if !source_dir.is_dir() {
        return Err(BouncerError::SourceDirMissing(source_dir.to_path_buf()));
    }

    let config_file = config_path(source_dir);
    if !config_file.exists() {
        let matched_dir_name = initialize_project(source_dir, prompt)?;
        return Ok(RunOutcome::Initialized { matched_dir_name });
    }

    if let ConfigStatus::NeedsInput { .. } = check(&config_file)? {
        warn!(
            "Please update {} with the required values and rerun bouncer",
            CONFIG_FILE_NAME
        );
        return Ok(RunOutcome::NeedsInput);
    }

    let mut config = ProjectConfig::load(&config_file)?;
    let options = config.options();

    if options.use_source_dir_names {
        refresh_from_dir_name(&mut config, source_dir);
    }

    let (prints, showcase_dir) = resolve_directories(&mut config, source_dir, options, prompt)?;

    config.normalize_names();
    config.save(&config_file)?;

    let details = config.song_details()?;
    let metadata = config.metadata()?;
    debug!("Running for {:?} / {:?}", metadata, details);

    print_phase(1, "Copy Latest Master Track to Showcase Directory");
    let master = latest_print(&prints, StemType::Master.label())?;
    let print_folder = prints.print_folder();
    let showcase_file = export_master(
        master.as_deref(),
        &ShowcaseExport {
            showcase_dir: &showcase_dir,
            print_folder: &print_folder,
            metadata: &metadata,
            details: &details,
            keep_previous: options.save_master_editions,
        },
        transcoder,
    )?;

    print_phase(
        2,
        &format!(
            "Create a release note for version {} and save it in the release notes directory",
            metadata.version
        ),
    );
    let release_note = write_release_note(source_dir, &config)?;

    print_phase(
        3,
        "Create a new post entry in the POST directory and copy over the stems and release note into this entry",
    );
    let post = build_post_package(
        source_dir,
        &prints,
        &release_note,
        &config,
        transcoder,
        settings.show_progress,
    )?;

    let next_version = increment_version(&config_file)?;

    Ok(RunOutcome::Completed(RunSummary {
        version: metadata.version,
        next_version,
        showcase_file,
        release_note,
        post,
    }))
}

/// First run: write `config.ini` from the directory name (or a blank
/// template), start the version count and make sure a song ID exists
///
/// Returns whether the directory name matched the project pattern.
pub fn initialize_project(source_dir: &Path, prompt: &dyn Prompt) -> Result<bool> {
    let matched = initialize_from_dir_name(source_dir, prompt)?;
    increment_version(&config_path(source_dir))?;
    if !matched {
        assign_song_id(source_dir)?;
    }
    warn!(
        "{} has been created at {}. Please fill out the rest of the file and rerun bouncer",
        CONFIG_FILE_NAME,
        config_path(source_dir).display()
    );
    Ok(matched)
}

/// Re-read song details from the directory name, if it still matches
fn refresh_from_dir_name(config: &mut ProjectConfig, source_dir: &Path) {
    match parse_project_dir(source_dir) {
        Some(parsed) => {
            info!("Refreshing song details from the source directory name");
            parsed.apply_to(config);
        }
        None => warn!(
            "useSourceDirNames is set but '{}' does not match the project naming pattern",
            source_dir.display()
        ),
    }
}

fn existing_dir(dir: Option<PathBuf>) -> Option<PathBuf> {
    dir.filter(|d| d.is_dir())
}

/// Make sure every directory the run needs exists, asking the user for any
/// that do not, and record the choices in the config
fn resolve_directories(
    config: &mut ProjectConfig,
    source_dir: &Path,
    options: ProjectOptions,
    prompt: &dyn Prompt,
) -> Result<(PrintSource, PathBuf)> {
    let dirs = config.directories();

    let print_root = if options.ableton_as_daw {
        let alp_dir = match existing_dir(dirs.alp_dir) {
            Some(dir) => dir,
            None => prompt.select_directory(ALP_LABEL)?,
        };
        config.set_directory(schema::ALP_DIR, Some(&alp_dir));
        config.set_directory(schema::STEMS_DIR, None);
        alp_dir
    } else {
        let stems_dir = match existing_dir(dirs.stems_dir) {
            Some(dir) => dir,
            None => prompt.select_directory(STEMS_LABEL)?,
        };
        config.set_directory(schema::STEMS_DIR, Some(&stems_dir));
        config.set_directory(schema::ALP_DIR, None);
        stems_dir
    };

    let showcase_dir = match existing_dir(dirs.showcase_dir) {
        Some(dir) => dir,
        None => prompt.select_directory(SHOWCASE_LABEL)?,
    };
    config.set_directory(schema::SHOWCASE_DIR, Some(&showcase_dir));
    config.set_directory(schema::SOURCE_DIR, Some(source_dir));

    let prints = PrintSource::new(
        print_root,
        options.ableton_as_daw,
        options.ableton_consolidate,
    );
    Ok((prints, showcase_dir))
}

fn print_phase(number: usize, title: &str) {
    println!();
    println!("Phase {}: {}", number, title);
}
