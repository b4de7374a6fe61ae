use std::{
    fs::File,
    io::Write,
    path::{Path, PathBuf},
};

use futures::StreamExt;
use tokio::sync::watch::Sender;

use crate::{
    config::{get_download_file, get_emulator_folder},
    options::Options,
    settings::{ensure_settings_file, save_settings, Settings},
};

#[derive(Debug, Clone, PartialEq)]
pub enum InstallProgress {
    NotStarted,
    Downloading { downloaded: u64, total: Option<u64> },
    Extracting,
    Done(PathBuf),
    Failed(String),
}

pub fn needs_install(settings: &Settings) -> bool {
    settings.xenia_path.is_empty() || !Path::new(&settings.xenia_path).exists()
}

/// Downloads and unpacks the emulator unless the install folder is already there.
/// Returns the path of the emulator executable inside the install folder.
pub async fn install_emulator(
    options: &Options,
    sender: &Option<Sender<InstallProgress>>,
) -> eyre::Result<PathBuf> {
    let folder = get_emulator_folder(options);
    if !folder.exists() {
        tracing::info!("Xenia not found. Downloading and installing...");
        let archive = get_download_file(options);
        download_archive(&options.emulator.download_url, &archive, sender).await?;
        unpack_downloaded_archive(archive, folder.clone(), sender).await?;
        tracing::info!(folder = %folder.display(), "Xenia installed successfully!");
    }
    Ok(folder.join(&options.emulator.executable))
}

/// Extracts the archive into `folder` and deletes the archive. A failed extraction
/// also deletes `folder` so the next start downloads again.
async fn unpack_downloaded_archive(
    archive: PathBuf,
    folder: PathBuf,
    sender: &Option<Sender<InstallProgress>>,
) -> eyre::Result<()> {
    send(sender, InstallProgress::Extracting);
    let extract_from = archive.clone();
    let extract_to = folder.clone();
    let extracted =
        tokio::task::spawn_blocking(move || extract_archive(&extract_from, &extract_to)).await?;
    let _ = std::fs::remove_file(&archive);
    if extracted.is_err() {
        let _ = std::fs::remove_dir_all(&folder);
    }
    extracted
}

/// Creates the settings file if needed and installs the emulator when the configured
/// path does not exist, storing the new path in the settings.
pub async fn ensure_files(
    settings_path: &Path,
    settings: &mut Settings,
    options: &Options,
    sender: &Option<Sender<InstallProgress>>,
) -> eyre::Result<()> {
    ensure_settings_file(settings_path, settings)?;
    if needs_install(settings) {
        match install_emulator(options, sender).await {
            Ok(path) => {
                settings.xenia_path = path.to_string_lossy().to_string();
                save_settings(settings_path, settings)?;
                send(sender, InstallProgress::Done(path));
            }
            Err(err) => {
                tracing::error!("Error installing Xenia: {err:?}");
                send(sender, InstallProgress::Failed(err.to_string()));
                return Err(err);
            }
        }
    }
    Ok(())
}

async fn download_archive(
    url: &str,
    target: &Path,
    sender: &Option<Sender<InstallProgress>>,
) -> eyre::Result<()> {
    tracing::info!(url, target = %target.display(), "Downloading emulator archive");
    if let Some(parent) = target.parent() {
        std::fs::create_dir_all(parent)?;
    }
    let response = reqwest::get(url).await?.error_for_status()?;
    let total = response.content_length();
    let mut file = File::create(target)?;
    let mut downloaded = 0u64;
    let mut stream = response.bytes_stream();
    send(sender, InstallProgress::Downloading { downloaded, total });
    while let Some(chunk) = stream.next().await {
        let chunk = chunk?;
        file.write_all(&chunk)?;
        downloaded += chunk.len() as u64;
        send(sender, InstallProgress::Downloading { downloaded, total });
    }
    file.flush()?;
    tracing::debug!(bytes = downloaded, "Finished download");
    Ok(())
}

pub fn extract_archive(archive: &Path, target: &Path) -> eyre::Result<()> {
    let file = File::open(archive)?;
    let mut zip = zip::ZipArchive::new(file)?;
    std::fs::create_dir_all(target)?;
    for i in 0..zip.len() {
        let mut entry = zip.by_index(i)?;
        let relative = match entry.enclosed_name() {
            Some(name) => name.to_owned(),
            None => {
                return Err(eyre::eyre!(
                    "Archive entry {} points outside the install folder",
                    entry.name()
                ));
            }
        };
        let out_path = target.join(relative);
        if entry.is_dir() {
            std::fs::create_dir_all(&out_path)?;
            continue;
        }
        if let Some(parent) = out_path.parent() {
            std::fs::create_dir_all(parent)?;
        }
        let mut out_file = File::create(&out_path)?;
        std::io::copy(&mut entry, &mut out_file)?;
        #[cfg(target_family = "unix")]
        if let Some(mode) = entry.unix_mode() {
            use std::os::unix::fs::PermissionsExt;
            std::fs::set_permissions(&out_path, std::fs::Permissions::from_mode(mode))?;
        }
    }
    Ok(())
}

fn send(sender: &Option<Sender<InstallProgress>>, progress: InstallProgress) {
    if let Some(sender) = sender {
        let _ = sender.send(progress);
    }
}
