//! Module containing [`SaveDirectory`]

use std::path::{
	Path,
	PathBuf,
};

use crate::error::IOErrorToError;

/// Name of the directory that gets created inside the base directories
pub const SAVE_DIR_NAME: &str = "Dawnloader";
/// Well-known mount point of the shared storage on mobile platforms (like termux on android)
pub const MOBILE_MOUNT_PATH: &str = "/sdcard";
/// Name of the file used to probe if a directory is actually writable
const WRITE_PROBE_NAME: &str = ".dawnloader_write_probe";

/// The directory all media gets downloaded into, resolved once at the start of a session
#[derive(Debug, Clone, PartialEq)]
pub struct SaveDirectory {
	path: PathBuf,
}

impl SaveDirectory {
	/// Get the path of the directory
	pub fn path(&self) -> &Path {
		return &self.path;
	}

	/// Resolve the [`SaveDirectory`] from the default candidates, see [`Self::default_candidates`]
	/// The directory is created if not existing
	pub fn resolve(explicit: Option<&Path>) -> Result<Self, crate::Error> {
		return Self::resolve_from(Self::default_candidates(explicit)?);
	}

	/// Get the candidates in order of preference
	///
	/// The primary candidate is `explicit` if set, otherwise "/sdcard/Download/Dawnloader" if "/sdcard" exists,
	/// followed by "~/Downloads/Dawnloader".
	/// The last fallback is always "Dawnloader" relative to the process working directory.
	pub fn default_candidates(explicit: Option<&Path>) -> Result<Vec<PathBuf>, crate::Error> {
		let mobile_mount = Path::new(MOBILE_MOUNT_PATH);

		return Self::candidates_from(
			explicit,
			Some(mobile_mount).filter(|v| return v.exists()),
			dirs::home_dir().as_deref(),
		);
	}

	/// Build the candidate list, see [`Self::default_candidates`]
	/// `mobile_mount` should only be set if it exists
	fn candidates_from(
		explicit: Option<&Path>,
		mobile_mount: Option<&Path>,
		home: Option<&Path>,
	) -> Result<Vec<PathBuf>, crate::Error> {
		let mut candidates = Vec::with_capacity(3);

		if let Some(explicit) = explicit {
			candidates.push(crate::utils::to_absolute(explicit).attach_path_err(explicit)?);
		} else {
			// the mount may exist without being writable (like missing storage permissions), so home still follows
			if let Some(mobile_mount) = mobile_mount {
				candidates.push(mobile_mount.join("Download").join(SAVE_DIR_NAME));
			}
			if let Some(home) = home {
				candidates.push(home.join("Downloads").join(SAVE_DIR_NAME));
			}
		}

		let process_relative =
			crate::utils::to_absolute(SAVE_DIR_NAME).attach_location_err("process relative save directory")?;
		candidates.push(process_relative);

		return Ok(candidates);
	}

	/// Use the first candidate that can be created and written to
	/// Returns a [`crate::error::ErrorInner::Environment`] if no candidate is usable
	pub fn resolve_from<I>(candidates: I) -> Result<Self, crate::Error>
	where
		I: IntoIterator<Item = PathBuf>,
	{
		let mut last_err = None;

		for candidate in candidates {
			match Self::prepare(&candidate) {
				Ok(()) => {
					debug!("Using save directory \"{}\"", candidate.display());
					return Ok(Self { path: candidate });
				},
				Err(err) => {
					warn!(
						"Save directory \"{}\" is not usable, trying next. Error: {}",
						candidate.display(),
						err
					);
					last_err = Some((err, candidate));
				},
			}
		}

		return Err(match last_err {
			Some((err, path)) => crate::Error::environment(format!("No usable save directory, last error: {err}"), path),
			None => crate::Error::environment("No save directory candidates", ""),
		});
	}

	/// Create the directory if not existing and check that files can be created in it
	fn prepare(path: &Path) -> Result<(), crate::Error> {
		std::fs::create_dir_all(path).attach_path_err(path)?;

		if !path.is_dir() {
			return Err(crate::Error::custom_ioerror_path(
				std::io::ErrorKind::Other,
				"Save directory is not a directory",
				path,
			));
		}

		// "readonly" permissions do not cover everything (like directories owned by other users), so actually try to write
		let probe = path.join(WRITE_PROBE_NAME);
		std::fs::File::create(&probe).attach_path_err(&probe)?;
		std::fs::remove_file(&probe).unwrap_or_else(|err| {
			info!("Error removing write probe file. Error: {}", err);
		});

		return Ok(());
	}
}
