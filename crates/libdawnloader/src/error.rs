//! Module for the Error type this library uses

use std::{
	backtrace::Backtrace,
	io::Error as ioError,
	path::Path,
	thread::JoinHandle,
};

/// Macro to not repeat having to do multiple implementations of a [ErrorInner] variant with the same string type
macro_rules! fn_string {
	($fn_name:ident, $fortype:expr) => {
		#[doc = concat!("Create a new [Self] as [", stringify!($fortype), "]")]
		pub fn $fn_name<M>(msg: M) -> Self
		where
			M: Into<String>,
		{
			return Self::new($fortype(msg.into()));
		}
	};
}

/// Macro to not repeat having to do multiple implementations of a [ErrorInner] variant with the same path type
macro_rules! fn_path {
	($fn_name:ident, $fortype:expr) => {
		#[doc = concat!("Create a new [Self] as [", stringify!($fortype), "]")]
		pub fn $fn_name<M, P>(msg: M, path: P) -> Self
		where
			M: Into<String>,
			P: AsRef<Path>,
		{
			return Self::new($fortype(msg.into(), path.as_ref().to_string_lossy().to_string()));
		}
	};
}

/// Maximal length (in graphemes) of the message of a request-level error
pub const MAX_REQUEST_MESSAGE_LEN: usize = 50;

/// Error type for libdawnloader, contains a backtrace, wrapper around [ErrorInner]
#[derive(Debug)]
pub struct Error {
	/// The actual error
	source:    ErrorInner,
	/// The backtrace for the error
	backtrace: Backtrace,
}

impl Error {
	/// Construct a new [Error] instance based on [ErrorInner]
	pub fn new(source: ErrorInner) -> Self {
		return Self {
			source,
			backtrace: Backtrace::capture(),
		};
	}

	/// Get the backtrace that is stored
	pub fn get_backtrace(&self) -> &Backtrace {
		return &self.backtrace;
	}

	/// Get the inner error kind
	pub fn inner(&self) -> &ErrorInner {
		return &self.source;
	}

	/// Create a custom [ioError] with this [Error] wrapped around with a [Path] attached
	pub fn custom_ioerror_path<M, P>(kind: std::io::ErrorKind, msg: M, path: P) -> Self
	where
		M: Into<String>,
		P: AsRef<Path>,
	{
		return Self::new(ErrorInner::IoError(
			ioError::new(kind, msg.into()),
			format_path(path.as_ref().to_string_lossy().to_string()),
		));
	}

	/// Create a custom [ioError] with this [Error] wrapped around with a location attached
	pub fn custom_ioerror_location<M, L>(kind: std::io::ErrorKind, msg: M, location: L) -> Self
	where
		M: Into<String>,
		L: AsRef<str>,
	{
		return Self::new(ErrorInner::IoError(
			ioError::new(kind, msg.into()),
			format_location(location.as_ref()),
		));
	}

	fn_string!(other, ErrorInner::Other);
	fn_string!(no_captures, ErrorInner::NoCapturesFound);
	fn_string!(command_unsuccessful, ErrorInner::CommandNotSuccesful);
	fn_string!(resolution, ErrorInner::Resolution);
	fn_string!(download, ErrorInner::Download);
	fn_string!(busy, ErrorInner::Busy);
	fn_string!(invalid_options, ErrorInner::InvalidOptions);
	fn_path!(environment, ErrorInner::Environment);

	/// Create a new [Self] as [ErrorInner::EmptyQuery]
	pub fn empty_query() -> Self {
		return Self::new(ErrorInner::EmptyQuery);
	}

	/// Get whether this error only ends the current request (and the caller should wait for a new query)
	/// instead of being a fault of the whole process
	#[must_use]
	pub fn is_request_error(&self) -> bool {
		return matches!(
			self.source,
			ErrorInner::EmptyQuery | ErrorInner::Resolution(_) | ErrorInner::Download(_) | ErrorInner::Busy(_)
		);
	}

	/// Get the message of this error, without the variant prefix for variants that only carry a message
	pub fn message(&self) -> String {
		return match &self.source {
			ErrorInner::Resolution(msg)
			| ErrorInner::Download(msg)
			| ErrorInner::Busy(msg)
			| ErrorInner::InvalidOptions(msg)
			| ErrorInner::CommandNotSuccesful(msg)
			| ErrorInner::NoCapturesFound(msg)
			| ErrorInner::Other(msg) => msg.clone(),
			_ => self.source.to_string(),
		};
	}

	/// Convert this error into a request-level error created with `ctor` (like [Error::resolution])
	/// The message is truncated to [MAX_REQUEST_MESSAGE_LEN]
	#[must_use]
	pub fn into_request_error(self, ctor: fn(String) -> Self) -> Self {
		let msg = self.message();

		return ctor(crate::utils::truncate_message(&msg, MAX_REQUEST_MESSAGE_LEN).into_owned());
	}

	/// Map a [std::thread::JoinHandle::join] error to a [Error] with a thread name
	fn map_thread_join<N: AsRef<str>>(name: N) -> impl Fn(Box<dyn std::any::Any + Send + 'static>) -> Self {
		return move |from| {
			let name = name.as_ref().to_owned();
			if let Some(v) = from.downcast_ref::<String>() {
				return Self::new(ErrorInner::ThreadJoinError(v.clone(), name));
			}
			if let Some(v) = from.downcast_ref::<&str>() {
				return Self::new(ErrorInner::ThreadJoinError(v.to_string(), name));
			}

			return Self::new(ErrorInner::ThreadJoinError("unknown error".into(), name));
		};
	}
}

impl PartialEq for Error {
	fn eq(&self, other: &Self) -> bool {
		return self.source == other.source;
	}
}

impl std::fmt::Display for Error {
	fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
		return self.source.fmt(f);
	}
}

impl std::error::Error for Error {
	fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
		return self.source.source();
	}
}

// implement all From<> variants that ErrorInner also implements
impl<T> From<T> for Error
where
	T: Into<ErrorInner>,
{
	fn from(value: T) -> Self {
		return Self::new(value.into());
	}
}

/// Error type for "dawnloader", implements all Error types that could happen in this lib
#[derive(thiserror::Error, Debug)]
pub enum ErrorInner {
	/// Wrapper Variant for [`std::io::Error`]
	/// Argument 1 (String) is up to the implementation to set, commonly the path
	#[error("IoError: {0}; {1}")]
	IoError(std::io::Error, String),
	/// Wrapper Variant for [`std::string::FromUtf8Error`]
	#[error("FromStringUTF8Error: {0}")]
	FromStringUTF8Error(#[from] std::string::FromUtf8Error),
	/// Variant for serde-json Errors
	#[error("SerdeJSONError: {0}")]
	SerdeJSONError(#[from] serde_json::Error),

	/// Variant for a empty or whitespace-only query, never handed to the classifier
	#[error("Please enter a link or name!")]
	EmptyQuery,
	/// Variant for when the extraction service could not resolve a query to a single media
	#[error("Resolution failed: {0}")]
	Resolution(String),
	/// Variant for when the transfer or post-processing failed after a successful resolution
	#[error("Download failed: {0}")]
	Download(String),
	/// Variant for when no usable save directory could be created
	#[error("Environment: {0}; Path: \"{1}\"")]
	Environment(String, String),
	/// Variant for when a request was submitted while another was still in flight
	#[error("Busy: {0}")]
	Busy(String),
	/// Variant for [`crate::main::download::DownloadOptions`] that did not pass validation
	#[error("InvalidOptions: {0}")]
	InvalidOptions(String),

	/// Variant for when a spawned command was not successfull
	#[error("CommandNotSuccessfull: {0}")]
	CommandNotSuccesful(String),
	/// Variant for when no regex captures have been found
	#[error("NoCapturesFound: {0}")]
	NoCapturesFound(String),
	/// Variant for thread join errors
	#[error("ThreadJoinError: name: \"{1}\" original error: {0}")]
	ThreadJoinError(String, String),
	/// Variant for Other messages
	#[error("Other: {0}")]
	Other(String),
}

// this is custom, some errors like "std::io::Error" do not implement "PartialEq", but some inner type may do
impl PartialEq for ErrorInner {
	fn eq(&self, other: &Self) -> bool {
		match (self, other) {
			(Self::IoError(l0, l1), Self::IoError(r0, r1)) => return l0.kind() == r0.kind() && l1 == r1,
			(Self::FromStringUTF8Error(l0), Self::FromStringUTF8Error(r0)) => return l0 == r0,
			// serde_json errors do not implement PartialEq, so compare their messages
			(Self::SerdeJSONError(l0), Self::SerdeJSONError(r0)) => return l0.to_string() == r0.to_string(),

			(Self::EmptyQuery, Self::EmptyQuery) => return true,
			(Self::Resolution(l0), Self::Resolution(r0)) => return l0 == r0,
			(Self::Download(l0), Self::Download(r0)) => return l0 == r0,
			(Self::Environment(l0, l1), Self::Environment(r0, r1)) => return l0 == r0 && l1 == r1,
			(Self::Busy(l0), Self::Busy(r0)) => return l0 == r0,
			(Self::InvalidOptions(l0), Self::InvalidOptions(r0)) => return l0 == r0,

			(Self::CommandNotSuccesful(l0), Self::CommandNotSuccesful(r0)) => return l0 == r0,
			(Self::NoCapturesFound(l0), Self::NoCapturesFound(r0)) => return l0 == r0,
			(Self::ThreadJoinError(l0, l1), Self::ThreadJoinError(r0, r1)) => return l0 == r0 && l1 == r1,
			(Self::Other(l0), Self::Other(r0)) => return l0 == r0,

			(_, _) => return false,
		}
	}
}

/// Custom [std::thread::JoinHandle::join] implementation to return a [Error] with thread name
pub trait CustomThreadJoin<T> {
	/// Custom thread join method for libdawnloader so that errors are automatically mapped to the current error type and have the named from the thread
	fn join_err(self) -> Result<T, crate::Error>;
}

impl<T> CustomThreadJoin<T> for JoinHandle<T> {
	fn join_err(self) -> Result<T, crate::Error> {
		let name = self.thread().name().unwrap_or("<unnamed>").to_owned();
		return self.join().map_err(crate::Error::map_thread_join(name));
	}
}

/// Helper function to keep consistent formatting
#[inline]
fn format_path(msg: String) -> String {
	return format!("Path \"{}\"", msg);
}
/// Helper function to keep consistent formatting
#[inline]
fn format_location(msg: &str) -> String {
	return format!("Location \"{}\"", msg);
}

/// Trait to map [std::io::Error] into [Error]
pub trait IOErrorToError<T> {
	/// Map a [std::io::Error] to [Error] with a [std::path::Path] attached
	fn attach_path_err<P: AsRef<Path>>(self, path: P) -> Result<T, crate::Error>;
	/// Map a [std::io::Error] to [Error] with a location attached (for when [attach_path_err] is not applicable)
	fn attach_location_err<P: AsRef<str>>(self, pipe_msg: P) -> Result<T, crate::Error>;
}

impl<T> IOErrorToError<T> for Result<T, std::io::Error> {
	fn attach_path_err<P: AsRef<Path>>(self, path: P) -> Result<T, crate::Error> {
		return match self {
			Ok(v) => Ok(v),
			Err(e) => Err(crate::Error::new(ErrorInner::IoError(
				e,
				format_path(path.as_ref().to_string_lossy().to_string()),
			))),
		};
	}

	fn attach_location_err<L: AsRef<str>>(self, location: L) -> Result<T, crate::Error> {
		return match self {
			Ok(v) => Ok(v),
			Err(e) => Err(crate::Error::new(ErrorInner::IoError(
				e,
				format_location(location.as_ref()),
			))),
		};
	}
}

#[cfg(test)]
mod test {
	use super::*;

	#[test]
	fn test_request_errors() {
		assert!(Error::empty_query().is_request_error());
		assert!(Error::resolution("no results").is_request_error());
		assert!(Error::download("ffmpeg failed").is_request_error());
		assert!(Error::busy("in flight").is_request_error());

		assert!(!Error::environment("cannot create", "/nope").is_request_error());
		assert!(!Error::other("something").is_request_error());
	}

	#[test]
	fn test_into_request_error() {
		assert_eq!(
			Error::resolution("Unsupported URL: https://example.com"),
			Error::other("Unsupported URL: https://example.com").into_request_error(Error::resolution)
		);

		let long = "a".repeat(80);
		let err = Error::command_unsuccessful(long).into_request_error(Error::download);
		assert_eq!(&ErrorInner::Download(format!("{}...", "a".repeat(50))), err.inner());
	}

	#[test]
	fn test_attach_path_err() {
		let res: Result<(), std::io::Error> = Err(ioError::new(std::io::ErrorKind::NotFound, "missing"));

		assert_eq!(
			res.attach_path_err("/some/path"),
			Err(Error::custom_ioerror_path(
				std::io::ErrorKind::NotFound,
				"missing",
				"/some/path"
			))
		);
	}

	#[test]
	fn test_thread_join_err() {
		let handle = std::thread::Builder::new()
			.name("panicking thread".to_owned())
			.spawn(|| {
				panic!("expected panic");
			})
			.expect("Expected thread to spawn");

		let res: Result<(), Error> = handle.join_err();

		assert_eq!(
			res,
			Err(Error::new(ErrorInner::ThreadJoinError(
				"expected panic".to_owned(),
				"panicking thread".to_owned()
			)))
		);
	}
}
