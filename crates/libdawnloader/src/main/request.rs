//! Module for processing a whole request, from the raw query to the [`Completion`]

use crate::{
	data::{
		mode::DownloadMode,
		save_directory::SaveDirectory,
	},
	main::{
		download::{
			Completion,
			download,
			progress::ProgressEvent,
		},
		query::{
			Query,
			classify,
		},
		resolve::resolve,
	},
	traits::{
		media_service::MediaService,
		output_sink::OutputSink,
	},
};

/// Status reported before resolving
pub const STATUS_RESOLVING: &str = "Searching and Processing...";

/// A single request as submitted by the user, consumed by [`process_request`]
#[derive(Debug, Clone, PartialEq)]
pub struct Request {
	/// The raw query, a locator or a search term
	pub query:           String,
	/// The mode to download in
	pub mode:            DownloadMode,
	/// Write the thumbnail as a separate file next to the media
	pub write_thumbnail: bool,
}

impl Request {
	/// Crate a new instance of [`Request`], without writing thumbnails
	pub fn new<Q: Into<String>>(query: Q, mode: DownloadMode) -> Self {
		return Self {
			query: query.into(),
			mode,
			write_thumbnail: false,
		};
	}

	/// Builder function to set [`Self::write_thumbnail`]
	#[must_use]
	pub fn with_write_thumbnail(mut self, write_thumbnail: bool) -> Self {
		self.write_thumbnail = write_thumbnail;

		return self;
	}
}

/// Process a whole [`Request`]: validate the query, classify it, resolve it and download it into `save_dir`
/// Every stage is reported to `sink`, including the final success or failure
///
/// This function is blocking and should be run on a worker thread (like [`crate::main::worker::RequestWorker`])
pub fn process_request<S: MediaService + ?Sized, K: OutputSink + ?Sized>(
	service: &S,
	request: &Request,
	save_dir: &SaveDirectory,
	sink: &K,
) -> Result<Completion, crate::Error> {
	let res = process_request_inner(service, request, save_dir, sink);

	match &res {
		Ok(completion) => sink.success(completion),
		Err(err) => sink.failure(err),
	}

	return res;
}

/// Internal function for [`process_request`] to be able to use "?"
fn process_request_inner<S: MediaService + ?Sized, K: OutputSink + ?Sized>(
	service: &S,
	request: &Request,
	save_dir: &SaveDirectory,
	sink: &K,
) -> Result<Completion, crate::Error> {
	// an empty query is never classified
	let query = Query::new(request.query.as_str())?;
	let classified = classify(&query);

	sink.status(STATUS_RESOLVING);

	let media = resolve(service, &classified)?;

	sink.status(&format!("Downloading: {}", media.title));

	let mut observer = |event: ProgressEvent| {
		sink.progress(&event);
	};

	return download(
		service,
		&media,
		request.mode,
		save_dir,
		request.write_thumbnail,
		&mut observer,
	);
}

#[cfg(test)]
pub(crate) mod test {
	use std::sync::Mutex;

	use super::*;
	use crate::{
		data::{
			metadata::MetadataRecord,
			resolved_media::ResolvedMedia,
		},
		error::ErrorInner,
		main::download::progress::RawProgress,
		testing::{
			MockService,
			create_save_dir,
		},
	};

	/// A event recorded by [`RecordingSink`]
	#[derive(Debug, Clone, PartialEq)]
	pub enum SinkEvent {
		Status(String),
		Progress(ProgressEvent),
		Success(Completion),
		Failure(String),
	}

	/// [`OutputSink`] that records everything it gets
	#[derive(Debug, Default)]
	pub struct RecordingSink(Mutex<Vec<SinkEvent>>);

	impl RecordingSink {
		pub fn events(&self) -> Vec<SinkEvent> {
			return self.0.lock().expect("Expected lock").clone();
		}

		fn push(&self, event: SinkEvent) {
			self.0.lock().expect("Expected lock").push(event);
		}
	}

	impl OutputSink for RecordingSink {
		fn status(&self, msg: &str) {
			self.push(SinkEvent::Status(msg.to_owned()));
		}

		fn progress(&self, event: &ProgressEvent) {
			self.push(SinkEvent::Progress(*event));
		}

		fn success(&self, completion: &Completion) {
			self.push(SinkEvent::Success(completion.clone()));
		}

		fn failure(&self, err: &crate::Error) {
			self.push(SinkEvent::Failure(err.to_string()));
		}
	}

	#[test]
	fn test_full_request() {
		let (save_dir, _tempdir) = create_save_dir();
		let service = MockService::default()
			.with_record(MetadataRecord {
				entries: Some(vec![MetadataRecord {
					title: Some("lofi hip hop radio".to_owned()),
					channel: Some("Some Channel".to_owned()),
					url: Some("https://example.com/watch?v=lofi".to_owned()),
					..Default::default()
				}]),
				..Default::default()
			})
			.with_progress(vec![
				RawProgress::new("downloading", Some(" 50.0%".to_owned())),
				RawProgress::new("finished", None),
			]);
		let sink = RecordingSink::default();

		let res = process_request(&service, &Request::new("lofi beats", DownloadMode::Audio), &save_dir, &sink);

		let completion = Completion {
			media: ResolvedMedia::new("lofi hip hop radio", "Some Channel", "https://example.com/watch?v=lofi"),
			path:  None,
		};
		assert_eq!(Ok(completion.clone()), res);
		assert_eq!(
			vec![
				SinkEvent::Status("Searching and Processing...".to_owned()),
				SinkEvent::Status("Downloading: lofi hip hop radio".to_owned()),
				SinkEvent::Progress(ProgressEvent::downloading(50.0)),
				SinkEvent::Progress(ProgressEvent::finished()),
				SinkEvent::Success(completion),
			],
			sink.events()
		);
		assert_eq!(vec!["ytsearch1:lofi beats".to_owned()], service.resolve_calls());
		assert_eq!("https://example.com/watch?v=lofi", service.fetch_calls()[0].1);
	}

	#[test]
	fn test_empty_query() {
		let (save_dir, _tempdir) = create_save_dir();
		let service = MockService::default();
		let sink = RecordingSink::default();

		let res = process_request(&service, &Request::new("  ", DownloadMode::Video), &save_dir, &sink);

		assert_eq!(Err(crate::Error::empty_query()), res);
		assert_eq!(
			vec![SinkEvent::Failure("Please enter a link or name!".to_owned())],
			sink.events()
		);
		// the service must never be called for a empty query
		assert!(service.resolve_calls().is_empty());
		assert!(service.fetch_calls().is_empty());
	}

	#[test]
	fn test_resolution_failure_skips_download() {
		let (save_dir, _tempdir) = create_save_dir();
		let service = MockService::default().with_resolve_error(crate::Error::other("Unable to download webpage"));
		let sink = RecordingSink::default();

		let res = process_request(
			&service,
			&Request::new("https://example.com/watch?v=abc", DownloadMode::Video),
			&save_dir,
			&sink,
		);

		let err = res.expect_err("Expected request to fail");
		assert_eq!(&ErrorInner::Resolution("Unable to download webpage".to_owned()), err.inner());
		assert!(service.fetch_calls().is_empty());
		assert_eq!(
			Some(&SinkEvent::Failure("Resolution failed: Unable to download webpage".to_owned())),
			sink.events().last()
		);
	}
}
