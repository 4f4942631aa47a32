//! Module for the Resolution Step

use crate::{
	data::resolved_media::ResolvedMedia,
	main::query::ClassifiedQuery,
	traits::media_service::MediaService,
};

/// Resolve a [`ClassifiedQuery`] to a single [`ResolvedMedia`] without downloading any media
///
/// Searches (and everything else that returns entries) resolve to the first entry.
/// This function is blocking and should be run on a worker thread (like [`crate::main::worker::RequestWorker`])
/// Any failure is returned as a [`crate::error::ErrorInner::Resolution`] with a truncated message
pub fn resolve<S: MediaService + ?Sized>(service: &S, query: &ClassifiedQuery) -> Result<ResolvedMedia, crate::Error> {
	let service_query = query.as_service_query();

	debug!("Resolving \"{}\"", service_query);

	return resolve_inner(service, &service_query).map_err(|err| {
		warn!("Resolving \"{}\" failed: {}", service_query, err);
		return err.into_request_error(crate::Error::resolution);
	});
}

/// Internal function for [`resolve`] to be able to use "?"
fn resolve_inner<S: MediaService + ?Sized>(service: &S, service_query: &str) -> Result<ResolvedMedia, crate::Error> {
	let mut record = service.resolve_metadata(service_query)?;

	if let Some(entries) = record.entries.take() {
		let first = entries
			.into_iter()
			.next()
			.ok_or_else(|| return crate::Error::other("No results found"))?;

		return Ok(ResolvedMedia::from_record(first, service_query));
	}

	return Ok(ResolvedMedia::from_record(record, service_query));
}
