//! Batched image uploads.
//!
//! Files are read concurrently; the resulting images are appended in one step so a
//! batch appears all at once or not at all. The slide is captured by id when the
//! upload starts, so switching, inserting or deleting slides mid-read does not
//! redirect the batch.

use std::future::Future;

use futures::future::try_join_all;
use log::debug;

use super::Editor;
use crate::errors::{EditorError, Result};
use crate::models::{
    common::{random_below, BoundingBox, ElementId},
    image::{Image, DEFAULT_IMAGE_HEIGHT, DEFAULT_IMAGE_WIDTH},
};

const UPLOAD_ORIGIN: f64 = 100.0;
const UPLOAD_JITTER: u32 = 100;

/// Reads a user-picked file into an image source (usually a data URI).
pub trait ImageReader {
    type File;

    fn read_data_url<'a>(
        &'a self,
        file: &'a Self::File,
    ) -> impl Future<Output = Result<String>> + 'a;
}

/// Marks the slide an upload started on.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UploadTicket {
    slide_id: ElementId,
}

impl UploadTicket {
    pub fn slide_id(&self) -> &ElementId {
        &self.slide_id
    }
}

/// Images read from one file selection, ready to append.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct UploadBatch {
    images: Vec<Image>,
}

impl UploadBatch {
    /// One default-sized image per source, each with its own id and a jittered position.
    pub fn from_sources(sources: Vec<String>) -> Self {
        let images = sources
            .into_iter()
            .map(|src| {
                let jitter = f64::from(random_below(UPLOAD_JITTER));
                Image::new(
                    src,
                    BoundingBox::new(
                        UPLOAD_ORIGIN + jitter,
                        UPLOAD_ORIGIN + jitter,
                        DEFAULT_IMAGE_WIDTH,
                        DEFAULT_IMAGE_HEIGHT,
                    ),
                )
            })
            .collect();
        UploadBatch { images }
    }

    pub fn images(&self) -> &[Image] {
        &self.images
    }

    pub fn len(&self) -> usize {
        self.images.len()
    }

    pub fn is_empty(&self) -> bool {
        self.images.is_empty()
    }
}

/// Reads every file concurrently. Output order follows `files`, whatever order the
/// reads finish in. One failed read fails the batch.
pub async fn read_upload_batch<R: ImageReader>(
    reader: &R,
    files: &[R::File],
) -> Result<UploadBatch> {
    let sources = try_join_all(files.iter().map(|file| reader.read_data_url(file)))
        .await
        .map_err(|e| match e {
            EditorError::Upload(_) => e,
            other => EditorError::Upload(other.to_string()),
        })?;
    debug!("Read {} image file(s)", sources.len());
    Ok(UploadBatch::from_sources(sources))
}

impl Editor {
    /// Captures the current slide as the target of an upload.
    pub fn begin_upload(&self) -> UploadTicket {
        UploadTicket {
            slide_id: self.current_slide().id.clone(),
        }
    }

    /// Appends a finished batch to the ticket's slide in one step.
    ///
    /// Batches from overlapping uploads merge by independent append. Fails with
    /// `NotFound` when the ticket's slide was deleted while the files were read.
    pub fn apply_upload(&mut self, ticket: &UploadTicket, batch: UploadBatch) -> Result<Vec<ElementId>> {
        let index = self
            .deck
            .position(&ticket.slide_id)
            .ok_or_else(|| EditorError::NotFound(format!("upload target slide {}", ticket.slide_id)))?;
        if batch.is_empty() {
            return Ok(Vec::new());
        }
        let ids: Vec<ElementId> = batch.images.iter().map(|i| i.id.clone()).collect();
        self.deck.slide_mut(index)?.images.extend(batch.images);
        self.touch();
        debug!("Appended {} image(s) to slide {}", ids.len(), index);
        Ok(ids)
    }
}
