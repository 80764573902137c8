//! Handing a generated document to the outside world.
//!
//! The host environment supplies the response writer through
//! [`ResponseChannel`]; this module only decides headers, filename and body.

use std::path::{Path, PathBuf};

use chrono::NaiveDateTime;
use serde::{Deserialize, Serialize};
use tracing::info;

use crate::core::{Clock, DirectDebitFile, IncassoError};

/// Content type sent with every XML payload.
pub const XML_CONTENT_TYPE: &str = "text/xml";

/// Timestamp layout in download filenames (`ddMMyyyy-HHmmss`).
const FILENAME_TIMESTAMP_FORMAT: &str = "%d%m%Y-%H%M%S";

/// A writable HTTP-like response.
pub trait ResponseChannel {
    fn set_header(&mut self, name: &str, value: &str);
    fn write_body(&mut self, body: &[u8]) -> std::io::Result<()>;
}

/// What the host should do after a delivery call returns.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[must_use]
pub enum Delivery {
    /// The document was written; request handling may continue.
    Continue,
    /// The response is complete and must not be written to again.
    Terminated,
}

/// Settings for file-style delivery.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DeliveryOptions {
    /// Filename prefix; the timestamp and `.xml` are appended.
    pub filename_prefix: String,
}

impl Default for DeliveryOptions {
    fn default() -> Self {
        Self {
            filename_prefix: "sepa".into(),
        }
    }
}

impl DeliveryOptions {
    /// `<prefix>_<ddMMyyyy-HHmmss>.xml`
    pub fn filename(&self, at: NaiveDateTime) -> String {
        format!(
            "{}_{}.xml",
            self.filename_prefix,
            at.format(FILENAME_TIMESTAMP_FORMAT)
        )
    }
}

/// In-memory [`ResponseChannel`], useful for tests and for hosts that
/// build their response object after the fact.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct BufferedResponse {
    pub headers: Vec<(String, String)>,
    pub body: Vec<u8>,
}

impl BufferedResponse {
    /// Value of the last header set under `name` (case-insensitive).
    pub fn header(&self, name: &str) -> Option<&str> {
        self.headers
            .iter()
            .rev()
            .find(|(k, _)| k.eq_ignore_ascii_case(name))
            .map(|(_, v)| v.as_str())
    }
}

impl ResponseChannel for BufferedResponse {
    fn set_header(&mut self, name: &str, value: &str) {
        self.headers.push((name.to_string(), value.to_string()));
    }

    fn write_body(&mut self, body: &[u8]) -> std::io::Result<()> {
        self.body.extend_from_slice(body);
        Ok(())
    }
}

impl DirectDebitFile {
    /// Write the document to `channel` as `text/xml`.
    pub fn respond(
        &self,
        clock: &dyn Clock,
        channel: &mut dyn ResponseChannel,
    ) -> Result<Delivery, IncassoError> {
        let xml = self.to_xml(clock)?;
        channel.set_header("Content-Type", XML_CONTENT_TYPE);
        channel.write_body(xml.as_bytes())?;
        info!(
            message_id = %self.message_id,
            bytes = xml.len(),
            "pain.008 document sent"
        );
        Ok(Delivery::Continue)
    }

    /// Send the document as a file attachment named
    /// `sepa_<ddMMyyyy-HHmmss>.xml`, then end the response.
    pub fn download(
        &self,
        clock: &dyn Clock,
        channel: &mut dyn ResponseChannel,
    ) -> Result<Delivery, IncassoError> {
        self.download_with(clock, channel, &DeliveryOptions::default())
    }

    pub fn download_with(
        &self,
        clock: &dyn Clock,
        channel: &mut dyn ResponseChannel,
        options: &DeliveryOptions,
    ) -> Result<Delivery, IncassoError> {
        let now = clock.now();
        let xml = self.to_xml_at(now)?;
        let filename = options.filename(now);

        channel.set_header("Content-Type", XML_CONTENT_TYPE);
        channel.set_header(
            "Content-Disposition",
            &format!("attachment; filename={filename}"),
        );
        channel.write_body(xml.as_bytes())?;
        info!(
            message_id = %self.message_id,
            filename = %filename,
            bytes = xml.len(),
            "pain.008 document downloaded"
        );
        Ok(Delivery::Terminated)
    }

    /// Write the document into `dir` and return the created path.
    pub fn save_to(&self, clock: &dyn Clock, dir: &Path) -> Result<PathBuf, IncassoError> {
        self.save_to_with(clock, dir, &DeliveryOptions::default())
    }

    pub fn save_to_with(
        &self,
        clock: &dyn Clock,
        dir: &Path,
        options: &DeliveryOptions,
    ) -> Result<PathBuf, IncassoError> {
        let now = clock.now();
        let xml = self.to_xml_at(now)?;
        let path = dir.join(options.filename(now));
        std::fs::write(&path, xml.as_bytes())?;
        info!(
            message_id = %self.message_id,
            path = %path.display(),
            "pain.008 document saved"
        );
        Ok(path)
    }
}
