use std::{
    collections::HashMap,
    path::{Path, PathBuf},
};

use quick_xml::Reader;

use super::{
    open_source,
    xml_ops::{self, XmlEvent},
    ReadSummary, ReaderError, RecordError, RecordSource, RecordStream,
};
use crate::model::StopRecord;

const STOP_ELEMENT: &str = "stopFacility";
const ATTRIBUTE_ELEMENT: &str = "attribute";
const CATEGORY_ATTRIBUTE: &str = "stopCategory";

/// streams `stopFacility` elements from a transit schedule file.
///
/// ```xml
/// <stopFacility id="8503000" x="2683256.0" y="1248066.0" name="Zürich HB">
///   <attributes>
///     <attribute name="stopCategory" class="java.lang.String">1</attribute>
///   </attributes>
/// </stopFacility>
/// ```
pub struct StopRegistryReader {
    reader: Reader<RecordSource>,
    buf: Vec<u8>,
    path: PathBuf,
    summary: ReadSummary,
    pending: Option<PendingStop>,
    capture_category: bool,
    failed: bool,
}

/// attributes of a stop element whose closing tag has not been read yet
#[derive(Default)]
struct PendingStop {
    attributes: HashMap<String, String>,
    category: Option<String>,
}

impl StopRegistryReader {
    pub fn open(path: &Path) -> Result<Self, ReaderError> {
        let source = open_source(path)?;
        Ok(Self::from_source(source, path))
    }

    pub fn from_source(source: RecordSource, path: &Path) -> Self {
        Self {
            reader: xml_ops::xml_reader(source),
            buf: Vec::new(),
            path: path.to_path_buf(),
            summary: ReadSummary::new(path),
            pending: None,
            capture_category: false,
            failed: false,
        }
    }

    /// finalizes a stop element, counting it as malformed if required fields
    /// are missing or not numeric.
    fn finish_stop(&mut self, pending: PendingStop) -> Option<StopRecord> {
        match build_stop(pending) {
            Ok(stop) => {
                self.summary.add_record();
                Some(stop)
            }
            Err(e) => {
                let position = self.reader.buffer_position() as u64;
                self.summary.add_malformed(&e, position);
                None
            }
        }
    }
}

impl Iterator for StopRegistryReader {
    type Item = Result<StopRecord, ReaderError>;

    fn next(&mut self) -> Option<Self::Item> {
        if self.failed {
            return None;
        }
        loop {
            let event = match xml_ops::next_event(&mut self.reader, &mut self.buf) {
                Ok(event) => event,
                Err(message) => {
                    self.failed = true;
                    return Some(Err(ReaderError::Markup {
                        path: self.path.clone(),
                        message,
                    }));
                }
            };
            match event {
                XmlEvent::Start { name, attributes } if name == STOP_ELEMENT => {
                    self.pending = Some(PendingStop {
                        attributes,
                        category: None,
                    });
                }
                XmlEvent::Empty { name, attributes } if name == STOP_ELEMENT => {
                    let pending = PendingStop {
                        attributes,
                        category: None,
                    };
                    if let Some(stop) = self.finish_stop(pending) {
                        return Some(Ok(stop));
                    }
                }
                XmlEvent::Start { name, attributes } if name == ATTRIBUTE_ELEMENT => {
                    self.capture_category = self.pending.is_some()
                        && attributes.get("name").map(String::as_str) == Some(CATEGORY_ATTRIBUTE);
                }
                XmlEvent::Text(text) if self.capture_category => {
                    if let Some(pending) = self.pending.as_mut() {
                        pending.category.get_or_insert_with(String::new).push_str(&text);
                    }
                }
                XmlEvent::End { name } if name == ATTRIBUTE_ELEMENT => {
                    self.capture_category = false;
                }
                XmlEvent::End { name } if name == STOP_ELEMENT => {
                    self.capture_category = false;
                    if let Some(pending) = self.pending.take() {
                        if let Some(stop) = self.finish_stop(pending) {
                            return Some(Ok(stop));
                        }
                    }
                }
                XmlEvent::Eof => return None,
                _ => {}
            }
        }
    }
}

impl RecordStream<StopRecord> for StopRegistryReader {
    fn summary(&self) -> &ReadSummary {
        &self.summary
    }
}

fn build_stop(pending: PendingStop) -> Result<StopRecord, RecordError> {
    let PendingStop {
        mut attributes,
        category,
    } = pending;
    let stop_id = attributes
        .remove("id")
        .filter(|s| !s.trim().is_empty())
        .ok_or_else(|| RecordError::MissingField(String::from("id")))?;
    let x = parse_coordinate(&attributes, "x")?;
    let y = parse_coordinate(&attributes, "y")?;
    let name = attributes.remove("name").filter(|s| !s.is_empty());
    let category = category
        .map(|c| c.trim().to_string())
        .filter(|c| !c.is_empty());
    Ok(StopRecord {
        stop_id,
        x,
        y,
        name,
        category,
    })
}

fn parse_coordinate(attributes: &HashMap<String, String>, field: &str) -> Result<f64, RecordError> {
    let raw = attributes
        .get(field)
        .ok_or_else(|| RecordError::MissingField(field.to_string()))?;
    raw.trim()
        .parse::<f64>()
        .ok()
        .filter(|v| v.is_finite())
        .ok_or_else(|| RecordError::InvalidNumber {
            field: field.to_string(),
            value: raw.clone(),
        })
}
