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
use crate::model::{ModeTag, PersonChain};

/// streams the selected plan of each `person` element in a population file
/// as a [`PersonChain`] of activity types and leg modes.
pub struct PopulationReader {
    reader: Reader<RecordSource>,
    buf: Vec<u8>,
    path: PathBuf,
    summary: ReadSummary,
    person: Option<PendingPerson>,
    failed: bool,
}

struct PendingPerson {
    chain: PersonChain,
    in_selected_plan: bool,
    plan_read: bool,
    error: Option<RecordError>,
}

impl PendingPerson {
    fn new(attributes: &HashMap<String, String>) -> Self {
        let (person_id, error) = match attributes.get("id").filter(|id| !id.is_empty()) {
            Some(id) => (id.clone(), None),
            None => (String::new(), Some(RecordError::MissingField(String::from("id")))),
        };
        Self {
            chain: PersonChain {
                person_id,
                ..Default::default()
            },
            in_selected_plan: false,
            plan_read: false,
            error,
        }
    }

    /// only the first selected plan contributes. a plan without a `selected`
    /// attribute counts as selected.
    fn open_plan(&mut self, attributes: &HashMap<String, String>) {
        let selected = attributes
            .get("selected")
            .map(|s| !s.eq_ignore_ascii_case("no"))
            .unwrap_or(true);
        self.in_selected_plan = selected && !self.plan_read;
    }

    fn close_plan(&mut self) {
        if self.in_selected_plan {
            self.plan_read = true;
        }
        self.in_selected_plan = false;
    }

    fn add_activity(&mut self, attributes: &HashMap<String, String>) {
        if !self.in_selected_plan || self.error.is_some() {
            return;
        }
        match attributes.get("type").filter(|t| !t.is_empty()) {
            Some(activity_type) => self.chain.activity_types.push(activity_type.clone()),
            None => self.error = Some(RecordError::MissingField(String::from("type"))),
        }
    }

    fn add_leg(&mut self, attributes: &HashMap<String, String>) {
        if !self.in_selected_plan || self.error.is_some() {
            return;
        }
        match attributes.get("mode").filter(|m| !m.is_empty()) {
            Some(mode) => self.chain.leg_modes.push(ModeTag::parse(mode)),
            None => self.error = Some(RecordError::MissingField(String::from("mode"))),
        }
    }
}

impl PopulationReader {
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
            person: None,
            failed: false,
        }
    }

    fn finish_person(&mut self, person: PendingPerson) -> Option<PersonChain> {
        match person.error {
            None => {
                self.summary.add_record();
                Some(person.chain)
            }
            Some(e) => {
                let position = self.reader.buffer_position() as u64;
                self.summary.add_malformed(&e, position);
                None
            }
        }
    }

    fn on_element(&mut self, name: &str, attributes: &HashMap<String, String>) {
        let Some(person) = self.person.as_mut() else {
            return;
        };
        match name {
            "plan" => person.open_plan(attributes),
            "activity" | "act" => person.add_activity(attributes),
            "leg" => person.add_leg(attributes),
            _ => {}
        }
    }
}

impl Iterator for PopulationReader {
    type Item = Result<PersonChain, ReaderError>;

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
                XmlEvent::Start { name, attributes } if name == "person" => {
                    self.person = Some(PendingPerson::new(&attributes));
                }
                XmlEvent::Empty { name, attributes } if name == "person" => {
                    let person = PendingPerson::new(&attributes);
                    if let Some(chain) = self.finish_person(person) {
                        return Some(Ok(chain));
                    }
                }
                XmlEvent::Start { name, attributes } => self.on_element(&name, &attributes),
                XmlEvent::Empty { name, attributes } => {
                    self.on_element(&name, &attributes);
                    if name == "plan" {
                        if let Some(person) = self.person.as_mut() {
                            person.close_plan();
                        }
                    }
                }
                XmlEvent::End { name } if name == "plan" => {
                    if let Some(person) = self.person.as_mut() {
                        person.close_plan();
                    }
                }
                XmlEvent::End { name } if name == "person" => {
                    if let Some(person) = self.person.take() {
                        if let Some(chain) = self.finish_person(person) {
                            return Some(Ok(chain));
                        }
                    }
                }
                XmlEvent::Eof => return None,
                _ => {}
            }
        }
    }
}

impl RecordStream<PersonChain> for PopulationReader {
    fn summary(&self) -> &ReadSummary {
        &self.summary
    }
}

#[cfg(test)]
mod test {
    use super::PopulationReader;
    use crate::model::ModeTag;
    use crate::reader::RecordStream;

    const POPULATION: &str = r#"<?xml version="1.0" encoding="utf-8"?>
<population>
  <person id="1">
    <plan selected="no">
      <activity type="home" x="0" y="0" end_time="07:00:00"/>
      <leg mode="car"/>
      <activity type="work" x="10" y="10"/>
    </plan>
    <plan selected="yes" score="12.3">
      <activity type="home" x="0" y="0" end_time="07:30:00"/>
      <leg mode="walk" dep_time="07:30:00">
        <route type="generic">link1 link2</route>
      </leg>
      <activity type="pt interaction" x="5" y="5" max_dur="00:00:00"/>
      <leg mode="pt"/>
      <activity type="work" x="10" y="10">
        <attributes>
          <attribute name="type" class="java.lang.String">ignored</attribute>
        </attributes>
      </activity>
    </plan>
  </person>
  <person id="2">
    <plan>
      <activity type="home" x="0" y="0"/>
      <leg/>
      <activity type="leisure" x="1" y="1"/>
    </plan>
  </person>
  <person id="3">
    <plan>
      <activity type="home" x="0" y="0"/>
    </plan>
  </person>
</population>
"#;

    #[test]
    fn test_reads_selected_plans_only() {
        let dir = tempfile::tempdir().expect("test invariant failed: no tempdir");
        let path = dir.path().join("output_plans.xml");
        std::fs::write(&path, POPULATION).expect("test invariant failed: cannot write fixture");

        let mut reader = PopulationReader::open(&path).expect("should open");
        let people = reader
            .by_ref()
            .collect::<Result<Vec<_>, _>>()
            .expect("should not fail");
        assert_eq!(people.len(), 2);
        assert_eq!(people[0].person_id, "1");
        assert_eq!(
            people[0].activity_types,
            vec!["home", "pt interaction", "work"]
        );
        assert_eq!(people[0].leg_modes, vec![ModeTag::Walk, ModeTag::Pt]);
        assert_eq!(people[1].person_id, "3");
        assert_eq!(people[1].activity_types, vec!["home"]);
        assert_eq!(reader.summary().records, 2);
        assert_eq!(reader.summary().malformed, 1);
    }
}
