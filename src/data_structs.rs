use chrono::{DateTime, SecondsFormat, Utc};
use serde::ser::{Serialize, SerializeMap, Serializer};
use std::fmt;

/// Name of the column holding the extraction instant.
pub const TIMESTAMP_FIELD: &str = "timestamp";

/// Prefix shared by every per-party vote column.
pub const VOTES_PREFIX: &str = "votes_";

/// A single typed value in a `ResultRecord`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FieldValue {
    /// Free text kept exactly as the page shows it (e.g. "120/150").
    Text(String),
    Integer(u64)
}

impl fmt::Display for FieldValue {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match self {
            FieldValue::Text(val) => f.write_str(val),
            FieldValue::Integer(val) => write!(f, "{}", val)
        }
    }
}

impl Serialize for FieldValue {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        match self {
            FieldValue::Text(val) => serializer.serialize_str(val),
            FieldValue::Integer(val) => serializer.serialize_u64(*val)
        }
    }
}

/// The figures extracted for one department in one run.
///
/// Fields keep the order in which they were first set, which is also the
/// column order used when the record is written out. `timestamp` always
/// comes first.
#[derive(Debug, Clone, PartialEq)]
pub struct ResultRecord {
    timestamp: DateTime<Utc>,
    fields: Vec<(String, FieldValue)>
}

impl ResultRecord {
    /// Creates a record holding only the given timestamp.
    pub fn new(timestamp: DateTime<Utc>) -> Self {
        ResultRecord {
            timestamp,
            fields: vec![]
        }
    }

    #[inline]
    pub fn timestamp(&self) -> DateTime<Utc> {
        self.timestamp
    }

    /// The timestamp as written to the output, e.g. `2025-05-11T21:30:00.000Z`.
    pub fn timestamp_string(&self) -> String {
        self.timestamp.to_rfc3339_opts(SecondsFormat::Millis, true)
    }

    /// Sets `name` to `value`.
    ///
    /// Setting a name that is already present replaces the value in place.
    pub fn set<S: Into<String>>(&mut self, name: S, value: FieldValue) {
        let name = name.into();

        match self.fields.iter_mut().find(|(n, _)| *n == name) {
            Some(field) => field.1 = value,
            None => self.fields.push((name, value))
        }
    }

    pub fn get(&self, name: &str) -> Option<&FieldValue> {
        self.fields.iter().find(|(n, _)| n == name).map(|(_, v)| v)
    }

    /// Every column name of this record, `timestamp` included.
    pub fn field_names(&self) -> Vec<String> {
        let mut names = Vec::with_capacity(self.fields.len() + 1);
        names.push(TIMESTAMP_FIELD.to_string());
        names.extend(self.fields.iter().map(|(n, _)| n.clone()));
        names
    }

    /// Every value of this record rendered as text, in `field_names` order.
    pub fn values(&self) -> Vec<String> {
        let mut values = Vec::with_capacity(self.fields.len() + 1);
        values.push(self.timestamp_string());
        values.extend(self.fields.iter().map(|(_, v)| v.to_string()));
        values
    }

    /// The value of `name` rendered as text, if the record has it.
    pub fn value_of(&self, name: &str) -> Option<String> {
        if name == TIMESTAMP_FIELD {
            Some(self.timestamp_string())
        } else {
            self.get(name).map(|v| v.to_string())
        }
    }

    /// Iterates over the per-party vote counts as `(party key, votes)`.
    pub fn party_votes(&self) -> impl Iterator<Item = (&str, u64)> {
        self.fields.iter().filter_map(|(name, value)| {
            match (name.strip_prefix(VOTES_PREFIX), value) {
                (Some(key), FieldValue::Integer(votes)) => Some((key, *votes)),
                _ => None
            }
        })
    }

    /// Adds every field of `other` to this record.
    pub fn merge(&mut self, other: Vec<(String, FieldValue)>) {
        for (name, value) in other {
            self.set(name, value);
        }
    }
}

impl Serialize for ResultRecord {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let mut map = serializer.serialize_map(Some(self.fields.len() + 1))?;
        map.serialize_entry(TIMESTAMP_FIELD, &self.timestamp_string())?;

        for (name, value) in &self.fields {
            map.serialize_entry(name, value)?;
        }

        map.end()
    }
}

/// The department to show on the results page before extracting.
#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct DepartmentSelection {
    /// Identifier the page uses internally, e.g. `LAVALLEJA`.
    pub code: String,
    /// Display name, e.g. `Lavalleja`.
    pub name: String
}

#[cfg(test)]
mod test {
    use super::*;
    use chrono::TimeZone;

    fn record() -> ResultRecord {
        ResultRecord::new(Utc.with_ymd_and_hms(2025, 5, 11, 21, 30, 0).unwrap())
    }

    #[test]
    fn timestamp_comes_first() {
        let mut rec = record();
        rec.set("totalPrecincts", FieldValue::Integer(150));
        rec.set("votes_PartyA", FieldValue::Integer(1000));

        assert_eq!(rec.field_names(), vec!["timestamp", "totalPrecincts", "votes_PartyA"]);
        assert_eq!(rec.values(), vec!["2025-05-11T21:30:00.000Z", "150", "1000"]);
    }

    #[test]
    fn set_replaces_in_place() {
        let mut rec = record();
        rec.set("a", FieldValue::Integer(1));
        rec.set("b", FieldValue::Integer(2));
        rec.set("a", FieldValue::Text("x".into()));

        assert_eq!(rec.field_names(), vec!["timestamp", "a", "b"]);
        assert_eq!(rec.get("a"), Some(&FieldValue::Text("x".into())));
    }

    #[test]
    fn party_votes_only_yields_vote_columns() {
        let mut rec = record();
        rec.set("totalPrecincts", FieldValue::Integer(150));
        rec.set("votes_Partido_Nacional", FieldValue::Integer(12));

        let votes: Vec<_> = rec.party_votes().collect();
        assert_eq!(votes, vec![("Partido_Nacional", 12)]);
    }

    #[test]
    fn serializes_as_ordered_map() {
        let mut rec = record();
        rec.set("countedPrecincts", FieldValue::Text("120/150".into()));
        rec.set("totalPrecincts", FieldValue::Integer(150));

        assert_eq!(
            serde_json::to_string(&rec).unwrap(),
            r#"{"timestamp":"2025-05-11T21:30:00.000Z","countedPrecincts":"120/150","totalPrecincts":150}"#
        );
    }
}
