use serde::{Deserialize, Serialize};

use crate::data::datavalue::DataValue;
use crate::data::record::{Record, RecordId};
use crate::error::Result;
use crate::view::columns::{ColumnDescriptor, ColumnSet, Comparator, Formatter};

/// A user entry as served by the directory's users endpoint
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct User {
    pub id: RecordId,
    pub name: String,
    #[serde(default)]
    pub username: String,
    pub email: String,
    #[serde(default)]
    pub phone: String,
    #[serde(default)]
    pub website: String,
    #[serde(default)]
    pub address: Address,
    #[serde(default)]
    pub company: Company,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct Address {
    pub street: String,
    pub suite: String,
    pub city: String,
    pub zipcode: String,
    pub geo: Geo,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Geo {
    pub lat: String,
    pub lng: String,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct Company {
    pub name: String,
    pub catch_phrase: String,
    pub bs: String,
}

impl User {
    fn nested(&self, key: &str) -> DataValue {
        let value = match key {
            "address" => serde_json::to_value(&self.address),
            "company" => serde_json::to_value(&self.company),
            _ => return DataValue::Null,
        };
        value
            .map(|v| DataValue::from_json(&v))
            .unwrap_or(DataValue::Null)
    }
}

impl Record for User {
    fn id(&self) -> RecordId {
        self.id.clone()
    }

    fn value(&self, key: &str) -> DataValue {
        match key {
            "id" => match &self.id {
                RecordId::Number(n) => DataValue::Integer(*n),
                RecordId::Text(s) => DataValue::Text(s.clone()),
            },
            "name" => DataValue::Text(self.name.clone()),
            "username" => DataValue::Text(self.username.clone()),
            "email" => DataValue::Text(self.email.clone()),
            "phone" => DataValue::Text(self.phone.clone()),
            "website" => DataValue::Text(self.website.clone()),
            "address" | "company" => self.nested(key),
            _ => match key.split_once('.') {
                Some((head, rest)) => self.nested(head).member(rest),
                None => DataValue::Null,
            },
        }
    }
}

/// Columns of the user directory table
pub fn user_columns() -> Result<ColumnSet> {
    let columns = vec![
        ColumnDescriptor::new("id", "ID")
            .with_comparator(Comparator::Numeric)
            .with_hideable(false),
        ColumnDescriptor::new("name", "Name").with_hideable(false),
        ColumnDescriptor::new("email", "Email"),
        ColumnDescriptor::new("phone", "Phone"),
        ColumnDescriptor::new("company", "Company")
            .with_formatter(Formatter::Member("name".to_string())),
    ];
    ColumnSet::new(columns)
}
