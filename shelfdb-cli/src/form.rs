//! Form input rules
//!
//! The front end collects the same four entries as a record form: ID, Name,
//! Author, Cost. An entry left blank is an empty string. These rules decide
//! what a filled-in form means for each action.

use anyhow::{anyhow, bail, Result};

use shelfdb_engine::{DeleteTarget, Record};

/// The four form entries, in field order
#[derive(Debug, Clone, Default, PartialEq)]
pub struct FormInput {
    pub id: String,
    pub name: String,
    pub author: String,
    pub cost: String,
}

/// What a search form asks for
#[derive(Debug, Clone, PartialEq)]
pub enum SearchTarget {
    Key(i64),
    Value(String),
}

impl FormInput {
    fn entries(&self) -> [&str; 4] {
        [
            self.id.as_str(),
            self.name.as_str(),
            self.author.as_str(),
            self.cost.as_str(),
        ]
    }

    /// Parse a full record. ID must be an integer and Cost a number.
    pub fn to_record(&self) -> Result<Record> {
        let id = self
            .id
            .trim()
            .parse::<i64>()
            .map_err(|_| anyhow!("ID must be an integer, got '{}'", self.id))?;
        let cost = self
            .cost
            .trim()
            .parse::<f64>()
            .map_err(|_| anyhow!("Cost must be a number, got '{}'", self.cost))?;

        Ok(Record::new(id, self.name.as_str(), self.author.as_str(), cost))
    }

    /// Search uses the first filled entry. A digits-only ID means a key
    /// lookup; anything else is a by-value search.
    pub fn search_target(&self) -> Option<SearchTarget> {
        let id = self.id.as_str();
        if !id.is_empty() && id.bytes().all(|b| b.is_ascii_digit()) {
            if let Ok(key) = id.parse() {
                return Some(SearchTarget::Key(key));
            }
        }

        self.entries()
            .into_iter()
            .find(|entry| !entry.is_empty())
            .map(|entry| SearchTarget::Value(entry.to_string()))
    }

    /// What to delete: the ID as a key if given (must be an integer),
    /// otherwise the first filled entry among Name, Author, Cost as a
    /// plain value, even when it looks like a number.
    pub fn delete_target(&self) -> Result<DeleteTarget> {
        if !self.id.is_empty() {
            let key = self
                .id
                .trim()
                .parse::<i64>()
                .map_err(|_| anyhow!("ID must be an integer, got '{}'", self.id))?;
            return Ok(DeleteTarget::Key(key));
        }

        match self.entries()[1..].iter().find(|entry| !entry.is_empty()) {
            Some(value) => Ok(DeleteTarget::Value(value.to_string())),
            None => bail!("No value given for deletion"),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn form(id: &str, name: &str, author: &str, cost: &str) -> FormInput {
        FormInput {
            id: id.into(),
            name: name.into(),
            author: author.into(),
            cost: cost.into(),
        }
    }

    #[test]
    fn test_to_record() {
        let record = form("7", "Dune", "Herbert", "12.5").to_record().unwrap();
        assert_eq!(record, Record::new(7, "Dune", "Herbert", 12.5));

        let err = form("x7", "Dune", "Herbert", "12.5").to_record().unwrap_err();
        assert!(err.to_string().contains("ID"));

        let err = form("7", "Dune", "Herbert", "cheap").to_record().unwrap_err();
        assert!(err.to_string().contains("Cost"));
    }

    #[test]
    fn test_search_target() {
        assert_eq!(form("12", "Dune", "", "").search_target(), Some(SearchTarget::Key(12)));
        assert_eq!(
            form("", "", "Austen", "8").search_target(),
            Some(SearchTarget::Value("Austen".into()))
        );
        assert_eq!(
            form("", "", "", "8").search_target(),
            Some(SearchTarget::Value("8".into()))
        );
        // a non-digit ID is searched as a plain value
        assert_eq!(
            form("-3", "", "", "").search_target(),
            Some(SearchTarget::Value("-3".into()))
        );
        assert_eq!(FormInput::default().search_target(), None);
    }

    #[test]
    fn test_delete_target() {
        assert_eq!(form("5", "Dune", "", "").delete_target().unwrap(), DeleteTarget::Key(5));
        assert_eq!(
            form("", "", "Austen", "").delete_target().unwrap(),
            DeleteTarget::Value("Austen".into())
        );
        assert_eq!(
            form("", "", "", "8.0").delete_target().unwrap(),
            DeleteTarget::Value("8.0".into())
        );
        // a numeric name is still a value, not a key
        assert_eq!(
            form("", "5", "", "").delete_target().unwrap(),
            DeleteTarget::Value("5".into())
        );
        assert!(form("five", "", "", "").delete_target().is_err());

        let err = FormInput::default().delete_target().unwrap_err();
        assert_eq!(err.to_string(), "No value given for deletion");
    }
}
