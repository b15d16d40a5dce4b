use std::{fs, path::Path};

use personbench_error::DataLoadError;
use spdlog::info;

use crate::model::Person;

/// Loads the bundled dataset `name` from `dir`. Order follows the JSON
/// array.
pub fn load_fixture(dir: &Path, name: &str) -> Result<Vec<Person>, DataLoadError> {
    let path = dir.join(name);
    let json = fs::read_to_string(&path).map_err(|source| DataLoadError::Missing {
        path: path.clone(),
        source,
    })?;
    let persons = parse_fixture(&json).map_err(|source| DataLoadError::Malformed {
        path: path.clone(),
        source,
    })?;
    info!("loaded {} persons from {}", persons.len(), path.display());
    Ok(persons)
}

pub fn parse_fixture(json: &str) -> Result<Vec<Person>, serde_json::Error> {
    serde_json::from_str(json)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parse_preserves_order() {
        let persons = parse_fixture(
            r#"[{"firstname": "a"}, {"firstname": "b"}, {"firstname": "c"}]"#,
        )
        .unwrap();
        let names: Vec<_> = persons.iter().filter_map(|p| p.firstname.as_deref()).collect();
        assert_eq!(names, vec!["a", "b", "c"]);
    }

    #[test]
    fn parse_empty_array() {
        assert!(parse_fixture("[]").unwrap().is_empty());
    }

    #[test]
    fn parse_rejects_object() {
        assert!(parse_fixture(r#"{"firstname": "a"}"#).is_err());
    }
}
