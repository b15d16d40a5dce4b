use personbench_proc_macros::{Entity, NumBytes, Read, Write};
use serde::{Deserialize, Serialize};

#[derive(Debug, Default, Clone, PartialEq, Eq, Serialize, Deserialize, Read, Write, NumBytes, Entity)]
#[serde(default, rename_all = "camelCase")]
pub struct Person {
    pub firstname: Option<String>,
    pub lastname: Option<String>,
    pub addresses: Vec<Address>,
    pub default_address: Option<Address>,
    pub private_data: Option<PrivateData>,
    pub personal_note: Option<String>,
}

#[derive(Debug, Default, Clone, PartialEq, Eq, Serialize, Deserialize, Read, Write, NumBytes, Entity)]
#[serde(default, rename_all = "camelCase")]
pub struct Address {
    pub street: Option<String>,
    pub city: Option<String>,
    pub state: Option<String>,
    pub zip: Option<String>,
    pub country: Option<String>,
}

#[derive(Debug, Default, Clone, PartialEq, Eq, Serialize, Deserialize, Read, Write, NumBytes, Entity)]
#[serde(default, rename_all = "camelCase")]
pub struct PrivateData {
    pub ssn: Option<String>,
    pub email: Option<String>,
    pub phone: Option<String>,
    pub date_of_birth: Option<String>,
}

#[cfg(test)]
mod tests {
    use personbench_objectdb::Entity as _;
    use personbench_serialization::{NumBytes, Read, Write};

    use super::*;

    #[test]
    fn class_names_follow_type_names() {
        assert_eq!(Person::class_name(), "Person");
        assert_eq!(Address::class_name(), "Address");
        assert_eq!(PrivateData::class_name(), "PrivateData");
    }

    #[test]
    fn camel_case_fields() {
        let person: Person = serde_json::from_str(
            r#"{
                "firstname": "Ada",
                "defaultAddress": {"city": "London"},
                "privateData": {"dateOfBirth": "1815-12-10"},
                "personalNote": "engine"
            }"#,
        )
        .unwrap();
        assert_eq!(person.firstname.as_deref(), Some("Ada"));
        assert!(person.lastname.is_none());
        assert!(person.addresses.is_empty());
        assert_eq!(person.default_address.unwrap().city.as_deref(), Some("London"));
        assert_eq!(person.private_data.unwrap().date_of_birth.as_deref(), Some("1815-12-10"));
        assert_eq!(person.personal_note.as_deref(), Some("engine"));
    }

    #[test]
    fn unknown_fields_are_ignored() {
        let person: Person = serde_json::from_str(r#"{"lastname": "Hopper", "rank": 7}"#).unwrap();
        assert_eq!(person.lastname.as_deref(), Some("Hopper"));
    }

    #[test]
    fn stored_form_keeps_nested_values() {
        let address = Address {
            street: Some("1 Main St".into()),
            city: Some("Springfield".into()),
            ..Default::default()
        };
        let person = Person {
            firstname: Some("Grace".into()),
            addresses: vec![address.clone(), Address::default()],
            default_address: Some(address),
            ..Default::default()
        };
        let packed = person.pack().unwrap();
        assert_eq!(packed.len(), person.num_bytes());
        assert_eq!(Person::unpack(&packed).unwrap(), person);
    }
}
