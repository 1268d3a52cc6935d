//! End-to-end tests for HL7v2 to FHIR Patient conversion

use chrono::NaiveDate;
use hl7bridge::config::ConversionConfig;
use hl7bridge::core::convert::{convert, Converter};
use hl7bridge::core::hl7::tokenize;
use hl7bridge::core::serialize::{serialize, ResourceSerializer};
use hl7bridge::domain::{AdministrativeGender, ConversionError, NameUse};
use serde_json::{json, Value};
use test_case::test_case;

const ADT_A01: &str = "MSH|^~\\&|SendingApp|SendingFacility|HL7API|PKB|20160102101112||ADT^A01|ABC0000000001|P|2.5\r\
PID|||1111111111^^^NHS^NH||Langworth^^Shaun^^Sir||19260508|M|||^11 Some St^London^Greater London^NE1 2CD^GBR\r";

fn with_pid(pid: &str) -> String {
    format!("MSH|^~\\&|App|Fac|Recv|RecvFac|20240101||ADT^A04|CTRL|P|2.5\r{pid}\r")
}

#[test]
fn test_langworth_end_to_end() {
    let patient = convert(ADT_A01).expect("conversion failed");

    assert_eq!(patient.name()[0].text, "Langworth^^Shaun^^Sir");
    assert_eq!(patient.name()[0].name_use, NameUse::Official);
    assert_eq!(patient.gender(), AdministrativeGender::Male);
    assert_eq!(patient.birth_date(), NaiveDate::from_ymd_opt(1926, 5, 8));

    let json = serialize(&patient).expect("serialization failed");
    let document: Value = serde_json::from_str(&json).unwrap();

    assert_eq!(
        document,
        json!({
            "resourceType": "Patient",
            "name": [{"use": "official", "text": "Langworth^^Shaun^^Sir"}],
            "gender": "male",
            "birthDate": "1926-05-08",
            "identifier": [{"system": "urn:example:patient-identifier", "value": "1111111111"}]
        })
    );
}

#[test]
fn test_serialized_keys_follow_declaration_order() {
    let json = serialize(&convert(ADT_A01).unwrap()).unwrap();
    let document: Value = serde_json::from_str(&json).unwrap();

    let keys: Vec<&str> = document
        .as_object()
        .unwrap()
        .keys()
        .map(String::as_str)
        .collect();
    assert_eq!(
        keys,
        vec!["resourceType", "name", "gender", "birthDate", "identifier"]
    );
}

#[test]
fn test_pretty_and_compact_output() {
    let patient = convert(ADT_A01).unwrap();

    let pretty = ResourceSerializer::new(true).serialize(&patient).unwrap();
    assert!(pretty.starts_with("{\n  \"resourceType\": \"Patient\""));

    let compact = ResourceSerializer::new(false).serialize(&patient).unwrap();
    assert!(!compact.contains('\n'));
    assert_eq!(
        serde_json::from_str::<Value>(&pretty).unwrap(),
        serde_json::from_str::<Value>(&compact).unwrap()
    );
}

#[test_case("M", "male" ; "male")]
#[test_case("F", "female" ; "female")]
#[test_case("U", "unknown" ; "unknown code")]
#[test_case("", "unknown" ; "empty")]
#[test_case("m", "unknown" ; "lowercase is not translated")]
fn test_gender_translation(code: &str, expected: &str) {
    let raw = with_pid(&format!("PID|||1||Doe^Jane||19800131|{code}"));
    let json = serialize(&convert(&raw).unwrap()).unwrap();
    let document: Value = serde_json::from_str(&json).unwrap();
    assert_eq!(document["gender"], expected);
}

#[test]
fn test_missing_birth_date_is_omitted() {
    let raw = with_pid("PID|||1||Doe^Jane|||F");
    let patient = convert(&raw).unwrap();
    assert_eq!(patient.birth_date(), None);

    let json = serialize(&patient).unwrap();
    assert!(!json.contains("birthDate"));
    assert!(!json.contains("null"));
}

#[test_case("19260532" ; "day out of range")]
#[test_case("1926-05-08" ; "dashed")]
#[test_case("192605" ; "truncated")]
fn test_invalid_birth_date(value: &str) {
    let raw = with_pid(&format!("PID|||1||Doe^Jane||{value}|F"));
    let error = convert(&raw).unwrap_err();
    assert!(matches!(error, ConversionError::InvalidDate { .. }));
}

#[test]
fn test_text_without_header_is_malformed() {
    let error = convert("PID|||1||Doe^Jane||19800131|F\r").unwrap_err();
    assert!(matches!(error, ConversionError::MalformedMessage(_)));
    assert_eq!(error.kind(), "malformed_message");
}

#[test]
fn test_custom_delimiters() {
    let raw = "MSH#*~\\&#App#Fac\rPID###42*x##Smith*Ann##19900102#F\r";
    let patient = convert(raw).unwrap();

    assert_eq!(patient.name()[0].text, "Smith*Ann");
    assert_eq!(patient.birth_date(), NaiveDate::from_ymd_opt(1990, 1, 2));
}

#[test]
fn test_component_lookup_matches_manual_split() {
    let message = tokenize(ADT_A01).unwrap();
    let manual: Vec<&str> = "1111111111^^^NHS^NH".split('^').collect();

    for (index, expected) in manual.iter().enumerate() {
        assert_eq!(message.component("PID", 3, index + 1), Some(*expected));
    }
    assert_eq!(message.component("PID", 3, manual.len() + 1), None);
    assert_eq!(message.component("ZZZ", 1, 1), None);
}

#[test]
fn test_source_identifier_strategy() {
    let config = ConversionConfig {
        identifier_strategy: "source".to_string(),
        identifier_system: "https://fhir.nhs.uk/Id/nhs-number".to_string(),
        ..ConversionConfig::default()
    };
    let converter = Converter::from_config(&config).unwrap();

    let patient = converter.convert(ADT_A01).unwrap();
    assert_eq!(patient.identifier()[0].value, "1111111111");
    assert_eq!(
        patient.identifier()[0].system,
        "https://fhir.nhs.uk/Id/nhs-number"
    );

    let error = converter
        .convert(&with_pid("PID|||||Doe^Jane||19800131|F"))
        .unwrap_err();
    assert!(matches!(error, ConversionError::IncompleteSourceData(_)));
}

#[test]
fn test_uuid_identifier_strategy() {
    let config = ConversionConfig {
        identifier_strategy: "uuid".to_string(),
        ..ConversionConfig::default()
    };
    let converter = Converter::from_config(&config).unwrap();

    let first = converter.convert(ADT_A01).unwrap();
    let second = converter.convert(ADT_A01).unwrap();
    let value = &first.identifier()[0].value;

    assert!(uuid::Uuid::parse_str(value).is_ok());
    assert_ne!(value, &second.identifier()[0].value);
}

#[test]
fn test_converter_reports_header_metadata() {
    let converted = Converter::default().convert_to_json(ADT_A01).unwrap();

    assert_eq!(converted.control_id.as_deref(), Some("ABC0000000001"));
    assert_eq!(converted.message_type.as_deref(), Some("ADT^A01"));
    assert_eq!(converted.body, serialize(&converted.patient).unwrap());
}
