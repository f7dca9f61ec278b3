//! # SOAP Request Envelope
//!
//! Builds the SOAP 1.1 person-search request. The envelope carries:
//!
//! - a `wsse:Security/UsernameToken` header (username = customer number,
//!   password = assignment id), and
//! - a `SPARPersonsokningFraga` body with `Identifieringsinformation` and a
//!   `PersonsokningFraga/IdNummer` holding the canonical 12-digit number.
//!
//! Element text goes through the `quick-xml` writer, so configuration values
//! are escaped.

use quick_xml::events::{BytesDecl, BytesEnd, BytesStart, BytesText, Event};
use quick_xml::Writer;
use spar_core::Personnummer;

use crate::config::SparConfig;
use crate::error::GatewayError;

/// `SOAPAction` header value for the person-search operation.
pub const SOAP_ACTION: &str = "http://skatteverket.se/spar/personsok/2021.1/PersonsokService/Personsok";

const SOAP_ENV_NS: &str = "http://schemas.xmlsoap.org/soap/envelope/";
const WSSE_NS: &str =
    "http://docs.oasis-open.org/wss/2004/01/oasis-200401-wss-wssecurity-secext-1.0.xsd";
const PASSWORD_TEXT: &str =
    "http://docs.oasis-open.org/wss/2004/01/oasis-200401-wss-username-token-profile-1.0#PasswordText";
const QUERY_NS: &str =
    "http://statenspersonadressregister.se/schema/personsok/2021.1/personsokningfraga";
const IDENTIFICATION_NS: &str =
    "http://statenspersonadressregister.se/schema/komponent/metadata/identifieringsinformationWs-1.1";
const SEARCH_NS: &str =
    "http://statenspersonadressregister.se/schema/komponent/sok/personsokningsokparametrar-1.1";

/// Serialize the person-search envelope for `personnummer`.
pub fn person_search(
    config: &SparConfig,
    personnummer: &Personnummer,
) -> Result<String, GatewayError> {
    let mut writer = Writer::new(Vec::new());

    write(&mut writer, Event::Decl(BytesDecl::new("1.0", Some("UTF-8"), None)))?;
    start(
        &mut writer,
        "soapenv:Envelope",
        &[
            ("xmlns:soapenv", SOAP_ENV_NS),
            ("xmlns:per", QUERY_NS),
            ("xmlns:iden", IDENTIFICATION_NS),
            ("xmlns:sok", SEARCH_NS),
        ],
    )?;

    // -- Header ---------------------------------------------------------------
    start(&mut writer, "soapenv:Header", &[])?;
    start(&mut writer, "wsse:Security", &[("xmlns:wsse", WSSE_NS)])?;
    start(&mut writer, "wsse:UsernameToken", &[])?;
    leaf(&mut writer, "wsse:Username", &[], &config.customer_number)?;
    leaf(
        &mut writer,
        "wsse:Password",
        &[("Type", PASSWORD_TEXT)],
        config.assignment_id.as_str(),
    )?;
    end(&mut writer, "wsse:UsernameToken")?;
    end(&mut writer, "wsse:Security")?;
    end(&mut writer, "soapenv:Header")?;

    // -- Body -----------------------------------------------------------------
    start(&mut writer, "soapenv:Body", &[])?;
    start(&mut writer, "per:SPARPersonsokningFraga", &[])?;

    start(&mut writer, "iden:Identifieringsinformation", &[])?;
    leaf(&mut writer, "iden:KundNrLeveransMottagare", &[], &config.customer_number)?;
    leaf(&mut writer, "iden:KundNrSlutkund", &[], &config.customer_number)?;
    leaf(&mut writer, "iden:UppdragId", &[], config.assignment_id.as_str())?;
    leaf(&mut writer, "iden:SlutAnvandarId", &[], &config.end_user_id)?;
    end(&mut writer, "iden:Identifieringsinformation")?;

    start(&mut writer, "sok:PersonsokningFraga", &[])?;
    leaf(&mut writer, "sok:IdNummer", &[], personnummer.as_str())?;
    end(&mut writer, "sok:PersonsokningFraga")?;

    end(&mut writer, "per:SPARPersonsokningFraga")?;
    end(&mut writer, "soapenv:Body")?;
    end(&mut writer, "soapenv:Envelope")?;

    String::from_utf8(writer.into_inner()).map_err(envelope_error)
}

fn envelope_error(err: impl std::fmt::Display) -> GatewayError {
    GatewayError::Envelope {
        reason: err.to_string(),
    }
}

fn write(writer: &mut Writer<Vec<u8>>, event: Event<'_>) -> Result<(), GatewayError> {
    writer.write_event(event).map_err(envelope_error)
}

fn start(
    writer: &mut Writer<Vec<u8>>,
    name: &str,
    attributes: &[(&str, &str)],
) -> Result<(), GatewayError> {
    let mut element = BytesStart::new(name);
    for attribute in attributes {
        element.push_attribute(*attribute);
    }
    write(writer, Event::Start(element))
}

fn end(writer: &mut Writer<Vec<u8>>, name: &str) -> Result<(), GatewayError> {
    write(writer, Event::End(BytesEnd::new(name)))
}

fn leaf(
    writer: &mut Writer<Vec<u8>>,
    name: &str,
    attributes: &[(&str, &str)],
    text: &str,
) -> Result<(), GatewayError> {
    start(writer, name, attributes)?;
    write(writer, Event::Text(BytesText::new(text)))?;
    end(writer, name)
}

#[cfg(test)]
mod tests {
    use super::*;
    use spar_core::RegistryNode;

    fn config() -> SparConfig {
        SparConfig::local_mock("http://127.0.0.1:9000/spar").expect("mock config")
    }

    fn pnr() -> Personnummer {
        Personnummer::parse("900116-6959").expect("valid personnummer")
    }

    #[test]
    fn envelope_carries_credentials_and_identity_number() {
        let xml = person_search(&config(), &pnr()).expect("envelope");
        let tree = RegistryNode::from_xml(&xml).expect("well-formed");

        let token = tree
            .at(&["Envelope", "Header", "Security", "UsernameToken"])
            .expect("username token");
        assert_eq!(token.text_at(&["Username"]), Some("500243"));
        assert_eq!(token.text_at(&["Password"]), Some("637"));

        let query = tree
            .at(&["Envelope", "Body", "SPARPersonsokningFraga"])
            .expect("query");
        let ident = query.child("Identifieringsinformation").expect("identification");
        assert_eq!(ident.text_at(&["KundNrLeveransMottagare"]), Some("500243"));
        assert_eq!(ident.text_at(&["KundNrSlutkund"]), Some("500243"));
        assert_eq!(ident.text_at(&["UppdragId"]), Some("637"));
        assert_eq!(ident.text_at(&["SlutAnvandarId"]), Some("spar-lookup"));
        assert_eq!(
            query.text_at(&["PersonsokningFraga", "IdNummer"]),
            Some("199001166959")
        );
    }

    #[test]
    fn envelope_declares_namespaces() {
        let xml = person_search(&config(), &pnr()).expect("envelope");
        assert!(xml.starts_with("<?xml version=\"1.0\" encoding=\"UTF-8\"?>"));
        assert!(xml.contains(SOAP_ENV_NS));
        assert!(xml.contains(WSSE_NS));
    }

    #[test]
    fn configuration_values_are_escaped() {
        let mut cfg = config();
        cfg.end_user_id = "ops<&>team".to_string();
        let xml = person_search(&cfg, &pnr()).expect("envelope");
        assert!(!xml.contains("ops<&>team"));

        let tree = RegistryNode::from_xml(&xml).expect("still well-formed");
        assert_eq!(
            tree.find("SlutAnvandarId").and_then(RegistryNode::text),
            Some("ops<&>team")
        );
    }
}
