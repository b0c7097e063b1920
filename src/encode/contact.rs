use crate::intent::ContactFields;

/// vCard 3.0 with fixed line order. Optional lines are left out entirely
/// when their field is empty.
pub(super) fn vcard(card: &ContactFields) -> String {
    let mut lines = vec![
        "BEGIN:VCARD".to_owned(),
        "VERSION:3.0".to_owned(),
        format!("N:{};{};;;", card.last_name, card.first_name),
        format!("FN:{} {}", card.first_name, card.last_name),
    ];

    let properties = [
        ("ORG", &card.organization),
        ("TITLE", &card.title),
        ("TEL;TYPE=CELL", &card.mobile),
        ("TEL;TYPE=WORK", &card.work_phone),
        ("TEL;TYPE=HOME", &card.home_phone),
        ("TEL;TYPE=FAX", &card.fax),
        ("EMAIL;TYPE=WORK", &card.work_email),
        ("EMAIL;TYPE=HOME", &card.home_email),
        ("URL", &card.website),
    ];
    lines.extend(
        properties
            .into_iter()
            .filter(|(_, value)| !value.is_empty())
            .map(|(name, value)| format!("{name}:{value}")),
    );

    if card.has_address() {
        lines.push(format!(
            "ADR;TYPE=WORK:;;{};{};{};{};{}",
            card.street, card.city, card.state, card.zip_code, card.country
        ));
    }
    if !card.note.is_empty() {
        lines.push(format!("NOTE:{}", card.note));
    }

    lines.push("END:VCARD".to_owned());
    lines.join("\n")
}

#[cfg(test)]
mod tests {
    use super::*;

    fn card() -> ContactFields {
        ContactFields {
            first_name: "Ada".into(),
            last_name: "Lovelace".into(),
            ..Default::default()
        }
    }

    #[test]
    fn bare_card_has_only_fixed_lines() {
        assert_eq!(
            vcard(&card()),
            "BEGIN:VCARD\nVERSION:3.0\nN:Lovelace;Ada;;;\nFN:Ada Lovelace\nEND:VCARD"
        );
    }

    #[test]
    fn line_count_tracks_present_fields() {
        let contact = ContactFields {
            mobile: "+1 555".into(),
            work_email: "ada@example.com".into(),
            website: "https://ada.test".into(),
            ..card()
        };
        let payload = vcard(&contact);
        assert_eq!(payload.lines().count(), 5 + 3);
        for absent in ["ORG:", "TITLE:", "ADR;TYPE=WORK:", "NOTE:"] {
            assert!(!payload.contains(absent), "{absent} should be omitted");
        }
        assert!(payload.contains("\nEMAIL;TYPE=WORK:ada@example.com\n"));
    }

    #[test]
    fn address_appears_when_any_part_is_set() {
        let contact = ContactFields {
            city: "London".into(),
            ..card()
        };
        assert!(vcard(&contact).contains("\nADR;TYPE=WORK:;;;London;;;\n"));
    }

    #[test]
    fn properties_keep_fixed_order() {
        let contact = ContactFields {
            organization: "Engines".into(),
            title: "Analyst".into(),
            fax: "9".into(),
            home_email: "home@example.com".into(),
            country: "UK".into(),
            note: "first programmer".into(),
            ..card()
        };
        let lines: Vec<_> = vcard(&contact).lines().map(str::to_owned).collect();
        assert_eq!(
            &lines[4..],
            [
                "ORG:Engines",
                "TITLE:Analyst",
                "TEL;TYPE=FAX:9",
                "EMAIL;TYPE=HOME:home@example.com",
                "ADR;TYPE=WORK:;;;;;;UK",
                "NOTE:first programmer",
                "END:VCARD",
            ]
        );
    }
}
