/**
 * RULE TABLES - Static classification data for the node remediation
 *
 * ROLE :
 * Read-only lookup tables used by the classifier. Nothing here is mutated
 * at runtime.
 *
 * PRIORITY :
 * Keyword rules are evaluated as one ordered list. MachineType rules come
 * first, then Caption rules, each in declaration order. The LAST matching
 * rule wins, so a Caption rule overrides a MachineType rule and a later
 * entry overrides an earlier one in the same table.
 *
 * Matching is a case-sensitive substring test.
 */

/// Node attribute a keyword rule inspects.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Source {
    MachineType,
    Caption,
}

/// `keyword` found in `source` yields `label`, unless `unless` matches.
#[derive(Debug, Clone, Copy)]
pub struct KeywordRule {
    pub source: Source,
    pub keyword: &'static str,
    pub label: &'static str,
    pub unless: Option<(Source, &'static str)>,
}

const fn rule(source: Source, keyword: &'static str, label: &'static str) -> KeywordRule {
    KeywordRule {
        source,
        keyword,
        label,
        unless: None,
    }
}

const fn rule_unless(
    source: Source,
    keyword: &'static str,
    label: &'static str,
    unless: (Source, &'static str),
) -> KeywordRule {
    KeywordRule {
        source,
        keyword,
        label,
        unless: Some(unless),
    }
}

/// Octet2 -> Environment. Exact string match.
pub const ENVIRONMENT_MAP: &[(&str, &str)] = &[
    ("55", "Wonder"),
    ("56", "Dream"),
    ("57", "Fantasy"),
    ("58", "Magic"),
    ("216", "Castaway Cay"),
    ("217", "LightHouse Point"),
];

/// Device_Type rules. MachineType block first, Caption block second.
pub const DEVICE_TYPE_RULES: &[KeywordRule] = &[
    rule(Source::MachineType, "Windows", "Server"),
    rule(Source::MachineType, "Linux", "Server"),
    rule(Source::MachineType, "VMware", "Hypervisor"),
    rule(Source::MachineType, "Catalyst", "Access Switch"),
    rule(Source::MachineType, "Nexus", "Data Center Switch"),
    rule(Source::MachineType, "ISR", "Router"),
    rule(Source::MachineType, "ASR", "Router"),
    rule(Source::MachineType, "ASA", "Firewall"),
    rule(Source::MachineType, "Palo Alto", "Firewall"),
    rule(Source::MachineType, "Aironet", "Wireless Access Point"),
    rule(Source::MachineType, "Wireless LAN Controller", "Wireless Controller"),
    rule(Source::MachineType, "APC", "UPS"),
    rule_unless(
        Source::Caption,
        "brightsign",
        "Digital Signage",
        (Source::MachineType, "Windows"),
    ),
    rule(Source::Caption, "kiosk", "Kiosk"),
    rule(Source::Caption, "cctv", "Camera"),
    rule(Source::Caption, "-WAP", "Wireless Access Point"),
    rule(Source::Caption, "-FW", "Firewall"),
];

/// Device_Function rules, Caption only.
pub const DEVICE_FUNCTION_RULES: &[KeywordRule] = &[
    rule(Source::Caption, "brightsign", "Brightsign"),
    rule(Source::Caption, "kiosk", "Guest Kiosk"),
    rule(Source::Caption, "cctv", "Surveillance"),
    rule(Source::Caption, "pbx", "Telephony"),
    rule(Source::Caption, "PRT", "Print Server"),
    rule(Source::Caption, "-DC", "Domain Controller"),
    rule(Source::Caption, "-SQL", "Database"),
];

/// Exact Octet2 lookup.
pub fn environment_for(octet2: &str) -> Option<&'static str> {
    ENVIRONMENT_MAP
        .iter()
        .find(|(key, _)| *key == octet2)
        .map(|(_, label)| *label)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashSet;

    #[test]
    fn test_environment_keys_are_unique() {
        let keys: HashSet<_> = ENVIRONMENT_MAP.iter().map(|(k, _)| *k).collect();
        assert_eq!(keys.len(), ENVIRONMENT_MAP.len());
    }

    #[test]
    fn test_environment_lookup_is_exact() {
        assert_eq!(environment_for("56"), Some("Dream"));
        assert_eq!(environment_for("217"), Some("LightHouse Point"));
        assert_eq!(environment_for("5"), None);
        assert_eq!(environment_for(" 56"), None);
        assert_eq!(environment_for(""), None);
    }

    #[test]
    fn test_device_type_blocks_are_ordered() {
        let first_caption = DEVICE_TYPE_RULES
            .iter()
            .position(|r| r.source == Source::Caption)
            .unwrap();
        assert!(DEVICE_TYPE_RULES[first_caption..]
            .iter()
            .all(|r| r.source == Source::Caption));
    }

    #[test]
    fn test_function_rules_only_read_caption() {
        assert!(DEVICE_FUNCTION_RULES.iter().all(|r| r.source == Source::Caption));
    }
}
