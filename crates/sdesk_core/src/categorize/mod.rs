use serde::{Deserialize, Serialize};

use crate::domain::Category;

/// Non-binding category suggestion derived from an incident description.
/// The caller's explicit category always wins; this only assists the form.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct CategorySuggestion {
    pub category: Category,
    pub matched_terms: Vec<String>,
}

// Keyword tables. Terms are matched case-insensitively on word boundaries
// ("disk" must not fire on "diskette-free"); the category with the most
// distinct matched terms wins.
const HARDWARE_TERMS: &[&str] = &[
    "laptop", "desktop", "monitor", "keyboard", "mouse", "printer", "docking",
    "battery", "charger", "screen", "disk", "hardware",
];
const SOFTWARE_TERMS: &[&str] = &[
    "application", "app", "software", "install", "update", "license", "crash",
    "outlook", "excel", "browser", "login", "password",
];
const NETWORK_TERMS: &[&str] = &[
    "network", "wifi", "wi-fi", "vpn", "ethernet", "dns", "internet", "connection",
    "latency", "firewall",
];

fn count_matches(description_lower: &str, terms: &[&str], matched: &mut Vec<String>) -> usize {
    let mut hits = 0;
    for term in terms {
        if contains_word(description_lower, term) {
            matched.push((*term).to_string());
            hits += 1;
        }
    }
    hits
}

fn contains_word(haystack: &str, needle: &str) -> bool {
    let mut start = 0;
    while let Some(pos) = haystack[start..].find(needle) {
        let abs = start + pos;
        let end = abs + needle.len();
        let before_ok = abs == 0
            || !haystack[..abs]
                .chars()
                .next_back()
                .is_some_and(char::is_alphanumeric);
        let after_ok = end == haystack.len()
            || !haystack[end..].chars().next().is_some_and(char::is_alphanumeric);
        if before_ok && after_ok {
            return true;
        }
        start = end;
    }
    false
}

/// Suggest a category for a free-text description. Deterministic: the same
/// description always yields the same suggestion. Falls back to Other when no
/// term matches or the description is blank.
pub fn suggest_category(description: &str) -> CategorySuggestion {
    let lower = description.to_lowercase();
    if lower.trim().is_empty() {
        return CategorySuggestion {
            category: Category::Other,
            matched_terms: Vec::new(),
        };
    }

    let mut hardware_terms = Vec::new();
    let mut software_terms = Vec::new();
    let mut network_terms = Vec::new();
    let hardware = count_matches(&lower, HARDWARE_TERMS, &mut hardware_terms);
    let software = count_matches(&lower, SOFTWARE_TERMS, &mut software_terms);
    let network = count_matches(&lower, NETWORK_TERMS, &mut network_terms);

    // Deterministic tie-break: Hardware, then Network, then Software, which
    // keeps physical-asset reports from being swallowed by generic app terms.
    let best = hardware.max(software).max(network);
    if best == 0 {
        return CategorySuggestion {
            category: Category::Other,
            matched_terms: Vec::new(),
        };
    }
    if hardware == best {
        return CategorySuggestion {
            category: Category::Hardware,
            matched_terms: hardware_terms,
        };
    }
    if network == best {
        return CategorySuggestion {
            category: Category::Network,
            matched_terms: network_terms,
        };
    }
    CategorySuggestion {
        category: Category::Software,
        matched_terms: software_terms,
    }
}
