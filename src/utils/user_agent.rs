//! User-Agent classification for visit logs.

use woothee::parser::Parser;

/// Device, OS and browser derived from a User-Agent header.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AgentInfo {
    pub device: String,
    pub os: String,
    pub browser: String,
}

const OTHER: &str = "Other";

/// Parses a User-Agent string.
///
/// Device is one of `Mobile`, `Tablet`, `PC` or `Other`; OS and browser fall
/// back to `Other` when the parser does not recognise them.
pub fn parse_user_agent(ua: Option<&str>) -> AgentInfo {
    let unknown = AgentInfo {
        device: OTHER.to_string(),
        os: OTHER.to_string(),
        browser: OTHER.to_string(),
    };

    let ua = match ua {
        Some(s) if !s.trim().is_empty() => s,
        _ => return unknown,
    };

    let Some(result) = Parser::new().parse(ua) else {
        return unknown;
    };

    let is_tablet = result.os == "iPad" || ua.contains("Tablet");
    let device = match result.category {
        _ if is_tablet => "Tablet",
        "smartphone" | "mobilephone" => "Mobile",
        "pc" => "PC",
        _ => OTHER,
    };

    AgentInfo {
        device: device.to_string(),
        os: known_or_other(result.os),
        browser: known_or_other(result.name),
    }
}

fn known_or_other(value: &str) -> String {
    if value.is_empty() || value == "UNKNOWN" {
        OTHER.to_string()
    } else {
        value.to_string()
    }
}
