pub const DEFAULT_SERVER: &str = "https://www.plantuml.com/plantuml";

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ImageFormat {
    Svg,
    Png,
}

impl ImageFormat {
    fn segment(self) -> &'static str {
        match self {
            ImageFormat::Svg => "svg",
            ImageFormat::Png => "png",
        }
    }
}

/// Trims the source and adds the `@startuml`/`@enduml` markers when missing.
pub fn normalize_source(source: &str) -> String {
    let trimmed = source.trim();
    let mut lines: Vec<&str> = trimmed.lines().map(str::trim_end).collect();
    if !lines
        .first()
        .is_some_and(|line| line.trim_start().starts_with("@start"))
    {
        lines.insert(0, "@startuml");
    }
    if !lines
        .last()
        .is_some_and(|line| line.trim_start().starts_with("@end"))
    {
        lines.push("@enduml");
    }
    lines.join("\n")
}

/// True when the source holds anything besides the start/end markers and comments.
pub fn has_diagram_content(source: &str) -> bool {
    source.lines().map(str::trim).any(|line| {
        !line.is_empty() && !line.starts_with('@') && !line.starts_with('\'')
    })
}

/// Image URL using the server's `~h` (hex) text encoding.
pub fn image_url(server: &str, source: &str, format: ImageFormat) -> String {
    let normalized = normalize_source(source);
    let hex: String = normalized
        .as_bytes()
        .iter()
        .map(|byte| format!("{byte:02x}"))
        .collect();
    format!(
        "{}/{}/~h{}",
        server.trim_end_matches('/'),
        format.segment(),
        hex
    )
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn markers_are_added_once() {
        assert_eq!(normalize_source("  A -> B\n"), "@startuml\nA -> B\n@enduml");
        assert_eq!(
            normalize_source("@startuml\nA -> B\n@enduml"),
            "@startuml\nA -> B\n@enduml"
        );
    }

    #[test]
    fn empty_diagrams_have_no_content() {
        assert!(!has_diagram_content("@startuml\n' todo\n@enduml"));
        assert!(has_diagram_content("@startuml\nclass User\n@enduml"));
    }

    #[test]
    fn image_url_hex_encodes_normalized_source() {
        let url = image_url("http://localhost:8080/", "A", ImageFormat::Png);
        assert_eq!(
            url,
            "http://localhost:8080/png/~h407374617274756d6c0a410a40656e64756d6c"
        );
    }
}
